//! The stylesheet tree.
//!
//! [`Stylesheet`] owns every node in a [`SlotMap`] arena. Parent links are
//! plain [`NodeId`] back-references used for ancestor walks; ownership flows
//! strictly from the root down through each node's child list, so removing
//! a node frees its whole subtree.
//!
//! # Panics
//!
//! Accessors index the arena directly and panic when given an id whose node
//! has been removed. Use [`Stylesheet::contains`] when an id may be stale.

use slotmap::SlotMap;

use crate::logging::targets;
use crate::node::{
    AtRule, Comment, Declaration, NodeData, NodeId, NodeKind, NodeType, Raws, Rule, Source,
};

/// Iteration state of one container during [`Stylesheet::walk`].
///
/// `next` is the index of the next child to visit. Every mutation of the
/// container shifts it so no sibling is skipped or visited twice.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Cursor {
    pub(crate) container: NodeId,
    pub(crate) next: usize,
}

/// An ordered, mutable CSS document tree.
#[derive(Debug, Clone)]
pub struct Stylesheet {
    pub(crate) nodes: SlotMap<NodeId, NodeData>,
    pub(crate) root: NodeId,
    pub(crate) cursors: Vec<Cursor>,
}

impl Stylesheet {
    /// Create an empty stylesheet.
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(NodeData::new(NodeKind::Root));
        Self {
            nodes,
            root,
            cursors: Vec::new(),
        }
    }

    /// The root node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Whether `id` refers to a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of live nodes, including the root and detached nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id].kind
    }

    pub fn node_type(&self, id: NodeId) -> NodeType {
        self.nodes[id].kind.node_type()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id].children
    }

    pub fn first(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].children.first().copied()
    }

    pub fn last(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].children.last().copied()
    }

    /// Position of `child` within its parent's children.
    pub fn index_of(&self, child: NodeId) -> Option<usize> {
        let parent = self.nodes.get(child)?.parent?;
        self.nodes[parent].children.iter().position(|&c| c == child)
    }

    pub fn raws(&self, id: NodeId) -> &Raws {
        &self.nodes[id].raws
    }

    pub fn raws_mut(&mut self, id: NodeId) -> &mut Raws {
        &mut self.nodes[id].raws
    }

    pub fn source(&self, id: NodeId) -> Option<&Source> {
        self.nodes[id].source.as_ref()
    }

    pub fn set_source(&mut self, id: NodeId, source: Option<Source>) {
        self.nodes[id].source = source;
    }

    /// Rule data, if `id` is a rule.
    pub fn rule(&self, id: NodeId) -> Option<&Rule> {
        match &self.nodes[id].kind {
            NodeKind::Rule(rule) => Some(rule),
            _ => None,
        }
    }

    /// At-rule data, if `id` is an at-rule.
    pub fn at_rule(&self, id: NodeId) -> Option<&AtRule> {
        match &self.nodes[id].kind {
            NodeKind::AtRule(at_rule) => Some(at_rule),
            _ => None,
        }
    }

    /// Mutable at-rule data, if `id` is an at-rule.
    pub fn at_rule_mut(&mut self, id: NodeId) -> Option<&mut AtRule> {
        match &mut self.nodes[id].kind {
            NodeKind::AtRule(at_rule) => Some(at_rule),
            _ => None,
        }
    }

    /// Declaration data, if `id` is a declaration.
    pub fn declaration(&self, id: NodeId) -> Option<&Declaration> {
        match &self.nodes[id].kind {
            NodeKind::Declaration(decl) => Some(decl),
            _ => None,
        }
    }

    /// Mutable declaration data, if `id` is a declaration.
    pub fn declaration_mut(&mut self, id: NodeId) -> Option<&mut Declaration> {
        match &mut self.nodes[id].kind {
            NodeKind::Declaration(decl) => Some(decl),
            _ => None,
        }
    }

    /// Comment data, if `id` is a comment.
    pub fn comment(&self, id: NodeId) -> Option<&Comment> {
        match &self.nodes[id].kind {
            NodeKind::Comment(comment) => Some(comment),
            _ => None,
        }
    }

    /// Ancestors of `id`, nearest first, ending with the root.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            sheet: self,
            next: self.nodes.get(id).and_then(|n| n.parent),
        }
    }

    /// All descendants of `id` in document order (parents before children).
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        self.collect_descendants(id, &mut result);
        result
    }

    fn collect_descendants(&self, id: NodeId, result: &mut Vec<NodeId>) {
        for &child in &self.nodes[id].children {
            result.push(child);
            self.collect_descendants(child, result);
        }
    }

    // =========================================================================
    // Rule selectors
    // =========================================================================

    /// The selector text of a rule, or `None` if `id` is not a rule.
    pub fn selector(&self, id: NodeId) -> Option<&str> {
        self.rule(id).map(|rule| rule.selector.as_str())
    }

    /// Replace a rule's selector text. Does nothing for non-rules.
    pub fn set_selector(&mut self, id: NodeId, selector: impl Into<String>) {
        if let NodeKind::Rule(rule) = &mut self.nodes[id].kind {
            rule.selector = selector.into();
        }
    }

    /// Replace a rule's selector list.
    ///
    /// The selectors are joined with the first `,` (plus following whitespace)
    /// found in the current selector, so `a, b` style lists keep their
    /// spacing. Without an existing separator they are joined with `,`
    /// followed by the rule's `between` raw.
    pub fn set_selectors<S: AsRef<str>>(&mut self, id: NodeId, selectors: &[S]) {
        let Some(rule) = self.rule(id) else {
            return;
        };
        let separator = match existing_separator(&rule.selector) {
            Some(separator) => separator.to_string(),
            None => {
                let between = self.nodes[id].raws.between.as_deref().unwrap_or(" ");
                format!(",{between}")
            }
        };
        let joined = selectors
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(&separator);
        self.set_selector(id, joined);
    }

    // =========================================================================
    // Construction
    // =========================================================================

    fn create(&mut self, kind: NodeKind) -> NodeId {
        let id = self.nodes.insert(NodeData::new(kind));
        tracing::trace!(target: targets::TREE, ?id, "created node");
        id
    }

    /// Create a detached rule.
    pub fn create_rule(&mut self, selector: impl Into<String>) -> NodeId {
        self.create(NodeKind::Rule(Rule {
            selector: selector.into(),
        }))
    }

    /// Create a detached at-rule. It gets a block once a child is appended.
    pub fn create_at_rule(&mut self, name: impl Into<String>, params: impl Into<String>) -> NodeId {
        self.create(NodeKind::AtRule(AtRule {
            name: name.into(),
            params: params.into(),
            has_block: false,
        }))
    }

    /// Create a detached declaration.
    pub fn create_declaration(
        &mut self,
        prop: impl Into<String>,
        value: impl Into<String>,
    ) -> NodeId {
        self.create(NodeKind::Declaration(Declaration {
            prop: prop.into(),
            value: value.into(),
            important: false,
        }))
    }

    /// Create a detached comment.
    pub fn create_comment(&mut self, text: impl Into<String>) -> NodeId {
        self.create(NodeKind::Comment(Comment { text: text.into() }))
    }

    /// Deep-copy `id` and its subtree. The copy is detached, keeps raws and
    /// source, and has not been visited by any walk.
    pub fn clone_node(&mut self, id: NodeId) -> NodeId {
        let data = &self.nodes[id];
        let mut copy = NodeData::new(data.kind.clone());
        copy.raws = data.raws.clone();
        copy.source = data.source.clone();
        let children = data.children.clone();

        let copy_id = self.nodes.insert(copy);
        for child in children {
            let child_copy = self.clone_node(child);
            self.nodes[child_copy].parent = Some(copy_id);
            self.nodes[copy_id].children.push(child_copy);
        }
        copy_id
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Append `child` as the last child of `parent`.
    ///
    /// Appending to a block-less at-rule gives it a block.
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        let sample = self.last(parent);
        let index = self.nodes[parent].children.len();
        self.insert_at(parent, index, child, sample);
    }

    /// Insert `node` as the sibling immediately before `existing`.
    pub fn insert_before(&mut self, existing: NodeId, node: NodeId) {
        self.detach(node);
        let Some((parent, index)) = self.position(existing) else {
            tracing::warn!(target: targets::TREE, ?existing, "insert_before on a detached node");
            return;
        };
        self.insert_at(parent, index, node, Some(existing));
    }

    /// Insert `node` as the sibling immediately after `existing`.
    ///
    /// During a walk, a node inserted after the node currently being visited
    /// is the next one visited.
    pub fn insert_after(&mut self, existing: NodeId, node: NodeId) {
        self.detach(node);
        let Some((parent, index)) = self.position(existing) else {
            tracing::warn!(target: targets::TREE, ?existing, "insert_after on a detached node");
            return;
        };
        self.insert_at(parent, index + 1, node, Some(existing));
    }

    /// Put `replacement` where `existing` is and remove `existing`.
    pub fn replace_with(&mut self, existing: NodeId, replacement: NodeId) {
        if existing == replacement {
            return;
        }
        self.insert_before(existing, replacement);
        self.remove(existing);
    }

    /// Detach `id` from the tree and free it together with its subtree.
    pub fn remove(&mut self, id: NodeId) {
        if id == self.root || !self.nodes.contains_key(id) {
            return;
        }
        self.detach(id);
        for descendant in self.descendants(id) {
            self.nodes.remove(descendant);
        }
        self.nodes.remove(id);
        tracing::trace!(target: targets::TREE, ?id, "removed node");
    }

    fn position(&self, id: NodeId) -> Option<(NodeId, usize)> {
        let parent = self.nodes.get(id)?.parent?;
        let index = self.index_of(id)?;
        Some((parent, index))
    }

    /// Unlink `id` from its parent without freeing it.
    fn detach(&mut self, id: NodeId) {
        let Some((parent, index)) = self.position(id) else {
            return;
        };
        self.nodes[parent].children.remove(index);
        self.nodes[id].parent = None;
        for cursor in self.cursors.iter_mut() {
            if cursor.container == parent && index < cursor.next {
                cursor.next -= 1;
            }
        }
    }

    /// Link a detached `node` into `parent` at `index`.
    ///
    /// A node without a `before` raw borrows the whitespace of `sample`.
    fn insert_at(&mut self, parent: NodeId, index: usize, node: NodeId, sample: Option<NodeId>) {
        if self.nodes[node].raws.before.is_none()
            && let Some(sample) = sample
            && let Some(before) = &self.nodes[sample].raws.before
        {
            let whitespace: String = before.chars().filter(|c| c.is_whitespace()).collect();
            self.nodes[node].raws.before = Some(whitespace);
        }

        self.nodes[parent].children.insert(index, node);
        self.nodes[node].parent = Some(parent);
        if let NodeKind::AtRule(at_rule) = &mut self.nodes[parent].kind {
            at_rule.has_block = true;
        }

        for cursor in self.cursors.iter_mut() {
            if cursor.container == parent && index < cursor.next {
                cursor.next += 1;
            }
        }
        tracing::trace!(target: targets::TREE, ?parent, ?node, index, "inserted node");
    }
}

impl Default for Stylesheet {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the ancestors of a node. See [`Stylesheet::ancestors`].
#[derive(Debug, Clone)]
pub struct Ancestors<'a> {
    sheet: &'a Stylesheet,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.sheet.nodes.get(current).and_then(|n| n.parent);
        Some(current)
    }
}

/// The first `,` plus the whitespace following it.
fn existing_separator(selector: &str) -> Option<&str> {
    let start = selector.find(',')?;
    let rest = &selector[start + 1..];
    let spaces = rest.len() - rest.trim_start().len();
    Some(&selector[start..start + 1 + spaces])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet_with_rules(selectors: &[&str]) -> (Stylesheet, Vec<NodeId>) {
        let mut sheet = Stylesheet::new();
        let root = sheet.root();
        let ids = selectors
            .iter()
            .map(|selector| {
                let id = sheet.create_rule(*selector);
                sheet.append(root, id);
                id
            })
            .collect();
        (sheet, ids)
    }

    #[test]
    fn append_links_parent_and_child() {
        let (sheet, ids) = sheet_with_rules(&["a", "b"]);
        assert_eq!(sheet.children(sheet.root()), ids.as_slice());
        assert_eq!(sheet.parent(ids[0]), Some(sheet.root()));
        assert_eq!(sheet.index_of(ids[1]), Some(1));
    }

    #[test]
    fn insert_after_and_before() {
        let (mut sheet, ids) = sheet_with_rules(&["a", "c"]);
        let b = sheet.create_rule("b");
        sheet.insert_after(ids[0], b);
        let z = sheet.create_rule("z");
        sheet.insert_before(ids[0], z);

        let selectors: Vec<_> = sheet
            .children(sheet.root())
            .iter()
            .map(|&id| sheet.selector(id).unwrap_or_default().to_string())
            .collect();
        assert_eq!(selectors, vec!["z", "a", "b", "c"]);
    }

    #[test]
    fn remove_frees_subtree() {
        let (mut sheet, ids) = sheet_with_rules(&["a"]);
        let decl = sheet.create_declaration("color", "red");
        sheet.append(ids[0], decl);

        sheet.remove(ids[0]);
        assert!(!sheet.contains(ids[0]));
        assert!(!sheet.contains(decl));
        assert!(sheet.children(sheet.root()).is_empty());
    }

    #[test]
    fn replace_with_keeps_position() {
        let (mut sheet, ids) = sheet_with_rules(&["a", "b", "c"]);
        let replacement = sheet.create_rule("x");
        sheet.replace_with(ids[1], replacement);

        assert_eq!(sheet.children(sheet.root()), &[ids[0], replacement, ids[2]]);
        assert!(!sheet.contains(ids[1]));
    }

    #[test]
    fn clone_is_deep_and_detached() {
        let (mut sheet, ids) = sheet_with_rules(&["a"]);
        let decl = sheet.create_declaration("color", "red");
        sheet.append(ids[0], decl);
        sheet.raws_mut(ids[0]).between = Some(" ".into());

        let copy = sheet.clone_node(ids[0]);
        assert_eq!(sheet.parent(copy), None);
        assert_eq!(sheet.raws(copy).between.as_deref(), Some(" "));
        assert_eq!(sheet.children(copy).len(), 1);
        assert_ne!(sheet.children(copy)[0], decl);
        assert_eq!(sheet.parent(sheet.children(copy)[0]), Some(copy));
    }

    #[test]
    fn inserted_node_borrows_sample_whitespace() {
        let (mut sheet, ids) = sheet_with_rules(&["a"]);
        sheet.raws_mut(ids[0]).before = Some("\n  ".into());

        let media = sheet.create_at_rule("media", "print");
        sheet.insert_after(ids[0], media);
        assert_eq!(sheet.raws(media).before.as_deref(), Some("\n  "));
    }

    #[test]
    fn append_gives_at_rule_a_block() {
        let mut sheet = Stylesheet::new();
        let media = sheet.create_at_rule("media", "print");
        assert!(!sheet.kind(media).is_container());

        let rule = sheet.create_rule("a");
        sheet.append(media, rule);
        assert!(sheet.kind(media).is_container());
    }

    #[test]
    fn set_selectors_reuses_separator() {
        let (mut sheet, ids) = sheet_with_rules(&["a,\n  b"]);
        sheet.set_selectors(ids[0], &["x", "y"]);
        assert_eq!(sheet.selector(ids[0]), Some("x,\n  y"));

        let (mut sheet, ids) = sheet_with_rules(&["a"]);
        sheet.set_selectors(ids[0], &["x", "y"]);
        assert_eq!(sheet.selector(ids[0]), Some("x, y"));
    }

    #[test]
    fn ancestors_end_at_root() {
        let (mut sheet, ids) = sheet_with_rules(&["a"]);
        let media = sheet.create_at_rule("media", "print");
        let inner = sheet.create_rule("b");
        sheet.append(media, inner);
        sheet.append(ids[0], media);

        let chain: Vec<_> = sheet.ancestors(inner).collect();
        assert_eq!(chain, vec![media, ids[0], sheet.root()]);
    }
}
