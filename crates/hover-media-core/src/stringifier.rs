//! Serialization of a [`Stylesheet`] back to CSS text.
//!
//! Every node prints its own raws when it has them. Missing raws (nodes
//! created programmatically) are inferred from the first node elsewhere in
//! the document that has one, falling back to a fixed default style. An
//! unmodified parsed stylesheet therefore round-trips byte-for-byte, and
//! inserted nodes pick up the formatting of their surroundings.

use std::collections::HashMap;

use crate::node::{NodeId, NodeKind, NodeType, Raws};
use crate::stylesheet::Stylesheet;

/// A raw value that can be inferred from the rest of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Detect {
    Before,
    After,
    BeforeOpen,
    BeforeClose,
    BeforeRule,
    BeforeDecl,
    BeforeComment,
    EmptyBody,
    Colon,
    Indent,
    CommentLeft,
    CommentRight,
}

impl Detect {
    fn default_value(self) -> &'static str {
        match self {
            Detect::Before | Detect::After => "",
            Detect::BeforeOpen => " ",
            Detect::BeforeClose | Detect::BeforeRule => "\n",
            Detect::BeforeDecl | Detect::BeforeComment => "\n",
            Detect::EmptyBody => "",
            Detect::Colon => ": ",
            Detect::Indent => "    ",
            Detect::CommentLeft | Detect::CommentRight => " ",
        }
    }
}

impl Stylesheet {
    /// Serialize the whole stylesheet.
    pub fn to_css(&self) -> String {
        self.node_to_css(self.root)
    }

    /// Serialize a single node and its subtree.
    ///
    /// Inferred raws are looked up in the tree the node belongs to.
    pub fn node_to_css(&self, id: NodeId) -> String {
        let root = self.ancestors(id).last().unwrap_or(id);
        let mut stringifier = Stringifier {
            sheet: self,
            root,
            cache: HashMap::new(),
            semicolon: None,
            out: String::new(),
        };
        stringifier.stringify(id, false);
        stringifier.out
    }
}

struct Stringifier<'a> {
    sheet: &'a Stylesheet,
    /// Topmost ancestor of the node being printed; inference looks here.
    root: NodeId,
    cache: HashMap<Detect, String>,
    semicolon: Option<bool>,
    out: String,
}

impl Stringifier<'_> {
    fn stringify(&mut self, id: NodeId, semicolon: bool) {
        match self.sheet.kind(id) {
            NodeKind::Root => {
                self.body(id);
                if let Some(after) = &self.sheet.raws(id).after {
                    self.out.push_str(after);
                }
            }
            NodeKind::AtRule(_) => self.at_rule(id, semicolon),
            NodeKind::Rule(_) => self.rule(id),
            NodeKind::Declaration(_) => self.declaration(id, semicolon),
            NodeKind::Comment(_) => self.comment(id),
        }
    }

    fn body(&mut self, id: NodeId) {
        let sheet = self.sheet;
        let children = sheet.children(id);
        let last = children
            .iter()
            .rposition(|&child| sheet.node_type(child) != NodeType::Comment)
            .unwrap_or(0);
        let semicolon = self.container_semicolon(id);

        for (i, &child) in children.iter().enumerate() {
            let before = self.raw(child, sheet.raws(child).before.as_deref(), Detect::Before);
            self.out.push_str(&before);
            self.stringify(child, last != i || semicolon);
        }
    }

    fn block(&mut self, id: NodeId, start: &str) {
        let sheet = self.sheet;
        let raws = sheet.raws(id);
        let between = self.raw(id, raws.between.as_deref(), Detect::BeforeOpen);
        self.out.push_str(start);
        self.out.push_str(&between);
        self.out.push('{');

        let after = if sheet.children(id).is_empty() {
            self.raw(id, raws.after.as_deref(), Detect::EmptyBody)
        } else {
            self.body(id);
            self.raw(id, raws.after.as_deref(), Detect::After)
        };
        self.out.push_str(&after);
        self.out.push('}');
    }

    fn at_rule(&mut self, id: NodeId, semicolon: bool) {
        let sheet = self.sheet;
        let Some(at_rule) = sheet.at_rule(id) else {
            return;
        };
        let raws = sheet.raws(id);

        let mut start = format!("@{}", at_rule.name);
        match &raws.after_name {
            Some(after_name) => start.push_str(after_name),
            None if !at_rule.params.is_empty() => start.push(' '),
            None => {}
        }
        start.push_str(&at_rule.params);

        if at_rule.has_block {
            self.block(id, &start);
        } else {
            self.out.push_str(&start);
            if let Some(between) = &raws.between {
                self.out.push_str(between);
            }
            if semicolon {
                self.out.push(';');
            }
        }
    }

    fn rule(&mut self, id: NodeId) {
        let sheet = self.sheet;
        let selector = sheet.selector(id).unwrap_or_default();
        self.block(id, selector);
        if let Some(own_semicolon) = &sheet.raws(id).own_semicolon {
            self.out.push_str(own_semicolon);
        }
    }

    fn declaration(&mut self, id: NodeId, semicolon: bool) {
        let sheet = self.sheet;
        let Some(decl) = sheet.declaration(id) else {
            return;
        };
        let raws = sheet.raws(id);
        let between = self.raw(id, raws.between.as_deref(), Detect::Colon);

        self.out.push_str(&decl.prop);
        self.out.push_str(&between);
        match &raws.value {
            Some(raw) if raw.value == decl.value => self.out.push_str(&raw.raw),
            _ => self.out.push_str(&decl.value),
        }
        if decl.important {
            self.out
                .push_str(raws.important.as_deref().unwrap_or(" !important"));
        }
        if semicolon {
            self.out.push(';');
        }
    }

    fn comment(&mut self, id: NodeId) {
        let sheet = self.sheet;
        let text = sheet.comment(id).map(|c| c.text.as_str()).unwrap_or_default();
        let raws = sheet.raws(id);
        let left = self.raw(id, raws.left.as_deref(), Detect::CommentLeft);
        let right = self.raw(id, raws.right.as_deref(), Detect::CommentRight);

        self.out.push_str("/*");
        self.out.push_str(&left);
        self.out.push_str(text);
        self.out.push_str(&right);
        self.out.push_str("*/");
    }

    // =========================================================================
    // Raw inference
    // =========================================================================

    /// The node's own raw if present, otherwise an inferred one.
    fn raw(&mut self, id: NodeId, own: Option<&str>, detect: Detect) -> String {
        if let Some(own) = own {
            return own.to_string();
        }

        let parent = self.sheet.parent(id);
        if detect == Detect::Before {
            match parent {
                None => return String::new(),
                Some(parent)
                    if self.sheet.node_type(parent) == NodeType::Root
                        && self.sheet.first(parent) == Some(id) =>
                {
                    return String::new();
                }
                Some(_) => {}
            }
        }
        if parent.is_none() {
            return detect.default_value().to_string();
        }
        if matches!(detect, Detect::Before | Detect::After) {
            return self.before_after(id, detect);
        }
        self.detect(id, detect)
    }

    /// Document-wide inference for `detect`, cached per stringification.
    fn detect(&mut self, id: NodeId, detect: Detect) -> String {
        if let Some(value) = self.cache.get(&detect) {
            return value.clone();
        }
        let value = match detect {
            Detect::BeforeOpen => self.raw_before_open(),
            Detect::BeforeClose => self.raw_before_close(),
            Detect::BeforeRule => self.raw_before_rule(),
            Detect::BeforeDecl => Some(self.raw_before_decl(id)),
            Detect::BeforeComment => Some(self.raw_before_comment(id)),
            Detect::EmptyBody => self.raw_empty_body(),
            Detect::Colon => self.raw_colon(),
            Detect::Indent => self.raw_indent(),
            Detect::CommentLeft => self.first_raw(|raws| raws.left.as_deref()),
            Detect::CommentRight => self.first_raw(|raws| raws.right.as_deref()),
            Detect::Before | Detect::After => None,
        }
        .unwrap_or_else(|| detect.default_value().to_string());
        self.cache.insert(detect, value.clone());
        value
    }

    fn before_after(&mut self, id: NodeId, detect: Detect) -> String {
        let mut value = match (self.sheet.node_type(id), detect) {
            (NodeType::Declaration, _) => self.detect(id, Detect::BeforeDecl),
            (NodeType::Comment, _) => self.detect(id, Detect::BeforeComment),
            (_, Detect::Before) => self.detect(id, Detect::BeforeRule),
            _ => self.detect(id, Detect::BeforeClose),
        };

        let depth = self
            .sheet
            .ancestors(id)
            .filter(|&ancestor| self.sheet.node_type(ancestor) != NodeType::Root)
            .count();
        if value.contains('\n') {
            let indent = self.detect(id, Detect::Indent);
            for _ in 0..depth {
                value.push_str(&indent);
            }
        }
        value
    }

    /// Whether the last child of `id` is followed by `;`.
    fn container_semicolon(&mut self, id: NodeId) -> bool {
        if let Some(semicolon) = self.sheet.raws(id).semicolon {
            return semicolon;
        }
        if self.sheet.parent(id).is_none() {
            return false;
        }
        if let Some(semicolon) = self.semicolon {
            return semicolon;
        }
        let sheet = self.sheet;
        let inferred = sheet
            .descendants(self.root)
            .into_iter()
            .filter(|&node| {
                sheet
                    .last(node)
                    .is_some_and(|last| sheet.node_type(last) == NodeType::Declaration)
            })
            .find_map(|node| sheet.raws(node).semicolon)
            .unwrap_or(false);
        self.semicolon = Some(inferred);
        inferred
    }

    fn first_raw(&self, get: impl Fn(&Raws) -> Option<&str>) -> Option<String> {
        self.sheet
            .descendants(self.root)
            .into_iter()
            .find_map(|node| get(self.sheet.raws(node)))
            .map(str::to_string)
    }

    fn raw_before_open(&self) -> Option<String> {
        let sheet = self.sheet;
        sheet
            .descendants(self.root)
            .into_iter()
            .filter(|&node| sheet.node_type(node) != NodeType::Declaration)
            .find_map(|node| sheet.raws(node).between.clone())
    }

    fn raw_before_close(&self) -> Option<String> {
        let sheet = self.sheet;
        sheet
            .descendants(self.root)
            .into_iter()
            .filter(|&node| !sheet.children(node).is_empty())
            .find_map(|node| sheet.raws(node).after.as_deref())
            .map(|after| whitespace(trim_last_line(after)))
    }

    fn raw_empty_body(&self) -> Option<String> {
        let sheet = self.sheet;
        sheet
            .descendants(self.root)
            .into_iter()
            .filter(|&node| sheet.kind(node).is_container() && sheet.children(node).is_empty())
            .find_map(|node| sheet.raws(node).after.clone())
    }

    fn raw_before_rule(&self) -> Option<String> {
        let sheet = self.sheet;
        let first = sheet.first(self.root);
        sheet
            .descendants(self.root)
            .into_iter()
            .filter(|&node| sheet.kind(node).is_container() && Some(node) != first)
            .find_map(|node| sheet.raws(node).before.as_deref())
            .map(|before| whitespace(trim_last_line(before)))
    }

    fn raw_before_decl(&mut self, id: NodeId) -> String {
        match self.first_before_of(NodeType::Declaration) {
            Some(before) => whitespace(&before),
            None => self.detect(id, Detect::BeforeRule),
        }
    }

    fn raw_before_comment(&mut self, id: NodeId) -> String {
        match self.first_before_of(NodeType::Comment) {
            Some(before) => whitespace(&before),
            None => self.detect(id, Detect::BeforeDecl),
        }
    }

    fn first_before_of(&self, node_type: NodeType) -> Option<String> {
        let sheet = self.sheet;
        sheet
            .descendants(self.root)
            .into_iter()
            .filter(|&node| sheet.node_type(node) == node_type)
            .find_map(|node| sheet.raws(node).before.as_deref())
            .map(|before| trim_last_line(before).to_string())
    }

    fn raw_colon(&self) -> Option<String> {
        let sheet = self.sheet;
        sheet
            .descendants(self.root)
            .into_iter()
            .filter(|&node| sheet.node_type(node) == NodeType::Declaration)
            .find_map(|node| sheet.raws(node).between.as_deref())
            .map(|between| {
                between
                    .chars()
                    .filter(|&c| c == ':' || c.is_whitespace())
                    .collect()
            })
    }

    fn raw_indent(&self) -> Option<String> {
        let sheet = self.sheet;
        if let Some(indent) = &sheet.raws(self.root).indent
            && !indent.is_empty()
        {
            return Some(indent.clone());
        }
        sheet
            .descendants(self.root)
            .into_iter()
            .filter(|&node| {
                sheet.parent(node).is_some_and(|parent| {
                    parent != self.root && sheet.parent(parent) == Some(self.root)
                })
            })
            .find_map(|node| sheet.raws(node).before.as_deref())
            .map(|before| whitespace(before.rsplit('\n').next().unwrap_or_default()))
    }
}

/// Drop everything after the last newline, if there is one.
fn trim_last_line(value: &str) -> &str {
    match value.rfind('\n') {
        Some(index) => &value[..=index],
        None => value,
    }
}

fn whitespace(value: &str) -> String {
    value.chars().filter(|c| c.is_whitespace()).collect()
}
