//! Live depth-first traversal of a [`Stylesheet`].
//!
//! The walker visits nodes in document order, parents before children, and
//! tolerates the visitor mutating the tree while it runs:
//!
//! - a node inserted right after the current one is visited next;
//! - nodes inserted before the current one, or removed, shift the cursor so
//!   no sibling is skipped or visited twice;
//! - a removed node's subtree is not descended into.
//!
//! Nodes inserted behind the cursor (for example a replacement put in place
//! of the current node) are picked up by a follow-up pass: the walk repeats
//! until a full pass finds no node that has not been visited yet.

use crate::logging::targets;
use crate::node::{NodeId, NodeType};
use crate::stylesheet::{Cursor, Stylesheet};

/// Per-node-kind callbacks driven by [`Stylesheet::walk`].
///
/// Every method defaults to doing nothing.
pub trait Visitor {
    /// Error that aborts the walk.
    type Error;

    fn visit_rule(&mut self, sheet: &mut Stylesheet, rule: NodeId) -> Result<(), Self::Error> {
        let _ = (sheet, rule);
        Ok(())
    }

    fn visit_at_rule(
        &mut self,
        sheet: &mut Stylesheet,
        at_rule: NodeId,
    ) -> Result<(), Self::Error> {
        let _ = (sheet, at_rule);
        Ok(())
    }

    fn visit_declaration(
        &mut self,
        sheet: &mut Stylesheet,
        declaration: NodeId,
    ) -> Result<(), Self::Error> {
        let _ = (sheet, declaration);
        Ok(())
    }
}

impl Stylesheet {
    /// Walk the whole tree with `visitor`.
    ///
    /// Every live node is visited once per call. Stops at the first error
    /// the visitor returns.
    pub fn walk<V: Visitor>(&mut self, visitor: &mut V) -> Result<(), V::Error> {
        for data in self.nodes.values_mut() {
            data.visited = false;
        }
        let root = self.root;
        let mut pass = 0usize;
        loop {
            pass += 1;
            let result = self.walk_container(root, visitor);
            self.cursors.clear();
            let visited = result?;
            tracing::trace!(target: targets::WALK, pass, visited, "walk pass finished");
            if visited == 0 {
                return Ok(());
            }
        }
    }

    /// Visit the children of `container`; returns how many nodes were
    /// dispatched to the visitor.
    fn walk_container<V: Visitor>(
        &mut self,
        container: NodeId,
        visitor: &mut V,
    ) -> Result<usize, V::Error> {
        self.cursors.push(Cursor { container, next: 0 });
        let slot = self.cursors.len() - 1;
        let mut visited = 0;

        let result = loop {
            let next = self.cursors[slot].next;
            let Some(child) = self
                .nodes
                .get(container)
                .and_then(|data| data.children.get(next).copied())
            else {
                break Ok(visited);
            };
            self.cursors[slot].next += 1;

            if !self.nodes[child].visited {
                self.nodes[child].visited = true;
                visited += 1;
                if let Err(err) = self.dispatch(child, visitor) {
                    break Err(err);
                }
            }

            let still_attached = self
                .nodes
                .get(child)
                .is_some_and(|data| data.parent == Some(container) && !data.children.is_empty());
            if still_attached {
                match self.walk_container(child, visitor) {
                    Ok(count) => visited += count,
                    Err(err) => break Err(err),
                }
            }
        };

        self.cursors.truncate(slot);
        result
    }

    fn dispatch<V: Visitor>(&mut self, id: NodeId, visitor: &mut V) -> Result<(), V::Error> {
        match self.nodes[id].kind.node_type() {
            NodeType::Rule => visitor.visit_rule(self, id),
            NodeType::AtRule => visitor.visit_at_rule(self, id),
            NodeType::Declaration => visitor.visit_declaration(self, id),
            NodeType::Root | NodeType::Comment => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse, ParseOptions};

    #[derive(Default)]
    struct Recorder {
        seen: Vec<String>,
    }

    impl Visitor for Recorder {
        type Error = ();

        fn visit_rule(&mut self, sheet: &mut Stylesheet, rule: NodeId) -> Result<(), ()> {
            self.seen
                .push(format!("rule {}", sheet.selector(rule).unwrap_or_default()));
            Ok(())
        }

        fn visit_at_rule(&mut self, sheet: &mut Stylesheet, at_rule: NodeId) -> Result<(), ()> {
            let name = sheet.at_rule(at_rule).map(|a| a.name.clone()).unwrap_or_default();
            self.seen.push(format!("@{name}"));
            Ok(())
        }

        fn visit_declaration(&mut self, sheet: &mut Stylesheet, decl: NodeId) -> Result<(), ()> {
            let prop = sheet.declaration(decl).map(|d| d.prop.clone()).unwrap_or_default();
            self.seen.push(format!("decl {prop}"));
            Ok(())
        }
    }

    #[test]
    fn visits_in_document_order() {
        let mut sheet =
            parse("a { color: red } @media print { b { top: 0 } } c {}", &ParseOptions::default())
                .unwrap();
        let mut recorder = Recorder::default();
        sheet.walk(&mut recorder).unwrap();

        assert_eq!(
            recorder.seen,
            vec!["rule a", "decl color", "@media", "rule b", "decl top", "rule c"]
        );
    }

    /// Inserts a copy after every rule named `a` and removes the original.
    struct MoveAfter {
        seen: Vec<String>,
    }

    impl Visitor for MoveAfter {
        type Error = ();

        fn visit_rule(&mut self, sheet: &mut Stylesheet, rule: NodeId) -> Result<(), ()> {
            let selector = sheet.selector(rule).unwrap_or_default().to_string();
            self.seen.push(selector.clone());
            if selector == "a" {
                let copy = sheet.clone_node(rule);
                sheet.set_selector(copy, "moved");
                sheet.insert_after(rule, copy);
                sheet.remove(rule);
            }
            Ok(())
        }
    }

    #[test]
    fn inserted_sibling_is_visited_next() {
        let mut sheet = parse("a {} b {}", &ParseOptions::default()).unwrap();
        let mut visitor = MoveAfter { seen: vec![] };
        sheet.walk(&mut visitor).unwrap();

        assert_eq!(visitor.seen, vec!["a", "moved", "b"]);
    }

    /// Replaces every rule named `a` with a rule named `replaced`.
    struct Replace {
        seen: Vec<String>,
    }

    impl Visitor for Replace {
        type Error = ();

        fn visit_rule(&mut self, sheet: &mut Stylesheet, rule: NodeId) -> Result<(), ()> {
            let selector = sheet.selector(rule).unwrap_or_default().to_string();
            self.seen.push(selector.clone());
            if selector == "a" {
                let copy = sheet.clone_node(rule);
                sheet.set_selector(copy, "replaced");
                sheet.replace_with(rule, copy);
            }
            Ok(())
        }
    }

    #[test]
    fn replacement_is_visited_by_follow_up_pass() {
        let mut sheet = parse("a {} b {}", &ParseOptions::default()).unwrap();
        let mut visitor = Replace { seen: vec![] };
        sheet.walk(&mut visitor).unwrap();

        assert_eq!(visitor.seen, vec!["a", "b", "replaced"]);
    }

    #[test]
    fn each_walk_visits_every_node() {
        let mut sheet = parse("a {} b {} c {}", &ParseOptions::default()).unwrap();

        let mut first = Recorder::default();
        sheet.walk(&mut first).unwrap();
        let mut second = Recorder::default();
        sheet.walk(&mut second).unwrap();

        assert_eq!(first.seen, vec!["rule a", "rule b", "rule c"]);
        assert_eq!(second.seen, first.seen);
    }

    struct FailOn(&'static str);

    impl Visitor for FailOn {
        type Error = String;

        fn visit_rule(&mut self, sheet: &mut Stylesheet, rule: NodeId) -> Result<(), String> {
            match sheet.selector(rule) {
                Some(selector) if selector == self.0 => Err(format!("failed on {selector}")),
                _ => Ok(()),
            }
        }
    }

    #[test]
    fn visitor_error_stops_walk() {
        let mut sheet = parse("a {} b {} c {}", &ParseOptions::default()).unwrap();
        let err = sheet.walk(&mut FailOn("b")).unwrap_err();
        assert_eq!(err, "failed on b");
        assert!(sheet.cursors.is_empty());
    }
}
