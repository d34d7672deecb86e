//! Node types stored in a [`Stylesheet`](crate::Stylesheet).
//!
//! Every node lives in the stylesheet's arena and is addressed by a
//! [`NodeId`]. Nodes carry their kind-specific data ([`NodeKind`]), the
//! formatting captured by the parser ([`Raws`]) and, when they came from
//! source text, their location ([`Source`]).

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use slotmap::new_key_type;

new_key_type! {
    /// A stable handle to a node in a [`Stylesheet`](crate::Stylesheet).
    ///
    /// Ids stay valid while the tree is rearranged and become invalid once the
    /// node (or one of its ancestors) is removed.
    pub struct NodeId;
}

/// The discriminant of a [`NodeKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    /// The document root.
    Root,
    /// An at-rule such as `@media` or `@import`.
    AtRule,
    /// A qualified rule: selector list plus block.
    Rule,
    /// A `prop: value` declaration.
    Declaration,
    /// A `/* ... */` comment.
    Comment,
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeType::Root => write!(f, "root"),
            NodeType::AtRule => write!(f, "atrule"),
            NodeType::Rule => write!(f, "rule"),
            NodeType::Declaration => write!(f, "decl"),
            NodeType::Comment => write!(f, "comment"),
        }
    }
}

/// Kind-specific node data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Root,
    AtRule(AtRule),
    Rule(Rule),
    Declaration(Declaration),
    Comment(Comment),
}

impl NodeKind {
    /// Get the node type.
    pub fn node_type(&self) -> NodeType {
        match self {
            NodeKind::Root => NodeType::Root,
            NodeKind::AtRule(_) => NodeType::AtRule,
            NodeKind::Rule(_) => NodeType::Rule,
            NodeKind::Declaration(_) => NodeType::Declaration,
            NodeKind::Comment(_) => NodeType::Comment,
        }
    }

    /// Whether the node can hold children.
    ///
    /// At-rules only count as containers once they have a block.
    pub fn is_container(&self) -> bool {
        match self {
            NodeKind::Root | NodeKind::Rule(_) => true,
            NodeKind::AtRule(at_rule) => at_rule.has_block,
            NodeKind::Declaration(_) | NodeKind::Comment(_) => false,
        }
    }
}

/// A qualified rule (e.g. `.button:hover { ... }`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Rule {
    /// The selector list as written, without surrounding whitespace.
    pub selector: String,
}

/// An at-rule (e.g. `@media (hover: hover) { ... }`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AtRule {
    /// Name without the leading `@`.
    pub name: String,
    /// Prelude text without surrounding whitespace.
    pub params: String,
    /// Whether the at-rule has a `{}` block (as opposed to ending in `;`).
    pub has_block: bool,
}

/// A declaration (e.g. `color: red !important`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Declaration {
    pub prop: String,
    /// Value without `!important` and without trailing whitespace.
    pub value: String,
    pub important: bool,
}

/// A comment. `text` excludes the delimiters and surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Comment {
    pub text: String,
}

/// A cleaned value together with the exact source text it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawValue {
    pub value: String,
    pub raw: String,
}

/// Formatting captured from source text.
///
/// `None` means "not captured"; the stringifier then infers the value from
/// other nodes of the same document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Raws {
    /// Whitespace (and stray semicolons) before the node.
    pub before: Option<String>,
    /// Whitespace before the closing `}` of a container, or at end of input
    /// for the root.
    pub after: Option<String>,
    /// Rules and at-rules: text between the prelude and `{` (or `;`).
    /// Declarations: the colon plus surrounding whitespace.
    pub between: Option<String>,
    /// At-rules: whitespace between the name and the params.
    pub after_name: Option<String>,
    /// Containers: whether the last child is followed by `;`.
    pub semicolon: Option<bool>,
    /// Declarations: the `!important` text when it differs from ` !important`.
    pub important: Option<String>,
    /// Rules: a stray `;` (plus whitespace) written right after the block.
    pub own_semicolon: Option<String>,
    /// Comments: whitespace after `/*`.
    pub left: Option<String>,
    /// Comments: whitespace before `*/`.
    pub right: Option<String>,
    /// Declarations: the value as written, when it differs from the cleaned one.
    pub value: Option<RawValue>,
    /// Root: indentation unit used for inferred raws.
    pub indent: Option<String>,
}

/// A location in source text. Line and column are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: u32,
    pub column: u32,
    /// Byte offset into the source text.
    pub offset: usize,
}

impl Position {
    /// Create a new position.
    pub fn new(line: u32, column: u32, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Where a node came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub start: Position,
    /// Position just past the node's last character.
    pub end: Option<Position>,
    /// The input file name, when the stylesheet was read from a file.
    pub input: Option<Arc<Path>>,
}

impl Source {
    /// Create a source starting at `start` with no end or input yet.
    pub fn new(start: Position) -> Self {
        Self {
            start,
            end: None,
            input: None,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.input {
            Some(input) => write!(f, "{}:{}", input.display(), self.start),
            None => write!(f, "<input css>:{}", self.start),
        }
    }
}

/// Arena entry for a node.
#[derive(Debug, Clone)]
pub(crate) struct NodeData {
    pub(crate) kind: NodeKind,
    /// Non-owning back-reference; ownership flows through `children`.
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) raws: Raws,
    pub(crate) source: Option<Source>,
    /// Set once the current walk has dispatched this node to a visitor.
    pub(crate) visited: bool,
}

impl NodeData {
    pub(crate) fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            raws: Raws::default(),
            source: None,
            visited: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn at_rule_is_container_only_with_block() {
        let statement = NodeKind::AtRule(AtRule {
            name: "import".into(),
            params: "\"a.css\"".into(),
            has_block: false,
        });
        assert!(!statement.is_container());

        let block = NodeKind::AtRule(AtRule {
            name: "media".into(),
            params: "print".into(),
            has_block: true,
        });
        assert!(block.is_container());
        assert!(NodeKind::Rule(Rule::default()).is_container());
        assert!(!NodeKind::Comment(Comment::default()).is_container());
    }

    #[test]
    fn source_display() {
        let mut source = Source::new(Position::new(3, 7, 42));
        assert_eq!(source.to_string(), "<input css>:3:7");

        source.input = Some(Arc::from(Path::new("styles/app.css")));
        assert_eq!(source.to_string(), "styles/app.css:3:7");
    }

    #[test]
    fn node_type_display() {
        assert_eq!(NodeKind::Root.node_type().to_string(), "root");
        assert_eq!(
            NodeKind::Declaration(Declaration::default()).node_type().to_string(),
            "decl"
        );
    }
}
