//! Logging and debugging facilities for stylesheet trees.
//!
//! This module provides:
//! - Target names for filtering the `tracing` output of each subsystem
//! - [`TreeDebug`], a human-readable dump of a [`Stylesheet`]
//!
//! # Tracing Integration
//!
//! The crates emit `tracing` events but never install a subscriber. To see
//! them, install one in the application or test:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("hover_media=debug,hover_media_core::tree=trace")
//!     .init();
//! ```

use std::fmt::{self, Write as FmtWrite};

use crate::node::{NodeId, NodeKind};
use crate::stylesheet::Stylesheet;

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Stylesheet parser target.
    pub const PARSER: &str = "hover_media_core::parser";
    /// Tree construction and mutation target.
    pub const TREE: &str = "hover_media_core::tree";
    /// Tree traversal target.
    pub const WALK: &str = "hover_media_core::walk";
}

/// Style options for tree visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeStyle {
    /// ASCII characters for tree branches.
    Ascii,
    /// Unicode box-drawing characters.
    #[default]
    Unicode,
}

/// Configuration for [`TreeDebug`] output.
#[derive(Debug, Clone)]
pub struct TreeFormatOptions {
    /// The style of tree visualization.
    pub style: TreeStyle,
    /// Whether to show node ids.
    pub show_ids: bool,
    /// Whether to show source positions.
    pub show_sources: bool,
    /// Maximum depth to traverse (None for unlimited).
    pub max_depth: Option<usize>,
}

impl Default for TreeFormatOptions {
    fn default() -> Self {
        Self {
            style: TreeStyle::default(),
            show_ids: false,
            show_sources: true,
            max_depth: None,
        }
    }
}

impl TreeFormatOptions {
    /// Options for detailed debugging output.
    pub fn detailed() -> Self {
        Self {
            show_ids: true,
            ..Default::default()
        }
    }

    /// Options for minimal output: node labels only.
    pub fn minimal() -> Self {
        Self {
            style: TreeStyle::Ascii,
            show_ids: false,
            show_sources: false,
            max_depth: None,
        }
    }
}

/// Debug utility for visualizing a stylesheet tree.
///
/// ```ignore
/// let debug = TreeDebug::new(&sheet);
/// tracing::trace!("{debug}");
/// ```
#[derive(Debug, Clone)]
pub struct TreeDebug<'a> {
    sheet: &'a Stylesheet,
    options: TreeFormatOptions,
}

impl<'a> TreeDebug<'a> {
    /// Create a visualizer with default options.
    pub fn new(sheet: &'a Stylesheet) -> Self {
        Self {
            sheet,
            options: TreeFormatOptions::default(),
        }
    }

    /// Create a visualizer with custom options.
    pub fn with_options(sheet: &'a Stylesheet, options: TreeFormatOptions) -> Self {
        Self { sheet, options }
    }

    /// Format the whole tree.
    pub fn format_tree(&self) -> String {
        self.format_subtree(self.sheet.root())
    }

    /// Format the subtree rooted at `id`.
    pub fn format_subtree(&self, id: NodeId) -> String {
        let mut output = String::new();
        self.format_into(id, &mut Vec::new(), &mut output);
        output
    }

    /// `last_flags` holds, per level below the subtree root, whether the
    /// node on the path at that level is the last of its siblings.
    fn format_into(&self, id: NodeId, last_flags: &mut Vec<bool>, output: &mut String) {
        if self.options.max_depth.is_some_and(|max| last_flags.len() > max) {
            return;
        }

        output.push_str(&self.build_prefix(last_flags));
        output.push_str(&label(self.sheet.kind(id)));

        if self.options.show_ids {
            let _ = write!(output, " [{id:?}]");
        }
        if self.options.show_sources
            && let Some(source) = self.sheet.source(id)
        {
            let _ = write!(output, " @{}", source.start);
        }
        output.push('\n');

        let children = self.sheet.children(id);
        for (i, &child) in children.iter().enumerate() {
            last_flags.push(i == children.len() - 1);
            self.format_into(child, last_flags, output);
            last_flags.pop();
        }
    }

    fn build_prefix(&self, last_flags: &[bool]) -> String {
        let Some((&is_last, ancestors)) = last_flags.split_last() else {
            return String::new();
        };

        let (branch, corner, end) = match self.options.style {
            TreeStyle::Ascii => ("|", "+--", "`--"),
            TreeStyle::Unicode => ("\u{2502}", "\u{251c}\u{2500}\u{2500}", "\u{2514}\u{2500}\u{2500}"),
        };

        let mut prefix = String::new();
        for &closed in ancestors {
            prefix.push_str(if closed { " " } else { branch });
            prefix.push_str("  ");
        }
        prefix.push_str(if is_last { end } else { corner });
        prefix.push(' ');
        prefix
    }
}

impl fmt::Display for TreeDebug<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_tree())
    }
}

fn label(kind: &NodeKind) -> String {
    match kind {
        NodeKind::Root => "root".to_string(),
        NodeKind::AtRule(at_rule) if at_rule.params.is_empty() => format!("@{}", at_rule.name),
        NodeKind::AtRule(at_rule) => format!("@{} {}", at_rule.name, at_rule.params),
        NodeKind::Rule(rule) => format!("rule {}", rule.selector),
        NodeKind::Declaration(decl) if decl.important => {
            format!("decl {}: {} !important", decl.prop, decl.value)
        }
        NodeKind::Declaration(decl) => format!("decl {}: {}", decl.prop, decl.value),
        NodeKind::Comment(comment) => format!("comment {}", comment.text),
    }
}
