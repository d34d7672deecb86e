//! Stylesheet tree for hover-media.
//!
//! This crate provides the document model the hover-media transform works on:
//!
//! - **Tree**: An arena-backed [`Stylesheet`] of rules, at-rules,
//!   declarations and comments with stable [`NodeId`] handles
//! - **Parsing**: A lossless parser that records every piece of formatting
//! - **Stringifying**: Output that reproduces untouched input byte-for-byte
//!   and infers formatting for inserted nodes
//! - **Walking**: A depth-first [`Visitor`] traversal that tolerates
//!   mutation of the tree while it runs
//!
//! # Example
//!
//! ```
//! use hover_media_core::{parse, ParseOptions};
//!
//! let mut sheet = parse(".a:hover { color: red }", &ParseOptions::default())?;
//! let rule = sheet.children(sheet.root())[0];
//!
//! let media = sheet.create_at_rule("media", "print");
//! sheet.insert_after(rule, media);
//! let copy = sheet.clone_node(rule);
//! sheet.append(media, copy);
//! sheet.remove(rule);
//!
//! assert_eq!(sheet.to_css(), "@media print {.a:hover { color: red } }");
//! # Ok::<(), hover_media_core::Error>(())
//! ```

mod error;
pub mod logging;
mod node;
mod parser;
mod stringifier;
mod stylesheet;
mod walk;

pub use error::{Error, Result};
pub use logging::{TreeDebug, TreeFormatOptions, TreeStyle};
pub use node::{
    AtRule, Comment, Declaration, NodeId, NodeKind, NodeType, Position, RawValue, Raws, Rule,
    Source,
};
pub use parser::{parse, ParseOptions};
pub use stylesheet::{Ancestors, Stylesheet};
pub use walk::Visitor;

/// Prelude module with commonly used types.
pub mod prelude {
    pub use crate::node::{NodeId, NodeKind, NodeType};
    pub use crate::parser::{parse, ParseOptions};
    pub use crate::stylesheet::Stylesheet;
    pub use crate::walk::Visitor;
}
