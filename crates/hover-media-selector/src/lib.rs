//! Selector parsing for hover-media.
//!
//! This crate parses CSS selector lists into a small AST. It is strict
//! rather than lossless: comments and formatting whitespace are dropped, and
//! rendering a parsed selector gives a normalized form (`.a > .b` renders as
//! `.a>.b`). Functional pseudos that take selectors (`:is`, `:not`,
//! `:where`, ...) are parsed recursively.
//!
//! # Example
//!
//! ```
//! use hover_media_selector::parse;
//!
//! let list = parse(".nav :is(a, button):hover")?;
//! let selector = &list.selectors[0];
//!
//! let mut pseudos = Vec::new();
//! selector.walk_pseudo_classes(&mut |name, enclosing| {
//!     pseudos.push((name.to_string(), enclosing.len()));
//! });
//! assert_eq!(pseudos, vec![("is".to_string(), 0), ("hover".to_string(), 0)]);
//! assert_eq!(selector.to_string(), ".nav :is(a,button):hover");
//! # Ok::<(), hover_media_selector::Error>(())
//! ```

mod error;
pub mod parser;
pub mod types;

pub use error::{Error, Result};
pub use parser::{parse, SELECTOR_PSEUDOS};
pub use types::{
    AttributeOperator, AttributeSelector, Combinator, Component, Pseudo, PseudoArgument, Selector,
    SelectorList,
};
