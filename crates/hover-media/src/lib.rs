//! Wrap `:hover` rules in a hover feature query.
//!
//! On touch devices a tap triggers `:hover` and the style sticks until the
//! user taps elsewhere. This crate rewrites stylesheets so hover styles only
//! apply where the primary pointer can really hover:
//!
//! - **Rewrite**: selectors carrying a `:hover` move into an
//!   `@media (hover: hover) and (pointer: fine)` block placed right after
//!   their rule; the other selectors stay where they were
//! - **Exclusions**: `:hover` inside `:not(...)` and a bare `:hover` are
//!   left alone
//! - **Idempotence**: rules already inside the feature query are skipped
//! - **Upgrade**: `@media (hover: hover)` blocks get the full query
//!
//! # Example
//!
//! ```
//! use hover_media::{Processor, ProcessOptions};
//!
//! let css = Processor::new().process(
//!     ".link:hover, .link:focus { text-decoration: underline; }",
//!     &ProcessOptions::default(),
//! )?;
//! assert_eq!(
//!     css,
//!     ".link:focus { text-decoration: underline; }\
//!      @media (hover: hover) and (pointer: fine) {.link:hover { text-decoration: underline; } }"
//! );
//! # Ok::<(), hover_media::Error>(())
//! ```

pub mod classify;
mod error;
pub mod logging;
pub mod media;
pub mod mutate;
pub mod partition;
mod plugin;
mod processor;

pub use classify::{classify, Classification};
pub use error::{Error, Result};
pub use media::{LEGACY_MEDIA_PARAMS, MEDIA_PARAMS};
pub use partition::Partition;
pub use plugin::HoverMediaFix;
pub use processor::{process, ProcessOptions, Processor};

/// Prelude module with commonly used types.
pub mod prelude {
    pub use crate::plugin::HoverMediaFix;
    pub use crate::processor::{process, ProcessOptions, Processor};
    pub use hover_media_core::{parse, ParseOptions, Stylesheet, Visitor};
}
