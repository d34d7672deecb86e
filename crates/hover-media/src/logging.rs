//! Logging facilities for hover-media.
//!
//! Tree-level targets live in [`hover_media_core::logging::targets`].

/// Target names for log filtering.
pub mod targets {
    /// Rule rewrites and media-query upgrades.
    pub const PLUGIN: &str = "hover_media::plugin";
    /// Whole-stylesheet processing.
    pub const PROCESSOR: &str = "hover_media::processor";
}
