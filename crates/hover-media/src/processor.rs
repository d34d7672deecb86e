//! Whole-stylesheet processing: parse, rewrite, stringify.

use std::path::{Path, PathBuf};

use hover_media_core::{parse, ParseOptions};

use crate::logging::targets;
use crate::plugin::HoverMediaFix;
use crate::{Error, Result};

/// Options for [`Processor::process`].
#[derive(Debug, Clone, Default)]
pub struct ProcessOptions {
    /// File the CSS came from, recorded in node sources for diagnostics.
    pub from: Option<PathBuf>,
}

impl ProcessOptions {
    /// Set the input file name.
    pub fn with_from(mut self, from: impl Into<PathBuf>) -> Self {
        self.from = Some(from.into());
        self
    }
}

/// Runs [`HoverMediaFix`] over whole stylesheets.
#[derive(Debug, Clone, Copy, Default)]
pub struct Processor;

impl Processor {
    pub fn new() -> Self {
        Self
    }

    /// Rewrite the hover rules of `css` and return the new stylesheet text.
    ///
    /// # Errors
    ///
    /// Returns an error when the stylesheet cannot be parsed or when a rule
    /// mentioning `:hover` has an invalid selector.
    #[tracing::instrument(
        level = "debug",
        target = "hover_media::processor",
        skip_all,
        fields(from = ?options.from, bytes = css.len())
    )]
    pub fn process(&self, css: &str, options: &ProcessOptions) -> Result<String> {
        let parse_options = ParseOptions {
            from: options.from.clone(),
        };
        let mut sheet = parse(css, &parse_options)?;

        let mut plugin = HoverMediaFix::new();
        sheet.walk(&mut plugin)?;

        tracing::debug!(
            target: targets::PROCESSOR,
            rewritten = plugin.rewritten(),
            upgraded = plugin.upgraded(),
            "processed stylesheet"
        );
        Ok(sheet.to_css())
    }

    /// Read and process a stylesheet file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] when the file cannot be read, otherwise the
    /// same errors as [`Processor::process`].
    pub fn process_file(&self, path: impl AsRef<Path>) -> Result<String> {
        let path = path.as_ref();
        let css = std::fs::read_to_string(path).map_err(|source| Error::io(path, source))?;
        self.process(&css, &ProcessOptions::default().with_from(path))
    }
}

/// Process `css` with default options.
///
/// ```
/// let css = hover_media::process(".a:hover {}")?;
/// assert_eq!(css, "@media (hover: hover) and (pointer: fine) {.a:hover {}\n}");
/// # Ok::<(), hover_media::Error>(())
/// ```
pub fn process(css: &str) -> Result<String> {
    Processor::new().process(css, &ProcessOptions::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn process_rewrites_hover_rules() {
        let css = Processor::new()
            .process(".a:hover { color: red }", &ProcessOptions::default())
            .unwrap();
        assert_eq!(css, "@media (hover: hover) and (pointer: fine) {.a:hover { color: red } }");
    }

    #[test]
    fn syntax_error_is_reported() {
        let err = process("a { color: red } }").unwrap_err();
        assert!(matches!(err, Error::Stylesheet(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = Processor::new()
            .process_file("/definitely/not/here.css")
            .unwrap_err();
        match err {
            Error::Io { path, .. } => assert_eq!(path, PathBuf::from("/definitely/not/here.css")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
