//! Error types for selector parsing.

/// Result type alias for selector operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while parsing a selector list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The selector text is not a valid selector list.
    ///
    /// `line` and `column` are 1-based and relative to the selector text.
    #[error("Invalid selector '{selector}' at line {line}, column {column}: {message}")]
    InvalidSelector {
        selector: String,
        message: String,
        line: u32,
        column: u32,
    },
}

impl Error {
    /// Create a selector error.
    pub fn invalid_selector(
        selector: impl Into<String>,
        message: impl Into<String>,
        line: u32,
        column: u32,
    ) -> Self {
        Self::InvalidSelector {
            selector: selector.into(),
            message: message.into(),
            line,
            column,
        }
    }
}
