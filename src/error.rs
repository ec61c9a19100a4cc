//! Error types for medex.

use thiserror::Error;

/// Result type for medex operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for medex operations.
///
/// Per-line and per-field problems (bad JSON on one line, a record without
/// an identifier, an unparseable numeric value) are handled locally by the
/// loaders and the normalizer and surface as diagnostics counters and log
/// lines, not as errors. Only failures that stop an operation outright
/// reach callers through this type.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A record source is structurally unreadable.
    #[error("Parse error: {0}")]
    Parse(String),

    /// A field name is not part of the schema.
    #[error("Unknown schema field: {0}")]
    UnknownField(String),

    /// Inference request failed.
    #[error("Inference failed: {0}")]
    Inference(String),

    /// Prompt template is missing or malformed.
    #[error("Template error: {0}")]
    Template(String),
}

impl Error {
    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Error::Parse(msg.into())
    }

    /// Create an unknown-field error.
    pub fn unknown_field(name: impl Into<String>) -> Self {
        Error::UnknownField(name.into())
    }

    /// Create an inference error.
    pub fn inference(msg: impl Into<String>) -> Self {
        Error::Inference(msg.into())
    }

    /// Create a template error.
    pub fn template(msg: impl Into<String>) -> Self {
        Error::Template(msg.into())
    }
}
