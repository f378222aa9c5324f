//! Error types for chatdown operations.

use thiserror::Error;

/// Errors that can occur while configuring or emitting an export.
///
/// Conversion and location never fail: missing structure degrades to plain
/// text and an empty page is an outcome, not an error.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid selector `{selector}`: {message}")]
    Selector { selector: String, message: String },

    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, Error>;
