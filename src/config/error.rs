//! Error types and result aliases.
//!
//! Defines the core `CaptchaError` enumeration and common `Result` type.

use thiserror::Error;

/// Challenge construction and rendering errors.
#[derive(Debug, Error)]
pub enum CaptchaError {
    /// Selection bounds cannot satisfy the requested distinct picks.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Font asset missing, unreadable or unparseable.
    #[error("font error: {0}")]
    Font(String),

    /// Background, clef or cell image could not be loaded.
    #[error("failed to load image {path}: {source}")]
    Image {
        path: String,
        #[source]
        source: image::ImageError,
    },

    /// PNG encoding failed.
    #[error("image encode failed: {0}")]
    Encode(#[source] image::ImageError),

    /// Notation table has no entry for a music code.
    #[error("unknown note code: {0}")]
    UnknownNote(String),

    /// Output could not be written.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Catalog file could not be read or parsed.
    #[error("catalog error: {0}")]
    Catalog(String),
}

impl CaptchaError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

/// Result type alias for `CaptchaError`.
pub type Result<T> = std::result::Result<T, CaptchaError>;
