//! Crate-level error type
//!
//! Per-line corpus failures live in [`CorpusError`] and are counted by the
//! batch drivers. [`Error`] wraps them together with the file, JSON and
//! configuration failures that end a command.
//!
//! ```rust,ignore
//! use xlink::error::{Error, XlinkErrorTrait};
//!
//! fn report(err: &Error) {
//!     if err.is_recoverable() {
//!         tracing::warn!(error = %err, category = err.category().description(), "Line skipped");
//!     } else {
//!         tracing::error!(error = %err, "Command aborted");
//!     }
//! }
//! ```

use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub use crate::corpus::error::{CorpusError, CorpusErrorKind};

/// Common trait for all xlink error types
pub trait XlinkErrorTrait: std::error::Error {
    /// Check if this error is recoverable (the batch can continue)
    fn is_recoverable(&self) -> bool;

    /// Get the error category for handling strategies
    fn category(&self) -> ErrorCategory;
}

/// Classification of errors for handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Line and annotation structure errors
    Parsing,
    /// Dictionary lookups that found nothing or too much
    Resolution,
    /// Storage and I/O errors
    Storage,
    /// Configuration and validation errors
    Config,
}

impl ErrorCategory {
    pub fn description(&self) -> &'static str {
        match self {
            Self::Parsing => "parsing error",
            Self::Resolution => "resolution error",
            Self::Storage => "storage error",
            Self::Config => "configuration error",
        }
    }
}

/// Unified error type for the xlink crate
#[derive(Error, Debug)]
pub enum Error {
    /// Corpus and dictionary processing errors
    #[error("Corpus error: {0}")]
    Corpus(#[from] CorpusError),

    /// File I/O errors
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// JSON table serialization/deserialization errors
    #[error("JSON error in {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// TOML configuration parse errors
    #[error("TOML error in {path:?}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),
}

impl XlinkErrorTrait for Error {
    fn is_recoverable(&self) -> bool {
        match self {
            Self::Corpus(e) => e.is_recoverable(),
            Self::Io { .. } | Self::Json { .. } | Self::Toml { .. } | Self::Config(_) => false,
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Corpus(e) => match e.kind() {
                CorpusErrorKind::MalformedLine | CorpusErrorKind::InvalidAnnotation => {
                    ErrorCategory::Parsing
                }
                CorpusErrorKind::UnresolvedReference | CorpusErrorKind::AmbiguousMention => {
                    ErrorCategory::Resolution
                }
                CorpusErrorKind::Io => ErrorCategory::Storage,
            },
            Self::Io { .. } => ErrorCategory::Storage,
            Self::Json { .. } => ErrorCategory::Parsing,
            Self::Toml { .. } | Self::Config(_) => ErrorCategory::Config,
        }
    }
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an I/O error for `path`
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a JSON error for `path`
    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;
