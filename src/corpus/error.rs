//! Error types for corpus processing
//!
//! Every per-line failure in the pipeline maps onto one of these variants.
//! Batch drivers match on the variant to decide which counter to bump; none
//! of the per-line variants abort a batch.

use std::io;
use std::path::PathBuf;
use std::string::FromUtf8Error;
use thiserror::Error;

/// Result type alias for corpus operations
pub type CorpusResult<T> = Result<T, CorpusError>;

/// Coarse classification used for batch counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CorpusErrorKind {
    MalformedLine,
    UnresolvedReference,
    AmbiguousMention,
    InvalidAnnotation,
    Io,
}

/// Errors raised while reading dictionaries and corpus files
#[derive(Error, Debug)]
pub enum CorpusError {
    /// Wrong number of `\t\t` separated fields
    #[error("malformed line: expected {expected} fields, found {found}")]
    MalformedLine { expected: usize, found: usize },

    /// Line bytes are not valid UTF-8
    #[error("malformed line: {0}")]
    InvalidEncoding(#[from] FromUtf8Error),

    /// Body has no `::;` marker separator
    #[error("malformed line: body marker '::;' not found")]
    MissingMarker,

    /// Bracket nesting or balance violated
    #[error("invalid annotation: brackets unbalanced or nested")]
    InvalidAnnotation,

    /// A span that must carry `id|mention` has no pipe
    #[error("malformed annotation '[[{body}]]': expected 'id|mention'")]
    MalformedAnnotation { body: String },

    /// Title, URI or mention not found in the dictionary
    #[error("unresolved reference: '{key}'")]
    UnresolvedReference { key: String },

    /// Mention maps to more than one entity
    #[error("ambiguous mention '{mention}': {candidates} candidates")]
    AmbiguousMention { mention: String, candidates: usize },

    /// Dictionary file could not be read
    #[error("failed to load entity dictionary {path:?}: {source}")]
    DictionaryLoad {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl CorpusError {
    /// Create a malformed-line error
    pub fn malformed(expected: usize, found: usize) -> Self {
        Self::MalformedLine { expected, found }
    }

    /// Create an unresolved-reference error
    pub fn unresolved(key: impl Into<String>) -> Self {
        Self::UnresolvedReference { key: key.into() }
    }

    /// Get the error kind for batch accounting
    pub fn kind(&self) -> CorpusErrorKind {
        match self {
            Self::MalformedLine { .. }
            | Self::InvalidEncoding(_)
            | Self::MissingMarker
            | Self::MalformedAnnotation { .. } => CorpusErrorKind::MalformedLine,
            Self::InvalidAnnotation => CorpusErrorKind::InvalidAnnotation,
            Self::UnresolvedReference { .. } => CorpusErrorKind::UnresolvedReference,
            Self::AmbiguousMention { .. } => CorpusErrorKind::AmbiguousMention,
            Self::DictionaryLoad { .. } | Self::Io(_) => CorpusErrorKind::Io,
        }
    }

    /// Per-line errors are recovered locally; only I/O is not
    pub fn is_recoverable(&self) -> bool {
        !matches!(self.kind(), CorpusErrorKind::Io)
    }

    /// Whether this outcome counts towards a batch's error lines
    pub fn counts_as_error(&self) -> bool {
        matches!(
            self.kind(),
            CorpusErrorKind::MalformedLine | CorpusErrorKind::InvalidAnnotation
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_display() {
        let err = CorpusError::malformed(4, 2);
        assert!(err.to_string().contains("expected 4"));
        assert!(err.to_string().contains("found 2"));
    }

    #[test]
    fn test_kinds() {
        assert_eq!(CorpusError::MissingMarker.kind(), CorpusErrorKind::MalformedLine);
        assert_eq!(CorpusError::InvalidAnnotation.kind(), CorpusErrorKind::InvalidAnnotation);
        assert_eq!(
            CorpusError::unresolved("x").kind(),
            CorpusErrorKind::UnresolvedReference
        );
    }

    #[test]
    fn test_unresolved_is_not_an_error_line() {
        assert!(!CorpusError::unresolved("x").counts_as_error());
        assert!(CorpusError::InvalidAnnotation.counts_as_error());
        assert!(CorpusError::malformed(3, 1).counts_as_error());
    }

    #[test]
    fn test_invalid_encoding_is_a_recoverable_error_line() {
        let utf8_err = String::from_utf8(vec![0xff, 0xfe]).unwrap_err();
        let err: CorpusError = utf8_err.into();
        assert_eq!(err.kind(), CorpusErrorKind::MalformedLine);
        assert!(err.is_recoverable());
        assert!(err.counts_as_error());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let err: CorpusError = io_err.into();
        assert!(matches!(err, CorpusError::Io(_)));
        assert!(!err.is_recoverable());
    }
}
