//! Corpus refinement statistics

use serde::{Deserialize, Serialize};

use super::error::{CorpusError, CorpusErrorKind};

/// Statistics for one corpus refinement pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefineStats {
    /// Lines read from the input
    pub total: usize,

    /// Lines written to the output
    pub written: usize,

    /// Lines with a wrong field count or a missing body marker
    pub malformed: usize,

    /// Lines dropped for unbalanced or nested annotation brackets
    pub invalid_annotation: usize,

    /// Lines whose page could not be resolved to an entity
    pub unresolved: usize,

    /// Total processing time in milliseconds
    pub duration_ms: u64,
}

impl RefineStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a written line
    pub fn record_written(&mut self) {
        self.total += 1;
        self.written += 1;
    }

    /// Record a dropped line
    pub fn record_failure(&mut self, error: &CorpusError) {
        self.total += 1;
        match error.kind() {
            CorpusErrorKind::InvalidAnnotation => self.invalid_annotation += 1,
            CorpusErrorKind::UnresolvedReference | CorpusErrorKind::AmbiguousMention => {
                self.unresolved += 1
            }
            CorpusErrorKind::MalformedLine | CorpusErrorKind::Io => self.malformed += 1,
        }
    }

    /// Lines that failed parsing or validation
    pub fn error_lines(&self) -> usize {
        self.malformed + self.invalid_annotation
    }

    /// Get success rate as percentage
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.written as f64 / self.total as f64) * 100.0
        }
    }

    /// Get throughput (lines per second)
    pub fn throughput(&self) -> f64 {
        if self.duration_ms == 0 {
            0.0
        } else {
            self.total as f64 / (self.duration_ms as f64 / 1000.0)
        }
    }

    /// Get summary as formatted string
    pub fn summary(&self) -> String {
        format!(
            "Lines: {}/{} written ({:.1}% success) | Errors: {} (malformed {}, invalid annotation {}) | Unresolved: {} | Time: {:.1}s | Throughput: {:.0} lines/s",
            self.written,
            self.total,
            self.success_rate(),
            self.error_lines(),
            self.malformed,
            self.invalid_annotation,
            self.unresolved,
            self.duration_ms as f64 / 1000.0,
            self.throughput()
        )
    }
}
