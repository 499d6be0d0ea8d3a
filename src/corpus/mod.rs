//! Corpus refinement
//!
//! Turns raw encyclopedia dumps into the refined corpus (`entityId \t\t body`)
//! and re-resolves its annotations into canonical `[[id|mention]]` spans.
//! Both passes stream line by line; a bad line is counted and skipped, never
//! fatal.

pub mod error;
pub mod refine;
pub mod stats;

pub use error::{CorpusError, CorpusErrorKind, CorpusResult};
pub use refine::{corpus_annotation_refine, corpus_refine, CorpusRefiner, RefinedLine};
pub use stats::RefineStats;
