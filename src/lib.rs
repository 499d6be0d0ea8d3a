//! xlink - Entity-linked corpus builder
//!
//! Builds a cleaned, entity-linked text corpus from encyclopedia dumps and
//! derives the mention-anchor statistics used for link probability estimation.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Configuration management and data paths
//! - [`models`] - Sources and their per-source policies
//! - [`dictionary`] - Entity records and the multi-key entity dictionary
//! - [`annotation`] - `[[id|mention]]` validation, parsing and re-resolution
//! - [`corpus`] - Raw and refined corpus passes
//! - [`anchors`] - Mention-anchor extraction, merge, expansion and filtering
//! - [`error`] - Unified error handling
//! - [`utils`] - Common utilities and helpers
//!
//! # Example
//!
//! ```no_run
//! use xlink::config::Config;
//! use xlink::corpus::corpus_refine;
//! use xlink::dictionary::DictionaryRegistry;
//! use xlink::models::Source;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let registry = DictionaryRegistry::new(&config);
//!     let dictionary = registry.get(Source::Primary)?;
//!
//!     let stats = corpus_refine(
//!         dictionary,
//!         &config.raw_corpus_path(Source::Primary),
//!         &config.refined_corpus_path(Source::Primary),
//!         config.anchors.progress_interval,
//!     )?;
//!     println!("{}", stats.summary());
//!     Ok(())
//! }
//! ```

pub mod anchors;
pub mod annotation;
pub mod config;
pub mod corpus;
pub mod dictionary;
pub mod error;
pub mod models;
pub mod utils;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::anchors::{CountTable, MentionAnchorTable, OutLinks, TitleEntityTable};
    pub use crate::annotation::{AnnotationResolver, MentionSpan, ResolvedDocument};
    pub use crate::config::Config;
    pub use crate::corpus::{CorpusError, CorpusRefiner, RefineStats};
    pub use crate::dictionary::{DictionaryRegistry, Entity, EntityDictionary};
    pub use crate::error::{Error, ErrorCategory, Result, XlinkErrorTrait};
    pub use crate::models::Source;
}

// Direct re-exports for convenience
pub use models::{Source, SourcePolicy};
