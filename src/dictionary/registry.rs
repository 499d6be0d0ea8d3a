//! Per-source dictionary registry
//!
//! Each source's dictionary is loaded on first request and shared read-only
//! afterwards. The registry is an explicit value passed to the components
//! that need lookups; there is no process-global instance.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, OnceLock, PoisonError};

use super::EntityDictionary;
use crate::config::Config;
use crate::corpus::error::CorpusResult;
use crate::models::Source;

/// One source's dictionary file and its lazily loaded contents
#[derive(Debug)]
struct Slot {
    path: PathBuf,
    /// Serializes first loads so the file is read once
    load_lock: Mutex<()>,
    dictionary: OnceLock<EntityDictionary>,
    loads: AtomicUsize,
}

impl Slot {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            load_lock: Mutex::new(()),
            dictionary: OnceLock::new(),
            loads: AtomicUsize::new(0),
        }
    }
}

/// Lazily loaded dictionaries, one per source
#[derive(Debug)]
pub struct DictionaryRegistry {
    primary: Slot,
    wiki: Slot,
}

impl DictionaryRegistry {
    /// Create a registry reading dictionary files from the configured paths
    pub fn new(config: &Config) -> Self {
        Self::with_paths(
            config.entity_dictionary_path(Source::Primary),
            config.entity_dictionary_path(Source::Wiki),
        )
    }

    /// Create a registry with explicit dictionary file paths
    pub fn with_paths(primary_path: impl Into<PathBuf>, wiki_path: impl Into<PathBuf>) -> Self {
        Self {
            primary: Slot::new(primary_path.into()),
            wiki: Slot::new(wiki_path.into()),
        }
    }

    /// Create a registry serving an already-built dictionary
    pub fn from_dictionary(dictionary: EntityDictionary) -> Self {
        let registry = Self::with_paths(PathBuf::new(), PathBuf::new());
        let slot = registry.slot(dictionary.source());
        let _ = slot.dictionary.set(dictionary);
        registry
    }

    fn slot(&self, source: Source) -> &Slot {
        match source {
            Source::Primary => &self.primary,
            Source::Wiki => &self.wiki,
        }
    }

    /// Dictionary file path for a source
    pub fn path(&self, source: Source) -> &PathBuf {
        &self.slot(source).path
    }

    /// Get the dictionary for `source`, loading it on first call.
    ///
    /// Concurrent first calls wait for a single load; a failed load leaves
    /// the slot empty so a later call retries.
    pub fn get(&self, source: Source) -> CorpusResult<&EntityDictionary> {
        let slot = self.slot(source);
        if let Some(dict) = slot.dictionary.get() {
            return Ok(dict);
        }

        let _guard = slot
            .load_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(dict) = slot.dictionary.get() {
            return Ok(dict);
        }

        let dict = EntityDictionary::load(source, &slot.path)?;
        let loads = slot.loads.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::debug!(source = %source, loads, "Entity dictionary cached");
        Ok(slot.dictionary.get_or_init(|| dict))
    }

    /// Whether the dictionary for `source` has been loaded
    pub fn is_loaded(&self, source: Source) -> bool {
        self.slot(source).dictionary.get().is_some()
    }
}
