//! Entity dictionary
//!
//! Multi-key index over the entities of one source:
//! - by id
//! - by normalized URI (many URIs may alias one entity)
//! - by full title (case-folded for the wiki source)
//! - by mention, where one mention may map to several candidates
//!
//! A dictionary is built once from its tab-pair-separated file and never
//! mutated afterwards. [`DictionaryRegistry`] hands out one shared instance
//! per source.
//!
//! # Example
//!
//! ```
//! use xlink::dictionary::EntityDictionary;
//! use xlink::models::Source;
//!
//! let data = "总统\t\t（职位）\t\t/item/总统/412\t\tbdi1\n";
//! let dict = EntityDictionary::from_reader(Source::Primary, data.as_bytes()).unwrap();
//!
//! assert_eq!(dict.get_by_uri("/item/总统/412").unwrap().id, "bdi1");
//! assert_eq!(dict.get_by_full_title("总统（职位）").unwrap().id, "bdi1");
//! ```

pub mod entity;
pub mod registry;
pub mod uri;

pub use entity::{mention_from_title, Entity};
pub use registry::DictionaryRegistry;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use crate::corpus::error::{CorpusError, CorpusResult};
use crate::models::{DictionaryLayout, Source, SourcePolicy, FIELD_SEPARATOR, URI_SEPARATOR};
use crate::utils::utf8_lines;

/// Number of `\t\t` separated fields in a dictionary line
const DICTIONARY_FIELDS: usize = 4;

/// Summary of a dictionary load
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadReport {
    /// Lines read from the file
    pub lines: usize,

    /// Lines turned into entities
    pub loaded: usize,

    /// Lines skipped for a wrong field count or invalid UTF-8
    pub skipped: usize,

    /// Load duration in milliseconds
    pub duration_ms: u64,
}

/// Index over the entities of one source
#[derive(Debug)]
pub struct EntityDictionary {
    source: Source,

    /// Entities in file order
    entities: Vec<Entity>,

    by_id: HashMap<String, usize>,
    by_uri: HashMap<String, usize>,
    by_full_title: HashMap<String, usize>,

    /// mention -> (entity id -> entity index)
    by_mention: HashMap<String, BTreeMap<String, usize>>,

    report: LoadReport,
}

impl EntityDictionary {
    fn empty(source: Source) -> Self {
        Self {
            source,
            entities: Vec::new(),
            by_id: HashMap::new(),
            by_uri: HashMap::new(),
            by_full_title: HashMap::new(),
            by_mention: HashMap::new(),
            report: LoadReport::default(),
        }
    }

    /// Load a dictionary file
    pub fn load(source: Source, path: &Path) -> CorpusResult<Self> {
        tracing::info!(
            source = %source,
            language = %source.language(),
            path = %path.display(),
            "Loading entities"
        );

        let file = File::open(path).map_err(|e| CorpusError::DictionaryLoad {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::from_reader(source, BufReader::new(file))
    }

    /// Build a dictionary from any line reader
    pub fn from_reader<R: BufRead>(source: Source, reader: R) -> CorpusResult<Self> {
        let start = Instant::now();
        let policy = source.policy();
        let mut dict = Self::empty(source);

        for decoded in utf8_lines(reader) {
            let decoded = decoded?;
            dict.report.lines += 1;

            let Ok(line) = decoded else {
                dict.report.skipped += 1;
                tracing::debug!(line_no = dict.report.lines, "Skipping undecodable dictionary line");
                continue;
            };

            match parse_dictionary_line(policy, &line) {
                Some(entity) => {
                    dict.insert(entity);
                    dict.report.loaded += 1;
                }
                None => {
                    dict.report.skipped += 1;
                    tracing::debug!(
                        line_no = dict.report.lines,
                        "Skipping dictionary line with wrong field count"
                    );
                }
            }
        }

        dict.report.duration_ms = start.elapsed().as_millis() as u64;
        tracing::info!(
            source = %source,
            entities = dict.len(),
            skipped = dict.report.skipped,
            duration_ms = dict.report.duration_ms,
            "Entities loaded"
        );

        Ok(dict)
    }

    /// Build a dictionary from already-constructed entities
    pub fn from_entities(source: Source, entities: impl IntoIterator<Item = Entity>) -> Self {
        let mut dict = Self::empty(source);
        for entity in entities {
            dict.insert(entity);
            dict.report.lines += 1;
            dict.report.loaded += 1;
        }
        dict
    }

    fn insert(&mut self, entity: Entity) {
        let policy = self.source.policy();

        let idx = match self.by_id.get(&entity.id) {
            Some(&existing) => {
                self.entities[existing] = entity;
                existing
            }
            None => {
                self.entities.push(entity);
                let idx = self.entities.len() - 1;
                self.by_id.insert(self.entities[idx].id.clone(), idx);
                idx
            }
        };

        let entity = &self.entities[idx];

        for uri in &entity.uris {
            let key = if policy.normalize_uris {
                uri::normalize_uri(uri)
            } else {
                uri.to_lowercase()
            };
            if !key.is_empty() {
                self.by_uri.insert(key, idx);
            }
        }

        self.by_full_title
            .insert(policy.title_key(&entity.full_title()), idx);

        let mention = policy.title_key(&entity.mention());
        if !mention.is_empty() {
            self.by_mention
                .entry(mention)
                .or_default()
                .insert(entity.id.clone(), idx);
        }
    }

    /// Source this dictionary was built for
    pub fn source(&self) -> Source {
        self.source
    }

    /// Number of distinct entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Load statistics
    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    /// Iterate entities in file order
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn get_by_id(&self, id: &str) -> Option<&Entity> {
        self.by_id.get(id).map(|&idx| &self.entities[idx])
    }

    /// Look up by full title; the query is case-folded for the wiki source
    pub fn get_by_full_title(&self, full_title: &str) -> Option<&Entity> {
        let key = self.source.policy().title_key(full_title);
        self.by_full_title.get(&key).map(|&idx| &self.entities[idx])
    }

    /// Look up by URI, retrying once without the last path segment
    pub fn get_by_uri(&self, uri: &str) -> Option<&Entity> {
        let key = if self.source.policy().normalize_uris {
            uri::canonical_uri(uri)
        } else {
            uri.to_lowercase()
        };

        if let Some(&idx) = self.by_uri.get(&key) {
            return Some(&self.entities[idx]);
        }

        let parent = uri::drop_last_segment(&key)?;
        self.by_uri.get(parent).map(|&idx| &self.entities[idx])
    }

    /// Resolve by URI first, then by full title
    pub fn get_by_uri_and_title(&self, uri: &str, full_title: &str) -> Option<&Entity> {
        self.get_by_uri(uri)
            .or_else(|| self.get_by_full_title(full_title))
    }

    fn mention_ids(&self, mention: &str) -> Option<&BTreeMap<String, usize>> {
        let key = self.source.policy().title_key(mention);
        self.by_mention.get(&key)
    }

    /// Candidate entities for a mention, ordered by id
    pub fn candidates(&self, mention: &str) -> Vec<&Entity> {
        self.mention_ids(mention)
            .map(|ids| ids.values().map(|&idx| &self.entities[idx]).collect())
            .unwrap_or_default()
    }

    /// Number of candidate entities for a mention
    pub fn candidate_count(&self, mention: &str) -> usize {
        self.mention_ids(mention).map_or(0, BTreeMap::len)
    }

    /// Whether `entity_id` is already a candidate for `mention`
    pub fn is_candidate(&self, mention: &str, entity_id: &str) -> bool {
        self.mention_ids(mention)
            .is_some_and(|ids| ids.contains_key(entity_id))
    }

    /// Resolve a mention only when it maps to exactly one entity
    pub fn resolve_mention(&self, mention: &str) -> CorpusResult<&Entity> {
        let ids = self
            .mention_ids(mention)
            .ok_or_else(|| CorpusError::unresolved(mention))?;

        match ids.len() {
            1 => {
                let idx = *ids.values().next().ok_or_else(|| CorpusError::unresolved(mention))?;
                Ok(&self.entities[idx])
            }
            0 => Err(CorpusError::unresolved(mention)),
            n => Err(CorpusError::AmbiguousMention {
                mention: mention.to_string(),
                candidates: n,
            }),
        }
    }
}

/// Parse one dictionary line, `None` when the field count is wrong
fn parse_dictionary_line(policy: &SourcePolicy, line: &str) -> Option<Entity> {
    let line = line.trim_end_matches(|c: char| c == '\n' || c == '\r');
    let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
    if fields.len() != DICTIONARY_FIELDS {
        return None;
    }

    let (title, sub_title, uris, wikidata_id, id) = match policy.dictionary_layout {
        DictionaryLayout::TitleSubtitleUris => (fields[0], fields[1], fields[2], None, fields[3]),
        DictionaryLayout::TitleUrisWikidata => (fields[0], "", fields[1], Some(fields[2]), fields[3]),
    };

    let id = id.trim();
    if id.is_empty() {
        return None;
    }

    Some(Entity {
        id: id.to_string(),
        title: policy.title_key(title.trim()),
        sub_title: sub_title.trim().to_string(),
        language: policy.language,
        uris: uris
            .split(URI_SEPARATOR)
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(str::to_string)
            .collect(),
        source: policy.source,
        wikidata_id: wikidata_id
            .map(str::trim)
            .filter(|w| !w.is_empty())
            .map(str::to_string),
    })
}
