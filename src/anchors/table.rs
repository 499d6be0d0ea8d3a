//! Anchor, out-link and count tables
//!
//! All tables serialize as plain JSON objects and keep their keys sorted, so
//! a save/load cycle reproduces the file byte for byte.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Reserved key holding the grand total in count tables
pub const TOTAL_KEY: &str = "__all__";

/// Whether a mention is long enough to be kept by merge and filter
pub(crate) fn is_significant(mention: &str) -> bool {
    mention.chars().nth(1).is_some()
}

/// Mention (lower-cased) → target entity id → link count
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MentionAnchorTable(BTreeMap<String, BTreeMap<String, u64>>);

impl MentionAnchorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one link from `mention` to `entity_id`; the mention is lower-cased
    pub fn record(&mut self, mention: &str, entity_id: &str) {
        self.add(mention.to_lowercase(), entity_id, 1);
    }

    /// Add `count` links, using the mention as given
    pub fn add(&mut self, mention: impl Into<String>, entity_id: &str, count: u64) {
        *self
            .0
            .entry(mention.into())
            .or_default()
            .entry(entity_id.to_string())
            .or_insert(0) += count;
    }

    /// Targets and counts for a mention
    pub fn get(&self, mention: &str) -> Option<&BTreeMap<String, u64>> {
        self.0.get(mention)
    }

    /// Link count for one mention/entity pair, 0 when absent
    pub fn count(&self, mention: &str, entity_id: &str) -> u64 {
        self.0
            .get(mention)
            .and_then(|targets| targets.get(entity_id))
            .copied()
            .unwrap_or(0)
    }

    pub fn contains_mention(&self, mention: &str) -> bool {
        self.0.contains_key(mention)
    }

    /// Whether `entity_id` already appears as a target of `mention`
    pub fn has_target(&self, mention: &str, entity_id: &str) -> bool {
        self.0
            .get(mention)
            .is_some_and(|targets| targets.contains_key(entity_id))
    }

    /// Number of distinct mentions
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all link counts
    pub fn total_links(&self) -> u64 {
        self.0.values().flat_map(BTreeMap::values).sum()
    }

    /// Iterate mentions in sorted order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &BTreeMap<String, u64>)> {
        self.0.iter()
    }

    /// Add every count of `other`, dropping single-character mentions
    pub fn merge_from(&mut self, other: &MentionAnchorTable) {
        for (mention, targets) in other.iter().filter(|(m, _)| is_significant(m)) {
            for (entity_id, &count) in targets {
                self.add(mention.as_str(), entity_id, count);
            }
        }
    }

    /// Keep only the mentions for which `keep` returns true
    pub fn retain(&mut self, mut keep: impl FnMut(&str, &BTreeMap<String, u64>) -> bool) {
        self.0.retain(|mention, targets| keep(mention, targets));
    }
}

impl FromIterator<(String, BTreeMap<String, u64>)> for MentionAnchorTable {
    fn from_iter<I: IntoIterator<Item = (String, BTreeMap<String, u64>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Source entity id → set of linked target entity ids
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutLinks(BTreeMap<String, BTreeSet<String>>);

impl OutLinks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a link from `source_id` to `target_id`
    pub fn record(&mut self, source_id: &str, target_id: &str) {
        self.0
            .entry(source_id.to_string())
            .or_default()
            .insert(target_id.to_string());
    }

    pub fn get(&self, source_id: &str) -> Option<&BTreeSet<String>> {
        self.0.get(source_id)
    }

    /// Number of source entities with at least one out-link
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &BTreeSet<String>)> {
        self.0.iter()
    }

    /// Union every link set of `other` into this table
    pub fn union_from(&mut self, other: &OutLinks) {
        for (source_id, targets) in other.iter() {
            self.0
                .entry(source_id.clone())
                .or_default()
                .extend(targets.iter().cloned());
        }
    }
}

/// Mention → occurrence count, with the grand total under [`TOTAL_KEY`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CountTable(BTreeMap<String, u64>);

impl CountTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, mention: impl Into<String>, count: u64) {
        self.0.insert(mention.into(), count);
    }

    pub fn get(&self, mention: &str) -> Option<u64> {
        self.0.get(mention).copied()
    }

    /// Grand total, if recorded
    pub fn total(&self) -> Option<u64> {
        self.get(TOTAL_KEY)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, u64)> for CountTable {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Mention → entity id for entities whose mention never occurs as an anchor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TitleEntityTable(BTreeMap<String, String>);

impl TitleEntityTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, mention: impl Into<String>, entity_id: impl Into<String>) {
        self.0.insert(mention.into(), entity_id.into());
    }

    pub fn get(&self, mention: &str) -> Option<&str> {
        self.0.get(mention).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
