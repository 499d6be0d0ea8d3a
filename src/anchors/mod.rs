//! Mention-anchor aggregation
//!
//! Builds the mention → entity → count statistics that downstream link
//! probability estimation consumes:
//!
//! 1. [`extract`] counts `[[id|mention]]` spans of an annotation-refined corpus
//! 2. [`merge`] / [`merge_out_links`] combine per-shard tables
//! 3. [`expand`] injects dictionary entities the corpus never linked
//! 4. [`filter`] drops rare or low-probability mentions
//!
//! # Example
//!
//! ```
//! use xlink::anchors::{extract_from_reader, link_counts, TOTAL_KEY};
//!
//! let corpus = "e1\t\tsee [[e2|Rust]] and [[e3|Go]]\ne2\t\t[[e1|rust]] again\n";
//! let extraction = extract_from_reader(corpus.as_bytes(), 100).unwrap();
//!
//! assert_eq!(extraction.anchors.count("rust", "e2"), 1);
//! assert_eq!(extraction.anchors.count("rust", "e1"), 1);
//! assert_eq!(extraction.out_links.len(), 2);
//!
//! let counts = link_counts(&extraction.anchors);
//! assert_eq!(counts.get("rust"), Some(2));
//! assert_eq!(counts.get(TOTAL_KEY), Some(3));
//! ```

pub mod storage;
pub mod table;

pub use table::{CountTable, MentionAnchorTable, OutLinks, TitleEntityTable, TOTAL_KEY};

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::annotation::extract_plain;
use crate::corpus::error::{CorpusError, CorpusResult};
use crate::corpus::RefinedLine;
use crate::dictionary::EntityDictionary;
use crate::utils::{truncate_text, utf8_lines, Progress};

use table::is_significant;

/// Statistics for one extraction pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorStats {
    /// Lines read
    pub lines: usize,

    /// Malformed lines skipped
    pub skipped: usize,

    /// Mentions counted
    pub mentions: usize,

    /// Processing time in milliseconds
    pub duration_ms: u64,
}

impl AnchorStats {
    /// Fold another pass into this one
    pub fn absorb(&mut self, other: &AnchorStats) {
        self.lines += other.lines;
        self.skipped += other.skipped;
        self.mentions += other.mentions;
        self.duration_ms += other.duration_ms;
    }

    /// Get summary as formatted string
    pub fn summary(&self) -> String {
        format!(
            "Lines: {} ({} skipped) | Mentions: {} | Time: {:.1}s",
            self.lines,
            self.skipped,
            self.mentions,
            self.duration_ms as f64 / 1000.0
        )
    }
}

/// Output of one extraction pass
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub anchors: MentionAnchorTable,
    pub out_links: OutLinks,
    pub stats: AnchorStats,
}

/// Count anchors and out-links over `id \t\t annotated` lines
pub fn extract_from_reader<R: BufRead>(reader: R, progress_interval: usize) -> CorpusResult<Extraction> {
    let mut extraction = Extraction::default();
    let mut progress = Progress::new(progress_interval);

    for decoded in utf8_lines(reader) {
        let decoded = decoded?;
        extraction.stats.lines += 1;

        let line = match decoded {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(
                    line_no = extraction.stats.lines,
                    error = %CorpusError::from(e),
                    "Skipping undecodable line"
                );
                extraction.stats.skipped += 1;
                progress.tick(extraction.stats.lines, "extract");
                continue;
            }
        };

        let parsed = RefinedLine::parse(&line)
            .and_then(|refined| extract_plain(&refined.body).map(|(m, _)| (refined.entity_id, m)));

        match parsed {
            Ok((source_id, mentions)) => {
                for span in &mentions {
                    extraction.anchors.record(&span.mention, &span.entity_id);
                    extraction.out_links.record(&source_id, &span.entity_id);
                }
                extraction.stats.mentions += mentions.len();
            }
            Err(e) => {
                tracing::warn!(
                    line_no = extraction.stats.lines,
                    error = %e,
                    line = %truncate_text(&line, 80),
                    "Skipping annotated line"
                );
                extraction.stats.skipped += 1;
            }
        }

        progress.tick(extraction.stats.lines, "extract");
    }

    extraction.stats.duration_ms = progress.elapsed_ms();
    Ok(extraction)
}

/// Count anchors and out-links of an annotation-refined corpus file
pub fn extract(path: &Path, progress_interval: usize) -> CorpusResult<Extraction> {
    tracing::info!(path = %path.display(), "Extracting mention anchors");

    let file = File::open(path)?;
    let extraction = extract_from_reader(BufReader::new(file), progress_interval)?;

    tracing::info!(
        path = %path.display(),
        lines = extraction.stats.lines,
        skipped = extraction.stats.skipped,
        mentions = extraction.anchors.len(),
        sources = extraction.out_links.len(),
        "Mention anchors extracted"
    );

    Ok(extraction)
}

/// Additive merge; single-character mentions are dropped
pub fn merge<'a>(tables: impl IntoIterator<Item = &'a MentionAnchorTable>) -> MentionAnchorTable {
    let mut merged = MentionAnchorTable::new();
    for table in tables {
        merged.merge_from(table);
    }
    merged
}

/// Set-union merge of out-link tables
pub fn merge_out_links<'a>(tables: impl IntoIterator<Item = &'a OutLinks>) -> OutLinks {
    let mut merged = OutLinks::new();
    for table in tables {
        merged.union_from(table);
    }
    merged
}

/// Inject dictionary entities into the anchor table.
///
/// An entity whose mention is already an anchor but which is not yet one of
/// its targets gets a count of 1. Mentions that are not anchors at all are
/// returned as a mention → entity fallback table; for repeated mentions the
/// entity listed last in the dictionary wins.
pub fn expand(dictionary: &EntityDictionary, anchors: &mut MentionAnchorTable) -> TitleEntityTable {
    let mut title_entities = TitleEntityTable::new();
    let mut injected = 0usize;

    for entity in dictionary.entities() {
        let mention = entity.mention().to_lowercase();
        if mention.is_empty() {
            continue;
        }

        if anchors.contains_mention(&mention) {
            if !anchors.has_target(&mention, &entity.id) {
                anchors.add(mention, &entity.id, 1);
                injected += 1;
            }
        } else {
            title_entities.insert(mention, entity.id.as_str());
        }
    }

    tracing::info!(
        source = %dictionary.source(),
        injected,
        title_entities = title_entities.len(),
        "Mention anchors expanded"
    );

    title_entities
}

/// Keep mentions that are linked often enough relative to their frequency.
///
/// A mention survives when it is longer than one character, is not the
/// reserved total key, appears in both count tables with a link count of at
/// least 2, and `link / freq >= threshold`.
pub fn filter(
    anchors: &MentionAnchorTable,
    link_counts: &CountTable,
    freq_counts: &CountTable,
    threshold: f64,
) -> MentionAnchorTable {
    let mut filtered = anchors.clone();
    filtered.retain(|mention, _| {
        if !is_significant(mention) || mention == TOTAL_KEY {
            return false;
        }
        let (Some(link), Some(freq)) = (link_counts.get(mention), freq_counts.get(mention)) else {
            return false;
        };
        link >= 2 && freq > 0 && link as f64 / freq as f64 >= threshold
    });

    tracing::info!(
        before = anchors.len(),
        after = filtered.len(),
        threshold,
        "Mention anchors filtered"
    );

    filtered
}

/// Per-mention link totals plus the grand total under [`TOTAL_KEY`]
pub fn link_counts(anchors: &MentionAnchorTable) -> CountTable {
    let mut counts: CountTable = anchors
        .iter()
        .map(|(mention, targets)| (mention.clone(), targets.values().sum()))
        .collect();
    counts.insert(TOTAL_KEY, anchors.total_links());
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::Entity;
    use crate::models::Source;

    fn table(entries: &[(&str, &str, u64)]) -> MentionAnchorTable {
        let mut t = MentionAnchorTable::new();
        for &(mention, id, count) in entries {
            t.add(mention, id, count);
        }
        t
    }

    fn counts(entries: &[(&str, u64)]) -> CountTable {
        entries.iter().map(|&(m, c)| (m.to_string(), c)).collect()
    }

    #[test]
    fn test_extract_skips_malformed_lines() {
        let corpus = "e1\t\t[[e2|Alpha]] [[e2|alpha]]\nno separator\ne3\t\t[[bare]]\ne4\t\tplain\n";
        let extraction = extract_from_reader(corpus.as_bytes(), 1).unwrap();

        assert_eq!(extraction.stats.lines, 4);
        assert_eq!(extraction.stats.skipped, 2);
        assert_eq!(extraction.stats.mentions, 2);
        assert_eq!(extraction.anchors.count("alpha", "e2"), 2);
        // e4 has no mentions and no out-links
        assert!(extraction.out_links.get("e4").is_none());
        assert_eq!(extraction.out_links.len(), 1);
    }

    #[test]
    fn test_extract_skips_undecodable_line() {
        let corpus: &[u8] = b"e1\t\t[[e2|alpha]]\n\xff\ne3\t\t[[e2|alpha]]\n";
        let extraction = extract_from_reader(corpus, 100).unwrap();

        assert_eq!(extraction.stats.lines, 3);
        assert_eq!(extraction.stats.skipped, 1);
        assert_eq!(extraction.anchors.count("alpha", "e2"), 2);
        assert_eq!(extraction.out_links.len(), 2);
    }

    #[test]
    fn test_merge_is_additive() {
        let a = table(&[("rust", "wk1", 2), ("go", "wk2", 1)]);
        let b = table(&[("rust", "wk1", 3), ("rust", "wk3", 1), ("x", "wk4", 9)]);

        let merged = merge([&a, &b]);
        assert_eq!(merged.count("rust", "wk1"), 5);
        assert_eq!(merged.count("rust", "wk3"), 1);
        assert_eq!(merged.count("go", "wk2"), 1);
        assert!(!merged.contains_mention("x"));
    }

    #[test]
    fn test_merge_out_links_is_union() {
        let mut a = OutLinks::new();
        a.record("s", "t1");
        let mut b = OutLinks::new();
        b.record("s", "t1");
        b.record("s", "t2");

        let merged = merge_out_links([&a, &b]);
        assert_eq!(merged.get("s").map(|t| t.len()), Some(2));
    }

    #[test]
    fn test_expand() {
        let dict = EntityDictionary::from_entities(
            Source::Wiki,
            vec![
                Entity::new(Source::Wiki, "wk1", "Mercury (planet)"),
                Entity::new(Source::Wiki, "wk2", "mercury (element)"),
                Entity::new(Source::Wiki, "wk3", "venus"),
            ],
        );
        let mut anchors = table(&[("mercury", "wk1", 7)]);

        let title_entities = expand(&dict, &mut anchors);

        assert_eq!(anchors.count("mercury", "wk1"), 7);
        assert_eq!(anchors.count("mercury", "wk2"), 1);
        assert!(!anchors.contains_mention("venus"));
        assert_eq!(title_entities.get("venus"), Some("wk3"));
        assert_eq!(title_entities.len(), 1);
    }

    #[test]
    fn test_filter_threshold_boundary() {
        let anchors = table(&[
            ("keep", "e1", 2),
            ("edge", "e2", 2),
            ("rare", "e3", 2),
            ("once", "e4", 1),
            ("a", "e5", 5),
            ("missing", "e6", 4),
            (TOTAL_KEY, "e7", 3),
        ]);
        let links = counts(&[
            ("keep", 4),
            ("edge", 2),
            ("rare", 2),
            ("once", 1),
            ("a", 5),
            (TOTAL_KEY, 20),
        ]);
        let freqs = counts(&[
            ("keep", 4),
            ("edge", 4),
            ("rare", 5),
            ("once", 1),
            ("a", 5),
            ("missing", 4),
            (TOTAL_KEY, 100),
        ]);

        let filtered = filter(&anchors, &links, &freqs, 0.5);

        assert!(filtered.contains_mention("keep"));
        // 2 / 4 == 0.5 stays
        assert!(filtered.contains_mention("edge"));
        // 2 / 5 < 0.5
        assert!(!filtered.contains_mention("rare"));
        // link count below 2
        assert!(!filtered.contains_mention("once"));
        assert!(!filtered.contains_mention("a"));
        assert!(!filtered.contains_mention("missing"));
        assert!(!filtered.contains_mention(TOTAL_KEY));
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn test_filter_zero_frequency_dropped() {
        let anchors = table(&[("rust", "e1", 3)]);
        let filtered = filter(&anchors, &counts(&[("rust", 3)]), &counts(&[("rust", 0)]), 0.0);
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_link_counts() {
        let anchors = table(&[("rust", "wk1", 2), ("rust", "wk2", 1), ("go", "wk3", 4)]);
        let counts = link_counts(&anchors);
        assert_eq!(counts.get("rust"), Some(3));
        assert_eq!(counts.get("go"), Some(4));
        assert_eq!(counts.total(), Some(7));
    }

    #[test]
    fn test_stats_absorb() {
        let mut total = AnchorStats::default();
        total.absorb(&AnchorStats {
            lines: 3,
            skipped: 1,
            mentions: 5,
            duration_ms: 10,
        });
        total.absorb(&AnchorStats {
            lines: 2,
            skipped: 0,
            mentions: 1,
            duration_ms: 5,
        });
        assert_eq!(total.lines, 5);
        assert_eq!(total.mentions, 6);
        assert!(total.summary().contains("1 skipped"));
    }
}
