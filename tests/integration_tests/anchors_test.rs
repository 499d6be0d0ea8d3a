//! Mention-anchor aggregation integration tests

use proptest::prelude::*;
use tempfile::TempDir;
use xlink::anchors::storage::{load_json, save_json};
use xlink::anchors::{
    self, CountTable, MentionAnchorTable, OutLinks, TitleEntityTable, TOTAL_KEY,
};
use xlink::models::Source;

use super::fixtures::{ANNOTATED_SHARD_A, ANNOTATED_SHARD_B, WIKI_DICTIONARY};
use crate::common::{dictionary, write_file};

fn extract_shards(dir: &TempDir) -> (MentionAnchorTable, OutLinks) {
    let shard_a = write_file(dir.path(), "shard_a.txt", ANNOTATED_SHARD_A);
    let shard_b = write_file(dir.path(), "shard_b.txt", ANNOTATED_SHARD_B);

    let a = anchors::extract(&shard_a, 100).unwrap();
    let b = anchors::extract(&shard_b, 100).unwrap();
    assert_eq!(b.stats.skipped, 1);

    (
        anchors::merge([&a.anchors, &b.anchors]),
        anchors::merge_out_links([&a.out_links, &b.out_links]),
    )
}

#[test]
fn test_extract_and_merge_shards() {
    let dir = TempDir::new().unwrap();
    let (merged, out_links) = extract_shards(&dir);

    assert_eq!(merged.count("mozilla", "wk4"), 2);
    assert_eq!(merged.count("rust", "wk1"), 1);
    assert_eq!(merged.count("mercury", "wk2"), 2);
    assert_eq!(merged.count("mercury", "wk3"), 1);
    // single-character mentions are dropped by merge
    assert!(!merged.contains_mention("x"));

    assert_eq!(out_links.len(), 4);
    let wk3_links: Vec<&str> = out_links
        .get("wk3")
        .unwrap()
        .iter()
        .map(String::as_str)
        .collect();
    assert_eq!(wk3_links, vec!["wk2", "wk9"]);
}

#[test]
fn test_expand_then_filter() {
    let dir = TempDir::new().unwrap();
    let (mut merged, _) = extract_shards(&dir);

    let content = format!(
        "{WIKI_DICTIONARY}rust (video game)\t\t/wiki/rust_(video_game)\t\tQ1\t\twk5\nvenus\t\t/wiki/venus\t\tQ313\t\twk6\n"
    );
    let dict = dictionary(Source::Wiki, &content);

    let title_entities = anchors::expand(&dict, &mut merged);
    assert_eq!(merged.count("rust", "wk5"), 1);
    assert_eq!(merged.count("rust", "wk1"), 1);
    assert_eq!(title_entities.get("venus"), Some("wk6"));
    assert_eq!(title_entities.len(), 1);

    let link_counts = anchors::link_counts(&merged);
    assert_eq!(link_counts.get("mozilla"), Some(2));
    assert_eq!(link_counts.get("rust"), Some(2));
    assert_eq!(link_counts.get("mercury"), Some(3));
    assert_eq!(link_counts.get(TOTAL_KEY), Some(7));

    let freq_counts: CountTable = [
        ("mozilla".to_string(), 4),
        ("rust".to_string(), 10),
        ("mercury".to_string(), 3),
        (TOTAL_KEY.to_string(), 1000),
    ]
    .into_iter()
    .collect();

    let filtered = anchors::filter(&merged, &link_counts, &freq_counts, 0.5);
    assert!(filtered.contains_mention("mozilla"));
    assert!(filtered.contains_mention("mercury"));
    assert!(!filtered.contains_mention("rust"));
    assert_eq!(filtered.len(), 2);
}

#[test]
fn test_tables_round_trip_through_json() {
    let dir = TempDir::new().unwrap();
    let (merged, out_links) = extract_shards(&dir);
    let mut title_entities = TitleEntityTable::new();
    title_entities.insert("venus", "wk6");

    let anchors_path = dir.path().join("out/mention_anchors.json");
    let out_links_path = dir.path().join("out/out_links.json");
    let title_path = dir.path().join("out/title_entities.json");

    save_json(&anchors_path, &merged).unwrap();
    save_json(&out_links_path, &out_links).unwrap();
    save_json(&title_path, &title_entities).unwrap();

    assert_eq!(load_json::<MentionAnchorTable>(&anchors_path).unwrap(), merged);
    assert_eq!(load_json::<OutLinks>(&out_links_path).unwrap(), out_links);
    assert_eq!(
        load_json::<TitleEntityTable>(&title_path).unwrap(),
        title_entities
    );
}

// ============================================================================
// Merge properties
// ============================================================================

fn arb_table() -> impl Strategy<Value = MentionAnchorTable> {
    prop::collection::vec(("[a-c]{1,3}", "e[0-3]", 1u64..5), 0..12).prop_map(|entries| {
        let mut table = MentionAnchorTable::new();
        for (mention, id, count) in entries {
            table.add(mention, &id, count);
        }
        table
    })
}

proptest! {
    #[test]
    fn prop_merge_is_commutative(a in arb_table(), b in arb_table()) {
        prop_assert_eq!(anchors::merge([&a, &b]), anchors::merge([&b, &a]));
    }

    #[test]
    fn prop_merge_is_associative(a in arb_table(), b in arb_table(), c in arb_table()) {
        let left = anchors::merge([&anchors::merge([&a, &b]), &c]);
        let right = anchors::merge([&a, &anchors::merge([&b, &c])]);
        prop_assert_eq!(left, right);
    }

    #[test]
    fn prop_merge_preserves_total_of_long_mentions(a in arb_table(), b in arb_table()) {
        let merged = anchors::merge([&a, &b]);
        let long_total = |t: &MentionAnchorTable| -> u64 {
            t.iter()
                .filter(|(m, _)| m.chars().count() > 1)
                .flat_map(|(_, targets)| targets.values())
                .sum()
        };
        prop_assert_eq!(merged.total_links(), long_total(&a) + long_total(&b));
    }
}
