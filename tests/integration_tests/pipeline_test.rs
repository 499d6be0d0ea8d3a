//! End-to-end corpus pipeline integration tests
//!
//! Tests the complete workflow:
//! 1. Dictionary load through the registry
//! 2. Raw corpus refinement
//! 3. Annotation refinement
//! 4. Statistics tracking

use tempfile::TempDir;
use xlink::corpus::{corpus_annotation_refine, corpus_refine, CorpusError};
use xlink::dictionary::DictionaryRegistry;
use xlink::models::Source;

use super::fixtures::{
    PRIMARY_ANNOTATED, PRIMARY_DICTIONARY, PRIMARY_RAW_CORPUS, PRIMARY_REFINED, WIKI_DICTIONARY,
    WIKI_RAW_CORPUS,
};
use crate::common::{read_lines, write_file};

// ============================================================================
// Primary Source
// ============================================================================

#[test]
fn test_primary_refine_three_lines() {
    let temp_dir = TempDir::new().unwrap();
    let dict_path = write_file(temp_dir.path(), "primary/entity_id.txt", PRIMARY_DICTIONARY);
    let raw_path = write_file(temp_dir.path(), "primary/raw.txt", PRIMARY_RAW_CORPUS);
    let refined_path = temp_dir.path().join("primary/refined.txt");

    let registry = DictionaryRegistry::with_paths(&dict_path, temp_dir.path().join("missing"));
    let dictionary = registry.get(Source::Primary).unwrap();
    assert_eq!(dictionary.len(), 4);

    let stats = corpus_refine(dictionary, &raw_path, &refined_path, 1).unwrap();

    assert_eq!(stats.total, 3);
    assert!(stats.error_lines() >= 1);
    assert_eq!(stats.written, 1);
    assert_eq!(stats.malformed, 1);
    assert_eq!(stats.invalid_annotation, 1);
    assert_eq!(read_lines(&refined_path), vec![PRIMARY_REFINED.to_string()]);
}

#[test]
fn test_primary_full_pipeline() {
    let temp_dir = TempDir::new().unwrap();
    let dict_path = write_file(temp_dir.path(), "entity_id.txt", PRIMARY_DICTIONARY);
    let raw_path = write_file(temp_dir.path(), "raw.txt", PRIMARY_RAW_CORPUS);
    let refined_path = temp_dir.path().join("refined.txt");
    let annotated_path = temp_dir.path().join("out/annotated.txt");

    let registry = DictionaryRegistry::with_paths(&dict_path, "unused");
    let dictionary = registry.get(Source::Primary).unwrap();

    corpus_refine(dictionary, &raw_path, &refined_path, 100).unwrap();
    let stats = corpus_annotation_refine(dictionary, &refined_path, &annotated_path, 100).unwrap();

    assert_eq!(stats.total, 1);
    assert_eq!(stats.written, 1);
    assert_eq!(read_lines(&annotated_path), vec![PRIMARY_ANNOTATED.to_string()]);
}

#[test]
fn test_missing_input_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let dict_path = write_file(temp_dir.path(), "entity_id.txt", PRIMARY_DICTIONARY);
    let registry = DictionaryRegistry::with_paths(&dict_path, "unused");
    let dictionary = registry.get(Source::Primary).unwrap();

    let result = corpus_refine(
        dictionary,
        &temp_dir.path().join("nope.txt"),
        &temp_dir.path().join("out.txt"),
        100,
    );
    let err = result.unwrap_err();
    assert!(matches!(err, CorpusError::Io(_)));
    assert!(!err.is_recoverable());
}

#[test]
fn test_missing_dictionary_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let registry = DictionaryRegistry::with_paths(temp_dir.path().join("none.txt"), "unused");
    assert!(matches!(
        registry.get(Source::Primary),
        Err(CorpusError::DictionaryLoad { .. })
    ));
}

// ============================================================================
// Wiki Source
// ============================================================================

#[test]
fn test_wiki_full_pipeline() {
    let temp_dir = TempDir::new().unwrap();
    let dict_path = write_file(temp_dir.path(), "wiki/entity_id.txt", WIKI_DICTIONARY);
    let raw_path = write_file(temp_dir.path(), "wiki/raw.txt", WIKI_RAW_CORPUS);
    let refined_path = temp_dir.path().join("wiki/refined.txt");
    let annotated_path = temp_dir.path().join("wiki/annotated.txt");

    let registry = DictionaryRegistry::with_paths("unused", &dict_path);
    let dictionary = registry.get(Source::Wiki).unwrap();

    let stats = corpus_refine(dictionary, &raw_path, &refined_path, 100).unwrap();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.written, 2);
    assert_eq!(stats.unresolved, 1);
    assert_eq!(stats.error_lines(), 0);

    assert_eq!(
        read_lines(&refined_path),
        vec![
            "wk1\t\tRust began at [[Mozilla|Mozilla Research]], not on [[mercury]].".to_string(),
            "wk4\t\tMaintainer of [[Rust]] and [[rust (programming language)|Rust]].".to_string(),
        ]
    );

    corpus_annotation_refine(dictionary, &refined_path, &annotated_path, 100).unwrap();
    assert_eq!(
        read_lines(&annotated_path),
        vec![
            "wk1\t\tRust began at [[wk4|Mozilla Research]], not on mercury.".to_string(),
            "wk4\t\tMaintainer of [[wk1|Rust]] and Rust.".to_string(),
        ]
    );
}

#[test]
fn test_registry_shares_one_dictionary() {
    let temp_dir = TempDir::new().unwrap();
    let dict_path = write_file(temp_dir.path(), "entity_id.txt", WIKI_DICTIONARY);
    let registry = DictionaryRegistry::with_paths("unused", &dict_path);

    let handles: Vec<usize> = std::thread::scope(|scope| {
        let workers: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| registry.get(Source::Wiki).unwrap() as *const _ as usize)
            })
            .collect();
        workers.into_iter().map(|w| w.join().unwrap()).collect()
    });

    assert!(handles.windows(2).all(|pair| pair[0] == pair[1]));
}
