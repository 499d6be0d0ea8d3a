use anyhow::{Context, Result};
use std::path::PathBuf;

use xlink::config::Config;
use xlink::corpus::{corpus_annotation_refine, corpus_refine};
use xlink::dictionary::DictionaryRegistry;
use xlink::models::Source;

/// Raw corpus → refined corpus
pub fn refine(
    config: &Config,
    source: Source,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<()> {
    let input = input.unwrap_or_else(|| config.raw_corpus_path(source));
    let output = output.unwrap_or_else(|| config.refined_corpus_path(source));

    println!("Refining {source} corpus: {}", input.display());
    println!("================================");

    let registry = DictionaryRegistry::new(config);
    let dictionary = super::load_dictionary(&registry, source)?;

    let stats = corpus_refine(
        dictionary,
        &input,
        &output,
        config.anchors.progress_interval,
    )
    .with_context(|| format!("Failed to refine corpus: {}", input.display()))?;

    println!("{}", stats.summary());
    println!("Output: {}", output.display());
    Ok(())
}

/// Refined corpus → annotation-refined corpus
pub fn annotate(
    config: &Config,
    source: Source,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<()> {
    let input = input.unwrap_or_else(|| config.refined_corpus_path(source));
    let output = output.unwrap_or_else(|| config.annotated_corpus_path(source));

    println!("Refining {source} annotations: {}", input.display());
    println!("================================");

    let registry = DictionaryRegistry::new(config);
    let dictionary = super::load_dictionary(&registry, source)?;

    let stats = corpus_annotation_refine(
        dictionary,
        &input,
        &output,
        config.anchors.progress_interval,
    )
    .with_context(|| format!("Failed to refine annotations: {}", input.display()))?;

    println!("{}", stats.summary());
    println!("Output: {}", output.display());
    Ok(())
}
