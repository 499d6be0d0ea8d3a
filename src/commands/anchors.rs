use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use xlink::anchors::storage::{load_json, save_json};
use xlink::anchors::{self, AnchorStats, CountTable, MentionAnchorTable};
use xlink::config::Config;
use xlink::dictionary::DictionaryRegistry;
use xlink::models::Source;

fn load_anchors(path: &Path) -> Result<MentionAnchorTable> {
    let table: MentionAnchorTable = load_json(path)?;
    tracing::info!(path = %path.display(), mentions = table.len(), "Mention anchors loaded");
    Ok(table)
}

/// Extract every input, then merge the per-file tables
pub fn anchors_extract(
    config: &Config,
    source: Source,
    inputs: Vec<PathBuf>,
    anchors_out: Option<PathBuf>,
    out_links_out: Option<PathBuf>,
) -> Result<()> {
    let inputs = if inputs.is_empty() {
        vec![config.annotated_corpus_path(source)]
    } else {
        inputs
    };
    let anchors_out = anchors_out.unwrap_or_else(|| config.mention_anchors_path(source));
    let out_links_out = out_links_out.unwrap_or_else(|| config.out_links_path(source));

    println!("Extracting mention anchors from {} file(s)", inputs.len());
    println!("================================");

    let mut extractions = Vec::with_capacity(inputs.len());
    for input in &inputs {
        let extraction = anchors::extract(input, config.anchors.progress_interval)
            .with_context(|| format!("Failed to extract anchors: {}", input.display()))?;
        println!("  {}: {}", input.display(), extraction.stats.summary());
        extractions.push(extraction);
    }

    let mut stats = AnchorStats::default();
    for extraction in &extractions {
        stats.absorb(&extraction.stats);
    }

    let merged = anchors::merge(extractions.iter().map(|e| &e.anchors));
    let out_links = anchors::merge_out_links(extractions.iter().map(|e| &e.out_links));

    save_json(&anchors_out, &merged)?;
    save_json(&out_links_out, &out_links)?;

    println!("{}", stats.summary());
    println!(
        "Mentions: {} | Linked entities: {}",
        merged.len(),
        out_links.len()
    );
    println!("Anchors: {}", anchors_out.display());
    println!("Out-links: {}", out_links_out.display());
    Ok(())
}

/// Inject dictionary entities and write the title-entity fallback table
pub fn anchors_expand(
    config: &Config,
    source: Source,
    anchors_path: Option<PathBuf>,
    anchors_out: Option<PathBuf>,
    title_entities_out: Option<PathBuf>,
) -> Result<()> {
    let anchors_path = anchors_path.unwrap_or_else(|| config.mention_anchors_path(source));
    let anchors_out = anchors_out.unwrap_or_else(|| anchors_path.clone());
    let title_entities_out =
        title_entities_out.unwrap_or_else(|| config.title_entities_path(source));

    let registry = DictionaryRegistry::new(config);
    let dictionary = super::load_dictionary(&registry, source)?;

    let mut table = load_anchors(&anchors_path)?;
    let before = table.total_links();
    let title_entities = anchors::expand(dictionary, &mut table);

    save_json(&anchors_out, &table)?;
    save_json(&title_entities_out, &title_entities)?;

    println!(
        "Injected links: {} | Title entities: {}",
        table.total_links() - before,
        title_entities.len()
    );
    println!("Anchors: {}", anchors_out.display());
    println!("Title entities: {}", title_entities_out.display());
    Ok(())
}

/// Filter anchors by link probability
pub fn anchors_filter(
    config: &Config,
    anchors_path: PathBuf,
    link_counts_path: PathBuf,
    freq_counts_path: PathBuf,
    threshold: Option<f64>,
    output: PathBuf,
) -> Result<()> {
    let threshold = threshold.unwrap_or(config.anchors.link_prob_threshold);
    if !(0.0..=1.0).contains(&threshold) {
        anyhow::bail!("threshold must be between 0.0 and 1.0, got {threshold}");
    }

    let table = load_anchors(&anchors_path)?;
    let link_counts: CountTable = load_json(&link_counts_path)?;
    let freq_counts: CountTable = load_json(&freq_counts_path)?;

    let filtered = anchors::filter(&table, &link_counts, &freq_counts, threshold);
    save_json(&output, &filtered)?;

    println!(
        "Mentions: {} -> {} (threshold {threshold})",
        table.len(),
        filtered.len()
    );
    println!("Output: {}", output.display());
    Ok(())
}

/// Derive the link-count table from an anchor table
pub fn anchors_link_counts(anchors_path: PathBuf, output: PathBuf) -> Result<()> {
    let table = load_anchors(&anchors_path)?;
    let counts = anchors::link_counts(&table);
    save_json(&output, &counts)?;

    println!(
        "Mentions: {} | Total links: {}",
        counts.len().saturating_sub(1),
        counts.total().unwrap_or(0)
    );
    println!("Output: {}", output.display());
    Ok(())
}
