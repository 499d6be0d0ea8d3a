pub mod anchors;
pub mod refine;

use anyhow::{Context, Result};

use xlink::dictionary::{DictionaryRegistry, EntityDictionary};
use xlink::error::{Error, XlinkErrorTrait};
use xlink::models::Source;

// Re-export command functions for convenience
pub use anchors::{anchors_expand, anchors_extract, anchors_filter, anchors_link_counts};
pub use refine::{annotate, refine};

/// Load the dictionary for `source`; a missing or unreadable file ends the command
fn load_dictionary(registry: &DictionaryRegistry, source: Source) -> Result<&EntityDictionary> {
    registry
        .get(source)
        .map_err(|e| {
            let err = Error::from(e);
            tracing::error!(
                source = %source,
                category = err.category().description(),
                error = %err,
                "Entity dictionary unavailable"
            );
            err
        })
        .with_context(|| format!("Failed to load {source} entity dictionary"))
}
