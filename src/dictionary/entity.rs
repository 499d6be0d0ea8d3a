//! Entity records loaded from the dictionary file

use serde::{Deserialize, Serialize};

use crate::models::{Language, Source};

/// One knowledge-base entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Stable identifier, unique within a source
    pub id: String,

    /// Base display title (lower-cased for the wiki source)
    pub title: String,

    /// Disambiguating qualifier including its own brackets, empty for none
    #[serde(default)]
    pub sub_title: String,

    pub language: Language,

    /// Canonical URIs resolving to this entity, in file order
    #[serde(default)]
    pub uris: Vec<String>,

    pub source: Source,

    /// Wikidata identifier (wiki dictionary layout only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wikidata_id: Option<String>,
}

impl Entity {
    /// Create an entity without subtitle or URIs
    pub fn new(source: Source, id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            sub_title: String::new(),
            language: source.language(),
            uris: Vec::new(),
            source,
            wikidata_id: None,
        }
    }

    /// Set the subtitle
    pub fn with_sub_title(mut self, sub_title: impl Into<String>) -> Self {
        self.sub_title = sub_title.into();
        self
    }

    /// Add a URI
    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uris.push(uri.into());
        self
    }

    /// Title followed by subtitle, no separator
    pub fn full_title(&self) -> String {
        if self.sub_title.trim().is_empty() {
            self.title.clone()
        } else {
            format!("{}{}", self.title, self.sub_title)
        }
    }

    /// Title with parenthetical qualifiers removed
    pub fn mention(&self) -> String {
        mention_from_title(&self.title)
    }
}

fn is_open_paren(c: char) -> bool {
    c == '(' || c == '（'
}

fn is_close_paren(c: char) -> bool {
    c == ')' || c == '）'
}

/// Strip parenthetical qualifiers (ASCII or full-width) from a title.
///
/// Text between an opening parenthesis and the next closing one is removed,
/// the remainder is concatenated and trimmed:
///
/// ```
/// use xlink::dictionary::mention_from_title;
///
/// assert_eq!(mention_from_title("苹果（水果）"), "苹果");
/// assert_eq!(mention_from_title("mercury (planet)"), "mercury");
/// assert_eq!(mention_from_title("plain"), "plain");
/// ```
pub fn mention_from_title(title: &str) -> String {
    title
        .split(is_open_paren)
        .map(|piece| piece.rsplit(is_close_paren).next().unwrap_or(piece))
        .collect::<String>()
        .trim()
        .to_string()
}
