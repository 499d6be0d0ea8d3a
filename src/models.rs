// Core data structures shared across the pipeline

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Separator between fields in dictionary and corpus lines
pub const FIELD_SEPARATOR: &str = "\t\t";

/// Separator between URIs inside a single dictionary field
pub const URI_SEPARATOR: &str = "::;";

/// Separator between the leading marker token and the annotated body
pub const BODY_MARKER_SEPARATOR: &str = "::;";

/// Corpus source the dictionary and documents come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Chinese encyclopedia site
    Primary,
    /// English Wikipedia
    Wiki,
}

impl Source {
    /// Get string representation (also the per-source data directory name)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Wiki => "wiki",
        }
    }

    /// Create from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "primary" | "bd" | "baike" => Some(Self::Primary),
            "wiki" | "wikipedia" | "en" => Some(Self::Wiki),
            _ => None,
        }
    }

    /// Source-specific parsing and resolution policy
    pub fn policy(&self) -> &'static SourcePolicy {
        match self {
            Self::Primary => &PRIMARY_POLICY,
            Self::Wiki => &WIKI_POLICY,
        }
    }

    /// Language of entities loaded from this source
    pub fn language(&self) -> Language {
        self.policy().language
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Source {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown source '{s}' (expected primary or wiki)"))
    }
}

/// Entity language, fixed per source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Zh,
    En,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Zh => "zh",
            Self::En => "en",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Column layout of the entity dictionary file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DictionaryLayout {
    /// `title \t\t subTitle \t\t uris \t\t entityId`
    TitleSubtitleUris,
    /// `title \t\t uris \t\t wikidataId \t\t entityId`
    TitleUrisWikidata,
}

/// How an annotation without a pipe (`[[A]]`) is treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BareSpanRule {
    /// Always degraded to plain text
    Plain,
    /// `A` is looked up as a mention, resolves only when unambiguous
    UniqueMention,
}

/// How a piped annotation (`[[A|B]]`) is treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipedSpanRule {
    /// `A` is a percent-encoded URI, `B` the mention
    UriMention,
    /// `A` is a title looked up as a mention, `B` the mention
    TitleMention,
}

/// Source-specific policy, carried as data instead of string comparisons
#[derive(Debug, Clone, Copy)]
pub struct SourcePolicy {
    pub source: Source,
    pub language: Language,

    /// Dictionary column layout
    pub dictionary_layout: DictionaryLayout,

    /// Number of `\t\t` separated fields in a raw corpus line
    pub raw_corpus_fields: usize,

    /// Remove whitespace (except field tabs) from raw corpus lines
    pub strip_whitespace: bool,

    /// Bracket pair used when rebuilding a full title from its subtitle
    pub open_bracket: char,
    pub close_bracket: char,

    /// Raw corpus lines carry a subtitle column
    pub has_subtitle_column: bool,

    /// Host prefix stripped (by character count) from raw corpus URLs.
    /// `None` means the URL column is not used for resolution.
    pub url_host_prefix: Option<&'static str>,

    /// Full titles are case-folded in the dictionary index
    pub fold_title_case: bool,

    /// Dictionary URIs are normalized before indexing
    pub normalize_uris: bool,

    pub bare_span: BareSpanRule,
    pub piped_span: PipedSpanRule,
}

impl SourcePolicy {
    /// Number of `/` segments kept when reducing a URI to its canonical prefix
    pub const URI_SEGMENT_DEPTH: usize = 3;

    /// Fold a title into its index key form
    pub fn title_key(&self, title: &str) -> String {
        if self.fold_title_case {
            title.to_lowercase()
        } else {
            title.to_string()
        }
    }
}

static PRIMARY_POLICY: SourcePolicy = SourcePolicy {
    source: Source::Primary,
    language: Language::Zh,
    dictionary_layout: DictionaryLayout::TitleSubtitleUris,
    raw_corpus_fields: 4,
    strip_whitespace: true,
    open_bracket: '（',
    close_bracket: '）',
    has_subtitle_column: true,
    url_host_prefix: Some("https://baike.baidu.com"),
    fold_title_case: false,
    normalize_uris: true,
    bare_span: BareSpanRule::Plain,
    piped_span: PipedSpanRule::UriMention,
};

static WIKI_POLICY: SourcePolicy = SourcePolicy {
    source: Source::Wiki,
    language: Language::En,
    dictionary_layout: DictionaryLayout::TitleUrisWikidata,
    raw_corpus_fields: 3,
    strip_whitespace: false,
    open_bracket: '(',
    close_bracket: ')',
    has_subtitle_column: false,
    url_host_prefix: None,
    fold_title_case: true,
    normalize_uris: false,
    bare_span: BareSpanRule::UniqueMention,
    piped_span: PipedSpanRule::TitleMention,
};
