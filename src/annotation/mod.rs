//! Annotation parsing and re-resolution
//!
//! Annotated text interleaves plain prose with `[[A]]` / `[[A|B]]` spans.
//! This module provides:
//! - bracket validation ([`is_annotation_valid`])
//! - dictionary-backed re-resolution into canonical `[[id|mention]]` spans
//!   ([`AnnotationResolver`])
//! - a fast path for text that already carries entity ids ([`extract_plain`])
//!
//! Offsets are character offsets into the reconstructed plain text; markup
//! never contributes to them.

pub mod title;

pub use title::split_title;

use serde::{Deserialize, Serialize};

use crate::corpus::error::{CorpusError, CorpusResult};
use crate::dictionary::{uri, Entity, EntityDictionary};
use crate::models::{BareSpanRule, PipedSpanRule, SourcePolicy};

const OPEN: &str = "[[";
const CLOSE: &str = "]]";

/// A resolved mention inside a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentionSpan {
    /// Surface text
    pub mention: String,

    /// Target entity id
    pub entity_id: String,

    /// Character offset of the mention in the plain text
    pub offset: usize,
}

impl MentionSpan {
    pub fn new(mention: impl Into<String>, entity_id: impl Into<String>, offset: usize) -> Self {
        Self {
            mention: mention.into(),
            entity_id: entity_id.into(),
            offset,
        }
    }
}

/// Output of [`AnnotationResolver::parse_and_resolve`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedDocument {
    /// Text with all markup removed
    pub plain_text: String,

    /// Text with resolved spans rewritten as `[[id|mention]]`
    pub annotated_text: String,

    /// Resolved mentions in document order
    pub mentions: Vec<MentionSpan>,
}

/// Check bracket structure: balanced, never nested, fully closed.
///
/// `[[` and `]]` are consumed as two-character tokens.
pub fn is_annotation_valid(text: &str) -> bool {
    let bytes = text.as_bytes();
    let mut depth: i32 = 0;
    let mut i = 0;

    while i < bytes.len() {
        if i + 1 < bytes.len() && bytes[i] == b'[' && bytes[i + 1] == b'[' {
            depth += 1;
            if depth > 1 {
                return false;
            }
            i += 2;
            continue;
        }
        if i + 1 < bytes.len() && bytes[i] == b']' && bytes[i + 1] == b']' {
            depth -= 1;
            if depth < 0 {
                return false;
            }
            i += 2;
            continue;
        }
        i += 1;
    }

    depth == 0
}

/// [`is_annotation_valid`] as a `Result`
pub fn validate_annotation(text: &str) -> CorpusResult<()> {
    if is_annotation_valid(text) {
        Ok(())
    } else {
        Err(CorpusError::InvalidAnnotation)
    }
}

/// Split one `[[` segment into the annotation body and trailing plain text
fn split_segment(segment: &str) -> (&str, Option<&str>) {
    match segment.split_once(CLOSE) {
        Some((body, trailing)) => (body, Some(trailing)),
        None => (segment, None),
    }
}

/// Accumulates plain text while tracking its length in characters
#[derive(Default)]
struct PlainText {
    text: String,
    chars: usize,
}

impl PlainText {
    fn push(&mut self, s: &str) {
        self.text.push_str(s);
        self.chars += s.chars().count();
    }
}

/// Extract mentions from text whose spans already carry entity ids.
///
/// Every span must be `[[id|mention]]`; the right-hand side is taken verbatim
/// and no dictionary lookup happens. A span without exactly one pipe is a
/// [`CorpusError::MalformedAnnotation`].
///
/// ```
/// use xlink::annotation::extract_plain;
///
/// let (mentions, plain) = extract_plain("A[[id1|B]]C[[id2|D]]E").unwrap();
/// assert_eq!(plain, "ABCDE");
/// assert_eq!(mentions[0].offset, 1);
/// assert_eq!(mentions[1].offset, 3);
/// ```
pub fn extract_plain(text: &str) -> CorpusResult<(Vec<MentionSpan>, String)> {
    let mut segments = text.split(OPEN);
    let head = segments.next().unwrap_or_default();

    let mut plain = PlainText::default();
    let mut mentions = Vec::new();
    plain.push(head);

    for segment in segments {
        let (body, trailing) = split_segment(segment);

        let mut parts = body.split('|');
        let (Some(entity_id), Some(mention), None) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(CorpusError::MalformedAnnotation {
                body: body.to_string(),
            });
        };

        mentions.push(MentionSpan::new(mention, entity_id, plain.chars));
        plain.push(mention);

        if let Some(trailing) = trailing {
            plain.push(trailing);
        }
    }

    Ok((mentions, plain.text))
}

/// Re-resolves annotation spans against one source's dictionary
pub struct AnnotationResolver<'d> {
    dictionary: &'d EntityDictionary,
    policy: &'static SourcePolicy,
}

impl<'d> AnnotationResolver<'d> {
    pub fn new(dictionary: &'d EntityDictionary) -> Self {
        Self {
            dictionary,
            policy: dictionary.source().policy(),
        }
    }

    /// Resolve one annotation body (the text between `[[` and `]]`).
    ///
    /// Returns the mention text and the entity it resolves to, or the error
    /// explaining why the span degrades to plain text.
    pub fn resolve_span<'b>(&self, body: &'b str) -> (&'b str, CorpusResult<&'d Entity>) {
        let mut parts = body.split('|');
        let first = parts.next().unwrap_or_default();

        match parts.next() {
            None => {
                let entity = match self.policy.bare_span {
                    BareSpanRule::Plain => Err(CorpusError::unresolved(first)),
                    BareSpanRule::UniqueMention => self.dictionary.resolve_mention(first),
                };
                (first, entity)
            }
            Some(mention) => {
                let entity = match self.policy.piped_span {
                    PipedSpanRule::TitleMention => self.dictionary.resolve_mention(first),
                    PipedSpanRule::UriMention => {
                        let decoded = uri::decode_uri(first);
                        let prefix =
                            uri::truncate_segments(&decoded, SourcePolicy::URI_SEGMENT_DEPTH);
                        self.dictionary
                            .get_by_uri(&prefix)
                            .ok_or_else(|| CorpusError::unresolved(prefix))
                    }
                };
                (mention, entity)
            }
        }
    }

    /// Re-segment `text`, rewriting resolvable spans as `[[id|mention]]` and
    /// degrading the rest to plain mention text.
    pub fn parse_and_resolve(&self, text: &str) -> ResolvedDocument {
        let mut segments = text.split(OPEN);
        let head = segments.next().unwrap_or_default();

        let mut plain = PlainText::default();
        let mut annotated = String::with_capacity(text.len());
        let mut mentions = Vec::new();

        plain.push(head);
        annotated.push_str(head);

        for segment in segments {
            let (body, trailing) = split_segment(segment);
            let (mention, entity) = self.resolve_span(body);

            match entity {
                Ok(entity) => {
                    annotated.push_str(&format!("{OPEN}{}|{mention}{CLOSE}", entity.id));
                    mentions.push(MentionSpan::new(mention, entity.id.clone(), plain.chars));
                }
                Err(e) => {
                    tracing::trace!(body = %body, reason = %e, "Annotation degraded to plain text");
                    annotated.push_str(mention);
                }
            }
            plain.push(mention);

            if let Some(trailing) = trailing {
                plain.push(trailing);
                annotated.push_str(trailing);
            }
        }

        ResolvedDocument {
            plain_text: plain.text,
            annotated_text: annotated,
            mentions,
        }
    }
}

/// Convenience wrapper around [`AnnotationResolver::parse_and_resolve`]
pub fn parse_and_resolve(dictionary: &EntityDictionary, text: &str) -> ResolvedDocument {
    AnnotationResolver::new(dictionary).parse_and_resolve(text)
}
