//! Raw corpus → refined corpus → annotation-refined corpus

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::string::FromUtf8Error;

use super::error::{CorpusError, CorpusResult};
use super::stats::RefineStats;
use crate::annotation::{is_annotation_valid, AnnotationResolver};
use crate::dictionary::EntityDictionary;
use crate::models::{SourcePolicy, BODY_MARKER_SEPARATOR, FIELD_SEPARATOR};
use crate::utils::{skip_chars, strip_whitespace_keep_tabs, truncate_text, utf8_lines, Progress};

/// Characters of a failing line echoed into the log
const LOG_PREVIEW_CHARS: usize = 80;

/// One refined corpus line: `entityId \t\t body`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefinedLine {
    pub entity_id: String,
    pub body: String,
}

impl RefinedLine {
    /// Parse a refined corpus line
    pub fn parse(line: &str) -> CorpusResult<Self> {
        let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
        match fields.as_slice() {
            [entity_id, body] => Ok(Self {
                entity_id: entity_id.to_string(),
                body: body.to_string(),
            }),
            _ => Err(CorpusError::malformed(2, fields.len())),
        }
    }

    /// Serialized form, without the trailing newline
    pub fn to_line(&self) -> String {
        format!("{}{FIELD_SEPARATOR}{}", self.entity_id, self.body)
    }
}

/// Corpus refiner bound to one source's dictionary
pub struct CorpusRefiner<'d> {
    dictionary: &'d EntityDictionary,
    policy: &'static SourcePolicy,
    progress_interval: usize,
}

impl<'d> CorpusRefiner<'d> {
    /// Default lines between progress log records
    pub const DEFAULT_PROGRESS_INTERVAL: usize = 100_000;

    pub fn new(dictionary: &'d EntityDictionary) -> Self {
        Self {
            dictionary,
            policy: dictionary.source().policy(),
            progress_interval: Self::DEFAULT_PROGRESS_INTERVAL,
        }
    }

    /// Set lines between progress log records
    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval;
        self
    }

    /// Full title used for resolution
    fn full_title(&self, title: &str, sub_title: &str) -> String {
        let sub_chars = sub_title.chars().count();
        if !self.policy.has_subtitle_column || sub_chars <= 1 {
            return title.to_string();
        }

        let inner: String = sub_title.chars().skip(1).take(sub_chars - 2).collect();
        format!(
            "{title}{}{inner}{}",
            self.policy.open_bracket, self.policy.close_bracket
        )
    }

    /// Refine one raw corpus line into `entityId \t\t body`
    pub fn refine_line(&self, raw_line: &str) -> CorpusResult<RefinedLine> {
        let raw_line = raw_line.trim_end_matches(['\n', '\r']);
        let line = if self.policy.strip_whitespace {
            strip_whitespace_keep_tabs(raw_line)
        } else {
            raw_line.to_string()
        };

        let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
        if fields.len() != self.policy.raw_corpus_fields {
            return Err(CorpusError::malformed(
                self.policy.raw_corpus_fields,
                fields.len(),
            ));
        }

        let (title, sub_title, url, body) = if self.policy.has_subtitle_column {
            (fields[0], fields[1], fields[2], fields[3])
        } else {
            (fields[0], "", fields[1], fields[2])
        };

        if !is_annotation_valid(body) {
            return Err(CorpusError::InvalidAnnotation);
        }

        let full_title = self.full_title(title.trim(), sub_title.trim());
        let entity = match self.policy.url_host_prefix {
            Some(prefix) => {
                let uri = skip_chars(url, prefix.chars().count());
                self.dictionary.get_by_uri_and_title(uri, &full_title)
            }
            None => self.dictionary.get_by_full_title(&full_title),
        }
        .ok_or_else(|| CorpusError::unresolved(full_title.as_str()))?;

        let (_marker, text) = body
            .split_once(BODY_MARKER_SEPARATOR)
            .ok_or(CorpusError::MissingMarker)?;

        Ok(RefinedLine {
            entity_id: entity.id.clone(),
            body: text.to_string(),
        })
    }

    /// Refine every line of `reader` into `writer`.
    ///
    /// Per-line failures are counted and logged; only I/O errors abort.
    pub fn refine<R: BufRead, W: Write>(&self, reader: R, mut writer: W) -> CorpusResult<RefineStats> {
        let mut stats = RefineStats::new();
        let mut progress = Progress::new(self.progress_interval);

        tracing::info!(source = %self.policy.source, "Refining corpus");

        for decoded in utf8_lines(reader) {
            let line = match decoded? {
                Ok(line) => line,
                Err(e) => {
                    skip_undecodable(&mut stats, e);
                    progress.tick(stats.total, "refine");
                    continue;
                }
            };

            match self.refine_line(&line) {
                Ok(refined) => {
                    writeln!(writer, "{}", refined.to_line())?;
                    stats.record_written();
                }
                Err(e) => {
                    if e.counts_as_error() {
                        tracing::warn!(
                            line_no = stats.total + 1,
                            error = %e,
                            line = %truncate_text(&line, LOG_PREVIEW_CHARS),
                            "Skipping corpus line"
                        );
                    } else {
                        tracing::debug!(line_no = stats.total + 1, error = %e, "Unresolved corpus line");
                    }
                    stats.record_failure(&e);
                }
            }

            progress.tick(stats.total, "refine");
        }

        writer.flush()?;
        stats.duration_ms = progress.elapsed_ms();

        tracing::info!(
            source = %self.policy.source,
            total = stats.total,
            written = stats.written,
            error_lines = stats.error_lines(),
            unresolved = stats.unresolved,
            duration_ms = stats.duration_ms,
            "Corpus refined"
        );

        Ok(stats)
    }

    /// Re-resolve the annotations of every refined line of `reader`.
    ///
    /// Output lines are `entityId \t\t reannotatedBody` with the body trimmed.
    pub fn annotate<R: BufRead, W: Write>(
        &self,
        reader: R,
        mut writer: W,
    ) -> CorpusResult<RefineStats> {
        let resolver = AnnotationResolver::new(self.dictionary);
        let mut stats = RefineStats::new();
        let mut progress = Progress::new(self.progress_interval);

        tracing::info!(source = %self.policy.source, "Refining corpus annotations");

        for decoded in utf8_lines(reader) {
            let line = match decoded? {
                Ok(line) => line,
                Err(e) => {
                    skip_undecodable(&mut stats, e);
                    progress.tick(stats.total, "annotate");
                    continue;
                }
            };

            match RefinedLine::parse(&line) {
                Ok(refined) => {
                    let document = resolver.parse_and_resolve(&refined.body);
                    let output = RefinedLine {
                        entity_id: refined.entity_id,
                        body: document.annotated_text.trim().to_string(),
                    };
                    writeln!(writer, "{}", output.to_line())?;
                    stats.record_written();
                }
                Err(e) => {
                    tracing::warn!(
                        line_no = stats.total + 1,
                        error = %e,
                        line = %truncate_text(&line, LOG_PREVIEW_CHARS),
                        "Skipping refined line"
                    );
                    stats.record_failure(&e);
                }
            }

            progress.tick(stats.total, "annotate");
        }

        writer.flush()?;
        stats.duration_ms = progress.elapsed_ms();

        tracing::info!(
            source = %self.policy.source,
            total = stats.total,
            written = stats.written,
            error_lines = stats.error_lines(),
            duration_ms = stats.duration_ms,
            "Corpus annotations refined"
        );

        Ok(stats)
    }
}

fn open_io(input: &Path, output: &Path) -> CorpusResult<(BufReader<File>, BufWriter<File>)> {
    let reader = BufReader::new(File::open(input)?);
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let writer = BufWriter::new(File::create(output)?);
    Ok((reader, writer))
}

fn skip_undecodable(stats: &mut RefineStats, error: FromUtf8Error) {
    let error = CorpusError::from(error);
    tracing::warn!(line_no = stats.total + 1, error = %error, "Skipping undecodable line");
    stats.record_failure(&error);
}

/// Refine a raw corpus file into a refined corpus file
pub fn corpus_refine(
    dictionary: &EntityDictionary,
    input: &Path,
    output: &Path,
    progress_interval: usize,
) -> CorpusResult<RefineStats> {
    let (reader, writer) = open_io(input, output)?;
    CorpusRefiner::new(dictionary)
        .with_progress_interval(progress_interval)
        .refine(reader, writer)
}

/// Re-resolve the annotations of a refined corpus file
pub fn corpus_annotation_refine(
    dictionary: &EntityDictionary,
    input: &Path,
    output: &Path,
    progress_interval: usize,
) -> CorpusResult<RefineStats> {
    let (reader, writer) = open_io(input, output)?;
    CorpusRefiner::new(dictionary)
        .with_progress_interval(progress_interval)
        .annotate(reader, writer)
}
