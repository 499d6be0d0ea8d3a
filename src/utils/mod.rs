//! Common utilities and helper functions
//!
//! This module provides shared text helpers used across the pipeline.

use regex::Regex;
use std::io::{self, BufRead};
use std::string::FromUtf8Error;
use std::sync::OnceLock;
use std::time::Instant;

/// Remove every whitespace character except tabs, which delimit fields
pub fn strip_whitespace_keep_tabs(text: &str) -> String {
    static WHITESPACE_RE: OnceLock<Regex> = OnceLock::new();

    let re = WHITESPACE_RE.get_or_init(|| Regex::new(r"[^\S\t]+").expect("Invalid regex pattern"));

    re.replace_all(text, "").into_owned()
}

/// Skip the first `count` characters, empty when the text is shorter
pub fn skip_chars(text: &str, count: usize) -> &str {
    match text.char_indices().nth(count) {
        Some((idx, _)) => &text[idx..],
        None => "",
    }
}

/// Truncate text to a maximum number of characters for log previews
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{truncated}...")
    }
}

/// Iterate the lines of `reader`, decoding each one separately.
///
/// The outer `Err` is a read failure; the inner one is a line that is not
/// valid UTF-8. Line terminators (`\n` or `\r\n`) are removed.
pub fn utf8_lines<R: BufRead>(reader: R) -> Utf8Lines<R> {
    Utf8Lines {
        reader,
        buf: Vec::new(),
    }
}

/// Iterator returned by [`utf8_lines`]
pub struct Utf8Lines<R> {
    reader: R,
    buf: Vec<u8>,
}

impl<R: BufRead> Iterator for Utf8Lines<R> {
    type Item = io::Result<Result<String, FromUtf8Error>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                if self.buf.last() == Some(&b'\n') {
                    self.buf.pop();
                    if self.buf.last() == Some(&b'\r') {
                        self.buf.pop();
                    }
                }
                Some(Ok(String::from_utf8(std::mem::take(&mut self.buf))))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

/// Periodic progress reporting for long batch passes
pub struct Progress {
    interval: usize,
    started: Instant,
    batch_started: Instant,
}

impl Progress {
    pub fn new(interval: usize) -> Self {
        let now = Instant::now();
        Self {
            interval: interval.max(1),
            started: now,
            batch_started: now,
        }
    }

    /// Log a progress record when `lines` reaches a multiple of the interval
    pub fn tick(&mut self, lines: usize, stage: &str) {
        if lines % self.interval != 0 {
            return;
        }
        tracing::info!(
            stage,
            lines,
            batch_secs = self.batch_started.elapsed().as_secs_f64(),
            total_secs = self.started.elapsed().as_secs_f64(),
            "Progress"
        );
        self.batch_started = Instant::now();
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }
}
