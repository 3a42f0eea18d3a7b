//! Byte decoding and the forward-only line cursor
//!
//! This module decodes raw export bytes into lines and provides the cursor
//! primitives every format parser is built from: peeking, popping, and
//! pattern-driven skipping. The cursor only moves forward; a parse pass
//! reads each line at most once.

use std::sync::LazyLock;

use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use regex::Regex;
use tracing::{debug, warn};

use crate::constants::WHITESPACE_ONLY_PATTERN;
use crate::{Error, Result};

/// Shared pattern matching effectively blank lines
pub static EMPTY_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(WHITESPACE_ONLY_PATTERN).unwrap());

/// Decode raw export bytes into text.
///
/// When `encoding` names a charset it is resolved via its WHATWG label
/// ("utf-8", "windows-1252", "utf-16le", ...). Otherwise the charset is
/// auto-detected: a byte-order mark wins outright, then statistical
/// detection over the content decides. Empty input is a conversion error
/// because there is nothing to detect a charset from.
pub fn decode_bytes(bytes: &[u8], encoding: Option<&str>) -> Result<String> {
    if bytes.is_empty() {
        return Err(Error::conversion(
            "Unable to detect text encoding of empty input",
        ));
    }

    let encoding = match encoding {
        Some(label) => Encoding::for_label(label.as_bytes())
            .ok_or_else(|| Error::conversion(format!("Unknown text encoding '{label}'")))?,
        None => detect_encoding(bytes),
    };

    // decode() honors a BOM even when it disagrees with the chosen encoding
    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        warn!(
            encoding = used.name(),
            "malformed byte sequences replaced during decoding"
        );
    }
    debug!(encoding = used.name(), bytes = bytes.len(), "decoded input");

    Ok(text.into_owned())
}

fn detect_encoding(bytes: &[u8]) -> &'static Encoding {
    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    detector.guess(None, true)
}

/// Forward-only cursor over the lines of a decoded instrument export
///
/// The line sequence is fixed at construction; only the cursor moves, and it
/// never moves backwards. Operations that look for a line (`drop_until`,
/// `pop_if_match`) return `None` rather than failing, so optional sections
/// cost nothing at the call site.
#[derive(Debug, Clone)]
pub struct LinesReader {
    lines: Vec<String>,
    current_line: usize,
}

impl LinesReader {
    /// Create a reader over an already-split line sequence
    pub fn new(lines: Vec<String>) -> Self {
        Self {
            lines,
            current_line: 0,
        }
    }

    /// Decode bytes and split into lines, normalizing `\r\n` line endings
    pub fn from_bytes(bytes: &[u8], encoding: Option<&str>) -> Result<Self> {
        let text = decode_bytes(bytes, encoding)?;
        let lines = text
            .replace("\r\n", "\n")
            .split('\n')
            .map(str::to_string)
            .collect();
        Ok(Self::new(lines))
    }

    /// Total number of lines in the underlying buffer
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Current cursor position, `0..=line_count()`
    pub(crate) fn cursor(&self) -> usize {
        self.current_line
    }

    /// The line at the cursor, or `None` past the end
    pub fn get(&self) -> Option<&str> {
        self.lines.get(self.current_line).map(String::as_str)
    }

    /// Whether `pattern` matches anywhere in the current line
    pub fn is_match(&self, pattern: &Regex) -> bool {
        self.get().is_some_and(|line| pattern.is_match(line))
    }

    /// Whether the current line is effectively blank
    pub fn is_empty(&self) -> bool {
        self.is_match(&EMPTY_LINE)
    }

    /// Whether the current line matches a custom "blank" pattern
    pub fn is_empty_match(&self, empty: &Regex) -> bool {
        self.is_match(empty)
    }

    /// Return the current line and advance; `None` past the end
    pub fn pop(&mut self) -> Option<String> {
        let line = self.lines.get(self.current_line).cloned();
        if line.is_some() {
            self.current_line += 1;
        }
        line
    }

    /// Return and consume the current line only if it matches
    pub fn pop_if_match(&mut self, pattern: &Regex) -> Option<String> {
        if self.is_match(pattern) { self.pop() } else { None }
    }

    /// Advance until a line matches `pattern`, without consuming it.
    ///
    /// Returns the matching line, or `None` when the buffer is exhausted.
    pub fn drop_until(&mut self, pattern: &Regex) -> Option<String> {
        while let Some(line) = self.get() {
            if pattern.is_match(line) {
                return Some(line.to_string());
            }
            self.current_line += 1;
        }
        None
    }

    /// Advance until a line matches `pattern` and consume it too
    pub fn drop_until_inclusive(&mut self, pattern: &Regex) -> Option<String> {
        let line = self.drop_until(pattern);
        if line.is_some() {
            self.current_line += 1;
        }
        line
    }

    /// Skip all consecutive blank lines at the cursor
    pub fn drop_empty(&mut self) {
        self.drop_empty_match(&EMPTY_LINE);
    }

    /// Skip all consecutive lines matching a custom "blank" pattern
    pub fn drop_empty_match(&mut self, empty: &Regex) {
        while self.is_match(empty) {
            self.current_line += 1;
        }
    }

    /// Advance to the next blank line, without consuming it
    pub fn drop_until_empty(&mut self) -> Option<String> {
        self.drop_until(&EMPTY_LINE)
    }

    /// Advance to the next line matching a custom "blank" pattern
    pub fn drop_until_empty_match(&mut self, empty: &Regex) -> Option<String> {
        self.drop_until(empty)
    }

    /// Lazily yield and consume lines until one matches `pattern`.
    ///
    /// Stops (without consuming the match) at the first matching line or at
    /// the end of the buffer. The iterator shares the reader's cursor, so
    /// partially consuming it leaves the cursor where iteration stopped.
    pub fn pop_until<'r>(
        &'r mut self,
        pattern: &'r Regex,
    ) -> impl Iterator<Item = String> + 'r {
        std::iter::from_fn(move || {
            let stop = match self.get() {
                Some(line) => pattern.is_match(line),
                None => return None,
            };
            if stop { None } else { self.pop() }
        })
    }

    /// Lazily yield and consume lines until the next blank line
    pub fn pop_until_empty(&mut self) -> impl Iterator<Item = String> + '_ {
        self.pop_until(&EMPTY_LINE)
    }

    /// Lazily yield and consume lines until one matches a custom "blank" pattern
    pub fn pop_until_empty_match<'r>(
        &'r mut self,
        empty: &'r Regex,
    ) -> impl Iterator<Item = String> + 'r {
        self.pop_until(empty)
    }
}
