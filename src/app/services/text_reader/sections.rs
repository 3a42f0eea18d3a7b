//! Iteration over titled or pattern-delimited file sections
//!
//! Many instrument exports repeat one layout per logical unit: one `[Plate]`
//! block per plate, one `[Results]`/`[Raw Data]` pair per run. Section
//! iteration carves the buffer at each delimiter match and hands every
//! section to the caller as an independent sub-reader, so the same section
//! parser can run against each one.
//!
//! The iterator is agnostic to cardinality. Callers that require exactly one
//! section, or at least one, enforce that themselves and raise a
//! format-specific conversion error.

use regex::Regex;
use tracing::debug;

use super::lines::LinesReader;

/// One delimited section of an export file
///
/// `title` is the delimiter line that opened the section; `body` holds the
/// lines strictly between that delimiter and the next one (or the end of the
/// file), in original order.
#[derive(Debug, Clone)]
pub struct Section {
    pub title: String,
    pub body: LinesReader,
}

/// Iterator produced by [`LinesReader::iter_sections`]
pub struct Sections<'r> {
    reader: &'r mut LinesReader,
    title_pattern: &'r Regex,
}

impl Iterator for Sections<'_> {
    type Item = Section;

    fn next(&mut self) -> Option<Section> {
        self.reader.drop_until(self.title_pattern)?;
        let title = self.reader.pop()?;
        let body: Vec<String> = self.reader.pop_until(self.title_pattern).collect();
        debug!(title = %title, lines = body.len(), "captured section");
        Some(Section {
            title,
            body: LinesReader::new(body),
        })
    }
}

impl LinesReader {
    /// Iterate the remaining buffer as delimited sections.
    ///
    /// Yields one [`Section`] per line matching `title_pattern`, consuming
    /// the buffer as it goes. Content before the first delimiter is skipped.
    pub fn iter_sections<'r>(&'r mut self, title_pattern: &'r Regex) -> Sections<'r> {
        Sections {
            reader: self,
            title_pattern,
        }
    }
}
