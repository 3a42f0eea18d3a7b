//! Extraction of delimited text blocks into named-column tables
//!
//! A "CSV block" is a contiguous run of delimited lines inside a larger
//! export, bounded by blank lines. Blocks are parsed into a string-valued
//! [`TabularBlock`] so that decimal values survive exactly as the instrument
//! wrote them; type conversion happens later, per field, in the accessor
//! layer.
//!
//! Some instrument software versions emit ragged blocks (rows with fewer or
//! more cells than the header). Parsing is therefore two-phase: a strict
//! pass first, and on failure a normalization pass that pads short rows and
//! truncates long ones to the header width.

use std::collections::HashMap;

use csv::{ReaderBuilder, WriterBuilder};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::lines::{EMPTY_LINE, LinesReader};
use crate::app::services::field_access::SeriesData;
use crate::constants::{DEFAULT_SEPARATOR, UNNAMED_COLUMN_PREFIX};
use crate::{Error, Result};

/// How the header of a CSV block is determined
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderPolicy {
    /// Use the given block row (0-based) as the header; earlier rows are skipped
    Row(usize),

    /// No header row; columns are named positionally ("0", "1", ...)
    Positional,
}

/// Parsing options for [`LinesReader::pop_csv_block_as_table`]
#[derive(Debug, Clone, Copy)]
pub struct CsvBlockOptions {
    /// Cell separator byte (`b','`, `b'\t'`, `b';'`, ...)
    pub separator: u8,

    /// Header determination policy
    pub header: HeaderPolicy,
}

impl Default for CsvBlockOptions {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR,
            header: HeaderPolicy::Row(0),
        }
    }
}

/// Block-level parsing statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockStats {
    /// Number of data rows in the parsed block
    pub rows_parsed: usize,

    /// Rows whose cell count was padded or truncated to the header width
    pub rows_normalized: usize,

    /// Recoverable parse errors encountered along the way
    pub errors: Vec<String>,
}

impl BlockStats {
    pub fn new() -> Self {
        Self {
            rows_parsed: 0,
            rows_normalized: 0,
            errors: Vec::new(),
        }
    }
}

impl Default for BlockStats {
    fn default() -> Self {
        Self::new()
    }
}

impl LinesReader {
    /// Collect the next contiguous block of non-blank lines, unparsed.
    ///
    /// Leading blank lines are skipped, lines are collected until the next
    /// blank line, and the trailing blank run is consumed from the reader.
    /// Used when a format needs pre-processing before tabular parsing.
    pub fn pop_csv_block_as_lines(&mut self) -> Vec<String> {
        self.pop_csv_block_as_lines_match(&EMPTY_LINE)
    }

    /// Like [`Self::pop_csv_block_as_lines`] with a custom "blank" pattern
    /// (e.g. `^,*$` for exports that pad blank rows with separators)
    pub fn pop_csv_block_as_lines_match(&mut self, empty: &Regex) -> Vec<String> {
        self.drop_empty_match(empty);
        let lines: Vec<String> = self.pop_until_empty_match(empty).collect();
        self.drop_empty_match(empty);
        lines
    }

    /// Parse the next contiguous block of lines into a table.
    ///
    /// An empty block is not an error: the result is `Ok(None)` and callers
    /// that require data raise their own conversion error.
    pub fn pop_csv_block_as_table(
        &mut self,
        options: &CsvBlockOptions,
    ) -> Result<Option<TabularBlock>> {
        let lines = self.pop_csv_block_as_lines();
        TabularBlock::parse(&lines, options)
    }
}

/// Rows × named columns extracted from a delimited text block
///
/// All cells are strings; numeric precision is preserved exactly as written
/// in the input. Rows are consumed by wrapping them in [`SeriesData`] for
/// typed, read-tracked field access.
#[derive(Debug, Clone)]
pub struct TabularBlock {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
    stats: BlockStats,
}

impl TabularBlock {
    /// Parse a collected block of lines into a table.
    ///
    /// Returns `Ok(None)` when `lines` is empty. Rows are conformed to the
    /// header width: short rows gain empty trailing cells, long rows are
    /// truncated. A strict parse runs first; a ragged block triggers one
    /// normalization retry before failing.
    pub fn parse(lines: &[String], options: &CsvBlockOptions) -> Result<Option<TabularBlock>> {
        if lines.is_empty() {
            return Ok(None);
        }

        let mut stats = BlockStats::new();

        let (header_line, data_lines): (Option<&String>, &[String]) = match options.header {
            HeaderPolicy::Row(index) => {
                if index >= lines.len() {
                    return Err(Error::conversion(format!(
                        "CSV block has {} lines, header row {} does not exist",
                        lines.len(),
                        index
                    )));
                }
                (Some(&lines[index]), &lines[index + 1..])
            }
            HeaderPolicy::Positional => (None, lines),
        };

        let text = data_lines.join("\n");
        let mut rows = if data_lines.is_empty() {
            Vec::new()
        } else {
            match parse_records(&text, options.separator, false) {
                Ok(rows) => rows,
                Err(strict_error) => {
                    warn!(
                        error = %strict_error,
                        "strict CSV parse failed, retrying with row normalization"
                    );
                    stats.errors.push(format!("strict parse: {strict_error}"));
                    parse_records(&text, options.separator, true).map_err(|source| {
                        Error::parsing(
                            "csv block",
                            "CSV parsing failed after row normalization",
                            Some(source),
                        )
                    })?
                }
            }
        };

        let columns = match header_line {
            Some(line) => normalize_headers(&split_record(line, options.separator)?),
            None => {
                let width = rows.iter().map(Vec::len).max().unwrap_or(0);
                (0..width).map(|index| index.to_string()).collect()
            }
        };

        if columns.is_empty() && rows.is_empty() {
            return Ok(None);
        }

        // Conform every row to the header width
        let width = columns.len();
        for row in &mut rows {
            if row.len() != width {
                stats.rows_normalized += 1;
                row.resize(width, String::new());
            }
        }
        stats.rows_parsed = rows.len();

        debug!(
            columns = columns.len(),
            rows = rows.len(),
            normalized = stats.rows_normalized,
            "parsed csv block"
        );

        Ok(Some(TabularBlock {
            columns,
            rows,
            stats,
        }))
    }

    /// Column names, in original order, after disambiguation
    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Raw cells of one row
    pub fn row(&self, index: usize) -> Option<&[String]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Wrap one row in a read-tracking accessor
    pub fn series(&self, index: usize) -> Option<SeriesData> {
        self.rows
            .get(index)
            .map(|row| SeriesData::new(&self.columns, row))
    }

    /// Iterate all rows as read-tracking accessors
    pub fn iter_series(&self) -> impl Iterator<Item = SeriesData> + '_ {
        self.rows
            .iter()
            .map(|row| SeriesData::new(&self.columns, row))
    }

    /// Statistics gathered while parsing this block
    pub fn stats(&self) -> &BlockStats {
        &self.stats
    }

    /// Re-serialize the table with the given separator, header row first
    pub fn to_csv_string(&self, separator: u8) -> Result<String> {
        let mut writer = WriterBuilder::new()
            .delimiter(separator)
            .from_writer(Vec::new());
        writer.write_record(&self.columns)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        let bytes = writer.into_inner().map_err(|error| {
            Error::parsing("csv block", format!("failed to flush CSV writer: {error}"), None)
        })?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Parse delimited text into rows of string cells
fn parse_records(
    text: &str,
    separator: u8,
    flexible: bool,
) -> std::result::Result<Vec<Vec<String>>, csv::Error> {
    let mut reader = ReaderBuilder::new()
        .delimiter(separator)
        .has_headers(false)
        .flexible(flexible)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

/// Split a single line into cells, respecting quoting
fn split_record(line: &str, separator: u8) -> Result<Vec<String>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(separator)
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes());

    match reader.records().next() {
        Some(record) => Ok(record?.iter().map(str::to_string).collect()),
        None => Ok(Vec::new()),
    }
}

/// Trim, name, and disambiguate raw header labels.
///
/// Blank labels become "unnamed_<index>"; repeated labels get a numeric
/// suffix ("temperature", "temperature_2", ...). Instruments that pivot a
/// header row or forward-fill blanks pre-process the block lines instead.
fn normalize_headers(raw: &[String]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut columns = Vec::with_capacity(raw.len());

    for (index, label) in raw.iter().enumerate() {
        let trimmed = label.trim();
        let base = if trimmed.is_empty() {
            let name = format!("{UNNAMED_COLUMN_PREFIX}{index}");
            debug!(index, name = %name, "blank column header renamed");
            name
        } else {
            trimmed.to_string()
        };

        let count = seen.entry(base.clone()).or_insert(0);
        *count += 1;
        if *count == 1 {
            columns.push(base);
        } else {
            let name = format!("{base}_{count}");
            debug!(original = %base, name = %name, "duplicate column header renamed");
            columns.push(name);
        }
    }

    columns
}
