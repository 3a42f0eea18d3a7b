//! Test utilities for the text reading engine
//!
//! Shared helpers for building readers and compiled patterns used across the
//! reader test modules.

use regex::Regex;

use super::lines::LinesReader;

// Test modules
mod csv_block_tests;

/// Build a reader from string literals
pub fn reader(lines: &[&str]) -> LinesReader {
    LinesReader::new(lines.iter().map(|line| line.to_string()).collect())
}

/// Compile a pattern, panicking on bad test input
pub fn pattern(source: &str) -> Regex {
    Regex::new(source).unwrap()
}
