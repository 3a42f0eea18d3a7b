//! ASM Converter Library
//!
//! A Rust library for converting heterogeneous laboratory-instrument output
//! files (delimited text, fixed-width sections, spreadsheet exports) into the
//! Allotrope Simple Model (ASM) canonical form.
//!
//! This library provides the format-independent core that every instrument
//! parser builds on:
//! - Decoding raw export bytes with charset auto-detection
//! - A forward-only line cursor with pattern-driven navigation
//! - Splitting files into titled or pattern-delimited sections
//! - Extracting delimited text blocks into named-column tables, with
//!   recovery for ragged rows produced by some instrument software
//! - Read-tracking field access over rows and JSON documents, so vendor
//!   fields that were never consulted can be surfaced instead of dropped
//!
//! Vendor-specific parsers and the ASM schema mapping/serialization layer
//! sit on top of this crate and are not part of it.

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod services {
        pub mod field_access;
        pub mod text_reader;
    }
}

// Re-export commonly used types
pub use app::services::field_access::{JsonData, SeriesData, UnreadData};
pub use app::services::text_reader::{
    CsvBlockOptions, HeaderPolicy, LinesReader, Section, TabularBlock,
};

/// Result type alias for the ASM converter
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for instrument file conversion
///
/// The taxonomy is deliberately small: `Conversion` covers problems an end
/// user can correct in their export settings (missing sections, absent
/// required fields, values that fail type conversion), while `Parsing` wraps
/// lower-level tabular or encoding failures with context. Programmer misuse
/// (contract violations) is not modeled here and propagates as panics.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Input data failed a structural or field-level requirement
    #[error("Conversion error: {message}")]
    Conversion { message: String },

    /// Lower-level parsing error with context
    #[error("Parsing error in {context}: {message}")]
    Parsing {
        context: String,
        message: String,
        #[source]
        source: Option<csv::Error>,
    },
}

impl Error {
    /// Create a conversion error with a user-facing message
    pub fn conversion(message: impl Into<String>) -> Self {
        Self::Conversion {
            message: message.into(),
        }
    }

    /// Create a parsing error with context
    pub fn parsing(
        context: impl Into<String>,
        message: impl Into<String>,
        source: Option<csv::Error>,
    ) -> Self {
        Self::Parsing {
            context: context.into(),
            message: message.into(),
            source,
        }
    }

    /// Create the standard "required value is missing" conversion error
    pub fn expected_value(what: &str) -> Self {
        Self::Conversion {
            message: format!("Expected non-null value for '{what}'"),
        }
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Self::Parsing {
            context: "csv block".to_string(),
            message: "CSV parsing failed".to_string(),
            source: Some(error),
        }
    }
}

/// Convert an absent value into a [`Error::Conversion`].
///
/// Reader and accessor primitives are silent on "not found" so that optional
/// sections and fields cost nothing at the call site; callers that require
/// presence opt into strictness with this helper:
///
/// ```rust
/// use asm_converter::{LinesReader, assert_not_none};
/// use regex::Regex;
///
/// # fn example() -> asm_converter::Result<()> {
/// let mut reader = LinesReader::new(vec!["[Results]".to_string()]);
/// let pattern = Regex::new(r"^\[Results\]").unwrap();
/// let line = assert_not_none(reader.drop_until(&pattern), "[Results] section")?;
/// # Ok(())
/// # }
/// ```
pub fn assert_not_none<T>(value: Option<T>, what: &str) -> Result<T> {
    value.ok_or_else(|| Error::expected_value(what))
}
