//! Shared constants for the conversion core
//!
//! This module contains the pattern sources, defaults, and datetime formats
//! used throughout the reading engine and the field-access layer.

// =============================================================================
// Line Patterns
// =============================================================================

/// Pattern matching lines that are effectively blank (empty or whitespace-only)
pub const WHITESPACE_ONLY_PATTERN: &str = r"^\s*$";

// =============================================================================
// CSV Block Defaults
// =============================================================================

/// Default cell separator for delimited instrument exports
pub const DEFAULT_SEPARATOR: u8 = b',';

/// Label prefix given to blank column headers ("unnamed_0", "unnamed_1", ...)
pub const UNNAMED_COLUMN_PREFIX: &str = "unnamed_";

// =============================================================================
// Datetime Formats
// =============================================================================

/// Instrument timestamp format carrying an explicit UTC offset
pub const DATETIME_FORMAT_WITH_OFFSET: &str = "%Y-%m-%d %H:%M:%S %z";

/// Instrument timestamp format without an offset (interpreted as UTC)
pub const DATETIME_FORMAT_NAIVE: &str = "%Y-%m-%d %H:%M:%S";

// =============================================================================
// Environment Flags
// =============================================================================

/// Environment variable enabling unread-key warnings on accessor drop
pub const WARN_UNREAD_KEYS_ENV: &str = "ASM_WARN_UNREAD_KEYS";
