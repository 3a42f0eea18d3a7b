//! Typed conversion from raw instrument field values
//!
//! Instrument software writes numbers the way its locale and UI felt like
//! writing them: `"25%"`, `"10,0"`, `"1e-3"`, booleans as `yes`/`no`.
//! [`FromField`] centralizes the tolerant conversions so every parser reads
//! fields the same way.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::constants::{DATETIME_FORMAT_NAIVE, DATETIME_FORMAT_WITH_OFFSET};

/// Conversion from a raw field value to a typed one.
///
/// `None` means the value was rejected; the accessor then falls through to
/// the next candidate key or to the caller's default handling.
pub trait FromField: Sized {
    fn from_field(raw: &str) -> Option<Self>;
}

impl FromField for String {
    fn from_field(raw: &str) -> Option<Self> {
        Some(raw.trim().to_string())
    }
}

impl FromField for bool {
    fn from_field(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        }
    }
}

impl FromField for i64 {
    fn from_field(raw: &str) -> Option<Self> {
        raw.trim().parse().ok()
    }
}

impl FromField for u64 {
    fn from_field(raw: &str) -> Option<Self> {
        raw.trim().parse().ok()
    }
}

impl FromField for f64 {
    fn from_field(raw: &str) -> Option<Self> {
        let mut value = raw.trim();
        if let Some(stripped) = value.strip_suffix('%') {
            value = stripped.trim_end();
        }
        // single comma with no dot is a decimal separator ("10,0")
        let normalized;
        if value.matches(',').count() == 1 && !value.contains('.') {
            normalized = value.replace(',', ".");
            value = &normalized;
        }
        value.parse().ok()
    }
}

impl FromField for DateTime<Utc> {
    fn from_field(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if let Ok(with_offset) = DateTime::parse_from_str(raw, DATETIME_FORMAT_WITH_OFFSET) {
            return Some(with_offset.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, DATETIME_FORMAT_NAIVE)
            .ok()
            .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
    }
}

/// One key, or an ordered list of fallback keys.
///
/// Vendors rename columns between software versions; a lookup takes either a
/// single key (`"Wavelength"`) or candidates in preference order
/// (`["Wavelength", "Wavelength [nm]"]`) and uses the first one holding an
/// acceptable value.
pub trait FieldKeys {
    /// Candidate keys in preference order
    fn candidates(&self) -> impl Iterator<Item = &str>;

    /// Rendering of the candidates for error messages
    fn describe(&self) -> String;
}

impl FieldKeys for &str {
    fn candidates(&self) -> impl Iterator<Item = &str> {
        std::iter::once(*self)
    }

    fn describe(&self) -> String {
        (*self).to_string()
    }
}

impl FieldKeys for &[&str] {
    fn candidates(&self) -> impl Iterator<Item = &str> {
        self.iter().copied()
    }

    fn describe(&self) -> String {
        self.join("' or '")
    }
}

impl<const N: usize> FieldKeys for [&str; N] {
    fn candidates(&self) -> impl Iterator<Item = &str> {
        self.iter().copied()
    }

    fn describe(&self) -> String {
        self.join("' or '")
    }
}
