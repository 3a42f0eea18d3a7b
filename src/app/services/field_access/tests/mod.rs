//! Test utilities for the field-access layer

use super::json_data::JsonData;
use super::series_data::SeriesData;


/// Build a row accessor from literal pairs
pub fn series(pairs: &[(&str, &str)]) -> SeriesData {
    SeriesData::from_pairs(
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string())),
    )
}

/// Parse a JSON document into an accessor, panicking on bad test input
pub fn json(text: &str) -> JsonData {
    JsonData::from_str(text).unwrap()
}
