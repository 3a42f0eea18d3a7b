//! Read-tracking accessor over one tabular row
//!
//! Wraps the cells of a single [`TabularBlock`](crate::TabularBlock) row as
//! a column-name → raw-value mapping. Every lookup records the key it
//! consulted; whatever remains unread when mapping finishes can be surfaced
//! through [`SeriesData::get_unread`] instead of being discarded.
//!
//! Whitespace-only cells are treated as absent, the same rule the optional
//! field helpers of delimited-export parsers have always used.

use std::collections::{BTreeMap, HashSet};

use serde_json::Value;

use super::UnreadData;
use super::convert::{FieldKeys, FromField};
use crate::{Error, Result};

/// Typed, read-tracked access to one row of tabular data
#[derive(Debug, Clone)]
pub struct SeriesData {
    values: BTreeMap<String, String>,
    read_keys: HashSet<String>,
}

impl SeriesData {
    /// Wrap one row; `columns` and `cells` pair up positionally
    pub fn new(columns: &[String], cells: &[String]) -> Self {
        let values = columns
            .iter()
            .cloned()
            .zip(cells.iter().cloned())
            .collect();
        Self {
            values,
            read_keys: HashSet::new(),
        }
    }

    /// Build directly from key/value pairs
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            values: pairs.into_iter().collect(),
            read_keys: HashSet::new(),
        }
    }

    /// Raw value for `key`, with whitespace-only cells treated as absent
    fn raw(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }

    /// Whether the row has a column named `key`; does not mark it read
    pub fn has_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Whether `key` has been consulted by any lookup
    pub fn was_read(&self, key: &str) -> bool {
        self.read_keys.contains(key)
    }

    /// Look up the first acceptable candidate key and convert it.
    ///
    /// Returns `None` when no candidate is present, holds a non-empty value,
    /// and converts successfully.
    pub fn get_optional<T: FromField>(&mut self, keys: impl FieldKeys) -> Option<T> {
        self.get_optional_validated(keys, |_| true)
    }

    /// Like [`Self::get_optional`], but values failing `validate` are
    /// treated as absent (e.g. rejecting NaN placeholders)
    pub fn get_optional_validated<T: FromField>(
        &mut self,
        keys: impl FieldKeys,
        validate: impl Fn(&T) -> bool,
    ) -> Option<T> {
        for key in keys.candidates() {
            if !self.values.contains_key(key) {
                continue;
            }
            // consulted counts as read, even if conversion fails below
            self.read_keys.insert(key.to_string());
            let Some(raw) = self.raw(key) else {
                continue;
            };
            if let Some(value) = T::from_field(raw) {
                if validate(&value) {
                    return Some(value);
                }
            }
        }
        None
    }

    /// Required lookup; absence or rejection is a conversion error naming
    /// the candidate keys
    pub fn get_required<T: FromField>(&mut self, keys: impl FieldKeys) -> Result<T> {
        let description = keys.describe();
        self.get_optional(keys)
            .ok_or_else(|| Error::expected_value(&description))
    }

    /// Required lookup with a caller-supplied error message
    pub fn get_required_or<T: FromField>(
        &mut self,
        keys: impl FieldKeys,
        message: &str,
    ) -> Result<T> {
        self.get_optional(keys)
            .ok_or_else(|| Error::conversion(message))
    }

    /// Return all never-read, non-empty cells and mark them read.
    ///
    /// Calling this twice in a row yields an empty map the second time:
    /// surfacing a field counts as consuming it.
    pub fn get_unread(&mut self) -> UnreadData {
        let mut unread = UnreadData::new();
        for (key, value) in &self.values {
            if !self.read_keys.contains(key) && !value.trim().is_empty() {
                unread.insert(key.clone(), Value::String(value.clone()));
            }
        }
        for key in unread.keys() {
            self.read_keys.insert(key.clone());
        }
        unread
    }
}
