//! Read-tracking accessor tree over one JSON document
//!
//! Wraps a `serde_json` object eagerly into a tagged tree: scalars stay
//! scalars, nested objects become nested [`JsonData`] accessors, and arrays
//! containing objects wrap each element. Arrays of plain values are tracked
//! as one scalar leaf, so a `"wavelengths": [450, 530]` round-trips whole
//! into custom info when nobody reads it.
//!
//! Scalar lookups share the [`SeriesData`](super::SeriesData) surface;
//! `get_node`/`get_node_list` descend the tree. `get_unread` surfaces the
//! still-unread scalars of one node, `get_unread_deep` the whole unread
//! subtree. As a debug aid, dropping a node with unread scalars logs a
//! warning when `ASM_WARN_UNREAD_KEYS` is set; drop order in Rust is
//! deterministic, so the warning fires at the end of the scope that owned
//! the accessor.

use std::collections::{BTreeMap, HashSet};

use serde_json::Value;
use tracing::warn;

use super::UnreadData;
use super::convert::{FieldKeys, FromField};
use crate::{Error, Result, config};

/// One tracked value inside a [`JsonData`] tree
#[derive(Debug, Clone)]
pub enum TrackedValue {
    /// A scalar leaf: string, number, bool, null, or an array of plain values
    Scalar(Value),

    /// A nested object, wrapped as its own accessor
    Node(JsonData),

    /// An array containing objects; each element wrapped individually
    List(Vec<TrackedValue>),
}

impl TrackedValue {
    fn wrap(value: Value) -> TrackedValue {
        match value {
            Value::Object(map) => TrackedValue::Node(JsonData::from_map(map)),
            Value::Array(items) if items.iter().any(Value::is_object) => {
                TrackedValue::List(items.into_iter().map(TrackedValue::wrap).collect())
            }
            other => TrackedValue::Scalar(other),
        }
    }
}

/// Typed, read-tracked access to one JSON object
#[derive(Debug, Clone)]
pub struct JsonData {
    entries: BTreeMap<String, TrackedValue>,
    read_keys: HashSet<String>,
}

impl JsonData {
    /// Wrap a parsed JSON value; anything but an object is a conversion error
    pub fn new(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self::from_map(map)),
            other => Err(Error::conversion(format!(
                "Expected a JSON object, got {}",
                json_type_name(&other)
            ))),
        }
    }

    /// Parse a JSON document and wrap its root object
    pub fn from_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)
            .map_err(|error| Error::parsing("json document", error.to_string(), None))?;
        Self::new(value)
    }

    fn from_map(map: serde_json::Map<String, Value>) -> Self {
        let entries = map
            .into_iter()
            .map(|(key, value)| (key, TrackedValue::wrap(value)))
            .collect();
        Self {
            entries,
            read_keys: HashSet::new(),
        }
    }

    /// Raw scalar value for `key`; null, containers, and whitespace-only
    /// strings are treated as absent
    fn raw(&self, key: &str) -> Option<String> {
        match self.entries.get(key)? {
            TrackedValue::Scalar(value) => scalar_to_raw(value),
            _ => None,
        }
    }

    /// Whether the object has an entry named `key`; does not mark it read
    pub fn has_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Whether `key` has been consulted by any lookup
    pub fn was_read(&self, key: &str) -> bool {
        self.read_keys.contains(key)
    }

    /// Look up the first acceptable candidate key and convert it
    pub fn get_optional<T: FromField>(&mut self, keys: impl FieldKeys) -> Option<T> {
        self.get_optional_validated(keys, |_| true)
    }

    /// Like [`Self::get_optional`], but values failing `validate` are
    /// treated as absent
    pub fn get_optional_validated<T: FromField>(
        &mut self,
        keys: impl FieldKeys,
        validate: impl Fn(&T) -> bool,
    ) -> Option<T> {
        for key in keys.candidates() {
            if !self.entries.contains_key(key) {
                continue;
            }
            // consulted counts as read, even if conversion fails below
            self.read_keys.insert(key.to_string());
            let Some(raw) = self.raw(key) else {
                continue;
            };
            if let Some(value) = T::from_field(&raw) {
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

    /// Descend into the nested object at `key`, marking the key read
    pub fn get_node(&mut self, key: &str) -> Option<&mut JsonData> {
        if !self.entries.contains_key(key) {
            return None;
        }
        self.read_keys.insert(key.to_string());
        match self.entries.get_mut(key) {
            Some(TrackedValue::Node(node)) => Some(node),
            _ => None,
        }
    }

    /// The object elements of the array at `key`, marking the key read
    pub fn get_node_list(&mut self, key: &str) -> Option<Vec<&mut JsonData>> {
        if !self.entries.contains_key(key) {
            return None;
        }
        self.read_keys.insert(key.to_string());
        match self.entries.get_mut(key) {
            Some(TrackedValue::List(items)) => Some(
                items
                    .iter_mut()
                    .filter_map(|item| match item {
                        TrackedValue::Node(node) => Some(node),
                        _ => None,
                    })
                    .collect(),
            ),
            _ => None,
        }
    }

    /// Return this node's never-read scalar entries and mark them read.
    ///
    /// Nulls carry no data and are skipped. Calling twice in a row yields an
    /// empty map the second time: surfacing a field counts as consuming it.
    pub fn get_unread(&mut self) -> UnreadData {
        let mut unread = UnreadData::new();
        for (key, value) in &self.entries {
            if self.read_keys.contains(key) {
                continue;
            }
            if let TrackedValue::Scalar(value) = value {
                if !value.is_null() {
                    unread.insert(key.clone(), value.clone());
                }
            }
        }
        for key in unread.keys() {
            self.read_keys.insert(key.clone());
        }
        unread
    }

    /// Return the whole still-unread subtree as a JSON object, marking
    /// everything returned as read.
    ///
    /// Nested nodes are descended regardless of whether their own key was
    /// read: a parser may have taken a node and consumed only half of it.
    pub fn get_unread_deep(&mut self) -> Value {
        let mut out = serde_json::Map::new();
        let keys: Vec<String> = self.entries.keys().cloned().collect();

        for key in keys {
            let key_read = self.read_keys.contains(&key);
            let Some(entry) = self.entries.get_mut(&key) else {
                continue;
            };
            match entry {
                TrackedValue::Scalar(value) => {
                    if !key_read && !value.is_null() {
                        out.insert(key.clone(), value.clone());
                        self.read_keys.insert(key);
                    }
                }
                TrackedValue::Node(node) => {
                    let nested = node.get_unread_deep();
                    if nested.as_object().is_some_and(|map| !map.is_empty()) {
                        out.insert(key, nested);
                    }
                }
                TrackedValue::List(items) => {
                    let mut collected = Vec::new();
                    let mut scalars_taken = false;
                    for item in items.iter_mut() {
                        match item {
                            TrackedValue::Node(node) => {
                                let nested = node.get_unread_deep();
                                if nested.as_object().is_some_and(|map| !map.is_empty()) {
                                    collected.push(nested);
                                }
                            }
                            TrackedValue::Scalar(value) => {
                                if !key_read && !value.is_null() {
                                    collected.push(value.clone());
                                    scalars_taken = true;
                                }
                            }
                            TrackedValue::List(_) => {}
                        }
                    }
                    if scalars_taken {
                        self.read_keys.insert(key.clone());
                    }
                    if !collected.is_empty() {
                        out.insert(key, Value::Array(collected));
                    }
                }
            }
        }

        Value::Object(out)
    }

    fn unread_scalar_keys(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(key, value)| {
                !self.read_keys.contains(*key)
                    && matches!(value, TrackedValue::Scalar(value) if !value.is_null())
            })
            .map(|(key, _)| key.as_str())
            .collect()
    }
}

impl Drop for JsonData {
    fn drop(&mut self) {
        if !config::warn_unread_keys() {
            return;
        }
        let unread = self.unread_scalar_keys();
        if !unread.is_empty() {
            warn!(keys = ?unread, "accessor dropped with unread keys");
        }
    }
}

fn scalar_to_raw(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()).filter(|text| !text.trim().is_empty()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(number.to_string()),
        // arrays of plain values have no single-field rendering
        _ => None,
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
