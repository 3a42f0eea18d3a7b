//! Read-tracking field access over rows and JSON documents
//!
//! Instrument exports routinely carry more fields than the canonical model
//! maps. Rather than dropping those silently, every field lookup in this
//! service records which key it consulted, so that at the end of mapping a
//! record the parser can ask "what did nobody read?" and preserve the
//! answer as custom information.
//!
//! ## Architecture
//!
//! - [`convert`] - Typed conversion from raw field values ([`FromField`])
//!   and the single-or-fallback key form ([`FieldKeys`])
//! - [`series_data`] - Accessor over one tabular row
//! - [`json_data`] - Accessor tree over one JSON document
//!
//! Optional lookups (`get_optional*`) never fail; required lookups
//! (`get_required*`) produce a conversion error naming the missing field.
//! A key counts as read from the moment it is consulted, even when its
//! value fails conversion; an inspected-but-invalid field is not silently
//! dropped data.

pub mod convert;
pub mod json_data;
pub mod series_data;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use convert::{FieldKeys, FromField};
pub use json_data::{JsonData, TrackedValue};
pub use series_data::SeriesData;

/// Surfaced unread fields, ordered by key, ready for a "custom info" bucket
pub type UnreadData = serde_json::Map<String, serde_json::Value>;
