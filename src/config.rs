//! Process-level configuration lookups.
//!
//! The conversion core keeps no mutable global state; the only process-wide
//! setting it consults is the debug flag enabling unread-key warnings, read
//! once from the environment and cached for the life of the process.

use std::sync::OnceLock;

use crate::constants::WARN_UNREAD_KEYS_ENV;

static WARN_UNREAD_KEYS: OnceLock<bool> = OnceLock::new();

/// Whether unread-key warnings should be emitted when a JSON accessor is
/// dropped with fields nobody consulted.
///
/// Controlled by the `ASM_WARN_UNREAD_KEYS` environment variable
/// ("1"/"true"/"yes", case-insensitive). This is a debug aid for parser
/// authors; leaving it unset changes nothing except that the warnings are
/// suppressed.
pub fn warn_unread_keys() -> bool {
    *WARN_UNREAD_KEYS.get_or_init(|| {
        std::env::var(WARN_UNREAD_KEYS_ENV)
            .map(|value| {
                let value = value.trim().to_ascii_lowercase();
                matches!(value.as_str(), "1" | "true" | "yes")
            })
            .unwrap_or(false)
    })
}
