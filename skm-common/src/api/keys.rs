//! API key validation
//!
//! A presented credential is valid when it is a member of the configured
//! allow-list. There is no other authentication: no expiry, no hashing,
//! no per-key permissions. The key doubles as the ownership scope for
//! alarm rows.

use std::collections::HashSet;
use std::sync::Arc;

/// Request header carrying the credential
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Keys accepted when the configuration does not supply its own list
pub const DEFAULT_API_KEYS: [&str; 5] = [
    "scplay-secret-key",
    "kitty-secret-key",
    "sofia-secret-key",
    "liu-secret-key",
    "external-secret-key",
];

/// Fixed allow-list of acceptable API keys
///
/// Cheap to clone; the set is shared behind an `Arc`.
#[derive(Debug, Clone)]
pub struct ApiKeys {
    keys: Arc<HashSet<String>>,
}

impl ApiKeys {
    /// Build an allow-list from any sequence of keys
    ///
    /// Empty strings are dropped: an empty credential is never valid.
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keys = keys
            .into_iter()
            .map(Into::into)
            .filter(|k: &String| !k.is_empty())
            .collect();
        Self {
            keys: Arc::new(keys),
        }
    }

    /// Membership test. Absence or mismatch yields `false`, never an error.
    pub fn is_valid(&self, credential: &str) -> bool {
        !credential.is_empty() && self.keys.contains(credential)
    }

    /// Number of accepted keys
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl Default for ApiKeys {
    fn default() -> Self {
        Self::new(DEFAULT_API_KEYS)
    }
}
