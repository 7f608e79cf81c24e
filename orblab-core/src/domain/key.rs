//! Simulation keys — deterministic identification of (day, session, config).
//!
//! `KeyHash` is a blake3 content hash of the key's canonical JSON. It is the
//! identity used by the batch checkpoint and by the result exporter's
//! replace-not-duplicate merge.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::config::TradeConfig;

/// The primary key of one simulation unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimKey {
    pub day: NaiveDate,
    pub session: String,
    pub config: TradeConfig,
}

impl SimKey {
    /// Content hash of the canonical JSON encoding.
    ///
    /// `SimKey` and `TradeConfig` are plain structs, so serde_json emits
    /// fields in declaration order and the encoding is deterministic.
    pub fn hash(&self) -> KeyHash {
        let json = serde_json::to_string(self).expect("SimKey must serialize");
        KeyHash(blake3::hash(json.as_bytes()).to_hex().to_string())
    }
}

impl fmt::Display for SimKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.day, self.session)
    }
}

/// Hex-encoded blake3 hash of a `SimKey`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyHash(pub String);

impl fmt::Display for KeyHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
