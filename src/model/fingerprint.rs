//! Fingerprint: the normalized identity used for cache keys and single-flight
//! coalescing.

use crate::normalizer;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a [`Fingerprint`] (or [`super::Asset`]) identifies an operating
/// system or a piece of software.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Os,
    Software,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Os => write!(f, "os"),
            Self::Software => write!(f, "software"),
        }
    }
}

/// The normalized identity of an EOL query target.
///
/// Two fingerprints built from differently-cased or differently-spaced input
/// compare equal as long as their normalized name, version, and kind agree —
/// this is what makes the fingerprint usable as a cache key and single-flight
/// coalescing key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fingerprint {
    /// Case-folded, whitespace-collapsed, alias-resolved product name.
    normalized_name: String,
    /// Original (pre-normalization) name, kept for display purposes only.
    display_name: String,
    version: Option<String>,
    kind: ItemKind,
}

impl Fingerprint {
    /// Build a fingerprint from raw user- or inventory-supplied fields.
    #[must_use]
    pub fn new(name: &str, version: Option<&str>, kind: ItemKind) -> Self {
        let normalized_name = normalizer::normalize_name(name);
        let version = version
            .map(normalizer::normalize_version)
            .filter(|v| !v.is_empty());

        Self {
            normalized_name,
            display_name: name.trim().to_string(),
            version,
            kind,
        }
    }

    #[must_use]
    pub fn normalized_name(&self) -> &str {
        &self.normalized_name
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    #[must_use]
    pub const fn kind(&self) -> ItemKind {
        self.kind
    }

    /// Stable hex16 cache-key fragment, scoped by an agent/provider id.
    ///
    /// Matches the persisted key layout `eol/{agent_id}/{hex16}`.
    #[must_use]
    pub fn cache_key(&self, agent_id: &str) -> String {
        let payload = format!(
            "{}|{}|{}|{}",
            agent_id,
            self.normalized_name,
            self.version.as_deref().unwrap_or(""),
            self.kind
        );
        let hash = crate::utils::hash::content_hash(payload.as_bytes());
        format!("eol/{agent_id}/{hash:016x}")
    }
}

impl PartialEq for Fingerprint {
    fn eq(&self, other: &Self) -> bool {
        self.normalized_name == other.normalized_name
            && self.version == other.version
            && self.kind == other.kind
    }
}

impl Eq for Fingerprint {}

impl std::hash::Hash for Fingerprint {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.normalized_name.hash(state);
        self.version.hash(state);
        self.kind.hash(state);
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(v) => write!(f, "{} {v} ({})", self.display_name, self.kind),
            None => write!(f, "{} ({})", self.display_name, self.kind),
        }
    }
}
