//! Asset: a single OS or software item discovered from inventory telemetry
//! or extracted from a chat request.

use super::fingerprint::{Fingerprint, ItemKind};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single inventory item, per-request and never cached directly (only the
/// [`super::LookupResult`] keyed by its [`Fingerprint`] is cached).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    pub name: String,
    pub version: Option<String>,
    pub kind: ItemKind,
    /// Identifies where this asset came from (e.g. a computer name), if known.
    pub source_tag: Option<String>,
    /// Free-form extension bag. The inventory regex ladder always preserves
    /// the original unparsed string here under the `raw_string` key.
    #[serde(default)]
    pub extra: IndexMap<String, Value>,
}

impl Asset {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            name: name.into(),
            version: None,
            kind,
            source_tag: None,
            extra: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    #[must_use]
    pub fn with_source_tag(mut self, tag: impl Into<String>) -> Self {
        self.source_tag = Some(tag.into());
        self
    }

    #[must_use]
    pub fn with_raw_string(mut self, raw: impl Into<String>) -> Self {
        self.extra
            .insert("raw_string".to_string(), Value::String(raw.into()));
        self
    }

    #[must_use]
    pub fn raw_string(&self) -> Option<&str> {
        self.extra.get("raw_string").and_then(Value::as_str)
    }

    /// Build the [`Fingerprint`] used to cache and dispatch a lookup for
    /// this asset.
    #[must_use]
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::new(&self.name, self.version.as_deref(), self.kind)
    }

    /// De-duplication key: (computer, name, version) per the inventory
    /// collector's invariant.
    #[must_use]
    pub fn dedup_key(&self) -> (String, String, String) {
        (
            self.source_tag.clone().unwrap_or_default(),
            self.name.to_lowercase(),
            self.version.clone().unwrap_or_default(),
        )
    }
}
