//! InventoryCollector: fetch OS/software inventory from a telemetry
//! backend and normalize it into [`Asset`]s (spec §4.3, C3).
//!
//! The telemetry backend itself is an outbound contract only (spec §6):
//! `QueryOSHeartbeat(window, limit)` / `QuerySoftwareInventory(window,
//! limit)`, each returning rows of `{computer, raw_name, raw_version}`.
//! The hard part lives entirely on this side of that boundary: turning
//! those free-form raw strings into normalized [`Asset`]s via a fixed regex
//! ladder, shared with the [`crate::classifier`]/orchestrator's
//! message-side asset extraction so the same product always normalizes the
//! same way regardless of where it was seen.

use async_trait::async_trait;
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;
use std::time::Duration;

use crate::error::{EolSentryError, OrchestrationErrorKind, Result};
use crate::model::{Asset, ItemKind};

/// One raw telemetry row, as returned by a [`TelemetryBackend`] query.
#[derive(Debug, Clone)]
pub struct InventoryRow {
    pub computer: String,
    pub raw_name: String,
    pub raw_version: Option<String>,
}

/// Outbound contract to the telemetry/observability backend (spec §6).
/// Implementations are not part of this crate's core; only the contract is.
#[async_trait]
pub trait TelemetryBackend: Send + Sync {
    async fn query_os_heartbeat(&self, window: Duration, limit: usize) -> Result<Vec<InventoryRow>>;
    async fn query_software_inventory(&self, window: Duration, limit: usize) -> Result<Vec<InventoryRow>>;
}

/// A backend with no data, used in tests and whenever inventory isn't wired
/// up; returns an empty result set rather than erroring, matching the
/// orchestrator's "collector failure → partial results" policy (spec §4.6
/// state 2) for the degenerate case of "no backend at all".
pub struct NoOpBackend;

#[async_trait]
impl TelemetryBackend for NoOpBackend {
    async fn query_os_heartbeat(&self, _window: Duration, _limit: usize) -> Result<Vec<InventoryRow>> {
        Ok(Vec::new())
    }

    async fn query_software_inventory(&self, _window: Duration, _limit: usize) -> Result<Vec<InventoryRow>> {
        Ok(Vec::new())
    }
}

struct Ladder {
    windows_server: Regex,
    ubuntu: Regex,
    rhel_like: Regex,
    macos: Regex,
    fallback: Regex,
    software_versioned: Regex,
    software_dash_versioned: Regex,
}

fn ladder() -> &'static Ladder {
    static LADDER: OnceLock<Ladder> = OnceLock::new();
    LADDER.get_or_init(|| Ladder {
        windows_server: Regex::new(r"(?i)(Windows Server)\s+(\d{4})(?:\s+([^|]+))?").unwrap(),
        ubuntu: Regex::new(r"(?i)(Ubuntu)\s+(\d+\.\d+)").unwrap(),
        rhel_like: Regex::new(r"(?i)(Red Hat Enterprise Linux|RHEL|CentOS|Debian|macOS|Mac OS X)\s+(\d+(?:\.\d+)*)").unwrap(),
        macos: Regex::new(r"(?i)(macOS|Mac OS X)\s+(\d+(?:\.\d+)*)").unwrap(),
        fallback: Regex::new(r"(\w+)\s+(\d+(?:\.\d+)*)").unwrap(),
        software_versioned: Regex::new(r"(?i)^(.+?)\s+v?(\d+(?:\.\d+){1,3})$").unwrap(),
        software_dash_versioned: Regex::new(r"(?i)^(.+?)\s*-\s*(\d+(?:\.\d+)*)$").unwrap(),
    })
}

/// Try only the OS-specific patterns (Windows Server / Ubuntu / macOS /
/// RHEL-like), skipping the generic `name version` fallback. Used wherever a
/// match must mean "this is unambiguously an OS string", e.g. extracting an
/// asset from free-form chat text where a bare `Product 12` could just as
/// easily be software.
#[must_use]
pub fn match_os_ladder(raw: &str) -> Option<(String, Option<String>, Option<String>)> {
    let l = ladder();

    if let Some(caps) = l.windows_server.captures(raw) {
        let name = format!("Windows Server {}", &caps[2]);
        let edition = caps.get(3).map(|m| m.as_str().trim().to_string());
        return Some((name, None, edition));
    }

    if let Some(caps) = l.ubuntu.captures(raw) {
        return Some((caps[1].to_string(), Some(caps[2].to_string()), None));
    }

    if let Some(caps) = l.macos.captures(raw) {
        return Some((caps[1].to_string(), Some(caps[2].to_string()), None));
    }

    if let Some(caps) = l.rhel_like.captures(raw) {
        return Some((caps[1].to_string(), Some(caps[2].to_string()), None));
    }

    None
}

/// Parse a raw OS name string into `(name, version, extra_edition)` per the
/// regex ladder in spec §4.3 items 1-5. Only meant for rows already known to
/// come from an OS inventory query, where the generic `name version`
/// fallback is safe to apply.
#[must_use]
pub fn parse_os_name(raw: &str) -> (String, Option<String>, Option<String>) {
    if let Some(parsed) = match_os_ladder(raw) {
        return parsed;
    }

    let l = ladder();
    if let Some(caps) = l.fallback.captures(raw) {
        return (caps[1].to_string(), Some(caps[2].to_string()), None);
    }

    (raw.trim().to_string(), None, None)
}

/// Parse a raw software name string into `(name, version)`, mirroring the
/// OS ladder with patterns for `name vX.Y.Z`, `name X.Y`, `name - version`.
#[must_use]
pub fn parse_software_name(raw: &str) -> (String, Option<String>) {
    let l = ladder();

    if let Some(caps) = l.software_versioned.captures(raw) {
        return (caps[1].trim().to_string(), Some(caps[2].to_string()));
    }

    if let Some(caps) = l.software_dash_versioned.captures(raw) {
        return (caps[1].trim().to_string(), Some(caps[2].to_string()));
    }

    if let Some(caps) = l.fallback.captures(raw) {
        return (caps[1].to_string(), Some(caps[2].to_string()));
    }

    (raw.trim().to_string(), None)
}

/// Fetches and normalizes OS/software inventory (spec §4.3).
pub struct InventoryCollector {
    backend: Box<dyn TelemetryBackend>,
}

impl InventoryCollector {
    #[must_use]
    pub fn new(backend: Box<dyn TelemetryBackend>) -> Self {
        Self { backend }
    }

    /// Fetch and normalize OS inventory, de-duplicated by `(computer, name,
    /// version)`.
    pub async fn collect_os(&self, window: Duration, limit: usize) -> Result<Vec<Asset>> {
        let rows = self
            .backend
            .query_os_heartbeat(window, limit)
            .await
            .map_err(|e| {
                EolSentryError::orchestration(
                    "collecting OS inventory",
                    OrchestrationErrorKind::InventoryFailed(e.to_string()),
                )
            })?;
        Ok(normalize_os_rows(rows))
    }

    /// Fetch and normalize software inventory, de-duplicated by `(computer,
    /// name, version)`.
    pub async fn collect_software(&self, window: Duration, limit: usize) -> Result<Vec<Asset>> {
        let rows = self
            .backend
            .query_software_inventory(window, limit)
            .await
            .map_err(|e| {
                EolSentryError::orchestration(
                    "collecting software inventory",
                    OrchestrationErrorKind::InventoryFailed(e.to_string()),
                )
            })?;
        Ok(normalize_software_rows(rows))
    }
}

fn normalize_os_rows(rows: Vec<InventoryRow>) -> Vec<Asset> {
    let mut seen = HashSet::new();
    let mut assets = Vec::new();

    for row in rows {
        let (name, parsed_version, edition) = parse_os_name(&row.raw_name);
        let version = row.raw_version.clone().or(parsed_version);

        let mut asset = Asset::new(name, ItemKind::Os).with_raw_string(row.raw_name.clone());
        asset = asset.with_source_tag(row.computer);
        if let Some(v) = version {
            asset = asset.with_version(v);
        }
        if let Some(edition) = edition {
            asset.extra.insert("edition".to_string(), serde_json::Value::String(edition));
        }

        let key = asset.dedup_key();
        if seen.insert(key) {
            assets.push(asset);
        }
    }

    assets
}

fn normalize_software_rows(rows: Vec<InventoryRow>) -> Vec<Asset> {
    let mut seen = HashSet::new();
    let mut assets = Vec::new();

    for row in rows {
        let (name, parsed_version) = parse_software_name(&row.raw_name);
        let version = row.raw_version.clone().or(parsed_version);

        let mut asset = Asset::new(name, ItemKind::Software).with_raw_string(row.raw_name.clone());
        asset = asset.with_source_tag(row.computer);
        if let Some(v) = version {
            asset = asset.with_version(v);
        }

        let key = asset.dedup_key();
        if seen.insert(key) {
            assets.push(asset);
        }
    }

    assets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_windows_server_keeps_year_in_name() {
        let (name, version, edition) = parse_os_name("Windows Server 2019 Datacenter");
        assert_eq!(name, "Windows Server 2019");
        assert_eq!(version, None);
        assert_eq!(edition.as_deref(), Some("Datacenter"));
    }

    #[test]
    fn test_parse_ubuntu_with_lts_suffix() {
        let (name, version, _) = parse_os_name("Ubuntu 18.04.5 LTS");
        assert_eq!(name, "Ubuntu");
        assert_eq!(version.as_deref(), Some("18.04"));
    }

    #[test]
    fn test_parse_rhel() {
        let (name, version, _) = parse_os_name("Red Hat Enterprise Linux 8.6");
        assert_eq!(name, "Red Hat Enterprise Linux");
        assert_eq!(version.as_deref(), Some("8.6"));
    }

    #[test]
    fn test_parse_fallback_name_version() {
        let (name, version, _) = parse_os_name("FreeBSD 13.2");
        assert_eq!(name, "FreeBSD");
        assert_eq!(version.as_deref(), Some("13.2"));
    }

    #[test]
    fn test_parse_unstructured_os_name() {
        let (name, version, _) = parse_os_name("Appliance Firmware Build");
        assert_eq!(name, "Appliance Firmware Build");
        assert_eq!(version, None);
    }

    #[test]
    fn test_parse_software_v_prefixed_version() {
        let (name, version) = parse_software_name("nginx v1.24.0");
        assert_eq!(name, "nginx");
        assert_eq!(version.as_deref(), Some("1.24.0"));
    }

    #[test]
    fn test_parse_software_dash_version() {
        let (name, version) = parse_software_name("SomeApp - 4.2");
        assert_eq!(name, "SomeApp");
        assert_eq!(version.as_deref(), Some("4.2"));
    }

    #[tokio::test]
    async fn test_collect_os_deduplicates() {
        struct FixtureBackend;
        #[async_trait]
        impl TelemetryBackend for FixtureBackend {
            async fn query_os_heartbeat(&self, _w: Duration, _l: usize) -> Result<Vec<InventoryRow>> {
                Ok(vec![
                    InventoryRow { computer: "host-1".into(), raw_name: "Ubuntu 18.04.5 LTS".into(), raw_version: None },
                    InventoryRow { computer: "host-1".into(), raw_name: "Ubuntu 18.04.1 LTS".into(), raw_version: None },
                    InventoryRow { computer: "host-2".into(), raw_name: "Ubuntu 18.04.5 LTS".into(), raw_version: None },
                ])
            }
            async fn query_software_inventory(&self, _w: Duration, _l: usize) -> Result<Vec<InventoryRow>> {
                Ok(Vec::new())
            }
        }

        let collector = InventoryCollector::new(Box::new(FixtureBackend));
        let assets = collector.collect_os(Duration::from_secs(86400), 100).await.unwrap();
        assert_eq!(assets.len(), 2);
        assert!(assets[0].raw_string().is_some());
    }

    #[tokio::test]
    async fn test_noop_backend_returns_empty() {
        let collector = InventoryCollector::new(Box::new(NoOpBackend));
        let assets = collector.collect_os(Duration::from_secs(86400), 10).await.unwrap();
        assert!(assets.is_empty());
    }
}
