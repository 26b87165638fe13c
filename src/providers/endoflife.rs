//! endoflife.date: general-purpose lifecycle aggregator (spec §4.1.2).
//!
//! Reuses the `cycle`/`eol`/`latest`/`lts`/`support`/`extendedSupport` JSON
//! shape the teacher's endoflife.date client already parsed, behind the
//! `enrichment` feature. The three-strategy search from spec §4.1.2 runs in
//! order: a direct product-slug GET, a handful of name-variation GETs, then
//! a fuzzy scan of the embedded catalog via [`crate::matching::similarity`].
//! Without the `enrichment` feature (or on a live-fetch failure) only the
//! embedded sample catalog is consulted, so the provider degrades to an
//! offline fixture rather than failing outright.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::ProviderErrorKind;
use crate::matching::similarity::{score_candidate, score_to_confidence, CANDIDATE_THRESHOLD};
use crate::model::{Fingerprint, LookupResult};
use crate::utils::version::{select_cycle, VersionQuery};

use super::Provider;

/// A release cycle as returned by the endoflife.date API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EolCycle {
    pub cycle: String,
    pub release_date: Option<String>,
    pub eol: DateOrBool,
    pub latest: Option<String>,
    pub lts: Option<DateOrBool>,
    pub support: Option<DateOrBool>,
    pub extended_support: Option<DateOrBool>,
}

/// endoflife.date fields that can be a date string or a boolean.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DateOrBool {
    Date(String),
    Bool(bool),
}

impl DateOrBool {
    fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d").ok(),
            Self::Bool(_) => None,
        }
    }
}

/// A small built-in fixture used when live fetching is disabled or fails, so
/// the aggregator's fuzzy-scan strategy is still demonstrable offline.
fn fixture_catalog() -> Vec<(&'static str, Vec<EolCycle>)> {
    fn cycle(cycle: &str, eol: &str) -> EolCycle {
        EolCycle {
            cycle: cycle.to_string(),
            release_date: None,
            eol: DateOrBool::Date(eol.to_string()),
            latest: None,
            lts: None,
            support: None,
            extended_support: None,
        }
    }

    vec![
        (
            "postgresql",
            vec![
                cycle("12.0", "2024-11-14"),
                cycle("12.1", "2024-11-14"),
                cycle("12.17", "2024-11-14"),
                cycle("13.0", "2025-11-13"),
            ],
        ),
        (
            "ubuntu",
            vec![cycle("18.04", "2023-05-31"), cycle("20.04", "2025-04-23")],
        ),
        (
            "python",
            vec![cycle("3.11", "2027-10-24"), cycle("3.12", "2028-10-02")],
        ),
        (
            "nodejs",
            vec![cycle("18", "2025-04-30"), cycle("20", "2026-04-30")],
        ),
    ]
}

/// Name variations tried after a direct slug GET misses, per spec §4.1.2
/// item 2 (e.g. spaces→hyphens, stripped whitespace, lowercase-only).
fn name_variations(normalized_name: &str) -> Vec<String> {
    let mut variants = vec![
        normalized_name.replace(' ', "-"),
        normalized_name.replace(' ', ""),
        normalized_name.replace(['.', ' '], "-"),
    ];
    variants.sort();
    variants.dedup();
    variants.retain(|v| v != normalized_name);
    variants
}

pub struct EndOfLifeProvider {
    base_url: &'static str,
}

impl EndOfLifeProvider {
    #[must_use]
    pub fn new() -> Self {
        Self {
            base_url: "https://endoflife.date/api",
        }
    }

    /// Find cycles for `slug` in the embedded fixture, trying `slug` and
    /// every name-variation of it, then falling back to a fuzzy scan across
    /// every fixture entry.
    fn resolve_offline(&self, normalized_name: &str) -> Option<(&'static str, Vec<EolCycle>)> {
        let catalog = fixture_catalog();

        if let Some((slug, cycles)) = catalog.iter().find(|(slug, _)| *slug == normalized_name) {
            return Some((slug, cycles.clone()));
        }

        for variant in name_variations(normalized_name) {
            if let Some((slug, cycles)) = catalog.iter().find(|(slug, _)| *slug == variant) {
                return Some((slug, cycles.clone()));
            }
        }

        catalog
            .into_iter()
            .map(|(slug, cycles)| (slug, score_candidate(normalized_name, slug), cycles))
            .filter(|(_, score, _)| *score >= CANDIDATE_THRESHOLD)
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(slug, _, cycles)| (slug, cycles))
    }

    #[cfg(feature = "enrichment")]
    async fn fetch_live(&self, slug: &str) -> Result<Vec<EolCycle>, ProviderErrorKind> {
        let url = format!("{}/{}.json", self.base_url, slug);
        let response = reqwest::get(&url)
            .await
            .map_err(|e| ProviderErrorKind::TransientNetwork(e.to_string()))?;

        if response.status().is_server_error() {
            return Err(ProviderErrorKind::UpstreamServerError(
                response.status().as_u16(),
            ));
        }
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ProviderErrorKind::NotFound);
        }
        if !response.status().is_success() {
            return Err(ProviderErrorKind::ParseFailure(format!(
                "unexpected status {}",
                response.status()
            )));
        }

        response
            .json::<Vec<EolCycle>>()
            .await
            .map_err(|e| ProviderErrorKind::ParseFailure(e.to_string()))
    }
}

impl Default for EndOfLifeProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Provider for EndOfLifeProvider {
    fn id(&self) -> &str {
        "endoflife"
    }

    fn priority(&self) -> i32 {
        80
    }

    fn supports(&self, _fp: &Fingerprint) -> bool {
        true
    }

    async fn lookup(&self, fp: &Fingerprint) -> Result<LookupResult, ProviderErrorKind> {
        #[cfg(feature = "enrichment")]
        {
            if let Ok(cycles) = self.fetch_live(fp.normalized_name()).await {
                return build_result(fp, fp.normalized_name(), &cycles, 1.0, self.id());
            }
            for variant in name_variations(fp.normalized_name()) {
                if let Ok(cycles) = self.fetch_live(&variant).await {
                    return build_result(fp, &variant, &cycles, 0.85, self.id());
                }
            }
        }

        let (slug, cycles) = self
            .resolve_offline(fp.normalized_name())
            .ok_or(ProviderErrorKind::NotFound)?;
        let score = score_candidate(fp.normalized_name(), slug);
        let confidence = score_to_confidence(score);
        build_result(fp, slug, &cycles, confidence, self.id())
    }
}

fn build_result(
    fp: &Fingerprint,
    slug: &str,
    cycles: &[EolCycle],
    confidence: f64,
    source: &str,
) -> Result<LookupResult, ProviderErrorKind> {
    let cycle_strs: Vec<&str> = cycles.iter().map(|c| c.cycle.as_str()).collect();
    let selected = select_cycle(fp.version().unwrap_or(""), cycle_strs.iter().copied())
        .or_else(|| cycle_strs.last().copied())
        .ok_or(ProviderErrorKind::NotFound)?;

    let cycle = cycles
        .iter()
        .find(|c| c.cycle == selected)
        .ok_or(ProviderErrorKind::NotFound)?;

    let major = selected.split('.').next().unwrap_or(selected);
    let mut minors: Vec<String> = cycles
        .iter()
        .filter(|c| c.cycle.split('.').next().unwrap_or(&c.cycle) == major)
        .map(|c| c.cycle.clone())
        .collect();
    minors.sort_by(|a, b| VersionQuery::parse(a).numeric.cmp(&VersionQuery::parse(b).numeric));

    let mut result = LookupResult::success(fp.display_name(), source, cycle.eol.as_date(), confidence)
        .with_version(&cycle.cycle)
        .with_source_url(format!("https://endoflife.date/{slug}"));

    if let Some(support) = cycle.support.as_ref().and_then(DateOrBool::as_date) {
        result = result.with_support_end_date(support);
    }
    if let Some(release) = cycle
        .release_date
        .as_deref()
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
    {
        result = result.with_release_date(release);
    }
    if let Some(latest) = &cycle.latest {
        result = result.with_latest_version(latest.clone());
    }
    if let Some(lts) = &cycle.lts {
        result = result.with_extra("lts", serde_json::json!(lts.as_date().is_some() || matches!(lts, DateOrBool::Bool(true))));
    }
    if let Some(extended) = cycle.extended_support.as_ref().and_then(DateOrBool::as_date) {
        result = result.with_extra("extended_support", serde_json::json!(extended.to_string()));
    }
    if minors.len() > 1 {
        result = result.with_extra("minor_versions", serde_json::json!(minors));
    }
    result = result.with_extra("cycle", serde_json::json!(cycle.cycle));

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ItemKind;

    #[tokio::test]
    async fn test_postgresql_12_expands_minor_versions() {
        let provider = EndOfLifeProvider::new();
        let fp = Fingerprint::new("PostgreSQL", Some("12"), ItemKind::Software);
        let result = provider.lookup(&fp).await.unwrap();
        assert_eq!(result.version.as_deref(), Some("12.0"));
        let minors = result.extra.get("minor_versions").unwrap();
        assert!(minors.as_array().unwrap().len() >= 2);
    }

    #[tokio::test]
    async fn test_fuzzy_scan_matches_misspelled_name() {
        let provider = EndOfLifeProvider::new();
        let fp = Fingerprint::new("ubunto", Some("18.04"), ItemKind::Os);
        let result = provider.lookup(&fp).await.unwrap();
        assert_eq!(result.eol_date, Some(NaiveDate::from_ymd_opt(2023, 5, 31).unwrap()));
        assert!(result.confidence <= 0.75);
    }

    #[tokio::test]
    async fn test_unknown_product_not_found() {
        let provider = EndOfLifeProvider::new();
        let fp = Fingerprint::new("FrobnicatorDB", Some("9"), ItemKind::Software);
        assert!(matches!(
            provider.lookup(&fp).await,
            Err(ProviderErrorKind::NotFound)
        ));
    }

    #[test]
    fn test_name_variations_excludes_identity() {
        let variants = name_variations("sql server");
        assert!(!variants.contains(&"sql server".to_string()));
        assert!(variants.contains(&"sql-server".to_string()));
    }
}
