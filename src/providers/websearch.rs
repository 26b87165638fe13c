//! Web-search: last-resort fallback when no vendor table or aggregator
//! answers (spec §4.1.3).
//!
//! Constructs a handful of EOL-synonym queries, runs them through a
//! pluggable [`SearchBackend`], and scans the returned snippets for a date
//! in any of five common formats. Confidence is driven purely by how many
//! distinct snippets agree on the same (or a very close) date, per spec
//! §4.1.3's signal-count heuristic.

use async_trait::async_trait;
use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

use crate::error::ProviderErrorKind;
use crate::model::{Fingerprint, LookupResult};

use super::Provider;

/// EOL-adjacent synonyms used to build search queries, confirmed against
/// the phrasing real lifecycle trackers use ("end of support", "EOL",
/// "end of life", "no longer supported").
const QUERY_SYNONYMS: &[&str] = &[
    "end of life",
    "end of support",
    "EOL date",
    "support end date",
];

/// One search result snippet a [`SearchBackend`] returns.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub title: String,
    pub snippet: String,
    pub url: String,
}

/// Pluggable web-search backend; kept as a trait so tests and offline
/// builds can swap in a canned or empty implementation.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, ProviderErrorKind>;
}

/// A backend that returns no results; used when no live search API key is
/// configured rather than silently skipping the provider.
pub struct NullSearchBackend;

#[async_trait]
impl SearchBackend for NullSearchBackend {
    async fn search(&self, _query: &str) -> Result<Vec<SearchHit>, ProviderErrorKind> {
        Ok(Vec::new())
    }
}

/// Live HTTP-backed search, behind the `enrichment` feature. Talks to
/// whatever search endpoint the deployment configures; response shape is
/// assumed to already be normalized to a list of `{title, snippet, url}`
/// by the configured endpoint (a search-proxy, not a raw engine API).
#[cfg(feature = "enrichment")]
pub struct HttpSearchBackend {
    endpoint: String,
}

#[cfg(feature = "enrichment")]
impl HttpSearchBackend {
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

#[cfg(feature = "enrichment")]
#[async_trait]
impl SearchBackend for HttpSearchBackend {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, ProviderErrorKind> {
        #[derive(serde::Deserialize)]
        struct Hit {
            title: String,
            snippet: String,
            url: String,
        }

        let response = reqwest::Client::new()
            .get(&self.endpoint)
            .query(&[("q", query)])
            .send()
            .await
            .map_err(|e| ProviderErrorKind::TransientNetwork(e.to_string()))?;

        if response.status().is_server_error() {
            return Err(ProviderErrorKind::UpstreamServerError(
                response.status().as_u16(),
            ));
        }

        let hits: Vec<Hit> = response
            .json()
            .await
            .map_err(|e| ProviderErrorKind::ParseFailure(e.to_string()))?;

        Ok(hits
            .into_iter()
            .map(|h| SearchHit {
                title: h.title,
                snippet: h.snippet,
                url: h.url,
            })
            .collect())
    }
}

fn date_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        vec![
            // ISO: 2027-10-14
            Regex::new(r"\b(\d{4})-(\d{2})-(\d{2})\b").unwrap(),
            // US slash: 10/14/2027
            Regex::new(r"\b(\d{1,2})/(\d{1,2})/(\d{4})\b").unwrap(),
            // Long form: October 14, 2027 / October 14 2027
            Regex::new(r"\b(January|February|March|April|May|June|July|August|September|October|November|December)\s+(\d{1,2}),?\s+(\d{4})\b").unwrap(),
            // Abbreviated: Oct 14, 2027
            Regex::new(r"\b(Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)\s+(\d{1,2}),?\s+(\d{4})\b").unwrap(),
            // Day-first: 14 October 2027
            Regex::new(r"\b(\d{1,2})\s+(January|February|March|April|May|June|July|August|September|October|November|December)\s+(\d{4})\b").unwrap(),
        ]
    })
}

fn month_number(name: &str) -> Option<u32> {
    let months = [
        "january", "february", "march", "april", "may", "june", "july", "august", "september",
        "october", "november", "december",
    ];
    let abbrev = [
        "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
    ];
    let lower = name.to_lowercase();
    months
        .iter()
        .position(|m| *m == lower)
        .or_else(|| abbrev.iter().position(|m| *m == lower))
        .map(|i| i as u32 + 1)
}

/// Scan `text` for the first recognizable date, trying ISO, US-slash,
/// long-form, abbreviated, and day-first patterns in that order.
#[must_use]
pub fn extract_date(text: &str) -> Option<NaiveDate> {
    let patterns = date_patterns();

    if let Some(caps) = patterns[0].captures(text) {
        let (y, m, d) = (
            caps[1].parse().ok()?,
            caps[2].parse().ok()?,
            caps[3].parse().ok()?,
        );
        if let Some(date) = NaiveDate::from_ymd_opt(y, m, d) {
            return Some(date);
        }
    }

    if let Some(caps) = patterns[1].captures(text) {
        let (m, d, y) = (
            caps[1].parse().ok()?,
            caps[2].parse().ok()?,
            caps[3].parse().ok()?,
        );
        if let Some(date) = NaiveDate::from_ymd_opt(y, m, d) {
            return Some(date);
        }
    }

    if let Some(caps) = patterns[2].captures(text) {
        let month = month_number(&caps[1])?;
        let (d, y) = (caps[2].parse().ok()?, caps[3].parse().ok()?);
        if let Some(date) = NaiveDate::from_ymd_opt(y, month, d) {
            return Some(date);
        }
    }

    if let Some(caps) = patterns[3].captures(text) {
        let month = month_number(&caps[1])?;
        let (d, y) = (caps[2].parse().ok()?, caps[3].parse().ok()?);
        if let Some(date) = NaiveDate::from_ymd_opt(y, month, d) {
            return Some(date);
        }
    }

    if let Some(caps) = patterns[4].captures(text) {
        let d: u32 = caps[1].parse().ok()?;
        let month = month_number(&caps[2])?;
        let y: i32 = caps[3].parse().ok()?;
        if let Some(date) = NaiveDate::from_ymd_opt(y, month, d) {
            return Some(date);
        }
    }

    None
}

/// Confidence from how many distinct search hits agreed on a date: high for
/// 3+, medium for 2, low for a single unconfirmed hit (spec §4.1.3).
#[must_use]
pub fn confidence_from_signal_count(count: usize) -> f64 {
    match count {
        0 => 0.0,
        1 => 0.35,
        2 => 0.55,
        _ => 0.7,
    }
}

/// Pick the most plausible EOL date out of every date extracted from the
/// search hits, per spec §4.1.3: prefer dates within ten years of `today`
/// in either direction; among those, the earliest future candidate wins,
/// falling back to the latest past candidate when nothing is upcoming.
/// Agreement count is a confidence signal, not a selection criterion.
#[must_use]
pub fn select_best_date(dates: &[NaiveDate], today: NaiveDate) -> Option<NaiveDate> {
    if dates.is_empty() {
        return None;
    }

    let ten_years = chrono::Duration::days(365 * 10);
    let lower_bound = today - ten_years;
    let upper_bound = today + ten_years;

    let in_range: Vec<NaiveDate> = dates
        .iter()
        .copied()
        .filter(|d| *d >= lower_bound && *d <= upper_bound)
        .collect();
    let pool: &[NaiveDate] = if in_range.is_empty() { dates } else { &in_range };

    let future_earliest = pool.iter().copied().filter(|d| *d >= today).min();
    future_earliest.or_else(|| pool.iter().copied().max())
}

pub struct WebSearchProvider {
    backend: Box<dyn SearchBackend>,
}

impl WebSearchProvider {
    #[must_use]
    pub fn new() -> Self {
        #[cfg(feature = "enrichment")]
        {
            Self {
                backend: Box::new(HttpSearchBackend::new(
                    "https://search.example.invalid/api",
                )),
            }
        }
        #[cfg(not(feature = "enrichment"))]
        {
            Self {
                backend: Box::new(NullSearchBackend),
            }
        }
    }

    #[must_use]
    pub fn with_backend(backend: Box<dyn SearchBackend>) -> Self {
        Self { backend }
    }
}

impl Default for WebSearchProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Provider for WebSearchProvider {
    fn id(&self) -> &str {
        "websearch"
    }

    fn priority(&self) -> i32 {
        100
    }

    fn supports(&self, _fp: &Fingerprint) -> bool {
        true
    }

    async fn lookup(&self, fp: &Fingerprint) -> Result<LookupResult, ProviderErrorKind> {
        let subject = match fp.version() {
            Some(v) => format!("{} {v}", fp.display_name()),
            None => fp.display_name().to_string(),
        };

        let mut dates: Vec<(NaiveDate, String)> = Vec::new();
        for synonym in QUERY_SYNONYMS {
            let query = format!("{subject} {synonym}");
            let hits = self.backend.search(&query).await?;
            for hit in hits {
                if let Some(date) = extract_date(&hit.snippet).or_else(|| extract_date(&hit.title)) {
                    dates.push((date, hit.url));
                }
            }
        }

        if dates.is_empty() {
            return Err(ProviderErrorKind::NotFound);
        }

        let mut counts: std::collections::HashMap<NaiveDate, usize> = std::collections::HashMap::new();
        for (date, _) in &dates {
            *counts.entry(*date).or_insert(0) += 1;
        }

        let all_dates: Vec<NaiveDate> = dates.iter().map(|(d, _)| *d).collect();
        let today = chrono::Utc::now().date_naive();
        let best_date = select_best_date(&all_dates, today).expect("dates is non-empty");
        let signal_count = counts.get(&best_date).copied().unwrap_or(0);

        let source_url = dates
            .iter()
            .find(|(date, _)| *date == best_date)
            .map(|(_, url)| url.clone());

        let confidence = confidence_from_signal_count(signal_count);
        let mut result = LookupResult::success(fp.display_name(), self.id(), Some(best_date), confidence);
        if let Some(url) = source_url {
            result = result.with_source_url(url);
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ItemKind;

    struct CannedBackend(Vec<SearchHit>);

    #[async_trait]
    impl SearchBackend for CannedBackend {
        async fn search(&self, _query: &str) -> Result<Vec<SearchHit>, ProviderErrorKind> {
            Ok(self.0.clone())
        }
    }

    impl Clone for SearchHit {
        fn clone(&self) -> Self {
            Self {
                title: self.title.clone(),
                snippet: self.snippet.clone(),
                url: self.url.clone(),
            }
        }
    }

    #[test]
    fn test_extract_iso_date() {
        assert_eq!(
            extract_date("support ends 2027-10-14 per vendor"),
            Some(NaiveDate::from_ymd_opt(2027, 10, 14).unwrap())
        );
    }

    #[test]
    fn test_extract_long_form_date() {
        assert_eq!(
            extract_date("End of life is October 14, 2027."),
            Some(NaiveDate::from_ymd_opt(2027, 10, 14).unwrap())
        );
    }

    #[test]
    fn test_extract_day_first_date() {
        assert_eq!(
            extract_date("Support ends 14 October 2027"),
            Some(NaiveDate::from_ymd_opt(2027, 10, 14).unwrap())
        );
    }

    #[test]
    fn test_extract_abbreviated_date() {
        assert_eq!(
            extract_date("EOL: Oct 14, 2027"),
            Some(NaiveDate::from_ymd_opt(2027, 10, 14).unwrap())
        );
    }

    #[test]
    fn test_select_best_date_prefers_earliest_future_in_range() {
        let today = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let dates = vec![
            NaiveDate::from_ymd_opt(2029, 1, 9).unwrap(),
            NaiveDate::from_ymd_opt(2033, 1, 11).unwrap(),
        ];
        assert_eq!(select_best_date(&dates, today), Some(NaiveDate::from_ymd_opt(2029, 1, 9).unwrap()));
    }

    #[test]
    fn test_select_best_date_falls_back_to_latest_past() {
        let today = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let dates = vec![
            NaiveDate::from_ymd_opt(2018, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2023, 5, 31).unwrap(),
        ];
        assert_eq!(select_best_date(&dates, today), Some(NaiveDate::from_ymd_opt(2023, 5, 31).unwrap()));
    }

    #[test]
    fn test_select_best_date_ignores_out_of_range_outlier() {
        let today = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let dates = vec![
            NaiveDate::from_ymd_opt(2099, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2029, 1, 9).unwrap(),
        ];
        assert_eq!(select_best_date(&dates, today), Some(NaiveDate::from_ymd_opt(2029, 1, 9).unwrap()));
    }

    #[test]
    fn test_confidence_scales_with_agreement() {
        assert_eq!(confidence_from_signal_count(0), 0.0);
        assert_eq!(confidence_from_signal_count(1), 0.35);
        assert_eq!(confidence_from_signal_count(2), 0.55);
        assert_eq!(confidence_from_signal_count(5), 0.7);
    }

    #[tokio::test]
    async fn test_agreeing_hits_raise_confidence() {
        let hits = vec![
            SearchHit { title: "A".into(), snippet: "EOL 2027-10-14".into(), url: "https://a".into() },
            SearchHit { title: "B".into(), snippet: "ends 2027-10-14".into(), url: "https://b".into() },
        ];
        let provider = WebSearchProvider::with_backend(Box::new(CannedBackend(hits)));
        let fp = Fingerprint::new("FrobnicatorDB", Some("9"), ItemKind::Software);
        let result = provider.lookup(&fp).await.unwrap();
        assert_eq!(result.eol_date, Some(NaiveDate::from_ymd_opt(2027, 10, 14).unwrap()));
        assert!(result.confidence >= 0.55);
    }

    #[tokio::test]
    async fn test_no_hits_not_found() {
        let provider = WebSearchProvider::with_backend(Box::new(NullSearchBackend));
        let fp = Fingerprint::new("FrobnicatorDB", Some("9"), ItemKind::Software);
        assert!(matches!(
            provider.lookup(&fp).await,
            Err(ProviderErrorKind::NotFound)
        ));
    }
}
