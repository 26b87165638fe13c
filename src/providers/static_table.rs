//! Shared embedded-cycle-table plumbing used by every vendor [`super::Provider`].
//!
//! Mirrors the `cycle`/`eol`/`support`/`lts` shape the endoflife.date API
//! already uses (carried over from the teacher's `enrichment::eol::EolCycle`)
//! so the same [`Cycle`] record can be produced by a hand-curated static
//! table or, eventually, a parsed live page, without the caller caring
//! which one answered.

use crate::error::ProviderErrorKind;
use crate::model::{Fingerprint, LookupResult};
use crate::providers::Provider;
use crate::utils::version::{select_cycle, VersionQuery};
use async_trait::async_trait;
use chrono::NaiveDate;
use indexmap::IndexMap;

/// A single release line's lifecycle data, as carried in a vendor's static
/// knowledge table.
#[derive(Debug, Clone)]
pub struct Cycle {
    pub cycle: &'static str,
    pub release_date: Option<NaiveDate>,
    pub eol: Option<NaiveDate>,
    pub support_end: Option<NaiveDate>,
    pub extended_support: Option<NaiveDate>,
    pub lts: bool,
    pub latest: Option<&'static str>,
}

impl Cycle {
    #[must_use]
    pub const fn new(cycle: &'static str, eol: Option<NaiveDate>) -> Self {
        Self {
            cycle,
            release_date: None,
            eol,
            support_end: None,
            extended_support: None,
            lts: false,
            latest: None,
        }
    }

    #[must_use]
    pub const fn lts(mut self) -> Self {
        self.lts = true;
        self
    }

    #[must_use]
    pub const fn with_support_end(mut self, date: NaiveDate) -> Self {
        self.support_end = Some(date);
        self
    }

    #[must_use]
    pub const fn with_release_date(mut self, date: NaiveDate) -> Self {
        self.release_date = Some(date);
        self
    }
}

/// One product line owned by a vendor (e.g. "windows-server" under
/// Microsoft, "sql-server" under the same vendor). `keywords` feed the
/// vendor's `Supports` predicate; `slug` is used to build `source_url`.
pub struct ProductLine {
    pub slug: &'static str,
    pub keywords: &'static [&'static str],
    pub cycles: Vec<Cycle>,
}

/// A vendor's full static knowledge table: every product line it owns.
pub struct StaticTable {
    pub lines: IndexMap<&'static str, ProductLine>,
}

impl StaticTable {
    #[must_use]
    pub fn new(lines: Vec<ProductLine>) -> Self {
        Self {
            lines: lines.into_iter().map(|l| (l.slug, l)).collect(),
        }
    }

    /// Find the product line whose keyword set matches any token in
    /// `normalized_name`.
    #[must_use]
    pub fn match_line(&self, normalized_name: &str) -> Option<&ProductLine> {
        self.lines
            .values()
            .find(|line| line.keywords.iter().any(|kw| normalized_name.contains(kw)))
    }

    #[must_use]
    pub fn any_line_matches(&self, normalized_name: &str) -> bool {
        self.match_line(normalized_name).is_some()
    }
}

impl ProductLine {
    /// Resolve a version query against this line's cycles, per the §4.1
    /// version-matching policy: a bare major selects the earliest cycle in
    /// that major; a full semver must match exactly.
    ///
    /// Returns the matched cycle plus the sorted list of every cycle
    /// sharing that major version component (the `minor_versions` extra).
    #[must_use]
    pub fn resolve(&self, version_query: Option<&str>) -> Option<(&Cycle, Vec<String>)> {
        let cycle_strs: Vec<&str> = self.cycles.iter().map(|c| c.cycle).collect();

        let selected = match version_query {
            Some(q) if !q.trim().is_empty() => select_cycle(q, cycle_strs.iter().copied())?,
            _ => self.cycles.last()?.cycle,
        };

        let cycle = self.cycles.iter().find(|c| c.cycle == selected)?;

        let major = selected.split('.').next().unwrap_or(selected);
        let mut minors: Vec<String> = self
            .cycles
            .iter()
            .filter(|c| c.cycle.split('.').next().unwrap_or(c.cycle) == major)
            .map(|c| c.cycle.to_string())
            .collect();
        minors.sort_by(|a, b| VersionQuery::parse(a).numeric.cmp(&VersionQuery::parse(b).numeric));

        Some((cycle, minors))
    }
}

/// Build a [`LookupResult`] from a matched static-table cycle.
#[must_use]
pub fn result_from_cycle(
    software_name: &str,
    source: &str,
    source_url: String,
    cycle: &Cycle,
    minor_versions: Vec<String>,
    confidence: f64,
) -> LookupResult {
    let mut result = LookupResult::success(software_name, source, cycle.eol, confidence)
        .with_version(cycle.cycle)
        .with_source_url(source_url);

    if let Some(support_end) = cycle.support_end {
        result = result.with_support_end_date(support_end);
    }
    if let Some(release_date) = cycle.release_date {
        result = result.with_release_date(release_date);
    }
    if let Some(latest) = cycle.latest {
        result = result.with_latest_version(latest);
    }
    if cycle.lts {
        result = result.with_extra("lts", serde_json::Value::Bool(true));
    }
    if let Some(extended) = cycle.extended_support {
        result = result.with_extra(
            "extended_support",
            serde_json::Value::String(extended.to_string()),
        );
    }
    if minor_versions.len() > 1 {
        result = result.with_extra(
            "minor_versions",
            serde_json::Value::Array(
                minor_versions.into_iter().map(serde_json::Value::String).collect(),
            ),
        );
    }
    result = result.with_extra(
        "cycle",
        serde_json::Value::String(cycle.cycle.to_string()),
    );

    result
}

/// How a [`VendorProvider`] extracts the version string it should match
/// against its static table from a fingerprint. Every vendor except
/// Microsoft just reads `fp.version()`; Microsoft's inventory regex ladder
/// folds the product year into the *name* (spec §4.3 item 1), so it needs
/// to pull the year back out instead.
pub type VersionExtractor = fn(&Fingerprint) -> Option<String>;

fn default_version_extractor(fp: &Fingerprint) -> Option<String> {
    fp.version().map(str::to_string)
}

/// A vendor-specific [`Provider`] backed entirely by an embedded
/// [`StaticTable`] (spec §4.1.1). A live-page/API fetch is deliberately not
/// implemented here: per spec §9's Open Question resolution, a vendor
/// without a working live parser reports `NotFound` on a static-table miss
/// rather than `ParseFailure`.
pub struct VendorProvider {
    id: &'static str,
    priority: i32,
    table: StaticTable,
    base_confidence: f64,
    source_url_base: &'static str,
    version_extractor: VersionExtractor,
}

impl VendorProvider {
    #[must_use]
    pub fn new(
        id: &'static str,
        priority: i32,
        table: StaticTable,
        base_confidence: f64,
        source_url_base: &'static str,
    ) -> Self {
        Self {
            id,
            priority,
            table,
            base_confidence,
            source_url_base,
            version_extractor: default_version_extractor,
        }
    }

    #[must_use]
    pub fn with_version_extractor(mut self, extractor: VersionExtractor) -> Self {
        self.version_extractor = extractor;
        self
    }
}

#[async_trait]
impl Provider for VendorProvider {
    fn id(&self) -> &str {
        self.id
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn supports(&self, fp: &Fingerprint) -> bool {
        self.table.any_line_matches(fp.normalized_name())
    }

    async fn lookup(&self, fp: &Fingerprint) -> Result<LookupResult, ProviderErrorKind> {
        let line = self
            .table
            .match_line(fp.normalized_name())
            .ok_or(ProviderErrorKind::NotSupported)?;

        let version_query = (self.version_extractor)(fp);
        let (cycle, minors) = line
            .resolve(version_query.as_deref())
            .ok_or(ProviderErrorKind::NotFound)?;

        Ok(result_from_cycle(
            fp.display_name(),
            self.id,
            format!("{}/{}-{}", self.source_url_base, line.slug, cycle.cycle),
            cycle,
            minors,
            self.base_confidence,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn sample_line() -> ProductLine {
        ProductLine {
            slug: "postgresql",
            keywords: &["postgresql", "postgres"],
            cycles: vec![
                Cycle::new("12.0", Some(date("2024-11-14"))),
                Cycle::new("12.1", Some(date("2024-11-14"))),
                Cycle::new("12.2", Some(date("2024-11-14"))),
                Cycle::new("13.0", Some(date("2025-11-13"))),
            ],
        }
    }

    #[test]
    fn test_bare_major_selects_earliest_and_lists_minors() {
        let line = sample_line();
        let (cycle, minors) = line.resolve(Some("12")).unwrap();
        assert_eq!(cycle.cycle, "12.0");
        assert_eq!(minors, vec!["12.0", "12.1", "12.2"]);
    }

    #[test]
    fn test_exact_cycle_match() {
        let line = sample_line();
        let (cycle, _) = line.resolve(Some("13.0")).unwrap();
        assert_eq!(cycle.cycle, "13.0");
    }

    #[test]
    fn test_no_version_picks_latest_entry() {
        let line = sample_line();
        let (cycle, _) = line.resolve(None).unwrap();
        assert_eq!(cycle.cycle, "13.0");
    }

    #[test]
    fn test_match_line_by_keyword() {
        let table = StaticTable::new(vec![sample_line()]);
        assert!(table.match_line("postgresql").is_some());
        assert!(table.match_line("frobnicatordb").is_none());
    }

    #[test]
    fn test_result_from_cycle_sets_minor_versions_extra() {
        let line = sample_line();
        let (cycle, minors) = line.resolve(Some("12")).unwrap();
        let result = result_from_cycle("PostgreSQL", "postgresql", "https://x/postgresql".into(), cycle, minors, 0.95);
        assert_eq!(result.version.as_deref(), Some("12.0"));
        assert_eq!(
            result.extra.get("minor_versions").unwrap(),
            &serde_json::json!(["12.0", "12.1", "12.2"])
        );
    }
}
