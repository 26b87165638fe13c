//! LookupResult: the normalized outcome of a single provider lookup, plus
//! the status/risk derivation shared by every provider.

use chrono::{DateTime, NaiveDate, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Lifecycle status of a software/OS version, derived from its EOL date
/// relative to the current date when the provider doesn't report one
/// directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Active,
    ApproachingEol,
    EndOfLife,
    Unknown,
}

/// Risk tier associated with a [`Status`], used for report sorting and the
/// attention-required section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Risk {
    Unknown,
    Low,
    Medium,
    High,
    Critical,
}

/// Derive `(Status, Risk)` from an EOL date and the current date.
///
/// Thresholds (days until EOL, inclusive upper bounds):
/// - past → `EndOfLife` / `Critical`
/// - `< 90`  → `ApproachingEol` / `Critical`
/// - `< 365` → `ApproachingEol` / `High`
/// - `< 730` → `Active` / `Medium`
/// - else    → `Active` / `Low`
#[must_use]
pub fn derive_status_risk(eol_date: Option<NaiveDate>, today: NaiveDate) -> (Status, Risk) {
    let Some(eol_date) = eol_date else {
        return (Status::Unknown, Risk::Unknown);
    };

    let days = (eol_date - today).num_days();

    if days < 0 {
        (Status::EndOfLife, Risk::Critical)
    } else if days < 90 {
        (Status::ApproachingEol, Risk::Critical)
    } else if days < 365 {
        (Status::ApproachingEol, Risk::High)
    } else if days < 730 {
        (Status::Active, Risk::Medium)
    } else {
        (Status::Active, Risk::Low)
    }
}

/// The normalized outcome of a single provider lookup.
///
/// Invariants upheld by every provider implementation:
/// - `success == true` implies `eol_date` or `support_end_date` is set, or
///   `extra` carries a cycle record under `"cycle"`.
/// - `status`/`risk` are derived from `eol_date` whenever the provider does
///   not set them directly.
/// - `confidence` decreases monotonically as the cascade advances through
///   less-authoritative providers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupResult {
    pub success: bool,
    pub software_name: String,
    pub version: Option<String>,
    pub eol_date: Option<NaiveDate>,
    pub support_end_date: Option<NaiveDate>,
    pub release_date: Option<NaiveDate>,
    pub latest_version: Option<String>,
    pub status: Status,
    pub risk: Risk,
    pub confidence: f64,
    pub source: String,
    pub source_url: Option<String>,
    pub fetched_at: DateTime<Utc>,
    #[serde(default)]
    pub extra: IndexMap<String, Value>,
}

impl LookupResult {
    /// Build a successful result, deriving status/risk from `eol_date` if
    /// the caller didn't already compute them.
    #[must_use]
    pub fn success(
        software_name: impl Into<String>,
        source: impl Into<String>,
        eol_date: Option<NaiveDate>,
        confidence: f64,
    ) -> Self {
        let (status, risk) = derive_status_risk(eol_date, Utc::now().date_naive());
        Self {
            success: true,
            software_name: software_name.into(),
            version: None,
            eol_date,
            support_end_date: None,
            release_date: None,
            latest_version: None,
            status,
            risk,
            confidence,
            source: source.into(),
            source_url: None,
            fetched_at: Utc::now(),
            extra: IndexMap::new(),
        }
    }

    /// Build a failed/not-found placeholder result for aggregation purposes.
    #[must_use]
    pub fn not_found(software_name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            success: false,
            software_name: software_name.into(),
            version: None,
            eol_date: None,
            support_end_date: None,
            release_date: None,
            latest_version: None,
            status: Status::Unknown,
            risk: Risk::Unknown,
            confidence: 0.0,
            source: source.into(),
            source_url: None,
            fetched_at: Utc::now(),
            extra: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    #[must_use]
    pub fn with_support_end_date(mut self, date: NaiveDate) -> Self {
        self.support_end_date = Some(date);
        self
    }

    #[must_use]
    pub fn with_release_date(mut self, date: NaiveDate) -> Self {
        self.release_date = Some(date);
        self
    }

    #[must_use]
    pub fn with_latest_version(mut self, version: impl Into<String>) -> Self {
        self.latest_version = Some(version.into());
        self
    }

    #[must_use]
    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// A result is "grounded" per the invariant in §3 when it carries at
    /// least one lifecycle date or a cycle record.
    #[must_use]
    pub fn is_grounded(&self) -> bool {
        !self.success
            || self.eol_date.is_some()
            || self.support_end_date.is_some()
            || self.extra.contains_key("cycle")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_status_risk_boundaries() {
        let today = date("2026-01-01");
        assert_eq!(
            derive_status_risk(Some(date("2025-12-31")), today),
            (Status::EndOfLife, Risk::Critical)
        );
        assert_eq!(
            derive_status_risk(Some(today), today),
            (Status::ApproachingEol, Risk::Critical)
        );
        assert_eq!(
            derive_status_risk(Some(today + chrono::Duration::days(89)), today),
            (Status::ApproachingEol, Risk::Critical)
        );
        assert_eq!(
            derive_status_risk(Some(today + chrono::Duration::days(90)), today),
            (Status::ApproachingEol, Risk::High)
        );
        assert_eq!(
            derive_status_risk(Some(today + chrono::Duration::days(364)), today),
            (Status::ApproachingEol, Risk::High)
        );
        assert_eq!(
            derive_status_risk(Some(today + chrono::Duration::days(365)), today),
            (Status::Active, Risk::Medium)
        );
        assert_eq!(
            derive_status_risk(Some(today + chrono::Duration::days(729)), today),
            (Status::Active, Risk::Medium)
        );
        assert_eq!(
            derive_status_risk(Some(today + chrono::Duration::days(730)), today),
            (Status::Active, Risk::Low)
        );
    }

    #[test]
    fn test_status_risk_missing_date() {
        assert_eq!(
            derive_status_risk(None, date("2026-01-01")),
            (Status::Unknown, Risk::Unknown)
        );
    }

    #[test]
    fn test_is_grounded() {
        let result = LookupResult::success("Ubuntu", "ubuntu", Some(date("2028-04-01")), 1.0);
        assert!(result.is_grounded());

        let mut ungrounded = result.clone();
        ungrounded.eol_date = None;
        assert!(!ungrounded.is_grounded());

        let cycle_backed = ungrounded.with_extra("cycle", Value::String("18.04".into()));
        assert!(cycle_backed.is_grounded());
    }

    #[test]
    fn test_not_found_is_not_grounded_but_valid() {
        let result = LookupResult::not_found("FrobnicatorDB", "websearch");
        assert!(!result.success);
        assert!(result.is_grounded());
    }
}
