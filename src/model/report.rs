//! AggregateReport: the categorized result of running a Plan across every
//! asset in a request, ready for [`crate::reports`] to render.

use super::lookup_result::{LookupResult, Risk, Status};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One asset's lookup outcome, carried alongside its display name for
/// rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportEntry {
    pub display_name: String,
    pub version: Option<String>,
    pub result: LookupResult,
}

impl ReportEntry {
    #[must_use]
    pub fn new(display_name: impl Into<String>, version: Option<String>, result: LookupResult) -> Self {
        Self {
            display_name: display_name.into(),
            version,
            result,
        }
    }
}

/// Report category an entry is sorted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    EndOfLife,
    ApproachingEol,
    Supported,
    Unknown,
    Failed,
}

/// The full categorized result of a request, returned once then discarded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateReport {
    pub end_of_life: Vec<ReportEntry>,
    pub approaching_eol: Vec<ReportEntry>,
    pub supported: Vec<ReportEntry>,
    pub unknown: Vec<ReportEntry>,
    pub failed: Vec<ReportEntry>,
    pub generated_at: DateTime<Utc>,
}

impl Default for AggregateReport {
    fn default() -> Self {
        Self::new()
    }
}

impl AggregateReport {
    #[must_use]
    pub fn new() -> Self {
        Self {
            end_of_life: Vec::new(),
            approaching_eol: Vec::new(),
            supported: Vec::new(),
            unknown: Vec::new(),
            failed: Vec::new(),
            generated_at: Utc::now(),
        }
    }

    /// Categorize and insert an entry, based on `result.success`/`status`.
    pub fn push(&mut self, entry: ReportEntry) {
        match Self::categorize(&entry.result) {
            Category::EndOfLife => self.end_of_life.push(entry),
            Category::ApproachingEol => self.approaching_eol.push(entry),
            Category::Supported => self.supported.push(entry),
            Category::Unknown => self.unknown.push(entry),
            Category::Failed => self.failed.push(entry),
        }
    }

    #[must_use]
    pub fn categorize(result: &LookupResult) -> Category {
        if !result.success {
            return Category::Failed;
        }
        match result.status {
            Status::EndOfLife => Category::EndOfLife,
            Status::ApproachingEol => Category::ApproachingEol,
            Status::Active => Category::Supported,
            Status::Unknown => Category::Unknown,
        }
    }

    /// Sort every category's entries by risk descending, then name
    /// ascending, as required before rendering.
    pub fn sort_for_render(&mut self) {
        for bucket in [
            &mut self.end_of_life,
            &mut self.approaching_eol,
            &mut self.supported,
            &mut self.unknown,
            &mut self.failed,
        ] {
            bucket.sort_by(|a, b| {
                b.result
                    .risk
                    .cmp(&a.result.risk)
                    .then_with(|| a.display_name.to_lowercase().cmp(&b.display_name.to_lowercase()))
            });
        }
    }

    #[must_use]
    pub fn total_count(&self) -> usize {
        self.end_of_life.len()
            + self.approaching_eol.len()
            + self.supported.len()
            + self.unknown.len()
            + self.failed.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_count() == 0
    }

    #[must_use]
    pub fn highest_risk(&self) -> Risk {
        self.end_of_life
            .iter()
            .chain(self.approaching_eol.iter())
            .chain(self.supported.iter())
            .chain(self.unknown.iter())
            .map(|e| e.result.risk)
            .max()
            .unwrap_or(Risk::Unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn entry(name: &str, eol: Option<&str>, success: bool) -> ReportEntry {
        let eol_date = eol.map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap());
        let mut result = LookupResult::success(name, "test", eol_date, 1.0);
        result.success = success;
        ReportEntry::new(name, None, result)
    }

    #[test]
    fn test_categorization() {
        let mut report = AggregateReport::new();
        report.push(entry("past-due", Some("2000-01-01"), true));
        report.push(entry("supported", Some("2099-01-01"), true));
        report.push(entry("failed-lookup", None, false));

        assert_eq!(report.end_of_life.len(), 1);
        assert_eq!(report.supported.len(), 1);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.total_count(), 3);
    }

    #[test]
    fn test_sort_for_render_risk_desc_name_asc() {
        let mut report = AggregateReport::new();
        report.push(entry("zeta", Some("2099-01-01"), true)); // low risk
        report.push(entry("alpha", Some("2099-01-01"), true)); // low risk
        report.sort_for_render();

        assert_eq!(report.supported[0].display_name, "alpha");
        assert_eq!(report.supported[1].display_name, "zeta");
    }

    #[test]
    fn test_empty_report() {
        let report = AggregateReport::new();
        assert!(report.is_empty());
    }
}
