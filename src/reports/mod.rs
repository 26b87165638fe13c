//! Reporter: render an [`AggregateReport`] into the fixed markdown layout
//! used as the chat-facing answer (spec §4.7).
//!
//! A pure function, deliberately free of any I/O or async: given the same
//! report it always produces the same document, which is what lets
//! [`crate::orchestrator::Orchestrator::run_chat`] call it directly on the
//! return path without a report-specific error case of its own.

pub mod escape;

use crate::model::{AggregateReport, Category, ReportEntry, Risk, Status};
use escape::escape_markdown_inline;

const ATTENTION_LIMIT: usize = 10;
const SECONDARY_LIMIT: usize = 5;

/// Render a full [`AggregateReport`] to markdown, per the fixed §4.7 layout:
/// header with totals, an "ATTENTION REQUIRED" section (end-of-life then
/// approaching-eol, top 10 each with overflow), top-5 supported/unknown/
/// failed lists, and a recommendations block selected by which categories
/// are non-empty.
///
/// Never returns an empty string: a report with nothing successful renders
/// the "nothing could be determined" fallback instead (spec §7).
#[must_use]
pub fn render_markdown(report: &AggregateReport) -> String {
    if report.is_empty() {
        return render_nothing_determined(report);
    }

    let mut out = String::new();
    render_header(&mut out, report);

    let attention_empty = report.end_of_life.is_empty() && report.approaching_eol.is_empty();
    if !attention_empty {
        out.push_str("\n## ATTENTION REQUIRED\n");
        if !report.end_of_life.is_empty() {
            render_bucket(&mut out, "End of life", &report.end_of_life, ATTENTION_LIMIT);
        }
        if !report.approaching_eol.is_empty() {
            render_bucket(&mut out, "Approaching end of life", &report.approaching_eol, ATTENTION_LIMIT);
        }
    }

    if !report.supported.is_empty() {
        out.push_str("\n## Supported\n");
        render_bucket(&mut out, "", &report.supported, SECONDARY_LIMIT);
    }

    if !report.unknown.is_empty() {
        out.push_str("\n## Unknown\n");
        render_bucket(&mut out, "", &report.unknown, SECONDARY_LIMIT);
    }

    if !report.failed.is_empty() {
        out.push_str("\n## Failed lookups\n");
        render_failed_bucket(&mut out, &report.failed, SECONDARY_LIMIT);
    }

    render_recommendations(&mut out, report);

    out
}

fn render_header(out: &mut String, report: &AggregateReport) {
    out.push_str("# Lifecycle report\n\n");
    out.push_str(&format!("Generated: {}\n\n", report.generated_at.format("%Y-%m-%d %H:%M UTC")));
    out.push_str(&format!(
        "Checked **{}** item(s): {} end of life, {} approaching end of life, {} supported, {} unknown, {} failed.\n",
        report.total_count(),
        report.end_of_life.len(),
        report.approaching_eol.len(),
        report.supported.len(),
        report.unknown.len(),
        report.failed.len(),
    ));
}

fn render_bucket(out: &mut String, heading: &str, entries: &[ReportEntry], limit: usize) {
    if !heading.is_empty() {
        out.push_str(&format!("\n**{heading}**\n\n"));
    }
    for entry in entries.iter().take(limit) {
        out.push_str(&format!("- {}\n", render_entry_line(entry)));
    }
    overflow_note(out, entries.len(), limit);
}

fn render_failed_bucket(out: &mut String, entries: &[ReportEntry], limit: usize) {
    for entry in entries.iter().take(limit) {
        let name = display_name(entry);
        let attempted = entry
            .result
            .extra
            .get("attempted_providers")
            .and_then(|v| v.as_array())
            .map(|a| a.iter().filter_map(|v| v.as_str()).collect::<Vec<_>>().join("; "))
            .unwrap_or_else(|| entry.result.source.clone());
        out.push_str(&format!("- {name}: no result ({})\n", escape_markdown_inline(&attempted)));
    }
    overflow_note(out, entries.len(), limit);
}

fn overflow_note(out: &mut String, total: usize, limit: usize) {
    if total > limit {
        out.push_str(&format!("- … and {} more\n", total - limit));
    }
}

fn display_name(entry: &ReportEntry) -> String {
    let name = escape_markdown_inline(&entry.display_name);
    match &entry.version {
        Some(v) => format!("{name} {}", escape_markdown_inline(v)),
        None => name,
    }
}

fn render_entry_line(entry: &ReportEntry) -> String {
    let name = display_name(entry);
    let result = &entry.result;

    let date_part = match (result.eol_date, result.support_end_date) {
        (Some(eol), _) => format!("EOL {eol}"),
        (None, Some(end)) => format!("support ends {end}"),
        (None, None) => "no lifecycle date on record".to_string(),
    };

    let source = match &result.source_url {
        Some(url) => format!("[{}]({url})", escape_markdown_inline(&result.source)),
        None => escape_markdown_inline(&result.source),
    };

    format!("**{name}** — {date_part} ({}, via {source})", risk_label(result.risk))
}

fn risk_label(risk: Risk) -> &'static str {
    match risk {
        Risk::Critical => "critical risk",
        Risk::High => "high risk",
        Risk::Medium => "medium risk",
        Risk::Low => "low risk",
        Risk::Unknown => "risk unknown",
    }
}

fn render_recommendations(out: &mut String, report: &AggregateReport) {
    out.push_str("\n## Recommendations\n\n");

    if !report.end_of_life.is_empty() {
        out.push_str("- Items already past end of life should be upgraded or replaced immediately; treat them as a security liability.\n");
    }
    if !report.approaching_eol.is_empty() {
        out.push_str("- Items approaching end of life should be scheduled for upgrade before support runs out.\n");
    }
    if !report.unknown.is_empty() {
        out.push_str("- Items with no lifecycle record found should be investigated manually or reported to the vendor.\n");
    }
    if !report.failed.is_empty() {
        out.push_str("- Items that could not be looked up should be retried, or checked against the vendor's own lifecycle page.\n");
    }
    if report.end_of_life.is_empty() && report.approaching_eol.is_empty() && report.unknown.is_empty() && report.failed.is_empty() {
        out.push_str("- Nothing further to act on right now; everything checked is currently supported.\n");
    }
}

/// Every entry on the request failed to resolve. Still non-empty markdown,
/// listing what was attempted and how it failed, per spec §7.
fn render_nothing_determined(report: &AggregateReport) -> String {
    let mut out = String::new();
    out.push_str("# Lifecycle report\n\n");
    out.push_str(&format!("Generated: {}\n\n", report.generated_at.format("%Y-%m-%d %H:%M UTC")));
    out.push_str("Nothing could be determined for this request.\n");
    out.push_str("No assets were found to look up, or every attempted provider failed.\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LookupResult;
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_empty_report_renders_nothing_determined() {
        let report = AggregateReport::new();
        let md = render_markdown(&report);
        assert!(md.contains("Nothing could be determined"));
        assert!(!md.is_empty());
    }

    #[test]
    fn test_full_failure_cascade_lists_attempted_providers() {
        let mut report = AggregateReport::new();
        let result = LookupResult::not_found("FrobnicatorDB", "websearch").with_extra(
            "attempted_providers",
            serde_json::json!(["endoflife: not_found", "eolstatus: not_found", "websearch: not_found"]),
        );
        report.push(ReportEntry::new("FrobnicatorDB", Some("9".to_string()), result));
        report.sort_for_render();

        let md = render_markdown(&report);
        assert!(md.contains("Failed lookups"));
        assert!(md.contains("FrobnicatorDB"));
        assert!(md.contains("endoflife: not_found"));
    }

    #[test]
    fn test_end_of_life_entries_appear_under_attention_required() {
        let mut report = AggregateReport::new();
        let result = LookupResult::success("Windows Server 2012", "microsoft", Some(date("2023-10-10")), 1.0)
            .with_source_url("https://learn.microsoft.com/lifecycle/products/windows-server-2012");
        report.push(ReportEntry::new("Windows Server 2012", None, result));
        report.sort_for_render();

        let md = render_markdown(&report);
        assert!(md.contains("ATTENTION REQUIRED"));
        assert!(md.contains("Windows Server 2012"));
        assert!(md.contains("[microsoft]"));
        assert!(md.contains("critical risk"));
    }

    #[test]
    fn test_attention_section_overflows_past_ten() {
        let mut report = AggregateReport::new();
        for i in 0..12 {
            let result = LookupResult::success(format!("App{i}"), "vendor", Some(date("2020-01-01")), 1.0);
            report.push(ReportEntry::new(format!("App{i}"), None, result));
        }
        report.sort_for_render();

        let md = render_markdown(&report);
        assert!(md.contains("… and 2 more"));
    }

    #[test]
    fn test_recommendations_select_by_nonempty_categories() {
        let mut report = AggregateReport::new();
        let result = LookupResult::success("nginx", "nodejs", Some(date("2099-01-01")), 1.0);
        report.push(ReportEntry::new("nginx", None, result));
        report.sort_for_render();

        let md = render_markdown(&report);
        assert!(md.contains("Nothing further to act on"));
        assert!(!md.contains("upgraded or replaced immediately"));
    }

    #[test]
    fn test_names_with_markdown_syntax_are_escaped() {
        let mut report = AggregateReport::new();
        let result = LookupResult::success("Evil*Name_[x]", "vendor", Some(date("2000-01-01")), 1.0);
        report.push(ReportEntry::new("Evil*Name_[x]", None, result));
        report.sort_for_render();

        let md = render_markdown(&report);
        assert!(md.contains("Evil\\*Name\\_\\[x\\]"));
    }

    #[test]
    fn test_status_categorization_matches_report_buckets() {
        assert_eq!(
            AggregateReport::categorize(&LookupResult::success("x", "s", Some(date("2000-01-01")), 1.0)),
            Category::EndOfLife
        );
        assert_eq!(AggregateReport::categorize(&LookupResult::not_found("x", "s")), Category::Failed);
        let unknown = {
            let mut r = LookupResult::success("x", "s", None, 1.0);
            r.status = Status::Unknown;
            r
        };
        assert_eq!(AggregateReport::categorize(&unknown), Category::Unknown);
    }
}
