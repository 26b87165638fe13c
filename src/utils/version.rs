//! Version query matching against provider-reported lifecycle cycles.
//!
//! Every provider answers a caller's version query against a set of cycle
//! strings (e.g. endoflife.date's `"12.0"`, `"2019"`, `"18.04 LTS"`) using the
//! same prefix-tuple policy: the query's numeric components must be a prefix
//! of the cycle's, non-numeric suffix tokens (`LTS`, Oracle's `c`, year
//! codes) are carried separately and compared case-insensitively, a bare
//! major-only query selects the earliest matching cycle, and a full
//! major.minor.patch query must match exactly.

use regex::Regex;
use std::cmp::Ordering;
use std::sync::OnceLock;

fn version_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d+(?:\.\d+)*)\s*(.*)$").unwrap())
}

/// A version string split into its numeric tuple and trailing suffix token.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VersionQuery {
    pub numeric: Vec<u64>,
    pub suffix: Option<String>,
}

impl VersionQuery {
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Self::default();
        }

        let re = version_re();
        let Some(caps) = re.captures(trimmed) else {
            return Self {
                numeric: Vec::new(),
                suffix: Some(trimmed.to_lowercase()),
            };
        };

        let numeric = caps[1]
            .split('.')
            .filter_map(|part| part.parse::<u64>().ok())
            .collect();
        let suffix_raw = caps[2].trim();
        let suffix = if suffix_raw.is_empty() {
            None
        } else {
            Some(suffix_raw.to_lowercase())
        };

        Self { numeric, suffix }
    }
}

/// Compare two arbitrary version strings, preferring semver ordering and
/// falling back to lexicographic comparison when either fails to parse.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    if let (Ok(ver_a), Ok(ver_b)) = (semver::Version::parse(a), semver::Version::parse(b)) {
        return ver_a.cmp(&ver_b);
    }
    a.cmp(b)
}

/// True when `query`'s numeric components are a non-empty prefix of `full`'s.
#[must_use]
pub fn is_prefix(query: &[u64], full: &[u64]) -> bool {
    !query.is_empty() && query.len() <= full.len() && query.iter().zip(full.iter()).all(|(q, f)| q == f)
}

/// Select the cycle string that best matches a caller's version query among
/// a set of candidate cycle strings, per the prefix-tuple matching policy:
///
/// - a query with 3+ numeric components (full semver) must match a cycle
///   exactly;
/// - an exact numeric match, when present, always wins;
/// - otherwise (bare major or major.minor query) the earliest — numerically
///   smallest — matching cycle is selected.
#[must_use]
pub fn select_cycle<'a>(query: &str, cycles: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
    let q = VersionQuery::parse(query);

    let mut candidates: Vec<(&str, VersionQuery)> = cycles
        .into_iter()
        .map(|c| (c, VersionQuery::parse(c)))
        .filter(|(_, c)| is_prefix(&q.numeric, &c.numeric))
        .collect();

    if candidates.is_empty() {
        return None;
    }

    if q.numeric.len() >= 3 {
        candidates.retain(|(_, c)| c.numeric == q.numeric);
        return candidates.into_iter().next().map(|(s, _)| s);
    }

    if let Some(exact) = candidates.iter().find(|(_, c)| c.numeric == q.numeric) {
        return Some(exact.0);
    }

    candidates.sort_by(|a, b| a.1.numeric.cmp(&b.1.numeric));
    candidates.first().map(|(s, _)| *s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_versions_semver() {
        assert_eq!(compare_versions("1.0.0", "1.0.1"), Ordering::Less);
        assert_eq!(compare_versions("1.0.1", "1.0.0"), Ordering::Greater);
        assert_eq!(compare_versions("1.0.0", "1.0.0"), Ordering::Equal);
    }

    #[test]
    fn test_parse_bare_major() {
        let q = VersionQuery::parse("12");
        assert_eq!(q.numeric, vec![12]);
        assert_eq!(q.suffix, None);
    }

    #[test]
    fn test_parse_oracle_suffix() {
        let q = VersionQuery::parse("12c");
        assert_eq!(q.numeric, vec![12]);
        assert_eq!(q.suffix, Some("c".to_string()));
    }

    #[test]
    fn test_parse_lts_suffix() {
        let q = VersionQuery::parse("18.04 LTS");
        assert_eq!(q.numeric, vec![18, 4]);
        assert_eq!(q.suffix, Some("lts".to_string()));
    }

    #[test]
    fn test_bare_major_selects_earliest_cycle() {
        let selected = select_cycle("12", ["12.2", "12.0", "12.1"]);
        assert_eq!(selected, Some("12.0"));
    }

    #[test]
    fn test_full_semver_requires_exact_match() {
        let selected = select_cycle("12.1.0", ["12.1", "12.1.0", "12.1.5"]);
        assert_eq!(selected, Some("12.1.0"));
    }

    #[test]
    fn test_full_semver_no_match() {
        let selected = select_cycle("12.1.3", ["12.1.0", "12.1.5"]);
        assert_eq!(selected, None);
    }

    #[test]
    fn test_no_matching_prefix() {
        let selected = select_cycle("9", ["12.0", "12.1"]);
        assert_eq!(selected, None);
    }

    #[test]
    fn test_major_minor_exact_over_prefix() {
        let selected = select_cycle("12.1", ["12.1", "12.10"]);
        assert_eq!(selected, Some("12.1"));
    }
}
