//! Aggregator fuzzy-matching scorer.
//!
//! Used by the catalog-similarity-scan strategy in
//! [`crate::providers::endoflife`] and [`crate::providers::eolstatus`] when
//! a direct-GET and name-variation search both miss.

use std::collections::HashSet;

/// Minimum score for a catalog entry to be considered a candidate at all.
pub const CANDIDATE_THRESHOLD: f64 = 0.3;

/// Confidence ceiling for any fuzzy (non-exact) aggregator match.
pub const FUZZY_CONFIDENCE_CAP: f64 = 0.75;

/// Score a catalog product name against a normalized query name.
///
/// - Exact match: `1.0`
/// - One contains the other: `0.8`
/// - Otherwise: Jaccard token similarity, `+0.3` bonus if every query token
///   appears somewhere in the candidate.
#[must_use]
pub fn score_candidate(query: &str, candidate: &str) -> f64 {
    if query == candidate {
        return 1.0;
    }
    if candidate.contains(query) || query.contains(candidate) {
        return 0.8;
    }

    let query_tokens = tokenize(query);
    let candidate_tokens = tokenize(candidate);
    let jaccard = jaccard_similarity(&query_tokens, &candidate_tokens);

    let bonus = if !query_tokens.is_empty() && query_tokens.is_subset(&candidate_tokens) {
        0.3
    } else {
        0.0
    };

    (jaccard + bonus).min(1.0)
}

/// Convert a raw similarity score into the confidence reported on a
/// [`crate::model::LookupResult`] from a fuzzy aggregator match.
#[must_use]
pub fn score_to_confidence(score: f64) -> f64 {
    score.min(FUZZY_CONFIDENCE_CAP)
}

fn tokenize(s: &str) -> HashSet<&str> {
    s.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect()
}

fn jaccard_similarity(a: &HashSet<&str>, b: &HashSet<&str>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    intersection as f64 / union as f64
}
