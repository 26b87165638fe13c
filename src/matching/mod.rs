//! Fuzzy matching used by aggregator providers when a direct lookup misses.

pub mod similarity;

pub use similarity::{score_candidate, score_to_confidence, CANDIDATE_THRESHOLD, FUZZY_CONFIDENCE_CAP};
