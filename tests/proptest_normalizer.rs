//! Property-based tests for name/version normalization and classification.
//!
//! Ensures these pure functions never panic on arbitrary input and hold the
//! invariants the rest of the crate relies on (idempotence, stable output
//! shape) regardless of what a telemetry backend or chat message throws at
//! them.

use eol_sentry::classifier::classify;
use eol_sentry::normalizer::{normalize_name, normalize_version};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn normalize_name_doesnt_panic(s in "\\PC{0,200}") {
        let _ = normalize_name(&s);
    }

    #[test]
    fn normalize_name_is_idempotent(s in "\\PC{0,200}") {
        let once = normalize_name(&s);
        let twice = normalize_name(&once);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn normalize_name_never_contains_doubled_spaces(s in "[a-zA-Z0-9 ]{0,100}") {
        let normalized = normalize_name(&s);
        prop_assert!(!normalized.contains("  "));
    }

    #[test]
    fn normalize_version_doesnt_panic(s in "\\PC{0,100}") {
        let _ = normalize_version(&s);
    }

    #[test]
    fn normalize_version_strips_leading_v(s in "[0-9]{1,3}\\.[0-9]{1,3}") {
        let with_v = format!("v{s}");
        prop_assert_eq!(normalize_version(&with_v), normalize_version(&s));
    }

    #[test]
    fn classify_doesnt_panic(s in "\\PC{0,500}") {
        let _ = classify(&s);
    }
}
