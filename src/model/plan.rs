//! Plan: the ordered cascade of providers the [`crate::router::Router`]
//! builds for a single asset, plus the rule that decides when to stop.

use serde::{Deserialize, Serialize};

/// Decides when a [`crate::orchestrator::Orchestrator`] stops advancing a
/// Plan's cascade.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StopRule {
    /// Stop at the first result whose confidence meets or exceeds the
    /// threshold; otherwise keep the best result seen so far.
    FirstSuccess { min_confidence: f64 },
    /// Always run every provider in the plan and keep the best result.
    CollectBest,
    /// Stop once `n` providers agree (status, is_none-ness of eol_date).
    Quorum { n: usize },
}

impl StopRule {
    #[must_use]
    pub const fn first_success_default() -> Self {
        Self::FirstSuccess { min_confidence: 0.6 }
    }
}

/// An ordered cascade of provider ids to try for a single
/// [`crate::model::Fingerprint`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    pub provider_ids: Vec<String>,
    pub stop_rule: StopRule,
}

impl Plan {
    #[must_use]
    pub fn new(provider_ids: Vec<String>, stop_rule: StopRule) -> Self {
        Self {
            provider_ids,
            stop_rule,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.provider_ids.is_empty()
    }
}
