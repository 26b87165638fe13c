//! Router: build a [`Plan`] from a classification and an optional asset
//! (spec §4.5, C5).

use crate::classifier::TaskType;
use crate::model::{Fingerprint, Plan, StopRule};
use crate::providers::ProviderRegistry;

/// Build the provider cascade for a single asset under the given task.
///
/// - `InventoryOnly` never needs a provider cascade — the orchestrator
///   only calls the InventoryCollector for that task.
/// - `EolOnly`/`MixedInventoryEol` pick the first vendor provider whose
///   `Supports` predicate matches, then the two aggregators, then the
///   web-search fallback, with `StopRule::FirstSuccess` at the default
///   0.6 confidence threshold (falling back to collect-best already
///   being what "best so far" means once the cascade runs out).
/// - `InternetEol` skips straight to the web-search provider alone.
/// - `UpdatePlanning` reuses the `EolOnly` cascade: it still needs current
///   lifecycle data to ground an upgrade recommendation.
#[must_use]
pub fn route(registry: &ProviderRegistry, task: TaskType, fp: Option<&Fingerprint>) -> Plan {
    match task {
        TaskType::InventoryOnly => Plan::new(Vec::new(), StopRule::CollectBest),
        TaskType::InternetEol => Plan::new(vec!["websearch".to_string()], StopRule::CollectBest),
        TaskType::EolOnly | TaskType::MixedInventoryEol | TaskType::UpdatePlanning => {
            build_cascade(registry, fp)
        }
    }
}

fn build_cascade(registry: &ProviderRegistry, fp: Option<&Fingerprint>) -> Plan {
    let Some(fp) = fp else {
        return Plan::new(Vec::new(), StopRule::CollectBest);
    };

    let mut provider_ids: Vec<String> = registry
        .supporting(fp)
        .into_iter()
        .map(|p| p.id().to_string())
        .collect();

    // `supporting` already sorts by ascending priority, which places the
    // matching vendor provider(s) ahead of the aggregators ahead of
    // web-search — exactly the cascade order spec §4.5 describes.
    provider_ids.dedup();

    Plan::new(provider_ids, StopRule::first_success_default())
}
