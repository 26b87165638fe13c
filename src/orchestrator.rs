//! Orchestrator: the request state machine — Classify → GatherInventory →
//! ExtractAssets → Dispatch → ExecutePlan → Aggregate → Render (spec §4.6,
//! C6).

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tokio::sync::{watch, Semaphore};

use crate::cache::Cache;
use crate::classifier::{classify, QueryIntent, TaskType};
use crate::error::{EolSentryError, ProviderErrorKind};
use crate::inventory::{self, InventoryCollector, NoOpBackend};
use crate::model::{AggregateReport, Asset, ItemKind, LookupResult, Plan, ReportEntry, StopRule};
use crate::providers::{retry, Provider, ProviderRegistry};
use crate::router;
use crate::telemetry::{EventType, Telemetry};
use crate::utils;

/// Default request deadline when the caller doesn't supply one (spec §5).
pub const DEFAULT_REQUEST_DEADLINE: Duration = Duration::from_secs(60);
/// Default per-provider-call timeout, clamped to the remaining request
/// deadline (spec §5).
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(15);
/// Default worker-pool width (spec §4.6 concurrency contract).
pub const DEFAULT_MAX_IN_FLIGHT: usize = 8;
/// Default inventory lookback window.
pub const DEFAULT_INVENTORY_WINDOW: Duration = Duration::from_secs(7 * 24 * 60 * 60);
/// Default inventory row limit per collector call.
pub const DEFAULT_INVENTORY_LIMIT: usize = 500;

/// Tunable orchestrator behavior, normally populated from
/// [`crate::config::AppConfig`].
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    pub max_in_flight: usize,
    pub request_deadline: Duration,
    pub provider_timeout: Duration,
    pub inventory_window: Duration,
    pub inventory_limit: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
            request_deadline: DEFAULT_REQUEST_DEADLINE,
            provider_timeout: DEFAULT_PROVIDER_TIMEOUT,
            inventory_window: DEFAULT_INVENTORY_WINDOW,
            inventory_limit: DEFAULT_INVENTORY_LIMIT,
        }
    }
}

/// Inbound `Chat` request (spec §6).
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub timeout_seconds: Option<u64>,
    pub confirm: Option<ConfirmPayload>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConfirmPayload {
    pub confirmed: bool,
    pub original_message: String,
}

/// Outbound `Chat` response (spec §6).
#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    pub markdown: String,
    pub report: AggregateReport,
    pub session_id: String,
}

/// Outbound `Health` response (spec §6).
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub ok: bool,
    pub providers: Vec<ProviderHealth>,
    pub version: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProviderHealth {
    pub id: String,
    pub ready: bool,
}

/// The request state machine. Owns the shared [`Cache`] and [`Telemetry`]
/// ring for its lifetime; per-request state (deadline, cancellation) lives
/// in the call, not here.
pub struct Orchestrator {
    registry: ProviderRegistry,
    cache: Arc<Cache>,
    telemetry: Arc<Telemetry>,
    inventory: Arc<InventoryCollector>,
    config: OrchestratorConfig,
}

impl Orchestrator {
    #[must_use]
    pub fn new(session_id: impl Into<String>) -> Self {
        Self::with_parts(
            ProviderRegistry::default_registry(),
            Cache::new(),
            Telemetry::new(session_id),
            InventoryCollector::new(Box::new(NoOpBackend)),
            OrchestratorConfig::default(),
        )
    }

    #[must_use]
    pub fn with_parts(
        registry: ProviderRegistry,
        cache: Cache,
        telemetry: Telemetry,
        inventory: InventoryCollector,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            registry,
            cache: Arc::new(cache),
            telemetry: Arc::new(telemetry),
            inventory: Arc::new(inventory),
            config,
        }
    }

    #[must_use]
    pub fn telemetry(&self) -> &Telemetry {
        &self.telemetry
    }

    #[must_use]
    pub fn health(&self) -> HealthStatus {
        HealthStatus {
            ok: true,
            providers: self
                .registry
                .all()
                .iter()
                .map(|p| ProviderHealth {
                    id: p.id().to_string(),
                    ready: true,
                })
                .collect(),
            version: env!("CARGO_PKG_VERSION"),
        }
    }

    /// Delete cached entries for a provider, optionally scoped to one asset.
    pub async fn purge_cache(&self, agent_id: &str, asset: Option<&Asset>) -> usize {
        let fp = asset.map(Asset::fingerprint);
        self.cache.purge(agent_id, fp.as_ref()).await
    }

    /// Resolve a single asset directly, bypassing classification and
    /// inventory collection entirely. Used by the `lookup` CLI subcommand
    /// (spec §6), where the caller already knows exactly which asset it
    /// wants resolved.
    ///
    /// If `forced_agent` is set, the cascade is pinned to that single
    /// provider instead of going through [`router::route`].
    pub async fn lookup_asset(&self, asset: &Asset, forced_agent: Option<&str>, deadline: Duration) -> LookupResult {
        let request_id = request_id();
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let deadline_guard = tokio::spawn(async move {
            tokio::time::sleep(deadline).await;
            let _ = cancel_tx.send(true);
        });

        let fp = asset.fingerprint();
        let plan = match forced_agent {
            Some(id) => Plan::new(vec![id.to_string()], StopRule::CollectBest),
            None => router::route(&self.registry, TaskType::EolOnly, Some(&fp)),
        };

        let result = execute_plan(
            &self.registry,
            &self.cache,
            &self.telemetry,
            asset,
            &plan,
            &request_id,
            self.config.provider_timeout,
            &cancel_rx,
        )
        .await;
        deadline_guard.abort();
        result
    }

    /// Handle an inbound `Chat` request (spec §6), including the
    /// confirm/refusal short-circuit.
    pub async fn run_chat(&self, request: ChatRequest) -> ChatResponse {
        if let Some(confirm) = &request.confirm {
            if !confirm.confirmed {
                self.telemetry
                    .record(
                        &request_id(),
                        "orchestrator",
                        EventType::Cancellation,
                        serde_json::json!({"reason": "user declined confirmation"}),
                    )
                    .await;
                return ChatResponse {
                    markdown: "Request declined: not executed without confirmation.".to_string(),
                    report: AggregateReport::new(),
                    session_id: self.telemetry.session_id().to_string(),
                };
            }
        }

        let deadline = request
            .timeout_seconds
            .map(Duration::from_secs)
            .unwrap_or(self.config.request_deadline);

        let report = self.run(&request.message, deadline).await;
        let markdown = crate::reports::render_markdown(&report);

        ChatResponse {
            markdown,
            report,
            session_id: self.telemetry.session_id().to_string(),
        }
    }

    /// Run the full state machine for one user message (spec §4.6).
    pub async fn run(&self, user_message: &str, deadline: Duration) -> AggregateReport {
        let request_id = request_id();
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let deadline_guard = tokio::spawn(async move {
            tokio::time::sleep(deadline).await;
            let _ = cancel_tx.send(true);
        });

        let report = self.run_inner(&request_id, user_message, &cancel_rx).await;
        deadline_guard.abort();
        report
    }

    async fn run_inner(
        &self,
        request_id: &str,
        user_message: &str,
        cancel: &watch::Receiver<bool>,
    ) -> AggregateReport {
        // 1. Classify
        let classification = classify(user_message);
        self.telemetry
            .record(
                request_id,
                "classifier",
                EventType::ClassifierDecision,
                serde_json::json!({"intent": classification.intent, "task": classification.task}),
            )
            .await;

        let mut report = AggregateReport::new();

        // 2. GatherInventory, if this task needs it.
        let needs_inventory = matches!(
            classification.task,
            TaskType::InventoryOnly | TaskType::MixedInventoryEol
        );
        let wants_software_only = matches!(
            classification.intent,
            QueryIntent::SoftwareInventory | QueryIntent::SoftwareEolGrounded
        );
        let wants_os_only = matches!(
            classification.intent,
            QueryIntent::OsInventory | QueryIntent::OsEolGrounded
        );

        let mut inventory_assets = Vec::new();
        if needs_inventory {
            self.telemetry
                .record(request_id, "orchestrator", EventType::StateTransition, serde_json::json!({"state": "gather_inventory"}))
                .await;

            let (os_assets, software_assets) = tokio::join!(
                async {
                    if wants_software_only {
                        Vec::new()
                    } else {
                        self.inventory
                            .collect_os(self.config.inventory_window, self.config.inventory_limit)
                            .await
                            .unwrap_or_default()
                    }
                },
                async {
                    if wants_os_only {
                        Vec::new()
                    } else {
                        self.inventory
                            .collect_software(self.config.inventory_window, self.config.inventory_limit)
                            .await
                            .unwrap_or_default()
                    }
                }
            );
            inventory_assets.extend(os_assets);
            inventory_assets.extend(software_assets);
        }

        // 3. ExtractAssets
        self.telemetry
            .record(request_id, "orchestrator", EventType::StateTransition, serde_json::json!({"state": "extract_assets"}))
            .await;

        let mut assets = inventory_assets;
        if classification.task != TaskType::InventoryOnly {
            if let Some(asset) = extract_asset_from_message(user_message) {
                assets.push(asset);
            }
        }
        dedup_assets(&mut assets);

        if classification.task == TaskType::InventoryOnly {
            for asset in &assets {
                let mut result = LookupResult::success(asset.name.as_str(), "inventory", None, 1.0);
                result.version = asset.version.clone();
                report.push(ReportEntry::new(asset.name.clone(), asset.version.clone(), result));
            }
            report.sort_for_render();
            return report;
        }

        // 4-5. Dispatch + ExecutePlan, bounded by the worker pool.
        self.telemetry
            .record(
                request_id,
                "orchestrator",
                EventType::StateTransition,
                serde_json::json!({"state": "dispatch", "asset_count": assets.len()}),
            )
            .await;

        let semaphore = Arc::new(Semaphore::new(self.config.max_in_flight.max(1)));
        let mut handles = Vec::new();

        for asset in assets {
            if *cancel.borrow() {
                break;
            }
            let semaphore = semaphore.clone();
            let fp = asset.fingerprint();
            let plan = router::route(&self.registry, classification.task, Some(&fp));
            let request_id = request_id.to_string();
            let cancel = cancel.clone();
            let registry = self.registry.clone();
            let cache = self.cache.clone();
            let telemetry = self.telemetry.clone();
            let provider_timeout = self.config.provider_timeout;

            handles.push(tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok()?;
                let result = execute_plan(&registry, &cache, &telemetry, &asset, &plan, &request_id, provider_timeout, &cancel).await;
                Some((asset, result))
            }));
        }

        for handle in handles {
            if let Ok(Some((asset, result))) = handle.await {
                report.push(ReportEntry::new(asset.name.clone(), asset.version.clone(), result));
            }
        }

        // 6. Aggregate (sorting is the deterministic render-order step).
        report.sort_for_render();

        // 7. Render is the caller's job via `crate::reports::render_markdown`.
        report
    }
}

#[allow(clippy::too_many_arguments)]
async fn execute_plan(
    registry: &ProviderRegistry,
    cache: &Cache,
    telemetry: &Telemetry,
    asset: &Asset,
    plan: &Plan,
    request_id: &str,
    provider_timeout: Duration,
    cancel: &watch::Receiver<bool>,
) -> LookupResult {
    if plan.is_empty() {
        return LookupResult::not_found(asset.name.as_str(), "router");
    }

    let fp = asset.fingerprint();
    let mut best: Option<LookupResult> = None;
    let mut attempted_ids = Vec::new();
    let mut attempted_outcomes: Vec<String> = Vec::new();

    for provider_id in &plan.provider_ids {
        if *cancel.borrow() {
            break;
        }

        let Some(provider) = registry.get(provider_id) else {
            continue;
        };
        attempted_ids.push(provider_id.clone());

        if cache.get(&fp, provider_id).await.is_some() {
            telemetry
                .record(request_id, "cache", EventType::CacheHit, serde_json::json!({"provider": provider_id}))
                .await;
        } else {
            telemetry
                .record(request_id, "cache", EventType::CacheMiss, serde_json::json!({"provider": provider_id}))
                .await;
        }

        let fp_for_job = fp.clone();
        let request_id_owned = request_id.to_string();
        let outcome = cache
            .get_or_compute(&fp, provider_id, move || {
                call_with_retry(provider, fp_for_job, telemetry, request_id_owned, provider_timeout)
            })
            .await;

        match outcome {
            Ok(result) => {
                attempted_outcomes.push(format!(
                    "{provider_id}: {}",
                    if result.success { "found" } else { "not_found" }
                ));

                let should_stop = match plan.stop_rule {
                    StopRule::FirstSuccess { min_confidence } => result.success && result.confidence >= min_confidence,
                    StopRule::CollectBest => false,
                    StopRule::Quorum { n } => attempted_ids.len() >= n && result.success,
                };

                let better = best.as_ref().map(|b| result.confidence > b.confidence).unwrap_or(true);
                if better {
                    best = Some(result);
                }

                if should_stop {
                    break;
                }
            }
            Err(e) => {
                attempted_outcomes.push(format!("{provider_id}: {e}"));
                continue;
            }
        }
    }

    best.unwrap_or_else(|| {
        let source = attempted_ids.last().cloned().unwrap_or_default();
        LookupResult::not_found(asset.name.as_str(), source).with_extra(
            "attempted_providers",
            serde_json::Value::Array(attempted_outcomes.into_iter().map(serde_json::Value::String).collect()),
        )
    })
}

async fn call_with_retry(
    provider: Arc<dyn Provider>,
    fp: crate::model::Fingerprint,
    telemetry: &Telemetry,
    request_id: String,
    timeout: Duration,
) -> crate::error::Result<LookupResult> {
    let mut attempt = 0u32;

    loop {
        telemetry
            .record(&request_id, provider.id(), EventType::ProviderCallStart, serde_json::json!({"attempt": attempt}))
            .await;

        let call = tokio::time::timeout(timeout, provider.lookup(&fp)).await;

        let outcome = match call {
            Ok(inner) => inner,
            Err(_) => Err(ProviderErrorKind::Timeout),
        };

        telemetry
            .record(
                &request_id,
                provider.id(),
                EventType::ProviderCallFinish,
                serde_json::json!({"attempt": attempt, "success": outcome.is_ok()}),
            )
            .await;

        match outcome {
            Ok(result) => return Ok(result),
            Err(kind) if kind.is_retryable() && attempt + 1 < retry::MAX_ATTEMPTS => {
                telemetry
                    .record(&request_id, provider.id(), EventType::Retry, serde_json::json!({"attempt": attempt, "kind": kind.to_string()}))
                    .await;
                let delay = retry::backoff(attempt, retry::DEFAULT_BASE, retry::DEFAULT_FACTOR, retry::DEFAULT_JITTER_PCT);
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(kind) => return Err(EolSentryError::provider(format!("{} lookup failed", provider.id()), kind)),
        }
    }
}

fn dedup_assets(assets: &mut Vec<Asset>) {
    let mut seen = HashSet::new();
    assets.retain(|a| seen.insert(a.dedup_key()));
}

fn request_id() -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("req-{:016x}", utils::content_hash(n.to_le_bytes().as_slice()))
}

struct ExtractionLadder {
    lead_phrase: Regex,
    generic: Regex,
}

fn extraction_ladder() -> &'static ExtractionLadder {
    static LADDER: OnceLock<ExtractionLadder> = OnceLock::new();
    LADDER.get_or_init(|| ExtractionLadder {
        lead_phrase: Regex::new(
            r"(?i)^.*?\b(?:what(?:'s| is) (?:the )?(?:eol|end of life|end of support) (?:of|for)|when is the (?:eol|end of life|end of support) (?:of|for)|tell me about the (?:eol|end of life) of)\s+(.+)$",
        )
        .unwrap(),
        generic: Regex::new(r"(?i)^([A-Za-z][\w .+-]*?)\s+v?(\d+(?:\.\d+){0,3}[a-z]?)$").unwrap(),
    })
}

/// Best-effort extraction of a single [`Asset`] from free-form chat text,
/// per spec §4.6 state 3 ("regex extractor identical to §4.3 ladder"). Tries
/// the OS ladder first (its patterns search anywhere in the text), then
/// strips a recognized question lead-phrase, then falls back to a bare
/// `name version` match against the whole message.
#[must_use]
pub fn extract_asset_from_message(message: &str) -> Option<Asset> {
    if let Some((name, version, edition)) = inventory::match_os_ladder(message) {
        let mut asset = Asset::new(name, ItemKind::Os).with_raw_string(message.to_string());
        if let Some(v) = version {
            asset = asset.with_version(v);
        }
        if let Some(e) = edition {
            asset.extra.insert("edition".to_string(), serde_json::Value::String(e));
        }
        return Some(asset);
    }

    let ladder = extraction_ladder();
    let subject = ladder
        .lead_phrase
        .captures(message)
        .map(|caps| caps[1].trim_end_matches(['?', '.', '!']).trim().to_string())
        .unwrap_or_else(|| message.trim_end_matches(['?', '.', '!']).trim().to_string());

    ladder.generic.captures(&subject).map(|caps| {
        Asset::new(caps[1].trim().to_string(), ItemKind::Software)
            .with_version(caps[2].to_string())
            .with_raw_string(message.to_string())
    })
}
