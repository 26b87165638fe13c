//! Configuration types for eol-sentry.
//!
//! Provides structured configuration for the orchestrator, provider
//! registry, cache, and telemetry ring — the knobs an operator can tune
//! without touching code.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ============================================================================
// Unified Application Configuration
// ============================================================================

/// Unified application configuration that can be loaded from CLI args or
/// config files.
///
/// This is the top-level configuration struct that aggregates all
/// configuration options. It can be constructed from CLI arguments, config
/// files, or both (with CLI overriding file settings).
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    /// Orchestrator concurrency/timeout tuning.
    pub orchestrator: OrchestratorSettings,
    /// Per-provider enable/disable list.
    pub providers: ProvidersConfig,
    /// Cache backend and directory.
    pub cache: CacheConfig,
    /// Telemetry ring buffer sizing.
    pub telemetry: TelemetryConfig,
    /// Output/behavior flags shared by every CLI subcommand.
    pub behavior: BehaviorConfig,
}

impl AppConfig {
    /// Create a new `AppConfig` with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an `AppConfig` builder.
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }
}

// ============================================================================
// Orchestrator Settings
// ============================================================================

/// Concurrency and timeout knobs handed to
/// [`crate::orchestrator::OrchestratorConfig`].
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OrchestratorSettings {
    /// Maximum number of concurrent provider lookups per request.
    pub max_in_flight: usize,
    /// Overall request deadline, in seconds.
    pub request_deadline_secs: u64,
    /// Per-provider-call timeout, in seconds, clamped to the remaining
    /// request deadline.
    pub provider_timeout_secs: u64,
    /// Inventory lookback window, in days.
    pub inventory_window_days: u64,
    /// Maximum inventory rows fetched per collector call.
    pub inventory_limit: usize,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            max_in_flight: crate::orchestrator::DEFAULT_MAX_IN_FLIGHT,
            request_deadline_secs: crate::orchestrator::DEFAULT_REQUEST_DEADLINE.as_secs(),
            provider_timeout_secs: crate::orchestrator::DEFAULT_PROVIDER_TIMEOUT.as_secs(),
            inventory_window_days: crate::orchestrator::DEFAULT_INVENTORY_WINDOW.as_secs() / 86_400,
            inventory_limit: crate::orchestrator::DEFAULT_INVENTORY_LIMIT,
        }
    }
}

impl OrchestratorSettings {
    /// Convert into the runtime [`crate::orchestrator::OrchestratorConfig`].
    #[must_use]
    pub fn to_orchestrator_config(&self) -> crate::orchestrator::OrchestratorConfig {
        crate::orchestrator::OrchestratorConfig {
            max_in_flight: self.max_in_flight,
            request_deadline: std::time::Duration::from_secs(self.request_deadline_secs),
            provider_timeout: std::time::Duration::from_secs(self.provider_timeout_secs),
            inventory_window: std::time::Duration::from_secs(self.inventory_window_days * 86_400),
            inventory_limit: self.inventory_limit,
        }
    }
}

// ============================================================================
// Providers Configuration
// ============================================================================

/// Which providers are turned off at startup.
///
/// A disabled provider is dropped from the [`crate::providers::ProviderRegistry`]
/// entirely (spec §7 `disabled` error kind), so the router never routes to
/// it and the cascade falls through to the next candidate.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ProvidersConfig {
    pub disabled: Vec<String>,
}

// ============================================================================
// Cache Configuration
// ============================================================================

/// Where the lookup cache persists its entries, if anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CacheBackendKind {
    /// Nothing survives process restart; the in-memory cache is still used
    /// for single-flight coalescing within a run.
    None,
    /// Persist entries as files under `cache.dir`.
    File,
}

impl Default for CacheBackendKind {
    fn default() -> Self {
        Self::None
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct CacheConfig {
    pub backend: CacheBackendKind,
    /// Directory for the file-backed cache. Defaults to
    /// `~/.cache/eol-sentry` when `backend = file` and this is unset.
    pub dir: Option<PathBuf>,
}

impl CacheConfig {
    /// Build the runtime [`crate::cache::Cache`] this config describes.
    #[must_use]
    pub fn build_cache(&self) -> crate::cache::Cache {
        match self.backend {
            CacheBackendKind::None => crate::cache::Cache::new(),
            CacheBackendKind::File => {
                let dir = self
                    .dir
                    .clone()
                    .or_else(|| dirs::cache_dir().map(|d| d.join("eol-sentry")))
                    .unwrap_or_else(|| PathBuf::from(".eol-sentry-cache"));
                crate::cache::Cache::with_backend(std::sync::Arc::new(crate::cache::FileBackend::new(dir)))
            }
        }
    }
}

// ============================================================================
// Telemetry Configuration
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Number of events kept in the in-memory ring before the oldest are
    /// evicted.
    pub ring_capacity: usize,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            ring_capacity: crate::telemetry::DEFAULT_RING_CAPACITY,
        }
    }
}

// ============================================================================
// Behavior Configuration
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Suppress non-essential output (progress lines, warnings) on the CLI.
    pub quiet: bool,
    /// Disable colored output (also respects `NO_COLOR`).
    pub no_color: bool,
}

// ============================================================================
// Builder for AppConfig
// ============================================================================

/// Builder for constructing `AppConfig` with a fluent API.
#[derive(Debug, Default)]
#[must_use]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    /// Set the maximum number of concurrent provider lookups.
    pub const fn max_in_flight(mut self, n: usize) -> Self {
        self.config.orchestrator.max_in_flight = n;
        self
    }

    /// Set the overall request deadline, in seconds.
    pub const fn request_deadline_secs(mut self, secs: u64) -> Self {
        self.config.orchestrator.request_deadline_secs = secs;
        self
    }

    /// Set the per-provider-call timeout, in seconds.
    pub const fn provider_timeout_secs(mut self, secs: u64) -> Self {
        self.config.orchestrator.provider_timeout_secs = secs;
        self
    }

    /// Disable a set of providers by id.
    pub fn disable_providers(mut self, ids: Vec<String>) -> Self {
        self.config.providers.disabled = ids;
        self
    }

    /// Use a file-backed cache rooted at `dir`.
    pub fn file_cache(mut self, dir: PathBuf) -> Self {
        self.config.cache.backend = CacheBackendKind::File;
        self.config.cache.dir = Some(dir);
        self
    }

    /// Set the telemetry ring capacity.
    pub const fn telemetry_ring_capacity(mut self, capacity: usize) -> Self {
        self.config.telemetry.ring_capacity = capacity;
        self
    }

    /// Enable quiet mode.
    pub const fn quiet(mut self, quiet: bool) -> Self {
        self.config.behavior.quiet = quiet;
        self
    }

    /// Disable colored output.
    pub const fn no_color(mut self, no_color: bool) -> Self {
        self.config.behavior.no_color = no_color;
        self
    }

    /// Build the `AppConfig`.
    #[must_use]
    pub fn build(self) -> AppConfig {
        self.config
    }
}
