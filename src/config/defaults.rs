//! Default configurations and presets for eol-sentry.
//!
//! Provides named presets for common deployment shapes and the default
//! values those presets deviate from.

use super::types::{AppConfig, BehaviorConfig, OrchestratorSettings, ProvidersConfig};

/// Known-low-confidence providers a strict deployment may want to skip
/// entirely rather than surface a web-search-derived date.
const LOW_CONFIDENCE_PROVIDERS: &[&str] = &["websearch"];

// ============================================================================
// Configuration Presets
// ============================================================================

/// Named configuration presets for common deployment shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigPreset {
    /// Default balanced settings suitable for most cases.
    Default,
    /// Strict: vendor/aggregator sources only, no web-search fallback.
    Strict,
    /// CI/CD: quiet, higher concurrency, short deadline for pipeline use.
    CiCd,
    /// Permissive: longer deadlines and a larger inventory scan window, for
    /// slow or heavily loaded telemetry backends.
    Permissive,
}

impl ConfigPreset {
    /// Get the preset name as a string.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Strict => "strict",
            Self::CiCd => "ci-cd",
            Self::Permissive => "permissive",
        }
    }

    /// Parse a preset from a string name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "default" | "balanced" => Some(Self::Default),
            "strict" | "high-confidence" => Some(Self::Strict),
            "ci-cd" | "ci" | "cd" | "pipeline" => Some(Self::CiCd),
            "permissive" | "loose" => Some(Self::Permissive),
            _ => None,
        }
    }

    /// Get a description of this preset.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Default => "Balanced settings suitable for most deployments",
            Self::Strict => "Vendor and aggregator sources only; no web-search fallback",
            Self::CiCd => "Quiet, high-concurrency settings for pipeline use",
            Self::Permissive => "Longer deadlines and a wider inventory window for slow backends",
        }
    }

    /// Get all available presets.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Default, Self::Strict, Self::CiCd, Self::Permissive]
    }
}

impl std::fmt::Display for ConfigPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// Preset Implementations
// ============================================================================

impl AppConfig {
    /// Create an `AppConfig` from a named preset.
    #[must_use]
    pub fn from_preset(preset: ConfigPreset) -> Self {
        match preset {
            ConfigPreset::Default => Self::default(),
            ConfigPreset::Strict => Self::strict_preset(),
            ConfigPreset::CiCd => Self::ci_cd_preset(),
            ConfigPreset::Permissive => Self::permissive_preset(),
        }
    }

    /// Strict preset: only high-confidence vendor/aggregator providers run;
    /// the web-search fallback is disabled outright rather than accepted at
    /// its low confidence ceiling.
    #[must_use]
    pub fn strict_preset() -> Self {
        Self {
            providers: ProvidersConfig {
                disabled: LOW_CONFIDENCE_PROVIDERS.iter().map(|s| (*s).to_string()).collect(),
            },
            ..Self::default()
        }
    }

    /// CI/CD preset: quiet output, a shorter deadline so a pipeline step
    /// fails fast, and more concurrency to get through a full inventory scan
    /// within that deadline.
    #[must_use]
    pub fn ci_cd_preset() -> Self {
        Self {
            orchestrator: OrchestratorSettings {
                max_in_flight: 16,
                request_deadline_secs: 30,
                ..OrchestratorSettings::default()
            },
            behavior: BehaviorConfig {
                quiet: true,
                no_color: true,
            },
            ..Self::default()
        }
    }

    /// Permissive preset: longer deadlines and a wider inventory lookback,
    /// for telemetry backends that are slow or rarely polled.
    #[must_use]
    pub fn permissive_preset() -> Self {
        Self {
            orchestrator: OrchestratorSettings {
                request_deadline_secs: 180,
                provider_timeout_secs: 30,
                inventory_window_days: 30,
                inventory_limit: 5_000,
                ..OrchestratorSettings::default()
            },
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_round_trips_through_name() {
        for preset in ConfigPreset::all() {
            assert_eq!(ConfigPreset::from_name(preset.name()), Some(*preset));
        }
    }

    #[test]
    fn test_strict_preset_disables_websearch() {
        let config = AppConfig::from_preset(ConfigPreset::Strict);
        assert!(config.providers.disabled.contains(&"websearch".to_string()));
    }

    #[test]
    fn test_ci_cd_preset_is_quiet_and_fast() {
        let config = AppConfig::from_preset(ConfigPreset::CiCd);
        assert!(config.behavior.quiet);
        assert_eq!(config.orchestrator.request_deadline_secs, 30);
    }

    #[test]
    fn test_permissive_preset_widens_inventory_window() {
        let config = AppConfig::from_preset(ConfigPreset::Permissive);
        assert_eq!(config.orchestrator.inventory_window_days, 30);
    }
}
