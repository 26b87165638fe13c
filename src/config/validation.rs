//! Configuration validation for eol-sentry.
//!
//! Provides validation traits and implementations for all configuration
//! types.

use super::types::*;

// ============================================================================
// Configuration Error
// ============================================================================

/// Error type for configuration validation.
#[derive(Debug, Clone)]
pub struct ConfigError {
    /// The field that failed validation.
    pub field: String,
    /// Description of the validation error.
    pub message: String,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

// ============================================================================
// Validation Implementations
// ============================================================================

impl Validatable for AppConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.orchestrator.validate());
        errors.extend(self.cache.validate());
        errors.extend(self.telemetry.validate());
        errors
    }
}

impl Validatable for OrchestratorSettings {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.max_in_flight == 0 {
            errors.push(ConfigError {
                field: "orchestrator.max_in_flight".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        if self.request_deadline_secs == 0 {
            errors.push(ConfigError {
                field: "orchestrator.request_deadline_secs".to_string(),
                message: "must be at least 1 second".to_string(),
            });
        }

        if self.provider_timeout_secs > self.request_deadline_secs {
            errors.push(ConfigError {
                field: "orchestrator.provider_timeout_secs".to_string(),
                message: format!(
                    "provider_timeout_secs ({}) exceeds request_deadline_secs ({}); every call would be cut short by the request deadline first",
                    self.provider_timeout_secs, self.request_deadline_secs
                ),
            });
        }

        if self.inventory_limit == 0 {
            errors.push(ConfigError {
                field: "orchestrator.inventory_limit".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        errors
    }
}

impl Validatable for CacheConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.backend == CacheBackendKind::File && self.dir.is_none() {
            errors.push(ConfigError {
                field: "cache.dir".to_string(),
                message: "backend = file requires a directory; set cache.dir or switch to backend = none".to_string(),
            });
        }
        errors
    }
}

impl Validatable for TelemetryConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.ring_capacity == 0 {
            errors.push(ConfigError {
                field: "telemetry.ring_capacity".to_string(),
                message: "must be at least 1; a zero-capacity ring discards every event".to_string(),
            });
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(AppConfig::default().is_valid());
    }

    #[test]
    fn test_zero_max_in_flight_is_invalid() {
        let mut config = AppConfig::default();
        config.orchestrator.max_in_flight = 0;
        assert!(!config.is_valid());
    }

    #[test]
    fn test_provider_timeout_exceeding_deadline_is_invalid() {
        let mut config = AppConfig::default();
        config.orchestrator.request_deadline_secs = 5;
        config.orchestrator.provider_timeout_secs = 10;
        assert!(!config.is_valid());
    }

    #[test]
    fn test_file_cache_without_dir_is_invalid() {
        let mut config = AppConfig::default();
        config.cache.backend = CacheBackendKind::File;
        assert!(!config.is_valid());
    }

    #[test]
    fn test_file_cache_with_dir_is_valid() {
        let mut config = AppConfig::default();
        config.cache.backend = CacheBackendKind::File;
        config.cache.dir = Some("/tmp/eol-sentry-cache".into());
        assert!(config.is_valid());
    }
}
