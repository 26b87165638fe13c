//! Configuration module for eol-sentry.
//!
//! This module provides a unified configuration system with:
//! - Type-safe configuration structures
//! - Validation for all configuration values
//! - Named presets for common deployment shapes
//! - YAML config file loading and discovery
//! - CLI argument merging
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use eol_sentry::config::{AppConfig, ConfigPreset};
//!
//! // Use defaults
//! let config = AppConfig::default();
//!
//! // Use a preset
//! let config = AppConfig::from_preset(ConfigPreset::Strict);
//!
//! // Use builder
//! let config = AppConfig::builder()
//!     .max_in_flight(4)
//!     .disable_providers(vec!["websearch".to_string()])
//!     .build();
//!
//! // Load from file
//! use eol_sentry::config::file::load_or_default;
//! let (config, loaded_from) = load_or_default(None);
//! ```
//!
//! # Configuration File
//!
//! Place a `.eol-sentry.yaml` file in your project root or
//! `~/.config/eol-sentry/`:
//!
//! ```yaml
//! orchestrator:
//!   max_in_flight: 4
//! providers:
//!   disabled: [websearch]
//! ```

mod defaults;
pub mod file;
mod types;
mod validation;

pub use defaults::ConfigPreset;
pub use types::{
    AppConfig, AppConfigBuilder, BehaviorConfig, CacheBackendKind, CacheConfig, OrchestratorSettings,
    ProvidersConfig, TelemetryConfig,
};
pub use validation::{ConfigError, Validatable};

pub use file::{
    discover_config_file, generate_example_config, generate_full_example_config, load_config_file,
    load_or_default, ConfigFileError,
};

/// Generate a JSON Schema for the `AppConfig` configuration format.
///
/// This schema documents all configuration options that can be set in
/// `.eol-sentry.yaml` config files. It can be used by editors for
/// validation and autocompletion.
#[must_use]
pub fn generate_json_schema() -> String {
    let schema = schemars::schema_for!(AppConfig);
    serde_json::to_string_pretty(&schema).expect("schema serialization should not fail")
}
