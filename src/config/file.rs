//! Configuration file loading and discovery.
//!
//! Supports loading configuration from YAML files with automatic discovery.

use super::types::AppConfig;
use std::path::{Path, PathBuf};

// ============================================================================
// Configuration File Discovery
// ============================================================================

/// Standard config file names to search for.
const CONFIG_FILE_NAMES: &[&str] = &[
    ".eol-sentry.yaml",
    ".eol-sentry.yml",
    "eol-sentry.yaml",
    "eol-sentry.yml",
    ".eol-sentryrc",
];

/// Discover a config file by searching standard locations.
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Current directory
/// 3. Git repository root (if in a repo)
/// 4. User config directory (~/.config/eol-sentry/)
/// 5. Home directory
#[must_use]
pub fn discover_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path
        && path.exists()
    {
        return Some(path.to_path_buf());
    }

    if let Ok(cwd) = std::env::current_dir()
        && let Some(path) = find_config_in_dir(&cwd)
    {
        return Some(path);
    }

    if let Some(git_root) = find_git_root()
        && let Some(path) = find_config_in_dir(&git_root)
    {
        return Some(path);
    }

    if let Some(config_dir) = dirs::config_dir() {
        let sentry_config_dir = config_dir.join("eol-sentry");
        if let Some(path) = find_config_in_dir(&sentry_config_dir) {
            return Some(path);
        }
    }

    if let Some(home) = dirs::home_dir()
        && let Some(path) = find_config_in_dir(&home)
    {
        return Some(path);
    }

    None
}

/// Find a config file in a specific directory.
fn find_config_in_dir(dir: &Path) -> Option<PathBuf> {
    for name in CONFIG_FILE_NAMES {
        let path = dir.join(name);
        if path.exists() {
            return Some(path);
        }
    }
    None
}

/// Find the git repository root by walking up the directory tree.
fn find_git_root() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    let mut current = cwd.as_path();

    loop {
        let git_dir = current.join(".git");
        if git_dir.exists() {
            return Some(current.to_path_buf());
        }

        current = current.parent()?;
    }
}

// ============================================================================
// Configuration File Loading
// ============================================================================

/// Error type for config file operations.
#[derive(Debug)]
pub enum ConfigFileError {
    /// File not found.
    NotFound(PathBuf),
    /// IO error reading file.
    Io(std::io::Error),
    /// YAML parsing error.
    Parse(serde_yaml_ng::Error),
}

impl std::fmt::Display for ConfigFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(path) => {
                write!(f, "Config file not found: {}", path.display())
            }
            Self::Io(e) => write!(f, "Failed to read config file: {e}"),
            Self::Parse(e) => write!(f, "Failed to parse config file: {e}"),
        }
    }
}

impl std::error::Error for ConfigFileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ConfigFileError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_yaml_ng::Error> for ConfigFileError {
    fn from(err: serde_yaml_ng::Error) -> Self {
        Self::Parse(err)
    }
}

/// Load an `AppConfig` from a YAML file.
pub fn load_config_file(path: &Path) -> Result<AppConfig, ConfigFileError> {
    if !path.exists() {
        return Err(ConfigFileError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = serde_yaml_ng::from_str(&content)?;
    Ok(config)
}

/// Load config from discovered file, or return default.
#[must_use]
pub fn load_or_default(explicit_path: Option<&Path>) -> (AppConfig, Option<PathBuf>) {
    discover_config_file(explicit_path).map_or_else(
        || (AppConfig::default(), None),
        |path| match load_config_file(&path) {
            Ok(config) => (config, Some(path)),
            Err(e) => {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                (AppConfig::default(), None)
            }
        },
    )
}

// ============================================================================
// Configuration Merging
// ============================================================================

impl AppConfig {
    /// Merge another config into this one, with `other` taking precedence.
    ///
    /// Used to layer CLI args over file config: start from the file-loaded
    /// (or default) config, then merge in a config built purely from
    /// whatever flags the caller actually passed.
    pub fn merge(&mut self, other: &Self) {
        if other.orchestrator.max_in_flight != crate::orchestrator::DEFAULT_MAX_IN_FLIGHT {
            self.orchestrator.max_in_flight = other.orchestrator.max_in_flight;
        }
        if other.orchestrator.request_deadline_secs != crate::orchestrator::DEFAULT_REQUEST_DEADLINE.as_secs() {
            self.orchestrator.request_deadline_secs = other.orchestrator.request_deadline_secs;
        }
        if other.orchestrator.provider_timeout_secs != crate::orchestrator::DEFAULT_PROVIDER_TIMEOUT.as_secs() {
            self.orchestrator.provider_timeout_secs = other.orchestrator.provider_timeout_secs;
        }
        if other.orchestrator.inventory_window_days
            != crate::orchestrator::DEFAULT_INVENTORY_WINDOW.as_secs() / 86_400
        {
            self.orchestrator.inventory_window_days = other.orchestrator.inventory_window_days;
        }
        if other.orchestrator.inventory_limit != crate::orchestrator::DEFAULT_INVENTORY_LIMIT {
            self.orchestrator.inventory_limit = other.orchestrator.inventory_limit;
        }

        if !other.providers.disabled.is_empty() {
            self.providers.disabled.clone_from(&other.providers.disabled);
        }

        if other.cache.backend != super::types::CacheBackendKind::None {
            self.cache.backend = other.cache.backend;
        }
        if other.cache.dir.is_some() {
            self.cache.dir.clone_from(&other.cache.dir);
        }

        if other.telemetry.ring_capacity != crate::telemetry::DEFAULT_RING_CAPACITY {
            self.telemetry.ring_capacity = other.telemetry.ring_capacity;
        }

        if other.behavior.quiet {
            self.behavior.quiet = true;
        }
        if other.behavior.no_color {
            self.behavior.no_color = true;
        }
    }

    /// Load from file and merge with CLI overrides.
    #[must_use]
    pub fn from_file_with_overrides(config_path: Option<&Path>, cli_overrides: &Self) -> (Self, Option<PathBuf>) {
        let (mut config, loaded_from) = load_or_default(config_path);
        config.merge(cli_overrides);
        (config, loaded_from)
    }
}

// ============================================================================
// Example Config Generation
// ============================================================================

/// Generate an example config file content.
#[must_use]
pub fn generate_example_config() -> String {
    let example = AppConfig::default();
    format!(
        "# eol-sentry configuration\n# Place this file at .eol-sentry.yaml in your project root or ~/.config/eol-sentry/\n\n{}\n",
        serde_yaml_ng::to_string(&example).unwrap_or_default()
    )
}

/// Generate a commented example config with all options.
#[must_use]
pub fn generate_full_example_config() -> String {
    r"# eol-sentry configuration file
# ================================
#
# This file configures eol-sentry's orchestrator, provider registry, cache,
# and telemetry. Place it at:
#   - .eol-sentry.yaml in your project root
#   - ~/.config/eol-sentry/eol-sentry.yaml for global config
#
# CLI arguments always override file settings.

orchestrator:
  # Maximum concurrent provider lookups per request
  max_in_flight: 8
  # Overall request deadline, in seconds
  request_deadline_secs: 60
  # Per-provider-call timeout, in seconds
  provider_timeout_secs: 15
  # Inventory lookback window, in days
  inventory_window_days: 7
  # Maximum inventory rows fetched per collector call
  inventory_limit: 500

providers:
  # Provider ids to drop from the registry entirely, e.g. ['websearch']
  disabled: []

cache:
  # none | file
  backend: none
  # dir: ~/.cache/eol-sentry

telemetry:
  # Events kept in the in-memory ring before the oldest are evicted
  ring_capacity: 10000

behavior:
  quiet: false
  no_color: false
"
    .to_string()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_in_dir() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join(".eol-sentry.yaml");
        std::fs::write(&config_path, "orchestrator:\n  max_in_flight: 4\n").unwrap();

        let found = find_config_in_dir(tmp.path());
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_in_dir_not_found() {
        let tmp = TempDir::new().unwrap();
        let found = find_config_in_dir(tmp.path());
        assert_eq!(found, None);
    }

    #[test]
    fn test_load_config_file() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.yaml");

        let yaml = r"
orchestrator:
  max_in_flight: 4
providers:
  disabled: [websearch]
";
        std::fs::write(&config_path, yaml).unwrap();

        let config = load_config_file(&config_path).unwrap();
        assert_eq!(config.orchestrator.max_in_flight, 4);
        assert_eq!(config.providers.disabled, vec!["websearch".to_string()]);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config_file(Path::new("/nonexistent/config.yaml"));
        assert!(matches!(result, Err(ConfigFileError::NotFound(_))));
    }

    #[test]
    fn test_config_merge() {
        let mut base = AppConfig::default();
        let override_config = AppConfig {
            orchestrator: super::super::types::OrchestratorSettings {
                max_in_flight: 2,
                ..super::super::types::OrchestratorSettings::default()
            },
            ..AppConfig::default()
        };

        base.merge(&override_config);

        assert_eq!(base.orchestrator.max_in_flight, 2);
    }

    #[test]
    fn test_generate_example_config() {
        let example = generate_example_config();
        assert!(example.contains("orchestrator:"));
        assert!(example.contains("max_in_flight"));
    }

    #[test]
    fn test_discover_explicit_path() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("custom-config.yaml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "orchestrator:\n  max_in_flight: 4").unwrap();

        let discovered = discover_config_file(Some(&config_path));
        assert_eq!(discovered, Some(config_path));
    }
}
