//! Unified error types for eol-sentry.
//!
//! This module provides a comprehensive error hierarchy for the library,
//! with rich context for debugging and user-friendly messages.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for eol-sentry operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum EolSentryError {
    /// Errors surfaced by a provider during a single lookup.
    #[error("provider lookup failed: {context}")]
    Provider {
        context: String,
        #[source]
        source: ProviderErrorKind,
    },

    /// Errors constructing or executing a Plan.
    #[error("routing failed: {context}")]
    Routing {
        context: String,
        #[source]
        source: RoutingErrorKind,
    },

    /// Errors during orchestration of a full request.
    #[error("orchestration failed: {context}")]
    Orchestration {
        context: String,
        #[source]
        source: OrchestrationErrorKind,
    },

    /// Errors during report rendering.
    #[error("report generation failed: {context}")]
    Report {
        context: String,
        #[source]
        source: ReportErrorKind,
    },

    /// IO errors with context.
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Validation / input errors surfaced directly to the caller.
    #[error("invalid input: {0}")]
    InputInvalid(String),
}

/// Failure kinds a [`crate::providers::Provider`] lookup can return.
///
/// Only `TransientNetwork`, `UpstreamServerError`, and `Timeout` are retryable
/// (see [`ProviderErrorKind::is_retryable`]); all others terminate the
/// provider's attempt and allow the cascade to advance.
#[derive(Error, Debug, Clone)]
#[non_exhaustive]
pub enum ProviderErrorKind {
    #[error("provider does not support this fingerprint")]
    NotSupported,

    #[error("no lifecycle record found for this fingerprint")]
    NotFound,

    #[error("transient network error: {0}")]
    TransientNetwork(String),

    #[error("failed to parse provider response: {0}")]
    ParseFailure(String),

    #[error("upstream returned a 5xx status: {0}")]
    UpstreamServerError(u16),

    #[error("provider call timed out")]
    Timeout,

    #[error("provider disabled by configuration")]
    Disabled,
}

impl ProviderErrorKind {
    /// Whether this failure should be retried with backoff.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::TransientNetwork(_) | Self::UpstreamServerError(_) | Self::Timeout
        )
    }

    /// Whether this failure should advance the cascade silently (no surfacing).
    #[must_use]
    pub const fn is_cascade_advance(&self) -> bool {
        matches!(self, Self::NotSupported | Self::NotFound | Self::Disabled)
    }
}

/// Errors encountered while building or executing a routing [`crate::model::Plan`].
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum RoutingErrorKind {
    #[error("no provider available for asset kind {0}")]
    NoProviderAvailable(String),

    #[error("plan contained zero providers")]
    EmptyPlan,
}

/// Errors surfaced by the orchestrator state machine.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum OrchestrationErrorKind {
    #[error("request classification failed: {0}")]
    ClassificationFailed(String),

    #[error("inventory collection failed: {0}")]
    InventoryFailed(String),

    #[error("request deadline exceeded")]
    Cancelled,
}

/// Errors encountered while rendering an [`crate::model::AggregateReport`].
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ReportErrorKind {
    #[error("markdown rendering failed: {0}")]
    RenderFailed(String),
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for eol-sentry operations.
pub type Result<T> = std::result::Result<T, EolSentryError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl EolSentryError {
    /// Create a provider error with context.
    pub fn provider(context: impl Into<String>, source: ProviderErrorKind) -> Self {
        Self::Provider {
            context: context.into(),
            source,
        }
    }

    /// Create a routing error with context.
    pub fn routing(context: impl Into<String>, source: RoutingErrorKind) -> Self {
        Self::Routing {
            context: context.into(),
            source,
        }
    }

    /// Create an orchestration error with context.
    pub fn orchestration(context: impl Into<String>, source: OrchestrationErrorKind) -> Self {
        Self::Orchestration {
            context: context.into(),
            source,
        }
    }

    /// Create a report error with context.
    pub fn report(context: impl Into<String>, source: ReportErrorKind) -> Self {
        Self::Report {
            context: context.into(),
            source,
        }
    }

    /// Create an IO error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        let message = format!("{source}");
        Self::Io {
            path: Some(path),
            message,
            source,
        }
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an input-validation error.
    pub fn input_invalid(message: impl Into<String>) -> Self {
        Self::InputInvalid(message.into())
    }
}

impl From<std::io::Error> for EolSentryError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<serde_json::Error> for EolSentryError {
    fn from(err: serde_json::Error) -> Self {
        Self::Report {
            context: "JSON serialization".to_string(),
            source: ReportErrorKind::RenderFailed(err.to_string()),
        }
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// This mirrors the chained-context pattern used throughout the crate: each
/// layer prepends its own description rather than discarding the original.
///
/// # Example
///
/// ```ignore
/// use eol_sentry::error::ErrorContext;
///
/// fn load(path: &Path) -> Result<String> {
///     std::fs::read_to_string(path).context("reading config file")
/// }
/// ```
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure (lazy evaluation).
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<EolSentryError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

fn add_context_to_error(err: EolSentryError, new_ctx: &str) -> EolSentryError {
    match err {
        EolSentryError::Provider { context, source } => EolSentryError::Provider {
            context: chain_context(new_ctx, &context),
            source,
        },
        EolSentryError::Routing { context, source } => EolSentryError::Routing {
            context: chain_context(new_ctx, &context),
            source,
        },
        EolSentryError::Orchestration { context, source } => EolSentryError::Orchestration {
            context: chain_context(new_ctx, &context),
            source,
        },
        EolSentryError::Report { context, source } => EolSentryError::Report {
            context: chain_context(new_ctx, &context),
            source,
        },
        EolSentryError::Io {
            path,
            message,
            source,
        } => EolSentryError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        EolSentryError::Config(msg) => EolSentryError::Config(chain_context(new_ctx, &msg)),
        EolSentryError::InputInvalid(msg) => {
            EolSentryError::InputInvalid(chain_context(new_ctx, &msg))
        }
    }
}

/// Chain two context strings together.
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}

/// Extension trait for Option types to convert to errors with context.
pub trait OptionContext<T> {
    /// Convert None to an error with the given context.
    fn context_none(self, context: impl Into<String>) -> Result<T>;
}

impl<T> OptionContext<T> for Option<T> {
    fn context_none(self, context: impl Into<String>) -> Result<T> {
        self.ok_or_else(|| EolSentryError::InputInvalid(context.into()))
    }
}
