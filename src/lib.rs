//! **A multi-agent end-of-life and support-lifecycle lookup engine.**
//!
//! `eol-sentry` answers end-of-life (EOL) and support-lifecycle questions
//! about software and operating systems found in an enterprise inventory.
//! Given a free-form user message, it classifies the request, optionally
//! collects inventory from a telemetry backend, dispatches per-asset
//! lookups to a pool of specialized provider agents (Microsoft, Ubuntu,
//! Oracle, Apache, PostgreSQL, Red Hat, VMware, Node.js, PHP, Python,
//! endoflife.date, eolstatus.com, and a generic web-search fallback), and
//! aggregates results into a structured, categorized report.
//!
//! ## Core Concepts & Modules
//!
//! - **[`model`]**: The shared data model — [`model::Fingerprint`] (the
//!   normalized cache key), [`model::Asset`] (a per-request inventory
//!   item), [`model::LookupResult`] (one provider's normalized answer),
//!   [`model::Plan`] (a provider cascade), and [`model::AggregateReport`]
//!   (a whole request's categorized outcome).
//! - **[`classifier`]**: Maps a free-form user message to a
//!   [`classifier::QueryIntent`] and [`classifier::TaskType`].
//! - **[`router`]**: Builds the provider cascade [`model::Plan`] for a
//!   classified asset.
//! - **[`providers`]**: The [`providers::Provider`] trait and its
//!   implementations — one per vendor/aggregator/fallback data source.
//! - **[`cache`]**: Fingerprint-keyed result cache with single-flight
//!   coalescing and an optional persistent backend.
//! - **[`inventory`]**: Fetches and normalizes OS/software inventory from a
//!   telemetry backend.
//! - **[`orchestrator`]**: The request state machine tying the above
//!   together — [`orchestrator::Orchestrator`] is the crate's main entry
//!   point.
//! - **[`reports`]**: Pure markdown rendering of an
//!   [`model::AggregateReport`].
//! - **[`telemetry`]**: A structured, ring-buffered event log for every
//!   orchestrator decision.
//! - **[`config`]**: Layered configuration (CLI > file > defaults) for
//!   every tunable above.
//!
//! ## Getting Started
//!
//! ```no_run
//! use eol_sentry::orchestrator::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() {
//!     let orchestrator = Orchestrator::new("session-1");
//!     let report = orchestrator
//!         .run("What is the EOL of Windows Server 2019?", std::time::Duration::from_secs(30))
//!         .await;
//!     println!("{}", eol_sentry::reports::render_markdown(&report));
//! }
//! ```
//!
//! ## Feature Flags
//!
//! `eol-sentry` uses feature flags to manage optional functionality and
//! dependencies.
//! - `enrichment`: Enables live provider/web-search HTTP lookups. Without
//!   it, providers are limited to their embedded static knowledge tables
//!   and the web-search fallback always returns no results.
//!
//! ## Command-Line Interface (CLI)
//!
//! This documentation is for the `eol-sentry` library crate. If you are
//! looking for the command-line tool, please refer to the project's
//! README or install it via `cargo install eol-sentry`.

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
// Pedantic lints: allow categories that are design choices for this codebase
#![allow(
    // Cast safety: usize↔f64/u64 casts are pervasive in TTL/window conversions
    // and confidence-scoring math — all values are bounded in practice
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
    // Doc completeness: # Errors / # Panics sections are aspirational
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    // Variable names like `os`/`software` or `old`/`new` are clear in context
    clippy::similar_names
)]

pub mod cache;
pub mod cli;
pub mod classifier;
pub mod config;
pub mod error;
pub mod inventory;
pub mod matching;
pub mod model;
pub mod normalizer;
pub mod orchestrator;
pub mod providers;
pub mod reports;
pub mod router;
pub mod telemetry;
pub mod utils;

pub use cache::Cache;
pub use classifier::{classify, Classification, QueryIntent, TaskType};
pub use config::{AppConfig, AppConfigBuilder, ConfigError, ConfigPreset, Validatable};
pub use error::{EolSentryError, ErrorContext, OptionContext, Result};
pub use model::{AggregateReport, Asset, Fingerprint, ItemKind, LookupResult, Plan, Risk, Status, StopRule};
pub use orchestrator::{ChatRequest, ChatResponse, Orchestrator, OrchestratorConfig};
pub use providers::{Provider, ProviderRegistry};
pub use reports::render_markdown;
pub use telemetry::{Event, EventType, Telemetry};
