//! Provider: uniform EOL lookup for one vendor/data source (spec §4.1, C1).
//!
//! Every data source — vendor static table, aggregator, or web-search
//! fallback — implements the same [`Provider`] capability rather than a
//! hierarchy of ad-hoc agent subclasses (spec §9 REDESIGN FLAGS). Instances
//! are registered once in a [`ProviderRegistry`] at startup; the
//! [`crate::router::Router`] picks which ones to try for a given asset.

pub mod apache;
pub mod endoflife;
pub mod eolstatus;
pub mod microsoft;
pub mod nodejs;
pub mod oracle;
pub mod php;
pub mod postgresql;
pub mod python;
pub mod redhat;
pub mod retry;
pub mod static_table;
pub mod ubuntu;
pub mod vmware;
pub mod websearch;

use crate::error::ProviderErrorKind;
use crate::model::{Fingerprint, LookupResult};
use async_trait::async_trait;
use std::sync::Arc;

/// One vendor/aggregator/fallback EOL data source.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Stable identifier used as the cache/telemetry scoping key (spec §4.2:
    /// "the agent-id is part of the key").
    fn id(&self) -> &str;

    /// Lower runs earlier in a default cascade; static tables rank ahead of
    /// vendor APIs ahead of vendor pages ahead of aggregators ahead of
    /// web-search (spec §3, confidence-ordering note).
    fn priority(&self) -> i32;

    /// Cheap predicate used by the [`crate::router::Router`] to decide
    /// whether this provider is worth trying at all.
    fn supports(&self, fp: &Fingerprint) -> bool;

    /// Resolve a fingerprint to a lifecycle record, or a [`ProviderErrorKind`]
    /// describing why it could not.
    async fn lookup(&self, fp: &Fingerprint) -> Result<LookupResult, ProviderErrorKind>;
}

/// The full set of providers known to the system, in registration order.
///
/// Registration order does not itself determine cascade order for a given
/// asset — that's the [`crate::router::Router`]'s job — but it is the set
/// the router chooses among.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn Provider>>,
}

impl ProviderRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, provider: Arc<dyn Provider>) -> &mut Self {
        self.providers.push(provider);
        self
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<Arc<dyn Provider>> {
        self.providers.iter().find(|p| p.id() == id).cloned()
    }

    /// Drop every provider whose id is in `ids`, per
    /// [`crate::config::ProvidersConfig::disabled`]. A disabled provider is
    /// simply absent from the registry, so the router never routes to it and
    /// the cascade falls through to the next candidate exactly as it would
    /// for a provider that never existed.
    pub fn disable(&mut self, ids: &[String]) -> &mut Self {
        self.providers.retain(|p| !ids.iter().any(|id| id == p.id()));
        self
    }

    #[must_use]
    pub fn all(&self) -> &[Arc<dyn Provider>] {
        &self.providers
    }

    /// Every registered provider whose `Supports(fp)` predicate is true,
    /// ordered by ascending priority (lowest first).
    #[must_use]
    pub fn supporting(&self, fp: &Fingerprint) -> Vec<Arc<dyn Provider>> {
        let mut matches: Vec<_> = self
            .providers
            .iter()
            .filter(|p| p.supports(fp))
            .cloned()
            .collect();
        matches.sort_by_key(|p| p.priority());
        matches
    }

    /// Build the default registry: every vendor-specific static-table
    /// provider, both aggregators, and the web-search fallback (spec §4.1).
    #[must_use]
    pub fn default_registry() -> Self {
        let mut registry = Self::new();
        registry
            .register(Arc::new(microsoft::MicrosoftProvider::new()))
            .register(Arc::new(ubuntu::UbuntuProvider::new()))
            .register(Arc::new(redhat::RedHatProvider::new()))
            .register(Arc::new(oracle::OracleProvider::new()))
            .register(Arc::new(apache::ApacheProvider::new()))
            .register(Arc::new(postgresql::PostgresqlProvider::new()))
            .register(Arc::new(nodejs::NodeJsProvider::new()))
            .register(Arc::new(php::PhpProvider::new()))
            .register(Arc::new(python::PythonProvider::new()))
            .register(Arc::new(vmware::VmwareProvider::new()))
            .register(Arc::new(endoflife::EndOfLifeProvider::new()))
            .register(Arc::new(eolstatus::EolStatusProvider::new()))
            .register(Arc::new(websearch::WebSearchProvider::new()));
        registry
    }
}
