//! In-memory lookup cache with per-provider TTL and single-flight
//! coalescing, plus an optional persistent backend.
//!
//! Entries are keyed by `(agent_id, Fingerprint)` so the same product looked
//! up through two different providers never collides. At most one
//! concurrent lookup is allowed per key: a caller that arrives while another
//! is already computing the same key waits on a shared [`Notify`] instead of
//! dispatching its own provider call.

use crate::error::{EolSentryError, ProviderErrorKind, Result};
use crate::model::{Fingerprint, LookupResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, Notify};

/// Default TTL for a successful lookup.
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// TTL for a negative (`not_found`) cache entry.
pub const NEGATIVE_TTL: Duration = Duration::from_secs(60 * 60);

/// eolstatus.com runs its own private 6-hour cache upstream; mirror that TTL
/// rather than the general 24h default so we never serve a staler answer
/// than the source itself would.
pub const EOLSTATUS_TTL: Duration = Duration::from_secs(6 * 60 * 60);

/// Pick the TTL to store a result under, given which provider produced it.
#[must_use]
pub fn ttl_for(source: &str, success: bool) -> Duration {
    if !success {
        return NEGATIVE_TTL;
    }
    if source == "eolstatus" {
        return EOLSTATUS_TTL;
    }
    DEFAULT_TTL
}

type CacheKey = (String, Fingerprint);

#[derive(Clone)]
struct CacheEntry {
    result: LookupResult,
    inserted_at: Instant,
    ttl: Duration,
}

impl CacheEntry {
    fn is_expired(&self) -> bool {
        self.inserted_at.elapsed() > self.ttl
    }
}

/// Pluggable persistent cache backend, keyed by the `eol/{agent_id}/{hex16}`
/// layout produced by [`Fingerprint::cache_key`].
#[async_trait]
pub trait PersistentBackend: Send + Sync {
    async fn get(&self, fp: &Fingerprint, agent_id: &str) -> Result<Option<LookupResult>>;
    async fn put(
        &self,
        fp: &Fingerprint,
        agent_id: &str,
        result: &LookupResult,
        ttl: Duration,
    ) -> Result<()>;
    async fn delete_prefix(&self, agent_id: &str) -> Result<usize>;
}

/// A backend that stores nothing; every read misses, every write is a no-op.
pub struct NoOpBackend;

#[async_trait]
impl PersistentBackend for NoOpBackend {
    async fn get(&self, _fp: &Fingerprint, _agent_id: &str) -> Result<Option<LookupResult>> {
        Ok(None)
    }

    async fn put(
        &self,
        _fp: &Fingerprint,
        _agent_id: &str,
        _result: &LookupResult,
        _ttl: Duration,
    ) -> Result<()> {
        Ok(())
    }

    async fn delete_prefix(&self, _agent_id: &str) -> Result<usize> {
        Ok(0)
    }
}

/// File-backed persistent cache using the `eol/{agent_id}/{hex16}.json`
/// layout directly under `root`.
pub struct FileBackend {
    root: PathBuf,
}

impl FileBackend {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, fp: &Fingerprint, agent_id: &str) -> PathBuf {
        self.root.join(format!("{}.json", fp.cache_key(agent_id)))
    }
}

#[async_trait]
impl PersistentBackend for FileBackend {
    async fn get(&self, fp: &Fingerprint, agent_id: &str) -> Result<Option<LookupResult>> {
        let path = self.path_for(fp, agent_id);
        match tokio::fs::read_to_string(&path).await {
            Ok(data) => Ok(serde_json::from_str(&data).ok()),
            Err(_) => Ok(None),
        }
    }

    async fn put(
        &self,
        fp: &Fingerprint,
        agent_id: &str,
        result: &LookupResult,
        _ttl: Duration,
    ) -> Result<()> {
        let path = self.path_for(fp, agent_id);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| EolSentryError::io(parent.to_path_buf(), e))?;
        }
        let data = serde_json::to_string(result)?;
        tokio::fs::write(&path, data)
            .await
            .map_err(|e| EolSentryError::io(path, e))?;
        Ok(())
    }

    async fn delete_prefix(&self, agent_id: &str) -> Result<usize> {
        let dir = self.root.join("eol").join(agent_id);
        let mut deleted = 0usize;
        if let Ok(mut entries) = tokio::fs::read_dir(&dir).await {
            while let Ok(Some(entry)) = entries.next_entry().await {
                if tokio::fs::remove_file(entry.path()).await.is_ok() {
                    deleted += 1;
                }
            }
        }
        Ok(deleted)
    }
}

struct InFlight {
    notify: Arc<Notify>,
}

/// In-memory lookup cache with single-flight coalescing and an optional
/// persistent backend.
pub struct Cache {
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
    in_flight: Mutex<HashMap<CacheKey, InFlight>>,
    backend: Arc<dyn PersistentBackend>,
}

impl Default for Cache {
    fn default() -> Self {
        Self::new()
    }
}

impl Cache {
    #[must_use]
    pub fn new() -> Self {
        Self::with_backend(Arc::new(NoOpBackend))
    }

    #[must_use]
    pub fn with_backend(backend: Arc<dyn PersistentBackend>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            in_flight: Mutex::new(HashMap::new()),
            backend,
        }
    }

    /// Return a cached result if present and not expired, checking the
    /// in-memory map first and falling back to the persistent backend.
    pub async fn get(&self, fp: &Fingerprint, agent_id: &str) -> Option<LookupResult> {
        let key = (agent_id.to_string(), fp.clone());

        if let Some(entry) = self.entries.lock().await.get(&key) {
            if !entry.is_expired() {
                return Some(entry.result.clone());
            }
        }

        if let Ok(Some(result)) = self.backend.get(fp, agent_id).await {
            let ttl = ttl_for(&result.source, result.success);
            self.entries.lock().await.insert(
                key,
                CacheEntry {
                    result: result.clone(),
                    inserted_at: Instant::now(),
                    ttl,
                },
            );
            return Some(result);
        }

        None
    }

    /// Store a result with the given TTL, in both the in-memory map and the
    /// persistent backend.
    pub async fn put(&self, fp: &Fingerprint, agent_id: &str, result: LookupResult, ttl: Duration) {
        let _ = self.backend.put(fp, agent_id, &result, ttl).await;
        self.entries.lock().await.insert(
            (agent_id.to_string(), fp.clone()),
            CacheEntry {
                result,
                inserted_at: Instant::now(),
                ttl,
            },
        );
    }

    /// Run `compute` at most once per `(agent_id, fingerprint)` key among any
    /// number of concurrent callers; everyone else waits for the result.
    pub async fn get_or_compute<F, Fut>(
        &self,
        fp: &Fingerprint,
        agent_id: &str,
        compute: F,
    ) -> Result<LookupResult>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<LookupResult>>,
    {
        if let Some(cached) = self.get(fp, agent_id).await {
            return Ok(cached);
        }

        let key = (agent_id.to_string(), fp.clone());

        let (notify, is_leader) = {
            let mut in_flight = self.in_flight.lock().await;
            if let Some(slot) = in_flight.get(&key) {
                (slot.notify.clone(), false)
            } else {
                let notify = Arc::new(Notify::new());
                in_flight.insert(
                    key.clone(),
                    InFlight {
                        notify: notify.clone(),
                    },
                );
                (notify, true)
            }
        };

        if !is_leader {
            notify.notified().await;
            return self.get(fp, agent_id).await.ok_or_else(|| {
                EolSentryError::provider(
                    format!("single-flight leader for {fp} produced no result"),
                    ProviderErrorKind::NotFound,
                )
            });
        }

        let result = compute().await;

        if let Ok(lookup) = &result {
            let ttl = ttl_for(&lookup.source, lookup.success);
            self.put(fp, agent_id, lookup.clone(), ttl).await;
        }

        self.in_flight.lock().await.remove(&key);
        notify.notify_waiters();

        result
    }

    /// Delete cached entries for `agent_id`, optionally scoped to a single
    /// fingerprint, from both the in-memory map and the persistent backend.
    pub async fn purge(&self, agent_id: &str, fingerprint: Option<&Fingerprint>) -> usize {
        let mut deleted = {
            let mut entries = self.entries.lock().await;
            if let Some(fp) = fingerprint {
                let key = (agent_id.to_string(), fp.clone());
                usize::from(entries.remove(&key).is_some())
            } else {
                let before = entries.len();
                entries.retain(|(id, _), _| id != agent_id);
                before - entries.len()
            }
        };

        deleted += self.backend.delete_prefix(agent_id).await.unwrap_or(0);
        deleted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ItemKind;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn fp() -> Fingerprint {
        Fingerprint::new("Ubuntu", Some("18.04"), ItemKind::Os)
    }

    #[tokio::test]
    async fn test_put_then_get_hits() {
        let cache = Cache::new();
        let f = fp();
        let result = LookupResult::success("Ubuntu", "ubuntu", None, 1.0);
        cache.put(&f, "ubuntu", result.clone(), DEFAULT_TTL).await;

        let hit = cache.get(&f, "ubuntu").await;
        assert!(hit.is_some());
        assert_eq!(hit.unwrap().software_name, "Ubuntu");
    }

    #[tokio::test]
    async fn test_distinct_agents_dont_collide() {
        let cache = Cache::new();
        let f = fp();
        cache
            .put(&f, "ubuntu", LookupResult::success("Ubuntu", "ubuntu", None, 1.0), DEFAULT_TTL)
            .await;

        assert!(cache.get(&f, "endoflife").await.is_none());
        assert!(cache.get(&f, "ubuntu").await.is_some());
    }

    #[tokio::test]
    async fn test_expired_entry_not_returned() {
        let cache = Cache::new();
        let f = fp();
        cache
            .put(&f, "ubuntu", LookupResult::success("Ubuntu", "ubuntu", None, 1.0), Duration::from_millis(1))
            .await;

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(cache.get(&f, "ubuntu").await.is_none());
    }

    #[tokio::test]
    async fn test_single_flight_coalesces_concurrent_lookups() {
        let cache = Arc::new(Cache::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let f = Arc::new(fp());

        let mut handles = Vec::new();
        for _ in 0..8 {
            let cache = cache.clone();
            let calls = calls.clone();
            let f = f.clone();
            handles.push(tokio::spawn(async move {
                cache
                    .get_or_compute(&f, "ubuntu", || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(20)).await;
                        Ok(LookupResult::success("Ubuntu", "ubuntu", None, 1.0))
                    })
                    .await
            }));
        }

        let mut results = Vec::new();
        for handle in handles {
            results.push(handle.await.unwrap().unwrap());
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        for result in &results {
            assert_eq!(result.software_name, "Ubuntu");
        }
    }

    #[tokio::test]
    async fn test_purge_single_fingerprint() {
        let cache = Cache::new();
        let f = fp();
        cache
            .put(&f, "ubuntu", LookupResult::success("Ubuntu", "ubuntu", None, 1.0), DEFAULT_TTL)
            .await;

        let deleted = cache.purge("ubuntu", Some(&f)).await;
        assert_eq!(deleted, 1);
        assert!(cache.get(&f, "ubuntu").await.is_none());
    }

    #[tokio::test]
    async fn test_purge_whole_agent() {
        let cache = Cache::new();
        let a = Fingerprint::new("Ubuntu", Some("18.04"), ItemKind::Os);
        let b = Fingerprint::new("Ubuntu", Some("20.04"), ItemKind::Os);
        cache
            .put(&a, "ubuntu", LookupResult::success("Ubuntu", "ubuntu", None, 1.0), DEFAULT_TTL)
            .await;
        cache
            .put(&b, "ubuntu", LookupResult::success("Ubuntu", "ubuntu", None, 1.0), DEFAULT_TTL)
            .await;

        let deleted = cache.purge("ubuntu", None).await;
        assert_eq!(deleted, 2);
    }

    #[test]
    fn test_ttl_for_negative_is_shorter() {
        assert!(ttl_for("ubuntu", false) < ttl_for("ubuntu", true));
    }

    #[test]
    fn test_ttl_for_eolstatus_override() {
        assert_eq!(ttl_for("eolstatus", true), EOLSTATUS_TTL);
    }
}
