//! Structured event log for every classifier/router/orchestrator/provider
//! decision (spec §4.8).
//!
//! Events are appended to a fixed-capacity in-memory ring buffer (oldest
//! entries drop first) and optionally forwarded to an external sink. Every
//! event is also emitted as a `tracing` event at an appropriate level so
//! operators tailing logs see the same decisions without querying the ring.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Default ring buffer capacity (spec §4.8).
pub const DEFAULT_RING_CAPACITY: usize = 10_000;

/// Coarse event kind, used for filtering and for the `tracing` level chosen
/// when the event is mirrored to the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    ClassifierDecision,
    StateTransition,
    ProviderCallStart,
    ProviderCallFinish,
    CacheHit,
    CacheMiss,
    Retry,
    Cancellation,
}

/// One structured event, append-only once recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub timestamp: DateTime<Utc>,
    pub session_id: String,
    pub request_id: String,
    pub component: String,
    pub event_type: EventType,
    pub payload: serde_json::Value,
}

/// Pluggable external sink a deployment may forward events to (contract
/// only, per spec §1: "persistent caching backends...specified only
/// through the Cache interface" — the equivalent holds for an external
/// telemetry sink).
pub trait ExternalSink: Send + Sync {
    fn record(&self, event: &Event);
}

/// A sink that forwards every event to `tracing` and nothing else. The
/// default when no external sink is configured.
pub struct TracingSink;

impl ExternalSink for TracingSink {
    fn record(&self, event: &Event) {
        match event.event_type {
            EventType::Cancellation => tracing::warn!(
                component = %event.component,
                request_id = %event.request_id,
                payload = %event.payload,
                "cancellation"
            ),
            EventType::Retry => tracing::debug!(
                component = %event.component,
                request_id = %event.request_id,
                payload = %event.payload,
                "retry"
            ),
            _ => tracing::trace!(
                component = %event.component,
                event_type = ?event.event_type,
                request_id = %event.request_id,
                payload = %event.payload,
                "telemetry event"
            ),
        }
    }
}

/// Append-only ring buffer of [`Event`]s, shared via a single producer
/// lock. Consumers read a point-in-time snapshot (spec §5, "Telemetry ring
/// uses a single producer lock; consumers read via a point-in-time
/// snapshot").
pub struct Telemetry {
    session_id: String,
    capacity: usize,
    events: Mutex<VecDeque<Event>>,
    sink: Arc<dyn ExternalSink>,
}

impl Telemetry {
    #[must_use]
    pub fn new(session_id: impl Into<String>) -> Self {
        Self::with_capacity_and_sink(session_id, DEFAULT_RING_CAPACITY, Arc::new(TracingSink))
    }

    #[must_use]
    pub fn with_capacity_and_sink(
        session_id: impl Into<String>,
        capacity: usize,
        sink: Arc<dyn ExternalSink>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            capacity: capacity.max(1),
            events: Mutex::new(VecDeque::with_capacity(capacity.min(1024))),
            sink,
        }
    }

    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Record a new event, evicting the oldest entry if the ring is full.
    pub async fn record(
        &self,
        request_id: &str,
        component: &str,
        event_type: EventType,
        payload: serde_json::Value,
    ) {
        let event = Event {
            timestamp: Utc::now(),
            session_id: self.session_id.clone(),
            request_id: request_id.to_string(),
            component: component.to_string(),
            event_type,
            payload,
        };

        self.sink.record(&event);

        let mut events = self.events.lock().await;
        if events.len() >= self.capacity {
            events.pop_front();
        }
        events.push_back(event);
    }

    /// Return up to the last `n` recorded events, most-recent-last.
    pub async fn last_n(&self, n: usize) -> Vec<Event> {
        let events = self.events.lock().await;
        let start = events.len().saturating_sub(n);
        events.iter().skip(start).cloned().collect()
    }

    /// Return every event recorded for a given `request_id`.
    pub async fn for_request(&self, request_id: &str) -> Vec<Event> {
        let events = self.events.lock().await;
        events
            .iter()
            .filter(|e| e.request_id == request_id)
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_record_and_last_n() {
        let telemetry = Telemetry::new("session-1");
        telemetry
            .record("req-1", "classifier", EventType::ClassifierDecision, json!({"intent": "direct_eol"}))
            .await;
        telemetry
            .record("req-1", "router", EventType::StateTransition, json!({"state": "dispatch"}))
            .await;

        let events = telemetry.last_n(10).await;
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].component, "classifier");
        assert_eq!(events[1].component, "router");
    }

    #[tokio::test]
    async fn test_ring_buffer_evicts_oldest() {
        let telemetry = Telemetry::with_capacity_and_sink("session-1", 3, Arc::new(TracingSink));
        for i in 0..5 {
            telemetry
                .record("req-1", "x", EventType::StateTransition, json!({"i": i}))
                .await;
        }
        let events = telemetry.last_n(10).await;
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].payload, json!({"i": 2}));
        assert_eq!(events[2].payload, json!({"i": 4}));
    }

    #[tokio::test]
    async fn test_for_request_filters() {
        let telemetry = Telemetry::new("session-1");
        telemetry
            .record("req-1", "x", EventType::StateTransition, json!({}))
            .await;
        telemetry
            .record("req-2", "x", EventType::StateTransition, json!({}))
            .await;

        assert_eq!(telemetry.for_request("req-1").await.len(), 1);
        assert_eq!(telemetry.for_request("req-2").await.len(), 1);
        assert_eq!(telemetry.for_request("req-3").await.len(), 0);
    }

    #[tokio::test]
    async fn test_session_id_carried() {
        let telemetry = Telemetry::new("abc-123");
        assert_eq!(telemetry.session_id(), "abc-123");
        telemetry
            .record("req-1", "x", EventType::StateTransition, json!({}))
            .await;
        let events = telemetry.last_n(1).await;
        assert_eq!(events[0].session_id, "abc-123");
    }
}
