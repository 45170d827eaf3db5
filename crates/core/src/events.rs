//! Engine event hook — trait for observing confirmed state transitions.
//!
//! Containers accept an `Arc<dyn EventSink>` and emit an event after the
//! authority's response has been merged. Optimistic writes and rollbacks
//! never emit. Sinks observe; they do not write engine state, so
//! cross-container consistency still goes through explicit re-fetch.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Trait for observing confirmed engine transitions.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

/// A confirmed transition on an engine container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineEvent {
    pub event_id: Uuid,
    pub kind: EngineEventKind,
    /// Id of the ad space or booking request the transition settled on.
    pub entity_id: i64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EngineEventKind {
    AdSpaceUpdated,
    AdSpaceDeleted,
    BookingCreated,
    BookingApproved,
    BookingRejected,
}

/// No-op sink for callers that don't need event observation.
pub struct NoOpSink;

impl EventSink for NoOpSink {
    fn emit(&self, _event: EngineEvent) {}
}

/// In-memory sink that captures events for testing.
#[derive(Default)]
pub struct CaptureSink {
    events: Mutex<Vec<EngineEvent>>,
}

impl CaptureSink {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn events(&self) -> Vec<EngineEvent> {
        self.events.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.events.lock().len()
    }

    pub fn count_kind(&self, kind: EngineEventKind) -> usize {
        self.events.lock().iter().filter(|e| e.kind == kind).count()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl EventSink for CaptureSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().push(event);
    }
}

/// Convenience builder for `EngineEvent` with a fresh id and timestamp.
pub fn make_event(kind: EngineEventKind, entity_id: i64) -> EngineEvent {
    EngineEvent {
        event_id: Uuid::new_v4(),
        kind,
        entity_id,
        timestamp: Utc::now(),
    }
}

/// Convenience: create a no-op sink for containers that don't need one.
pub fn noop_sink() -> Arc<dyn EventSink> {
    Arc::new(NoOpSink)
}

/// Convenience: create a capture sink for tests.
pub fn capture_sink() -> Arc<CaptureSink> {
    Arc::new(CaptureSink::new())
}
