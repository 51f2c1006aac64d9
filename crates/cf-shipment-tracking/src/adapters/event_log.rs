//! # Event Log Adapter
//!
//! In-memory event sink for tests and single-process wiring. Production
//! deployments would bridge [`EventSink`] to a real transport; the core does
//! not care which.

use crate::events::EventEnvelope;
use crate::ports::outbound::EventSink;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

/// In-memory, append-only event log.
#[derive(Debug, Default)]
pub struct InMemoryEventLog {
    events: RwLock<Vec<EventEnvelope>>,
    published: AtomicU64,
}

impl InMemoryEventLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all published events, in publication order.
    #[must_use]
    pub fn events(&self) -> Vec<EventEnvelope> {
        self.events.read().unwrap().clone()
    }

    /// The most recently published event, if any.
    #[must_use]
    pub fn last(&self) -> Option<EventEnvelope> {
        self.events.read().unwrap().last().cloned()
    }

    /// Number of events published.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.read().unwrap().len()
    }

    /// Returns true if nothing was published.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.read().unwrap().is_empty()
    }

    /// Total events published (monotonic counter).
    #[must_use]
    pub fn events_published(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl EventSink for InMemoryEventLog {
    async fn publish(&self, event: EventEnvelope) {
        self.events.write().unwrap().push(event);
        self.published.fetch_add(1, Ordering::Relaxed);
    }
}

// =============================================================================
// TESTS
// =============================================================================
