//! Store — the in-memory working set of [`NormalizedEvent`] values.
//!
//! The store is the single source of truth; the HTTP layer and the CLI read
//! from it, never from the document directly. It holds one immutable
//! [`WorkingSet`] behind a single `Arc`. Readers take a snapshot (clone the
//! `Arc`) and evaluate without holding the lock, so a query sees either the
//! old set or the new one, never a mixture. [`EventStore::reload`] normalizes
//! the incoming batch before taking the write lock and only swaps the
//! pointer while holding it.

use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};

use crate::meta::meta_listing;
use crate::normalizer::normalize_all;
use crate::query::{query, QueryParams};
use crate::types::{EventPage, MetaListing, NormalizedEvent, RawEvent};

// ---------------------------------------------------------------------------
// WorkingSet
// ---------------------------------------------------------------------------

/// One immutable generation of normalized events.
#[derive(Debug, Clone)]
pub struct WorkingSet {
    events: Vec<NormalizedEvent>,
    generation: u64,
    loaded_at: DateTime<Utc>,
}

impl WorkingSet {
    /// Generation 0: no document loaded yet.
    pub fn empty() -> Self {
        Self::new(Vec::new(), 0)
    }

    pub fn new(events: Vec<NormalizedEvent>, generation: u64) -> Self {
        Self {
            events,
            generation,
            loaded_at: Utc::now(),
        }
    }

    pub fn events(&self) -> &[NormalizedEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Incremented on every successful reload.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn query(&self, params: &QueryParams) -> EventPage {
        query(&self.events, params)
    }

    pub fn meta(&self) -> MetaListing {
        meta_listing(&self.events)
    }
}

impl Default for WorkingSet {
    fn default() -> Self {
        Self::empty()
    }
}

// ---------------------------------------------------------------------------
// EventStore
// ---------------------------------------------------------------------------

/// Process-wide holder of the current [`WorkingSet`].
#[derive(Debug, Default)]
pub struct EventStore {
    current: RwLock<Arc<WorkingSet>>,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store already holding `batch` as generation 1.
    pub fn with_events(batch: Vec<RawEvent>) -> Self {
        let store = Self::new();
        store.reload(batch);
        store
    }

    /// The current working set. Holding the returned `Arc` pins that
    /// generation even if a reload happens meanwhile.
    pub fn snapshot(&self) -> Arc<WorkingSet> {
        let current = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*current)
    }

    /// Replace the working set with the normalized form of `batch` and return
    /// the new one.
    pub fn reload(&self, batch: Vec<RawEvent>) -> Arc<WorkingSet> {
        let events = normalize_all(batch);

        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let next = Arc::new(WorkingSet::new(events, current.generation + 1));
        *current = Arc::clone(&next);
        drop(current);

        tracing::debug!(
            generation = next.generation(),
            events = next.len(),
            "store: working set swapped"
        );
        next
    }

    pub fn query(&self, params: &QueryParams) -> EventPage {
        self.snapshot().query(params)
    }

    pub fn meta(&self) -> MetaListing {
        self.snapshot().meta()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
