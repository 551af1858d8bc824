//! Single-slot cache with a freshness window.
//!
//! The feed's query is fixed, so there is nothing to key on: the cache holds
//! at most one value together with the instant it was stored. A value is
//! served while it is younger than the window; [`TtlCache::clear`] drops it
//! immediately (manual refresh).
//!
//! Callers pass `now` explicitly so expiry is deterministic under test.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct TtlCache<T> {
    ttl: Duration,
    slot: Option<(Instant, T)>,
}

impl<T> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, slot: None }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The cached value, if one was stored less than `ttl` before `now`.
    pub fn get(&self, now: Instant) -> Option<&T> {
        match &self.slot {
            Some((stored_at, value)) if now.saturating_duration_since(*stored_at) < self.ttl => {
                Some(value)
            }
            _ => None,
        }
    }

    pub fn is_fresh(&self, now: Instant) -> bool {
        self.get(now).is_some()
    }

    /// Replace the cached value, stamping it with `now`.
    pub fn insert(&mut self, value: T, now: Instant) {
        self.slot = Some((now, value));
    }

    pub fn clear(&mut self) {
        self.slot = None;
    }

    /// Time since the value was stored, fresh or not.
    pub fn age(&self, now: Instant) -> Option<Duration> {
        self.slot
            .as_ref()
            .map(|(stored_at, _)| now.saturating_duration_since(*stored_at))
    }

    /// Instant the current value was stored.
    pub fn stored_at(&self) -> Option<Instant> {
        self.slot.as_ref().map(|(stored_at, _)| *stored_at)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
