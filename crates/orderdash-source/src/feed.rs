//! Cached fetch → normalize pipeline.
//!
//! [`OrderFeed::snapshot`] serves the last normalised batch while it is
//! within the cache window and otherwise queries the source again. A failed
//! fetch is returned to the caller and leaves the cache untouched; there is
//! no retry.

use crate::{DocumentSource, SourceError};
use orderdash_core::normalizer::normalize;
use orderdash_core::{NormalizedOrders, TtlCache};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct OrderFeed<S> {
    source: S,
    cache: TtlCache<Arc<NormalizedOrders>>,
}

impl<S: DocumentSource> OrderFeed<S> {
    pub fn new(source: S, ttl: Duration) -> Self {
        Self { source, cache: TtlCache::new(ttl) }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// The current batch, fetched from the source if the cache is stale.
    pub async fn snapshot(&mut self) -> Result<Arc<NormalizedOrders>, SourceError> {
        self.snapshot_at(Instant::now()).await
    }

    /// [`snapshot`](Self::snapshot) with an explicit clock reading.
    pub async fn snapshot_at(&mut self, now: Instant) -> Result<Arc<NormalizedOrders>, SourceError> {
        if let Some(batch) = self.cache.get(now) {
            tracing::debug!(age = ?self.cache.age(now), "serving cached orders");
            return Ok(Arc::clone(batch));
        }

        let documents = self.source.fetch_all().await?;
        if documents.is_empty() {
            tracing::warn!(source = %self.source.describe(), "no documents in collection");
        }
        let batch = Arc::new(normalize(&documents));
        tracing::info!(
            source = %self.source.describe(),
            fetched = documents.len(),
            kept = batch.len(),
            dropped = batch.dropped,
            "orders refreshed"
        );
        self.cache.insert(Arc::clone(&batch), now);
        Ok(batch)
    }

    /// Drop the cached batch so the next snapshot queries the source.
    pub fn invalidate(&mut self) {
        tracing::debug!("order cache cleared");
        self.cache.clear();
    }

    /// When the cached batch was fetched, if there is one.
    pub fn last_refreshed(&self) -> Option<Instant> {
        self.cache.stored_at()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
