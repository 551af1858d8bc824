//! Cached order feed harness.
//!
//! # What this covers
//!
//! - **Cache window**: repeated snapshots inside the TTL reuse one fetch;
//!   the next snapshot after expiry queries the source again.
//! - **Manual clear**: `invalidate` forces a refetch even inside the window
//!   and picks up documents written since.
//! - **Failures**: a failing source surfaces its error, nothing is cached,
//!   and the feed recovers once the source does.
//! - **Empty collection**: an empty batch, not an error.
//! - **File source**: the whole path from a file on disk to a dashboard.
//!
//! # Running
//!
//! ```sh
//! cargo test --test feed_harness
//! ```

mod common;
use common::*;

use orderdash::{Dashboard, DashboardOptions, FileSource, OrderFeed, SourceError};
use pretty_assertions::assert_eq;
use std::io::Write;
use std::sync::Arc;
use std::time::{Duration, Instant};

const TTL: Duration = Duration::from_secs(30);

fn feed_over(docs: Vec<serde_json::Value>) -> (OrderFeed<FakeSource>, FakeSourceHandle) {
    let (source, handle) = FakeSource::new(docs);
    (OrderFeed::new(source, TTL), handle)
}

// ---------------------------------------------------------------------------
// Cache window
// ---------------------------------------------------------------------------

#[tokio::test]
async fn snapshots_inside_window_share_one_fetch() {
    let (mut feed, handle) = feed_over(orders_corpus());
    let t0 = Instant::now();

    let first = feed.snapshot_at(t0).await.unwrap();
    let again = feed.snapshot_at(t0 + Duration::from_secs(29)).await.unwrap();

    assert!(Arc::ptr_eq(&first, &again));
    assert_eq!(handle.fetches(), 1);
    assert_batch!(*first, kept = ORDERS_KEPT, dropped = 1);
}

#[tokio::test]
async fn expired_window_refetches_new_documents() {
    let (mut feed, handle) = feed_over(paid_orders(2, 10));
    let t0 = Instant::now();
    assert_eq!(feed.snapshot_at(t0).await.unwrap().len(), 2);

    handle.set_documents(paid_orders(5, 10));
    assert_eq!(feed.snapshot_at(t0 + Duration::from_secs(5)).await.unwrap().len(), 2);
    assert_eq!(feed.snapshot_at(t0 + TTL).await.unwrap().len(), 5);
    assert_eq!(handle.fetches(), 2);
}

// ---------------------------------------------------------------------------
// Manual clear
// ---------------------------------------------------------------------------

#[tokio::test]
async fn invalidate_picks_up_new_documents() {
    let (mut feed, handle) = feed_over(paid_orders(1, 10));
    let t0 = Instant::now();
    feed.snapshot_at(t0).await.unwrap();

    handle.set_documents(paid_orders(3, 10));
    feed.invalidate();
    assert_eq!(feed.last_refreshed(), None);

    let batch = feed.snapshot_at(t0).await.unwrap();
    assert_eq!(batch.len(), 3);
    assert_eq!(handle.fetches(), 2);
    assert_eq!(feed.last_refreshed(), Some(t0));
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn failure_is_surfaced_and_not_cached() {
    let (mut feed, handle) = feed_over(paid_orders(2, 10));
    handle.set_failing(true);
    let t0 = Instant::now();

    let err = feed.snapshot_at(t0).await.unwrap_err();
    assert!(matches!(err, SourceError::Io { .. }));
    assert!(err.to_string().contains("fake://orders"));
    assert_eq!(feed.last_refreshed(), None);

    handle.set_failing(false);
    let batch = feed.snapshot_at(t0).await.unwrap();
    assert_eq!(batch.len(), 2);
    assert_eq!(handle.fetches(), 2);
}

#[tokio::test]
async fn failure_after_success_keeps_serving_cache_inside_window() {
    let (mut feed, handle) = feed_over(paid_orders(2, 10));
    let t0 = Instant::now();
    feed.snapshot_at(t0).await.unwrap();

    handle.set_failing(true);
    assert_eq!(feed.snapshot_at(t0 + Duration::from_secs(1)).await.unwrap().len(), 2);
    assert!(feed.snapshot_at(t0 + TTL).await.is_err());
    assert_eq!(handle.fetches(), 2);
}

// ---------------------------------------------------------------------------
// Empty collection
// ---------------------------------------------------------------------------

#[tokio::test]
async fn empty_collection_yields_no_dashboard() {
    let (mut feed, handle) = feed_over(Vec::new());
    let batch = feed.snapshot().await.unwrap();
    assert!(batch.is_empty());
    assert!(Dashboard::build(&batch, &DashboardOptions::default()).is_none());
    assert_eq!(handle.fetches(), 1);
}

// ---------------------------------------------------------------------------
// File source
// ---------------------------------------------------------------------------

#[tokio::test]
async fn file_source_end_to_end() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(ORDERS_NDJSON.as_bytes()).unwrap();
    file.flush().unwrap();

    let mut feed = OrderFeed::new(FileSource::new(file.path()), TTL);
    let batch = feed.snapshot().await.unwrap();
    assert_batch!(*batch, kept = ORDERS_KEPT, dropped = 1);

    let dashboard = Dashboard::build(&batch, &DashboardOptions::default()).unwrap();
    assert_money!(dashboard.kpis.total_revenue, ORDERS_REVENUE);
    assert_eq!(dashboard.dropped, 1);
}

#[tokio::test]
async fn file_source_edits_show_after_invalidate() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("orders.json");
    std::fs::write(&path, "[]").unwrap();

    let mut feed = OrderFeed::new(FileSource::new(&path), TTL);
    assert!(feed.snapshot().await.unwrap().is_empty());

    let docs = serde_json::Value::Array(paid_orders(2, 15));
    std::fs::write(&path, docs.to_string()).unwrap();
    assert!(feed.snapshot().await.unwrap().is_empty());

    feed.invalidate();
    assert_eq!(feed.snapshot().await.unwrap().len(), 2);
}
