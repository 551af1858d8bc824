//! orderdash: live order and payment dashboard over a document store.
//!
//! Reads every order document from one collection, normalises the
//! dual-shape timestamps, and renders revenue metrics, payment-method share,
//! revenue over time, top items and a sortable recent-orders table, either
//! in the terminal or in a browser.
//!
//! # Architecture
//!
//! ```text
//! DocumentSource ──► OrderFeed (TtlCache + normalizer) ──► Dashboard ──► TUI
//!                                                              └──────► HTTP
//! ```
//!
//! The layers live in their own crates and are re-exported here so
//! integration tests and benches can reach them through one path.

pub mod serve;

pub use orderdash_core::{
    cache, config, display, metrics, normalizer, types, Dashboard, DashboardOptions, NormalizeError,
    NormalizedOrders, OrderRecord, TtlCache,
};
pub use orderdash_source::{AnySource, DocumentSource, FileSource, MongoSource, OrderFeed, SourceError};
