//! orderdash-core: order dashboard core library.
//!
//! This crate holds everything that does not touch the network or the
//! terminal: the normalised order model, the document normalizer, the
//! dashboard aggregations, the fetch cache and configuration.
//!
//! # Pipeline
//!
//! ```text
//! Source ──► Normalizer ──► Metrics ──► UI / HTTP
//!   │                         ▲
//!   └──────── TtlCache ───────┘
//! ```
//!
//! Sources live in `orderdash-source`; the two render surfaces live in
//! `orderdash-tui` and the root `orderdash` crate.

pub mod cache;
pub mod config;
pub mod display;
pub mod error;
pub mod metrics;
pub mod normalizer;
pub mod types;

pub use cache::TtlCache;
pub use error::NormalizeError;
pub use metrics::{Dashboard, DashboardOptions};
pub use types::{ItemRow, ItemSummary, LineItem, NormalizedOrders, OrderRecord};
