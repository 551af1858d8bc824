//! Core types for orderdash-core.
//!
//! This module defines the normalised [`OrderRecord`] and its [`LineItem`]s,
//! the exploded [`ItemRow`] table, the per-item [`ItemSummary`], and the names
//! of the document fields the normalizer reads.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// A document flattened to a single level: nested object keys are joined with
/// `.` (`ORDER_TIME.$date`), lists and scalars are kept as-is.
pub type FlatDocument = BTreeMap<String, serde_json::Value>;

// ---------------------------------------------------------------------------
// Document field names
// ---------------------------------------------------------------------------

pub const CUSTOMER_ID: &str = "CUSTOMER_ID";
pub const ORDER_TOTAL: &str = "ORDER_TOTAL";
pub const ORDER_ITEMS: &str = "ORDER_ITEMS";
pub const ITEM_NAME: &str = "ITEM_NAME";
pub const QUANTITY: &str = "QUANTITY";
pub const PRICE: &str = "PRICE";
pub const PAYMENT_METHOD: &str = "PAYMENT_METHOD";
pub const PAYMENT_AMOUNT: &str = "PAYMENT_AMOUNT";
pub const ORDER_TIME: &str = "ORDER_TIME";
pub const PAYMENT_TIME: &str = "PAYMENT_TIME";

/// Sub-key under which the document store wraps date values.
pub const DATE_WRAPPER_KEY: &str = "$date";

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One customer order, normalised from a raw document.
///
/// Both timestamps are always present: a document whose order or payment time
/// cannot be resolved never becomes an `OrderRecord`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderRecord {
    /// Customer identifier, rendered as text when stored as a number.
    pub customer_id: String,
    /// Line items in document order. Malformed items are skipped.
    pub items: Vec<LineItem>,
    pub order_total: Option<Decimal>,
    pub payment_method: Option<String>,
    pub payment_amount: Option<Decimal>,
    pub order_time: DateTime<Utc>,
    pub payment_time: DateTime<Utc>,
    /// The full flattened document, dotted keys included.
    #[serde(skip)]
    pub fields: FlatDocument,
}

/// A single line of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineItem {
    pub name: String,
    pub quantity: u64,
    /// Unit price. Zero when the document carries no price.
    pub price: Decimal,
}

/// Output of one normalisation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedOrders {
    /// Surviving records, in input order.
    pub orders: Vec<OrderRecord>,
    /// Number of input documents that were discarded.
    pub dropped: usize,
}

impl NormalizedOrders {
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }
}

// ---------------------------------------------------------------------------
// Item tables
// ---------------------------------------------------------------------------

/// One exploded line item, carrying its parent order's total for reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemRow {
    pub item_name: String,
    pub quantity: u64,
    pub price: Decimal,
    pub order_total: Option<Decimal>,
}

/// Line items aggregated by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemSummary {
    pub item_name: String,
    /// Sum of quantities across all surviving orders.
    pub total_quantity: u64,
    /// Mean unit price across the exploded rows for this name.
    pub average_price: Decimal,
}
