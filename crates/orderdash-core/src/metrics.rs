//! Dashboard aggregations over normalised orders.
//!
//! Everything here is a pure function of `&[OrderRecord]`. [`Dashboard::build`]
//! bundles them into the one snapshot both render surfaces draw from, and
//! refuses to build on an empty batch so no metric is ever computed over zero
//! records.

use crate::normalizer::{explode_items, summarize_items};
use crate::types::{ItemSummary, NormalizedOrders, OrderRecord};
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Label used for orders that carry no payment method.
pub const UNKNOWN_METHOD: &str = "unknown";

// ---------------------------------------------------------------------------
// KPIs
// ---------------------------------------------------------------------------

/// The three headline numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Kpis {
    /// Sum of payment amounts over all records. Records without an amount
    /// contribute nothing.
    pub total_revenue: Decimal,
    pub order_count: usize,
    /// `total_revenue / order_count`; `None` when there are no orders.
    pub average_order_value: Option<Decimal>,
}

impl Kpis {
    pub fn compute(orders: &[OrderRecord]) -> Self {
        let total_revenue = total_revenue(orders);
        let order_count = orders.len();
        let average_order_value = if order_count == 0 {
            None
        } else {
            total_revenue.checked_div(Decimal::from(order_count))
        };
        Self { total_revenue, order_count, average_order_value }
    }
}

pub fn total_revenue(orders: &[OrderRecord]) -> Decimal {
    orders.iter().filter_map(|o| o.payment_amount).fold(Decimal::ZERO, add_money)
}

/// Add to a running money total, clamping at the representable range
/// instead of overflowing.
pub fn add_money(total: Decimal, amount: Decimal) -> Decimal {
    total.checked_add(amount).unwrap_or_else(|| {
        tracing::warn!(%total, %amount, "money total out of range, clamping");
        if amount.is_sign_negative() {
            Decimal::MIN
        } else {
            Decimal::MAX
        }
    })
}

// ---------------------------------------------------------------------------
// Payment methods
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentShare {
    pub method: String,
    pub orders: usize,
    pub amount: Decimal,
    /// Fraction of all orders paid with this method, in `0..=1`.
    pub share: Decimal,
}

/// Order count and amount per payment method, most used first.
pub fn payment_method_share(orders: &[OrderRecord]) -> Vec<PaymentShare> {
    let mut groups: BTreeMap<&str, (usize, Decimal)> = BTreeMap::new();
    for order in orders {
        let method = order.payment_method.as_deref().unwrap_or(UNKNOWN_METHOD);
        let entry = groups.entry(method).or_default();
        entry.0 += 1;
        entry.1 = add_money(entry.1, order.payment_amount.unwrap_or_default());
    }

    let total = Decimal::from(orders.len());
    let mut shares: Vec<PaymentShare> = groups
        .into_iter()
        .map(|(method, (count, amount))| PaymentShare {
            method: method.to_string(),
            orders: count,
            amount,
            share: Decimal::from(count).checked_div(total).unwrap_or_default(),
        })
        .collect();
    shares.sort_by(|a, b| b.orders.cmp(&a.orders));
    shares
}

// ---------------------------------------------------------------------------
// Revenue over time
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RevenuePoint {
    /// Start of the bucket.
    pub at: DateTime<Utc>,
    pub revenue: Decimal,
    pub orders: usize,
}

/// Revenue summed per payment-time bucket, oldest first.
///
/// A zero `bucket` groups by exact payment instant.
pub fn revenue_over_time(orders: &[OrderRecord], bucket: Duration) -> Vec<RevenuePoint> {
    let width = bucket.num_milliseconds();
    let mut groups: BTreeMap<DateTime<Utc>, (Decimal, usize)> = BTreeMap::new();
    for order in orders {
        let at = if width > 0 {
            let millis = order.payment_time.timestamp_millis();
            DateTime::from_timestamp_millis(millis - millis.rem_euclid(width))
                .unwrap_or(order.payment_time)
        } else {
            order.payment_time
        };
        let entry = groups.entry(at).or_default();
        entry.0 = add_money(entry.0, order.payment_amount.unwrap_or_default());
        entry.1 += 1;
    }
    groups
        .into_iter()
        .map(|(at, (revenue, orders))| RevenuePoint { at, revenue, orders })
        .collect()
}

// ---------------------------------------------------------------------------
// Recent orders
// ---------------------------------------------------------------------------

/// Sortable columns of the recent-orders table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
    CustomerId,
    OrderTotal,
    PaymentMethod,
    PaymentAmount,
    OrderTime,
    PaymentTime,
}

impl SortColumn {
    pub const ALL: [SortColumn; 6] = [
        SortColumn::CustomerId,
        SortColumn::OrderTotal,
        SortColumn::PaymentMethod,
        SortColumn::PaymentAmount,
        SortColumn::OrderTime,
        SortColumn::PaymentTime,
    ];

    /// The column after this one, wrapping around.
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn title(self) -> &'static str {
        match self {
            SortColumn::CustomerId => "Customer",
            SortColumn::OrderTotal => "Order total",
            SortColumn::PaymentMethod => "Method",
            SortColumn::PaymentAmount => "Amount",
            SortColumn::OrderTime => "Ordered",
            SortColumn::PaymentTime => "Paid",
        }
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for SortColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "customer" | "customer_id" => Ok(SortColumn::CustomerId),
            "total" | "order_total" => Ok(SortColumn::OrderTotal),
            "method" | "payment_method" => Ok(SortColumn::PaymentMethod),
            "amount" | "payment_amount" => Ok(SortColumn::PaymentAmount),
            "ordered" | "order_time" => Ok(SortColumn::OrderTime),
            "paid" | "payment_time" => Ok(SortColumn::PaymentTime),
            other => Err(format!("unknown column: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flip(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SortKey {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl Default for SortKey {
    /// Newest payment first.
    fn default() -> Self {
        Self { column: SortColumn::PaymentTime, direction: SortDirection::Descending }
    }
}

/// One row of the recent-orders table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecentOrder {
    pub customer_id: String,
    pub order_total: Option<Decimal>,
    pub payment_method: Option<String>,
    pub payment_amount: Option<Decimal>,
    pub order_time: DateTime<Utc>,
    pub payment_time: DateTime<Utc>,
}

impl From<&OrderRecord> for RecentOrder {
    fn from(order: &OrderRecord) -> Self {
        Self {
            customer_id: order.customer_id.clone(),
            order_total: order.order_total,
            payment_method: order.payment_method.clone(),
            payment_amount: order.payment_amount,
            order_time: order.order_time,
            payment_time: order.payment_time,
        }
    }
}

/// Sort `rows` in place by `key`. The sort is stable.
pub fn sort_orders(rows: &mut [RecentOrder], key: SortKey) {
    rows.sort_by(|a, b| {
        let ord = compare_rows(key.column, a, b);
        match key.direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
}

fn compare_rows(column: SortColumn, a: &RecentOrder, b: &RecentOrder) -> Ordering {
    match column {
        SortColumn::CustomerId => a.customer_id.cmp(&b.customer_id),
        SortColumn::OrderTotal => a.order_total.cmp(&b.order_total),
        SortColumn::PaymentMethod => a.payment_method.cmp(&b.payment_method),
        SortColumn::PaymentAmount => a.payment_amount.cmp(&b.payment_amount),
        SortColumn::OrderTime => a.order_time.cmp(&b.order_time),
        SortColumn::PaymentTime => a.payment_time.cmp(&b.payment_time),
    }
}

/// The first `limit` orders under `key`.
pub fn recent_orders(orders: &[OrderRecord], key: SortKey, limit: usize) -> Vec<RecentOrder> {
    let mut rows: Vec<RecentOrder> = orders.iter().map(RecentOrder::from).collect();
    sort_orders(&mut rows, key);
    rows.truncate(limit);
    rows
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

/// Knobs for [`Dashboard::build`], taken from the `[dashboard]` config section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardOptions {
    pub top_items: usize,
    pub recent_orders: usize,
    pub revenue_bucket: Duration,
    pub sort: SortKey,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            top_items: 10,
            recent_orders: 50,
            revenue_bucket: Duration::seconds(60),
            sort: SortKey::default(),
        }
    }
}

/// Everything a render surface needs for one refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    pub kpis: Kpis,
    pub payment_methods: Vec<PaymentShare>,
    pub revenue: Vec<RevenuePoint>,
    pub top_items: Vec<ItemSummary>,
    pub recent_orders: Vec<RecentOrder>,
    /// Documents discarded by the normalizer in this batch.
    pub dropped: usize,
}

impl Dashboard {
    /// Build the dashboard views for a batch. Returns `None` when the batch
    /// holds no orders; callers show a warning and stop there.
    pub fn build(batch: &NormalizedOrders, options: &DashboardOptions) -> Option<Self> {
        if batch.is_empty() {
            return None;
        }
        let orders = batch.orders.as_slice();
        let mut top_items = summarize_items(&explode_items(orders));
        top_items.truncate(options.top_items);

        Some(Self {
            kpis: Kpis::compute(orders),
            payment_methods: payment_method_share(orders),
            revenue: revenue_over_time(orders, options.revenue_bucket),
            top_items,
            recent_orders: recent_orders(orders, options.sort, options.recent_orders),
            dropped: batch.dropped,
        })
    }

    /// Re-sort the recent-orders table without rebuilding.
    pub fn resort(&mut self, key: SortKey) {
        sort_orders(&mut self.recent_orders, key);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
