//! Domain-specific assertion macros for orderdash harnesses.
//!
//! These add context-rich failure messages that say which dashboard figure
//! was wrong and what the batch looked like.

// ---------------------------------------------------------------------------
// Money
// ---------------------------------------------------------------------------

/// Assert that a `Decimal` equals a decimal literal given as a string.
///
/// ```rust,ignore
/// assert_money!(dashboard.kpis.total_revenue, "61.5");
/// ```
#[macro_export]
macro_rules! assert_money {
    ($actual:expr, $expected:expr) => {{
        let actual: rust_decimal::Decimal = $actual;
        let expected: rust_decimal::Decimal = $expected
            .parse()
            .unwrap_or_else(|e| panic!("assert_money!: bad literal {:?}: {e}", $expected));
        if actual != expected {
            panic!(
                "assert_money! failed:\n  expression: {}\n  expected:   {}\n  actual:     {}",
                stringify!($actual),
                expected,
                actual
            );
        }
    }};
}

// ---------------------------------------------------------------------------
// Batches
// ---------------------------------------------------------------------------

/// Assert how many records a normalised batch kept and dropped.
///
/// ```rust,ignore
/// assert_batch!(batch, kept = 3, dropped = 1);
/// ```
#[macro_export]
macro_rules! assert_batch {
    ($batch:expr, kept = $kept:expr, dropped = $dropped:expr) => {{
        let batch: &orderdash::NormalizedOrders = &$batch;
        let kept: usize = $kept;
        let dropped: usize = $dropped;
        if batch.orders.len() != kept || batch.dropped != dropped {
            panic!(
                "assert_batch! failed:\n  expected: kept={} dropped={}\n  actual:   kept={} dropped={}\n  customers: {:?}",
                kept,
                dropped,
                batch.orders.len(),
                batch.dropped,
                batch.orders.iter().map(|o| o.customer_id.as_str()).collect::<Vec<_>>()
            );
        }
    }};
}

/// Assert the customer order of a recent-orders table.
///
/// ```rust,ignore
/// assert_customers!(dashboard.recent_orders, ["bob", "alice"]);
/// ```
#[macro_export]
macro_rules! assert_customers {
    ($rows:expr, [$($customer:expr),* $(,)?]) => {{
        let actual: Vec<&str> = $rows.iter().map(|row| row.customer_id.as_str()).collect();
        let expected: Vec<&str> = vec![$($customer),*];
        pretty_assertions::assert_eq!(actual, expected, "recent orders in unexpected order");
    }};
}
