//! Dashboard metrics harness.
//!
//! # What this covers
//!
//! - **KPIs**: total revenue sums payment amounts over surviving records
//!   only; average order value is revenue / surviving count and undefined on
//!   an empty batch.
//! - **Payment share**: fractions sum to one, unknown methods are grouped.
//! - **Revenue over time**: bucketed by payment time, ascending.
//! - **Recent orders**: sort by every column in both directions, limit.
//! - **Empty batch**: no dashboard at all.
//! - **Properties** (proptest): revenue and average invariants over random
//!   batches.
//!
//! # Running
//!
//! ```sh
//! cargo test --test metrics_harness
//! ```

mod common;
use common::*;

use chrono::Duration;
use orderdash::metrics::{
    payment_method_share, recent_orders, revenue_over_time, Kpis, SortColumn, SortDirection, SortKey,
    UNKNOWN_METHOD,
};
use orderdash::normalizer::normalize;
use orderdash::{Dashboard, DashboardOptions, NormalizedOrders};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;
use rust_decimal::Decimal;

fn batch_of(docs: Vec<serde_json::Value>) -> NormalizedOrders {
    normalize(&docs)
}

// ---------------------------------------------------------------------------
// KPIs
// ---------------------------------------------------------------------------

#[test]
fn corpus_kpis() {
    let batch = normalize(&orders_corpus());
    let kpis = Kpis::compute(&batch.orders);
    assert_money!(kpis.total_revenue, ORDERS_REVENUE);
    assert_eq!(kpis.order_count, ORDERS_KEPT);
    assert_money!(kpis.average_order_value.unwrap(), "20.5");
}

#[test]
fn dropped_record_is_excluded_from_revenue() {
    let docs = vec![
        OrderDoc::new("a").wrapped_order_time("2024-01-15T09:00:00Z").plain_payment_time("2024-01-15T09:05:00Z").amount(10).build(),
        OrderDoc::new("b").payment_time(Stamp::Absent).amount(1000).build(),
    ];
    let batch = batch_of(docs);
    let kpis = Kpis::compute(&batch.orders);
    assert_eq!(kpis.order_count, 1);
    assert_money!(kpis.total_revenue, "10");
    assert_eq!(batch.dropped, 1);
}

#[test]
fn missing_amount_counts_as_zero_revenue() {
    let docs = vec![OrderDoc::new("a").amount(30).build(), OrderDoc::new("b").build()];
    let kpis = Kpis::compute(&batch_of(docs).orders);
    assert_money!(kpis.total_revenue, "30");
    assert_money!(kpis.average_order_value.unwrap(), "15");
}

#[test]
fn extreme_amounts_clamp_instead_of_panicking() {
    let huge = || serde_json::json!({ "$numberDecimal": "50000000000000000000000000000" });
    let docs = vec![
        OrderDoc::new("a").payment("card", huge()).item("Yacht", 1, 1.0).build(),
        OrderDoc::new("b").payment("card", huge()).build(),
    ];
    let batch = batch_of(docs);
    assert_batch!(batch, kept = 2, dropped = 0);

    let dashboard = Dashboard::build(&batch, &DashboardOptions::default()).unwrap();
    assert_eq!(dashboard.kpis.total_revenue, Decimal::MAX);
    assert_eq!(dashboard.kpis.order_count, 2);
    assert_eq!(dashboard.payment_methods[0].amount, Decimal::MAX);
    assert_eq!(dashboard.revenue[0].revenue, Decimal::MAX);
}

#[test]
fn average_undefined_without_orders() {
    let kpis = Kpis::compute(&[]);
    assert_eq!(kpis.order_count, 0);
    assert_eq!(kpis.average_order_value, None);
}

// ---------------------------------------------------------------------------
// Payment share
// ---------------------------------------------------------------------------

#[test]
fn payment_share_groups_methods() {
    let docs = vec![
        OrderDoc::new("a").payment("card", 30).build(),
        OrderDoc::new("b").payment("card", 10).build(),
        OrderDoc::new("c").payment("cash", 40).build(),
        OrderDoc::new("d").amount(20).build(),
    ];
    let shares = payment_method_share(&batch_of(docs).orders);
    let total: Decimal = shares.iter().map(|s| s.share).sum();
    assert!((total - Decimal::ONE).abs() < Decimal::new(1, 6), "shares sum to {total}");

    let card = shares.iter().find(|s| s.method == "card").unwrap();
    assert_eq!(card.orders, 2);
    assert_money!(card.amount, "40");
    assert!(shares.iter().any(|s| s.method == UNKNOWN_METHOD));
}

// ---------------------------------------------------------------------------
// Revenue over time
// ---------------------------------------------------------------------------

#[test]
fn revenue_buckets_by_minute() {
    let docs = vec![
        OrderDoc::new("a").paid_at("2024-01-15T09:00:10Z").amount(5).build(),
        OrderDoc::new("b").paid_at("2024-01-15T09:00:50Z").amount(7).build(),
        OrderDoc::new("c").paid_at("2024-01-15T08:59:59Z").amount(1).build(),
    ];
    let series = revenue_over_time(&batch_of(docs).orders, Duration::seconds(60));
    let points: Vec<(String, String, usize)> = series
        .iter()
        .map(|p| (p.at.format("%H:%M:%S").to_string(), p.revenue.to_string(), p.orders))
        .collect();
    assert_eq!(
        points,
        vec![
            ("08:59:00".to_string(), "1".to_string(), 1),
            ("09:00:00".to_string(), "12".to_string(), 2),
        ]
    );
}

// ---------------------------------------------------------------------------
// Recent orders
// ---------------------------------------------------------------------------

fn table_docs() -> Vec<serde_json::Value> {
    vec![
        OrderDoc::new("carol").payment("cash", 5).total(5).paid_at("2024-01-15T09:02:00Z").build(),
        OrderDoc::new("alice").payment("card", 30).total(30).paid_at("2024-01-15T09:00:00Z").build(),
        OrderDoc::new("bob").payment("voucher", 12).total(12).paid_at("2024-01-15T09:01:00Z").build(),
    ]
}

#[rstest]
#[case::newest_first(SortColumn::PaymentTime, SortDirection::Descending, ["carol", "bob", "alice"])]
#[case::oldest_first(SortColumn::PaymentTime, SortDirection::Ascending, ["alice", "bob", "carol"])]
#[case::customer(SortColumn::CustomerId, SortDirection::Ascending, ["alice", "bob", "carol"])]
#[case::biggest_total(SortColumn::OrderTotal, SortDirection::Descending, ["alice", "bob", "carol"])]
#[case::method(SortColumn::PaymentMethod, SortDirection::Ascending, ["alice", "carol", "bob"])]
#[case::amount(SortColumn::PaymentAmount, SortDirection::Ascending, ["carol", "bob", "alice"])]
fn recent_orders_sorting(
    #[case] column: SortColumn,
    #[case] direction: SortDirection,
    #[case] expected: [&str; 3],
) {
    let batch = batch_of(table_docs());
    let rows = recent_orders(&batch.orders, SortKey { column, direction }, 10);
    let actual: Vec<&str> = rows.iter().map(|r| r.customer_id.as_str()).collect();
    assert_eq!(actual, expected.to_vec());
}

#[test]
fn recent_orders_limit() {
    let batch = batch_of(table_docs());
    let rows = recent_orders(&batch.orders, SortKey::default(), 2);
    assert_customers!(rows, ["carol", "bob"]);
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

#[test]
fn empty_batch_has_no_dashboard() {
    assert!(Dashboard::build(&NormalizedOrders::default(), &DashboardOptions::default()).is_none());
}

#[test]
fn all_dropped_has_no_dashboard() {
    let batch = batch_of(vec![OrderDoc::new("a").payment_time(Stamp::Absent).build()]);
    assert_eq!(batch.dropped, 1);
    assert!(Dashboard::build(&batch, &DashboardOptions::default()).is_none());
}

#[test]
fn dashboard_resort_and_options() {
    let batch = batch_of(table_docs());
    let options = DashboardOptions { top_items: 1, recent_orders: 3, ..DashboardOptions::default() };
    let mut dashboard = Dashboard::build(&batch, &options).unwrap();
    assert_customers!(dashboard.recent_orders, ["carol", "bob", "alice"]);
    assert!(dashboard.top_items.len() <= 1);

    dashboard.resort(SortKey { column: SortColumn::CustomerId, direction: SortDirection::Ascending });
    assert_customers!(dashboard.recent_orders, ["alice", "bob", "carol"]);
}

#[test]
fn dashboard_serialises_for_the_api() {
    let dashboard = Dashboard::build(&normalize(&orders_corpus()), &DashboardOptions::default()).unwrap();
    let json = serde_json::to_value(&dashboard).unwrap();
    assert_eq!(json["kpis"]["order_count"], 3);
    assert_eq!(json["dropped"], 1);
    assert_eq!(json["top_items"][0]["item_name"], "Espresso");
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn revenue_is_sum_over_survivors(
        amounts in prop::collection::vec((0i64..10_000, any::<bool>()), 0..40)
    ) {
        let docs: Vec<_> = amounts
            .iter()
            .enumerate()
            .map(|(i, (amount, keep))| {
                let doc = OrderDoc::new(format!("c{i}")).amount(*amount);
                if *keep { doc.build() } else { doc.payment_time(Stamp::Absent).build() }
            })
            .collect();
        let batch = normalize(&docs);
        let kpis = Kpis::compute(&batch.orders);

        let expected: i64 = amounts.iter().filter(|(_, keep)| *keep).map(|(a, _)| a).sum();
        let survivors = amounts.iter().filter(|(_, keep)| *keep).count();
        prop_assert_eq!(kpis.total_revenue, Decimal::from(expected));
        prop_assert_eq!(kpis.order_count, survivors);
        match kpis.average_order_value {
            None => prop_assert_eq!(survivors, 0),
            Some(avg) => prop_assert_eq!(avg, Decimal::from(expected) / Decimal::from(survivors)),
        }
    }
}
