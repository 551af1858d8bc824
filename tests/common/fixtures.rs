//! Static document corpora used across harnesses.
//!
//! The shapes mirror what the document store hands back in relaxed extended
//! JSON: `_id` as `$oid`, dates wrapped in `$date`, the occasional
//! `$numberDecimal` or `$numberLong`.

use serde_json::Value;

/// A small collection mixing wrapped and plain timestamps, with one record
/// missing its payment time.
pub const ORDERS_NDJSON: &str = r#"{"_id":{"$oid":"65a1b2c3d4e5f60718293a01"},"CUSTOMER_ID":"alice","ORDER_TOTAL":42.5,"ORDER_ITEMS":[{"ITEM_NAME":"Espresso","QUANTITY":2,"PRICE":3.5},{"ITEM_NAME":"Bagel","QUANTITY":1,"PRICE":4.0}],"PAYMENT_METHOD":"card","PAYMENT_AMOUNT":42.5,"ORDER_TIME":{"$date":"2024-01-15T09:00:00Z"},"PAYMENT_TIME":"2024-01-15T09:01:30Z"}
{"_id":{"$oid":"65a1b2c3d4e5f60718293a02"},"CUSTOMER_ID":"bob","ORDER_TOTAL":{"$numberDecimal":"12.00"},"ORDER_ITEMS":[{"ITEM_NAME":"Espresso","QUANTITY":4,"PRICE":3.0}],"PAYMENT_METHOD":"cash","PAYMENT_AMOUNT":{"$numberDecimal":"12.00"},"ORDER_TIME":"2024-01-15T09:10:00Z","PAYMENT_TIME":{"$date":"2024-01-15T09:10:45Z"}}
{"_id":{"$oid":"65a1b2c3d4e5f60718293a03"},"CUSTOMER_ID":1007,"ORDER_TOTAL":7,"ORDER_ITEMS":[{"ITEM_NAME":"Bagel","QUANTITY":3,"PRICE":4.0}],"PAYMENT_METHOD":"card","PAYMENT_AMOUNT":7,"ORDER_TIME":{"$date":{"$numberLong":"1705310400000"}},"PAYMENT_TIME":{"$date":{"$numberLong":"1705310460000"}}}
{"_id":{"$oid":"65a1b2c3d4e5f60718293a04"},"CUSTOMER_ID":"dave","ORDER_TOTAL":99,"ORDER_ITEMS":[{"ITEM_NAME":"Cake","QUANTITY":1,"PRICE":99}],"PAYMENT_METHOD":"card","PAYMENT_AMOUNT":99,"ORDER_TIME":"2024-01-15T09:20:00Z"}
"#;

/// Number of documents in [`ORDERS_NDJSON`] that survive normalisation.
pub const ORDERS_KEPT: usize = 3;

/// Sum of `PAYMENT_AMOUNT` over the surviving documents.
pub const ORDERS_REVENUE: &str = "61.5";

pub fn orders_corpus() -> Vec<Value> {
    ORDERS_NDJSON
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).expect("fixture must be valid JSON"))
        .collect()
}
