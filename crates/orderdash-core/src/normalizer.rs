//! Normalizer: turns raw order documents into [`OrderRecord`] values.
//!
//! Each document is flattened to dotted columns, its two timestamps are
//! resolved through [`RawTimestamp`], and the typed columns are coerced out of
//! the flat row. A document whose order or payment time is missing or
//! unparseable is dropped; the rest of the batch is unaffected.
//!
//! The item helpers ([`explode_items`], [`summarize_items`]) work on the
//! surviving records only.

use crate::error::NormalizeError;
use crate::metrics::add_money;
use crate::types::{
    FlatDocument, ItemRow, ItemSummary, LineItem, NormalizedOrders, OrderRecord, CUSTOMER_ID,
    DATE_WRAPPER_KEY, ITEM_NAME, ORDER_ITEMS, ORDER_TIME, ORDER_TOTAL, PAYMENT_AMOUNT,
    PAYMENT_METHOD, PAYMENT_TIME, PRICE, QUANTITY,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Extended-JSON key holding a 64-bit integer as a string.
const NUMBER_LONG_KEY: &str = "$numberLong";

/// Extended-JSON wrappers a numeric value may arrive in.
const NUMBER_WRAPPER_KEYS: &[&str] = &["$numberDecimal", "$numberDouble", NUMBER_LONG_KEY, "$numberInt"];

/// Naive layouts tried after RFC 3339. `%.f` also matches no fraction.
const NAIVE_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

// ---------------------------------------------------------------------------
// Flattening
// ---------------------------------------------------------------------------

/// Flatten a document so nested object keys become dotted column names.
///
/// Lists are not exploded; they are stored whole under their column. A
/// non-object document flattens to an empty row.
pub fn flatten(document: &Value) -> FlatDocument {
    let mut row = FlatDocument::new();
    if let Value::Object(map) = document {
        flatten_into(&mut row, None, map);
    }
    row
}

fn flatten_into(row: &mut FlatDocument, prefix: Option<&str>, map: &Map<String, Value>) {
    for (key, value) in map {
        let column = match prefix {
            Some(prefix) => format!("{prefix}.{key}"),
            None => key.clone(),
        };
        match value {
            Value::Object(inner) if !inner.is_empty() => flatten_into(row, Some(&column), inner),
            other => {
                row.insert(column, other.clone());
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Timestamps
// ---------------------------------------------------------------------------

/// The shape a timestamp field was found in, before parsing.
#[derive(Debug, Clone, PartialEq)]
pub enum RawTimestamp {
    /// Stored under the date wrapper (`{field}.$date`).
    Wrapped(Value),
    /// Stored directly under the field name.
    Plain(Value),
    Missing,
}

impl RawTimestamp {
    /// Pick the representation of `field` from a flattened row. The wrapper
    /// wins over the plain column when both exist.
    pub fn extract(row: &FlatDocument, field: &str) -> Self {
        let wrapper = format!("{field}.{DATE_WRAPPER_KEY}");
        if let Some(value) = row.get(&wrapper).filter(|v| !v.is_null()) {
            return RawTimestamp::Wrapped(value.clone());
        }
        // Canonical extended JSON nests the epoch one level further down.
        if let Some(value) = row.get(&format!("{wrapper}.{NUMBER_LONG_KEY}")) {
            let mut inner = Map::new();
            inner.insert(NUMBER_LONG_KEY.to_string(), value.clone());
            return RawTimestamp::Wrapped(Value::Object(inner));
        }
        match row.get(field) {
            None | Some(Value::Null) => RawTimestamp::Missing,
            Some(value) => RawTimestamp::Plain(value.clone()),
        }
    }

    /// Parse into a UTC instant. Parse failures resolve to `None`, same as
    /// a missing field.
    pub fn resolve(&self) -> Option<DateTime<Utc>> {
        match self {
            RawTimestamp::Wrapped(value) | RawTimestamp::Plain(value) => parse_timestamp(value),
            RawTimestamp::Missing => None,
        }
    }
}

/// Parse a timestamp value.
///
/// Strings are tried as RFC 3339, then as naive date-times and plain dates
/// (both taken as UTC). Integers and `{"$numberLong": ..}` objects are epoch
/// milliseconds. An unflattened `{"$date": ..}` object is unwrapped.
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_timestamp_str(s),
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        Value::Object(map) => {
            if let Some(inner) = map.get(DATE_WRAPPER_KEY) {
                return parse_timestamp(inner);
            }
            let millis = match map.get(NUMBER_LONG_KEY)? {
                Value::String(s) => s.trim().parse::<i64>().ok(),
                Value::Number(n) => n.as_i64(),
                _ => None,
            };
            millis.and_then(DateTime::from_timestamp_millis)
        }
        _ => None,
    }
}

fn parse_timestamp_str(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.with_timezone(&Utc));
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn resolve_field(row: &FlatDocument, field: &'static str) -> Result<DateTime<Utc>, NormalizeError> {
    let raw = RawTimestamp::extract(row, field);
    if let Some(ts) = raw.resolve() {
        return Ok(ts);
    }
    Err(match raw {
        RawTimestamp::Missing => NormalizeError::MissingTimestamp { field },
        RawTimestamp::Wrapped(value) | RawTimestamp::Plain(value) => {
            NormalizeError::UnparseableTimestamp { field, value: value.to_string() }
        }
    })
}

// ---------------------------------------------------------------------------
// Value coercion
// ---------------------------------------------------------------------------

/// Coerce a JSON value into a decimal. Accepts numbers, numeric strings and
/// the extended-JSON number wrappers.
pub fn to_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => decimal_from_str(&n.to_string()),
        Value::String(s) => decimal_from_str(s.trim()),
        Value::Object(map) => NUMBER_WRAPPER_KEYS
            .iter()
            .find_map(|key| map.get(*key))
            .and_then(to_decimal),
        _ => None,
    }
}

fn decimal_from_str(s: &str) -> Option<Decimal> {
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

/// Look up a decimal column, following a flattened number wrapper
/// (`PAYMENT_AMOUNT.$numberDecimal`) when the plain column is absent.
fn lookup_decimal(row: &FlatDocument, field: &str) -> Option<Decimal> {
    if let Some(value) = row.get(field) {
        return to_decimal(value);
    }
    NUMBER_WRAPPER_KEYS
        .iter()
        .find_map(|key| row.get(&format!("{field}.{key}")))
        .and_then(to_decimal)
}

fn to_quantity(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= u64::MAX as f64)
                .map(|f| f as u64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        Value::Object(map) => NUMBER_WRAPPER_KEYS
            .iter()
            .find_map(|key| map.get(*key))
            .and_then(to_quantity),
        _ => None,
    }
}

fn to_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn line_items(value: Option<&Value>) -> Vec<LineItem> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| {
            let name = to_text(item.get(ITEM_NAME))?;
            let Some(quantity) = item.get(QUANTITY).and_then(to_quantity) else {
                tracing::debug!(item = %name, "skipping line item without a usable quantity");
                return None;
            };
            let price = item.get(PRICE).and_then(to_decimal).unwrap_or_default();
            Some(LineItem { name, quantity, price })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Documents
// ---------------------------------------------------------------------------

/// Normalise a single document.
///
/// # Errors
///
/// Returns the reason the document cannot become an [`OrderRecord`]: it is
/// not an object, or either timestamp is missing or unparseable.
pub fn normalize_document(document: &Value) -> Result<OrderRecord, NormalizeError> {
    if !document.is_object() {
        return Err(NormalizeError::NotAnObject { found: json_kind(document) });
    }
    let fields = flatten(document);
    let order_time = resolve_field(&fields, ORDER_TIME)?;
    let payment_time = resolve_field(&fields, PAYMENT_TIME)?;

    Ok(OrderRecord {
        customer_id: to_text(fields.get(CUSTOMER_ID)).unwrap_or_default(),
        items: line_items(fields.get(ORDER_ITEMS)),
        order_total: lookup_decimal(&fields, ORDER_TOTAL),
        payment_method: to_text(fields.get(PAYMENT_METHOD)),
        payment_amount: lookup_decimal(&fields, PAYMENT_AMOUNT),
        order_time,
        payment_time,
        fields,
    })
}

/// Normalise a batch of documents, dropping the ones that fail.
pub fn normalize<'a, I>(documents: I) -> NormalizedOrders
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut batch = NormalizedOrders::default();
    for (index, document) in documents.into_iter().enumerate() {
        match normalize_document(document) {
            Ok(record) => batch.orders.push(record),
            Err(err) => {
                tracing::debug!(index, error = %err, "dropping document");
                batch.dropped += 1;
            }
        }
    }
    tracing::debug!(kept = batch.orders.len(), dropped = batch.dropped, "normalized batch");
    batch
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

/// One row per line item across all orders, each carrying its order total.
pub fn explode_items(orders: &[OrderRecord]) -> Vec<ItemRow> {
    orders
        .iter()
        .flat_map(|order| {
            order.items.iter().map(move |item| ItemRow {
                item_name: item.name.clone(),
                quantity: item.quantity,
                price: item.price,
                order_total: order.order_total,
            })
        })
        .collect()
}

/// Group exploded rows by item name: total quantity and mean price, largest
/// quantity first. Equal quantities are ordered by name.
pub fn summarize_items(rows: &[ItemRow]) -> Vec<ItemSummary> {
    let mut groups: BTreeMap<&str, (u64, Decimal, u32)> = BTreeMap::new();
    for row in rows {
        let entry = groups.entry(row.item_name.as_str()).or_default();
        entry.0 = entry.0.saturating_add(row.quantity);
        entry.1 = add_money(entry.1, row.price);
        entry.2 += 1;
    }

    let mut summary: Vec<ItemSummary> = groups
        .into_iter()
        .map(|(name, (total_quantity, price_sum, count))| ItemSummary {
            item_name: name.to_string(),
            total_quantity,
            average_price: price_sum
                .checked_div(Decimal::from(count))
                .unwrap_or_default(),
        })
        .collect();
    // Stable: BTreeMap order keeps names ascending within equal quantities.
    summary.sort_by(|a, b| b.total_quantity.cmp(&a.total_quantity));
    summary
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
