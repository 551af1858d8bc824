//! Test builders: ergonomic constructors for raw order documents.
//!
//! These builders are designed for readability in test assertions, not for
//! production use.

use serde_json::{json, Map, Value};

// ---------------------------------------------------------------------------
// OrderDoc
// ---------------------------------------------------------------------------

/// How a timestamp is written into the document.
#[derive(Debug, Clone)]
pub enum Stamp {
    /// `{"FIELD": "2024-..."}`
    Plain(String),
    /// `{"FIELD": {"$date": "2024-..."}}`
    Wrapped(String),
    /// `{"FIELD": {"$date": {"$numberLong": "..."}}}`
    WrappedMillis(i64),
    /// A value that cannot be parsed as a time.
    Garbage,
    Absent,
}

/// Fluent builder for raw order documents as the source returns them.
///
/// # Example
///
/// ```rust,ignore
/// let doc = OrderDoc::new("cust-1")
///     .wrapped_order_time("2024-01-01T10:00:00Z")
///     .plain_payment_time("2024-01-01T10:05:00Z")
///     .item("Widget", 2, 9.5)
///     .payment("card", 19)
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct OrderDoc {
    customer: Value,
    order_time: Stamp,
    payment_time: Stamp,
    items: Vec<Value>,
    order_total: Option<Value>,
    payment_method: Option<String>,
    payment_amount: Option<Value>,
}

impl OrderDoc {
    /// A document with both timestamps plain and one minute apart.
    pub fn new(customer: impl Into<String>) -> Self {
        Self {
            customer: Value::String(customer.into()),
            order_time: Stamp::Plain("2024-01-01T10:00:00Z".to_string()),
            payment_time: Stamp::Plain("2024-01-01T10:01:00Z".to_string()),
            items: Vec::new(),
            order_total: None,
            payment_method: None,
            payment_amount: None,
        }
    }

    pub fn numeric_customer(mut self, id: i64) -> Self {
        self.customer = json!(id);
        self
    }

    pub fn order_time(mut self, stamp: Stamp) -> Self {
        self.order_time = stamp;
        self
    }

    pub fn payment_time(mut self, stamp: Stamp) -> Self {
        self.payment_time = stamp;
        self
    }

    pub fn wrapped_order_time(self, at: &str) -> Self {
        self.order_time(Stamp::Wrapped(at.to_string()))
    }

    pub fn plain_payment_time(self, at: &str) -> Self {
        self.payment_time(Stamp::Plain(at.to_string()))
    }

    pub fn paid_at(self, at: &str) -> Self {
        self.payment_time(Stamp::Plain(at.to_string()))
    }

    pub fn item(mut self, name: &str, quantity: u64, price: f64) -> Self {
        self.items.push(json!({ "ITEM_NAME": name, "QUANTITY": quantity, "PRICE": price }));
        self
    }

    /// Push an arbitrary item value, e.g. a malformed one.
    pub fn raw_item(mut self, item: Value) -> Self {
        self.items.push(item);
        self
    }

    pub fn total(mut self, total: impl Into<Value>) -> Self {
        self.order_total = Some(total.into());
        self
    }

    pub fn payment(mut self, method: &str, amount: impl Into<Value>) -> Self {
        self.payment_method = Some(method.to_string());
        self.payment_amount = Some(amount.into());
        self
    }

    pub fn amount(mut self, amount: impl Into<Value>) -> Self {
        self.payment_amount = Some(amount.into());
        self
    }

    pub fn build(self) -> Value {
        let mut doc = Map::new();
        doc.insert("_id".into(), json!({ "$oid": "65a1b2c3d4e5f60718293a4b" }));
        doc.insert("CUSTOMER_ID".into(), self.customer);
        if !self.items.is_empty() {
            doc.insert("ORDER_ITEMS".into(), Value::Array(self.items));
        }
        if let Some(total) = self.order_total {
            doc.insert("ORDER_TOTAL".into(), total);
        }
        if let Some(method) = self.payment_method {
            doc.insert("PAYMENT_METHOD".into(), Value::String(method));
        }
        if let Some(amount) = self.payment_amount {
            doc.insert("PAYMENT_AMOUNT".into(), amount);
        }
        insert_stamp(&mut doc, "ORDER_TIME", self.order_time);
        insert_stamp(&mut doc, "PAYMENT_TIME", self.payment_time);
        Value::Object(doc)
    }
}

fn insert_stamp(doc: &mut Map<String, Value>, field: &str, stamp: Stamp) {
    let value = match stamp {
        Stamp::Plain(at) => Value::String(at),
        Stamp::Wrapped(at) => json!({ "$date": at }),
        Stamp::WrappedMillis(ms) => json!({ "$date": { "$numberLong": ms.to_string() } }),
        Stamp::Garbage => Value::String("not a time".to_string()),
        Stamp::Absent => return,
    };
    doc.insert(field.to_string(), value);
}

/// `n` well-formed documents with distinct customers, one payment each.
pub fn paid_orders(n: usize, amount: i64) -> Vec<Value> {
    (0..n)
        .map(|i| {
            OrderDoc::new(format!("cust-{i}"))
                .payment(if i % 2 == 0 { "card" } else { "cash" }, amount)
                .item("Widget", 1, amount as f64)
                .build()
        })
        .collect()
}
