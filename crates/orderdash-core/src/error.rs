//! Errors raised while turning one raw document into an [`OrderRecord`].
//!
//! None of these escape [`normalize`]: a failing document is dropped and
//! counted in [`NormalizedOrders::dropped`]. They exist so the drop reason can
//! be logged and asserted on in tests.
//!
//! [`OrderRecord`]: crate::OrderRecord
//! [`normalize`]: crate::normalizer::normalize
//! [`NormalizedOrders::dropped`]: crate::NormalizedOrders::dropped

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("document is not an object (found {found})")]
    NotAnObject { found: &'static str },
    #[error("{field} is missing")]
    MissingTimestamp { field: &'static str },
    #[error("{field} is not a valid timestamp: {value}")]
    UnparseableTimestamp { field: &'static str, value: String },
}
