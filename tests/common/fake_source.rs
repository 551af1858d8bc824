//! In-memory document source for integration tests.
//!
//! Tests keep a [`FakeSourceHandle`] to swap the documents, inject a failure,
//! or read how many times the source was queried, while the source itself is
//! owned by an `OrderFeed`.

use orderdash::{DocumentSource, SourceError};
use serde_json::Value;
use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc, Mutex,
};

#[derive(Default)]
struct Shared {
    documents: Mutex<Vec<Value>>,
    fetches: AtomicUsize,
    failing: AtomicBool,
}

/// The source half, handed to the feed.
pub struct FakeSource {
    shared: Arc<Shared>,
}

/// The test half.
#[derive(Clone)]
pub struct FakeSourceHandle {
    shared: Arc<Shared>,
}

impl FakeSource {
    pub fn new(documents: Vec<Value>) -> (Self, FakeSourceHandle) {
        let shared = Arc::new(Shared { documents: Mutex::new(documents), ..Shared::default() });
        (Self { shared: Arc::clone(&shared) }, FakeSourceHandle { shared })
    }
}

impl FakeSourceHandle {
    pub fn set_documents(&self, documents: Vec<Value>) {
        *self.shared.documents.lock().unwrap() = documents;
    }

    /// Make every following fetch fail until switched off again.
    pub fn set_failing(&self, failing: bool) {
        self.shared.failing.store(failing, Ordering::SeqCst);
    }

    pub fn fetches(&self) -> usize {
        self.shared.fetches.load(Ordering::SeqCst)
    }
}

impl DocumentSource for FakeSource {
    fn describe(&self) -> String {
        "fake collection".to_string()
    }

    async fn fetch_all(&self) -> Result<Vec<Value>, SourceError> {
        self.shared.fetches.fetch_add(1, Ordering::SeqCst);
        if self.shared.failing.load(Ordering::SeqCst) {
            return Err(SourceError::Io {
                path: "fake://orders".into(),
                source: std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused"),
            });
        }
        Ok(self.shared.documents.lock().unwrap().clone())
    }
}
