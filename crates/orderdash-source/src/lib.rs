//! orderdash-source: document sources for orderdash.
//!
//! Each source reads every document of one collection and hands them back as
//! JSON values. [`feed::OrderFeed`] wraps a source with the fetch cache and
//! the normalizer, and is what the render surfaces talk to.

pub mod feed;
pub mod file;
pub mod mongo;

use orderdash_core::config::{SourceConfig, SourceKind};
use serde_json::Value;
use std::future::Future;
use std::path::PathBuf;
use thiserror::Error;

pub use feed::OrderFeed;
pub use file::FileSource;
pub use mongo::MongoSource;

/// Errors raised while reaching or reading a source. None are retried.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to connect to {target}: {source}")]
    Connect {
        target: String,
        source: mongodb::error::Error,
    },
    #[error("query against {target} failed: {source}")]
    Query {
        target: String,
        source: mongodb::error::Error,
    },
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{}{} is not valid JSON: {source}", path.display(), line.map(|l| format!(":{l}")).unwrap_or_default())]
    Json {
        path: PathBuf,
        line: Option<usize>,
        source: serde_json::Error,
    },
}

/// A read-only collection of order documents.
pub trait DocumentSource: Send + Sync {
    /// Human-readable name for logs and status lines.
    fn describe(&self) -> String;

    /// Fetch every document, unfiltered and unpaginated.
    fn fetch_all(&self) -> impl Future<Output = Result<Vec<Value>, SourceError>> + Send;
}

/// The source selected by configuration.
#[derive(Debug)]
pub enum AnySource {
    Mongo(MongoSource),
    File(FileSource),
}

impl AnySource {
    /// Open the source described by the `[source]` config section.
    pub async fn open(config: &SourceConfig) -> Result<Self, SourceError> {
        match config.kind {
            SourceKind::Mongodb => {
                MongoSource::connect(&config.uri, &config.database, &config.collection)
                    .await
                    .map(AnySource::Mongo)
            }
            SourceKind::File => Ok(AnySource::File(FileSource::new(&config.path))),
        }
    }
}

impl DocumentSource for AnySource {
    fn describe(&self) -> String {
        match self {
            AnySource::Mongo(source) => source.describe(),
            AnySource::File(source) => source.describe(),
        }
    }

    async fn fetch_all(&self) -> Result<Vec<Value>, SourceError> {
        match self {
            AnySource::Mongo(source) => source.fetch_all().await,
            AnySource::File(source) => source.fetch_all().await,
        }
    }
}
