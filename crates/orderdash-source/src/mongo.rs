//! MongoDB collection source.
//!
//! Documents are converted to relaxed extended JSON, so BSON dates arrive as
//! `{"$date": "..."}` wrappers and decimals as `{"$numberDecimal": "..."}`;
//! the normalizer understands both.

use crate::{DocumentSource, SourceError};
use futures::TryStreamExt;
use mongodb::bson::{doc, Bson, Document};
use mongodb::{Client, Collection};
use serde_json::Value;

pub struct MongoSource {
    collection: Collection<Document>,
    target: String,
}

impl std::fmt::Debug for MongoSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MongoSource").field("target", &self.target).finish()
    }
}

impl MongoSource {
    /// Build a client for `uri` and bind it to `database.collection`.
    ///
    /// The driver connects lazily, so an unreachable server surfaces on the
    /// first [`fetch_all`](DocumentSource::fetch_all), not here. A malformed
    /// URI fails immediately.
    pub async fn connect(uri: &str, database: &str, collection: &str) -> Result<Self, SourceError> {
        let target = format!("mongodb {database}.{collection}");
        let client = Client::with_uri_str(uri)
            .await
            .map_err(|source| SourceError::Connect { target: target.clone(), source })?;
        tracing::debug!(collection = %target, "mongodb client ready");
        Ok(Self {
            collection: client.database(database).collection(collection),
            target,
        })
    }
}

impl DocumentSource for MongoSource {
    fn describe(&self) -> String {
        self.target.clone()
    }

    async fn fetch_all(&self) -> Result<Vec<Value>, SourceError> {
        let query_error = |source| SourceError::Query { target: self.target.clone(), source };
        let cursor = self.collection.find(doc! {}).await.map_err(query_error)?;
        let documents: Vec<Document> = cursor.try_collect().await.map_err(query_error)?;
        tracing::debug!(collection = %self.target, count = documents.len(), "fetched documents");
        Ok(documents
            .into_iter()
            .map(|document| Bson::Document(document).into_relaxed_extjson())
            .collect())
    }
}
