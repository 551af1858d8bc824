//! JSON file source: an offline stand-in for the document store.
//!
//! Accepts a JSON array of documents, a single document, or newline-delimited
//! JSON (one document per line, blank lines ignored). The file is re-read on
//! every fetch so edits show up on the next refresh.

use crate::{DocumentSource, SourceError};
use serde_json::Value;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse file contents into documents.
    pub fn parse(&self, contents: &str) -> Result<Vec<Value>, SourceError> {
        let trimmed = contents.trim_start();
        if trimmed.starts_with('[') {
            return serde_json::from_str(trimmed).map_err(|source| self.json_error(None, source));
        }
        if trimmed.starts_with('{') {
            if let Ok(document) = serde_json::from_str::<Value>(trimmed) {
                return Ok(vec![document]);
            }
        }
        contents
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(idx, line)| {
                serde_json::from_str(line).map_err(|source| self.json_error(Some(idx + 1), source))
            })
            .collect()
    }

    fn json_error(&self, line: Option<usize>, source: serde_json::Error) -> SourceError {
        SourceError::Json { path: self.path.clone(), line, source }
    }
}

impl DocumentSource for FileSource {
    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }

    async fn fetch_all(&self) -> Result<Vec<Value>, SourceError> {
        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| SourceError::Io { path: self.path.clone(), source })?;
        let documents = self.parse(&contents)?;
        tracing::debug!(path = %self.path.display(), count = documents.len(), "read documents");
        Ok(documents)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
