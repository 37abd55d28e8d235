//! Full-text search index clients.
//!
//! The REST layer never interprets queries: it hands the raw query string to
//! a [`SearchIndex`] and returns whatever documents come back. Two backends
//! exist: [`ElasticsearchIndex`] for deployments and [`MemoryIndex`] for
//! local development and tests.

use async_trait::async_trait;
use dlife_core::types::DbId;
use serde_json::Value;

mod elasticsearch;
mod memory;

pub use elasticsearch::ElasticsearchIndex;
pub use memory::MemoryIndex;

/// Errors from a search backend.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The search engine returned a non-2xx status code.
    #[error("Search engine error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The response did not have the expected shape.
    #[error("Unexpected search response: {0}")]
    Decode(String),
}

/// A document index keyed by entity id.
#[async_trait]
pub trait SearchIndex: Send + Sync + 'static {
    /// Insert or replace the document stored under `id`.
    async fn index(&self, index: &str, id: DbId, document: &Value) -> Result<(), SearchError>;

    /// Remove the document stored under `id`. Missing documents are ignored.
    async fn remove(&self, index: &str, id: DbId) -> Result<(), SearchError>;

    /// Run a free-text query. Syntax and ranking belong to the backend.
    async fn search(&self, index: &str, query: &str) -> Result<Vec<Value>, SearchError>;
}
