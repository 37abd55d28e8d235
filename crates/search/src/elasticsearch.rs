//! Elasticsearch REST client.
//!
//! Uses the document API (`/{index}/_doc/{id}`) for writes and a
//! `query_string` query against `/{index}/_search` for reads. Writes ask for
//! `refresh=true` so a document is searchable as soon as the request returns.

use std::time::Duration;

use async_trait::async_trait;
use dlife_core::types::DbId;
use reqwest::StatusCode;
use serde_json::{json, Value};

use crate::{SearchError, SearchIndex};

/// HTTP request timeout for a single call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Upper bound on hits per query (the engine's default `max_result_window`).
const MAX_HITS: usize = 10_000;

/// [`SearchIndex`] backed by an Elasticsearch cluster.
pub struct ElasticsearchIndex {
    client: reqwest::Client,
    base_url: String,
}

impl ElasticsearchIndex {
    /// Create a client for the cluster at `base_url`, e.g. `http://localhost:9200`.
    pub fn new(base_url: &str) -> Result<Self, SearchError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Reuse an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn doc_url(&self, index: &str, id: DbId) -> String {
        format!("{}/{index}/_doc/{id}?refresh=true", self.base_url)
    }

    /// Return the response if it is 2xx, or `allowed` (e.g. 404 on delete).
    async fn check_status(
        response: reqwest::Response,
        allowed: Option<StatusCode>,
    ) -> Result<Option<reqwest::Response>, SearchError> {
        let status = response.status();
        if status.is_success() {
            return Ok(Some(response));
        }
        if Some(status) == allowed {
            return Ok(None);
        }
        let body = response.text().await.unwrap_or_default();
        Err(SearchError::Api {
            status: status.as_u16(),
            body,
        })
    }
}

/// Request body for a free-text search.
fn search_body(query: &str) -> Value {
    json!({
        "size": MAX_HITS,
        "query": {
            "query_string": { "query": query }
        }
    })
}

/// Pull `_source` out of every hit in a search response.
fn extract_sources(response: Value) -> Result<Vec<Value>, SearchError> {
    let Value::Object(mut root) = response else {
        return Err(SearchError::Decode("response is not an object".into()));
    };
    let hits = root
        .remove("hits")
        .and_then(|mut h| h.get_mut("hits").map(Value::take))
        .ok_or_else(|| SearchError::Decode("missing hits.hits".into()))?;
    let Value::Array(hits) = hits else {
        return Err(SearchError::Decode("hits.hits is not an array".into()));
    };
    Ok(hits
        .into_iter()
        .filter_map(|mut hit| hit.get_mut("_source").map(Value::take))
        .collect())
}

#[async_trait]
impl SearchIndex for ElasticsearchIndex {
    async fn index(&self, index: &str, id: DbId, document: &Value) -> Result<(), SearchError> {
        let response = self
            .client
            .put(self.doc_url(index, id))
            .json(document)
            .send()
            .await?;
        Self::check_status(response, None).await?;
        tracing::debug!(index, id, "Indexed document");
        Ok(())
    }

    async fn remove(&self, index: &str, id: DbId) -> Result<(), SearchError> {
        let response = self.client.delete(self.doc_url(index, id)).send().await?;
        Self::check_status(response, Some(StatusCode::NOT_FOUND)).await?;
        tracing::debug!(index, id, "Removed document");
        Ok(())
    }

    async fn search(&self, index: &str, query: &str) -> Result<Vec<Value>, SearchError> {
        let response = self
            .client
            .post(format!("{}/{index}/_search", self.base_url))
            .json(&search_body(query))
            .send()
            .await?;
        // An index that was never written to has no hits rather than an error.
        let Some(response) = Self::check_status(response, Some(StatusCode::NOT_FOUND)).await?
        else {
            return Ok(Vec::new());
        };
        let body: Value = response.json().await?;
        extract_sources(body)
    }
}
