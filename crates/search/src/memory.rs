//! In-process search index.
//!
//! Matches a query against the stored JSON documents without any analysis
//! beyond lowercasing. Supports the subset of query-string syntax that the
//! clients actually send: `*`, bare terms (OR-ed) and `field:term`.

use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use dlife_core::types::DbId;
use serde_json::Value;

use crate::{SearchError, SearchIndex};

/// [`SearchIndex`] that keeps documents in memory, ordered by id.
#[derive(Default)]
pub struct MemoryIndex {
    indices: RwLock<HashMap<String, BTreeMap<DbId, Value>>>,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }
}

/// One parsed query term.
#[derive(Debug, PartialEq)]
enum Term {
    Any(String),
    Field { field: String, value: String },
}

fn parse_query(query: &str) -> Option<Vec<Term>> {
    let query = query.trim();
    if query.is_empty() || query == "*" {
        return None;
    }
    let terms = query
        .split_whitespace()
        .map(|token| match token.split_once(':') {
            Some((field, value)) if !field.is_empty() && !value.is_empty() => Term::Field {
                field: field.to_string(),
                value: value.to_lowercase(),
            },
            _ => Term::Any(token.to_lowercase()),
        })
        .collect();
    Some(terms)
}

/// Lowercased text of a scalar JSON value; `None` for null, arrays, objects.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.to_lowercase()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn value_matches(value: &Value, needle: &str) -> bool {
    if needle == "*" {
        return !value.is_null();
    }
    match value {
        Value::Array(items) => items.iter().any(|v| value_matches(v, needle)),
        Value::Object(fields) => fields.values().any(|v| value_matches(v, needle)),
        other => scalar_text(other).is_some_and(|text| text.contains(needle)),
    }
}

fn term_matches(document: &Value, term: &Term) -> bool {
    match term {
        Term::Any(needle) => value_matches(document, needle),
        Term::Field { field, value } => document
            .get(field)
            .is_some_and(|v| value_matches(v, value)),
    }
}

#[async_trait]
impl SearchIndex for MemoryIndex {
    async fn index(&self, index: &str, id: DbId, document: &Value) -> Result<(), SearchError> {
        let mut indices = self.indices.write().unwrap_or_else(PoisonError::into_inner);
        indices
            .entry(index.to_string())
            .or_default()
            .insert(id, document.clone());
        tracing::trace!(index, id, "Indexed document in memory");
        Ok(())
    }

    async fn remove(&self, index: &str, id: DbId) -> Result<(), SearchError> {
        let mut indices = self.indices.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(docs) = indices.get_mut(index) {
            docs.remove(&id);
        }
        Ok(())
    }

    async fn search(&self, index: &str, query: &str) -> Result<Vec<Value>, SearchError> {
        let indices = self.indices.read().unwrap_or_else(PoisonError::into_inner);
        let Some(docs) = indices.get(index) else {
            return Ok(Vec::new());
        };
        let terms = parse_query(query);
        Ok(docs
            .values()
            .filter(|doc| match &terms {
                None => true,
                Some(terms) => terms.iter().any(|t| term_matches(doc, t)),
            })
            .cloned()
            .collect())
    }
}
