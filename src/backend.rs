//! The search backend seam.
//!
//! [`SearchBackend`] is the abstract contract the store needs from its
//! index/search collaborator: whole-record writes with backend-assigned ids,
//! point reads, deletes, and structured boolean/range queries. Every
//! operation is asynchronous; the store imposes its own sequencing on top
//! and asks nothing else of the backend (no transactions, no ordering
//! guarantees, no idempotency).
//!
//! [`InMemoryBackend`] is the reference implementation used throughout the
//! test suites. It keeps records in insertion order per collection so search
//! results are deterministic.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::query::SearchQuery;

/// Errors produced by a backend implementation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BackendError {
    /// Transport, storage, or timeout failure inside the backend.
    #[error("backend failure: {0}")]
    Backend(String),

    /// `create` was requested for an id that already exists.
    #[error("id conflict: {0} already exists")]
    Conflict(String),

    /// A record could not be serialized or deserialized.
    #[error("malformed record: {0}")]
    Malformed(String),
}

impl BackendError {
    pub fn backend(msg: impl Into<String>) -> Self {
        BackendError::Backend(msg.into())
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(err: serde_json::Error) -> Self {
        BackendError::Malformed(err.to_string())
    }
}

/// Options for a single index operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexOptions {
    /// Explicit record id. `None` asks the backend to generate one.
    pub id: Option<String>,
    /// With `true`, indexing an existing id fails instead of upserting.
    pub create: bool,
}

/// One search hit: the record id, its type tag, and the stored source.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub id: String,
    pub record_type: String,
    pub source: Value,
}

/// The hits returned for a query, already truncated to the query's cap.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResponse {
    pub hits: Vec<SearchHit>,
}

/// Abstract search/index backend contract.
///
/// Implementations wrap a concrete engine and its connection configuration
/// (host, port, protocol, timeout); all of that is opaque to the store. A
/// timed-out operation surfaces as an ordinary [`BackendError`].
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Create or overwrite a record, returning its id. With
    /// `options.create`, an existing id is a [`BackendError::Conflict`];
    /// otherwise the write upserts.
    async fn index(
        &self,
        collection: &str,
        record_type: &str,
        record: Value,
        options: IndexOptions,
    ) -> Result<String, BackendError>;

    /// Fetch one record by id, or `None` if absent.
    async fn get(
        &self,
        collection: &str,
        record_type: &str,
        id: &str,
    ) -> Result<Option<Value>, BackendError>;

    /// Delete one record by id. Deleting an absent id is not an error.
    async fn delete(
        &self,
        collection: &str,
        record_type: &str,
        id: &str,
    ) -> Result<(), BackendError>;

    /// Execute a structured query and return at most `query.size` hits.
    async fn search(
        &self,
        collection: &str,
        query: &SearchQuery,
    ) -> Result<SearchResponse, BackendError>;
}

#[derive(Debug, Clone)]
struct StoredRecord {
    id: String,
    record_type: String,
    source: Value,
}

/// In-memory backend over lock-guarded, insertion-ordered collections.
#[derive(Default)]
pub struct InMemoryBackend {
    collections: RwLock<HashMap<String, Vec<StoredRecord>>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records of `record_type` currently stored in `collection`.
    pub fn count(&self, collection: &str, record_type: &str) -> usize {
        let guard = self
            .collections
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        guard
            .get(collection)
            .map_or(0, |records| {
                records
                    .iter()
                    .filter(|record| record.record_type == record_type)
                    .count()
            })
    }
}

#[async_trait]
impl SearchBackend for InMemoryBackend {
    async fn index(
        &self,
        collection: &str,
        record_type: &str,
        record: Value,
        options: IndexOptions,
    ) -> Result<String, BackendError> {
        let mut guard = self
            .collections
            .write()
            .map_err(|_| BackendError::backend("poisoned lock"))?;
        let records = guard.entry(collection.to_string()).or_default();

        let id = match options.id {
            Some(id) => {
                if let Some(existing) = records.iter_mut().find(|record| record.id == id) {
                    if options.create {
                        return Err(BackendError::Conflict(id));
                    }
                    existing.record_type = record_type.to_string();
                    existing.source = record;
                    return Ok(id);
                }
                id
            }
            None => Uuid::new_v4().to_string(),
        };

        records.push(StoredRecord {
            id: id.clone(),
            record_type: record_type.to_string(),
            source: record,
        });
        Ok(id)
    }

    async fn get(
        &self,
        collection: &str,
        record_type: &str,
        id: &str,
    ) -> Result<Option<Value>, BackendError> {
        let guard = self
            .collections
            .read()
            .map_err(|_| BackendError::backend("poisoned lock"))?;
        Ok(guard.get(collection).and_then(|records| {
            records
                .iter()
                .find(|record| record.id == id && record.record_type == record_type)
                .map(|record| record.source.clone())
        }))
    }

    async fn delete(
        &self,
        collection: &str,
        record_type: &str,
        id: &str,
    ) -> Result<(), BackendError> {
        let mut guard = self
            .collections
            .write()
            .map_err(|_| BackendError::backend("poisoned lock"))?;
        if let Some(records) = guard.get_mut(collection) {
            records.retain(|record| !(record.id == id && record.record_type == record_type));
        }
        Ok(())
    }

    async fn search(
        &self,
        collection: &str,
        query: &SearchQuery,
    ) -> Result<SearchResponse, BackendError> {
        let guard = self
            .collections
            .read()
            .map_err(|_| BackendError::backend("poisoned lock"))?;
        let hits = guard
            .get(collection)
            .map(|records| {
                records
                    .iter()
                    .filter(|record| query.matches(&record.record_type, &record.source))
                    .take(query.size)
                    .map(|record| SearchHit {
                        id: record.id.clone(),
                        record_type: record.record_type.clone(),
                        source: record.source.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();
        Ok(SearchResponse { hits })
    }
}
