//! Sequential multi-collection indexing.
//!
//! The backend offers no multi-record transactions, so the pipeline trades
//! throughput for ordering: collections are persisted in their given order,
//! one record write outstanding at a time, and the first failure aborts the
//! rest of its collection and every later collection. Nothing asks the
//! backend for idempotency or ordering guarantees, and nothing already
//! written is rolled back.

use std::time::Instant;

use tracing::{debug, warn};

use crate::backend::{IndexOptions, SearchBackend};
use crate::error::StoreError;

/// One named, ordered list of records processed as a unit.
#[derive(Debug, Clone)]
pub struct RecordCollection {
    /// Name used for error context when a write in this collection fails.
    pub name: String,
    /// Record type tag every record is indexed under.
    pub record_type: String,
    pub records: Vec<serde_json::Value>,
}

impl RecordCollection {
    pub fn new(name: &str, record_type: &str, records: Vec<serde_json::Value>) -> Self {
        Self {
            name: name.to_string(),
            record_type: record_type.to_string(),
            records,
        }
    }
}

/// Drives ordered record collections into one backend collection.
pub struct IndexPipeline<'a> {
    backend: &'a dyn SearchBackend,
    collection: &'a str,
}

impl<'a> IndexPipeline<'a> {
    pub fn new(backend: &'a dyn SearchBackend, collection: &'a str) -> Self {
        Self {
            backend,
            collection,
        }
    }

    /// Persist every record of every collection, in order, strictly
    /// sequentially. Returns exactly once: `Ok(())` only after the last
    /// record of the last collection is written, or the first error wrapped
    /// with its collection name. No retries, no rollback.
    pub async fn run(&self, collections: Vec<RecordCollection>) -> Result<(), StoreError> {
        for group in collections {
            let start = Instant::now();
            let total = group.records.len();

            for (position, record) in group.records.into_iter().enumerate() {
                if let Err(err) = self
                    .backend
                    .index(
                        self.collection,
                        &group.record_type,
                        record,
                        IndexOptions::default(),
                    )
                    .await
                {
                    warn!(
                        collection = %group.name,
                        position,
                        error = %err,
                        "pipeline_write_failed"
                    );
                    return Err(StoreError::WriteFailure {
                        collection: group.name,
                        source: err,
                    });
                }
            }

            debug!(
                collection = %group.name,
                records = total,
                elapsed_micros = start.elapsed().as_micros() as u64,
                "pipeline_collection_indexed"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendError, InMemoryBackend, SearchHit, SearchResponse};
    use crate::query::SearchQuery;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Delegates to an in-memory backend but fails the Nth index call.
    struct FailingBackend {
        inner: InMemoryBackend,
        fail_at: usize,
        writes: AtomicUsize,
    }

    impl FailingBackend {
        fn new(fail_at: usize) -> Self {
            Self {
                inner: InMemoryBackend::new(),
                fail_at,
                writes: AtomicUsize::new(0),
            }
        }

        fn writes(&self) -> usize {
            self.writes.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SearchBackend for FailingBackend {
        async fn index(
            &self,
            collection: &str,
            record_type: &str,
            record: Value,
            options: IndexOptions,
        ) -> Result<String, BackendError> {
            let call = self.writes.fetch_add(1, Ordering::SeqCst);
            if call == self.fail_at {
                return Err(BackendError::backend("injected failure"));
            }
            self.inner.index(collection, record_type, record, options).await
        }

        async fn get(
            &self,
            collection: &str,
            record_type: &str,
            id: &str,
        ) -> Result<Option<Value>, BackendError> {
            self.inner.get(collection, record_type, id).await
        }

        async fn delete(
            &self,
            collection: &str,
            record_type: &str,
            id: &str,
        ) -> Result<(), BackendError> {
            self.inner.delete(collection, record_type, id).await
        }

        async fn search(
            &self,
            collection: &str,
            query: &SearchQuery,
        ) -> Result<SearchResponse, BackendError> {
            self.inner.search(collection, query).await
        }
    }

    fn numbered(count: usize) -> Vec<Value> {
        (0..count).map(|n| json!({ "n": n })).collect()
    }

    #[tokio::test]
    async fn persists_every_collection_in_order() {
        let backend = InMemoryBackend::new();
        let pipeline = IndexPipeline::new(&backend, "docs");

        pipeline
            .run(vec![
                RecordCollection::new("chunks", "chunk", numbered(3)),
                RecordCollection::new("semantics", "semantics", numbered(2)),
                RecordCollection::new("typography", "typography", numbered(1)),
            ])
            .await
            .expect("pipeline succeeds");

        assert_eq!(backend.count("docs", "chunk"), 3);
        assert_eq!(backend.count("docs", "semantics"), 2);
        assert_eq!(backend.count("docs", "typography"), 1);
    }

    #[tokio::test]
    async fn empty_collections_complete_successfully() {
        let backend = InMemoryBackend::new();
        let pipeline = IndexPipeline::new(&backend, "docs");

        pipeline
            .run(vec![
                RecordCollection::new("chunks", "chunk", Vec::new()),
                RecordCollection::new("semantics", "semantics", Vec::new()),
            ])
            .await
            .expect("empty pipeline succeeds");
        assert_eq!(backend.count("docs", "chunk"), 0);
    }

    #[tokio::test]
    async fn first_failure_aborts_the_collection_and_all_later_ones() {
        // Fail the second write of the first collection (call index 1).
        let backend = FailingBackend::new(1);
        let pipeline = IndexPipeline::new(&backend, "docs");

        let err = pipeline
            .run(vec![
                RecordCollection::new("chunks", "chunk", numbered(4)),
                RecordCollection::new("semantics", "semantics", numbered(2)),
            ])
            .await
            .expect_err("pipeline must abort");

        assert!(matches!(
            err,
            StoreError::WriteFailure { ref collection, .. } if collection == "chunks"
        ));
        // One successful write, one failed attempt; the remaining chunk
        // records and the whole semantics collection were never attempted.
        assert_eq!(backend.writes(), 2);
        assert_eq!(backend.inner.count("docs", "chunk"), 1);
        assert_eq!(backend.inner.count("docs", "semantics"), 0);
    }

    #[tokio::test]
    async fn failure_in_a_later_collection_keeps_earlier_writes() {
        // Calls 0..3 succeed (three chunks), call 3 fails (first semantics).
        let backend = FailingBackend::new(3);
        let pipeline = IndexPipeline::new(&backend, "docs");

        let err = pipeline
            .run(vec![
                RecordCollection::new("chunks", "chunk", numbered(3)),
                RecordCollection::new("semantics", "semantics", numbered(2)),
                RecordCollection::new("typography", "typography", numbered(2)),
            ])
            .await
            .expect_err("pipeline must abort");

        assert!(matches!(
            err,
            StoreError::WriteFailure { ref collection, .. } if collection == "semantics"
        ));
        // Earlier chunk writes stay; nothing is rolled back.
        assert_eq!(backend.inner.count("docs", "chunk"), 3);
        assert_eq!(backend.inner.count("docs", "semantics"), 0);
        assert_eq!(backend.inner.count("docs", "typography"), 0);
    }

    #[tokio::test]
    async fn wrapped_error_preserves_the_backend_cause() {
        let backend = FailingBackend::new(0);
        let pipeline = IndexPipeline::new(&backend, "docs");

        let err = pipeline
            .run(vec![RecordCollection::new("chunks", "chunk", numbered(1))])
            .await
            .expect_err("pipeline must abort");

        match err {
            StoreError::WriteFailure { collection, source } => {
                assert_eq!(collection, "chunks");
                assert_eq!(source, BackendError::backend("injected failure"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn failing_backend_delegates_reads() {
        let backend = FailingBackend::new(usize::MAX);
        backend
            .index("docs", "chunk", json!({"n": 0}), IndexOptions::default())
            .await
            .expect("write");
        let SearchResponse { hits } = backend
            .search("docs", &crate::query::match_all("chunk"))
            .await
            .expect("search");
        let [SearchHit { record_type, .. }] = hits.as_slice() else {
            panic!("expected exactly one hit");
        };
        assert_eq!(record_type, "chunk");
    }
}
