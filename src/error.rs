//! Error surface of the store.
//!
//! Every failure is typed, cloneable, and comparable so callers and tests
//! can match on exact conditions. The store never retries and never treats a
//! failure as fatal to the process; each call is independent and surfaces
//! its error to the immediate caller with enough context to diagnose it
//! (the offending collection name, or the raw backend error).

use thiserror::Error;

use crate::backend::BackendError;

/// Errors surfaced by the store facade and the indexing pipeline.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreError {
    /// Source content was unreadable or empty. Raised before any backend
    /// call is made.
    #[error("source content unreadable or empty")]
    ReadFailure,

    /// The markup collaborator rejected the input. The message is opaque to
    /// this core.
    #[error("markup parse failure: {0}")]
    ParseFailure(String),

    /// A record write failed. Carries the name of the pipeline collection
    /// that was being persisted when the write failed.
    #[error("backend write failed for collection {collection}: {source}")]
    WriteFailure {
        collection: String,
        #[source]
        source: BackendError,
    },

    /// A search call failed.
    #[error("backend query failed: {0}")]
    QueryFailure(#[source] BackendError),

    /// A search hit's record type matched no known collection.
    #[error("unknown record kind: {0}")]
    UnknownRecordKind(String),

    /// No record exists for the requested id.
    #[error("record not found")]
    NotFound,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_failure_names_the_collection() {
        let err = StoreError::WriteFailure {
            collection: "semantics".into(),
            source: BackendError::backend("connection reset"),
        };
        let message = err.to_string();
        assert!(message.contains("semantics"), "message: {message}");
        assert!(message.contains("connection reset"), "message: {message}");
    }

    #[test]
    fn backend_error_is_exposed_as_source() {
        use std::error::Error as _;

        let err = StoreError::QueryFailure(BackendError::backend("timeout"));
        let source = err.source().expect("query failure carries a source");
        assert!(source.to_string().contains("timeout"));
    }
}
