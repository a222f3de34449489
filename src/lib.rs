//! Chunked storage and range retrieval for long-form annotated text.
//!
//! The search backend this store targets only understands whole-record
//! indexing and boolean/range queries; it has no native large-text storage
//! and no multi-record transactions. This crate supplies the layer in
//! between: it splits arbitrarily long text into bounded, word-respecting,
//! offset-addressed chunks, rebuilds any character range from the
//! overlapping chunks a range query returns, and drives the multi-collection
//! indexing pipeline with deterministic ordering and fail-fast aborts.
//!
//! The two entry points live on [`TextStore`]:
//!
//! - [`TextStore::import_data`] persists a document: structure record first
//!   (its backend-assigned id becomes the document id), then text chunks,
//!   semantic annotations, and typography annotations, strictly in order.
//! - [`TextStore::fetch_text`] retrieves a character range together with the
//!   annotations overlapping it.
//!
//! The backend itself is a collaborator behind [`SearchBackend`];
//! [`InMemoryBackend`] is the reference implementation the test suites run
//! against. Markup parsing is likewise a collaborator behind
//! [`MarkupParser`].
//!
//! ```
//! use std::sync::Arc;
//! use textstore::{
//!     DocumentPayload, InMemoryBackend, StoreConfig, StructureNode, TextPart, TextStore,
//! };
//!
//! # async fn demo() -> Result<(), textstore::StoreError> {
//! let store = TextStore::new(Arc::new(InMemoryBackend::new()), StoreConfig::default());
//!
//! let document_id = store
//!     .import_data(DocumentPayload {
//!         text: vec![TextPart { text: "a bb ccc dddd".into(), sequence: 0 }],
//!         typography: Vec::new(),
//!         semantics: Vec::new(),
//!         structure: vec![StructureNode {
//!             node_type: "doc".into(),
//!             name: "t".into(),
//!             description: "d".into(),
//!             depth: 0,
//!             start: 0,
//!         }],
//!     })
//!     .await?;
//!
//! let bundle = store.fetch_text(&document_id, 2, 7).await?;
//! assert_eq!(bundle.text, "bb cc");
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod query;
pub mod reconstruct;
pub mod splitter;
pub mod store;
pub mod types;
pub mod wikitext;

pub use backend::{
    BackendError, InMemoryBackend, IndexOptions, SearchBackend, SearchHit, SearchResponse,
};
pub use config::{BackendConfig, ConfigError, StoreConfig};
pub use error::StoreError;
pub use pipeline::{IndexPipeline, RecordCollection};
pub use query::{match_all, range_query, FilterClause, RangeBounds, SearchQuery, MAX_RANGE_HITS};
pub use reconstruct::{reconstruct, AssembledText};
pub use splitter::{split, SplitPiece};
pub use store::{DocumentEntry, TextBundle, TextStore};
pub use types::{
    DocumentPayload, SemanticRecord, SemanticSpan, StructureNode, StructureRecord, TextChunk,
    TextPart, TypographyRecord, TypographySpan, RECORD_CHUNK, RECORD_SEMANTICS, RECORD_STRUCTURE,
    RECORD_TYPOGRAPHY,
};
pub use wikitext::{MarkupError, MarkupParser, ParsedText, PlainText};
