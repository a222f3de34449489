//! The store facade.
//!
//! [`TextStore`] composes the splitter, query builder, reconstructor, and
//! pipeline into the two main operations: [`TextStore::import_data`] (write
//! path) and [`TextStore::fetch_text`] (read path). Backend writes happen in
//! a fixed shape: the time-stamped structure record goes first and the id
//! the backend assigns to it becomes the document id; chunks and annotations
//! follow through the pipeline, all stamped with that id.
//!
//! There is no cross-collection atomicity. A pipeline failure leaves the
//! structure record orphaned with no chunks or annotations behind it, and
//! the document id is never returned to the caller in that case.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{info, warn};

use crate::backend::{IndexOptions, SearchBackend};
use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::pipeline::{IndexPipeline, RecordCollection};
use crate::query::{match_all, range_query};
use crate::reconstruct::reconstruct;
use crate::splitter::split;
use crate::types::{
    DocumentPayload, SemanticRecord, SemanticSpan, StructureNode, StructureRecord, TextChunk,
    TextPart, TypographyRecord, RECORD_CHUNK, RECORD_SEMANTICS, RECORD_STRUCTURE,
    RECORD_TYPOGRAPHY,
};
use crate::wikitext::MarkupParser;

/// Everything fetched for one character range of a document.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBundle {
    pub document_id: String,
    pub text: String,
    pub start: usize,
    pub end: usize,
    pub typography: Vec<TypographyRecord>,
    pub semantics: Vec<SemanticRecord>,
    /// Record type of the last hit that matched no known collection, if
    /// any. Classification of the remaining hits continues past an unknown
    /// kind; only the last one is kept.
    pub unknown_kind: Option<String>,
}

impl TextBundle {
    /// The classification error for this bundle, if an unknown record kind
    /// was encountered.
    pub fn classification_error(&self) -> Option<StoreError> {
        self.unknown_kind.clone().map(StoreError::UnknownRecordKind)
    }
}

/// A structure record together with the document id it defines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentEntry {
    pub document_id: String,
    pub structure: StructureRecord,
}

/// Facade over the chunked text store.
pub struct TextStore {
    backend: Arc<dyn SearchBackend>,
    config: StoreConfig,
}

impl TextStore {
    pub fn new(backend: Arc<dyn SearchBackend>, config: StoreConfig) -> Self {
        Self { backend, config }
    }

    /// Import one document: persist the structure record, then chunks,
    /// semantic annotations, and typography annotations, in that order.
    /// Returns the backend-assigned document id on full success.
    pub async fn import_data(&self, payload: DocumentPayload) -> Result<String, StoreError> {
        let started = Instant::now();
        match self.import_inner(payload).await {
            Ok(document_id) => {
                info!(
                    document_id = %document_id,
                    elapsed_micros = started.elapsed().as_micros() as u64,
                    "import_success"
                );
                Ok(document_id)
            }
            Err(err) => {
                warn!(
                    error = %err,
                    elapsed_micros = started.elapsed().as_micros() as u64,
                    "import_failure"
                );
                Err(err)
            }
        }
    }

    async fn import_inner(&self, payload: DocumentPayload) -> Result<String, StoreError> {
        let DocumentPayload {
            text,
            typography,
            semantics,
            structure,
        } = payload;

        // The structure record goes first; its generated id is the document
        // id everything else is tagged with.
        let structure_record = StructureRecord {
            nodes: structure,
            created_at: Utc::now(),
        };
        let document_id = self
            .backend
            .index(
                &self.config.collection,
                RECORD_STRUCTURE,
                serde_json::to_value(&structure_record)
                    .map_err(|err| write_failure("structure", err))?,
                IndexOptions::default(),
            )
            .await
            .map_err(|err| StoreError::WriteFailure {
                collection: "structure".to_string(),
                source: err,
            })?;

        let full_text = assemble_text(text);
        let chunks: Vec<TextChunk> = split(self.config.max_chunk_size, &full_text)
            .into_iter()
            .enumerate()
            .map(|(sequence, piece)| TextChunk {
                document_id: document_id.clone(),
                end: piece.offset + piece.char_len(),
                start: piece.offset,
                text: piece.text,
                sequence,
            })
            .collect();

        let semantics: Vec<SemanticRecord> = semantics
            .into_iter()
            .map(|span| SemanticRecord::from_span(&document_id, span))
            .collect();
        let typography: Vec<TypographyRecord> = typography
            .into_iter()
            .map(|span| TypographyRecord::from_span(&document_id, span))
            .collect();

        let collections = vec![
            RecordCollection::new("chunks", RECORD_CHUNK, to_values("chunks", &chunks)?),
            RecordCollection::new(
                "semantics",
                RECORD_SEMANTICS,
                to_values("semantics", &semantics)?,
            ),
            RecordCollection::new(
                "typography",
                RECORD_TYPOGRAPHY,
                to_values("typography", &typography)?,
            ),
        ];

        IndexPipeline::new(self.backend.as_ref(), &self.config.collection)
            .run(collections)
            .await?;

        Ok(document_id)
    }

    /// Fetch the character range `[start, end)` of a document together with
    /// every annotation overlapping it.
    ///
    /// An unknown document id is not an error: the query returns no hits and
    /// the bundle carries the empty-text signal (`start == end == 0`).
    pub async fn fetch_text(
        &self,
        document_id: &str,
        start: usize,
        end: usize,
    ) -> Result<TextBundle, StoreError> {
        let query = range_query(document_id, start, end);
        let response = self
            .backend
            .search(&self.config.collection, &query)
            .await
            .map_err(StoreError::QueryFailure)?;

        let mut chunks: Vec<TextChunk> = Vec::new();
        let mut typography: Vec<TypographyRecord> = Vec::new();
        let mut semantics: Vec<SemanticRecord> = Vec::new();
        let mut unknown_kind: Option<String> = None;

        for hit in response.hits {
            match hit.record_type.as_str() {
                RECORD_CHUNK => chunks.push(decode(hit.source)?),
                RECORD_TYPOGRAPHY => typography.push(decode(hit.source)?),
                RECORD_SEMANTICS => semantics.push(decode(hit.source)?),
                other => {
                    warn!(record_id = %hit.id, kind = %other, "unknown_record_kind");
                    unknown_kind = Some(other.to_string());
                }
            }
        }

        let assembled = reconstruct(start, end, chunks);
        Ok(TextBundle {
            document_id: document_id.to_string(),
            text: assembled.text,
            start: assembled.start,
            end: assembled.end,
            typography,
            semantics,
            unknown_kind,
        })
    }

    /// Read raw markup content, parse it through `parser`, and import the
    /// result with the supplied outline and semantic annotations.
    ///
    /// Empty input and parse failures are reported before any backend call
    /// is made.
    pub async fn import_wikitext(
        &self,
        raw: &str,
        parser: &dyn MarkupParser,
        structure: Vec<StructureNode>,
        semantics: Vec<SemanticSpan>,
    ) -> Result<String, StoreError> {
        if raw.trim().is_empty() {
            return Err(StoreError::ReadFailure);
        }
        let parsed = parser
            .parse(raw)
            .map_err(|err| StoreError::ParseFailure(err.to_string()))?;

        self.import_data(DocumentPayload {
            text: vec![TextPart {
                text: parsed.text,
                sequence: 0,
            }],
            typography: parsed.typography,
            semantics,
            structure,
        })
        .await
    }

    /// Enumerate every stored document through the match-all structure
    /// query, capped like any other query.
    pub async fn list_documents(&self) -> Result<Vec<DocumentEntry>, StoreError> {
        let response = self
            .backend
            .search(&self.config.collection, &match_all(RECORD_STRUCTURE))
            .await
            .map_err(StoreError::QueryFailure)?;

        response
            .hits
            .into_iter()
            .map(|hit| {
                Ok(DocumentEntry {
                    document_id: hit.id,
                    structure: decode(hit.source)?,
                })
            })
            .collect()
    }

    /// Fetch one document's structure record by id.
    pub async fn fetch_structure(&self, document_id: &str) -> Result<StructureRecord, StoreError> {
        let source = self
            .backend
            .get(&self.config.collection, RECORD_STRUCTURE, document_id)
            .await
            .map_err(StoreError::QueryFailure)?
            .ok_or(StoreError::NotFound)?;
        decode(source)
    }
}

/// Reassemble a document's text parts in ascending sequence order.
fn assemble_text(mut parts: Vec<TextPart>) -> String {
    parts.sort_by_key(|part| part.sequence);
    parts.into_iter().map(|part| part.text).collect()
}

fn to_values<T: serde::Serialize>(
    collection: &str,
    records: &[T],
) -> Result<Vec<serde_json::Value>, StoreError> {
    records
        .iter()
        .map(|record| serde_json::to_value(record).map_err(|err| write_failure(collection, err)))
        .collect()
}

fn decode<T: serde::de::DeserializeOwned>(source: serde_json::Value) -> Result<T, StoreError> {
    serde_json::from_value(source)
        .map_err(|err| StoreError::QueryFailure(crate::backend::BackendError::from(err)))
}

fn write_failure(collection: &str, err: serde_json::Error) -> StoreError {
    StoreError::WriteFailure {
        collection: collection.to_string(),
        source: crate::backend::BackendError::from(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_parts_are_assembled_by_sequence() {
        let parts = vec![
            TextPart {
                text: " world".into(),
                sequence: 1,
            },
            TextPart {
                text: "hello".into(),
                sequence: 0,
            },
            TextPart {
                text: "!".into(),
                sequence: 2,
            },
        ];
        assert_eq!(assemble_text(parts), "hello world!");
    }

    #[test]
    fn classification_error_reflects_the_unknown_kind() {
        let bundle = TextBundle {
            document_id: "doc".into(),
            text: String::new(),
            start: 0,
            end: 0,
            typography: Vec::new(),
            semantics: Vec::new(),
            unknown_kind: Some("mystery".into()),
        };
        assert_eq!(
            bundle.classification_error(),
            Some(StoreError::UnknownRecordKind("mystery".into()))
        );

        let clean = TextBundle {
            unknown_kind: None,
            ..bundle
        };
        assert_eq!(clean.classification_error(), None);
    }
}
