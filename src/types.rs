//! Core data model for the text store.
//!
//! Two layers of types flow through the store. Payload types
//! ([`DocumentPayload`] and the span types) describe a document as a caller
//! submits it and carry no document identity. Record types ([`TextChunk`],
//! [`SemanticRecord`], [`TypographyRecord`], [`StructureRecord`]) are what
//! actually gets persisted: the facade stamps the backend-assigned document
//! id onto every one of them before any write.
//!
//! All offsets are character offsets into the reassembled document text, and
//! every interval is half-open: `[start, end)` with `end = start + char_len`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Record kind tag for text chunks.
pub const RECORD_CHUNK: &str = "chunk";
/// Record kind tag for semantic annotations.
pub const RECORD_SEMANTICS: &str = "semantics";
/// Record kind tag for typography annotations.
pub const RECORD_TYPOGRAPHY: &str = "typography";
/// Record kind tag for document structure records.
pub const RECORD_STRUCTURE: &str = "structure";

/// One part of a document's text, submitted in arbitrary order and
/// reassembled by ascending `sequence` before splitting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextPart {
    pub text: String,
    pub sequence: usize,
}

/// A node of the document outline: type, name, description, nesting depth,
/// and the character offset where the section starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureNode {
    pub node_type: String,
    pub name: String,
    pub description: String,
    pub depth: usize,
    pub start: usize,
}

/// A typographic annotation as produced by the markup parser, not yet tied
/// to a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypographySpan {
    pub start: usize,
    pub end: usize,
    pub style: String,
}

/// A semantic annotation as submitted by the caller, not yet tied to a
/// document. `attributes` holds arbitrary domain fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticSpan {
    pub start: usize,
    pub end: usize,
    pub label: String,
    #[serde(default)]
    pub attributes: serde_json::Value,
}

/// Everything needed to import one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentPayload {
    pub text: Vec<TextPart>,
    pub typography: Vec<TypographySpan>,
    pub semantics: Vec<SemanticSpan>,
    pub structure: Vec<StructureNode>,
}

/// A stored slice of document text. Chunks are immutable once written; a
/// document's full chunk set is produced by a single import.
///
/// Invariant: concatenating a document's chunks in ascending `start` order
/// reproduces the original text, so any fully covered sub-range can be cut
/// back out of the concatenation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextChunk {
    pub document_id: String,
    pub text: String,
    pub start: usize,
    pub end: usize,
    pub sequence: usize,
}

/// A persisted semantic annotation, stamped with its owning document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticRecord {
    pub document_id: String,
    pub start: usize,
    pub end: usize,
    pub label: String,
    #[serde(default)]
    pub attributes: serde_json::Value,
}

impl SemanticRecord {
    pub fn from_span(document_id: &str, span: SemanticSpan) -> Self {
        Self {
            document_id: document_id.to_string(),
            start: span.start,
            end: span.end,
            label: span.label,
            attributes: span.attributes,
        }
    }
}

/// A persisted typographic annotation, stamped with its owning document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypographyRecord {
    pub document_id: String,
    pub start: usize,
    pub end: usize,
    pub style: String,
}

impl TypographyRecord {
    pub fn from_span(document_id: &str, span: TypographySpan) -> Self {
        Self {
            document_id: document_id.to_string(),
            start: span.start,
            end: span.end,
            style: span.style,
        }
    }
}

/// The top-level outline record for a document. Written before anything
/// else; the id the backend assigns to it becomes the document id that every
/// chunk and annotation is tagged with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureRecord {
    pub nodes: Vec<StructureNode>,
    pub created_at: DateTime<Utc>,
}
