//! Markup collaborator seam.
//!
//! Converting raw markup into plain text plus typography annotations is not
//! this crate's job; [`MarkupParser`] is the boundary contract the store
//! needs from whichever parser does it. Parse failures stay opaque here and
//! are surfaced to callers before any backend call happens.

use thiserror::Error;

use crate::types::TypographySpan;

/// The parser's output: the document text and the typographic annotations
/// found in the markup, with character offsets into that text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedText {
    pub text: String,
    pub typography: Vec<TypographySpan>,
}

/// An opaque parse failure reported by a markup implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct MarkupError {
    pub message: String,
}

impl MarkupError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Boundary contract for markup parsing.
pub trait MarkupParser: Send + Sync {
    fn parse(&self, raw: &str) -> Result<ParsedText, MarkupError>;
}

/// Passthrough parser for input that is already plain text. Produces no
/// typography annotations.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainText;

impl MarkupParser for PlainText {
    fn parse(&self, raw: &str) -> Result<ParsedText, MarkupError> {
        Ok(ParsedText {
            text: raw.to_string(),
            typography: Vec::new(),
        })
    }
}
