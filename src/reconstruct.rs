//! Range reconstruction from stored chunks.
//!
//! A range query returns every chunk overlapping the requested interval,
//! possibly unordered. [`reconstruct`] sorts them, concatenates their text,
//! and cuts the requested character range back out of the concatenation.
//!
//! The chunk set is trusted to fully and contiguously cover the requested
//! range; coverage is not verified here, and a violated precondition yields
//! truncated or shifted text rather than an error. Arithmetic saturates so
//! the failure mode stays silent instead of panicking.

use crate::types::TextChunk;

/// The reconstructed slice of a document's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledText {
    pub text: String,
    pub start: usize,
    pub end: usize,
}

impl AssembledText {
    /// The empty result returned for an empty chunk set. Offsets are zeroed
    /// rather than echoing the request, so callers can tell "nothing stored
    /// there" apart from a zero-length match.
    pub fn empty() -> Self {
        Self {
            text: String::new(),
            start: 0,
            end: 0,
        }
    }
}

/// Rebuild the character range `[start, end)` from overlapping `chunks`.
///
/// An empty chunk set yields [`AssembledText::empty`] regardless of the
/// requested range; callers treat that as a not-found signal.
pub fn reconstruct(start: usize, end: usize, mut chunks: Vec<TextChunk>) -> AssembledText {
    if chunks.is_empty() {
        return AssembledText::empty();
    }

    chunks.sort_by_key(|chunk| chunk.start);
    let first_start = chunks[0].start;

    let buffer: String = chunks.iter().map(|chunk| chunk.text.as_str()).collect();
    let text: String = buffer
        .chars()
        .skip(start.saturating_sub(first_start))
        .take(end.saturating_sub(start))
        .collect();

    AssembledText { text, start, end }
}
