//! Word-respecting chunk splitting.
//!
//! [`split`] cuts a text into ordered, offset-tagged pieces bounded by a
//! maximum size, breaking at space characters so words stay intact. The
//! boundary space is retained as the first character of the following piece,
//! which keeps the concatenation of all pieces byte-for-byte identical to
//! the input.
//!
//! Two fallback branches emit the entire remaining buffer in one piece and
//! therefore do not enforce the size bound: when no space exists in the
//! window, and when the only space in the window sits at position 0. Callers
//! must not assume `piece.len() <= max_size` holds universally.

use serde::{Deserialize, Serialize};

/// One piece of a split text. `offset` is the starting character position
/// of the piece within the original text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitPiece {
    pub text: String,
    pub offset: usize,
}

impl SplitPiece {
    /// Character length of the piece.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Split `text` into word-respecting pieces of at most `max_size`
/// characters, except for the two whole-buffer fallback branches.
///
/// Pieces appear in strictly increasing `offset` order and concatenate back
/// to `text` exactly. The empty text produces no pieces.
pub fn split(max_size: usize, text: &str) -> Vec<SplitPiece> {
    let mut pieces = Vec::new();
    let mut offset = 0usize;
    let mut rest = text;

    while !rest.is_empty() {
        // Window covering character positions 0..=max_size of the buffer.
        let window_end = byte_len_of_chars(rest, max_size.saturating_add(1));
        match rest[..window_end].rfind(' ') {
            // No space in the window, or the window starts on one: the
            // remainder goes out as a single final piece, size bound not
            // enforced.
            None | Some(0) => {
                pieces.push(SplitPiece {
                    text: rest.to_string(),
                    offset,
                });
                break;
            }
            Some(pos) => {
                let piece = &rest[..pos];
                pieces.push(SplitPiece {
                    text: piece.to_string(),
                    offset,
                });
                offset += piece.chars().count();
                rest = &rest[pos..];
            }
        }
    }

    pieces
}

/// Byte length of the first `n` characters of `s`, or `s.len()` if `s` has
/// fewer than `n` characters.
fn byte_len_of_chars(s: &str, n: usize) -> usize {
    s.char_indices().nth(n).map_or(s.len(), |(idx, _)| idx)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn concat(pieces: &[SplitPiece]) -> String {
        pieces.iter().map(|p| p.text.as_str()).collect()
    }

    #[test]
    fn splits_at_the_rightmost_space_in_the_window() {
        let pieces = split(5, "a bb ccc dddd");

        assert_eq!(
            pieces,
            vec![
                SplitPiece {
                    text: "a bb".into(),
                    offset: 0
                },
                SplitPiece {
                    text: " ccc".into(),
                    offset: 4
                },
                SplitPiece {
                    text: " dddd".into(),
                    offset: 8
                },
            ]
        );
    }

    #[test]
    fn empty_text_produces_no_pieces() {
        assert!(split(5, "").is_empty());
    }

    #[test]
    fn concatenation_reproduces_the_input() {
        let texts = [
            "a bb ccc dddd",
            "single",
            " leading space",
            "trailing space ",
            "the quick brown fox jumps over the lazy dog",
            "unbroken-run-longer-than-any-window then words",
        ];

        for text in texts {
            for max_size in [1, 3, 5, 8, 100] {
                let pieces = split(max_size, text);
                assert_eq!(concat(&pieces), text, "max_size {max_size}, text {text:?}");
            }
        }
    }

    #[test]
    fn offsets_are_strictly_increasing_and_cover_the_text() {
        let text = "alpha beta gamma delta epsilon";
        let pieces = split(7, text);

        for pair in pieces.windows(2) {
            assert!(pair[0].offset < pair[1].offset);
            assert_eq!(pair[0].offset + pair[0].char_len(), pair[1].offset);
        }
        let last = pieces.last().expect("non-empty text yields pieces");
        assert_eq!(last.offset + last.char_len(), text.chars().count());
    }

    #[test]
    fn fallback_branches_ignore_max_size() {
        // No space anywhere: one oversized piece.
        let pieces = split(4, "abcdefghij");
        assert_eq!(pieces.len(), 1);
        assert_eq!(pieces[0].text, "abcdefghij");
        assert!(pieces[0].char_len() > 4);

        // Only space in the window is at position 0: the whole remainder is
        // emitted, long tail included.
        let pieces = split(4, " abcdefghij");
        assert_eq!(pieces.len(), 1);
        assert_eq!(pieces[0].text, " abcdefghij");

        // After a normal cut, a long final word rides out with its leading
        // space in one oversized piece.
        let pieces = split(4, "ab cdefghijkl");
        assert_eq!(
            pieces,
            vec![
                SplitPiece {
                    text: "ab".into(),
                    offset: 0
                },
                SplitPiece {
                    text: " cdefghijkl".into(),
                    offset: 2
                },
            ]
        );
    }

    #[test]
    fn bounded_pieces_never_exceed_max_size() {
        let text = "one two three four five six seven eight nine ten";
        for max_size in [4, 6, 10] {
            let pieces = split(max_size, text);
            // Every piece except a final fallback one respects the bound.
            for piece in &pieces[..pieces.len() - 1] {
                assert!(
                    piece.char_len() <= max_size,
                    "piece {:?} exceeds {max_size}",
                    piece.text
                );
            }
        }
    }

    #[test]
    fn a_window_larger_than_the_text_still_cuts_at_the_last_space() {
        let pieces = split(100, "ab cd");
        assert_eq!(
            pieces,
            vec![
                SplitPiece {
                    text: "ab".into(),
                    offset: 0
                },
                SplitPiece {
                    text: " cd".into(),
                    offset: 2
                },
            ]
        );
    }

    #[test]
    fn offsets_count_characters_not_bytes() {
        // Multi-byte characters before the cut point.
        let text = "héé ööö xx";
        let pieces = split(5, text);

        assert_eq!(concat(&pieces), text);
        assert_eq!(pieces[0].text, "héé");
        assert_eq!(pieces[1].offset, 3);
    }
}
