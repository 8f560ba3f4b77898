//! `highlight-string` overlay (spec.md §4.7), grounded on
//! `original_source/src/overlays/overlay_highlight_string.cpp`: highlight
//! every instance of a literal string, optionally constrained to a token
//! type and a position within that token (CONTAINS/EXACT/PREFIX/SUFFIX).
//!
//! The original re-tokenises by hand-rolling its own `(iterator, state,
//! token)` triple and calling `buffer->mode.next_token` directly; this port
//! resumes from the shared [`core_syntax::TokenCache`] instead, for the
//! same reason as [`crate::matching_tokens`] — one incremental tokeniser
//! per buffer, not a private stream per overlay.

use core_search::{CaseHandling, looking_at_cased};
use core_syntax::{Face, Token, TokenType};
use core_text::ContentsIterator;

use crate::pipeline::{Overlay, OverlayContext};

/// Constrains a match to a position within its enclosing token, mirroring
/// `Matching_Algo` in the original.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchingAlgo {
    Contains,
    ExactMatch,
    Prefix,
    Suffix,
}

pub struct HighlightString {
    face: Face,
    string: Vec<u8>,
    case_handling: CaseHandling,
    token_type: Option<TokenType>,
    matching_algo: MatchingAlgo,

    enabled: bool,
    current_token: Option<Token>,
    countdown: u64,
}

impl HighlightString {
    pub fn new(face: Face, string: &[u8], case_handling: CaseHandling) -> Self {
        Self {
            face,
            string: string.to_vec(),
            case_handling,
            token_type: None,
            matching_algo: MatchingAlgo::Contains,
            enabled: false,
            current_token: None,
            countdown: 0,
        }
    }

    /// Only highlight matches inside a token of `token_type`, constrained
    /// by `matching_algo` to a position within it.
    pub fn with_token_constraint(mut self, token_type: TokenType, matching_algo: MatchingAlgo) -> Self {
        self.token_type = Some(token_type);
        self.matching_algo = matching_algo;
        self
    }

    pub fn matches_string(&self, string: &[u8]) -> bool {
        self.string == string
    }

    fn advance_token_past(ctx: &mut OverlayContext<'_>, current: Option<Token>, position: u64) -> Option<Token> {
        let resume_at = current.map_or(position, |t| t.end);
        ctx.token_cache.get_token_after_position(ctx.buffer, ctx.tokenizer, resume_at)
    }
}

impl Overlay for HighlightString {
    fn start_frame(&mut self, ctx: &mut OverlayContext<'_>, start: ContentsIterator<'_>) {
        self.enabled = true;
        self.countdown = 0;
        self.current_token = None;

        if self.token_type.is_none() {
            return;
        }

        let mut token = ctx.token_cache.get_token_at_position(ctx.buffer, ctx.tokenizer, start.position);
        if token.is_none() {
            token = ctx.token_cache.get_token_after_position(ctx.buffer, ctx.tokenizer, start.position);
        }
        match token {
            Some(t) => self.current_token = Some(t),
            None => self.enabled = false,
        }
    }

    fn get_face_and_advance(&mut self, ctx: &mut OverlayContext<'_>, it: ContentsIterator<'_>) -> Face {
        if !self.enabled {
            return Face::default();
        }

        if self.countdown > 0 {
            self.countdown -= 1;
        }

        if self.countdown == 0 {
            if let Some(token_type) = self.token_type {
                while self.current_token.is_none_or(|t| t.end <= it.position) {
                    self.current_token = Self::advance_token_past(ctx, self.current_token, it.position);
                    if self.current_token.is_none() {
                        self.enabled = false;
                        return Face::default();
                    }
                }

                let token = self.current_token.unwrap();
                if token.kind != token_type {
                    return Face::default();
                }

                let len = self.string.len() as u64;
                let in_range = match self.matching_algo {
                    MatchingAlgo::Contains => it.position >= token.start,
                    MatchingAlgo::ExactMatch => it.position == token.start && token.end - token.start == len,
                    MatchingAlgo::Prefix => it.position == token.start,
                    MatchingAlgo::Suffix => it.position + len == token.end,
                };
                if !in_range {
                    return Face::default();
                }
            }

            if looking_at_cased(it, &self.string, self.case_handling) {
                self.countdown = self.string.len() as u64;
            }
        }

        if self.countdown > 0 {
            self.face
        } else {
            Face::default()
        }
    }

    fn get_face_newline_padding(&mut self, _ctx: &mut OverlayContext<'_>, _end_of_line: ContentsIterator<'_>) -> Face {
        Face::default()
    }

    fn end_frame(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_state::{Buffer, Cursor, CursorList, Mode};
    use core_syntax::{FaceColor, FixedTokenType, PlainTextTokenizer, TokenCache};

    fn face() -> Face {
        Face { foreground: FaceColor::Themed(4), ..Face::default() }
    }

    #[test]
    fn highlights_every_case_sensitive_occurrence() {
        let buffer = Buffer::from_bytes("t", b"needle in a needle stack", Mode::plaintext());
        let cursors = CursorList::from_cursors(vec![Cursor::at(0)]);
        let window = crate::pipeline::OverlayWindow { cursors: &cursors, show_marks: false };
        let mut token_cache = TokenCache::new();
        let mut ctx = OverlayContext {
            buffer: &buffer,
            window: &window,
            tokenizer: &PlainTextTokenizer,
            token_cache: &mut token_cache,
        };

        let mut overlay = HighlightString::new(face(), b"needle", CaseHandling::CaseSensitive);
        let start = buffer.contents.start();
        overlay.start_frame(&mut ctx, start);

        let first = overlay.get_face_and_advance(&mut ctx, buffer.contents.iterator_at(0));
        assert_eq!(first, face());
        let gap = overlay.get_face_and_advance(&mut ctx, buffer.contents.iterator_at(7));
        assert_eq!(gap, Face::default());
        let second = overlay.get_face_and_advance(&mut ctx, buffer.contents.iterator_at(12));
        assert_eq!(second, face());
    }

    #[test]
    fn token_constrained_prefix_match_requires_token_start() {
        let buffer = Buffer::from_bytes("t", b"prefixed value", Mode::plaintext());
        let cursors = CursorList::from_cursors(vec![Cursor::at(0)]);
        let window = crate::pipeline::OverlayWindow { cursors: &cursors, show_marks: false };
        let mut token_cache = TokenCache::new();
        let mut ctx = OverlayContext {
            buffer: &buffer,
            window: &window,
            tokenizer: &PlainTextTokenizer,
            token_cache: &mut token_cache,
        };

        let mut overlay = HighlightString::new(face(), b"prefix", CaseHandling::CaseSensitive)
            .with_token_constraint(TokenType::Fixed(FixedTokenType::Identifier), MatchingAlgo::Prefix);
        let start = buffer.contents.start();
        overlay.start_frame(&mut ctx, start);
        let hit = overlay.get_face_and_advance(&mut ctx, buffer.contents.iterator_at(0));
        assert_eq!(hit, face());
    }
}
