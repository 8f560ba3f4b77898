//! `matching-tokens` overlay (spec.md §4.7), grounded on
//! `original_source/src/overlays/overlay_matching_tokens.cpp`: when the
//! primary cursor sits at or just after a token of a configured type,
//! every other token with identical bytes and the same type is
//! highlighted.
//!
//! The original streams tokens with a `Forward_Token_Iterator` it owns
//! directly; this port resumes from the shared [`core_syntax::TokenCache`]
//! instead, since that cache (not a private re-tokenisation stream) is this
//! workspace's one source of incremental token state (spec.md §4.5). The
//! original's sixth vtable hook, `skip_forward_same_line` (a rendering
//! fast-path for horizontal-only scrolling), has no counterpart here —
//! spec.md's Overlay contract names only the five hooks this module
//! implements.

use core_search::matches_region;
use core_syntax::{Face, FixedTokenType, Token, TokenType};
use core_text::ContentsIterator;

use crate::pipeline::{Overlay, OverlayContext};

pub struct MatchingTokens {
    face: Face,
    token_types: Vec<TokenType>,

    enabled: bool,
    token_matches: bool,

    cursor_token_start: u64,
    cursor_token_end: u64,
    cursor_token_type: TokenType,

    current_token: Option<Token>,
}

fn is_default(kind: TokenType) -> bool {
    matches!(kind, TokenType::Fixed(FixedTokenType::Default))
}

impl MatchingTokens {
    pub fn new(face: Face, token_types: Vec<TokenType>) -> Self {
        Self {
            face,
            token_types,
            enabled: false,
            token_matches: false,
            cursor_token_start: 0,
            cursor_token_end: 0,
            cursor_token_type: TokenType::Fixed(FixedTokenType::Default),
            current_token: None,
        }
    }

    fn is_matching_type(&self, kind: TokenType) -> bool {
        self.token_types.iter().any(|&t| t == kind)
    }

    fn refresh_token_matches(&mut self, ctx: &mut OverlayContext<'_>) {
        self.token_matches = false;
        let Some(token) = self.current_token else { return };

        if is_default(token.kind) != is_default(self.cursor_token_type) {
            return;
        }

        let cursor_it = ctx.buffer.contents.iterator_at(self.cursor_token_start);
        let candidate_it = ctx.buffer.contents.iterator_at(token.start);
        self.token_matches = matches_region(cursor_it, self.cursor_token_end, candidate_it, token.end);
    }

    /// Advance `current_token` to the token covering or starting after
    /// `position`, using whichever of the cache's two lookups finds it —
    /// `position` may land inside a token or in the untokenised space
    /// between two.
    fn token_at_or_after(ctx: &mut OverlayContext<'_>, position: u64) -> Option<Token> {
        ctx.token_cache
            .get_token_at_position(ctx.buffer, ctx.tokenizer, position)
            .or_else(|| ctx.token_cache.get_token_after_position(ctx.buffer, ctx.tokenizer, position))
    }
}

impl Overlay for MatchingTokens {
    fn start_frame(&mut self, ctx: &mut OverlayContext<'_>, start: ContentsIterator<'_>) {
        self.enabled = false;

        if ctx.window.show_marks || ctx.buffer.contents.is_empty() {
            return;
        }

        let cursor_point = ctx.window.cursors.selected().point;

        // Prefer the token immediately before the cursor over the one at
        // it, since a cursor sitting right after a token should still be
        // considered "at" it.
        let anchor = cursor_point.max(1) - 1;
        let Some(mut cursor_token) = Self::token_at_or_after(ctx, anchor) else { return };
        if cursor_token.start > cursor_point {
            return;
        }

        // If the cursor sits exactly at the boundary between two tokens,
        // prefer the following one when it also qualifies.
        if cursor_point == cursor_token.end {
            if let Some(next) = ctx.token_cache.get_token_after_position(ctx.buffer, ctx.tokenizer, cursor_token.end) {
                if cursor_point == next.start && self.is_matching_type(next.kind) {
                    cursor_token = next;
                }
            }
        }

        if !self.is_matching_type(cursor_token.kind) {
            return;
        }

        self.cursor_token_start = cursor_token.start;
        self.cursor_token_end = cursor_token.end;
        self.cursor_token_type = cursor_token.kind;

        self.current_token = Self::token_at_or_after(ctx, start.position);
        if self.current_token.is_none() {
            return;
        }
        self.refresh_token_matches(ctx);
        self.enabled = true;
    }

    fn get_face_and_advance(&mut self, ctx: &mut OverlayContext<'_>, it: ContentsIterator<'_>) -> Face {
        if !self.enabled {
            return Face::default();
        }

        if self.current_token.is_none_or(|t| it.position >= t.end) {
            self.current_token = Self::token_at_or_after(ctx, it.position);
            if self.current_token.is_none() {
                self.enabled = false;
                return Face::default();
            }
            self.refresh_token_matches(ctx);
        }

        let token = self.current_token.unwrap();
        if self.token_matches && token.contains_position(it.position) {
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
