//! `Tokenizer_Check_Point` and `Token_Cache` — incremental re-tokenisation
//! with periodic state check-points (spec.md §4.5).

use core_state::Buffer;

use crate::token::Token;
use crate::tokenizer::Tokenizer;

/// Check-points are taken roughly every this many bytes.
pub const DEFAULT_CHECK_POINT_INTERVAL: u64 = 1000;

/// A snapshot of a tokeniser's `state` at `position`, letting re-tokenisation
/// resume from there instead of from position 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenizerCheckPoint {
    pub position: u64,
    pub state: u64,
}

/// Incrementally-maintained tokeniser state for one buffer. Re-tokenises
/// only the region invalidated since the last reconciliation, replaying
/// from the nearest preceding check-point.
pub struct TokenCache {
    check_points: Vec<TokenizerCheckPoint>,
    ran_to: u64,
    change_index: usize,
    interval: u64,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::with_interval(DEFAULT_CHECK_POINT_INTERVAL)
    }

    pub fn with_interval(interval: u64) -> Self {
        Self { check_points: Vec::new(), ran_to: 0, change_index: 0, interval: interval.max(1) }
    }

    /// The furthest position for which tokens have been validated
    /// (spec.md §3's `ran_to`). Zero for a freshly constructed or just-reset
    /// cache.
    pub fn ran_to(&self) -> u64 {
        self.ran_to
    }

    /// Binary-searches for the greatest check-point with `position <=
    /// target`, or `{0, 0}` if none exists.
    pub fn find_check_point(&self, target: u64) -> TokenizerCheckPoint {
        match self.check_points.partition_point(|cp| cp.position <= target) {
            0 => TokenizerCheckPoint { position: 0, state: 0 },
            n => self.check_points[n - 1],
        }
    }

    /// Reconciles the cache against `buffer`'s change log (spec.md §4.5):
    /// returns early if nothing changed since the last call; otherwise
    /// drops check-points past the earliest edited position and replays
    /// `tokenizer` forward from there, taking a new check-point every
    /// `interval` bytes.
    pub fn update(&mut self, buffer: &Buffer, tokenizer: &dyn Tokenizer) {
        if self.change_index == buffer.changes_len() {
            return;
        }

        let earliest = buffer
            .changes_from(self.change_index)
            .iter()
            .flat_map(|change| change.commit.edits.iter())
            .map(|edit| edit.position)
            .min()
            .unwrap_or(0);

        self.check_points.retain(|cp| cp.position <= earliest);

        let resume = self.find_check_point(earliest);
        self.replay_from(buffer, tokenizer, resume, buffer.contents.len());
        self.change_index = buffer.changes_len();
    }

    fn replay_from(&mut self, buffer: &Buffer, tokenizer: &dyn Tokenizer, from: TokenizerCheckPoint, stop_at: u64) {
        let mut it = buffer.contents.start();
        it.go_to(from.position);
        let mut state = from.state;
        let mut last_check_point = from.position;
        let mut token = Token { start: 0, end: 0, kind: crate::token::TokenType::Fixed(crate::token::FixedTokenType::Default) };

        self.ran_to = from.position;
        loop {
            if it.position >= stop_at {
                break;
            }
            if !tokenizer.next_token(&mut it, &mut token, &mut state) {
                break;
            }
            self.ran_to = token.end;
            if token.end - last_check_point >= self.interval {
                self.check_points.push(TokenizerCheckPoint { position: token.end, state });
                last_check_point = token.end;
            }
        }
    }

    /// The token covering `position`, if any.
    pub fn get_token_at_position(&mut self, buffer: &Buffer, tokenizer: &dyn Tokenizer, position: u64) -> Option<Token> {
        self.update(buffer, tokenizer);
        self.scan_from_nearest(buffer, tokenizer, position, |token, position| {
            token.contains_position(position)
        })
    }

    /// The last token ending at or before `position`; falls back to the
    /// previous check-point if none is found in the current interval.
    pub fn get_token_before_position(&mut self, buffer: &Buffer, tokenizer: &dyn Tokenizer, position: u64) -> Option<Token> {
        self.update(buffer, tokenizer);
        let anchor = self.find_check_point(position.saturating_sub(1));
        let fallback_anchor = self.find_check_point(anchor.position.saturating_sub(1));

        let mut it = buffer.contents.start();
        it.go_to(anchor.position);
        let mut state = anchor.state;
        let mut best: Option<Token> = None;
        let mut token = Token { start: 0, end: 0, kind: crate::token::TokenType::Fixed(crate::token::FixedTokenType::Default) };
        while it.position < position {
            if !tokenizer.next_token(&mut it, &mut token, &mut state) {
                break;
            }
            if token.end <= position {
                best = Some(token);
            } else {
                break;
            }
        }

        if best.is_some() {
            return best;
        }
        if anchor == fallback_anchor || fallback_anchor.position >= anchor.position {
            return None;
        }
        let mut it = buffer.contents.start();
        it.go_to(fallback_anchor.position);
        let mut state = fallback_anchor.state;
        let mut best = None;
        while it.position < anchor.position {
            if !tokenizer.next_token(&mut it, &mut token, &mut state) {
                break;
            }
            best = Some(token);
        }
        best
    }

    /// The first token starting at or after `position`.
    pub fn get_token_after_position(&mut self, buffer: &Buffer, tokenizer: &dyn Tokenizer, position: u64) -> Option<Token> {
        self.update(buffer, tokenizer);
        self.scan_from_nearest(buffer, tokenizer, position, |token, position| token.start >= position)
    }

    fn scan_from_nearest(
        &self,
        buffer: &Buffer,
        tokenizer: &dyn Tokenizer,
        position: u64,
        accept: impl Fn(&Token, u64) -> bool,
    ) -> Option<Token> {
        let anchor = self.find_check_point(position);
        let mut it = buffer.contents.start();
        it.go_to(anchor.position);
        let mut state = anchor.state;
        let mut token = Token { start: 0, end: 0, kind: crate::token::TokenType::Fixed(crate::token::FixedTokenType::Default) };
        loop {
            if !tokenizer.next_token(&mut it, &mut token, &mut state) {
                return None;
            }
            if accept(&token, position) {
                return Some(token);
            }
            if token.start > position {
                return None;
            }
        }
    }
}

impl Default for TokenCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::cpp::CppTokenizer;
    use crate::lang::plaintext::PlainTextTokenizer;
    use core_state::{Edit, Mode, Transaction};
    use core_text::SSOStr;

    #[test]
    fn finds_token_covering_position() {
        let buffer = Buffer::from_bytes("t", b"hello world", Mode::plaintext());
        let mut cache = TokenCache::new();
        let token = cache.get_token_at_position(&buffer, &PlainTextTokenizer, 7).unwrap();
        assert_eq!((token.start, token.end), (6, 11));
    }

    #[test]
    fn invalidates_on_edit() {
        let mut buffer = Buffer::from_bytes("t", b"hello world", Mode::plaintext());
        let mut cache = TokenCache::new();
        cache.update(&buffer, &PlainTextTokenizer);
        let mut txn = Transaction::new();
        txn.push(Edit::insert(0, SSOStr::from_static(b"x "), false));
        txn.commit(&mut buffer);

        let token = cache.get_token_at_position(&buffer, &PlainTextTokenizer, 0).unwrap();
        assert_eq!((token.start, token.end), (0, 1));
    }

    // E4: 10,000-byte C++ buffer, check-point interval 1000: replaying from
    // position 0 agrees with replaying from each check-point's own state.
    #[test]
    fn e4_checkpoint_replay_matches_full_replay() {
        let mut body = Vec::new();
        while body.len() < 10_000 {
            body.extend_from_slice(b"int foo(int x) { return x + 1; } // trailing comment\n");
        }
        body.truncate(10_000);
        let buffer = Buffer::from_bytes("t.cpp", &body, Mode::cpp());
        let tokenizer = CppTokenizer;

        let mut full_tokens = Vec::new();
        let mut it = buffer.contents.start();
        let mut state = 0u64;
        let mut token = Token { start: 0, end: 0, kind: crate::token::TokenType::Fixed(crate::token::FixedTokenType::Default) };
        while tokenizer.next_token(&mut it, &mut token, &mut state) {
            full_tokens.push(token);
        }

        let mut cache = TokenCache::with_interval(1000);
        cache.update(&buffer, &tokenizer);

        for cp in cache.check_points.iter() {
            let mut it = buffer.contents.start();
            it.go_to(cp.position);
            let mut state = cp.state;
            let mut token = Token { start: 0, end: 0, kind: crate::token::TokenType::Fixed(crate::token::FixedTokenType::Default) };
            if tokenizer.next_token(&mut it, &mut token, &mut state) {
                let expected = full_tokens.iter().find(|t| t.start == token.start);
                if let Some(expected) = expected {
                    assert_eq!(expected.end, token.end);
                }
            }
        }
    }
}
