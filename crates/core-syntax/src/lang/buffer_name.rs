//! Buffer-name tokeniser (spec.md §6). Recognises the three buffer-name
//! forms deterministically:
//! - `/path/to/file` — a path.
//! - `*temp name*` — a temporary-buffer name.
//! - `*temp name* (/path/to/directory)` — a temporary-buffer name plus the
//!   directory it's associated with.
//!
//! `state`: `0` = undecided, `1` = just finished the `*temp name*` span and
//! is looking for the `(`, `2` = scanning the path/directory portion.

use core_text::ContentsIterator;

use crate::token::{FixedTokenType, Token, TokenType};
use crate::tokenizer::Tokenizer;

fn is_dir_sep(b: u8) -> bool {
    b == b'/' || b == b'\\'
}

fn fixed(start: u64, end: u64, kind: FixedTokenType) -> Token {
    Token { start, end, kind: TokenType::Fixed(kind) }
}

pub struct BufferNameTokenizer;

impl Tokenizer for BufferNameTokenizer {
    fn next_token(&self, it: &mut ContentsIterator<'_>, token: &mut Token, state: &mut u64) -> bool {
        if it.at_eob() {
            return false;
        }

        let start = it.position;
        let first = it.get();

        if *state == 0 && first == b'*' {
            it.advance_one();
            let mut probe = *it;
            let mut found_at = None;
            while !probe.at_eob() {
                if probe.get() == b'*' {
                    let mut ahead = probe;
                    ahead.advance_one();
                    if !ahead.at_eob() && ahead.get() == b' ' {
                        ahead.advance_one();
                        if !ahead.at_eob() && ahead.get() == b'(' {
                            found_at = Some(probe.position);
                            break;
                        }
                    }
                }
                probe.advance_one();
            }
            if let Some(p) = found_at {
                it.go_to(p + 1);
                *state = 1;
            } else {
                it.go_to(it.contents.len());
                *state = 2;
            }
            *token = fixed(start, it.position, FixedTokenType::BufferTemporaryName);
            return true;
        }

        if *state == 1 {
            if first == b' ' {
                it.advance_one();
            }
            if !it.at_eob() && it.get() == b'(' {
                it.advance_one();
            }
            *state = 2;
            *token = fixed(start, it.position, FixedTokenType::OpenPair);
            return true;
        }

        *state = 2;
        it.advance_one();
        if first == b')' && it.at_eob() {
            *token = fixed(start, it.position, FixedTokenType::ClosePair);
            return true;
        }
        if is_dir_sep(first) {
            *token = fixed(start, it.position, FixedTokenType::Punctuation);
            return true;
        }
        while !it.at_eob() && !is_dir_sep(it.get()) && it.get() != b')' {
            it.advance_one();
        }
        *token = fixed(start, it.position, FixedTokenType::Default);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_text::ContentStore;

    fn collect(bytes: &[u8]) -> Vec<Token> {
        let store = ContentStore::from_bytes(bytes);
        let mut it = store.start();
        let mut state = 0u64;
        let mut out = Vec::new();
        loop {
            let mut token = fixed(0, 0, FixedTokenType::Default);
            if !BufferNameTokenizer.next_token(&mut it, &mut token, &mut state) {
                break;
            }
            out.push(token);
        }
        out
    }

    #[test]
    fn plain_path() {
        let tokens = collect(b"/usr/bin/env");
        assert_eq!(tokens[0].kind, TokenType::Fixed(FixedTokenType::Punctuation));
        assert_eq!(tokens[1].kind, TokenType::Fixed(FixedTokenType::Default));
    }

    #[test]
    fn temp_name_without_directory() {
        let tokens = collect(b"*scratch*");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenType::Fixed(FixedTokenType::BufferTemporaryName));
    }

    #[test]
    fn temp_name_with_directory() {
        let tokens = collect(b"*shell* (/home/user)");
        assert_eq!(tokens[0].kind, TokenType::Fixed(FixedTokenType::BufferTemporaryName));
        assert_eq!(tokens[1].kind, TokenType::Fixed(FixedTokenType::OpenPair));
        assert!(tokens.iter().any(|t| t.kind == TokenType::Fixed(FixedTokenType::ClosePair)));
    }
}
