//! The trivial tokeniser: one token per maximal run of non-whitespace bytes,
//! tagged `Identifier` if it is all identifier bytes, `Default` otherwise.
//! No state is needed, so `state` is always `0`.

use core_text::{ContentsIterator, is_identifier_byte};

use crate::token::{FixedTokenType, Token, TokenType};
use crate::tokenizer::Tokenizer;

pub struct PlainTextTokenizer;

impl Tokenizer for PlainTextTokenizer {
    fn next_token(&self, it: &mut ContentsIterator<'_>, token: &mut Token, state: &mut u64) -> bool {
        *state = 0;
        while !it.at_eob() && it.get().is_ascii_whitespace() {
            it.advance_one();
        }
        if it.at_eob() {
            return false;
        }

        let start = it.position;
        let mut all_identifier = true;
        while !it.at_eob() && !it.get().is_ascii_whitespace() {
            if !is_identifier_byte(it.get()) {
                all_identifier = false;
            }
            it.advance_one();
        }

        *token = Token {
            start,
            end: it.position,
            kind: TokenType::Fixed(if all_identifier {
                FixedTokenType::Identifier
            } else {
                FixedTokenType::Default
            }),
        };
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
        let mut tokens = Vec::new();
        loop {
            let mut token = Token { start: 0, end: 0, kind: TokenType::Fixed(FixedTokenType::Default) };
            if !PlainTextTokenizer.next_token(&mut it, &mut token, &mut state) {
                break;
            }
            tokens.push(token);
        }
        tokens
    }

    #[test]
    fn splits_on_whitespace() {
        let tokens = collect(b"hello   world\nfoo_bar");
        assert_eq!(tokens.len(), 3);
        assert_eq!((tokens[0].start, tokens[0].end), (0, 5));
        assert_eq!((tokens[1].start, tokens[1].end), (8, 13));
        assert_eq!((tokens[2].start, tokens[2].end), (14, 21));
        assert_eq!(tokens[2].kind, TokenType::Fixed(FixedTokenType::Identifier));
    }

    #[test]
    fn punctuation_word_is_default() {
        let tokens = collect(b"a.b");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenType::Fixed(FixedTokenType::Default));
    }
}
