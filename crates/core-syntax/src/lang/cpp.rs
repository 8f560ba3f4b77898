//! C++ tokeniser: three independent sub-states packed into the 64-bit
//! `state` word (spec.md §4.6) — a comment sub-state (outside / inside a
//! block comment / inside a string or char literal), a preprocessor
//! sub-state (outside / just saw a directive keyword), and a syntax
//! sub-state (statement position / after a struct-like keyword, which
//! decides whether the next identifier tags as `Type` or `Identifier`).
//!
//! Block comments and string literals self-throttle: if the closing
//! delimiter isn't found before the end of the iterator's current bucket,
//! an interior `Comment`/`String` token is emitted for the scanned span and
//! the sub-state records "still inside", so the next call resumes rather
//! than scanning an unbounded number of buckets in one call.

use core_text::ContentsIterator;

use crate::token::{FixedTokenType, Token, TokenType};
use crate::tokenizer::Tokenizer;

const COMMENT_NONE: u64 = 0;
const COMMENT_BLOCK: u64 = 1;
const COMMENT_STRING: u64 = 2;
const COMMENT_CHAR: u64 = 3;

const PREPROCESSOR_NONE: u64 = 0;
const PREPROCESSOR_AFTER_DIRECTIVE: u64 = 1;

const SYNTAX_AT_STMT: u64 = 0;
const SYNTAX_AT_TYPE: u64 = 1;

fn pack(comment: u64, preprocessor: u64, syntax: u64) -> u64 {
    (comment & 0x7) | ((preprocessor & 0x7) << 3) | ((syntax & 0x7) << 6)
}

fn unpack(state: u64) -> (u64, u64, u64) {
    (state & 0x7, (state >> 3) & 0x7, (state >> 6) & 0x7)
}

const KEYWORDS: &[&str] = &[
    "if", "else", "for", "while", "do", "switch", "case", "default", "break", "continue",
    "return", "goto", "sizeof", "new", "delete", "namespace", "using", "template", "typename",
    "public", "private", "protected", "virtual", "override", "static", "const", "constexpr",
    "inline", "friend", "operator", "try", "catch", "throw", "true", "false", "nullptr",
];

const TYPE_INTRODUCERS: &[&str] = &["struct", "class", "enum", "union", "typedef"];

const PRIMITIVE_TYPES: &[&str] = &[
    "void", "bool", "char", "int", "long", "short", "float", "double", "unsigned", "signed",
    "auto", "size_t", "uint8_t", "uint16_t", "uint32_t", "uint64_t", "int8_t", "int16_t",
    "int32_t", "int64_t",
];

pub struct CppTokenizer;

impl Tokenizer for CppTokenizer {
    fn next_token(&self, it: &mut ContentsIterator<'_>, token: &mut Token, state: &mut u64) -> bool {
        let (mut comment, mut preprocessor, mut syntax) = unpack(*state);

        if comment == COMMENT_BLOCK {
            return resume_block_comment(it, token, state, comment, preprocessor, syntax);
        }
        if comment == COMMENT_STRING || comment == COMMENT_CHAR {
            let quote = if comment == COMMENT_STRING { b'"' } else { b'\'' };
            return resume_quoted(it, token, state, quote, preprocessor, syntax);
        }

        while !it.at_eob() && it.get().is_ascii_whitespace() {
            it.advance_one();
        }
        if it.at_eob() {
            return false;
        }

        let start = it.position;
        let byte = it.get();

        if byte == b'/' {
            let mut probe = *it;
            probe.advance_one();
            if !probe.at_eob() && probe.get() == b'/' {
                let mut cursor = probe;
                cursor.advance_one();
                while !cursor.at_eob() && cursor.get() != b'\n' {
                    cursor.advance_one();
                }
                *it = cursor;
                *token = fixed(start, it.position, FixedTokenType::Comment);
                *state = pack(COMMENT_NONE, preprocessor, syntax);
                return true;
            }
            if !probe.at_eob() && probe.get() == b'*' {
                probe.advance_one();
                comment = COMMENT_BLOCK;
                *it = probe;
                return resume_block_comment(it, token, state, comment, preprocessor, syntax);
            }
        }

        if byte == b'"' {
            it.advance_one();
            return resume_quoted(it, token, state, b'"', preprocessor, syntax);
        }
        if byte == b'\'' {
            it.advance_one();
            return resume_quoted(it, token, state, b'\'', preprocessor, syntax);
        }

        if byte == b'#' && at_start_of_line(*it) {
            it.advance_one();
            while !it.at_eob() && it.get().is_ascii_whitespace() && it.get() != b'\n' {
                it.advance_one();
            }
            let word_start = it.position;
            while !it.at_eob() && it.get().is_ascii_alphabetic() {
                it.advance_one();
            }
            let word = it.contents.slice(word_start, it.position);
            let kind = match word.as_str() {
                "if" | "ifdef" | "ifndef" => FixedTokenType::PreprocessorIf,
                "elif" | "else" => FixedTokenType::PreprocessorElse,
                "endif" => FixedTokenType::PreprocessorEndif,
                _ => FixedTokenType::PreprocessorKeyword,
            };
            *token = fixed(start, it.position, kind);
            *state = pack(COMMENT_NONE, PREPROCESSOR_AFTER_DIRECTIVE, syntax);
            return true;
        }

        if byte.is_ascii_digit() {
            while !it.at_eob() && (it.get().is_ascii_alphanumeric() || it.get() == b'.' || it.get() == b'_') {
                it.advance_one();
            }
            *token = fixed(start, it.position, FixedTokenType::Number);
            *state = pack(COMMENT_NONE, PREPROCESSOR_NONE, SYNTAX_AT_STMT);
            return true;
        }

        if byte.is_ascii_alphabetic() || byte == b'_' {
            while !it.at_eob() && (it.get().is_ascii_alphanumeric() || it.get() == b'_') {
                it.advance_one();
            }
            let word = it.contents.slice(start, it.position);
            let word = word.as_str();
            let kind = if TYPE_INTRODUCERS.contains(&word) {
                syntax = SYNTAX_AT_TYPE;
                FixedTokenType::Keyword
            } else if KEYWORDS.contains(&word) {
                syntax = SYNTAX_AT_STMT;
                FixedTokenType::Keyword
            } else if PRIMITIVE_TYPES.contains(&word) || syntax == SYNTAX_AT_TYPE {
                syntax = SYNTAX_AT_STMT;
                FixedTokenType::Type
            } else {
                FixedTokenType::Identifier
            };
            *token = fixed(start, it.position, kind);
            *state = pack(COMMENT_NONE, preprocessor, syntax);
            return true;
        }

        it.advance_one();
        let kind = match byte {
            b'(' | b'{' | b'[' => FixedTokenType::OpenPair,
            b')' | b'}' | b']' => FixedTokenType::ClosePair,
            _ => FixedTokenType::Punctuation,
        };
        *token = fixed(start, it.position, kind);
        *state = pack(COMMENT_NONE, preprocessor, SYNTAX_AT_STMT);
        true
    }
}

fn fixed(start: u64, end: u64, kind: FixedTokenType) -> Token {
    Token { start, end, kind: TokenType::Fixed(kind) }
}

fn at_start_of_line(it: ContentsIterator<'_>) -> bool {
    if it.at_bob() {
        return true;
    }
    let mut probe = it;
    probe.retreat_one();
    probe.get() == b'\n'
}

/// Scan forward for `*/`, throttling at the end of the iterator's starting
/// bucket if the close isn't found yet.
fn resume_block_comment(
    it: &mut ContentsIterator<'_>,
    token: &mut Token,
    state: &mut u64,
    _comment: u64,
    preprocessor: u64,
    syntax: u64,
) -> bool {
    let start = it.position;
    if it.at_eob() {
        *token = fixed(start, it.position, FixedTokenType::Comment);
        *state = pack(COMMENT_NONE, preprocessor, syntax);
        return true;
    }
    let bucket_limit = it.contents.bucket(it.bucket).len() as u64 - it.index as u64 + it.position;
    loop {
        if it.at_eob() {
            *token = fixed(start, it.position, FixedTokenType::Comment);
            *state = pack(COMMENT_NONE, preprocessor, syntax);
            return true;
        }
        if it.get() == b'*' {
            let mut probe = *it;
            probe.advance_one();
            if !probe.at_eob() && probe.get() == b'/' {
                probe.advance_one();
                *it = probe;
                *token = fixed(start, it.position, FixedTokenType::Comment);
                *state = pack(COMMENT_NONE, preprocessor, syntax);
                return true;
            }
        }
        if it.position >= bucket_limit {
            *token = fixed(start, it.position, FixedTokenType::Comment);
            *state = pack(COMMENT_BLOCK, preprocessor, syntax);
            return true;
        }
        it.advance_one();
    }
}

/// Scan forward for an unescaped closing `quote`, with the same
/// bucket-boundary throttle as [`resume_block_comment`].
fn resume_quoted(
    it: &mut ContentsIterator<'_>,
    token: &mut Token,
    state: &mut u64,
    quote: u8,
    preprocessor: u64,
    syntax: u64,
) -> bool {
    let comment_state = if quote == b'"' { COMMENT_STRING } else { COMMENT_CHAR };
    let start = it.position;
    if it.at_eob() {
        *token = fixed(start, it.position, FixedTokenType::String);
        *state = pack(COMMENT_NONE, preprocessor, syntax);
        return true;
    }
    let bucket_limit = it.contents.bucket(it.bucket).len() as u64 - it.index as u64 + it.position;
    loop {
        if it.at_eob() || it.get() == b'\n' {
            *token = fixed(start, it.position, FixedTokenType::String);
            *state = pack(COMMENT_NONE, preprocessor, syntax);
            return true;
        }
        if it.get() == b'\\' {
            it.advance_one();
            if !it.at_eob() {
                it.advance_one();
            }
            continue;
        }
        if it.get() == quote {
            it.advance_one();
            *token = fixed(start, it.position, FixedTokenType::String);
            *state = pack(COMMENT_NONE, preprocessor, syntax);
            return true;
        }
        if it.position >= bucket_limit {
            *token = fixed(start, it.position, FixedTokenType::String);
            *state = pack(comment_state, preprocessor, syntax);
            return true;
        }
        it.advance_one();
    }
}
