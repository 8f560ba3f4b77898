//! Markdown tokeniser (spec.md §4.6). A start-of-line/middle-of-line
//! automaton: headings and list bullets are only recognised right after a
//! newline, inline code/bold/italics/links are recognised anywhere.
//!
//! This is a representative subset of the full grammar: it covers headings,
//! list bullets, inline and fenced code, links (`[title](href)` and
//! `[title]: href`), and `*`/`_`-delimited emphasis, but does not attempt
//! the original's full word-boundary/nesting analysis for emphasis markers.
//!
//! `state` packs two fields in its low bits: line position (`LINE_START`,
//! `LINE_MIDDLE`, `LINE_TITLE`) and link progress (`LINK_NONE`,
//! `LINK_AFTER_TITLE`, `LINK_BEFORE_HREF`).

use core_text::ContentsIterator;

use crate::token::{FixedTokenType, Token, TokenType};
use crate::tokenizer::Tokenizer;

const LINE_START: u64 = 0;
const LINE_MIDDLE: u64 = 1;
const LINE_TITLE: u64 = 2;

const LINK_NONE: u64 = 0;
const LINK_AFTER_TITLE: u64 = 1;
const LINK_BEFORE_HREF_LINE: u64 = 2;
const LINK_BEFORE_HREF_PAREN: u64 = 3;

fn pack(line: u64, link: u64) -> u64 {
    line | (link << 2)
}

fn unpack(state: u64) -> (u64, u64) {
    (state & 0x3, (state >> 2) & 0x7)
}

fn is_space(b: u8) -> bool {
    b == b' ' || b == b'\t' || b == b'\r' || b == b'\n'
}

fn fixed(start: u64, end: u64, kind: FixedTokenType) -> Token {
    Token { start, end, kind: TokenType::Fixed(kind) }
}

fn looking_at(it: &ContentsIterator<'_>, s: &[u8]) -> bool {
    let mut probe = *it;
    for &b in s {
        if probe.at_eob() || probe.get() != b {
            return false;
        }
        probe.advance_one();
    }
    true
}

pub struct MarkdownTokenizer;

impl Tokenizer for MarkdownTokenizer {
    fn next_token(&self, it: &mut ContentsIterator<'_>, token: &mut Token, state: &mut u64) -> bool {
        let (mut line, mut link) = unpack(*state);

        loop {
            if it.at_eob() {
                *state = pack(line, link);
                return false;
            }
            let ch = it.get();
            if !is_space(ch) {
                break;
            }
            if link == LINK_AFTER_TITLE {
                link = LINK_NONE;
            }
            if ch == b'\n' {
                line = LINE_START;
            }
            it.advance_one();
        }

        let start = it.position;
        let first = it.get();

        if line != LINE_TITLE && line == LINE_START && matches!(first, b'*' | b'+' | b'-') {
            it.advance_one();
            let next_is_blank = it.at_eob() || is_space(it.get());
            if next_is_blank {
                line = LINE_MIDDLE;
                *state = pack(line, link);
                *token = fixed(start, it.position, FixedTokenType::Punctuation);
                return true;
            }
            it.go_to(start);
        }

        if line == LINE_START && first == b'#' {
            it.advance_one();
            while !it.at_eob() && it.get() == b'#' {
                it.advance_one();
            }
            line = LINE_TITLE;
            *state = pack(line, link);
            *token = fixed(start, it.position, FixedTokenType::Punctuation);
            return true;
        }

        if first == b'`' {
            it.advance_one();
            let mut run = 1u64;
            while !it.at_eob() && it.get() == b'`' {
                it.advance_one();
                run += 1;
            }
            if run >= 3 {
                let mut backticks = 0u64;
                while !it.at_eob() {
                    let b = it.get();
                    it.advance_one();
                    if b == b'`' {
                        backticks += 1;
                        if backticks == 3 {
                            break;
                        }
                    } else {
                        backticks = 0;
                    }
                }
            } else {
                while !it.at_eob() && it.get() != b'`' {
                    it.advance_one();
                }
                if !it.at_eob() {
                    it.advance_one();
                }
            }
            *state = pack(line, link);
            *token = fixed(start, it.position, FixedTokenType::Code);
            return true;
        }

        if first == b'[' {
            it.advance_one();
            while !it.at_eob() && it.get() != b']' {
                it.advance_one();
            }
            if !it.at_eob() {
                it.advance_one();
            }
            link = LINK_AFTER_TITLE;
            *state = pack(line, link);
            *token = fixed(start, it.position, FixedTokenType::LinkTitle);
            return true;
        }

        if link == LINK_AFTER_TITLE && looking_at(it, b": ") {
            it.advance_one();
            link = LINK_BEFORE_HREF_LINE;
            *state = pack(line, link);
            *token = fixed(start, it.position, FixedTokenType::Default);
            return true;
        }
        if link == LINK_BEFORE_HREF_LINE {
            while !it.at_eob() && it.get() != b'\n' {
                it.advance_one();
            }
            line = LINE_START;
            link = LINK_NONE;
            *state = pack(line, link);
            *token = fixed(start, it.position, FixedTokenType::LinkHref);
            return true;
        }

        if link == LINK_AFTER_TITLE && first == b'(' {
            it.advance_one();
            link = LINK_BEFORE_HREF_PAREN;
            *state = pack(line, link);
            *token = fixed(start, it.position, FixedTokenType::Default);
            return true;
        }
        if link == LINK_BEFORE_HREF_PAREN {
            while !it.at_eob() && it.get() != b')' {
                it.advance_one();
            }
            link = LINK_NONE;
            line = LINE_MIDDLE;
            *state = pack(line, link);
            *token = fixed(start, it.position, FixedTokenType::LinkHref);
            return true;
        }

        if matches!(first, b'*' | b'_') {
            let other = if first == b'*' { b'_' } else { b'*' };
            let mut probe = *it;
            probe.advance_one();
            let mut run_len = 1u64;
            if !probe.at_eob() && (probe.get() == first || probe.get() == other) {
                probe.advance_one();
                run_len = 2;
                if !probe.at_eob() && probe.get() == other {
                    probe.advance_one();
                    run_len = 3;
                }
            }
            let mut closer = probe;
            let mut found = false;
            while !closer.at_eob() && closer.get() != b'\n' {
                if looking_at(&closer, &vec![first; run_len as usize]) {
                    found = true;
                    break;
                }
                closer.advance_one();
            }
            if found {
                for _ in 0..run_len {
                    closer.advance_one();
                }
                it.go_to(closer.position);
                line = LINE_MIDDLE;
                *state = pack(line, link);
                *token = fixed(
                    start,
                    it.position,
                    match run_len {
                        1 => FixedTokenType::ProcessItalics,
                        2 => FixedTokenType::ProcessBold,
                        _ => FixedTokenType::ProcessBoldItalics,
                    },
                );
                return true;
            }
        }

        let kind = if line == LINE_TITLE { FixedTokenType::Title } else { FixedTokenType::Default };
        while !it.at_eob() {
            let ch = it.get();
            if ch == b'\n' {
                line = LINE_START;
                break;
            }
            if line == LINE_TITLE {
                if is_space(ch) {
                    break;
                }
            } else if is_space(ch) {
                if it.position == start {
                    it.advance_one();
                }
                line = LINE_MIDDLE;
                break;
            }
            it.advance_one();
        }
        *state = pack(line, link);
        *token = fixed(start, it.position, kind);
        true
    }
}
