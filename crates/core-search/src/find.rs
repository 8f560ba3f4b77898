//! Bucket-aware scanning primitives: single-byte and substring `find`/`rfind`
//! plus non-overlapping `search_forward`/`search_backward` (spec.md §4.8).

use core_text::ContentsIterator;

use crate::case::{CaseHandling, byte_matches, resolve_smart_case};
use crate::matching::{looking_at, looking_at_cased};

/// Find a byte at or after `it`. On success repositions `it` to the match
/// and returns `true`; on failure leaves `it` at eob and returns `false`.
pub fn find(it: &mut ContentsIterator<'_>, ch: u8) -> bool {
    while !it.at_eob() {
        if it.get() == ch {
            return true;
        }
        it.advance_one();
    }
    false
}

/// Find a byte before `it`. On success repositions `it` to the start of the
/// match and returns `true`; on failure leaves `it` at bob and returns
/// `false`.
pub fn rfind(it: &mut ContentsIterator<'_>, ch: u8) -> bool {
    while !it.at_bob() {
        it.retreat_one();
        if it.get() == ch {
            return true;
        }
    }
    false
}

/// Case-aware variant of [`find`]. A single non-alphabetic byte degrades to
/// plain [`find`], since case has no effect on it.
pub fn find_cased(it: &mut ContentsIterator<'_>, ch: u8, case: CaseHandling) -> bool {
    if !ch.is_ascii_alphabetic() {
        return find(it, ch);
    }
    let resolved = resolve_smart_case(&[ch], case);
    while !it.at_eob() {
        if byte_matches(it.get(), ch, resolved) {
            return true;
        }
        it.advance_one();
    }
    false
}

/// Case-aware variant of [`rfind`].
pub fn rfind_cased(it: &mut ContentsIterator<'_>, ch: u8, case: CaseHandling) -> bool {
    if !ch.is_ascii_alphabetic() {
        return rfind(it, ch);
    }
    let resolved = resolve_smart_case(&[ch], case);
    while !it.at_bob() {
        it.retreat_one();
        if byte_matches(it.get(), ch, resolved) {
            return true;
        }
    }
    false
}

/// Find `query` at or after `it` without overlapping itself. On success
/// repositions `it` to the start of the match; on failure leaves `it` at
/// eob.
pub fn search_forward(it: &mut ContentsIterator<'_>, query: &[u8]) -> bool {
    if query.is_empty() {
        return true;
    }
    let first = query[0];
    let mut probe = *it;
    loop {
        if !find(&mut probe, first) {
            *it = probe;
            return false;
        }
        if looking_at(probe, query) {
            *it = probe;
            return true;
        }
        probe.advance_one();
    }
}

/// Find `query` starting before `it` (the match may extend past `it`). On
/// success repositions `it` to the start of the match; on failure leaves
/// `it` at bob.
pub fn search_backward(it: &mut ContentsIterator<'_>, query: &[u8]) -> bool {
    if query.is_empty() {
        return true;
    }
    let first = query[0];
    let mut probe = *it;
    loop {
        if !rfind(&mut probe, first) {
            *it = probe;
            return false;
        }
        if looking_at(probe, query) {
            *it = probe;
            return true;
        }
    }
}

/// Case-aware variant of [`search_forward`].
pub fn search_forward_cased(
    it: &mut ContentsIterator<'_>,
    query: &[u8],
    case: CaseHandling,
) -> bool {
    if query.is_empty() {
        return true;
    }
    let resolved = resolve_smart_case(query, case);
    let first = query[0];
    let mut probe = *it;
    loop {
        if !find_cased(&mut probe, first, resolved) {
            *it = probe;
            return false;
        }
        if looking_at_cased(probe, query, resolved) {
            *it = probe;
            return true;
        }
        probe.advance_one();
    }
}

/// Case-aware variant of [`search_backward`].
pub fn search_backward_cased(
    it: &mut ContentsIterator<'_>,
    query: &[u8],
    case: CaseHandling,
) -> bool {
    if query.is_empty() {
        return true;
    }
    let resolved = resolve_smart_case(query, case);
    let first = query[0];
    let mut probe = *it;
    loop {
        if !rfind_cased(&mut probe, first, resolved) {
            *it = probe;
            return false;
        }
        if looking_at_cased(probe, query, resolved) {
            *it = probe;
            return true;
        }
    }
}

/// Bounded variant of [`search_forward`]: fails if the match would start at
/// or after `end`.
pub fn find_before(it: &mut ContentsIterator<'_>, end: u64, query: &[u8]) -> bool {
    let start_position = it.position;
    if !search_forward(it, query) || it.position >= end {
        it.go_to(start_position);
        return false;
    }
    true
}

/// Bounded variant of [`search_backward`]: fails if the match would start
/// before `start`.
pub fn rfind_after(it: &mut ContentsIterator<'_>, start: u64, query: &[u8]) -> bool {
    let original_position = it.position;
    if !search_backward(it, query) || it.position < start {
        it.go_to(original_position);
        return false;
    }
    true
}

fn line_bounds(it: ContentsIterator<'_>) -> (u64, u64) {
    let mut start = it;
    if !rfind(&mut start, b'\n') {
        start.go_to(0);
    } else {
        start.advance_one();
    }
    let mut end = it;
    if !find(&mut end, b'\n') {
        end.go_to(end.contents.len());
    }
    (start.position, end.position)
}

/// Find `query` at or after `it`, bounded to the line `it` is on. The match
/// may touch the line's trailing `\n` boundary but not cross it.
pub fn find_this_line(it: &mut ContentsIterator<'_>, query: &[u8]) -> bool {
    let (_, line_end) = line_bounds(*it);
    find_before(it, line_end + 1, query)
}

/// Find `query` before `it`, bounded to the line `it` is on.
pub fn rfind_this_line(it: &mut ContentsIterator<'_>, query: &[u8]) -> bool {
    let (line_start, _) = line_bounds(*it);
    rfind_after(it, line_start, query)
}
