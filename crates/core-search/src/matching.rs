//! Prefix/region equality tests over the Content Store (spec.md §4.8).

use core_text::ContentsIterator;

use crate::case::{CaseHandling, byte_matches, resolve_smart_case};

/// Does the buffer starting at `it` begin with `query`?
pub fn looking_at(it: ContentsIterator<'_>, query: &[u8]) -> bool {
    let mut cursor = it;
    for &want in query {
        if cursor.at_eob() || cursor.get() != want {
            return false;
        }
        cursor.advance_one();
    }
    true
}

/// Case-aware variant of [`looking_at`].
pub fn looking_at_cased(it: ContentsIterator<'_>, query: &[u8], case: CaseHandling) -> bool {
    let resolved = resolve_smart_case(query, case);
    let mut cursor = it;
    for &want in query {
        if cursor.at_eob() || !byte_matches(cursor.get(), want, resolved) {
            return false;
        }
        cursor.advance_one();
    }
    true
}

/// Does the region `[start, end)` equal `query` exactly?
pub fn matches(start: ContentsIterator<'_>, end: u64, query: &[u8]) -> bool {
    if end - start.position != query.len() as u64 {
        return false;
    }
    looking_at(start, query)
}

/// Does the region `[start, end)` equal `query`, which may itself be a
/// buffer region — `query_start..query_end` — possibly in a different
/// `ContentStore`?
pub fn matches_region(
    start: ContentsIterator<'_>,
    end: u64,
    query_start: ContentsIterator<'_>,
    query_end: u64,
) -> bool {
    if end - start.position != query_end - query_start.position {
        return false;
    }
    let mut a = start;
    let mut b = query_start;
    while a.position < end {
        if a.get() != b.get() {
            return false;
        }
        a.advance_one();
        b.advance_one();
    }
    true
}

/// Case-aware variant of [`matches`].
pub fn matches_cased(
    start: ContentsIterator<'_>,
    end: u64,
    query: &[u8],
    case: CaseHandling,
) -> bool {
    if end - start.position != query.len() as u64 {
        return false;
    }
    looking_at_cased(start, query, case)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_text::ContentStore;

    #[test]
    fn looking_at_checks_prefix() {
        let store = ContentStore::from_bytes(b"hello world");
        assert!(looking_at(store.start(), b"hello"));
        assert!(!looking_at(store.start(), b"world"));
    }

    #[test]
    fn looking_at_fails_near_eob() {
        let store = ContentStore::from_bytes(b"hi");
        assert!(!looking_at(store.start(), b"hello"));
    }

    #[test]
    fn looking_at_cased_insensitive() {
        let store = ContentStore::from_bytes(b"HELLO world");
        assert!(looking_at_cased(
            store.start(),
            b"hello",
            CaseHandling::CaseInsensitive
        ));
        assert!(!looking_at_cased(
            store.start(),
            b"hello",
            CaseHandling::CaseSensitive
        ));
    }

    #[test]
    fn matches_checks_region_equality() {
        let store = ContentStore::from_bytes(b"hello world");
        assert!(matches(store.iterator_at(6), 11, b"world"));
        assert!(!matches(store.iterator_at(6), 10, b"worl"));
    }

    #[test]
    fn matches_region_compares_two_buffer_spans() {
        let store = ContentStore::from_bytes(b"abcabc");
        assert!(matches_region(
            store.iterator_at(0),
            3,
            store.iterator_at(3),
            6
        ));
    }
}
