//! Nearest-matching-identifier search (spec.md §4.9), grounded on
//! `original_source/basic/completion_commands.cpp`'s bucket-walk: search the
//! bucket containing the cursor first, then expand outward one bucket at a
//! time (up to `max_buckets`) in both directions, picking the closer match
//! when both sides have one.

use core_search::matches_region;
use core_text::{ContentStore, ContentsIterator, forward_through_identifier, is_identifier_byte};

fn bucket_start(contents: &ContentStore, bucket: usize) -> u64 {
    (0..bucket).map(|i| contents.bucket(i).len() as u64).sum()
}

/// Looks for an identifier starting with `[start, middle)`'s text, longer
/// than that prefix, within bucket `bucket_index`, searching outward from
/// `anchor` in `forward`'s direction. Returns the match's start position.
fn look_in_bucket(
    contents: &ContentStore,
    bucket_index: usize,
    byte_range: std::ops::Range<usize>,
    start: ContentsIterator<'_>,
    middle: ContentsIterator<'_>,
    ignored_positions: &[u64],
    forward: bool,
) -> Option<u64> {
    let prefix_len = middle.position - start.position;
    if prefix_len == 0 {
        return None;
    }
    let first = start.get();
    let bucket_base = bucket_start(contents, bucket_index);
    let bucket = contents.bucket(bucket_index);

    let candidates: Box<dyn Iterator<Item = usize>> = if forward {
        Box::new(byte_range)
    } else {
        Box::new(byte_range.rev())
    };

    for offset in candidates {
        if bucket[offset] != first {
            continue;
        }
        let candidate_pos = bucket_base + offset as u64;

        if candidate_pos > 0 {
            let before = contents.iterator_at(candidate_pos - 1).get();
            if is_identifier_byte(before) {
                continue;
            }
        }

        let after_pos = candidate_pos + prefix_len;
        if after_pos >= contents.len() {
            continue;
        }
        let after = contents.iterator_at(after_pos).get();
        if !is_identifier_byte(after) {
            continue;
        }

        let candidate_it = contents.iterator_at(candidate_pos);
        if !matches_region(start, middle.position, candidate_it, candidate_it.position + prefix_len) {
            continue;
        }

        let mut end_it = contents.iterator_at(after_pos);
        forward_through_identifier(&mut end_it);

        let overlaps_ignored = ignored_positions
            .iter()
            .any(|&p| candidate_pos < p && end_it.position > p);
        if overlaps_ignored {
            continue;
        }

        return Some(candidate_pos);
    }
    None
}

/// `start`/`middle` are the retreated-to-identifier-start and original
/// cursor positions; `prefix_len = middle - start`. A backward match's
/// relevant edge is where its own prefix-length match ends (closest it gets
/// to `start`); a forward match's relevant edge is its own start (closest it
/// gets to `middle`) — mirrors the original's asymmetric distance formula.
fn choose_closer(start: u64, middle: u64, prefix_len: u64, backward: Option<u64>, forward: Option<u64>) -> Option<u64> {
    match (backward, forward) {
        (Some(b), Some(f)) => {
            let backward_distance = start.saturating_sub(b + prefix_len);
            let forward_distance = f.saturating_sub(middle);
            Some(if backward_distance <= forward_distance { b } else { f })
        }
        (Some(b), None) => Some(b),
        (None, Some(f)) => Some(f),
        (None, None) => None,
    }
}

/// Search both directions from `it`'s bucket outward, up to `max_buckets`,
/// returning the nearer match (spec.md E5).
pub fn find_nearest_matching_identifier(
    it: ContentsIterator<'_>,
    middle: ContentsIterator<'_>,
    max_buckets: usize,
    ignored_positions: &[u64],
) -> Option<u64> {
    let contents = it.contents;
    if it.bucket < contents.bucket_count() {
        let bucket_len = contents.bucket(it.bucket).len();
        let backward = look_in_bucket(contents, it.bucket, 0..it.index, it, middle, ignored_positions, false);
        let forward = look_in_bucket(contents, it.bucket, (it.index + 1).min(bucket_len)..bucket_len, it, middle, ignored_positions, true);
        if let Some(pos) = choose_closer(it.position, middle.position, middle.position - it.position, backward, forward) {
            return Some(pos);
        }
    }

    for step in 1..=max_buckets {
        let backward = it.bucket.checked_sub(step).and_then(|b| {
            let len = contents.bucket(b).len();
            look_in_bucket(contents, b, 0..len, it, middle, ignored_positions, false)
        });
        let forward = (it.bucket + step < contents.bucket_count()).then(|| {
            let b = it.bucket + step;
            let len = contents.bucket(b).len();
            look_in_bucket(contents, b, 0..len, it, middle, ignored_positions, true)
        }).flatten();
        if let Some(pos) = choose_closer(it.position, middle.position, middle.position - it.position, backward, forward) {
            return Some(pos);
        }
    }
    None
}

/// Like [`find_nearest_matching_identifier`] but only searches backward.
pub fn find_nearest_matching_identifier_before(
    it: ContentsIterator<'_>,
    middle: ContentsIterator<'_>,
    max_buckets: usize,
    ignored_positions: &[u64],
) -> Option<u64> {
    let contents = it.contents;
    if it.bucket < contents.bucket_count() {
        if let Some(pos) = look_in_bucket(contents, it.bucket, 0..it.index, it, middle, ignored_positions, false) {
            return Some(pos);
        }
    }
    for step in 1..=max_buckets {
        let bucket = it.bucket.checked_sub(step)?;
        let len = contents.bucket(bucket).len();
        if let Some(pos) = look_in_bucket(contents, bucket, 0..len, it, middle, ignored_positions, false) {
            return Some(pos);
        }
    }
    None
}

/// Like [`find_nearest_matching_identifier`] but only searches forward.
pub fn find_nearest_matching_identifier_after(
    it: ContentsIterator<'_>,
    middle: ContentsIterator<'_>,
    max_buckets: usize,
    ignored_positions: &[u64],
) -> Option<u64> {
    let contents = it.contents;
    if it.bucket < contents.bucket_count() {
        let bucket_len = contents.bucket(it.bucket).len();
        if let Some(pos) = look_in_bucket(contents, it.bucket, (it.index + 1).min(bucket_len)..bucket_len, it, middle, ignored_positions, true) {
            return Some(pos);
        }
    }
    for step in 1..=max_buckets {
        if it.bucket + step >= contents.bucket_count() {
            break;
        }
        let b = it.bucket + step;
        let len = contents.bucket(b).len();
        if let Some(pos) = look_in_bucket(contents, b, 0..len, it, middle, ignored_positions, true) {
            return Some(pos);
        }
    }
    None
}

/// Tries backward first, then forward (used by
/// `copy_rest_of_line_from_nearest_matching_identifier`-style commands).
pub fn find_nearest_matching_identifier_before_after(
    it: ContentsIterator<'_>,
    middle: ContentsIterator<'_>,
    max_buckets: usize,
    ignored_positions: &[u64],
) -> Option<u64> {
    find_nearest_matching_identifier_before(it, middle, max_buckets, ignored_positions)
        .or_else(|| find_nearest_matching_identifier_after(it, middle, max_buckets, ignored_positions))
}

/// Whole-buffer scan (spec.md §4.9): every identifier beginning with `query`
/// and strictly longer than it, in buffer order, not yet deduplicated or
/// sorted (the completion engine does both).
pub fn all_identifiers_starting_with(contents: &ContentStore, query: &[u8]) -> Vec<String> {
    if query.is_empty() {
        return Vec::new();
    }
    let mut results = Vec::new();
    let first = query[0];
    let mut pos = 0u64;
    let len = contents.len();
    while pos < len {
        if contents.iterator_at(pos).get() != first {
            pos += 1;
            continue;
        }
        if pos > 0 && is_identifier_byte(contents.iterator_at(pos - 1).get()) {
            pos += 1;
            continue;
        }
        let after_pos = pos + query.len() as u64;
        if after_pos >= len || !is_identifier_byte(contents.iterator_at(after_pos).get()) {
            pos += 1;
            continue;
        }
        if !core_search::looking_at(contents.iterator_at(pos), query) {
            pos += 1;
            continue;
        }
        let mut end_it = contents.iterator_at(pos);
        forward_through_identifier(&mut end_it);
        results.push(contents.slice(pos, end_it.position).as_str().to_string());
        pos = end_it.position;
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_text::ContentStore;

    #[test]
    fn e5_nearest_identifier_completion() {
        // "foo foobar foobaz", cursor inside "foo" retreated to its start
        // (position 0), prefix "fo" (cursor originally at position 2).
        let store = ContentStore::from_bytes(b"foo foobar foobaz");
        let it = store.iterator_at(0);
        let middle = store.iterator_at(2);
        let pos = find_nearest_matching_identifier(it, middle, store.bucket_count(), &[]).unwrap();
        assert_eq!(pos, 4);
    }

    #[test]
    fn before_only_skips_forward_matches() {
        // "world" (the only "wo"-prefixed identifier) is after the cursor,
        // so a backward-only search must find nothing.
        let store = ContentStore::from_bytes(b"hello world");
        let it = store.iterator_at(6);
        let middle = store.iterator_at(8);
        assert!(find_nearest_matching_identifier_before(it, middle, store.bucket_count(), &[]).is_none());
    }

    #[test]
    fn ignored_positions_are_skipped() {
        let store = ContentStore::from_bytes(b"foo foobar");
        let it = store.iterator_at(0);
        let middle = store.iterator_at(2);
        let matched = find_nearest_matching_identifier_after(it, middle, store.bucket_count(), &[5]);
        assert!(matched.is_none());
    }

    #[test]
    fn all_identifiers_starting_with_collects_every_occurrence() {
        let store = ContentStore::from_bytes(b"foo foobar baz foobaz");
        let results = all_identifiers_starting_with(&store, b"fo");
        assert_eq!(results, vec!["foo".to_string(), "foobar".to_string(), "foobaz".to_string()]);
    }
}
