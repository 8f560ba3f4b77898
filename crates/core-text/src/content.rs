//! Bucketed byte-sequence content store.
//!
//! A buffer's bytes live in an ordered sequence of fixed-capacity buckets
//! (`~4 KiB` each, matching the "typical" capacity spec.md §3 leaves to the
//! implementation). The bucket boundary is part of the public contract: call
//! sites elsewhere (search, tokenizers) reach into
//! `iterator.contents.bucket(iterator.bucket)` to process one bucket's bytes
//! at a time, so buckets are never merged smaller than necessary but are also
//! never silently coalesced across a boundary a caller may be relying on.

use crate::sso::SSOStr;

/// Target capacity for a bucket. Buckets may temporarily exceed this by a
/// single insertion before a split is performed, and may be shorter (never
/// longer, after a split) following edits.
pub const BUCKET_CAPACITY: usize = 4096;

/// A bucketed, append/insert/remove-friendly byte sequence.
#[derive(Clone, Default)]
pub struct ContentStore {
    buckets: Vec<Vec<u8>>,
}

impl ContentStore {
    pub fn new() -> Self {
        Self { buckets: Vec::new() }
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut store = Self::new();
        store.append(bytes);
        store
    }

    /// Number of buckets currently allocated (part of the public bucket-walk
    /// contract; search and tokenizers use this to bound outward walks).
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn bucket(&self, index: usize) -> &[u8] {
        &self.buckets[index]
    }

    pub fn len(&self) -> u64 {
        self.buckets.iter().map(|b| b.len() as u64).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(|b| b.is_empty())
    }

    /// Iterator positioned at the start of the buffer.
    pub fn start(&self) -> ContentsIterator<'_> {
        ContentsIterator {
            contents: self,
            bucket: 0,
            index: 0,
            position: 0,
        }
    }

    /// Iterator positioned at end-of-buffer (canonical eob form:
    /// `bucket == bucket_count()`, `index == 0`).
    pub fn end(&self) -> ContentsIterator<'_> {
        ContentsIterator {
            contents: self,
            bucket: self.buckets.len(),
            index: 0,
            position: self.len(),
        }
    }

    /// Locate `position` by scanning bucket lengths from the start.
    /// O(bucket_count) worst case; callers that already hold a nearby
    /// iterator should use [`ContentsIterator::go_to`] instead, which is
    /// O(1) amortised.
    pub fn iterator_at(&self, position: u64) -> ContentsIterator<'_> {
        let len = self.len();
        debug_assert!(position <= len, "iterator_at: position past end of contents");
        let mut remaining = position;
        for (bucket, bytes) in self.buckets.iter().enumerate() {
            let blen = bytes.len() as u64;
            if remaining < blen {
                return ContentsIterator {
                    contents: self,
                    bucket,
                    index: remaining as usize,
                    position,
                };
            }
            remaining -= blen;
        }
        // remaining == 0 here: position landed exactly on a bucket boundary,
        // which (since position <= len) means position == len, i.e. eob.
        ContentsIterator {
            contents: self,
            bucket: self.buckets.len(),
            index: 0,
            position,
        }
    }

    /// Materialise the byte range `[start, end)` into an owned [`SSOStr`].
    pub fn slice(&self, start: u64, end: u64) -> SSOStr {
        SSOStr::from_owned(self.slice_bytes(start, end))
    }

    /// Append the byte range `[start, end)` onto an existing `String`,
    /// avoiding an intermediate allocation at call sites that already own a
    /// reusable buffer.
    pub fn slice_into(&self, start: u64, end: u64, out: &mut String) {
        let bytes = self.slice_bytes(start, end);
        out.push_str(&String::from_utf8_lossy(&bytes));
    }

    fn slice_bytes(&self, start: u64, end: u64) -> Vec<u8> {
        debug_assert!(start <= end, "slice: start > end");
        debug_assert!(end <= self.len(), "slice: end past contents length");
        if start >= end {
            return Vec::new();
        }
        let mut out = Vec::with_capacity((end - start) as usize);
        let mut it = self.iterator_at(start);
        let mut remaining = end - start;
        while remaining > 0 {
            let bucket = &self.buckets[it.bucket];
            let avail = (bucket.len() - it.index) as u64;
            let take = avail.min(remaining);
            out.extend_from_slice(&bucket[it.index..it.index + take as usize]);
            remaining -= take;
            it.advance(take);
        }
        out
    }

    pub fn append(&mut self, bytes: &[u8]) {
        let len = self.len();
        self.insert(len, bytes);
    }

    /// Insert `bytes` at `position`, splitting the containing bucket into
    /// `BUCKET_CAPACITY`-sized pieces if it grows too large.
    pub fn insert(&mut self, position: u64, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        let len = self.len();
        debug_assert!(position <= len, "insert: position past end of contents");

        if self.buckets.is_empty() {
            self.buckets.push(Vec::new());
        }

        let (bucket, index) = self.locate_for_insert(position);
        self.buckets[bucket].splice(index..index, bytes.iter().copied());
        self.rebalance_from(bucket);
    }

    /// Remove `count` bytes starting at `position`.
    pub fn remove(&mut self, position: u64, count: u64) {
        if count == 0 {
            return;
        }
        let len = self.len();
        debug_assert!(position + count <= len, "remove: range past end of contents");

        let mut remaining = count;
        let (mut bucket, mut index) = self.locate_for_insert(position);
        while remaining > 0 {
            let blen = self.buckets[bucket].len() as u64;
            let avail = blen - index as u64;
            let take = avail.min(remaining);
            self.buckets[bucket].drain(index..index + take as usize);
            remaining -= take;
            if self.buckets[bucket].is_empty() {
                self.buckets.remove(bucket);
                index = 0;
                // `bucket` now refers to what used to be the next bucket.
            } else {
                bucket += 1;
                index = 0;
            }
        }
        self.prune_empty();
    }

    fn prune_empty(&mut self) {
        self.buckets.retain(|b| !b.is_empty());
    }

    /// Like `iterator_at` but returns raw `(bucket, index)`, inserting an
    /// initial empty bucket lazily handled by the caller.
    fn locate_for_insert(&self, position: u64) -> (usize, usize) {
        let mut remaining = position;
        for (bucket, bytes) in self.buckets.iter().enumerate() {
            let blen = bytes.len() as u64;
            if remaining <= blen {
                return (bucket, remaining as usize);
            }
            remaining -= blen;
        }
        let last = self.buckets.len().saturating_sub(1);
        (last, self.buckets.get(last).map_or(0, |b| b.len()))
    }

    fn rebalance_from(&mut self, bucket: usize) {
        while self.buckets[bucket].len() > BUCKET_CAPACITY {
            let overflow = self.buckets[bucket].split_off(BUCKET_CAPACITY);
            self.buckets.insert(bucket + 1, overflow);
        }
    }
}

/// A read cursor into a [`ContentStore`]. Borrows the store, so the Rust
/// borrow checker enforces spec.md §3's "all mutating operations invalidate
/// every outstanding iterator" invariant statically: a `ContentsIterator`
/// cannot outlive, or coexist with, a `&mut ContentStore`.
#[derive(Clone, Copy)]
pub struct ContentsIterator<'a> {
    pub contents: &'a ContentStore,
    pub bucket: usize,
    pub index: usize,
    pub position: u64,
}

impl<'a> ContentsIterator<'a> {
    pub fn at_eob(&self) -> bool {
        self.bucket == self.contents.buckets.len()
    }

    pub fn at_bob(&self) -> bool {
        self.position == 0
    }

    /// Byte at the current position. Undefined (panics in debug) at eob.
    pub fn get(&self) -> u8 {
        debug_assert!(!self.at_eob(), "get() at end-of-buffer");
        self.contents.buckets[self.bucket][self.index]
    }

    pub fn advance_one(&mut self) {
        self.advance(1);
    }

    pub fn retreat_one(&mut self) {
        self.retreat(1);
    }

    /// Advance by `n` bytes without materialising the skipped bytes.
    pub fn advance(&mut self, mut n: u64) {
        while n > 0 {
            if self.at_eob() {
                debug_assert_eq!(n, 0, "advance past end-of-buffer");
                return;
            }
            let blen = self.contents.buckets[self.bucket].len() as u64;
            let remaining_in_bucket = blen - self.index as u64;
            if n < remaining_in_bucket {
                self.index += n as usize;
                self.position += n;
                return;
            }
            self.position += remaining_in_bucket;
            n -= remaining_in_bucket;
            self.bucket += 1;
            self.index = 0;
        }
    }

    /// Retreat by `n` bytes without materialising the skipped bytes.
    pub fn retreat(&mut self, mut n: u64) {
        while n > 0 {
            if self.index as u64 >= n {
                self.index -= n as usize;
                self.position -= n;
                return;
            }
            n -= self.index as u64;
            self.position -= self.index as u64;
            debug_assert!(self.bucket > 0, "retreat past start-of-buffer");
            self.bucket -= 1;
            self.index = self.contents.buckets[self.bucket].len();
        }
    }

    pub fn advance_to(&mut self, position: u64) {
        debug_assert!(position >= self.position);
        self.advance(position - self.position);
    }

    pub fn retreat_to(&mut self, position: u64) {
        debug_assert!(position <= self.position);
        self.retreat(self.position - position);
    }

    /// Reposition to an absolute position, walking forward or backward from
    /// the current position (O(1) amortised for nearby targets, unlike a
    /// fresh [`ContentStore::iterator_at`] call).
    pub fn go_to(&mut self, position: u64) {
        if position >= self.position {
            self.advance(position - self.position);
        } else {
            self.retreat(self.position - position);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_store_is_eob_at_start() {
        let store = ContentStore::new();
        let it = store.start();
        assert!(it.at_eob());
        assert!(it.at_bob());
    }

    #[test]
    fn insert_and_slice_roundtrip() {
        let mut store = ContentStore::new();
        store.insert(0, b"hello world");
        assert_eq!(store.len(), 11);
        assert_eq!(store.slice(0, 11).as_bytes(), b"hello world");
        assert_eq!(store.slice(6, 11).as_bytes(), b"world");
    }

    #[test]
    fn insert_splits_oversized_bucket() {
        let mut store = ContentStore::new();
        let chunk = vec![b'a'; BUCKET_CAPACITY + 10];
        store.insert(0, &chunk);
        assert!(store.bucket_count() >= 2);
        assert_eq!(store.len(), chunk.len() as u64);
        assert_eq!(store.slice(0, store.len()).as_bytes(), chunk.as_slice());
    }

    #[test]
    fn remove_shrinks_and_prunes_buckets() {
        let mut store = ContentStore::new();
        store.insert(0, b"abcdef");
        store.remove(2, 2); // remove "cd"
        assert_eq!(store.slice(0, store.len()).as_bytes(), b"abef");
        store.remove(0, 4);
        assert_eq!(store.len(), 0);
        assert_eq!(store.bucket_count(), 0);
    }

    #[test]
    fn remove_spanning_multiple_buckets() {
        let mut store = ContentStore::new();
        let a = vec![b'a'; BUCKET_CAPACITY];
        let b = vec![b'b'; BUCKET_CAPACITY];
        store.insert(0, &a);
        store.insert(store.len(), &b);
        assert_eq!(store.bucket_count(), 2);
        store.remove(BUCKET_CAPACITY as u64 - 5, 10);
        assert_eq!(store.len(), (2 * BUCKET_CAPACITY - 10) as u64);
    }

    #[test]
    fn iterator_advance_retreat_is_inverse() {
        let mut store = ContentStore::new();
        store.insert(0, b"0123456789");
        let mut it = store.iterator_at(3);
        let (b0, i0, p0) = (it.bucket, it.index, it.position);
        it.advance(4);
        it.retreat(4);
        assert_eq!((it.bucket, it.index, it.position), (b0, i0, p0));
    }

    #[test]
    fn iterator_position_matches_cumulative_bucket_lengths() {
        let mut store = ContentStore::new();
        let payload = vec![b'x'; BUCKET_CAPACITY * 3 + 17];
        store.insert(0, &payload);
        let mut it = store.start();
        while !it.at_eob() {
            let expected: u64 = store.buckets[..it.bucket].iter().map(|b| b.len() as u64).sum::<u64>()
                + it.index as u64;
            assert_eq!(it.position, expected);
            it.advance(257);
        }
    }

    #[test]
    fn go_to_walks_forward_and_backward() {
        let mut store = ContentStore::new();
        store.insert(0, b"the quick brown fox");
        let mut it = store.iterator_at(4);
        it.go_to(10);
        assert_eq!(it.position, 10);
        assert_eq!(it.get(), b'b');
        it.go_to(0);
        assert_eq!(it.position, 0);
        assert_eq!(it.get(), b't');
    }

    #[test]
    fn slice_into_appends_to_existing_buffer() {
        let mut store = ContentStore::new();
        store.insert(0, b"hello world");
        let mut out = String::from("prefix:");
        store.slice_into(0, 5, &mut out);
        assert_eq!(out, "prefix:hello");
    }

    proptest::proptest! {
        #[test]
        fn insert_changes_len_by_exact_amount(
            initial in proptest::collection::vec(0u8..=255, 0..200),
            pos_frac in 0.0f64..1.0,
            insertion in proptest::collection::vec(0u8..=255, 0..200),
        ) {
            let mut store = ContentStore::from_bytes(&initial);
            let len_before = store.len();
            let pos = ((len_before as f64) * pos_frac) as u64;
            store.insert(pos, &insertion);
            proptest::prop_assert_eq!(store.len(), len_before + insertion.len() as u64);
        }
    }
}
