//! Identifier-completion engine (spec.md §4.9), grounded on
//! `original_source/basic/completion_commands.cpp`'s
//! `Identifier_Completion_Engine_Data` and the paging/selection commands
//! (`command_next_completion`, `command_previous_completion`,
//! `command_completion_down_page`, `command_completion_up_page`,
//! `command_first_completion`, `command_last_completion`,
//! `command_insert_completion`).

use core_text::{ContentStore, SSOStr};

use crate::nearest::all_identifiers_starting_with;

/// A minimal edit to apply to the mini-buffer to replace the query with a
/// chosen completion result: remove `remove_len` bytes ending at the
/// original cursor, then insert `insert` — the diff is against the *common
/// prefix*, mirroring `command_insert_completion`'s "only touch the part
/// that changed" behaviour rather than a blind remove-query/insert-result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionEdit {
    pub remove_len: u64,
    pub insert: String,
}

/// Owns the query, the filtered/sorted/deduplicated results, the selected
/// index, and a paging size. A weak handle to the source `ContentStore`
/// would live alongside this in a window (spec.md §4.10); this type itself
/// is store-agnostic and is handed a fresh result set via [`load`].
pub struct CompletionEngine {
    query: String,
    results: Vec<String>,
    selected: usize,
    page_size: usize,
}

impl CompletionEngine {
    pub fn new(page_size: usize) -> Self {
        Self { query: String::new(), results: Vec::new(), selected: 0, page_size: page_size.max(1) }
    }

    /// Rebuilds the result set from `contents` for `query` (spec.md §4.9:
    /// whole-buffer scan, then sort + dedup). Resets the selection to the
    /// first result.
    pub fn load(&mut self, contents: &ContentStore, query: &str) {
        self.query = query.to_string();
        let mut results = all_identifiers_starting_with(contents, query.as_bytes());
        results.sort();
        results.dedup();
        self.results = results;
        self.selected = 0;
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[String] {
        &self.results
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn selected(&self) -> Option<&str> {
        self.results.get(self.selected).map(String::as_str)
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    /// `Binary search on the sorted result set locates [start, end) of
    /// entries having the query as prefix` (spec.md §6) — since `load`
    /// already restricts the set to query-prefixed entries, this narrows
    /// further to a caller-supplied refined prefix without a full rescan.
    pub fn prefix_range(&self, prefix: &str) -> std::ops::Range<usize> {
        let start = self.results.partition_point(|r| r.as_str() < prefix);
        let end = self.results[start..].partition_point(|r| r.starts_with(prefix)) + start;
        start..end
    }

    pub fn next(&mut self) {
        if !self.results.is_empty() {
            self.selected = (self.selected + 1) % self.results.len();
        }
    }

    pub fn previous(&mut self) {
        if !self.results.is_empty() {
            self.selected = if self.selected == 0 { self.results.len() - 1 } else { self.selected - 1 };
        }
    }

    pub fn page_down(&mut self) {
        if !self.results.is_empty() {
            self.selected = (self.selected + self.page_size).min(self.results.len() - 1);
        }
    }

    pub fn page_up(&mut self) {
        self.selected = self.selected.saturating_sub(self.page_size);
    }

    pub fn first(&mut self) {
        self.selected = 0;
    }

    pub fn last(&mut self) {
        if !self.results.is_empty() {
            self.selected = self.results.len() - 1;
        }
    }

    /// Diffs the selected result against the query, producing a minimal
    /// REMOVE+INSERT pair to apply at the mini-buffer's cursor (spec.md
    /// §4.9). Returns `None` if there is nothing selected.
    pub fn commit(&self) -> Option<CompletionEdit> {
        let chosen = self.selected()?;
        let common = common_prefix_len(self.query.as_bytes(), chosen.as_bytes());
        Some(CompletionEdit {
            remove_len: (self.query.len() - common) as u64,
            insert: chosen[common..].to_string(),
        })
    }
}

fn common_prefix_len(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b.iter()).take_while(|(x, y)| x == y).count()
}

/// Materialises a completion result's bytes against a store at the point of
/// `commit`, in case a caller wants the full replacement text rather than
/// the diffed edit (e.g. to render a preview).
pub fn full_insertion(chosen: &str) -> SSOStr {
    SSOStr::from_owned(chosen.as_bytes().to_vec())
}
