//! `Commit` and `Change` — the buffer's undo/redo log entries (spec.md §3).

use crate::edit::Edit;

/// An ordered sequence of [`Edit`]s produced by one [`crate::Transaction`],
/// plus an optional tag identifying the originating command. Commits with
/// the same tag as the most recently pushed commit merge into one undo
/// step (spec.md §4.2).
#[derive(Clone, Debug, Default)]
pub struct Commit {
    pub edits: Vec<Edit>,
    pub tag: Option<String>,
}

impl Commit {
    pub fn new(edits: Vec<Edit>, tag: Option<String>) -> Self {
        Self { edits, tag }
    }

    /// Net change in content length this commit applies, signed.
    pub fn len_delta(&self) -> i64 {
        self.edits
            .iter()
            .map(|e| {
                let len = e.len() as i64;
                if e.flags.is_insert() { len } else { -len }
            })
            .sum()
    }
}

/// One entry in a buffer's `changes[]` history log: a forward or reverse
/// application of a [`Commit`] (spec.md §3).
#[derive(Clone, Debug)]
pub struct Change {
    pub commit: Commit,
    pub is_redo: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edit::Edit;
    use core_text::SSOStr;

    #[test]
    fn len_delta_sums_signed_lengths() {
        let commit = Commit::new(
            vec![
                Edit::insert(0, SSOStr::from_static(b"hi"), false),
                Edit::remove(0, SSOStr::from_static(b"h")),
            ],
            None,
        );
        assert_eq!(commit.len_delta(), 1);
    }
}
