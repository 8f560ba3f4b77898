//! `Buffer` — owns the Content Store, commit/change log, cursor list, and
//! Mode for one editable file or scratch buffer (spec.md §3, §4.4).

use core_text::ContentStore;
use tracing::trace;

use crate::commit::Change;
use crate::cursor::{Cursor, CursorList};
use crate::mode::Mode;

/// Opaque per-buffer identifier. Assigned by the handle table
/// (`core-model`) at creation time, not a hidden global counter — spec.md
/// §9's "Global state" note prefers an explicit registry over
/// runtime-accumulated globals.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(pub u64);

pub struct Buffer {
    pub contents: ContentStore,
    pub(crate) commits: Vec<crate::commit::Commit>,
    pub(crate) commit_index: usize,
    pub(crate) changes: Vec<Change>,
    pub(crate) change_counter: u64,
    saved_commit_index: usize,
    pub cursors: CursorList,
    pub mode: Mode,
    pub directory: Option<String>,
    pub name: String,
    pub id: BufferId,
}

impl Buffer {
    pub fn new(id: BufferId, name: impl Into<String>, mode: Mode) -> Self {
        Self {
            contents: ContentStore::new(),
            commits: Vec::new(),
            commit_index: 0,
            changes: Vec::new(),
            change_counter: 0,
            saved_commit_index: 0,
            cursors: CursorList::new(),
            mode,
            directory: None,
            name: name.into(),
            id,
        }
    }

    /// Convenience constructor for tests and scratch buffers: builds with
    /// `BufferId(0)` and seeds the content store from `bytes`.
    pub fn from_bytes(name: impl Into<String>, bytes: &[u8], mode: Mode) -> Self {
        let mut buffer = Self::new(BufferId(0), name, mode);
        buffer.contents = ContentStore::from_bytes(bytes);
        buffer
    }

    pub fn change_counter(&self) -> u64 {
        self.change_counter
    }

    pub fn changes_len(&self) -> usize {
        self.changes.len()
    }

    /// The change log from `index` onward. Used by `core-syntax`'s Token
    /// Cache to find the earliest position touched since its last
    /// reconciliation, without needing write access to the log itself.
    pub fn changes_from(&self, index: usize) -> &[Change] {
        &self.changes[index.min(self.changes.len())..]
    }

    /// True iff the buffer has no unsaved edits relative to the last save
    /// point (spec.md §3).
    pub fn is_unchanged(&self) -> bool {
        self.commit_index == self.saved_commit_index
    }

    pub fn mark_saved(&mut self) {
        self.saved_commit_index = self.commit_index;
    }

    /// Undo the most recently applied commit (spec.md §4.4). Returns
    /// `false` (no-op) if there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        if self.commit_index == 0 {
            return false;
        }
        let commit = self.commits[self.commit_index - 1].clone();
        for edit in commit.edits.iter().rev() {
            let inverse = edit.inverted();
            if inverse.flags.is_insert() {
                self.contents.insert(inverse.position, inverse.value.as_bytes());
            } else {
                self.contents.remove(inverse.position, inverse.len());
            }
        }
        self.commit_index -= 1;
        self.changes.push(Change { commit, is_redo: false });
        self.cursors.clamp_to_len(self.contents.len());
        trace!(target: "state.undo", commit_index = self.commit_index, "undo");
        true
    }

    /// Redo the most recently undone commit (spec.md §4.4). Returns
    /// `false` (no-op) if there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        if self.commit_index == self.commits.len() {
            return false;
        }
        let commit = self.commits[self.commit_index].clone();
        for edit in &commit.edits {
            if edit.flags.is_insert() {
                self.contents.insert(edit.position, edit.value.as_bytes());
            } else {
                self.contents.remove(edit.position, edit.len());
            }
        }
        self.changes.push(Change { commit, is_redo: true });
        self.commit_index += 1;
        self.cursors.clamp_to_len(self.contents.len());
        trace!(target: "state.undo", commit_index = self.commit_index, "redo");
        true
    }

    /// Materialise one cursor per edit in the last [`Change`], positioned
    /// at the edit's insertion end (or the removal's start). Reconstructed
    /// purely from the Change's own edit offsets, not by re-reading the
    /// Content Store (spec.md §4.4).
    ///
    /// This is the forward-looking counterpart of
    /// [`Buffer::cursors_from_pending_redo`] — see that method's docs for
    /// why the two are kept separate.
    pub fn cursors_from_last_change(&self) -> Option<Vec<Cursor>> {
        let change = self.changes.last()?;
        Some(cursors_from_edits(&change.commit.edits))
    }

    /// Materialise one cursor per edit in the commit that a subsequent
    /// `redo()` would apply (`commits[commit_index]`), without performing
    /// the redo.
    ///
    /// The source's `command_create_cursors_redo_nono` reads
    /// `commits[commit_index - 1]` right after checking
    /// `commit_index + 1 >= commits.len()`, which reads like the
    /// *just-undone* commit, not the *about-to-be-redone* one — see
    /// spec.md §9's open question. This crate resolves the ambiguity by
    /// exposing both intents as separate, unambiguously named methods
    /// instead of reproducing the original's single overloaded command:
    /// callers that want cursors from history use
    /// [`Buffer::cursors_from_last_change`]; callers that want cursors from
    /// the pending redo use this method.
    pub fn cursors_from_pending_redo(&self) -> Option<Vec<Cursor>> {
        let commit = self.commits.get(self.commit_index)?;
        Some(cursors_from_edits(&commit.edits))
    }
}

fn cursors_from_edits(edits: &[crate::edit::Edit]) -> Vec<Cursor> {
    edits
        .iter()
        .map(|edit| {
            let position = if edit.flags.is_insert() {
                edit.position + edit.len()
            } else {
                edit.position
            };
            Cursor::at(position)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edit::Edit;
    use crate::transaction::Transaction;
    use core_text::SSOStr;

    #[test]
    fn undo_then_redo_restores_contents() {
        let mut buffer = Buffer::from_bytes("t", b"abc", Mode::plaintext());
        let mut txn = Transaction::new();
        txn.push(Edit::insert(3, SSOStr::from_static(b"de"), false));
        txn.commit(&mut buffer);
        assert!(buffer.undo());
        assert_eq!(buffer.contents.slice(0, buffer.contents.len()).as_str(), "abc");
        assert!(buffer.redo());
        assert_eq!(buffer.contents.slice(0, buffer.contents.len()).as_str(), "abcde");
    }

    #[test]
    fn undo_on_fresh_buffer_is_noop() {
        let mut buffer = Buffer::from_bytes("t", b"abc", Mode::plaintext());
        assert!(!buffer.undo());
    }

    #[test]
    fn redo_with_no_pending_redo_is_noop() {
        let mut buffer = Buffer::from_bytes("t", b"abc", Mode::plaintext());
        assert!(!buffer.redo());
    }

    #[test]
    fn is_unchanged_tracks_saved_commit_index() {
        let mut buffer = Buffer::from_bytes("t", b"abc", Mode::plaintext());
        assert!(buffer.is_unchanged());
        let mut txn = Transaction::new();
        txn.push(Edit::insert(3, SSOStr::from_static(b"d"), false));
        txn.commit(&mut buffer);
        assert!(!buffer.is_unchanged());
        buffer.mark_saved();
        assert!(buffer.is_unchanged());
        buffer.undo();
        assert!(!buffer.is_unchanged());
    }

    #[test]
    fn cursors_from_last_change_uses_edit_offsets() {
        let mut buffer = Buffer::from_bytes("t", b"abc", Mode::plaintext());
        let mut txn = Transaction::new();
        txn.push(Edit::insert(3, SSOStr::from_static(b"de"), false));
        txn.commit(&mut buffer);
        let cursors = buffer.cursors_from_last_change().unwrap();
        assert_eq!(cursors.len(), 1);
        assert_eq!(cursors[0].point, 5);
    }

    #[test]
    fn cursors_from_pending_redo_reads_commit_index() {
        let mut buffer = Buffer::from_bytes("t", b"abc", Mode::plaintext());
        let mut txn = Transaction::new();
        txn.push(Edit::insert(3, SSOStr::from_static(b"de"), false));
        txn.commit(&mut buffer);
        buffer.undo();
        let cursors = buffer.cursors_from_pending_redo().unwrap();
        assert_eq!(cursors.len(), 1);
        assert_eq!(cursors[0].point, 5);
        assert!(buffer.cursors_from_last_change().is_some());
    }
}
