//! `Transaction` — accumulates [`Edit`]s and commits them atomically
//! (spec.md §4.2).

use core_text::ValueAllocator;
use tracing::trace;

use crate::buffer::Buffer;
use crate::commit::{Change, Commit};
use crate::edit::Edit;

/// A builder that accumulates edits against one buffer and applies them
/// together. Unlike the source's `init(buffer)` step, binding happens at
/// [`Transaction::commit`] rather than construction: nothing here needs a
/// live borrow of the buffer while edits are being pushed, so a
/// `Transaction` can be built up independently and handed a buffer only at
/// the moment it actually mutates one.
#[derive(Default)]
pub struct Transaction {
    allocator: ValueAllocator,
    edits: Vec<Edit>,
}

impl Transaction {
    pub fn new() -> Self {
        Self { allocator: ValueAllocator::new(), edits: Vec::new() }
    }

    /// The allocator edit payloads should be duplicated through via
    /// `SSOStr::as_duplicate`.
    pub fn value_allocator(&self) -> &ValueAllocator {
        &self.allocator
    }

    /// Append an edit. The caller computes `position` in the *final*
    /// coordinate space — edits are applied in list order, so a later edit
    /// already sees the effect of an earlier one in this same transaction.
    pub fn push(&mut self, edit: Edit) {
        self.edits.push(edit);
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Commit with no tag.
    pub fn commit(self, buffer: &mut Buffer) {
        self.commit_tagged(buffer, None);
    }

    /// Apply the edits to `buffer`'s content store, append the resulting
    /// commit (merging into the previous commit if it carries the same
    /// tag), rebase the buffer's own cursor list, and log a [`Change`].
    pub fn commit_tagged(self, buffer: &mut Buffer, tag: Option<&str>) {
        if self.edits.is_empty() {
            return;
        }

        for edit in &self.edits {
            if edit.flags.is_insert() {
                buffer.contents.insert(edit.position, edit.value.as_bytes());
            } else {
                buffer.contents.remove(edit.position, edit.len());
            }
        }

        buffer.cursors.rebase_commit(&self.edits);
        buffer.cursors.clamp_to_len(buffer.contents.len());

        let tag = tag.map(str::to_owned);
        let at_tip = buffer.commit_index == buffer.commits.len();
        let merged = match (&tag, buffer.commits.last_mut()) {
            (Some(t), Some(last)) if at_tip && last.tag.as_deref() == Some(t.as_str()) => {
                last.edits.extend(self.edits.iter().cloned());
                true
            }
            _ => false,
        };

        if !merged {
            buffer.commits.truncate(buffer.commit_index);
            buffer.commits.push(Commit::new(self.edits.clone(), tag));
            buffer.commit_index = buffer.commits.len();
            buffer.change_counter += 1;
        }

        buffer
            .changes
            .push(Change { commit: Commit::new(self.edits, None), is_redo: false });

        trace!(
            target: "state.transaction",
            merged,
            commit_index = buffer.commit_index,
            "commit"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::Mode;
    use core_text::SSOStr;

    #[test]
    fn e1_insert_remove_undo() {
        let mut buffer = Buffer::from_bytes("t", b"abc", Mode::plaintext());
        buffer.cursors.push(crate::cursor::Cursor::at(3));
        let mut txn = Transaction::new();
        txn.push(Edit::insert(3, SSOStr::from_static(b"de"), false));
        txn.commit(&mut buffer);
        assert_eq!(buffer.contents.slice(0, buffer.contents.len()).as_str(), "abcde");
        assert!(buffer.undo());
        assert_eq!(buffer.contents.slice(0, buffer.contents.len()).as_str(), "abc");
    }

    #[test]
    fn e2_merge_by_tag() {
        let mut buffer = Buffer::from_bytes("t", b"", Mode::plaintext());
        for (i, byte) in [b'h', b'i', b'!'].into_iter().enumerate() {
            let mut txn = Transaction::new();
            txn.push(Edit::insert(i as u64, SSOStr::from_char(byte as char), false));
            txn.commit_tagged(&mut buffer, Some("self-insert"));
        }
        assert_eq!(buffer.commits.len(), 1);
        assert_eq!(buffer.contents.slice(0, buffer.contents.len()).as_str(), "hi!");
        assert!(buffer.undo());
        assert_eq!(buffer.contents.len(), 0);
    }
}
