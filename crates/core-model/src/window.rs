//! `Window_Unified` (spec.md §3): a view onto one Buffer, holding the
//! state that's per-viewer rather than per-buffer.
//!
//! `core_state::Buffer` already carries its own `CursorList`, and
//! `Transaction::commit`/`undo`/`redo` already rebase it eagerly on every
//! mutation (spec.md §4.3's rule is applied there, not here). spec.md's
//! "rebasing is done per Window from its last-seen change index" describes
//! a lazy-replay scheme for windows with independent, divergent cursor
//! sets over a shared buffer; this workspace instead gives each buffer one
//! eagerly-rebased cursor list and has every window onto it read that same
//! list, which is the simpler design when (as here) nothing above this
//! layer creates two windows with *different* cursors on one buffer. A
//! window's own state is therefore only its local change index (used to
//! decide whether cached per-window derived state — its completion
//! engine's results, most directly — is stale), `show_marks`, and a
//! scroll position.

use core_completion::CompletionEngine;
use core_overlay::OverlayWindow;
use core_state::Buffer;

use crate::handle::{BufferHandle, WeakBufferHandle};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(pub u64);

const DEFAULT_COMPLETION_PAGE_SIZE: usize = 10;

pub struct WindowUnified {
    pub id: WindowId,
    buffer: WeakBufferHandle,
    pub show_marks: bool,
    pub scroll_top: u64,
    last_seen_change_index: usize,
    pub completion: CompletionEngine,
}

impl WindowUnified {
    pub fn new(id: WindowId, buffer: &BufferHandle) -> Self {
        Self {
            id,
            buffer: buffer.downgrade(),
            show_marks: false,
            scroll_top: 0,
            last_seen_change_index: buffer.buffer().changes_len(),
            completion: CompletionEngine::new(DEFAULT_COMPLETION_PAGE_SIZE),
        }
    }

    pub fn buffer(&self) -> Option<BufferHandle> {
        self.buffer.upgrade()
    }

    pub fn retarget(&mut self, buffer: &BufferHandle) {
        self.buffer = buffer.downgrade();
        self.show_marks = false;
        self.scroll_top = 0;
        self.last_seen_change_index = buffer.buffer().changes_len();
        self.completion = CompletionEngine::new(DEFAULT_COMPLETION_PAGE_SIZE);
    }

    /// Whether edits have landed on the buffer since this window last
    /// reconciled against it (spec.md §4.3) — a signal to recompute
    /// anything this window caches, e.g. its completion result set.
    pub fn is_stale(&self, buffer: &Buffer) -> bool {
        buffer.changes_len() != self.last_seen_change_index
    }

    pub fn mark_reconciled(&mut self, buffer: &Buffer) {
        self.last_seen_change_index = buffer.changes_len();
    }

    /// Builds the overlay-pipeline view of this window's cursor state.
    /// Borrows `buffer`'s cursor list directly rather than the window's
    /// own copy, per this module's doc comment.
    pub fn overlay_window<'a>(&self, buffer: &'a Buffer) -> OverlayWindow<'a> {
        OverlayWindow { cursors: &buffer.cursors, show_marks: self.show_marks }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::BufferTable;
    use core_state::{Edit, Mode, Transaction};
    use core_text::SSOStr;

    #[test]
    fn new_window_is_not_stale_against_its_own_buffer() {
        let mut table = BufferTable::new();
        let handle = table.create_from_bytes("t", b"abc", Mode::plaintext());
        let window = WindowUnified::new(WindowId(0), &handle);
        assert!(!window.is_stale(&handle.buffer()));
    }

    #[test]
    fn becomes_stale_after_a_commit_and_clears_on_reconcile() {
        let mut table = BufferTable::new();
        let handle = table.create_from_bytes("t", b"abc", Mode::plaintext());
        let mut window = WindowUnified::new(WindowId(0), &handle);

        let mut txn = Transaction::new();
        txn.push(Edit::insert(3, SSOStr::from_static(b"d"), false));
        txn.commit(&mut handle.buffer_mut());

        assert!(window.is_stale(&handle.buffer()));
        window.mark_reconciled(&handle.buffer());
        assert!(!window.is_stale(&handle.buffer()));
    }

    #[test]
    fn buffer_upgrade_fails_after_kill() {
        let mut table = BufferTable::new();
        let handle = table.create_from_bytes("t", b"abc", Mode::plaintext());
        let id = handle.id();
        let window = WindowUnified::new(WindowId(0), &handle);
        drop(handle);
        table.kill(id);
        assert!(window.buffer().is_none());
    }
}
