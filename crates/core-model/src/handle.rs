//! Buffer handle table (spec.md §9's design note: "arena + integer ID plus
//! a reference-counted handle table; weak upgrades fail cleanly"), grounded
//! structurally on the teacher's `core-model::ViewManager`
//! (owns-a-collection-behind-an-index-handle shape), generalized from "one
//! view" to "N buffers, N windows, weak buffer references."
//!
//! A buffer's Token Cache can't live on `core_state::Buffer` itself —
//! `core-syntax` depends on `core-state`, so the reverse edge would be
//! circular — so the table keeps buffer and cache side by side in one
//! entry and treats them as a unit for every operation spec.md describes
//! as buffer-owning its Token Cache (in particular, mode swap resets it).

use std::cell::{Ref, RefCell, RefMut};
use std::rc::{Rc, Weak};

use core_state::{Buffer, BufferId, Mode};
use core_syntax::TokenCache;
use core_text::ContentStore;

struct BufferEntry {
    buffer: RefCell<Buffer>,
    token_cache: RefCell<TokenCache>,
}

/// A strong, reference-counted reference to a live buffer. Only
/// [`BufferTable`] constructs one from scratch; everyone else either holds
/// one handed to them or upgrades a [`WeakBufferHandle`].
#[derive(Clone)]
pub struct BufferHandle(Rc<BufferEntry>);

/// A window's reference to a buffer (spec.md §3: "Windows hold weak
/// references to Buffers via a lookup table"). Upgrading after the buffer
/// has been killed returns `None`, not an error (spec.md §7).
#[derive(Clone)]
pub struct WeakBufferHandle(Weak<BufferEntry>);

impl BufferHandle {
    fn new(buffer: Buffer) -> Self {
        Self(Rc::new(BufferEntry { buffer: RefCell::new(buffer), token_cache: RefCell::new(TokenCache::new()) }))
    }

    pub fn id(&self) -> BufferId {
        self.0.buffer.borrow().id
    }

    pub fn buffer(&self) -> Ref<'_, Buffer> {
        self.0.buffer.borrow()
    }

    pub fn buffer_mut(&self) -> RefMut<'_, Buffer> {
        self.0.buffer.borrow_mut()
    }

    pub fn token_cache(&self) -> RefMut<'_, TokenCache> {
        self.0.token_cache.borrow_mut()
    }

    pub fn downgrade(&self) -> WeakBufferHandle {
        WeakBufferHandle(Rc::downgrade(&self.0))
    }

    /// Swap this buffer's Mode. Resets the Token Cache, since its check
    /// points and `ran_to` were produced by the old tokenizer and no
    /// longer mean anything (spec.md §4.10).
    pub fn set_mode(&self, mode: Mode) {
        self.0.buffer.borrow_mut().mode = mode;
        *self.0.token_cache.borrow_mut() = TokenCache::new();
        tracing::trace!(target: "model.buffer", id = self.id().0, "mode_swap_reset_token_cache");
    }
}

impl WeakBufferHandle {
    pub fn upgrade(&self) -> Option<BufferHandle> {
        self.0.upgrade().map(BufferHandle)
    }
}

/// Owns every live buffer by `BufferId`. The arena half of spec.md §9's
/// "arena + integer ID plus a reference-counted handle table": `next_id`
/// hands out identifiers, never reused even after a `kill`, so a stale
/// [`WeakBufferHandle`] can never alias a newer buffer that happens to
/// reuse its slot.
pub struct BufferTable {
    buffers: Vec<BufferHandle>,
    next_id: u64,
}

impl Default for BufferTable {
    fn default() -> Self {
        Self::new()
    }
}

impl BufferTable {
    pub fn new() -> Self {
        Self { buffers: Vec::new(), next_id: 0 }
    }

    fn allocate_id(&mut self) -> BufferId {
        let id = BufferId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn create(&mut self, name: impl Into<String>, mode: Mode) -> BufferHandle {
        let id = self.allocate_id();
        let handle = BufferHandle::new(Buffer::new(id, name, mode));
        self.buffers.push(handle.clone());
        tracing::trace!(target: "model.buffer", id = id.0, "buffer_created");
        handle
    }

    pub fn create_from_bytes(&mut self, name: impl Into<String>, bytes: &[u8], mode: Mode) -> BufferHandle {
        let id = self.allocate_id();
        let mut buffer = Buffer::new(id, name, mode);
        buffer.contents = ContentStore::from_bytes(bytes);
        let handle = BufferHandle::new(buffer);
        self.buffers.push(handle.clone());
        tracing::trace!(target: "model.buffer", id = id.0, "buffer_created");
        handle
    }

    pub fn get(&self, id: BufferId) -> Option<BufferHandle> {
        self.buffers.iter().find(|handle| handle.id() == id).cloned()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BufferHandle> {
        self.buffers.iter()
    }

    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    /// Removes a buffer from the table. Outstanding [`WeakBufferHandle`]s
    /// held by windows simply fail to upgrade afterward — spec.md §7's
    /// "buffer-kill race" is an expected, recoverable no-op, not an error
    /// the table needs to report beyond this boolean.
    pub fn kill(&mut self, id: BufferId) -> bool {
        let before = self.buffers.len();
        self.buffers.retain(|handle| handle.id() != id);
        let killed = self.buffers.len() != before;
        if killed {
            tracing::trace!(target: "model.buffer", id = id.0, "buffer_killed");
        }
        killed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_state::Mode;

    #[test]
    fn weak_handle_upgrades_while_buffer_lives() {
        let mut table = BufferTable::new();
        let handle = table.create_from_bytes("t", b"hello", Mode::plaintext());
        let weak = handle.downgrade();
        assert!(weak.upgrade().is_some());
    }

    #[test]
    fn weak_handle_fails_to_upgrade_after_kill() {
        let mut table = BufferTable::new();
        let handle = table.create_from_bytes("t", b"hello", Mode::plaintext());
        let id = handle.id();
        let weak = handle.downgrade();
        drop(handle);
        assert!(table.kill(id));
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn ids_are_never_reused_after_kill() {
        let mut table = BufferTable::new();
        let first = table.create("a", Mode::plaintext());
        let first_id = first.id();
        table.kill(first_id);
        let second = table.create("b", Mode::plaintext());
        assert_ne!(first_id, second.id());
    }

    #[test]
    fn set_mode_resets_the_token_cache() {
        let mut table = BufferTable::new();
        let handle = table.create_from_bytes("t.cpp", b"int x;", Mode::cpp());
        {
            let mut cache = handle.token_cache();
            cache.get_token_at_position(&handle.buffer(), core_syntax::tokenizer_for(core_state::TokenizerKind::Cpp), 0);
        }
        handle.set_mode(Mode::plaintext());
        assert_eq!(handle.token_cache().ran_to(), 0);
    }
}
