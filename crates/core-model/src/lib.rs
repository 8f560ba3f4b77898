//! Editor-level wiring between buffers and windows (spec.md §3, §9):
//! the buffer handle table and `Window_Unified`.

mod handle;
mod window;

pub use handle::{BufferHandle, BufferTable, WeakBufferHandle};
pub use window::{WindowId, WindowUnified};

use core_state::Mode;

/// Owns every buffer and window. Not itself named in spec.md (the
/// dispatcher that would drive it is out of scope per spec.md §1), but
/// something has to hold the two tables together for `ox-bin` to exercise
/// the core end-to-end — this is that something, kept intentionally thin.
#[derive(Default)]
pub struct Editor {
    pub buffers: BufferTable,
    windows: Vec<WindowUnified>,
    next_window_id: u64,
}

impl Editor {
    pub fn new() -> Self {
        Self { buffers: BufferTable::new(), windows: Vec::new(), next_window_id: 0 }
    }

    /// Creates a buffer from `bytes` and a window onto it, returning the
    /// new window's id.
    pub fn open(&mut self, name: impl Into<String>, bytes: &[u8], mode: Mode) -> WindowId {
        let handle = self.buffers.create_from_bytes(name, bytes, mode);
        let id = WindowId(self.next_window_id);
        self.next_window_id += 1;
        self.windows.push(WindowUnified::new(id, &handle));
        id
    }

    pub fn window(&self, id: WindowId) -> Option<&WindowUnified> {
        self.windows.iter().find(|w| w.id == id)
    }

    pub fn window_mut(&mut self, id: WindowId) -> Option<&mut WindowUnified> {
        self.windows.iter_mut().find(|w| w.id == id)
    }

    pub fn windows(&self) -> &[WindowUnified] {
        &self.windows
    }

    /// Closes a window without touching the buffer it pointed at — other
    /// windows (or none) may still hold it open.
    pub fn close_window(&mut self, id: WindowId) -> bool {
        let before = self.windows.len();
        self.windows.retain(|w| w.id != id);
        self.windows.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_state::Mode;

    #[test]
    fn open_creates_a_buffer_and_a_window_onto_it() {
        let mut editor = Editor::new();
        let id = editor.open("t", b"hello", Mode::plaintext());
        let window = editor.window(id).expect("window exists");
        let buffer = window.buffer().expect("buffer is live");
        assert_eq!(buffer.buffer().contents.slice(0, 5).as_str(), "hello");
    }

    #[test]
    fn closing_a_window_leaves_its_buffer_alive_in_the_table() {
        let mut editor = Editor::new();
        let id = editor.open("t", b"hello", Mode::plaintext());
        let buffer_id = editor.window(id).unwrap().buffer().unwrap().id();
        assert!(editor.close_window(id));
        assert!(editor.buffers.get(buffer_id).is_some());
        assert!(editor.window(id).is_none());
    }
}
