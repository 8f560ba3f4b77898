//! The five-hook `Overlay` contract and its ordered composition (spec.md
//! §4.7), ported from `original_source/src/core/overlay.hpp`'s `VTable`
//! (minus the `Editor`/`Client` render-loop collaborators, which are
//! out-of-scope external collaborators per spec.md §1).

use core_state::{Buffer, CursorList};
use core_syntax::{Face, Tokenizer, TokenCache};
use core_text::ContentsIterator;

/// The overlay-visible slice of a window: its cursors and whether the user
/// is actively marking a region. Built from `core-state` types directly
/// rather than depending on a full window type, so this crate has no reason
/// to depend on whatever eventually owns a window.
pub struct OverlayWindow<'a> {
    pub cursors: &'a CursorList,
    pub show_marks: bool,
}

/// Everything an overlay hook may need beyond the iterator it's called
/// with. `tokenizer`/`token_cache` are bundled here even for overlays that
/// never touch tokens (`matching-region`, `merge-conflicts`), mirroring how
/// the original bundles `Buffer*`/`Window_Unified*` into every call
/// regardless of whether a given overlay needs them.
pub struct OverlayContext<'a> {
    pub buffer: &'a Buffer,
    pub window: &'a OverlayWindow<'a>,
    pub tokenizer: &'a dyn Tokenizer,
    pub token_cache: &'a mut TokenCache,
}

/// A stateful, frame-scoped face producer layered over the token stream.
pub trait Overlay {
    /// Called once per rendered frame, with an iterator at the first byte
    /// that will be displayed. Overlays may cache the selected cursor
    /// position and the buffer's change counter to skip work across
    /// unchanged frames.
    fn start_frame(&mut self, ctx: &mut OverlayContext<'_>, start: ContentsIterator<'_>);

    /// Called once per displayed byte, in buffer order. May be stateful: an
    /// overlay is permitted to keep a "countdown" saying "the next N bytes
    /// are part of the match I already found".
    fn get_face_and_advance(&mut self, ctx: &mut OverlayContext<'_>, it: ContentsIterator<'_>) -> Face;

    /// Face for the column space past a line's trailing newline.
    fn get_face_newline_padding(&mut self, ctx: &mut OverlayContext<'_>, end_of_line: ContentsIterator<'_>) -> Face;

    /// Flush per-frame state.
    fn end_frame(&mut self);

    /// Release any held state. Most overlays have nothing to release.
    fn cleanup(&mut self) {}
}

/// Composes overlays lower-to-higher priority: at each call, every overlay
/// runs (so stateful countdowns stay in sync frame over frame), and the
/// last non-transparent face wins. `Face::default()` ("is-themed and
/// themed-index == default") is the transparent value, per spec.md §4.7.
pub struct OverlayPipeline {
    overlays: Vec<Box<dyn Overlay>>,
}

impl OverlayPipeline {
    pub fn new(overlays: Vec<Box<dyn Overlay>>) -> Self {
        Self { overlays }
    }

    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }

    pub fn start_frame(&mut self, ctx: &mut OverlayContext<'_>, start: ContentsIterator<'_>) {
        for overlay in &mut self.overlays {
            overlay.start_frame(ctx, start);
        }
    }

    pub fn get_face_and_advance(&mut self, ctx: &mut OverlayContext<'_>, it: ContentsIterator<'_>) -> Face {
        let mut chosen = Face::default();
        for overlay in &mut self.overlays {
            let face = overlay.get_face_and_advance(ctx, it);
            if face != Face::default() {
                chosen = face;
            }
        }
        chosen
    }

    pub fn get_face_newline_padding(&mut self, ctx: &mut OverlayContext<'_>, end_of_line: ContentsIterator<'_>) -> Face {
        let mut chosen = Face::default();
        for overlay in &mut self.overlays {
            let face = overlay.get_face_newline_padding(ctx, end_of_line);
            if face != Face::default() {
                chosen = face;
            }
        }
        chosen
    }

    pub fn end_frame(&mut self) {
        for overlay in &mut self.overlays {
            overlay.end_frame();
        }
    }

    pub fn cleanup(&mut self) {
        for overlay in &mut self.overlays {
            overlay.cleanup();
        }
    }
}
