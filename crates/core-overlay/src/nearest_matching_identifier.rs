//! `nearest-matching-identifier` overlay (spec.md §4.7), grounded verbatim
//! on `original_source/overlays/overlay_nearest_matching_identifier.cpp`:
//! for the identifier under the cursor in an unsaved buffer, highlight the
//! single nearest identifier sharing its prefix and extending further
//! (spec.md §4.9's algorithm).

use core_completion::find_nearest_matching_identifier;
use core_search::matches_region;
use core_syntax::Face;
use core_text::{ContentsIterator, backward_through_identifier, forward_through_identifier, is_identifier_byte};

use crate::pipeline::{Overlay, OverlayContext};

const MAX_BUCKETS: usize = 5;

pub struct NearestMatchingIdentifier {
    face: Face,

    cache_cursor_position: u64,
    cache_change_index: u64,

    start: Option<u64>,
    end: u64,

    countdown: u64,
    countdown_highlight: bool,
}

impl NearestMatchingIdentifier {
    pub fn new(face: Face) -> Self {
        Self {
            face,
            cache_cursor_position: u64::MAX,
            cache_change_index: u64::MAX,
            start: None,
            end: 0,
            countdown: 0,
            countdown_highlight: false,
        }
    }
}

impl Overlay for NearestMatchingIdentifier {
    fn start_frame(&mut self, ctx: &mut OverlayContext<'_>, _start: ContentsIterator<'_>) {
        self.countdown = 0;
        self.countdown_highlight = false;

        // Skip while browsing a saved buffer — cuts down on white noise.
        if ctx.buffer.is_unchanged() || ctx.window.show_marks {
            self.start = None;
            self.end = 0;
            return;
        }

        let cursor_point = ctx.window.cursors.selected().point;
        if cursor_point == self.cache_cursor_position && ctx.buffer.changes_len() as u64 == self.cache_change_index {
            return;
        }
        self.cache_cursor_position = cursor_point;
        self.cache_change_index = ctx.buffer.changes_len() as u64;

        self.start = None;
        self.end = 0;

        let mut word_start = ctx.buffer.contents.iterator_at(cursor_point);
        let middle = word_start;
        backward_through_identifier(&mut word_start);

        if word_start.position >= middle.position {
            return;
        }

        let ignored: Vec<u64> = ctx.window.cursors.as_slice().iter().map(|c| c.point).collect();

        if let Some(pos) = find_nearest_matching_identifier(word_start, middle, MAX_BUCKETS, &ignored) {
            let mut end_it = ctx.buffer.contents.iterator_at(pos);
            forward_through_identifier(&mut end_it);
            self.start = Some(pos);
            self.end = end_it.position;
        }
    }

    fn get_face_and_advance(&mut self, ctx: &mut OverlayContext<'_>, it: ContentsIterator<'_>) -> Face {
        if self.end == 0 {
            return Face::default();
        }

        if self.countdown == 0 {
            if !is_identifier_byte(it.get()) {
                return Face::default();
            }

            let mut word_end = it;
            forward_through_identifier(&mut word_end);
            self.countdown = word_end.position - it.position;

            let start = self.start.expect("end != 0 implies start is set");
            let start_it = ctx.buffer.contents.iterator_at(start);
            self.countdown_highlight = matches_region(start_it, self.end, it, word_end.position);
        }

        self.countdown -= 1;
        if self.countdown_highlight {
            self.face
        } else {
            Face::default()
        }
    }

    fn get_face_newline_padding(&mut self, _ctx: &mut OverlayContext<'_>, _end_of_line: ContentsIterator<'_>) -> Face {
        Face::default()
    }

    fn end_frame(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_state::{Buffer, Cursor, CursorList, Edit, Mode, Transaction};
    use core_syntax::{FaceColor, PlainTextTokenizer, TokenCache};
    use core_text::SSOStr;

    fn face() -> Face {
        Face { foreground: FaceColor::Themed(3), ..Face::default() }
    }

    #[test]
    fn highlights_the_nearest_longer_identifier_sharing_the_prefix() {
        let mut buffer = Buffer::from_bytes("t", b"foo foobar", Mode::plaintext());
        // Touch the buffer so `is_unchanged()` is false.
        let mut txn = Transaction::new();
        txn.push(Edit::insert(10, SSOStr::from_static(b""), false));
        txn.commit(&mut buffer);

        let cursors = CursorList::from_cursors(vec![Cursor::at(2)]); // inside "foo"
        let window = crate::pipeline::OverlayWindow { cursors: &cursors, show_marks: false };
        let mut token_cache = TokenCache::new();
        let mut ctx = OverlayContext {
            buffer: &buffer,
            window: &window,
            tokenizer: &PlainTextTokenizer,
            token_cache: &mut token_cache,
        };

        let mut overlay = NearestMatchingIdentifier::new(face());
        let start = buffer.contents.start();
        overlay.start_frame(&mut ctx, start);

        let hit = overlay.get_face_and_advance(&mut ctx, buffer.contents.iterator_at(4));
        assert_eq!(hit, face());
    }

    #[test]
    fn disabled_on_saved_buffer() {
        let buffer = Buffer::from_bytes("t", b"foo foobar", Mode::plaintext());
        let cursors = CursorList::from_cursors(vec![Cursor::at(2)]);
        let window = crate::pipeline::OverlayWindow { cursors: &cursors, show_marks: false };
        let mut token_cache = TokenCache::new();
        let mut ctx = OverlayContext {
            buffer: &buffer,
            window: &window,
            tokenizer: &PlainTextTokenizer,
            token_cache: &mut token_cache,
        };

        let mut overlay = NearestMatchingIdentifier::new(face());
        let start = buffer.contents.start();
        overlay.start_frame(&mut ctx, start);
        assert_eq!(overlay.end, 0);
    }
}
