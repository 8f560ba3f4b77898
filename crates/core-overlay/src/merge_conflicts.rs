//! `merge-conflicts` overlay (spec.md §4.7, E6), grounded verbatim on
//! `original_source/src/overlays/overlay_merge_conflicts.cpp`'s state
//! machine, including its same-call fallthrough transitions. The state
//! only ever advances at the start of a line — once in `start_frame`, then
//! once per line from `get_face_newline_padding`, which is the hook the
//! renderer calls once it has walked past a line's trailing newline.

use core_search::looking_at;
use core_syntax::Face;
use core_text::ContentsIterator;

use crate::pipeline::{Overlay, OverlayContext};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Nothing,
    AtLessers,
    InTop,
    AtEquals,
    InBottom,
    AtGreaters,
}

fn at_newline(state: State, it: ContentsIterator<'_>) -> State {
    match state {
        State::Nothing => {
            if looking_at(it, b"<<<<<<<") {
                State::AtLessers
            } else {
                State::Nothing
            }
        }
        // Falls through into the same line-start test `InTop` uses.
        State::AtLessers | State::InTop => {
            if looking_at(it, b"=======") {
                State::AtEquals
            } else if looking_at(it, b">>>>>>>") {
                State::AtGreaters
            } else {
                State::InTop
            }
        }
        // Falls through into the same line-start test `InBottom` uses.
        State::AtEquals | State::InBottom => {
            if looking_at(it, b">>>>>>>") {
                State::AtGreaters
            } else {
                State::InBottom
            }
        }
        State::AtGreaters => State::Nothing,
    }
}

pub struct MergeConflicts {
    dividers: Face,
    top: Face,
    bottom: Face,
    state: State,
}

impl MergeConflicts {
    pub fn new(dividers: Face, top: Face, bottom: Face) -> Self {
        Self { dividers, top, bottom, state: State::Nothing }
    }
}

impl Overlay for MergeConflicts {
    fn start_frame(&mut self, _ctx: &mut OverlayContext<'_>, start: ContentsIterator<'_>) {
        self.state = at_newline(State::Nothing, start);
    }

    fn get_face_and_advance(&mut self, _ctx: &mut OverlayContext<'_>, _it: ContentsIterator<'_>) -> Face {
        match self.state {
            State::InTop => self.top,
            State::InBottom => self.bottom,
            State::Nothing => Face::default(),
            _ => self.dividers,
        }
    }

    fn get_face_newline_padding(&mut self, _ctx: &mut OverlayContext<'_>, end_of_line: ContentsIterator<'_>) -> Face {
        let face = match self.state {
            State::InTop | State::InBottom | State::Nothing => Face::default(),
            _ => self.dividers,
        };

        let mut next_line = end_of_line;
        if !next_line.at_eob() {
            next_line.advance_one();
        }
        self.state = at_newline(self.state, next_line);
        face
    }

    fn end_frame(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_state::{Buffer, Cursor, CursorList, Mode};
    use core_syntax::{FaceColor, PlainTextTokenizer, TokenCache};

    fn dividers() -> Face {
        Face { foreground: FaceColor::Themed(1), ..Face::default() }
    }
    fn top() -> Face {
        Face { foreground: FaceColor::Themed(2), ..Face::default() }
    }
    fn bottom() -> Face {
        Face { foreground: FaceColor::Themed(3), ..Face::default() }
    }

    // spec.md E6: "x\n<<<<<<< a\nA\n=======\nB\n>>>>>>> b\ny\n" — marker
    // lines are dividers, "A"/"B" are top/bottom, "x"/"y" get no face.
    #[test]
    fn e6_colours_conflict_markers_and_sides() {
        let text = b"x\n<<<<<<< a\nA\n=======\nB\n>>>>>>> b\ny\n";
        let buffer = Buffer::from_bytes("t", text, Mode::plaintext());
        let cursors = CursorList::from_cursors(vec![Cursor::at(0)]);
        let window = crate::pipeline::OverlayWindow { cursors: &cursors, show_marks: false };
        let mut token_cache = TokenCache::new();
        let mut ctx = OverlayContext {
            buffer: &buffer,
            window: &window,
            tokenizer: &PlainTextTokenizer,
            token_cache: &mut token_cache,
        };

        let mut overlay = MergeConflicts::new(dividers(), top(), bottom());
        let start = buffer.contents.start();
        overlay.start_frame(&mut ctx, start);

        // Line "x" (position 0): no face.
        assert_eq!(overlay.get_face_and_advance(&mut ctx, buffer.contents.iterator_at(0)), Face::default());
        let eol_x = buffer.contents.iterator_at(1);
        assert_eq!(overlay.get_face_newline_padding(&mut ctx, eol_x), Face::default());

        // Line "<<<<<<< a" (position 2): divider.
        assert_eq!(overlay.get_face_and_advance(&mut ctx, buffer.contents.iterator_at(2)), dividers());
        let eol_lessers = buffer.contents.iterator_at(11);
        assert_eq!(overlay.get_face_newline_padding(&mut ctx, eol_lessers), dividers());

        // Line "A" (position 12): top. The newline padding past a top/bottom
        // line carries no face — only divider lines extend into the margin.
        assert_eq!(overlay.get_face_and_advance(&mut ctx, buffer.contents.iterator_at(12)), top());
        let eol_a = buffer.contents.iterator_at(13);
        assert_eq!(overlay.get_face_newline_padding(&mut ctx, eol_a), Face::default());

        // Line "=======" (position 14): divider.
        assert_eq!(overlay.get_face_and_advance(&mut ctx, buffer.contents.iterator_at(14)), dividers());
        let eol_equals = buffer.contents.iterator_at(21);
        assert_eq!(overlay.get_face_newline_padding(&mut ctx, eol_equals), dividers());

        // Line "B" (position 22): bottom.
        assert_eq!(overlay.get_face_and_advance(&mut ctx, buffer.contents.iterator_at(22)), bottom());
        let eol_b = buffer.contents.iterator_at(23);
        assert_eq!(overlay.get_face_newline_padding(&mut ctx, eol_b), Face::default());

        // Line ">>>>>>> b" (position 24): divider.
        assert_eq!(overlay.get_face_and_advance(&mut ctx, buffer.contents.iterator_at(24)), dividers());
        let eol_greaters = buffer.contents.iterator_at(33);
        assert_eq!(overlay.get_face_newline_padding(&mut ctx, eol_greaters), dividers());

        // Line "y" (position 34): no face, state reset.
        assert_eq!(overlay.get_face_and_advance(&mut ctx, buffer.contents.iterator_at(34)), Face::default());
    }
}
