//! `matching-region` overlay (spec.md §4.7), grounded on
//! `original_source/src/overlays/overlay_matching_region.cpp`: while a
//! region is marked, highlight every other occurrence of its text.
//!
//! The original caches a `Contents_Iterator` pointing at the marked
//! region's bytes and re-derives matches against it every call via
//! `matches_cased`. `core-search::matches_cased` compares a buffer span
//! against an owned `&[u8]` query rather than a second iterator, so this
//! port materialises the region once in `start_frame` instead — dropping
//! the original's extra restriction that the region's start must fall at
//! or after the frame's visible top (that restriction existed only to keep
//! the original's cached iterator valid across the visible window; an
//! owned byte copy has no such constraint).

use core_search::{CaseHandling, matches_cased};
use core_syntax::Face;
use core_text::ContentsIterator;

use crate::pipeline::{Overlay, OverlayContext};

pub struct MatchingRegion {
    face: Face,
    enabled: bool,
    region: Vec<u8>,
    case_handling: CaseHandling,
    countdown: u64,
}

impl MatchingRegion {
    pub fn new(face: Face) -> Self {
        Self {
            face,
            enabled: false,
            region: Vec::new(),
            case_handling: CaseHandling::SmartCase,
            countdown: 0,
        }
    }
}

impl Overlay for MatchingRegion {
    fn start_frame(&mut self, ctx: &mut OverlayContext<'_>, _start: ContentsIterator<'_>) {
        self.enabled = false;
        self.countdown = 0;

        let cursor = *ctx.window.cursors.selected();
        if !ctx.window.show_marks || cursor.point == cursor.mark {
            return;
        }

        let region_start = cursor.start();
        let region_end = cursor.end();
        // Avoid an O(n^2) compare when the whole file is selected
        // (`command_mark_buffer`).
        if region_end - region_start > ctx.buffer.contents.len() / 2 {
            return;
        }

        self.region = ctx.buffer.contents.slice(region_start, region_end).as_bytes().to_vec();
        self.case_handling = ctx.buffer.mode.default_case;
        self.enabled = true;
    }

    fn get_face_and_advance(&mut self, _ctx: &mut OverlayContext<'_>, it: ContentsIterator<'_>) -> Face {
        if !self.enabled {
            return Face::default();
        }

        if self.countdown > 0 {
            self.countdown -= 1;
        }

        if self.countdown == 0
            && matches_cased(it, it.position + self.region.len() as u64, &self.region, self.case_handling)
        {
            self.countdown = self.region.len() as u64;
        }

        if self.countdown > 0 {
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
