//! Search & Match primitives over [`core_text::ContentStore`] (spec.md §4.8).
//!
//! Every primitive here takes or returns a [`core_text::ContentsIterator`]
//! rather than materialising byte ranges, so scanning a multi-megabyte
//! buffer for a short query never allocates.

mod case;
mod find;
mod matching;

pub use case::{CaseHandling, byte_matches, resolve_smart_case};
pub use find::{
    find, find_before, find_cased, find_this_line, rfind, rfind_after, rfind_cased,
    rfind_this_line, search_backward, search_backward_cased, search_forward,
    search_forward_cased,
};
pub use matching::{looking_at, looking_at_cased, matches, matches_cased, matches_region};
