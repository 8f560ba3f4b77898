//! Identifier-completion core (spec.md §4.9): nearest-match search for
//! inline "expand word" style completion, a whole-buffer prefix scan for
//! mini-buffer completion lists, and the engine that owns a result set's
//! selection/paging/commit behaviour.

mod engine;
mod nearest;

pub use engine::{CompletionEdit, CompletionEngine, full_insertion};
pub use nearest::{
    all_identifiers_starting_with, find_nearest_matching_identifier,
    find_nearest_matching_identifier_after, find_nearest_matching_identifier_before,
    find_nearest_matching_identifier_before_after,
};
