//! Rendering overlays (spec.md §4.7): stateful decorators that walk the
//! same byte stream the renderer does and assign each position a [`Face`],
//! on top of whatever a tokenizer already assigned it.
//!
//! `core-overlay` depends on `core-state`, `core-text`, `core-search`,
//! `core-syntax`, and `core-completion`, but deliberately not on
//! `core-model` — a window's unified type will hold an [`OverlayPipeline`],
//! so the dependency has to run that direction, not the other.

mod highlight_string;
mod matching_region;
mod matching_tokens;
mod merge_conflicts;
mod nearest_matching_identifier;
mod pipeline;

pub use highlight_string::{HighlightString, MatchingAlgo};
pub use matching_region::MatchingRegion;
pub use matching_tokens::MatchingTokens;
pub use merge_conflicts::MergeConflicts;
pub use nearest_matching_identifier::NearestMatchingIdentifier;
pub use pipeline::{Overlay, OverlayContext, OverlayPipeline, OverlayWindow};

use core_state::Mode;
use core_syntax::{Face, FixedTokenType, TokenType};

/// One [`Face`] per named overlay a [`Mode`]'s overlay list can reference.
/// A caller building a window's pipeline owns one of these (typically
/// sourced from the active colour theme) and hands it to
/// [`build_pipeline_for_mode`].
#[derive(Clone, Debug)]
pub struct OverlayTheme {
    pub matching_region: Face,
    pub matching_tokens: Face,
    pub nearest_matching_identifier: Face,
    pub merge_conflict_dividers: Face,
    pub merge_conflict_top: Face,
    pub merge_conflict_bottom: Face,
}

/// Token types `matching-tokens` highlights by default: identifiers and
/// types are the pairs worth drawing a reader's eye to; punctuation would
/// just colour every brace and comma in the buffer.
fn default_matching_token_types() -> Vec<TokenType> {
    vec![TokenType::Fixed(FixedTokenType::Identifier), TokenType::Fixed(FixedTokenType::Type)]
}

/// Resolves one entry of [`Mode::overlays`] to its implementation.
///
/// `highlight-string` is deliberately absent here — it needs a literal
/// string supplied by its caller (an interactive search, say), so it is
/// never part of a Mode's static overlay list and is instead constructed
/// directly via [`HighlightString::new`].
pub fn build_named_overlay(name: &str, theme: &OverlayTheme) -> Option<Box<dyn Overlay>> {
    match name {
        "matching-region" => Some(Box::new(MatchingRegion::new(theme.matching_region))),
        "matching-tokens" => Some(Box::new(MatchingTokens::new(theme.matching_tokens, default_matching_token_types()))),
        "nearest-matching-identifier" => {
            Some(Box::new(NearestMatchingIdentifier::new(theme.nearest_matching_identifier)))
        }
        "merge-conflicts" => Some(Box::new(MergeConflicts::new(
            theme.merge_conflict_dividers,
            theme.merge_conflict_top,
            theme.merge_conflict_bottom,
        ))),
        _ => None,
    }
}

/// Builds the ordered [`OverlayPipeline`] for a buffer's [`Mode`], skipping
/// any name the mode lists that `core-overlay` doesn't recognise rather
/// than failing the whole pipeline over one unknown overlay.
pub fn build_pipeline_for_mode(mode: &Mode, theme: &OverlayTheme) -> OverlayPipeline {
    let overlays = mode.overlays.iter().filter_map(|name| build_named_overlay(name, theme)).collect();
    OverlayPipeline::new(overlays)
}
