//! Recoverable, user-visible errors (spec.md §7). These are shown on the
//! client and leave buffer state untouched; they are never propagated to
//! unrelated commands and never wrapped in a panic.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("No matches")]
    NoMatches,
    #[error("Not at an identifier")]
    NotAtAnIdentifier,
    #[error("Nothing to undo")]
    NothingToUndo,
    #[error("Nothing to redo")]
    NothingToRedo,
    #[error("Cursor is not positioned at a token")]
    CursorNotAtToken,
    #[error("Must select a non-empty region first")]
    EmptyRegion,
    #[error("No more cursors to create")]
    NoMoreCursors,
}
