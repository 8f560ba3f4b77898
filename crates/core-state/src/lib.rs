//! Transaction/Commit/undo-redo log, Cursor Model, and the `Buffer` that
//! ties them to a Content Store and a Mode (spec.md §3, §4.2–§4.4, §4.10).

mod buffer;
mod commit;
mod cursor;
mod edit;
mod error;
mod mode;
mod transaction;

pub use buffer::{Buffer, BufferId};
pub use commit::{Change, Commit};
pub use cursor::{Cursor, CursorList};
pub use edit::{Edit, EditFlags};
pub use error::CommandError;
pub use mode::{IndentOptions, Mode, TokenizerKind};
pub use transaction::Transaction;

#[cfg(test)]
mod proptests {
    use super::*;
    use core_text::SSOStr;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn undo_to_zero_restores_initial_contents(
            initial in proptest::collection::vec(b'a'..=b'z', 0..64),
            inserts in proptest::collection::vec((0u64..64, proptest::collection::vec(b'a'..=b'z', 1..8)), 0..8),
        ) {
            let mut buffer = Buffer::from_bytes("t", &initial, Mode::plaintext());
            let before = buffer.contents.slice(0, buffer.contents.len()).as_bytes().to_vec();
            for (pos_seed, bytes) in &inserts {
                let len = buffer.contents.len();
                let position = if len == 0 { 0 } else { pos_seed % (len + 1) };
                let mut txn = Transaction::new();
                txn.push(Edit::insert(position, SSOStr::from_owned(bytes.clone()), false));
                txn.commit(&mut buffer);
            }
            while buffer.undo() {}
            prop_assert_eq!(buffer.contents.slice(0, buffer.contents.len()).as_bytes().to_vec(), before);
        }
    }
}
