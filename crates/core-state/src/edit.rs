//! `Edit` records — the atomic insert/remove primitive a [`crate::Transaction`]
//! assembles into a [`crate::Commit`] (spec.md §3).

use core_text::SSOStr;

bitflags::bitflags! {
    /// Direction and stickiness bits for one [`Edit`].
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct EditFlags: u8 {
        /// The edit inserts `value` at `position`.
        const INSERT = 0b01;
        /// The edit removes `value.len()` bytes starting at `position`.
        const REMOVE = 0b10;
        /// A cursor exactly at `position` moves with an `INSERT` rather than
        /// staying put. Meaningless on a `REMOVE` edit.
        const INSERT_AFTER_POSITION = 0b100;
    }
}

impl EditFlags {
    pub fn is_insert(self) -> bool {
        self.contains(EditFlags::INSERT)
    }

    pub fn is_remove(self) -> bool {
        self.contains(EditFlags::REMOVE)
    }
}

/// A single insert or remove of a byte value at a position (spec.md §3).
#[derive(Clone, Debug)]
pub struct Edit {
    pub value: SSOStr,
    pub position: u64,
    pub flags: EditFlags,
}

impl Edit {
    pub fn insert(position: u64, value: SSOStr, sticky: bool) -> Self {
        let mut flags = EditFlags::INSERT;
        if sticky {
            flags |= EditFlags::INSERT_AFTER_POSITION;
        }
        Self { value, position, flags }
    }

    pub fn remove(position: u64, value: SSOStr) -> Self {
        Self { value, position, flags: EditFlags::REMOVE }
    }

    /// The inverse of this edit: an INSERT undoes a REMOVE and vice versa,
    /// at the same position, carrying the same value.
    pub fn inverted(&self) -> Edit {
        if self.flags.is_insert() {
            Edit::remove(self.position, self.value.clone())
        } else {
            Edit::insert(self.position, self.value.clone(), true)
        }
    }

    pub fn len(&self) -> u64 {
        self.value.len() as u64
    }
}
