//! Bucketed content store, read iterators, and the SSO-string value pool.
//!
//! This is the leaf layer of the buffer-and-edit core: every other crate in
//! the workspace (`core-search`, `core-state`, `core-syntax`,
//! `core-completion`, `core-overlay`) builds on the [`ContentStore`] /
//! [`ContentsIterator`] pair defined here.

mod content;
mod ident;
mod sso;

pub use content::{BUCKET_CAPACITY, ContentStore, ContentsIterator};
pub use ident::{backward_through_identifier, forward_through_identifier, is_identifier_byte};
pub use sso::{INLINE_CAPACITY, SSOStr, ValueAllocator};
