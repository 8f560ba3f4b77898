//! Key descriptions and their string grammar (spec.md §6).

mod key;

pub use key::{Key, KeyCode, Modifiers, parse_keys, stringify_key, stringify_keys};
