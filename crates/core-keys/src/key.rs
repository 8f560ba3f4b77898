//! Key descriptions (spec.md §6), grounded on `original_source/src/core/key.cpp`
//! and `key.hpp`: the `[G-][C-][A-][S-]<code>` modifier-prefix grammar, the
//! named-key table, and the `Shift`-on-letter stringify normalisation.

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const CONTROL = 1;
        const ALT = 2;
        const SHIFT = 4;
        const GUI = 8;
    }
}

/// A key code: either a printable ASCII byte (including space/tab/enter) or
/// one of the named non-printable keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyCode {
    Char(u8),
    Backspace,
    Insert,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,
    Escape,
    Up,
    Down,
    Left,
    Right,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
    Menu,
    ScrollLock,
    Mouse1,
    Mouse2,
    Mouse3,
    Mouse4,
    Mouse5,
    ScrollUp,
    ScrollDown,
    ScrollLeft,
    ScrollRight,
    ScrollUpOne,
    ScrollDownOne,
}

/// Named-key table shared by [`KeyCode::parse_name`] and
/// [`KeyCode::stringify`] — a single source of truth for the
/// `@AddKeyCode` list the original comment warns to keep in sync.
const NAMED_KEYS: &[(&str, KeyCode)] = &[
    ("BACKSPACE", KeyCode::Backspace),
    ("INSERT", KeyCode::Insert),
    ("DELETE", KeyCode::Delete),
    ("HOME", KeyCode::Home),
    ("END", KeyCode::End),
    ("PAGE_UP", KeyCode::PageUp),
    ("PAGE_DOWN", KeyCode::PageDown),
    ("ESCAPE", KeyCode::Escape),
    ("UP", KeyCode::Up),
    ("DOWN", KeyCode::Down),
    ("LEFT", KeyCode::Left),
    ("RIGHT", KeyCode::Right),
    ("F1", KeyCode::F1),
    ("F2", KeyCode::F2),
    ("F3", KeyCode::F3),
    ("F4", KeyCode::F4),
    ("F5", KeyCode::F5),
    ("F6", KeyCode::F6),
    ("F7", KeyCode::F7),
    ("F8", KeyCode::F8),
    ("F9", KeyCode::F9),
    ("F10", KeyCode::F10),
    ("F11", KeyCode::F11),
    ("F12", KeyCode::F12),
    ("MENU", KeyCode::Menu),
    ("SCROLL_LOCK", KeyCode::ScrollLock),
    ("MOUSE1", KeyCode::Mouse1),
    ("MOUSE2", KeyCode::Mouse2),
    ("MOUSE3", KeyCode::Mouse3),
    ("MOUSE4", KeyCode::Mouse4),
    ("MOUSE5", KeyCode::Mouse5),
    // Order matters: `SCROLL_UP_ONE` must be tried before `SCROLL_UP` would
    // otherwise be a valid prefix match under a looser parser; here we match
    // on full-string equality so the order is cosmetic, but kept identical
    // to the original's case chain for traceability.
    ("SCROLL_UP_ONE", KeyCode::ScrollUpOne),
    ("SCROLL_DOWN_ONE", KeyCode::ScrollDownOne),
    ("SCROLL_UP", KeyCode::ScrollUp),
    ("SCROLL_DOWN", KeyCode::ScrollDown),
    ("SCROLL_LEFT", KeyCode::ScrollLeft),
    ("SCROLL_RIGHT", KeyCode::ScrollRight),
];

impl KeyCode {
    fn parse_name(name: &str) -> Option<KeyCode> {
        match name {
            "SPACE" => return Some(KeyCode::Char(b' ')),
            "TAB" => return Some(KeyCode::Char(b'\t')),
            "ENTER" => return Some(KeyCode::Char(b'\n')),
            _ => {}
        }
        if let Some((_, code)) = NAMED_KEYS.iter().find(|(n, _)| *n == name) {
            return Some(*code);
        }
        let mut chars = name.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii() => Some(KeyCode::Char(c as u8)),
            _ => None,
        }
    }

    fn stringify(&self, out: &mut String) {
        match self {
            KeyCode::Char(b' ') => out.push_str("SPACE"),
            KeyCode::Char(b'\t') => out.push_str("TAB"),
            KeyCode::Char(b'\n') => out.push_str("ENTER"),
            KeyCode::Char(c) => out.push(*c as char),
            other => {
                let name = NAMED_KEYS
                    .iter()
                    .find(|(_, code)| code == other)
                    .map(|(n, _)| *n)
                    .expect("every non-Char KeyCode has a NAMED_KEYS entry");
                out.push_str(name);
            }
        }
    }

    fn is_printable_unmodified(&self) -> bool {
        matches!(self, KeyCode::Char(c) if c.is_ascii_graphic() || *c == b' ')
    }
}

/// A single key event: a modifier set plus a code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Key {
    pub modifiers: Modifiers,
    pub code: KeyCode,
}

impl Key {
    pub fn new(modifiers: Modifiers, code: KeyCode) -> Self {
        Self { modifiers, code }
    }

    /// Parse a single key description (`[G-][C-][A-][S-]<code>`). Returns
    /// `None` on malformed input (spec.md §7: the caller turns this into a
    /// byte offset via [`parse_keys`]).
    pub fn parse(description: &str) -> Option<Key> {
        let mut modifiers = Modifiers::empty();
        let mut rest = description;
        loop {
            let (flag, prefix) = if let Some(r) = rest.strip_prefix("G-") {
                (Modifiers::GUI, r)
            } else if let Some(r) = rest.strip_prefix("C-") {
                (Modifiers::CONTROL, r)
            } else if let Some(r) = rest.strip_prefix("A-") {
                (Modifiers::ALT, r)
            } else if let Some(r) = rest.strip_prefix("S-") {
                (Modifiers::SHIFT, r)
            } else {
                break;
            };
            modifiers |= flag;
            rest = prefix;
        }
        let code = KeyCode::parse_name(rest)?;
        Some(Key { modifiers, code })
    }
}

/// Append `key`'s stringification to `out`, the inverse of [`Key::parse`]
/// modulo Shift-on-letter normalisation (`S-a` stringifies as `A`).
pub fn stringify_key(out: &mut String, key: Key) {
    if key.modifiers.contains(Modifiers::GUI) {
        out.push_str("G-");
    }
    if key.modifiers.contains(Modifiers::CONTROL) {
        out.push_str("C-");
    }
    if key.modifiers.contains(Modifiers::ALT) {
        out.push_str("A-");
    }
    if key.modifiers.contains(Modifiers::SHIFT) {
        if let KeyCode::Char(c) = key.code {
            if c.is_ascii_lowercase() {
                out.push(c.to_ascii_uppercase() as char);
                return;
            }
        }
        out.push_str("S-");
    }
    key.code.stringify(out);
}

/// Stringify a whole key sequence, collapsing runs of unmodified printable
/// characters into single-quoted spans (`''` escapes a literal quote).
pub fn stringify_keys(keys: &[Key]) -> String {
    let mut out = String::new();
    let mut in_quotes = false;
    for (i, key) in keys.iter().enumerate() {
        if key.modifiers.is_empty() && key.code.is_printable_unmodified() {
            if !in_quotes {
                if i > 0 {
                    out.push(' ');
                }
                out.push('\'');
                in_quotes = true;
            }
            if let KeyCode::Char(b'\'') = key.code {
                out.push('\'');
            }
            if let KeyCode::Char(c) = key.code {
                out.push(c as char);
            }
            continue;
        }
        if in_quotes {
            out.push('\'');
            in_quotes = false;
        }
        if i > 0 {
            out.push(' ');
        }
        stringify_key(&mut out, *key);
    }
    if in_quotes {
        out.push('\'');
    }
    out
}

/// Parse a whole key sequence description. On success, returns the parsed
/// keys; on failure, returns the byte offset of the first invalid character
/// (spec.md §7's "parse errors ... return a negative offset", expressed here
/// as an `Err(offset)` rather than a signed negation of the length).
pub fn parse_keys(string: &str) -> Result<Vec<Key>, usize> {
    let bytes = string.as_bytes();
    let mut keys = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\'' {
            i += 1;
            loop {
                if i == bytes.len() {
                    return Err(i);
                }
                if !bytes[i].is_ascii_graphic() && bytes[i] != b' ' {
                    return Err(i);
                }
                if bytes[i] == b'\'' {
                    i += 1;
                    if i >= bytes.len() || bytes[i] != b'\'' {
                        break;
                    }
                }
                keys.push(Key::new(Modifiers::empty(), KeyCode::Char(bytes[i])));
                i += 1;
            }
            // Skip the single space separator, if any, so the next word
            // doesn't get re-scanned as part of this one.
            if i < bytes.len() && bytes[i] == b' ' {
                i += 1;
            }
        } else {
            let word_len = bytes[i..].iter().position(|&b| b == b' ').unwrap_or(bytes.len() - i);
            let word = &string[i..i + word_len];
            match Key::parse(word) {
                Some(key) => keys.push(key),
                None => return Err(i),
            }
            i += word_len;
            // Skip the single space separator, if any, so the next word
            // doesn't get re-scanned as part of this one.
            if i < bytes.len() && bytes[i] == b' ' {
                i += 1;
            }
        }
    }
    Ok(keys)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_letter() {
        assert_eq!(Key::parse("c"), Some(Key::new(Modifiers::empty(), KeyCode::Char(b'c'))));
    }

    #[test]
    fn parses_modifiers_in_order() {
        assert_eq!(
            Key::parse("A-b"),
            Some(Key::new(Modifiers::ALT, KeyCode::Char(b'b')))
        );
        assert_eq!(
            Key::parse("G-C-A-S-\\"),
            Some(Key::new(
                Modifiers::GUI | Modifiers::CONTROL | Modifiers::ALT | Modifiers::SHIFT,
                KeyCode::Char(b'\\')
            ))
        );
    }

    #[test]
    fn parses_named_keys() {
        assert_eq!(
            Key::parse("C-SPACE"),
            Some(Key::new(Modifiers::CONTROL, KeyCode::Char(b' ')))
        );
        assert_eq!(
            Key::parse("S-BACKSPACE"),
            Some(Key::new(Modifiers::SHIFT, KeyCode::Backspace))
        );
    }

    #[test]
    fn rejects_unknown_code() {
        assert_eq!(Key::parse("NOT_A_KEY"), None);
    }

    #[test]
    fn stringify_round_trips_plain_and_named() {
        let mut out = String::new();
        stringify_key(&mut out, Key::parse("A-b").unwrap());
        assert_eq!(out, "A-b");

        let mut out = String::new();
        stringify_key(&mut out, Key::parse("C-SPACE").unwrap());
        assert_eq!(out, "C-SPACE");
    }

    #[test]
    fn stringify_normalizes_shift_on_lowercase_letter() {
        let mut out = String::new();
        stringify_key(&mut out, Key::new(Modifiers::SHIFT, KeyCode::Char(b'a')));
        assert_eq!(out, "A");
    }

    #[test]
    fn parse_keys_splits_on_space() {
        let keys = parse_keys("A-b C-c").unwrap();
        assert_eq!(keys, vec![Key::parse("A-b").unwrap(), Key::parse("C-c").unwrap()]);
    }

    #[test]
    fn parse_keys_accepts_quoted_printable_run() {
        let keys = parse_keys("'hi'").unwrap();
        assert_eq!(
            keys,
            vec![
                Key::new(Modifiers::empty(), KeyCode::Char(b'h')),
                Key::new(Modifiers::empty(), KeyCode::Char(b'i')),
            ]
        );
    }

    #[test]
    fn parse_keys_quote_escape_is_literal_quote() {
        let keys = parse_keys("'a''b'").unwrap();
        assert_eq!(
            keys,
            vec![
                Key::new(Modifiers::empty(), KeyCode::Char(b'a')),
                Key::new(Modifiers::empty(), KeyCode::Char(b'\'')),
                Key::new(Modifiers::empty(), KeyCode::Char(b'b')),
            ]
        );
    }

    #[test]
    fn parse_keys_reports_offset_on_unterminated_quote() {
        assert_eq!(parse_keys("'abc"), Err(4));
    }

    #[test]
    fn parse_keys_reports_offset_on_invalid_key() {
        assert_eq!(parse_keys("A-b NOT_A_KEY"), Err(4));
    }

    #[test]
    fn stringify_keys_quotes_printable_runs() {
        let keys = parse_keys("'hi' C-c").unwrap();
        assert_eq!(stringify_keys(&keys), "'hi' C-c");
    }
}
