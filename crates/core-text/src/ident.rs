//! ASCII identifier-byte classification shared by the tokenizer contract and
//! the identifier-completion core. spec.md §4.9 defines an identifier as the
//! maximal run of `[A-Za-z0-9_]` — deliberately ASCII-only and byte-oriented,
//! unlike Unicode grapheme classification (which belongs to a render layer
//! this crate does not implement).

/// Is `byte` a legal identifier byte (`[A-Za-z0-9_]`)?
pub fn is_identifier_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

/// Advances `it` past the maximal run of identifier bytes starting at its
/// current position (a no-op if not currently on one).
pub fn forward_through_identifier(it: &mut crate::content::ContentsIterator<'_>) {
    while !it.at_eob() && is_identifier_byte(it.get()) {
        it.advance_one();
    }
}

/// Retreats `it` to the start of the maximal run of identifier bytes ending
/// at its current position (a no-op if the byte before it isn't one).
pub fn backward_through_identifier(it: &mut crate::content::ContentsIterator<'_>) {
    while !it.at_bob() {
        let mut probe = *it;
        probe.retreat_one();
        if !is_identifier_byte(probe.get()) {
            break;
        }
        *it = probe;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_identifier_bytes() {
        assert!(is_identifier_byte(b'a'));
        assert!(is_identifier_byte(b'Z'));
        assert!(is_identifier_byte(b'9'));
        assert!(is_identifier_byte(b'_'));
        assert!(!is_identifier_byte(b' '));
        assert!(!is_identifier_byte(b'-'));
        assert!(!is_identifier_byte(b'.'));
    }
}
