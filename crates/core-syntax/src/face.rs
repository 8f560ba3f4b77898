//! `Face` — foreground/background/flags describing rendering of a byte, and
//! its total-inverse encoding into a custom `Token_Type` (spec.md §4.6, §6).

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct FaceFlags: u32 {
        const BOLD = 1;
        const UNDERSCORE = 2;
        const REVERSE = 4;
        const ITALICS = 8;
        const INVISIBLE = 16;
    }
}

/// Either a themed palette index or a raw RGB triple.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FaceColor {
    Themed(i16),
    Rgb(u8, u8, u8),
}

impl Default for FaceColor {
    fn default() -> Self {
        FaceColor::Themed(-1)
    }
}

/// Foreground/background/flags bundle. Encodes into the high bits of a
/// `u64` `Token_Type` when a tokeniser wants to paint a face directly
/// rather than naming a [`crate::token::TokenType`] enum member.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Face {
    pub foreground: FaceColor,
    pub background: FaceColor,
    pub flags: FaceFlags,
}

const CUSTOM: u64 = 0x8000_0000_0000_0000;
const CUSTOM_FOREGROUND_IS_COLOR: u64 = 0x4000_0000_0000_0000;
const CUSTOM_BACKGROUND_IS_COLOR: u64 = 0x2000_0000_0000_0000;
const CUSTOM_FACE_INVISIBLE: u64 = 0x1000_0000_0000_0000;

impl Face {
    /// Pack this face into a `Token_Type` bit pattern with the `CUSTOM` bit
    /// set. Only bits this function writes are ever nonzero in its output,
    /// so `Face::decode(face.encode())` and `face.encode().decode().encode()`
    /// both round-trip exactly (spec.md §8 property 7).
    pub fn encode(&self) -> u64 {
        let mut bits = CUSTOM;

        bits |= match self.foreground {
            FaceColor::Themed(index) => (index as u16 as u64) << 32,
            FaceColor::Rgb(r, g, b) => {
                CUSTOM_FOREGROUND_IS_COLOR | ((r as u64) << 48) | ((g as u64) << 40) | ((b as u64) << 32)
            }
        };

        bits |= match self.background {
            FaceColor::Themed(index) => index as u16 as u64,
            FaceColor::Rgb(r, g, b) => {
                CUSTOM_BACKGROUND_IS_COLOR | ((r as u64) << 16) | ((g as u64) << 8) | (b as u64)
            }
        };

        if self.flags.contains(FaceFlags::INVISIBLE) {
            bits |= CUSTOM_FACE_INVISIBLE;
        }
        bits |= ((self.flags.bits() & 0xF) as u64) << 24;

        bits
    }

    /// Inverse of [`Face::encode`]. `bits` must have the `CUSTOM` bit set.
    pub fn decode(bits: u64) -> Face {
        debug_assert!(bits & CUSTOM != 0, "decode() on a non-CUSTOM Token_Type");

        let foreground = if bits & CUSTOM_FOREGROUND_IS_COLOR != 0 {
            FaceColor::Rgb(
                ((bits >> 48) & 0xFF) as u8,
                ((bits >> 40) & 0xFF) as u8,
                ((bits >> 32) & 0xFF) as u8,
            )
        } else {
            FaceColor::Themed(((bits >> 32) & 0xFFFF) as i16)
        };

        let background = if bits & CUSTOM_BACKGROUND_IS_COLOR != 0 {
            FaceColor::Rgb(
                ((bits >> 16) & 0xFF) as u8,
                ((bits >> 8) & 0xFF) as u8,
                (bits & 0xFF) as u8,
            )
        } else {
            FaceColor::Themed((bits & 0xFFFF) as i16)
        };

        let mut flags = FaceFlags::from_bits_truncate((((bits >> 24) & 0xF) as u32));
        if bits & CUSTOM_FACE_INVISIBLE != 0 {
            flags |= FaceFlags::INVISIBLE;
        }

        Face { foreground, background, flags }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn themed_roundtrip() {
        let face = Face {
            foreground: FaceColor::Themed(3),
            background: FaceColor::Themed(-1),
            flags: FaceFlags::BOLD | FaceFlags::ITALICS,
        };
        let bits = face.encode();
        assert_eq!(bits & CUSTOM, CUSTOM);
        assert_eq!(Face::decode(bits), face);
    }

    #[test]
    fn rgb_roundtrip_with_invisible_flag() {
        let face = Face {
            foreground: FaceColor::Rgb(0x12, 0x34, 0x56),
            background: FaceColor::Rgb(0xAA, 0xBB, 0xCC),
            flags: FaceFlags::INVISIBLE | FaceFlags::REVERSE,
        };
        let bits = face.encode();
        assert_eq!(Face::decode(bits), face);
    }

    #[test]
    fn encode_decode_encode_is_idempotent() {
        let face = Face {
            foreground: FaceColor::Themed(100),
            background: FaceColor::Rgb(1, 2, 3),
            flags: FaceFlags::UNDERSCORE,
        };
        let bits = face.encode();
        let decoded = Face::decode(bits);
        assert_eq!(decoded.encode(), bits);
    }

    proptest::proptest! {
        #[test]
        fn encode_decode_roundtrips_for_any_face(
            fg_themed in proptest::bool::ANY,
            fg_index in proptest::num::i16::ANY,
            fg_rgb in proptest::collection::vec(0u8..=255, 3),
            bg_themed in proptest::bool::ANY,
            bg_index in proptest::num::i16::ANY,
            bg_rgb in proptest::collection::vec(0u8..=255, 3),
            flag_bits in 0u32..32,
        ) {
            let foreground = if fg_themed { FaceColor::Themed(fg_index) } else { FaceColor::Rgb(fg_rgb[0], fg_rgb[1], fg_rgb[2]) };
            let background = if bg_themed { FaceColor::Themed(bg_index) } else { FaceColor::Rgb(bg_rgb[0], bg_rgb[1], bg_rgb[2]) };
            let face = Face { foreground, background, flags: FaceFlags::from_bits_truncate(flag_bits) };
            let bits = face.encode();
            proptest::prop_assert_eq!(Face::decode(bits), face);
        }
    }
}
