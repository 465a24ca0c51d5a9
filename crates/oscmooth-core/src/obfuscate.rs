//! Reversible name obfuscation.
//!
//! A character shift over the Unicode scalar values. The surrogate gap is
//! skipped and the shift wraps modulo the number of scalar values, so
//! [`deobfuscate`] inverts [`obfuscate`] exactly for every valid `&str`.
//!
//! This only hides channel semantics from casual inspection of the synced
//! channel list. It is not encryption.

/// Default shift width, in scalar positions.
pub const OBFUSCATION_SHIFT: u32 = 16;

const SURROGATE_START: u32 = 0xD800;
const SURROGATE_LEN: u32 = 0x800;
const SCALAR_COUNT: u32 = 0x11_0000 - SURROGATE_LEN;

fn to_index(c: char) -> u32 {
    let code = c as u32;
    if code >= SURROGATE_START { code - SURROGATE_LEN } else { code }
}

fn from_index(index: u32) -> char {
    let code = if index >= SURROGATE_START {
        index + SURROGATE_LEN
    } else {
        index
    };
    // Indices below SCALAR_COUNT always map to a scalar value.
    char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER)
}

fn shift_char(c: char, shift: u32) -> char {
    from_index((to_index(c) + shift % SCALAR_COUNT) % SCALAR_COUNT)
}

/// Shifts every character of `name` forward by `shift` positions.
pub fn obfuscate_with(name: &str, shift: u32) -> String {
    name.chars().map(|c| shift_char(c, shift)).collect()
}

/// Shifts every character of `name` back by `shift` positions.
pub fn deobfuscate_with(name: &str, shift: u32) -> String {
    let back = SCALAR_COUNT - shift % SCALAR_COUNT;
    name.chars().map(|c| shift_char(c, back)).collect()
}

/// Obfuscates with [`OBFUSCATION_SHIFT`].
pub fn obfuscate(name: &str) -> String {
    obfuscate_with(name, OBFUSCATION_SHIFT)
}

/// Inverts [`obfuscate`].
pub fn deobfuscate(name: &str) -> String {
    deobfuscate_with(name, OBFUSCATION_SHIFT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_shifts_by_sixteen() {
        assert_eq!(obfuscate("A"), "Q");
        assert_eq!(obfuscate("OSCm/"), "_cS}?");
    }

    #[test]
    fn round_trips_across_boundaries() {
        let samples = [
            "OSCm/Binary/Jump4",
            "",
            "\u{0}",
            "\u{D7FF}\u{E000}",
            "\u{10FFFF}",
            "émoji 🎭 名前",
        ];
        for s in samples {
            let hidden = obfuscate(s);
            assert_eq!(deobfuscate(&hidden), s, "round trip of {s:?}");
        }
    }

    #[test]
    fn wraps_at_top_of_range() {
        let hidden = obfuscate("\u{10FFFF}");
        assert_eq!(hidden, "\u{F}");
    }

    #[test]
    fn skips_surrogate_gap() {
        let hidden = obfuscate("\u{D7FF}");
        assert_eq!(hidden, "\u{E00F}");
    }

    #[test]
    fn zero_shift_is_identity() {
        assert_eq!(obfuscate_with("Jump", 0), "Jump");
        assert_eq!(deobfuscate_with("Jump", 0), "Jump");
    }
}
