//! Grapheme_Cluster_Break ranges, grouped by property value.
//!
//! Hand-written rather than generated from `GraphemeBreakProperty.txt`: each
//! table below is a curated subset of the Unicode ranges needed for the GB3-13
//! rules implemented in `scriv_buffer::utf8::graphemes` (CJK/Latin text, Hangul
//! syllables, combining marks, ZWJ emoji sequences, regional-indicator flags).
//! Codepoints outside every table fall back to `GraphemeBreak::Any`.

use super::enums::GraphemeBreak;

/// (start, end) inclusive, ordered and non-overlapping within a table.
type Range = (u32, u32);

pub(crate) const CONTROL: &[Range] = &[
    (0x0000, 0x0009),
    (0x000B, 0x000C),
    (0x000E, 0x001F),
    (0x007F, 0x009F),
    (0x00AD, 0x00AD),
    (0x0600, 0x0605),
    (0x061C, 0x061C),
    (0x200E, 0x200F),
    (0x2028, 0x2029),
    (0x202A, 0x202E),
    (0x2060, 0x2064),
    (0x2066, 0x206F),
    (0xFEFF, 0xFEFF),
    (0xFFF9, 0xFFFB),
];

pub(crate) const EXTEND: &[Range] = &[
    (0x0300, 0x036F), // combining diacritical marks
    (0x0483, 0x0489),
    (0x0591, 0x05BD),
    (0x05BF, 0x05BF),
    (0x05C1, 0x05C2),
    (0x05C4, 0x05C5),
    (0x05C7, 0x05C7),
    (0x0610, 0x061A),
    (0x064B, 0x065F),
    (0x0670, 0x0670),
    (0x06D6, 0x06DC),
    (0x06DF, 0x06E4),
    (0x06E7, 0x06E8),
    (0x06EA, 0x06ED),
    (0x0711, 0x0711),
    (0x0730, 0x074A),
    (0x07A6, 0x07B0),
    (0x07EB, 0x07F3),
    (0x0816, 0x0819),
    (0x081B, 0x0823),
    (0x0825, 0x0827),
    (0x0829, 0x082D),
    (0x0859, 0x085B),
    (0x08E3, 0x0903),
    (0x093A, 0x093A),
    (0x093C, 0x093C),
    (0x0941, 0x0948),
    (0x094D, 0x094D),
    (0x0951, 0x0957),
    (0x0962, 0x0963),
    (0x20D0, 0x20FF), // combining diacritical marks for symbols
    (0xFE00, 0xFE0F), // variation selectors
    (0xFE20, 0xFE2F), // combining half marks
    (0x1F3FB, 0x1F3FF), // emoji skin tone modifiers
    (0xE0100, 0xE01EF), // variation selectors supplement
];

pub(crate) const ZWJ: &[Range] = &[(0x200D, 0x200D)];

pub(crate) const REGIONAL_INDICATOR: &[Range] = &[(0x1F1E6, 0x1F1FF)];

pub(crate) const PREPEND: &[Range] = &[
    (0x0600, 0x0605),
    (0x06DD, 0x06DD),
    (0x070F, 0x070F),
    (0x0890, 0x0891),
    (0x08E2, 0x08E2),
    (0x0D4E, 0x0D4E),
    (0x110BD, 0x110BD),
    (0x110CD, 0x110CD),
    (0x111C2, 0x111C3),
    (0x1193F, 0x1193F),
    (0x11941, 0x11941),
    (0x11A3A, 0x11A3A),
    (0x11A84, 0x11A89),
    (0x11D46, 0x11D46),
];

pub(crate) const SPACING_MARK: &[Range] = &[
    (0x0903, 0x0903),
    (0x093B, 0x093B),
    (0x093E, 0x0940),
    (0x0949, 0x094C),
    (0x094E, 0x094F),
    (0x0982, 0x0983),
    (0x09BE, 0x09C0),
    (0x09C7, 0x09C8),
    (0x0A03, 0x0A03),
    (0x0B02, 0x0B03),
    (0x0BBE, 0x0BBF),
    (0x0BC1, 0x0BC2),
    (0x0D02, 0x0D03),
    (0x0D3E, 0x0D40),
];

pub(crate) const L: &[Range] = &[(0x1100, 0x115F), (0xA960, 0xA97C)];
pub(crate) const V: &[Range] = &[(0x1160, 0x11A7), (0xD7B0, 0xD7C6)];
pub(crate) const T: &[Range] = &[(0x11A8, 0x11FF), (0xD7CB, 0xD7FB)];

/// Hangul LV/LVT syllable blocks are computed arithmetically (see
/// `hangul_syllable_kind`) rather than tabulated, following the standard's
/// own algorithmic definition.
pub(crate) const SYLLABLE_BASE: u32 = 0xAC00;
pub(crate) const SYLLABLE_END: u32 = 0xD7A3;
pub(crate) const T_COUNT: u32 = 28;

pub(crate) fn hangul_syllable_kind(ch: u32) -> Option<GraphemeBreak> {
    if !(SYLLABLE_BASE..=SYLLABLE_END).contains(&ch) {
        return None;
    }
    let s_index = ch - SYLLABLE_BASE;
    if s_index % T_COUNT == 0 {
        Some(GraphemeBreak::LV)
    } else {
        Some(GraphemeBreak::LVT)
    }
}
