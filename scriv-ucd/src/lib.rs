mod enums;
mod grapheme_break;
mod properties;

pub use enums::{GraphemeBreak, Property};

/// Classify `ch` per the Grapheme_Cluster_Break property (UAX #29 table 1a).
/// ASCII is special-cased since it dominates real input and the general
/// table search would otherwise pay a binary search for every byte.
pub fn grapheme_break(ch: char) -> GraphemeBreak {
    let code = ch as u32;

    if code < 0x80 {
        return match code {
            0x0D => GraphemeBreak::CR,
            0x0A => GraphemeBreak::LF,
            0x00..=0x09 | 0x0B..=0x1F | 0x7F => GraphemeBreak::Control,
            _ => GraphemeBreak::Any,
        };
    }

    if let Some(kind) = grapheme_break::hangul_syllable_kind(code) {
        return kind;
    }

    if table_contains(code, grapheme_break::CONTROL) {
        return GraphemeBreak::Control;
    }
    if table_contains(code, grapheme_break::ZWJ) {
        return GraphemeBreak::ZWJ;
    }
    if table_contains(code, grapheme_break::EXTEND) {
        return GraphemeBreak::Extend;
    }
    if table_contains(code, grapheme_break::REGIONAL_INDICATOR) {
        return GraphemeBreak::RegionalIndicator;
    }
    if table_contains(code, grapheme_break::PREPEND) {
        return GraphemeBreak::Prepend;
    }
    if table_contains(code, grapheme_break::SPACING_MARK) {
        return GraphemeBreak::SpacingMark;
    }
    if table_contains(code, grapheme_break::L) {
        return GraphemeBreak::L;
    }
    if table_contains(code, grapheme_break::V) {
        return GraphemeBreak::V;
    }
    if table_contains(code, grapheme_break::T) {
        return GraphemeBreak::T;
    }

    GraphemeBreak::Any
}

fn table_contains(ch: u32, table: &[(u32, u32)]) -> bool {
    table
        .binary_search_by(|(start, end)| {
            if ch < *start {
                std::cmp::Ordering::Greater
            } else if *end < ch {
                std::cmp::Ordering::Less
            } else {
                std::cmp::Ordering::Equal
            }
        })
        .is_ok()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn ascii_fast_path() {
        assert!(matches!(grapheme_break('\r'), GraphemeBreak::CR));
        assert!(matches!(grapheme_break('\n'), GraphemeBreak::LF));
        assert!(matches!(grapheme_break('\0'), GraphemeBreak::Control));
        assert!(matches!(grapheme_break('a'), GraphemeBreak::Any));
    }

    #[test]
    fn combining_mark_is_extend() {
        assert!(matches!(grapheme_break('\u{0301}'), GraphemeBreak::Extend));
    }

    #[test]
    fn regional_indicator() {
        assert!(matches!(
            grapheme_break('\u{1F1EB}'),
            GraphemeBreak::RegionalIndicator
        ));
    }

    #[test]
    fn hangul_syllable_classification() {
        // 가 (U+AC00) is the first LV syllable (no trailing consonant)
        assert!(matches!(grapheme_break('\u{AC00}'), GraphemeBreak::LV));
        // 각 (U+AC01) has a trailing consonant -> LVT
        assert!(matches!(grapheme_break('\u{AC01}'), GraphemeBreak::LVT));
    }

    #[test]
    fn extended_pictographic_property() {
        assert!(Property::ExtendedPictographic.check('\u{1F600}'));
        assert!(!Property::ExtendedPictographic.check('a'));
    }
}
