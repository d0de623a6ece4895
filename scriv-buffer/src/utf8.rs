//! Byte-level UTF-8 decoding and UAX #29 grapheme boundary classification
//! over raw byte slices, used by [`crate::grapheme_iterator::GraphemeIterator`]
//! to walk a [`crate::PieceTable`] without ever materializing it as a `String`.

use scriv_ucd::{grapheme_break, GraphemeBreak, Property};

/// Decode the codepoint starting at the front of `bytes`. Returns the
/// decoded `char` and its length in bytes. Malformed sequences decode as
/// `\u{FFFD}` consuming exactly one byte, so callers always make forward
/// progress even over corrupt input.
pub(crate) fn decode_utf8(bytes: &[u8]) -> Option<(char, usize)> {
    let &first = bytes.first()?;

    let len = utf8_len(first);
    if len == 1 {
        return Some((first as char, 1));
    }

    if bytes.len() < len {
        return Some(('\u{FFFD}', 1));
    }

    match std::str::from_utf8(&bytes[..len]) {
        Ok(s) => s.chars().next().map(|c| (c, len)),
        Err(_) => Some(('\u{FFFD}', 1)),
    }
}

/// Decode the codepoint ending at the back of `bytes`, scanning backward
/// for its lead byte.
pub(crate) fn decode_utf8_rev(bytes: &[u8]) -> Option<(char, usize)> {
    if bytes.is_empty() {
        return None;
    }

    let max_back = bytes.len().min(4);
    for back in 1..=max_back {
        let start = bytes.len() - back;
        let b = bytes[start];
        if is_continuation(b) {
            continue;
        }
        return decode_utf8(&bytes[start..]).map(|(c, len)| {
            if len == back {
                (c, len)
            } else {
                // lead byte claimed a length inconsistent with how far back
                // we scanned; the sequence is malformed, treat as one byte
                ('\u{FFFD}', 1)
            }
        });
    }

    Some(('\u{FFFD}', 1))
}

fn is_continuation(b: u8) -> bool {
    b & 0b1100_0000 == 0b1000_0000
}

fn utf8_len(lead: u8) -> usize {
    if lead & 0x80 == 0 {
        1
    } else if lead & 0xE0 == 0xC0 {
        2
    } else if lead & 0xF0 == 0xE0 {
        3
    } else if lead & 0xF8 == 0xF0 {
        4
    } else {
        1
    }
}

/// Incremental UAX #29 grapheme-boundary state, carried while scanning
/// codepoints in one direction. The single-pair rules (GB3-GB9b) need only
/// the previous codepoint's break property; GB11 and GB12/13 need the two
/// bits of run state tracked here.
#[derive(Debug, Clone, Copy)]
pub(crate) struct GraphemeBreakState {
    prev: Option<GraphemeBreak>,
    ri_run_odd: bool,
    pictographic_run: bool,
}

impl GraphemeBreakState {
    pub fn new() -> GraphemeBreakState {
        GraphemeBreakState {
            prev: None,
            ri_run_odd: false,
            pictographic_run: false,
        }
    }

    /// Feed the next codepoint. Returns whether a grapheme boundary falls
    /// immediately before it (always `true` for the first codepoint fed).
    pub fn advance(&mut self, ch: char) -> bool {
        let prop = grapheme_break(ch);
        let is_pictographic = Property::ExtendedPictographic.check(ch);

        let is_boundary = match self.prev {
            None => true,
            Some(prev) => !no_break(prev, prop, self.ri_run_odd, self.pictographic_run, is_pictographic),
        };

        self.ri_run_odd = match prop {
            GraphemeBreak::RegionalIndicator => !self.ri_run_odd,
            _ => false,
        };

        self.pictographic_run = if is_pictographic {
            true
        } else {
            matches!(prop, GraphemeBreak::Extend | GraphemeBreak::ZWJ) && self.pictographic_run
        };

        self.prev = Some(prop);
        is_boundary
    }
}

impl Default for GraphemeBreakState {
    fn default() -> Self {
        GraphemeBreakState::new()
    }
}

fn no_break(
    prev: GraphemeBreak,
    next: GraphemeBreak,
    ri_run_odd: bool,
    pictographic_run: bool,
    next_is_pictographic: bool,
) -> bool {
    use GraphemeBreak::*;

    if matches!((prev, next), (CR, LF)) {
        return true; // GB3
    }
    if matches!(prev, Control | CR | LF) {
        return false; // GB4
    }
    if matches!(next, Control | CR | LF) {
        return false; // GB5
    }
    if matches!(prev, L) && matches!(next, L | V | LV | LVT) {
        return true; // GB6
    }
    if matches!(prev, LV | V) && matches!(next, V | T) {
        return true; // GB7
    }
    if matches!(prev, LVT | T) && matches!(next, T) {
        return true; // GB8
    }
    if matches!(next, Extend | ZWJ) {
        return true; // GB9
    }
    if matches!(next, SpacingMark) {
        return true; // GB9a
    }
    if matches!(prev, Prepend) {
        return true; // GB9b
    }
    if matches!(prev, ZWJ) && pictographic_run && next_is_pictographic {
        return true; // GB11
    }
    if matches!(prev, RegionalIndicator) && matches!(next, RegionalIndicator) && ri_run_odd {
        return true; // GB12/GB13
    }

    false // GB999
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn decodes_ascii() {
        assert_eq!(decode_utf8(b"abc"), Some(('a', 1)));
    }

    #[test]
    fn decodes_multibyte() {
        let bytes = "é".as_bytes();
        assert_eq!(decode_utf8(bytes), Some(('é', 2)));
        assert_eq!(decode_utf8_rev(bytes), Some(('é', 2)));
    }

    #[test]
    fn cr_lf_not_a_boundary() {
        let mut state = GraphemeBreakState::new();
        assert!(state.advance('\r'));
        assert!(!state.advance('\n'));
    }

    #[test]
    fn combining_mark_joins_base() {
        let mut state = GraphemeBreakState::new();
        assert!(state.advance('e'));
        assert!(!state.advance('\u{0301}'));
    }

    #[test]
    fn regional_indicator_pairs() {
        let mut state = GraphemeBreakState::new();
        assert!(state.advance('\u{1F1EB}')); // F
        assert!(!state.advance('\u{1F1F7}')); // R -> pairs into FR flag
        assert!(state.advance('\u{1F1E9}')); // D -> new pair starts
    }

    #[test]
    fn zwj_emoji_sequence_joins() {
        let mut state = GraphemeBreakState::new();
        assert!(state.advance('\u{1F468}')); // MAN
        assert!(!state.advance('\u{200D}')); // ZWJ
        assert!(!state.advance('\u{1F469}')); // WOMAN joins via ZWJ
    }
}
