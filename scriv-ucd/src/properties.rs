//! Extended_Pictographic ranges, curated subset covering the common emoji
//! blocks referenced by GB11 (ZWJ sequences) and East Asian Width emoji
//! handling in `scriv_core::char`.

type Range = (u32, u32);

const EXTENDED_PICTOGRAPHIC: &[Range] = &[
    (0x00A9, 0x00A9),
    (0x00AE, 0x00AE),
    (0x203C, 0x203C),
    (0x2049, 0x2049),
    (0x2122, 0x2122),
    (0x2139, 0x2139),
    (0x2194, 0x21AA),
    (0x231A, 0x231B),
    (0x2328, 0x2328),
    (0x23E9, 0x23FA),
    (0x24C2, 0x24C2),
    (0x25AA, 0x25FE),
    (0x2600, 0x27BF),
    (0x2934, 0x2935),
    (0x2B00, 0x2BFF),
    (0x3030, 0x3030),
    (0x303D, 0x303D),
    (0x3297, 0x3299),
    (0x1F000, 0x1F0FF),
    (0x1F100, 0x1F1FF), // includes regional indicators; GB12/13 take priority
    (0x1F200, 0x1F2FF),
    (0x1F300, 0x1F5FF),
    (0x1F600, 0x1F64F),
    (0x1F680, 0x1F6FF),
    (0x1F700, 0x1F7FF),
    (0x1F900, 0x1F9FF),
    (0x1FA00, 0x1FAFF),
];

pub(crate) fn is_extended_pictographic(ch: char) -> bool {
    let ch = ch as u32;
    EXTENDED_PICTOGRAPHIC
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
