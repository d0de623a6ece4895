/// Grapheme_Cluster_Break property values, as used by UAX #29.
/// `Any` stands in for the table's default (no special break behavior).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum GraphemeBreak {
    CR = 0,
    LF,
    Control,
    Extend,
    ZWJ,
    RegionalIndicator,
    Prepend,
    SpacingMark,
    L,
    V,
    T,
    LV,
    LVT,
    Any,
}

/// Binary Unicode properties consulted outside of Grapheme_Cluster_Break.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Property {
    ExtendedPictographic,
}

impl Property {
    pub fn check(&self, ch: char) -> bool {
        match self {
            Property::ExtendedPictographic => crate::properties::is_extended_pictographic(ch),
        }
    }
}
