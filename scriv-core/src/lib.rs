//! Shared value types used across the editor: key events, grapheme display
//! rendering, syntax-table lookups and byte ranges.

pub mod char;
pub mod key;
pub mod language;
pub mod range;

pub use char::{
    display_width, grapheme_category, is_word_break, is_word_break_end, render_grapheme,
    DisplayOptions, GraphemeCategory, Rendered, SpecialChar,
};
pub use key::Key;
pub use language::LanguageDefinition;
pub use range::Range;
