//! Grapheme categorization and display rendering: tab expansion, control-char
//! caret notation, and the handful of codepoints the view treats specially.

use scriv_buffer::Grapheme;

/// Coarse classification used by word-motion operations (`Alt-F`/`Alt-B`/`Alt-D`).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GraphemeCategory {
    Eol,
    Whitespace,
    Word,
    Punctuation,
    ControlCode,
    #[default]
    Unknown,
}

impl GraphemeCategory {
    pub fn is_word(&self) -> bool {
        matches!(self, GraphemeCategory::Word)
    }
}

pub fn grapheme_category(grapheme: &Grapheme) -> GraphemeCategory {
    if grapheme.text == "\n" || grapheme.text == "\r\n" {
        return GraphemeCategory::Eol;
    }
    let Some(ch) = grapheme.text.chars().next() else {
        return GraphemeCategory::Unknown;
    };
    if ch.is_whitespace() {
        return GraphemeCategory::Whitespace;
    }
    if ch.is_alphanumeric() || ch == '_' {
        return GraphemeCategory::Word;
    }
    if ch.is_control() {
        return GraphemeCategory::ControlCode;
    }
    if ch.is_ascii() {
        return GraphemeCategory::Punctuation;
    }
    GraphemeCategory::Unknown
}

/// A boundary where `prev != next` and `next` is a word category — the start
/// of a word for forward word motion.
pub fn is_word_break(prev: GraphemeCategory, next: GraphemeCategory) -> bool {
    prev != next && next.is_word()
}

/// The corresponding end-of-word boundary, used by backward word motion.
pub fn is_word_break_end(prev: GraphemeCategory, next: GraphemeCategory) -> bool {
    prev != next && prev.is_word()
}

#[derive(Debug, Clone)]
pub struct DisplayOptions {
    pub tabstop: u8,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        DisplayOptions { tabstop: 8 }
    }
}

/// How a single grapheme cluster should be shown on screen. The view is
/// responsible for turning this into actual ANSI-wrapped bytes; this only
/// decides the codepoint(s)/column span.
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    /// Shown as-is; `width` is its display width (1 or 2 for CJK/emoji).
    Normal { text: String, width: usize },
    /// A tab, expanded to the next tab stop. First cell is `»`, the rest fill
    /// cells, both grey per the view's rendering rules.
    Tab { width: usize },
    /// A C0 control byte or DEL, shown as `^X` in grey, 2 columns wide.
    Control { caret: &'static str },
    /// U+00A0 / U+3000 and similar codepoints the view gives distinct
    /// backgrounds or glyphs to.
    Special { kind: SpecialChar, width: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialChar {
    NonBreakingSpace,
    IdeographicSpace,
}

/// Display width of a grapheme cluster per East Asian Width / UAX #29:
/// combining marks and ZWJ contribute 0, C0/DEL contribute 0 (the view draws
/// `^X` itself, 2 columns), CJK/emoji contribute 2, everything else 1.
pub fn display_width(grapheme: &Grapheme) -> usize {
    match grapheme.text.chars().next() {
        Some(ch) if ch.is_ascii_control() => 0,
        _ => grapheme.width().max(if grapheme.text.is_empty() { 0 } else { 1 }),
    }
}

/// Decide how to render `grapheme`, whose first visible cell would land at
/// display column `column` (used to compute tab-stop width).
pub fn render_grapheme(grapheme: &Grapheme, column: usize, options: &DisplayOptions) -> Rendered {
    let Some(ch) = grapheme.text.chars().next() else {
        return Rendered::Normal { text: String::new(), width: 0 };
    };

    if ch == '\t' {
        let tabstop = options.tabstop.max(1) as usize;
        let width = tabstop - (column % tabstop);
        return Rendered::Tab { width };
    }

    if ch.is_ascii_control() || ch == '\u{7f}' {
        return Rendered::Control { caret: caret_notation(ch) };
    }

    if ch == '\u{00a0}' {
        return Rendered::Special { kind: SpecialChar::NonBreakingSpace, width: 1 };
    }

    if ch == '\u{3000}' {
        return Rendered::Special { kind: SpecialChar::IdeographicSpace, width: 2 };
    }

    Rendered::Normal { text: grapheme.text.clone(), width: display_width(grapheme) }
}

fn caret_notation(ch: char) -> &'static str {
    const NAMES: [&str; 33] = [
        "^@", "^A", "^B", "^C", "^D", "^E", "^F", "^G", "^H", "^I", "^J", "^K", "^L", "^M", "^N",
        "^O", "^P", "^Q", "^R", "^S", "^T", "^U", "^V", "^W", "^X", "^Y", "^Z", "^[", "^\\", "^]",
        "^^", "^_", "^?",
    ];
    let byte = ch as u32;
    if byte == 0x7f {
        return NAMES[32];
    }
    if byte <= 0x1f {
        return NAMES[byte as usize];
    }
    "^?"
}

#[cfg(test)]
mod test {
    use super::*;

    fn grapheme(text: &str) -> Grapheme {
        Grapheme { start: 0, end: text.len(), text: text.to_string() }
    }

    #[test]
    fn tab_expands_to_next_stop() {
        let g = grapheme("\t");
        let opts = DisplayOptions::default();
        match render_grapheme(&g, 3, &opts) {
            Rendered::Tab { width } => assert_eq!(width, 5),
            other => panic!("expected Tab, got {other:?}"),
        }
    }

    #[test]
    fn null_byte_is_caret_at() {
        let g = grapheme("\0");
        match render_grapheme(&g, 0, &DisplayOptions::default()) {
            Rendered::Control { caret } => assert_eq!(caret, "^@"),
            other => panic!("expected Control, got {other:?}"),
        }
    }

    #[test]
    fn del_is_caret_question() {
        let g = grapheme("\u{7f}");
        match render_grapheme(&g, 0, &DisplayOptions::default()) {
            Rendered::Control { caret } => assert_eq!(caret, "^?"),
            other => panic!("expected Control, got {other:?}"),
        }
    }

    #[test]
    fn ideographic_space_is_special() {
        let g = grapheme("\u{3000}");
        match render_grapheme(&g, 0, &DisplayOptions::default()) {
            Rendered::Special { kind: SpecialChar::IdeographicSpace, width } => {
                assert_eq!(width, 2)
            }
            other => panic!("expected Special, got {other:?}"),
        }
    }

    #[test]
    fn word_break_detection() {
        assert!(is_word_break(GraphemeCategory::Whitespace, GraphemeCategory::Word));
        assert!(!is_word_break(GraphemeCategory::Word, GraphemeCategory::Word));
        assert!(is_word_break_end(GraphemeCategory::Word, GraphemeCategory::Whitespace));
    }
}
