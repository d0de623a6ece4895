//! Differential terminal renderer: maps buffer bytes to display cells with
//! tab expansion, comment/selection/search styling, and diffs each row
//! against the previous frame before writing anything.
//!
//! Diffing operates on structured [`ScreenCell`]s rather than raw ANSI
//! bytes: cell boundaries are already grapheme-aligned and style is tracked
//! out of band, so the continuation-byte and CSI-width bookkeeping spec'd
//! for a byte-level diff never comes up. Behaviorally this is the same
//! "skip unchanged rows, repaint from the first difference" algorithm.

use std::collections::{HashMap, VecDeque};

use bitflags::bitflags;
use scriv_buffer::{GraphemeIterator, PieceTable};
use scriv_core::{render_grapheme, DisplayOptions, LanguageDefinition, Rendered, Range};
use scriv_regex::Regex;

use crate::config::Config;
use crate::terminal::Terminal;

bitflags! {
    #[derive(Default)]
    pub struct Style: u8 {
        const INVERSE       = 0b0000_0001;
        const GREY          = 0b0000_0010;
        const DIM_BG        = 0b0000_0100;
        const CURRENT_MATCH = 0b0000_1000;
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScreenCell {
    pub text: String,
    pub style: Style,
}

impl ScreenCell {
    fn blank() -> ScreenCell {
        ScreenCell { text: " ".to_string(), style: Style::empty() }
    }

    fn continuation() -> ScreenCell {
        ScreenCell { text: String::new(), style: Style::empty() }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

#[derive(Debug, Clone)]
struct LineAnalysis {
    /// Absolute byte ranges, within the line, rendered in the comment color.
    spans: Vec<(usize, usize)>,
    ends_in_block: bool,
}

pub enum SearchPattern {
    Literal(Vec<u8>),
    Regex(Regex),
}

pub struct SearchHighlight {
    pub pattern: SearchPattern,
}

impl SearchHighlight {
    /// Non-overlapping matches within `[start, end)` of `pt`, as absolute
    /// byte ranges.
    fn matches_in(&self, pt: &PieceTable, start: usize, end: usize) -> Vec<(usize, usize)> {
        if start >= end {
            return Vec::new();
        }
        let bytes = pt.get_range(start, end - start);
        let mut out = Vec::new();
        match &self.pattern {
            SearchPattern::Regex(re) => {
                for m in re.find_iter(&bytes) {
                    out.push((start + m.start, start + m.end));
                }
            }
            SearchPattern::Literal(needle) => {
                if needle.is_empty() {
                    return out;
                }
                let mut i = 0;
                while i + needle.len() <= bytes.len() {
                    if &bytes[i..i + needle.len()] == needle.as_slice() {
                        out.push((start + i, start + i + needle.len()));
                        i += needle.len();
                    } else {
                        i += 1;
                    }
                }
            }
        }
        out
    }
}

#[derive(Debug, Clone, Default)]
pub struct StatusFields {
    pub filename: Option<String>,
    pub read_only: bool,
    pub modified: bool,
    pub line: usize,
    pub col: usize,
    pub encoding_label: String,
    pub overwrite: bool,
    pub transient_message: Option<String>,
}

pub struct View {
    pub top_line: usize,
    pub top_col: usize,
    pub cursor_x: usize,
    pub cursor_y: usize,
    viewport: Viewport,

    prev_screen: Vec<Vec<ScreenCell>>,
    prev_status: Vec<ScreenCell>,
    needs_full_redraw: bool,
    status_bar_dirty: bool,

    block_comment_cache: HashMap<usize, bool>,
    comment_cache_order: VecDeque<usize>,
    line_analysis_cache: HashMap<usize, LineAnalysis>,
    line_width_cache: Vec<Option<usize>>,
    last_modification_count: u64,
}

impl View {
    pub fn new(viewport: Viewport) -> View {
        View {
            top_line: 0,
            top_col: 0,
            cursor_x: 0,
            cursor_y: 0,
            prev_screen: vec![Vec::new(); viewport.height.saturating_sub(1)],
            prev_status: Vec::new(),
            needs_full_redraw: true,
            status_bar_dirty: true,
            block_comment_cache: HashMap::new(),
            comment_cache_order: VecDeque::new(),
            line_analysis_cache: HashMap::new(),
            line_width_cache: vec![None; 128],
            last_modification_count: u64::MAX,
            viewport,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn mark_full_redraw(&mut self) {
        self.needs_full_redraw = true;
        self.status_bar_dirty = true;
    }

    pub fn mark_status_dirty(&mut self) {
        self.status_bar_dirty = true;
    }

    /// Resize the viewport, forcing a full redraw (teacher's `View::clear`
    /// equivalent — no attempt to preserve partial content across a resize).
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.prev_screen = vec![Vec::new(); viewport.height.saturating_sub(1)];
        self.line_width_cache = vec![None; self.line_width_cache.len()];
        self.mark_full_redraw();
    }

    /// Shift `top_line` by `delta` lines (negative scrolls up), invalidating
    /// the line-width cache entries that no longer correspond to the same
    /// file line and requesting a targeted redraw via `mark_full_redraw`
    /// when the shift is too large to reuse the previous frame profitably.
    pub fn scroll_viewport(&mut self, delta: isize) {
        if delta == 0 {
            return;
        }
        let height = self.viewport.height.saturating_sub(1).max(1);
        if delta.unsigned_abs() >= height / 2 {
            self.top_line = self.top_line.saturating_add_signed(delta);
            self.mark_full_redraw();
            return;
        }

        self.top_line = self.top_line.saturating_add_signed(delta);
        let shift = delta as i64;
        self.prev_screen.rotate_shift(shift);
        self.line_width_cache.rotate_shift(shift);
    }

    fn line_num_width(&self, config: &Config) -> usize {
        if config.line_numbers {
            digits(self.top_line + self.viewport.height) + 2
        } else {
            0
        }
    }

    /// Resolve `cursor_byte_pos` to a display line/column, scroll the
    /// viewport so it stays visible, and update `cursor_x`/`cursor_y`
    /// accordingly. Must run before the per-row render loop so that a
    /// vertical scroll is reflected in the rows actually drawn this frame.
    fn sync_cursor(&mut self, pt: &PieceTable, cursor_byte_pos: usize, opts: &DisplayOptions, config: &Config) {
        let line = pt.find_line_by_pos(cursor_byte_pos);
        let line_start = pt.get_line_start(line).unwrap_or(0);
        let col = display_column(pt, line_start, cursor_byte_pos, opts);

        let content_height = self.viewport.height.saturating_sub(1).max(1);
        if line < self.top_line {
            self.scroll_viewport(line as isize - self.top_line as isize);
        } else if line >= self.top_line + content_height {
            self.scroll_viewport(line as isize - (self.top_line + content_height - 1) as isize);
        }

        let visible_width = self.viewport.width.saturating_sub(self.line_num_width(config)).max(1);
        if col < self.top_col {
            self.top_col = col;
            self.mark_full_redraw();
        } else if col >= self.top_col + visible_width {
            self.top_col = col - visible_width + 1;
            self.mark_full_redraw();
        }

        self.cursor_x = col;
        self.cursor_y = line - self.top_line;
    }

    fn invalidate_caches_if_modified(&mut self, modification_count: u64) {
        if modification_count != self.last_modification_count {
            self.block_comment_cache.clear();
            self.comment_cache_order.clear();
            self.line_analysis_cache.clear();
            self.line_width_cache.fill(None);
            self.last_modification_count = modification_count;
        }
    }

    fn comment_cache_insert(&mut self, config: &Config, line: usize, ends_in_block: bool) {
        if !self.block_comment_cache.contains_key(&line) {
            self.comment_cache_order.push_back(line);
            if self.comment_cache_order.len() > config.comment_cache_lines {
                if let Some(evict) = self.comment_cache_order.pop_front() {
                    self.block_comment_cache.remove(&evict);
                    self.line_analysis_cache.remove(&evict);
                }
            }
        }
        self.block_comment_cache.insert(line, ends_in_block);
    }

    fn starts_in_block(&self, pt: &PieceTable, lang: &LanguageDefinition, line: usize) -> bool {
        if line == 0 {
            return false;
        }
        if let Some(&ends) = self.block_comment_cache.get(&(line - 1)) {
            return ends;
        }
        // Fallback: scan from the start of the buffer. Bounded by caller's
        // usage (first visible line only), so this degrading to O(n) on a
        // cold cache matches the "LineIndex rebuild degrades to O(n)
        // fallback" policy rather than surfacing an error.
        let mut in_block = false;
        for l in 0..line {
            let (start, end) = match pt.get_line_range(l) {
                Some(r) => r,
                None => break,
            };
            let text = pt.get_range(start, end - start);
            in_block = analyze_line(&text, start, lang, in_block).ends_in_block;
        }
        in_block
    }

    fn line_analysis(
        &mut self,
        pt: &PieceTable,
        lang: &LanguageDefinition,
        line: usize,
        config: &Config,
    ) -> LineAnalysis {
        if let Some(cached) = self.line_analysis_cache.get(&line) {
            return cached.clone();
        }
        let (start, end) = pt.get_line_range(line).unwrap_or((pt.len(), pt.len()));
        let text = pt.get_range(start, end - start);
        let starts_in_block = self.starts_in_block(pt, lang, line);
        let analysis = analyze_line(&text, start, lang, starts_in_block);
        self.comment_cache_insert(config, line, analysis.ends_in_block);
        self.line_analysis_cache.insert(line, analysis.clone());
        analysis
    }

    /// Render one frame. Returns the number of bytes written to `terminal`
    /// (zero when nothing changed since the last call, satisfying render
    /// idempotence).
    #[allow(clippy::too_many_arguments)]
    pub fn render(
        &mut self,
        pt: &PieceTable,
        terminal: &mut dyn Terminal,
        lang: &LanguageDefinition,
        cursor_byte_pos: usize,
        selection: Option<Range>,
        search: Option<&SearchHighlight>,
        status: &StatusFields,
        config: &Config,
    ) -> std::io::Result<usize> {
        self.invalidate_caches_if_modified(pt.modification_count());

        let opts = DisplayOptions { tabstop: config.tabstop };
        self.sync_cursor(pt, cursor_byte_pos, &opts, config);

        let line_num_width = self.line_num_width(config);
        let visible_width = self.viewport.width.saturating_sub(line_num_width);
        let content_height = self.viewport.height.saturating_sub(1);

        let mut written = 0usize;

        for row in 0..content_height {
            let file_line = self.top_line + row;
            let cells = self.render_line_cells(
                pt, lang, file_line, line_num_width, visible_width, cursor_byte_pos, selection,
                search, &opts, config,
            );

            if !self.needs_full_redraw && self.prev_screen.get(row) == Some(&cells) {
                continue;
            }

            let first_diff = if self.needs_full_redraw {
                0
            } else {
                first_difference(self.prev_screen.get(row), &cells)
            };

            terminal.move_cursor(self.viewport.y + row, self.viewport.x + first_diff)?;
            for cell in &cells[first_diff..] {
                written += write_cell(terminal, cell)?;
            }
            if self.prev_screen.len() <= row {
                self.prev_screen.resize(row + 1, Vec::new());
            }
            self.prev_screen[row] = cells;
        }

        written += self.render_status_bar(terminal, status, config)?;

        let cursor_col = self.viewport.x + line_num_width
            + self.cursor_x.saturating_sub(self.top_col).min(visible_width.saturating_sub(1));
        terminal.move_cursor(self.viewport.y + self.cursor_y, cursor_col)?;
        terminal.show_cursor()?;

        self.needs_full_redraw = false;
        Ok(written)
    }

    #[allow(clippy::too_many_arguments)]
    fn render_line_cells(
        &mut self,
        pt: &PieceTable,
        lang: &LanguageDefinition,
        file_line: usize,
        line_num_width: usize,
        visible_width: usize,
        cursor_byte_pos: usize,
        selection: Option<Range>,
        search: Option<&SearchHighlight>,
        opts: &DisplayOptions,
        config: &Config,
    ) -> Vec<ScreenCell> {
        let mut cells = Vec::with_capacity(line_num_width + visible_width);

        if line_num_width > 0 {
            let label = if pt.get_line_range(file_line).is_some() {
                format!("{:>width$}  ", file_line + 1, width = line_num_width - 2)
            } else {
                " ".repeat(line_num_width)
            };
            for ch in label.chars() {
                cells.push(ScreenCell { text: ch.to_string(), style: Style::GREY });
            }
        }

        let Some((start, end)) = pt.get_line_range(file_line) else {
            cells.resize(line_num_width + visible_width, ScreenCell::blank());
            return cells;
        };

        let analysis = self.line_analysis(pt, lang, file_line, config);
        let matches = search.map(|s| s.matches_in(pt, start, end)).unwrap_or_default();

        let mut glyphs: Vec<(usize, usize, Rendered, Style)> = Vec::new();
        let mut iter = GraphemeIterator::new(pt, start);
        let mut col = 0usize;
        while iter.pos() < end {
            let Some(g) = iter.next() else { break };
            if g.start >= end {
                break;
            }
            let rendered = render_grapheme(&g, col, opts);
            let width = rendered_width(&rendered);

            let mut style = Style::empty();
            if analysis.spans.iter().any(|(s, e)| g.start >= *s && g.start < *e) {
                style |= Style::GREY;
            }
            if let Some(sel) = selection {
                if sel.contains(g.start) {
                    style |= Style::INVERSE;
                }
            }
            if let Some((mstart, mend)) = matches.iter().find(|(s, e)| g.start >= *s && g.start < *e) {
                if *mstart < cursor_byte_pos && cursor_byte_pos <= *mend {
                    style |= Style::CURRENT_MATCH;
                } else {
                    style |= Style::INVERSE;
                }
            }

            glyphs.push((col, width, rendered, style));
            col += width;
        }

        for (start_col, width, rendered, style) in glyphs {
            if start_col + width <= self.top_col || start_col >= self.top_col + visible_width {
                continue;
            }
            let text = rendered_text(&rendered);
            let visible_col = start_col.saturating_sub(self.top_col);
            while cells.len() < line_num_width + visible_col {
                cells.push(ScreenCell::blank());
            }
            cells.push(ScreenCell { text, style });
            for _ in 1..width {
                cells.push(ScreenCell::continuation());
            }
        }

        cells.resize(line_num_width + visible_width, ScreenCell::blank());
        cells.truncate(line_num_width + visible_width);
        cells
    }

    fn render_status_bar(
        &mut self,
        terminal: &mut dyn Terminal,
        status: &StatusFields,
        _config: &Config,
    ) -> std::io::Result<usize> {
        let width = self.viewport.width;
        let row = self.viewport.y + self.viewport.height - 1;

        let text = if let Some(msg) = &status.transient_message {
            pad_to_width(msg, width)
        } else {
            let left = format!(
                " {}{}{}",
                if status.modified { "*" } else { " " },
                if status.read_only { "[RO] " } else { "" },
                status.filename.as_deref().unwrap_or("*scratch*"),
            );
            let right = format!(
                "L{} C{}  {} {} ",
                status.line,
                status.col,
                status.encoding_label,
                if status.overwrite { "[OVR]" } else { "" },
            );
            join_status(&left, &right, width)
        };

        let cells: Vec<ScreenCell> = text
            .chars()
            .take(width)
            .map(|ch| ScreenCell { text: ch.to_string(), style: Style::INVERSE })
            .collect();

        if !self.status_bar_dirty && self.prev_status == cells {
            return Ok(0);
        }

        terminal.move_cursor(row, self.viewport.x)?;
        let mut written = 0;
        for cell in &cells {
            written += write_cell(terminal, cell)?;
        }
        self.prev_status = cells;
        self.status_bar_dirty = false;
        Ok(written)
    }
}

fn analyze_line(
    text: &[u8],
    absolute_start: usize,
    lang: &LanguageDefinition,
    starts_in_block: bool,
) -> LineAnalysis {
    let mut spans = Vec::new();
    let mut in_block = starts_in_block;
    let mut block_start = if in_block { Some(absolute_start) } else { None };
    let mut i = 0;

    while i < text.len() {
        if in_block {
            if let Some((_, close)) = lang.block_comment {
                if text[i..].starts_with(close.as_bytes()) {
                    i += close.len();
                    spans.push((block_start.unwrap(), absolute_start + i));
                    in_block = false;
                    block_start = None;
                    continue;
                }
            }
            i += 1;
            continue;
        }

        if let Some((open, _)) = lang.block_comment {
            if text[i..].starts_with(open.as_bytes()) {
                in_block = true;
                block_start = Some(absolute_start + i);
                i += open.len();
                continue;
            }
        }

        if let Some(lc) = lang.line_comment {
            if text[i..].starts_with(lc.as_bytes()) {
                spans.push((absolute_start + i, absolute_start + text.len()));
                break;
            }
        }

        i += 1;
    }

    if in_block {
        spans.push((block_start.unwrap(), absolute_start + text.len()));
    }

    LineAnalysis { spans, ends_in_block: in_block }
}

/// Display column of `byte_pos` within the line starting at `line_start`,
/// found by expanding graphemes (with tab stops) up to that byte offset.
fn display_column(pt: &PieceTable, line_start: usize, byte_pos: usize, opts: &DisplayOptions) -> usize {
    let mut iter = GraphemeIterator::new(pt, line_start);
    let mut col = 0usize;
    while iter.pos() < byte_pos {
        let Some(g) = iter.next() else { break };
        if g.start >= byte_pos {
            break;
        }
        let rendered = render_grapheme(&g, col, opts);
        col += rendered_width(&rendered);
    }
    col
}

fn rendered_width(r: &Rendered) -> usize {
    match r {
        Rendered::Normal { width, .. } => *width,
        Rendered::Tab { width } => *width,
        Rendered::Control { .. } => 2,
        Rendered::Special { width, .. } => *width,
    }
}

fn rendered_text(r: &Rendered) -> String {
    match r {
        Rendered::Normal { text, .. } => text.clone(),
        Rendered::Tab { width } => {
            let mut s = String::from("\u{bb}");
            for _ in 1..*width {
                s.push(' ');
            }
            s
        }
        Rendered::Control { caret } => caret.to_string(),
        Rendered::Special { .. } => " ".to_string(),
    }
}

fn first_difference(prev: Option<&Vec<ScreenCell>>, next: &[ScreenCell]) -> usize {
    match prev {
        None => 0,
        Some(prev) => prev
            .iter()
            .zip(next.iter())
            .position(|(a, b)| a != b)
            .unwrap_or_else(|| prev.len().min(next.len())),
    }
}

fn write_cell(terminal: &mut dyn Terminal, cell: &ScreenCell) -> std::io::Result<usize> {
    let mut n = 0;
    if cell.style.contains(Style::CURRENT_MATCH) {
        terminal.write(b"\x1b[43m")?;
        n += 5;
    } else if cell.style.contains(Style::INVERSE) {
        terminal.write(b"\x1b[7m")?;
        n += 4;
    }
    if cell.style.contains(Style::GREY) {
        terminal.write(b"\x1b[90m")?;
        n += 5;
    }
    if cell.style.contains(Style::DIM_BG) {
        terminal.write(b"\x1b[2m")?;
        n += 4;
    }
    terminal.write(cell.text.as_bytes())?;
    n += cell.text.len();
    terminal.write(b"\x1b[m")?;
    n += 3;
    Ok(n)
}

fn digits(n: usize) -> usize {
    n.to_string().len().max(2)
}

fn pad_to_width(s: &str, width: usize) -> String {
    let len = s.chars().count();
    if len >= width {
        s.chars().take(width).collect()
    } else {
        format!("{s}{}", " ".repeat(width - len))
    }
}

fn join_status(left: &str, right: &str, width: usize) -> String {
    let left_len = left.chars().count();
    let right_len = right.chars().count();
    if left_len + right_len >= width {
        return pad_to_width(left, width);
    }
    format!("{left}{}{right}", " ".repeat(width - left_len - right_len))
}

trait RotateShift<T> {
    fn rotate_shift(&mut self, delta: i64);
}

impl<T: Clone + Default> RotateShift<T> for Vec<T> {
    /// Shift elements by `delta` (positive = scroll down, content moves up),
    /// filling revealed entries with the default value.
    fn rotate_shift(&mut self, delta: i64) {
        let len = self.len();
        if len == 0 || delta == 0 {
            return;
        }
        let shift = delta.unsigned_abs() as usize % len.max(1);
        if delta > 0 {
            self.rotate_left(shift);
            for slot in &mut self[len - shift..] {
                *slot = T::default();
            }
        } else {
            self.rotate_right(shift);
            for slot in &mut self[..shift] {
                *slot = T::default();
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn s6_wide_char_advances_cursor_by_two_columns() {
        let pt = PieceTable::from_bytes("あいう".as_bytes().to_vec());
        let opts = DisplayOptions::default();
        let mut iter = GraphemeIterator::new(&pt, 0);
        let mut col = 0;
        let mut cols = vec![col];
        while let Some(g) = iter.next() {
            let rendered = render_grapheme(&g, col, &opts);
            col += rendered_width(&rendered);
            cols.push(col);
        }
        assert_eq!(cols, vec![0, 2, 4, 6]);
    }

    #[test]
    fn comment_span_covers_line_comment_to_eol() {
        let lang = scriv_core::language::by_extension("rs").unwrap();
        let analysis = analyze_line(b"let x = 1; // comment", 0, lang, false);
        assert_eq!(analysis.spans, vec![(11, 21)]);
        assert!(!analysis.ends_in_block);
    }

    #[test]
    fn block_comment_spans_multiple_lines() {
        let lang = scriv_core::language::by_extension("rs").unwrap();
        let first = analyze_line(b"/* start", 0, lang, false);
        assert!(first.ends_in_block);
        let second = analyze_line(b"end */ code", 9, lang, true);
        assert!(!second.ends_in_block);
        assert_eq!(second.spans, vec![(9, 15)]);
    }

    #[test]
    fn literal_search_is_non_overlapping() {
        let pt = PieceTable::from_bytes(b"ababab".to_vec());
        let hl = SearchHighlight { pattern: SearchPattern::Literal(b"ab".to_vec()) };
        assert_eq!(hl.matches_in(&pt, 0, 6), vec![(0, 2), (2, 4), (4, 6)]);
    }
}
