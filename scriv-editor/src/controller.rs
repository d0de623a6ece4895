//! Key dispatch and editing primitives. The controller is the sole owner of
//! the [`PieceTable`]; the view only ever borrows it for rendering.

use std::path::{Path, PathBuf};

use scriv_buffer::PieceTable;
use scriv_core::{grapheme_category, is_word_break, is_word_break_end, language, GraphemeCategory, Key, LanguageDefinition, Range};
use scriv_regex::Regex;

use crate::config::Config;
use crate::error::{EditorError, Result};
use crate::kill_ring::KillRing;
use crate::mode::{FilenamePurpose, Mode};
use crate::terminal::Terminal;
use crate::undo::{Op, UndoEntry, UndoLog};
use crate::view::{SearchHighlight, SearchPattern, StatusFields, View, Viewport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchDirection {
    Forward,
    Backward,
}

pub struct Controller {
    buffer: PieceTable,
    view: View,
    kill_ring: KillRing,
    undo: UndoLog,
    config: Config,
    language: &'static LanguageDefinition,

    filename: Option<PathBuf>,
    read_only: bool,
    cursor_pos: usize,
    mark: Option<usize>,
    mode: Mode,
    mini_buffer: String,
    transient_message: Option<String>,

    last_search: Option<String>,
    search_start_pos: usize,
    search_direction: SearchDirection,

    quit_requested: bool,
}

impl Controller {
    pub fn new(config: Config, viewport: Viewport) -> Controller {
        Controller {
            buffer: PieceTable::empty(),
            view: View::new(viewport),
            kill_ring: KillRing::new(),
            undo: UndoLog::new(config.max_undo_entries),
            language: language::plain_text(),
            config,
            filename: None,
            read_only: false,
            cursor_pos: 0,
            mark: None,
            mode: Mode::Normal,
            mini_buffer: String::new(),
            transient_message: None,
            last_search: None,
            search_start_pos: 0,
            search_direction: SearchDirection::Forward,
            quit_requested: false,
        }
    }

    pub fn open(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.buffer = crate::file_io::load(path, self.config.big_file_threshold_bytes)?;
        self.language = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(language::by_extension)
            .unwrap_or_else(language::plain_text);
        self.filename = Some(path.to_path_buf());
        self.cursor_pos = 0;
        self.undo = UndoLog::new(self.config.max_undo_entries);
        self.view.mark_full_redraw();
        Ok(())
    }

    pub fn should_quit(&self) -> bool {
        self.quit_requested
    }

    /// The buffer's full contents, decoded lossily. Intended for tests and
    /// diagnostics; editing paths operate on bytes via the piece table
    /// directly and never go through this.
    pub fn buffer_text(&self) -> String {
        String::from_utf8_lossy(&self.buffer.get_range(0, self.buffer.len())).into_owned()
    }

    /// Propagate a new terminal size into the view, forcing a full redraw.
    pub fn resize(&mut self, viewport: Viewport) {
        self.view.resize(viewport);
    }

    pub fn render(&mut self, terminal: &mut dyn Terminal) -> std::io::Result<usize> {
        let active_pattern = if matches!(self.mode, Mode::ISearchForward | Mode::ISearchBackward) {
            Some(self.mini_buffer.as_str())
        } else {
            self.last_search.as_deref()
        };
        let search = active_pattern
            .filter(|p| !p.is_empty())
            .map(|p| SearchHighlight { pattern: SearchPattern::Literal(p.as_bytes().to_vec()) });

        let (line, col) = self.cursor_line_col();
        let status = StatusFields {
            filename: self.filename.as_ref().map(|p| p.display().to_string()),
            read_only: self.read_only,
            modified: self.undo.is_modified(),
            line: line + 1,
            col: col + 1,
            encoding_label: match self.buffer.detected_encoding() {
                scriv_buffer::DetectedEncoding::Utf8Strict => "UTF-8".to_string(),
                scriv_buffer::DetectedEncoding::Utf8Lossy => "UTF-8 (lossy)".to_string(),
            },
            overwrite: false,
            transient_message: self.mini_buffer_status(),
        };

        self.view.render(
            &self.buffer,
            terminal,
            self.language,
            self.cursor_pos,
            self.selection_range(),
            search.as_ref(),
            &status,
            &self.config,
        )
    }

    fn mini_buffer_status(&self) -> Option<String> {
        match self.mode {
            Mode::FilenameInput(FilenamePurpose::Save) => Some(format!("Save as: {}", self.mini_buffer)),
            Mode::FilenameInput(FilenamePurpose::SaveAndQuit) => {
                Some(format!("Save as (then quit): {}", self.mini_buffer))
            }
            Mode::QuitConfirm => Some("Save changes before quitting? (y/n/c)".to_string()),
            Mode::ISearchForward => Some(format!("I-search: {}", self.mini_buffer)),
            Mode::ISearchBackward => Some(format!("I-search backward: {}", self.mini_buffer)),
            _ => self.transient_message.clone(),
        }
    }

    fn selection_range(&self) -> Option<Range> {
        self.mark.map(|m| {
            if m <= self.cursor_pos {
                Range::new(m, self.cursor_pos)
            } else {
                Range::new(self.cursor_pos, m)
            }
        })
    }

    fn cursor_line_col(&self) -> (usize, usize) {
        let line = self.buffer.find_line_by_pos(self.cursor_pos);
        let line_start = self.buffer.get_line_start(line).unwrap_or(0);
        (line, self.cursor_pos - line_start)
    }

    /// Dispatch a single key event according to the active mode.
    pub fn handle_key(&mut self, key: Key) -> Result<()> {
        self.transient_message = None;
        let result = match self.mode {
            Mode::Normal => self.handle_normal(key),
            Mode::PrefixX => self.handle_prefix_x(key),
            Mode::PrefixR => self.handle_prefix_r(key),
            Mode::QuitConfirm => self.handle_quit_confirm(key),
            Mode::FilenameInput(purpose) => self.handle_filename_input(key, purpose),
            Mode::ISearchForward => self.handle_isearch(key, SearchDirection::Forward),
            Mode::ISearchBackward => self.handle_isearch(key, SearchDirection::Backward),
        };
        if let Err(e) = &result {
            self.transient_message = Some(e.to_string());
        }
        self.view.mark_status_dirty();
        Ok(())
    }

    fn handle_normal(&mut self, key: Key) -> Result<()> {
        if key.is_printable_insert() {
            self.insert_key(key)?;
            return Ok(());
        }
        match key {
            Key::Ctrl(b'f') | Key::ArrowRight => self.move_forward_grapheme(),
            Key::Ctrl(b'b') | Key::ArrowLeft => self.move_backward_grapheme(),
            Key::Ctrl(b'n') | Key::ArrowDown => self.move_line(1),
            Key::Ctrl(b'p') | Key::ArrowUp => self.move_line(-1),
            Key::Ctrl(b'a') | Key::Home => self.move_to_line_start(),
            Key::Ctrl(b'e') | Key::End => self.move_to_line_end(),
            Key::Ctrl(b'd') | Key::Delete => self.delete_forward_grapheme(),
            Key::Backspace => self.backspace(),
            Key::Ctrl(b'k') => self.kill_line(),
            Key::Ctrl(b'w') => self.kill_region()?,
            Key::Alt(b'w') => self.copy_region(),
            Key::Ctrl(b'y') => self.yank()?,
            Key::Ctrl(b'/') => self.undo()?,
            Key::Ctrl(b'_') => self.redo()?,
            Key::Ctrl(0) => self.toggle_mark(), // Ctrl-Space decodes as NUL
            Key::Alt(b'f') => self.move_word_forward(),
            Key::Alt(b'b') => self.move_word_backward(),
            Key::Alt(b'd') => self.kill_word()?,
            Key::Ctrl(b's') => self.enter_isearch(SearchDirection::Forward),
            Key::Ctrl(b'r') => self.enter_isearch(SearchDirection::Backward),
            Key::Ctrl(b'x') => self.mode = Mode::PrefixX,
            Key::Alt(b'<') => self.cursor_pos = 0,
            Key::Alt(b'>') => self.cursor_pos = self.buffer.len(),
            Key::Enter => self.insert_bytes(b"\n")?,
            Key::Tab => self.insert_bytes(b"\t")?,
            _ => {}
        }
        Ok(())
    }

    fn handle_prefix_x(&mut self, key: Key) -> Result<()> {
        self.mode = Mode::Normal;
        match key {
            Key::Ctrl(b's') => {
                if let Some(path) = self.filename.clone() {
                    self.save_to(&path)?;
                } else {
                    self.mini_buffer.clear();
                    self.mode = Mode::FilenameInput(FilenamePurpose::Save);
                }
            }
            Key::Ctrl(b'c') => {
                if self.undo.is_modified() {
                    self.mode = Mode::QuitConfirm;
                } else {
                    self.quit_requested = true;
                }
            }
            Key::Char(b'h') => {
                self.mark = Some(0);
                self.cursor_pos = self.buffer.len();
            }
            Key::Char(b'r') => self.mode = Mode::PrefixR,
            Key::Ctrl(b'g') => {}
            _ => {}
        }
        Ok(())
    }

    fn handle_prefix_r(&mut self, key: Key) -> Result<()> {
        self.mode = Mode::Normal;
        match key {
            Key::Char(b'k') => self.kill_rectangle(),
            Key::Char(b'y') => self.yank_rectangle()?,
            Key::Ctrl(b'g') => {}
            _ => {}
        }
        Ok(())
    }

    fn handle_quit_confirm(&mut self, key: Key) -> Result<()> {
        match key {
            Key::Char(b'y') => {
                if let Some(path) = self.filename.clone() {
                    self.save_to(&path)?;
                    self.quit_requested = true;
                } else {
                    self.mini_buffer.clear();
                    self.mode = Mode::FilenameInput(FilenamePurpose::SaveAndQuit);
                    return Ok(());
                }
            }
            Key::Char(b'n') => self.quit_requested = true,
            Key::Char(b'c') | Key::Ctrl(b'g') => {}
            _ => return Ok(()),
        }
        self.mode = Mode::Normal;
        Ok(())
    }

    fn handle_filename_input(&mut self, key: Key, purpose: FilenamePurpose) -> Result<()> {
        match key {
            Key::Enter => {
                let path = PathBuf::from(self.mini_buffer.clone());
                self.mode = Mode::Normal;
                self.save_to(&path)?;
                self.filename = Some(path);
                if purpose == FilenamePurpose::SaveAndQuit {
                    self.quit_requested = true;
                }
            }
            Key::Escape | Key::Ctrl(b'g') => self.mode = Mode::Normal,
            Key::Backspace => {
                self.mini_buffer.pop();
            }
            _ if key.is_printable_insert() => {
                if let Some(ch) = key_to_char(key) {
                    self.mini_buffer.push(ch);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_isearch(&mut self, key: Key, direction: SearchDirection) -> Result<()> {
        match key {
            Key::Enter => {
                self.last_search = Some(self.mini_buffer.clone());
                self.mode = Mode::Normal;
            }
            Key::Escape | Key::Ctrl(b'g') => {
                self.cursor_pos = self.search_start_pos;
                self.mode = Mode::Normal;
            }
            Key::Backspace => {
                self.mini_buffer.pop();
                self.run_incremental_search(direction);
            }
            Key::Ctrl(b's') | Key::Ctrl(b'r') => {
                self.search_direction = direction;
                self.step_search(direction);
            }
            _ if key.is_printable_insert() => {
                if let Some(ch) = key_to_char(key) {
                    self.mini_buffer.push(ch);
                    self.run_incremental_search(direction);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn enter_isearch(&mut self, direction: SearchDirection) {
        self.search_start_pos = self.cursor_pos;
        self.search_direction = direction;
        self.mini_buffer.clear();
        self.mode = match direction {
            SearchDirection::Forward => Mode::ISearchForward,
            SearchDirection::Backward => Mode::ISearchBackward,
        };
    }

    fn run_incremental_search(&mut self, direction: SearchDirection) {
        if self.mini_buffer.is_empty() {
            self.cursor_pos = self.search_start_pos;
            return;
        }
        let needle = self.mini_buffer.as_bytes();
        let found = match direction {
            SearchDirection::Forward => self.buffer.search_forward(needle, self.search_start_pos),
            SearchDirection::Backward => self.buffer.search_backward(needle, self.search_start_pos),
        };
        if let Some((start, _end)) = found {
            self.cursor_pos = start;
        }
    }

    fn step_search(&mut self, direction: SearchDirection) {
        if self.mini_buffer.is_empty() {
            return;
        }
        let needle = self.mini_buffer.as_bytes();
        let from = match direction {
            SearchDirection::Forward => self.cursor_pos + 1,
            SearchDirection::Backward => self.cursor_pos.saturating_sub(1),
        };
        let found = match direction {
            SearchDirection::Forward => self.buffer.search_forward(needle, from),
            SearchDirection::Backward => self.buffer.search_backward(needle, from),
        };
        if let Some((start, _end)) = found {
            self.cursor_pos = start;
        }
    }

    /// Re-run the stored `last_search` as a one-shot regex search, used by
    /// callers that drive search outside of incremental mode.
    pub fn search_with_regex(&mut self, pattern: &str, from: usize) -> Result<Option<(usize, usize)>> {
        let re = Regex::new(pattern)
            .map_err(|e| EditorError::Io(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())))?;
        let bytes = self.buffer.get_range(from, self.buffer.len() - from);
        Ok(re.find_iter(&bytes).next().map(|m| (from + m.start, from + m.end)))
    }

    fn insert_key(&mut self, key: Key) -> Result<()> {
        let mut buf = [0u8; 4];
        let text: &[u8] = match key {
            Key::Char(b) => {
                buf[0] = b;
                &buf[..1]
            }
            Key::Codepoint(cp) => {
                let ch = char::from_u32(cp).unwrap_or('\u{fffd}');
                ch.encode_utf8(&mut buf).as_bytes()
            }
            _ => return Ok(()),
        };
        self.insert_bytes(text)
    }

    fn insert_bytes(&mut self, text: &[u8]) -> Result<()> {
        let pos = self.cursor_pos;
        self.buffer.insert_at(pos, text)?;
        self.undo.record_insert(pos, text, pos);
        self.cursor_pos = pos + text.len();
        Ok(())
    }

    fn delete_range(&mut self, pos: usize, len: usize) -> Vec<u8> {
        let removed = self.buffer.get_range(pos, len);
        self.buffer.delete(pos, len);
        removed
    }

    fn move_forward_grapheme(&mut self) {
        let mut iter = scriv_buffer::GraphemeIterator::new(&self.buffer, self.cursor_pos);
        if let Some(g) = iter.next() {
            self.cursor_pos = g.end;
        }
    }

    fn move_backward_grapheme(&mut self) {
        let mut iter = scriv_buffer::GraphemeIterator::new(&self.buffer, self.cursor_pos);
        if let Some(g) = iter.prev() {
            self.cursor_pos = g.start;
        }
    }

    fn move_line(&mut self, delta: isize) {
        let (line, col) = self.cursor_line_col();
        let target = line.saturating_add_signed(delta);
        if delta < 0 && line == 0 {
            return;
        }
        match self.buffer.get_line_range(target) {
            Some((start, end)) => self.cursor_pos = (start + col).min(end),
            None => self.cursor_pos = self.buffer.len(),
        }
    }

    fn move_to_line_start(&mut self) {
        let line = self.buffer.find_line_by_pos(self.cursor_pos);
        self.cursor_pos = self.buffer.get_line_start(line).unwrap_or(0);
    }

    fn move_to_line_end(&mut self) {
        self.cursor_pos = self.buffer.find_line_end_from_pos(self.cursor_pos);
    }

    fn delete_forward_grapheme(&mut self) {
        let mut iter = scriv_buffer::GraphemeIterator::new(&self.buffer, self.cursor_pos);
        if let Some(g) = iter.next() {
            let removed = self.delete_range(g.start, g.end - g.start);
            self.undo.record_delete(g.start, &removed, self.cursor_pos);
        }
    }

    fn backspace(&mut self) {
        let mut iter = scriv_buffer::GraphemeIterator::new(&self.buffer, self.cursor_pos);
        if let Some(g) = iter.prev() {
            let cursor_before = self.cursor_pos;
            let removed = self.delete_range(g.start, g.end - g.start);
            self.undo.record_delete(g.start, &removed, cursor_before);
            self.cursor_pos = g.start;
        }
    }

    fn kill_line(&mut self) {
        let end = self.buffer.find_line_end_from_pos(self.cursor_pos);
        let end = if end == self.cursor_pos {
            self.buffer.find_next_line_from_pos(self.cursor_pos)
        } else {
            end
        };
        if end == self.cursor_pos {
            return;
        }
        let removed = self.delete_range(self.cursor_pos, end - self.cursor_pos);
        self.undo.record_delete(self.cursor_pos, &removed, self.cursor_pos);
        self.kill_ring.kill(removed);
    }

    fn kill_region(&mut self) -> Result<()> {
        let Some(region) = self.selection_range() else {
            return Err(EditorError::NoMark);
        };
        let removed = self.delete_range(region.start, region.len());
        self.undo.record_delete(region.start, &removed, self.cursor_pos);
        self.kill_ring.kill(removed);
        self.cursor_pos = region.start;
        self.mark = None;
        Ok(())
    }

    fn copy_region(&mut self) {
        if let Some(region) = self.selection_range() {
            let text = self.buffer.get_range(region.start, region.len());
            self.kill_ring.kill(text);
        }
    }

    fn yank(&mut self) -> Result<()> {
        let text = self.kill_ring.yank().to_vec();
        if text.is_empty() {
            return Ok(());
        }
        let pos = self.cursor_pos;
        self.buffer.insert_at(pos, &text)?;
        self.undo.record_insert(pos, &text, pos);
        self.cursor_pos = pos + text.len();
        Ok(())
    }

    fn toggle_mark(&mut self) {
        self.mark = match self.mark {
            Some(_) => None,
            None => Some(self.cursor_pos),
        };
    }

    fn move_word_forward(&mut self) {
        let mut iter = scriv_buffer::GraphemeIterator::new(&self.buffer, self.cursor_pos);
        let mut prev = iter.next().map(|g| grapheme_category(&g)).unwrap_or_default();
        while let Some(g) = iter.next() {
            let cat = grapheme_category(&g);
            if is_word_break(prev, cat) {
                self.cursor_pos = g.start;
                return;
            }
            prev = cat;
        }
        self.cursor_pos = self.buffer.len();
    }

    fn move_word_backward(&mut self) {
        let mut iter = scriv_buffer::GraphemeIterator::new(&self.buffer, self.cursor_pos);
        let mut next = GraphemeCategory::default();
        while let Some(g) = iter.prev() {
            let cat = grapheme_category(&g);
            if is_word_break_end(cat, next) {
                self.cursor_pos = g.end;
                return;
            }
            next = cat;
        }
        self.cursor_pos = 0;
    }

    fn kill_word(&mut self) -> Result<()> {
        let start = self.cursor_pos;
        self.move_word_forward();
        let end = self.cursor_pos;
        self.cursor_pos = start;
        if end <= start {
            return Ok(());
        }
        let removed = self.delete_range(start, end - start);
        self.undo.record_delete(start, &removed, start);
        self.kill_ring.kill(removed);
        Ok(())
    }

    fn kill_rectangle(&mut self) {
        let Some(region) = self.selection_range() else { return };
        let start_line = self.buffer.find_line_by_pos(region.start);
        let end_line = self.buffer.find_line_by_pos(region.end);
        let (_, start_col) = self.cursor_line_col_for(region.start);
        let (_, end_col) = self.cursor_line_col_for(region.end);
        let (left, right) = (start_col.min(end_col), start_col.max(end_col));

        let mut lines = Vec::new();
        for line in start_line..=end_line {
            let Some((ls, le)) = self.buffer.get_line_range(line) else { break };
            let width = le - ls;
            let from = ls + left.min(width);
            let to = ls + right.min(width);
            if to > from {
                lines.push(self.delete_range(from, to - from));
            } else {
                lines.push(Vec::new());
            }
        }
        self.mark = None;
        self.cursor_pos = region.start.min(region.end);
        self.kill_ring.kill_rectangle(lines);
    }

    fn yank_rectangle(&mut self) -> Result<()> {
        let lines = self.kill_ring.yank_rectangle().to_vec();
        if lines.is_empty() {
            return Ok(());
        }
        let (start_line, col) = self.cursor_line_col();
        for (i, text) in lines.iter().enumerate() {
            let line = start_line + i;
            let pos = match self.buffer.get_line_range(line) {
                Some((ls, le)) => (ls + col).min(le),
                None => self.buffer.len(),
            };
            self.buffer.insert_at(pos, text)?;
            self.undo.record_insert(pos, text, pos);
        }
        Ok(())
    }

    fn cursor_line_col_for(&self, pos: usize) -> (usize, usize) {
        let line = self.buffer.find_line_by_pos(pos);
        let start = self.buffer.get_line_start(line).unwrap_or(0);
        (line, pos - start)
    }

    fn undo(&mut self) -> Result<()> {
        if let Some(entry) = self.undo.pop_undo() {
            self.apply_inverse(&entry)?;
            self.undo.push_redo(entry);
        }
        Ok(())
    }

    fn redo(&mut self) -> Result<()> {
        if let Some(entry) = self.undo.pop_redo() {
            self.apply_forward(&entry)?;
            self.undo.push_undo_raw(entry);
        }
        Ok(())
    }

    fn apply_inverse(&mut self, entry: &UndoEntry) -> Result<()> {
        match &entry.op {
            Op::Insert { pos, text } => {
                self.buffer.delete(*pos, text.len());
                self.cursor_pos = *pos;
            }
            Op::Delete { pos, text } => {
                self.buffer.insert_at(*pos, text)?;
                self.cursor_pos = *pos + text.len();
            }
        }
        Ok(())
    }

    fn apply_forward(&mut self, entry: &UndoEntry) -> Result<()> {
        match &entry.op {
            Op::Insert { pos, text } => {
                self.buffer.insert_at(*pos, text)?;
                self.cursor_pos = *pos + text.len();
            }
            Op::Delete { pos, text } => {
                self.buffer.delete(*pos, text.len());
                self.cursor_pos = *pos;
            }
        }
        Ok(())
    }

    fn save_to(&mut self, path: &Path) -> Result<()> {
        crate::file_io::save(&self.buffer, path)
    }
}

fn key_to_char(key: Key) -> Option<char> {
    match key {
        Key::Char(b) => Some(b as char),
        Key::Codepoint(cp) => char::from_u32(cp),
        _ => None,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn controller() -> Controller {
        Controller::new(Config::default(), Viewport { x: 0, y: 0, width: 80, height: 24 })
    }

    #[test]
    fn s5_type_backspace_undo_redo_round_trips() {
        let mut ctrl = controller();
        for b in b"abc" {
            ctrl.handle_key(Key::Char(*b)).unwrap();
        }
        assert_eq!(ctrl.buffer.get_range(0, ctrl.buffer.len()), b"abc");

        ctrl.handle_key(Key::Backspace).unwrap();
        assert_eq!(ctrl.buffer.get_range(0, ctrl.buffer.len()), b"ab");

        ctrl.handle_key(Key::Ctrl(b'/')).unwrap();
        assert_eq!(ctrl.buffer.get_range(0, ctrl.buffer.len()), b"abc");

        ctrl.handle_key(Key::Ctrl(b'_')).unwrap();
        assert_eq!(ctrl.buffer.get_range(0, ctrl.buffer.len()), b"ab");
    }

    #[test]
    fn kill_and_yank_round_trip() {
        let mut ctrl = controller();
        for b in b"hello" {
            ctrl.handle_key(Key::Char(*b)).unwrap();
        }
        ctrl.move_to_line_start();
        ctrl.kill_line();
        assert_eq!(ctrl.buffer.len(), 0);
        ctrl.yank().unwrap();
        assert_eq!(ctrl.buffer.get_range(0, ctrl.buffer.len()), b"hello");
    }

    #[test]
    fn word_motion_stops_at_word_boundaries() {
        let mut ctrl = controller();
        for b in b"foo bar" {
            ctrl.handle_key(Key::Char(*b)).unwrap();
        }
        ctrl.cursor_pos = 0;
        ctrl.move_word_forward();
        assert_eq!(ctrl.cursor_pos, 4);
    }
}
