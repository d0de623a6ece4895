use std::cell::{Cell, RefCell};
use std::io::Write;
use std::path::Path;
use std::time::{Duration, Instant};

use crate::add_buffer::AddBuffer;
use crate::encoding::{self, DetectedEncoding, DetectedLineEnding};
use crate::error::{BufferError, Result};
use crate::line_index::LineIndex;
use crate::original::OriginalBuffer;
use crate::piece::{Piece, Source};

/// Consecutive insertions closer together than this are folded into the
/// same Add-buffer piece instead of producing a new one. Also the
/// granularity at which the controller's undo log coalesces `Insert`
/// entries, since both exist to keep "typing a word" from becoming a
/// hundred single-character undo steps.
pub const COALESCE_THRESHOLD: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy)]
struct CoalesceMarker {
    piece_idx: usize,
    end_pos: usize,
    add_buffer_end: usize,
    at: Instant,
}

/// Piece-table text buffer: an immutable `original` byte source, an
/// append-only `add_buffer` every insertion lands in, and an ordered list
/// of `pieces` naming ranges of one or the other whose concatenation is the
/// logical text.
pub struct PieceTable {
    original: OriginalBuffer,
    add_buffer: AddBuffer,
    pieces: Vec<Piece>,
    total_length: usize,
    modification_count: u64,
    cached_line_count: usize,
    line_index: RefCell<LineIndex>,
    piece_cache: Cell<(usize, usize)>,
    coalesce: Option<CoalesceMarker>,
    detected_encoding: DetectedEncoding,
    detected_line_ending: DetectedLineEnding,
}

impl PieceTable {
    pub fn empty() -> PieceTable {
        PieceTable {
            original: OriginalBuffer::empty(),
            add_buffer: AddBuffer::new(),
            pieces: Vec::new(),
            total_length: 0,
            modification_count: 0,
            cached_line_count: 1,
            line_index: RefCell::new(LineIndex::empty()),
            piece_cache: Cell::new((0, 0)),
            coalesce: None,
            detected_encoding: DetectedEncoding::Utf8Strict,
            detected_line_ending: DetectedLineEnding::Lf,
        }
    }

    pub fn from_bytes(bytes: Vec<u8>) -> PieceTable {
        let len = bytes.len();
        if len == 0 {
            return PieceTable::empty();
        }

        let newline_count = bytes.iter().filter(|&&b| b == b'\n').count();
        let original = OriginalBuffer::from_bytes(bytes);

        PieceTable {
            original,
            add_buffer: AddBuffer::new(),
            pieces: vec![Piece::new(Source::Original, 0, len)],
            total_length: len,
            modification_count: 0,
            cached_line_count: newline_count + 1,
            line_index: RefCell::new(LineIndex::invalid()),
            piece_cache: Cell::new((0, 0)),
            coalesce: None,
            detected_encoding: DetectedEncoding::Utf8Strict,
            detected_line_ending: DetectedLineEnding::Lf,
        }
    }

    pub fn load_from_slice(bytes: &[u8]) -> PieceTable {
        PieceTable::from_bytes(bytes.to_vec())
    }

    /// Load from a path. The file is mmap'd above a size threshold and
    /// otherwise read into owned memory ([`OriginalBuffer::from_path`]); if
    /// the raw bytes are already clean UTF-8 with LF-only line endings,
    /// that buffer is used directly (zero-copy). Otherwise the content is
    /// normalized into an owned, UTF-8, LF-only buffer and the original
    /// encoding/line-ending are recorded for [`PieceTable::save_to_path`]
    /// to reverse.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<PieceTable> {
        let original = OriginalBuffer::from_path(path)?;
        let len = original.len();

        if len == 0 {
            return Ok(PieceTable::empty());
        }

        let needs_lossy = std::str::from_utf8(&original).is_err();
        let has_crlf = encoding::has_crlf(&original);

        if !needs_lossy && !has_crlf {
            let newline_count = original.iter().filter(|&&b| b == b'\n').count();
            return Ok(PieceTable {
                pieces: vec![Piece::new(Source::Original, 0, len)],
                total_length: len,
                modification_count: 0,
                cached_line_count: newline_count + 1,
                line_index: RefCell::new(LineIndex::invalid()),
                piece_cache: Cell::new((0, 0)),
                coalesce: None,
                original,
                add_buffer: AddBuffer::new(),
                detected_encoding: DetectedEncoding::Utf8Strict,
                detected_line_ending: DetectedLineEnding::Lf,
            });
        }

        let (normalized, detected_encoding, detected_line_ending) = encoding::normalize(&original);
        let mut table = PieceTable::from_bytes(normalized);
        table.detected_encoding = detected_encoding;
        table.detected_line_ending = detected_line_ending;
        Ok(table)
    }

    pub fn detected_encoding(&self) -> DetectedEncoding {
        self.detected_encoding
    }

    pub fn detected_line_ending(&self) -> DetectedLineEnding {
        self.detected_line_ending
    }

    /// Atomically write the buffer's content to `path`, reversing the
    /// load-time encoding normalization: write to a sibling temp file,
    /// match the target's permissions, fsync, rename over the target
    /// (falling back to copy+delete across devices), then fsync the
    /// containing directory.
    pub fn save_to_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let pid = std::process::id();
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);

        let mut tmp_name = path.as_os_str().to_os_string();
        tmp_name.push(format!(".{pid}.{nanos}.tmp"));
        let tmp_path = std::path::PathBuf::from(tmp_name);

        let result = self.write_and_rename(path, &tmp_path);
        if result.is_err() {
            let _ = std::fs::remove_file(&tmp_path);
        }
        result
    }

    fn write_and_rename(&self, path: &Path, tmp_path: &Path) -> Result<()> {
        {
            let mut file = std::fs::File::create(tmp_path)?;
            self.write_denormalized_to(&mut file)?;
            file.sync_all()?;
        }

        if let Ok(meta) = std::fs::metadata(path) {
            let _ = std::fs::set_permissions(tmp_path, meta.permissions());
        }

        if std::fs::rename(tmp_path, path).is_err() {
            std::fs::copy(tmp_path, path)?;
            std::fs::remove_file(tmp_path)?;
        }

        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            if let Ok(dir_file) = std::fs::File::open(dir) {
                let _ = dir_file.sync_all();
            }
        }

        Ok(())
    }

    fn write_denormalized_to(&self, writer: &mut impl Write) -> std::io::Result<()> {
        if self.detected_line_ending == DetectedLineEnding::Lf {
            return self.write_all_to(writer);
        }
        for piece in &self.pieces {
            for &b in self.piece_bytes(piece) {
                if b == b'\n' {
                    writer.write_all(b"\r\n")?;
                } else {
                    writer.write_all(std::slice::from_ref(&b))?;
                }
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.total_length
    }

    pub fn is_empty(&self) -> bool {
        self.total_length == 0
    }

    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }

    pub fn modification_count(&self) -> u64 {
        self.modification_count
    }

    pub fn line_count(&self) -> usize {
        self.cached_line_count
    }

    pub fn get_line_start(&self, line: usize) -> Option<usize> {
        self.ensure_line_index_valid();
        self.line_index.borrow().get_line_start(line)
    }

    pub fn find_line_by_pos(&self, pos: usize) -> usize {
        self.ensure_line_index_valid();
        self.line_index.borrow().find_line_by_pos(pos)
    }

    /// `(start, end)` of the line's content, excluding its trailing `\n`.
    pub fn get_line_range(&self, line: usize) -> Option<(usize, usize)> {
        let start = self.get_line_start(line)?;
        let end = match self.get_line_start(line + 1) {
            Some(next) => next.saturating_sub(1).max(start),
            None => self.total_length,
        };
        Some((start, end))
    }

    /// Byte offset of the `\n` ending the line containing `pos`, or
    /// `total_length` if that line has no trailing newline.
    pub fn find_line_end_from_pos(&self, pos: usize) -> usize {
        let line = self.find_line_by_pos(pos);
        match self.get_line_start(line + 1) {
            Some(next) => next.saturating_sub(1),
            None => self.total_length,
        }
    }

    /// Byte offset of the start of the line after the one containing `pos`.
    pub fn find_next_line_from_pos(&self, pos: usize) -> usize {
        let line = self.find_line_by_pos(pos);
        self.get_line_start(line + 1).unwrap_or(self.total_length)
    }

    /// Insert `bytes` before byte offset `pos`.
    pub fn insert_at(&mut self, pos: usize, bytes: &[u8]) -> Result<()> {
        if pos > self.total_length {
            return Err(BufferError::PositionOutOfBounds {
                pos,
                len: self.total_length,
            });
        }
        if bytes.is_empty() {
            return Ok(());
        }

        if self.try_coalesce(pos, bytes) {
            self.total_length += bytes.len();
            self.modification_count += 1;
            self.cached_line_count += count_newlines(bytes);
            self.line_index.borrow_mut().update_for_insert(pos, bytes);
            return Ok(());
        }

        let add_start = self.add_buffer.append(bytes);
        let new_piece = Piece::new(Source::Add, add_start, bytes.len());
        let inserted_idx;

        if self.pieces.is_empty() {
            self.pieces.push(new_piece);
            inserted_idx = 0;
        } else {
            let (piece_idx, piece_start) = self.find_piece_at(pos);
            if piece_idx >= self.pieces.len() {
                inserted_idx = self.pieces.len();
                self.pieces.push(new_piece);
            } else {
                let piece = self.pieces[piece_idx];
                let offset = pos - piece_start;
                if offset == 0 {
                    self.pieces.insert(piece_idx, new_piece);
                    inserted_idx = piece_idx;
                } else if offset == piece.len {
                    self.pieces.insert(piece_idx + 1, new_piece);
                    inserted_idx = piece_idx + 1;
                } else {
                    let left = Piece::new(piece.source, piece.start, offset);
                    let right = Piece::new(piece.source, piece.start + offset, piece.len - offset);
                    self.pieces.splice(piece_idx..=piece_idx, [left, new_piece, right]);
                    inserted_idx = piece_idx + 1;
                }
            }
        }

        self.total_length += bytes.len();
        self.modification_count += 1;
        self.cached_line_count += count_newlines(bytes);
        self.line_index.borrow_mut().update_for_insert(pos, bytes);

        self.coalesce = Some(CoalesceMarker {
            piece_idx: inserted_idx,
            end_pos: pos + bytes.len(),
            add_buffer_end: self.add_buffer.len(),
            at: Instant::now(),
        });
        self.piece_cache.set((0, 0));

        Ok(())
    }

    fn try_coalesce(&mut self, pos: usize, bytes: &[u8]) -> bool {
        let marker = match self.coalesce {
            Some(m) => m,
            None => return false,
        };

        if marker.end_pos != pos || marker.piece_idx >= self.pieces.len() {
            return false;
        }
        if marker.at.elapsed() >= COALESCE_THRESHOLD {
            return false;
        }
        if self.add_buffer.len() != marker.add_buffer_end {
            return false;
        }

        let piece = self.pieces[marker.piece_idx];
        if piece.source != Source::Add || piece.end() != marker.add_buffer_end {
            return false;
        }

        self.add_buffer.append(bytes);
        self.pieces[marker.piece_idx].len += bytes.len();

        self.coalesce = Some(CoalesceMarker {
            piece_idx: marker.piece_idx,
            end_pos: pos + bytes.len(),
            add_buffer_end: self.add_buffer.len(),
            at: Instant::now(),
        });

        true
    }

    /// Delete up to `count` bytes starting at `pos`, clamped to the end of
    /// the buffer. Returns the number of bytes actually removed.
    pub fn delete(&mut self, pos: usize, count: usize) -> usize {
        let count = count.min(self.total_length.saturating_sub(pos));
        if count == 0 {
            return 0;
        }
        let end = pos + count;
        let deleted_newlines = self.newline_count_in_range(pos, end);

        let (idx_first, start_first) = self.find_piece_at(pos);
        let (idx_last, start_last) = self.find_piece_at(end - 1);

        if idx_first == idx_last {
            let piece = self.pieces[idx_first];
            let local_start = pos - start_first;
            let local_end = local_start + count;
            if local_start == 0 && local_end == piece.len {
                self.pieces.remove(idx_first);
            } else if local_start == 0 {
                self.pieces[idx_first] = Piece::new(piece.source, piece.start + local_end, piece.len - local_end);
            } else if local_end == piece.len {
                self.pieces[idx_first].len = local_start;
            } else {
                let left = Piece::new(piece.source, piece.start, local_start);
                let right = Piece::new(piece.source, piece.start + local_end, piece.len - local_end);
                self.pieces.splice(idx_first..=idx_first, [left, right]);
            }
        } else {
            let first = self.pieces[idx_first];
            let last = self.pieces[idx_last];
            let first_local_start = pos - start_first;
            let last_local_end = (end - start_last).min(last.len);

            if idx_last > idx_first + 1 {
                self.pieces.drain(idx_first + 1..idx_last);
            }
            let last_idx_now = idx_first + 1;

            if last_local_end >= last.len {
                self.pieces.remove(last_idx_now);
            } else {
                self.pieces[last_idx_now] = Piece::new(last.source, last.start + last_local_end, last.len - last_local_end);
            }

            if first_local_start == 0 {
                self.pieces.remove(idx_first);
            } else {
                self.pieces[idx_first].len = first_local_start;
            }
        }

        self.total_length -= count;
        self.cached_line_count -= deleted_newlines;
        self.line_index
            .borrow_mut()
            .update_for_delete(pos, count, deleted_newlines);
        self.modification_count += 1;
        self.coalesce = None;
        self.piece_cache.set((0, 0));

        count
    }

    pub fn byte_at(&self, pos: usize) -> Option<u8> {
        if pos >= self.total_length {
            return None;
        }
        let (idx, start) = self.find_piece_at(pos);
        let piece = self.pieces.get(idx)?;
        self.piece_bytes(piece).get(pos - start).copied()
    }

    /// Bounded, never errors: positions past the end yield an empty slice.
    pub fn get_range(&self, pos: usize, len: usize) -> Vec<u8> {
        let pos = pos.min(self.total_length);
        let end = (pos + len).min(self.total_length);
        if pos >= end {
            return Vec::new();
        }

        let mut result = Vec::with_capacity(end - pos);
        let (mut idx, mut piece_start) = self.find_piece_at(pos);
        let mut cursor = pos;

        while cursor < end && idx < self.pieces.len() {
            let piece = self.pieces[idx];
            let piece_end = piece_start + piece.len;
            let local_start = cursor - piece_start;
            let local_end = (end - piece_start).min(piece.len);
            result.extend_from_slice(&self.piece_bytes(&piece)[local_start..local_end]);
            cursor = piece_start + local_end;
            piece_start = piece_end;
            idx += 1;
        }

        result
    }

    pub fn extract_text(&self, pos: usize, len: usize) -> Vec<u8> {
        self.get_range(pos, len)
    }

    pub fn search_forward(&self, pattern: &[u8], start_pos: usize) -> Option<(usize, usize)> {
        if pattern.is_empty() || start_pos > self.total_length {
            return None;
        }
        let last_start = self.total_length.saturating_sub(pattern.len());
        if start_pos > last_start {
            return None;
        }
        (start_pos..=last_start).find(|&p| self.matches_at(p, pattern)).map(|p| (p, p + pattern.len()))
    }

    pub fn search_backward(&self, pattern: &[u8], start_pos: usize) -> Option<(usize, usize)> {
        if pattern.is_empty() {
            return None;
        }
        let max_start = self.total_length.saturating_sub(pattern.len());
        let last_start = max_start.min(start_pos);
        (0..=last_start).rev().find(|&p| self.matches_at(p, pattern)).map(|p| (p, p + pattern.len()))
    }

    fn matches_at(&self, pos: usize, pattern: &[u8]) -> bool {
        pattern
            .iter()
            .enumerate()
            .all(|(i, &b)| self.byte_at(pos + i) == Some(b))
    }

    /// Write the full logical content, piece by piece, without
    /// materializing it as one contiguous allocation.
    pub fn write_all_to(&self, writer: &mut impl Write) -> std::io::Result<()> {
        for piece in &self.pieces {
            writer.write_all(self.piece_bytes(piece))?;
        }
        Ok(())
    }

    pub(crate) fn copy_bytes(&self, pos: usize, max: usize, out: &mut [u8]) -> usize {
        let max = max.min(out.len());
        let end = (pos + max).min(self.total_length);
        if pos >= end {
            return 0;
        }

        let mut n = 0;
        let (mut idx, mut piece_start) = self.find_piece_at(pos);
        let mut cursor = pos;
        while cursor < end && idx < self.pieces.len() {
            let piece = self.pieces[idx];
            let piece_end = piece_start + piece.len;
            let local_start = cursor - piece_start;
            let local_end = (end - piece_start).min(piece.len);
            let slice = &self.piece_bytes(&piece)[local_start..local_end];
            out[n..n + slice.len()].copy_from_slice(slice);
            n += slice.len();
            cursor = piece_start + local_end;
            piece_start = piece_end;
            idx += 1;
        }
        n
    }

    pub(crate) fn copy_bytes_ending_at(&self, pos: usize, max: usize, out: &mut [u8]) -> usize {
        let max = max.min(out.len());
        let start = pos.saturating_sub(max);
        self.copy_bytes(start, pos - start, out)
    }

    fn piece_bytes(&self, piece: &Piece) -> &[u8] {
        match piece.source {
            Source::Original => &self.original[piece.start..piece.end()],
            Source::Add => &self.add_buffer.as_slice()[piece.start..piece.end()],
        }
    }

    fn newline_count_in_range(&self, pos: usize, end: usize) -> usize {
        let mut count = 0;
        let (mut idx, mut piece_start) = self.find_piece_at(pos);
        let mut cursor = pos;
        while cursor < end && idx < self.pieces.len() {
            let piece = self.pieces[idx];
            let piece_end = piece_start + piece.len;
            let local_start = cursor - piece_start;
            let local_end = (end - piece_start).min(piece.len);
            count += self.piece_bytes(&piece)[local_start..local_end]
                .iter()
                .filter(|&&b| b == b'\n')
                .count();
            cursor = piece_start + local_end;
            piece_start = piece_end;
            idx += 1;
        }
        count
    }

    fn newline_positions_from(&self, from: usize) -> Vec<usize> {
        let mut result = Vec::new();
        if from >= self.total_length {
            return result;
        }

        let (mut idx, mut piece_start) = self.find_piece_at(from);
        let mut cursor = from;
        while idx < self.pieces.len() {
            let piece = self.pieces[idx];
            let piece_end = piece_start + piece.len;
            let local_start = cursor.saturating_sub(piece_start);
            for (i, &b) in self.piece_bytes(&piece)[local_start..].iter().enumerate() {
                if b == b'\n' {
                    result.push(piece_start + local_start + i);
                }
            }
            cursor = piece_end;
            piece_start = piece_end;
            idx += 1;
        }
        result
    }

    fn ensure_line_index_valid(&self) {
        let mut line_index = self.line_index.borrow_mut();
        if line_index.is_valid() {
            return;
        }
        let valid_until = line_index.valid_until_pos();
        let newlines = self.newline_positions_from(valid_until);
        line_index.rebuild(&newlines, self.total_length);
    }

    /// Locate the piece containing `pos`, using and refreshing the
    /// sequential-access cache. Returns `(pieces.len(), total_length)` if
    /// `pos == total_length`.
    fn find_piece_at(&self, pos: usize) -> (usize, usize) {
        let (cached_idx, cached_start) = self.piece_cache.get();

        if cached_idx < self.pieces.len() && pos >= cached_start {
            let mut idx = cached_idx;
            let mut start = cached_start;
            while idx < self.pieces.len() {
                let len = self.pieces[idx].len;
                if pos < start + len {
                    self.piece_cache.set((idx, start));
                    return (idx, start);
                }
                start += len;
                idx += 1;
            }
            if start == self.total_length {
                self.piece_cache.set((idx, start));
                return (idx, start);
            }
        }

        let mut start = 0usize;
        for (idx, piece) in self.pieces.iter().enumerate() {
            if pos < start + piece.len {
                self.piece_cache.set((idx, start));
                return (idx, start);
            }
            start += piece.len;
        }
        self.piece_cache.set((self.pieces.len(), start));
        (self.pieces.len(), start)
    }
}

fn count_newlines(bytes: &[u8]) -> usize {
    bytes.iter().filter(|&&b| b == b'\n').count()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn s1_insert_splits_a_piece() {
        let mut table = PieceTable::from_bytes(b"Hello World".to_vec());
        table.insert_at(5, b", Beautiful").unwrap();
        assert_eq!(table.get_range(0, table.len()), b"Hello, Beautiful World");
        assert_eq!(table.piece_count(), 3);
        assert_eq!(table.line_count(), 1);
    }

    #[test]
    fn s2_delete_merges_lines() {
        let mut table = PieceTable::from_bytes(b"abc\ndef\nghi".to_vec());
        table.delete(3, 4);
        assert_eq!(table.get_range(0, table.len()), b"abcef\nghi");
        assert_eq!(table.line_count(), 2);
        assert_eq!(table.get_line_start(1), Some(6));
    }

    #[test]
    fn insert_out_of_bounds_errors() {
        let mut table = PieceTable::from_bytes(b"abc".to_vec());
        assert!(table.insert_at(10, b"x").is_err());
    }

    #[test]
    fn coalesces_rapid_sequential_inserts() {
        let mut table = PieceTable::empty();
        table.insert_at(0, b"a").unwrap();
        table.insert_at(1, b"b").unwrap();
        table.insert_at(2, b"c").unwrap();
        assert_eq!(table.get_range(0, 3), b"abc");
        assert_eq!(table.piece_count(), 1);
    }

    #[test]
    fn search_forward_finds_leftmost() {
        let table = PieceTable::from_bytes(b"test123 other".to_vec());
        assert_eq!(table.search_forward(b"test", 0), Some((0, 4)));
        assert_eq!(table.search_forward(b"other", 0), Some((8, 13)));
        assert_eq!(table.search_forward(b"zzz", 0), None);
    }

    #[test]
    fn search_backward_finds_rightmost_before_start() {
        let table = PieceTable::from_bytes(b"abXcdXef".to_vec());
        assert_eq!(table.search_backward(b"X", 7), Some((5, 6)));
        assert_eq!(table.search_backward(b"X", 4), Some((2, 3)));
    }

    #[test]
    fn delete_across_piece_boundary() {
        let mut table = PieceTable::from_bytes(b"Hello World".to_vec());
        table.insert_at(5, b", Beautiful").unwrap();
        // "Hello, Beautiful World" -> delete ", Beautiful " (bytes 5..18)
        table.delete(5, 13);
        assert_eq!(table.get_range(0, table.len()), b"HelloWorld");
    }

    fn scratch_path(name: &str) -> std::path::PathBuf {
        let mut p = std::env::temp_dir();
        p.push(format!("scriv-buffer-test-{}-{}-{}", std::process::id(), name, COALESCE_THRESHOLD.as_nanos()));
        p
    }

    #[test]
    fn s9_save_is_atomic_and_round_trips() {
        let path = scratch_path("roundtrip");
        let mut table = PieceTable::from_bytes(b"line one\nline two\n".to_vec());
        table.insert_at(8, b"!").unwrap();
        table.save_to_path(&path).unwrap();

        let reloaded = PieceTable::load_from_file(&path).unwrap();
        assert_eq!(reloaded.get_range(0, reloaded.len()), b"line one!\nline two\n");

        let dir = path.parent().unwrap();
        let stem = path.file_name().unwrap().to_string_lossy().into_owned();
        let leftover_tmp = std::fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .any(|e| {
                let name = e.file_name().to_string_lossy().into_owned();
                name.starts_with(&stem) && name.ends_with(".tmp")
            });
        assert!(!leftover_tmp);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn save_reverses_crlf_normalization() {
        let path = scratch_path("crlf");
        let table = PieceTable::load_from_slice_for_test(b"a\r\nb\r\n");
        table.save_to_path(&path).unwrap();

        let raw = std::fs::read(&path).unwrap();
        assert_eq!(raw, b"a\r\nb\r\n");

        std::fs::remove_file(&path).unwrap();
    }

    impl PieceTable {
        fn load_from_slice_for_test(raw: &[u8]) -> PieceTable {
            let (normalized, detected_encoding, detected_line_ending) = encoding::normalize(raw);
            let mut table = PieceTable::from_bytes(normalized);
            table.detected_encoding = detected_encoding;
            table.detected_line_ending = detected_line_ending;
            table
        }
    }
}
