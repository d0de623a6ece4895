/// Line-number <-> byte-offset map, incrementally maintained as edits land
/// on the owning [`crate::PieceTable`]. `line_starts[0]` is always `0`;
/// `line_starts[i]` for `i > 0` is always the byte directly after the
/// `(i-1)`-th newline.
///
/// `valid`/`valid_until_pos` support a lazy rebuild: entries at or after
/// `valid_until_pos` are considered stale and dropped on the next
/// [`LineIndex::rebuild`]. In normal operation every edit goes through
/// [`LineIndex::update_for_insert`]/[`LineIndex::update_for_delete`], which
/// keep the index eagerly correct and `valid` stays `true`; the lazy path
/// exists for bulk content replacement and as the degrade-to-rescan fallback
/// mentioned in the error handling policy.
#[derive(Debug, Clone)]
pub(crate) struct LineIndex {
    line_starts: Vec<usize>,
    valid: bool,
    valid_until_pos: usize,
}

impl LineIndex {
    pub fn empty() -> LineIndex {
        LineIndex {
            line_starts: vec![0],
            valid: true,
            valid_until_pos: 0,
        }
    }

    /// Index for a freshly loaded non-empty buffer: invalid from byte 0, so
    /// the first query triggers one full scan rather than paying for it
    /// before the caller asks.
    pub fn invalid() -> LineIndex {
        LineIndex {
            line_starts: vec![0],
            valid: false,
            valid_until_pos: 0,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn valid_until_pos(&self) -> usize {
        self.valid_until_pos
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    pub fn get_line_start(&self, line: usize) -> Option<usize> {
        if !self.valid {
            return None;
        }
        self.line_starts.get(line).copied()
    }

    /// Binary search for the line containing `pos`.
    pub fn find_line_by_pos(&self, pos: usize) -> usize {
        match self.line_starts.binary_search(&pos) {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        }
    }

    /// Mark everything from the line containing `pos` onward as stale.
    pub fn invalidate_from(&mut self, pos: usize) {
        let line = self.find_line_by_pos(pos);
        let line_start = self.line_starts.get(line).copied().unwrap_or(0);
        self.line_starts.truncate(line.max(1));
        self.valid_until_pos = line_start;
        self.valid = false;
    }

    /// Rebuild everything at or after `valid_until_pos`, given the absolute
    /// byte offsets of every newline in that suffix of the buffer.
    pub fn rebuild(&mut self, newline_offsets: &[usize], total_length: usize) {
        if self.valid {
            return;
        }

        self.line_starts.retain(|&s| s < self.valid_until_pos);
        if self.line_starts.is_empty() {
            self.line_starts.push(0);
        }

        for &nl in newline_offsets {
            let start = nl + 1;
            if start <= total_length {
                self.line_starts.push(start);
            }
        }

        self.valid = true;
    }

    /// Shift every line start after `pos` forward by `text.len()` and
    /// splice in new entries for newlines found within `text`.
    pub fn update_for_insert(&mut self, pos: usize, text: &[u8]) {
        if !self.valid {
            return;
        }

        let len = text.len();
        // entries strictly greater than pos shift forward; an entry exactly
        // at pos now names the start of the inserted text, still correct
        let idx = self.line_starts.partition_point(|&s| s <= pos);

        for start in self.line_starts[idx..].iter_mut() {
            *start += len;
        }

        let new_entries: Vec<usize> = text
            .iter()
            .enumerate()
            .filter(|(_, &b)| b == b'\n')
            .map(|(i, _)| pos + i + 1)
            .collect();

        self.line_starts.splice(idx..idx, new_entries);
    }

    /// Remove entries made stale by deleting `count` bytes at `pos`, and
    /// shift everything after the deletion back by `count`.
    pub fn update_for_delete(&mut self, pos: usize, count: usize, deleted_newlines: usize) {
        if !self.valid {
            return;
        }

        let end = pos + count;

        if deleted_newlines > 0 {
            self.line_starts.retain(|&s| !(s > pos && s <= end));
        }

        for start in self.line_starts.iter_mut() {
            if *start > end {
                *start -= count;
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn insert_shifts_and_splits() {
        let mut idx = LineIndex::empty();
        idx.update_for_insert(0, b"abc\ndef\nghi");
        assert_eq!(idx.line_count(), 3);
        assert_eq!(idx.get_line_start(0), Some(0));
        assert_eq!(idx.get_line_start(1), Some(4));
        assert_eq!(idx.get_line_start(2), Some(8));
    }

    #[test]
    fn delete_spanning_newline_merges_lines() {
        let mut idx = LineIndex::empty();
        idx.update_for_insert(0, b"abc\ndef\nghi");
        // delete "c\nd" (positions 2..5) removing one newline
        idx.update_for_delete(2, 3, 1);
        assert_eq!(idx.line_count(), 2);
        assert_eq!(idx.get_line_start(1), Some(5));
    }

    #[test]
    fn insert_at_zero_never_shifts_sentinel() {
        let mut idx = LineIndex::empty();
        idx.update_for_insert(0, b"xyz");
        assert_eq!(idx.get_line_start(0), Some(0));
    }
}
