use crate::compiler;
use crate::error::RegexError;
use crate::program::Program;
use crate::vm;

/// A single match's byte range, `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    pub start: usize,
    pub end: usize,
}

/// A compiled pattern. Execution never fails — a successful compile always
/// produces a `Regex` that can be run against any byte slice.
pub struct Regex {
    program: Program,
}

impl Regex {
    pub fn new(pattern: &str) -> Result<Regex, RegexError> {
        let program = compiler::compile(pattern.as_bytes())?;
        Ok(Regex { program })
    }

    pub fn is_match(&self, text: &[u8]) -> bool {
        self.find(text).is_some()
    }

    pub fn find(&self, text: &[u8]) -> Option<Match> {
        self.find_from(text, 0)
    }

    pub fn find_from(&self, text: &[u8], start: usize) -> Option<Match> {
        vm::search(&self.program, text, start).map(|(start, end)| Match { start, end })
    }

    pub fn find_backward_from(&self, text: &[u8], start: usize) -> Option<Match> {
        vm::search_backward(&self.program, text, start).map(|(start, end)| Match { start, end })
    }

    /// Non-overlapping leftmost matches, each search restarting from the
    /// previous match's end (or `end + 1` for a zero-length match).
    pub fn find_iter<'r, 't>(&'r self, text: &'t [u8]) -> FindIter<'r, 't> {
        FindIter { regex: self, text, pos: 0, done: false }
    }
}

pub struct FindIter<'r, 't> {
    regex: &'r Regex,
    text: &'t [u8],
    pos: usize,
    done: bool,
}

impl Iterator for FindIter<'_, '_> {
    type Item = Match;

    fn next(&mut self) -> Option<Match> {
        if self.done {
            return None;
        }
        match self.regex.find_from(self.text, self.pos) {
            Some(m) => {
                self.pos = if m.end > m.start { m.end } else { m.end + 1 };
                if self.pos > self.text.len() {
                    self.done = true;
                }
                Some(m)
            }
            None => {
                self.done = true;
                None
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn s3_char_class_with_digit_quantifier() {
        let re = Regex::new(r"[a-z]+\d*").unwrap();
        let m = re.find(b"test123 other").unwrap();
        assert_eq!(m, Match { start: 0, end: 7 });
    }

    #[test]
    fn s4_anchored_start_after_newline() {
        let re = Regex::new("^hello").unwrap();
        let m = re.find(b"say hello\nhello world").unwrap();
        assert_eq!(m.start, 10);
    }

    #[test]
    fn greedy_dot_star() {
        let re = Regex::new("a.*b").unwrap();
        let m = re.find(b"axxbyyb").unwrap();
        assert_eq!(m, Match { start: 0, end: 7 });
    }

    #[test]
    fn find_iter_is_non_overlapping() {
        let re = Regex::new("ab").unwrap();
        let matches: Vec<Match> = re.find_iter(b"ababab").collect();
        assert_eq!(matches, vec![
            Match { start: 0, end: 2 },
            Match { start: 2, end: 4 },
            Match { start: 4, end: 6 },
        ]);
    }

    #[test]
    fn unclosed_class_closes_at_end() {
        let re = Regex::new("[abc").unwrap();
        assert!(re.is_match(b"xbz"));
    }
}
