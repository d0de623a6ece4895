//! Bytecode-compiled regular expression engine: a left-to-right compiler
//! over a small atom set (literals, `.`, character classes, `\d\w\s` and
//! their negations, `^`/`$` anchors, `*`/`+`/`?` quantifiers) and a
//! bounded-backtracking virtual machine. No grouping, alternation, or
//! backreferences.

mod compiler;
mod error;
mod inst;
mod program;
mod regex;
mod vm;

pub use error::RegexError;
pub use regex::{FindIter, Match, Regex};
