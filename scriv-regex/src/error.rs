use thiserror::Error;

/// Regex compilation never fails on malformed syntax — stray metacharacters
/// fall back to literal interpretation per [`crate::compiler::compile`] — so
/// the only compile-time failure left is a pattern with nothing in it.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegexError {
    #[error("pattern is empty")]
    EmptyPattern,
}
