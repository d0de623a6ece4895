use std::io;

use thiserror::Error;

/// Errors a [`crate::PieceTable`] mutation or load can report. Matches the
/// buffer-facing subset of the core's error kinds: `PositionOutOfBounds`,
/// `BufferInconsistency`, `InvalidUtf8`, `IoError`, `BinaryFile`.
#[derive(Debug, Error)]
pub enum BufferError {
    #[error("position {pos} is out of bounds (length {len})")]
    PositionOutOfBounds { pos: usize, len: usize },

    #[error("internal piece table invariant violated: {0}")]
    BufferInconsistency(String),

    #[error("invalid utf-8 sequence at byte {0}")]
    InvalidUtf8(usize),

    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("file does not look like valid text")]
    BinaryFile,
}

pub type Result<T> = std::result::Result<T, BufferError>;
