use thiserror::Error;

/// Controller/view-facing errors. Buffer-level failures
/// ([`scriv_buffer::BufferError`]) are wrapped rather than duplicated.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error(transparent)]
    Buffer(#[from] scriv_buffer::BufferError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("file is too large to open ({size} bytes, limit {limit})")]
    FileTooLarge { size: u64, limit: u64 },

    #[error("no filename to save to")]
    NoFilename,

    #[error("no active mark")]
    NoMark,

    #[error("allocation failed")]
    OutOfMemory,
}

pub type Result<T> = std::result::Result<T, EditorError>;
