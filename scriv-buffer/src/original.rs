use std::fs::File;
use std::io;
use std::ops::Deref;
use std::path::Path;

use memmap2::Mmap;

/// File above this size is mapped instead of read into owned memory, the
/// same `256 KiB` cutoff the original editor used for its file-backed
/// pieces: large enough that most source files stay heap-backed (owned
/// buffers are trivially `Send`/droppable and never touch the filesystem
/// again), small enough that opening a multi-megabyte log doesn't copy it.
pub const FILE_BACKED_MAX_PIECE_SIZE: usize = 1024 * 256;

/// The immutable buffer backing the text a [`crate::PieceTable`] was loaded
/// from. Never mutated after construction; released (munmap or free) when
/// dropped.
pub(crate) enum OriginalBuffer {
    Owned(Vec<u8>),
    Mapped(Mmap),
}

impl OriginalBuffer {
    pub fn empty() -> OriginalBuffer {
        OriginalBuffer::Owned(Vec::new())
    }

    pub fn from_bytes(bytes: Vec<u8>) -> OriginalBuffer {
        OriginalBuffer::Owned(bytes)
    }

    /// Load from a path, choosing mmap vs owned heap memory by size.
    pub fn from_path(path: impl AsRef<Path>) -> io::Result<OriginalBuffer> {
        let file = File::open(path)?;
        let len = file.metadata()?.len() as usize;

        if len == 0 {
            return Ok(OriginalBuffer::Owned(Vec::new()));
        }

        if len > FILE_BACKED_MAX_PIECE_SIZE {
            // SAFETY: the file is not expected to be truncated by another
            // process while mapped; the original buffer is read-only for
            // the lifetime of the piece table.
            let mmap = unsafe { Mmap::map(&file)? };
            Ok(OriginalBuffer::Mapped(mmap))
        } else {
            use std::io::Read;
            let mut file = file;
            let mut buf = Vec::with_capacity(len);
            file.read_to_end(&mut buf)?;
            Ok(OriginalBuffer::Owned(buf))
        }
    }

    pub fn is_mapped(&self) -> bool {
        matches!(self, OriginalBuffer::Mapped(_))
    }
}

impl Deref for OriginalBuffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            OriginalBuffer::Owned(v) => v,
            OriginalBuffer::Mapped(m) => m,
        }
    }
}
