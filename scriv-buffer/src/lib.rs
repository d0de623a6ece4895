//! Piece-table text storage: an append-only add buffer, an immutable
//! (owned or mmap'd) original buffer, a lazily-rebuilt line index, and a
//! grapheme-aware cursor over the two.

mod add_buffer;
mod encoding;
mod error;
mod grapheme_iterator;
mod line_index;
mod original;
mod piece;
mod piece_table;
mod utf8;

pub use encoding::{DetectedEncoding, DetectedLineEnding};
pub use error::{BufferError, Result};
pub use grapheme_iterator::{Grapheme, GraphemeIterator};
pub use original::FILE_BACKED_MAX_PIECE_SIZE;
pub use piece_table::{PieceTable, COALESCE_THRESHOLD};
