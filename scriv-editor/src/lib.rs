//! Editor controller: modal key dispatch, undo/redo, kill ring, and the
//! differential view renderer, built on top of `scriv-buffer`'s piece table
//! and `scriv-regex`'s search engine.

mod config;
mod controller;
mod error;
mod file_io;
mod kill_ring;
mod mode;
mod terminal;
mod undo;
mod view;

pub use config::Config;
pub use controller::Controller;
pub use error::{EditorError, Result};
pub use mode::{FilenamePurpose, Mode};
pub use terminal::Terminal;
pub use undo::{Op, UndoEntry, UndoLog, MAX_UNDO_ENTRIES};
pub use view::{ScreenCell, SearchHighlight, SearchPattern, StatusFields, Style, View, Viewport};
