//! `crossterm` glue: the [`scriv_editor::Terminal`] implementation and key
//! event decoding. Kept separate from `scriv-editor` so the core crate
//! never links against a concrete terminal backend.

mod input;
mod terminal;

pub use input::convert_key_event;
pub use terminal::CrosstermTerminal;
