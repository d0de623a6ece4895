//! The terminal capability contract the view renders against. Implemented
//! with `crossterm` in `scriv-terminal`; this crate only names the surface.

pub trait Terminal {
    fn write(&mut self, bytes: &[u8]) -> std::io::Result<()>;
    fn flush(&mut self) -> std::io::Result<()>;

    fn move_cursor(&mut self, row: usize, col: usize) -> std::io::Result<()>;
    fn hide_cursor(&mut self) -> std::io::Result<()>;
    fn show_cursor(&mut self) -> std::io::Result<()>;

    fn set_scroll_region(&mut self, top: usize, bottom: usize) -> std::io::Result<()>;
    fn scroll_up(&mut self, n: usize) -> std::io::Result<()>;
    fn scroll_down(&mut self, n: usize) -> std::io::Result<()>;
    fn reset_scroll_region(&mut self) -> std::io::Result<()>;

    /// Current `(width, height)`.
    fn size(&self) -> (usize, usize);
}
