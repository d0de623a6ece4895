//! `crossterm`-backed [`scriv_editor::Terminal`]: raw mode, alternate
//! screen, and a buffered writer. Cell-level diffing happens in
//! `scriv-editor`'s view; this just turns its writes into terminal bytes.

use std::io::{stdout, BufWriter, Stdout, Write};

use anyhow::Result;
use crossterm::cursor;
use crossterm::terminal::{self, disable_raw_mode, enable_raw_mode, ClearType};
use crossterm::{execute, queue};
use scriv_editor::Terminal as EditorTerminal;

pub struct CrosstermTerminal {
    out: BufWriter<Stdout>,
    width: usize,
    height: usize,
}

impl CrosstermTerminal {
    pub fn new() -> Result<CrosstermTerminal> {
        enable_raw_mode()?;
        let mut out = stdout();
        execute!(
            out,
            terminal::EnterAlternateScreen,
            terminal::Clear(ClearType::All),
            cursor::Hide,
        )?;
        let (width, height) = terminal::size()?;

        Ok(CrosstermTerminal {
            out: BufWriter::with_capacity(64 * 1024, out),
            width: width as usize,
            height: height as usize,
        })
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
    }
}

impl Drop for CrosstermTerminal {
    fn drop(&mut self) {
        let _ = execute!(self.out, cursor::Show, terminal::LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}

impl EditorTerminal for CrosstermTerminal {
    fn write(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        self.out.write_all(bytes)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.out.flush()
    }

    fn move_cursor(&mut self, row: usize, col: usize) -> std::io::Result<()> {
        queue!(self.out, cursor::MoveTo(col as u16, row as u16))
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
    }

    fn hide_cursor(&mut self) -> std::io::Result<()> {
        queue!(self.out, cursor::Hide).map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
    }

    fn show_cursor(&mut self) -> std::io::Result<()> {
        queue!(self.out, cursor::Show).map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
    }

    fn set_scroll_region(&mut self, top: usize, bottom: usize) -> std::io::Result<()> {
        // DECSTBM: ESC [ <top> ; <bottom> r, 1-indexed.
        write!(self.out, "\x1b[{};{}r", top + 1, bottom + 1)
    }

    fn scroll_up(&mut self, n: usize) -> std::io::Result<()> {
        write!(self.out, "\x1b[{n}S")
    }

    fn scroll_down(&mut self, n: usize) -> std::io::Result<()> {
        write!(self.out, "\x1b[{n}T")
    }

    fn reset_scroll_region(&mut self) -> std::io::Result<()> {
        self.out.write_all(b"\x1b[r")
    }

    fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }
}
