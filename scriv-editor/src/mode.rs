//! Modal dispatch state. `Normal` handles ordinary editing keys directly;
//! the others intercept the next keystroke(s) for a prefix command, a
//! confirmation, a mini-buffer prompt, or incremental search.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilenamePurpose {
    Save,
    SaveAndQuit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    /// Waiting on the key following `Ctrl-X`.
    PrefixX,
    /// Waiting on the key following `Ctrl-X r` (rectangle commands).
    PrefixR,
    /// `Ctrl-X Ctrl-C` with unsaved changes: waiting on y/n.
    QuitConfirm,
    FilenameInput(FilenamePurpose),
    ISearchForward,
    ISearchBackward,
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Normal
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_mode_is_normal() {
        assert_eq!(Mode::default(), Mode::Normal);
    }
}
