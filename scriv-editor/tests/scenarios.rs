use scriv_editor::{Config, Controller, Viewport};
use scriv_regex::Regex;

fn controller() -> Controller {
    Controller::new(Config::default(), Viewport { x: 0, y: 0, width: 80, height: 24 })
}

#[test]
fn s1_open_edit_save_round_trips_through_a_real_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("doc.txt");
    std::fs::write(&path, "first line\nsecond line\n").unwrap();

    let mut ctrl = controller();
    ctrl.open(&path).unwrap();

    for b in b"X" {
        ctrl.handle_key(scriv_core::Key::Char(*b)).unwrap();
    }

    // Save via the same path the file was opened from.
    ctrl.handle_key(scriv_core::Key::Ctrl(b'x')).unwrap();
    ctrl.handle_key(scriv_core::Key::Ctrl(b's')).unwrap();

    let saved = std::fs::read_to_string(&path).unwrap();
    assert!(saved.starts_with('X'));
    assert!(saved.contains("first line"));
}

#[test]
fn s5_type_backspace_undo_redo_sequence() {
    let mut ctrl = controller();
    for b in b"abc" {
        ctrl.handle_key(scriv_core::Key::Char(*b)).unwrap();
    }
    assert_eq!(ctrl.buffer_text(), "abc");

    ctrl.handle_key(scriv_core::Key::Backspace).unwrap();
    assert_eq!(ctrl.buffer_text(), "ab");
    ctrl.handle_key(scriv_core::Key::Ctrl(b'/')).unwrap(); // undo the backspace
    assert_eq!(ctrl.buffer_text(), "abc");
    ctrl.handle_key(scriv_core::Key::Ctrl(b'/')).unwrap(); // undo the insert of "abc"
    assert_eq!(ctrl.buffer_text(), "");

    ctrl.handle_key(scriv_core::Key::Ctrl(b'_')).unwrap(); // redo insert
    assert_eq!(ctrl.buffer_text(), "abc");
    ctrl.handle_key(scriv_core::Key::Ctrl(b'_')).unwrap(); // redo backspace
    assert_eq!(ctrl.buffer_text(), "ab");
}

#[test]
fn regex_search_finds_pattern_in_loaded_text() {
    let re = Regex::new("l[io]ne").unwrap();
    assert!(re.is_match(b"second line"));
    assert!(!re.is_match(b"second lane"));
}

#[test]
fn quit_without_unsaved_changes_does_not_prompt() {
    let mut ctrl = controller();
    ctrl.handle_key(scriv_core::Key::Ctrl(b'x')).unwrap();
    ctrl.handle_key(scriv_core::Key::Ctrl(b'c')).unwrap();
    assert!(ctrl.should_quit());
}
