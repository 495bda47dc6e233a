//! File open/save round trips and the browser's directory listing.

use core_actions::dispatcher::browser;
use core_actions::io_ops;
use core_state::EditorState;
use std::io::Write;

fn rows_text(state: &EditorState) -> Vec<String> {
    state
        .rows
        .iter()
        .map(|r| String::from_utf8_lossy(&r.chars).into_owned())
        .collect()
}

#[test]
fn save_then_open_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("note.txt");

    let mut state = EditorState::new();
    state.buffer.insert(0, b"alpha\nbeta\ngamma");
    state.sync_rows();
    state.file_name = Some(path.clone());
    io_ops::save(&mut state);
    assert!(!state.modified);
    assert!(state.status.text().ends_with("B written to disk"));

    let mut reloaded = EditorState::new();
    io_ops::open_file(&mut reloaded, &path).unwrap();
    assert_eq!(rows_text(&reloaded), rows_text(&state));
    assert!(!reloaded.modified);
    // On disk every row ends with a single newline.
    assert_eq!(std::fs::read(&path).unwrap(), b"alpha\nbeta\ngamma\n");
}

#[test]
fn open_normalizes_crlf() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dos.txt");
    std::fs::File::create(&path)
        .unwrap()
        .write_all(b"one\r\ntwo\r\n")
        .unwrap();

    let mut state = EditorState::new();
    io_ops::open_file(&mut state, &path).unwrap();
    assert_eq!(rows_text(&state), ["one", "two"]);
    assert!(!state.buffer.to_bytes().contains(&b'\r'));
}

#[test]
fn open_missing_file_fails_and_leaves_state_alone() {
    let mut state = EditorState::new();
    state.buffer.insert(0, b"precious");
    state.sync_rows();
    let err = io_ops::open_file(&mut state, std::path::Path::new("/no/such/file"));
    assert!(err.is_err());
    assert_eq!(rows_text(&state), ["precious"]);
}

#[test]
fn open_selects_syntax_from_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prog.c");
    std::fs::File::create(&path)
        .unwrap()
        .write_all(b"int main(void) { return 0; }\n")
        .unwrap();

    let mut state = EditorState::new();
    io_ops::open_file(&mut state, &path).unwrap();
    assert!(state.syntax.is_some());
    assert_eq!(state.rows[0].highlight[0], core_syntax::Highlight::Type);
}

#[test]
fn save_shrinking_buffer_truncates_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shrink.txt");
    std::fs::File::create(&path)
        .unwrap()
        .write_all(b"a much longer original content\n")
        .unwrap();

    let mut state = EditorState::new();
    state.buffer.insert(0, b"tiny");
    state.sync_rows();
    state.file_name = Some(path.clone());
    io_ops::save(&mut state);
    assert_eq!(std::fs::read(&path).unwrap(), b"tiny\n");
}

#[test]
fn browser_lists_dirs_first_with_parent_entry() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("zdir")).unwrap();
    std::fs::create_dir(dir.path().join("Adir")).unwrap();
    std::fs::File::create(dir.path().join("bfile.txt")).unwrap();
    std::fs::File::create(dir.path().join("afile.c")).unwrap();
    std::fs::File::create(dir.path().join(".hidden")).unwrap();

    let mut state = EditorState::new();
    browser::load_directory(&mut state, dir.path(), false);
    let browser_state = state.browser.as_ref().unwrap();
    let names: Vec<&str> = browser_state
        .entries
        .iter()
        .map(|e| e.name.as_str())
        .collect();
    assert_eq!(names, ["..", "Adir", "zdir", "afile.c", "bfile.txt"]);
    assert!(browser_state.entries[0].is_dir);

    // Toggling hidden files re-lists with the dotfile included.
    browser::load_directory(&mut state, dir.path(), true);
    let names: Vec<String> = state
        .browser
        .as_ref()
        .unwrap()
        .entries
        .iter()
        .map(|e| e.name.clone())
        .collect();
    assert!(names.contains(&".hidden".to_string()));
}
