//! Search stepping/restoration and selection operations.

use core_actions::Dispatcher;
use core_events::Key;
use core_state::{EditorState, Mode};
use core_syntax::Highlight;

fn state_from(text: &str) -> EditorState {
    let mut state = EditorState::new();
    state.buffer.insert(0, text.as_bytes());
    state.buffer.set_modified(false);
    state.sync_rows();
    state.modified = false;
    state
}

fn buffer_text(state: &EditorState) -> String {
    String::from_utf8_lossy(&state.buffer.to_bytes()).into_owned()
}

fn fifteen_lines_with_foo_on(rows: &[usize]) -> String {
    (0..15)
        .map(|i| {
            if rows.contains(&i) {
                format!("line {i} foo")
            } else {
                format!("line {i}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn search_cycles_forward_and_backward_with_wraparound() {
    let mut d = Dispatcher::new();
    let mut state = state_from(&fifteen_lines_with_foo_on(&[3, 8, 12]));
    d.dispatch(&mut state, Key::Ctrl('f'));
    assert_eq!(state.mode, Mode::Search);
    for c in "foo".chars() {
        d.dispatch(&mut state, Key::Char(c));
    }
    // Incremental search already sits on the first hit.
    assert_eq!(state.cursor_y, 3);
    let search = state.search.as_ref().unwrap();
    assert_eq!(search.total_matches, 3);
    assert_eq!(search.current_match, 1);

    d.dispatch(&mut state, Key::Right);
    assert_eq!(state.cursor_y, 8);
    d.dispatch(&mut state, Key::Down);
    assert_eq!(state.cursor_y, 12);
    d.dispatch(&mut state, Key::Right);
    assert_eq!(state.cursor_y, 3, "forward wraps to the first hit");
    d.dispatch(&mut state, Key::Left);
    assert_eq!(state.cursor_y, 12, "backward wraps to the last hit");
    d.dispatch(&mut state, Key::Up);
    assert_eq!(state.cursor_y, 8);
}

#[test]
fn search_match_overlay_is_applied_and_restored() {
    let mut d = Dispatcher::new();
    let mut state = state_from("aaa\nbbb foo bbb\nccc");
    d.dispatch(&mut state, Key::Ctrl('f'));
    for c in "foo".chars() {
        d.dispatch(&mut state, Key::Char(c));
    }
    assert_eq!(state.cursor_y, 1);
    let hit_col = 4;
    assert_eq!(
        &state.rows[1].highlight[hit_col..hit_col + 3],
        &[Highlight::Match; 3]
    );
    // Finalizing with Enter restores the row's real classes.
    d.dispatch(&mut state, Key::Enter);
    assert_eq!(state.mode, Mode::Normal);
    assert!(
        state.rows[1]
            .highlight
            .iter()
            .all(|&h| h != Highlight::Match)
    );
    assert_eq!(state.cursor_y, 1, "Enter keeps the cursor on the hit");
}

#[test]
fn escape_restores_cursor_and_viewport() {
    let mut d = Dispatcher::new();
    let mut state = state_from(&fifteen_lines_with_foo_on(&[9]));
    state.cursor_y = 2;
    state.cursor_x = 1;
    state.row_offset = 1;
    d.dispatch(&mut state, Key::Ctrl('f'));
    for c in "foo".chars() {
        d.dispatch(&mut state, Key::Char(c));
    }
    assert_eq!(state.cursor_y, 9);
    d.dispatch(&mut state, Key::Esc);
    assert_eq!(state.mode, Mode::Normal);
    assert_eq!((state.cursor_y, state.cursor_x), (2, 1));
    assert_eq!(state.row_offset, 1);
}

#[test]
fn backward_arrow_before_any_match_is_ignored() {
    let mut d = Dispatcher::new();
    let mut state = state_from("abc");
    d.dispatch(&mut state, Key::Ctrl('f'));
    d.dispatch(&mut state, Key::Left);
    assert_eq!(state.mode, Mode::Search, "still searching");
    assert_eq!(state.cursor_y, 0);
}

#[test]
fn query_edits_recount_matches() {
    let mut d = Dispatcher::new();
    let mut state = state_from("ab\nab\nabc");
    d.dispatch(&mut state, Key::Ctrl('f'));
    for c in "abc".chars() {
        d.dispatch(&mut state, Key::Char(c));
    }
    assert_eq!(state.search.as_ref().unwrap().total_matches, 1);
    d.dispatch(&mut state, Key::Backspace);
    assert_eq!(state.search.as_ref().unwrap().total_matches, 3);
}

#[test]
fn select_copy_cut_and_paste_region() {
    let mut d = Dispatcher::new();
    let mut state = state_from("one\ntwo\nthree\nfour\nfive\nsix");
    // Anchor at the start of line 2, extend to the start of line 5.
    state.cursor_y = 1;
    d.dispatch(&mut state, Key::Ctrl('x'));
    assert_eq!(state.mode, Mode::Select);
    for _ in 0..3 {
        d.dispatch(&mut state, Key::Down);
    }
    d.dispatch(&mut state, Key::Ctrl('k')); // cut selection
    assert_eq!(state.mode, Mode::Normal);
    assert_eq!(buffer_text(&state), "one\nfive\nsix");
    assert_eq!(
        state.clipboard.as_deref(),
        Some(b"two\nthree\nfour\n".as_ref())
    );

    // Paste at the end of the last line: the region reappears there.
    state.cursor_y = 2;
    state.cursor_x = 3;
    d.dispatch(&mut state, Key::Ctrl('v'));
    assert_eq!(buffer_text(&state), "one\nfive\nsixtwo\nthree\nfour\n");
    assert_eq!((state.cursor_y, state.cursor_x), (4, 0));
}

#[test]
fn select_delete_collapses_to_region_start() {
    let mut d = Dispatcher::new();
    let mut state = state_from("hello world");
    state.cursor_x = 5;
    d.dispatch(&mut state, Key::Ctrl('x'));
    for _ in 0..6 {
        d.dispatch(&mut state, Key::Right);
    }
    d.dispatch(&mut state, Key::Backspace);
    assert_eq!(buffer_text(&state), "hello");
    assert_eq!(state.mode, Mode::Normal);
    assert_eq!(state.cursor_x, 5);
}

#[test]
fn printable_key_ends_selection_and_is_inserted() {
    let mut d = Dispatcher::new();
    let mut state = state_from("abc");
    d.dispatch(&mut state, Key::Ctrl('x'));
    d.dispatch(&mut state, Key::Right);
    let result = d.dispatch(&mut state, Key::Char('Z'));
    assert!(!result.quit);
    assert_eq!(state.mode, Mode::Normal);
    // The cursor had moved one right inside the selection.
    assert_eq!(buffer_text(&state), "aZbc");
}

#[test]
fn escape_cancels_selection() {
    let mut d = Dispatcher::new();
    let mut state = state_from("abc");
    d.dispatch(&mut state, Key::Ctrl('x'));
    assert!(state.selection.active);
    d.dispatch(&mut state, Key::Esc);
    assert!(!state.selection.active);
    assert_eq!(state.status.text(), "Mark cancelled");
}

#[test]
fn paste_over_selection_replaces_it() {
    let mut d = Dispatcher::new();
    let mut state = state_from("keep REPLACE keep");
    state.clipboard = Some(b"new".to_vec());
    state.cursor_x = 5;
    d.dispatch(&mut state, Key::Ctrl('x'));
    for _ in 0..7 {
        d.dispatch(&mut state, Key::Right);
    }
    d.dispatch(&mut state, Key::Ctrl('v'));
    assert_eq!(buffer_text(&state), "keep new keep");
    assert_eq!(state.mode, Mode::Normal);
}
