//! Select (mark) mode: an anchored region tracking the cursor.

use core_events::Key;
use core_state::{EditorState, Mode};

use super::{DispatchResult, edit, motion};

/// Handle a key in select mode. `None` means the key ended the selection and
/// should be re-dispatched in normal mode.
pub fn handle_key(state: &mut EditorState, key: Key) -> Option<DispatchResult> {
    match key {
        Key::Esc => {
            state.set_mode(Mode::Normal);
            state.status.set("Mark cancelled");
            Some(DispatchResult::none())
        }
        Key::Up | Key::Down | Key::Left | Key::Right => {
            motion::move_cursor(state, key);
            extend_to_cursor(state);
            Some(DispatchResult::none())
        }
        Key::Home => {
            motion::line_home(state);
            extend_to_cursor(state);
            Some(DispatchResult::none())
        }
        Key::End => {
            motion::line_end(state);
            extend_to_cursor(state);
            Some(DispatchResult::none())
        }
        Key::PageUp | Key::PageDown => {
            motion::page_move(state, key == Key::PageUp);
            extend_to_cursor(state);
            Some(DispatchResult::none())
        }
        Key::Ctrl('c') => {
            copy_selection(state);
            state.set_mode(Mode::Normal);
            state.status.set("Copied marked text");
            Some(DispatchResult::none())
        }
        Key::Ctrl('k') => {
            copy_selection(state);
            delete_selection(state);
            state.status.set("Cut marked text");
            Some(DispatchResult::none())
        }
        Key::Ctrl('v') => {
            // Paste over the selection: collapse it first.
            delete_selection(state);
            edit::paste(state);
            state.set_mode(Mode::Normal);
            Some(DispatchResult::none())
        }
        Key::Delete | Key::Backspace => {
            delete_selection(state);
            Some(DispatchResult::none())
        }
        _ => {
            // Any other key leaves select mode and is handled normally.
            state.set_mode(Mode::Normal);
            None
        }
    }
}

/// Keep the selection end glued to the cursor, clamped into the row cache.
fn extend_to_cursor(state: &mut EditorState) {
    if state.cursor_y >= state.rows.len() && !state.rows.is_empty() {
        state.cursor_y = state.rows.len() - 1;
        state.cursor_x = state.rows[state.cursor_y].size();
    }
    state.selection.extend(state.cursor_x, state.cursor_y);
}

pub fn copy_selection(state: &mut EditorState) {
    if !state.selection.active {
        state.status.set("No selection to copy");
        return;
    }
    if let Some(text) = state.selection.text(&state.rows) {
        let len = text.len();
        state.clipboard = Some(text);
        state.status.set(format!("Selection copied ({len} bytes)"));
    }
}

/// Remove the selected byte range as one undo record, resync, and place the
/// cursor at the collapse point. Always returns to normal mode.
pub fn delete_selection(state: &mut EditorState) {
    if !state.selection.active {
        return;
    }
    let ((start_y, start_x), (end_y, end_x)) = state.selection.normalized();
    let start = state.byte_offset(start_y, start_x);
    let end = state.byte_offset(end_y, end_x);
    if end > start {
        state.delete_with_undo(start, end - start);
        state.sync_rows();
        state.cursor_y = start_y;
        state.cursor_x = start_x;
        state.clamp_cursor();
        state.modified = true;
    }
    state.selection.clear();
    state.set_mode(Mode::Normal);
}
