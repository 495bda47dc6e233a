//! Cursor motion.
//!
//! Horizontal movement steps whole UTF-8 characters via the boundary helpers;
//! vertical movement clamps the byte column to the destination row and then
//! snaps it back onto a character boundary so the cursor never lands inside a
//! multi-byte sequence.

use core_events::Key;
use core_state::EditorState;
use core_text::utf8;

pub fn move_cursor(state: &mut EditorState, key: Key) {
    match key {
        Key::Left => {
            if state.cursor_x != 0 {
                if let Some(row) = state.rows.get(state.cursor_y) {
                    state.cursor_x = utf8::prev_boundary(&row.chars, state.cursor_x);
                } else {
                    state.cursor_x -= 1;
                }
            } else if state.cursor_y > 0 {
                state.cursor_y -= 1;
                state.cursor_x = state.rows[state.cursor_y].size();
            }
        }
        Key::Right => {
            if let Some(row) = state.rows.get(state.cursor_y) {
                if state.cursor_x < row.size() {
                    state.cursor_x = utf8::next_boundary(&row.chars, state.cursor_x);
                } else {
                    state.cursor_y += 1;
                    state.cursor_x = 0;
                }
            }
        }
        Key::Up => {
            if state.cursor_y != 0 {
                state.cursor_y -= 1;
            }
        }
        Key::Down => {
            if state.cursor_y < state.rows.len() {
                state.cursor_y += 1;
            }
        }
        _ => {}
    }
    clamp_to_row(state);
}

/// Clamp the byte column to the current row and snap to a UTF-8 boundary.
fn clamp_to_row(state: &mut EditorState) {
    let len = state.rows.get(state.cursor_y).map_or(0, |r| r.size());
    state.cursor_x = state.cursor_x.min(len);
    if let Some(row) = state.rows.get(state.cursor_y) {
        while state.cursor_x > 0
            && state.cursor_x < row.size()
            && utf8::is_continuation(row.chars[state.cursor_x])
        {
            state.cursor_x -= 1;
        }
    }
}

/// PageUp/PageDown: jump the cursor to the viewport edge, then move one
/// screenful further.
pub fn page_move(state: &mut EditorState, up: bool) {
    state.cursor_y = if up {
        state.row_offset
    } else {
        state.row_offset + state.screen_rows.saturating_sub(1)
    };
    for _ in 0..state.screen_rows {
        move_cursor(state, if up { Key::Up } else { Key::Down });
    }
}

pub fn line_home(state: &mut EditorState) {
    state.cursor_x = 0;
}

pub fn line_end(state: &mut EditorState) {
    if state.cursor_y < state.rows.len() {
        state.cursor_x = state.rows[state.cursor_y].size();
    }
}
