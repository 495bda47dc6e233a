//! Viewport bookkeeping: keep the cursor visible and derive its rendered
//! column before each frame.

use core_state::EditorState;

/// Width of the line-number gutter (digits of the largest line number plus
/// padding), or zero when the gutter is off.
pub fn gutter_width(state: &EditorState) -> usize {
    if !state.show_line_numbers || state.rows.is_empty() {
        return 0;
    }
    let mut max_line = state.rows.len();
    let mut width = 1;
    while max_line >= 10 {
        width += 1;
        max_line /= 10;
    }
    width + 2
}

/// Scroll the viewport so the cursor stays inside it, horizontally accounting
/// for the gutter.
pub fn scroll(state: &mut EditorState) {
    state.render_x = 0;
    if state.cursor_y < state.rows.len() {
        state.render_x = state.rows[state.cursor_y].cx_to_rx(state.cursor_x);
    }
    if state.cursor_y < state.row_offset {
        state.row_offset = state.cursor_y;
    }
    if state.cursor_y >= state.row_offset + state.screen_rows {
        state.row_offset = (state.cursor_y + 1).saturating_sub(state.screen_rows);
    }
    let available = state.screen_cols.saturating_sub(gutter_width(state)).max(1);
    if state.render_x < state.col_offset {
        state.col_offset = state.render_x;
    }
    if state.render_x >= state.col_offset + available {
        state.col_offset = state.render_x + 1 - available;
    }
}
