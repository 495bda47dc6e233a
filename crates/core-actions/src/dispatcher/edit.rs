//! Text mutations: character and newline insertion, deletion, line
//! copy/cut/paste, and the kill-to-end-of-line family.
//!
//! Every operation goes through the gap buffer and records exactly one undo
//! entry, then projects the change back onto the row cache: either the
//! affected row is patched in place or, for structural edits (anything that
//! adds or removes newlines in bulk), the cache is fully resynced. In both
//! cases the row cache afterwards equals what a rebuild from the buffer
//! would produce.

use core_state::EditorState;
use core_text::utf8;
use tracing::trace;

/// The cursor may sit one line past the last row (arrow-down at end of
/// file). With a trailing newline in the buffer that position is a real empty
/// line and gets a row; without one it snaps back onto the end of the last
/// row, keeping the row cache equal to a rebuild.
fn settle_phantom_row(state: &mut EditorState) {
    if state.cursor_y < state.rows.len() {
        return;
    }
    if state.rows.is_empty() {
        state.insert_row(0, Vec::new());
        state.cursor_y = 0;
        state.cursor_x = 0;
        return;
    }
    state.cursor_y = state.rows.len();
    if state.byte_offset(state.cursor_y, 0) > state.buffer.len() {
        state.cursor_y = state.rows.len() - 1;
        state.cursor_x = state.rows[state.cursor_y].size();
    } else {
        let at = state.cursor_y;
        state.insert_row(at, Vec::new());
        state.cursor_x = 0;
    }
}

/// Insert one character at the cursor as a single undo record and advance the
/// cursor past it.
pub fn insert_char(state: &mut EditorState, c: char) {
    settle_phantom_row(state);
    let mut encoded = [0u8; 4];
    let bytes = c.encode_utf8(&mut encoded).as_bytes().to_vec();
    let pos = state.cursor_offset();
    if !state.insert_with_undo(pos, &bytes) {
        return;
    }
    let cy = state.cursor_y;
    let cx = state.cursor_x;
    let row = &mut state.rows[cy];
    row.chars.splice(cx..cx, bytes.iter().copied());
    row.update_render();
    state.rehighlight_from(cy);
    state.cursor_x += bytes.len();
    state.modified = true;
    trace!(target: "actions.dispatch", op = "insert_char", line = cy, byte = cx, len = bytes.len(), "edit");
}

/// Insert a newline at the cursor, splitting the current row.
pub fn insert_newline(state: &mut EditorState) {
    if state.cursor_y == state.rows.len()
        && !state.rows.is_empty()
        && state.byte_offset(state.cursor_y, 0) > state.buffer.len()
    {
        // Past-the-end cursor with no trailing newline: the break belongs at
        // the end of the last row.
        state.cursor_y = state.rows.len() - 1;
        state.cursor_x = state.rows[state.cursor_y].size();
    }
    let pos = state.cursor_offset();
    if !state.insert_with_undo(pos, b"\n") {
        return;
    }
    let cy = state.cursor_y;
    if state.cursor_x == 0 {
        state.insert_row(cy, Vec::new());
    } else {
        let tail = state.rows[cy].chars.split_off(state.cursor_x);
        state.rows[cy].update_render();
        state.insert_row(cy + 1, tail);
    }
    state.cursor_y += 1;
    state.cursor_x = 0;
    state.rehighlight_from(cy);
    state.modified = true;
    trace!(target: "actions.dispatch", op = "insert_newline", line = cy, "edit");
}

/// Backspace: remove the character before the cursor, or join with the
/// previous line when the cursor is at column zero.
pub fn delete_char(state: &mut EditorState) {
    if state.cursor_y == state.rows.len() {
        return;
    }
    if state.cursor_x == 0 && state.cursor_y == 0 {
        return;
    }
    let cy = state.cursor_y;
    let row_start = state.byte_offset(cy, 0);
    if state.cursor_x > 0 {
        let prev = utf8::prev_boundary(&state.rows[cy].chars, state.cursor_x);
        let char_len = state.cursor_x - prev;
        state.delete_with_undo(row_start + prev, char_len);
        let cx = state.cursor_x;
        let row = &mut state.rows[cy];
        row.chars.drain(prev..cx);
        row.update_render();
        state.rehighlight_from(cy);
        state.cursor_x = prev;
    } else {
        // Delete the newline that ends the previous row.
        state.delete_with_undo(row_start - 1, 1);
        let tail = std::mem::take(&mut state.rows[cy].chars);
        let prev_len = state.rows[cy - 1].size();
        state.rows[cy - 1].chars.extend_from_slice(&tail);
        state.rows[cy - 1].update_render();
        state.remove_row(cy);
        state.cursor_y -= 1;
        state.cursor_x = prev_len;
        let from = state.cursor_y;
        state.rehighlight_from(from);
    }
    state.modified = true;
    trace!(target: "actions.dispatch", op = "delete_char", line = state.cursor_y, byte = state.cursor_x, "edit");
}

/// Forward delete (DEL): step right one character, then backspace.
pub fn delete_forward(state: &mut EditorState) {
    super::motion::move_cursor(state, core_events::Key::Right);
    delete_char(state);
}

/// Replace the clipboard with a copy of the current line.
pub fn copy_line(state: &mut EditorState, cut: bool) {
    if state.cursor_y >= state.rows.len() {
        return;
    }
    state.clipboard = Some(state.rows[state.cursor_y].chars.clone());
    state
        .status
        .set(if cut { "Text cut" } else { "Text copied" });
}

/// Cut the whole current line (including its newline when one follows) as a
/// single undo record.
pub fn cut_line(state: &mut EditorState) {
    if state.cursor_y >= state.rows.len() {
        return;
    }
    copy_line(state, true);
    let cy = state.cursor_y;
    let start = state.byte_offset(cy, 0);
    let mut len = state.rows[cy].size();
    // Take the newline too; the last row carries one only when the buffer
    // ends with it.
    if cy < state.rows.len() - 1 || start + len < state.buffer.len() {
        len += 1;
    }
    state.delete_with_undo(start, len);
    if state.rows.len() > 1 {
        state.remove_row(cy);
    } else {
        state.rows[0].chars.clear();
        state.rows[0].update_render();
    }
    if state.cursor_y >= state.rows.len() {
        state.cursor_y = state.rows.len() - 1;
    }
    state.cursor_x = 0;
    let from = state.cursor_y;
    state.rehighlight_from(from);
    state.modified = true;
    trace!(target: "actions.dispatch", op = "cut_line", line = cy, "edit");
}

/// Insert the clipboard at the cursor as one undo record.
///
/// Clipboard newlines always create new rows; the cursor lands at the end of
/// the pasted content.
pub fn paste(state: &mut EditorState) {
    let Some(clip) = state.clipboard.clone() else {
        return;
    };
    // Validate the cursor before computing the target offset.
    if state.cursor_y >= state.rows.len() {
        if let Some(last) = state.rows.len().checked_sub(1) {
            state.cursor_y = last;
            state.cursor_x = state.rows[last].size();
        } else {
            state.cursor_y = 0;
            state.cursor_x = 0;
        }
    } else {
        state.cursor_x = state.cursor_x.min(state.rows[state.cursor_y].size());
    }
    let start_x = state.cursor_x;
    let start_y = state.cursor_y;
    let pos = state.cursor_offset();
    if !state.insert_with_undo(pos, &clip) {
        return;
    }
    state.sync_rows();

    let lines_in_paste = clip.iter().filter(|&&b| b == b'\n').count();
    if lines_in_paste == 0 {
        state.cursor_x = start_x + clip.len();
    } else {
        let last_line_len = clip.len() - (clip.iter().rposition(|&b| b == b'\n').unwrap() + 1);
        state.cursor_y = (start_y + lines_in_paste).min(state.rows.len().saturating_sub(1));
        state.cursor_x = last_line_len;
    }
    state.clamp_cursor();
    state.modified = true;
    state.status.set(format!("Pasted {} bytes", clip.len()));
    trace!(target: "actions.dispatch", op = "paste", bytes = clip.len(), lines = lines_in_paste, "edit");
}

/// Ctrl-K in normal mode: cut from the cursor to end of line; at end of line
/// join with the next one; on an empty or final line cut the whole line.
pub fn kill_to_eol(state: &mut EditorState) {
    if state.cursor_y >= state.rows.len() {
        return;
    }
    let cy = state.cursor_y;
    let size = state.rows[cy].size();
    if state.cursor_x < size {
        let cx = state.cursor_x;
        let tail = state.rows[cy].chars[cx..].to_vec();
        state.clipboard = Some(tail.clone());
        let pos = state.byte_offset(cy, cx);
        state.delete_with_undo(pos, tail.len());
        let row = &mut state.rows[cy];
        row.chars.truncate(cx);
        row.update_render();
        state.rehighlight_from(cy);
        state.modified = true;
        state.status.set("Cut to end of line");
    } else if state.cursor_x == size && cy < state.rows.len() - 1 {
        let pos = state.byte_offset(cy, size);
        state.delete_with_undo(pos, 1);
        let next = std::mem::take(&mut state.rows[cy + 1].chars);
        state.rows[cy].chars.extend_from_slice(&next);
        state.rows[cy].update_render();
        state.remove_row(cy + 1);
        state.rehighlight_from(cy);
        state.modified = true;
        state.status.set("Lines joined");
    } else {
        cut_line(state);
    }
}
