//! Incremental search.
//!
//! Each keypress refines the query or steps between hits. The previous hit's
//! highlight bytes are restored before every step so the transient `Match`
//! overlay never leaks into the syntax classification. Stepping scans rows
//! with wrap-around starting one past the last hit in the active direction.

use core_events::Key;
use core_state::{EditorState, Mode, SavedHighlight, SearchState};
use core_syntax::Highlight;

pub fn handle_key(state: &mut EditorState, key: Key) -> super::DispatchResult {
    let Some(mut search) = state.search.take() else {
        return super::DispatchResult::none();
    };
    restore_overlay(state, &mut search);
    match key {
        Key::Enter => {
            // Finalize at the current hit; search state is dropped by the
            // mode transition.
            state.set_mode(Mode::Normal);
            return super::DispatchResult::none();
        }
        Key::Esc => {
            state.cursor_x = search.saved_cursor_x;
            state.cursor_y = search.saved_cursor_y;
            state.row_offset = search.saved_row_offset;
            state.col_offset = search.saved_col_offset;
            state.set_mode(Mode::Normal);
            return super::DispatchResult::none();
        }
        Key::Right | Key::Down => {
            search.forward = true;
            step(state, &mut search);
        }
        Key::Left | Key::Up => {
            // Ignored until something has matched.
            if search.last_match.is_some() {
                search.forward = false;
                step(state, &mut search);
            }
        }
        Key::Backspace | Key::Ctrl('h') | Key::Delete => {
            search.query.pop();
            on_query_change(state, &mut search);
        }
        Key::Char(c) if !c.is_control() => {
            search.query.push(c);
            on_query_change(state, &mut search);
        }
        _ => {}
    }
    state.search = Some(search);
    update_status(state);
    super::DispatchResult::none()
}

/// Recount totals and restart the scan after the query text changed.
fn on_query_change(state: &mut EditorState, search: &mut SearchState) {
    search.last_match = None;
    search.forward = true;
    search.current_match = 0;
    search.total_matches = count_matches(state, search.query.as_bytes());
    step(state, search);
}

/// Undo the transient match overlay on the previously hit row.
fn restore_overlay(state: &mut EditorState, search: &mut SearchState) {
    if let Some(saved) = search.saved_highlight.take()
        && let Some(row) = state.rows.get_mut(saved.row)
        && row.highlight.len() == saved.classes.len()
    {
        row.highlight = saved.classes;
    }
}

/// Advance to the next hit in the current direction, wrapping around the
/// file. On a hit: move the cursor, force the scroll to recompute, and lay
/// the `Match` overlay over the hit.
fn step(state: &mut EditorState, search: &mut SearchState) {
    if search.query.is_empty() {
        return;
    }
    let query = search.query.as_bytes();
    let num_rows = state.rows.len() as isize;
    let dir: isize = if search.forward { 1 } else { -1 };
    let mut current = search.last_match.map_or(-1, |m| m as isize);
    for _ in 0..num_rows {
        current += dir;
        if current == -1 {
            current = num_rows - 1;
        } else if current == num_rows {
            current = 0;
        }
        let idx = current as usize;
        let Some(rpos) = find(&state.rows[idx].render, query) else {
            continue;
        };
        search.last_match = Some(idx);
        state.cursor_y = idx;
        state.cursor_x = state.rows[idx].rx_to_cx(rpos);
        // Push the hit onto the next scroll pass (it recomputes from the
        // bottom, landing the match at the top of the viewport).
        state.row_offset = state.rows.len();
        let row = &mut state.rows[idx];
        search.saved_highlight = Some(SavedHighlight {
            row: idx,
            classes: row.highlight.clone(),
        });
        let end = (rpos + query.len()).min(row.highlight.len());
        row.highlight[rpos..end].fill(Highlight::Match);
        if search.total_matches > 0 {
            search.current_match = if search.forward {
                search.current_match % search.total_matches + 1
            } else if search.current_match > 1 {
                search.current_match - 1
            } else {
                search.total_matches
            };
        }
        break;
    }
}

/// Refresh the sticky `Search: ...` help line with the match counter.
pub fn update_status(state: &mut EditorState) {
    let Some(search) = &state.search else {
        return;
    };
    let msg = if search.total_matches > 0 && !search.query.is_empty() {
        format!(
            "Search: {} [{}/{}] (arrows: navigate, Enter: exit, ESC: cancel)",
            search.query, search.current_match, search.total_matches
        )
    } else {
        format!(
            "Search: {} (arrows: navigate, Enter: exit, ESC: cancel)",
            search.query
        )
    };
    state.status.set_sticky(msg);
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn count_matches(state: &EditorState, query: &[u8]) -> usize {
    if query.is_empty() {
        return 0;
    }
    state
        .rows
        .iter()
        .map(|row| {
            let mut n = 0;
            let mut from = 0;
            while let Some(p) = find(&row.render[from..], query) {
                n += 1;
                from += p + 1;
            }
            n
        })
        .sum()
}
