//! Incremental search state.
//!
//! Lives only while the editor is in search mode. The cursor/viewport fields
//! capture where the user was when the search began so that Esc can put
//! everything back; `saved_highlight` remembers the classification bytes of
//! the row that currently carries the transient match overlay.

use core_syntax::Highlight;

/// Highlight bytes of one row, stashed before the match overlay is applied.
#[derive(Debug, Clone)]
pub struct SavedHighlight {
    pub row: usize,
    pub classes: Vec<Highlight>,
}

#[derive(Debug, Clone)]
pub struct SearchState {
    pub query: String,
    /// Row index of the most recent hit; `None` until something matched.
    pub last_match: Option<usize>,
    pub forward: bool,
    /// Match counter for the `[n/m]` display.
    pub total_matches: usize,
    pub current_match: usize,
    // Cursor and viewport at search entry, restored on Esc.
    pub saved_cursor_x: usize,
    pub saved_cursor_y: usize,
    pub saved_row_offset: usize,
    pub saved_col_offset: usize,
    pub saved_highlight: Option<SavedHighlight>,
}

impl SearchState {
    pub fn new(cursor_x: usize, cursor_y: usize, row_offset: usize, col_offset: usize) -> Self {
        Self {
            query: String::new(),
            last_match: None,
            forward: true,
            total_matches: 0,
            current_match: 0,
            saved_cursor_x: cursor_x,
            saved_cursor_y: cursor_y,
            saved_row_offset: row_offset,
            saved_col_offset: col_offset,
            saved_highlight: None,
        }
    }
}
