//! Editor state: the gap buffer, its derived row cache, edit history,
//! selection, mode machine state, and the status line message.
//!
//! The dual text model works like this: the gap buffer in `core-text` is the
//! source of truth; `rows` is a derived per-line view used by rendering,
//! search, and syntax analysis. Edit operations either patch the affected row
//! in place or call [`EditorState::sync_rows`], but in both cases the row
//! cache must afterwards equal what a full rebuild from the buffer would
//! produce. History operations (undo/redo) and structural edits always
//! resync.
//!
//! Mode-local state (search, prompt, confirm, browser) is owned here as
//! `Option`s that are populated on mode entry and dropped on exit, so stale
//! row indices can never outlive the mode that created them.

pub mod browser;
pub mod row;
pub mod search;
pub mod selection;
pub mod undo;

pub use browser::{BrowserEntry, BrowserState};
pub use row::{Row, TAB_STOP};
pub use search::{SavedHighlight, SearchState};
pub use selection::Selection;
pub use undo::{EditKind, EditRecord, MAX_UNDO_LEVELS, UndoStack};

use core_syntax::{LineHighlight, Syntax};
use core_text::GapBuffer;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// How long a transient status message stays visible.
pub const STATUS_TTL: Duration = Duration::from_secs(5);

/// Input-routing states of the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Normal,
    Select,
    Search,
    Prompt,
    Confirm,
    Help,
    Browser,
}

impl Mode {
    /// Tag shown in the status bar.
    pub fn name(self) -> &'static str {
        match self {
            Mode::Normal => "NORMAL",
            Mode::Select => "SELECT",
            Mode::Search => "SEARCH",
            Mode::Prompt => "PROMPT",
            Mode::Confirm => "CONFIRM",
            Mode::Help => "HELP",
            Mode::Browser => "BROWSER",
        }
    }
}

/// Status line message with its display policy.
#[derive(Debug, Default)]
pub struct StatusMessage {
    text: String,
    at: Option<Instant>,
    sticky: bool,
}

impl StatusMessage {
    /// Set a transient message (expires after [`STATUS_TTL`]).
    pub fn set(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.at = Some(Instant::now());
        self.sticky = false;
    }

    /// Set a message that stays until replaced (search/browser help lines).
    pub fn set_sticky(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.at = Some(Instant::now());
        self.sticky = true;
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.at = None;
        self.sticky = false;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_visible(&self) -> bool {
        if self.text.is_empty() {
            return false;
        }
        self.sticky || self.at.is_some_and(|at| at.elapsed() < STATUS_TTL)
    }
}

/// What an active prompt is collecting input for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptPurpose {
    SaveAs,
}

#[derive(Debug, Clone)]
pub struct PromptState {
    pub label: String,
    pub input: String,
    pub purpose: PromptPurpose,
}

/// What a confirm dialog will do when accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    QuitWithoutSave,
    SaveBeforeOpen(PathBuf),
}

#[derive(Debug, Clone)]
pub struct ConfirmState {
    pub message: String,
    /// Currently highlighted choice; defaults to No.
    pub yes: bool,
    pub action: ConfirmAction,
}

/// Top-level editor state. One instance owns every core structure for the
/// lifetime of the process.
pub struct EditorState {
    pub buffer: GapBuffer,
    pub rows: Vec<Row>,
    pub undo: UndoStack,

    /// Cursor position: `cursor_x` is a byte offset into
    /// `rows[cursor_y].chars` and always lies on a UTF-8 boundary.
    pub cursor_x: usize,
    pub cursor_y: usize,
    /// Cursor column after tab expansion, recomputed before every render.
    pub render_x: usize,
    pub row_offset: usize,
    pub col_offset: usize,
    /// Text area size (status and message bars excluded).
    pub screen_rows: usize,
    pub screen_cols: usize,

    pub modified: bool,
    pub file_name: Option<PathBuf>,
    pub clipboard: Option<Vec<u8>>,
    pub selection: Selection,
    pub syntax: Option<&'static Syntax>,
    pub show_line_numbers: bool,

    pub mode: Mode,
    pub prev_mode: Mode,
    pub search: Option<SearchState>,
    pub prompt: Option<PromptState>,
    pub confirm: Option<ConfirmState>,
    pub browser: Option<BrowserState>,

    pub status: StatusMessage,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorState {
    pub fn new() -> Self {
        Self {
            buffer: GapBuffer::default(),
            rows: Vec::new(),
            undo: UndoStack::new(),
            cursor_x: 0,
            cursor_y: 0,
            render_x: 0,
            row_offset: 0,
            col_offset: 0,
            screen_rows: 22,
            screen_cols: 80,
            modified: false,
            file_name: None,
            clipboard: None,
            selection: Selection::default(),
            syntax: None,
            show_line_numbers: false,
            mode: Mode::Normal,
            prev_mode: Mode::Normal,
            search: None,
            prompt: None,
            confirm: None,
            browser: None,
            status: StatusMessage::default(),
        }
    }

    /// Update cached terminal geometry. Two rows are reserved for the status
    /// and message bars.
    pub fn set_screen_size(&mut self, cols: usize, rows: usize) {
        self.screen_cols = cols;
        self.screen_rows = rows.saturating_sub(2);
    }

    #[inline]
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn current_row(&self) -> Option<&Row> {
        self.rows.get(self.cursor_y)
    }

    /// Map row/byte coordinates to a gap-buffer offset: the sizes of all
    /// preceding rows plus their newlines, plus `x`.
    pub fn byte_offset(&self, y: usize, x: usize) -> usize {
        let mut pos = 0;
        for row in self.rows.iter().take(y.min(self.rows.len())) {
            pos += row.size() + 1;
        }
        pos + x
    }

    pub fn cursor_offset(&self) -> usize {
        self.byte_offset(self.cursor_y, self.cursor_x)
    }

    // ------------------------------------------------------------------
    // Row cache synchronization
    // ------------------------------------------------------------------

    /// Rebuild the whole row cache from the gap buffer.
    ///
    /// Runs after history operations and structural edits. The cursor is
    /// preserved by clamping; the modified flag is taken from the buffer.
    pub fn sync_rows(&mut self) {
        let bytes = self.buffer.to_bytes();
        self.rows.clear();
        let mut start = 0;
        while start < bytes.len() {
            let end = bytes[start..]
                .iter()
                .position(|&b| b == b'\n')
                .map_or(bytes.len(), |p| start + p);
            let idx = self.rows.len();
            self.rows.push(Row::new(idx, bytes[start..end].to_vec()));
            start = end + 1;
        }
        if self.rows.is_empty() {
            self.rows.push(Row::new(0, Vec::new()));
        }
        self.modified = self.buffer.modified();
        self.clamp_cursor();
        self.rehighlight_all();
        trace!(target: "state.rows", rows = self.rows.len(), bytes = bytes.len(), "sync");
    }

    /// Clamp the cursor into the current row cache.
    pub fn clamp_cursor(&mut self) {
        if self.rows.is_empty() {
            self.cursor_x = 0;
            self.cursor_y = 0;
            return;
        }
        if self.cursor_y >= self.rows.len() {
            self.cursor_y = self.rows.len() - 1;
        }
        self.cursor_x = self.cursor_x.min(self.rows[self.cursor_y].size());
    }

    /// Insert a row at `at` and renumber everything after it.
    pub fn insert_row(&mut self, at: usize, chars: Vec<u8>) {
        if at > self.rows.len() {
            return;
        }
        self.rows.insert(at, Row::new(at, chars));
        self.renumber(at + 1);
    }

    /// Remove the row at `at` and renumber everything after it.
    pub fn remove_row(&mut self, at: usize) {
        if at >= self.rows.len() {
            return;
        }
        self.rows.remove(at);
        self.renumber(at);
    }

    fn renumber(&mut self, from: usize) {
        for i in from..self.rows.len() {
            self.rows[i].idx = i;
        }
    }

    // ------------------------------------------------------------------
    // Highlighting
    // ------------------------------------------------------------------

    /// Re-run the highlighter on row `idx` and propagate the open-comment
    /// flag forward while it keeps changing.
    ///
    /// This is the loop form of the forward propagation: it halts at the
    /// first row whose flag is unchanged, which happens no later than the
    /// last row of the file.
    pub fn rehighlight_from(&mut self, idx: usize) {
        let mut i = idx;
        while i < self.rows.len() {
            let starts_open = i > 0 && self.rows[i - 1].open_comment;
            let lh = match self.syntax {
                Some(syntax) => core_syntax::scan_line(syntax, &self.rows[i].render, starts_open),
                None => LineHighlight::plain(self.rows[i].render_size()),
            };
            let changed = self.rows[i].open_comment != lh.open_comment;
            self.rows[i].highlight = lh.classes;
            self.rows[i].open_comment = lh.open_comment;
            i += 1;
            if !changed {
                break;
            }
        }
    }

    pub fn rehighlight_all(&mut self) {
        for i in 0..self.rows.len() {
            let starts_open = i > 0 && self.rows[i - 1].open_comment;
            let lh = match self.syntax {
                Some(syntax) => core_syntax::scan_line(syntax, &self.rows[i].render, starts_open),
                None => LineHighlight::plain(self.rows[i].render_size()),
            };
            self.rows[i].highlight = lh.classes;
            self.rows[i].open_comment = lh.open_comment;
        }
    }

    /// Pick a language for the current file name and re-classify every row.
    pub fn select_syntax(&mut self) {
        self.syntax = self
            .file_name
            .as_deref()
            .and_then(|p| p.to_str())
            .and_then(core_syntax::detect);
        self.rehighlight_all();
        debug!(target: "state.syntax", syntax = self.syntax.map(|s| s.name), "select_syntax");
    }

    // ------------------------------------------------------------------
    // Undo-tracked buffer mutations
    // ------------------------------------------------------------------

    /// Insert into the gap buffer and record the edit. Returns false and
    /// leaves everything unchanged when the buffer cannot grow.
    pub fn insert_with_undo(&mut self, pos: usize, bytes: &[u8]) -> bool {
        if !self.buffer.insert(pos, bytes) {
            self.status.set("Out of memory: insert failed");
            return false;
        }
        self.undo.push(EditKind::Insert, pos, bytes);
        true
    }

    /// Delete from the gap buffer, saving the removed bytes in the history.
    pub fn delete_with_undo(&mut self, pos: usize, len: usize) {
        let removed = self.buffer.copy_range(pos, pos + len);
        if !removed.is_empty() {
            self.undo.push(EditKind::Delete, pos, &removed);
        }
        self.buffer.delete(pos, len);
    }

    // ------------------------------------------------------------------
    // Mode machine
    // ------------------------------------------------------------------

    /// Switch input modes, dropping the old mode's local state and
    /// initializing the new one.
    pub fn set_mode(&mut self, mode: Mode) {
        // Sub-dialogs restore their caller, so entering one must not
        // overwrite the saved mode.
        if !matches!(self.mode, Mode::Prompt | Mode::Confirm | Mode::Help) {
            self.prev_mode = self.mode;
        }
        match self.mode {
            Mode::Search => self.search = None,
            Mode::Prompt => self.prompt = None,
            Mode::Confirm => self.confirm = None,
            // The browser survives its own sub-dialogs (save-before-open).
            Mode::Browser if !matches!(mode, Mode::Prompt | Mode::Confirm | Mode::Help) => {
                self.browser = None;
            }
            _ => {}
        }
        trace!(target: "state.mode", from = self.mode.name(), to = mode.name(), "transition");
        self.mode = mode;
        match mode {
            Mode::Select => {
                if self.cursor_y >= self.rows.len() && !self.rows.is_empty() {
                    self.cursor_y = self.rows.len() - 1;
                    self.cursor_x = self.rows[self.cursor_y].size();
                }
                self.selection.begin(self.cursor_x, self.cursor_y);
                self.status
                    .set_sticky("-- SELECT MODE -- Use arrows to extend, ESC to cancel");
            }
            Mode::Search => {
                self.search = Some(SearchState::new(
                    self.cursor_x,
                    self.cursor_y,
                    self.row_offset,
                    self.col_offset,
                ));
            }
            Mode::Help => {
                self.status.set_sticky("-- HELP -- Press any key to exit");
            }
            Mode::Normal => {
                self.selection.clear();
                self.status.clear();
            }
            _ => {}
        }
    }

    /// Return from a temporary mode to whatever was active before it.
    pub fn restore_mode(&mut self) {
        self.set_mode(self.prev_mode);
    }

    pub fn enter_prompt(&mut self, label: impl Into<String>, purpose: PromptPurpose) {
        let label = label.into();
        self.set_mode(Mode::Prompt);
        self.status.set_sticky(format!("{label} (ESC to cancel)"));
        self.prompt = Some(PromptState {
            label,
            input: String::new(),
            purpose,
        });
    }

    pub fn enter_confirm(&mut self, message: impl Into<String>, action: ConfirmAction) {
        self.set_mode(Mode::Confirm);
        self.confirm = Some(ConfirmState {
            message: message.into(),
            yes: false,
            action,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(text: &str) -> EditorState {
        let mut state = EditorState::new();
        state.buffer.insert(0, text.as_bytes());
        state.buffer.set_modified(false);
        state.sync_rows();
        state
    }

    fn rows_text(state: &EditorState) -> Vec<String> {
        state
            .rows
            .iter()
            .map(|r| String::from_utf8(r.chars.clone()).unwrap())
            .collect()
    }

    #[test]
    fn sync_splits_on_newlines() {
        let state = state_with("one\ntwo\nthree");
        assert_eq!(rows_text(&state), ["one", "two", "three"]);
        assert_eq!(state.rows[2].idx, 2);
    }

    #[test]
    fn sync_of_empty_buffer_yields_one_empty_row() {
        let state = state_with("");
        assert_eq!(state.num_rows(), 1);
        assert_eq!(state.rows[0].size(), 0);
    }

    #[test]
    fn trailing_newline_does_not_create_a_row() {
        let state = state_with("a\nb\n");
        assert_eq!(rows_text(&state), ["a", "b"]);
    }

    #[test]
    fn row_concatenation_matches_buffer() {
        // Invariant: joining rows with '\n' reproduces the logical text
        // (modulo a trailing newline).
        let state = state_with("alpha\nbeta\ngamma");
        let joined = rows_text(&state).join("\n");
        assert_eq!(joined.as_bytes(), state.buffer.to_bytes());
        let total: usize = state.rows.iter().map(|r| r.size()).sum();
        assert_eq!(state.buffer.len(), total + state.num_rows() - 1);
    }

    #[test]
    fn byte_offset_accounts_for_newlines() {
        let state = state_with("ab\ncd\nef");
        assert_eq!(state.byte_offset(0, 0), 0);
        assert_eq!(state.byte_offset(1, 0), 3);
        assert_eq!(state.byte_offset(2, 1), 7);
    }

    #[test]
    fn sync_clamps_cursor() {
        let mut state = state_with("one\ntwo");
        state.cursor_y = 5;
        state.cursor_x = 99;
        state.buffer.delete(3, 4); // drop "\ntwo"
        state.sync_rows();
        assert_eq!(state.cursor_y, 0);
        assert_eq!(state.cursor_x, 3);
    }

    #[test]
    fn insert_and_remove_row_renumber() {
        let mut state = state_with("a\nb\nc");
        state.insert_row(1, b"x".to_vec());
        assert_eq!(rows_text(&state), ["a", "x", "b", "c"]);
        for (i, row) in state.rows.iter().enumerate() {
            assert_eq!(row.idx, i);
        }
        state.remove_row(2);
        assert_eq!(rows_text(&state), ["a", "x", "c"]);
        for (i, row) in state.rows.iter().enumerate() {
            assert_eq!(row.idx, i);
        }
    }

    #[test]
    fn block_comment_state_propagates_across_rows() {
        let mut state = state_with("int a;\n/* open\nstill in\nend */ int b;\nint c;");
        state.file_name = Some("test.c".into());
        state.select_syntax();
        assert!(state.rows[1].open_comment);
        assert!(state.rows[2].open_comment);
        assert!(!state.rows[3].open_comment);
        use core_syntax::Highlight;
        assert!(
            state.rows[2]
                .highlight
                .iter()
                .all(|&h| h == Highlight::BlockComment)
        );
        // Closing line: comment classes up to "*/", then code again.
        assert_eq!(state.rows[3].highlight[0], Highlight::BlockComment);
        let render = state.rows[3].render.clone();
        let int_at = render.windows(3).position(|w| w == b"int").unwrap();
        assert_eq!(state.rows[3].highlight[int_at], Highlight::Type);
    }

    #[test]
    fn deleting_comment_open_reverts_following_rows() {
        let mut state = state_with("/* a\nb\nc */\nint x;");
        state.file_name = Some("t.c".into());
        state.select_syntax();
        assert!(state.rows[0].open_comment);
        use core_syntax::Highlight;
        assert_eq!(state.rows[1].highlight[0], Highlight::BlockComment);

        // Break the opener: "/* a" -> "/ a" and rescan from row 0.
        state.rows[0].chars = b"/ a".to_vec();
        state.rows[0].update_render();
        state.rehighlight_from(0);
        assert!(!state.rows[0].open_comment);
        assert_ne!(state.rows[1].highlight[0], Highlight::BlockComment);
        assert_eq!(state.rows[3].highlight[0], Highlight::Type);
    }

    #[test]
    fn rehighlight_from_stops_when_state_stabilizes() {
        let mut state = state_with("int a;\nint b;\nint c;");
        state.file_name = Some("t.c".into());
        state.select_syntax();
        // No comment state anywhere: a rescan of row 0 must not disturb
        // later rows' flags.
        state.rehighlight_from(0);
        assert!(state.rows.iter().all(|r| !r.open_comment));
    }

    #[test]
    fn mode_transitions_keep_prev_for_sub_dialogs() {
        let mut state = state_with("x");
        state.set_mode(Mode::Browser);
        state.browser = Some(BrowserState::default());
        state.enter_confirm("sure?", ConfirmAction::QuitWithoutSave);
        assert_eq!(state.prev_mode, Mode::Browser);
        assert!(state.browser.is_some(), "browser survives its sub-dialog");
        state.restore_mode();
        assert_eq!(state.mode, Mode::Browser);
        assert!(state.confirm.is_none());
    }

    #[test]
    fn leaving_search_drops_its_state() {
        let mut state = state_with("x");
        state.set_mode(Mode::Search);
        assert!(state.search.is_some());
        state.set_mode(Mode::Normal);
        assert!(state.search.is_none());
        assert!(!state.selection.active);
    }

    #[test]
    fn select_mode_anchors_at_cursor() {
        let mut state = state_with("hello");
        state.cursor_x = 2;
        state.set_mode(Mode::Select);
        assert!(state.selection.active);
        assert_eq!(state.selection.start_x, 2);
        assert_eq!(state.selection.end_x, 2);
    }

    #[test]
    fn status_message_expiry_and_sticky() {
        let mut msg = StatusMessage::default();
        assert!(!msg.is_visible());
        msg.set("hi");
        assert!(msg.is_visible());
        msg.set_sticky("stay");
        assert!(msg.is_visible());
        msg.clear();
        assert!(!msg.is_visible());
    }

    #[test]
    fn undo_wrappers_record_and_reverse() {
        let mut state = state_with("hello");
        let pos = state.byte_offset(0, 5);
        assert!(state.insert_with_undo(pos, b" world"));
        state.sync_rows();
        assert_eq!(rows_text(&state), ["hello world"]);

        state.delete_with_undo(0, 6);
        state.sync_rows();
        assert_eq!(rows_text(&state), ["world"]);

        assert!(state.undo.undo(&mut state.buffer));
        state.sync_rows();
        assert_eq!(rows_text(&state), ["hello world"]);
        assert!(state.undo.undo(&mut state.buffer));
        state.sync_rows();
        assert_eq!(rows_text(&state), ["hello"]);
    }
}
