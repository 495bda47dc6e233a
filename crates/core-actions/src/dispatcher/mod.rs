//! Key dispatch: routes every decoded key to the handler for the active mode.
//!
//! Exactly one key is processed per tick; an edit is fully applied (buffer
//! mutation, undo record, row resync, rehighlight) before the result reaches
//! the renderer, so intermediate states are never observable.

pub mod browser;
pub mod confirm;
pub mod edit;
pub mod motion;
pub mod prompt;
pub mod search;
pub mod select;

use core_events::Key;
use core_state::{ConfirmAction, EditorState, Mode};
use std::path::Path;
use tracing::trace;

/// What the main loop should do after a key was handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchResult {
    pub quit: bool,
    /// The layout changed wholesale (mode screens, file open); clear the
    /// terminal before composing the next frame.
    pub full_redraw: bool,
}

impl DispatchResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn quit() -> Self {
        Self {
            quit: true,
            ..Self::default()
        }
    }

    pub fn full() -> Self {
        Self {
            full_redraw: true,
            ..Self::default()
        }
    }
}

/// Key router. Owns the only piece of dispatch-local state: the brace
/// auto-indent depth.
#[derive(Debug, Default)]
pub struct Dispatcher {
    indent_level: i32,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispatch(&mut self, state: &mut EditorState, key: Key) -> DispatchResult {
        trace!(target: "actions.dispatch", mode = state.mode.name(), ?key, "key");
        match state.mode {
            Mode::Normal => self.normal_key(state, key),
            Mode::Select => match select::handle_key(state, key) {
                Some(result) => result,
                // The key ended the selection; handle it normally.
                None => self.normal_key(state, key),
            },
            Mode::Search => search::handle_key(state, key),
            Mode::Prompt => prompt::handle_key(state, key),
            Mode::Confirm => confirm::handle_key(state, key),
            Mode::Browser => browser::handle_key(state, key),
            Mode::Help => {
                // Any key leaves the help screen.
                state.restore_mode();
                DispatchResult::full()
            }
        }
    }

    fn normal_key(&mut self, state: &mut EditorState, key: Key) -> DispatchResult {
        match key {
            Key::Enter => {
                edit::insert_newline(state);
                for _ in 0..self.indent_level.max(0) {
                    edit::insert_char(state, '\t');
                }
            }
            Key::Ctrl('q') => {
                if state.modified {
                    state.enter_confirm(
                        "File has been modified. Quit without saving?",
                        ConfirmAction::QuitWithoutSave,
                    );
                } else {
                    return DispatchResult::quit();
                }
            }
            Key::Ctrl('s') => crate::io_ops::save(state),
            Key::Ctrl('x') => {
                state.set_mode(Mode::Select);
                state
                    .status
                    .set_sticky("Mark set - Move cursor to select, ^C=Copy, ^K=Cut, ESC=Cancel");
            }
            Key::Ctrl('c') => edit::copy_line(state, false),
            Key::Ctrl('k') => edit::kill_to_eol(state),
            Key::Ctrl('v') => edit::paste(state),
            Key::Ctrl('z') => {
                if state.undo.undo(&mut state.buffer) {
                    state.sync_rows();
                    state.status.set("Undo performed");
                } else {
                    state.status.set("Nothing to undo");
                }
            }
            Key::Ctrl('r') => {
                if state.undo.redo(&mut state.buffer) {
                    state.sync_rows();
                    state.status.set("Redo performed");
                } else {
                    state.status.set("Nothing to redo");
                }
            }
            Key::Up | Key::Down | Key::Left | Key::Right => motion::move_cursor(state, key),
            Key::PageUp => motion::page_move(state, true),
            Key::PageDown => motion::page_move(state, false),
            Key::Home => motion::line_home(state),
            Key::End => motion::line_end(state),
            Key::Ctrl('f') => {
                state.set_mode(Mode::Search);
                search::update_status(state);
            }
            Key::Ctrl('n') => {
                state.show_line_numbers = !state.show_line_numbers;
                state.status.set(if state.show_line_numbers {
                    "Line numbers enabled"
                } else {
                    "Line numbers disabled"
                });
            }
            Key::Ctrl('o') => {
                state.set_mode(Mode::Browser);
                browser::load_directory(state, Path::new("."), false);
                if state.browser.is_some() {
                    state
                        .status
                        .set_sticky("File Browser: Enter to open, ESC to cancel");
                }
                return DispatchResult::full();
            }
            // Most terminals report Ctrl-? as Ctrl-_ (0x1F).
            Key::Ctrl('?') | Key::Ctrl('_') | Key::Ctrl('/') => {
                state.set_mode(Mode::Help);
                return DispatchResult::full();
            }
            Key::Backspace | Key::Ctrl('h') => edit::delete_char(state),
            Key::Delete => edit::delete_forward(state),
            Key::Ctrl('l') | Key::Esc => {}
            Key::Char('{') => {
                edit::insert_char(state, '{');
                self.indent_level += 1;
            }
            Key::Char('}') => self.close_brace(state),
            Key::Tab => edit::insert_char(state, '\t'),
            Key::Char(c) => edit::insert_char(state, c),
            _ => {}
        }
        DispatchResult::none()
    }

    /// `}` removes one auto-inserted tab sitting before the cursor, then
    /// inserts itself and drops the indent depth.
    fn close_brace(&mut self, state: &mut EditorState) {
        if state.cursor_y < state.rows.len()
            && !(state.cursor_x == 0 && state.cursor_y == 0)
            && state.cursor_x > 0
            && state.rows[state.cursor_y].chars.get(state.cursor_x - 1) == Some(&b'\t')
        {
            edit::delete_char(state);
        }
        edit::insert_char(state, '}');
        self.indent_level -= 1;
    }
}
