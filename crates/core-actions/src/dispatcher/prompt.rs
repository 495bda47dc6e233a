//! Prompt mode: a one-line input dialog that saves its caller mode and
//! restores it on completion. Currently only used for "Save as".

use core_events::Key;
use core_state::{EditorState, PromptPurpose};
use std::path::PathBuf;

use super::DispatchResult;

pub fn handle_key(state: &mut EditorState, key: Key) -> DispatchResult {
    let Some(mut prompt) = state.prompt.take() else {
        return DispatchResult::none();
    };
    match key {
        Key::Backspace | Key::Ctrl('h') | Key::Delete => {
            prompt.input.pop();
        }
        Key::Esc => {
            state.restore_mode();
            state.status.set("Save aborted");
            return DispatchResult::none();
        }
        Key::Enter => {
            if !prompt.input.is_empty() {
                match prompt.purpose {
                    PromptPurpose::SaveAs => {
                        state.file_name = Some(PathBuf::from(&prompt.input));
                        state.select_syntax();
                        state.restore_mode();
                        crate::io_ops::save(state);
                        return DispatchResult::none();
                    }
                }
            }
        }
        Key::Char(c) if !c.is_control() => prompt.input.push(c),
        _ => {}
    }
    state
        .status
        .set_sticky(format!("{}{} (ESC to cancel)", prompt.label, prompt.input));
    state.prompt = Some(prompt);
    DispatchResult::none()
}
