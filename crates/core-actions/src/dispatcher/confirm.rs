//! Confirm mode: a yes/no dialog rendered in the message bar.
//!
//! Arrows toggle the highlighted choice, `y`/`n` jump to it, Enter accepts,
//! Esc (or Ctrl-Q) cancels as "No". The dialog restores whichever mode opened
//! it, so cancelling the browser's save-confirm lands back in the browser.

use core_events::Key;
use core_state::{ConfirmAction, EditorState, Mode};

use super::DispatchResult;

pub fn handle_key(state: &mut EditorState, key: Key) -> DispatchResult {
    let Some(mut confirm) = state.confirm.take() else {
        return DispatchResult::none();
    };
    match key {
        Key::Left | Key::Right => confirm.yes = !confirm.yes,
        Key::Char('y') | Key::Char('Y') => confirm.yes = true,
        Key::Char('n') | Key::Char('N') => confirm.yes = false,
        Key::Esc | Key::Ctrl('q') => {
            state.restore_mode();
            return DispatchResult::full();
        }
        Key::Enter => {
            let yes = confirm.yes;
            let action = confirm.action.clone();
            state.restore_mode();
            match action {
                ConfirmAction::QuitWithoutSave => {
                    if yes {
                        return DispatchResult::quit();
                    }
                    return DispatchResult::none();
                }
                ConfirmAction::SaveBeforeOpen(path) => {
                    if yes {
                        crate::io_ops::save(state);
                        if state.file_name.is_none() {
                            // Save turned into a "Save as" prompt; the open is
                            // abandoned rather than queued behind it.
                            return DispatchResult::none();
                        }
                        match crate::io_ops::open_file(state, &path) {
                            Ok(()) => {
                                state.set_mode(Mode::Normal);
                                state.status.set(format!("Opened: {}", path.display()));
                            }
                            Err(e) => state.status.set(format!("Error: {e:#}")),
                        }
                    }
                    return DispatchResult::full();
                }
            }
        }
        _ => {}
    }
    state.confirm = Some(confirm);
    DispatchResult::none()
}
