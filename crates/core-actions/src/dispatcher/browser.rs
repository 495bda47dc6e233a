//! File browser mode: directory listing, navigation, and opening.

use core_events::Key;
use core_state::{BrowserEntry, BrowserState, ConfirmAction, EditorState, Mode};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::DispatchResult;

pub fn handle_key(state: &mut EditorState, key: Key) -> DispatchResult {
    match key {
        Key::Esc | Key::Ctrl('q') => {
            state.set_mode(Mode::Normal);
            return DispatchResult::full();
        }
        Key::Enter => return open_selected(state),
        Key::Char('h') | Key::Char('H') => {
            if let Some(browser) = state.browser.as_ref() {
                let dir = browser.dir.clone();
                let show_hidden = !browser.show_hidden;
                load_directory(state, &dir, show_hidden);
            }
            return DispatchResult::none();
        }
        _ => {}
    }
    let page = state.screen_rows.saturating_sub(1);
    if let Some(browser) = state.browser.as_mut() {
        let last = browser.entries.len().saturating_sub(1);
        match key {
            Key::Up => browser.selected = browser.selected.saturating_sub(1),
            Key::Down => browser.selected = (browser.selected + 1).min(last),
            Key::PageUp => browser.selected = browser.selected.saturating_sub(page),
            Key::PageDown => browser.selected = (browser.selected + page).min(last),
            Key::Home => browser.selected = 0,
            Key::End => browser.selected = last,
            _ => {}
        }
    }
    DispatchResult::none()
}

/// Read `path` into fresh browser state: directories before files, both
/// case-insensitively sorted, hidden entries skipped unless requested, and a
/// synthetic `..` on top whenever the directory has a parent.
pub fn load_directory(state: &mut EditorState, path: &Path, show_hidden: bool) {
    let read = match std::fs::read_dir(path) {
        Ok(read) => read,
        Err(e) => {
            // Leave browser mode first; entering normal mode clears the
            // message bar.
            state.set_mode(Mode::Normal);
            state.status.set(format!("Cannot open directory: {e}"));
            return;
        }
    };
    let mut entries = Vec::new();
    if path != Path::new("/") {
        entries.push(BrowserEntry {
            name: "..".into(),
            is_dir: true,
        });
    }
    for de in read.flatten() {
        let name = de.file_name().to_string_lossy().into_owned();
        if !show_hidden && name.starts_with('.') {
            continue;
        }
        // stat (follows symlinks); unreadable entries are skipped.
        let Ok(meta) = std::fs::metadata(de.path()) else {
            continue;
        };
        if meta.is_dir() || meta.is_file() {
            entries.push(BrowserEntry {
                name,
                is_dir: meta.is_dir(),
            });
        }
    }
    entries.sort_by(|a, b| {
        b.is_dir
            .cmp(&a.is_dir)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });
    debug!(target: "actions.browser", dir = %path.display(), entries = entries.len(), show_hidden, "load_directory");
    state.browser = Some(BrowserState {
        entries,
        selected: 0,
        offset: 0,
        dir: path.to_path_buf(),
        show_hidden,
    });
}

fn open_selected(state: &mut EditorState) -> DispatchResult {
    let Some(browser) = state.browser.as_ref() else {
        return DispatchResult::none();
    };
    let Some(entry) = browser.entries.get(browser.selected) else {
        return DispatchResult::none();
    };
    let dir = browser.dir.clone();
    let name = entry.name.clone();
    let is_dir = entry.is_dir;
    let show_hidden = browser.show_hidden;

    if is_dir {
        let new_dir = if name == ".." {
            match dir.parent() {
                Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
                _ => PathBuf::from("/"),
            }
        } else {
            dir.join(&name)
        };
        load_directory(state, &new_dir, show_hidden);
        return DispatchResult::none();
    }

    let full = dir.join(&name);
    if state.modified {
        state.enter_confirm(
            "Current file has been modified. Save before opening new file?",
            ConfirmAction::SaveBeforeOpen(full),
        );
        return DispatchResult::none();
    }
    open_and_report(state, &full)
}

pub(crate) fn open_and_report(state: &mut EditorState, path: &Path) -> DispatchResult {
    match crate::io_ops::open_file(state, path) {
        Ok(()) => {
            state.set_mode(Mode::Normal);
            state.status.set(format!("Opened: {}", path.display()));
            DispatchResult::full()
        }
        Err(e) => {
            state.status.set(format!("Error: {e:#}"));
            DispatchResult::none()
        }
    }
}
