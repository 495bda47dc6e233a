//! File open and save.
//!
//! Files are read as bytes with `\r\n` normalized to `\n` at load time so the
//! gap buffer and the row cache agree byte-for-byte. Saving truncates to the
//! new length and writes every row followed by a single `\n`.

use anyhow::{Context, Result};
use core_state::{EditorState, PromptPurpose};
use std::io::Write;
use std::path::Path;
use tracing::{debug, error};

/// Open `path` into the editor: clears the row cache, gap buffer, and undo
/// history before repopulating. The editor state is untouched when the read
/// fails.
pub fn open_file(state: &mut EditorState, path: &Path) -> Result<()> {
    let raw = std::fs::read(path).with_context(|| format!("open {}", path.display()))?;
    let bytes = normalize_newlines(raw);

    state.cursor_x = 0;
    state.cursor_y = 0;
    state.row_offset = 0;
    state.col_offset = 0;
    state.render_x = 0;
    state.file_name = Some(path.to_path_buf());
    state.undo.clear();
    state
        .buffer
        .load(&mut bytes.as_slice())
        .with_context(|| format!("load {}", path.display()))?;
    state.select_syntax();
    state.sync_rows();
    state.modified = false;
    debug!(target: "io", file = %path.display(), bytes = bytes.len(), rows = state.rows.len(), "file_read_ok");
    Ok(())
}

/// Save the buffer. Without a file name this turns into a "Save as" prompt
/// and returns; the prompt completion calls back into here.
pub fn save(state: &mut EditorState) {
    let Some(path) = state.file_name.clone() else {
        state.enter_prompt("Save as: ", PromptPurpose::SaveAs);
        return;
    };
    match write_rows(state, &path) {
        Ok(len) => {
            state.modified = false;
            state.buffer.set_modified(false);
            if len >= 1024 {
                state.status.set(format!("{} KiB written to disk", len >> 10));
            } else {
                state.status.set(format!("{len} B written to disk"));
            }
            debug!(target: "io", file = %path.display(), bytes = len, "file_write_ok");
        }
        Err(e) => {
            // The buffer stays modified; nothing was lost.
            error!(target: "io", file = %path.display(), error = %e, "file_write_error");
            state.status.set(format!("Error: {e:#}"));
        }
    }
}

/// Serialize the row cache: every row followed by `\n`.
pub fn rows_to_bytes(state: &EditorState) -> Vec<u8> {
    let mut out = Vec::with_capacity(state.buffer.len() + state.rows.len());
    for row in &state.rows {
        out.extend_from_slice(&row.chars);
        out.push(b'\n');
    }
    out
}

fn write_rows(state: &EditorState, path: &Path) -> Result<usize> {
    let bytes = rows_to_bytes(state);
    let mut options = std::fs::OpenOptions::new();
    options.read(true).write(true).create(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o644);
    }
    let mut file = options
        .open(path)
        .with_context(|| format!("open {}", path.display()))?;
    file.set_len(bytes.len() as u64)
        .with_context(|| format!("truncate {}", path.display()))?;
    file.write_all(&bytes)
        .with_context(|| format!("write {}", path.display()))?;
    Ok(bytes.len())
}

/// Drop the `\r` of every `\r\n` pair; lone `\r` bytes pass through.
fn normalize_newlines(raw: Vec<u8>) -> Vec<u8> {
    if !raw.contains(&b'\r') {
        return raw;
    }
    let mut out = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        if raw[i] == b'\r' && raw.get(i + 1) == Some(&b'\n') {
            i += 1;
            continue;
        }
        out.push(raw[i]);
        i += 1;
    }
    out
}
