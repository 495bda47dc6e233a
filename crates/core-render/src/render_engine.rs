//! Frame assembly for the three screen layouts: the editor, the file
//! browser, and the help screen.

use crate::status::{self, Clock};
use crate::{FrameBuffer, viewport};
use core_state::{EditorState, Mode};
use core_syntax::Highlight;
use core_text::utf8;
use std::io::Write;
use tracing::trace;

/// Per-frame inputs that do not live in the editor state.
#[derive(Debug, Default, Clone, Copy)]
pub struct RenderContext {
    /// Status-bar clock; `None` hides the field and keeps frames
    /// reproducible.
    pub clock: Option<Clock>,
}

/// Compose the frame for the current mode and write it in a single
/// `write_all` + `flush`.
pub fn refresh<W: Write>(
    out: &mut W,
    state: &mut EditorState,
    ctx: &RenderContext,
    full: bool,
) -> anyhow::Result<()> {
    let frame = compose_frame(state, ctx, full);
    out.write_all(&frame)?;
    out.flush()?;
    trace!(target: "render", bytes = frame.len(), mode = state.mode.name(), full, "frame");
    Ok(())
}

/// Build the complete frame as one byte vector. `full` prefixes a
/// clear-screen, used after layout-changing mode transitions.
pub fn compose_frame(state: &mut EditorState, ctx: &RenderContext, full: bool) -> Vec<u8> {
    match state.mode {
        Mode::Browser => compose_browser(state, ctx),
        Mode::Help => compose_help(state, ctx),
        _ => compose_editor(state, ctx, full),
    }
}

fn compose_editor(state: &mut EditorState, ctx: &RenderContext, full: bool) -> Vec<u8> {
    viewport::scroll(state);
    let mut fb = FrameBuffer::new();
    fb.hide_cursor();
    if full {
        fb.clear_screen();
    }
    fb.cursor_home();
    draw_rows(state, &mut fb);
    status::draw_status_bar(state, ctx.clock, &mut fb);
    status::draw_message_bar(state, &mut fb);
    let gutter = viewport::gutter_width(state);
    let cursor_row = state.cursor_y.saturating_sub(state.row_offset) + 1;
    let cursor_col = state.render_x.saturating_sub(state.col_offset) + 1 + gutter;
    fb.move_to(cursor_row, cursor_col);
    fb.show_cursor();
    fb.into_bytes()
}

fn draw_rows(state: &EditorState, fb: &mut FrameBuffer) {
    let gutter = viewport::gutter_width(state);
    for y in 0..state.screen_rows {
        let file_row = y + state.row_offset;
        if gutter > 0 {
            if file_row < state.rows.len() {
                fb.push_str("\x1b[90m"); // dark grey
                fb.push_str(&format!("{:>width$} ", file_row + 1, width = gutter - 1));
                fb.push_str("\x1b[0m");
            } else {
                for _ in 0..gutter {
                    fb.push_byte(b' ');
                }
            }
        }
        if file_row >= state.rows.len() {
            fb.push_byte(b'~');
        } else {
            draw_row(state, file_row, gutter, fb);
        }
        fb.clear_line();
        fb.newline();
    }
}

/// Emit one row's visible slice with SGR runs for highlight transitions,
/// inverse video for the selection, search matches, and control characters.
fn draw_row(state: &EditorState, file_row: usize, gutter: usize, fb: &mut FrameBuffer) {
    let row = &state.rows[file_row];
    let available = state.screen_cols.saturating_sub(gutter);
    let render = &row.render;

    // Slice [col_offset, col_offset + available), snapped outward to UTF-8
    // boundaries so a partial sequence is never emitted.
    let mut start = state.col_offset.min(render.len());
    while start < render.len() && utf8::is_continuation(render[start]) {
        start += 1;
    }
    let mut end = (start + available).min(render.len());
    while end > start && end < render.len() && utf8::is_continuation(render[end]) {
        end -= 1;
    }

    let mut current_color: Option<u8> = None;
    let mut in_selection = false;
    for j in start..end {
        let b = render[j];
        let selected = state.selection.contains(row.rx_to_cx(j), file_row);
        if selected && !in_selection {
            fb.push_str("\x1b[7m");
            in_selection = true;
        } else if !selected && in_selection {
            fb.push_str("\x1b[27m");
            in_selection = false;
        }
        let class = row.highlight[j];
        if b < 0x20 || b == 0x7F {
            // Control bytes display as ^A..^Z (or '?') in inverse video.
            let sym = if b <= 26 { b'@' + b } else { b'?' };
            fb.push_str("\x1b[7m");
            fb.push_byte(sym);
            fb.sgr_reset();
            if let Some(color) = current_color {
                fb.sgr(color);
            }
        } else if class == Highlight::Normal {
            if current_color.is_some() {
                fb.push_str("\x1b[39m");
                current_color = None;
            }
            fb.push_byte(b);
        } else if class == Highlight::Match {
            fb.push_str("\x1b[7m");
            fb.push_byte(b);
            fb.push_str("\x1b[27m");
            if let Some(color) = current_color {
                fb.sgr(color);
            }
        } else {
            let color = class.color();
            if current_color != Some(color) {
                current_color = Some(color);
                fb.sgr(color);
            }
            fb.push_byte(b);
        }
    }
    if in_selection {
        fb.push_str("\x1b[27m");
    }
    fb.push_str("\x1b[39m");
}

fn compose_browser(state: &mut EditorState, ctx: &RenderContext) -> Vec<u8> {
    let visible = state.screen_rows.saturating_sub(1).max(1);
    if let Some(browser) = state.browser.as_mut() {
        if browser.selected < browser.offset {
            browser.offset = browser.selected;
        }
        if browser.selected >= browser.offset + visible {
            browser.offset = browser.selected + 1 - visible;
        }
    }

    let mut fb = FrameBuffer::new();
    fb.hide_cursor();
    fb.clear_screen();
    fb.cursor_home();
    if let Some(browser) = state.browser.as_ref() {
        fb.push_str("\x1b[7m");
        fb.push_str(&format!("=== File Browser: {} ===", browser.dir.display()));
        fb.push_str("\x1b[0m");
        fb.clear_line();
        fb.newline();
        for i in 0..visible {
            let idx = browser.offset + i;
            if let Some(entry) = browser.entries.get(idx) {
                if idx == browser.selected {
                    fb.push_str("\x1b[7m");
                }
                let (tag, color) = entry.tag();
                fb.sgr(color);
                fb.push_str("  ");
                fb.push_str(tag);
                fb.push_str(&entry.name);
                fb.push_str("\x1b[0m");
            } else {
                fb.push_byte(b'~');
            }
            fb.clear_line();
            fb.newline();
        }
    }
    status::draw_browser_status_bar(state, ctx.clock, &mut fb);
    status::draw_message_bar(state, &mut fb);
    fb.into_bytes()
}

/// Key bindings and mode summaries shown on the help screen.
const HELP_BINDINGS: &[(&str, &str)] = &[
    ("^Q", "Exit editor"),
    ("^S", "Save file"),
    ("^F", "Search text"),
    ("^O", "Open file browser"),
    ("^X", "Start marking text"),
    ("^C", "Copy marked text"),
    ("^K", "Cut line/marked text"),
    ("^V", "Paste/uncut"),
    ("^Z", "Undo last action"),
    ("^R", "Redo last undo"),
    ("^N", "Toggle line numbers"),
    ("^?", "Show help"),
];

const HELP_MODES: &[(&str, &str)] = &[
    ("NORMAL", "Default editing mode"),
    ("SEARCH", "Search mode (Ctrl-F)"),
    ("PROMPT", "Generic prompt mode"),
    ("SELECT", "Text selection mode"),
    ("CONFIRM", "Confirmation dialog mode"),
    ("HELP", "Help screen mode"),
    ("BROWSER", "File browser mode"),
];

fn compose_help(state: &EditorState, ctx: &RenderContext) -> Vec<u8> {
    let mut lines = vec!["Key Bindings:".to_string()];
    for (key, desc) in HELP_BINDINGS {
        lines.push(format!("  {key} - {desc}"));
    }
    lines.push(String::new());
    lines.push("Editor Modes:".to_string());
    for (name, desc) in HELP_MODES {
        lines.push(format!("  {name} - {desc}"));
    }

    let mut fb = FrameBuffer::new();
    fb.hide_cursor();
    fb.clear_screen();
    fb.cursor_home();
    for y in 0..state.screen_rows {
        match lines.get(y) {
            Some(line) => fb.push_str(line),
            None => fb.push_byte(b'~'),
        }
        fb.clear_line();
        fb.newline();
    }
    status::draw_status_bar(state, ctx.clock, &mut fb);
    status::draw_message_bar(state, &mut fb);
    fb.into_bytes()
}
