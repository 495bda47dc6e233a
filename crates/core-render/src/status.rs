//! Status bar and message bar composition.
//!
//! Both bars are always exactly one line. The status bar shows the mode tag,
//! file name, modified marker, and right-aligned line/column counters with an
//! optional clock; the message bar shows the current status message (or the
//! confirm dialog) on a yellow-on-blue strip.

use crate::FrameBuffer;
use core_state::{EditorState, Mode};

/// Wall-clock value for the status bar, supplied by the caller so frame
/// composition stays deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clock {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

pub fn draw_status_bar(state: &EditorState, clock: Option<Clock>, fb: &mut FrameBuffer) {
    fb.push_str("\x1b[100m"); // dark grey background

    let name = state
        .file_name
        .as_deref()
        .and_then(|p| p.to_str())
        .unwrap_or("< New >");
    let shown: String = name.chars().take(20).collect();
    let left = format!(
        " [{}] File: {} {}",
        state.mode.name(),
        shown,
        if state.modified { "(modified)" } else { "" }
    );

    let line = (state.cursor_y + 1).min(state.rows.len());
    let col_size = state.current_row().map_or(0, |r| r.size());
    let mut right = format!(
        "{}/{} lines  {}/{} cols",
        line,
        state.rows.len(),
        state.cursor_x + 1,
        col_size
    );
    if let Some(c) = clock {
        right.push_str(&format!(
            " [ {:2}:{:2}:{:2} ]",
            c.hours, c.minutes, c.seconds
        ));
    }

    pad_between(fb, &left, &right, state.screen_cols);
    fb.sgr_reset();
    fb.newline();
}

/// Browser-specific status bar: directory on the left, selection counter on
/// the right.
pub fn draw_browser_status_bar(state: &EditorState, clock: Option<Clock>, fb: &mut FrameBuffer) {
    fb.push_str("\x1b[100m");
    let (dir, selected, total) = match &state.browser {
        Some(b) => (b.dir.display().to_string(), b.selected + 1, b.entries.len()),
        None => (String::new(), 0, 0),
    };
    let left = format!(" [BROWSER] {dir}");
    let mut right = format!("{selected}/{total} files");
    if let Some(c) = clock {
        right.push_str(&format!(
            " [ {:2}:{:2}:{:2} ]",
            c.hours, c.minutes, c.seconds
        ));
    }
    pad_between(fb, &left, &right, state.screen_cols);
    fb.sgr_reset();
    fb.newline();
}

/// Left text, spaces, then right text flush against the edge (dropped when
/// it no longer fits).
fn pad_between(fb: &mut FrameBuffer, left: &str, right: &str, cols: usize) {
    let mut len = left.chars().count().min(cols);
    let truncated: String = left.chars().take(len).collect();
    fb.push_str(&truncated);
    let right_len = right.chars().count();
    while len < cols {
        if cols - len == right_len {
            fb.push_str(right);
            break;
        }
        fb.push_byte(b' ');
        len += 1;
    }
}

pub fn draw_message_bar(state: &EditorState, fb: &mut FrameBuffer) {
    fb.push_str("\x1b[93m\x1b[44m\x1b[K");
    let mut visible_len = 0;
    if state.mode == Mode::Confirm
        && let Some(confirm) = &state.confirm
    {
        // The dialog line carries its own inverse-video run around the
        // highlighted choice.
        let (no, yes) = if confirm.yes {
            ("  No  ".to_string(), "\x1b[7m[ Yes ]\x1b[27m".to_string())
        } else {
            ("\x1b[7m[ No ]\x1b[27m".to_string(), "  Yes  ".to_string())
        };
        // message + "  " + "[ No ]" + " " + "[ Yes ]" + " (ESC: cancel)"
        let plain_len = confirm.message.chars().count() + 2 + 6 + 1 + 7 + 14;
        fb.push_str(&confirm.message);
        fb.push_str("  ");
        fb.push_str(&no);
        fb.push_byte(b' ');
        fb.push_str(&yes);
        fb.push_str(" (ESC: cancel)");
        visible_len = plain_len.min(state.screen_cols);
    } else if state.status.is_visible() {
        let text: String = state.status.text().chars().take(state.screen_cols).collect();
        visible_len = text.chars().count();
        fb.push_str(&text);
    }
    for _ in visible_len..state.screen_cols {
        fb.push_byte(b' ');
    }
    fb.push_str("\x1b[0m");
}
