//! One display line of the buffer.
//!
//! `chars` holds the raw bytes of the line (no trailing newline). `render` is
//! the display projection: tabs expanded to the next multiple of [`TAB_STOP`],
//! every other byte copied through untouched. `highlight` classifies each
//! rendered byte and always has exactly `render.len()` entries.

use core_syntax::Highlight;
use core_text::utf8;

/// Tab stops every four columns.
pub const TAB_STOP: usize = 4;

#[derive(Debug, Clone)]
pub struct Row {
    /// Position of this row in the row cache; equals its index after every
    /// mutation.
    pub idx: usize,
    pub chars: Vec<u8>,
    pub render: Vec<u8>,
    pub highlight: Vec<Highlight>,
    /// True when a multi-line comment is unterminated at the end of this row.
    pub open_comment: bool,
}

impl Row {
    pub fn new(idx: usize, chars: Vec<u8>) -> Self {
        let mut row = Self {
            idx,
            chars,
            render: Vec::new(),
            highlight: Vec::new(),
            open_comment: false,
        };
        row.update_render();
        row
    }

    /// Byte length of the raw line.
    #[inline]
    pub fn size(&self) -> usize {
        self.chars.len()
    }

    #[inline]
    pub fn render_size(&self) -> usize {
        self.render.len()
    }

    /// Rebuild `render` from `chars`. The highlight vector is resized to
    /// match and reset to `Normal`; the caller re-runs the highlighter.
    pub fn update_render(&mut self) {
        let mut render = Vec::with_capacity(self.chars.len());
        let mut pos = 0;
        while pos < self.chars.len() {
            if self.chars[pos] == b'\t' {
                render.push(b' ');
                while render.len() % TAB_STOP != 0 {
                    render.push(b' ');
                }
                pos += 1;
            } else {
                let len = utf8::byte_length(self.chars[pos]).min(self.chars.len() - pos);
                render.extend_from_slice(&self.chars[pos..pos + len]);
                pos += len;
            }
        }
        self.render = render;
        self.highlight = vec![Highlight::Normal; self.render.len()];
    }

    /// Map a byte offset within `chars` to a rendered column.
    pub fn cx_to_rx(&self, cx: usize) -> usize {
        let mut rx = 0;
        let mut pos = 0;
        while pos < self.chars.len() && pos < cx {
            if self.chars[pos] == b'\t' {
                rx += (TAB_STOP - 1) - (rx % TAB_STOP) + 1;
                pos += 1;
            } else {
                rx += utf8::width(&self.chars[pos..]);
                pos += utf8::byte_length(self.chars[pos]);
            }
        }
        rx
    }

    /// Map a rendered column back to the byte offset of the character that
    /// covers it.
    pub fn rx_to_cx(&self, rx: usize) -> usize {
        let mut cur_rx = 0;
        let mut pos = 0;
        while pos < self.chars.len() {
            let next_rx = if self.chars[pos] == b'\t' {
                cur_rx + (TAB_STOP - 1) - (cur_rx % TAB_STOP) + 1
            } else {
                cur_rx + utf8::width(&self.chars[pos..])
            };
            if next_rx > rx {
                return pos;
            }
            cur_rx = next_rx;
            pos += if self.chars[pos] == b'\t' {
                1
            } else {
                utf8::byte_length(self.chars[pos])
            };
        }
        pos
    }
}
