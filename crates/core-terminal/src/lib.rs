//! Terminal backend: raw mode and alternate screen scoped by an RAII guard,
//! window-size query with a classic 24×80 fallback, and key/resize polling.
//!
//! Escape-sequence decoding (CSI/SS3 keys) and UTF-8 input accumulation are
//! delegated to crossterm's event reader; this layer normalizes its events
//! into [`core_events::Key`]. Resize is delivered as an event on the same
//! stream, so no signal handler ever touches editor state.

use anyhow::Result;
use core_events::{Event, Key};
use crossterm::event::{self, Event as CtEvent, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use std::io::stdout;
use std::time::Duration;
use tracing::debug;

/// Holds raw mode + the alternate screen; both are released on drop, so every
/// exit path (including panics unwinding through `main`) restores the
/// caller's terminal.
pub struct TerminalGuard {
    active: bool,
}

impl TerminalGuard {
    pub fn acquire() -> Result<Self> {
        enable_raw_mode()?;
        execute!(stdout(), EnterAlternateScreen)?;
        debug!(target: "terminal", "raw_mode_enabled");
        Ok(Self { active: true })
    }

    pub fn release(&mut self) -> Result<()> {
        if self.active {
            execute!(stdout(), LeaveAlternateScreen)?;
            disable_raw_mode()?;
            self.active = false;
            debug!(target: "terminal", "raw_mode_disabled");
        }
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = self.release();
    }
}

/// Terminal size in (columns, rows); falls back to 80×24 when the query
/// fails or reports zero columns.
pub fn size() -> (usize, usize) {
    match crossterm::terminal::size() {
        Ok((w, h)) if w > 0 && h > 0 => (w as usize, h as usize),
        _ => (80, 24),
    }
}

/// Wait up to `timeout` for the next input event. Returns `None` on expiry
/// or for events the editor ignores (mouse, focus, key release).
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if !event::poll(timeout)? {
        return Ok(None);
    }
    match event::read()? {
        CtEvent::Key(key) if key.kind != KeyEventKind::Release => Ok(map_key(key).map(Event::Key)),
        CtEvent::Resize(w, h) => Ok(Some(Event::Resize(w, h))),
        _ => Ok(None),
    }
}

fn map_key(key: event::KeyEvent) -> Option<Key> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    Some(match key.code {
        KeyCode::Char(c) if ctrl => Key::Ctrl(c.to_ascii_lowercase()),
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Esc,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Tab => Key::Tab,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;

    #[test]
    fn maps_plain_and_control_characters() {
        let plain = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE);
        assert_eq!(map_key(plain), Some(Key::Char('x')));
        let ctrl = KeyEvent::new(KeyCode::Char('Q'), KeyModifiers::CONTROL);
        assert_eq!(map_key(ctrl), Some(Key::Ctrl('q')), "chords normalize to lowercase");
        let shifted = KeyEvent::new(KeyCode::Char('?'), KeyModifiers::CONTROL);
        assert_eq!(map_key(shifted), Some(Key::Ctrl('?')));
    }

    #[test]
    fn maps_named_keys_and_drops_unknown() {
        let home = KeyEvent::new(KeyCode::Home, KeyModifiers::NONE);
        assert_eq!(map_key(home), Some(Key::Home));
        let f5 = KeyEvent::new(KeyCode::F(5), KeyModifiers::NONE);
        assert_eq!(map_key(f5), None);
    }
}
