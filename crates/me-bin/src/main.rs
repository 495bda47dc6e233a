//! `me` entrypoint: argument parsing, logging, terminal acquisition, and the
//! cooperative event loop.
//!
//! The loop polls input with a 100 ms timeout. A key is fully processed
//! (dispatch, edit, resync, highlight) before the frame is rebuilt and
//! written once; on timeout the frame is refreshed only when the status-bar
//! clock ticked over. Resize events arrive on the input stream and force a
//! full repaint.

use anyhow::Result;
use clap::Parser;
use core_actions::{Dispatcher, io_ops};
use core_events::Event;
use core_render::render_engine::{RenderContext, refresh};
use core_render::status::Clock;
use core_state::EditorState;
use core_terminal::TerminalGuard;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "me", version, about = "me - a minimalist terminal editor")]
struct Args {
    /// File to open at startup.
    pub path: Option<std::path::PathBuf>,
    /// Configuration file path (overrides discovery of `me.toml`).
    #[arg(long = "config")]
    pub config: Option<std::path::PathBuf>,
}

fn main() -> Result<()> {
    // Log to me.log; the terminal belongs to the renderer while raw mode is
    // active.
    let appender = tracing_appender::rolling::never(".", "me.log");
    let (writer, _log_guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(writer)
        .with_ansi(false)
        .init();
    info!(target: "runtime", "startup");

    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        // Logged before unwinding drops the terminal guard below.
        error!(target: "runtime.panic", %info, "panic");
        default_panic(info);
    }));

    let args = Args::parse();
    let config = core_config::load_from(args.config.clone())?;

    let mut state = EditorState::new();
    state.show_line_numbers = config.display.line_numbers;
    if let Some(path) = &args.path {
        // A missing initial file is fatal; the terminal is still untouched
        // here, so the error prints normally.
        io_ops::open_file(&mut state, path)?;
    }

    let _term = TerminalGuard::acquire()?;
    let (cols, rows) = core_terminal::size();
    state.set_screen_size(cols, rows);
    state.status.set("me | Ctrl-? Help");

    let mut dispatcher = Dispatcher::new();
    let mut out = std::io::stdout();
    let clock_enabled = config.display.clock;
    let ctx = |enabled: bool| RenderContext {
        clock: enabled.then(clock_now),
    };
    refresh(&mut out, &mut state, &ctx(clock_enabled), true)?;

    let mut last_clock = clock_now();
    loop {
        match core_terminal::poll_event(Duration::from_millis(100))? {
            Some(Event::Key(key)) => {
                let result = dispatcher.dispatch(&mut state, key);
                if result.quit {
                    break;
                }
                refresh(&mut out, &mut state, &ctx(clock_enabled), result.full_redraw)?;
            }
            Some(Event::Resize(w, h)) => {
                state.set_screen_size(w as usize, h as usize);
                state.clamp_cursor();
                refresh(&mut out, &mut state, &ctx(clock_enabled), true)?;
            }
            None => {
                if clock_enabled {
                    let now = clock_now();
                    if now != last_clock {
                        last_clock = now;
                        refresh(&mut out, &mut state, &ctx(clock_enabled), false)?;
                    }
                }
            }
        }
    }

    info!(target: "runtime", "shutdown");
    Ok(())
}

/// Wall-clock HH:MM:SS derived from the epoch (UTC).
fn clock_now() -> Clock {
    let secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let day = secs % 86_400;
    Clock {
        hours: (day / 3600) as u32,
        minutes: (day % 3600 / 60) as u32,
        seconds: (day % 60) as u32,
    }
}
