//! Configuration loading and parsing.
//!
//! `me.toml` is looked up in the working directory unless an explicit path is
//! supplied on the command line. Only display toggles are configurable:
//!
//! ```toml
//! [display]
//! line_numbers = true   # startup value of the Ctrl-N toggle
//! clock = false         # wall-clock field in the status bar
//! ```
//!
//! Unknown fields are ignored so the file can grow without breaking older
//! binaries. A missing file yields the defaults.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;
use tracing::info;

const CONFIG_FILE: &str = "me.toml";

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DisplayConfig {
    /// Show the line-number gutter at startup.
    pub line_numbers: bool,
    /// Show a HH:MM:SS clock in the status bar.
    pub clock: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            line_numbers: false,
            clock: true,
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct Config {
    pub display: DisplayConfig,
}

/// Load configuration from `path`, or from `./me.toml` when `path` is `None`.
/// A missing file is not an error; a malformed file is.
pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let (path, explicit) = match path {
        Some(p) => (p, true),
        None => (PathBuf::from(CONFIG_FILE), false),
    };
    if !explicit && !path.exists() {
        return Ok(Config::default());
    }
    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config: Config =
        toml::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))?;
    info!(target: "config", file = %path.display(), line_numbers = config.display.line_numbers, clock = config.display.clock, "config_loaded");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_when_missing() {
        let config = load_from(Some(PathBuf::from("/nonexistent/me.toml")));
        assert!(config.is_err(), "explicit missing path should error");
        let config = Config::default();
        assert!(!config.display.line_numbers);
        assert!(config.display.clock);
    }

    #[test]
    fn parses_display_section() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "[display]\nline_numbers = true\nclock = false").unwrap();
        let config = load_from(Some(f.path().to_path_buf())).unwrap();
        assert!(config.display.line_numbers);
        assert!(!config.display.clock);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "[display]\nline_numbers = true\n[future]\nx = 1").unwrap();
        let config = load_from(Some(f.path().to_path_buf())).unwrap();
        assert!(config.display.line_numbers);
    }
}
