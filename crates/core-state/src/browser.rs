//! File-browser mode state.

use std::path::PathBuf;

/// Extensions tagged `[SRC]` in the listing.
const SOURCE_EXTENSIONS: &[&str] = &[
    "c", "h", "cpp", "cxx", "hpp", "cc", "sh", "py", "rb", "js", "rs", "go", "java", "php", "pl",
    "lua", "vim", "asm", "s",
];

#[derive(Debug, Clone)]
pub struct BrowserEntry {
    pub name: String,
    pub is_dir: bool,
}

impl BrowserEntry {
    /// `(tag, SGR colour)` for the listing: directories blue, known source
    /// files green, everything else white.
    pub fn tag(&self) -> (&'static str, u8) {
        if self.is_dir {
            return ("[DIR]  ", 34);
        }
        let ext = self.name.rsplit('.').next().unwrap_or("");
        if self.name.contains('.') && SOURCE_EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e))
        {
            ("[SRC]  ", 32)
        } else {
            ("[FILE] ", 37)
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BrowserState {
    pub entries: Vec<BrowserEntry>,
    pub selected: usize,
    /// First visible entry (scroll position).
    pub offset: usize,
    pub dir: PathBuf,
    pub show_hidden: bool,
}
