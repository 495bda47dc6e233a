//! Single-row syntax classification.
//!
//! A language is described by a static [`Syntax`] descriptor: keyword tables,
//! comment markers, and feature flags. [`scan_line`] classifies every byte of
//! one *rendered* line (tabs already expanded) and reports whether a
//! multi-line comment is still open at the end of the line, so the caller can
//! propagate that state into the next row. The scanner itself is pure and
//! row-local; cross-row propagation lives with the row cache, which keeps
//! feeding rows until the open-comment flag stabilizes.

use bitflags::bitflags;

bitflags! {
    /// Which token classes a language enables.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SyntaxFlags: u8 {
        const NUMBERS = 1 << 0;
        const STRINGS = 1 << 1;
    }
}

/// Classification of one rendered byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Highlight {
    #[default]
    Normal,
    /// Transient search-match overlay (applied by search, not the scanner).
    Match,
    LineComment,
    BlockComment,
    Keyword,
    Type,
    Preprocessor,
    Str,
    Number,
}

impl Highlight {
    /// SGR colour code for this class.
    pub fn color(self) -> u8 {
        match self {
            Highlight::Normal => 97,
            Highlight::Match => 43,
            Highlight::LineComment | Highlight::BlockComment => 36,
            Highlight::Keyword => 93,
            Highlight::Type => 92,
            Highlight::Preprocessor => 36,
            Highlight::Str => 91,
            Highlight::Number => 31,
        }
    }
}

/// Static language descriptor.
pub struct Syntax {
    pub name: &'static str,
    /// Patterns matched against the file name. A pattern starting with `.` must
    /// match as a suffix; anything else matches as a substring.
    pub file_match: &'static [&'static str],
    pub keywords: &'static [&'static str],
    pub types: &'static [&'static str],
    pub preprocessor: &'static [&'static str],
    pub line_comment: Option<&'static str>,
    pub block_comment: Option<(&'static str, &'static str)>,
    pub flags: SyntaxFlags,
}

/// Built-in language table.
pub static LANGUAGES: &[Syntax] = &[Syntax {
    name: "c",
    file_match: &[".c", ".cc", ".cxx", ".cpp", ".h"],
    keywords: &[
        "switch", "if", "while", "for", "break", "continue", "return", "else", "struct", "union",
        "typedef", "static", "enum", "class", "case", "volatile", "register", "sizeof", "goto",
        "const", "auto",
    ],
    types: &[
        "int", "long", "double", "float", "char", "unsigned", "signed", "void", "bool",
    ],
    preprocessor: &[
        "#if", "#endif", "#error", "#ifdef", "#ifndef", "#elif", "#define", "#undef", "#include",
    ],
    line_comment: Some("//"),
    block_comment: Some(("/*", "*/")),
    flags: SyntaxFlags::NUMBERS.union(SyntaxFlags::STRINGS),
}];

/// Pick the first descriptor whose `file_match` pattern matches `file_name`.
pub fn detect(file_name: &str) -> Option<&'static Syntax> {
    for syntax in LANGUAGES {
        for pattern in syntax.file_match {
            let hit = if pattern.starts_with('.') {
                file_name.ends_with(pattern)
            } else {
                file_name.contains(pattern)
            };
            if hit {
                return Some(syntax);
            }
        }
    }
    None
}

/// A character that can delimit a keyword token.
pub fn is_separator(b: u8) -> bool {
    b == 0 || b.is_ascii_whitespace() || b",.()+-/*=~%<>[]:;".contains(&b)
}

/// Continuation characters permitted inside an already-started number token
/// (decimal point, hex prefix/digits, `h` suffix).
fn is_number_part(b: u8) -> bool {
    matches!(b, b'.' | b'x' | b'X' | b'h' | b'H')
        || (b.is_ascii_hexdigit() && !b.is_ascii_digit())
}

/// Result of scanning one rendered line.
pub struct LineHighlight {
    /// One class per rendered byte.
    pub classes: Vec<Highlight>,
    /// True when a block comment is still unterminated at end of line.
    pub open_comment: bool,
}

impl LineHighlight {
    /// All-normal classification (used when no language is active).
    pub fn plain(len: usize) -> Self {
        Self {
            classes: vec![Highlight::Normal; len],
            open_comment: false,
        }
    }
}

/// Classify every byte of `render`. `in_comment` is the open-comment state
/// carried over from the previous row (false for row 0).
pub fn scan_line(syntax: &Syntax, render: &[u8], in_comment: bool) -> LineHighlight {
    let len = render.len();
    let mut classes = vec![Highlight::Normal; len];
    let mut prev_sep = true;
    let mut in_string: u8 = 0;
    let mut in_comment = in_comment;
    let mut i = 0;

    'scan: while i < len {
        let c = render[i];
        let prev_class = if i > 0 { classes[i - 1] } else { Highlight::Normal };

        if let Some(lc) = syntax.line_comment
            && in_string == 0
            && !in_comment
            && render[i..].starts_with(lc.as_bytes())
        {
            classes[i..].fill(Highlight::LineComment);
            break;
        }

        if let Some((open, close)) = syntax.block_comment
            && in_string == 0
        {
            if in_comment {
                classes[i] = Highlight::BlockComment;
                if render[i..].starts_with(close.as_bytes()) {
                    classes[i..i + close.len()].fill(Highlight::BlockComment);
                    i += close.len();
                    in_comment = false;
                    prev_sep = true;
                } else {
                    i += 1;
                }
                continue;
            } else if render[i..].starts_with(open.as_bytes()) {
                classes[i..i + open.len()].fill(Highlight::BlockComment);
                i += open.len();
                in_comment = true;
                continue;
            }
        }

        if syntax.flags.contains(SyntaxFlags::STRINGS) {
            if in_string != 0 {
                classes[i] = Highlight::Str;
                if c == b'\\' && i + 1 < len {
                    classes[i + 1] = Highlight::Str;
                    i += 2;
                    continue;
                }
                if c == in_string {
                    in_string = 0;
                }
                i += 1;
                prev_sep = true;
                continue;
            } else if c == b'"' || c == b'\'' {
                in_string = c;
                classes[i] = Highlight::Str;
                i += 1;
                continue;
            }
        }

        if syntax.flags.contains(SyntaxFlags::NUMBERS)
            && ((c.is_ascii_digit() && (prev_sep || prev_class == Highlight::Number))
                || (is_number_part(c) && prev_class == Highlight::Number))
        {
            classes[i] = Highlight::Number;
            i += 1;
            prev_sep = false;
            continue;
        }

        if prev_sep {
            let tables = [
                (syntax.keywords, Highlight::Keyword),
                (syntax.types, Highlight::Type),
                (syntax.preprocessor, Highlight::Preprocessor),
            ];
            for (words, class) in tables {
                for word in words {
                    let w = word.as_bytes();
                    let end = i + w.len();
                    // The byte after the keyword must be a separator (or EOL).
                    let bounded = end >= len || is_separator(render[end]);
                    if render[i..].starts_with(w) && bounded {
                        classes[i..end.min(len)].fill(class);
                        i = end;
                        prev_sep = false;
                        continue 'scan;
                    }
                }
            }
        }

        prev_sep = is_separator(c);
        i += 1;
    }

    LineHighlight {
        classes,
        open_comment: in_comment,
    }
}
