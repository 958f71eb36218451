use crossterm::terminal;
use unicode_width::UnicodeWidthStr;

pub(crate) fn strip_ansi(s: &str) -> String {
    let mut out = String::new();
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\x1b' && chars.peek() == Some(&']') {
            // OSC, e.g. hyperlinks: runs to BEL or ESC \
            while let Some(next) = chars.next() {
                if next == '\x07' || (next == '\x1b' && chars.next_if_eq(&'\\').is_some()) {
                    break;
                }
            }
        } else if c == '\x1b' {
            while let Some(&next) = chars.peek() {
                chars.next();
                if next == 'm' {
                    break;
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Terminal columns taken by `s`, ignoring SGR escapes.
pub(crate) fn display_width(s: &str) -> usize {
    if s.contains('\x1b') {
        strip_ansi(s).width()
    } else {
        s.width()
    }
}

pub(crate) fn term_width() -> u16 {
    terminal::size().map(|(w, _)| w).unwrap_or(80)
}

pub(crate) const PROMPT_PREFIX_WIDTH: u16 = 4;
pub(crate) const HALF_BLOCK_LOWER: char = '▄';
pub(crate) const HALF_BLOCK_UPPER: char = '▀';
