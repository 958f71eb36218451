use std::io::{Stdout, Write};

use crossterm::terminal::{self, ClearType};
use crossterm::{cursor, execute, queue};
use termfolio_core::{SpanStyle, StyledLine};

use crate::format::finish;
use crate::state::ReplState;
use crate::util::{display_width, term_width, HALF_BLOCK_LOWER, HALF_BLOCK_UPPER, PROMPT_PREFIX_WIDTH};
use crate::{
    ACCENT_BOLD, BG_INPUT, CYAN, DIM, FG_INPUT_EDGE, GREEN, LINK, ORANGE, RESET, TITLE, WHITE_BOLD, YELLOW,
};

fn style_code(style: SpanStyle) -> Option<&'static str> {
    match style {
        SpanStyle::Plain | SpanStyle::Accent => None,
        SpanStyle::Art => Some(GREEN),
        SpanStyle::Prompt => Some(ORANGE),
        SpanStyle::Keyword => Some(CYAN),
        SpanStyle::Subcommand => Some(GREEN),
        SpanStyle::Title => Some(TITLE),
        SpanStyle::Link => Some(LINK),
        SpanStyle::Highlight => Some(YELLOW),
        SpanStyle::Heading => Some(ACCENT_BOLD),
        SpanStyle::Bullet | SpanStyle::Muted => Some(DIM),
    }
}

/// One styled line as terminal text. Links become OSC 8 hyperlinks when
/// colour is on.
pub(crate) fn paint_line(line: &StyledLine, color: bool) -> String {
    if !color {
        return line.text();
    }
    let mut out = String::new();
    for span in &line.spans {
        let text = match &span.href {
            Some(href) => format!("\x1b]8;;{href}\x1b\\{}\x1b]8;;\x1b\\", span.text),
            None => span.text.clone(),
        };
        match style_code(span.style) {
            Some(code) => out.push_str(&format!("{code}{text}{RESET}")),
            None => out.push_str(&text),
        }
    }
    out
}

/// Where the input area sits relative to the caret, so it can be wiped.
#[derive(Debug, Default)]
pub(crate) struct InputArea {
    pub(crate) drawn: bool,
    pub(crate) cursor_row: u16,
    pub(crate) wrap_lines: u16,
}

/// Draw the full input area with half-block padding.
pub(crate) fn redraw_input(stdout: &mut Stdout, state: &ReplState, area: &mut InputArea) {
    let width = term_width() as usize;
    let color = state.color;

    clear_input_area(stdout, area);

    // ── Top edge ──
    let edge = |block: char| {
        if color {
            format!("{FG_INPUT_EDGE}{}{RESET}", block.to_string().repeat(width))
        } else {
            String::new()
        }
    };
    write!(stdout, "{}", edge(HALF_BLOCK_LOWER)).ok();

    // ── Input line (dark background, full width) ──
    let editor = state.active_editor();
    let buffer = editor.buffer();
    let glyph = state.prompt_glyph();
    let input_visible = PROMPT_PREFIX_WIDTH as usize + display_width(buffer);
    let total_rows = if width > 0 { input_visible.saturating_sub(1) / width + 1 } else { 1 };
    let last_row = if width > 0 { input_visible.saturating_sub(1) % width + 1 } else { input_visible };
    let pad = width.saturating_sub(last_row);
    let input_line = format!(
        "{BG_INPUT}{WHITE_BOLD}  {glyph} {RESET}{BG_INPUT}{buffer}{}{RESET}",
        " ".repeat(pad)
    );
    write!(stdout, "\r\n{}", finish(input_line, color)).ok();
    area.wrap_lines = (total_rows as u16).saturating_sub(1);

    // ── Bottom edge + status bar ──
    write!(stdout, "\r\n{}", edge(HALF_BLOCK_UPPER)).ok();
    let status = format!("{DIM}   {}{RESET}", state.status_text());
    write!(stdout, "\r\n{}", finish(status, color)).ok();

    // ── Caret back on the input line ──
    let caret = PROMPT_PREFIX_WIDTH as usize + display_width(&buffer[..editor.cursor.min(buffer.len())]);
    let cursor_row = if width > 0 && caret > 0 { (caret - 1) / width } else { 0 };
    let wrap_after_caret = (area.wrap_lines as usize).saturating_sub(cursor_row);
    queue!(stdout, cursor::MoveUp(2 + wrap_after_caret as u16)).ok();
    let col = if width > 0 && caret > 0 { (caret - 1) % width + 1 } else { 0 };
    queue!(stdout, cursor::MoveToColumn(col as u16)).ok();
    stdout.flush().ok();

    area.cursor_row = cursor_row as u16;
    area.drawn = true;
}

/// Clear the input area (edges, input, status). Afterwards the cursor is
/// where the top edge goes.
pub(crate) fn clear_input_area(stdout: &mut Stdout, area: &mut InputArea) {
    if !area.drawn {
        return;
    }

    queue!(stdout, cursor::MoveUp(area.cursor_row + 1), cursor::MoveToColumn(0)).ok();
    queue!(stdout, terminal::Clear(ClearType::CurrentLine)).ok();

    let lines_below = 1 + area.wrap_lines + 2;
    for _ in 0..lines_below {
        write!(stdout, "\r\n").ok();
        queue!(stdout, terminal::Clear(ClearType::CurrentLine)).ok();
    }
    queue!(stdout, cursor::MoveUp(lines_below)).ok();
    stdout.flush().ok();
    area.wrap_lines = 0;
    area.drawn = false;
}

/// Wipe the terminal, print `lines` just above where the input area will
/// sit, then draw the input area.
pub(crate) fn apply_clear_screen(stdout: &mut Stdout, lines: &[String], state: &ReplState, area: &mut InputArea) {
    execute!(stdout, terminal::Clear(ClearType::All), cursor::MoveTo(0, 0)).ok();
    area.drawn = false;
    let (_, rows) = terminal::size().unwrap_or((80, 24));
    let start = rows.saturating_sub(5 + lines.len() as u16);
    execute!(stdout, cursor::MoveTo(0, start)).ok();
    for line in lines {
        write!(stdout, "{line}\r\n").ok();
    }
    stdout.flush().ok();
    redraw_input(stdout, state, area);
}
