//! Terminal colouring for the markdown the assistant replies with.

use crate::RESET;

const BOLD_COLOR: &str = "\x1b[1;38;5;222m";
const ITALIC: &str = "\x1b[3m";
const CODE_INLINE: &str = "\x1b[36;48;5;237m";
const CODE_BLOCK: &str = "\x1b[38;5;248m";
const CODE_BLOCK_BAR: &str = "\x1b[38;5;240m";
const HEADING_COLOR: &str = "\x1b[1;38;5;222m";
const LIST_MARKER: &str = "\x1b[36m";

/// One output line per input line. Fence lines are kept as dim bars.
pub(crate) fn colorize_reply(content: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut in_code_block = false;

    for line in content.lines() {
        if line.trim_start().starts_with("```") {
            in_code_block = !in_code_block;
            out.push(format!("{CODE_BLOCK_BAR}{}{RESET}", line.trim_start()));
            continue;
        }
        if in_code_block {
            out.push(format!("{CODE_BLOCK_BAR}│{CODE_BLOCK} {line}{RESET}"));
            continue;
        }

        let trimmed = line.trim_start();
        let hashes = trimmed.chars().take_while(|&c| c == '#').count();
        if (1..=4).contains(&hashes) && trimmed[hashes..].starts_with(' ') {
            out.push(format!("{HEADING_COLOR}{}{RESET}", trimmed[hashes..].trim()));
            continue;
        }

        let indent = &line[..line.len() - trimmed.len()];
        if let Some(rest) = trimmed
            .strip_prefix("- ")
            .or_else(|| trimmed.strip_prefix("* "))
        {
            out.push(format!("{indent}{LIST_MARKER}•{RESET} {}", colorize_inline(rest)));
            continue;
        }
        if let Some((number, rest)) = numbered_item(trimmed) {
            out.push(format!("{indent}{LIST_MARKER}{number}.{RESET} {}", colorize_inline(rest)));
            continue;
        }

        out.push(colorize_inline(line));
    }

    out
}

/// `"12. text"` -> `("12", "text")`
fn numbered_item(line: &str) -> Option<(&str, &str)> {
    let (number, rest) = line.split_once(". ")?;
    let is_number = !number.is_empty() && number.len() <= 3 && number.bytes().all(|b| b.is_ascii_digit());
    is_number.then_some((number, rest))
}

fn colorize_inline(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix("**") {
            if let Some(end) = after.find("**") {
                out.push_str(&format!("{BOLD_COLOR}{}{RESET}", &after[..end]));
                rest = &after[end + 2..];
                continue;
            }
        }
        if let Some(after) = rest.strip_prefix('`') {
            if let Some(end) = after.find('`') {
                out.push_str(&format!("{CODE_INLINE} {} {RESET}", &after[..end]));
                rest = &after[end + 1..];
                continue;
            }
        }
        if let Some(after) = rest.strip_prefix('*') {
            if let Some(end) = after.find('*').filter(|&end| end > 0 && !after.starts_with(' ')) {
                out.push_str(&format!("{ITALIC}{}{RESET}", &after[..end]));
                rest = &after[end + 1..];
                continue;
            }
        }
        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            out.push(c);
        }
        rest = chars.as_str();
    }

    out
}
