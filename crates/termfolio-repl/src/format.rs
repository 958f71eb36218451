use termfolio_core::chat::{ChatMessage, ChatRole, ChatSession};

use crate::markdown::colorize_reply;
use crate::util::strip_ansi;
use crate::{BRIGHT_GREEN, CYAN, DIM, RED, RESET, WHITE_BOLD, YELLOW};

/// Drop colour codes when colour is off.
pub(crate) fn finish(s: String, color: bool) -> String {
    if color {
        s
    } else {
        strip_ansi(&s)
    }
}

pub(crate) fn print_error_raw(msg: &str) -> String {
    format!("{RED}error:{RESET} {msg}")
}

pub(crate) fn print_system_raw(msg: &str) -> String {
    format!("{YELLOW}{msg}{RESET}")
}

/// Title bar: `● ● ●  user@host ~ /home/user`
pub(crate) fn print_header_raw(header: &str) -> String {
    let (user_host, path) = header.split_once(" ~ ").unwrap_or((header, ""));
    format!(
        "{RED}●{RESET} {YELLOW}●{RESET} {BRIGHT_GREEN}●{RESET}  {WHITE_BOLD}{user_host}{RESET} {DIM}~{RESET} {CYAN}{path}{RESET}"
    )
}

fn print_message_raw(msg: &ChatMessage, assistant_label: &str) -> Vec<String> {
    let time = msg.timestamp.format("%H:%M");
    let (label, body) = match msg.role {
        ChatRole::User => (
            format!("{WHITE_BOLD}you ›{RESET}"),
            msg.content.lines().map(str::to_string).collect::<Vec<_>>(),
        ),
        ChatRole::Assistant => (
            format!("{BRIGHT_GREEN}{assistant_label} ›{RESET}"),
            colorize_reply(&msg.content),
        ),
    };
    let label_width = match msg.role {
        ChatRole::User => "you ›".chars().count(),
        ChatRole::Assistant => assistant_label.chars().count() + 2,
    };

    let mut body = body.into_iter();
    let first = body.next().unwrap_or_default();
    let mut out = vec![format!("{DIM}{time}{RESET} {label} {first}")];
    let indent = " ".repeat(6 + label_width + 1);
    out.extend(body.map(|line| format!("{indent}{line}")));
    if !msg.reactions.is_empty() {
        out.push(format!("{indent}{}", msg.reactions.join(" ")));
    }
    out
}

/// The chat panel: title, conversation, then banner or progress line.
pub(crate) fn chat_view_raw(chat: &ChatSession) -> Vec<String> {
    let mut out = vec![
        format!(
            "{WHITE_BOLD}🤖 AI Assistant{RESET} {DIM}({} mode){RESET}",
            chat.mode().name()
        ),
        String::new(),
    ];
    for msg in chat.messages() {
        out.extend(print_message_raw(msg, "ai"));
    }
    if chat.is_busy() {
        out.push(String::new());
        out.push(format!("{DIM}Thinking...{RESET}"));
    }
    if let Some(banner) = chat.error() {
        out.push(String::new());
        out.push(print_error_raw(banner));
    }
    out
}
