use anyhow::{Context, Result};
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::{cursor, execute, terminal};
use futures::StreamExt;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::sync::Arc;
use termfolio_core::chat::{self, ChatReply, ChatRequest, UnconfiguredBackend};
use termfolio_core::tracing_setup::init_tracing;
use termfolio_core::{ChatBackend, CoreConfig, GeminiClient, LineRenderer, OutputLine, Portfolio, Session, SubmitEvent};

// ANSI color codes
pub(crate) const CYAN: &str = "\x1b[36m";
pub(crate) const GREEN: &str = "\x1b[32m";
pub(crate) const BRIGHT_GREEN: &str = "\x1b[1;32m";
pub(crate) const ACCENT_BOLD: &str = "\x1b[1;38;2;255;193;7m";
pub(crate) const ORANGE: &str = "\x1b[38;5;208m";
pub(crate) const TITLE: &str = "\x1b[1;35m";
pub(crate) const LINK: &str = "\x1b[4;34m";
pub(crate) const RED: &str = "\x1b[31m";
pub(crate) const YELLOW: &str = "\x1b[33m";
pub(crate) const WHITE_BOLD: &str = "\x1b[1;37m";
pub(crate) const DIM: &str = "\x1b[2m";
pub(crate) const RESET: &str = "\x1b[0m";
pub(crate) const BG_INPUT: &str = "\x1b[48;5;234m";
pub(crate) const FG_INPUT_EDGE: &str = "\x1b[38;5;234m";

const THUMBS_UP: &str = "👍";

macro_rules! raw_println {
    () => {{
        write!(std::io::stdout(), "\r\n").ok();
        std::io::stdout().flush().ok();
    }};
    ($($arg:tt)*) => {{
        let s = format!($($arg)*);
        let mut out = std::io::stdout();
        for line in s.split('\n') {
            write!(out, "{}\r\n", line).ok();
        }
        out.flush().ok();
    }};
}

mod editor;
mod format;
mod markdown;
mod render;
mod state;
mod util;

use clap::Parser;
use editor::LineEditor;
use format::{finish, print_error_raw, print_system_raw};
use render::{apply_clear_screen, clear_input_area, paint_line, redraw_input, InputArea};
use state::ReplState;

#[derive(Parser, Debug)]
#[command(name = "termfolio", version)]
#[command(about = "Terminal-style portfolio with an AI assistant")]
struct Args {
    /// Portfolio content JSON (overrides the config file and TERMFOLIO_CONTENT)
    #[arg(long, short)]
    content: Option<PathBuf>,
    /// Namespace verb, e.g. `portfolio` in `portfolio about`
    #[arg(long, short)]
    namespace: Option<String>,
    /// Run one command, print its output and exit
    #[arg(long, short = 'e', value_name = "COMMAND")]
    exec: Option<String>,
    /// Disable colours (also honours NO_COLOR)
    #[arg(long)]
    no_color: bool,
}

/// What a key press asks the loop to do.
enum KeyAction {
    None,
    Redraw,
    Repaint,
    Send(ChatRequest),
}

fn load_config(args: &Args) -> Result<CoreConfig> {
    let mut config = CoreConfig::load()?;
    config.apply_overrides(args.namespace.as_deref(), args.content.as_deref());
    config.validate()?;
    Ok(config)
}

fn load_content(config: &CoreConfig) -> Result<Portfolio> {
    match config.content_file() {
        Some(path) => Portfolio::load(&path)
            .with_context(|| format!("Failed to load portfolio content from {}", path.display())),
        None => Portfolio::sample().context("Bundled sample content is invalid"),
    }
}

fn chat_backend(config: &CoreConfig) -> Arc<dyn ChatBackend> {
    match GeminiClient::from_config(&config.chat) {
        Some(client) => {
            tracing::info!(model = client.model(), "Gemini backend configured");
            Arc::new(client)
        }
        None => {
            tracing::warn!("No Gemini API key configured; the assistant will apologise");
            Arc::new(UnconfiguredBackend)
        }
    }
}

/// `--exec`: echo the command and print its output, no raw mode.
fn run_once(config: CoreConfig, content: Portfolio, command: &str, color: bool) {
    let vocab = config.vocabulary();
    let renderer = LineRenderer::new(vocab.namespace());
    let session = Session::new(vocab, content, config.title.clone());
    for line in renderer.render_all(&exec_lines(&session, command)) {
        println!("{}", paint_line(&line, color));
    }
}

/// Output of one `--exec` command. `clear` prints only its notice.
fn exec_lines(session: &Session, command: &str) -> Vec<OutputLine> {
    let mut lines = Vec::new();
    if !session.is_clear(command) {
        lines.push(OutputLine::echo(command.trim()));
    }
    lines.extend(session.run(command).into_lines());
    lines
}

/// Cursor movement and editing shared by the prompt and the chat input.
/// Returns whether the key was consumed.
fn edit_key(editor: &mut LineEditor, code: KeyCode, modifiers: KeyModifiers) -> bool {
    let ctrl = modifiers.contains(KeyModifiers::CONTROL);
    match code {
        KeyCode::Left => editor.move_left(),
        KeyCode::Right => editor.move_right(),
        KeyCode::Home => editor.move_home(),
        KeyCode::End => editor.move_end(),
        KeyCode::Up => editor.history_up(),
        KeyCode::Down => editor.history_down(),
        KeyCode::Backspace => editor.delete_back(),
        KeyCode::Delete => editor.delete_forward(),
        KeyCode::Char('a') if ctrl => editor.move_home(),
        KeyCode::Char('e') if ctrl => editor.move_end(),
        KeyCode::Char('w') if ctrl => editor.delete_word_back(),
        KeyCode::Char('k') if ctrl => editor.kill_to_end(),
        KeyCode::Char('u') if ctrl => editor.discard(),
        KeyCode::Char(c) if !ctrl && !modifiers.contains(KeyModifiers::ALT) => editor.insert_char(c),
        _ => return false,
    }
    true
}

fn handle_prompt_key(state: &mut ReplState, code: KeyCode, modifiers: KeyModifiers) -> KeyAction {
    match code {
        KeyCode::Enter => match state.submit_command() {
            SubmitEvent::Ignored => KeyAction::Redraw,
            _ => KeyAction::Repaint,
        },
        KeyCode::Tab => {
            if state.editor.complete(state.session.vocab()) {
                KeyAction::Redraw
            } else {
                KeyAction::None
            }
        }
        KeyCode::Char('l') if modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Repaint,
        _ if edit_key(&mut state.editor, code, modifiers) => KeyAction::Redraw,
        _ => KeyAction::None,
    }
}

fn handle_chat_key(state: &mut ReplState, code: KeyCode, modifiers: KeyModifiers) -> KeyAction {
    match code {
        KeyCode::Esc => {
            state.close_chat();
            KeyAction::Repaint
        }
        KeyCode::Enter => match state.send_chat() {
            Some(request) => KeyAction::Send(request),
            None => KeyAction::Redraw,
        },
        KeyCode::Char('t') if modifiers.contains(KeyModifiers::CONTROL) => {
            state.chat.toggle_mode();
            KeyAction::Repaint
        }
        KeyCode::Char('l') if modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Repaint,
        KeyCode::Char('r') if modifiers.contains(KeyModifiers::CONTROL) => {
            match state.chat.last_reply_id() {
                Some(id) if state.chat.add_reaction(id, THUMBS_UP) => KeyAction::Repaint,
                _ => KeyAction::None,
            }
        }
        _ if edit_key(&mut state.chat_editor, code, modifiers) => KeyAction::Redraw,
        _ => KeyAction::None,
    }
}

async fn run_repl(state: &mut ReplState, backend: Arc<dyn ChatBackend>) -> Result<()> {
    let mut stdout = io::stdout();
    let mut area = InputArea::default();
    let mut events = EventStream::new();
    let (reply_tx, mut reply_rx) = tokio::sync::mpsc::channel::<ChatReply>(8);

    apply_clear_screen(&mut stdout, &state.screen_lines(), state, &mut area);

    loop {
        tokio::select! {
            maybe_event = events.next() => {
                let Some(Ok(event)) = maybe_event else {
                    break;
                };

                let action = match event {
                    Event::Paste(text) => {
                        state.active_editor_mut().insert_text(&text);
                        KeyAction::Redraw
                    }
                    Event::Resize(..) => KeyAction::Repaint,
                    Event::Key(KeyEvent { code, modifiers, kind, .. }) => {
                        if kind != KeyEventKind::Press {
                            continue;
                        }
                        if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
                            clear_input_area(&mut stdout, &mut area);
                            raw_println!();
                            raw_println!("{}", finish(print_system_raw("Goodbye."), state.color));
                            return Ok(());
                        }
                        if state.chat.is_open() {
                            handle_chat_key(state, code, modifiers)
                        } else {
                            handle_prompt_key(state, code, modifiers)
                        }
                    }
                    _ => KeyAction::None,
                };

                match action {
                    KeyAction::None => {}
                    KeyAction::Redraw => redraw_input(&mut stdout, state, &mut area),
                    KeyAction::Repaint => apply_clear_screen(&mut stdout, &state.screen_lines(), state, &mut area),
                    KeyAction::Send(request) => {
                        let backend = Arc::clone(&backend);
                        let tx = reply_tx.clone();
                        tokio::spawn(async move {
                            let reply = chat::send(backend.as_ref(), request).await;
                            // The receiver only goes away on exit.
                            let _ = tx.send(reply).await;
                        });
                        apply_clear_screen(&mut stdout, &state.screen_lines(), state, &mut area);
                    }
                }
            }

            Some(reply) = reply_rx.recv() => {
                if state.chat.settle(reply) {
                    apply_clear_screen(&mut stdout, &state.screen_lines(), state, &mut area);
                }
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(path) = init_tracing().context("Failed to open log file")? {
        tracing::info!(log = %path, version = termfolio_core::VERSION, "termfolio starting");
    }

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", finish(print_error_raw(&format!("{err:#}")), !args.no_color));
            std::process::exit(2);
        }
    };
    let content = load_content(&config)?;
    let color = !args.no_color && std::env::var_os("NO_COLOR").is_none();

    if let Some(command) = &args.exec {
        run_once(config, content, command, color && io::stdout().is_terminal());
        return Ok(());
    }

    let backend = chat_backend(&config);
    let mut state = ReplState::new(config, content, color);

    // Install panic hook to restore terminal
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = terminal::disable_raw_mode();
        let _ = execute!(io::stdout(), cursor::Show, crossterm::event::DisableBracketedPaste);
        default_panic(info);
    }));

    // Enable raw mode + bracketed paste
    terminal::enable_raw_mode()?;
    execute!(io::stdout(), crossterm::event::EnableBracketedPaste)?;

    let result = run_repl(&mut state, backend).await;

    // Restore terminal
    terminal::disable_raw_mode()?;
    execute!(io::stdout(), cursor::Show, crossterm::event::DisableBracketedPaste)?;

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use termfolio_core::session::CLEARED;

    fn state() -> ReplState {
        ReplState::new(CoreConfig::new("/tmp/termfolio-test"), Portfolio::sample().unwrap(), false)
    }

    fn press(state: &mut ReplState, code: KeyCode) -> KeyAction {
        if state.chat.is_open() {
            handle_chat_key(state, code, KeyModifiers::NONE)
        } else {
            handle_prompt_key(state, code, KeyModifiers::NONE)
        }
    }

    fn type_text(state: &mut ReplState, text: &str) {
        for c in text.chars() {
            press(state, KeyCode::Char(c));
        }
    }

    #[test]
    fn enter_runs_the_command() {
        let mut state = state();
        type_text(&mut state, "help");
        assert!(matches!(press(&mut state, KeyCode::Enter), KeyAction::Repaint));
        assert!(matches!(press(&mut state, KeyCode::Enter), KeyAction::Redraw));
    }

    #[test]
    fn tab_completes_and_up_recalls() {
        let mut state = state();
        type_text(&mut state, "portfolio pro");
        assert!(matches!(press(&mut state, KeyCode::Tab), KeyAction::Redraw));
        assert_eq!(state.editor.buffer(), "portfolio project");
        press(&mut state, KeyCode::Enter);
        press(&mut state, KeyCode::Up);
        assert_eq!(state.editor.buffer(), "portfolio project");
    }

    #[test]
    fn chat_keys_send_toggle_and_close() {
        let mut state = state();
        type_text(&mut state, "portfolio ai");
        press(&mut state, KeyCode::Enter);
        assert!(state.chat.is_open());

        let toggle = handle_chat_key(&mut state, KeyCode::Char('t'), KeyModifiers::CONTROL);
        assert!(matches!(toggle, KeyAction::Repaint));
        assert_eq!(state.chat.mode().name(), "general");

        type_text(&mut state, "hello");
        assert_eq!(state.chat_editor.buffer(), "hello");
        assert!(matches!(press(&mut state, KeyCode::Enter), KeyAction::Send(_)));

        assert!(matches!(press(&mut state, KeyCode::Esc), KeyAction::Repaint));
        assert!(!state.chat.is_open());
        assert!(!state.editor.input.is_disabled());
    }

    #[test]
    fn args_parse_exec_mode() {
        let args = Args::parse_from(["termfolio", "--exec", "portfolio about", "--no-color"]);
        assert_eq!(args.exec.as_deref(), Some("portfolio about"));
        assert!(args.no_color);
        assert!(args.content.is_none());
    }

    #[test]
    fn ctrl_r_reacts_to_the_latest_reply() {
        let mut state = state();
        type_text(&mut state, "portfolio ai");
        press(&mut state, KeyCode::Enter);
        let react = handle_chat_key(&mut state, KeyCode::Char('r'), KeyModifiers::CONTROL);
        assert!(matches!(react, KeyAction::Repaint));
        assert_eq!(state.chat.messages()[0].reactions, [THUMBS_UP]);
        assert_eq!(state.chat_editor.buffer(), "");
    }

    #[test]
    fn exec_clear_prints_only_the_notice() {
        let session = state().session;
        assert_eq!(exec_lines(&session, "clear"), vec![OutputLine::plain(CLEARED)]);
        assert_eq!(exec_lines(&session, " Clear "), vec![OutputLine::plain(CLEARED)]);

        let help = exec_lines(&session, "help");
        assert_eq!(help[0], OutputLine::echo("help"));
        assert!(help.len() > 1);
    }

    #[test]
    fn exec_overrides_reach_the_config() {
        let args = Args::parse_from(["termfolio", "--namespace", "folio", "--content", "/data/me.json"]);
        let mut config = CoreConfig::new("/tmp/termfolio-test");
        config.namespace = "help".into();
        config.apply_overrides(args.namespace.as_deref(), args.content.as_deref());
        assert!(config.validate().is_ok());
        assert_eq!(config.namespace, "folio");
    }
}
