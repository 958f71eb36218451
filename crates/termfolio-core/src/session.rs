//! The visible terminal transcript. Every submitted command replaces it.

use crate::commands::banner::banner_lines;
use crate::commands::{CommandContext, CommandOutcome, Mode, Registry};
use crate::content::Portfolio;
use crate::output::OutputLine;
use crate::vocabulary::{Verb, Vocabulary};

pub const CLEARED: &str = "Terminal cleared.";
pub const CHAT_CLOSED: &str = "AI assistant closed.";

/// What a submission did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitEvent {
    /// Blank input; nothing changed.
    Ignored,
    Rendered,
    Cleared,
    /// The transcript was replaced and the chat panel should open.
    ChatOpened,
}

#[derive(Debug)]
pub struct Session {
    vocab: Vocabulary,
    registry: Registry,
    content: Portfolio,
    title: String,
    transcript: Vec<OutputLine>,
    chat_open: bool,
}

impl Session {
    pub fn new(vocab: Vocabulary, content: Portfolio, title: impl Into<String>) -> Self {
        let title = title.into();
        let registry = Registry::new(&vocab);
        let transcript = welcome_lines(&title);
        Self {
            vocab,
            registry,
            content,
            title,
            transcript,
            chat_open: false,
        }
    }

    pub fn vocab(&self) -> &Vocabulary {
        &self.vocab
    }

    pub fn content(&self) -> &Portfolio {
        &self.content
    }

    pub fn transcript(&self) -> &[OutputLine] {
        &self.transcript
    }

    pub fn is_chat_open(&self) -> bool {
        self.chat_open
    }

    fn context(&self) -> CommandContext<'_> {
        CommandContext {
            vocab: &self.vocab,
            content: &self.content,
            title: &self.title,
        }
    }

    /// Whether `input` is the bare `clear` command.
    pub fn is_clear(&self, input: &str) -> bool {
        self.vocab.resolve(input.trim()) == Some(Verb::Clear)
    }

    /// Output of one command line without touching the transcript.
    /// `clear` is not a registry command and yields the cleared notice.
    pub fn run(&self, input: &str) -> CommandOutcome {
        let line = input.trim();
        if self.is_clear(line) {
            return CommandOutcome::Lines(vec![OutputLine::plain(CLEARED)]);
        }
        self.registry.dispatch(&self.context(), line)
    }

    pub fn submit(&mut self, input: &str) -> SubmitEvent {
        let line = input.trim();
        if line.is_empty() {
            return SubmitEvent::Ignored;
        }
        if self.is_clear(line) {
            tracing::debug!("Clearing transcript");
            self.transcript = vec![OutputLine::plain(CLEARED)];
            return SubmitEvent::Cleared;
        }

        let outcome = self.registry.dispatch(&self.context(), line);
        let opens_chat = outcome.mode() == Some(Mode::Chat);
        let mut transcript = Vec::with_capacity(outcome.lines().len() + 2);
        transcript.push(OutputLine::echo(line));
        transcript.extend(outcome.into_lines());
        transcript.push(OutputLine::blank());
        self.transcript = transcript;

        if opens_chat {
            tracing::info!("Opening chat panel");
            self.chat_open = true;
            SubmitEvent::ChatOpened
        } else {
            SubmitEvent::Rendered
        }
    }

    /// Called when the chat panel is dismissed.
    pub fn close_chat(&mut self) {
        if !self.chat_open {
            return;
        }
        tracing::info!("Closing chat panel");
        self.chat_open = false;
        self.transcript = vec![OutputLine::plain(CHAT_CLOSED), OutputLine::blank()];
    }
}

/// The transcript shown before the first command.
pub fn welcome_lines(title: &str) -> Vec<OutputLine> {
    let mut lines = banner_lines();
    lines.push(OutputLine::blank());
    lines.push(OutputLine::plain(format!(
        "Welcome to {title} Terminal Portfolio v{}",
        crate::VERSION
    )));
    lines.push(OutputLine::plain("Type 'help' to see available commands."));
    lines.push(OutputLine::blank());
    lines
}
