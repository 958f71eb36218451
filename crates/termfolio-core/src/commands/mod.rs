//! Command registry: verb lookup and dispatch to handlers.

pub mod banner;
pub mod handlers;

use std::fmt;

use crate::content::Portfolio;
use crate::output::OutputLine;
use crate::vocabulary::{same_word, Verb, Vocabulary};

/// Everything a handler may read.
#[derive(Debug, Clone, Copy)]
pub struct CommandContext<'a> {
    pub vocab: &'a Vocabulary,
    pub content: &'a Portfolio,
    /// Product title used on the home screen.
    pub title: &'a str,
}

/// A mode the caller should switch into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Chat,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Lines(Vec<OutputLine>),
    /// Show `lines`, then switch the frontend into `mode`.
    SwitchMode { mode: Mode, lines: Vec<OutputLine> },
}

impl CommandOutcome {
    pub fn lines(&self) -> &[OutputLine] {
        match self {
            Self::Lines(lines) | Self::SwitchMode { lines, .. } => lines,
        }
    }

    pub fn into_lines(self) -> Vec<OutputLine> {
        match self {
            Self::Lines(lines) | Self::SwitchMode { lines, .. } => lines,
        }
    }

    pub fn mode(&self) -> Option<Mode> {
        match self {
            Self::Lines(_) => None,
            Self::SwitchMode { mode, .. } => Some(*mode),
        }
    }
}

/// `args` excludes the verb itself.
pub type Handler = fn(&CommandContext<'_>, &[&str]) -> CommandOutcome;

/// Maps canonical lowercase verb names to handlers.
///
/// `clear` has no handler: the session intercepts it before dispatch.
#[derive(Clone)]
pub struct Registry {
    entries: Vec<(String, Handler)>,
}

impl Registry {
    pub fn new(vocab: &Vocabulary) -> Self {
        let entries = vocab
            .verb_names()
            .filter_map(|(name, verb)| {
                let handler: Handler = match verb {
                    Verb::Help => handlers::help,
                    Verb::Namespace => handlers::namespace,
                    Verb::Clear => return None,
                };
                Some((name.to_string(), handler))
            })
            .collect();
        Self { entries }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Case-insensitive exact match.
    pub fn resolve(&self, verb: &str) -> Option<Handler> {
        self.entries
            .iter()
            .find(|(name, _)| same_word(name, verb))
            .map(|(_, handler)| *handler)
    }

    /// Split `input` on whitespace and run the matching handler, or produce
    /// the not-found diagnostic. Empty input yields no lines.
    pub fn dispatch(&self, ctx: &CommandContext<'_>, input: &str) -> CommandOutcome {
        let mut words = input.split_whitespace();
        let Some(verb) = words.next() else {
            return CommandOutcome::Lines(Vec::new());
        };
        let args: Vec<&str> = words.collect();
        match self.resolve(verb) {
            Some(handler) => {
                tracing::debug!(verb, args = args.len(), "Dispatching command");
                handler(ctx, &args)
            }
            None => {
                tracing::debug!(verb, "Command not found");
                CommandOutcome::Lines(handlers::not_found(ctx.vocab, verb))
            }
        }
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn portfolio() -> Portfolio {
        Portfolio::from_json(r#"{ "about": { "bio": "bio" } }"#).unwrap()
    }

    #[test]
    fn registry_keys_exclude_clear() {
        let vocab = Vocabulary::new("folio");
        let registry = Registry::new(&vocab);
        let keys: Vec<&str> = registry.keys().collect();
        assert_eq!(keys, vec!["help", "folio"]);
        assert!(registry.resolve("clear").is_none());
    }

    #[test]
    fn resolve_ignores_case() {
        let registry = Registry::new(&Vocabulary::default());
        assert!(registry.resolve("HeLp").is_some());
        assert!(registry.resolve("PORTFOLIO").is_some());
        assert!(registry.resolve("helpme").is_none());

        let registry = Registry::new(&Vocabulary::new("été"));
        assert!(registry.resolve("ÉTÉ").is_some());
    }

    #[test]
    fn unknown_verb_yields_four_line_diagnostic() {
        let vocab = Vocabulary::default();
        let content = portfolio();
        let ctx = CommandContext {
            vocab: &vocab,
            content: &content,
            title: "Test",
        };
        let registry = Registry::new(&vocab);
        for input in ["ls", "sudo rm -rf /", "Help2 me"] {
            let verb = input.split_whitespace().next().unwrap();
            let outcome = registry.dispatch(&ctx, input);
            assert_eq!(outcome.mode(), None);
            let lines = outcome.lines();
            assert_eq!(lines.len(), 4);
            assert_eq!(lines[0], OutputLine::plain(format!("Command not found: {verb}")));
            assert_eq!(lines[1], OutputLine::plain("Type 'help' to see available commands."));
            assert_eq!(lines[2], OutputLine::blank());
            assert!(lines[3].to_raw().contains("'portfolio ai'"));
        }
    }

    #[test]
    fn empty_input_yields_nothing() {
        let vocab = Vocabulary::default();
        let content = portfolio();
        let ctx = CommandContext {
            vocab: &vocab,
            content: &content,
            title: "Test",
        };
        let outcome = Registry::new(&vocab).dispatch(&ctx, "   \t ");
        assert!(outcome.lines().is_empty());
    }
}
