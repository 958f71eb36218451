//! The closed command grammar.
//!
//! Every place that needs to know the verb set (registry keys, help text,
//! usage block, home quick-start, tab completion) reads it from here.

/// Top-level command identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Help,
    Clear,
    Namespace,
}

impl Verb {
    /// Declared order; completion scans verbs in this order.
    pub const ALL: [Verb; 3] = [Verb::Help, Verb::Clear, Verb::Namespace];

    pub fn summary(self) -> &'static str {
        match self {
            Verb::Help => "Show this help message",
            Verb::Clear => "Clear the terminal",
            Verb::Namespace => "Navigate the portfolio",
        }
    }
}

/// Second-level identifiers nested under the namespace verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubVerb {
    Project,
    About,
    Contact,
    Home,
    Ai,
}

impl SubVerb {
    /// Declared order; completion and listings follow it.
    pub const ALL: [SubVerb; 5] = [
        SubVerb::Project,
        SubVerb::About,
        SubVerb::Contact,
        SubVerb::Home,
        SubVerb::Ai,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SubVerb::Project => "project",
            SubVerb::About => "about",
            SubVerb::Contact => "contact",
            SubVerb::Home => "home",
            SubVerb::Ai => "ai",
        }
    }

    /// Case-insensitive exact match.
    pub fn parse(token: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|sub| same_word(sub.name(), token))
    }

    /// Short description used in the help reference.
    pub fn summary(self) -> &'static str {
        match self {
            SubVerb::Project => "View my projects",
            SubVerb::About => "Learn about me",
            SubVerb::Contact => "Get my contact info",
            SubVerb::Home => "Return home",
            SubVerb::Ai => "Launch AI assistant",
        }
    }

    /// Tail of the "Type <cmd> ..." sentence on the home screen.
    pub fn quick_start(self) -> &'static str {
        match self {
            SubVerb::Project => "to view my projects",
            SubVerb::About => "to learn about me",
            SubVerb::Contact => "to get in touch",
            SubVerb::Home => "to come back to this screen",
            SubVerb::Ai => "to chat with AI assistant",
        }
    }
}

/// Case-insensitive word comparison, folding the same way the namespace is
/// stored and completion lowercases.
pub fn same_word(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

/// Keyboard shortcuts listed by `help`: (glyph, key, action).
pub const SHORTCUTS: &[(&str, &str, &str)] = &[
    ("⬆️", "Up Arrow", "Previous command"),
    ("⬇️", "Down Arrow", "Next command"),
    ("⇥", "Tab", "Auto-complete command"),
    ("⏎", "Enter", "Run command"),
    ("⎋", "Esc", "Close AI assistant"),
];

/// Usage tips shown by the bare namespace verb.
pub const USAGE_TIPS: &[&str] = &[
    "Use Tab for auto-completion",
    "Commands are case-insensitive",
    "Type 'help' for more info",
];

/// The verb table for one configured namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    namespace: String,
}

impl Vocabulary {
    pub const DEFAULT_NAMESPACE: &'static str = "portfolio";

    /// The namespace is stored lowercase. Callers validate it with
    /// [`Vocabulary::validate_namespace`] first.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into().to_lowercase(),
        }
    }

    /// A namespace must be a single non-empty token that does not shadow a
    /// built-in verb.
    pub fn validate_namespace(namespace: &str) -> bool {
        !namespace.is_empty()
            && !namespace.chars().any(char::is_whitespace)
            && !same_word(namespace, "help")
            && !same_word(namespace, "clear")
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn verb_name(&self, verb: Verb) -> &str {
        match verb {
            Verb::Help => "help",
            Verb::Clear => "clear",
            Verb::Namespace => &self.namespace,
        }
    }

    /// Verb names in declared order.
    pub fn verb_names(&self) -> impl Iterator<Item = (&str, Verb)> {
        Verb::ALL.into_iter().map(move |verb| (self.verb_name(verb), verb))
    }

    /// Case-insensitive exact lookup.
    pub fn resolve(&self, token: &str) -> Option<Verb> {
        self.verb_names()
            .find(|(name, _)| same_word(name, token))
            .map(|(_, verb)| verb)
    }

    /// `"<namespace> <sub>"`, the full command line for a sub-verb.
    pub fn command_for(&self, sub: SubVerb) -> String {
        format!("{} {}", self.namespace, sub.name())
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::new(Self::DEFAULT_NAMESPACE)
    }
}
