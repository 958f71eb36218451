//! Turns [`OutputLine`]s into styled spans. Terminal escape codes are the
//! frontend's business; this module only decides intent.

use crate::markup::render_markup;
use crate::output::{OutputLine, ECHO_PREFIX, LINK_MARKER};
use crate::vocabulary::same_word;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpanStyle {
    Plain,
    Art,
    Prompt,
    /// The command (or namespace verb) of an echoed line.
    Keyword,
    /// The sub-verb of an echoed namespace command.
    Subcommand,
    Title,
    Link,
    Highlight,
    Heading,
    Bullet,
    Accent,
    Muted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledSpan {
    pub text: String,
    pub style: SpanStyle,
    pub href: Option<String>,
}

impl StyledSpan {
    pub fn new(text: impl Into<String>, style: SpanStyle) -> Self {
        Self {
            text: text.into(),
            style,
            href: None,
        }
    }

    pub fn link(text: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: SpanStyle::Link,
            href: Some(href.into()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyledLine {
    pub spans: Vec<StyledSpan>,
}

impl StyledLine {
    pub fn new(spans: Vec<StyledSpan>) -> Self {
        Self { spans }
    }

    pub fn single(text: impl Into<String>, style: SpanStyle) -> Self {
        Self::new(vec![StyledSpan::new(text, style)])
    }

    /// Text without styling.
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    /// Spans with the given style, in order.
    pub fn spans_with(&self, style: SpanStyle) -> impl Iterator<Item = &StyledSpan> {
        self.spans.iter().filter(move |s| s.style == style)
    }
}

/// Renders output lines for one namespace verb.
#[derive(Debug, Clone)]
pub struct LineRenderer {
    namespace: String,
}

impl LineRenderer {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    /// Render one line. Markup may expand to several visual lines or none;
    /// plain text with embedded newlines is split.
    pub fn render(&self, line: &OutputLine) -> Vec<StyledLine> {
        match line {
            OutputLine::Art(text) => vec![StyledLine::single(text.clone(), SpanStyle::Art)],
            OutputLine::Markup(html) => render_markup(html),
            OutputLine::Echo(command) => vec![self.render_echo(command)],
            OutputLine::Title(text) => vec![StyledLine::single(text.clone(), SpanStyle::Title)],
            OutputLine::Link { lead, target } => {
                let mut spans = Vec::with_capacity(2);
                if !lead.is_empty() {
                    spans.push(StyledSpan::new(lead.clone(), SpanStyle::Plain));
                }
                spans.push(StyledSpan::link(format!("{LINK_MARKER}{target}"), target.trim()));
                vec![StyledLine::new(spans)]
            }
            OutputLine::Highlight(text) => {
                vec![StyledLine::single(text.clone(), SpanStyle::Highlight)]
            }
            OutputLine::Plain(text) => text
                .split('\n')
                .map(|part| StyledLine::single(part, SpanStyle::Plain))
                .collect(),
        }
    }

    /// Render a whole transcript.
    pub fn render_all<'a>(&self, lines: impl IntoIterator<Item = &'a OutputLine>) -> Vec<StyledLine> {
        lines.into_iter().flat_map(|line| self.render(line)).collect()
    }

    fn render_echo(&self, command: &str) -> StyledLine {
        let mut spans = vec![StyledSpan::new(ECHO_PREFIX, SpanStyle::Prompt)];
        match command.split_once(' ') {
            Some((head, rest)) if same_word(head, &self.namespace) && !rest.trim().is_empty() => {
                let sub = rest.trim_start();
                let gap = &command[head.len()..command.len() - sub.len()];
                spans.push(StyledSpan::new(head, SpanStyle::Keyword));
                spans.push(StyledSpan::new(gap, SpanStyle::Plain));
                spans.push(StyledSpan::new(sub, SpanStyle::Subcommand));
            }
            _ => spans.push(StyledSpan::new(command, SpanStyle::Keyword)),
        }
        StyledLine::new(spans)
    }
}
