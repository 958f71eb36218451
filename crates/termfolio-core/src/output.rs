//! Output lines and the raw-string classifier.
//!
//! Handlers build tagged [`OutputLine`]s directly. Lines that arrive as plain
//! strings go through [`classify`], which applies the prefix/substring rules
//! in a fixed priority order.

use std::fmt;

/// Raw prefix that marks a banner-art line.
pub const ART_SENTINEL: &str = "'  ";
pub const ECHO_PREFIX: &str = "$ ";
pub const TITLE_PREFIX: &str = "===";
pub const LINK_MARKER: &str = "GitHub: ";
pub const HIGHLIGHT_MARKERS: [&str; 3] = ["Technical Skills:", "Education:", "Contact Information"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputLine {
    /// Monospace banner art, without the leading sentinel quote.
    Art(String),
    /// Trusted HTML-subset markup produced by the handlers.
    Markup(String),
    /// An echoed command line, without the `$ ` prompt.
    Echo(String),
    Title(String),
    /// `lead` is shown as-is, `target` as a link after the `GitHub: ` marker.
    Link { lead: String, target: String },
    Highlight(String),
    Plain(String),
}

impl OutputLine {
    pub fn plain(text: impl Into<String>) -> Self {
        Self::Plain(text.into())
    }

    pub fn blank() -> Self {
        Self::Plain(String::new())
    }

    pub fn markup(html: impl Into<String>) -> Self {
        Self::Markup(html.into())
    }

    pub fn echo(command: impl Into<String>) -> Self {
        Self::Echo(command.into())
    }

    pub fn title(text: impl Into<String>) -> Self {
        Self::Title(text.into())
    }

    pub fn is_markup(&self) -> bool {
        matches!(self, Self::Markup(_))
    }

    /// The legacy string form of this line.
    ///
    /// For lines produced by [`classify`] this round-trips. A tagged `Plain`
    /// line whose text happens to look like markup does not, which is the
    /// point of tagging it.
    pub fn to_raw(&self) -> String {
        match self {
            Self::Art(text) => format!("'{text}"),
            Self::Markup(html) => html.clone(),
            Self::Echo(command) => format!("{ECHO_PREFIX}{command}"),
            Self::Title(text) => text.clone(),
            Self::Link { lead, target } => format!("{lead}{LINK_MARKER}{target}"),
            Self::Highlight(text) | Self::Plain(text) => text.clone(),
        }
    }
}

impl fmt::Display for OutputLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_raw())
    }
}

/// Classify an untagged line. First matching rule wins.
pub fn classify(line: &str) -> OutputLine {
    if line.starts_with(ART_SENTINEL) {
        return OutputLine::Art(line[1..].to_string());
    }
    if line.contains('<') && line.contains('>') {
        return OutputLine::Markup(line.to_string());
    }
    if let Some(command) = line.strip_prefix(ECHO_PREFIX) {
        return OutputLine::Echo(command.to_string());
    }
    if line.starts_with(TITLE_PREFIX) {
        return OutputLine::Title(line.to_string());
    }
    if let Some((lead, target)) = line.split_once(LINK_MARKER) {
        return OutputLine::Link {
            lead: lead.to_string(),
            target: target.to_string(),
        };
    }
    if HIGHLIGHT_MARKERS.iter().any(|marker| line.contains(marker)) {
        return OutputLine::Highlight(line.to_string());
    }
    OutputLine::Plain(line.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn art_wins_over_markup() {
        let line = "'  ██ <not markup> ██";
        assert_eq!(classify(line), OutputLine::Art("  ██ <not markup> ██".into()));
    }

    #[test]
    fn blank_art_line_is_art() {
        let line = format!("'{}", " ".repeat(40));
        assert!(matches!(classify(&line), OutputLine::Art(_)));
    }

    #[test]
    fn single_quote_needs_two_spaces() {
        assert_eq!(classify("' hello"), OutputLine::plain("' hello"));
    }

    #[test]
    fn markup_needs_both_brackets() {
        assert!(classify("<div>").is_markup());
        assert!(classify("$ echo <b>").is_markup());
        assert_eq!(classify("a < b"), OutputLine::plain("a < b"));
        assert_eq!(classify("a > b"), OutputLine::plain("a > b"));
    }

    #[test]
    fn echo_before_title() {
        assert_eq!(classify("$ === x"), OutputLine::echo("=== x"));
        assert_eq!(classify("$help"), OutputLine::plain("$help"));
    }

    #[test]
    fn title_before_link() {
        assert_eq!(
            classify("=== GitHub: projects"),
            OutputLine::title("=== GitHub: projects")
        );
    }

    #[test]
    fn link_splits_on_first_marker() {
        assert_eq!(
            classify("Repo GitHub: https://github.com/x"),
            OutputLine::Link {
                lead: "Repo ".into(),
                target: "https://github.com/x".into()
            }
        );
        // No trailing space after the colon: not a link.
        assert_eq!(classify("GitHub:x"), OutputLine::plain("GitHub:x"));
    }

    #[test]
    fn link_before_highlight() {
        assert!(matches!(
            classify("Education: see GitHub: x"),
            OutputLine::Link { .. }
        ));
    }

    #[test]
    fn highlight_markers() {
        for line in [
            "Technical Skills: Rust",
            "Education: BSc",
            "My Contact Information below",
        ] {
            assert_eq!(classify(line), OutputLine::Highlight(line.into()));
        }
    }

    #[test]
    fn classified_lines_round_trip() {
        for raw in [
            "'   ███",
            "<p>hi</p>",
            "$ portfolio home",
            "=== Title ===",
            "x GitHub: y",
            "Education: z",
            "just text",
            "",
        ] {
            assert_eq!(classify(raw).to_raw(), raw);
            assert_eq!(classify(&classify(raw).to_string()), classify(raw));
        }
    }

    #[test]
    fn tagged_plain_keeps_angle_brackets_out_of_markup() {
        let line = OutputLine::plain("Command not found: <script>");
        assert!(!line.is_markup());
        assert!(classify(&line.to_raw()).is_markup());
    }
}
