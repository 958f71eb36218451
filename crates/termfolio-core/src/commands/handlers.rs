//! One handler per verb and sub-verb. All of them are pure: the same context
//! and arguments always produce the same lines.

use super::banner::banner_lines;
use super::{CommandContext, CommandOutcome, Mode};
use crate::markup::{escape_html, escape_multiline};
use crate::output::OutputLine;
use crate::vocabulary::{SubVerb, Verb, Vocabulary, SHORTCUTS, USAGE_TIPS};

pub const CHAT_STARTING: &str = "Starting AI assistant...";

fn markup(lines: &mut Vec<OutputLine>, html: impl Into<String>) {
    lines.push(OutputLine::markup(html));
}

pub fn not_found(vocab: &Vocabulary, verb: &str) -> Vec<OutputLine> {
    vec![
        OutputLine::plain(format!("Command not found: {verb}")),
        OutputLine::plain("Type 'help' to see available commands."),
        OutputLine::blank(),
        OutputLine::plain(format!(
            "💡 Pro tip: Try using the AI assistant with '{}' for a more interactive experience!",
            vocab.command_for(SubVerb::Ai)
        )),
    ]
}

fn unknown_subcommand(vocab: &Vocabulary, token: &str) -> Vec<OutputLine> {
    vec![
        OutputLine::plain(format!("Unknown subcommand: {}", token.to_lowercase())),
        OutputLine::plain(format!(
            "Type '{}' to see available subcommands.",
            vocab.namespace()
        )),
        OutputLine::blank(),
        OutputLine::plain("💡 Tip: Use Tab key for command auto-completion!"),
    ]
}

pub fn help(ctx: &CommandContext<'_>, _args: &[&str]) -> CommandOutcome {
    let vocab = ctx.vocab;
    let mut lines = vec![OutputLine::title("=== 🚀 Available Commands ==="), OutputLine::blank()];

    markup(&mut lines, "<div class='panel'>");
    markup(&mut lines, "  <div class='columns'>");
    markup(&mut lines, "    <div class='command-group'>");
    markup(&mut lines, "      <h3>Core Commands</h3>");
    markup(&mut lines, "      <ul>");
    for verb in Verb::ALL {
        markup(
            &mut lines,
            format!(
                "        <li><span class='cmd'>{}</span> - {}</li>",
                escape_html(vocab.verb_name(verb)),
                verb.summary()
            ),
        );
    }
    markup(&mut lines, "      </ul>");
    markup(&mut lines, "    </div>");
    markup(&mut lines, "    <div class='command-group'>");
    markup(&mut lines, "      <h3>Portfolio Navigation</h3>");
    markup(&mut lines, "      <ul>");
    for sub in SubVerb::ALL {
        markup(
            &mut lines,
            format!(
                "        <li><span class='cmd'>{}</span> - {}</li>",
                escape_html(&vocab.command_for(sub)),
                sub.summary()
            ),
        );
    }
    markup(&mut lines, "      </ul>");
    markup(&mut lines, "    </div>");
    markup(&mut lines, "  </div>");
    markup(&mut lines, "</div>");
    lines.push(OutputLine::blank());

    markup(&mut lines, "<div class='panel'>");
    markup(&mut lines, "  <h3>Keyboard Shortcuts</h3>");
    markup(&mut lines, "  <ul>");
    for (glyph, key, action) in SHORTCUTS {
        markup(
            &mut lines,
            format!("    <li>{glyph} <span class='key'>{key}</span> - {action}</li>"),
        );
    }
    markup(&mut lines, "  </ul>");
    markup(&mut lines, "</div>");

    CommandOutcome::Lines(lines)
}

/// The namespace verb: usage block, a content view, or the chat switch.
pub fn namespace(ctx: &CommandContext<'_>, args: &[&str]) -> CommandOutcome {
    let Some(token) = args.first() else {
        return CommandOutcome::Lines(usage(ctx.vocab));
    };
    match SubVerb::parse(token) {
        Some(SubVerb::Project) => CommandOutcome::Lines(project(ctx)),
        Some(SubVerb::About) => CommandOutcome::Lines(about(ctx)),
        Some(SubVerb::Contact) => CommandOutcome::Lines(contact(ctx)),
        Some(SubVerb::Home) => CommandOutcome::Lines(home(ctx)),
        Some(SubVerb::Ai) => CommandOutcome::SwitchMode {
            mode: Mode::Chat,
            lines: vec![OutputLine::plain(CHAT_STARTING)],
        },
        None => CommandOutcome::Lines(unknown_subcommand(ctx.vocab, token)),
    }
}

fn usage(vocab: &Vocabulary) -> Vec<OutputLine> {
    let ns = escape_html(vocab.namespace());
    let mut lines = Vec::new();
    markup(&mut lines, "<div class='panel'>");
    markup(&mut lines, format!("  <h2>{} Command Usage</h2>", capitalize(&ns)));
    markup(
        &mut lines,
        format!("  <p>Format: <span class='cmd'>{ns} [command]</span></p>"),
    );
    markup(&mut lines, "  <div class='columns'>");
    markup(&mut lines, "    <div>");
    markup(&mut lines, "      <h3>Available Commands:</h3>");
    markup(&mut lines, "      <ul>");
    for sub in SubVerb::ALL {
        markup(&mut lines, format!("        <li>{}</li>", sub.name()));
    }
    markup(&mut lines, "      </ul>");
    markup(&mut lines, "    </div>");
    markup(&mut lines, "    <div>");
    markup(&mut lines, "      <h3>Quick Tips:</h3>");
    markup(&mut lines, "      <ul>");
    for tip in USAGE_TIPS {
        markup(&mut lines, format!("        <li>{}</li>", escape_html(tip)));
    }
    markup(&mut lines, "      </ul>");
    markup(&mut lines, "    </div>");
    markup(&mut lines, "  </div>");
    markup(&mut lines, "</div>");
    lines
}

/// Heading block, then one detail block per project in document order.
pub fn project(ctx: &CommandContext<'_>) -> Vec<OutputLine> {
    let mut lines = Vec::with_capacity(4 + ctx.content.projects.len());
    markup(&mut lines, "<div class='panel'>");
    markup(&mut lines, "  <h2>🚀 Featured Projects</h2>");
    markup(
        &mut lines,
        "  <p>Explore my latest work and contributions to the tech community.</p>",
    );
    markup(&mut lines, "</div>");

    for (name, details) in ctx.content.projects.iter() {
        let url = escape_html(&details.github);
        markup(
            &mut lines,
            format!(
                "<div class='project'>\
                 <h3>{name}</h3>\
                 <p>{description}</p>\
                 <p><span class='muted'>View on GitHub:</span> <a href='{url}' target='_blank'>{url}</a></p>\
                 </div>",
                name = escape_html(name),
                description = escape_multiline(&details.description),
            ),
        );
    }
    lines
}

pub fn about(ctx: &CommandContext<'_>) -> Vec<OutputLine> {
    let mut lines = Vec::new();
    markup(&mut lines, "<div class='panel'>");
    markup(&mut lines, "  <h2>👋 About Me</h2>");
    markup(
        &mut lines,
        format!("  <p>{}</p>", escape_multiline(&ctx.content.about.bio)),
    );
    markup(&mut lines, "</div>");
    lines
}

/// Glyph for a contact platform, with a generic fallback.
pub fn platform_icon(platform: &str) -> &'static str {
    match platform.to_ascii_lowercase().as_str() {
        "linkedin" => "💼",
        "github" => "🐙",
        "leetcode" => "🧩",
        "email" => "✉️",
        _ => "🔗",
    }
}

/// Link target and browsing context for a contact entry. Email addresses
/// become `mailto:` links that open in the same view.
pub fn contact_target(platform: &str, link: &str) -> (String, &'static str) {
    if platform.eq_ignore_ascii_case("email") {
        (format!("mailto:{link}"), "_self")
    } else {
        (link.to_string(), "_blank")
    }
}

pub fn contact(ctx: &CommandContext<'_>) -> Vec<OutputLine> {
    let mut lines = Vec::with_capacity(3 + ctx.content.contact.len());
    markup(&mut lines, "<div class='panel'>");
    markup(&mut lines, "  <h2>📬 Let's Connect!</h2>");
    for (platform, link) in ctx.content.contact.iter() {
        let (href, target) = contact_target(platform, link);
        markup(
            &mut lines,
            format!(
                "  <div class='contact'><span class='icon'>{icon}</span> <b>{platform}</b>: \
                 <a href='{href}' target='{target}'>{link}</a></div>",
                icon = platform_icon(platform),
                platform = escape_html(platform),
                href = escape_html(&href),
                link = escape_html(link),
            ),
        );
    }
    markup(&mut lines, "</div>");
    lines
}

pub fn home(ctx: &CommandContext<'_>) -> Vec<OutputLine> {
    let vocab = ctx.vocab;
    let mut lines = banner_lines();
    lines.push(OutputLine::blank());

    markup(&mut lines, "<div class='panel'>");
    markup(
        &mut lines,
        format!(
            "  <h1>Welcome to {} Terminal Portfolio v{}</h1>",
            escape_html(ctx.title),
            crate::VERSION
        ),
    );
    markup(
        &mut lines,
        "  <p>This interactive terminal allows you to explore my portfolio using simple commands.</p>",
    );
    markup(
        &mut lines,
        "  <p><span class='muted'>Type 'help' for commands</span> · <span class='muted'>Press Tab to auto-complete</span></p>",
    );
    markup(&mut lines, "</div>");
    lines.push(OutputLine::blank());

    markup(&mut lines, "<div class='panel'>");
    markup(&mut lines, "  <h2>🌟 Quick Start</h2>");
    markup(&mut lines, "  <ul>");
    for sub in SubVerb::ALL {
        markup(
            &mut lines,
            format!(
                "    <li>Type <span class='cmd'>{}</span> {}</li>",
                escape_html(&vocab.command_for(sub)),
                sub.quick_start()
            ),
        );
    }
    markup(&mut lines, "  </ul>");
    markup(&mut lines, "</div>");
    lines
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Portfolio;
    use crate::render::{LineRenderer, SpanStyle};

    const CONTENT: &str = r#"{
        "about": { "bio": "Line one\nLine two <3" },
        "projects": {
            "Zeta Engine": { "description": "Fast & small", "github": "https://github.com/me/zeta" },
            "alpha-cli": { "description": "A CLI", "github": "https://github.com/me/alpha" }
        },
        "contact": {
            "GitHub": "https://github.com/me",
            "EMAIL": "me@example.com",
            "Mastodon": "https://social.example/@me"
        }
    }"#;

    struct Fixture {
        vocab: Vocabulary,
        content: Portfolio,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                vocab: Vocabulary::new("folio"),
                content: Portfolio::from_json(CONTENT).unwrap(),
            }
        }

        fn ctx(&self) -> CommandContext<'_> {
            CommandContext {
                vocab: &self.vocab,
                content: &self.content,
                title: "Folio",
            }
        }
    }

    fn visible_text(lines: &[OutputLine]) -> Vec<String> {
        LineRenderer::new("folio")
            .render_all(lines)
            .iter()
            .map(|l| l.text())
            .collect()
    }

    #[test]
    fn bare_namespace_prints_usage() {
        let f = Fixture::new();
        let outcome = namespace(&f.ctx(), &[]);
        assert_eq!(outcome.mode(), None);
        let text = visible_text(outcome.lines());
        assert!(text.contains(&"Folio Command Usage".to_string()));
        for sub in SubVerb::ALL {
            assert!(text.contains(&format!("• {}", sub.name())));
        }
        for tip in USAGE_TIPS {
            assert!(text.contains(&format!("• {tip}")));
        }
    }

    #[test]
    fn ai_switches_mode() {
        let f = Fixture::new();
        let outcome = namespace(&f.ctx(), &["AI"]);
        assert_eq!(outcome.mode(), Some(Mode::Chat));
        assert_eq!(outcome.lines(), &[OutputLine::plain(CHAT_STARTING)]);
    }

    #[test]
    fn unknown_subcommand_is_lowercased() {
        let f = Fixture::new();
        let outcome = namespace(&f.ctx(), &["Resume", "now"]);
        let lines = outcome.lines();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], OutputLine::plain("Unknown subcommand: resume"));
        assert_eq!(lines[1], OutputLine::plain("Type 'folio' to see available subcommands."));
        assert_eq!(lines[2], OutputLine::blank());
    }

    #[test]
    fn sub_verbs_ignore_case_and_extra_args() {
        let f = Fixture::new();
        assert_eq!(
            namespace(&f.ctx(), &["ABOUT", "extra"]),
            CommandOutcome::Lines(about(&f.ctx()))
        );
    }

    #[test]
    fn project_block_per_entry_in_order() {
        let f = Fixture::new();
        let lines = project(&f.ctx());
        let blocks: Vec<&OutputLine> = lines
            .iter()
            .filter(|l| l.to_raw().starts_with("<div class='project'>"))
            .collect();
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].to_raw().contains("Zeta Engine"));
        assert!(blocks[0].to_raw().contains("https://github.com/me/zeta"));
        assert!(blocks[0].to_raw().contains("Fast &amp; small"));
        assert!(blocks[1].to_raw().contains("alpha-cli"));
        assert!(blocks[1].to_raw().contains("https://github.com/me/alpha"));
        assert!(lines.iter().all(OutputLine::is_markup));
    }

    #[test]
    fn project_block_renders_link_span() {
        let f = Fixture::new();
        let rendered = LineRenderer::new("folio").render_all(&project(&f.ctx()));
        let links: Vec<&str> = rendered
            .iter()
            .flat_map(|l| l.spans_with(SpanStyle::Link))
            .filter_map(|s| s.href.as_deref())
            .collect();
        assert_eq!(links, vec!["https://github.com/me/zeta", "https://github.com/me/alpha"]);
    }

    #[test]
    fn about_preserves_line_breaks_and_escapes() {
        let f = Fixture::new();
        let lines = about(&f.ctx());
        assert!(lines.iter().any(|l| l.to_raw().contains("Line one<br>Line two &lt;3")));
        let text = visible_text(&lines);
        assert_eq!(text, vec!["👋 About Me", "Line one", "Line two <3"]);
    }

    #[test]
    fn contact_email_uses_mailto_same_view() {
        let f = Fixture::new();
        let lines = contact(&f.ctx());
        let entries: Vec<String> = lines
            .iter()
            .map(OutputLine::to_raw)
            .filter(|raw| raw.contains("class='contact'"))
            .collect();
        assert_eq!(entries.len(), 3);
        assert!(entries[0].contains("href='https://github.com/me' target='_blank'"));
        assert!(entries[0].contains("🐙"));
        assert!(entries[1].contains("href='mailto:me@example.com' target='_self'"));
        assert!(entries[1].contains("✉️"));
        assert!(entries[2].contains("target='_blank'"));
        assert!(entries[2].contains("🔗"));
    }

    #[test]
    fn contact_target_rules() {
        assert_eq!(contact_target("Email", "a@b.c"), ("mailto:a@b.c".to_string(), "_self"));
        assert_eq!(contact_target("eMaIl", "a@b.c").1, "_self");
        assert_eq!(contact_target("Emails", "x").1, "_blank");
        assert_eq!(platform_icon("LinkedIn"), "💼");
        assert_eq!(platform_icon("leetcode"), "🧩");
        assert_eq!(platform_icon("Bluesky"), "🔗");
    }

    #[test]
    fn home_has_banner_welcome_and_five_quick_starts() {
        let f = Fixture::new();
        let lines = home(&f.ctx());
        assert!(matches!(lines[0], OutputLine::Art(_)));
        let text = visible_text(&lines);
        assert!(text.iter().any(|t| t.starts_with("Welcome to Folio Terminal Portfolio v")));
        let quick: Vec<&String> = text.iter().filter(|t| t.starts_with("• Type folio ")).collect();
        assert_eq!(quick.len(), 5);
        assert_eq!(quick[0], "• Type folio project to view my projects");
        assert_eq!(quick[4], "• Type folio ai to chat with AI assistant");
    }

    #[test]
    fn help_mirrors_vocabulary() {
        let f = Fixture::new();
        let outcome = help(&f.ctx(), &[]);
        assert_eq!(outcome.lines()[0], OutputLine::title("=== 🚀 Available Commands ==="));
        let text = visible_text(outcome.lines());
        assert!(text.contains(&"• help - Show this help message".to_string()));
        assert!(text.contains(&"• clear - Clear the terminal".to_string()));
        for sub in SubVerb::ALL {
            let entry = format!("• folio {} - {}", sub.name(), sub.summary());
            assert!(text.contains(&entry), "missing {entry}");
        }
        assert!(text.contains(&"• ⇥ Tab - Auto-complete command".to_string()));
    }

    #[test]
    fn handlers_are_deterministic() {
        let f = Fixture::new();
        assert_eq!(project(&f.ctx()), project(&f.ctx()));
        assert_eq!(contact(&f.ctx()), contact(&f.ctx()));
    }
}
