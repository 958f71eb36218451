//! The HTML subset the content handlers emit, and a terminal renderer for it.
//!
//! Supported: `div`, `p`, `ul`, `ol`, `li`, `h1`-`h3`, `span`, `a`, `br`, `b`,
//! `strong`, `em`, `code`. Unknown tags are skipped but their text is kept.
//! This is not a sanitizer: markup is only ever built from handler templates
//! and escaped collaborator text.

use crate::render::{SpanStyle, StyledLine, StyledSpan};

/// Escape text for interpolation into markup.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape text and turn its line breaks into `<br>`.
pub fn escape_multiline(text: &str) -> String {
    text.split('\n')
        .map(|line| escape_html(line.trim_end_matches('\r')))
        .collect::<Vec<_>>()
        .join("<br>")
}

pub(crate) fn unescape_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let decoded = tail.find(';').and_then(|semi| {
            let entity = &tail[1..semi];
            let ch = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "#39" | "apos" => Some('\''),
                "nbsp" => Some(' '),
                _ => entity
                    .strip_prefix("#x")
                    .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                    .or_else(|| entity.strip_prefix('#').and_then(|dec| dec.parse().ok()))
                    .and_then(char::from_u32),
            };
            ch.map(|c| (c, semi + 1))
        });
        match decoded {
            Some((c, len)) => {
                out.push(c);
                rest = &tail[len..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

#[derive(Debug, PartialEq, Eq)]
enum Token<'a> {
    Text(&'a str),
    Open { name: String, attrs: &'a str, self_closing: bool },
    Close(String),
}

fn tokenize(src: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut rest = src;
    while !rest.is_empty() {
        let Some(lt) = rest.find('<') else {
            tokens.push(Token::Text(rest));
            break;
        };
        if lt > 0 {
            tokens.push(Token::Text(&rest[..lt]));
        }
        let tag_src = &rest[lt..];
        let Some(gt) = find_tag_end(tag_src) else {
            tokens.push(Token::Text(tag_src));
            break;
        };
        let inner = &tag_src[1..gt];
        rest = &tag_src[gt + 1..];

        if inner.starts_with('!') {
            continue;
        }
        if let Some(name) = inner.strip_prefix('/') {
            tokens.push(Token::Close(name.trim().to_ascii_lowercase()));
            continue;
        }
        let self_closing = inner.ends_with('/');
        let inner = inner.trim_end_matches('/');
        let name_end = inner
            .find(|c: char| c.is_whitespace())
            .unwrap_or(inner.len());
        tokens.push(Token::Open {
            name: inner[..name_end].to_ascii_lowercase(),
            attrs: &inner[name_end..],
            self_closing,
        });
    }
    tokens
}

/// Index of the `>` closing the tag at the start of `src`, skipping quoted
/// attribute values.
fn find_tag_end(src: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (i, c) in src.char_indices().skip(1) {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(c),
            (None, '>') => return Some(i),
            _ => {}
        }
    }
    None
}

/// Value of attribute `name` in a raw attribute string.
fn attr_value(attrs: &str, name: &str) -> Option<String> {
    let mut rest = attrs;
    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            return None;
        }
        let key_end = rest
            .find(|c: char| c == '=' || c.is_whitespace())
            .unwrap_or(rest.len());
        let key = &rest[..key_end];
        rest = rest[key_end..].trim_start();
        let value = if let Some(after_eq) = rest.strip_prefix('=') {
            let after_eq = after_eq.trim_start();
            match after_eq.chars().next() {
                Some(q @ ('\'' | '"')) => {
                    let body = &after_eq[1..];
                    let end = body.find(q).unwrap_or(body.len());
                    rest = body.get(end + 1..).unwrap_or("");
                    &body[..end]
                }
                _ => {
                    let end = after_eq
                        .find(char::is_whitespace)
                        .unwrap_or(after_eq.len());
                    rest = &after_eq[end..];
                    &after_eq[..end]
                }
            }
        } else {
            ""
        };
        if key.eq_ignore_ascii_case(name) {
            return Some(unescape_entities(value));
        }
    }
}

fn is_block(name: &str) -> bool {
    matches!(
        name,
        "div" | "p" | "ul" | "ol" | "li" | "h1" | "h2" | "h3" | "section" | "header" | "footer"
    )
}

#[derive(Clone)]
struct Frame {
    tag: String,
    style: SpanStyle,
    href: Option<String>,
}

struct Walker {
    lines: Vec<StyledLine>,
    current: Vec<StyledSpan>,
    stack: Vec<Frame>,
}

impl Walker {
    fn style(&self) -> SpanStyle {
        self.stack
            .iter()
            .rev()
            .map(|f| f.style)
            .find(|s| *s != SpanStyle::Plain)
            .unwrap_or(SpanStyle::Plain)
    }

    fn href(&self) -> Option<String> {
        self.stack.iter().rev().find_map(|f| f.href.clone())
    }

    fn has_text(&self) -> bool {
        self.current.iter().any(|s| !s.text.trim().is_empty())
    }

    /// End the current visual line. `force` keeps empty lines (`<br>`).
    fn flush(&mut self, force: bool) {
        if let Some(last) = self.current.last_mut() {
            let trimmed = last.text.trim_end().len();
            last.text.truncate(trimmed);
        }
        self.current.retain(|s| !s.text.is_empty());
        if force || self.has_text() {
            let spans = std::mem::take(&mut self.current);
            self.lines.push(StyledLine::new(spans));
        } else {
            self.current.clear();
        }
    }

    fn push_text(&mut self, raw: &str) {
        let decoded = unescape_entities(raw);
        let mut text = String::with_capacity(decoded.len());
        let mut last_space = self
            .current
            .last()
            .map(|s| s.text.ends_with(' '))
            .unwrap_or(true);
        for c in decoded.chars() {
            if c.is_whitespace() {
                if !last_space {
                    text.push(' ');
                    last_space = true;
                }
            } else {
                text.push(c);
                last_space = false;
            }
        }
        if text.is_empty() {
            return;
        }
        let style = self.style();
        let href = self.href();
        match self.current.last_mut() {
            Some(last) if last.style == style && last.href == href => last.text.push_str(&text),
            _ => self.current.push(StyledSpan { text, style, href }),
        }
    }

    fn open(&mut self, name: &str, attrs: &str, self_closing: bool) {
        if name == "br" {
            self.flush(true);
            return;
        }
        if is_block(name) {
            self.flush(false);
        }
        if name == "li" {
            self.current.push(StyledSpan::new("• ", SpanStyle::Bullet));
        }
        let class = attr_value(attrs, "class").unwrap_or_default();
        let (style, href) = match name {
            "h1" | "h2" | "h3" => (SpanStyle::Heading, None),
            "a" => (SpanStyle::Link, attr_value(attrs, "href")),
            "b" | "strong" => (SpanStyle::Highlight, None),
            "em" => (SpanStyle::Muted, None),
            "code" => (SpanStyle::Keyword, None),
            "span" => (span_style(&class), None),
            _ => (SpanStyle::Plain, None),
        };
        if !self_closing {
            self.stack.push(Frame {
                tag: name.to_string(),
                style,
                href,
            });
        }
    }

    fn close(&mut self, name: &str) {
        if let Some(pos) = self.stack.iter().rposition(|f| f.tag == name) {
            self.stack.truncate(pos);
        }
        if is_block(name) {
            self.flush(false);
        }
    }
}

fn span_style(class: &str) -> SpanStyle {
    let has = |c: &str| class.split_whitespace().any(|cls| cls == c);
    if has("cmd") {
        SpanStyle::Keyword
    } else if has("sub") {
        SpanStyle::Subcommand
    } else if has("muted") {
        SpanStyle::Muted
    } else if has("key") {
        SpanStyle::Highlight
    } else {
        SpanStyle::Accent
    }
}

/// Render one markup line. Structure-only lines yield no visual lines.
pub fn render_markup(src: &str) -> Vec<StyledLine> {
    let mut walker = Walker {
        lines: Vec::new(),
        current: Vec::new(),
        stack: Vec::new(),
    };
    for token in tokenize(src) {
        match token {
            Token::Text(text) => walker.push_text(text),
            Token::Open {
                name,
                attrs,
                self_closing,
            } => walker.open(&name, attrs, self_closing),
            Token::Close(name) => walker.close(&name),
        }
    }
    walker.flush(false);
    walker.lines
}
