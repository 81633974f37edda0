//! Conversion of the markdown subset models produce into HTML fragments.
//!
//! Only bold runs, `#` sub-headers, flat bullet lists and line breaks are
//! understood. Everything else is treated as plain text.

use std::sync::LazyLock;

use regex::Regex;

use crate::utils::html_escape;

static BOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());

static SUB_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#+[ \t]*(\S.*)$").unwrap());

const BULLET_MARKERS: [&str; 4] = ["* ", "- ", "• ", "+ "];

const BLOCK_PREFIX: &str = "<div";

/// One unit of rendered output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    /// A block element already produced by the sub-header pass.
    Block(&'a str),
    ListOpen,
    ListItem(&'a str),
    ListClose,
    /// A plain line, emitted with a trailing break.
    Line(&'a str),
}

impl Token<'_> {
    fn write_to(&self, out: &mut String) {
        match self {
            Token::Block(html) => out.push_str(html),
            Token::ListOpen => out.push_str("<ul class=\"er-list\">"),
            Token::ListItem(content) => {
                out.push_str("<li>");
                out.push_str(content);
                out.push_str("</li>");
            }
            Token::ListClose => out.push_str("</ul>"),
            Token::Line(line) => {
                out.push_str(line);
                out.push_str("<br>");
            }
        }
    }
}

/// Apply the inline passes: escaping, bold runs and sub-headers.
fn inline_pass(text: &str) -> String {
    let escaped = html_escape(text);
    let bolded = BOLD.replace_all(&escaped, "<strong>$1</strong>");
    SUB_HEADER
        .replace_all(&bolded, "<div class=\"er-subheader\">$1</div>")
        .into_owned()
}

fn strip_bullet(stripped: &str) -> Option<&str> {
    BULLET_MARKERS
        .iter()
        .find_map(|marker| stripped.strip_prefix(marker))
        .map(str::trim)
}

/// Scan inline-processed text into a token stream.
///
/// Every `ListOpen` is matched by a `ListClose` before any non-list token
/// and before the end of the stream.
pub fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut in_list = false;

    for line in text.split('\n') {
        let stripped = line.trim();

        if let Some(content) = strip_bullet(stripped) {
            if !in_list {
                tokens.push(Token::ListOpen);
                in_list = true;
            }
            tokens.push(Token::ListItem(content));
            continue;
        }

        if in_list {
            tokens.push(Token::ListClose);
            in_list = false;
        }

        if stripped.starts_with(BLOCK_PREFIX) {
            tokens.push(Token::Block(stripped));
        } else if !stripped.is_empty() {
            tokens.push(Token::Line(line));
        }
    }

    if in_list {
        tokens.push(Token::ListClose);
    }

    tokens
}

/// Render model text into an HTML fragment.
pub fn render(text: &str) -> String {
    let processed = inline_pass(text);
    let tokens = tokenize(&processed);

    let mut out = String::with_capacity(processed.len() + tokens.len() * 8);
    for (i, token) in tokens.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        token.write_to(&mut out);
    }
    out
}
