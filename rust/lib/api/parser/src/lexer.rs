//! Directive lexer.
//!
//! Splits a raw comment block into recognized `//kun:` directives and free
//! descriptive text. Trailing-backslash continuations are joined over the
//! whole block first, so a directive may span lines.

use crate::error::{DirectiveError, ResolveError};

/// Prefix every directive line starts with.
pub const DIRECTIVE_PREFIX: &str = "//kun:";

/// Directive keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Op,
    Param,
    Body,
    Success,
    Alias,
    Oas,
    /// Handled by the RPC resolver.
    Grpc,
    /// Handled by the event resolver.
    Event,
}

impl Keyword {
    pub fn parse(word: &str) -> Option<Self> {
        match word {
            "op" => Some(Self::Op),
            "param" => Some(Self::Param),
            "body" => Some(Self::Body),
            "success" => Some(Self::Success),
            "alias" => Some(Self::Alias),
            "oas" => Some(Self::Oas),
            "grpc" => Some(Self::Grpc),
            "event" => Some(Self::Event),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Op => "op",
            Self::Param => "param",
            Self::Body => "body",
            Self::Success => "success",
            Self::Alias => "alias",
            Self::Oas => "oas",
            Self::Grpc => "grpc",
            Self::Event => "event",
        }
    }

    /// Directives consumed by the HTTP resolver on a method.
    pub fn is_http(&self) -> bool {
        matches!(self, Self::Op | Self::Param | Self::Body | Self::Success | Self::Oas)
    }
}

/// One recognized directive line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub keyword: Keyword,
    /// Everything after the keyword, trimmed.
    pub args: String,
    /// The full (continuation-joined) line, for error messages.
    pub raw: String,
}

/// A lexed comment block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocBlock {
    /// Directives in comment order.
    pub directives: Vec<Directive>,
    /// Free-text lines joined with `\n`.
    pub description: String,
}

impl DocBlock {
    /// Directives with the given keyword, in comment order.
    pub fn of(&self, keyword: Keyword) -> impl Iterator<Item = &Directive> {
        self.directives.iter().filter(move |d| d.keyword == keyword)
    }

    /// True when any HTTP directive is present.
    pub fn has_http(&self) -> bool {
        self.directives.iter().any(|d| d.keyword.is_http())
    }
}

/// Lex the raw comment lines of `owner` (a method or interface name).
pub fn lex(owner: &str, lines: &[String]) -> Result<DocBlock, ResolveError> {
    let mut block = DocBlock::default();
    let mut text: Vec<&str> = Vec::new();

    let joined = join_continuations(lines);
    for line in &joined {
        let trimmed = line.trim();
        match trimmed.strip_prefix(DIRECTIVE_PREFIX) {
            Some(rest) => {
                let (word, args) = match rest.split_once(char::is_whitespace) {
                    Some((w, a)) => (w, a.trim()),
                    None => (rest, ""),
                };
                let keyword = Keyword::parse(word).ok_or_else(|| {
                    ResolveError::new(
                        owner,
                        trimmed,
                        DirectiveError::Syntax(format!(
                            "unknown directive `{}{}`",
                            DIRECTIVE_PREFIX, word
                        )),
                    )
                })?;
                block.directives.push(Directive {
                    keyword,
                    args: args.to_string(),
                    raw: trimmed.to_string(),
                });
            }
            None => text.push(description_text(line)),
        }
    }

    // Drop blank lines around the description.
    while text.first().is_some_and(|l| l.trim().is_empty()) {
        text.remove(0);
    }
    while text.last().is_some_and(|l| l.trim().is_empty()) {
        text.pop();
    }
    block.description = text.join("\n");

    Ok(block)
}

/// Join every line ending in `\` with the line after it.
///
/// The continuation line loses its own comment marker, so
/// `//kun:param a \` + `//   in=header` becomes `//kun:param a in=header`.
pub fn join_continuations(lines: &[String]) -> Vec<String> {
    let mut out = Vec::with_capacity(lines.len());
    let mut pending: Option<String> = None;

    for line in lines {
        let line = line.trim_end();
        let text = match pending.take() {
            Some(mut acc) => {
                let cont = strip_comment_marker(line).trim_start();
                if !cont.is_empty() {
                    if !acc.is_empty() {
                        acc.push(' ');
                    }
                    acc.push_str(cont);
                }
                acc
            }
            None => line.to_string(),
        };

        match text.strip_suffix('\\') {
            Some(head) => pending = Some(head.trim_end().to_string()),
            None => out.push(text),
        }
    }

    // A dangling backslash on the last line is dropped.
    if let Some(acc) = pending {
        out.push(acc);
    }
    out
}

fn strip_comment_marker(line: &str) -> &str {
    let trimmed = line.trim_start();
    trimmed.strip_prefix("//").unwrap_or(trimmed)
}

fn description_text(line: &str) -> &str {
    let body = strip_comment_marker(line);
    body.strip_prefix(' ').unwrap_or(body)
}
