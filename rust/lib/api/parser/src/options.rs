//! Option grammar shared by `param`, `body`, `success`, `oas` and field
//! metadata.
//!
//! ```text
//! group  := pair (WS pair)*
//! pair   := key '=' value
//! value  := '\'' any* '\'' | non-space+
//! groups := group (',' group)*
//! ```
//!
//! Text that is not part of a recognized pair is reported verbatim.

use kun_ir::Location;

use crate::error::DirectiveError;

/// Legal values of `in=`.
pub const LOCATIONS: &[&str] = &["path", "query", "header", "request"];

/// Names accepted with `in=request`.
pub const REQUEST_FIELDS: &[&str] = &["RemoteAddr"];

/// Keys of a parameter option group.
pub const PARAM_KEYS: &[&str] = &["in", "name", "required", "type", "descr"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionPair {
    pub key: String,
    pub value: String,
}

/// Split `text` on `sep`, ignoring separators inside single quotes.
pub fn split_top_level(text: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut quoted = false;
    let mut start = 0;
    for (i, ch) in text.char_indices() {
        if ch == '\'' {
            quoted = !quoted;
        } else if ch == sep && !quoted {
            parts.push(&text[start..i]);
            start = i + ch.len_utf8();
        }
    }
    parts.push(&text[start..]);
    parts
}

/// Parse one group of whitespace-separated pairs.
pub fn parse_pairs(text: &str) -> Result<Vec<OptionPair>, DirectiveError> {
    let mut pairs = Vec::new();
    let mut unmatched: Option<usize> = None;
    let mut pos = 0;

    while pos < text.len() {
        let rest = &text[pos..];
        let trimmed = rest.trim_start();
        if trimmed.is_empty() {
            break;
        }
        let start = pos + (rest.len() - trimmed.len());

        match scan_pair(&text[start..]) {
            Some((pair, consumed)) => {
                pairs.push(pair);
                pos = start + consumed;
            }
            None => {
                unmatched.get_or_insert(start);
                let token = &text[start..];
                let end = token.find(char::is_whitespace).unwrap_or(token.len());
                pos = start + end;
            }
        }
    }

    if let Some(start) = unmatched {
        return Err(DirectiveError::Syntax(format!(
            "unmatched option text `{}`",
            text[start..].trim_end()
        )));
    }
    Ok(pairs)
}

/// Parse comma-separated groups. Empty input yields no groups.
pub fn parse_groups(text: &str) -> Result<Vec<Vec<OptionPair>>, DirectiveError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    split_top_level(text, ',')
        .into_iter()
        .map(|group| {
            if group.trim().is_empty() {
                return Err(DirectiveError::Syntax(format!(
                    "empty option group in `{}`",
                    text.trim()
                )));
            }
            parse_pairs(group)
        })
        .collect()
}

/// Scan `key=value` at the start of `s`; returns the pair and bytes consumed.
fn scan_pair(s: &str) -> Option<(OptionPair, usize)> {
    let key_len = s
        .char_indices()
        .take_while(|(i, c)| *c == '_' || c.is_ascii_alphabetic() || (*i > 0 && c.is_ascii_digit()))
        .count();
    if key_len == 0 || !s[key_len..].starts_with('=') {
        return None;
    }
    let key = &s[..key_len];
    let value_start = key_len + 1;
    let rest = &s[value_start..];

    let (value, consumed) = if let Some(quoted) = rest.strip_prefix('\'') {
        let close = quoted.find('\'')?;
        let after = &quoted[close + 1..];
        if after.chars().next().is_some_and(|c| !c.is_whitespace()) {
            return None;
        }
        (&quoted[..close], value_start + close + 2)
    } else {
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        if end == 0 {
            return None;
        }
        (&rest[..end], value_start + end)
    };

    Some((
        OptionPair {
            key: key.to_string(),
            value: value.to_string(),
        },
        consumed,
    ))
}

// ── Parameter options ───────────────────────────────────────────────

/// One parameter option group: `in=.. name=.. required=.. type=.. descr=..`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamOptions {
    pub location: Option<Location>,
    pub name: Option<String>,
    pub required: Option<bool>,
    pub ty: Option<String>,
    pub description: Option<String>,
}

impl ParamOptions {
    /// Parse a single group from raw text.
    pub fn parse(text: &str) -> Result<Self, DirectiveError> {
        Self::from_pairs(&parse_pairs(text)?)
    }

    pub fn from_pairs(pairs: &[OptionPair]) -> Result<Self, DirectiveError> {
        let mut opts = ParamOptions::default();
        let mut seen: Vec<&str> = Vec::new();

        for pair in pairs {
            if seen.contains(&pair.key.as_str()) {
                return Err(DirectiveError::Conflict(format!(
                    "duplicate option `{}`",
                    pair.key
                )));
            }
            seen.push(&pair.key);

            match pair.key.as_str() {
                "in" => opts.location = Some(parse_location(&pair.value)?),
                "name" => opts.name = Some(pair.value.clone()),
                "required" => opts.required = Some(parse_bool(&pair.key, &pair.value)?),
                "type" => opts.ty = Some(pair.value.clone()),
                "descr" => opts.description = Some(pair.value.clone()),
                other => {
                    return Err(DirectiveError::Syntax(format!(
                        "unknown option `{}`, expected one of: {}",
                        other,
                        PARAM_KEYS.join(", ")
                    )))
                }
            }
        }
        Ok(opts)
    }

    pub fn is_empty(&self) -> bool {
        *self == ParamOptions::default()
    }

    /// `in=request` may only name a field from [`REQUEST_FIELDS`].
    pub fn check_request_name(&self, argument: &str) -> Result<(), DirectiveError> {
        if self.location != Some(Location::Request) {
            return Ok(());
        }
        match self.name.as_deref() {
            Some(name) if REQUEST_FIELDS.contains(&name) => Ok(()),
            other => Err(DirectiveError::Policy(format!(
                "argument `{}`: in=request requires name to be one of: {} (got `{}`)",
                argument,
                REQUEST_FIELDS.join(", "),
                other.unwrap_or("")
            ))),
        }
    }
}

/// Parse an `in=` value.
pub fn parse_location(value: &str) -> Result<Location, DirectiveError> {
    match value {
        "path" => Ok(Location::Path),
        "query" => Ok(Location::Query),
        "header" => Ok(Location::Header),
        "request" => Ok(Location::Request),
        other => Err(DirectiveError::Policy(format!(
            "invalid location `{}`, expected one of: {}",
            other,
            LOCATIONS.join(", ")
        ))),
    }
}

pub fn parse_bool(key: &str, value: &str) -> Result<bool, DirectiveError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(DirectiveError::Syntax(format!(
            "option `{}` expects true or false, got `{}`",
            key, other
        ))),
    }
}

// ── Field metadata ──────────────────────────────────────────────────

/// Metadata attached to a composite argument's field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldMeta {
    /// `-`: the field is not bound at all.
    Omitted,
    Options(ParamOptions),
}

impl FieldMeta {
    pub fn parse(raw: &str) -> Result<Self, DirectiveError> {
        if raw.trim() == "-" {
            return Ok(FieldMeta::Omitted);
        }
        Ok(FieldMeta::Options(ParamOptions::parse(raw)?))
    }
}
