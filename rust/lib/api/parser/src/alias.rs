//! Alias table: `alias name=`text`` definitions and `$name` substitution.

use std::collections::HashMap;

use tracing::debug;

use crate::error::DirectiveError;

/// Aliases declared on one interface.
///
/// Later definitions of the same name replace earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    entries: HashMap<String, String>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse and register the argument string of an `alias` directive.
    pub fn define(&mut self, args: &str) -> Result<(), DirectiveError> {
        let (name, text) = parse_definition(args)?;
        if let Some(previous) = self.entries.insert(name.to_string(), text.to_string()) {
            debug!("alias `{}` redefined (was `{}`)", name, previous);
        }
        Ok(())
    }

    /// Replace every `$name` in `input` with the alias text.
    ///
    /// Substituted text is not scanned again. A `$` that is not followed by
    /// an identifier is kept as is.
    pub fn expand(&self, input: &str) -> Result<String, DirectiveError> {
        if !input.contains('$') {
            return Ok(input.to_string());
        }

        let mut out = String::with_capacity(input.len());
        let mut rest = input;
        while let Some(pos) = rest.find('$') {
            out.push_str(&rest[..pos]);
            let after = &rest[pos + 1..];
            let len = ident_len(after);
            if len == 0 {
                out.push('$');
                rest = after;
                continue;
            }
            let name = &after[..len];
            let text = self
                .get(name)
                .ok_or_else(|| DirectiveError::Reference(format!("undefined alias `${}`", name)))?;
            out.push_str(text);
            rest = &after[len..];
        }
        out.push_str(rest);
        Ok(out)
    }
}

/// `name=`text`` → (`name`, `text`).
fn parse_definition(args: &str) -> Result<(&str, &str), DirectiveError> {
    let malformed = || {
        DirectiveError::Syntax(format!(
            "invalid alias `{}`, expected name=`text`",
            args
        ))
    };

    let (name, value) = args.split_once('=').ok_or_else(malformed)?;
    let name = name.trim();
    if name.is_empty() || ident_len(name) != name.len() {
        return Err(malformed());
    }

    let text = value
        .trim()
        .strip_prefix('`')
        .and_then(|v| v.strip_suffix('`'))
        .ok_or_else(malformed)?;
    if text.contains('`') {
        return Err(malformed());
    }
    Ok((name, text))
}

/// Length of the identifier at the start of `s` (ASCII letters, digits, `_`).
fn ident_len(s: &str) -> usize {
    let mut len = 0;
    for (i, ch) in s.char_indices() {
        let ok = ch == '_' || ch.is_ascii_alphabetic() || (i > 0 && ch.is_ascii_digit());
        if !ok {
            break;
        }
        len = i + ch.len_utf8();
    }
    len
}
