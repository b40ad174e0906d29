//! Shared parser utilities: naming conventions and URL patterns.

use heck::{ToLowerCamelCase, ToSnakeCase};
use serde::{Deserialize, Serialize};

use crate::error::DirectiveError;

/// How argument and field names become wire names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingConvention {
    /// `userID` → `user_id`
    #[default]
    SnakeCase,
    /// `UserID` → `userId`
    LowerCamelCase,
}

impl NamingConvention {
    pub fn apply(&self, name: &str) -> String {
        match self {
            NamingConvention::SnakeCase => name.to_snake_case(),
            NamingConvention::LowerCamelCase => name.to_lower_camel_case(),
        }
    }

    /// Parse a user-facing name (`snake`, `snake_case`, `camel`, `lowerCamelCase`).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "snake" | "snake_case" => Some(Self::SnakeCase),
            "camel" | "lower_camel_case" | "lowerCamelCase" => Some(Self::LowerCamelCase),
            _ => None,
        }
    }
}

/// True for `[A-Za-z_][A-Za-z0-9_]*`.
pub fn is_ident(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

/// Extract the `{name}` variables of a URL pattern, in order.
///
/// `{name:regex}` contributes `name`. Unbalanced braces and empty names are
/// syntax errors; a variable declared twice is a conflict.
pub fn path_vars(pattern: &str) -> Result<Vec<String>, DirectiveError> {
    if !pattern.starts_with('/') {
        return Err(DirectiveError::Syntax(format!(
            "pattern `{}` must start with `/`",
            pattern
        )));
    }

    let mut vars: Vec<String> = Vec::new();
    let mut rest = pattern;
    while let Some(open) = rest.find(|c: char| c == '{' || c == '}') {
        if rest[open..].starts_with('}') {
            return Err(unbalanced(pattern));
        }
        let inner_start = open + 1;
        let close = rest[inner_start..].find('}').ok_or_else(|| unbalanced(pattern))?;
        let inner = &rest[inner_start..inner_start + close];
        if inner.contains('{') {
            return Err(unbalanced(pattern));
        }

        let name = inner.split(':').next().unwrap_or("").trim();
        if name.is_empty() {
            return Err(DirectiveError::Syntax(format!(
                "empty path variable in `{}`",
                pattern
            )));
        }
        if vars.iter().any(|v| v == name) {
            return Err(DirectiveError::Conflict(format!(
                "path variable `{}` declared twice in `{}`",
                name, pattern
            )));
        }
        vars.push(name.to_string());
        rest = &rest[inner_start + close + 1..];
    }
    Ok(vars)
}

fn unbalanced(pattern: &str) -> DirectiveError {
    DirectiveError::Syntax(format!("unbalanced braces in pattern `{}`", pattern))
}
