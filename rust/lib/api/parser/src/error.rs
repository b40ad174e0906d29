use std::fmt;

use thiserror::Error;

// ── Error codes ─────────────────────────────────────────────────────
//
// Stable identifiers for tooling. Messages may be reworded; codes don't.

pub mod error_code {
    pub const SYNTAX_ERROR: &str = "SYNTAX_ERROR";
    pub const REFERENCE_ERROR: &str = "REFERENCE_ERROR";
    pub const CONFLICT: &str = "CONFLICT";
    pub const UNSUPPORTED_SHAPE: &str = "UNSUPPORTED_SHAPE";
    pub const POLICY_VIOLATION: &str = "POLICY_VIOLATION";
}

// ── DirectiveError ──────────────────────────────────────────────────

/// What went wrong while interpreting a directive.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DirectiveError {
    /// Malformed directive text, unmatched option tokens.
    #[error("syntax error: {0}")]
    Syntax(String),

    /// A directive names an argument, return value or alias that does not exist.
    #[error("reference error: {0}")]
    Reference(String),

    /// Duplicate definitions or colliding bindings.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The argument shape cannot be bound the way it was asked to be.
    #[error("unsupported shape: {0}")]
    Shape(String),

    /// A legal-looking value that the contract forbids.
    #[error("policy violation: {0}")]
    Policy(String),
}

impl DirectiveError {
    pub fn error_code(&self) -> &'static str {
        match self {
            DirectiveError::Syntax(_) => error_code::SYNTAX_ERROR,
            DirectiveError::Reference(_) => error_code::REFERENCE_ERROR,
            DirectiveError::Conflict(_) => error_code::CONFLICT,
            DirectiveError::Shape(_) => error_code::UNSUPPORTED_SHAPE,
            DirectiveError::Policy(_) => error_code::POLICY_VIOLATION,
        }
    }

    /// The message without the kind prefix.
    pub fn message(&self) -> &str {
        match self {
            DirectiveError::Syntax(m)
            | DirectiveError::Reference(m)
            | DirectiveError::Conflict(m)
            | DirectiveError::Shape(m)
            | DirectiveError::Policy(m) => m,
        }
    }

    /// Prefix the message, keeping the kind.
    pub fn with_context(self, context: impl fmt::Display) -> Self {
        let wrap = |m: String| format!("{}: {}", context, m);
        match self {
            DirectiveError::Syntax(m) => DirectiveError::Syntax(wrap(m)),
            DirectiveError::Reference(m) => DirectiveError::Reference(wrap(m)),
            DirectiveError::Conflict(m) => DirectiveError::Conflict(wrap(m)),
            DirectiveError::Shape(m) => DirectiveError::Shape(wrap(m)),
            DirectiveError::Policy(m) => DirectiveError::Policy(wrap(m)),
        }
    }
}

// ── ResolveError ────────────────────────────────────────────────────

/// A `DirectiveError` located at a method (or the interface) and the raw
/// directive that triggered it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("method {method}: {error}{}", in_directive(.directive))]
pub struct ResolveError {
    /// Method name, or the interface name for interface-level failures.
    pub method: String,

    /// Raw directive text; empty when the failure is not tied to one line.
    pub directive: String,

    #[source]
    pub error: DirectiveError,
}

impl ResolveError {
    pub fn new(method: impl Into<String>, directive: impl Into<String>, error: DirectiveError) -> Self {
        Self {
            method: method.into(),
            directive: directive.into(),
            error,
        }
    }

    pub fn error_code(&self) -> &'static str {
        self.error.error_code()
    }
}

fn in_directive(directive: &str) -> String {
    if directive.is_empty() {
        String::new()
    } else {
        format!(" (in \"{}\")", directive)
    }
}

/// Attach method/directive context to a bare `DirectiveError` result.
pub(crate) trait ResultExt<T> {
    fn at(self, method: &str, directive: &str) -> Result<T, ResolveError>;
}

impl<T> ResultExt<T> for Result<T, DirectiveError> {
    fn at(self, method: &str, directive: &str) -> Result<T, ResolveError> {
        self.map_err(|e| ResolveError::new(method, directive, e))
    }
}
