//! Shared types used across the input contract and the specification.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::signature::Field;

/// Shape of an argument, field or return value, as reported by the
/// reflection layer.
///
/// This is a closed set: the resolver matches on it exhaustively and rejects
/// shapes it cannot bind instead of guessing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    /// A single scalar value (string, integer, bool, ...).
    Scalar,
    /// A sequence of scalars (e.g. `[]string`).
    ScalarSeq,
    /// A struct-like value with named fields.
    Composite { fields: Vec<Field> },
    /// A sequence whose elements are not scalars (e.g. `[]Item`).
    Sequence,
    /// A key/value map.
    Map,
    /// Request-scoped context. Never bound.
    Context,
    /// Error value. Never bound.
    Error,
}

impl Shape {
    /// Context-like and error-like shapes never take part in bindings.
    pub fn is_excluded(&self) -> bool {
        matches!(self, Shape::Context | Shape::Error)
    }

    /// Returns true for shapes that can travel in a path, query or header.
    pub fn is_scalar_like(&self) -> bool {
        matches!(self, Shape::Scalar | Shape::ScalarSeq)
    }

    /// Fields of a composite shape, if any.
    pub fn fields(&self) -> Option<&[Field]> {
        match self {
            Shape::Composite { fields } => Some(fields),
            _ => None,
        }
    }

    /// Short human-readable name used in error messages.
    pub fn describe(&self) -> &'static str {
        match self {
            Shape::Scalar => "scalar",
            Shape::ScalarSeq => "sequence of scalars",
            Shape::Composite { .. } => "composite",
            Shape::Sequence => "sequence of non-scalars",
            Shape::Map => "map",
            Shape::Context => "context",
            Shape::Error => "error",
        }
    }
}

/// Where a request parameter is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    /// URL path segment.
    Path,
    /// Query string.
    Query,
    /// HTTP header.
    Header,
    /// Request body (JSON).
    Body,
    /// Ambient per-request data, such as the remote address.
    Request,
}

impl Location {
    pub fn as_str(&self) -> &'static str {
        match self {
            Location::Path => "path",
            Location::Query => "query",
            Location::Header => "header",
            Location::Body => "body",
            Location::Request => "request",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
    Options,
}

impl HttpMethod {
    /// Parse an upper-case method token (`GET`, `POST`, ...).
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "GET" => Some(Self::Get),
            "HEAD" => Some(Self::Head),
            "POST" => Some(Self::Post),
            "PUT" => Some(Self::Put),
            "PATCH" => Some(Self::Patch),
            "DELETE" => Some(Self::Delete),
            "OPTIONS" => Some(Self::Options),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Options => "OPTIONS",
        }
    }

    /// Whether requests with this method carry a body.
    pub fn has_body(&self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Patch)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_classification() {
        assert!(Shape::Context.is_excluded());
        assert!(Shape::Error.is_excluded());
        assert!(!Shape::Scalar.is_excluded());

        assert!(Shape::ScalarSeq.is_scalar_like());
        assert!(!Shape::Map.is_scalar_like());
        assert!(Shape::Composite { fields: vec![] }.fields().is_some());
        assert!(Shape::Sequence.fields().is_none());
    }

    #[test]
    fn http_method_parse() {
        assert_eq!(HttpMethod::parse("GET"), Some(HttpMethod::Get));
        assert_eq!(HttpMethod::parse("PATCH"), Some(HttpMethod::Patch));
        assert_eq!(HttpMethod::parse("get"), None);
        assert!(HttpMethod::Post.has_body());
        assert!(!HttpMethod::Delete.has_body());
    }

    #[test]
    fn shape_serde_tagging() {
        let json = r#"{"kind":"composite","fields":[{"name":"ID","ty":"string","shape":{"kind":"scalar"}}]}"#;
        let shape: Shape = serde_json::from_str(json).unwrap();
        let fields = shape.fields().unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].name, "ID");
        assert_eq!(fields[0].meta, None);

        assert_eq!(serde_json::to_string(&Location::Header).unwrap(), "\"header\"");
        assert_eq!(serde_json::to_string(&HttpMethod::Delete).unwrap(), "\"DELETE\"");
    }
}
