//! Specification IR: the fully resolved output.
//!
//! Built once per interface and handed to the rendering stage read-only.
//! Every list here is in declaration order; renderers rely on it for stable
//! output.

use serde::{Deserialize, Serialize};

use crate::signature::Argument;
use crate::types::{HttpMethod, Location};

/// Media type used for request and response bodies.
pub const MEDIA_TYPE_JSON: &str = "application/json";

/// One request parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// Where the value is read from.
    #[serde(rename = "in")]
    pub location: Location,

    /// Wire name (e.g. `user_id`, `X-Api-Key`).
    pub name: String,

    /// Type description (e.g. `string`, `[]int`).
    pub ty: String,

    /// True for sequence-of-scalar values.
    #[serde(default)]
    pub repeated: bool,

    #[serde(default)]
    pub required: bool,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    /// Source field when the argument is composite.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl Parameter {
    pub fn new(location: Location, name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            location,
            name: name.into(),
            ty: ty.into(),
            repeated: false,
            required: location == Location::Path,
            description: String::new(),
            field: None,
        }
    }
}

/// Association between one argument and the parameters that feed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    pub argument: Argument,

    pub params: Vec<Parameter>,

    /// Produced by a `param` directive or field metadata.
    #[serde(default)]
    pub manual: bool,

    /// Declares parameters without a matching call argument.
    #[serde(default)]
    pub blank: bool,
}

impl Binding {
    /// A binding whose argument is assembled from several parameters.
    pub fn is_aggregate(&self) -> bool {
        self.params.len() > 1
    }

    /// Parameters in the given location.
    pub fn params_in(&self, location: Location) -> impl Iterator<Item = &Parameter> {
        self.params.iter().filter(move |p| p.location == location)
    }
}

/// How the request body is formed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "field", rename_all = "snake_case")]
pub enum RequestBody {
    /// Built from every body-located parameter (possibly none).
    #[default]
    Synthesized,
    /// The named argument is the entire body.
    Field(String),
    /// The request has no body at all.
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub media_type: String,

    #[serde(default)]
    pub body: RequestBody,

    pub bindings: Vec<Binding>,
}

impl Request {
    /// Binding for a named argument (blank bindings excluded).
    pub fn binding(&self, argument: &str) -> Option<&Binding> {
        self.bindings
            .iter()
            .find(|b| !b.blank && b.argument.name == argument)
    }

    /// All parameters in the given location, in binding order.
    pub fn params_in(&self, location: Location) -> Vec<&Parameter> {
        self.bindings
            .iter()
            .flat_map(|b| b.params_in(location))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub status_code: u16,

    pub media_type: String,

    /// Return value serialized as the entire body. `None` means every
    /// result is a field of the body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_field: Option<String>,
}

/// One HTTP operation: exactly one method + pattern pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    /// Operation name (suffixed when a method declares several patterns).
    pub name: String,

    /// Name of the interface method this operation calls.
    pub method_name: String,

    pub http_method: HttpMethod,

    /// URL pattern (e.g. `/users/{userID}`).
    pub pattern: String,

    pub request: Request,

    pub success: Response,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

/// Interface-level metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecMeta {
    pub title: String,

    pub version: String,

    #[serde(default)]
    pub base_path: String,

    /// Default tags applied by renderers to operations without their own.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

/// The complete resolved specification of one interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specification {
    pub meta: SpecMeta,

    pub operations: Vec<Operation>,
}

impl Specification {
    /// Find an operation by name.
    pub fn operation(&self, name: &str) -> Option<&Operation> {
        self.operations.iter().find(|o| o.name == name)
    }

    /// All operations generated from one interface method.
    pub fn operations_for(&self, method: &str) -> Vec<&Operation> {
        self.operations
            .iter()
            .filter(|o| o.method_name == method)
            .collect()
    }
}
