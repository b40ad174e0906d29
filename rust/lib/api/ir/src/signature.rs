//! Input contract: what the reflection layer hands us.
//!
//! One `Interface` per annotated service declaration. Comment lines are kept
//! raw (`//kun:op GET /users`, `// Free text`), in source order.

use serde::{Deserialize, Serialize};

use crate::types::Shape;

/// An annotated interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interface {
    /// Interface name (e.g. `Service`).
    pub name: String,

    /// Raw comment lines attached to the interface declaration.
    #[serde(default)]
    pub doc: Vec<String>,

    /// Methods, in declaration order.
    #[serde(default)]
    pub methods: Vec<MethodSignature>,
}

/// A single method of an interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodSignature {
    /// Method name (e.g. `GetMessage`).
    pub name: String,

    /// Arguments, in declaration order.
    #[serde(default)]
    pub args: Vec<Argument>,

    /// Return values, in declaration order.
    #[serde(default)]
    pub returns: Vec<ReturnValue>,

    /// Raw comment lines attached to the method.
    #[serde(default)]
    pub doc: Vec<String>,
}

impl MethodSignature {
    /// Find an argument by name.
    pub fn arg(&self, name: &str) -> Option<&Argument> {
        self.args.iter().find(|a| a.name == name)
    }

    /// Return values that are not error-like.
    pub fn results(&self) -> impl Iterator<Item = &ReturnValue> {
        self.returns.iter().filter(|r| r.shape != Shape::Error)
    }

    /// A method is void when it returns nothing but (optionally) an error.
    pub fn is_void(&self) -> bool {
        self.results().next().is_none()
    }
}

/// A method argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    /// Argument name (e.g. `userID`).
    pub name: String,

    /// Raw type description (e.g. `string`, `[]int`, `CreateUserRequest`).
    pub ty: String,

    pub shape: Shape,
}

impl Argument {
    pub fn new(name: impl Into<String>, ty: impl Into<String>, shape: Shape) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            shape,
        }
    }

    /// Shorthand for a scalar argument.
    pub fn scalar(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self::new(name, ty, Shape::Scalar)
    }
}

/// A field of a composite argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Field name as declared (e.g. `UserID`).
    pub name: String,

    /// Raw type description.
    pub ty: String,

    pub shape: Shape,

    /// Raw field metadata (`in=header name=X-Api-Key`, or `-` to omit).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<String>,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: impl Into<String>, shape: Shape) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            shape,
            meta: None,
        }
    }

    /// Attach raw metadata to this field.
    pub fn with_meta(mut self, meta: impl Into<String>) -> Self {
        self.meta = Some(meta.into());
        self
    }
}

/// A method return value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnValue {
    pub name: String,
    pub ty: String,
    pub shape: Shape,
}

impl ReturnValue {
    pub fn new(name: impl Into<String>, ty: impl Into<String>, shape: Shape) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            shape,
        }
    }

    /// Shorthand for the trailing `err error` return.
    pub fn error() -> Self {
        Self::new("err", "error", Shape::Error)
    }
}
