//! Kun directive parser.
//!
//! Resolves `//kun:` comment directives on an interface and its methods into
//! a [`kun_ir::Specification`] of HTTP operations:
//!
//! - [`lexer`] splits doc comments into directives and description text
//! - [`alias`] holds interface-level `$name` substitutions
//! - [`options`] parses `key=value` option groups
//! - the inferencer and binding passes turn arguments into parameters
//! - [`resolve_method`] / [`resolve_interface`] drive the whole thing

pub mod alias;
mod binding;
mod directive;
pub mod error;
mod infer;
pub mod interface;
pub mod lexer;
pub mod operation;
pub mod options;
pub mod util;

pub use alias::AliasTable;
pub use binding::BLANK;
pub use error::{error_code, DirectiveError, ResolveError};
pub use interface::{resolve_interface, Notice, Resolution, ResolveOptions, VoidSuccess};
pub use operation::{resolve_method, MethodResolution};
pub use util::NamingConvention;
