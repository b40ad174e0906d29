//! Interface resolver: aliases and document metadata, then every method.

use kun_ir::{Interface, SpecMeta, Specification};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::alias::AliasTable;
use crate::directive::parse_oas;
use crate::error::{DirectiveError, ResolveError, ResultExt};
use crate::lexer::{lex, Keyword};
use crate::operation::resolve_method;
use crate::util::NamingConvention;

/// Document version used when the interface does not set one.
pub const DEFAULT_VERSION: &str = "0.0.0";

/// What to do when a method returning nothing asks for status 200.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoidSuccess {
    /// Report a policy violation.
    #[default]
    Reject,
    /// Use 204 instead and emit a [`Notice`].
    Rewrite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveOptions {
    /// Convention for wire names derived from argument and field names.
    pub naming: NamingConvention,
    pub void_success: VoidSuccess,
}

/// A non-fatal adjustment made while resolving.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub method: String,
    pub message: String,
}

/// Outcome of resolving an interface.
///
/// Per-method failures do not stop resolution; they are collected in
/// `errors` and the failing methods contribute no operations.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub spec: Specification,
    pub errors: Vec<ResolveError>,
    pub notices: Vec<Notice>,
}

impl Resolution {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// The specification, or the first method error.
    pub fn into_result(self) -> Result<Specification, ResolveError> {
        match self.errors.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(self.spec),
        }
    }
}

/// Resolve every method of `iface`.
///
/// Fails only for interface-level problems (a bad alias, malformed `oas`
/// directive or a method-only directive on the interface).
pub fn resolve_interface(iface: &Interface, options: &ResolveOptions) -> Result<Resolution, ResolveError> {
    let block = lex(&iface.name, &iface.doc)?;

    let mut aliases = AliasTable::new();
    let mut meta = SpecMeta {
        title: iface.name.clone(),
        version: DEFAULT_VERSION.to_string(),
        base_path: String::new(),
        tags: Vec::new(),
        description: block.description.clone(),
    };

    for d in &block.directives {
        match d.keyword {
            Keyword::Alias => aliases.define(&d.args).at(&iface.name, &d.raw)?,
            Keyword::Oas => {
                let oas = parse_oas(&d.args).at(&iface.name, &d.raw)?;
                if let Some(title) = oas.title {
                    meta.title = title;
                }
                if let Some(version) = oas.version {
                    meta.version = version;
                }
                if let Some(base_path) = oas.base_path {
                    meta.base_path = base_path;
                }
                if let Some(tags) = oas.tags {
                    meta.tags.extend(tags);
                }
            }
            Keyword::Grpc | Keyword::Event => {}
            Keyword::Op | Keyword::Param | Keyword::Body | Keyword::Success => {
                return Err(ResolveError::new(
                    &iface.name,
                    &d.raw,
                    DirectiveError::Syntax(format!(
                        "`{}` can only be used on methods",
                        d.keyword.as_str()
                    )),
                ))
            }
        }
    }

    let mut operations = Vec::new();
    let mut errors = Vec::new();
    let mut notices = Vec::new();
    for method in &iface.methods {
        match resolve_method(method, &aliases, options) {
            Ok(resolved) => {
                operations.extend(resolved.operations);
                notices.extend(resolved.notices);
            }
            Err(err) => {
                warn!("{}", err);
                errors.push(err);
            }
        }
    }

    info!(
        "resolved interface {}: {} operations, {} errors",
        iface.name,
        operations.len(),
        errors.len()
    );
    Ok(Resolution {
        spec: Specification { meta, operations },
        errors,
        notices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use kun_ir::{Argument, MethodSignature, ReturnValue};

    fn iface(doc: &[&str], methods: Vec<MethodSignature>) -> Interface {
        Interface {
            name: "Messaging".into(),
            doc: doc.iter().map(|s| s.to_string()).collect(),
            methods,
        }
    }

    fn method(name: &str, doc: &[&str]) -> MethodSignature {
        MethodSignature {
            name: name.into(),
            args: vec![Argument::scalar("id", "string")],
            returns: vec![ReturnValue::error()],
            doc: doc.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn metadata_defaults() {
        let res = resolve_interface(&iface(&["Messaging sends messages."], vec![]), &ResolveOptions::default()).unwrap();
        assert_eq!(res.spec.meta.title, "Messaging");
        assert_eq!(res.spec.meta.version, "0.0.0");
        assert_eq!(res.spec.meta.base_path, "");
        assert_eq!(res.spec.meta.description, "Messaging sends messages.");
        assert!(res.is_ok());
    }

    #[test]
    fn oas_sets_metadata() {
        let doc = ["//kun:oas title='Message API' version=1.0.0", "//kun:oas basePath=/v1 tags=messages"];
        let res = resolve_interface(&iface(&doc, vec![]), &ResolveOptions::default()).unwrap();
        assert_eq!(res.spec.meta.title, "Message API");
        assert_eq!(res.spec.meta.version, "1.0.0");
        assert_eq!(res.spec.meta.base_path, "/v1");
        assert_eq!(res.spec.meta.tags, vec!["messages"]);
    }

    #[test]
    fn method_errors_are_collected() {
        let methods = vec![
            method("Good", &["//kun:op DELETE /items/{id}"]),
            method("Bad", &["//kun:op DELETE /items/{id}", "//kun:param missing"]),
            method("Plain", &[]),
        ];
        let res = resolve_interface(&iface(&[], methods), &ResolveOptions::default()).unwrap();
        assert_eq!(res.spec.operations.len(), 1);
        assert_eq!(res.errors.len(), 1);
        assert_eq!(res.errors[0].method, "Bad");
        assert!(!res.is_ok());
        assert!(res.into_result().is_err());
    }

    #[test]
    fn method_directives_on_interface_fail() {
        let err = resolve_interface(&iface(&["//kun:op GET /x"], vec![]), &ResolveOptions::default()).unwrap_err();
        assert_eq!(err.method, "Messaging");
        assert!(matches!(err.error, DirectiveError::Syntax(_)));
    }

    #[test]
    fn bad_alias_aborts_interface() {
        let err = resolve_interface(&iface(&["//kun:alias broken"], vec![]), &ResolveOptions::default()).unwrap_err();
        assert_eq!(err.directive, "//kun:alias broken");
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let opts: ResolveOptions = serde_json::from_str(r#"{"naming":"lower_camel_case"}"#).unwrap();
        assert_eq!(opts.naming, NamingConvention::LowerCamelCase);
        assert_eq!(opts.void_success, VoidSuccess::Reject);
    }
}
