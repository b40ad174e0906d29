//! Bindings under construction and the passes over them.
//!
//! A method's bindings are built once (the request template) and bound
//! against the union of its patterns with [`auto_bind_path`]. Every `op`
//! pattern then gets its own copy, run through:
//!
//! 1. [`reinfer_body_as_query`]: when the operation has no synthesized body
//! 2. [`prune_path`]: drop path parameters the pattern does not declare
//! 3. [`manipulate_body`]: apply `body` field manipulations
//! 4. [`check_duplicates`]

use std::collections::HashSet;

use kun_ir::{Argument, Binding, Location, Parameter, Shape};
use tracing::debug;

use crate::error::DirectiveError;
use crate::infer::check_location;
use crate::options::ParamOptions;
use crate::util::NamingConvention;

/// Argument name of a blank binding.
pub const BLANK: &str = "__";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DraftParam {
    pub param: Parameter,
    /// Location came from a directive, field metadata or the body field.
    pub explicit: bool,
    /// Shape of the value this parameter carries.
    pub shape: Shape,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DraftBinding {
    pub argument: Argument,
    pub params: Vec<DraftParam>,
    pub manual: bool,
    pub blank: bool,
}

impl DraftBinding {
    /// Location the binding is explicitly tied to, other than `path`.
    fn explicit_non_path(&self) -> Option<Location> {
        self.params
            .iter()
            .find(|p| p.explicit && p.param.location != Location::Path)
            .map(|p| p.param.location)
    }

    pub fn finish(self) -> Binding {
        Binding {
            argument: self.argument,
            params: self.params.into_iter().map(|p| p.param).collect(),
            manual: self.manual,
            blank: self.blank,
        }
    }
}

/// A `body <arg> name=.. type=.. descr=.. required=..` manipulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BodyManipulation {
    pub argument: String,
    pub options: ParamOptions,
}

/// Names of explicitly declared path parameters.
pub(crate) fn manual_path_names(bindings: &[DraftBinding]) -> Vec<&str> {
    bindings
        .iter()
        .flat_map(|b| b.params.iter())
        .filter(|p| p.explicit && p.param.location == Location::Path)
        .map(|p| p.param.name.as_str())
        .collect()
}

/// Bind every variable of `vars` not already explicitly bound to `path`.
pub(crate) fn auto_bind_path(
    bindings: &mut [DraftBinding],
    vars: &[String],
    naming: NamingConvention,
) -> Result<(), DirectiveError> {
    let manual: Vec<String> = manual_path_names(bindings)
        .into_iter()
        .map(str::to_string)
        .collect();

    for var in vars {
        if manual.contains(var) {
            continue;
        }

        let by_argument = bindings.iter().position(|b| {
            !b.blank && (b.argument.name == *var || naming.apply(&b.argument.name) == *var)
        });
        if let Some(idx) = by_argument {
            bind_argument_to_path(&mut bindings[idx], var)?;
            continue;
        }

        let by_field = bindings.iter().enumerate().find_map(|(bi, b)| {
            if b.blank {
                return None;
            }
            b.params
                .iter()
                .position(|p| p.param.field.is_some() && p.param.name == *var)
                .map(|pi| (bi, pi))
        });
        match by_field {
            Some((bi, pi)) => bind_field_to_path(&mut bindings[bi], pi, var)?,
            None => {
                return Err(DirectiveError::Reference(format!(
                    "cannot bind path parameter `{}`: no such argument",
                    var
                )))
            }
        }
    }
    Ok(())
}

fn bind_argument_to_path(binding: &mut DraftBinding, var: &str) -> Result<(), DirectiveError> {
    let arg = &binding.argument;
    if let Some(location) = binding.explicit_non_path() {
        return Err(DirectiveError::Conflict(format!(
            "cannot bind path parameter `{}`: argument `{}` is already bound to {}",
            var, arg.name, location
        )));
    }
    check_location(&arg.shape, Location::Path)
        .map_err(|e| e.with_context(format!("path parameter `{}`", var)))?;

    let description = binding
        .params
        .first()
        .map(|p| p.param.description.clone())
        .unwrap_or_default();
    let mut param = Parameter::new(Location::Path, var, arg.ty.clone());
    param.description = description;

    debug!("auto-bound path parameter `{}` to argument `{}`", var, arg.name);
    binding.params = vec![DraftParam {
        param,
        explicit: false,
        shape: arg.shape.clone(),
    }];
    Ok(())
}

fn bind_field_to_path(binding: &mut DraftBinding, idx: usize, var: &str) -> Result<(), DirectiveError> {
    let arg_name = binding.argument.name.clone();
    let draft = &mut binding.params[idx];
    let field = draft.param.field.clone().unwrap_or_default();
    if draft.explicit {
        return Err(DirectiveError::Conflict(format!(
            "cannot bind path parameter `{}`: field `{}` of argument `{}` is already bound to {}",
            var, field, arg_name, draft.param.location
        )));
    }
    check_location(&draft.shape, Location::Path)
        .map_err(|e| e.with_context(format!("path parameter `{}`", var)))?;

    debug!("auto-bound path parameter `{}` to field `{}.{}`", var, arg_name, field);
    draft.param.location = Location::Path;
    draft.param.required = true;
    Ok(())
}

/// Move every non-explicit body parameter to the query string.
pub(crate) fn reinfer_body_as_query(bindings: &mut [DraftBinding]) -> Result<(), DirectiveError> {
    for binding in bindings.iter_mut() {
        let arg_name = binding.argument.name.clone();
        for draft in binding.params.iter_mut() {
            if draft.explicit || draft.param.location != Location::Body {
                continue;
            }
            check_location(&draft.shape, Location::Query).map_err(|e| {
                e.with_context(format!(
                    "argument `{}` cannot move out of the request body",
                    arg_name
                ))
            })?;
            draft.param.location = Location::Query;
        }
    }
    Ok(())
}

/// Drop path parameters whose variable is not in `vars`.
///
/// A binding left without parameters is dropped with them.
pub(crate) fn prune_path(bindings: &mut Vec<DraftBinding>, vars: &[String]) {
    let mut kept = Vec::with_capacity(bindings.len());
    for mut binding in bindings.drain(..) {
        let before = binding.params.len();
        binding
            .params
            .retain(|p| p.param.location != Location::Path || vars.contains(&p.param.name));
        if before > 0 && binding.params.is_empty() {
            debug!("pruned path-only binding `{}`", binding.argument.name);
            continue;
        }
        kept.push(binding);
    }
    *bindings = kept;
}

/// Rewrite the body parameter of the manipulated argument.
pub(crate) fn manipulate_body(
    bindings: &mut [DraftBinding],
    manipulation: &BodyManipulation,
) -> Result<(), DirectiveError> {
    let name = &manipulation.argument;
    let binding = bindings
        .iter_mut()
        .find(|b| !b.blank && b.argument.name == *name)
        .ok_or_else(|| {
            DirectiveError::Reference(format!("argument `{}` not declared in method", name))
        })?;

    let mut body: Vec<&mut DraftParam> = binding
        .params
        .iter_mut()
        .filter(|p| p.param.location == Location::Body)
        .collect();
    let draft = match body.len() {
        0 => {
            return Err(DirectiveError::Conflict(format!(
                "cannot manipulate `{}`: not located in the request body",
                name
            )))
        }
        1 => &mut body[0],
        n => {
            return Err(DirectiveError::Shape(format!(
                "cannot manipulate `{}`: it contributes {} body fields",
                name, n
            )))
        }
    };

    let opts = &manipulation.options;
    if let Some(wire) = &opts.name {
        draft.param.name = wire.clone();
    }
    if let Some(ty) = &opts.ty {
        draft.param.ty = ty.clone();
    }
    if let Some(descr) = &opts.description {
        draft.param.description = descr.clone();
    }
    if let Some(required) = opts.required {
        draft.param.required = required;
    }
    Ok(())
}

/// Two parameters may not share a location and a wire name.
pub(crate) fn check_duplicates(bindings: &[DraftBinding]) -> Result<(), DirectiveError> {
    let mut seen: HashSet<(Location, &str)> = HashSet::new();
    for binding in bindings {
        for draft in &binding.params {
            let key = (draft.param.location, draft.param.name.as_str());
            if !seen.insert(key) {
                return Err(DirectiveError::Conflict(format!(
                    "duplicate {} parameter `{}` (argument `{}`)",
                    draft.param.location, draft.param.name, binding.argument.name
                )));
            }
        }
    }
    Ok(())
}
