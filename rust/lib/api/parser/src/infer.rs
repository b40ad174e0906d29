//! Type-shape inferencer.
//!
//! Turns an argument (plus optional explicit option groups) into a draft
//! binding. Without directives:
//!
//! | Shape               | Result                                          |
//! |---------------------|-------------------------------------------------|
//! | scalar              | one parameter at the default location           |
//! | sequence of scalars | one repeated parameter at the default location  |
//! | composite           | one parameter per field, field metadata applies |
//! | sequence / map      | one body parameter, or an error without a body  |
//! | context / error     | nothing                                         |

use kun_ir::{Argument, Field, Location, Parameter, Shape};

use crate::binding::{DraftBinding, DraftParam, BLANK};
use crate::error::DirectiveError;
use crate::options::{FieldMeta, ParamOptions};
use crate::util::NamingConvention;

/// Check that a value of `shape` can be carried at `location`.
pub(crate) fn check_location(shape: &Shape, location: Location) -> Result<(), DirectiveError> {
    let ok = match shape {
        Shape::Context | Shape::Error => false,
        _ if location == Location::Body => true,
        Shape::Scalar => true,
        Shape::ScalarSeq => location != Location::Path,
        Shape::Composite { .. } | Shape::Sequence | Shape::Map => false,
    };
    if ok {
        Ok(())
    } else {
        Err(DirectiveError::Shape(format!(
            "a {} cannot be bound to {}",
            shape.describe(),
            location
        )))
    }
}

pub(crate) struct Inferencer {
    pub naming: NamingConvention,
    /// Location used when nothing says otherwise.
    pub default_location: Location,
    /// Variables of every pattern the method is served on.
    pub path_vars: Vec<String>,
}

impl Inferencer {
    /// Binding for an argument no directive mentions. `None` for context and
    /// error arguments.
    pub fn infer(&self, arg: &Argument) -> Result<Option<DraftBinding>, DirectiveError> {
        let binding = match &arg.shape {
            Shape::Context | Shape::Error => return Ok(None),
            Shape::Scalar | Shape::ScalarSeq => {
                let param = self.param(&arg.name, &arg.ty, &arg.shape, &ParamOptions::default())
                    .map_err(|e| e.with_context(format!("argument `{}`", arg.name)))?;
                DraftBinding {
                    argument: arg.clone(),
                    params: vec![param],
                    manual: false,
                    blank: false,
                }
            }
            Shape::Composite { fields } => {
                let (params, manual) = self.expand(arg, fields, None)?;
                DraftBinding {
                    argument: arg.clone(),
                    params,
                    manual,
                    blank: false,
                }
            }
            Shape::Sequence | Shape::Map => {
                if self.default_location != Location::Body {
                    return Err(DirectiveError::Shape(format!(
                        "argument `{}` of type `{}` is a {}; it can only travel in a request body",
                        arg.name,
                        arg.ty,
                        arg.shape.describe()
                    )));
                }
                let param = self.param(&arg.name, &arg.ty, &arg.shape, &ParamOptions::default())?;
                DraftBinding {
                    argument: arg.clone(),
                    params: vec![param],
                    manual: false,
                    blank: false,
                }
            }
        };
        Ok(Some(binding))
    }

    /// Binding for an argument named by a `param` directive.
    pub fn explicit(&self, arg: &Argument, groups: &[ParamOptions]) -> Result<DraftBinding, DirectiveError> {
        let ctx = || format!("argument `{}`", arg.name);

        let params = match &arg.shape {
            Shape::Context | Shape::Error => {
                return Err(DirectiveError::Shape(format!(
                    "argument `{}` is a {} value and cannot be bound",
                    arg.name,
                    arg.shape.describe()
                )))
            }
            Shape::Composite { fields } => {
                if groups.len() > 1 {
                    return Err(DirectiveError::Shape(format!(
                        "argument `{}` is composite; only scalar arguments can aggregate several parameters",
                        arg.name
                    )));
                }
                let group = groups.first();
                if group.is_some_and(|g| g.name.is_some() || g.ty.is_some()) {
                    return Err(DirectiveError::Shape(format!(
                        "argument `{}` is composite; name and type apply to its fields, annotate them instead",
                        arg.name
                    )));
                }
                self.expand(arg, fields, group)?.0
            }
            Shape::Scalar | Shape::ScalarSeq | Shape::Sequence | Shape::Map => {
                if groups.len() > 1 && !arg.shape.is_scalar_like() {
                    return Err(DirectiveError::Shape(format!(
                        "argument `{}` is a {}; only scalar arguments can aggregate several parameters",
                        arg.name,
                        arg.shape.describe()
                    )));
                }
                let default = [ParamOptions::default()];
                let groups = if groups.is_empty() { &default[..] } else { groups };
                let mut params = Vec::with_capacity(groups.len());
                for group in groups {
                    group.check_request_name(&arg.name)?;
                    params.push(
                        self.param(&arg.name, &arg.ty, &arg.shape, group)
                            .map_err(|e| e.with_context(ctx()))?,
                    );
                }
                params
            }
        };

        Ok(DraftBinding {
            argument: arg.clone(),
            params,
            manual: true,
            blank: false,
        })
    }

    /// Binding declared with the blank name `__`.
    pub fn blank(&self, groups: &[ParamOptions]) -> Result<DraftBinding, DirectiveError> {
        if groups.is_empty() {
            return Err(DirectiveError::Syntax(format!(
                "blank binding `{}` requires at least one parameter",
                BLANK
            )));
        }

        let mut params = Vec::with_capacity(groups.len());
        for group in groups {
            let name = group.name.as_deref().ok_or_else(|| {
                DirectiveError::Syntax(format!("blank binding `{}` requires name=", BLANK))
            })?;
            group.check_request_name(BLANK)?;
            let ty = group.ty.as_deref().unwrap_or("string");
            params.push(self.param(name, ty, &Shape::Scalar, group)?);
        }

        Ok(DraftBinding {
            argument: Argument::scalar(BLANK, "string"),
            params,
            manual: true,
            blank: true,
        })
    }

    /// Binding for the argument named by `body <arg>`: the entire body.
    pub fn whole_body(&self, arg: &Argument) -> Result<DraftBinding, DirectiveError> {
        check_location(&arg.shape, Location::Body)
            .map_err(|e| e.with_context(format!("body argument `{}`", arg.name)))?;
        let param = Parameter::new(Location::Body, self.naming.apply(&arg.name), arg.ty.clone());
        Ok(DraftBinding {
            argument: arg.clone(),
            params: vec![DraftParam {
                param,
                explicit: true,
                shape: arg.shape.clone(),
            }],
            manual: true,
            blank: false,
        })
    }

    /// One parameter per field of a composite argument. `group` supplies
    /// defaults for `in` and `required`.
    fn expand(
        &self,
        arg: &Argument,
        fields: &[Field],
        group: Option<&ParamOptions>,
    ) -> Result<(Vec<DraftParam>, bool), DirectiveError> {
        let mut params = Vec::with_capacity(fields.len());
        let mut manual = group.is_some();

        for field in fields {
            let ctx = || format!("argument `{}` field `{}`", arg.name, field.name);

            let meta = match &field.meta {
                Some(raw) => Some(FieldMeta::parse(raw).map_err(|e| e.with_context(ctx()))?),
                None => None,
            };
            let own = match meta {
                Some(FieldMeta::Omitted) => continue,
                Some(FieldMeta::Options(opts)) => {
                    manual = true;
                    Some(opts)
                }
                None => None,
            };

            if field.shape.is_excluded() || (!field.shape.is_scalar_like() && own.is_none()) {
                return Err(DirectiveError::Shape(format!(
                    "{} has type `{}` ({}), which cannot be bound automatically",
                    ctx(),
                    field.ty,
                    field.shape.describe()
                )));
            }

            let own = own.unwrap_or_default();
            let merged = ParamOptions {
                location: own.location.or(group.and_then(|g| g.location)),
                required: own.required.or(group.and_then(|g| g.required)),
                ..own
            };
            merged.check_request_name(&format!("{}.{}", arg.name, field.name))?;

            let mut draft = self
                .param(&field.name, &field.ty, &field.shape, &merged)
                .map_err(|e| e.with_context(ctx()))?;
            draft.param.field = Some(field.name.clone());
            params.push(draft);
        }
        Ok((params, manual))
    }

    /// Default wire name. A path parameter keeps the source name when a
    /// pattern declares it verbatim.
    fn wire_name(&self, source: &str, location: Location) -> String {
        if location == Location::Path && self.path_vars.iter().any(|v| v == source) {
            source.to_string()
        } else {
            self.naming.apply(source)
        }
    }

    fn param(
        &self,
        source: &str,
        ty: &str,
        shape: &Shape,
        opts: &ParamOptions,
    ) -> Result<DraftParam, DirectiveError> {
        let location = opts.location.unwrap_or(self.default_location);
        check_location(shape, location)?;

        let mut param = Parameter::new(
            location,
            opts.name.clone().unwrap_or_else(|| self.wire_name(source, location)),
            opts.ty.clone().unwrap_or_else(|| ty.to_string()),
        );
        param.repeated = *shape == Shape::ScalarSeq;
        param.required = location == Location::Path || opts.required.unwrap_or(false);
        param.description = opts.description.clone().unwrap_or_default();

        Ok(DraftParam {
            param,
            explicit: opts.location.is_some(),
            shape: shape.clone(),
        })
    }
}
