//! Typed parsing of directive argument strings (after alias expansion).

use kun_ir::HttpMethod;

use crate::binding::BodyManipulation;
use crate::error::DirectiveError;
use crate::options::{parse_groups, parse_pairs, split_top_level, ParamOptions};
use crate::util::{is_ident, path_vars};

/// `op <METHOD> <PATTERN>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OpDirective {
    pub method: HttpMethod,
    pub pattern: String,
    /// Variables of `pattern`, in order.
    pub vars: Vec<String>,
}

pub(crate) fn parse_op(args: &str) -> Result<OpDirective, DirectiveError> {
    let tokens: Vec<&str> = args.split_whitespace().collect();
    let [method, pattern] = tokens[..] else {
        return Err(DirectiveError::Syntax(format!(
            "expected `<METHOD> <PATTERN>`, got `{}`",
            args
        )));
    };
    let method = HttpMethod::parse(method).ok_or_else(|| {
        DirectiveError::Syntax(format!("unknown HTTP method `{}`", method))
    })?;
    Ok(OpDirective {
        method,
        pattern: pattern.to_string(),
        vars: path_vars(pattern)?,
    })
}

/// One `<argName> <groups>` segment of a `param` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParamSegment {
    pub argument: String,
    pub groups: Vec<ParamOptions>,
}

pub(crate) fn parse_param(args: &str) -> Result<Vec<ParamSegment>, DirectiveError> {
    if args.trim().is_empty() {
        return Err(DirectiveError::Syntax("param requires an argument name".into()));
    }

    let mut segments = Vec::new();
    for segment in split_top_level(args, ';') {
        let (argument, rest) = split_name(segment)?;
        let groups = parse_groups(rest)?
            .iter()
            .map(|pairs| ParamOptions::from_pairs(pairs))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| e.with_context(format!("argument `{}`", argument)))?;
        segments.push(ParamSegment {
            argument: argument.to_string(),
            groups,
        });
    }
    Ok(segments)
}

/// `body <arg>`, `body -`, or `body <arg> name=.. [; <arg2> ..]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum BodyDirective {
    NoBody,
    Field(String),
    Manipulations(Vec<BodyManipulation>),
}

pub(crate) fn parse_body(args: &str) -> Result<BodyDirective, DirectiveError> {
    let trimmed = args.trim();
    if trimmed == "-" {
        return Ok(BodyDirective::NoBody);
    }
    if trimmed.is_empty() {
        return Err(DirectiveError::Syntax(
            "body requires an argument name or `-`".into(),
        ));
    }
    if is_ident(trimmed) {
        return Ok(BodyDirective::Field(trimmed.to_string()));
    }

    let mut manipulations = Vec::new();
    for segment in split_top_level(trimmed, ';') {
        let (argument, rest) = split_name(segment)?;
        let options = ParamOptions::parse(rest)
            .map_err(|e| e.with_context(format!("body field `{}`", argument)))?;
        if options.location.is_some() {
            return Err(DirectiveError::Syntax(format!(
                "body field `{}`: `in` is not allowed in a body manipulation",
                argument
            )));
        }
        if options.is_empty() {
            return Err(DirectiveError::Syntax(format!(
                "body field `{}`: manipulation sets nothing",
                argument
            )));
        }
        manipulations.push(BodyManipulation {
            argument: argument.to_string(),
            options,
        });
    }
    Ok(BodyDirective::Manipulations(manipulations))
}

/// `success statusCode=<int> body=<result>`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct SuccessDirective {
    pub status_code: Option<u16>,
    pub body: Option<String>,
}

pub(crate) fn parse_success(args: &str) -> Result<SuccessDirective, DirectiveError> {
    let mut success = SuccessDirective::default();
    for pair in parse_pairs(args)? {
        match pair.key.as_str() {
            "statusCode" => {
                if success.status_code.is_some() {
                    return Err(DirectiveError::Conflict("duplicate option `statusCode`".into()));
                }
                let code = pair
                    .value
                    .parse::<u16>()
                    .ok()
                    .filter(|c| (100..=599).contains(c))
                    .ok_or_else(|| {
                        DirectiveError::Syntax(format!("invalid status code `{}`", pair.value))
                    })?;
                success.status_code = Some(code);
            }
            "body" => {
                if success.body.is_some() {
                    return Err(DirectiveError::Conflict("duplicate option `body`".into()));
                }
                if !is_ident(&pair.value) {
                    return Err(DirectiveError::Syntax(format!(
                        "invalid success body `{}`",
                        pair.value
                    )));
                }
                success.body = Some(pair.value);
            }
            other => {
                return Err(DirectiveError::Syntax(format!(
                    "unknown option `{}`, expected one of: statusCode, body",
                    other
                )))
            }
        }
    }
    Ok(success)
}

/// `oas key=value ...`: document-level properties.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct OasDirective {
    pub title: Option<String>,
    pub version: Option<String>,
    pub base_path: Option<String>,
    pub tags: Option<Vec<String>>,
}

pub(crate) fn parse_oas(args: &str) -> Result<OasDirective, DirectiveError> {
    let mut oas = OasDirective::default();
    for pair in parse_pairs(args)? {
        let slot_taken = match pair.key.as_str() {
            "title" => oas.title.replace(pair.value).is_some(),
            "version" => oas.version.replace(pair.value).is_some(),
            "basePath" => oas.base_path.replace(pair.value).is_some(),
            "tags" => {
                let tags = pair
                    .value
                    .split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(str::to_string)
                    .collect();
                oas.tags.replace(tags).is_some()
            }
            other => {
                return Err(DirectiveError::Syntax(format!(
                    "unknown option `{}`, expected one of: title, version, basePath, tags",
                    other
                )))
            }
        };
        if slot_taken {
            return Err(DirectiveError::Conflict(format!(
                "duplicate option `{}`",
                pair.key
            )));
        }
    }
    Ok(oas)
}

/// Split `name rest...`, validating the name.
fn split_name(segment: &str) -> Result<(&str, &str), DirectiveError> {
    let segment = segment.trim();
    if segment.is_empty() {
        return Err(DirectiveError::Syntax("empty binding".into()));
    }
    let (name, rest) = segment
        .split_once(char::is_whitespace)
        .unwrap_or((segment, ""));
    if !is_ident(name) {
        return Err(DirectiveError::Syntax(format!(
            "invalid argument name `{}`",
            name
        )));
    }
    Ok((name, rest))
}
