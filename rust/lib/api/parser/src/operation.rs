//! Method resolver: one annotated method → zero or more operations.

use std::collections::{HashMap, HashSet};

use kun_ir::{
    Location, MethodSignature, Operation, Request, RequestBody, Response,
    MEDIA_TYPE_JSON,
};
use tracing::{debug, info};

use crate::alias::AliasTable;
use crate::binding::{
    auto_bind_path, check_duplicates, manipulate_body, prune_path, reinfer_body_as_query, BodyManipulation, DraftBinding, BLANK,
};
use crate::directive::{
    parse_body, parse_oas, parse_op, parse_param, parse_success, BodyDirective, OpDirective,
    ParamSegment, SuccessDirective,
};
use crate::error::{DirectiveError, ResolveError, ResultExt};
use crate::infer::Inferencer;
use crate::interface::{Notice, ResolveOptions, VoidSuccess};
use crate::lexer::{lex, Directive, Keyword};

/// Status used for methods that return values when `success` names none.
pub const DEFAULT_STATUS: u16 = 200;
/// Status used for methods that return nothing.
pub const VOID_STATUS: u16 = 204;

/// What resolving one method produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MethodResolution {
    pub operations: Vec<Operation>,
    pub notices: Vec<Notice>,
}

/// Resolve a single method against the interface's aliases.
///
/// Methods without HTTP directives (including those carrying only `grpc` or
/// `event` directives) resolve to nothing.
pub fn resolve_method(
    method: &MethodSignature,
    aliases: &AliasTable,
    options: &ResolveOptions,
) -> Result<MethodResolution, ResolveError> {
    let block = lex(&method.name, &method.doc)?;
    if !block.has_http() {
        debug!("method {} has no HTTP directives, skipping", method.name);
        return Ok(MethodResolution::default());
    }
    if let Some(d) = block.of(Keyword::Alias).next() {
        return Err(ResolveError::new(
            &method.name,
            &d.raw,
            DirectiveError::Syntax("aliases can only be declared on the interface".into()),
        ));
    }

    let directives = block
        .directives
        .iter()
        .filter(|d| d.keyword.is_http())
        .map(|d| {
            let args = aliases.expand(&d.args).at(&method.name, &d.raw)?;
            Ok::<_, ResolveError>(Directive {
                keyword: d.keyword,
                args,
                raw: d.raw.clone(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let resolver = MethodResolver {
        method,
        options,
        description: block.description.clone(),
    };
    resolver.resolve(&directives)
}

struct MethodResolver<'a> {
    method: &'a MethodSignature,
    options: &'a ResolveOptions,
    description: String,
}

/// A parsed directive together with the raw line it came from.
struct Located<'d, T> {
    value: T,
    raw: &'d str,
}

/// Bindings shared by every operation of a method.
struct Template<'d> {
    bindings: Vec<DraftBinding>,
    /// Explicit path parameters and the directive that declared each.
    path_params: Vec<(String, &'d str)>,
}

impl<'d> Template<'d> {
    fn push(&mut self, binding: DraftBinding, raw: &'d str) {
        self.path_params.extend(
            binding
                .params
                .iter()
                .filter(|p| p.explicit && p.param.location == Location::Path)
                .map(|p| (p.param.name.clone(), raw)),
        );
        self.bindings.push(binding);
    }
}

impl<'a> MethodResolver<'a> {
    fn name(&self) -> &str {
        &self.method.name
    }

    fn fail(&self, raw: &str, error: DirectiveError) -> ResolveError {
        ResolveError::new(self.name(), raw, error)
    }

    fn resolve(&self, directives: &[Directive]) -> Result<MethodResolution, ResolveError> {
        let ops = self.collect_ops(directives)?;
        let body = self.single(directives, Keyword::Body, parse_body)?;
        let success = self.single(directives, Keyword::Success, parse_success)?;
        let tags = self.tags(directives)?;
        let segments = self.collect_params(directives)?;

        let union: Vec<String> = {
            let mut seen = HashSet::new();
            ops.iter()
                .flat_map(|op| op.value.vars.iter())
                .filter(|v| seen.insert(v.as_str()))
                .cloned()
                .collect()
        };

        if let Some(Located {
            value: BodyDirective::Field(field),
            raw,
        }) = &body
        {
            self.check_body_field(field, raw, &ops, &segments)?;
        }

        let Template {
            bindings: mut template,
            path_params,
        } = self.template(&segments, body.as_ref(), &union)?;
        for (name, raw) in &path_params {
            if !union.contains(name) {
                return Err(self.fail(
                    raw,
                    DirectiveError::Reference(format!(
                        "path parameter `{}` does not appear in any operation pattern",
                        name
                    )),
                ));
            }
        }

        // Bind against the union; each operation prunes what its own
        // pattern lacks.
        for var in &union {
            let raw = ops
                .iter()
                .find(|op| op.value.vars.contains(var))
                .map(|op| op.raw)
                .unwrap_or_default();
            auto_bind_path(&mut template, std::slice::from_ref(var), self.options.naming)
                .at(self.name(), raw)?;
        }

        let mut notices = Vec::new();
        let response = self.success_response(success.as_ref(), &mut notices)?;

        let mut operations = Vec::with_capacity(ops.len());
        for (idx, op) in ops.iter().enumerate() {
            let name = if ops.len() > 1 {
                format!("{}{}", self.name(), idx + 1)
            } else {
                self.name().to_string()
            };
            let request = self.request(&template, &op.value, op.raw, body.as_ref())?;
            debug!(
                "resolved {} {} {} ({} bindings)",
                name,
                op.value.method,
                op.value.pattern,
                request.bindings.len()
            );
            operations.push(Operation {
                name,
                method_name: self.name().to_string(),
                http_method: op.value.method,
                pattern: op.value.pattern.clone(),
                request,
                success: response.clone(),
                tags: tags.clone(),
                description: self.description.clone(),
            });
        }

        Ok(MethodResolution { operations, notices })
    }

    fn collect_ops<'d>(&self, directives: &'d [Directive]) -> Result<Vec<Located<'d, OpDirective>>, ResolveError> {
        let mut ops: Vec<Located<OpDirective>> = Vec::new();
        for d in directives.iter().filter(|d| d.keyword == Keyword::Op) {
            let op = parse_op(&d.args).at(self.name(), &d.raw)?;
            if ops
                .iter()
                .any(|o| o.value.method == op.method && o.value.pattern == op.pattern)
            {
                return Err(self.fail(
                    &d.raw,
                    DirectiveError::Conflict(format!(
                        "duplicate operation `{} {}`",
                        op.method, op.pattern
                    )),
                ));
            }
            ops.push(Located { value: op, raw: &d.raw });
        }
        if ops.is_empty() {
            return Err(self.fail(
                "",
                DirectiveError::Policy(
                    "HTTP directives require at least one `//kun:op` directive".into(),
                ),
            ));
        }
        Ok(ops)
    }

    /// Parse a directive that may appear at most once.
    fn single<'d, T>(
        &self,
        directives: &'d [Directive],
        keyword: Keyword,
        parse: fn(&str) -> Result<T, DirectiveError>,
    ) -> Result<Option<Located<'d, T>>, ResolveError> {
        let mut found = None;
        for d in directives.iter().filter(|d| d.keyword == keyword) {
            if found.is_some() {
                return Err(self.fail(
                    &d.raw,
                    DirectiveError::Conflict(format!("duplicate `{}` directive", keyword.as_str())),
                ));
            }
            let value = parse(&d.args).at(self.name(), &d.raw)?;
            found = Some(Located { value, raw: &d.raw });
        }
        Ok(found)
    }

    fn tags(&self, directives: &[Directive]) -> Result<Vec<String>, ResolveError> {
        let Some(oas) = self.single(directives, Keyword::Oas, parse_oas)? else {
            return Ok(Vec::new());
        };
        let misplaced = [
            ("title", oas.value.title.is_some()),
            ("version", oas.value.version.is_some()),
            ("basePath", oas.value.base_path.is_some()),
        ];
        if let Some((key, _)) = misplaced.iter().find(|(_, set)| *set) {
            return Err(self.fail(
                oas.raw,
                DirectiveError::Syntax(format!("`{}` can only be set on the interface", key)),
            ));
        }
        Ok(oas.value.tags.unwrap_or_default())
    }

    fn collect_params<'d>(&self, directives: &'d [Directive]) -> Result<Vec<Located<'d, ParamSegment>>, ResolveError> {
        let mut claimed: HashSet<String> = HashSet::new();
        let mut segments = Vec::new();
        for d in directives.iter().filter(|d| d.keyword == Keyword::Param) {
            for segment in parse_param(&d.args).at(self.name(), &d.raw)? {
                if segment.argument != BLANK {
                    if self.method.arg(&segment.argument).is_none() {
                        return Err(self.fail(
                            &d.raw,
                            DirectiveError::Reference(format!(
                                "argument `{}` not declared in method",
                                segment.argument
                            )),
                        ));
                    }
                    if !claimed.insert(segment.argument.clone()) {
                        return Err(self.fail(
                            &d.raw,
                            DirectiveError::Conflict(format!(
                                "argument `{}` is bound by more than one param directive",
                                segment.argument
                            )),
                        ));
                    }
                }
                segments.push(Located { value: segment, raw: &d.raw });
            }
        }
        Ok(segments)
    }

    fn check_body_field(
        &self,
        field: &str,
        raw: &str,
        ops: &[Located<OpDirective>],
        segments: &[Located<ParamSegment>],
    ) -> Result<(), ResolveError> {
        if self.method.arg(field).is_none() {
            return Err(self.fail(
                raw,
                DirectiveError::Reference(format!("body argument `{}` not declared in method", field)),
            ));
        }
        if segments.iter().any(|s| s.value.argument == field) {
            return Err(self.fail(
                raw,
                DirectiveError::Conflict(format!(
                    "argument `{}` is the request body and also bound by a param directive",
                    field
                )),
            ));
        }
        if let Some(op) = ops.iter().find(|op| !op.value.method.has_body()) {
            return Err(self.fail(
                raw,
                DirectiveError::Policy(format!(
                    "{} {} cannot carry a request body",
                    op.value.method, op.value.pattern
                )),
            ));
        }
        Ok(())
    }

    /// Bindings shared by every operation, inferred with a body default.
    fn template<'d>(
        &self,
        segments: &[Located<'d, ParamSegment>],
        body: Option<&Located<'d, BodyDirective>>,
        union: &[String],
    ) -> Result<Template<'d>, ResolveError> {
        let inferencer = Inferencer {
            naming: self.options.naming,
            default_location: Location::Body,
            path_vars: union.to_vec(),
        };
        let body_field = match body.map(|b| &b.value) {
            Some(BodyDirective::Field(f)) => Some(f.as_str()),
            _ => None,
        };
        let by_name: HashMap<&str, &Located<ParamSegment>> = segments
            .iter()
            .filter(|s| s.value.argument != BLANK)
            .map(|s| (s.value.argument.as_str(), s))
            .collect();

        let mut template = Template {
            bindings: Vec::new(),
            path_params: Vec::new(),
        };
        for arg in &self.method.args {
            let (binding, raw) = if body_field == Some(arg.name.as_str()) {
                let raw = body.map(|b| b.raw).unwrap_or_default();
                (Some(inferencer.whole_body(arg).at(self.name(), raw)?), raw)
            } else if let Some(segment) = by_name.get(arg.name.as_str()) {
                let binding = inferencer
                    .explicit(arg, &segment.value.groups)
                    .at(self.name(), segment.raw)?;
                (Some(binding), segment.raw)
            } else {
                (inferencer.infer(arg).at(self.name(), "")?, "")
            };
            if let Some(binding) = binding {
                template.push(binding, raw);
            }
        }

        for segment in segments.iter().filter(|s| s.value.argument == BLANK) {
            let binding = inferencer.blank(&segment.value.groups).at(self.name(), segment.raw)?;
            template.push(binding, segment.raw);
        }
        Ok(template)
    }

    fn request(
        &self,
        template: &[DraftBinding],
        op: &OpDirective,
        raw: &str,
        body: Option<&Located<BodyDirective>>,
    ) -> Result<Request, ResolveError> {
        let mut bindings = template.to_vec();

        let request_body = match body.map(|b| &b.value) {
            Some(BodyDirective::NoBody) => RequestBody::None,
            Some(BodyDirective::Field(f)) => RequestBody::Field(f.clone()),
            _ if op.method.has_body() => RequestBody::Synthesized,
            _ => RequestBody::None,
        };
        if request_body != RequestBody::Synthesized {
            reinfer_body_as_query(&mut bindings).at(self.name(), raw)?;
        }
        prune_path(&mut bindings, &op.vars);

        if let Some(Located {
            value: BodyDirective::Manipulations(manipulations),
            raw: body_raw,
        }) = body
        {
            self.manipulate(&mut bindings, manipulations, &request_body, op, body_raw)?;
        }
        check_duplicates(&bindings).at(self.name(), raw)?;

        Ok(Request {
            media_type: MEDIA_TYPE_JSON.to_string(),
            body: request_body,
            bindings: bindings.into_iter().map(DraftBinding::finish).collect(),
        })
    }

    fn manipulate(
        &self,
        bindings: &mut [DraftBinding],
        manipulations: &[BodyManipulation],
        request_body: &RequestBody,
        op: &OpDirective,
        raw: &str,
    ) -> Result<(), ResolveError> {
        if *request_body != RequestBody::Synthesized {
            return Err(self.fail(
                raw,
                DirectiveError::Conflict(format!(
                    "{} {} has no synthesized body to manipulate",
                    op.method, op.pattern
                )),
            ));
        }
        for manipulation in manipulations {
            manipulate_body(bindings, manipulation).at(self.name(), raw)?;
        }
        Ok(())
    }

    fn success_response(
        &self,
        success: Option<&Located<SuccessDirective>>,
        notices: &mut Vec<Notice>,
    ) -> Result<Response, ResolveError> {
        let raw = success.map(|s| s.raw).unwrap_or_default();
        let explicit = success.and_then(|s| s.value.status_code);
        let body_field = success.and_then(|s| s.value.body.clone());

        if let Some(field) = &body_field {
            if !self.method.results().any(|r| r.name == *field) {
                return Err(self.fail(
                    raw,
                    DirectiveError::Reference(format!(
                        "success body `{}` is not a return value of the method",
                        field
                    )),
                ));
            }
        }

        let status_code = if self.method.is_void() {
            match explicit {
                None | Some(VOID_STATUS) => VOID_STATUS,
                Some(DEFAULT_STATUS) if self.options.void_success == VoidSuccess::Rewrite => {
                    let message = format!(
                        "status {} rewritten to {}: the method returns no values",
                        DEFAULT_STATUS, VOID_STATUS
                    );
                    info!("method {}: {}", self.name(), message);
                    notices.push(Notice {
                        method: self.name().to_string(),
                        message,
                    });
                    VOID_STATUS
                }
                Some(code) => {
                    return Err(self.fail(
                        raw,
                        DirectiveError::Policy(format!(
                            "the method returns no values; success status must be {}, got {}",
                            VOID_STATUS, code
                        )),
                    ))
                }
            }
        } else {
            let code = explicit.unwrap_or(DEFAULT_STATUS);
            if code == VOID_STATUS && body_field.is_some() {
                return Err(self.fail(
                    raw,
                    DirectiveError::Policy(format!("a {} response cannot carry a body", VOID_STATUS)),
                ));
            }
            code
        };

        Ok(Response {
            status_code,
            media_type: MEDIA_TYPE_JSON.to_string(),
            body_field,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kun_ir::{Argument, Field, ReturnValue, Shape};

    fn method(name: &str, doc: &[&str], args: Vec<Argument>, returns: Vec<ReturnValue>) -> MethodSignature {
        MethodSignature {
            name: name.into(),
            args,
            returns,
            doc: doc.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn ctx() -> Argument {
        Argument::new("ctx", "context.Context", Shape::Context)
    }

    fn resolve(m: &MethodSignature) -> Result<MethodResolution, ResolveError> {
        resolve_method(m, &AliasTable::new(), &ResolveOptions::default())
    }

    #[test]
    fn skips_methods_without_http_directives() {
        let plain = method("Ping", &["Ping checks liveness."], vec![ctx()], vec![ReturnValue::error()]);
        assert!(resolve(&plain).unwrap().operations.is_empty());

        let grpc = method("Stream", &["//kun:grpc stream"], vec![ctx()], vec![ReturnValue::error()]);
        assert!(resolve(&grpc).unwrap().operations.is_empty());
    }

    #[test]
    fn get_with_path_and_query() {
        let m = method(
            "GetMessage",
            &["GetMessage fetches one message.", "//kun:op GET /messages/{messageID}"],
            vec![ctx(), Argument::scalar("messageID", "string"), Argument::scalar("revision", "int")],
            vec![ReturnValue::new("text", "string", Shape::Scalar), ReturnValue::error()],
        );
        let ops = resolve(&m).unwrap().operations;
        assert_eq!(ops.len(), 1);
        let op = &ops[0];
        assert_eq!(op.name, "GetMessage");
        assert_eq!(op.description, "GetMessage fetches one message.");
        assert_eq!(op.request.body, RequestBody::None);
        assert_eq!(op.success.status_code, 200);

        let id = &op.request.binding("messageID").unwrap().params[0];
        assert_eq!(id.location, Location::Path);
        let rev = &op.request.binding("revision").unwrap().params[0];
        assert_eq!(rev.location, Location::Query);
    }

    #[test]
    fn post_synthesizes_body() {
        let m = method(
            "CreateUser",
            &["//kun:op POST /users", "//kun:success statusCode=201 body=user"],
            vec![ctx(), Argument::scalar("name", "string"), Argument::scalar("age", "int")],
            vec![ReturnValue::new("user", "User", Shape::Composite { fields: vec![] }), ReturnValue::error()],
        );
        let op = &resolve(&m).unwrap().operations[0];
        assert_eq!(op.request.body, RequestBody::Synthesized);
        assert_eq!(op.request.params_in(Location::Body).len(), 2);
        assert_eq!(op.success.status_code, 201);
        assert_eq!(op.success.body_field.as_deref(), Some("user"));
    }

    #[test]
    fn body_dash_moves_params_to_query() {
        let m = method(
            "Touch",
            &["//kun:op POST /touch", "//kun:body -"],
            vec![Argument::scalar("key", "string")],
            vec![ReturnValue::error()],
        );
        let op = &resolve(&m).unwrap().operations[0];
        assert_eq!(op.request.body, RequestBody::None);
        assert_eq!(op.request.binding("key").unwrap().params[0].location, Location::Query);
        assert_eq!(op.success.status_code, 204);
    }

    #[test]
    fn whole_body_field() {
        let user = Argument::new("user", "User", Shape::Composite { fields: vec![Field::new("Name", "string", Shape::Scalar)] });
        let m = method(
            "UpdateUser",
            &["//kun:op PUT /users/{id}", "//kun:body user"],
            vec![Argument::scalar("id", "string"), user, Argument::scalar("dryRun", "bool")],
            vec![ReturnValue::error()],
        );
        let op = &resolve(&m).unwrap().operations[0];
        assert_eq!(op.request.body, RequestBody::Field("user".into()));
        assert_eq!(op.request.binding("user").unwrap().params[0].location, Location::Body);
        assert_eq!(op.request.binding("dryRun").unwrap().params[0].location, Location::Query);

        let get = method(
            "GetUser",
            &["//kun:op GET /users", "//kun:body user"],
            vec![Argument::scalar("user", "string")],
            vec![ReturnValue::error()],
        );
        assert!(matches!(resolve(&get).unwrap_err().error, DirectiveError::Policy(_)));
    }

    #[test]
    fn multiple_ops_are_numbered() {
        let m = method(
            "GetMessage",
            &[
                "//kun:op GET /messages/{messageID}",
                "//kun:op GET /users/{userID}/messages/{messageID}",
            ],
            vec![Argument::scalar("messageID", "string"), Argument::scalar("userID", "string")],
            vec![ReturnValue::new("text", "string", Shape::Scalar)],
        );
        let ops = resolve(&m).unwrap().operations;
        assert_eq!(ops.iter().map(|o| o.name.as_str()).collect::<Vec<_>>(), vec!["GetMessage1", "GetMessage2"]);
        assert!(ops[0].request.binding("userID").is_none());
        assert_eq!(ops[1].request.binding("userID").unwrap().params[0].location, Location::Path);
    }

    #[test]
    fn explicit_path_param_uses_pattern_name() {
        let m = method(
            "GetUser",
            &["//kun:op GET /users/{userID}", "//kun:param userID in=path"],
            vec![ctx(), Argument::scalar("userID", "string")],
            vec![ReturnValue::new("name", "string", Shape::Scalar)],
        );
        let op = &resolve(&m).unwrap().operations[0];
        let p = &op.request.binding("userID").unwrap().params[0];
        assert_eq!(p.location, Location::Path);
        assert_eq!(p.name, "userID");
        assert!(p.required);
    }

    #[test]
    fn undeclared_path_param_cites_its_own_directive() {
        let m = method(
            "GetUser",
            &[
                "//kun:op GET /users/{userID}",
                "//kun:param userID in=path",
                "//kun:param orgID in=path",
            ],
            vec![Argument::scalar("userID", "string"), Argument::scalar("orgID", "string")],
            vec![ReturnValue::new("name", "string", Shape::Scalar)],
        );
        let err = resolve(&m).unwrap_err();
        assert!(matches!(err.error, DirectiveError::Reference(_)));
        assert_eq!(err.directive, "//kun:param orgID in=path");
        assert!(err.to_string().contains("`org_id`"));
    }

    #[test]
    fn errors_carry_directive_text() {
        let m = method(
            "Delete",
            &["//kun:op DELETE /items/{id}", "//kun:param nope in=query"],
            vec![Argument::scalar("id", "string")],
            vec![ReturnValue::error()],
        );
        let err = resolve(&m).unwrap_err();
        assert_eq!(err.method, "Delete");
        assert_eq!(err.directive, "//kun:param nope in=query");
        assert_eq!(err.error_code(), "REFERENCE_ERROR");
    }

    #[test]
    fn http_directives_need_an_op() {
        let m = method("Orphan", &["//kun:success statusCode=204"], vec![], vec![]);
        assert!(matches!(resolve(&m).unwrap_err().error, DirectiveError::Policy(_)));
    }

    #[test]
    fn duplicate_directives_conflict() {
        let ops = method("A", &["//kun:op GET /a", "//kun:op GET /a"], vec![], vec![]);
        assert!(matches!(resolve(&ops).unwrap_err().error, DirectiveError::Conflict(_)));

        let success = method(
            "B",
            &["//kun:op GET /b", "//kun:success statusCode=204", "//kun:success statusCode=204"],
            vec![],
            vec![],
        );
        assert!(matches!(resolve(&success).unwrap_err().error, DirectiveError::Conflict(_)));
    }

    #[test]
    fn void_status_policy() {
        let explicit_200 = method("Ack", &["//kun:op POST /ack", "//kun:success statusCode=200"], vec![], vec![ReturnValue::error()]);
        assert!(matches!(resolve(&explicit_200).unwrap_err().error, DirectiveError::Policy(_)));

        let rewrite = ResolveOptions {
            void_success: VoidSuccess::Rewrite,
            ..ResolveOptions::default()
        };
        let resolved = resolve_method(&explicit_200, &AliasTable::new(), &rewrite).unwrap();
        assert_eq!(resolved.operations[0].success.status_code, 204);
        assert_eq!(resolved.notices.len(), 1);
        assert_eq!(resolved.notices[0].method, "Ack");
    }

    #[test]
    fn method_level_alias_is_rejected() {
        let m = method("A", &["//kun:op GET /a", "//kun:alias x=`y`"], vec![], vec![]);
        assert!(matches!(resolve(&m).unwrap_err().error, DirectiveError::Syntax(_)));
    }

    #[test]
    fn method_oas_tags() {
        let m = method("A", &["//kun:op GET /a", "//kun:oas tags=alpha,beta"], vec![], vec![]);
        assert_eq!(resolve(&m).unwrap().operations[0].tags, vec!["alpha", "beta"]);

        let titled = method("B", &["//kun:op GET /b", "//kun:oas title=x"], vec![], vec![]);
        assert!(resolve(&titled).is_err());
    }

    #[test]
    fn body_manipulation_needs_synthesized_body() {
        let m = method(
            "Rename",
            &["//kun:op POST /rename", "//kun:body name name=fullName descr='new name'"],
            vec![Argument::scalar("name", "string")],
            vec![ReturnValue::error()],
        );
        let op = &resolve(&m).unwrap().operations[0];
        let p = &op.request.binding("name").unwrap().params[0];
        assert_eq!(p.name, "fullName");
        assert_eq!(p.description, "new name");

        let get = method(
            "Find",
            &["//kun:op GET /find", "//kun:body name name=fullName"],
            vec![Argument::scalar("name", "string")],
            vec![],
        );
        assert!(matches!(resolve(&get).unwrap_err().error, DirectiveError::Conflict(_)));
    }
}
