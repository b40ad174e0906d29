use kun_ir::{Argument, Field, Interface, Location, MethodSignature, RequestBody, ReturnValue, Shape};
use kun_parser::{resolve_interface, DirectiveError, ResolveOptions, VoidSuccess};

fn lines(doc: &[&str]) -> Vec<String> {
    doc.iter().map(|s| s.to_string()).collect()
}

fn ctx() -> Argument {
    Argument::new("ctx", "context.Context", Shape::Context)
}

fn method(name: &str, doc: &[&str], args: Vec<Argument>, returns: Vec<ReturnValue>) -> MethodSignature {
    MethodSignature {
        name: name.into(),
        args,
        returns,
        doc: lines(doc),
    }
}

fn interface(doc: &[&str], methods: Vec<MethodSignature>) -> Interface {
    Interface {
        name: "Messaging".into(),
        doc: lines(doc),
        methods,
    }
}

fn messaging() -> Interface {
    interface(
        &[
            "Messaging stores and delivers messages.",
            "//kun:oas title='Messaging API' version=1.0.0 basePath=/api",
            "//kun:alias auth=`__ in=header name=Authorization required=true`",
        ],
        vec![
            method(
                "GetMessage",
                &[
                    "GetMessage returns one message.",
                    "//kun:op GET /messages/{messageID}",
                    "//kun:op GET /users/{userID}/messages/{messageID}",
                    "//kun:param $auth",
                ],
                vec![ctx(), Argument::scalar("userID", "string"), Argument::scalar("messageID", "string")],
                vec![ReturnValue::new("text", "string", Shape::Scalar), ReturnValue::error()],
            ),
            method(
                "SendMessage",
                &[
                    "//kun:op POST /messages",
                    "//kun:param ip in=header name=X-Forwarded-For, in=request name=RemoteAddr",
                    "//kun:success statusCode=201 body=id",
                ],
                vec![
                    ctx(),
                    Argument::scalar("ip", "string"),
                    Argument::scalar("text", "string"),
                    Argument::new("tags", "[]string", Shape::ScalarSeq),
                ],
                vec![ReturnValue::new("id", "string", Shape::Scalar), ReturnValue::error()],
            ),
            method(
                "DeleteMessage",
                &["//kun:op DELETE /messages/{messageID}"],
                vec![ctx(), Argument::scalar("messageID", "string")],
                vec![ReturnValue::error()],
            ),
            method(
                "SearchMessages",
                &["//kun:op GET /messages"],
                vec![
                    ctx(),
                    Argument::new(
                        "query",
                        "SearchQuery",
                        Shape::Composite {
                            fields: vec![
                                Field::new("Text", "string", Shape::Scalar),
                                Field::new("PageSize", "int", Shape::Scalar).with_meta("name=limit"),
                                Field::new("Trace", "string", Shape::Scalar).with_meta("in=header name=X-Trace"),
                                Field::new("Cursor", "string", Shape::Scalar).with_meta("-"),
                            ],
                        },
                    ),
                ],
                vec![
                    ReturnValue::new("messages", "[]Message", Shape::Sequence),
                    ReturnValue::error(),
                ],
            ),
        ],
    )
}

#[test]
fn resolves_sample_interface() {
    let res = resolve_interface(&messaging(), &ResolveOptions::default()).unwrap();
    assert!(res.is_ok(), "{:?}", res.errors);
    assert!(res.notices.is_empty());

    let spec = res.spec;
    assert_eq!(spec.meta.title, "Messaging API");
    assert_eq!(spec.meta.base_path, "/api");
    assert_eq!(spec.meta.description, "Messaging stores and delivers messages.");

    let names: Vec<_> = spec.operations.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["GetMessage1", "GetMessage2", "SendMessage", "DeleteMessage", "SearchMessages"]
    );
    assert_eq!(spec.operations_for("GetMessage").len(), 2);
}

#[test]
fn resolution_is_idempotent() {
    let iface = messaging();
    let opts = ResolveOptions::default();
    let a = serde_json::to_string(&resolve_interface(&iface, &opts).unwrap().spec).unwrap();
    let b = serde_json::to_string(&resolve_interface(&iface, &opts).unwrap().spec).unwrap();
    assert_eq!(a, b);
}

#[test]
fn every_argument_is_bound_once() {
    let iface = messaging();
    let spec = resolve_interface(&iface, &ResolveOptions::default()).unwrap().spec;

    for op in &spec.operations {
        let method = iface.methods.iter().find(|m| m.name == op.method_name).unwrap();
        for arg in method.args.iter().filter(|a| !a.shape.is_excluded()) {
            let count = op
                .request
                .bindings
                .iter()
                .filter(|b| !b.blank && b.argument.name == arg.name)
                .count();
            // Path-only arguments of sibling patterns are pruned.
            let var = format!("{{{}}}", arg.name);
            let pruned = !op.pattern.contains(&var)
                && spec
                    .operations_for(&op.method_name)
                    .iter()
                    .any(|o| o.pattern.contains(&var));
            let expected = if pruned { 0 } else { 1 };
            assert_eq!(count, expected, "{}: argument {}", op.name, arg.name);
        }
        assert!(op.request.binding("ctx").is_none());
    }
}

#[test]
fn path_union_is_pruned_per_operation() {
    let spec = resolve_interface(&messaging(), &ResolveOptions::default()).unwrap().spec;
    let first = spec.operation("GetMessage1").unwrap();
    let second = spec.operation("GetMessage2").unwrap();

    let path_names = |op: &kun_ir::Operation| -> Vec<String> {
        op.request
            .params_in(Location::Path)
            .into_iter()
            .map(|p| p.name.clone())
            .collect()
    };
    assert_eq!(path_names(first), vec!["messageID"]);
    assert_eq!(path_names(second), vec!["userID", "messageID"]);

    let non_path = |op: &kun_ir::Operation| -> Vec<kun_ir::Parameter> {
        op.request
            .bindings
            .iter()
            .flat_map(|b| b.params.iter())
            .filter(|p| p.location != Location::Path)
            .cloned()
            .collect()
    };
    assert_eq!(non_path(first), non_path(second));
    assert!(first.request.params_in(Location::Query).is_empty());
    assert!(first.request.binding("userID").is_none());
    assert_eq!(first.success, second.success);
}

#[test]
fn explicit_path_param_under_default_naming() {
    let iface = interface(
        &[],
        vec![method(
            "GetUser",
            &["//kun:op GET /users/{userID}", "//kun:param userID in=path"],
            vec![ctx(), Argument::scalar("userID", "string")],
            vec![ReturnValue::new("name", "string", Shape::Scalar), ReturnValue::error()],
        )],
    );
    let res = resolve_interface(&iface, &ResolveOptions::default()).unwrap();
    assert!(res.is_ok(), "{:?}", res.errors);

    let op = res.spec.operation("GetUser").unwrap();
    let user = op.request.binding("userID").unwrap();
    assert!(user.manual);
    assert_eq!(user.params[0].location, Location::Path);
    assert_eq!(user.params[0].name, "userID");
}

#[test]
fn explicit_path_params_are_pruned() {
    let iface = interface(
        &[],
        vec![method(
            "GetMessage",
            &[
                "//kun:op GET /messages/{messageID}",
                "//kun:op GET /users/{userID}/messages/{messageID}",
                "//kun:param userID in=path; messageID in=path",
                "//kun:param lang in=header name=Accept-Language",
            ],
            vec![
                Argument::scalar("userID", "string"),
                Argument::scalar("messageID", "string"),
                Argument::scalar("lang", "string"),
            ],
            vec![ReturnValue::new("text", "string", Shape::Scalar)],
        )],
    );
    let spec = resolve_interface(&iface, &ResolveOptions::default()).unwrap().into_result().unwrap();
    let first = spec.operation("GetMessage1").unwrap();
    let second = spec.operation("GetMessage2").unwrap();

    assert!(first.request.binding("userID").is_none());
    assert_eq!(first.request.params_in(Location::Path).len(), 1);
    assert_eq!(second.request.params_in(Location::Path).len(), 2);

    let non_path = |op: &kun_ir::Operation| -> Vec<kun_ir::Parameter> {
        op.request
            .bindings
            .iter()
            .flat_map(|b| b.params.iter())
            .filter(|p| p.location != Location::Path)
            .cloned()
            .collect()
    };
    assert_eq!(non_path(first), non_path(second));
}

#[test]
fn explicit_path_param_outside_every_pattern_fails() {
    let iface = interface(
        &[],
        vec![method(
            "Get",
            &["//kun:op GET /items", "//kun:param id in=path"],
            vec![Argument::scalar("id", "string")],
            vec![ReturnValue::new("item", "Item", Shape::Composite { fields: vec![] })],
        )],
    );
    let res = resolve_interface(&iface, &ResolveOptions::default()).unwrap();
    assert_eq!(res.errors[0].error_code(), "REFERENCE_ERROR");
}

#[test]
fn void_success_defaults_to_204() {
    let spec = resolve_interface(&messaging(), &ResolveOptions::default()).unwrap().spec;
    let delete = spec.operation("DeleteMessage").unwrap();
    assert_eq!(delete.success.status_code, 204);
    assert_eq!(delete.success.body_field, None);
    assert_eq!(spec.operation("SearchMessages").unwrap().success.status_code, 200);
}

fn void_with(success: &str) -> Interface {
    interface(
        &[],
        vec![method(
            "Ack",
            &["//kun:op POST /ack", success],
            vec![ctx()],
            vec![ReturnValue::error()],
        )],
    )
}

#[test]
fn void_success_explicit_200_is_an_error() {
    let res = resolve_interface(&void_with("//kun:success statusCode=200"), &ResolveOptions::default()).unwrap();
    assert_eq!(res.errors.len(), 1);
    assert!(matches!(res.errors[0].error, DirectiveError::Policy(_)));
    assert!(res.spec.operations.is_empty());

    let ok = resolve_interface(&void_with("//kun:success statusCode=204"), &ResolveOptions::default()).unwrap();
    assert!(ok.is_ok());
    assert_eq!(ok.spec.operations[0].success.status_code, 204);
}

#[test]
fn void_success_rewrite_records_notice() {
    let opts = ResolveOptions {
        void_success: VoidSuccess::Rewrite,
        ..ResolveOptions::default()
    };
    let res = resolve_interface(&void_with("//kun:success statusCode=200"), &opts).unwrap();
    assert!(res.is_ok());
    assert_eq!(res.spec.operations[0].success.status_code, 204);
    assert_eq!(res.notices.len(), 1);

    let still_bad = resolve_interface(&void_with("//kun:success statusCode=201"), &opts).unwrap();
    assert_eq!(still_bad.errors.len(), 1);
}

#[test]
fn scalar_aggregation_resolves() {
    let spec = resolve_interface(&messaging(), &ResolveOptions::default()).unwrap().spec;
    let send = spec.operation("SendMessage").unwrap();
    let ip = send.request.binding("ip").unwrap();
    assert!(ip.is_aggregate());
    assert!(ip.manual);
    assert_eq!(ip.params[0].location, Location::Header);
    assert_eq!(ip.params[0].name, "X-Forwarded-For");
    assert_eq!(ip.params[1].location, Location::Request);
    assert_eq!(ip.params[1].name, "RemoteAddr");

    assert_eq!(send.request.body, RequestBody::Synthesized);
    let body: Vec<_> = send.request.params_in(Location::Body).into_iter().map(|p| p.name.as_str()).collect();
    assert_eq!(body, vec!["text", "tags"]);
    assert_eq!(send.success.status_code, 201);
    assert_eq!(send.success.body_field.as_deref(), Some("id"));
}

#[test]
fn composite_aggregation_fails() {
    let iface = interface(
        &[],
        vec![method(
            "Send",
            &[
                "//kun:op POST /send",
                "//kun:param req in=header name=X-Forwarded-For, in=request name=RemoteAddr",
            ],
            vec![Argument::new(
                "req",
                "SendRequest",
                Shape::Composite {
                    fields: vec![Field::new("IP", "string", Shape::Scalar)],
                },
            )],
            vec![ReturnValue::error()],
        )],
    );
    let res = resolve_interface(&iface, &ResolveOptions::default()).unwrap();
    assert_eq!(res.errors.len(), 1);
    assert_eq!(res.errors[0].error_code(), "UNSUPPORTED_SHAPE");
}

#[test]
fn composite_fields_follow_metadata() {
    let spec = resolve_interface(&messaging(), &ResolveOptions::default()).unwrap().spec;
    let search = spec.operation("SearchMessages").unwrap();
    assert_eq!(search.request.body, RequestBody::None);

    let query = search.request.binding("query").unwrap();
    let params: Vec<_> = query
        .params
        .iter()
        .map(|p| (p.location, p.name.as_str(), p.field.as_deref()))
        .collect();
    assert_eq!(
        params,
        vec![
            (Location::Query, "text", Some("Text")),
            (Location::Query, "limit", Some("PageSize")),
            (Location::Header, "X-Trace", Some("Trace")),
        ]
    );
}

fn alias_case(iface_doc: &[&str], param: &str) -> Interface {
    interface(
        iface_doc,
        vec![method(
            "Whoami",
            &["//kun:op GET /whoami", param],
            vec![ctx(), Argument::scalar("id", "string")],
            vec![ReturnValue::new("name", "string", Shape::Scalar)],
        )],
    )
}

#[test]
fn alias_matches_expanded_text() {
    let aliased = alias_case(
        &["//kun:alias opID=`id in=header name=Authorization required=true`"],
        "//kun:param $opID",
    );
    let direct = alias_case(&[], "//kun:param id in=header name=Authorization required=true");

    let opts = ResolveOptions::default();
    let a = resolve_interface(&aliased, &opts).unwrap().into_result().unwrap();
    let b = resolve_interface(&direct, &opts).unwrap().into_result().unwrap();
    assert_eq!(a.operations, b.operations);

    let p = &a.operations[0].request.binding("id").unwrap().params[0];
    assert_eq!(p.location, Location::Header);
    assert!(p.required);
}

#[test]
fn undefined_alias_is_named() {
    let res = resolve_interface(&alias_case(&[], "//kun:param $opID"), &ResolveOptions::default()).unwrap();
    assert_eq!(res.errors.len(), 1);
    assert_eq!(res.errors[0].error_code(), "REFERENCE_ERROR");
    assert!(res.errors[0].to_string().contains("opID"));
}

#[test]
fn unmatched_param_names_method_and_argument() {
    let res = resolve_interface(&alias_case(&[], "//kun:param userID in=query"), &ResolveOptions::default()).unwrap();
    let err = &res.errors[0];
    assert_eq!(err.method, "Whoami");
    assert!(matches!(err.error, DirectiveError::Reference(_)));
    let msg = err.to_string();
    assert!(msg.contains("Whoami"));
    assert!(msg.contains("userID"));
}

#[test]
fn continuation_lines_join() {
    let iface = alias_case(&[], "//kun:param id in=header \\");
    let mut iface = iface;
    iface.methods[0].doc.push("// name=X-User".into());
    let spec = resolve_interface(&iface, &ResolveOptions::default()).unwrap().into_result().unwrap();
    let p = &spec.operations[0].request.binding("id").unwrap().params[0];
    assert_eq!(p.name, "X-User");
}

#[test]
fn camel_case_naming() {
    let opts = ResolveOptions {
        naming: kun_parser::NamingConvention::LowerCamelCase,
        ..ResolveOptions::default()
    };
    let iface = interface(
        &[],
        vec![method(
            "List",
            &["//kun:op GET /items"],
            vec![Argument::scalar("page_size", "int")],
            vec![ReturnValue::new("items", "[]Item", Shape::Sequence)],
        )],
    );
    let spec = resolve_interface(&iface, &opts).unwrap().into_result().unwrap();
    assert_eq!(spec.operations[0].request.params_in(Location::Query)[0].name, "pageSize");
}
