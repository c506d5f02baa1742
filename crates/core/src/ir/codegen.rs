//! Code generation from API IR to TypeScript AST.
//!
//! This module groups translated types and client classes into namespaces
//! and builds the fetch-based method bodies of every client stub.
//!
//! The generated AST can then be emitted to strings via the `Emit` trait.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use super::api::{ActionIR, ApiIR, ClientIR, ParamIR, ResponseShape, UrlPart};
use super::types::{
    BinOp, ObjProp, TemplatePart, TsClass, TsExpr, TsImport, TsLiteral, TsMethod, TsModule,
    TsNamespace, TsParam, TsStmt, TsType,
};
use super::utils::{client_namespace, make_string_record};
use crate::descriptor::{ResponseContent, TypeId};
use crate::error::{GenError, Result};
use crate::options::GenOptions;

const HEADER: [&str; 2] = [
    "// Generated by clientgen. Do not edit by hand.",
    "/* eslint-disable */",
];

/// Runtime helpers shared by every client class.
const SUPPORT_CODE: &str = r#"export class ApiError extends Error {
  status: number;
  statusText: string;
  body: unknown;

  constructor(status: number, statusText: string, body: unknown) {
    super(`HTTP ${status}: ${statusText}`);
    this.name = "ApiError";
    this.status = status;
    this.statusText = statusText;
    this.body = body;
  }
}

function notifyStatus(res: Response, statusCode?: Record<number, (res: Response) => void>): void {
  statusCode?.[res.status]?.(res);
}

async function ensureSuccess(
  res: Response,
  onError?: (err: ApiError) => void,
  statusCode?: Record<number, (res: Response) => void>,
): Promise<void> {
  notifyStatus(res, statusCode);
  if (res.ok) {
    return;
  }
  const text = await res.text();
  let body: unknown = text;
  try {
    body = JSON.parse(text);
  } catch {
    // Plain-text error body
  }
  const err = new ApiError(res.status, res.statusText, body);
  onError?.(err);
  throw err;
}"#;

/// Generate a complete TypeScript module from API IR.
///
/// Fails when two backend identities map to the same declaration name in
/// the same client namespace.
pub fn codegen_module(api: &ApiIR, options: &GenOptions) -> Result<TsModule> {
    let mut namespaces: Vec<TsNamespace> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut owners: HashMap<(usize, String), String> = HashMap::new();
    let mut place = |backend: &TypeId, name: &str, owner: String| -> Result<usize> {
        let namespace = client_namespace(&backend.namespace, &options.namespace_suffix);
        let i = *index.entry(namespace.clone()).or_insert_with(|| {
            namespaces.push(TsNamespace {
                name: namespace.clone(),
                types: Vec::new(),
                classes: Vec::new(),
            });
            namespaces.len() - 1
        });
        match owners.entry((i, name.to_string())) {
            Entry::Occupied(first) => Err(GenError::NameCollision {
                name: format!("{namespace}.{name}"),
                first: first.get().clone(),
                second: owner,
            }),
            Entry::Vacant(slot) => {
                slot.insert(owner);
                Ok(i)
            }
        }
    };

    let mut placed_types = Vec::with_capacity(api.types.len());
    for ty in &api.types {
        let i = place(&ty.id, &ty.def.name, format!("type '{}'", ty.id))?;
        placed_types.push((i, ty.def.clone()));
    }
    let mut placed_classes = Vec::with_capacity(api.clients.len());
    for client in &api.clients {
        let owner = format!("controller '{}'", client.controller);
        let i = place(&client.controller, &client.name, owner)?;
        placed_classes.push((i, codegen_client(client, options)));
    }
    for (i, def) in placed_types {
        namespaces[i].types.push(def);
    }
    for (i, class) in placed_classes {
        namespaces[i].classes.push(class);
    }

    let (imports, support) = if api.clients.is_empty() {
        (Vec::new(), Vec::new())
    } else if let Some(module) = &options.runtime_module {
        (vec![codegen_runtime_import(api, module)], Vec::new())
    } else {
        (Vec::new(), vec![TsStmt::Raw(SUPPORT_CODE.into())])
    };

    Ok(TsModule {
        header: HEADER.iter().map(|line| (*line).to_string()).collect(),
        imports,
        support,
        namespaces,
    })
}

/// Import of the helpers the stubs call, from a shared runtime module.
fn codegen_runtime_import(api: &ApiIR, module: &str) -> TsImport {
    let shapes = || api.clients.iter().flat_map(|c| &c.actions).map(|a| &a.response);
    let mut items = vec!["ApiError".to_string()];
    if shapes().any(|s| *s != ResponseShape::Response) {
        items.push("ensureSuccess".into());
    }
    if shapes().any(|s| *s == ResponseShape::Response) {
        items.push("notifyStatus".into());
    }
    TsImport {
        items,
        from: module.to_string(),
    }
}

fn status_table_type() -> TsType {
    TsType::Record {
        key: Box::new(TsType::number()),
        value: Box::new(TsType::Function {
            params: vec![TsParam::new("res", TsType::Ref("Response".into()))],
            ret: Box::new(TsType::void()),
        }),
    }
}

/// Client class: shared defaults in the constructor, one method per action.
fn codegen_client(client: &ClientIR, options: &GenOptions) -> TsClass {
    let base_uri = TsParam {
        is_private: true,
        default: Some(TsExpr::string(options.default_base_uri.clone())),
        ..TsParam::new("baseUri", TsType::string())
    };
    let error = TsParam {
        is_private: true,
        ..TsParam::new(
            "error",
            TsType::Function {
                params: vec![TsParam::new("err", TsType::Ref("ApiError".into()))],
                ret: Box::new(TsType::void()),
            },
        )
        .optional()
    };
    let status_code = TsParam {
        is_private: true,
        ..TsParam::new("statusCode", status_table_type()).optional()
    };

    TsClass {
        name: client.name.clone(),
        ctor_params: vec![base_uri, error, status_code],
        methods: client.actions.iter().map(codegen_action).collect(),
    }
}

/// Generate the client method for a single action.
fn codegen_action(action: &ActionIR) -> TsMethod {
    let mut params: Vec<TsParam> = action
        .params
        .iter()
        .map(|p| TsParam::new(p.name.clone(), p.ty.clone()))
        .collect();
    params.push(
        TsParam::new(
            "headersHandler",
            TsType::Function {
                params: vec![],
                ret: Box::new(make_string_record(TsType::string())),
            },
        )
        .optional(),
    );

    let mut body = codegen_url(action);
    body.push(codegen_fetch_call(action));
    body.extend(codegen_response(&action.response));

    TsMethod {
        name: action.method_name.clone(),
        params,
        return_type: TsType::promise(action.response.result_type()),
        body,
        doc: action.doc.clone(),
    }
}

fn this_member(prop: &str) -> TsExpr {
    TsExpr::ident("this").member(prop)
}

/// `${this.baseUri}api/people/${encodeURIComponent(String(id))}`
fn url_template(url: &[UrlPart], params: &[ParamIR], query: Option<&str>) -> TsExpr {
    let mut parts = vec![TemplatePart::Dynamic(this_member("baseUri"))];
    for part in url {
        match part {
            UrlPart::Static(s) => parts.push(TemplatePart::Static(s.clone())),
            UrlPart::Param(name) => {
                let ty = params
                    .iter()
                    .find(|p| &p.name == name)
                    .map(|p| &p.ty);
                let value = wire_value(TsExpr::ident(name.clone()), ty);
                parts.push(TemplatePart::Dynamic(
                    TsExpr::ident("encodeURIComponent").call(vec![value]),
                ));
            }
        }
    }
    if let Some(query) = query {
        parts.push(TemplatePart::Static("?".into()));
        parts.push(TemplatePart::Dynamic(TsExpr::ident(query)));
    }
    TsExpr::Template(parts)
}

fn is_date(ty: &TsType) -> bool {
    match ty {
        TsType::Ref(name) => name == "Date",
        TsType::Union(types) => types.iter().any(is_date),
        _ => false,
    }
}

/// Element type of an array parameter, looking through `| null`.
fn element_type(ty: &TsType) -> Option<&TsType> {
    match ty {
        TsType::Array(inner) => Some(inner.as_ref()),
        TsType::Union(types) => types.iter().find_map(element_type),
        _ => None,
    }
}

/// String form of a value placed in a URL. Dates use ISO-8601.
fn wire_value(value: TsExpr, ty: Option<&TsType>) -> TsExpr {
    if ty.is_some_and(is_date) {
        value.member("toISOString").call(vec![])
    } else {
        TsExpr::ident("String").call(vec![value])
    }
}

fn not_null(name: &str) -> TsExpr {
    TsExpr::BinOp {
        left: Box::new(TsExpr::ident(name)),
        op: BinOp::NotEqual,
        right: Box::new(TsExpr::Literal(TsLiteral::Null)),
    }
}

fn const_decl(name: &str, init: TsExpr) -> TsStmt {
    TsStmt::Const {
        name: name.into(),
        init,
    }
}

/// Statements building `url`, including the query string.
fn codegen_url(action: &ActionIR) -> Vec<TsStmt> {
    let path = url_template(&action.url, &action.params, None);
    let query: Vec<&ParamIR> = action.query_params().collect();
    if query.is_empty() {
        return vec![const_decl("url", path)];
    }

    let mut stmts = vec![const_decl(
        "searchParams",
        TsExpr::New {
            callee: Box::new(TsExpr::ident("URLSearchParams")),
            args: vec![],
        },
    )];
    for param in query {
        let key = TsExpr::string(param.original_name.clone());
        let add = if param.is_array {
            let element = element_type(&param.ty);
            TsExpr::ident(param.name.clone()).member("forEach").call(vec![TsExpr::Arrow {
                params: vec![TsParam::untyped("value")],
                body: Box::new(
                    TsExpr::ident("searchParams")
                        .member("append")
                        .call(vec![key, wire_value(TsExpr::ident("value"), element)]),
                ),
            }])
        } else {
            TsExpr::ident("searchParams").member("set").call(vec![
                key,
                wire_value(TsExpr::ident(param.name.clone()), Some(&param.ty)),
            ])
        };
        stmts.push(TsStmt::If {
            cond: not_null(&param.name),
            then_body: vec![TsStmt::Expr(add)],
        });
    }
    stmts.push(const_decl(
        "queryString",
        TsExpr::ident("searchParams").member("toString").call(vec![]),
    ));
    stmts.push(const_decl(
        "url",
        TsExpr::Ternary {
            cond: Box::new(TsExpr::ident("queryString")),
            then_expr: Box::new(url_template(
                &action.url,
                &action.params,
                Some("queryString"),
            )),
            else_expr: Box::new(path),
        },
    ));
    stmts
}

/// `const res = await fetch(url, { method, headers, body });`
fn codegen_fetch_call(action: &ActionIR) -> TsStmt {
    let body = action.body();

    let mut headers = Vec::new();
    if body.is_some() {
        headers.push(ObjProp::KeyValue(
            "Content-Type".into(),
            TsExpr::string("application/json;charset=UTF-8"),
        ));
    }
    headers.push(ObjProp::Spread(TsExpr::OptionalCall {
        callee: Box::new(TsExpr::ident("headersHandler")),
        args: vec![],
    }));

    let mut init = vec![
        ObjProp::KeyValue("method".into(), TsExpr::string(action.method.as_str())),
        ObjProp::KeyValue("headers".into(), TsExpr::Object(headers)),
    ];
    if let Some(body) = body {
        init.push(ObjProp::KeyValue(
            "body".into(),
            TsExpr::ident("JSON")
                .member("stringify")
                .call(vec![TsExpr::ident(body.name.clone())]),
        ));
    }

    const_decl(
        "res",
        TsExpr::ident("fetch")
            .call(vec![TsExpr::ident("url"), TsExpr::Object(init)])
            .awaited(),
    )
}

fn ensure_success() -> TsStmt {
    TsStmt::Expr(
        TsExpr::ident("ensureSuccess")
            .call(vec![
                TsExpr::ident("res"),
                this_member("error"),
                this_member("statusCode"),
            ])
            .awaited(),
    )
}

fn return_decoded(method: &str) -> TsStmt {
    TsStmt::Return(TsExpr::ident("res").member(method).call(vec![]).awaited())
}

/// Response handling for each shape.
fn codegen_response(shape: &ResponseShape) -> Vec<TsStmt> {
    match shape {
        ResponseShape::Response => vec![
            TsStmt::Expr(
                TsExpr::ident("notifyStatus")
                    .call(vec![TsExpr::ident("res"), this_member("statusCode")]),
            ),
            TsStmt::Return(TsExpr::ident("res")),
        ],
        ResponseShape::Blob => vec![ensure_success(), return_decoded("blob")],
        ResponseShape::Void => vec![ensure_success()],
        ResponseShape::Typed {
            content, nullable, ..
        } => {
            let mut stmts = vec![ensure_success()];
            if *nullable {
                stmts.push(TsStmt::If {
                    cond: TsExpr::BinOp {
                        left: Box::new(TsExpr::ident("res").member("status")),
                        op: BinOp::StrictEqual,
                        right: Box::new(TsExpr::Literal(TsLiteral::Int(204))),
                    },
                    then_body: vec![TsStmt::Return(TsExpr::Literal(TsLiteral::Null))],
                });
            }
            stmts.push(match content {
                ResponseContent::Json => return_decoded("json"),
                ResponseContent::Text => return_decoded("text"),
            });
            stmts
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::descriptor::{HttpMethod, ParamSource};
    use crate::ir::api::TranslatedType;
    use crate::ir::emit::Emit;
    use crate::ir::types::{TsTypeDef, TypeDefKind};

    fn param(name: &str, ty: TsType, source: ParamSource) -> ParamIR {
        ParamIR {
            name: name.into(),
            original_name: name.into(),
            is_array: matches!(ty, TsType::Array(_)),
            ty,
            source,
        }
    }

    fn action(params: Vec<ParamIR>, url: Vec<UrlPart>, response: ResponseShape) -> ActionIR {
        ActionIR {
            method_name: "run".into(),
            method: HttpMethod::Get,
            url,
            params,
            response,
            doc: None,
        }
    }

    fn alias(namespace: &str, name: &str) -> TranslatedType {
        TranslatedType {
            id: TypeId::new(namespace, name),
            def: TsTypeDef {
                name: name.into(),
                kind: TypeDefKind::TypeAlias {
                    type_params: vec![],
                    ty: TsType::string(),
                },
                doc: None,
            },
        }
    }

    #[test]
    fn test_codegen_void_action_without_query() {
        let method = codegen_action(&action(
            vec![],
            vec![UrlPart::Static("api/ping".into())],
            ResponseShape::Void,
        ))
        .emit();
        assert_eq!(
            method,
            "async run(headersHandler?: () => Record<string, string>): Promise<void> {\n  const url = `${this.baseUri}api/ping`;\n  const res = await fetch(url, { method: \"GET\", headers: { ...headersHandler?.() } });\n  await ensureSuccess(res, this.error, this.statusCode);\n}\n"
        );
    }

    #[test]
    fn test_codegen_query_params() {
        let method = codegen_action(&action(
            vec![
                param("when", TsType::Ref("Date".into()).or_null(), ParamSource::Query),
                param(
                    "tags",
                    TsType::Array(Box::new(TsType::string())),
                    ParamSource::Query,
                ),
            ],
            vec![UrlPart::Static("api/search".into())],
            ResponseShape::Void,
        ))
        .emit();
        assert!(method.contains("  const searchParams = new URLSearchParams();\n"));
        assert!(method.contains(
            "  if (when != null) {\n    searchParams.set(\"when\", when.toISOString());\n  }\n"
        ));
        assert!(method.contains(
            "  if (tags != null) {\n    tags.forEach((value) => searchParams.append(\"tags\", String(value)));\n  }\n"
        ));
        assert!(method.contains(
            "  const url = queryString ? `${this.baseUri}api/search?${queryString}` : `${this.baseUri}api/search`;\n"
        ));
    }

    #[test]
    fn test_codegen_path_and_body() {
        let mut put = action(
            vec![
                param("id", TsType::number(), ParamSource::Path),
                param("person", TsType::Ref("Demo_Client.Person".into()), ParamSource::Body),
            ],
            vec![UrlPart::Static("api/people/".into()), UrlPart::Param("id".into())],
            ResponseShape::Typed {
                ty: TsType::Ref("Demo_Client.Person".into()),
                content: ResponseContent::Json,
                nullable: true,
            },
        );
        put.method = HttpMethod::Put;
        let method = codegen_action(&put).emit();
        assert!(method.starts_with(
            "async run(id: number, person: Demo_Client.Person, headersHandler?: () => Record<string, string>): Promise<Demo_Client.Person | null> {\n"
        ));
        assert!(method.contains("const url = `${this.baseUri}api/people/${encodeURIComponent(String(id))}`;"));
        assert!(method.contains(
            "const res = await fetch(url, { method: \"PUT\", headers: { \"Content-Type\": \"application/json;charset=UTF-8\", ...headersHandler?.() }, body: JSON.stringify(person) });"
        ));
        assert!(method.contains("  if (res.status === 204) {\n    return null;\n  }\n  return await res.json();\n"));
    }

    #[test]
    fn test_codegen_response_and_blob_shapes() {
        let raw = codegen_action(&action(vec![], vec![], ResponseShape::Response)).emit();
        assert!(raw.contains("Promise<Response>"));
        assert!(raw.contains("  notifyStatus(res, this.statusCode);\n  return res;\n"));
        assert!(!raw.contains("ensureSuccess"));

        let blob = codegen_action(&action(vec![], vec![], ResponseShape::Blob)).emit();
        assert!(blob.contains("Promise<Blob>"));
        assert!(blob.contains("  return await res.blob();\n"));

        let text = codegen_action(&action(
            vec![],
            vec![],
            ResponseShape::Typed {
                ty: TsType::string(),
                content: ResponseContent::Text,
                nullable: false,
            },
        ))
        .emit();
        assert!(text.contains("  return await res.text();\n"));
        assert!(!text.contains("204"));
    }

    #[test]
    fn test_codegen_client_constructor() {
        let options = GenOptions {
            default_base_uri: "http://localhost:5000/".into(),
            ..GenOptions::default()
        };
        let client = ClientIR {
            controller: TypeId::new("Demo.Controllers", "People"),
            name: "People".into(),
            actions: vec![],
        };
        assert_eq!(
            codegen_client(&client, &options).emit(),
            "export class People {\n  constructor(private baseUri: string = \"http://localhost:5000/\", private error?: (err: ApiError) => void, private statusCode?: Record<number, (res: Response) => void>) {}\n}\n"
        );
    }

    #[test]
    fn test_codegen_module_groups_namespaces_in_first_reference_order() {
        let api = ApiIR {
            types: vec![
                alias("Demo.B", "First"),
                alias("Demo.A", "Second"),
                alias("Demo.B", "Third"),
            ],
            clients: vec![ClientIR {
                controller: TypeId::new("Demo.A", "People"),
                name: "People".into(),
                actions: vec![],
            }],
        };
        let module = codegen_module(&api, &GenOptions::default()).unwrap();
        let names: Vec<_> = module.namespaces.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, ["Demo_B_Client", "Demo_A_Client"]);
        assert_eq!(module.namespaces[0].types.len(), 2);
        assert_eq!(module.namespaces[1].classes.len(), 1);
        assert_eq!(module.support.len(), 1);
        assert!(module.imports.is_empty());
    }

    #[test]
    fn test_codegen_module_without_clients_has_no_support() {
        let api = ApiIR {
            types: vec![alias("Demo", "Id")],
            clients: vec![],
        };
        let output = codegen_module(&api, &GenOptions::default()).unwrap().emit();
        assert!(!output.contains("ApiError"));
        assert!(output.starts_with("// Generated by clientgen."));
    }

    #[test]
    fn test_codegen_runtime_module_import() {
        let options = GenOptions {
            runtime_module: Some("./client-runtime".into()),
            ..GenOptions::default()
        };
        let api = ApiIR {
            types: vec![],
            clients: vec![ClientIR {
                controller: TypeId::new("Demo", "Files"),
                name: "Files".into(),
                actions: vec![action(vec![], vec![], ResponseShape::Blob)],
            }],
        };
        let output = codegen_module(&api, &options).unwrap().emit();
        assert!(output.contains("import { ApiError, ensureSuccess } from \"./client-runtime\";\n"));
        assert!(!output.contains("export class ApiError"));
    }

    #[test]
    fn test_codegen_module_rejects_merged_namespaces() {
        let api = ApiIR {
            types: vec![alias("A.B", "P"), alias("A_B", "P")],
            clients: vec![],
        };
        let err = codegen_module(&api, &GenOptions::default()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "type 'A.B.P' and type 'A_B.P' both generate 'A_B_Client.P'"
        );
    }

    #[test]
    fn test_codegen_module_rejects_class_shadowing_type() {
        let api = ApiIR {
            types: vec![alias("Demo", "People")],
            clients: vec![ClientIR {
                controller: TypeId::new("Demo", "People"),
                name: "People".into(),
                actions: vec![],
            }],
        };
        let err = codegen_module(&api, &GenOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            GenError::NameCollision { ref name, ref first, ref second }
                if name == "Demo_Client.People"
                    && first == "type 'Demo.People'"
                    && second == "controller 'Demo.People'"
        ));
    }

    #[test]
    fn test_codegen_module_same_name_in_other_namespace_is_fine() {
        let api = ApiIR {
            types: vec![alias("Demo", "People"), alias("Demo.Data", "People")],
            clients: vec![],
        };
        let module = codegen_module(&api, &GenOptions::default()).unwrap();
        assert_eq!(module.namespaces.len(), 2);
    }
}
