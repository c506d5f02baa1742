//! Action translation: ActionDescriptors to normalized client actions.
//!
//! Resolves everything HTTP-specific ahead of code generation: response
//! shape, route template, parameter binding and method naming. Parameter and
//! return types are mapped through the [`TypeGraph`], which schedules the
//! types they reach.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use super::api::{ActionIR, ClientIR, ParamIR, ResponseShape, UrlPart};
use super::type_graph::TypeGraph;
use super::utils::{lowercase_first, param_identifier, sanitize_ts_identifier};
use crate::descriptor::{ActionDescriptor, Builtin, ParamSource, Snapshot, TypeId, TypeRef};
use crate::error::{GenError, Result};
use crate::options::GenOptions;

/// Translate every action of the snapshot, grouped into one client per
/// controller in first-appearance order.
pub fn translate_actions(
    snapshot: &Snapshot,
    graph: &mut TypeGraph<'_>,
    options: &GenOptions,
) -> Result<Vec<ClientIR>> {
    let mut clients: Vec<ClientIR> = Vec::new();
    let mut by_controller: HashMap<(String, String), usize> = HashMap::new();
    let mut skipped = 0usize;

    for action in snapshot.actions() {
        let controller = &action.controller;
        if options.is_excluded_controller(&controller.name) {
            skipped += 1;
            continue;
        }

        let ir = translate_action(action, graph)?;

        let key = (controller.namespace.clone(), controller.name.clone());
        let index = *by_controller.entry(key).or_insert_with(|| {
            clients.push(ClientIR {
                controller: TypeId::new(controller.namespace.clone(), controller.name.clone()),
                name: sanitize_ts_identifier(&controller.name),
                actions: Vec::new(),
            });
            clients.len() - 1
        });
        let client = &mut clients[index];
        if client.actions.iter().any(|a| a.method_name == ir.method_name) {
            return Err(GenError::action(
                action.path(),
                format!(
                    "duplicate method name '{}' in client '{}'",
                    ir.method_name, client.name
                ),
            ));
        }
        client.actions.push(ir);
    }

    debug!(
        clients = clients.len(),
        skipped_actions = skipped,
        "Translated actions."
    );
    Ok(clients)
}

fn translate_action(action: &ActionDescriptor, graph: &mut TypeGraph<'_>) -> Result<ActionIR> {
    let path = action.path();

    let mut params = Vec::with_capacity(action.parameters.len());
    let mut seen = HashSet::new();
    for param in &action.parameters {
        let param_path = format!("{path}({})", param.name);
        let name = param_identifier(&param.name);
        if !seen.insert(name.clone()) {
            return Err(GenError::action(
                param_path,
                format!("parameter identifier '{name}' is declared twice"),
            ));
        }
        params.push(ParamIR {
            name,
            original_name: param.name.clone(),
            ty: graph.map_ref(&param.ty, &param_path, &[])?,
            source: param.source,
            is_array: matches!(param.ty.unwrap_nullable(), TypeRef::Array { .. }),
        });
    }

    let bodies = params
        .iter()
        .filter(|p| p.source == ParamSource::Body)
        .count();
    if bodies > 1 {
        return Err(GenError::action(
            &path,
            format!("{bodies} body parameters declared, at most one is allowed"),
        ));
    }

    let url = bind_route(&path, &action.route, &params)?;
    let response = response_shape(action, &path, graph)?;

    Ok(ActionIR {
        method_name: sanitize_ts_identifier(&lowercase_first(&action.name)),
        method: action.verb,
        url,
        params,
        response,
        doc: action.doc.clone(),
    })
}

/// Split a route template into static text and path-parameter slots.
///
/// Placeholders may carry a constraint (`{id:int}`), a catch-all star
/// (`{*rest}`) or an optional mark (`{page?}`). Every placeholder must bind
/// a path parameter and every path parameter must appear in the route.
fn bind_route(path: &str, route: &str, params: &[ParamIR]) -> Result<Vec<UrlPart>> {
    let route = route.trim_start_matches('/');
    let mut parts = Vec::new();
    let mut bound = HashSet::new();
    let mut rest = route;

    while let Some(open) = rest.find('{') {
        if open > 0 {
            parts.push(UrlPart::Static(rest[..open].to_string()));
        }
        let after = &rest[open + 1..];
        let close = after.find('}').ok_or_else(|| {
            GenError::action(path, format!("unterminated placeholder in route '{route}'"))
        })?;
        let placeholder = placeholder_name(&after[..close]);

        let param = find_path_param(params, placeholder).ok_or_else(|| {
            GenError::action(
                path,
                format!("route placeholder '{placeholder}' has no matching path parameter"),
            )
        })?;
        bound.insert(param.name.as_str());
        parts.push(UrlPart::Param(param.name.clone()));
        rest = &after[close + 1..];
    }
    if !rest.is_empty() {
        parts.push(UrlPart::Static(rest.to_string()));
    }

    if let Some(unbound) = params
        .iter()
        .find(|p| p.source == ParamSource::Path && !bound.contains(p.name.as_str()))
    {
        return Err(GenError::action(
            path,
            format!(
                "path parameter '{}' does not appear in route '{route}'",
                unbound.original_name
            ),
        ));
    }

    Ok(parts)
}

fn placeholder_name(raw: &str) -> &str {
    let name = raw.split(':').next().unwrap_or(raw);
    name.trim().trim_start_matches('*').trim_end_matches('?')
}

/// Exact name match first, then a case-insensitive one.
fn find_path_param<'p>(params: &'p [ParamIR], placeholder: &str) -> Option<&'p ParamIR> {
    let mut path_params = params.iter().filter(|p| p.source == ParamSource::Path);
    path_params
        .clone()
        .find(|p| p.original_name == placeholder)
        .or_else(|| path_params.find(|p| p.original_name.eq_ignore_ascii_case(placeholder)))
}

fn response_shape(
    action: &ActionDescriptor,
    path: &str,
    graph: &mut TypeGraph<'_>,
) -> Result<ResponseShape> {
    let Some(return_type) = &action.return_type else {
        return Ok(ResponseShape::Void);
    };
    let shape = match return_type.as_builtin().and_then(Builtin::from_name) {
        Some(Builtin::ActionResult) => ResponseShape::Response,
        Some(Builtin::Stream | Builtin::HttpResponseMessage) => ResponseShape::Blob,
        Some(Builtin::Void) => ResponseShape::Void,
        _ => ResponseShape::Typed {
            ty: graph.map_ref(return_type.unwrap_nullable(), &format!("{path}(return)"), &[])?,
            content: action.response_content,
            nullable: return_type.is_nullable(),
        },
    };
    Ok(shape)
}
