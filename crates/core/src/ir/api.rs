//! API-level IR for translated types and actions.
//!
//! This module defines the intermediate representation between the
//! descriptor model and the TypeScript AST:
//! - TranslatedType: one emitted declaration per backend type
//! - ClientIR: one client class per controller
//! - ActionIR: a normalized action (URL template, bound parameters, response shape)

use super::types::{TsType, TsTypeDef};
use crate::descriptor::{HttpMethod, ParamSource, ResponseContent, TypeId};

/// Everything the code assembler needs for one run.
#[derive(Debug, Clone)]
pub struct ApiIR {
    /// Type declarations in first-reference order
    pub types: Vec<TranslatedType>,
    /// Client classes in controller first-appearance order
    pub clients: Vec<ClientIR>,
}

/// Declaration produced for one backend type. Produced at most once per run.
#[derive(Debug, Clone)]
pub struct TranslatedType {
    /// Backend identity of the declaration.
    pub id: TypeId,
    /// The TypeScript declaration.
    pub def: TsTypeDef,
}

/// Client class for one controller
#[derive(Debug, Clone)]
pub struct ClientIR {
    /// Backend identity of the controller
    pub controller: TypeId,
    /// Class name (sanitized controller name)
    pub name: String,
    /// One method per action, in snapshot order
    pub actions: Vec<ActionIR>,
}

/// Normalized action
#[derive(Debug, Clone)]
pub struct ActionIR {
    /// Method name on the client class (e.g., "getPerson")
    pub method_name: String,
    /// HTTP verb
    pub method: HttpMethod,
    /// Route template parts, relative to `baseUri`
    pub url: Vec<UrlPart>,
    /// Every parameter, in declaration order (the method signature)
    pub params: Vec<ParamIR>,
    /// How the stub treats the response
    pub response: ResponseShape,
    /// JSDoc of the method
    pub doc: Option<String>,
}

impl ActionIR {
    /// Parameters serialized into the query string, in declaration order.
    pub fn query_params(&self) -> impl Iterator<Item = &ParamIR> {
        self.params.iter().filter(|p| p.source == ParamSource::Query)
    }

    /// The JSON body parameter, if any.
    pub fn body(&self) -> Option<&ParamIR> {
        self.params.iter().find(|p| p.source == ParamSource::Body)
    }
}

/// Single action parameter
#[derive(Debug, Clone)]
pub struct ParamIR {
    /// TypeScript-safe identifier
    pub name: String,
    /// Name as declared on the backend (query string key)
    pub original_name: String,
    /// Parameter type, including `| null` for nullable parameters
    pub ty: TsType,
    /// Where the value is bound
    pub source: ParamSource,
    /// Array-typed query parameters are appended once per element
    pub is_array: bool,
}

/// URL template part
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlPart {
    /// Static string
    Static(String),
    /// Path parameter interpolation (parameter identifier)
    Param(String),
}

/// How a stub treats the HTTP response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseShape {
    /// Raw `Response`: no decoding, no throw; only the status table is consulted
    Response,
    /// Byte stream: `res.blob()`
    Blob,
    /// Nothing to decode
    Void,
    /// Decoded body of the declared type
    Typed {
        /// Declared return type, without `| null`
        ty: TsType,
        /// `res.json()` or `res.text()`
        content: ResponseContent,
        /// `null` on HTTP 204
        nullable: bool,
    },
}

impl ResponseShape {
    /// Type the stub's promise resolves to.
    pub fn result_type(&self) -> TsType {
        match self {
            ResponseShape::Response => TsType::Ref("Response".into()),
            ResponseShape::Blob => TsType::Ref("Blob".into()),
            ResponseShape::Void => TsType::void(),
            ResponseShape::Typed { ty, nullable, .. } => {
                if *nullable {
                    ty.clone().or_null()
                } else {
                    ty.clone()
                }
            }
        }
    }
}
