//! Descriptor model: the immutable snapshot of backend types and actions.
//!
//! The snapshot is produced by an external collaborator (whatever reflects
//! over the live backend) and handed to the generator as JSON. Nothing in
//! this crate mutates a descriptor once it is loaded.
//!
//! ## Module Structure
//!
//! - `snapshot`: the top-level [`Snapshot`] document and its loaders

mod snapshot;

use std::fmt;

use serde::Deserialize;

use crate::cherry::CherryPolicy;

pub use snapshot::Snapshot;

/// Identity of a backend type: namespace plus simple name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId {
    /// Dotted namespace; empty for the global namespace.
    pub namespace: String,
    /// Simple name.
    pub name: String,
}

impl TypeId {
    /// Identity from its namespace and simple name.
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}.{}", self.namespace, self.name)
        }
    }
}

/// Kind of a backend type declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TypeKind {
    /// Reference type with fields and properties.
    #[default]
    Class,
    /// Value type with fields and properties.
    Struct,
    /// Named integral constants.
    Enum,
    /// Contract implemented by classes and structs.
    Interface,
}

/// What the backend's metadata declared for one policy on one type or member.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationMarker {
    /// Policy whose metadata this marker records.
    pub policy: CherryPolicy,
    /// `false` records an explicit exclusion marker (ignore / non-serialized).
    #[serde(default = "default_present")]
    pub present: bool,
    /// Whether the marker declares the member required.
    #[serde(default)]
    pub required: Option<bool>,
    /// Wire name the marker declares for the member.
    #[serde(default)]
    pub rename_to: Option<String>,
}

fn default_present() -> bool {
    true
}

impl AnnotationMarker {
    /// True only when the marker explicitly declares `required`.
    pub fn is_required(&self) -> bool {
        self.required == Some(true)
    }
}

/// Lookup of the marker recorded for a given policy.
pub trait Annotated {
    /// Every marker recorded on the item.
    fn markers(&self) -> &[AnnotationMarker];

    /// The marker recorded for `policy`, if any.
    fn marker(&self, policy: CherryPolicy) -> Option<&AnnotationMarker> {
        self.markers().iter().find(|m| m.policy == policy)
    }
}

/// A reference to a type from a member, parameter, return value or base type.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TypeRef {
    /// A built-in shape: `int64`, `string`, `stream`, ...
    Builtin {
        /// Name from the builtin table, e.g. `dateTime`.
        name: String,
    },
    /// A type described in the snapshot, optionally instantiated with arguments.
    Named {
        /// Namespace of the referenced type.
        #[serde(default)]
        namespace: String,
        /// Simple name of the referenced type.
        name: String,
        /// Generic arguments, one per generic parameter of the target.
        #[serde(default)]
        args: Vec<TypeRef>,
    },
    /// A generic parameter of the enclosing type.
    GenericParam {
        /// Parameter name as declared on the enclosing type.
        name: String,
    },
    /// Sequence of `element`.
    Array {
        /// Element type.
        element: Box<TypeRef>,
    },
    /// Map from `key` to `value`.
    Dictionary {
        /// Key type.
        key: Box<TypeRef>,
        /// Value type.
        value: Box<TypeRef>,
    },
    /// `inner` or null.
    Nullable {
        /// Wrapped type.
        inner: Box<TypeRef>,
    },
}

#[cfg(test)]
impl TypeRef {
    pub(crate) fn builtin(name: impl Into<String>) -> Self {
        Self::Builtin { name: name.into() }
    }

    pub(crate) fn named(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Named {
            namespace: namespace.into(),
            name: name.into(),
            args: Vec::new(),
        }
    }
}

impl TypeRef {
    /// True for a top-level nullable wrapper.
    pub fn is_nullable(&self) -> bool {
        matches!(self, TypeRef::Nullable { .. })
    }

    /// Strip any number of nullable wrappers.
    pub fn unwrap_nullable(&self) -> &TypeRef {
        let mut current = self;
        while let TypeRef::Nullable { inner } = current {
            current = inner;
        }
        current
    }

    /// Built-in shape this reference denotes, if it is a builtin.
    pub fn as_builtin(&self) -> Option<&str> {
        match self.unwrap_nullable() {
            TypeRef::Builtin { name } => Some(name),
            _ => None,
        }
    }
}

/// Built-in backend shapes the translator knows how to map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum Builtin {
    String,
    Char,
    Bool,
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Int128,
    UInt128,
    BigInteger,
    Float32,
    Float64,
    Decimal,
    DateTime,
    DateTimeOffset,
    DateOnly,
    TimeOnly,
    TimeSpan,
    Guid,
    Uri,
    Object,
    Void,
    ByteArray,
    Stream,
    HttpResponseMessage,
    ActionResult,
}

impl Builtin {
    /// Parse a builtin name as it appears in a snapshot.
    pub fn from_name(name: &str) -> Option<Self> {
        let builtin = match name {
            "string" => Self::String,
            "char" => Self::Char,
            "bool" => Self::Bool,
            "int8" => Self::Int8,
            "uint8" => Self::UInt8,
            "int16" => Self::Int16,
            "uint16" => Self::UInt16,
            "int32" => Self::Int32,
            "uint32" => Self::UInt32,
            "int64" => Self::Int64,
            "uint64" => Self::UInt64,
            "int128" => Self::Int128,
            "uint128" => Self::UInt128,
            "bigInteger" => Self::BigInteger,
            "float32" => Self::Float32,
            "float64" => Self::Float64,
            "decimal" => Self::Decimal,
            "dateTime" => Self::DateTime,
            "dateTimeOffset" => Self::DateTimeOffset,
            "dateOnly" => Self::DateOnly,
            "timeOnly" => Self::TimeOnly,
            "timeSpan" => Self::TimeSpan,
            "guid" => Self::Guid,
            "uri" => Self::Uri,
            "object" => Self::Object,
            "void" => Self::Void,
            "byteArray" => Self::ByteArray,
            "stream" => Self::Stream,
            "httpResponseMessage" => Self::HttpResponseMessage,
            "actionResult" => Self::ActionResult,
            _ => return None,
        };
        Some(builtin)
    }

    /// 64-bit-or-wider integers. JSON numbers cannot carry these losslessly,
    /// so the wire codecs transport them as strings.
    pub fn is_wide_integer(self) -> bool {
        matches!(
            self,
            Self::Int64 | Self::UInt64 | Self::Int128 | Self::UInt128 | Self::BigInteger
        )
    }

    /// Numeric types that fit in a JavaScript number without precision loss.
    pub fn is_narrow_numeric(self) -> bool {
        matches!(
            self,
            Self::Int8
                | Self::UInt8
                | Self::Int16
                | Self::UInt16
                | Self::Int32
                | Self::UInt32
                | Self::Float32
                | Self::Float64
                | Self::Decimal
        )
    }
}

/// A backend type declaration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDescriptor {
    /// Dotted namespace; empty for the global namespace.
    #[serde(default)]
    pub namespace: String,
    /// Simple name.
    pub name: String,
    /// Declaration kind.
    #[serde(default)]
    pub kind: TypeKind,
    /// Fields and properties, or enum members, in declaration order.
    #[serde(default)]
    pub members: Vec<MemberDescriptor>,
    /// Names of the generic parameters, in declaration order.
    #[serde(default)]
    pub generic_parameters: Vec<String>,
    /// Base type the declaration extends.
    #[serde(default)]
    pub base_type: Option<TypeRef>,
    /// Element type of a collection declaration.
    #[serde(default)]
    pub element: Option<TypeRef>,
    /// Key type of a dictionary declaration.
    #[serde(default)]
    pub key: Option<TypeRef>,
    /// Value type of a dictionary declaration.
    #[serde(default)]
    pub value: Option<TypeRef>,
    /// Type-level markers.
    #[serde(default)]
    pub markers: Vec<AnnotationMarker>,
    /// Documentation carried into the generated declaration.
    #[serde(default)]
    pub doc: Option<String>,
}

impl TypeDescriptor {
    /// Identity of the declaration.
    pub fn id(&self) -> TypeId {
        TypeId::new(self.namespace.clone(), self.name.clone())
    }

    /// True for enum declarations.
    pub fn is_enum(&self) -> bool {
        self.kind == TypeKind::Enum
    }
}

impl Annotated for TypeDescriptor {
    fn markers(&self) -> &[AnnotationMarker] {
        &self.markers
    }
}

/// A field or property of a backend type, or a member of an enum.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberDescriptor {
    /// Name as declared in the backend.
    pub name: String,
    /// Declared type. Enum members carry none.
    #[serde(default, rename = "type")]
    pub ty: Option<TypeRef>,
    /// Member-level markers.
    #[serde(default)]
    pub markers: Vec<AnnotationMarker>,
    /// Client field name override, used when no policy renames the member.
    #[serde(default)]
    pub custom_name: Option<String>,
    /// Integral value of an enum member.
    #[serde(default)]
    pub value: Option<i64>,
    /// Documentation carried into the generated field.
    #[serde(default)]
    pub doc: Option<String>,
}

impl Annotated for MemberDescriptor {
    fn markers(&self) -> &[AnnotationMarker] {
        &self.markers
    }
}

/// HTTP verb of an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[allow(missing_docs)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    /// Upper-case verb as sent on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// Where an action parameter is bound from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParamSource {
    /// A `{placeholder}` of the route.
    Path,
    /// A query-string entry.
    #[default]
    Query,
    /// The JSON request body.
    Body,
}

/// Declared content kind of an action's response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResponseContent {
    /// Decoded with `res.json()`.
    #[default]
    Json,
    /// Decoded with `res.text()`.
    Text,
}

/// A parameter of an action.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterDescriptor {
    /// Name as declared in the backend; also the query-string key.
    pub name: String,
    /// Where the value is bound.
    #[serde(default)]
    pub source: ParamSource,
    /// Declared type.
    #[serde(rename = "type")]
    pub ty: TypeRef,
}

/// Controller grouping an action belongs to.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControllerRef {
    /// Namespace the client class is generated into.
    #[serde(default)]
    pub namespace: String,
    /// Simple name; becomes the client class name.
    pub name: String,
}

/// A backend API operation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionDescriptor {
    /// Controller the action belongs to.
    pub controller: ControllerRef,
    /// Action name; becomes the client method name.
    pub name: String,
    /// Route template relative to the base URI, e.g. `api/people/{id}`.
    pub route: String,
    /// HTTP verb; GET when absent.
    #[serde(default)]
    pub verb: HttpMethod,
    /// Parameters in declaration order.
    #[serde(default)]
    pub parameters: Vec<ParameterDescriptor>,
    /// Absent for actions returning nothing.
    #[serde(default)]
    pub return_type: Option<TypeRef>,
    /// How a typed response body is decoded.
    #[serde(default)]
    pub response_content: ResponseContent,
    /// Documentation carried into the generated method.
    #[serde(default)]
    pub doc: Option<String>,
}

impl ActionDescriptor {
    /// `Controller.action`, used in diagnostics.
    pub fn path(&self) -> String {
        format!("{}.{}", self.controller.name, self.name)
    }
}
