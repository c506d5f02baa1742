//! TypeScript IR types for code generation.
//!
//! This module defines the TypeScript AST the generator assembles:
//! - TsType: Types (primitives, arrays, unions, records, generic references)
//! - TsExpr / TsStmt: Expressions and statements for client stub bodies
//! - TsTypeDef / TsClass / TsNamespace / TsModule: Declarations

/// TypeScript type representation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TsType {
    /// Primitive types: string, number, boolean, null, void, unknown
    Primitive(TsPrimitive),
    /// Array type: T[]
    Array(Box<TsType>),
    /// Union type: A | B | C
    Union(Vec<TsType>),
    /// Record type: Record<K, V>
    Record {
        /// Key type
        key: Box<TsType>,
        /// Value type
        value: Box<TsType>,
    },
    /// Named type reference: "Demo_Client.Person", "Date", "T"
    Ref(String),
    /// Instantiated generic: Promise<T>, Demo_Client.Pair<string, number>
    Generic {
        /// Generic type name
        base: String,
        /// Type arguments
        args: Vec<TsType>,
    },
    /// Function type: (err: ApiError) => void
    Function {
        /// Parameters
        params: Vec<TsParam>,
        /// Return type
        ret: Box<TsType>,
    },
}

impl TsType {
    /// `string`
    pub fn string() -> Self {
        TsType::Primitive(TsPrimitive::String)
    }

    /// `number`
    pub fn number() -> Self {
        TsType::Primitive(TsPrimitive::Number)
    }

    /// `void`
    pub fn void() -> Self {
        TsType::Primitive(TsPrimitive::Void)
    }

    /// `T | null`, without nesting a second null into an existing union.
    pub fn or_null(self) -> Self {
        match self {
            TsType::Union(mut types) => {
                if !types.contains(&TsType::Primitive(TsPrimitive::Null)) {
                    types.push(TsType::Primitive(TsPrimitive::Null));
                }
                TsType::Union(types)
            }
            other => TsType::Union(vec![other, TsType::Primitive(TsPrimitive::Null)]),
        }
    }

    /// `Promise<inner>`
    pub fn promise(inner: TsType) -> Self {
        TsType::Generic {
            base: "Promise".into(),
            args: vec![inner],
        }
    }
}

/// TypeScript primitive types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum TsPrimitive {
    String,
    Number,
    Boolean,
    Null,
    Void,
    Unknown,
}

/// Interface property definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TsProp {
    /// Property name, quoted on emission when needed
    pub name: String,
    /// Property type
    pub ty: TsType,
    /// `name?: T`
    pub optional: bool,
    /// JSDoc
    pub doc: Option<String>,
}

/// TypeScript literal values
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TsLiteral {
    /// `"text"`, escaped on emission
    String(String),
    /// `204`
    Int(i64),
    /// `null`
    Null,
}

/// Object literal entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjProp {
    /// key: value
    KeyValue(String, TsExpr),
    /// ...expr
    Spread(TsExpr),
}

/// TypeScript expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TsExpr {
    /// Identifier: foo
    Ident(String),
    /// Literal value: "bar", 42
    Literal(TsLiteral),
    /// Function call: foo(a, b)
    Call {
        /// Called expression
        callee: Box<TsExpr>,
        /// Arguments
        args: Vec<TsExpr>,
    },
    /// Optional call: foo?.()
    OptionalCall {
        /// Called expression
        callee: Box<TsExpr>,
        /// Arguments
        args: Vec<TsExpr>,
    },
    /// Arrow function with an expression body: (x) => x.foo
    Arrow {
        /// Parameters
        params: Vec<TsParam>,
        /// Expression body
        body: Box<TsExpr>,
    },
    /// Object literal: { a: 1, ...b }
    Object(Vec<ObjProp>),
    /// Member access: foo.bar
    Member {
        /// Accessed object
        object: Box<TsExpr>,
        /// Property name
        prop: String,
    },
    /// Template literal: `${foo}/bar`
    Template(Vec<TemplatePart>),
    /// Await expression: await fetch()
    Await(Box<TsExpr>),
    /// Binary comparison: a != null
    BinOp {
        /// Left operand
        left: Box<TsExpr>,
        /// Operator
        op: BinOp,
        /// Right operand
        right: Box<TsExpr>,
    },
    /// new URLSearchParams()
    New {
        /// Constructed class
        callee: Box<TsExpr>,
        /// Constructor arguments
        args: Vec<TsExpr>,
    },
    /// Ternary/conditional: cond ? a : b
    Ternary {
        /// Condition
        cond: Box<TsExpr>,
        /// Value when truthy
        then_expr: Box<TsExpr>,
        /// Value when falsy
        else_expr: Box<TsExpr>,
    },
}

impl TsExpr {
    /// Identifier expression
    pub fn ident(name: impl Into<String>) -> Self {
        TsExpr::Ident(name.into())
    }

    /// String literal expression
    pub fn string(value: impl Into<String>) -> Self {
        TsExpr::Literal(TsLiteral::String(value.into()))
    }

    /// `self.prop`
    pub fn member(self, prop: impl Into<String>) -> Self {
        TsExpr::Member {
            object: Box::new(self),
            prop: prop.into(),
        }
    }

    /// `self(args)`
    pub fn call(self, args: Vec<TsExpr>) -> Self {
        TsExpr::Call {
            callee: Box::new(self),
            args,
        }
    }

    /// `await self`
    pub fn awaited(self) -> Self {
        TsExpr::Await(Box::new(self))
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    /// `!=`, true for neither null nor undefined on one side
    NotEqual,
    /// `===`
    StrictEqual,
}

/// Function or constructor parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TsParam {
    /// Parameter name
    pub name: String,
    /// Annotation; arrow parameters are left untyped
    pub ty: Option<TsType>,
    /// `name?: T`
    pub optional: bool,
    /// `private` parameter property (constructors only)
    pub is_private: bool,
    /// Default value: `baseUri: string = ""`
    pub default: Option<TsExpr>,
}

impl TsParam {
    /// Required parameter of type `ty`
    pub fn new(name: impl Into<String>, ty: TsType) -> Self {
        Self {
            name: name.into(),
            ty: Some(ty),
            optional: false,
            is_private: false,
            default: None,
        }
    }

    /// Parameter without a type annotation
    pub fn untyped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: None,
            optional: false,
            is_private: false,
            default: None,
        }
    }

    /// Mark the parameter optional
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

/// Template literal part
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplatePart {
    /// Static string part
    Static(String),
    /// Dynamic expression part: ${expr}
    Dynamic(TsExpr),
}

// =============================================================================
// Module-Level IR (for printer)
// =============================================================================

/// Import statement
#[derive(Debug, Clone)]
pub struct TsImport {
    /// Items to import
    pub items: Vec<String>,
    /// Module path
    pub from: String,
}

/// Enum member: `Male = 0`
#[derive(Debug, Clone)]
pub struct TsEnumMember {
    /// Member name, quoted on emission when needed
    pub name: String,
    /// Explicit value; TypeScript numbers members without one
    pub value: Option<i64>,
    /// JSDoc
    pub doc: Option<String>,
}

/// Type definition kind
#[derive(Debug, Clone)]
pub enum TypeDefKind {
    /// interface Foo<T> extends Bar { ... }
    Interface {
        /// Generic parameter names
        type_params: Vec<String>,
        /// Base interface
        extends: Option<TsType>,
        /// Properties in declaration order
        properties: Vec<TsProp>,
    },
    /// type Foo = ...
    TypeAlias {
        /// Generic parameter names
        type_params: Vec<String>,
        /// Aliased type
        ty: TsType,
    },
    /// enum Foo { A = 0, B = 1 }
    Enum {
        /// Members in declaration order
        members: Vec<TsEnumMember>,
    },
}

/// Type definition
#[derive(Debug, Clone)]
pub struct TsTypeDef {
    /// Declared name
    pub name: String,
    /// Declaration form
    pub kind: TypeDefKind,
    /// JSDoc
    pub doc: Option<String>,
}

/// Statement in a function body
#[derive(Debug, Clone)]
pub enum TsStmt {
    /// const declaration
    Const {
        /// Bound name
        name: String,
        /// Initializer
        init: TsExpr,
    },
    /// Expression statement
    Expr(TsExpr),
    /// Return statement
    Return(TsExpr),
    /// If statement
    If {
        /// Condition
        cond: TsExpr,
        /// Statements run when the condition holds
        then_body: Vec<TsStmt>,
    },
    /// Raw code block (for support code that doesn't fit the AST)
    Raw(String),
}

/// `async name(params): Ret { ... }` inside a class body
#[derive(Debug, Clone)]
pub struct TsMethod {
    /// Method name
    pub name: String,
    /// Parameters
    pub params: Vec<TsParam>,
    /// Declared return type
    pub return_type: TsType,
    /// Body statements
    pub body: Vec<TsStmt>,
    /// JSDoc
    pub doc: Option<String>,
}

/// Client class: constructor parameter properties plus methods
#[derive(Debug, Clone)]
pub struct TsClass {
    /// Class name
    pub name: String,
    /// Constructor parameters; `private` ones become fields
    pub ctor_params: Vec<TsParam>,
    /// Methods in declaration order
    pub methods: Vec<TsMethod>,
}

/// `export namespace Name { ... }`
#[derive(Debug, Clone)]
pub struct TsNamespace {
    /// Namespace name
    pub name: String,
    /// Type declarations, emitted first
    pub types: Vec<TsTypeDef>,
    /// Client classes, emitted after the types
    pub classes: Vec<TsClass>,
}

/// Complete TypeScript module
#[derive(Debug, Clone)]
pub struct TsModule {
    /// Comment lines at the top of the file, emitted verbatim
    pub header: Vec<String>,
    /// Import statements
    pub imports: Vec<TsImport>,
    /// Module-level support code shared by every client class
    pub support: Vec<TsStmt>,
    /// Namespaces in first-reference order
    pub namespaces: Vec<TsNamespace>,
}
