//! TypeScript code emission via the Emit trait.
//!
//! Each AST type implements `Emit` for clean, composable code generation.
//! Output only depends on the AST, so identical input renders identical text.

use super::types::{
    BinOp, ObjProp, TemplatePart, TsClass, TsEnumMember, TsExpr, TsImport, TsLiteral, TsMethod,
    TsModule, TsNamespace, TsParam, TsPrimitive, TsProp, TsStmt, TsType, TsTypeDef, TypeDefKind,
};
use super::utils::{escape_js_string, quote_if_needed};

/// Trait for emitting TypeScript code from AST nodes.
pub trait Emit {
    /// Convert the AST node to its TypeScript string representation.
    fn emit(&self) -> String;
}

const INDENT: &str = "  ";

/// Prefix every non-empty line with `levels` indentation steps.
fn indent(code: &str, levels: usize) -> String {
    let prefix = INDENT.repeat(levels);
    code.lines()
        .map(|line| {
            if line.is_empty() {
                "\n".to_string()
            } else {
                format!("{prefix}{line}\n")
            }
        })
        .collect()
}

/// JSDoc block for an optional doc string.
fn emit_doc(doc: Option<&str>) -> String {
    let Some(doc) = doc.map(str::trim).filter(|d| !d.is_empty()) else {
        return String::new();
    };
    // `*/` inside the text would close the comment early.
    let doc = doc.replace("*/", "*\\/");
    let lines: Vec<&str> = doc.lines().map(str::trim_end).collect();
    if let [line] = lines.as_slice() {
        return format!("/** {line} */\n");
    }
    let mut output = String::from("/**\n");
    for line in lines {
        if line.is_empty() {
            output.push_str(" *\n");
        } else {
            output.push_str(&format!(" * {line}\n"));
        }
    }
    output.push_str(" */\n");
    output
}

fn join<T: Emit>(items: &[T], sep: &str) -> String {
    items.iter().map(Emit::emit).collect::<Vec<_>>().join(sep)
}

// =============================================================================
// Primitive Types
// =============================================================================

impl Emit for TsPrimitive {
    fn emit(&self) -> String {
        match self {
            TsPrimitive::String => "string".to_string(),
            TsPrimitive::Number => "number".to_string(),
            TsPrimitive::Boolean => "boolean".to_string(),
            TsPrimitive::Null => "null".to_string(),
            TsPrimitive::Void => "void".to_string(),
            TsPrimitive::Unknown => "unknown".to_string(),
        }
    }
}

impl Emit for TsLiteral {
    fn emit(&self) -> String {
        match self {
            TsLiteral::String(s) => format!("\"{}\"", escape_js_string(s)),
            TsLiteral::Int(i) => i.to_string(),
            TsLiteral::Null => "null".to_string(),
        }
    }
}

// =============================================================================
// Types
// =============================================================================

impl Emit for TsType {
    fn emit(&self) -> String {
        match self {
            TsType::Primitive(p) => p.emit(),
            TsType::Array(inner) => {
                let inner_str = inner.emit();
                // Wrap complex types in parentheses
                if matches!(**inner, TsType::Union(_) | TsType::Function { .. }) {
                    format!("({inner_str})[]")
                } else {
                    format!("{inner_str}[]")
                }
            }
            TsType::Union(types) => join(types, " | "),
            TsType::Record { key, value } => {
                format!("Record<{}, {}>", key.emit(), value.emit())
            }
            TsType::Ref(name) => name.clone(),
            TsType::Generic { base, args } => format!("{base}<{}>", join(args, ", ")),
            TsType::Function { params, ret } => {
                format!("({}) => {}", join(params, ", "), ret.emit())
            }
        }
    }
}

impl Emit for TsProp {
    fn emit(&self) -> String {
        let key = quote_if_needed(&self.name);
        let opt = if self.optional { "?" } else { "" };
        format!(
            "{}{key}{opt}: {};\n",
            emit_doc(self.doc.as_deref()),
            self.ty.emit()
        )
    }
}

// =============================================================================
// Type Definitions
// =============================================================================

fn type_params(params: &[String]) -> String {
    if params.is_empty() {
        String::new()
    } else {
        format!("<{}>", params.join(", "))
    }
}

impl Emit for TsEnumMember {
    fn emit(&self) -> String {
        let name = quote_if_needed(&self.name);
        let value = self.value.map(|v| format!(" = {v}")).unwrap_or_default();
        format!("{}{name}{value},\n", emit_doc(self.doc.as_deref()))
    }
}

impl Emit for TsTypeDef {
    fn emit(&self) -> String {
        let mut output = emit_doc(self.doc.as_deref());
        match &self.kind {
            TypeDefKind::Interface {
                type_params: params,
                extends,
                properties,
            } => {
                let extends_str = extends
                    .as_ref()
                    .map(|base| format!(" extends {}", base.emit()))
                    .unwrap_or_default();
                output.push_str(&format!(
                    "export interface {}{}{extends_str} {{\n",
                    self.name,
                    type_params(params)
                ));
                for prop in properties {
                    output.push_str(&indent(&prop.emit(), 1));
                }
                output.push_str("}\n");
            }
            TypeDefKind::TypeAlias {
                type_params: params,
                ty,
            } => {
                output.push_str(&format!(
                    "export type {}{} = {};\n",
                    self.name,
                    type_params(params),
                    ty.emit()
                ));
            }
            TypeDefKind::Enum { members } => {
                output.push_str(&format!("export enum {} {{\n", self.name));
                for member in members {
                    output.push_str(&indent(&member.emit(), 1));
                }
                output.push_str("}\n");
            }
        }
        output
    }
}

// =============================================================================
// Expressions
// =============================================================================

impl Emit for BinOp {
    fn emit(&self) -> String {
        match self {
            BinOp::NotEqual => "!=".to_string(),
            BinOp::StrictEqual => "===".to_string(),
        }
    }
}

impl Emit for ObjProp {
    fn emit(&self) -> String {
        match self {
            ObjProp::KeyValue(key, value) => format!("{}: {}", quote_if_needed(key), value.emit()),
            ObjProp::Spread(expr) => format!("...{}", expr.emit()),
        }
    }
}

impl Emit for TsExpr {
    fn emit(&self) -> String {
        match self {
            TsExpr::Ident(name) => name.clone(),
            TsExpr::Literal(lit) => lit.emit(),
            TsExpr::Call { callee, args } => {
                format!("{}({})", callee.emit(), join(args, ", "))
            }
            TsExpr::OptionalCall { callee, args } => {
                format!("{}?.({})", callee.emit(), join(args, ", "))
            }
            TsExpr::Arrow { params, body } => {
                format!("({}) => {}", join(params, ", "), body.emit())
            }
            TsExpr::Object(props) => {
                if props.is_empty() {
                    "{}".to_string()
                } else {
                    format!("{{ {} }}", join(props, ", "))
                }
            }
            TsExpr::Member { object, prop } => {
                format!("{}.{}", object.emit(), prop)
            }
            TsExpr::Template(parts) => {
                let content: String = parts
                    .iter()
                    .map(|p| match p {
                        TemplatePart::Static(s) => s.replace('\\', "\\\\").replace('`', "\\`"),
                        TemplatePart::Dynamic(e) => format!("${{{}}}", e.emit()),
                    })
                    .collect();
                format!("`{content}`")
            }
            TsExpr::Await(expr) => {
                format!("await {}", expr.emit())
            }
            TsExpr::BinOp { left, op, right } => {
                format!("{} {} {}", left.emit(), op.emit(), right.emit())
            }
            TsExpr::New { callee, args } => {
                format!("new {}({})", callee.emit(), join(args, ", "))
            }
            TsExpr::Ternary {
                cond,
                then_expr,
                else_expr,
            } => {
                format!(
                    "{} ? {} : {}",
                    cond.emit(),
                    then_expr.emit(),
                    else_expr.emit()
                )
            }
        }
    }
}

impl Emit for TsParam {
    fn emit(&self) -> String {
        let modifier = if self.is_private { "private " } else { "" };
        let opt = if self.optional { "?" } else { "" };
        let ty = self
            .ty
            .as_ref()
            .map(|t| format!(": {}", t.emit()))
            .unwrap_or_default();
        let default = self
            .default
            .as_ref()
            .map(|d| format!(" = {}", d.emit()))
            .unwrap_or_default();
        format!("{modifier}{}{opt}{ty}{default}", self.name)
    }
}

// =============================================================================
// Statements
// =============================================================================

impl Emit for TsStmt {
    fn emit(&self) -> String {
        self.emit_indented(1)
    }
}

impl TsStmt {
    /// Emit with specified indentation level (2 spaces per level)
    pub fn emit_indented(&self, level: usize) -> String {
        let prefix = INDENT.repeat(level);
        match self {
            TsStmt::Const { name, init } => {
                format!("{prefix}const {name} = {};\n", init.emit())
            }
            TsStmt::Expr(expr) => {
                format!("{prefix}{};\n", expr.emit())
            }
            TsStmt::Return(expr) => format!("{prefix}return {};\n", expr.emit()),
            TsStmt::If { cond, then_body } => {
                let mut output = format!("{prefix}if ({}) {{\n", cond.emit());
                for stmt in then_body {
                    output.push_str(&stmt.emit_indented(level + 1));
                }
                output.push_str(&format!("{prefix}}}\n"));
                output
            }
            // Raw code is emitted as-is, with proper indentation for each line
            TsStmt::Raw(code) => indent(code, level),
        }
    }
}

// =============================================================================
// Functions and Classes
// =============================================================================

impl Emit for TsMethod {
    fn emit(&self) -> String {
        let mut output = emit_doc(self.doc.as_deref());
        output.push_str(&format!(
            "async {}({}): {}",
            self.name,
            join(&self.params, ", "),
            self.return_type.emit()
        ));

        if self.body.is_empty() {
            output.push_str(" {}\n");
        } else {
            output.push_str(" {\n");
            for stmt in &self.body {
                output.push_str(&stmt.emit_indented(1));
            }
            output.push_str("}\n");
        }
        output
    }
}

impl Emit for TsClass {
    fn emit(&self) -> String {
        let mut output = format!("export class {} {{\n", self.name);
        output.push_str(&format!(
            "{INDENT}constructor({}) {{}}\n",
            join(&self.ctor_params, ", ")
        ));
        for method in &self.methods {
            output.push('\n');
            output.push_str(&indent(&method.emit(), 1));
        }
        output.push_str("}\n");
        output
    }
}

// =============================================================================
// Imports, Namespaces and Modules
// =============================================================================

impl Emit for TsImport {
    fn emit(&self) -> String {
        format!(
            "import {{ {} }} from \"{}\";\n",
            self.items.join(", "),
            escape_js_string(&self.from)
        )
    }
}

impl Emit for TsNamespace {
    fn emit(&self) -> String {
        let blocks: Vec<String> = self
            .types
            .iter()
            .map(Emit::emit)
            .chain(self.classes.iter().map(Emit::emit))
            .collect();
        format!(
            "export namespace {} {{\n{}}}\n",
            self.name,
            indent(&blocks.join("\n"), 1)
        )
    }
}

impl Emit for TsModule {
    fn emit(&self) -> String {
        let mut sections = Vec::new();

        if !self.header.is_empty() {
            sections.push(
                self.header
                    .iter()
                    .map(|line| format!("{line}\n"))
                    .collect::<String>(),
            );
        }

        if !self.imports.is_empty() {
            sections.push(self.imports.iter().map(Emit::emit).collect());
        }

        for stmt in &self.support {
            sections.push(stmt.emit_indented(0));
        }

        for namespace in &self.namespaces {
            sections.push(namespace.emit());
        }

        sections.join("\n")
    }
}

// =============================================================================
// Tests
// =============================================================================
