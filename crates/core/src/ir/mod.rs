//! Intermediate Representation for descriptor to TypeScript code generation.
//!
//! This module defines a three-layer architecture:
//! 1. API-level IR: translated types, client classes and normalized actions
//! 2. TypeScript AST IR: Types, expressions, statements, classes, namespaces
//! 3. Emission: AST to TypeScript code strings via the `Emit` trait
//!
//! The separation allows:
//! - All selection and binding decisions resolved during translation
//! - Code generation builds structured AST (testable)
//! - Emission is purely mechanical string building
//!
//! ## Module Structure
//!
//! - `types`: TypeScript AST IR (TsType, TsExpr, TsStmt, TsClass, TsModule)
//! - `api`: API-level IR (TranslatedType, ClientIR, ActionIR, ResponseShape)
//! - `type_graph`: work-list translation of reachable types
//! - `actions`: ActionDescriptor -> ActionIR conversion
//! - `codegen`: API IR -> TypeScript AST
//! - `emit`: TypeScript AST -> code strings (via Emit trait)
//! - `utils`: Common utilities shared across modules

mod actions;
mod api;
mod codegen;
pub mod emit;
mod type_graph;
pub mod types;
pub mod utils;

// Re-export the main entry points
pub use actions::translate_actions;
pub use api::{ActionIR, ApiIR, ClientIR, ParamIR, ResponseShape, TranslatedType, UrlPart};
pub use codegen::codegen_module;
pub use emit::Emit;
pub use type_graph::TypeGraph;
