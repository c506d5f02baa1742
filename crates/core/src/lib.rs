#![forbid(unsafe_code)]
#![deny(warnings, unused_must_use, dead_code, missing_debug_implementations)]
#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro
)]

//! Typed TypeScript client generation from backend descriptor snapshots.
//!
//! A [`Snapshot`] describes the backend's types and HTTP actions. The
//! generator cherry-picks the types and members the active policies select,
//! walks the type graph from those roots and from every action, and renders
//! one TypeScript module: interfaces, enums and aliases per namespace plus a
//! fetch-based client class per controller.

pub mod cherry;
pub mod descriptor;
mod error;
mod generator;
pub mod ir;
mod options;

pub use cherry::{CherryPolicy, PickStrength, PolicySet};
pub use descriptor::{Snapshot, TypeId};
pub use error::{GenError, Result};
pub use generator::{generate, generate_from_json};
pub use options::{CaseConvention, GenOptions};
