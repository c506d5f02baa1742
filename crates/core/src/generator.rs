//! TypeScript client generator for descriptor snapshots.
//!
//! The pipeline is:
//! 1. Load: snapshot JSON -> Snapshot
//! 2. Translate: cherry-picked and action-reachable types -> TranslatedType,
//!    actions -> ClientIR (all selection and binding logic resolved here)
//! 3. Codegen: ApiIR -> TsModule (TypeScript AST)
//! 4. Emit: TsModule -> String (via Emit trait)

use tracing::debug;

use crate::cherry::is_cherry_type;
use crate::descriptor::Snapshot;
use crate::error::Result;
use crate::ir::{codegen_module, translate_actions, ApiIR, Emit, TypeGraph};
use crate::options::GenOptions;

/// Generate the TypeScript client for a snapshot.
///
/// Roots of the type walk are every cherry-picked type (in snapshot order,
/// when `include_cherry_types` is set) followed by the types actions reach.
pub fn generate(snapshot: &Snapshot, options: &GenOptions) -> Result<String> {
    let mut graph = TypeGraph::new(snapshot, options);
    if options.include_cherry_types {
        for ty in snapshot.types() {
            if is_cherry_type(ty, &options.policies) {
                graph.enqueue(ty.id());
            }
        }
    }

    let clients = translate_actions(snapshot, &mut graph, options)?;
    graph.drain()?;

    let api = ApiIR {
        types: graph.into_types(),
        clients,
    };
    debug!(
        types = api.types.len(),
        clients = api.clients.len(),
        policies = options.policies.bits(),
        "Generating TypeScript client."
    );

    Ok(codegen_module(&api, options)?.emit())
}

/// Generate the TypeScript client from a snapshot JSON string.
pub fn generate_from_json(json: &str, options: &GenOptions) -> Result<String> {
    let snapshot = Snapshot::from_json(json)?;
    generate(&snapshot, options)
}
