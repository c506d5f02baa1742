//! Option layering: defaults, then the TOML config file, then flags.

use std::fs;
use std::path::Path;

use clientgen_core::{GenError, GenOptions, PolicySet};
use tracing::debug;

use crate::Cli;

/// Build the generation options for one invocation.
///
/// The positional policy mask replaces the file's `policies`; every other
/// flag overrides only the field it names.
pub fn load_options(cli: &Cli) -> Result<GenOptions, String> {
    let mut options = match &cli.config {
        Some(path) => read_config(path).map_err(|e| e.to_string())?,
        None => GenOptions::default(),
    };

    if let Some(bits) = cli.policy_bits {
        options.policies = PolicySet::from_bits(bits).map_err(|e| e.to_string())?;
    }
    if let Some(case) = cli.case {
        options.member_case = case.into();
    }
    if cli.strict_nulls {
        options.strict_nulls = true;
    }
    if let Some(suffix) = &cli.namespace_suffix {
        options.namespace_suffix.clone_from(suffix);
    }
    if let Some(base_uri) = &cli.base_uri {
        options.default_base_uri.clone_from(base_uri);
    }

    debug!(?options, "Resolved generation options.");
    Ok(options)
}

fn read_config(path: &Path) -> Result<GenOptions, GenError> {
    let text = fs::read_to_string(path)
        .map_err(|e| GenError::Config(format!("cannot read '{}': {e}", path.display())))?;
    toml::from_str(&text).map_err(|e| GenError::Config(format!("'{}': {e}", path.display())))
}
