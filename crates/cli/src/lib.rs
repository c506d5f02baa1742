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

//! Command-line front end of the client generator.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser, ValueEnum};
use clientgen_core::{CaseConvention, Snapshot, generate};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

mod config;
mod output;

pub use config::load_options;
pub use output::{render_diff, write_atomic};

/// Generate a typed TypeScript client from a backend model snapshot
#[derive(Parser, Debug, Clone)]
#[command(name = "clientgen", version)]
pub struct Cli {
    /// Model snapshot (JSON) describing the backend's types and actions
    #[arg(value_name = "MODEL")]
    pub model: Option<PathBuf>,

    /// TypeScript file to write
    #[arg(value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// Cherry-picking policy mask: 0 = all members, 1 = contract opt-in,
    /// 2 = library annotations, 4 = legacy opt-out, 8 = validation opt-out
    #[arg(value_name = "POLICY_BITS")]
    pub policy_bits: Option<u32>,

    /// TOML file with generation options; flags override its values
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Case convention for generated field names
    #[arg(long = "case", value_enum, value_name = "CASE")]
    pub case: Option<CaseArg>,

    /// Emit `| null` on optional and nullable fields
    #[arg(long)]
    pub strict_nulls: bool,

    /// Suffix appended to backend namespaces (default `_Client`)
    #[arg(long, value_name = "SUFFIX")]
    pub namespace_suffix: Option<String>,

    /// Default base URI of the generated client classes
    #[arg(long, value_name = "URI")]
    pub base_uri: Option<String>,

    /// Compare with the existing OUTPUT instead of writing it; exit 1 and
    /// print a diff when they differ
    #[arg(long)]
    pub check: bool,
}

/// Field name case convention.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseArg {
    /// Keep the backend's spelling
    Original,
    /// `givenName`
    Camel,
    /// `GivenName`
    Pascal,
}

impl From<CaseArg> for CaseConvention {
    fn from(arg: CaseArg) -> Self {
        match arg {
            CaseArg::Original => CaseConvention::Original,
            CaseArg::Camel => CaseConvention::Camel,
            CaseArg::Pascal => CaseConvention::Pascal,
        }
    }
}

/// Parse arguments (program name first) and run. Returns the exit code.
pub fn run_cli<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => run(&cli),
        Err(e) => {
            let code = e.exit_code();
            let _ = e.print();
            code
        }
    }
}

/// Result of one invocation that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The output file was (re)written.
    Written,
    /// `--check`: the output file is up to date.
    UpToDate,
    /// `--check`: the output file differs; carries the diff.
    Stale(String),
}

/// Run a parsed invocation. Prints usage when a positional is missing.
pub fn run(cli: &Cli) -> i32 {
    if cli.model.is_none() || cli.output.is_none() {
        let mut cmd = Cli::command();
        let _ = cmd.print_help();
        println!();
        return 0;
    }

    match execute(cli) {
        Ok(Outcome::Written | Outcome::UpToDate) => 0,
        Ok(Outcome::Stale(diff)) => {
            print!("{diff}");
            1
        }
        Err(err) => {
            eprintln!("{err}");
            1
        }
    }
}

/// Generate the client for `cli`, then write or check the output file.
pub fn execute(cli: &Cli) -> Result<Outcome, String> {
    let (Some(model), Some(output)) = (&cli.model, &cli.output) else {
        return Err("MODEL and OUTPUT are required".into());
    };

    let options = load_options(cli)?;
    let snapshot = Snapshot::load(model).map_err(|e| e.to_string())?;
    let code = generate(&snapshot, &options).map_err(|e| e.to_string())?;

    if cli.check {
        let existing = read_existing(output)?;
        return Ok(match render_diff(&output.display().to_string(), &existing, &code) {
            None => {
                debug!(path = %output.display(), "Generated client is up to date.");
                Outcome::UpToDate
            }
            Some(diff) => Outcome::Stale(diff),
        });
    }

    write_atomic(output, &code)?;
    info!(
        path = %output.display(),
        bytes = code.len(),
        "Wrote generated client."
    );
    Ok(Outcome::Written)
}

/// Current contents of the output file; a missing file reads as empty.
fn read_existing(path: &Path) -> Result<String, String> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(contents),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(format!("Failed to read {}: {e}", path.display())),
    }
}

/// Install the stderr tracing subscriber.
///
/// CLIENTGEN_LOG controls log level: "trace", "debug", "info", "warn", "error"
/// or a full tracing filter spec like "clientgen_core=trace".
pub fn init_tracing() {
    let crates = [module_path!(), "clientgen_core"];

    let filter = match std::env::var("CLIENTGEN_LOG") {
        Ok(level) if is_plain_level(&level) => crates
            .iter()
            .map(|c| format!("{c}={level}"))
            .collect::<Vec<_>>()
            .join(","),
        Ok(spec) => spec,
        Err(_) => crates
            .iter()
            .map(|c| format!("{c}=info"))
            .collect::<Vec<_>>()
            .join(","),
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_target(true)
        .with_filter(EnvFilter::new(filter));

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

fn is_plain_level(s: &str) -> bool {
    matches!(
        s.to_ascii_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    )
}
