//! `clientgen` binary: generate a TypeScript client from a model snapshot.

fn main() {
    clientgen_cli::init_tracing();
    std::process::exit(clientgen_cli::run_cli(std::env::args_os()));
}
