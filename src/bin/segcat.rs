//! segcat CLI binary.

use std::process;

use anyhow::Context;
use clap::Parser;
use segcat::cli::{args::SegcatArgs, commands::execute_command};
use tracing_subscriber::EnvFilter;

fn main() {
    let args = SegcatArgs::parse();

    // RUST_LOG wins over the verbosity flags when it is set.
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(args) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(args: SegcatArgs) -> anyhow::Result<()> {
    let command = args.command.name();
    execute_command(args).with_context(|| format!("segcat {command} failed"))
}
