//! gembridge CLI
//!
//! Keeps a tree of Arch recipes for Ruby gems in step with rubygems.org.

mod cli;
mod commands;
mod context;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use context::Context;
use error::Result;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let context = Context::load(&cli.root, cli.config.as_deref())?;
    match cli.command {
        Commands::Sync {
            dry_run,
            build,
            commit,
        } => commands::run_sync(&context, dry_run, build, commit).await,
        Commands::Generate { gem, slot } => {
            commands::run_generate(&context, &gem, slot.as_deref()).await
        }
    }
}

/// `RUST_LOG` wins; otherwise warnings, or debug output with `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .try_init();
    tracing::debug!("verbose mode enabled");
}
