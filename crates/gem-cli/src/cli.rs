//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// gembridge - Keep Arch packages of Ruby gems in step with RubyGems
#[derive(Parser, Debug)]
#[command(name = "gembridge")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (defaults to <root>/gembridge.toml, then the user config)
    #[arg(long, global = true, env = "GEMBRIDGE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory holding the <prefix>-<gem> recipe directories
    #[arg(long, global = true, default_value = ".")]
    pub root: PathBuf,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Re-derive every recipe under the root and rewrite the ones that drifted
    ///
    /// Blocked recipes are reported but never modified.
    Sync {
        /// Show what would change without writing anything
        #[arg(long)]
        dry_run: bool,

        /// Build and upload each updated package
        #[arg(long, conflicts_with = "dry_run")]
        build: bool,

        /// Stash local changes first, then commit each updated recipe
        /// (after a successful build, when building)
        #[arg(long, conflicts_with = "dry_run")]
        commit: bool,
    },

    /// Create or regenerate the recipe for one gem
    ///
    /// Examples:
    ///   gembridge generate rack          # newest rack as ruby-rack
    ///   gembridge generate rack 2        # newest rack 2.x as ruby-rack-2
    Generate {
        /// Gem name
        gem: String,

        /// Version slot, e.g. `2.1` for the ruby-<gem>-2.1 package
        slot: Option<String>,
    },
}
