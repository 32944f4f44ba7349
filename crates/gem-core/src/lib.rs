//! Recipe synchronization and generation for gembridge
//!
//! This crate ties the gem index, the distro probe and the recipe store
//! together:
//!
//! - **SyncEngine**: re-derive every recipe and rewrite the ones that drifted
//! - **Generator**: create or regenerate the recipe of one gem
//! - **Config**: `gembridge.toml` with defaults for every field
//! - **Collaborators**: artifact downloads, package builds, maintainer identity,
//!   version control
//!
//! # Architecture
//!
//! ```text
//!                 gem-cli
//!                    |
//!                 gem-core
//!                    |
//!     +--------------+--------------+
//!     |              |              |
//! gem-index     gem-distro     gem-recipe
//! ```

pub mod artifact;
pub mod build;
pub mod config;
pub mod deps;
pub mod engine;
pub mod error;
pub mod gemspec;
pub mod generate;
pub mod identity;
pub mod report;
pub mod vcs;

pub use artifact::{Artifact, ArtifactFetcher, RubyGemsArtifacts, digest};
pub use build::{MakepkgBuilder, PackageBuilder, source_tarball};
pub use config::{CONFIG_FILENAME, Config, user_config_path};
pub use deps::{DependencyCheck, check_dependencies};
pub use engine::{SyncEngine, SyncOptions};
pub use error::{Error, Result};
pub use gemspec::GemSpec;
pub use generate::{Generated, Generator};
pub use identity::{GitIdentity, MaintainerIdentity, StaticIdentity};
pub use report::{BlockReason, RecipeOutcome, RecipeStatus, SyncReport};
pub use vcs::{GitVersionControl, VersionControl, bump_message};
