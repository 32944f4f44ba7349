//! Per-invocation wiring of configuration and collaborators

use std::path::{Path, PathBuf};
use std::sync::Arc;

use gem_core::{Config, RubyGemsArtifacts};
use gem_distro::{AurClient, DistroPackageProbe, PacmanRepository};
use gem_index::RubyGemsIndex;
use gem_recipe::RecipeStore;

use crate::error::{CliError, Result};

/// Configuration and root for one command.
#[derive(Debug, Clone)]
pub struct Context {
    pub root: PathBuf,
    pub config: Config,
}

impl Context {
    pub fn load(root: &Path, config: Option<&Path>) -> Result<Self> {
        if !root.is_dir() {
            return Err(CliError::user(format!(
                "recipe root {} is not a directory",
                root.display()
            )));
        }
        let config = Config::discover(config, root)?;
        tracing::debug!(?config, "configuration resolved");
        Ok(Self {
            root: root.to_path_buf(),
            config,
        })
    }

    pub fn store(&self) -> RecipeStore {
        RecipeStore::new(&self.root, &self.config.distro_prefix)
    }

    pub fn index(&self) -> Arc<RubyGemsIndex> {
        Arc::new(RubyGemsIndex::new(self.config.rubygems_url.clone()))
    }

    pub fn artifacts(&self) -> Arc<RubyGemsArtifacts> {
        Arc::new(RubyGemsArtifacts::new(self.config.rubygems_url.clone()))
    }

    /// A fresh probe, so the lookup cache lives exactly as long as one run.
    pub fn probe(&self) -> DistroPackageProbe {
        DistroPackageProbe::new(
            Box::new(PacmanRepository::new(self.config.pacman_command.clone())),
            Box::new(AurClient::new(self.config.aur_url.clone())),
        )
        .with_timeout(self.config.probe_timeout())
    }
}
