//! Creating or regenerating the recipe for one gem.

use std::path::PathBuf;
use std::sync::Arc;

use gem_distro::DistroPackageProbe;
use gem_index::{Constraint, UpstreamIndex, VersionSet};
use gem_recipe::{Recipe, RecipeDiff, RecipeStore};

use crate::artifact::{Artifact, ArtifactFetcher};
use crate::config::Config;
use crate::deps::check_dependencies;
use crate::error::{Error, Result};
use crate::identity::MaintainerIdentity;
use crate::report::BlockReason;

/// Result of a `generate` call.
#[derive(Debug, Clone)]
pub struct Generated {
    pub path: PathBuf,
    pub recipe: Recipe,
    /// Set when a recipe already existed at `path`.
    pub diff: Option<RecipeDiff>,
    pub artifact_path: PathBuf,
    /// Dependency problems found; advisory for generation.
    pub warnings: Vec<BlockReason>,
}

pub struct Generator {
    config: Config,
    store: RecipeStore,
    index: Arc<dyn UpstreamIndex>,
    artifacts: Arc<dyn ArtifactFetcher>,
    identity: Arc<dyn MaintainerIdentity>,
}

impl Generator {
    pub fn new(
        config: Config,
        store: RecipeStore,
        index: Arc<dyn UpstreamIndex>,
        artifacts: Arc<dyn ArtifactFetcher>,
        identity: Arc<dyn MaintainerIdentity>,
    ) -> Self {
        Self {
            config,
            store,
            index,
            artifacts,
            identity,
        }
    }

    /// Write the recipe for the newest release of `gem`, pinned to `slot`
    /// when given, and download its artifact next to it.
    ///
    /// Hand-maintained parts of an existing recipe (maintainers,
    /// contributors, native dependencies, license when upstream declares
    /// none) are kept. Missing distro packages for dependencies only warn.
    pub async fn generate(
        &self,
        gem: &str,
        slot: Option<&str>,
        versions: &VersionSet,
        probe: &DistroPackageProbe,
    ) -> Result<Generated> {
        let family = match slot {
            Some(slot) => gem_index::slot_constraint(slot)?,
            None => Constraint::Any,
        };
        let version = versions
            .latest_matching(gem, &family)
            .cloned()
            .ok_or_else(|| Error::NoUpstreamRelease {
                gem: gem.to_string(),
                slot: slot.map(str::to_string),
            })?;
        let mut release = self.index.release(gem, &version).await?;

        let check = check_dependencies(&release, versions, probe, &self.config).await;
        for problem in &check.problems {
            tracing::warn!(gem, %problem, "dependency needs attention");
        }

        let path = self.store.path_for(gem, slot);
        let existing = match self.store.read_existing(&path)? {
            Some(text) => Some(Recipe::parse(&text)?),
            None => None,
        };

        let template = self.config.recipe_template()?;
        let artifact = Artifact::fetch(self.artifacts.as_ref(), &release, template.checksum_kind).await?;
        artifact.complete(&mut release);

        let mut recipe = Recipe::new_for_release(
            &release,
            slot,
            check.distro_names(),
            Some(artifact.checksum.clone()),
            &template,
        );

        let diff = match &existing {
            Some(previous) => {
                recipe.maintainers = previous.maintainers.clone();
                recipe.contributors = previous.contributors.clone();
                recipe.native_dependencies = previous.native_dependencies.clone();
                if recipe.licenses.is_empty() {
                    recipe.licenses = previous.licenses.clone();
                }
                Some(recipe.advance_release(previous))
            }
            None => None,
        };
        if recipe.maintainers.is_empty() {
            recipe.maintainers = self.default_maintainer().await.into_iter().collect();
        }

        let dir = self.store.dir_for(gem, slot);
        let artifact_path = artifact.save_into(&dir)?;
        self.store.write(&path, &recipe.render())?;
        tracing::info!(package = %recipe.package_name(), version = %recipe.gem_version, "generated recipe");

        Ok(Generated {
            path,
            recipe,
            diff,
            artifact_path,
            warnings: check.problems,
        })
    }

    async fn default_maintainer(&self) -> Option<String> {
        match self.identity.identity().await {
            Some(identity) => Some(identity),
            None => self.config.fallback_maintainer.clone(),
        }
    }
}
