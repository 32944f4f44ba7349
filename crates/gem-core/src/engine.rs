//! SyncEngine implementation
//!
//! The SyncEngine re-derives every known recipe from the current gem index
//! and distro state, and rewrites the recipes that drifted.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use gem_distro::DistroPackageProbe;
use gem_index::{UpstreamIndex, Version, VersionSet};
use gem_recipe::{Checksum, ChecksumKind, Recipe, RecipeStore};
use similar::TextDiff;

use crate::Result;
use crate::artifact::{Artifact, ArtifactFetcher};
use crate::build::PackageBuilder;
use crate::config::Config;
use crate::deps::check_dependencies;
use crate::report::{BlockReason, RecipeOutcome, RecipeStatus, SyncReport};
use crate::vcs::{VersionControl, bump_message};

/// Options for sync operations
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Compute every change but write nothing; outcomes carry a unified
    /// diff instead.
    pub dry_run: bool,
    /// Build and upload each updated recipe.
    pub build: bool,
}

/// Engine for synchronizing recipes with upstream
pub struct SyncEngine {
    config: Config,
    store: RecipeStore,
    index: Arc<dyn UpstreamIndex>,
    artifacts: Arc<dyn ArtifactFetcher>,
    builder: Option<Arc<dyn PackageBuilder>>,
    vcs: Option<Arc<dyn VersionControl>>,
}

impl SyncEngine {
    pub fn new(
        config: Config,
        store: RecipeStore,
        index: Arc<dyn UpstreamIndex>,
        artifacts: Arc<dyn ArtifactFetcher>,
    ) -> Self {
        Self {
            config,
            store,
            index,
            artifacts,
            builder: None,
            vcs: None,
        }
    }

    pub fn with_builder(mut self, builder: Arc<dyn PackageBuilder>) -> Self {
        self.builder = Some(builder);
        self
    }

    /// Stash before each run and commit every recipe that was written (and
    /// built, when building).
    pub fn with_version_control(mut self, vcs: Arc<dyn VersionControl>) -> Self {
        self.vcs = Some(vcs);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &RecipeStore {
        &self.store
    }

    /// Load the upstream catalog.
    ///
    /// # Errors
    ///
    /// Fails when the index cannot be loaded; that is the one condition that
    /// aborts a whole run.
    pub async fn load_versions(&self) -> Result<VersionSet> {
        Ok(self.index.load_versions().await?)
    }

    /// Discover every recipe under the store root and synchronize it.
    pub async fn sync_all(
        &self,
        probe: &DistroPackageProbe,
        options: &SyncOptions,
    ) -> Result<SyncReport> {
        let versions = self.load_versions().await?;
        let recipes = self.store.discover()?;
        if !options.dry_run
            && let Some(vcs) = &self.vcs
        {
            vcs.stash()?;
        }
        Ok(self.run(&recipes, &versions, probe, options).await)
    }

    /// Synchronize `recipes` one after another. Problems with one recipe are
    /// recorded in its outcome and never stop the run.
    pub async fn run(
        &self,
        recipes: &[PathBuf],
        versions: &VersionSet,
        probe: &DistroPackageProbe,
        options: &SyncOptions,
    ) -> SyncReport {
        let mut report = SyncReport::default();
        for path in recipes {
            let outcome = self.sync_recipe(path, versions, probe, options).await;
            tracing::debug!(
                recipe = %outcome.display_name(),
                status = outcome.status.label(),
                "recipe synchronized"
            );
            report.outcomes.push(outcome);
        }
        tracing::info!(%report, "sync finished");
        report
    }

    async fn sync_recipe(
        &self,
        path: &Path,
        versions: &VersionSet,
        probe: &DistroPackageProbe,
        options: &SyncOptions,
    ) -> RecipeOutcome {
        let failed = |error: String| RecipeOutcome::new(path, RecipeStatus::Failed { error });

        let text = match self.store.read(path) {
            Ok(text) => text,
            Err(e) => return failed(e.to_string()),
        };
        let current = match Recipe::parse(&text) {
            Ok(recipe) => recipe,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping unreadable recipe");
                return failed(e.to_string());
            }
        };

        let package = current.package_name();
        let outcome = |status| RecipeOutcome::new(path, status).with_package(&package);

        let latest = match upstream_version(&current, versions) {
            Ok(Some(version)) => version,
            Ok(None) => {
                tracing::warn!(package = %package, "no upstream release");
                return outcome(RecipeStatus::Skipped {
                    reason: "no upstream release".to_string(),
                });
            }
            Err(e) => return outcome(RecipeStatus::Failed { error: e.to_string() }),
        };

        let mut release = match self.index.release(&current.gem_name, &latest).await {
            Ok(release) => release,
            Err(e @ gem_index::Error::UnsupportedConstraint { .. }) => {
                return self.blocked(
                    outcome,
                    &package,
                    vec![BlockReason::UnsupportedConstraint {
                        detail: e.to_string(),
                    }],
                );
            }
            Err(e) => return outcome(RecipeStatus::Failed { error: e.to_string() }),
        };

        let check = check_dependencies(&release, versions, probe, &self.config).await;
        if !check.is_clean() {
            return self.blocked(outcome, &package, check.problems);
        }

        let mut next = current.clone();
        next.gem_version = release.version.clone();
        next.generated_dependencies = check.distro_names();
        let diff = next.advance_release(&current);
        if diff.is_empty() {
            return outcome(RecipeStatus::Unchanged);
        }

        if diff.version_changed {
            let kind = match self.checksum_kind_for(&current) {
                Ok(kind) => kind,
                Err(e) => return outcome(RecipeStatus::Failed { error: e.to_string() }),
            };
            let artifact = match Artifact::fetch(self.artifacts.as_ref(), &release, kind).await {
                Ok(artifact) => artifact,
                Err(e) => return outcome(RecipeStatus::Failed { error: e.to_string() }),
            };
            artifact.complete(&mut release);
            next.refresh_from_release(&release);
            next.checksum = Some(Checksum::single(kind, artifact.checksum));
        }

        let rendered = next.render();
        let mut result = outcome(RecipeStatus::Updated { diff });

        if options.dry_run {
            result.patch = Some(unified_diff(path, &text, &rendered));
            return result;
        }

        if let Err(e) = self.store.write(path, &rendered) {
            return outcome(RecipeStatus::Failed { error: e.to_string() });
        }
        tracing::info!(
            package = %package,
            from = %current.gem_version,
            to = %next.gem_version,
            release = next.release,
            "updated recipe"
        );

        if options.build
            && let Some(builder) = &self.builder
            && let Some(dir) = path.parent()
            && let Err(e) = builder.build_and_upload(dir, &next).await
        {
            tracing::warn!(package = %package, error = %e, "build failed");
            result.build_error = Some(e.to_string());
        }

        // a recipe that failed to build stays uncommitted for a retry
        if result.build_error.is_none()
            && let Some(vcs) = &self.vcs
        {
            let message = bump_message(&package, &next.gem_version.to_string(), next.release);
            if let Err(e) = vcs.commit(path, &message) {
                tracing::warn!(package = %package, error = %e, "commit failed");
                result.commit_error = Some(e.to_string());
            }
        }

        result
    }

    fn blocked(
        &self,
        outcome: impl FnOnce(RecipeStatus) -> RecipeOutcome,
        package: &str,
        reasons: Vec<BlockReason>,
    ) -> RecipeOutcome {
        for reason in &reasons {
            tracing::warn!(package, %reason, "recipe blocked");
        }
        outcome(RecipeStatus::Blocked { reasons })
    }

    /// Keep the recipe's own checksum kind when it is one we can compute.
    fn checksum_kind_for(&self, recipe: &Recipe) -> Result<ChecksumKind> {
        match recipe.checksum.as_ref().map(|c| c.kind) {
            Some(kind @ (ChecksumKind::Sha256 | ChecksumKind::Sha512)) => Ok(kind),
            _ => self.config.checksum_kind(),
        }
    }
}

/// Newest release of the recipe's gem, within its slot family if slotted.
fn upstream_version(recipe: &Recipe, versions: &VersionSet) -> Result<Option<Version>> {
    let latest = match recipe.slot.as_deref() {
        Some(slot) => {
            let family = gem_index::slot_constraint(slot)?;
            versions.latest_matching(&recipe.gem_name, &family)
        }
        None => versions.latest(&recipe.gem_name),
    };
    Ok(latest.cloned())
}

fn unified_diff(path: &Path, old: &str, new: &str) -> String {
    let name = path.display().to_string();
    TextDiff::from_lines(old, new)
        .unified_diff()
        .context_radius(3)
        .header(&name, &name)
        .to_string()
}
