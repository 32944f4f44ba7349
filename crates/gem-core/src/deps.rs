//! Resolve a release's runtime dependencies and confirm each distro package.

use gem_distro::{DistroPackageProbe, ProbeOutcome};
use gem_index::{GemRelease, ResolvedDependency, SlotResolver, Version, VersionSet};

use crate::config::Config;
use crate::report::BlockReason;

/// Resolution of every packaged dependency of one release.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyCheck {
    pub resolved: Vec<ResolvedDependency>,
    pub problems: Vec<BlockReason>,
}

impl DependencyCheck {
    pub fn is_clean(&self) -> bool {
        self.problems.is_empty()
    }

    /// Distro package names in declaration order, without repeats.
    pub fn distro_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::with_capacity(self.resolved.len());
        for dep in &self.resolved {
            if !names.contains(&dep.distro_name) {
                names.push(dep.distro_name.clone());
            }
        }
        names
    }
}

/// Resolve each runtime dependency of `release` that is not excluded, then
/// ask the probe for its distro package and check the published version
/// against the gem requirement.
pub async fn check_dependencies(
    release: &GemRelease,
    versions: &VersionSet,
    probe: &DistroPackageProbe,
    config: &Config,
) -> DependencyCheck {
    let resolver = SlotResolver::new(versions, &config.distro_prefix);
    let mut check = DependencyCheck::default();

    for dependency in &release.runtime_dependencies {
        if config.is_excluded(&dependency.name) {
            tracing::debug!(gem = %dependency.name, "skipping excluded dependency");
            continue;
        }

        let resolved = match resolver.resolve(dependency) {
            Ok(resolved) => resolved,
            Err(e) => {
                tracing::debug!(error = %e, "dependency did not resolve");
                check.problems.push(BlockReason::Unsatisfiable {
                    dependency: dependency.to_string(),
                });
                continue;
            }
        };

        match probe
            .lookup(&resolved.distro_name, Some(&resolved.chosen_version))
            .await
        {
            ProbeOutcome::Absent { inconclusive } => {
                check.problems.push(BlockReason::PackageAbsent {
                    package: resolved.distro_name.clone(),
                    inconclusive,
                });
            }
            ProbeOutcome::Present(info) => {
                let satisfied = Version::parse(&info.version)
                    .is_ok_and(|published| dependency.constraint.satisfies(&published));
                if !satisfied {
                    check.problems.push(BlockReason::VersionMismatch {
                        package: info.name.clone(),
                        published: info.version.clone(),
                        requirement: dependency.constraint.to_string(),
                    });
                }
            }
        }

        check.resolved.push(resolved);
    }

    check
}
