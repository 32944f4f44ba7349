//! Per-recipe outcomes of a synchronization run.

use std::fmt;
use std::path::PathBuf;

use gem_recipe::RecipeDiff;

/// Why a recipe could not be regenerated safely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockReason {
    /// No published release satisfies the dependency.
    Unsatisfiable { dependency: String },
    /// The release declares a requirement outside the supported grammar.
    UnsupportedConstraint { detail: String },
    /// The dependency's distro package was not found; `inconclusive` when
    /// the lookup failed or timed out rather than answering "no".
    PackageAbsent { package: String, inconclusive: bool },
    /// The distro package exists but its version does not meet the gem
    /// requirement.
    VersionMismatch {
        package: String,
        published: String,
        requirement: String,
    },
}

impl fmt::Display for BlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockReason::Unsatisfiable { dependency } => {
                write!(f, "no release satisfies {dependency}")
            }
            BlockReason::UnsupportedConstraint { detail } => f.write_str(detail),
            BlockReason::PackageAbsent {
                package,
                inconclusive: false,
            } => write!(f, "{package} is not packaged"),
            BlockReason::PackageAbsent {
                package,
                inconclusive: true,
            } => write!(f, "{package} lookup was inconclusive"),
            BlockReason::VersionMismatch {
                package,
                published,
                requirement,
            } => write!(f, "{package} {published} does not satisfy {requirement}"),
        }
    }
}

/// Final state of one recipe after a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipeStatus {
    Updated { diff: RecipeDiff },
    Unchanged,
    Blocked { reasons: Vec<BlockReason> },
    /// No upstream release for the recipe's gem (or slot).
    Skipped { reason: String },
    Failed { error: String },
}

impl RecipeStatus {
    pub fn label(&self) -> &'static str {
        match self {
            RecipeStatus::Updated { .. } => "updated",
            RecipeStatus::Unchanged => "unchanged",
            RecipeStatus::Blocked { .. } => "blocked",
            RecipeStatus::Skipped { .. } => "skipped",
            RecipeStatus::Failed { .. } => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeOutcome {
    pub path: PathBuf,
    /// Distro package name, once the recipe parsed.
    pub package: Option<String>,
    pub status: RecipeStatus,
    /// Unified diff of the change; set on dry runs.
    pub patch: Option<String>,
    /// Set when the post-update build or upload failed.
    pub build_error: Option<String>,
    /// Set when the updated recipe could not be committed.
    pub commit_error: Option<String>,
}

impl RecipeOutcome {
    pub fn new(path: impl Into<PathBuf>, status: RecipeStatus) -> Self {
        Self {
            path: path.into(),
            package: None,
            status,
            patch: None,
            build_error: None,
            commit_error: None,
        }
    }

    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = Some(package.into());
        self
    }

    /// Package name, or the path when the recipe never parsed.
    pub fn display_name(&self) -> String {
        self.package
            .clone()
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Report from a sync run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub outcomes: Vec<RecipeOutcome>,
}

impl SyncReport {
    fn count(&self, pred: impl Fn(&RecipeStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.status)).count()
    }

    pub fn updated(&self) -> usize {
        self.count(|s| matches!(s, RecipeStatus::Updated { .. }))
    }

    pub fn unchanged(&self) -> usize {
        self.count(|s| matches!(s, RecipeStatus::Unchanged))
    }

    pub fn blocked(&self) -> usize {
        self.count(|s| matches!(s, RecipeStatus::Blocked { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, RecipeStatus::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, RecipeStatus::Failed { .. }))
    }

    /// True when any recipe failed; blocked and skipped recipes do not count.
    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }

    pub fn build_failures(&self) -> usize {
        self.outcomes.iter().filter(|o| o.build_error.is_some()).count()
    }

    pub fn commit_failures(&self) -> usize {
        self.outcomes.iter().filter(|o| o.commit_error.is_some()).count()
    }
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} updated, {} unchanged, {} blocked, {} skipped, {} failed",
            self.updated(),
            self.unchanged(),
            self.blocked(),
            self.skipped(),
            self.failed()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_and_failures() {
        let report = SyncReport {
            outcomes: vec![
                RecipeOutcome::new("a", RecipeStatus::Unchanged),
                RecipeOutcome::new("b", RecipeStatus::Blocked { reasons: vec![] }),
                RecipeOutcome::new(
                    "c",
                    RecipeStatus::Updated {
                        diff: RecipeDiff::default(),
                    },
                ),
            ],
        };
        assert_eq!(report.updated(), 1);
        assert_eq!(report.blocked(), 1);
        assert!(!report.has_failures());
        assert_eq!(
            report.to_string(),
            "1 updated, 1 unchanged, 1 blocked, 0 skipped, 0 failed"
        );
    }
}
