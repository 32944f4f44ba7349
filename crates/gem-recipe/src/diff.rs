//! Drift between two recipe values and the release-counter rules.

use crate::recipe::Recipe;

/// What changed between a recipe on disk and its re-derived successor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecipeDiff {
    pub deps_changed: bool,
    pub version_changed: bool,
}

impl RecipeDiff {
    pub fn between(old: &Recipe, new: &Recipe) -> Self {
        Self {
            deps_changed: old.depends() != new.depends(),
            version_changed: old.gem_version != new.gem_version,
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.deps_changed && !self.version_changed
    }
}

impl Recipe {
    /// Set `release` from `previous` and return the diff that decided it.
    ///
    /// A version change resets the counter to 1; a dependency-only change
    /// bumps the previous counter by one; otherwise the previous counter is
    /// kept.
    pub fn advance_release(&mut self, previous: &Recipe) -> RecipeDiff {
        let diff = RecipeDiff::between(previous, self);
        self.release = if diff.version_changed {
            1
        } else if diff.deps_changed {
            previous.release.saturating_add(1)
        } else {
            previous.release
        };
        diff
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gem_index::Version;

    fn recipe(version: &str, release: u32, deps: &[&str]) -> Recipe {
        let mut r = Recipe::new("ruby", "foo", Version::parse(version).unwrap());
        r.release = release;
        r.native_dependencies = vec!["ruby".to_string()];
        r.generated_dependencies = deps.iter().map(|d| d.to_string()).collect();
        r
    }

    #[test]
    fn test_unchanged_keeps_release() {
        let old = recipe("1.0", 3, &["ruby-bar"]);
        let mut new = recipe("1.0", 1, &["ruby-bar"]);
        let diff = new.advance_release(&old);
        assert!(diff.is_empty());
        assert_eq!(new.release, 3);
    }

    #[test]
    fn test_padded_versions_are_not_a_change() {
        let old = recipe("1.0", 2, &[]);
        let new = recipe("1", 1, &[]);
        assert!(!RecipeDiff::between(&old, &new).version_changed);
    }

    #[test]
    fn test_dependency_order_counts_as_change() {
        let old = recipe("1.0", 1, &["ruby-a", "ruby-b"]);
        let new = recipe("1.0", 1, &["ruby-b", "ruby-a"]);
        assert!(RecipeDiff::between(&old, &new).deps_changed);
    }
}
