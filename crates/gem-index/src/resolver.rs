//! Mapping gem dependencies onto slotted distribution package names.
//!
//! The plain distribution package (`ruby-bar`) is assumed to track the newest
//! release of a gem. When a dependency can only be met by an older release,
//! the package name gets a *slot* suffix: the shortest version prefix that the
//! chosen release shares with nothing newer, e.g. `ruby-bar-2.1`.

use crate::catalog::VersionSet;
use crate::constraint::Constraint;
use crate::error::{Error, Result};
use crate::release::Dependency;
use crate::version::Version;

/// A dependency pinned to a concrete release and distribution package name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDependency {
    pub original: Dependency,
    pub chosen_version: Version,
    pub slot: Option<String>,
    pub distro_name: String,
}

/// Picks the best release for a dependency and derives its package name.
#[derive(Debug, Clone, Copy)]
pub struct SlotResolver<'a> {
    versions: &'a VersionSet,
    prefix: &'a str,
}

impl<'a> SlotResolver<'a> {
    /// `prefix` is the distribution namespace for gems, usually `ruby`.
    pub fn new(versions: &'a VersionSet, prefix: &'a str) -> Self {
        Self { versions, prefix }
    }

    /// Resolve `dependency` against the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsatisfiable`] if no release meets the constraint.
    pub fn resolve(&self, dependency: &Dependency) -> Result<ResolvedDependency> {
        let all = self.versions.versions(&dependency.name);

        let index = all
            .iter()
            .rposition(|v| dependency.constraint.satisfies(v))
            .ok_or_else(|| Error::Unsatisfiable {
                dependency: dependency.to_string(),
            })?;

        let chosen = &all[index];
        // Newest release: the unslotted package covers it.
        let slot = all.get(index + 1).map(|next| slot_suffix(chosen, next));

        tracing::debug!(
            dependency = %dependency,
            chosen = %chosen,
            slot = slot.as_deref().unwrap_or("-"),
            "resolved gem dependency"
        );

        Ok(ResolvedDependency {
            distro_name: distro_name(self.prefix, &dependency.name, slot.as_deref()),
            original: dependency.clone(),
            chosen_version: chosen.clone(),
            slot,
        })
    }
}

/// Shortest prefix of `chosen` that `next` does not share.
///
/// Equal leading components are copied with their separator; the first
/// differing component of `chosen` ends the suffix. If `chosen` runs out of
/// components first, the suffix is what was shared so far.
pub fn slot_suffix(chosen: &Version, next: &Version) -> String {
    let (a, b) = (chosen.segments(), next.segments());
    let mut suffix = String::new();

    for i in 0.. {
        match (a.get(i), b.get(i)) {
            (Some(x), Some(y)) if x == y => {
                suffix.push_str(&x.to_string());
                suffix.push('.');
            }
            (Some(x), _) => {
                suffix.push_str(&x.to_string());
                break;
            }
            (None, _) => {
                suffix.pop();
                break;
            }
        }
    }

    suffix
}

/// Distribution package name for a gem, optionally slotted.
pub fn distro_name(prefix: &str, gem: &str, slot: Option<&str>) -> String {
    match slot {
        Some(slot) => format!("{prefix}-{gem}-{slot}"),
        None => format!("{prefix}-{gem}"),
    }
}

/// The constraint that pins a slotted package to its release family:
/// `~> <slot>.0`.
pub fn slot_constraint(slot: &str) -> Result<Constraint> {
    let version = Version::parse(&format!("{slot}.0"))?;
    Ok(Constraint::Pessimistic(version))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn test_slot_suffix_examples() {
        assert_eq!(slot_suffix(&v("2.1"), &v("2.2")), "2.1");
        assert_eq!(slot_suffix(&v("2.1.0"), &v("2.2.0")), "2.1");
        assert_eq!(slot_suffix(&v("1"), &v("1.0.1")), "1");
        assert_eq!(slot_suffix(&v("1.2.3"), &v("1.2.4")), "1.2.3");
        assert_eq!(slot_suffix(&v("3.9"), &v("4.0")), "3");
    }

    #[test]
    fn test_distro_name() {
        assert_eq!(distro_name("ruby", "bar", None), "ruby-bar");
        assert_eq!(distro_name("ruby", "bar", Some("2.1")), "ruby-bar-2.1");
    }

    #[test]
    fn test_slot_constraint() {
        let c = slot_constraint("2.1").unwrap();
        assert!(c.satisfies(&v("2.1.9")));
        assert!(!c.satisfies(&v("2.2")));
        assert!(slot_constraint("x").is_err());
    }

    #[test]
    fn test_unknown_gem_is_unsatisfiable() {
        let set = VersionSet::new();
        let resolver = SlotResolver::new(&set, "ruby");
        let err = resolver.resolve(&Dependency::any("ghost")).unwrap_err();
        assert!(matches!(err, Error::Unsatisfiable { .. }));
    }
}
