//! The set of all released gem versions known to the upstream index.

use std::collections::BTreeMap;

use crate::constraint::Constraint;
use crate::version::Version;

/// One published (name, version) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry<'a> {
    pub name: &'a str,
    pub version: &'a Version,
}

/// Released versions partitioned by gem name, each partition sorted ascending
/// with no duplicates.
///
/// Built once per run from the upstream index and then only read.
#[derive(Debug, Clone, Default)]
pub struct VersionSet {
    gems: BTreeMap<String, Vec<Version>>,
}

impl VersionSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a release, keeping the partition sorted. Duplicates are ignored.
    pub fn insert(&mut self, name: impl Into<String>, version: Version) {
        let versions = self.gems.entry(name.into()).or_default();
        if let Err(at) = versions.binary_search(&version) {
            versions.insert(at, version);
        }
    }

    /// Remove a release (a yank). Returns whether it was present.
    pub fn remove(&mut self, name: &str, version: &Version) -> bool {
        let Some(versions) = self.gems.get_mut(name) else {
            return false;
        };
        let Ok(at) = versions.binary_search(version) else {
            return false;
        };
        versions.remove(at);
        if versions.is_empty() {
            self.gems.remove(name);
        }
        true
    }

    /// All released versions of `name`, ascending.
    pub fn versions(&self, name: &str) -> &[Version] {
        self.gems.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// Newest released version of `name`.
    pub fn latest(&self, name: &str) -> Option<&Version> {
        self.versions(name).last()
    }

    /// Newest released version of `name` that satisfies `constraint`.
    pub fn latest_matching(&self, name: &str, constraint: &Constraint) -> Option<&Version> {
        self.versions(name)
            .iter()
            .rev()
            .find(|v| constraint.satisfies(v))
    }

    /// Whether any release of `name` is known.
    pub fn contains(&self, name: &str) -> bool {
        self.gems.contains_key(name)
    }

    /// Number of distinct gem names.
    pub fn gem_count(&self) -> usize {
        self.gems.len()
    }

    /// Total number of (name, version) entries.
    pub fn len(&self) -> usize {
        self.gems.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.gems.is_empty()
    }

    /// Iterate every entry, by name then version.
    pub fn entries(&self) -> impl Iterator<Item = CatalogEntry<'_>> {
        self.gems.iter().flat_map(|(name, versions)| {
            versions.iter().map(move |version| CatalogEntry {
                name: name.as_str(),
                version,
            })
        })
    }
}

impl<S: Into<String>> FromIterator<(S, Version)> for VersionSet {
    fn from_iter<I: IntoIterator<Item = (S, Version)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (name, version) in iter {
            set.insert(name, version);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn test_insert_keeps_sorted_and_unique() {
        let mut set = VersionSet::new();
        set.insert("bar", v("2.2"));
        set.insert("bar", v("2.1"));
        set.insert("bar", v("2.1.5"));
        set.insert("bar", v("2.1.0"));

        let versions: Vec<String> = set.versions("bar").iter().map(ToString::to_string).collect();
        assert_eq!(versions, vec!["2.1", "2.1.5", "2.2"]);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_remove_drops_empty_partition() {
        let mut set: VersionSet = [("foo", v("1.0"))].into_iter().collect();
        assert!(set.remove("foo", &v("1.0")));
        assert!(!set.contains("foo"));
        assert!(!set.remove("foo", &v("1.0")));
    }

    #[test]
    fn test_latest_matching() {
        let set: VersionSet = [("bar", v("2.1")), ("bar", v("2.1.5")), ("bar", v("3.0"))]
            .into_iter()
            .collect();
        let c = Constraint::Pessimistic(v("2.1"));
        assert_eq!(set.latest("bar"), Some(&v("3.0")));
        assert_eq!(set.latest_matching("bar", &c), Some(&v("2.1.5")));
        assert_eq!(set.latest_matching("nope", &c), None);
    }

    #[test]
    fn test_entries_iterates_in_order() {
        let set: VersionSet = [("b", v("1")), ("a", v("2")), ("a", v("1"))].into_iter().collect();
        let flat: Vec<(String, String)> = set
            .entries()
            .map(|e| (e.name.to_string(), e.version.to_string()))
            .collect();
        assert_eq!(
            flat,
            vec![
                ("a".to_string(), "1".to_string()),
                ("a".to_string(), "2".to_string()),
                ("b".to_string(), "1".to_string()),
            ]
        );
    }
}
