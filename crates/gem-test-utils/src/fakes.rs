//! In-memory collaborators with call counters.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use gem_core::{ArtifactFetcher, PackageBuilder, VersionControl};
use gem_distro::{CommunityOverlay, DistroPackageInfo, OfficialRepository, Provenance, SourceAnswer};
use gem_index::{Constraint, Dependency, GemRelease, UpstreamIndex, Version, VersionSet};
use gem_recipe::{ChecksumKind, Recipe};

use crate::gem::gem_archive;

/// Shorthand for `Version::parse(s).unwrap()`.
pub fn v(s: &str) -> Version {
    Version::parse(s).unwrap()
}

/// A release of `name` with `(dependency, requirement)` pairs.
pub fn release(name: &str, version: &str, deps: &[(&str, &str)]) -> GemRelease {
    let mut release = GemRelease::new(name, v(version));
    release.summary = format!("The {name} gem");
    release.licenses = vec!["MIT".to_string()];
    for (dep, requirement) in deps {
        release = release.with_dependency(Dependency::new(
            *dep,
            Constraint::parse(requirement).unwrap(),
        ));
    }
    release.checksum = Some(FakeArtifacts::sha256_of(name, &v(version)));
    release
}

/// Upstream index over a fixed catalog.
#[derive(Default)]
pub struct FakeIndex {
    versions: VersionSet,
    releases: HashMap<(String, Version), GemRelease>,
    unavailable: bool,
    pub loads: AtomicUsize,
    pub release_calls: AtomicUsize,
}

impl FakeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish `release`, adding it to the catalog.
    pub fn with_release(mut self, release: GemRelease) -> Self {
        self.versions.insert(&release.name, release.version.clone());
        self.releases
            .insert((release.name.clone(), release.version.clone()), release);
        self
    }

    /// Catalog-only entries, for dependency gems whose metadata is never read.
    pub fn with_versions(mut self, name: &str, versions: &[&str]) -> Self {
        for version in versions {
            self.versions.insert(name, v(version));
        }
        self
    }

    /// Make `load_versions` fail as if the index were down.
    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    pub fn versions(&self) -> &VersionSet {
        &self.versions
    }
}

#[async_trait]
impl UpstreamIndex for FakeIndex {
    async fn load_versions(&self) -> gem_index::Result<VersionSet> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if self.unavailable {
            return Err(gem_index::Error::Index {
                url: "fake://versions".to_string(),
                status: 503,
            });
        }
        Ok(self.versions.clone())
    }

    async fn release(&self, name: &str, version: &Version) -> gem_index::Result<GemRelease> {
        self.release_calls.fetch_add(1, Ordering::SeqCst);
        self.releases
            .get(&(name.to_string(), version.clone()))
            .cloned()
            .ok_or_else(|| gem_index::Error::Index {
                url: format!("fake://{name}/{version}"),
                status: 404,
            })
    }
}

/// One distro package source, usable as either the official repository or
/// the community overlay.
#[derive(Clone, Default)]
pub struct FakeRepository {
    packages: HashMap<String, String>,
    failing: bool,
    calls: Arc<AtomicUsize>,
}

impl FakeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_package(mut self, name: &str, version: &str) -> Self {
        self.packages.insert(name.to_string(), version.to_string());
        self
    }

    /// Every query errors, as when the package database is locked.
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    /// Shared counter of queries answered so far.
    pub fn calls(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }

    fn answer(&self, package: &str, provenance: Provenance) -> gem_distro::Result<SourceAnswer> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(gem_distro::Error::Command {
                command: "fake".to_string(),
                message: "unavailable".to_string(),
            });
        }
        Ok(match self.packages.get(package) {
            Some(version) => SourceAnswer::Found(DistroPackageInfo {
                name: package.to_string(),
                version: version.clone(),
                provenance,
                info_url: format!("https://packages.invalid/{package}"),
            }),
            None => SourceAnswer::NotFound,
        })
    }
}

#[async_trait]
impl OfficialRepository for FakeRepository {
    fn name(&self) -> &str {
        "fake-official"
    }

    async fn query(&self, package: &str) -> gem_distro::Result<SourceAnswer> {
        self.answer(
            package,
            Provenance::Official {
                repository: "extra".to_string(),
                architecture: "any".to_string(),
            },
        )
    }
}

#[async_trait]
impl CommunityOverlay for FakeRepository {
    fn name(&self) -> &str {
        "fake-overlay"
    }

    async fn query(&self, package: &str) -> gem_distro::Result<SourceAnswer> {
        self.answer(package, Provenance::CommunityOverlay)
    }
}

/// Artifact downloads whose content is a pure-Ruby `.gem` derived from name
/// and version.
#[derive(Default)]
pub struct FakeArtifacts {
    overrides: HashMap<String, Vec<u8>>,
    pub downloads: AtomicUsize,
}

impl FakeArtifacts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `bytes` for this artifact instead of the derived content.
    pub fn with_content(mut self, name: &str, version: &str, bytes: &[u8]) -> Self {
        self.overrides
            .insert(format!("{name}-{version}"), bytes.to_vec());
        self
    }

    /// Serve a gem whose spec lists native `extensions`.
    pub fn with_extensions(self, name: &str, version: &str, extensions: &[&str]) -> Self {
        let bytes = gem_archive(name, version, extensions);
        self.with_content(name, version, &bytes)
    }

    pub fn content_of(name: &str, version: &Version) -> Vec<u8> {
        gem_archive(name, &version.to_string(), &[])
    }

    /// SHA-256 of the derived content.
    pub fn sha256_of(name: &str, version: &Version) -> String {
        gem_core::digest(ChecksumKind::Sha256, &Self::content_of(name, version))
            .unwrap_or_default()
    }
}

#[async_trait]
impl ArtifactFetcher for FakeArtifacts {
    async fn download(&self, name: &str, version: &Version) -> gem_core::Result<Vec<u8>> {
        self.downloads.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .overrides
            .get(&format!("{name}-{version}"))
            .cloned()
            .unwrap_or_else(|| Self::content_of(name, version)))
    }
}

/// Records every build request.
#[derive(Default)]
pub struct FakeBuilder {
    failing: bool,
    built: Mutex<Vec<(PathBuf, String)>>,
}

impl FakeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    /// `(directory, package name)` of every build so far.
    pub fn built(&self) -> Vec<(PathBuf, String)> {
        self.built.lock().map(|b| b.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl PackageBuilder for FakeBuilder {
    async fn build_and_upload(&self, dir: &Path, recipe: &Recipe) -> gem_core::Result<()> {
        if let Ok(mut built) = self.built.lock() {
            built.push((dir.to_path_buf(), recipe.package_name()));
        }
        if self.failing {
            return Err(gem_core::Error::Build {
                step: "makepkg -f".to_string(),
                message: "fake failure".to_string(),
            });
        }
        Ok(())
    }
}

/// Records stashes and commits instead of touching a repository.
#[derive(Default)]
pub struct FakeVersionControl {
    failing: bool,
    pub stashes: AtomicUsize,
    commits: Mutex<Vec<(PathBuf, String)>>,
}

impl FakeVersionControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every commit errors, as when the repository is locked.
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    /// `(path, message)` of every commit so far.
    pub fn commits(&self) -> Vec<(PathBuf, String)> {
        self.commits.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl VersionControl for FakeVersionControl {
    fn stash(&self) -> gem_core::Result<()> {
        self.stashes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn commit(&self, path: &Path, message: &str) -> gem_core::Result<()> {
        if self.failing {
            return Err(gem_core::Error::Repository {
                path: path.to_path_buf(),
                message: "fake failure".to_string(),
            });
        }
        if let Ok(mut commits) = self.commits.lock() {
            commits.push((path.to_path_buf(), message.to_string()));
        }
        Ok(())
    }
}
