//! What a distribution source knows about a package.

use std::fmt;

/// Where a distribution package is published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provenance {
    /// An official binary repository (`extra`, `core`, ...).
    Official {
        repository: String,
        architecture: String,
    },
    /// The community-maintained source overlay (AUR).
    CommunityOverlay,
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provenance::Official { repository, .. } => f.write_str(repository),
            Provenance::CommunityOverlay => f.write_str("aur"),
        }
    }
}

/// A published distribution package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistroPackageInfo {
    pub name: String,
    /// Upstream version with the package release (`-N`) and epoch removed.
    pub version: String,
    pub provenance: Provenance,
    /// Web page where the package can be inspected or flagged out-of-date.
    pub info_url: String,
}

/// Answer of a single source for a package name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceAnswer {
    Found(DistroPackageInfo),
    /// The source positively does not carry the package.
    NotFound,
}

/// Final answer of the probe after consulting all sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Present(DistroPackageInfo),
    /// No source carries the package. `inconclusive` is set when a source
    /// failed or timed out, so absence is not confirmed.
    Absent { inconclusive: bool },
}

impl ProbeOutcome {
    pub fn info(&self) -> Option<&DistroPackageInfo> {
        match self {
            ProbeOutcome::Present(info) => Some(info),
            ProbeOutcome::Absent { .. } => None,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, ProbeOutcome::Present(_))
    }

    pub fn is_inconclusive(&self) -> bool {
        matches!(self, ProbeOutcome::Absent { inconclusive: true })
    }
}

/// Strip the package release and epoch from a distribution version:
/// `1:2.1.5-3` becomes `2.1.5`.
pub fn upstream_version(full: &str) -> String {
    let full = full.trim();
    let without_epoch = full.split_once(':').map_or(full, |(_, rest)| rest);
    without_epoch
        .rsplit_once('-')
        .map_or(without_epoch, |(version, _)| version)
        .to_string()
}
