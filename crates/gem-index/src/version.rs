//! Numeric gem versions.
//!
//! A [`Version`] is a dot-separated tuple of unsigned integers. Ordering and
//! equality treat missing trailing components as zero, so `1` == `1.0` and
//! `1.2` < `1.2.1`, which is how RubyGems compares released versions. The
//! original component list is kept: slot computation needs to know whether a
//! component was written at all.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::error::{Error, Result};

/// A released gem version such as `2.1.5`.
#[derive(Debug, Clone)]
pub struct Version {
    segments: Vec<u64>,
}

impl Version {
    /// Parse a dot-separated numeric version.
    ///
    /// Prerelease tags (`1.0.rc1`) and platform suffixes (`1.0-java`) are
    /// rejected; they never take part in dependency resolution.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::invalid_version(s, "empty version"));
        }

        let segments = s
            .split('.')
            .map(|part| {
                part.parse::<u64>()
                    .map_err(|_| Error::invalid_version(s, format!("non-numeric segment '{part}'")))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { segments })
    }

    /// Build a version from its components; at least one is required.
    pub fn from_segments(segments: impl Into<Vec<u64>>) -> Result<Self> {
        let segments = segments.into();
        if segments.is_empty() {
            return Err(Error::invalid_version("", "empty version"));
        }
        Ok(Self { segments })
    }

    /// The components exactly as written.
    pub fn segments(&self) -> &[u64] {
        &self.segments
    }

    /// Number of components as written.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false; a parsed version has at least one component.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Component `index`, reading missing trailing components as zero.
    pub fn segment(&self, index: usize) -> u64 {
        self.segments.get(index).copied().unwrap_or(0)
    }

    /// Components with trailing zeros removed.
    fn significant(&self) -> &[u64] {
        let end = self
            .segments
            .iter()
            .rposition(|&s| s != 0)
            .map_or(0, |i| i + 1);
        &self.segments[..end]
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let width = self.segments.len().max(other.segments.len());
        (0..width)
            .map(|i| self.segment(i).cmp(&other.segment(i)))
            .find(|ord| ord.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.significant().hash(state);
    }
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for segment in &self.segments {
            if !first {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
            first = false;
        }
        Ok(())
    }
}
