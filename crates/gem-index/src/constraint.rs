//! Gem dependency constraints and matching.
//!
//! Only the operators gem authors actually lean on are understood: the
//! pessimistic `~>`, exact `=` (or a bare version) and the `>=` floor. A
//! requirement list is accepted when it reduces to one of those, e.g.
//! `>= 0` alone, or `~> 2.1, >= 2.1.0`. The common `~> 1.2, >= 1.2.3` form,
//! a pessimistic window whose floor sits above the window's own start, is
//! kept as [`Constraint::PessimisticFrom`].
//!
//! # Examples
//!
//! ```
//! use gem_index::{Constraint, Version};
//!
//! let c = Constraint::parse("~> 2.1").unwrap();
//! assert!(c.satisfies(&Version::parse("2.9").unwrap()));
//! assert!(!c.satisfies(&Version::parse("3.0").unwrap()));
//! ```

use std::fmt;

use crate::error::{Error, Result};
use crate::version::Version;

/// A single reduced version requirement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Constraint {
    /// No restriction (`>= 0`).
    Any,
    /// `= v`
    Exact(Version),
    /// `~> v`: at least `v`, and sharing every component of `v` but the last.
    Pessimistic(Version),
    /// `>= v`
    AtLeast(Version),
    /// `~> window, >= floor` with `floor` above `window`.
    PessimisticFrom { window: Version, floor: Version },
}

impl Constraint {
    /// Parse one requirement such as `~> 2.1`, `= 1.0`, `>= 3` or `1.0`.
    pub fn parse(requirement: &str) -> Result<Self> {
        let s = requirement.trim();
        if s.is_empty() {
            return Ok(Self::Any);
        }

        for unsupported in ["!=", "<", ">"] {
            if s.starts_with(unsupported) && !s.starts_with(">=") {
                return Err(Error::unsupported(s, format!("operator '{unsupported}'")));
            }
        }

        let parse_version = |rest: &str| {
            Version::parse(rest).map_err(|_| Error::unsupported(s, format!("bad version '{}'", rest.trim())))
        };

        if let Some(rest) = s.strip_prefix("~>") {
            Ok(Self::Pessimistic(parse_version(rest)?))
        } else if let Some(rest) = s.strip_prefix(">=") {
            let floor = parse_version(rest)?;
            if floor.segments().iter().all(|&c| c == 0) {
                Ok(Self::Any)
            } else {
                Ok(Self::AtLeast(floor))
            }
        } else if let Some(rest) = s.strip_prefix('=') {
            Ok(Self::Exact(parse_version(rest)?))
        } else {
            Ok(Self::Exact(parse_version(s)?))
        }
    }

    /// Parse a requirement list separated by `,` (JSON API) or `&` (compact
    /// index) and reduce it to a single constraint.
    pub fn parse_requirements(requirements: &str) -> Result<Self> {
        let mut floor: Option<Version> = None;
        let mut bounded: Vec<Constraint> = Vec::new();

        for part in requirements.split([',', '&']) {
            match Self::parse(part)? {
                Self::Any => {}
                Self::AtLeast(v) => {
                    if floor.as_ref().is_none_or(|f| v > *f) {
                        floor = Some(v);
                    }
                }
                other => bounded.push(other),
            }
        }

        if bounded.len() > 1 {
            return Err(Error::unsupported(
                requirements,
                "more than one bounding requirement",
            ));
        }

        match (bounded.pop(), floor) {
            (None, None) => Ok(Self::Any),
            (None, Some(f)) => Ok(Self::AtLeast(f)),
            (Some(c), None) => Ok(c),
            (Some(Self::Pessimistic(window)), Some(floor)) if window < floor => {
                let within = Self::Pessimistic(window.clone());
                if !within.satisfies(&floor) {
                    return Err(Error::unsupported(
                        requirements,
                        format!("floor {floor} lies outside ~> {window}"),
                    ));
                }
                Ok(Self::PessimisticFrom { window, floor })
            }
            (Some(Self::Exact(v)), Some(floor)) if v < floor => Err(Error::unsupported(
                requirements,
                format!("= {v} is below the floor {floor}"),
            )),
            (Some(c), Some(_)) => Ok(c),
        }
    }

    /// Whether `version` meets this constraint.
    pub fn satisfies(&self, version: &Version) -> bool {
        match self {
            Self::Any => true,
            Self::Exact(v) => version == v,
            Self::AtLeast(v) => version >= v,
            Self::Pessimistic(v) => {
                let fixed = v.len().saturating_sub(1).max(1);
                version >= v && (0..fixed).all(|i| version.segment(i) == v.segment(i))
            }
            Self::PessimisticFrom { window, floor } => {
                version >= floor && Self::Pessimistic(window.clone()).satisfies(version)
            }
        }
    }

    /// True for the unrestricted constraint.
    pub fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str(">= 0"),
            Self::Exact(v) => write!(f, "= {v}"),
            Self::Pessimistic(v) => write!(f, "~> {v}"),
            Self::AtLeast(v) => write!(f, ">= {v}"),
            Self::PessimisticFrom { window, floor } => write!(f, "~> {window}, >= {floor}"),
        }
    }
}
