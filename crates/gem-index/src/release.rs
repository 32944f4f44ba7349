//! Gem dependencies and release metadata.

use std::fmt;

use crate::constraint::Constraint;
use crate::version::Version;

/// A runtime dependency declared by a gem release.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Dependency {
    pub name: String,
    pub constraint: Constraint,
}

impl Dependency {
    pub fn new(name: impl Into<String>, constraint: Constraint) -> Self {
        Self {
            name: name.into(),
            constraint,
        }
    }

    /// A dependency on any version of `name`.
    pub fn any(name: impl Into<String>) -> Self {
        Self::new(name, Constraint::Any)
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.constraint)
    }
}

/// Metadata for one published gem release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GemRelease {
    pub name: String,
    pub version: Version,
    pub summary: String,
    pub homepage: Option<String>,
    pub licenses: Vec<String>,
    pub runtime_dependencies: Vec<Dependency>,
    /// Whether the gem compiles native extensions (architecture-specific
    /// package). Only the gemspec inside the artifact records this.
    pub has_extensions: bool,
    /// Hex SHA-256 of the `.gem` artifact as advertised by the index.
    pub checksum: Option<String>,
}

impl GemRelease {
    /// A release with no metadata beyond name and version.
    pub fn new(name: impl Into<String>, version: Version) -> Self {
        Self {
            name: name.into(),
            version,
            summary: String::new(),
            homepage: None,
            licenses: Vec::new(),
            runtime_dependencies: Vec::new(),
            has_extensions: false,
            checksum: None,
        }
    }

    pub fn with_dependency(mut self, dependency: Dependency) -> Self {
        self.runtime_dependencies.push(dependency);
        self
    }
}
