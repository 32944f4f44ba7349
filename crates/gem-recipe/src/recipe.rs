//! The recipe value.

use std::fmt;
use std::str::FromStr;

use gem_index::Version;

use crate::error::{Error, Result};

/// Hash algorithm of a recipe's `*sums=` array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChecksumKind {
    Sha1,
    Sha256,
    Sha512,
}

impl ChecksumKind {
    /// The PKGBUILD field holding checksums of this kind.
    pub fn field(self) -> &'static str {
        match self {
            ChecksumKind::Sha1 => "sha1sums",
            ChecksumKind::Sha256 => "sha256sums",
            ChecksumKind::Sha512 => "sha512sums",
        }
    }

    pub fn from_field(field: &str) -> Option<Self> {
        match field {
            "sha1sums" => Some(ChecksumKind::Sha1),
            "sha256sums" => Some(ChecksumKind::Sha256),
            "sha512sums" => Some(ChecksumKind::Sha512),
            _ => None,
        }
    }
}

impl fmt::Display for ChecksumKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChecksumKind::Sha1 => f.write_str("sha1"),
            ChecksumKind::Sha256 => f.write_str("sha256"),
            ChecksumKind::Sha512 => f.write_str("sha512"),
        }
    }
}

impl FromStr for ChecksumKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "sha1" => Ok(ChecksumKind::Sha1),
            "sha256" => Ok(ChecksumKind::Sha256),
            "sha512" => Ok(ChecksumKind::Sha512),
            other => Err(Error::malformed(format!("unknown checksum kind '{other}'"))),
        }
    }
}

/// Checksums of the recipe's source artifacts, one per `source=` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checksum {
    pub kind: ChecksumKind,
    pub values: Vec<String>,
}

impl Checksum {
    pub fn single(kind: ChecksumKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            values: vec![value.into()],
        }
    }
}

/// A build recipe for one distribution package of a gem.
///
/// Maintainers, contributors, license, native dependencies, unrecognised
/// fields and the `package()` body are carried through regeneration
/// unchanged; only version, release counter, generated dependencies and
/// checksum are managed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    pub gem_name: String,
    pub gem_version: Version,
    /// `pkgrel`; at least 1.
    pub release: u32,
    /// Version family suffix of the package name, e.g. `2.1`.
    pub slot: Option<String>,
    /// Distribution namespace of gem packages, e.g. `ruby`.
    pub prefix: String,
    pub description: String,
    pub arch: Vec<String>,
    pub url: String,
    pub licenses: Vec<String>,
    /// `depends` entries outside the gem namespace, in file order.
    pub native_dependencies: Vec<String>,
    /// `depends` entries derived from gem dependencies.
    pub generated_dependencies: Vec<String>,
    pub checksum: Option<Checksum>,
    pub maintainers: Vec<String>,
    pub contributors: Vec<String>,
    /// Leading comment lines other than maintainer/contributor tags.
    pub header_comments: Vec<String>,
    /// Unmanaged assignments and comments, verbatim, in file order.
    pub extra_fields: Vec<String>,
    /// Everything from the first function definition to the end of file.
    pub package_body: String,
}

impl Recipe {
    /// A bare recipe with no metadata; mostly useful as a starting point.
    pub fn new(prefix: impl Into<String>, gem_name: impl Into<String>, gem_version: Version) -> Self {
        Self {
            gem_name: gem_name.into(),
            gem_version,
            release: 1,
            slot: None,
            prefix: prefix.into(),
            description: String::new(),
            arch: vec!["any".to_string()],
            url: String::new(),
            licenses: Vec::new(),
            native_dependencies: Vec::new(),
            generated_dependencies: Vec::new(),
            checksum: None,
            maintainers: Vec::new(),
            contributors: Vec::new(),
            header_comments: Vec::new(),
            extra_fields: Vec::new(),
            package_body: String::new(),
        }
    }

    /// Distribution package name, e.g. `ruby-foo-2.1`.
    pub fn package_name(&self) -> String {
        gem_index::distro_name(&self.prefix, &self.gem_name, self.slot.as_deref())
    }

    /// The full `depends` array: native entries first, then generated ones.
    pub fn depends(&self) -> Vec<&str> {
        self.native_dependencies
            .iter()
            .chain(&self.generated_dependencies)
            .map(String::as_str)
            .collect()
    }

    /// Whether a `depends` entry belongs to the gem namespace.
    pub fn is_generated_dependency(&self, entry: &str) -> bool {
        entry
            .strip_prefix(&self.prefix)
            .is_some_and(|rest| rest.starts_with('-'))
    }

    /// Parse recipe text. See [`crate::parse`].
    pub fn parse(text: &str) -> Result<Self> {
        crate::parse::parse(text)
    }

    /// Render the canonical recipe text. See [`crate::render`].
    pub fn render(&self) -> String {
        crate::render::render(self)
    }
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}-{}", self.package_name(), self.gem_version, self.release)
    }
}
