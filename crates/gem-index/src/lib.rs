//! Gem index layer for gembridge
//!
//! Everything gembridge knows about the language-level package index:
//!
//! - **Version / Constraint**: numeric gem versions and the `~>`, `=`, `>=`
//!   requirements used by gem dependencies
//! - **VersionSet**: every released (name, version) pair, sorted per gem
//! - **SlotResolver**: maps a dependency to the best release and to the
//!   (possibly slotted) distribution package name that provides it
//! - **UpstreamIndex**: the collaborator trait for reading an index, with a
//!   rubygems.org implementation

pub mod catalog;
pub mod constraint;
pub mod error;
pub mod release;
pub mod resolver;
pub mod rubygems;
pub mod upstream;
pub mod version;

pub use catalog::{CatalogEntry, VersionSet};
pub use constraint::Constraint;
pub use error::{Error, Result};
pub use release::{Dependency, GemRelease};
pub use resolver::{ResolvedDependency, SlotResolver, distro_name, slot_constraint, slot_suffix};
pub use rubygems::{DEFAULT_RUBYGEMS_URL, RubyGemsIndex, parse_compact_versions};
pub use upstream::UpstreamIndex;
pub use version::Version;
