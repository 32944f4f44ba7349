//! Shared test utilities for the gembridge workspace.
//!
//! Dev-dependency only; never published.
//!
//! # Modules
//!
//! - [`fakes`]: in-memory index, distro sources, artifact fetcher, builder
//!   and version control
//! - [`gem`]: deterministic `.gem` archives
//! - [`git`]: throwaway git repositories
//! - [`tree`]: [`RecipeTree`] temporary recipes root

pub mod fakes;
pub mod gem;
pub mod git;
pub mod tree;

pub use fakes::{
    FakeArtifacts, FakeBuilder, FakeIndex, FakeRepository, FakeVersionControl, release, v,
};
pub use gem::gem_archive;
pub use git::git_repo_with_commit;
pub use tree::{RecipeTree, recipe_text};
