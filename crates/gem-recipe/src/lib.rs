//! PKGBUILD recipes for gem packages
//!
//! A [`Recipe`] is parsed from text once, mutated as a value, and rendered
//! back deterministically. [`RecipeStore`] maps packages to their files.

pub mod diff;
pub mod error;
pub mod parse;
pub mod recipe;
pub mod render;
pub mod shell;
pub mod store;
pub mod template;

pub use diff::RecipeDiff;
pub use error::{Error, Result};
pub use recipe::{Checksum, ChecksumKind, Recipe};
pub use store::{RECIPE_FILENAME, RecipeStore, write_atomic};
pub use template::RecipeTemplate;
