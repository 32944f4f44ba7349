//! [`RecipeTree`]: a temporary recipes root.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use gem_recipe::{RECIPE_FILENAME, RecipeStore};
use tempfile::TempDir;

/// A temporary directory laid out like a recipes checkout.
pub struct RecipeTree {
    temp_dir: TempDir,
}

impl Default for RecipeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl RecipeTree {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn store(&self) -> RecipeStore {
        RecipeStore::new(self.root(), "ruby")
    }

    /// Write `text` to `<root>/<package>/PKGBUILD`.
    pub fn write_recipe(&self, package: &str, text: &str) -> PathBuf {
        let dir = self.root().join(package);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(RECIPE_FILENAME);
        fs::write(&path, text).unwrap();
        path
    }

    pub fn read_recipe(&self, package: &str) -> String {
        fs::read_to_string(self.root().join(package).join(RECIPE_FILENAME)).unwrap()
    }

    pub fn modified(&self, package: &str) -> SystemTime {
        fs::metadata(self.root().join(package).join(RECIPE_FILENAME))
            .and_then(|m| m.modified())
            .unwrap()
    }
}

/// Minimal generated recipe text.
pub fn recipe_text(gem: &str, slot: Option<&str>, version: &str, release: u32, deps: &[&str]) -> String {
    let suffix = slot.map(|s| format!("-{s}")).unwrap_or_default();
    let depends = std::iter::once("ruby")
        .chain(deps.iter().copied())
        .collect::<Vec<_>>()
        .join(" ");
    format!(
        "# Maintainer: Test Person <test@example.org>\n\
         \n\
         _gemname={gem}\n\
         pkgname=ruby-$_gemname{suffix}\n\
         pkgver={version}\n\
         pkgrel={release}\n\
         pkgdesc='The {gem} gem'\n\
         arch=(any)\n\
         url='https://example.org/{gem}'\n\
         license=(MIT)\n\
         depends=({depends})\n\
         sha256sums=('0000')\n\
         \n\
         package() {{\n  true\n}}\n"
    )
}
