//! Recipe files on disk: one `<prefix>-<gem>[-<slot>]/PKGBUILD` per package.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tempfile::NamedTempFile;

use crate::error::{Error, Result};

/// File name of a recipe inside its package directory.
pub const RECIPE_FILENAME: &str = "PKGBUILD";

/// The directory tree holding every recipe of one distro prefix.
#[derive(Debug, Clone)]
pub struct RecipeStore {
    root: PathBuf,
    prefix: String,
}

impl RecipeStore {
    pub fn new(root: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            prefix: prefix.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Recipe files of every `<prefix>-*` directory, sorted by path.
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        let entries = fs::read_dir(&self.root).map_err(|e| Error::io(&self.root, e))?;
        let namespace = format!("{}-", self.prefix);

        let mut found = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| Error::io(&self.root, e))?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if !name.starts_with(&namespace) || !entry.path().is_dir() {
                continue;
            }
            let recipe = entry.path().join(RECIPE_FILENAME);
            if recipe.is_file() {
                found.push(recipe);
            }
        }
        found.sort();
        tracing::debug!(count = found.len(), root = %self.root.display(), "discovered recipes");
        Ok(found)
    }

    /// Directory of the package for `gem` in `slot`.
    pub fn dir_for(&self, gem: &str, slot: Option<&str>) -> PathBuf {
        self.root
            .join(gem_index::distro_name(&self.prefix, gem, slot))
    }

    pub fn path_for(&self, gem: &str, slot: Option<&str>) -> PathBuf {
        self.dir_for(gem, slot).join(RECIPE_FILENAME)
    }

    pub fn read(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).map_err(|e| Error::io(path, e))
    }

    /// Read the recipe at `path` if it exists.
    pub fn read_existing(&self, path: &Path) -> Result<Option<String>> {
        match fs::read_to_string(path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::io(path, e)),
        }
    }

    pub fn write(&self, path: &Path, text: &str) -> Result<()> {
        write_atomic(path, text.as_bytes())?;
        tracing::info!(path = %path.display(), "wrote recipe");
        Ok(())
    }
}

/// Replace `path` with `content` in one rename.
///
/// The bytes go to an exclusively locked sibling temp file first, so readers
/// see either the old or the new file. The temp file is removed if any step
/// before the rename fails.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;

    let mut staged = NamedTempFile::new_in(dir).map_err(|e| Error::io(dir, e))?;
    staged.as_file().lock_exclusive().map_err(|_| Error::LockFailed {
        path: path.to_path_buf(),
    })?;
    staged
        .write_all(content)
        .and_then(|()| staged.as_file().sync_all())
        .map_err(|e| Error::io(staged.path(), e))?;

    // persist hands the temp file back on failure; dropping it unlinks it
    let persisted = staged.persist(path).map_err(|e| Error::io(path, e.error))?;
    FileExt::unlock(&persisted).map_err(|_| Error::LockFailed {
        path: path.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_atomic_creates_parent_and_replaces_in_place() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ruby-foo").join(RECIPE_FILENAME);

        write_atomic(&path, b"one").unwrap();
        write_atomic(&path, b"two").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "two");
        let names: Vec<_> = fs::read_dir(path.parent().unwrap())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from(RECIPE_FILENAME)]);
    }

    #[test]
    fn test_failed_rename_removes_staged_file() {
        let dir = TempDir::new().unwrap();
        // a directory in the way makes the final rename fail
        let target = dir.path().join(RECIPE_FILENAME);
        fs::create_dir(&target).unwrap();

        let err = write_atomic(&target, b"content").unwrap_err();

        assert!(matches!(err, Error::Io { .. }));
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from(RECIPE_FILENAME)]);
    }
}
