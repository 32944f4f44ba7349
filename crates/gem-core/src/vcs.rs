//! Recording recipe updates in the git repository that holds the recipes.

use std::path::{Path, PathBuf};

use git2::{ErrorCode, Repository};

use crate::error::{Error, Result};

/// Message of the stash taken before a run.
pub const STASH_MESSAGE: &str = "Save before gembridge sync";

pub trait VersionControl: Send + Sync {
    /// Put uncommitted work aside so updates commit cleanly. A clean tree
    /// is not an error.
    fn stash(&self) -> Result<()>;

    /// Commit the current content of `path` and nothing else.
    fn commit(&self, path: &Path, message: &str) -> Result<()>;
}

/// Commit message for an updated recipe, e.g. `ruby-rack-3.0.8-1: bump`.
pub fn bump_message(package: &str, version: &str, release: u32) -> String {
    format!("{package}-{version}-{release}: bump")
}

/// Git through libgit2, against the repository enclosing the recipes root.
#[derive(Debug, Clone)]
pub struct GitVersionControl {
    workdir: PathBuf,
}

impl GitVersionControl {
    /// Find the repository containing `root`.
    pub fn discover(root: &Path) -> Result<Self> {
        let repo = Repository::discover(root).map_err(Error::git("discover"))?;
        let workdir = repo.workdir().ok_or_else(|| Error::Repository {
            path: root.to_path_buf(),
            message: "repository is bare".to_string(),
        })?;
        Ok(Self {
            workdir: workdir.canonicalize()?,
        })
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn open(&self) -> Result<Repository> {
        Repository::open(&self.workdir).map_err(Error::git("open"))
    }

    /// `path` relative to the working tree, as the index wants it.
    fn relative(&self, path: &Path) -> Result<PathBuf> {
        let absolute = path.canonicalize()?;
        match absolute.strip_prefix(&self.workdir) {
            Ok(relative) => Ok(relative.to_path_buf()),
            Err(_) => Err(Error::Repository {
                path: path.to_path_buf(),
                message: format!("outside working tree {}", self.workdir.display()),
            }),
        }
    }
}

impl VersionControl for GitVersionControl {
    fn stash(&self) -> Result<()> {
        let mut repo = self.open()?;
        let signature = repo.signature().map_err(Error::git("stash"))?;
        match repo.stash_save(&signature, STASH_MESSAGE, None) {
            Ok(oid) => {
                tracing::info!(stash = %oid, "stashed uncommitted changes");
                Ok(())
            }
            // nothing to stash, or no commit to stash against
            Err(e) if matches!(e.code(), ErrorCode::NotFound | ErrorCode::UnbornBranch) => Ok(()),
            Err(e) => Err(Error::git("stash")(e)),
        }
    }

    fn commit(&self, path: &Path, message: &str) -> Result<()> {
        let repo = self.open()?;
        let relative = self.relative(path)?;

        let mut index = repo.index().map_err(Error::git("add"))?;
        index.add_path(&relative).map_err(Error::git("add"))?;
        index.write().map_err(Error::git("add"))?;
        let tree_id = index.write_tree().map_err(Error::git("write tree"))?;
        let tree = repo.find_tree(tree_id).map_err(Error::git("write tree"))?;

        let signature = repo.signature().map_err(Error::git("commit"))?;
        let parent = match repo.head() {
            Ok(head) => Some(head.peel_to_commit().map_err(Error::git("commit"))?),
            Err(e) if e.code() == ErrorCode::UnbornBranch => None,
            Err(e) => return Err(Error::git("commit")(e)),
        };
        let parents: Vec<_> = parent.iter().collect();

        let oid = repo
            .commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
            .map_err(Error::git("commit"))?;
        tracing::info!(commit = %oid, path = %relative.display(), "committed recipe");
        Ok(())
    }
}
