//! Throwaway git repositories.

use std::fs;
use std::path::Path;

/// Initialises a repository at `path` with a local identity and one commit
/// holding `README.md`.
///
/// The identity lives in the repository config, so commits made through
/// `Repository::signature` work on machines with no global git setup.
///
/// # Panics
/// Panics if any git or filesystem operation fails.
pub fn git_repo_with_commit(path: &Path) -> git2::Repository {
    let repo = git2::Repository::init(path).unwrap_or_else(|e| {
        panic!(
            "git_repo_with_commit: failed to init repository at {}: {e}",
            path.display()
        )
    });
    {
        let mut config = repo
            .config()
            .unwrap_or_else(|e| panic!("git_repo_with_commit: no config: {e}"));
        config.set_str("user.name", "Test Packager").unwrap();
        config.set_str("user.email", "packager@example.org").unwrap();
        config.set_bool("commit.gpgsign", false).unwrap();
    }

    fs::write(path.join("README.md"), "# recipes\n")
        .unwrap_or_else(|e| panic!("git_repo_with_commit: failed to write README.md: {e}"));
    {
        let mut index = repo.index().unwrap();
        index.add_path(Path::new("README.md")).unwrap();
        index.write().unwrap();
        let tree_id = index.write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let sig = repo.signature().unwrap();
        repo.commit(Some("HEAD"), &sig, &sig, "Initial", &tree, &[])
            .unwrap_or_else(|e| panic!("git_repo_with_commit: initial commit failed: {e}"));
    }
    repo
}
