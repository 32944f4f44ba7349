//! Integration tests for the gembridge binary.
//!
//! These tests exercise the compiled binary using assert_cmd, with a
//! wiremock server standing in for rubygems.org.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use gem_test_utils::{gem_archive, git_repo_with_commit, recipe_text};
use predicates::prelude::*;
use tempfile::tempdir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn gembridge_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("gembridge"));
    cmd.env_remove("GEMBRIDGE_CONFIG").env_remove("RUST_LOG");
    cmd
}

fn write_config(root: &Path, index_url: &str) {
    fs::write(
        root.join("gembridge.toml"),
        format!("rubygems_url = \"{index_url}\"\nprobe_timeout_secs = 1\n"),
    )
    .unwrap();
}

async fn index_with(versions: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/versions"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!("created_at: now\n---\n{versions}")))
        .mount(&server)
        .await;
    server
}

// ============================================================================
// Help and Version
// ============================================================================

#[test]
fn test_help_output() {
    gembridge_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("sync"))
        .stdout(predicate::str::contains("generate"));
}

#[test]
fn test_version_output() {
    gembridge_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("gembridge"));
}

#[test]
fn test_missing_command_is_usage_error() {
    gembridge_cmd().assert().failure().code(2);
}

#[test]
fn test_generate_requires_gem() {
    gembridge_cmd()
        .arg("generate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("<GEM>"));
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_unknown_config_key_is_reported() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("gembridge.toml"), "no_such_key = 1\n").unwrap();

    gembridge_cmd()
        .args(["sync", "--root"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"))
        .stderr(predicate::str::contains("gembridge.toml"));
}

#[test]
fn test_missing_root_is_reported() {
    let dir = tempdir().unwrap();

    gembridge_cmd()
        .args(["sync", "--root"])
        .arg(dir.path().join("absent"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a directory"));
}

// ============================================================================
// Sync
// ============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn test_sync_fails_when_index_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let dir = tempdir().unwrap();
    write_config(dir.path(), &server.uri());

    gembridge_cmd()
        .args(["sync", "--root"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("503"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_sync_empty_root() {
    let server = index_with("rack 3.0.0 abc\n").await;
    let dir = tempdir().unwrap();
    write_config(dir.path(), &server.uri());

    gembridge_cmd()
        .args(["sync", "--root"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("0 updated, 0 unchanged"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_sync_skips_gem_without_release_and_malformed_recipe_fails() {
    let server = index_with("rack 3.0.0 abc\n").await;
    let dir = tempdir().unwrap();
    write_config(dir.path(), &server.uri());

    fs::create_dir_all(dir.path().join("ruby-gone")).unwrap();
    fs::write(
        dir.path().join("ruby-gone").join("PKGBUILD"),
        "_gemname=gone\npkgname=ruby-$_gemname\npkgver=1.0\npkgrel=1\ndepends=('ruby')\n",
    )
    .unwrap();
    fs::create_dir_all(dir.path().join("ruby-broken")).unwrap();
    fs::write(dir.path().join("ruby-broken").join("PKGBUILD"), "pkgver=1.0\n").unwrap();

    gembridge_cmd()
        .args(["sync", "--dry-run", "--root"])
        .arg(dir.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("SKIPPED"))
        .stdout(predicate::str::contains("FAILED"))
        .stdout(predicate::str::contains("1 skipped, 1 failed"))
        .stderr(predicate::str::contains("could not be processed"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_sync_commit_outside_repository_fails() {
    let server = index_with("rack 3.0.0 abc\n").await;
    let dir = tempdir().unwrap();
    write_config(dir.path(), &server.uri());

    gembridge_cmd()
        .args(["sync", "--commit", "--root"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("git discover failed"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_sync_commit_stashes_and_leaves_unchanged_recipes_alone() {
    let server = index_with("foo 1.0 abc\n").await;
    Mock::given(method("GET"))
        .and(path("/api/v2/rubygems/foo/versions/1.0.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"name": "foo", "version": "1.0", "summary": "The foo gem",
                "licenses": ["MIT"], "dependencies": {"runtime": []}}"#,
        ))
        .mount(&server)
        .await;
    let dir = tempdir().unwrap();
    let repo = git_repo_with_commit(dir.path());
    write_config(dir.path(), &server.uri());
    fs::create_dir_all(dir.path().join("ruby-foo")).unwrap();
    fs::write(
        dir.path().join("ruby-foo").join("PKGBUILD"),
        recipe_text("foo", None, "1.0", 1, &[]),
    )
    .unwrap();
    let before = repo.head().unwrap().peel_to_commit().unwrap().id();

    gembridge_cmd()
        .args(["sync", "--commit", "--root"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("0 updated, 1 unchanged"));

    assert_eq!(repo.head().unwrap().peel_to_commit().unwrap().id(), before);
}

// ============================================================================
// Generate
// ============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn test_generate_writes_recipe_and_artifact() {
    let server = index_with("foo 1.0 abc\n").await;
    Mock::given(method("GET"))
        .and(path("/api/v2/rubygems/foo/versions/1.0.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"name": "foo", "version": "1.0", "platform": "ruby",
                "summary": "A foo gem", "licenses": ["MIT"],
                "dependencies": {"runtime": []}}"#,
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/downloads/foo-1.0.gem"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(gem_archive("foo", "1.0", &[])))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    write_config(dir.path(), &server.uri());

    gembridge_cmd()
        .args(["generate", "foo", "--root"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Created"))
        .stdout(predicate::str::contains("ruby-foo"));

    let recipe = fs::read_to_string(dir.path().join("ruby-foo").join("PKGBUILD")).unwrap();
    assert!(recipe.contains("pkgver=1.0"));
    assert!(recipe.contains("pkgdesc='A foo gem'"));
    assert!(recipe.contains("sha256sums=('"));
    assert!(recipe.contains("arch=(any)"));
    assert_eq!(
        fs::read(dir.path().join("ruby-foo").join("foo-1.0.gem")).unwrap(),
        gem_archive("foo", "1.0", &[])
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_generate_unknown_gem_fails() {
    let server = index_with("foo 1.0 abc\n").await;
    let dir = tempdir().unwrap();
    write_config(dir.path(), &server.uri());

    gembridge_cmd()
        .args(["generate", "nope", "--root"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope"));
    assert!(!dir.path().join("ruby-nope").exists());
}
