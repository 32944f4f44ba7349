//! RecipeStore discovery and writes on a real directory tree

use std::fs;

use gem_recipe::{RECIPE_FILENAME, RecipeStore};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn touch_recipe(root: &std::path::Path, dir: &str) {
    let dir = root.join(dir);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(RECIPE_FILENAME), "_gemname=x\n").unwrap();
}

#[test]
fn test_discover_only_prefixed_recipe_dirs() {
    let temp = TempDir::new().unwrap();
    touch_recipe(temp.path(), "ruby-zeta");
    touch_recipe(temp.path(), "ruby-alpha-2.1");
    touch_recipe(temp.path(), "python-alpha");
    fs::create_dir_all(temp.path().join("ruby-empty")).unwrap();
    fs::write(temp.path().join("ruby-file"), "not a dir").unwrap();

    let store = RecipeStore::new(temp.path(), "ruby");
    let found = store.discover().unwrap();

    assert_eq!(
        found,
        vec![
            temp.path().join("ruby-alpha-2.1").join(RECIPE_FILENAME),
            temp.path().join("ruby-zeta").join(RECIPE_FILENAME),
        ]
    );
}

#[test]
fn test_paths_follow_package_names() {
    let store = RecipeStore::new("/srv/pkgs", "ruby");

    assert_eq!(
        store.path_for("bar", Some("2.1")),
        std::path::Path::new("/srv/pkgs/ruby-bar-2.1/PKGBUILD")
    );
    assert_eq!(
        store.dir_for("bar", None),
        std::path::Path::new("/srv/pkgs/ruby-bar")
    );
}

#[test]
fn test_write_then_read_back() {
    let temp = TempDir::new().unwrap();
    let store = RecipeStore::new(temp.path(), "ruby");
    let path = store.path_for("foo", None);

    assert_eq!(store.read_existing(&path).unwrap(), None);
    store.write(&path, "_gemname=foo\n").unwrap();

    assert_eq!(store.read(&path).unwrap(), "_gemname=foo\n");
    assert_eq!(store.discover().unwrap(), vec![path]);
}

#[test]
fn test_discover_missing_root_is_io_error() {
    let temp = TempDir::new().unwrap();
    let store = RecipeStore::new(temp.path().join("absent"), "ruby");

    assert!(matches!(
        store.discover(),
        Err(gem_recipe::Error::Io { .. })
    ));
}
