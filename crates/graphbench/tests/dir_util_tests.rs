//! Directory utility tests on real temp directories.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use graphbench::dir_util::{
    clean_directory, delete_recursive, delete_recursive_with, dir_size, remove_entry, EntryKind,
};
use graphbench::BenchError;

/// Build `root/a.bin` (100 bytes), `root/sub/b.bin` (250 bytes) and
/// `root/sub/deeper/c.bin` (4096 bytes).
fn populate(root: &Path) {
    fs::create_dir_all(root.join("sub/deeper")).expect("mkdir");
    fs::write(root.join("a.bin"), vec![1u8; 100]).expect("write a");
    fs::write(root.join("sub/b.bin"), vec![2u8; 250]).expect("write b");
    fs::write(root.join("sub/deeper/c.bin"), vec![3u8; 4096]).expect("write c");
}

#[test]
fn test_dir_size_sums_files() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let root = tmp.path().join("tree");
    populate(&root);
    assert_eq!(dir_size(&root).expect("size"), 4446);
}

#[test]
fn test_dir_size_of_empty_dir() {
    let tmp = tempfile::tempdir().expect("tempdir");
    fs::create_dir(tmp.path().join("empty")).expect("mkdir");
    assert_eq!(dir_size(&tmp.path().join("empty")).expect("size"), 0);
}

#[test]
fn test_dir_size_missing_path_names_it() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let missing = tmp.path().join("nope");
    match dir_size(&missing) {
        Err(BenchError::Filesystem { path, .. }) => assert_eq!(path, missing),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_delete_recursive_removes_everything() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let root = tmp.path().join("tree");
    populate(&root);

    delete_recursive(&root).expect("delete");
    assert!(!root.exists());
    assert!(tmp.path().exists());
}

#[test]
fn test_delete_is_post_order() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let root = tmp.path().join("tree");
    populate(&root);

    let mut seen: Vec<(PathBuf, EntryKind)> = Vec::new();
    delete_recursive_with(&root, |path, kind| {
        seen.push((path.to_path_buf(), kind));
        remove_entry(path, kind)
    })
    .expect("delete");

    assert_eq!(seen.len(), 6);
    assert_eq!(seen.last(), Some(&(root.clone(), EntryKind::Directory)));
    let position = |p: &Path| seen.iter().position(|(q, _)| q == p).expect("visited");
    assert!(position(&root.join("sub/deeper/c.bin")) < position(&root.join("sub/deeper")));
    assert!(position(&root.join("sub/deeper")) < position(&root.join("sub")));
    assert!(position(&root.join("sub/b.bin")) < position(&root.join("sub")));
}

#[test]
fn test_delete_failure_names_entry() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let root = tmp.path().join("tree");
    populate(&root);
    let locked = root.join("sub/b.bin");

    let err = delete_recursive_with(&root, |path, kind| {
        if path == locked {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "locked"))
        } else {
            remove_entry(path, kind)
        }
    })
    .expect_err("delete should fail");

    match &err {
        BenchError::Filesystem { action, path, .. } => {
            assert_eq!(*action, "delete");
            assert_eq!(path, &locked);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("b.bin"));
    assert!(locked.exists());
    assert!(root.exists());
}

#[test]
fn test_clean_directory_keeps_root() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let root = tmp.path().join("tree");
    populate(&root);

    clean_directory(&root).expect("clean");
    assert!(root.is_dir());
    assert!(fs::read_dir(&root).expect("read dir").next().is_none());
    assert_eq!(dir_size(&root).expect("size"), 0);
}
