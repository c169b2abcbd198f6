//! Directory size, deletion and byte formatting.
//!
//! Deletion walks the tree depth-first and removes entries post-order (files,
//! then the directory that held them). It stops at the first entry that cannot
//! be removed and reports that exact path.

use std::fs;
use std::io;
use std::path::Path;

use walkdir::WalkDir;

use crate::error::{BenchError, BenchResult};

/// The kind of entry handed to a remover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A file or symlink.
    File,
    /// A directory whose contents have already been removed.
    Directory,
}

fn walk_error(root: &Path, err: walkdir::Error) -> BenchError {
    let path = err.path().unwrap_or(root).to_path_buf();
    BenchError::fs("read", path, err.into())
}

/// Total size in bytes of all regular files below `path`.
///
/// Directories contribute only their contents. Symlinks are not followed.
///
/// # Errors
///
/// Returns [`BenchError::Filesystem`] naming the entry that could not be read.
pub fn dir_size(path: &Path) -> BenchResult<u64> {
    let mut total = 0;
    for entry in WalkDir::new(path).min_depth(1) {
        let entry = entry.map_err(|e| walk_error(path, e))?;
        if entry.file_type().is_file() {
            let metadata = entry.metadata().map_err(|e| walk_error(path, e))?;
            total += metadata.len();
        }
    }
    Ok(total)
}

/// Remove with the standard library.
pub fn remove_entry(path: &Path, kind: EntryKind) -> io::Result<()> {
    match kind {
        EntryKind::File => fs::remove_file(path),
        EntryKind::Directory => fs::remove_dir(path),
    }
}

/// Delete `path` and everything below it.
///
/// # Errors
///
/// Returns [`BenchError::Filesystem`] naming the first entry that could not be
/// removed. Entries removed before the failure stay removed.
pub fn delete_recursive(path: &Path) -> BenchResult<()> {
    delete_recursive_with(path, remove_entry)
}

/// [`delete_recursive`] with a custom remover, called once per entry in
/// post-order.
///
/// # Errors
///
/// Returns [`BenchError::Filesystem`] naming the first entry `remove` failed on.
pub fn delete_recursive_with<F>(path: &Path, remove: F) -> BenchResult<()>
where
    F: FnMut(&Path, EntryKind) -> io::Result<()>,
{
    remove_tree(path, 0, remove)
}

/// Remove every entry inside `path`, keeping `path` itself.
///
/// # Errors
///
/// Returns [`BenchError::Filesystem`] naming the first entry that could not be
/// removed.
pub fn clean_directory(path: &Path) -> BenchResult<()> {
    remove_tree(path, 1, remove_entry)
}

fn remove_tree<F>(path: &Path, min_depth: usize, mut remove: F) -> BenchResult<()>
where
    F: FnMut(&Path, EntryKind) -> io::Result<()>,
{
    for entry in WalkDir::new(path).min_depth(min_depth).contents_first(true) {
        let entry = entry.map_err(|e| walk_error(path, e))?;
        let kind =
            if entry.file_type().is_dir() { EntryKind::Directory } else { EntryKind::File };
        remove(entry.path(), kind).map_err(|e| BenchError::fs("delete", entry.path(), e))?;
    }
    Ok(())
}

/// Format a byte count with one decimal place.
///
/// `si` selects base 1000 (`kB`, `MB`, ...) over base 1024 (`KiB`, `MiB`, ...).
/// Counts below one unit render as plain bytes.
///
/// ```
/// use graphbench::dir_util::human_readable_bytes;
///
/// assert_eq!(human_readable_bytes(500, false), "500 B");
/// assert_eq!(human_readable_bytes(2048, false), "2.0 KiB");
/// assert_eq!(human_readable_bytes(1500, true), "1.5 kB");
/// ```
#[must_use]
pub fn human_readable_bytes(bytes: u64, si: bool) -> String {
    let unit: u64 = if si { 1000 } else { 1024 };
    if bytes < unit {
        return format!("{bytes} B");
    }

    let mut exp = 0;
    let mut scaled = bytes;
    while scaled >= unit {
        scaled /= unit;
        exp += 1;
    }

    let prefixes = if si { b"kMGTPE" } else { b"KMGTPE" };
    let prefix = char::from(prefixes[exp - 1]);
    let value = bytes as f64 / (unit as f64).powi(i32::try_from(exp).unwrap_or(i32::MAX));
    format!("{value:.1} {prefix}{}B", if si { "" } else { "i" })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_bytes_below_one_unit() {
        assert_eq!(human_readable_bytes(0, true), "0 B");
        assert_eq!(human_readable_bytes(999, true), "999 B");
        assert_eq!(human_readable_bytes(1023, false), "1023 B");
    }

    #[test]
    fn scales_through_units() {
        assert_eq!(human_readable_bytes(1024, false), "1.0 KiB");
        assert_eq!(human_readable_bytes(1_048_576, false), "1.0 MiB");
        assert_eq!(human_readable_bytes(1_000_000, true), "1.0 MB");
        assert_eq!(human_readable_bytes(1_500_000_000, true), "1.5 GB");
        assert_eq!(human_readable_bytes(u64::MAX, false), "16.0 EiB");
    }

    proptest::proptest! {
        #[test]
        fn scaled_value_stays_below_next_unit(bytes in 1024u64..) {
            let text = human_readable_bytes(bytes, false);
            let (number, unit) = text.split_once(' ').expect("space");
            let value: f64 = number.parse().expect("number");
            proptest::prop_assert!((1.0..=1024.0).contains(&value), "{text}");
            proptest::prop_assert!(unit.ends_with("iB"), "{text}");
        }
    }
}
