//! Harness configuration.

use std::env;
use std::path::{Path, PathBuf};

/// Environment variable overriding the working directory.
pub const DB_PATH_ENV: &str = "GRAPHBENCH_DB_PATH";

/// Name of the default working directory under the system temp dir.
pub const DEFAULT_DIR_NAME: &str = "graphbench";

/// Configuration shared by every run of a [`WorkloadRunner`](crate::WorkloadRunner).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchConfig {
    /// Directory the store is opened in. Its contents are deleted before
    /// each run.
    pub working_dir: PathBuf,
}

impl BenchConfig {
    /// Create a configuration with the given working directory.
    #[must_use]
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self { working_dir: working_dir.into() }
    }

    /// Read the working directory from `GRAPHBENCH_DB_PATH`, falling back to
    /// [`default_working_dir`].
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var_os(key).map(PathBuf::from))
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<PathBuf>) -> Self {
        let working_dir = lookup(DB_PATH_ENV)
            .filter(|path| !path.as_os_str().is_empty())
            .unwrap_or_else(default_working_dir);
        Self { working_dir }
    }

    /// Set the working directory.
    #[must_use]
    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = dir.into();
        self
    }

    /// The working directory.
    pub fn path(&self) -> &Path {
        &self.working_dir
    }
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self::new(default_working_dir())
    }
}

/// `graphbench` under the system temp directory.
pub fn default_working_dir() -> PathBuf {
    env::temp_dir().join(DEFAULT_DIR_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_overrides_default() {
        let config = BenchConfig::from_lookup(|key| {
            (key == DB_PATH_ENV).then(|| PathBuf::from("/data/bench"))
        });
        assert_eq!(config.path(), Path::new("/data/bench"));
    }

    #[test]
    fn empty_or_missing_falls_back() {
        assert_eq!(BenchConfig::from_lookup(|_| None), BenchConfig::default());
        assert_eq!(BenchConfig::from_lookup(|_| Some(PathBuf::new())), BenchConfig::default());
        assert!(BenchConfig::default().path().ends_with(DEFAULT_DIR_NAME));
    }

    #[test]
    fn builder() {
        let config = BenchConfig::default().working_dir("/tmp/elsewhere");
        assert_eq!(config.working_dir, PathBuf::from("/tmp/elsewhere"));
    }
}
