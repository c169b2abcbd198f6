//! `graphbench`
//!
//! Measures how fast a graph storage back end absorbs bulk writes. A run opens
//! a fresh store in a working directory, inserts vertices (optionally with
//! properties, key indices or random edges) in one loop, commits every
//! `batch_size` iterations, prints throttled progress and a final summary with
//! the on-disk size, then deletes the store.
//!
//! # Example
//!
//! ```ignore
//! use graphbench::{BenchConfig, Workload, WorkloadRunner, WorkloadSpec};
//! use graphbench_storage::backends::RedbFactory;
//!
//! let mut runner = WorkloadRunner::new(BenchConfig::from_env());
//! let spec = WorkloadSpec::new(Workload::ConnectedVertices).total(100_000);
//! let report = runner.run(&spec, &RedbFactory::default())?;
//! println!("{report}");
//! ```
//!
//! # Modules
//!
//! - [`runner`] - Drives one workload against one store
//! - [`workload`] - Workload kinds, sizes and generated property values
//! - [`progress`] - Throttled progress lines and summaries
//! - [`dir_util`] - Directory size, recursive deletion, byte formatting
//! - [`config`] - Working directory configuration

pub mod config;
pub mod dir_util;
pub mod error;
pub mod progress;
pub mod report;
pub mod runner;
pub mod workload;

pub use config::BenchConfig;
pub use error::{BenchError, BenchResult};
pub use progress::{Clock, ManualClock, ProgressTracker, SystemClock};
pub use report::RunReport;
pub use runner::WorkloadRunner;
pub use workload::{BooleanProperty, Workload, WorkloadSpec};
