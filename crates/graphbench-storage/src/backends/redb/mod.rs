//! Redb storage back end.
//!
//! A persistent graph store on Redb, a pure-Rust embedded database with ACID
//! transactions. The store lives in a single `graph.redb` file inside the
//! working directory, which is what the harness measures for disk footprint.
//!
//! # Features
//!
//! - **Transactional**: batches become Redb write transactions
//! - **Key indices**: vertex property indices kept in the same file
//! - **Client ids**: callers may choose vertex ids
//!
//! # Example
//!
//! ```ignore
//! use graphbench_storage::backends::redb::{RedbConfig, RedbFactory};
//! use graphbench_storage::{GraphStorage, StorageFactory};
//!
//! let factory = RedbFactory::new(RedbConfig::new().cache_size(256 * 1024 * 1024));
//! let mut graph = factory.open(dir, true)?;
//! let v = graph.create_vertex(None)?;
//! graph.set_property(&v, "name", "Alice".into())?;
//! graph.commit()?;
//! graph.shutdown()?;
//! ```

mod engine;
pub mod tables;

pub use engine::{RedbConfig, RedbFactory, RedbGraph, DATABASE_FILE};
