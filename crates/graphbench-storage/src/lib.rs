//! `graphbench` Storage
//!
//! This crate defines the write contract a graph back end must satisfy to be
//! benchmarked, and ships reference back ends that implement it.
//!
//! # Core Traits
//!
//! - [`GraphStorage`] - An open storage handle: vertices, properties, edges,
//!   optional key indices, optional commits, shutdown
//! - [`StorageFactory`] - Opens a handle in a working directory and deletes it
//!   afterwards
//!
//! Back ends advertise optional behaviour through [`Capabilities`] instead of
//! through separate traits, so the harness can check for key-index support
//! before it writes anything.
//!
//! # Example
//!
//! ```ignore
//! use graphbench_storage::backends::MemoryFactory;
//! use graphbench_storage::{GraphStorage, StorageFactory};
//!
//! let factory = MemoryFactory;
//! let mut graph = factory.open(dir, true)?;
//! let alice = graph.create_vertex(None)?;
//! let bob = graph.create_vertex(None)?;
//! graph.set_property(&alice, "name", "Alice".into())?;
//! graph.create_edge(&"knows".into(), &alice, &bob)?;
//! graph.shutdown()?;
//! factory.delete(graph)?;
//! ```
//!
//! # Modules
//!
//! - [`engine`] - Storage traits, capabilities and errors
//! - [`backends`] - Concrete back end implementations

pub mod backends;
pub mod engine;

pub use engine::{Capabilities, GraphStorage, StorageError, StorageFactory, StorageResult};
