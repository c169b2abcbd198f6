//! Storage back end implementations.
//!
//! # Available Back Ends
//!
//! - [`memory`] - Non-transactional in-memory graph
//! - [`redb`] - Persistent, transactional graph on the Redb embedded database
//! - [`batch`] - Decorator that commits an inner store every N mutations

pub mod batch;
pub mod memory;
pub mod redb;

pub use self::batch::{BatchedFactory, BatchedGraph};
pub use self::memory::{MemoryFactory, MemoryGraph};
pub use self::redb::{RedbConfig, RedbFactory, RedbGraph};
