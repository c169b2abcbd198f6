//! Storage traits and abstractions.
//!
//! - [`GraphStorage`] - An open graph store under benchmark
//! - [`StorageFactory`] - Creates and deletes stores in a working directory
//! - [`Capabilities`] - Optional features a store supports
//!
//! All operations return [`StorageResult<T>`], an alias for
//! `Result<T, StorageError>`.

mod error;
mod traits;

pub use error::{StorageError, StorageResult};
pub use traits::{Capabilities, GraphStorage, StorageFactory};
