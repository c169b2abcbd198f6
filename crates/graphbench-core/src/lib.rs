//! `graphbench` Core
//!
//! This crate provides the data types shared by the benchmark harness and the
//! storage back ends it drives.
//!
//! # Modules
//!
//! - [`types`] - Vertex and edge identifiers, labels, property values
//! - [`encoding`] - Compact binary encodings for keys and values
//! - [`error`] - Error types

pub mod encoding;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use error::CoreError;
pub use types::{EdgeId, EdgeLabel, ElementKind, Value, VertexId};
