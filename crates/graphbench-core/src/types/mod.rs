//! Core data types for `graphbench`.
//!
//! These are the values that flow between a workload and the storage back end
//! under test: identifiers, edge labels, element kinds and property values.

mod element;
mod id;
mod value;

pub use element::{EdgeLabel, ElementKind};
pub use id::{EdgeId, VertexId};
pub use value::Value;
