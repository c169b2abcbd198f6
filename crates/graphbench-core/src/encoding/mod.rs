//! Binary encodings used by persistent back ends.
//!
//! - [`keys`] - Order-preserving key layouts for vertices, edges and indices
//! - [`value`] - Tagged binary encoding for [`Value`](crate::Value)

pub mod keys;
pub mod value;

pub use value::{decode_value, encode_value};
