//! Key encoding for ordered storage.
//!
//! # Key Layouts
//!
//! - Vertex: `[vertex_id]`
//! - Vertex property: `[vertex_id][property key bytes]`
//! - Edge: `[edge_id]`
//! - Outgoing edge: `[source_id][label_hash][edge_id]`
//! - Property index: `[kind][key_hash][encoded value][element_id]`
//!
//! All numeric values are encoded in big-endian format to preserve sort order.
//! The back end decides which logical table each key lives in.

use crate::error::CoreError;
use crate::types::{EdgeId, EdgeLabel, ElementKind, Value, VertexId};

use super::value::encode_value;

/// Encode a vertex key: `[vertex_id as big-endian u64]`.
#[inline]
#[must_use]
pub fn encode_vertex_key(id: VertexId) -> [u8; 8] {
    id.as_u64().to_be_bytes()
}

/// Encode an edge key: `[edge_id as big-endian u64]`.
#[inline]
#[must_use]
pub fn encode_edge_key(id: EdgeId) -> [u8; 8] {
    id.as_u64().to_be_bytes()
}

/// Encode the key of a single vertex property.
#[must_use]
pub fn encode_property_key(id: VertexId, key: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(8 + key.len());
    out.extend_from_slice(&id.as_u64().to_be_bytes());
    out.extend_from_slice(key.as_bytes());
    out
}

/// Encode an edge record: `[source_id][target_id][label bytes]`.
#[must_use]
pub fn encode_edge_record(source: VertexId, target: VertexId, label: &EdgeLabel) -> Vec<u8> {
    let mut out = Vec::with_capacity(16 + label.as_str().len());
    out.extend_from_slice(&source.as_u64().to_be_bytes());
    out.extend_from_slice(&target.as_u64().to_be_bytes());
    out.extend_from_slice(label.as_str().as_bytes());
    out
}

/// Encode a key for looking up outgoing edges of a vertex.
#[must_use]
pub fn encode_out_edge_key(source: VertexId, label: &EdgeLabel, edge: EdgeId) -> [u8; 24] {
    let mut key = [0u8; 24];
    key[..8].copy_from_slice(&source.as_u64().to_be_bytes());
    key[8..16].copy_from_slice(&hash_string(label.as_str()).to_be_bytes());
    key[16..].copy_from_slice(&edge.as_u64().to_be_bytes());
    key
}

/// Encode a property index entry.
///
/// # Errors
///
/// Returns [`CoreError::Encoding`] if the value cannot be encoded.
pub fn encode_index_key(
    kind: ElementKind,
    key: &str,
    value: &Value,
    element_id: u64,
) -> Result<Vec<u8>, CoreError> {
    let mut out = Vec::with_capacity(32);
    out.push(match kind {
        ElementKind::Vertex => 0x01,
        ElementKind::Edge => 0x02,
    });
    out.extend_from_slice(&hash_string(key).to_be_bytes());
    encode_value(value, &mut out)?;
    out.extend_from_slice(&element_id.to_be_bytes());
    Ok(out)
}

/// FNV-1a hash of a string.
#[inline]
#[must_use]
pub fn hash_string(s: &str) -> u64 {
    const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0100_0000_01b3;

    let mut hash = FNV_OFFSET;
    for byte in s.as_bytes() {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}
