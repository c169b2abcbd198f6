//! Redb table definitions and key encoding utilities.
//!
//! Redb requires static table definitions, so all graph data lives in one
//! physical table and logical table names are prefixed to keys.

use redb::TableDefinition;

/// The physical table that stores all key-value pairs.
pub const DATA_TABLE: TableDefinition<'static, &[u8], &[u8]> =
    TableDefinition::new("graphbench_data");

/// Separator byte between table name and key in the encoded key.
pub const KEY_SEPARATOR: u8 = 0x00;

/// Encode a logical table name and key into a physical key.
///
/// The format is: `<table_name><separator><key>`
pub fn encode_key(table: &str, key: &[u8]) -> Vec<u8> {
    let mut encoded = Vec::with_capacity(table.len() + 1 + key.len());
    encoded.extend_from_slice(table.as_bytes());
    encoded.push(KEY_SEPARATOR);
    encoded.extend_from_slice(key);
    encoded
}

/// Logical table names.
pub mod names {
    /// Vertex records keyed by vertex id.
    pub const VERTICES: &str = "vertices";

    /// Vertex properties keyed by vertex id and property key.
    pub const PROPERTIES: &str = "properties";

    /// Edge records keyed by edge id.
    pub const EDGES: &str = "edges";

    /// Outgoing edge index (source -> edges).
    pub const EDGES_OUT: &str = "edges_out";

    /// Property key indices.
    pub const PROPERTY_INDEX: &str = "property_index";
}
