//! In-memory graph back end.
//!
//! Keeps everything in hash maps. It is not transactional, so the harness never
//! commits it, and it leaves nothing on disk. Useful as a baseline and for
//! exercising the harness itself.

use std::collections::HashMap;
use std::path::Path;

use graphbench_core::encoding::encode_value;
use graphbench_core::{EdgeId, EdgeLabel, ElementKind, Value, VertexId};

use crate::engine::{Capabilities, GraphStorage, StorageError, StorageFactory, StorageResult};

/// A stored edge.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryEdge {
    /// Edge identifier.
    pub id: EdgeId,
    /// Source vertex.
    pub source: VertexId,
    /// Target vertex.
    pub target: VertexId,
    /// Relationship label.
    pub label: EdgeLabel,
}

/// A graph held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryGraph {
    vertices: HashMap<VertexId, HashMap<String, Value>>,
    edges: Vec<MemoryEdge>,
    /// Vertex key indices: property key -> encoded value -> vertices.
    indices: HashMap<String, HashMap<Vec<u8>, Vec<VertexId>>>,
    next_vertex_id: u64,
    closed: bool,
}

impl MemoryGraph {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self { next_vertex_id: 1, ..Self::default() }
    }

    /// Number of stored vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of stored edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// All stored edges in insertion order.
    #[must_use]
    pub fn edges(&self) -> &[MemoryEdge] {
        &self.edges
    }

    /// Get a vertex property.
    #[must_use]
    pub fn property(&self, vertex: VertexId, key: &str) -> Option<&Value> {
        self.vertices.get(&vertex).and_then(|props| props.get(key))
    }

    /// Look up vertices through a key index.
    ///
    /// Returns `None` if no index exists for `key`.
    #[must_use]
    pub fn index_lookup(&self, key: &str, value: &Value) -> Option<Vec<VertexId>> {
        let index = self.indices.get(key)?;
        let mut encoded = Vec::new();
        encode_value(value, &mut encoded).ok()?;
        Some(index.get(&encoded).cloned().unwrap_or_default())
    }

    fn ensure_open(&self) -> StorageResult<()> {
        if self.closed {
            Err(StorageError::Closed)
        } else {
            Ok(())
        }
    }
}

impl GraphStorage for MemoryGraph {
    type VertexRef = VertexId;

    fn name(&self) -> &str {
        "memory"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::none().key_indices(true).client_ids(true)
    }

    fn create_vertex(&mut self, id: Option<VertexId>) -> StorageResult<VertexId> {
        self.ensure_open()?;
        let id = match id {
            Some(id) => {
                if self.vertices.contains_key(&id) {
                    return Err(StorageError::Conflict(format!("vertex {id} already exists")));
                }
                self.next_vertex_id = self.next_vertex_id.max(id.as_u64() + 1);
                id
            }
            None => {
                let id = VertexId::new(self.next_vertex_id);
                self.next_vertex_id += 1;
                id
            }
        };
        self.vertices.insert(id, HashMap::new());
        Ok(id)
    }

    fn set_property(&mut self, vertex: &VertexId, key: &str, value: Value) -> StorageResult<()> {
        self.ensure_open()?;
        let props = self
            .vertices
            .get_mut(vertex)
            .ok_or_else(|| StorageError::NotFound(format!("vertex {vertex}")))?;

        if let Some(index) = self.indices.get_mut(key) {
            if let Some(old) = props.get(key) {
                let mut stale = Vec::new();
                encode_value(old, &mut stale)?;
                if let Some(ids) = index.get_mut(&stale) {
                    ids.retain(|id| id != vertex);
                    if ids.is_empty() {
                        index.remove(&stale);
                    }
                }
            }
            let mut encoded = Vec::new();
            encode_value(&value, &mut encoded)?;
            index.entry(encoded).or_default().push(*vertex);
        }
        props.insert(key.to_owned(), value);
        Ok(())
    }

    fn create_edge(
        &mut self,
        label: &EdgeLabel,
        from: &VertexId,
        to: &VertexId,
    ) -> StorageResult<()> {
        self.ensure_open()?;
        for endpoint in [from, to] {
            if !self.vertices.contains_key(endpoint) {
                return Err(StorageError::NotFound(format!("vertex {endpoint}")));
            }
        }
        let id = EdgeId::new(self.edges.len() as u64 + 1);
        self.edges.push(MemoryEdge { id, source: *from, target: *to, label: label.clone() });
        Ok(())
    }

    fn create_key_index(&mut self, key: &str, kind: ElementKind) -> StorageResult<()> {
        self.ensure_open()?;
        match kind {
            ElementKind::Vertex => {
                self.indices.entry(key.to_owned()).or_default();
                Ok(())
            }
            ElementKind::Edge => Err(StorageError::Unsupported(format!(
                "memory back end has no edge key index for '{key}'"
            ))),
        }
    }

    fn shutdown(&mut self) -> StorageResult<()> {
        self.closed = true;
        Ok(())
    }
}

/// Factory for [`MemoryGraph`]. The working directory is not used.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryFactory;

impl StorageFactory for MemoryFactory {
    type Storage = MemoryGraph;

    fn open(&self, _dir: &Path, _massive_inserts: bool) -> StorageResult<MemoryGraph> {
        Ok(MemoryGraph::new())
    }

    fn delete(&self, storage: MemoryGraph) -> StorageResult<()> {
        drop(storage);
        Ok(())
    }
}
