//! Redb graph store implementation.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use graphbench_core::encoding::keys::{
    encode_edge_key, encode_edge_record, encode_index_key, encode_out_edge_key,
    encode_property_key, encode_vertex_key,
};
use graphbench_core::encoding::{decode_value, encode_value};
use graphbench_core::{EdgeId, EdgeLabel, ElementKind, Value, VertexId};
use redb::{Database, Durability, ReadableTable, WriteTransaction};
use tracing::debug;

use crate::engine::{Capabilities, GraphStorage, StorageError, StorageFactory, StorageResult};

use super::tables::{encode_key, names, DATA_TABLE};

/// File name of the database inside the working directory.
pub const DATABASE_FILE: &str = "graph.redb";

/// Configuration options for the Redb graph store.
#[derive(Debug, Clone, Copy, Default)]
pub struct RedbConfig {
    /// Cache size in bytes.
    /// If not set, uses Redb's default.
    pub cache_size: Option<usize>,
}

impl RedbConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cache size.
    #[must_use]
    pub const fn cache_size(mut self, size: usize) -> Self {
        self.cache_size = Some(size);
        self
    }
}

fn internal(err: impl std::fmt::Display) -> StorageError {
    StorageError::Internal(err.to_string())
}

/// A persistent, transactional graph store backed by Redb.
///
/// Writes go into one long-lived write transaction that is committed on
/// [`commit`](GraphStorage::commit) and reopened lazily by the next write.
/// With `massive_inserts` the intermediate commits skip fsync; the commit
/// performed by [`shutdown`](GraphStorage::shutdown) is always durable.
pub struct RedbGraph {
    db: Database,
    path: PathBuf,
    tx: Option<WriteTransaction>,
    massive_inserts: bool,
    next_vertex_id: u64,
    next_edge_id: u64,
    vertex_indices: HashSet<String>,
    closed: bool,
}

impl RedbGraph {
    /// Open or create a store at the given file path.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Open`] if the database cannot be opened or created.
    pub fn open(
        path: impl AsRef<Path>,
        config: RedbConfig,
        massive_inserts: bool,
    ) -> StorageResult<Self> {
        let mut builder = Database::builder();

        if let Some(cache_size) = config.cache_size {
            builder.set_cache_size(cache_size);
        }

        let db = builder.create(path.as_ref()).map_err(|e| StorageError::Open(e.to_string()))?;

        Ok(Self {
            db,
            path: path.as_ref().to_path_buf(),
            tx: None,
            massive_inserts,
            next_vertex_id: 1,
            next_edge_id: 1,
            vertex_indices: HashSet::new(),
            closed: false,
        })
    }

    /// Path of the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read a committed vertex property.
    ///
    /// # Errors
    ///
    /// Returns an error if the read transaction fails or the value is corrupt.
    pub fn property(&self, vertex: VertexId, key: &str) -> StorageResult<Option<Value>> {
        let tx =
            self.db.begin_read().map_err(|e| StorageError::Transaction(e.to_string()))?;
        let table = match tx.open_table(DATA_TABLE) {
            Ok(t) => t,
            Err(redb::TableError::TableDoesNotExist(_)) => return Ok(None),
            Err(e) => return Err(internal(e)),
        };
        let physical = encode_key(names::PROPERTIES, &encode_property_key(vertex, key));
        match table.get(physical.as_slice()).map_err(internal)? {
            Some(bytes) => Ok(Some(decode_value(bytes.value())?.0)),
            None => Ok(None),
        }
    }

    /// Find committed vertices through a key index.
    ///
    /// # Errors
    ///
    /// Returns an error if the read transaction fails.
    pub fn index_lookup(&self, key: &str, value: &Value) -> StorageResult<Vec<VertexId>> {
        let tx =
            self.db.begin_read().map_err(|e| StorageError::Transaction(e.to_string()))?;
        let table = match tx.open_table(DATA_TABLE) {
            Ok(t) => t,
            Err(redb::TableError::TableDoesNotExist(_)) => return Ok(Vec::new()),
            Err(e) => return Err(internal(e)),
        };

        // The index key without the trailing element id is a scan prefix.
        let mut prefix = encode_index_key(ElementKind::Vertex, key, value, 0)?;
        prefix.truncate(prefix.len() - 8);
        let prefix = encode_key(names::PROPERTY_INDEX, &prefix);

        let mut found = Vec::new();
        for entry in table.range(prefix.as_slice()..).map_err(internal)? {
            let (k, _) = entry.map_err(internal)?;
            let k = k.value();
            if !k.starts_with(&prefix) {
                break;
            }
            let id_bytes: [u8; 8] = k[k.len() - 8..].try_into().map_err(internal)?;
            found.push(VertexId::new(u64::from_be_bytes(id_bytes)));
        }
        Ok(found)
    }

    fn write_tx(&mut self) -> StorageResult<&mut WriteTransaction> {
        if self.closed {
            return Err(StorageError::Closed);
        }
        if self.tx.is_none() {
            let mut tx =
                self.db.begin_write().map_err(|e| StorageError::Transaction(e.to_string()))?;
            if self.massive_inserts {
                tx.set_durability(Durability::None);
            }
            self.tx = Some(tx);
        }
        self.tx.as_mut().ok_or(StorageError::Closed)
    }

    fn put(&mut self, table: &str, key: &[u8], value: &[u8]) -> StorageResult<()> {
        let encoded = encode_key(table, key);
        let tx = self.write_tx()?;
        let mut t = tx.open_table(DATA_TABLE).map_err(internal)?;
        t.insert(encoded.as_slice(), value).map_err(internal)?;
        Ok(())
    }

    /// Insert and hand back the value that was replaced.
    fn replace(&mut self, table: &str, key: &[u8], value: &[u8]) -> StorageResult<Option<Vec<u8>>> {
        let encoded = encode_key(table, key);
        let tx = self.write_tx()?;
        let mut t = tx.open_table(DATA_TABLE).map_err(internal)?;
        let previous = t.insert(encoded.as_slice(), value).map_err(internal)?;
        Ok(previous.map(|old| old.value().to_vec()))
    }

    fn remove(&mut self, table: &str, key: &[u8]) -> StorageResult<()> {
        let encoded = encode_key(table, key);
        let tx = self.write_tx()?;
        let mut t = tx.open_table(DATA_TABLE).map_err(internal)?;
        t.remove(encoded.as_slice()).map_err(internal)?;
        Ok(())
    }

    fn contains(&mut self, table: &str, key: &[u8]) -> StorageResult<bool> {
        let encoded = encode_key(table, key);
        let tx = self.write_tx()?;
        let t = tx.open_table(DATA_TABLE).map_err(internal)?;
        let found = t.get(encoded.as_slice()).map_err(internal)?.is_some();
        Ok(found)
    }
}

impl GraphStorage for RedbGraph {
    type VertexRef = VertexId;

    fn name(&self) -> &str {
        "redb"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::none().transactional(true).key_indices(true).client_ids(true)
    }

    fn create_vertex(&mut self, id: Option<VertexId>) -> StorageResult<VertexId> {
        let id = match id {
            Some(id) => {
                if self.contains(names::VERTICES, &encode_vertex_key(id))? {
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
        self.put(names::VERTICES, &encode_vertex_key(id), &[])?;
        Ok(id)
    }

    fn set_property(&mut self, vertex: &VertexId, key: &str, value: Value) -> StorageResult<()> {
        let mut encoded = Vec::with_capacity(16);
        encode_value(&value, &mut encoded)?;
        let previous =
            self.replace(names::PROPERTIES, &encode_property_key(*vertex, key), &encoded)?;

        if self.vertex_indices.contains(key) {
            if let Some(previous) = previous {
                let (old, _) = decode_value(&previous)?;
                let stale = encode_index_key(ElementKind::Vertex, key, &old, vertex.as_u64())?;
                self.remove(names::PROPERTY_INDEX, &stale)?;
            }
            let index_key = encode_index_key(ElementKind::Vertex, key, &value, vertex.as_u64())?;
            self.put(names::PROPERTY_INDEX, &index_key, &[])?;
        }
        Ok(())
    }

    fn create_edge(
        &mut self,
        label: &EdgeLabel,
        from: &VertexId,
        to: &VertexId,
    ) -> StorageResult<()> {
        let id = EdgeId::new(self.next_edge_id);
        self.next_edge_id += 1;
        self.put(names::EDGES, &encode_edge_key(id), &encode_edge_record(*from, *to, label))?;
        self.put(names::EDGES_OUT, &encode_out_edge_key(*from, label, id), &[])
    }

    fn create_key_index(&mut self, key: &str, kind: ElementKind) -> StorageResult<()> {
        if self.closed {
            return Err(StorageError::Closed);
        }
        match kind {
            ElementKind::Vertex => {
                debug!(key, "creating vertex key index");
                self.vertex_indices.insert(key.to_owned());
                Ok(())
            }
            ElementKind::Edge => Err(StorageError::Unsupported(format!(
                "redb back end has no edge key index for '{key}'"
            ))),
        }
    }

    fn commit(&mut self) -> StorageResult<()> {
        if self.closed {
            return Err(StorageError::Closed);
        }
        match self.tx.take() {
            Some(tx) => tx.commit().map_err(|e| StorageError::Transaction(e.to_string())),
            None => Ok(()),
        }
    }

    fn shutdown(&mut self) -> StorageResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        if let Some(mut tx) = self.tx.take() {
            tx.set_durability(Durability::Immediate);
            tx.commit().map_err(|e| StorageError::Transaction(e.to_string()))?;
        }
        debug!(path = %self.path.display(), "redb graph shut down");
        Ok(())
    }
}

/// Factory for [`RedbGraph`], storing `graph.redb` in the working directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct RedbFactory {
    config: RedbConfig,
}

impl RedbFactory {
    /// Create a factory with the given configuration.
    #[must_use]
    pub const fn new(config: RedbConfig) -> Self {
        Self { config }
    }
}

impl StorageFactory for RedbFactory {
    type Storage = RedbGraph;

    fn open(&self, dir: &Path, massive_inserts: bool) -> StorageResult<RedbGraph> {
        fs::create_dir_all(dir)?;
        RedbGraph::open(dir.join(DATABASE_FILE), self.config, massive_inserts)
    }

    fn delete(&self, storage: RedbGraph) -> StorageResult<()> {
        let path = storage.path().to_path_buf();
        drop(storage);
        fs::remove_file(&path)?;
        Ok(())
    }
}
