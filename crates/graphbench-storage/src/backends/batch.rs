//! Auto-committing batch decorator.
//!
//! [`BatchedGraph`] wraps another store and commits it after every
//! `buffer_size` mutations (vertex creations, property writes and edge
//! creations). This approximates how bulk loaders buffer writes, independent of
//! the harness's own commit batches.

use std::path::Path;

use graphbench_core::{EdgeLabel, ElementKind, Value, VertexId};
use tracing::trace;

use crate::engine::{Capabilities, GraphStorage, StorageFactory, StorageResult};

/// A store that commits its inner store every `buffer_size` mutations.
#[derive(Debug)]
pub struct BatchedGraph<S> {
    inner: S,
    name: String,
    buffer_size: u64,
    pending: u64,
    commits: u64,
}

impl<S: GraphStorage> BatchedGraph<S> {
    /// Wrap `inner`, committing every `buffer_size` mutations.
    ///
    /// A `buffer_size` of zero is treated as one.
    pub fn new(inner: S, buffer_size: u64) -> Self {
        let name = format!("batched({})", inner.name());
        Self { inner, name, buffer_size: buffer_size.max(1), pending: 0, commits: 0 }
    }

    /// The wrapped store.
    pub const fn inner(&self) -> &S {
        &self.inner
    }

    /// Unwrap the decorator.
    pub fn into_inner(self) -> S {
        self.inner
    }

    /// Number of automatic commits issued so far.
    pub const fn auto_commits(&self) -> u64 {
        self.commits
    }

    fn record_mutation(&mut self) -> StorageResult<()> {
        self.pending += 1;
        if self.pending >= self.buffer_size {
            self.pending = 0;
            if self.inner.capabilities().transactional {
                self.commits += 1;
                trace!(commits = self.commits, "auto-commit");
                self.inner.commit()?;
            }
        }
        Ok(())
    }
}

impl<S: GraphStorage> GraphStorage for BatchedGraph<S> {
    type VertexRef = S::VertexRef;

    fn name(&self) -> &str {
        &self.name
    }

    fn capabilities(&self) -> Capabilities {
        self.inner.capabilities()
    }

    fn create_vertex(&mut self, id: Option<VertexId>) -> StorageResult<S::VertexRef> {
        let vertex = self.inner.create_vertex(id)?;
        self.record_mutation()?;
        Ok(vertex)
    }

    fn set_property(
        &mut self,
        vertex: &S::VertexRef,
        key: &str,
        value: Value,
    ) -> StorageResult<()> {
        self.inner.set_property(vertex, key, value)?;
        self.record_mutation()
    }

    fn create_edge(
        &mut self,
        label: &EdgeLabel,
        from: &S::VertexRef,
        to: &S::VertexRef,
    ) -> StorageResult<()> {
        self.inner.create_edge(label, from, to)?;
        self.record_mutation()
    }

    fn create_key_index(&mut self, key: &str, kind: ElementKind) -> StorageResult<()> {
        self.inner.create_key_index(key, kind)
    }

    fn commit(&mut self) -> StorageResult<()> {
        self.pending = 0;
        self.inner.commit()
    }

    fn shutdown(&mut self) -> StorageResult<()> {
        self.inner.shutdown()
    }
}

/// Factory wrapping every store of an inner factory in a [`BatchedGraph`].
#[derive(Debug, Clone, Copy)]
pub struct BatchedFactory<F> {
    inner: F,
    buffer_size: u64,
}

impl<F: StorageFactory> BatchedFactory<F> {
    /// Wrap `inner`, committing its stores every `buffer_size` mutations.
    pub const fn new(inner: F, buffer_size: u64) -> Self {
        Self { inner, buffer_size }
    }
}

impl<F: StorageFactory> StorageFactory for BatchedFactory<F> {
    type Storage = BatchedGraph<F::Storage>;

    fn open(&self, dir: &Path, massive_inserts: bool) -> StorageResult<Self::Storage> {
        let inner = self.inner.open(dir, massive_inserts)?;
        Ok(BatchedGraph::new(inner, self.buffer_size))
    }

    fn delete(&self, storage: Self::Storage) -> StorageResult<()> {
        self.inner.delete(storage.into_inner())
    }
}
