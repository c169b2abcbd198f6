//! Core storage traits.

use std::path::Path;

use graphbench_core::{EdgeLabel, ElementKind, Value, VertexId};

use super::{StorageError, StorageResult};

/// Optional features a back end supports.
///
/// The harness consults these flags instead of probing the back end with
/// calls that might fail halfway through a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    /// `commit` establishes a transactional boundary. Non-transactional back
    /// ends are never asked to commit.
    pub transactional: bool,
    /// `create_key_index` is implemented.
    pub key_indices: bool,
    /// `create_vertex` honours a caller-supplied id.
    pub client_ids: bool,
}

impl Capabilities {
    /// A back end with no optional features.
    #[must_use]
    pub const fn none() -> Self {
        Self { transactional: false, key_indices: false, client_ids: false }
    }

    /// Mark the back end as transactional.
    #[must_use]
    pub const fn transactional(mut self, yes: bool) -> Self {
        self.transactional = yes;
        self
    }

    /// Mark the back end as supporting key indices.
    #[must_use]
    pub const fn key_indices(mut self, yes: bool) -> Self {
        self.key_indices = yes;
        self
    }

    /// Mark the back end as honouring client-assigned vertex ids.
    #[must_use]
    pub const fn client_ids(mut self, yes: bool) -> Self {
        self.client_ids = yes;
        self
    }
}

/// An open graph store under benchmark.
///
/// A handle is owned exclusively by one run. Every write may fail; the
/// harness decides which failures are fatal.
///
/// # Example
///
/// ```ignore
/// fn insert_pair<S: GraphStorage>(graph: &mut S) -> StorageResult<()> {
///     let a = graph.create_vertex(None)?;
///     let b = graph.create_vertex(None)?;
///     graph.create_edge(&EdgeLabel::from("knows"), &a, &b)?;
///     if graph.capabilities().transactional {
///         graph.commit()?;
///     }
///     Ok(())
/// }
/// ```
pub trait GraphStorage {
    /// Opaque reference to a created vertex.
    type VertexRef: Clone;

    /// Human-readable name of the back end, used in run output.
    fn name(&self) -> &str;

    /// The optional features this back end supports.
    fn capabilities(&self) -> Capabilities;

    /// Create a vertex.
    ///
    /// `id` is a requested identifier. Back ends without
    /// [`Capabilities::client_ids`] ignore it and assign their own.
    ///
    /// # Errors
    ///
    /// Returns an error if the vertex cannot be written or the id is taken.
    fn create_vertex(&mut self, id: Option<VertexId>) -> StorageResult<Self::VertexRef>;

    /// Set a property on a vertex, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the property cannot be written.
    fn set_property(
        &mut self,
        vertex: &Self::VertexRef,
        key: &str,
        value: Value,
    ) -> StorageResult<()>;

    /// Create a directed edge from `from` to `to`.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge cannot be written.
    fn create_edge(
        &mut self,
        label: &EdgeLabel,
        from: &Self::VertexRef,
        to: &Self::VertexRef,
    ) -> StorageResult<()>;

    /// Declare a secondary index on a property key.
    ///
    /// The default implementation reports the capability as missing.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unsupported`] unless the back end overrides it.
    fn create_key_index(&mut self, key: &str, kind: ElementKind) -> StorageResult<()> {
        Err(StorageError::Unsupported(format!(
            "{} has no key index for {kind} property '{key}'",
            self.name()
        )))
    }

    /// Commit pending writes. A no-op for non-transactional back ends.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Transaction`] if the commit fails.
    fn commit(&mut self) -> StorageResult<()> {
        Ok(())
    }

    /// Flush everything and release the store. Writes after shutdown fail
    /// with [`StorageError::Closed`].
    ///
    /// # Errors
    ///
    /// Returns an error if pending writes cannot be persisted.
    fn shutdown(&mut self) -> StorageResult<()>;
}

/// Opens and deletes stores for the harness.
pub trait StorageFactory {
    /// The store type this factory produces.
    type Storage: GraphStorage;

    /// Open a fresh store in `dir`.
    ///
    /// `massive_inserts` is advisory: the back end may trade durability of
    /// intermediate commits or index maintenance for load speed.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Open`] if the store cannot be created.
    fn open(&self, dir: &Path, massive_inserts: bool) -> StorageResult<Self::Storage>;

    /// Delete a store that has been shut down, removing its files.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing files cannot be removed.
    fn delete(&self, storage: Self::Storage) -> StorageResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capabilities_builder() {
        let caps = Capabilities::none().transactional(true).client_ids(true);
        assert!(caps.transactional);
        assert!(!caps.key_indices);
        assert!(caps.client_ids);
        assert_eq!(Capabilities::default(), Capabilities::none());
    }
}
