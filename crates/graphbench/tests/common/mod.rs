//! A recording storage back end for runner tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use graphbench::ManualClock;
use graphbench_core::{EdgeLabel, ElementKind, Value, VertexId};
use graphbench_storage::{
    Capabilities, GraphStorage, StorageError, StorageFactory, StorageResult,
};

/// File the recording factory writes into the working directory.
pub const STORE_FILE: &str = "recording.bin";

/// How far a commit moves the recording clock.
pub const COMMIT_MILLIS: u64 = 1000;

/// One call made against the store.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateVertex(Option<VertexId>),
    SetProperty(usize, String, Value),
    CreateEdge(String, usize, usize),
    CreateKeyIndex(String),
    Commit,
    Shutdown,
    Delete,
}

pub type CallLog = Rc<RefCell<Vec<Call>>>;

/// Records every call. Vertex refs are creation positions.
#[derive(Debug)]
pub struct RecordingStorage {
    log: CallLog,
    caps: Capabilities,
    vertices: usize,
    edge_attempts: u64,
    fail_edge_every: Option<u64>,
    fail_vertex_at: Option<usize>,
    file: Option<PathBuf>,
    clock: Option<ManualClock>,
    closed: bool,
}

impl RecordingStorage {
    fn record(&self, call: Call) {
        self.log.borrow_mut().push(call);
    }

    fn check_open(&self) -> StorageResult<()> {
        if self.closed {
            Err(StorageError::Closed)
        } else {
            Ok(())
        }
    }
}

impl GraphStorage for RecordingStorage {
    type VertexRef = usize;

    fn name(&self) -> &str {
        "recording"
    }

    fn capabilities(&self) -> Capabilities {
        self.caps
    }

    fn create_vertex(&mut self, id: Option<VertexId>) -> StorageResult<usize> {
        self.check_open()?;
        if self.fail_vertex_at == Some(self.vertices) {
            return Err(StorageError::Internal("disk full".to_owned()));
        }
        self.record(Call::CreateVertex(id));
        self.vertices += 1;
        Ok(self.vertices - 1)
    }

    fn set_property(&mut self, vertex: &usize, key: &str, value: Value) -> StorageResult<()> {
        self.check_open()?;
        self.record(Call::SetProperty(*vertex, key.to_owned(), value));
        Ok(())
    }

    fn create_edge(&mut self, label: &EdgeLabel, from: &usize, to: &usize) -> StorageResult<()> {
        self.check_open()?;
        self.edge_attempts += 1;
        if self.fail_edge_every.is_some_and(|n| self.edge_attempts % n == 0) {
            return Err(StorageError::NotFound(format!("vertex {to}")));
        }
        self.record(Call::CreateEdge(label.as_str().to_owned(), *from, *to));
        Ok(())
    }

    fn create_key_index(&mut self, key: &str, _kind: ElementKind) -> StorageResult<()> {
        if !self.caps.key_indices {
            return Err(StorageError::Unsupported("key indices".to_owned()));
        }
        self.record(Call::CreateKeyIndex(key.to_owned()));
        Ok(())
    }

    fn commit(&mut self) -> StorageResult<()> {
        self.check_open()?;
        self.record(Call::Commit);
        if let Some(clock) = &self.clock {
            clock.advance(COMMIT_MILLIS);
        }
        Ok(())
    }

    fn shutdown(&mut self) -> StorageResult<()> {
        self.closed = true;
        self.record(Call::Shutdown);
        Ok(())
    }
}

/// Opens [`RecordingStorage`] sharing one call log.
#[derive(Debug, Clone, Default)]
pub struct RecordingFactory {
    pub log: CallLog,
    pub caps: Capabilities,
    pub fail_edge_every: Option<u64>,
    pub fail_vertex_at: Option<usize>,
    pub file_size: Option<usize>,
    /// Advanced by [`COMMIT_MILLIS`] on every commit.
    pub clock: Option<ManualClock>,
}

impl RecordingFactory {
    pub fn new(caps: Capabilities) -> Self {
        Self { caps, ..Self::default() }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.log.borrow().clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.log.borrow().iter().filter(|c| pred(c)).count()
    }

    pub fn edges(&self) -> Vec<(usize, usize)> {
        self.log
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::CreateEdge(_, from, to) => Some((*from, *to)),
                _ => None,
            })
            .collect()
    }
}

impl StorageFactory for RecordingFactory {
    type Storage = RecordingStorage;

    fn open(&self, dir: &Path, _massive_inserts: bool) -> StorageResult<RecordingStorage> {
        let file = match self.file_size {
            Some(size) => {
                let path = dir.join(STORE_FILE);
                fs::write(&path, vec![0u8; size])?;
                Some(path)
            }
            None => None,
        };
        Ok(RecordingStorage {
            log: Rc::clone(&self.log),
            caps: self.caps,
            vertices: 0,
            edge_attempts: 0,
            fail_edge_every: self.fail_edge_every,
            fail_vertex_at: self.fail_vertex_at,
            file,
            clock: self.clock.clone(),
            closed: false,
        })
    }

    fn delete(&self, storage: RecordingStorage) -> StorageResult<()> {
        storage.record(Call::Delete);
        if let Some(path) = &storage.file {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}
