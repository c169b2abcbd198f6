//! The workload runner.
//!
//! A run prepares the working directory, opens a store, drives one workload
//! loop, shuts the store down, measures what it left on disk and deletes it.
//! Progress and summary lines go to the runner's output; everything else is
//! logged through `tracing`.

use std::fmt::Display;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use graphbench_core::{EdgeLabel, ElementKind, VertexId};
use graphbench_storage::{Capabilities, GraphStorage, StorageFactory, StorageResult};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use crate::config::BenchConfig;
use crate::dir_util::{clean_directory, dir_size};
use crate::error::{BenchError, BenchResult};
use crate::progress::{Clock, ProgressTracker, SystemClock};
use crate::report::RunReport;
use crate::workload::{
    edge_target, person_properties, vertex_properties, Workload, WorkloadSpec, EDGES_PER_VERTEX,
    KNOWS, PROPERTY_KEYS,
};

/// Stores are always opened in bulk-load mode.
const MASSIVE_INSERTS: bool = true;

/// Counts from the write loop.
#[derive(Debug)]
struct LoopOutcome<C> {
    edges: u64,
    edge_failures: u64,
    edge_progress: Option<ProgressTracker<C>>,
    seed: Option<u64>,
}

impl<C> LoopOutcome<C> {
    const fn vertices_only() -> Self {
        Self { edges: 0, edge_failures: 0, edge_progress: None, seed: None }
    }
}

/// Drives workloads against storage back ends.
#[derive(Debug)]
pub struct WorkloadRunner<W = io::Stdout, C = SystemClock> {
    config: BenchConfig,
    out: W,
    clock: C,
}

impl WorkloadRunner<io::Stdout> {
    /// A runner printing to standard output.
    #[must_use]
    pub fn new(config: BenchConfig) -> Self {
        Self::with_output(config, io::stdout())
    }
}

impl<W: Write> WorkloadRunner<W> {
    /// A runner printing progress and summary lines to `out`.
    pub fn with_output(config: BenchConfig, out: W) -> Self {
        Self { config, out, clock: SystemClock::new() }
    }
}

impl<W: Write, C: Clock + Clone> WorkloadRunner<W, C> {
    /// Time progress lines and summaries against `clock` instead of the wall
    /// clock.
    pub fn with_clock<C2: Clock + Clone>(self, clock: C2) -> WorkloadRunner<W, C2> {
        WorkloadRunner { config: self.config, out: self.out, clock }
    }

    /// The runner's configuration.
    pub const fn config(&self) -> &BenchConfig {
        &self.config
    }

    /// Consume the runner, returning its output.
    pub fn into_output(self) -> W {
        self.out
    }

    /// Run `spec` against a store opened by `factory`.
    ///
    /// # Errors
    ///
    /// See [`run_with`](Self::run_with).
    pub fn run<F: StorageFactory>(
        &mut self,
        spec: &WorkloadSpec,
        factory: &F,
    ) -> BenchResult<RunReport> {
        self.run_with(spec, |dir, massive| factory.open(dir, massive), |s| factory.delete(s))
    }

    /// Run `spec` against a store produced by `open` and disposed of by
    /// `delete`.
    ///
    /// The store is shut down and deleted whether or not the run succeeds.
    /// Cleanup failures after an error are logged and the original error is
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters are invalid, the working directory cannot be
    /// prepared, the store cannot be opened, a vertex or property write or a
    /// commit fails, the back end lacks a required capability, or the store
    /// cannot be shut down, measured or deleted.
    pub fn run_with<S, O, D>(
        &mut self,
        spec: &WorkloadSpec,
        open: O,
        delete: D,
    ) -> BenchResult<RunReport>
    where
        S: GraphStorage,
        O: FnOnce(&Path, bool) -> StorageResult<S>,
        D: FnOnce(S) -> StorageResult<()>,
    {
        spec.validate()?;
        let dir = self.config.working_dir.clone();
        prepare_working_dir(&dir)?;

        let mut storage = open(&dir, MASSIVE_INSERTS)?;
        info!(
            workload = %spec.workload,
            backend = storage.name(),
            dir = %dir.display(),
            total = spec.total,
            batch_size = spec.batch_size,
            "opened storage"
        );

        match self.drive(spec, &dir, &mut storage) {
            Ok(report) => {
                delete(storage)?;
                info!(workload = %spec.workload, "run complete");
                Ok(report)
            }
            Err(err) => {
                warn!(workload = %spec.workload, error = %err, "run failed, cleaning up");
                if let Err(shutdown_err) = storage.shutdown() {
                    warn!(error = %shutdown_err, "shutdown after failure failed");
                }
                if let Err(delete_err) = delete(storage) {
                    warn!(error = %delete_err, "delete after failure failed");
                }
                Err(err)
            }
        }
    }

    fn drive<S: GraphStorage>(
        &mut self,
        spec: &WorkloadSpec,
        dir: &Path,
        storage: &mut S,
    ) -> BenchResult<RunReport> {
        self.emit(format_args!(
            "Opened {} at {} (massive_inserts: {MASSIVE_INSERTS})",
            storage.name(),
            dir.display()
        ))?;

        let caps = storage.capabilities();
        if spec.workload.needs_key_index() {
            declare_key_indices(storage, caps)?;
        }

        let mut vertices = self.tracker(spec.total, "vertices");
        let outcome = match spec.workload {
            Workload::ConnectedVertices => {
                self.insert_connected(spec, storage, caps, &mut vertices)?
            }
            _ => {
                self.insert_vertices(spec, storage, caps, &mut vertices)?;
                LoopOutcome::vertices_only()
            }
        };

        storage.shutdown()?;
        let disk_size = dir_size(dir)?;

        let summary = vertices.done_with_size(spec.workload.action(), disk_size);
        self.emit(&summary)?;
        if let Some(edges) = &outcome.edge_progress {
            self.emit(edges.done_count_with_size("Inserted edges", outcome.edges, disk_size))?;
        }
        if outcome.edge_failures > 0 {
            warn!(failed = outcome.edge_failures, "some edges could not be created");
        }

        Ok(RunReport {
            workload: spec.workload,
            backend: storage.name().to_owned(),
            vertices: spec.total,
            edges: outcome.edges,
            edge_failures: outcome.edge_failures,
            elapsed: Duration::from_millis(summary.elapsed_ms),
            disk_size,
            seed: outcome.seed,
        })
    }

    fn insert_vertices<S: GraphStorage>(
        &mut self,
        spec: &WorkloadSpec,
        storage: &mut S,
        caps: Capabilities,
        progress: &mut ProgressTracker<C>,
    ) -> BenchResult<()> {
        let client_ids = caps.client_ids && spec.workload.requests_client_ids();
        let with_properties = spec.workload.writes_properties();

        for i in 0..spec.total {
            let id = client_ids.then(|| VertexId::new(i));
            let vertex =
                storage.create_vertex(id).map_err(BenchError::write("create-vertex", i))?;
            if with_properties {
                for (key, value) in vertex_properties(i, spec.boolean_property) {
                    storage
                        .set_property(&vertex, key, value)
                        .map_err(BenchError::write("set-property", i))?;
                }
            }

            if spec.is_batch_boundary(i) {
                commit_if_transactional(storage, caps, i)?;
                if let Some(update) = progress.report(i) {
                    self.emit(update)?;
                }
            }
        }
        Ok(())
    }

    fn insert_connected<S: GraphStorage>(
        &mut self,
        spec: &WorkloadSpec,
        storage: &mut S,
        caps: Capabilities,
        progress: &mut ProgressTracker<C>,
    ) -> BenchResult<LoopOutcome<C>> {
        let seed = spec.seed.unwrap_or_else(rand::random);
        let mut rng = StdRng::seed_from_u64(seed);
        debug!(seed, "edge targets seeded");

        let label = EdgeLabel::from(KNOWS);
        let mut edge_progress = self.tracker(spec.expected_edges(), "edges");
        let mut refs = Vec::new();
        let mut edges = 0;
        let mut edge_failures = 0;

        for i in 0..spec.total {
            let vertex =
                storage.create_vertex(None).map_err(BenchError::write("create-vertex", i))?;
            for (key, value) in person_properties(i) {
                storage
                    .set_property(&vertex, key, value)
                    .map_err(BenchError::write("set-property", i))?;
            }
            refs.push(vertex);

            let index = refs.len() - 1;
            if index > 1 {
                for _ in 0..EDGES_PER_VERTEX {
                    let target = edge_target(&mut rng, index);
                    match storage.create_edge(&label, &refs[index], &refs[target]) {
                        Ok(()) => edges += 1,
                        Err(err) => {
                            edge_failures += 1;
                            debug!(from = index, to = target, error = %err, "edge not created");
                        }
                    }
                }
            }

            if spec.is_batch_boundary(i) {
                commit_if_transactional(storage, caps, i)?;
                if let Some(update) = progress.report(i) {
                    self.emit(update)?;
                }
                if let Some(update) = edge_progress.report(edges) {
                    self.emit(update)?;
                }
            }
        }

        Ok(LoopOutcome { edges, edge_failures, edge_progress: Some(edge_progress), seed: Some(seed) })
    }

    fn tracker(&self, total: u64, unit: &str) -> ProgressTracker<C> {
        ProgressTracker::with_clock(total, unit, self.clock.clone())
    }

    fn emit(&mut self, line: impl Display) -> BenchResult<()> {
        debug!("{line}");
        writeln!(self.out, "{line}").map_err(BenchError::Output)
    }
}

/// Create the working directory if needed and empty it.
fn prepare_working_dir(dir: &Path) -> BenchResult<()> {
    fs::create_dir_all(dir).map_err(|e| BenchError::fs("create", dir, e))?;
    clean_directory(dir)
}

fn declare_key_indices<S: GraphStorage>(storage: &mut S, caps: Capabilities) -> BenchResult<()> {
    if !caps.key_indices {
        return Err(BenchError::Unsupported {
            backend: storage.name().to_owned(),
            capability: "vertex key indices",
        });
    }
    for key in PROPERTY_KEYS {
        storage.create_key_index(key, ElementKind::Vertex)?;
    }
    debug!(keys = ?PROPERTY_KEYS, "key indices declared");
    Ok(())
}

fn commit_if_transactional<S: GraphStorage>(
    storage: &mut S,
    caps: Capabilities,
    index: u64,
) -> BenchResult<()> {
    if caps.transactional {
        storage.commit().map_err(BenchError::write("commit", index))?;
    }
    Ok(())
}
