//! Workload definitions.
//!
//! Every workload writes `total` vertices in a single loop and, for each
//! index that is a multiple of the batch size, commits (transactional back
//! ends only) and offers progress.

use std::fmt;

use graphbench_core::Value;
use rand::Rng;

use crate::error::{BenchError, BenchResult};

/// Default number of vertices per run.
pub const DEFAULT_TOTAL: u64 = 1_000_000;

/// Default number of loop iterations between commits.
pub const DEFAULT_BATCH_SIZE: u64 = 10_000;

/// Outgoing `knows` edges per vertex in the connected workload.
pub const EDGES_PER_VERTEX: u64 = 3;

/// Label of the connected workload's edges.
pub const KNOWS: &str = "knows";

/// Added to the loop index for the `long` property.
pub const LONG_OFFSET: i64 = 10_340_340_350_530_355;

/// Value of the `string` property.
pub const LONG_STRING: &str = "Some longer string that we need to add as property to the vertex";

/// Property keys written by the property workloads, in write order.
pub const PROPERTY_KEYS: [&str; 5] = ["int", "long", "name", "string", "boolean"];

/// Number of distinct `age` values in the connected workload.
pub const AGE_MODULUS: u64 = 100;

/// The kind of load a run generates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Workload {
    /// Bare vertices.
    EmptyVertices,
    /// Vertices with five properties each.
    VerticesWithProperties,
    /// Like `properties`, with a key index declared on every key first.
    VerticesWithPropertiesAndIndex,
    /// Vertices with `name`/`age` and three random `knows` edges each.
    ConnectedVertices,
}

impl Workload {
    /// Every workload, in declaration order.
    pub const ALL: [Self; 4] = [
        Self::EmptyVertices,
        Self::VerticesWithProperties,
        Self::VerticesWithPropertiesAndIndex,
        Self::ConnectedVertices,
    ];

    /// Short name used on the command line and in logs.
    pub const fn name(self) -> &'static str {
        match self {
            Self::EmptyVertices => "empty",
            Self::VerticesWithProperties => "properties",
            Self::VerticesWithPropertiesAndIndex => "indexed",
            Self::ConnectedVertices => "connected",
        }
    }

    /// Action label of the vertex summary line.
    pub const fn action(self) -> &'static str {
        match self {
            Self::EmptyVertices => "Inserted empty vertices",
            Self::VerticesWithProperties => "Inserting vertices with properties",
            Self::VerticesWithPropertiesAndIndex => {
                "Inserting vertices with properties using indices"
            }
            Self::ConnectedVertices => "Inserted connected vertices",
        }
    }

    /// Whether the workload declares key indices before writing.
    pub const fn needs_key_index(self) -> bool {
        matches!(self, Self::VerticesWithPropertiesAndIndex)
    }

    /// Whether the workload requests the loop index as vertex id.
    pub const fn requests_client_ids(self) -> bool {
        matches!(self, Self::EmptyVertices | Self::VerticesWithProperties)
    }

    /// Whether the workload writes the five standard properties.
    pub const fn writes_properties(self) -> bool {
        matches!(self, Self::VerticesWithProperties | Self::VerticesWithPropertiesAndIndex)
    }
}

impl fmt::Display for Workload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What the `boolean` property holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BooleanProperty {
    /// Integer zero for every vertex, matching the established benchmark
    /// output so results stay comparable.
    #[default]
    Zero,
    /// A real boolean, true for odd indices.
    Alternating,
}

impl BooleanProperty {
    /// Value for loop index `index`.
    pub const fn value(self, index: u64) -> Value {
        match self {
            Self::Zero => Value::Int(0),
            Self::Alternating => Value::Bool(index % 2 == 1),
        }
    }
}

/// Parameters of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkloadSpec {
    /// Workload kind.
    pub workload: Workload,
    /// Number of vertices.
    pub total: u64,
    /// Loop iterations between commits and progress offers.
    pub batch_size: u64,
    /// Seed for edge targets. Drawn at random when absent.
    pub seed: Option<u64>,
    /// Contents of the `boolean` property.
    pub boolean_property: BooleanProperty,
}

impl WorkloadSpec {
    /// A spec with default sizes.
    pub const fn new(workload: Workload) -> Self {
        Self {
            workload,
            total: DEFAULT_TOTAL,
            batch_size: DEFAULT_BATCH_SIZE,
            seed: None,
            boolean_property: BooleanProperty::Zero,
        }
    }

    /// Set the number of vertices.
    #[must_use]
    pub const fn total(mut self, total: u64) -> Self {
        self.total = total;
        self
    }

    /// Set the batch size.
    #[must_use]
    pub const fn batch_size(mut self, batch_size: u64) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Set or clear the seed.
    #[must_use]
    pub const fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Choose what the `boolean` property holds.
    #[must_use]
    pub const fn boolean_property(mut self, policy: BooleanProperty) -> Self {
        self.boolean_property = policy;
        self
    }

    /// Check the parameters before anything is opened.
    ///
    /// # Errors
    ///
    /// Returns [`BenchError::InvalidSpec`] for a zero batch size or a total
    /// that does not fit the integer properties.
    pub fn validate(&self) -> BenchResult<()> {
        if self.batch_size == 0 {
            return Err(BenchError::InvalidSpec("batch size must be positive".to_owned()));
        }
        if i64::try_from(self.total).is_err() {
            return Err(BenchError::InvalidSpec(format!(
                "total {} exceeds the largest integer property",
                self.total
            )));
        }
        Ok(())
    }

    /// Whether loop index `index` ends a batch.
    pub const fn is_batch_boundary(&self, index: u64) -> bool {
        index % self.batch_size == 0
    }

    /// Number of batch boundaries in a full run.
    pub const fn commit_count(&self) -> u64 {
        self.total.div_ceil(self.batch_size)
    }

    /// Number of edges the connected workload attempts.
    pub const fn expected_edges(&self) -> u64 {
        self.total.saturating_sub(2) * EDGES_PER_VERTEX
    }
}

fn to_int(index: u64) -> i64 {
    i64::try_from(index).unwrap_or(i64::MAX)
}

/// The five standard properties of vertex `index`, in write order.
pub fn vertex_properties(index: u64, boolean: BooleanProperty) -> [(&'static str, Value); 5] {
    let i = to_int(index);
    [
        ("int", Value::Int(i)),
        ("long", Value::Int(LONG_OFFSET.saturating_add(i))),
        ("name", Value::String(format!("name{index}"))),
        ("string", Value::String(LONG_STRING.to_owned())),
        ("boolean", boolean.value(index)),
    ]
}

/// The `name` and `age` properties of connected vertex `index`.
pub fn person_properties(index: u64) -> [(&'static str, Value); 2] {
    [
        ("name", Value::String(format!("person{index}"))),
        ("age", Value::Int(to_int(index % AGE_MODULUS))),
    ]
}

/// Target position for an edge out of the vertex at position `index`.
///
/// Uniform over `[0, index - 1)`: the two most recent vertices, including the
/// source itself, are never chosen.
///
/// # Panics
///
/// Panics if `index < 2`.
pub fn edge_target<R: Rng + ?Sized>(rng: &mut R, index: usize) -> usize {
    rng.gen_range(0..index - 1)
}
