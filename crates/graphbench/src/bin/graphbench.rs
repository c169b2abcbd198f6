//! graphbench command line
//!
//! Runs one or more write workloads against a storage back end and prints
//! progress, summaries and a one-line report per run.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use graphbench::workload::{DEFAULT_BATCH_SIZE, DEFAULT_TOTAL};
use graphbench::{
    BenchConfig, BenchResult, BooleanProperty, RunReport, Workload, WorkloadRunner, WorkloadSpec,
};
use graphbench_storage::backends::{BatchedFactory, MemoryFactory, RedbConfig, RedbFactory};
use graphbench_storage::StorageFactory;
use tracing_subscriber::EnvFilter;

/// Graph storage write benchmark
#[derive(Parser, Debug)]
#[command(name = "graphbench")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Storage back end
    #[arg(short, long, value_enum, default_value = "redb")]
    backend: Backend,

    /// Workload to run (repeatable)
    #[arg(short, long = "workload", value_enum, default_value = "connected")]
    workloads: Vec<WorkloadArg>,

    /// Vertices per run
    #[arg(short = 'n', long, env = "GRAPHBENCH_TOTAL", default_value_t = DEFAULT_TOTAL)]
    total: u64,

    /// Loop iterations between commits
    #[arg(long, env = "GRAPHBENCH_BATCH_SIZE", default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: u64,

    /// Working directory (cleared before each run). Defaults to
    /// `GRAPHBENCH_DB_PATH`, then `<temp>/graphbench`
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Seed for edge targets
    #[arg(long, env = "GRAPHBENCH_SEED")]
    seed: Option<u64>,

    /// Store a real alternating boolean instead of integer zero
    #[arg(long)]
    alternating_boolean: bool,

    /// Additionally commit the store every N mutations
    #[arg(long)]
    buffer_size: Option<u64>,

    /// redb page cache size in bytes
    #[arg(long)]
    cache_size: Option<usize>,
}

/// Workload selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum WorkloadArg {
    /// Vertices without properties
    Empty,
    /// Vertices with five properties
    Properties,
    /// Vertices with five indexed properties
    Indexed,
    /// Vertices joined by random `knows` edges
    Connected,
    /// All of the above, in order
    All,
}

impl WorkloadArg {
    const fn workloads(self) -> &'static [Workload] {
        match self {
            Self::Empty => &[Workload::EmptyVertices],
            Self::Properties => &[Workload::VerticesWithProperties],
            Self::Indexed => &[Workload::VerticesWithPropertiesAndIndex],
            Self::Connected => &[Workload::ConnectedVertices],
            Self::All => &Workload::ALL,
        }
    }
}

/// Storage back ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum Backend {
    /// In-process maps, nothing on disk
    Memory,
    /// redb file in the working directory
    Redb,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("graphbench=info,graphbench_storage=info")),
        )
        .init();

    match run(&Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> BenchResult<()> {
    let config = cli.db_path.as_ref().map_or_else(BenchConfig::from_env, BenchConfig::new);
    let workloads = cli.workloads.iter().flat_map(|arg| arg.workloads().iter().copied());
    let boolean =
        if cli.alternating_boolean { BooleanProperty::Alternating } else { BooleanProperty::Zero };

    let mut redb_config = RedbConfig::new();
    if let Some(size) = cli.cache_size {
        redb_config = redb_config.cache_size(size);
    }
    let redb = RedbFactory::new(redb_config);

    let mut runner = WorkloadRunner::new(config);
    for workload in workloads {
        let spec = WorkloadSpec::new(workload)
            .total(cli.total)
            .batch_size(cli.batch_size)
            .seed(cli.seed)
            .boolean_property(boolean);

        let report = match cli.backend {
            Backend::Memory => run_buffered(&mut runner, &spec, MemoryFactory, cli.buffer_size)?,
            Backend::Redb => run_buffered(&mut runner, &spec, redb, cli.buffer_size)?,
        };
        println!("{report}");
    }
    Ok(())
}

fn run_buffered<F: StorageFactory>(
    runner: &mut WorkloadRunner,
    spec: &WorkloadSpec,
    factory: F,
    buffer_size: Option<u64>,
) -> BenchResult<RunReport> {
    match buffer_size {
        Some(size) => runner.run(spec, &BatchedFactory::new(factory, size)),
        None => runner.run(spec, &factory),
    }
}
