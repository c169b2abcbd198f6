//! Per-run results.

use std::fmt;
use std::time::Duration;

use crate::dir_util::human_readable_bytes;
use crate::workload::Workload;

/// What one run measured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Workload that ran.
    pub workload: Workload,
    /// Back end name.
    pub backend: String,
    /// Vertices written.
    pub vertices: u64,
    /// Edges written.
    pub edges: u64,
    /// Edge writes that failed and were skipped.
    pub edge_failures: u64,
    /// Time from the first write to the end of shutdown.
    pub elapsed: Duration,
    /// Bytes in the working directory after shutdown.
    pub disk_size: u64,
    /// Seed used for edge targets, if the workload draws any.
    pub seed: Option<u64>,
}

impl RunReport {
    /// Vertices per second over the whole run.
    pub fn vertex_throughput(&self) -> f64 {
        per_second(self.vertices, self.elapsed)
    }

    /// Edges per second over the whole run.
    pub fn edge_throughput(&self) -> f64 {
        per_second(self.edges, self.elapsed)
    }
}

fn per_second(count: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64().max(0.001);
    count as f64 / secs
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}: {} vertices, {} edges in {:.3}s ({:.0} vertices/sec",
            self.workload,
            self.backend,
            self.vertices,
            self.edges,
            self.elapsed.as_secs_f64(),
            self.vertex_throughput(),
        )?;
        if self.edges > 0 {
            write!(f, ", {:.0} edges/sec", self.edge_throughput())?;
        }
        write!(f, "), disk size: {}", human_readable_bytes(self.disk_size, false))?;
        if self.edge_failures > 0 {
            write!(f, ", {} failed edges", self.edge_failures)?;
        }
        if let Some(seed) = self.seed {
            write!(f, ", seed {seed}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> RunReport {
        RunReport {
            workload: Workload::ConnectedVertices,
            backend: "redb".to_owned(),
            vertices: 1000,
            edges: 2994,
            edge_failures: 0,
            elapsed: Duration::from_millis(500),
            disk_size: 2048,
            seed: Some(42),
        }
    }

    #[test]
    fn throughput() {
        let report = report();
        assert!((report.vertex_throughput() - 2000.0).abs() < f64::EPSILON);
        assert!((report.edge_throughput() - 5988.0).abs() < f64::EPSILON);
    }

    #[test]
    fn display() {
        assert_eq!(
            report().to_string(),
            "connected/redb: 1000 vertices, 2994 edges in 0.500s \
             (2000 vertices/sec, 5988 edges/sec), disk size: 2.0 KiB, seed 42"
        );
    }

    #[test]
    fn display_without_edges() {
        let report = RunReport {
            workload: Workload::EmptyVertices,
            edges: 0,
            seed: None,
            edge_failures: 0,
            ..report()
        };
        assert_eq!(
            report.to_string(),
            "empty/redb: 1000 vertices, 0 edges in 0.500s (2000 vertices/sec), disk size: 2.0 KiB"
        );
    }
}
