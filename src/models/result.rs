//! Benchmark result data models
//!
//! One `BenchmarkResult` per timed operation, collected into a
//! `BenchmarkReport` for the whole run. Results are printed, never stored.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::models::Shape;
use crate::util::units::format_seconds;

/// Kind of timed operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Write,
    Read,
}

impl Operation {
    /// Progress line printed before the operation starts, e.g. `Writing HDF5...`
    pub fn progress_line(&self, backend: &str) -> String {
        match self {
            Operation::Write => format!("Writing {}...", backend),
            Operation::Read => format!("Reading {}...", backend),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Write => f.write_str("write"),
            Operation::Read => f.write_str("read"),
        }
    }
}

/// Elapsed wall-clock time of one operation against one backend
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkResult {
    /// Display name of the backend, e.g. `HDF5`
    pub backend: String,
    pub operation: Operation,
    pub elapsed: Duration,
}

impl BenchmarkResult {
    pub fn new(backend: impl Into<String>, operation: Operation, elapsed: Duration) -> Self {
        Self {
            backend: backend.into(),
            operation,
            elapsed,
        }
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    /// Line printed once the operation has finished, e.g.
    /// `HDF5 write time: 0.012345 seconds`
    pub fn summary_line(&self) -> String {
        format!(
            "{} {} time: {} seconds",
            self.backend,
            self.operation,
            format_seconds(self.elapsed)
        )
    }

    /// Throughput in MiB/s for a transfer of `bytes`
    pub fn throughput_mibps(&self, bytes: u64) -> f64 {
        let secs = self.elapsed_secs();
        if secs > 0.0 {
            bytes as f64 / (1024.0 * 1024.0) / secs
        } else {
            0.0
        }
    }
}

/// All results of one run
#[derive(Debug, Clone)]
pub struct BenchmarkReport {
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// Seed of the generated dataset
    pub seed: Option<u64>,
    pub shape: Shape,
    /// Results in execution order
    pub results: Vec<BenchmarkResult>,
}

impl BenchmarkReport {
    pub fn new(shape: Shape, seed: Option<u64>) -> Self {
        Self {
            started_at: Utc::now(),
            seed,
            shape,
            results: Vec::new(),
        }
    }

    pub fn push(&mut self, result: BenchmarkResult) {
        self.results.push(result);
    }

    pub fn get(&self, backend: &str, operation: Operation) -> Option<&BenchmarkResult> {
        self.results
            .iter()
            .find(|r| r.backend == backend && r.operation == operation)
    }

    /// Sum of all timed operations
    pub fn total_elapsed(&self) -> Duration {
        self.results.iter().map(|r| r.elapsed).sum()
    }

    /// Backend with the shortest time for `operation`
    pub fn fastest(&self, operation: Operation) -> Option<&BenchmarkResult> {
        self.results
            .iter()
            .filter(|r| r.operation == operation)
            .min_by_key(|r| r.elapsed)
    }

    /// One-line summary for the log
    pub fn summary(&self) -> String {
        let mut parts: Vec<String> = self
            .results
            .iter()
            .map(|r| format!("{} {} {}s", r.backend, r.operation, format_seconds(r.elapsed)))
            .collect();
        parts.insert(
            0,
            format!("{} - {}", self.started_at.format("%Y-%m-%d %H:%M:%S UTC"), self.shape),
        );
        parts.join(" - ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_report() -> BenchmarkReport {
        let mut report = BenchmarkReport::new(Shape::new(1000, 1000), Some(42));
        report.push(BenchmarkResult::new("HDF5", Operation::Write, Duration::from_millis(12)));
        report.push(BenchmarkResult::new("ADIOS 2", Operation::Write, Duration::from_millis(8)));
        report.push(BenchmarkResult::new("HDF5", Operation::Read, Duration::from_millis(3)));
        report.push(BenchmarkResult::new("ADIOS 2", Operation::Read, Duration::from_millis(5)));
        report
    }

    #[test]
    fn test_progress_lines() {
        assert_eq!(Operation::Write.progress_line("HDF5"), "Writing HDF5...");
        assert_eq!(Operation::Read.progress_line("ADIOS 2"), "Reading ADIOS 2...");
    }

    #[test]
    fn test_summary_line() {
        let result = BenchmarkResult::new("ADIOS 2", Operation::Read, Duration::from_micros(1500));
        assert_eq!(result.summary_line(), "ADIOS 2 read time: 0.001500 seconds");
    }

    #[test]
    fn test_throughput() {
        let result = BenchmarkResult::new("HDF5", Operation::Write, Duration::from_secs(2));
        assert!((result.throughput_mibps(4 * 1024 * 1024) - 2.0).abs() < 1e-9);

        let instant = BenchmarkResult::new("HDF5", Operation::Write, Duration::ZERO);
        assert_eq!(instant.throughput_mibps(1024), 0.0);
    }

    #[test]
    fn test_report_queries() {
        let report = create_test_report();

        assert_eq!(report.total_elapsed(), Duration::from_millis(28));
        assert_eq!(report.fastest(Operation::Write).unwrap().backend, "ADIOS 2");
        assert_eq!(report.fastest(Operation::Read).unwrap().backend, "HDF5");
        assert_eq!(
            report.get("HDF5", Operation::Read).unwrap().elapsed,
            Duration::from_millis(3)
        );
        assert!(report.get("NetCDF", Operation::Read).is_none());
    }

    #[test]
    fn test_report_summary() {
        let summary = create_test_report().summary();
        assert!(summary.contains("1000 x 1000"));
        assert!(summary.contains("HDF5 write 0.012000s"));
        assert!(summary.contains("UTC"));
    }
}
