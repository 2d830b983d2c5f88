//! Benchmark harness
//!
//! Generates one dataset, then writes it through every backend and reads it
//! back through every backend, timing each call. The order is fixed:
//! all writes in backend order, then all reads in backend order.

use std::io::Write;
use std::time::{Duration, Instant};

use rand::Rng;

use crate::backend::StorageBackend;
use crate::bench::DatasetGenerator;
use crate::config::BenchConfig;
use crate::models::{BenchmarkReport, BenchmarkResult, Dataset, Operation};
use crate::util::units::{format_bytes, format_throughput};
use crate::{IoCompareError, Result};

/// Progress of a run. Indices refer to the backend list given to the harness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarnessState {
    Init,
    Generated,
    /// Backend `n` finished its write
    Written(usize),
    /// Backend `n` finished its read
    Read(usize),
    Done,
}

/// Runs the timed write/read sequence over a list of backends
pub struct Harness {
    config: BenchConfig,
    backends: Vec<Box<dyn StorageBackend>>,
    state: HarnessState,
}

impl Harness {
    /// Create a harness; the configuration is validated here.
    pub fn new(config: BenchConfig, backends: Vec<Box<dyn StorageBackend>>) -> Result<Self> {
        config.validate()?;

        if backends.is_empty() {
            return Err(IoCompareError::Config(
                "At least one storage backend is required".to_string(),
            ));
        }

        Ok(Self {
            config,
            backends,
            state: HarnessState::Init,
        })
    }

    pub fn state(&self) -> HarnessState {
        self.state
    }

    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    pub fn backend_names(&self) -> Vec<&str> {
        self.backends.iter().map(|b| b.name()).collect()
    }

    /// Execute the full sequence, printing the report lines to `out`.
    ///
    /// The first failing operation aborts the run; no later operation is
    /// attempted and the state stays at the last completed step.
    pub fn run<R: Rng>(
        &mut self,
        generator: &mut DatasetGenerator<R>,
        out: &mut dyn Write,
    ) -> Result<BenchmarkReport> {
        if self.state != HarnessState::Init {
            return Err(IoCompareError::Config(
                "Harness has already been run".to_string(),
            ));
        }

        let shape = self.config.shape();
        let dataset = generator.generate(shape);
        self.state = HarnessState::Generated;

        let mut report = BenchmarkReport::new(shape, generator.seed());
        tracing::info!(
            %shape,
            size = %format_bytes(dataset.byte_len()),
            seed = ?generator.seed(),
            backends = ?self.backend_names(),
            "dataset generated"
        );
        writeln!(out, "Dataset size: {}", shape)?;

        for index in 0..self.backends.len() {
            let backend = &mut self.backends[index];
            let result = timed_operation(backend.as_mut(), Operation::Write, out, |b| {
                b.write(&dataset)
            })?;
            log_result(&result, dataset.byte_len());
            report.push(result);
            self.state = HarnessState::Written(index);
        }

        for index in 0..self.backends.len() {
            let backend = &mut self.backends[index];
            let (loaded, result) =
                timed_operation_with(backend.as_mut(), Operation::Read, out, |b| b.read())?;
            log_result(&result, dataset.byte_len());

            if self.config.verify {
                verify(backend.name(), &dataset, &loaded)?;
            }
            report.push(result);
            self.state = HarnessState::Read(index);
        }

        self.state = HarnessState::Done;

        if !self.config.keep_files {
            for backend in &self.backends {
                backend.remove_output()?;
            }
        }

        tracing::info!(summary = %report.summary(), "benchmark complete");
        Ok(report)
    }
}

/// Time `f` against `backend`, bracketing it with the progress and timing
/// lines. Failures carry the operation and backend name.
fn timed_operation_with<T, F>(
    backend: &mut dyn StorageBackend,
    operation: Operation,
    out: &mut dyn Write,
    f: F,
) -> Result<(T, BenchmarkResult)>
where
    F: FnOnce(&mut dyn StorageBackend) -> Result<T>,
{
    let name = backend.name().to_string();
    writeln!(out, "{}", operation.progress_line(&name))?;
    out.flush()?;

    let (value, elapsed) = measure(|| f(backend)).map_err(|e| {
        tracing::error!(backend = %name, %operation, error = %e, "operation failed");
        IoCompareError::Operation {
            operation,
            backend: name.clone(),
            source: Box::new(e),
        }
    })?;

    let result = BenchmarkResult::new(name, operation, elapsed);
    writeln!(out, "{}", result.summary_line())?;
    Ok((value, result))
}

fn timed_operation<F>(
    backend: &mut dyn StorageBackend,
    operation: Operation,
    out: &mut dyn Write,
    f: F,
) -> Result<BenchmarkResult>
where
    F: FnOnce(&mut dyn StorageBackend) -> Result<()>,
{
    timed_operation_with(backend, operation, out, f).map(|((), result)| result)
}

/// Wall-clock time of `f`
pub fn measure<T>(f: impl FnOnce() -> Result<T>) -> Result<(T, Duration)> {
    let start = Instant::now();
    let value = f()?;
    Ok((value, start.elapsed()))
}

fn verify(backend: &str, written: &Dataset, loaded: &Dataset) -> Result<()> {
    if loaded.shape() != written.shape() {
        return Err(IoCompareError::ShapeMismatch {
            backend: backend.to_string(),
            expected: written.shape().to_string(),
            found: loaded.shape().to_string(),
        });
    }

    match written.first_difference(loaded) {
        None => Ok(()),
        Some((index, expected, found)) => Err(IoCompareError::Verification {
            backend: backend.to_string(),
            index,
            expected,
            found,
        }),
    }
}

fn log_result(result: &BenchmarkResult, bytes: u64) {
    tracing::info!(
        backend = %result.backend,
        operation = %result.operation,
        seconds = result.elapsed_secs(),
        throughput = %format_throughput(result.throughput_mibps(bytes)),
        "operation timed"
    );
}
