//! Data models module
//!
//! Contains the integer grid that is written and read back, and the
//! timing records produced by the harness.

pub mod dataset;
pub mod result;

// Re-export commonly used types
pub use dataset::{Dataset, Shape};
pub use result::{BenchmarkReport, BenchmarkResult, Operation};
