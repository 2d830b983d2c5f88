//! Benchmark engine module
//!
//! Dataset generation and the timed write/read sequence.

pub mod generator;
pub mod harness;

pub use generator::{clock_seed, DatasetGenerator};
pub use harness::{measure, Harness, HarnessState};
