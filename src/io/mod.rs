//! I/O helpers module
//!
//! Filesystem handling around the backend outputs.

pub mod output;

pub use output::{remove_output, OutputGuard};
