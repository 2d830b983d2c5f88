//! Storage backends
//!
//! Each backend persists a [`Dataset`] through one I/O library and reads it
//! back. The harness only sees the [`StorageBackend`] trait, so backends can
//! be added without touching it.
//!
//! The library-backed implementations are behind cargo features because they
//! need the native libraries at build time:
//!
//! - `hdf5`: [`hdf5::Hdf5Backend`]
//! - `adios2`: [`adios2::Adios2Backend`]

use std::fmt;
use std::path::Path;

use crate::config::BenchConfig;
use crate::io::remove_output;
use crate::models::Dataset;
use crate::{IoCompareError, Result};

#[cfg(feature = "adios2")]
pub mod adios2;
#[cfg(feature = "hdf5")]
pub mod hdf5;

/// Persist and retrieve one dataset.
///
/// Every call acquires its library handles, finishes all transfers and
/// releases the handles before returning, on success and on error.
pub trait StorageBackend {
    /// Display name used in the report, e.g. `HDF5`
    fn name(&self) -> &str;

    /// File or directory this backend writes to and reads from
    fn output_path(&self) -> &Path;

    /// Write `dataset`, replacing any previous output.
    fn write(&mut self, dataset: &Dataset) -> Result<()>;

    /// Read the dataset back, checking it has the configured shape.
    fn read(&mut self) -> Result<Dataset>;

    /// Delete the output written by this backend, if any.
    fn remove_output(&self) -> Result<()> {
        remove_output(self.output_path())?;
        Ok(())
    }
}

/// The libraries under comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// Hierarchical file format
    Hdf5,
    /// Streaming, step-oriented I/O framework
    Adios2,
}

impl BackendKind {
    /// Benchmark order: library A first
    pub const ALL: [BackendKind; 2] = [BackendKind::Hdf5, BackendKind::Adios2];

    pub fn display_name(&self) -> &'static str {
        match self {
            BackendKind::Hdf5 => "HDF5",
            BackendKind::Adios2 => "ADIOS 2",
        }
    }

    /// Appended to the configured basename to form the output path
    pub fn file_suffix(&self) -> &'static str {
        match self {
            BackendKind::Hdf5 => "_hdf5.h5",
            BackendKind::Adios2 => "_adios2.bp",
        }
    }

    /// Cargo feature that compiles the backend in
    pub fn feature(&self) -> &'static str {
        match self {
            BackendKind::Hdf5 => "hdf5",
            BackendKind::Adios2 => "adios2",
        }
    }

    pub fn is_available(&self) -> bool {
        match self {
            BackendKind::Hdf5 => cfg!(feature = "hdf5"),
            BackendKind::Adios2 => cfg!(feature = "adios2"),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Create the backend for `kind`, configured from `config`
pub fn create_backend(kind: BackendKind, config: &BenchConfig) -> Result<Box<dyn StorageBackend>> {
    let path = config.output_path(kind);
    let shape = config.shape();

    match kind {
        #[cfg(feature = "hdf5")]
        BackendKind::Hdf5 => Ok(Box::new(hdf5::Hdf5Backend::new(path, shape))),
        #[cfg(feature = "adios2")]
        BackendKind::Adios2 => Ok(Box::new(adios2::Adios2Backend::new(path, shape))),
        #[allow(unreachable_patterns)]
        _ => {
            let _ = (path, shape);
            Err(IoCompareError::BackendUnavailable {
                backend: kind.display_name().to_string(),
                feature: kind.feature(),
            })
        }
    }
}

/// Create both backends in benchmark order
pub fn create_backends(config: &BenchConfig) -> Result<Vec<Box<dyn StorageBackend>>> {
    BackendKind::ALL
        .iter()
        .map(|&kind| create_backend(kind, config))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!(BackendKind::Hdf5.to_string(), "HDF5");
        assert_eq!(BackendKind::Adios2.to_string(), "ADIOS 2");
        assert_eq!(BackendKind::ALL[0], BackendKind::Hdf5);
    }

    #[test]
    fn test_create_backend_matches_features() {
        let config = BenchConfig::default();
        for kind in BackendKind::ALL {
            match create_backend(kind, &config) {
                Ok(backend) => {
                    assert!(kind.is_available());
                    assert_eq!(backend.name(), kind.display_name());
                    assert_eq!(backend.output_path(), config.output_path(kind));
                }
                Err(IoCompareError::BackendUnavailable { feature, .. }) => {
                    assert!(!kind.is_available());
                    assert_eq!(feature, kind.feature());
                }
                Err(e) => panic!("unexpected error: {}", e),
            }
        }
    }
}
