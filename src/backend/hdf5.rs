//! Hierarchical file backend
//!
//! Stores the grid as a single contiguous 2-D dataset named `dataset` in an
//! HDF5 file.

use std::path::{Path, PathBuf};

use hdf5::types::{IntSize, TypeDescriptor};

use crate::backend::{BackendKind, StorageBackend};
use crate::io::OutputGuard;
use crate::models::{Dataset, Shape};
use crate::{IoCompareError, Result};

/// Name of the dataset inside the file
pub const DATASET_NAME: &str = "dataset";

const BACKEND: &str = "HDF5";

/// HDF5 storage backend
#[derive(Debug, Clone)]
pub struct Hdf5Backend {
    path: PathBuf,
    shape: Shape,
}

impl Hdf5Backend {
    pub fn new(path: impl Into<PathBuf>, shape: Shape) -> Self {
        Self {
            path: path.into(),
            shape,
        }
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    fn write_file(&self, dataset: &Dataset) -> Result<()> {
        let file = hdf5::File::create(&self.path)
            .map_err(|e| resource(format!("cannot create {}: {}", self.path.display(), e)))?;

        let shape = dataset.shape();
        let ds = file
            .new_dataset::<i32>()
            .shape((shape.rows, shape.cols))
            .create(DATASET_NAME)
            .map_err(|e| resource(format!("cannot create dataset '{}': {}", DATASET_NAME, e)))?;
        tracing::debug!(path = %self.path.display(), %shape, "created dataset");

        ds.write_raw(dataset.as_slice())
            .map_err(|e| resource(format!("cannot write dataset '{}': {}", DATASET_NAME, e)))?;

        // Dataset (and its dataspace) before the file.
        drop(ds);
        file.close()
            .map_err(|e| resource(format!("cannot close {}: {}", self.path.display(), e)))?;

        Ok(())
    }

    fn check_layout(&self, ds: &hdf5::Dataset) -> Result<()> {
        let dtype = ds
            .dtype()
            .and_then(|t| t.to_descriptor())
            .map_err(|e| resource(format!("cannot inspect element type: {}", e)))?;

        if dtype != TypeDescriptor::Integer(IntSize::U4) {
            return Err(IoCompareError::ShapeMismatch {
                backend: BACKEND.to_string(),
                expected: "32-bit signed integer elements".to_string(),
                found: format!("{:?} elements", dtype),
            });
        }

        let stored = ds.shape();
        if stored != self.shape.dims() {
            return Err(IoCompareError::ShapeMismatch {
                backend: BACKEND.to_string(),
                expected: self.shape.to_string(),
                found: format_dims(&stored),
            });
        }

        Ok(())
    }
}

impl StorageBackend for Hdf5Backend {
    fn name(&self) -> &str {
        BackendKind::Hdf5.display_name()
    }

    fn output_path(&self) -> &Path {
        &self.path
    }

    fn write(&mut self, dataset: &Dataset) -> Result<()> {
        let guard = OutputGuard::new(&self.path);
        self.write_file(dataset)?;
        guard.commit();
        Ok(())
    }

    fn read(&mut self) -> Result<Dataset> {
        if !self.path.is_file() {
            return Err(IoCompareError::not_found(BACKEND, "file", &self.path));
        }

        let file = hdf5::File::open(&self.path)
            .map_err(|e| resource(format!("cannot open {}: {}", self.path.display(), e)))?;

        if !file.link_exists(DATASET_NAME) {
            return Err(IoCompareError::not_found(
                BACKEND,
                format!("dataset '{}'", DATASET_NAME),
                &self.path,
            ));
        }

        let ds = file
            .dataset(DATASET_NAME)
            .map_err(|e| resource(format!("cannot open dataset '{}': {}", DATASET_NAME, e)))?;
        self.check_layout(&ds)?;

        let cells = ds
            .read_raw::<i32>()
            .map_err(|e| resource(format!("cannot read dataset '{}': {}", DATASET_NAME, e)))?;

        drop(ds);
        file.close()
            .map_err(|e| resource(format!("cannot close {}: {}", self.path.display(), e)))?;

        Dataset::from_vec(self.shape, cells)
    }
}

fn resource(message: String) -> IoCompareError {
    IoCompareError::resource(BACKEND, message)
}

fn format_dims(dims: &[usize]) -> String {
    dims.iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join(" x ")
}
