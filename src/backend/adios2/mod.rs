//! Streaming step backend
//!
//! Writes the grid as the variable `data` in a single step of an ADIOS 2
//! stream and reads that first step back. Every call runs a complete
//! session: init, declare I/O, open engine, one step, close, finalize.

pub mod ffi;
pub mod session;

use std::path::{Path, PathBuf};

use crate::backend::{BackendKind, StorageBackend};
use crate::io::OutputGuard;
use crate::models::{Dataset, Shape};
use crate::{IoCompareError, Result};

pub use session::{Adios, Communicator, Engine, Io, OpenMode, Step, StepMode, Variable};

/// Name of the I/O context declared in every session
pub const IO_NAME: &str = "IO";
/// Name of the stored variable
pub const VARIABLE_NAME: &str = "data";

const BACKEND: &str = "ADIOS 2";

/// ADIOS 2 storage backend
#[derive(Debug, Clone)]
pub struct Adios2Backend {
    path: PathBuf,
    shape: Shape,
    communicator: Communicator,
}

impl Adios2Backend {
    pub fn new(path: impl Into<PathBuf>, shape: Shape) -> Self {
        Self {
            path: path.into(),
            shape,
            communicator: Communicator::Serial,
        }
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    fn write_stream(&self, dataset: &Dataset) -> Result<()> {
        let adios = Adios::init(self.communicator)?;
        {
            let io = adios.declare_io(IO_NAME)?;
            let variable = io.define_i32_array(VARIABLE_NAME, dataset.shape())?;
            let mut engine = io.open(&self.path, OpenMode::Write)?;

            let mut step = engine.begin_step(StepMode::Append)?.ok_or_else(|| {
                IoCompareError::resource(BACKEND, "writer has no step to append to")
            })?;
            step.put_deferred(&variable, dataset.as_slice())?;
            step.end()?;

            engine.close()?;
        }
        adios.finalize()
    }

    fn read_stream(&self) -> Result<Dataset> {
        let adios = Adios::init(self.communicator)?;
        let mut dataset = Dataset::zeros(self.shape);
        {
            let io = adios.declare_io(IO_NAME)?;
            let mut engine = io.open(&self.path, OpenMode::Read)?;

            // Only the first step is read.
            let mut step = engine
                .begin_step(StepMode::Read)?
                .ok_or_else(|| IoCompareError::not_found(BACKEND, "step 0", &self.path))?;

            let mut variable = io.inquire_variable(VARIABLE_NAME)?.ok_or_else(|| {
                IoCompareError::not_found(
                    BACKEND,
                    format!("variable '{}'", VARIABLE_NAME),
                    &self.path,
                )
            })?;
            self.check_layout(&variable)?;
            variable.select_all(self.shape)?;

            step.get_deferred(&variable, dataset.as_mut_slice())?;
            step.end()?;

            engine.close()?;
        }
        adios.finalize()?;

        Ok(dataset)
    }

    fn check_layout(&self, variable: &Variable<'_>) -> Result<()> {
        if !variable.is_i32()? {
            return Err(IoCompareError::ShapeMismatch {
                backend: BACKEND.to_string(),
                expected: "int32_t elements".to_string(),
                found: "another element type".to_string(),
            });
        }

        let stored = variable.shape()?;
        if stored != self.shape.dims() {
            return Err(IoCompareError::ShapeMismatch {
                backend: BACKEND.to_string(),
                expected: self.shape.to_string(),
                found: format!("{:?}", stored),
            });
        }

        Ok(())
    }
}

impl StorageBackend for Adios2Backend {
    fn name(&self) -> &str {
        BackendKind::Adios2.display_name()
    }

    fn output_path(&self) -> &Path {
        &self.path
    }

    fn write(&mut self, dataset: &Dataset) -> Result<()> {
        let guard = OutputGuard::new(&self.path);
        self.write_stream(dataset)?;
        guard.commit();
        Ok(())
    }

    fn read(&mut self) -> Result<Dataset> {
        if !self.path.exists() {
            return Err(IoCompareError::not_found(BACKEND, "stream", &self.path));
        }

        self.read_stream()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_round_trip_2x2() {
        let dir = tempdir().unwrap();
        let shape = Shape::new(2, 2);
        let mut backend = Adios2Backend::new(dir.path().join("t_adios2.bp"), shape);

        let original = Dataset::from_vec(shape, vec![1, 2, 3, 4]).unwrap();
        backend.write(&original).unwrap();
        let loaded = backend.read().unwrap();

        assert_eq!(loaded, original);
    }

    #[test]
    fn test_missing_stream_is_not_found() {
        let dir = tempdir().unwrap();
        let mut backend = Adios2Backend::new(dir.path().join("absent.bp"), Shape::new(2, 2));

        let err = backend.read().unwrap_err();
        assert!(matches!(err, IoCompareError::NotFound { .. }));
    }
}
