//! Safe RAII wrappers over the ADIOS 2 C handles.
//!
//! Handle lifetimes follow the library's ownership: the I/O context,
//! variables and engines are owned by the session (`Adios`) and borrow it, so
//! they cannot outlive `adios2_finalize`. A [`Step`] borrows its engine and
//! every buffer handed to a deferred put/get until the step ends, which is
//! when the library completes those transfers.

use std::ffi::CString;
use std::marker::PhantomData;
use std::os::raw::c_void;
use std::path::Path;
use std::ptr::NonNull;

use super::ffi;
use crate::models::Shape;
use crate::{IoCompareError, Result};

const BACKEND: &str = "ADIOS 2";

/// Group of cooperating processes a session is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Communicator {
    /// Degenerate single-participant group; no MPI involved
    #[default]
    Serial,
}

/// Engine open mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    Write,
    Read,
}

impl OpenMode {
    fn raw(self) -> ffi::adios2_mode {
        match self {
            OpenMode::Write => ffi::ADIOS2_MODE_WRITE,
            OpenMode::Read => ffi::ADIOS2_MODE_READ,
        }
    }
}

/// Step mode passed to `begin_step`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepMode {
    Append,
    Read,
}

impl StepMode {
    fn raw(self) -> ffi::adios2_step_mode {
        match self {
            StepMode::Append => ffi::ADIOS2_STEP_MODE_APPEND,
            StepMode::Read => ffi::ADIOS2_STEP_MODE_READ,
        }
    }
}

fn check(code: ffi::adios2_error, call: &str) -> Result<()> {
    if code == ffi::ADIOS2_ERROR_NONE {
        Ok(())
    } else {
        Err(IoCompareError::resource(
            BACKEND,
            format!("{} failed: {}", call, ffi::error_description(code)),
        ))
    }
}

fn c_string(value: &str) -> Result<CString> {
    CString::new(value).map_err(|_| {
        IoCompareError::backend_init(BACKEND, format!("name contains a NUL byte: {:?}", value))
    })
}

/// An initialized ADIOS 2 session; finalized on drop.
pub struct Adios {
    raw: NonNull<ffi::adios2_adios>,
}

impl Adios {
    pub fn init(communicator: Communicator) -> Result<Self> {
        let raw = match communicator {
            // SAFETY: no preconditions; returns null on failure.
            Communicator::Serial => unsafe { ffi::adios2_init_serial() },
        };

        let raw = NonNull::new(raw)
            .ok_or_else(|| IoCompareError::backend_init(BACKEND, "adios2_init_serial returned null"))?;
        tracing::debug!(?communicator, "adios2 session initialized");
        Ok(Self { raw })
    }

    /// Declare a named I/O context
    pub fn declare_io(&self, name: &str) -> Result<Io<'_>> {
        let c_name = c_string(name)?;
        // SAFETY: session pointer is live for &self; name is NUL-terminated.
        let raw = unsafe { ffi::adios2_declare_io(self.raw.as_ptr(), c_name.as_ptr()) };

        let raw = NonNull::new(raw).ok_or_else(|| {
            IoCompareError::backend_init(BACKEND, format!("cannot declare I/O context '{}'", name))
        })?;
        Ok(Io {
            raw,
            _session: PhantomData,
        })
    }

    /// Finalize the session, reporting the library status.
    pub fn finalize(self) -> Result<()> {
        let raw = self.raw;
        std::mem::forget(self);
        // SAFETY: raw came from adios2_init_serial and is finalized only here.
        check(unsafe { ffi::adios2_finalize(raw.as_ptr()) }, "adios2_finalize")
    }
}

impl Drop for Adios {
    fn drop(&mut self) {
        // SAFETY: raw is live; finalize() forgets self so this runs at most once.
        let code = unsafe { ffi::adios2_finalize(self.raw.as_ptr()) };
        if code != ffi::ADIOS2_ERROR_NONE {
            tracing::warn!(error = ffi::error_description(code), "adios2_finalize failed");
        }
    }
}

/// I/O context owned by a session
pub struct Io<'s> {
    raw: NonNull<ffi::adios2_io>,
    _session: PhantomData<&'s Adios>,
}

impl<'s> Io<'s> {
    /// Define a constant-shape 2-D `i32` global array covering the whole shape
    pub fn define_i32_array(&self, name: &str, shape: Shape) -> Result<Variable<'s>> {
        let c_name = c_string(name)?;
        let dims = shape.dims();
        let start = [0usize; 2];

        // SAFETY: io is live for 's; the dimension arrays outlive the call.
        let raw = unsafe {
            ffi::adios2_define_variable(
                self.raw.as_ptr(),
                c_name.as_ptr(),
                ffi::ADIOS2_TYPE_INT32_T,
                dims.len(),
                dims.as_ptr(),
                start.as_ptr(),
                dims.as_ptr(),
                ffi::ADIOS2_CONSTANT_DIMS_TRUE,
            )
        };

        let raw = NonNull::new(raw).ok_or_else(|| {
            IoCompareError::backend_init(BACKEND, format!("cannot define variable '{}'", name))
        })?;
        Ok(Variable {
            raw,
            _session: PhantomData,
        })
    }

    /// Look up a variable of the current step; `None` if it is absent.
    pub fn inquire_variable(&self, name: &str) -> Result<Option<Variable<'s>>> {
        let c_name = c_string(name)?;
        // SAFETY: io is live for 's; name is NUL-terminated.
        let raw = unsafe { ffi::adios2_inquire_variable(self.raw.as_ptr(), c_name.as_ptr()) };

        Ok(NonNull::new(raw).map(|raw| Variable {
            raw,
            _session: PhantomData,
        }))
    }

    /// Open an engine on `path`
    pub fn open(&self, path: &Path, mode: OpenMode) -> Result<Engine<'s>> {
        let path_str = path.to_str().ok_or_else(|| {
            IoCompareError::resource(BACKEND, format!("path is not UTF-8: {}", path.display()))
        })?;
        let c_path = CString::new(path_str).map_err(|_| {
            IoCompareError::resource(BACKEND, format!("path contains a NUL byte: {}", path.display()))
        })?;

        // SAFETY: io is live for 's; path is NUL-terminated.
        let raw = unsafe { ffi::adios2_open(self.raw.as_ptr(), c_path.as_ptr(), mode.raw()) };

        let raw = NonNull::new(raw).ok_or_else(|| {
            IoCompareError::resource(
                BACKEND,
                format!("cannot open engine ({:?}) on {}", mode, path.display()),
            )
        })?;
        tracing::debug!(path = %path.display(), ?mode, "adios2 engine opened");
        Ok(Engine {
            raw,
            _session: PhantomData,
        })
    }
}

/// Variable handle owned by an I/O context
pub struct Variable<'s> {
    raw: NonNull<ffi::adios2_variable>,
    _session: PhantomData<&'s Adios>,
}

impl Variable<'_> {
    pub fn is_i32(&self) -> Result<bool> {
        let mut type_: ffi::adios2_type = ffi::ADIOS2_TYPE_UNKNOWN;
        // SAFETY: variable is live; out-pointer is valid.
        check(
            unsafe { ffi::adios2_variable_type(&mut type_, self.raw.as_ptr()) },
            "adios2_variable_type",
        )?;
        Ok(type_ == ffi::ADIOS2_TYPE_INT32_T)
    }

    /// Global shape of the variable
    pub fn shape(&self) -> Result<Vec<usize>> {
        let mut ndims = 0usize;
        // SAFETY: variable is live; out-pointer is valid.
        check(
            unsafe { ffi::adios2_variable_ndims(&mut ndims, self.raw.as_ptr()) },
            "adios2_variable_ndims",
        )?;

        let mut dims = vec![0usize; ndims];
        if ndims > 0 {
            // SAFETY: dims holds exactly ndims entries.
            check(
                unsafe { ffi::adios2_variable_shape(dims.as_mut_ptr(), self.raw.as_ptr()) },
                "adios2_variable_shape",
            )?;
        }
        Ok(dims)
    }

    /// Select the whole 2-D array for the next get
    pub fn select_all(&mut self, shape: Shape) -> Result<()> {
        let dims = shape.dims();
        let start = [0usize; 2];
        // SAFETY: variable is live; both arrays hold ndims entries.
        check(
            unsafe {
                ffi::adios2_set_selection(self.raw.as_ptr(), dims.len(), start.as_ptr(), dims.as_ptr())
            },
            "adios2_set_selection",
        )
    }
}

/// Open engine; closed on drop if not closed explicitly.
pub struct Engine<'s> {
    raw: NonNull<ffi::adios2_engine>,
    _session: PhantomData<&'s Adios>,
}

impl Engine<'_> {
    /// Begin a step. Returns `None` when the stream has no further step.
    pub fn begin_step<'b>(&mut self, mode: StepMode) -> Result<Option<Step<'_, 'b>>> {
        let mut status = ffi::ADIOS2_STEP_STATUS_OK;
        // SAFETY: engine is live; status out-pointer is valid. A negative
        // timeout blocks until the step is available.
        check(
            unsafe { ffi::adios2_begin_step(self.raw.as_ptr(), mode.raw(), -1.0, &mut status) },
            "adios2_begin_step",
        )?;

        match status {
            ffi::ADIOS2_STEP_STATUS_OK => Ok(Some(Step {
                engine: self.raw,
                ended: false,
                _engine: PhantomData,
                _buffers: PhantomData,
            })),
            ffi::ADIOS2_STEP_STATUS_END_OF_STREAM => Ok(None),
            ffi::ADIOS2_STEP_STATUS_NOT_READY => Err(IoCompareError::resource(
                BACKEND,
                "adios2_begin_step: step not ready",
            )),
            _ => Err(IoCompareError::resource(
                BACKEND,
                format!("adios2_begin_step: step status {}", status),
            )),
        }
    }

    /// Close the engine, flushing outstanding output.
    pub fn close(self) -> Result<()> {
        let raw = self.raw;
        std::mem::forget(self);
        // SAFETY: raw is live and closed only here.
        check(unsafe { ffi::adios2_close(raw.as_ptr()) }, "adios2_close")
    }
}

impl Drop for Engine<'_> {
    fn drop(&mut self) {
        // SAFETY: raw is live; close() forgets self so this runs at most once.
        let code = unsafe { ffi::adios2_close(self.raw.as_ptr()) };
        if code != ffi::ADIOS2_ERROR_NONE {
            tracing::warn!(error = ffi::error_description(code), "adios2_close failed");
        }
    }
}

/// An open step. Buffers given to deferred puts/gets stay borrowed for `'b`
/// and are only complete once [`Step::end`] returns.
pub struct Step<'e, 'b> {
    engine: NonNull<ffi::adios2_engine>,
    ended: bool,
    _engine: PhantomData<&'e mut ()>,
    _buffers: PhantomData<&'b mut [i32]>,
}

impl<'e, 'b> Step<'e, 'b> {
    /// Schedule a write of `data`; it is transferred no later than `end`.
    pub fn put_deferred(&mut self, variable: &Variable<'_>, data: &'b [i32]) -> Result<()> {
        // SAFETY: engine and variable are live; data stays borrowed until the
        // step ends, which is when the library consumes it.
        check(
            unsafe {
                ffi::adios2_put(
                    self.engine.as_ptr(),
                    variable.raw.as_ptr(),
                    data.as_ptr() as *const c_void,
                    ffi::ADIOS2_MODE_DEFERRED,
                )
            },
            "adios2_put",
        )
    }

    /// Schedule a read into `data`; it is filled no later than `end`.
    pub fn get_deferred(&mut self, variable: &Variable<'_>, data: &'b mut [i32]) -> Result<()> {
        // SAFETY: as for put_deferred; data is exclusively borrowed until the
        // library has written into it.
        check(
            unsafe {
                ffi::adios2_get(
                    self.engine.as_ptr(),
                    variable.raw.as_ptr(),
                    data.as_mut_ptr() as *mut c_void,
                    ffi::ADIOS2_MODE_DEFERRED,
                )
            },
            "adios2_get",
        )
    }

    /// End the step, completing every deferred transfer.
    pub fn end(mut self) -> Result<()> {
        self.ended = true;
        // SAFETY: engine is live for 'e.
        check(unsafe { ffi::adios2_end_step(self.engine.as_ptr()) }, "adios2_end_step")
    }
}

impl Drop for Step<'_, '_> {
    fn drop(&mut self) {
        if !self.ended {
            // SAFETY: engine is live for 'e; the borrowed buffers are still
            // alive, so completing the deferred transfers is sound.
            let code = unsafe { ffi::adios2_end_step(self.engine.as_ptr()) };
            if code != ffi::ADIOS2_ERROR_NONE {
                tracing::warn!(error = ffi::error_description(code), "adios2_end_step failed");
            }
        }
    }
}
