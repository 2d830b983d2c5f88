//! Raw bindings to the ADIOS 2 C API (`adios2_c.h`, serial build).
//!
//! Only the calls the backend needs are declared. Enumerations are passed as
//! `c_int` with the values from `adios2_c_types.h`.

#![allow(non_camel_case_types)]

use std::os::raw::{c_char, c_float, c_int, c_void};

#[repr(C)]
pub struct adios2_adios {
    _private: [u8; 0],
}

#[repr(C)]
pub struct adios2_io {
    _private: [u8; 0],
}

#[repr(C)]
pub struct adios2_variable {
    _private: [u8; 0],
}

#[repr(C)]
pub struct adios2_engine {
    _private: [u8; 0],
}

pub type adios2_error = c_int;
pub const ADIOS2_ERROR_NONE: adios2_error = 0;
pub const ADIOS2_ERROR_INVALID_ARGUMENT: adios2_error = 1;
pub const ADIOS2_ERROR_SYSTEM_ERROR: adios2_error = 2;
pub const ADIOS2_ERROR_RUNTIME_ERROR: adios2_error = 3;
pub const ADIOS2_ERROR_EXCEPTION: adios2_error = 4;

pub type adios2_type = c_int;
pub const ADIOS2_TYPE_UNKNOWN: adios2_type = -1;
pub const ADIOS2_TYPE_INT32_T: adios2_type = 7;

pub type adios2_constant_dims = c_int;
pub const ADIOS2_CONSTANT_DIMS_TRUE: adios2_constant_dims = 1;

pub type adios2_mode = c_int;
pub const ADIOS2_MODE_WRITE: adios2_mode = 1;
pub const ADIOS2_MODE_READ: adios2_mode = 2;
pub const ADIOS2_MODE_DEFERRED: adios2_mode = 4;

pub type adios2_step_mode = c_int;
pub const ADIOS2_STEP_MODE_APPEND: adios2_step_mode = 0;
pub const ADIOS2_STEP_MODE_READ: adios2_step_mode = 2;

pub type adios2_step_status = c_int;
pub const ADIOS2_STEP_STATUS_OK: adios2_step_status = 0;
pub const ADIOS2_STEP_STATUS_NOT_READY: adios2_step_status = 1;
pub const ADIOS2_STEP_STATUS_END_OF_STREAM: adios2_step_status = 2;

#[link(name = "adios2_c")]
extern "C" {
    pub fn adios2_init_serial() -> *mut adios2_adios;
    pub fn adios2_finalize(adios: *mut adios2_adios) -> adios2_error;

    pub fn adios2_declare_io(adios: *mut adios2_adios, name: *const c_char) -> *mut adios2_io;
    pub fn adios2_define_variable(
        io: *mut adios2_io,
        name: *const c_char,
        type_: adios2_type,
        ndims: usize,
        shape: *const usize,
        start: *const usize,
        count: *const usize,
        constant_dims: adios2_constant_dims,
    ) -> *mut adios2_variable;
    pub fn adios2_inquire_variable(io: *mut adios2_io, name: *const c_char)
        -> *mut adios2_variable;
    pub fn adios2_open(
        io: *mut adios2_io,
        name: *const c_char,
        mode: adios2_mode,
    ) -> *mut adios2_engine;

    pub fn adios2_variable_type(
        type_: *mut adios2_type,
        variable: *const adios2_variable,
    ) -> adios2_error;
    pub fn adios2_variable_ndims(ndims: *mut usize, variable: *const adios2_variable)
        -> adios2_error;
    pub fn adios2_variable_shape(shape: *mut usize, variable: *const adios2_variable)
        -> adios2_error;
    pub fn adios2_set_selection(
        variable: *mut adios2_variable,
        ndims: usize,
        start: *const usize,
        count: *const usize,
    ) -> adios2_error;

    pub fn adios2_begin_step(
        engine: *mut adios2_engine,
        mode: adios2_step_mode,
        timeout_seconds: c_float,
        status: *mut adios2_step_status,
    ) -> adios2_error;
    pub fn adios2_put(
        engine: *mut adios2_engine,
        variable: *mut adios2_variable,
        data: *const c_void,
        launch: adios2_mode,
    ) -> adios2_error;
    pub fn adios2_get(
        engine: *mut adios2_engine,
        variable: *mut adios2_variable,
        data: *mut c_void,
        launch: adios2_mode,
    ) -> adios2_error;
    pub fn adios2_end_step(engine: *mut adios2_engine) -> adios2_error;
    pub fn adios2_close(engine: *mut adios2_engine) -> adios2_error;
}

/// Description of an `adios2_error` code
pub fn error_description(code: adios2_error) -> &'static str {
    match code {
        ADIOS2_ERROR_NONE => "no error",
        ADIOS2_ERROR_INVALID_ARGUMENT => "invalid argument",
        ADIOS2_ERROR_SYSTEM_ERROR => "system error",
        ADIOS2_ERROR_RUNTIME_ERROR => "runtime error",
        ADIOS2_ERROR_EXCEPTION => "unhandled exception",
        _ => "unknown error",
    }
}
