//! C entry points for host code that fills `struct fnargs` itself.
//!
//! Both functions run the call on the native driver of the calling thread.
//! Errors never cross the boundary as panics; they are logged and turned
//! into sentinels.

use std::ffi::c_char;

use glwork_core::ffi::{FN_REJECTED, FN_SUCCESS};
use glwork_core::{DispatchError, FnArgs, FN_FAIL};
use tracing::error;

use crate::dispatch::process_fn;
use crate::native::NativeGl;

unsafe fn run(args: *const FnArgs, parg: *mut c_char) -> Result<usize, DispatchError> {
    let Some(args) = (unsafe { args.as_ref() }) else {
        return Err(DispatchError::NullRecord);
    };
    let mut gl = unsafe { NativeGl::load() }
        .map_err(|err| DispatchError::DriverUnavailable(format!("{err:#}")))?;
    unsafe { process_fn(&mut gl, args, parg) }
}

/// Execute one encoded call and return its result word.
///
/// Rejected calls return `FN_FAIL`, which a `GetAttribLocation` or
/// `GetUniformLocation` miss (`-1`) also produces; use `processFnChecked`
/// when the two must be told apart.
///
/// # Safety
///
/// `args` must point at a valid record whose addresses, like `parg`, are
/// valid for the function's slot layout. A GL context must be current.
#[export_name = "processFn"]
pub unsafe extern "C" fn process_fn_c(args: *const FnArgs, parg: *mut c_char) -> usize {
    match unsafe { run(args, parg) } {
        Ok(ret) => ret,
        Err(err) => {
            error!("processFn rejected call: {err}");
            FN_FAIL
        }
    }
}

/// Like `processFn`, but reports rejection through the return status and
/// stores the result word in `*ret`.
///
/// # Safety
///
/// As for `processFn`; `ret` must be null or valid for writes.
#[export_name = "processFnChecked"]
pub unsafe extern "C" fn process_fn_checked_c(
    args: *const FnArgs,
    parg: *mut c_char,
    ret: *mut usize,
) -> i32 {
    match unsafe { run(args, parg) } {
        Ok(value) => {
            if let Some(ret) = unsafe { ret.as_mut() } {
                *ret = value;
            }
            FN_SUCCESS
        }
        Err(err) => {
            error!("processFnChecked rejected call: {err}");
            FN_REJECTED
        }
    }
}
