//! Variadic C entry points (nightly `c_variadic`).
//!
//! Each function takes a printf format and its arguments, followed by one
//! extra argument of its own. It skips the format arguments with
//! [`va_advance!`](crate::va_advance) and returns the extra argument.

use std::ffi::{CStr, c_char, c_int, c_long};

/// Skip `fmt`'s arguments and return the `int` that follows them, or -1.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn vaskip_trailing_int(fmt: *const c_char, mut args: ...) -> c_int {
    if fmt.is_null() {
        return -1;
    }
    let bytes = unsafe { CStr::from_ptr(fmt) }.to_bytes();
    match unsafe { crate::va_advance!(&mut args, bytes) } {
        Ok(_) => unsafe { args.arg::<c_int>() },
        Err(_) => -1,
    }
}

/// Skip `fmt`'s arguments and return the `long` that follows them, or -1.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn vaskip_trailing_long(fmt: *const c_char, mut args: ...) -> c_long {
    if fmt.is_null() {
        return -1;
    }
    let bytes = unsafe { CStr::from_ptr(fmt) }.to_bytes();
    match unsafe { crate::va_advance!(&mut args, bytes) } {
        Ok(_) => unsafe { args.arg::<c_long>() },
        Err(_) => -1,
    }
}
