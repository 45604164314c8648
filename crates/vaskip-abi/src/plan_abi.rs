//! C entry points that describe what a printf format consumes.
//!
//! A C wrapper calls `vaskip_plan` once, then walks its own `va_list` with
//! one `va_arg` per returned code (see [`crate::ctype`] for the numbering).
//!
//! Return values follow `snprintf`: the full count is returned even when it
//! exceeds `cap`, and only the first `cap` codes are written. Negative
//! values are errors.
//!
//! `mode` selects the malformed-input policy: [`VASKIP_MODE_STRICT`],
//! [`VASKIP_MODE_COMPAT`], or anything else for the process default
//! (`VASKIP_MODE` environment variable).

use std::ffi::{CStr, c_char, c_int};

use vaskip_core::{
    AdvanceError, AdvanceOptions, ArgCursor, ArgType, ScanMode, advance_with, scan_mode,
};

use crate::ctype::{from_code, type_code};

/// Null format, or null output buffer with non-zero capacity.
pub const VASKIP_EINVAL: isize = -1;
/// The format contains a malformed directive (strict mode only).
pub const VASKIP_EMALFORMED: isize = -2;

pub const VASKIP_MODE_STRICT: c_int = 0;
pub const VASKIP_MODE_COMPAT: c_int = 1;

fn options_for(mode: c_int) -> AdvanceOptions {
    let mode = match mode {
        VASKIP_MODE_STRICT => ScanMode::Strict,
        VASKIP_MODE_COMPAT => ScanMode::Compat,
        _ => scan_mode(),
    };
    AdvanceOptions::from_mode(mode)
}

/// Cursor that writes type codes into a caller buffer and counts past its end.
struct CodeSink<'a> {
    out: &'a mut [u8],
    count: usize,
}

impl ArgCursor for CodeSink<'_> {
    fn consume_as(&mut self, ty: ArgType) -> Result<(), AdvanceError> {
        if let Some(slot) = self.out.get_mut(self.count) {
            *slot = type_code(ty);
        }
        self.count += 1;
        Ok(())
    }
}

/// Safe core of `vaskip_plan`.
pub fn plan_into(fmt: &[u8], mode: c_int, out: &mut [u8]) -> isize {
    let mut sink = CodeSink { out, count: 0 };
    match advance_with(&mut sink, fmt, &options_for(mode)) {
        Ok(_) => isize::try_from(sink.count).unwrap_or(isize::MAX),
        Err(_) => VASKIP_EMALFORMED,
    }
}

abi_fn! {
    /// Write the type codes `fmt` consumes into `out[..cap]`; return their count.
    fn vaskip_plan(fmt: *const c_char, mode: c_int, out: *mut u8, cap: usize) -> isize {
        if fmt.is_null() || (out.is_null() && cap != 0) {
            return VASKIP_EINVAL;
        }
        let bytes = CStr::from_ptr(fmt).to_bytes();
        let out: &mut [u8] = if cap == 0 {
            &mut []
        } else {
            std::slice::from_raw_parts_mut(out, cap)
        };
        plan_into(bytes, mode, out)
    }
}

abi_fn! {
    /// Number of `va_arg` reads `fmt` implies.
    fn vaskip_count(fmt: *const c_char, mode: c_int) -> isize {
        vaskip_plan(fmt, mode, std::ptr::null_mut(), 0)
    }
}

/// Size in bytes of the C type behind `code`, or 0 for an unknown code.
#[unsafe(no_mangle)]
pub extern "C" fn vaskip_type_size(code: u8) -> usize {
    from_code(code).map_or(0, ArgType::size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_writes_codes_in_order() {
        let mut out = [0xFF_u8; 8];
        let n = unsafe {
            vaskip_plan(
                c"%s=%*d %lf".as_ptr(),
                VASKIP_MODE_STRICT,
                out.as_mut_ptr(),
                8,
            )
        };
        assert_eq!(n, 4);
        assert_eq!(
            &out[..4],
            &[
                type_code(ArgType::CharPtr),
                type_code(ArgType::Int),
                type_code(ArgType::Int),
                type_code(ArgType::Double),
            ]
        );
        assert_eq!(out[4], 0xFF);
    }

    #[test]
    fn plan_truncates_like_snprintf() {
        let mut out = [0_u8; 1];
        let n = plan_into(b"%d %d %d", VASKIP_MODE_STRICT, &mut out);
        assert_eq!(n, 3);
        assert_eq!(out[0], type_code(ArgType::Int));
    }

    #[test]
    fn count_and_errors() {
        unsafe {
            assert_eq!(vaskip_count(c"%%%zu%hhn".as_ptr(), VASKIP_MODE_STRICT), 2);
            assert_eq!(vaskip_count(std::ptr::null(), VASKIP_MODE_STRICT), VASKIP_EINVAL);
            assert_eq!(
                vaskip_plan(c"%d".as_ptr(), VASKIP_MODE_STRICT, std::ptr::null_mut(), 4),
                VASKIP_EINVAL
            );
            assert_eq!(vaskip_count(c"%hs".as_ptr(), VASKIP_MODE_STRICT), VASKIP_EMALFORMED);
            assert_eq!(vaskip_count(c"%*hs".as_ptr(), VASKIP_MODE_COMPAT), 1);
        }
    }

    #[test]
    fn type_size_by_code() {
        assert_eq!(vaskip_type_size(type_code(ArgType::Int)), 4);
        assert_eq!(vaskip_type_size(type_code(ArgType::LongLong)), 8);
        assert_eq!(vaskip_type_size(200), 0);
    }
}
