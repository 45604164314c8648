//! Helper macros for the C boundary.
//!
//! - `abi_fn!` generates `#[unsafe(no_mangle)] pub unsafe extern "C" fn` wrappers.
//! - [`va_advance!`] advances a `va_list`-like handle past a format's arguments.

/// Generate an ABI-compatible extern "C" function.
///
/// # Usage
///
/// ```ignore
/// abi_fn! {
///     /// Doc comment for the function.
///     fn my_func(arg1: Type1, arg2: Type2) -> ReturnType {
///         // implementation body
///     }
/// }
/// ```
macro_rules! abi_fn {
    (
        $(#[$meta:meta])*
        fn $name:ident( $($arg:ident : $argty:ty),* $(,)? ) -> $ret:ty
        $body:block
    ) => {
        $(#[$meta])*
        #[unsafe(no_mangle)]
        pub unsafe extern "C" fn $name( $($arg : $argty),* ) -> $ret {
            unsafe { $body }
        }
    };
}

#[allow(unused_imports)]
pub(crate) use abi_fn;

/// Advance a `va_list` past the arguments a printf format reads.
///
/// `$ap` is a `&mut` to anything with an `unsafe fn arg::<T>(&mut self) -> T`
/// method: a nightly `core::ffi::VaListImpl`, or a test double. `$fmt` is the
/// format as `&[u8]`. An optional third argument supplies
/// `vaskip_core::AdvanceOptions`; the default rejects malformed directives.
///
/// Evaluates to `Result<usize, AdvanceError>` with the number of arguments
/// consumed. The plan is checked before any argument is read, so on error
/// the `va_list` has not moved.
///
/// # Safety
///
/// Must be used inside an `unsafe` context. The caller guarantees that the
/// `va_list` holds arguments of the types the format names; a mismatch is
/// undefined behavior, exactly as with `vprintf`.
///
/// ```ignore
/// unsafe extern "C" fn log_with_tag(fmt: *const c_char, mut args: ...) -> c_int {
///     let fmt = unsafe { CStr::from_ptr(fmt) }.to_bytes();
///     if unsafe { vaskip_abi::va_advance!(&mut args, fmt) }.is_err() {
///         return -1;
///     }
///     unsafe { args.arg::<c_int>() }
/// }
/// ```
#[macro_export]
macro_rules! va_advance {
    ($ap:expr, $fmt:expr) => {
        $crate::va_advance!($ap, $fmt, $crate::__private::AdvanceOptions::default())
    };
    ($ap:expr, $fmt:expr, $options:expr) => {{
        let ap = $ap;
        let options: $crate::__private::AdvanceOptions = $options;
        match $crate::__private::consumption_plan($fmt, &options) {
            Err(err) => Err(err),
            Ok(plan) => match plan.iter().copied().find(|&ty| !$crate::ctype::va_readable(ty)) {
                Some(ty) => Err($crate::__private::AdvanceError::UnsupportedType { ty }),
                None => {
                    for &ty in &plan {
                        $crate::__va_arg_as!(ap, ty);
                    }
                    Ok::<usize, $crate::__private::AdvanceError>(plan.len())
                }
            },
        }
    }};
}

/// Read and discard one argument of `$ty` from `$ap`. Internal to [`va_advance!`].
#[doc(hidden)]
#[macro_export]
macro_rules! __va_arg_as {
    ($ap:ident, $ty:expr) => {{
        use $crate::__private::ArgType as T;
        use $crate::__private::libc as c;
        match $ty {
            T::Int => {
                let _ = $ap.arg::<c::c_int>();
            }
            T::UInt => {
                let _ = $ap.arg::<c::c_uint>();
            }
            T::Long => {
                let _ = $ap.arg::<c::c_long>();
            }
            T::ULong => {
                let _ = $ap.arg::<c::c_ulong>();
            }
            T::LongLong => {
                let _ = $ap.arg::<c::c_longlong>();
            }
            T::ULongLong => {
                let _ = $ap.arg::<c::c_ulonglong>();
            }
            T::IntMax => {
                let _ = $ap.arg::<c::intmax_t>();
            }
            T::UIntMax => {
                let _ = $ap.arg::<c::uintmax_t>();
            }
            T::SSize => {
                let _ = $ap.arg::<c::ssize_t>();
            }
            T::Size | T::UPtrDiff => {
                let _ = $ap.arg::<c::size_t>();
            }
            T::PtrDiff => {
                let _ = $ap.arg::<c::ptrdiff_t>();
            }
            T::Double => {
                let _ = $ap.arg::<c::c_double>();
            }
            // `wint_t` promotes to `unsigned int` on every supported libc.
            T::WInt => {
                let _ = $ap.arg::<c::c_uint>();
            }
            T::CharPtr => {
                let _ = $ap.arg::<*const c::c_char>();
            }
            T::WCharPtr => {
                let _ = $ap.arg::<*const c::wchar_t>();
            }
            T::VoidPtr => {
                let _ = $ap.arg::<*mut c::c_void>();
            }
            T::SCharPtr => {
                let _ = $ap.arg::<*mut c::c_schar>();
            }
            T::ShortPtr => {
                let _ = $ap.arg::<*mut c::c_short>();
            }
            T::IntPtr => {
                let _ = $ap.arg::<*mut c::c_int>();
            }
            T::LongPtr => {
                let _ = $ap.arg::<*mut c::c_long>();
            }
            T::LongLongPtr => {
                let _ = $ap.arg::<*mut c::c_longlong>();
            }
            T::IntMaxPtr => {
                let _ = $ap.arg::<*mut c::intmax_t>();
            }
            T::SizePtr => {
                let _ = $ap.arg::<*mut c::size_t>();
            }
            T::PtrDiffPtr => {
                let _ = $ap.arg::<*mut c::ptrdiff_t>();
            }
            // Filtered out by `va_readable` before any argument is read.
            T::LongDouble => {}
        }
    }};
}
