#![cfg_attr(feature = "c-variadic", feature(c_variadic))]
// All extern "C" exports accept raw pointers from C callers and document
// their contract at module level.
#![allow(clippy::missing_safety_doc)]
//! # vaskip-abi
//!
//! C boundary for `vaskip-core`.
//!
//! Two ways to skip a printf argument list from outside safe Rust:
//!
//! - [`plan_abi::vaskip_plan`]: a C caller asks for the type codes a format
//!   consumes and walks its own `va_list` with `va_arg`.
//! - [`va_advance!`]: Rust code holding a real `va_list` (nightly
//!   `c_variadic`) advances it directly.
//!
//! ```text
//! format -> vaskip-core plan -> (C: type codes | Rust: va_arg per type)
//! ```

#[macro_use]
mod macros;

pub mod ctype;
pub mod plan_abi;
#[cfg(feature = "c-variadic")]
pub mod variadic_abi;

#[doc(hidden)]
pub mod __private {
    pub use libc;
    pub use vaskip_core::{AdvanceError, AdvanceOptions, ArgType, consumption_plan};
}
