//! # vaskip-core
//!
//! Skips a printf argument list without formatting it.
//!
//! [`advance`] walks a printf format string and moves an argument cursor past
//! exactly the arguments the C library's formatter would read, in the same
//! order and with the same types. Nothing is rendered and no value is read.
//! A variadic wrapper shaped like `log(level, fmt, ..., tag)` uses it to step
//! over the format arguments and then read `tag`.
//!
//! No `unsafe` code is permitted in this crate. Reading a real C `va_list`
//! lives in `vaskip-abi`.

#![deny(unsafe_code)]

pub mod advance;
pub mod config;
pub mod cursor;
pub mod directive;
pub mod dispatch;
pub mod error;

pub use advance::{Scan, advance, advance_with, consumption_plan};
pub use config::{AdvanceOptions, MalformedPolicy, ScanMode, TypeCheck, scan_mode};
pub use cursor::{Arg, ArgCursor, ArgList, ArgValue, TypeTrace};
pub use directive::{
    Conversion, Directives, FormatFlags, FormatSpec, LengthMod, Malformed, MalformedKind,
    Precision, Segment, Width, parse_format_spec, parse_format_string,
};
pub use dispatch::{ArgType, ConversionFamily, arg_type};
pub use error::AdvanceError;
