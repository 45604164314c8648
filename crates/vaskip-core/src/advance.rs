//! Format cursor advancement.
//!
//! Walks a printf format string and moves an argument cursor past exactly the
//! arguments printf would read for it, without reading any value. A variadic
//! wrapper that takes `(fmt, ...)` followed by its own arguments uses this to
//! reach the arguments after the format list.
//!
//! Per directive the order is: width `*`, precision `*`, conversion argument.

use crate::config::{AdvanceOptions, MalformedPolicy, scan_mode};
use crate::cursor::{ArgCursor, TypeTrace};
use crate::directive::{Directives, MalformedKind, Segment};
use crate::dispatch::ArgType;
use crate::error::AdvanceError;

/// Counters describing one completed scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Scan {
    /// Bytes of format scanned (up to the end or the first NUL).
    pub scanned: usize,
    /// Well-formed conversion specifiers processed. `%%` is not counted.
    pub specifiers: usize,
    /// Cursor slots consumed.
    pub consumed: usize,
    /// Malformed directives skipped under [`MalformedPolicy::Skip`].
    pub skipped: usize,
}

/// Advance `cursor` past the arguments `format` reads, using the configured scan mode.
pub fn advance<C: ArgCursor + ?Sized>(cursor: &mut C, format: &[u8]) -> Result<(), AdvanceError> {
    advance_with(cursor, format, &AdvanceOptions::from_mode(scan_mode())).map(|_| ())
}

/// Advance `cursor` past the arguments `format` reads.
///
/// On error the scan stops where the error occurred; slots consumed before
/// that point stay consumed.
pub fn advance_with<C: ArgCursor + ?Sized>(
    cursor: &mut C,
    format: &[u8],
    options: &AdvanceOptions,
) -> Result<Scan, AdvanceError> {
    let mut scan = Scan::default();
    let directives = Directives::new(format);
    scan.scanned = directives.format_len();

    for segment in directives {
        match segment {
            Segment::Literal { .. } | Segment::Percent { .. } => {}
            Segment::Spec { offset, spec, .. } => {
                let Some(ty) = spec.arg_type() else {
                    return Err(AdvanceError::MalformedSpecifier {
                        offset,
                        kind: MalformedKind::InvalidLength {
                            length: spec.length,
                            conversion: spec.conversion,
                        },
                    });
                };
                consume_stars(cursor, spec.star_args(), &mut scan)?;
                consume(cursor, ty, &mut scan)?;
                scan.specifiers += 1;
            }
            Segment::Malformed {
                offset, malformed, ..
            } => match options.malformed {
                MalformedPolicy::Reject => {
                    return Err(AdvanceError::MalformedSpecifier {
                        offset,
                        kind: malformed.kind,
                    });
                }
                MalformedPolicy::Skip => {
                    consume_stars(cursor, malformed.star_args(), &mut scan)?;
                    scan.skipped += 1;
                }
            },
        }
    }
    Ok(scan)
}

/// Types `format` would consume, in order, as if read from an unbounded cursor.
pub fn consumption_plan(
    format: &[u8],
    options: &AdvanceOptions,
) -> Result<Vec<ArgType>, AdvanceError> {
    let mut trace = TypeTrace::new();
    advance_with(&mut trace, format, options)?;
    Ok(trace.into_types())
}

fn consume_stars<C: ArgCursor + ?Sized>(
    cursor: &mut C,
    count: usize,
    scan: &mut Scan,
) -> Result<(), AdvanceError> {
    for _ in 0..count {
        consume(cursor, ArgType::Int, scan)?;
    }
    Ok(())
}

fn consume<C: ArgCursor + ?Sized>(
    cursor: &mut C,
    ty: ArgType,
    scan: &mut Scan,
) -> Result<(), AdvanceError> {
    cursor.consume_as(ty)?;
    scan.consumed += 1;
    Ok(())
}
