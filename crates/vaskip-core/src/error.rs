//! Error taxonomy for cursor advancement.

use thiserror::Error;

use crate::directive::MalformedKind;
use crate::dispatch::ArgType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AdvanceError {
    /// A directive could not be parsed and malformed input is rejected.
    /// Nothing belonging to that directive was consumed.
    #[error("malformed directive at byte {offset}: {kind}")]
    MalformedSpecifier { offset: usize, kind: MalformedKind },
    /// The cursor has no slot left for the next consumption.
    #[error("argument cursor exhausted at slot {position} while reading {wanted}")]
    CursorUnderrun { position: usize, wanted: ArgType },
    /// The slot's tag differs from the type the directive reads.
    #[error("slot {position} holds {found}, directive reads {expected}")]
    TypeMismatch {
        position: usize,
        expected: ArgType,
        found: ArgType,
    },
    /// The cursor cannot read this type at all.
    #[error("cursor cannot read {ty}")]
    UnsupportedType { ty: ArgType },
}

impl AdvanceError {
    /// Stable snake_case name, used in fixture files and logs.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::MalformedSpecifier { .. } => "malformed_specifier",
            Self::CursorUnderrun { .. } => "cursor_underrun",
            Self::TypeMismatch { .. } => "type_mismatch",
            Self::UnsupportedType { .. } => "unsupported_type",
        }
    }
}
