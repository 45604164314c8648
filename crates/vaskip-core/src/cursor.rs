//! Argument cursors.
//!
//! An [`ArgCursor`] is a forward-only sequence of variadic argument slots.
//! [`ArgList`] is the memory-safe stand-in for a C `va_list`: a vector of
//! tagged slots with one read position. [`TypeTrace`] holds no values and
//! records which types were asked for, so it can describe what a format
//! string would consume.

use core::ffi::{c_int, c_long, c_longlong, c_uint, c_ulong, c_ulonglong};

use crate::config::TypeCheck;
use crate::dispatch::ArgType;
use crate::error::AdvanceError;

/// Capability to step over one argument slot of a given type.
pub trait ArgCursor {
    /// Advance past the next slot, which must hold a `ty`.
    fn consume_as(&mut self, ty: ArgType) -> Result<(), AdvanceError>;
}

impl<C: ArgCursor + ?Sized> ArgCursor for &mut C {
    fn consume_as(&mut self, ty: ArgType) -> Result<(), AdvanceError> {
        (**self).consume_as(ty)
    }
}

// ---------------------------------------------------------------------------
// Tagged slots
// ---------------------------------------------------------------------------

/// Value stored in a slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ArgValue<'a> {
    Signed(i64),
    Unsigned(u64),
    Float(f64),
    Text(&'a [u8]),
    WideText(&'a [u32]),
    Address(usize),
}

impl<'a> ArgValue<'a> {
    #[must_use]
    pub const fn as_signed(&self) -> Option<i64> {
        match *self {
            Self::Signed(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_unsigned(&self) -> Option<u64> {
        match *self {
            Self::Unsigned(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_float(&self) -> Option<f64> {
        match *self {
            Self::Float(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_text(&self) -> Option<&'a [u8]> {
        match *self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_wide_text(&self) -> Option<&'a [u32]> {
        match *self {
            Self::WideText(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_address(&self) -> Option<usize> {
        match *self {
            Self::Address(v) => Some(v),
            _ => None,
        }
    }
}

/// One tagged argument slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arg<'a> {
    ty: ArgType,
    value: ArgValue<'a>,
}

impl<'a> Arg<'a> {
    /// Pair an arbitrary tag with a value. The typed constructors below keep
    /// the two consistent; this one does not.
    #[must_use]
    pub const fn new(ty: ArgType, value: ArgValue<'a>) -> Self {
        Self { ty, value }
    }

    #[must_use]
    pub const fn int(v: c_int) -> Self {
        Self::new(ArgType::Int, ArgValue::Signed(v as i64))
    }

    #[must_use]
    pub const fn uint(v: c_uint) -> Self {
        Self::new(ArgType::UInt, ArgValue::Unsigned(v as u64))
    }

    #[must_use]
    pub const fn long(v: c_long) -> Self {
        Self::new(ArgType::Long, ArgValue::Signed(v as i64))
    }

    #[must_use]
    pub const fn ulong(v: c_ulong) -> Self {
        Self::new(ArgType::ULong, ArgValue::Unsigned(v as u64))
    }

    #[must_use]
    pub const fn long_long(v: c_longlong) -> Self {
        Self::new(ArgType::LongLong, ArgValue::Signed(v as i64))
    }

    #[must_use]
    pub const fn ulong_long(v: c_ulonglong) -> Self {
        Self::new(ArgType::ULongLong, ArgValue::Unsigned(v as u64))
    }

    #[must_use]
    pub const fn intmax(v: i64) -> Self {
        Self::new(ArgType::IntMax, ArgValue::Signed(v))
    }

    #[must_use]
    pub const fn uintmax(v: u64) -> Self {
        Self::new(ArgType::UIntMax, ArgValue::Unsigned(v))
    }

    #[must_use]
    pub const fn ssize(v: isize) -> Self {
        Self::new(ArgType::SSize, ArgValue::Signed(v as i64))
    }

    #[must_use]
    pub const fn size(v: usize) -> Self {
        Self::new(ArgType::Size, ArgValue::Unsigned(v as u64))
    }

    #[must_use]
    pub const fn ptrdiff(v: isize) -> Self {
        Self::new(ArgType::PtrDiff, ArgValue::Signed(v as i64))
    }

    #[must_use]
    pub const fn uptrdiff(v: usize) -> Self {
        Self::new(ArgType::UPtrDiff, ArgValue::Unsigned(v as u64))
    }

    #[must_use]
    pub const fn double(v: f64) -> Self {
        Self::new(ArgType::Double, ArgValue::Float(v))
    }

    /// `long double`, carried at `f64` precision.
    #[must_use]
    pub const fn long_double(v: f64) -> Self {
        Self::new(ArgType::LongDouble, ArgValue::Float(v))
    }

    #[must_use]
    pub const fn wint(v: u32) -> Self {
        Self::new(ArgType::WInt, ArgValue::Unsigned(v as u64))
    }

    #[must_use]
    pub const fn str(s: &'a str) -> Self {
        Self::bytes(s.as_bytes())
    }

    #[must_use]
    pub const fn bytes(s: &'a [u8]) -> Self {
        Self::new(ArgType::CharPtr, ArgValue::Text(s))
    }

    #[must_use]
    pub const fn wide_str(s: &'a [u32]) -> Self {
        Self::new(ArgType::WCharPtr, ArgValue::WideText(s))
    }

    /// A pointer slot (`void *` or one of the `%n` targets).
    #[must_use]
    pub const fn pointer(ty: ArgType, addr: usize) -> Self {
        Self::new(ty, ArgValue::Address(addr))
    }

    #[must_use]
    pub const fn ty(&self) -> ArgType {
        self.ty
    }

    #[must_use]
    pub const fn value(&self) -> ArgValue<'a> {
        self.value
    }
}

// ---------------------------------------------------------------------------
// ArgList
// ---------------------------------------------------------------------------

/// Tagged, forward-only argument list.
///
/// Consuming past the last slot is an [`AdvanceError::CursorUnderrun`].
/// Under [`TypeCheck::Strict`] a slot whose tag differs from the requested
/// type is an [`AdvanceError::TypeMismatch`] and the position does not move.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArgList<'a> {
    slots: Vec<Arg<'a>>,
    pos: usize,
    check: TypeCheck,
}

impl<'a> ArgList<'a> {
    /// New list with strict type checking.
    #[must_use]
    pub fn new(slots: Vec<Arg<'a>>) -> Self {
        Self {
            slots,
            pos: 0,
            check: TypeCheck::Strict,
        }
    }

    #[must_use]
    pub fn with_type_check(mut self, check: TypeCheck) -> Self {
        self.check = check;
        self
    }

    #[must_use]
    pub fn type_check(&self) -> TypeCheck {
        self.check
    }

    /// Index of the next unread slot.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.slots.len() - self.pos
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.pos == self.slots.len()
    }

    /// Slots already passed, in order.
    #[must_use]
    pub fn consumed(&self) -> &[Arg<'a>] {
        &self.slots[..self.pos]
    }

    #[must_use]
    pub fn peek(&self) -> Option<&Arg<'a>> {
        self.slots.get(self.pos)
    }

    /// Read the next slot as `ty` and advance past it.
    ///
    /// This is how a variadic wrapper reads its own trailing arguments once
    /// the format arguments have been skipped.
    pub fn next_arg(&mut self, ty: ArgType) -> Result<Arg<'a>, AdvanceError> {
        let Some(&slot) = self.slots.get(self.pos) else {
            return Err(AdvanceError::CursorUnderrun {
                position: self.pos,
                wanted: ty,
            });
        };
        if self.check == TypeCheck::Strict && slot.ty != ty {
            return Err(AdvanceError::TypeMismatch {
                position: self.pos,
                expected: ty,
                found: slot.ty,
            });
        }
        self.pos += 1;
        Ok(slot)
    }
}

impl ArgCursor for ArgList<'_> {
    fn consume_as(&mut self, ty: ArgType) -> Result<(), AdvanceError> {
        self.next_arg(ty).map(|_| ())
    }
}

impl<'a> FromIterator<Arg<'a>> for ArgList<'a> {
    fn from_iter<I: IntoIterator<Item = Arg<'a>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

// ---------------------------------------------------------------------------
// TypeTrace
// ---------------------------------------------------------------------------

/// Cursor that records requested types instead of reading values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeTrace {
    types: Vec<ArgType>,
    limit: Option<usize>,
}

impl TypeTrace {
    /// Unbounded trace.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Trace that underruns after `limit` consumptions, like a list of `limit` slots.
    #[must_use]
    pub fn with_limit(limit: usize) -> Self {
        Self {
            types: Vec::new(),
            limit: Some(limit),
        }
    }

    #[must_use]
    pub fn types(&self) -> &[ArgType] {
        &self.types
    }

    #[must_use]
    pub fn into_types(self) -> Vec<ArgType> {
        self.types
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Total bytes the recorded slots occupy when laid out with C alignment.
    #[must_use]
    pub fn byte_footprint(&self) -> usize {
        self.types.iter().fold(0, |offset, ty| {
            offset.next_multiple_of(ty.align()) + ty.size()
        })
    }
}

impl ArgCursor for TypeTrace {
    fn consume_as(&mut self, ty: ArgType) -> Result<(), AdvanceError> {
        if self.limit.is_some_and(|limit| self.types.len() >= limit) {
            return Err(AdvanceError::CursorUnderrun {
                position: self.types.len(),
                wanted: ty,
            });
        }
        self.types.push(ty);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arg_list_reads_in_order() {
        let mut list = ArgList::new(vec![Arg::int(7), Arg::str("seven"), Arg::double(7.5)]);
        assert_eq!(list.remaining(), 3);
        assert_eq!(list.next_arg(ArgType::Int).unwrap().value().as_signed(), Some(7));
        assert_eq!(
            list.next_arg(ArgType::CharPtr).unwrap().value().as_text(),
            Some(&b"seven"[..])
        );
        list.consume_as(ArgType::Double).unwrap();
        assert!(list.is_exhausted());
        assert_eq!(list.consumed().len(), 3);
    }

    #[test]
    fn trace_limit_is_a_bound_not_a_reservation() {
        let mut trace = TypeTrace::with_limit(usize::MAX);
        trace.consume_as(ArgType::Int).unwrap();
        trace.consume_as(ArgType::CharPtr).unwrap();
        assert_eq!(trace.types(), &[ArgType::Int, ArgType::CharPtr]);

        let mut trace = TypeTrace::with_limit(usize::MAX / 2);
        trace.consume_as(ArgType::Double).unwrap();
        assert_eq!(trace.len(), 1);
    }

    #[test]
    fn wide_text_slot_exposes_its_units() {
        let units = [0x68_u32, 0x69, 0];
        let value = ArgValue::WideText(&units);
        assert_eq!(value.as_wide_text(), Some(&units[..]));
        assert_eq!(value.as_text(), None);
        assert_eq!(ArgValue::Text(b"hi").as_wide_text(), None);
    }

    #[test]
    fn arg_list_underrun_reports_position() {
        let mut list: ArgList<'_> = [Arg::int(1)].into_iter().collect();
        list.consume_as(ArgType::Int).unwrap();
        assert_eq!(
            list.consume_as(ArgType::Double),
            Err(AdvanceError::CursorUnderrun {
                position: 1,
                wanted: ArgType::Double,
            })
        );
        assert_eq!(list.position(), 1);
    }

    #[test]
    fn strict_list_rejects_wrong_tag_without_moving() {
        let mut list = ArgList::new(vec![Arg::long(3)]);
        assert_eq!(
            list.consume_as(ArgType::Int),
            Err(AdvanceError::TypeMismatch {
                position: 0,
                expected: ArgType::Int,
                found: ArgType::Long,
            })
        );
        assert_eq!(list.position(), 0);
        list.consume_as(ArgType::Long).unwrap();
    }

    #[test]
    fn unchecked_list_ignores_tags() {
        let mut list =
            ArgList::new(vec![Arg::long(3), Arg::str("x")]).with_type_check(TypeCheck::Unchecked);
        list.consume_as(ArgType::Int).unwrap();
        list.consume_as(ArgType::VoidPtr).unwrap();
        assert!(list.is_exhausted());
    }

    #[test]
    fn typed_constructors_tag_consistently() {
        assert_eq!(Arg::uint(1).ty(), ArgType::UInt);
        assert_eq!(Arg::ulong_long(1).ty(), ArgType::ULongLong);
        assert_eq!(Arg::ssize(-1).value().as_signed(), Some(-1));
        assert_eq!(Arg::size(9).value().as_unsigned(), Some(9));
        assert_eq!(Arg::long_double(2.5).value().as_float(), Some(2.5));
        assert_eq!(Arg::wide_str(&[0x41]).ty(), ArgType::WCharPtr);
        assert_eq!(
            Arg::pointer(ArgType::ShortPtr, 0x1000).value().as_address(),
            Some(0x1000)
        );
    }

    #[test]
    fn trace_records_and_limits() {
        let mut trace = TypeTrace::with_limit(2);
        trace.consume_as(ArgType::Int).unwrap();
        trace.consume_as(ArgType::Double).unwrap();
        assert!(matches!(
            trace.consume_as(ArgType::Int),
            Err(AdvanceError::CursorUnderrun { position: 2, .. })
        ));
        assert_eq!(trace.types(), &[ArgType::Int, ArgType::Double]);
        // int at 0..4, double aligned to 8.
        assert_eq!(trace.byte_footprint(), 16);
    }

    #[test]
    fn cursor_through_mut_reference() {
        fn skip_one(mut cursor: impl ArgCursor) -> Result<(), AdvanceError> {
            cursor.consume_as(ArgType::Int)
        }
        let mut trace = TypeTrace::new();
        skip_one(&mut trace).unwrap();
        skip_one(&mut trace).unwrap();
        assert_eq!(trace.len(), 2);
    }
}
