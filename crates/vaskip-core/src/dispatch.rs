//! Argument type table: (length modifier, conversion family) → consumed C type.
//!
//! The table is a total match over both enums. A `None` entry is a pair the
//! C standard leaves undefined (`%hs`, `%Ld`, `%lp`, ...).

use core::ffi::{c_int, c_long, c_longlong, c_uint, c_ulong, c_ulonglong};
use core::fmt;
use core::mem::{align_of, size_of};

use crate::directive::LengthMod;

/// Conversions grouped by the table column they select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConversionFamily {
    /// `d i`
    Signed,
    /// `o u x X`
    Unsigned,
    /// `n`
    Count,
    /// `c`
    Char,
    /// `s`
    Str,
    /// `f F e E g G a A`
    Float,
    /// `p`
    Pointer,
}

/// C type of one variadic argument slot.
///
/// Narrow integer conversions (`%hd`, `%hhx`, `%c`) read a promoted `int`,
/// so they map to [`ArgType::Int`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgType {
    Int,
    UInt,
    Long,
    ULong,
    LongLong,
    ULongLong,
    IntMax,
    UIntMax,
    SSize,
    Size,
    PtrDiff,
    UPtrDiff,
    Double,
    LongDouble,
    /// `wint_t`, read by `%lc`.
    WInt,
    CharPtr,
    WCharPtr,
    VoidPtr,
    SCharPtr,
    ShortPtr,
    IntPtr,
    LongPtr,
    LongLongPtr,
    IntMaxPtr,
    SizePtr,
    PtrDiffPtr,
}

/// `long double` has no Rust counterpart; layout per target ABI.
const LONG_DOUBLE_LAYOUT: (usize, usize) = if cfg!(target_os = "windows") {
    (8, 8)
} else if cfg!(target_arch = "x86") {
    (12, 4)
} else if cfg!(all(target_vendor = "apple", target_arch = "aarch64")) {
    (8, 8)
} else if cfg!(any(
    target_arch = "x86_64",
    target_arch = "aarch64",
    target_arch = "riscv64",
    target_arch = "powerpc64",
    target_arch = "s390x",
    target_arch = "loongarch64"
)) {
    (16, 16)
} else {
    (8, 8)
};

impl ArgType {
    /// Every tag, in declaration order.
    pub const ALL: [ArgType; 26] = [
        Self::Int,
        Self::UInt,
        Self::Long,
        Self::ULong,
        Self::LongLong,
        Self::ULongLong,
        Self::IntMax,
        Self::UIntMax,
        Self::SSize,
        Self::Size,
        Self::PtrDiff,
        Self::UPtrDiff,
        Self::Double,
        Self::LongDouble,
        Self::WInt,
        Self::CharPtr,
        Self::WCharPtr,
        Self::VoidPtr,
        Self::SCharPtr,
        Self::ShortPtr,
        Self::IntPtr,
        Self::LongPtr,
        Self::LongLongPtr,
        Self::IntMaxPtr,
        Self::SizePtr,
        Self::PtrDiffPtr,
    ];

    /// C spelling of the type.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::UInt => "unsigned int",
            Self::Long => "long",
            Self::ULong => "unsigned long",
            Self::LongLong => "long long",
            Self::ULongLong => "unsigned long long",
            Self::IntMax => "intmax_t",
            Self::UIntMax => "uintmax_t",
            Self::SSize => "ssize_t",
            Self::Size => "size_t",
            Self::PtrDiff => "ptrdiff_t",
            Self::UPtrDiff => "unsigned ptrdiff_t",
            Self::Double => "double",
            Self::LongDouble => "long double",
            Self::WInt => "wint_t",
            Self::CharPtr => "char *",
            Self::WCharPtr => "wchar_t *",
            Self::VoidPtr => "void *",
            Self::SCharPtr => "signed char *",
            Self::ShortPtr => "short *",
            Self::IntPtr => "int *",
            Self::LongPtr => "long *",
            Self::LongLongPtr => "long long *",
            Self::IntMaxPtr => "intmax_t *",
            Self::SizePtr => "size_t *",
            Self::PtrDiffPtr => "ptrdiff_t *",
        }
    }

    /// Inverse of [`ArgType::name`]. Whitespace around `*` is ignored.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let wanted: String = name.split_whitespace().collect::<Vec<_>>().join(" ");
        let wanted = wanted.replace(" *", "*");
        Self::ALL
            .into_iter()
            .find(|ty| ty.name().replace(" *", "*") == wanted)
    }

    /// Size in bytes of the C type on the host target.
    #[must_use]
    pub const fn size(self) -> usize {
        match self {
            Self::Int => size_of::<c_int>(),
            Self::UInt | Self::WInt => size_of::<c_uint>(),
            Self::Long => size_of::<c_long>(),
            Self::ULong => size_of::<c_ulong>(),
            Self::LongLong => size_of::<c_longlong>(),
            Self::ULongLong => size_of::<c_ulonglong>(),
            Self::IntMax | Self::UIntMax => size_of::<i64>(),
            Self::SSize | Self::PtrDiff => size_of::<isize>(),
            Self::Size | Self::UPtrDiff => size_of::<usize>(),
            Self::Double => size_of::<f64>(),
            Self::LongDouble => LONG_DOUBLE_LAYOUT.0,
            Self::CharPtr
            | Self::WCharPtr
            | Self::VoidPtr
            | Self::SCharPtr
            | Self::ShortPtr
            | Self::IntPtr
            | Self::LongPtr
            | Self::LongLongPtr
            | Self::IntMaxPtr
            | Self::SizePtr
            | Self::PtrDiffPtr => size_of::<*const ()>(),
        }
    }

    /// Alignment in bytes of the C type on the host target.
    #[must_use]
    pub const fn align(self) -> usize {
        match self {
            Self::Int => align_of::<c_int>(),
            Self::UInt | Self::WInt => align_of::<c_uint>(),
            Self::Long => align_of::<c_long>(),
            Self::ULong => align_of::<c_ulong>(),
            Self::LongLong => align_of::<c_longlong>(),
            Self::ULongLong => align_of::<c_ulonglong>(),
            Self::IntMax | Self::UIntMax => align_of::<i64>(),
            Self::SSize | Self::PtrDiff => align_of::<isize>(),
            Self::Size | Self::UPtrDiff => align_of::<usize>(),
            Self::Double => align_of::<f64>(),
            Self::LongDouble => LONG_DOUBLE_LAYOUT.1,
            _ => align_of::<*const ()>(),
        }
    }

    #[must_use]
    pub const fn is_pointer(self) -> bool {
        matches!(
            self,
            Self::CharPtr
                | Self::WCharPtr
                | Self::VoidPtr
                | Self::SCharPtr
                | Self::ShortPtr
                | Self::IntPtr
                | Self::LongPtr
                | Self::LongLongPtr
                | Self::IntMaxPtr
                | Self::SizePtr
                | Self::PtrDiffPtr
        )
    }

    #[must_use]
    pub const fn is_signed_integer(self) -> bool {
        matches!(
            self,
            Self::Int | Self::Long | Self::LongLong | Self::IntMax | Self::SSize | Self::PtrDiff
        )
    }

    #[must_use]
    pub const fn is_unsigned_integer(self) -> bool {
        matches!(
            self,
            Self::UInt
                | Self::ULong
                | Self::ULongLong
                | Self::UIntMax
                | Self::Size
                | Self::UPtrDiff
                | Self::WInt
        )
    }

    #[must_use]
    pub const fn is_float(self) -> bool {
        matches!(self, Self::Double | Self::LongDouble)
    }
}

impl fmt::Display for ArgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Type consumed by a conversion of `family` under `length`.
#[must_use]
pub const fn arg_type(length: LengthMod, family: ConversionFamily) -> Option<ArgType> {
    use ArgType as T;
    use LengthMod as M;

    match family {
        ConversionFamily::Signed => Some(match length {
            M::None | M::Hh | M::H => T::Int,
            M::L => T::Long,
            M::Ll => T::LongLong,
            M::J => T::IntMax,
            M::Z => T::SSize,
            M::T => T::PtrDiff,
            M::BigL => return None,
        }),
        ConversionFamily::Unsigned => Some(match length {
            M::None => T::UInt,
            M::Hh | M::H => T::Int,
            M::L => T::ULong,
            M::Ll => T::ULongLong,
            M::J => T::UIntMax,
            M::Z => T::Size,
            M::T => T::UPtrDiff,
            M::BigL => return None,
        }),
        ConversionFamily::Count => Some(match length {
            M::None => T::IntPtr,
            M::Hh => T::SCharPtr,
            M::H => T::ShortPtr,
            M::L => T::LongPtr,
            M::Ll => T::LongLongPtr,
            M::J => T::IntMaxPtr,
            M::Z => T::SizePtr,
            M::T => T::PtrDiffPtr,
            M::BigL => return None,
        }),
        ConversionFamily::Char => match length {
            M::None => Some(T::Int),
            M::L => Some(T::WInt),
            M::Hh | M::H | M::Ll | M::J | M::Z | M::T | M::BigL => None,
        },
        ConversionFamily::Str => match length {
            M::None => Some(T::CharPtr),
            M::L => Some(T::WCharPtr),
            M::Hh | M::H | M::Ll | M::J | M::Z | M::T | M::BigL => None,
        },
        ConversionFamily::Float => match length {
            M::None | M::L => Some(T::Double),
            M::BigL => Some(T::LongDouble),
            M::Hh | M::H | M::Ll | M::J | M::Z | M::T => None,
        },
        ConversionFamily::Pointer => match length {
            M::None => Some(T::VoidPtr),
            M::Hh | M::H | M::L | M::Ll | M::J | M::Z | M::T | M::BigL => None,
        },
    }
}
