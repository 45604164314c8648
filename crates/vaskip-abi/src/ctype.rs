//! Numeric type codes shared with C callers.
//!
//! Code `n` is `ArgType::ALL[n]`; the numbering is part of the C ABI and
//! only grows at the end.
//!
//! | code | type | code | type |
//! |---|---|---|---|
//! | 0 | `int` | 13 | `long double` |
//! | 1 | `unsigned int` | 14 | `wint_t` |
//! | 2 | `long` | 15 | `char *` |
//! | 3 | `unsigned long` | 16 | `wchar_t *` |
//! | 4 | `long long` | 17 | `void *` |
//! | 5 | `unsigned long long` | 18 | `signed char *` |
//! | 6 | `intmax_t` | 19 | `short *` |
//! | 7 | `uintmax_t` | 20 | `int *` |
//! | 8 | `ssize_t` | 21 | `long *` |
//! | 9 | `size_t` | 22 | `long long *` |
//! | 10 | `ptrdiff_t` | 23 | `intmax_t *` |
//! | 11 | unsigned `ptrdiff_t` | 24 | `size_t *` |
//! | 12 | `double` | 25 | `ptrdiff_t *` |

use vaskip_core::ArgType;

/// Code written for `ty` by `vaskip_plan`.
#[must_use]
pub fn type_code(ty: ArgType) -> u8 {
    ArgType::ALL
        .iter()
        .position(|&t| t == ty)
        .map_or(u8::MAX, |i| i as u8)
}

/// Inverse of [`type_code`].
#[must_use]
pub fn from_code(code: u8) -> Option<ArgType> {
    ArgType::ALL.get(usize::from(code)).copied()
}

/// Whether Rust can pull this type out of a `va_list`.
///
/// `long double` has no Rust type, so it cannot be named in `va_arg`.
#[must_use]
pub const fn va_readable(ty: ArgType) -> bool {
    !matches!(ty, ArgType::LongDouble)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_dense_and_round_trip() {
        for (i, ty) in ArgType::ALL.into_iter().enumerate() {
            assert_eq!(usize::from(type_code(ty)), i);
            assert_eq!(from_code(type_code(ty)), Some(ty));
        }
        assert_eq!(from_code(ArgType::ALL.len() as u8), None);
    }

    #[test]
    fn documented_codes_are_stable() {
        assert_eq!(type_code(ArgType::Int), 0);
        assert_eq!(type_code(ArgType::Double), 12);
        assert_eq!(type_code(ArgType::CharPtr), 15);
        assert_eq!(type_code(ArgType::PtrDiffPtr), 25);
    }

    #[test]
    fn only_long_double_is_unreadable() {
        let unreadable: Vec<_> = ArgType::ALL
            .into_iter()
            .filter(|&ty| !va_readable(ty))
            .collect();
        assert_eq!(unreadable, vec![ArgType::LongDouble]);
    }
}
