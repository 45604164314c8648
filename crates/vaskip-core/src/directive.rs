//! printf directive scanner.
//!
//! Splits a format string into literal runs, `%%` escapes, parsed conversion
//! specifications and malformed directives. Scanning never allocates and
//! never looks at argument values: it only describes what each directive
//! would pull from the argument list.
//!
//! Reference: ISO C11 7.21.6.1 (fprintf), POSIX.1-2024 fprintf.
//!
//! A NUL byte ends the format string, as it would for a C string.

use core::fmt;

use crate::dispatch::{ArgType, ConversionFamily, arg_type};

// ---------------------------------------------------------------------------
// Format spec types
// ---------------------------------------------------------------------------

/// Flags parsed from a printf format directive. None of them consume an argument.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatFlags {
    pub left_justify: bool, // '-'
    pub force_sign: bool,   // '+'
    pub space_sign: bool,   // ' '
    pub alt_form: bool,     // '#'
    pub zero_pad: bool,     // '0'
}

/// Width specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    None,
    Fixed(usize),
    FromArg, // '*'
}

/// Precision specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    None,
    Fixed(usize),
    FromArg, // '.*'
}

/// Length modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LengthMod {
    None,
    Hh,   // 'hh'
    H,    // 'h'
    L,    // 'l'
    Ll,   // 'll'
    J,    // 'j'
    Z,    // 'z'
    T,    // 't'
    BigL, // 'L'
}

impl LengthMod {
    /// The modifier as it is spelled in a format string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Hh => "hh",
            Self::H => "h",
            Self::L => "l",
            Self::Ll => "ll",
            Self::J => "j",
            Self::Z => "z",
            Self::T => "t",
            Self::BigL => "L",
        }
    }
}

/// Conversion character of a directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Conversion {
    Char,          // 'c'
    Str,           // 's'
    Decimal,       // 'd'
    Integer,       // 'i'
    Octal,         // 'o'
    Hex,           // 'x'
    HexUpper,      // 'X'
    Unsigned,      // 'u'
    Fixed,         // 'f'
    FixedUpper,    // 'F'
    Exp,           // 'e'
    ExpUpper,      // 'E'
    HexFloat,      // 'a'
    HexFloatUpper, // 'A'
    General,       // 'g'
    GeneralUpper,  // 'G'
    Count,         // 'n'
    Pointer,       // 'p'
}

impl Conversion {
    #[must_use]
    pub const fn from_byte(byte: u8) -> Option<Self> {
        Some(match byte {
            b'c' => Self::Char,
            b's' => Self::Str,
            b'd' => Self::Decimal,
            b'i' => Self::Integer,
            b'o' => Self::Octal,
            b'x' => Self::Hex,
            b'X' => Self::HexUpper,
            b'u' => Self::Unsigned,
            b'f' => Self::Fixed,
            b'F' => Self::FixedUpper,
            b'e' => Self::Exp,
            b'E' => Self::ExpUpper,
            b'a' => Self::HexFloat,
            b'A' => Self::HexFloatUpper,
            b'g' => Self::General,
            b'G' => Self::GeneralUpper,
            b'n' => Self::Count,
            b'p' => Self::Pointer,
            _ => return None,
        })
    }

    #[must_use]
    pub const fn as_byte(self) -> u8 {
        match self {
            Self::Char => b'c',
            Self::Str => b's',
            Self::Decimal => b'd',
            Self::Integer => b'i',
            Self::Octal => b'o',
            Self::Hex => b'x',
            Self::HexUpper => b'X',
            Self::Unsigned => b'u',
            Self::Fixed => b'f',
            Self::FixedUpper => b'F',
            Self::Exp => b'e',
            Self::ExpUpper => b'E',
            Self::HexFloat => b'a',
            Self::HexFloatUpper => b'A',
            Self::General => b'g',
            Self::GeneralUpper => b'G',
            Self::Count => b'n',
            Self::Pointer => b'p',
        }
    }

    /// Group of conversions that share one row of the argument type table.
    #[must_use]
    pub const fn family(self) -> ConversionFamily {
        match self {
            Self::Decimal | Self::Integer => ConversionFamily::Signed,
            Self::Octal | Self::Hex | Self::HexUpper | Self::Unsigned => ConversionFamily::Unsigned,
            Self::Count => ConversionFamily::Count,
            Self::Char => ConversionFamily::Char,
            Self::Str => ConversionFamily::Str,
            Self::Fixed
            | Self::FixedUpper
            | Self::Exp
            | Self::ExpUpper
            | Self::HexFloat
            | Self::HexFloatUpper
            | Self::General
            | Self::GeneralUpper => ConversionFamily::Float,
            Self::Pointer => ConversionFamily::Pointer,
        }
    }
}

/// A parsed printf format specifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatSpec {
    pub flags: FormatFlags,
    pub width: Width,
    pub precision: Precision,
    pub length: LengthMod,
    pub conversion: Conversion,
}

impl FormatSpec {
    /// Type of the argument the conversion itself consumes.
    ///
    /// `None` only for hand-built specs that pair a modifier with a
    /// conversion it cannot apply to; the parser never produces those.
    #[must_use]
    pub const fn arg_type(&self) -> Option<ArgType> {
        arg_type(self.length, self.conversion.family())
    }

    /// Number of `*` arguments this spec reads before its conversion argument.
    #[must_use]
    pub const fn star_args(&self) -> usize {
        matches!(self.width, Width::FromArg) as usize
            + matches!(self.precision, Precision::FromArg) as usize
    }
}

// ---------------------------------------------------------------------------
// Malformed directives
// ---------------------------------------------------------------------------

/// Why a directive could not be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedKind {
    /// The string ended before a conversion character.
    Truncated,
    /// The conversion character is not one printf knows.
    UnknownConversion(u8),
    /// The length modifier does not apply to the conversion (`%hs`, `%Ld`, `%lp`).
    InvalidLength {
        length: LengthMod,
        conversion: Conversion,
    },
    /// `%` used as a conversion after flags, width, precision or a modifier (`%5%`).
    DecoratedPercent,
}

impl MalformedKind {
    /// Stable snake_case name, used in fixture files and logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Truncated => "truncated",
            Self::UnknownConversion(_) => "unknown_conversion",
            Self::InvalidLength { .. } => "invalid_length",
            Self::DecoratedPercent => "decorated_percent",
        }
    }
}

impl fmt::Display for MalformedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncated => f.write_str("format string ends inside a directive"),
            Self::UnknownConversion(byte) => {
                write!(f, "unknown conversion character {:?}", char::from(*byte))
            }
            Self::InvalidLength { length, conversion } => write!(
                f,
                "length modifier '{}' does not apply to '%{}'",
                length.as_str(),
                char::from(conversion.as_byte())
            ),
            Self::DecoratedPercent => f.write_str("'%' conversion takes no flags, width or modifier"),
        }
    }
}

/// A directive that failed to parse.
///
/// `width` and `precision` record what was parsed before the failure: a C
/// scanner reading the directive left to right has already pulled any `*`
/// arguments by the time it reaches the bad byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Malformed {
    pub kind: MalformedKind,
    pub width: Width,
    pub precision: Precision,
    /// Bytes after the `%` up to the length modifier (or conversion byte).
    /// Scanning resumes there when malformed input is skipped.
    pub resume: usize,
}

impl Malformed {
    #[must_use]
    pub const fn star_args(&self) -> usize {
        matches!(self.width, Width::FromArg) as usize
            + matches!(self.precision, Precision::FromArg) as usize
    }
}

// ---------------------------------------------------------------------------
// Segment: parsed pieces of a format string
// ---------------------------------------------------------------------------

/// A segment of a parsed format string. Offsets are byte offsets into the format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Literal bytes.
    Literal { offset: usize, bytes: &'a [u8] },
    /// A `%%` escape.
    Percent { offset: usize },
    /// A conversion specifier, `len` bytes long including the `%`.
    Spec {
        offset: usize,
        len: usize,
        spec: FormatSpec,
    },
    /// A directive that failed to parse. `resume` is the absolute offset
    /// where scanning continues.
    Malformed {
        offset: usize,
        resume: usize,
        malformed: Malformed,
    },
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Parse a single format specifier starting after the '%' character.
///
/// `fmt` points to the first byte AFTER '%'. Returns `(spec, bytes_consumed)`
/// where `bytes_consumed` counts from `fmt[0]`. A bare `%%` must be handled
/// by the caller; any `%` conversion reaching this function is reported as
/// [`MalformedKind::DecoratedPercent`].
pub fn parse_format_spec(fmt: &[u8]) -> Result<(FormatSpec, usize), Malformed> {
    let mut pos = 0;
    let len = fmt.len();

    // --- flags ---
    let mut flags = FormatFlags::default();
    while pos < len {
        match fmt[pos] {
            b'-' => flags.left_justify = true,
            b'+' => flags.force_sign = true,
            b' ' => flags.space_sign = true,
            b'#' => flags.alt_form = true,
            b'0' => flags.zero_pad = true,
            _ => break,
        }
        pos += 1;
    }

    // --- width ---
    let width = if pos < len && fmt[pos] == b'*' {
        pos += 1;
        Width::FromArg
    } else {
        let start = pos;
        while pos < len && fmt[pos].is_ascii_digit() {
            pos += 1;
        }
        if pos > start {
            Width::Fixed(parse_decimal(&fmt[start..pos]))
        } else {
            Width::None
        }
    };

    // --- precision ---
    let precision = if pos < len && fmt[pos] == b'.' {
        pos += 1;
        if pos < len && fmt[pos] == b'*' {
            pos += 1;
            Precision::FromArg
        } else {
            let start = pos;
            while pos < len && fmt[pos].is_ascii_digit() {
                pos += 1;
            }
            Precision::Fixed(parse_decimal(&fmt[start..pos]))
        }
    } else {
        Precision::None
    };

    let resume = pos;
    let malformed = |kind| Malformed {
        kind,
        width,
        precision,
        resume,
    };

    // --- length modifier ---
    let length = match fmt.get(pos) {
        Some(b'h') if fmt.get(pos + 1) == Some(&b'h') => LengthMod::Hh,
        Some(b'h') => LengthMod::H,
        Some(b'l') if fmt.get(pos + 1) == Some(&b'l') => LengthMod::Ll,
        Some(b'l') => LengthMod::L,
        Some(b'j') => LengthMod::J,
        Some(b'z') => LengthMod::Z,
        Some(b't') => LengthMod::T,
        Some(b'L') => LengthMod::BigL,
        _ => LengthMod::None,
    };
    pos += length.as_str().len();

    // --- conversion specifier ---
    let Some(&byte) = fmt.get(pos) else {
        return Err(malformed(MalformedKind::Truncated));
    };
    pos += 1;

    if byte == b'%' {
        return Err(malformed(MalformedKind::DecoratedPercent));
    }
    let Some(conversion) = Conversion::from_byte(byte) else {
        return Err(malformed(MalformedKind::UnknownConversion(byte)));
    };
    if arg_type(length, conversion.family()).is_none() {
        return Err(malformed(MalformedKind::InvalidLength { length, conversion }));
    }

    Ok((
        FormatSpec {
            flags,
            width,
            precision,
            length,
            conversion,
        },
        pos,
    ))
}

/// Iterator over the segments of a printf format string.
///
/// After a malformed directive the iterator continues at the directive's
/// resume offset, the same place a C scanner would pick up again.
#[derive(Debug, Clone)]
pub struct Directives<'a> {
    fmt: &'a [u8],
    pos: usize,
}

impl<'a> Directives<'a> {
    /// Scan `fmt` up to its first NUL byte (or its end).
    #[must_use]
    pub fn new(fmt: &'a [u8]) -> Self {
        let end = fmt.iter().position(|&b| b == 0).unwrap_or(fmt.len());
        Self {
            fmt: &fmt[..end],
            pos: 0,
        }
    }

    /// Byte offset of the next unscanned byte.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Length of the scanned format, not counting a NUL terminator or anything after it.
    #[must_use]
    pub fn format_len(&self) -> usize {
        self.fmt.len()
    }
}

impl<'a> Iterator for Directives<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Segment<'a>> {
        let fmt = self.fmt;
        let start = self.pos;
        if start >= fmt.len() {
            return None;
        }

        if fmt[start] != b'%' {
            let end = fmt[start..]
                .iter()
                .position(|&b| b == b'%')
                .map_or(fmt.len(), |i| start + i);
            self.pos = end;
            return Some(Segment::Literal {
                offset: start,
                bytes: &fmt[start..end],
            });
        }

        let body = &fmt[start + 1..];
        if body.first() == Some(&b'%') {
            self.pos = start + 2;
            return Some(Segment::Percent { offset: start });
        }

        match parse_format_spec(body) {
            Ok((spec, consumed)) => {
                self.pos = start + 1 + consumed;
                Some(Segment::Spec {
                    offset: start,
                    len: 1 + consumed,
                    spec,
                })
            }
            Err(malformed) => {
                let resume = start + 1 + malformed.resume;
                self.pos = resume;
                Some(Segment::Malformed {
                    offset: start,
                    resume,
                    malformed,
                })
            }
        }
    }
}

/// Collect every segment of a printf format string.
///
/// Yields `Segment::Literal` for literal runs and `Segment::Spec` for each
/// well-formed `%`-directive. `%%` yields `Segment::Percent`.
pub fn parse_format_string(fmt: &[u8]) -> Vec<Segment<'_>> {
    Directives::new(fmt).collect()
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn parse_decimal(digits: &[u8]) -> usize {
    let mut result = 0_usize;
    for &d in digits {
        result = result
            .saturating_mul(10)
            .saturating_add((d - b'0') as usize);
    }
    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
