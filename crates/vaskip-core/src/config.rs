//! Scan mode configuration.
//!
//! The scan mode is set via the `VASKIP_MODE` environment variable:
//! - `strict` (default): malformed directives are reported as
//!   [`AdvanceError::MalformedSpecifier`](crate::AdvanceError) and tagged
//!   argument lists check every slot's type.
//! - `compat`: behaves like the C scanner this crate replaces. Malformed
//!   directives are skipped and slot types are not checked.

use std::sync::atomic::{AtomicU8, Ordering};

/// Environment variable holding the scan mode.
pub const MODE_ENV: &str = "VASKIP_MODE";

/// Overall behavior toward input the C standard leaves undefined.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScanMode {
    /// Report malformed directives and type mismatches.
    #[default]
    Strict,
    /// Skip malformed directives silently and trust slot types.
    Compat,
}

impl ScanMode {
    /// Parse from string (case-insensitive). Unknown values select `Strict`.
    #[must_use]
    pub fn from_str_loose(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "compat" | "compatible" | "legacy" | "c" => Self::Compat,
            _ => Self::Strict,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Compat => "compat",
        }
    }
}

/// What `advance` does with a directive it cannot parse.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MalformedPolicy {
    /// Stop and return `MalformedSpecifier`.
    #[default]
    Reject,
    /// Consume the directive's `*` arguments, then rescan from its resume offset.
    Skip,
}

/// Whether a tagged argument list verifies slot types on consumption.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeCheck {
    #[default]
    Strict,
    Unchecked,
}

impl TypeCheck {
    #[must_use]
    pub const fn for_mode(mode: ScanMode) -> Self {
        match mode {
            ScanMode::Strict => Self::Strict,
            ScanMode::Compat => Self::Unchecked,
        }
    }
}

/// Options for [`advance_with`](crate::advance_with).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AdvanceOptions {
    pub malformed: MalformedPolicy,
}

impl AdvanceOptions {
    #[must_use]
    pub const fn from_mode(mode: ScanMode) -> Self {
        let malformed = match mode {
            ScanMode::Strict => MalformedPolicy::Reject,
            ScanMode::Compat => MalformedPolicy::Skip,
        };
        Self { malformed }
    }

    #[must_use]
    pub const fn with_malformed(mut self, malformed: MalformedPolicy) -> Self {
        self.malformed = malformed;
        self
    }
}

// 0=unresolved, 1=Strict, 2=Compat.
static CACHED_MODE: AtomicU8 = AtomicU8::new(0);

const MODE_UNRESOLVED: u8 = 0;
const MODE_STRICT: u8 = 1;
const MODE_COMPAT: u8 = 2;

fn mode_to_u8(mode: ScanMode) -> u8 {
    match mode {
        ScanMode::Strict => MODE_STRICT,
        ScanMode::Compat => MODE_COMPAT,
    }
}

fn u8_to_mode(v: u8) -> ScanMode {
    match v {
        MODE_COMPAT => ScanMode::Compat,
        _ => ScanMode::Strict,
    }
}

/// Get the configured scan mode (reads `VASKIP_MODE` on first call, caches thereafter).
///
/// Racing first calls may each read the environment; they store the same value.
#[must_use]
pub fn scan_mode() -> ScanMode {
    let cached = CACHED_MODE.load(Ordering::Acquire);
    if cached != MODE_UNRESOLVED {
        return u8_to_mode(cached);
    }
    let mode = std::env::var(MODE_ENV)
        .map(|v| ScanMode::from_str_loose(&v))
        .unwrap_or_default();
    CACHED_MODE.store(mode_to_u8(mode), Ordering::Release);
    mode
}

/// Override the cached scan mode for the rest of the process.
pub fn set_scan_mode(mode: ScanMode) {
    CACHED_MODE.store(mode_to_u8(mode), Ordering::Release);
}
