//! Fixture loading and management.
//!
//! A fixture file holds one [`FixtureSet`]. Each case names a format string,
//! the tagged argument slots handed to the advancer, and what the advancer
//! must leave behind: the C types it consumed, the error it stopped on (if
//! any) and the number of slots still unread.
//!
//! ```json
//! {
//!   "name": "star_precision_string",
//!   "format": "%5.*s",
//!   "args": [{"type": "int", "value": 3}, {"type": "char *", "value": "abc"}],
//!   "mode": "both",
//!   "expected_consumed": ["int", "char *"],
//!   "expected_remaining": 0
//! }
//! ```
//!
//! `expected_error` is `<kind>@<location>`: the slot position for
//! `cursor_underrun`/`type_mismatch`, the byte offset for
//! `malformed_specifier`. When `args` is omitted the case runs against an
//! unbounded type trace instead of a slot list.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use thiserror::Error;
use vaskip_core::{Arg, ArgType, ArgValue};

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("failed reading '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid fixture JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown C type '{0}'")]
    UnknownType(String),
}

/// One tagged argument slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotSpec {
    /// C type name, e.g. `"unsigned long"` or `"char *"`.
    #[serde(rename = "type")]
    pub ty: String,
    /// Slot payload. Numbers for scalars and pointers, a string for `char *`
    /// and `wchar_t *`. Defaults to zero / empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl SlotSpec {
    /// Resolve the declared type name.
    pub fn arg_type(&self) -> Result<ArgType, FixtureError> {
        ArgType::from_name(&self.ty).ok_or_else(|| FixtureError::UnknownType(self.ty.clone()))
    }

    /// Code points of a string payload, for `wchar_t *` slots.
    #[must_use]
    pub fn wide_text(&self) -> Vec<u32> {
        self.value
            .as_ref()
            .and_then(Value::as_str)
            .map(|s| s.chars().map(u32::from).collect())
            .unwrap_or_default()
    }

    /// Build the slot. `wide` is this slot's [`SlotSpec::wide_text`].
    pub fn to_arg<'a>(&'a self, wide: &'a [u32]) -> Result<Arg<'a>, FixtureError> {
        let ty = self.arg_type()?;
        let value = self.value.as_ref();
        let payload = match ty {
            ArgType::CharPtr => match value.and_then(Value::as_str) {
                Some(s) => ArgValue::Text(s.as_bytes()),
                None => ArgValue::Address(0),
            },
            ArgType::WCharPtr => ArgValue::WideText(wide),
            t if t.is_pointer() => {
                ArgValue::Address(value.and_then(Value::as_u64).unwrap_or(0) as usize)
            }
            t if t.is_float() => ArgValue::Float(value.and_then(Value::as_f64).unwrap_or(0.0)),
            t if t.is_unsigned_integer() => {
                ArgValue::Unsigned(value.and_then(Value::as_u64).unwrap_or(0))
            }
            _ => ArgValue::Signed(value.and_then(Value::as_i64).unwrap_or(0)),
        };
        Ok(Arg::new(ty, payload))
    }
}

/// A single fixture test case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureCase {
    /// Case identifier.
    pub name: String,
    /// Format string handed to the advancer.
    pub format: String,
    /// Argument slots. `None` runs the case against an unbounded trace.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<SlotSpec>>,
    /// `strict`, `compat` or `both`.
    pub mode: String,
    /// C type names consumed, in order.
    pub expected_consumed: Vec<String>,
    /// `<kind>@<location>` when the scan must stop with an error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_error: Option<String>,
    /// Slots left unread.
    #[serde(default)]
    pub expected_remaining: usize,
}

impl FixtureCase {
    /// Canonical outcome string the runner must reproduce.
    #[must_use]
    pub fn expected_output(&self) -> String {
        let consumed: Vec<String> = self
            .expected_consumed
            .iter()
            .map(|name| match ArgType::from_name(name) {
                Some(ty) => ty.name().to_string(),
                None => format!("unknown:{name}"),
            })
            .collect();
        crate::verify::canonical_outcome(
            self.expected_error.as_deref(),
            &consumed,
            self.expected_remaining,
        )
    }
}

/// A collection of fixture cases for one area of the format grammar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureSet {
    /// Schema version.
    pub version: String,
    /// Fixture family name.
    pub family: String,
    /// UTC timestamp of authoring.
    pub captured_at: String,
    /// Individual test cases.
    pub cases: Vec<FixtureCase>,
}

impl FixtureSet {
    /// Load fixture set from JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize fixture set to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load fixture set from a file path.
    pub fn from_file(path: &Path) -> Result<Self, FixtureError> {
        Ok(LoadedFixture::from_file(path)?.set)
    }
}

/// A fixture set plus where it came from and its content digest.
#[derive(Debug, Clone)]
pub struct LoadedFixture {
    pub path: PathBuf,
    /// Lowercase hex SHA-256 of the file bytes.
    pub sha256: String,
    pub set: FixtureSet,
}

impl LoadedFixture {
    pub fn from_file(path: &Path) -> Result<Self, FixtureError> {
        let bytes = std::fs::read(path).map_err(|source| FixtureError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let set: FixtureSet = serde_json::from_slice(&bytes)?;
        Ok(Self {
            path: path.to_path_buf(),
            sha256: sha256_hex(&bytes),
            set,
        })
    }
}

/// Sorted `*.json` paths directly under `dir`.
pub fn fixture_paths(dir: &Path) -> Result<Vec<PathBuf>, FixtureError> {
    let entries = std::fs::read_dir(dir).map_err(|source| FixtureError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| path.extension().and_then(|s| s.to_str()) == Some("json"))
        .collect();
    paths.sort();
    Ok(paths)
}

fn sha256_hex(bytes: &[u8]) -> String {
    use std::fmt::Write;
    let digest = Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        let _ = write!(&mut out, "{b:02x}");
    }
    out
}
