//! Output comparison and verification.

use serde::{Deserialize, Serialize};
use vaskip_core::AdvanceError;

/// Result of verifying a single fixture case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationResult {
    /// Name of the test case.
    pub case_name: String,
    /// Fixture family the case belongs to.
    pub family: String,
    /// Scan mode the case ran under.
    pub mode: String,
    /// Format string under test.
    pub format: String,
    /// Whether the case passed.
    pub passed: bool,
    /// Expected canonical outcome.
    pub expected: String,
    /// Actual canonical outcome.
    pub actual: String,
    /// Diff if the case failed.
    pub diff: Option<String>,
}

/// Aggregate verification summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationSummary {
    /// Total cases run.
    pub total: usize,
    /// Cases passed.
    pub passed: usize,
    /// Cases failed.
    pub failed: usize,
    /// Individual results.
    pub results: Vec<VerificationResult>,
}

impl VerificationSummary {
    /// Build a summary from a list of results.
    #[must_use]
    pub fn from_results(results: Vec<VerificationResult>) -> Self {
        let total = results.len();
        let passed = results.iter().filter(|r| r.passed).count();
        let failed = total - passed;
        Self {
            total,
            passed,
            failed,
            results,
        }
    }

    /// Returns true if all cases passed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

/// `<kind>@<location>` for an advance error.
#[must_use]
pub fn error_tag(err: &AdvanceError) -> String {
    let location = match *err {
        AdvanceError::MalformedSpecifier { offset, .. } => offset.to_string(),
        AdvanceError::CursorUnderrun { position, .. }
        | AdvanceError::TypeMismatch { position, .. } => position.to_string(),
        AdvanceError::UnsupportedType { ty } => ty.name().to_string(),
    };
    format!("{}@{location}", err.kind_name())
}

/// Canonical one-line outcome: `[error=<tag>;]consumed=[a,b];remaining=N`.
#[must_use]
pub fn canonical_outcome<S: AsRef<str>>(
    error: Option<&str>,
    consumed: &[S],
    remaining: usize,
) -> String {
    let names: Vec<&str> = consumed.iter().map(AsRef::as_ref).collect();
    let mut out = String::new();
    if let Some(error) = error {
        out.push_str("error=");
        out.push_str(error);
        out.push(';');
    }
    out.push_str(&format!("consumed=[{}];remaining={remaining}", names.join(",")));
    out
}
