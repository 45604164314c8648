//! Report generation for conformance results.

use serde::{Deserialize, Serialize};

use crate::fixtures::LoadedFixture;
use crate::verify::VerificationSummary;

/// Identity of one fixture file that fed the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureDigest {
    pub path: String,
    pub family: String,
    pub sha256: String,
    pub cases: usize,
}

impl From<&LoadedFixture> for FixtureDigest {
    fn from(fixture: &LoadedFixture) -> Self {
        Self {
            path: fixture.path.display().to_string(),
            family: fixture.set.family.clone(),
            sha256: fixture.sha256.clone(),
            cases: fixture.set.cases.len(),
        }
    }
}

/// A conformance report over one or more fixture files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConformanceReport {
    /// Report title.
    pub title: String,
    /// Scan modes tested (`strict`, `compat` or `strict+compat`).
    pub mode: String,
    /// Timestamp (UTC).
    pub timestamp: String,
    /// Fixture files, with content digests.
    pub fixtures: Vec<FixtureDigest>,
    /// Verification summary.
    pub summary: VerificationSummary,
}

impl ConformanceReport {
    /// Render the report as markdown.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("# {}\n\n", self.title));
        out.push_str(&format!("- Mode: {}\n", self.mode));
        out.push_str(&format!("- Timestamp: {}\n", self.timestamp));
        out.push_str(&format!("- Total: {}\n", self.summary.total));
        out.push_str(&format!("- Passed: {}\n", self.summary.passed));
        out.push_str(&format!("- Failed: {}\n\n", self.summary.failed));

        if !self.fixtures.is_empty() {
            out.push_str("| Fixture | Family | Cases | SHA-256 |\n");
            out.push_str("|---------|--------|-------|---------|\n");
            for f in &self.fixtures {
                out.push_str(&format!(
                    "| {} | {} | {} | `{}` |\n",
                    f.path, f.family, f.cases, f.sha256
                ));
            }
            out.push('\n');
        }

        out.push_str("| Case | Mode | Format | Status |\n");
        out.push_str("|------|------|--------|--------|\n");
        for r in &self.summary.results {
            let status = if r.passed { "PASS" } else { "FAIL" };
            out.push_str(&format!(
                "| {} | {} | `{}` | {} |\n",
                r.case_name,
                r.mode,
                escape_cell(&r.format),
                status
            ));
        }

        let failures: Vec<_> = self.summary.results.iter().filter(|r| !r.passed).collect();
        if !failures.is_empty() {
            out.push_str("\n## Failures\n");
            for r in failures {
                out.push_str(&format!("\n### {} ({})\n\n```diff\n", r.case_name, r.mode));
                out.push_str(r.diff.as_deref().unwrap_or_default());
                out.push_str("```\n");
            }
        }
        out
    }

    /// Render the report as JSON.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
    }
}

fn escape_cell(text: &str) -> String {
    text.escape_debug().to_string().replace('|', "\\|")
}
