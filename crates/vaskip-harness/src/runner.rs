//! Test execution engine.

use vaskip_core::{
    AdvanceOptions, Arg, ArgList, ArgType, ScanMode, TypeCheck, TypeTrace, advance_with,
};

use crate::diff;
use crate::fixtures::{FixtureCase, FixtureError, FixtureSet, SlotSpec};
use crate::structured_log::{LogEmitter, LogEntry, LogLevel, Outcome};
use crate::verify::{VerificationResult, canonical_outcome, error_tag};

/// Runs a fixture set and collects verification results.
pub struct TestRunner {
    /// Name of the test campaign.
    pub campaign: String,
    /// Mode being tested.
    pub mode: ScanMode,
}

/// What one case did to its cursor.
struct CaseRun {
    consumed: Vec<ArgType>,
    error: Option<String>,
    remaining: usize,
}

impl CaseRun {
    fn outcome(&self) -> String {
        let names: Vec<&str> = self.consumed.iter().map(|ty| ty.name()).collect();
        canonical_outcome(self.error.as_deref(), &names, self.remaining)
    }
}

impl TestRunner {
    /// Create a new test runner.
    #[must_use]
    pub fn new(campaign: impl Into<String>, mode: ScanMode) -> Self {
        Self {
            campaign: campaign.into(),
            mode,
        }
    }

    /// Run all fixtures in a set and return results.
    pub fn run(&self, fixture_set: &FixtureSet) -> Vec<VerificationResult> {
        self.cases(fixture_set)
            .map(|case| self.verify_case(fixture_set, case).0)
            .collect()
    }

    /// Like [`TestRunner::run`], writing one `case_result` record per case.
    pub fn run_logged(
        &self,
        fixture_set: &FixtureSet,
        log: &mut LogEmitter,
    ) -> std::io::Result<Vec<VerificationResult>> {
        let mode = self.mode.as_str();
        let trace_id = log.next_trace_id();
        log.emit_entry(
            LogEntry::new(trace_id, LogLevel::Info, "fixture_start")
                .with_mode(mode)
                .with_details(serde_json::json!({
                    "campaign": self.campaign,
                    "family": fixture_set.family,
                    "version": fixture_set.version,
                })),
        )?;

        let mut results = Vec::new();
        for case in self.cases(fixture_set) {
            let (result, run) = self.verify_case(fixture_set, case);
            let mut entry = LogEntry::new(
                log.next_trace_id(),
                if result.passed {
                    LogLevel::Info
                } else {
                    LogLevel::Error
                },
                "case_result",
            )
            .with_mode(mode)
            .with_case(&case.name, &case.format);
            match &run {
                Ok(run) => {
                    entry = entry
                        .with_outcome(if result.passed {
                            Outcome::Pass
                        } else {
                            Outcome::Fail
                        })
                        .with_consumed(&run.consumed);
                    if let Some(error) = &run.error {
                        entry = entry.with_error(error);
                    }
                }
                Err(_) => entry = entry.with_outcome(Outcome::Error),
            }
            if let Some(diff) = &result.diff {
                entry = entry.with_details(serde_json::json!({
                    "expected": result.expected,
                    "actual": result.actual,
                    "diff": diff,
                }));
            }
            log.emit_entry(entry)?;
            results.push(result);
        }
        Ok(results)
    }

    fn cases<'s>(&self, fixture_set: &'s FixtureSet) -> impl Iterator<Item = &'s FixtureCase> {
        let mode = self.mode;
        fixture_set
            .cases
            .iter()
            .filter(move |case| mode_matches(mode, &case.mode))
    }

    fn verify_case(
        &self,
        fixture_set: &FixtureSet,
        case: &FixtureCase,
    ) -> (VerificationResult, Result<CaseRun, FixtureError>) {
        let expected = case.expected_output();
        let run = execute_case(case, self.mode);
        let actual = match &run {
            Ok(run) => run.outcome(),
            Err(err) => format!("fixture_error={err}"),
        };
        let passed = actual == expected;
        let diff = (!passed).then(|| diff::render_diff(&expected, &actual));
        let result = VerificationResult {
            case_name: case.name.clone(),
            family: fixture_set.family.clone(),
            mode: self.mode.as_str().to_string(),
            format: case.format.clone(),
            passed,
            expected,
            actual,
            diff,
        };
        (result, run)
    }
}

fn mode_matches(active: ScanMode, case_mode: &str) -> bool {
    case_mode.eq_ignore_ascii_case("both") || ScanMode::from_str_loose(case_mode) == active
}

fn execute_case(case: &FixtureCase, mode: ScanMode) -> Result<CaseRun, FixtureError> {
    let options = AdvanceOptions::from_mode(mode);
    let format = case.format.as_bytes();

    let Some(slots) = &case.args else {
        let mut trace = TypeTrace::new();
        let error = advance_with(&mut trace, format, &options).err();
        return Ok(CaseRun {
            consumed: trace.into_types(),
            error: error.as_ref().map(error_tag),
            remaining: 0,
        });
    };

    let wide: Vec<Vec<u32>> = slots.iter().map(SlotSpec::wide_text).collect();
    let args = slots
        .iter()
        .zip(&wide)
        .map(|(slot, wide)| slot.to_arg(wide))
        .collect::<Result<Vec<_>, _>>()?;
    let mut list = ArgList::new(args).with_type_check(TypeCheck::for_mode(mode));
    let error = advance_with(&mut list, format, &options).err();
    Ok(CaseRun {
        consumed: list.consumed().iter().map(Arg::ty).collect(),
        error: error.as_ref().map(error_tag),
        remaining: list.remaining(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structured_log::validate_log_line;

    fn fixture(cases: &str) -> FixtureSet {
        FixtureSet::from_json(&format!(
            r#"{{"version":"v1","family":"smoke","captured_at":"2026-10-01T00:00:00Z","cases":[{cases}]}}"#
        ))
        .expect("valid fixture json")
    }

    #[test]
    fn strict_runner_executes_matching_cases() {
        let set = fixture(
            r#"
            {"name":"plain","format":"%d %s","args":[{"type":"int","value":1},{"type":"char *","value":"x"}],
             "mode":"both","expected_consumed":["int","char *"]},
            {"name":"compat_only","format":"%y","mode":"compat","expected_consumed":[]}
            "#,
        );
        let strict = TestRunner::new("smoke", ScanMode::Strict).run(&set);
        assert_eq!(strict.len(), 1);
        assert!(strict[0].passed, "{:?}", strict[0].diff);
        assert_eq!(strict[0].actual, "consumed=[int,char *];remaining=0");

        let compat = TestRunner::new("smoke", ScanMode::Compat).run(&set);
        assert_eq!(compat.len(), 2);
        assert!(compat.iter().all(|r| r.passed));
    }

    #[test]
    fn strict_reports_type_mismatch_compat_does_not() {
        let set = fixture(
            r#"
            {"name":"mismatch","format":"%f","args":[{"type":"int","value":3}],
             "mode":"strict","expected_consumed":[],"expected_error":"type_mismatch@0","expected_remaining":1},
            {"name":"mismatch_unchecked","format":"%f","args":[{"type":"int","value":3}],
             "mode":"compat","expected_consumed":["int"]}
            "#,
        );
        for mode in [ScanMode::Strict, ScanMode::Compat] {
            let results = TestRunner::new("types", mode).run(&set);
            assert_eq!(results.len(), 1);
            assert!(results[0].passed, "{mode:?}: {:?}", results[0].diff);
        }
    }

    #[test]
    fn failing_case_carries_diff() {
        let set = fixture(
            r#"{"name":"wrong","format":"%d","mode":"strict","expected_consumed":["long"]}"#,
        );
        let results = TestRunner::new("diff", ScanMode::Strict).run(&set);
        assert!(!results[0].passed);
        let diff = results[0].diff.as_deref().unwrap();
        assert!(diff.contains("-[long]"));
        assert!(diff.contains("+[int]"));
    }

    #[test]
    fn unknown_slot_type_is_a_fixture_error() {
        let set = fixture(
            r#"{"name":"bad","format":"%d","args":[{"type":"quad"}],"mode":"strict","expected_consumed":["int"]}"#,
        );
        let results = TestRunner::new("bad", ScanMode::Strict).run(&set);
        assert!(!results[0].passed);
        assert_eq!(results[0].actual, "fixture_error=unknown C type 'quad'");
    }

    #[test]
    fn logged_run_writes_valid_records() {
        let set = fixture(
            r#"
            {"name":"ok","format":"%zu","mode":"both","expected_consumed":["size_t"]},
            {"name":"short","format":"%d%d","args":[{"type":"int"}],"mode":"strict",
             "expected_consumed":["int"],"expected_error":"cursor_underrun@1"}
            "#,
        );
        let mut log = LogEmitter::to_buffer("logged", "run-1");
        let results = TestRunner::new("logged", ScanMode::Strict)
            .run_logged(&set, &mut log)
            .unwrap();
        assert!(results.iter().all(|r| r.passed));

        let text = std::str::from_utf8(log.buffer().unwrap()).unwrap();
        let entries: Vec<LogEntry> = text
            .lines()
            .enumerate()
            .map(|(i, line)| validate_log_line(line, i + 1).unwrap())
            .collect();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].event, "fixture_start");
        assert_eq!(entries[2].case.as_deref(), Some("short"));
        assert_eq!(entries[2].error.as_deref(), Some("cursor_underrun@1"));
        assert_eq!(entries[2].outcome, Some(Outcome::Pass));
        assert_eq!(entries[2].trace_id, "logged::run-1::003");
    }
}
