// conformance_fixture_test.rs
// Runs the shipped fixture suite under both scan modes.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use vaskip_core::{ArgType, ScanMode};
use vaskip_harness::fixtures::fixture_paths;
use vaskip_harness::report::FixtureDigest;
use vaskip_harness::{ConformanceReport, LoadedFixture, TestRunner, VerificationSummary};

fn repo_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .to_path_buf()
}

fn load_all() -> Vec<LoadedFixture> {
    let dir = repo_root().join("tests/conformance/fixtures");
    let paths = fixture_paths(&dir).expect("fixture directory readable");
    assert!(!paths.is_empty(), "no fixtures in {}", dir.display());
    paths
        .iter()
        .map(|path| {
            LoadedFixture::from_file(path)
                .unwrap_or_else(|e| panic!("Failed to load {}: {e}", path.display()))
        })
        .collect()
}

#[test]
fn every_fixture_passes_in_both_modes() {
    let fixtures = load_all();
    let mut results = Vec::new();
    for mode in [ScanMode::Strict, ScanMode::Compat] {
        let runner = TestRunner::new("suite", mode);
        for loaded in &fixtures {
            results.extend(runner.run(&loaded.set));
        }
    }
    let summary = VerificationSummary::from_results(results);
    let failures: Vec<String> = summary
        .results
        .iter()
        .filter(|r| !r.passed)
        .map(|r| {
            format!(
                "[{}] {}: {}",
                r.mode,
                r.case_name,
                r.diff.as_deref().unwrap_or_default()
            )
        })
        .collect();
    assert!(summary.total > 0);
    assert!(failures.is_empty(), "fixture failures:\n{}", failures.join("\n"));
}

#[test]
fn fixtures_are_well_formed() {
    for loaded in load_all() {
        assert_eq!(loaded.set.version, "v1", "{}", loaded.path.display());
        let mut names = BTreeSet::new();
        for case in &loaded.set.cases {
            assert!(
                names.insert(case.name.as_str()),
                "duplicate case name {} in {}",
                case.name,
                loaded.path.display()
            );
            assert!(
                ["strict", "compat", "both"].contains(&case.mode.as_str()),
                "bad mode in {}",
                case.name
            );
            for name in &case.expected_consumed {
                assert!(ArgType::from_name(name).is_some(), "{}: unknown type {name}", case.name);
            }
            for slot in case.args.iter().flatten() {
                assert!(slot.arg_type().is_ok(), "{}: unknown slot {}", case.name, slot.ty);
            }
            if let Some(error) = &case.expected_error {
                assert!(error.contains('@'), "{}: error needs a location", case.name);
            }
        }
    }
}

#[test]
fn suite_consumes_every_argument_type() {
    let mut seen = BTreeSet::new();
    for loaded in load_all() {
        for case in &loaded.set.cases {
            for name in &case.expected_consumed {
                if let Some(ty) = ArgType::from_name(name) {
                    seen.insert(ty.name());
                }
            }
        }
    }
    let missing: Vec<&str> = ArgType::ALL
        .iter()
        .map(|ty| ty.name())
        .filter(|name| !seen.contains(name))
        .collect();
    assert!(missing.is_empty(), "types never consumed by fixtures: {missing:?}");
}

#[test]
fn report_records_fixture_digests() {
    let fixtures = load_all();
    let results = fixtures
        .iter()
        .flat_map(|loaded| TestRunner::new("report", ScanMode::Strict).run(&loaded.set))
        .collect();
    let report = ConformanceReport {
        title: "vaskip Conformance Report".into(),
        mode: "strict".into(),
        timestamp: "fixed".into(),
        fixtures: fixtures.iter().map(FixtureDigest::from).collect(),
        summary: VerificationSummary::from_results(results),
    };
    assert!(report.summary.all_passed());
    assert_eq!(report.fixtures.len(), fixtures.len());
    for digest in &report.fixtures {
        assert_eq!(digest.sha256.len(), 64);
        assert!(digest.sha256.bytes().all(|b| b.is_ascii_hexdigit()));
    }

    let md = report.to_markdown();
    assert!(md.contains("| Fixture | Family | Cases | SHA-256 |"));
    assert!(md.contains("dispatch_table"));
    let json: serde_json::Value = serde_json::from_str(&report.to_json()).unwrap();
    assert_eq!(json["summary"]["failed"], 0);
}
