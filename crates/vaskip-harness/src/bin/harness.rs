//! CLI entrypoint for the vaskip conformance harness.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use vaskip_core::{AdvanceOptions, ScanMode, TypeTrace, advance_with};
use vaskip_harness::structured_log::{LogEmitter, validate_log_file};
use vaskip_harness::verify::error_tag;
use vaskip_harness::{ConformanceReport, LoadedFixture, TestRunner, VerificationSummary};

/// Conformance tooling for vaskip.
#[derive(Debug, Parser)]
#[command(name = "vaskip-harness")]
#[command(about = "Conformance testing harness for vaskip")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Verify the advancer against fixture files.
    Verify {
        /// Directory containing fixture JSON files.
        #[arg(long)]
        fixture: PathBuf,
        /// Output report path (markdown; a `.json` sibling is written too).
        #[arg(long)]
        report: Option<PathBuf>,
        /// Scan mode to run: `strict`, `compat` or `both`.
        #[arg(long, default_value = "both")]
        mode: String,
        /// Structured JSONL log output path.
        #[arg(long)]
        log: Option<PathBuf>,
        /// Optional fixed timestamp string for deterministic report generation.
        #[arg(long)]
        timestamp: Option<String>,
    },
    /// Print the argument types a format string consumes, as JSON.
    Scan {
        /// printf-style format string.
        #[arg(long)]
        format: String,
        /// Scan mode: `strict` or `compat`.
        #[arg(long, default_value = "strict")]
        mode: String,
    },
    /// Validate a structured JSONL log.
    CheckLog {
        /// JSONL log path.
        #[arg(long)]
        log: PathBuf,
    },
}

fn parse_modes(mode: &str) -> Result<Vec<ScanMode>, String> {
    match mode.to_ascii_lowercase().as_str() {
        "strict" => Ok(vec![ScanMode::Strict]),
        "compat" => Ok(vec![ScanMode::Compat]),
        "both" => Ok(vec![ScanMode::Strict, ScanMode::Compat]),
        other => Err(format!("Unsupported mode '{other}', expected strict|compat|both")),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Verify {
            fixture,
            report,
            mode,
            log,
            timestamp,
        } => {
            let modes = parse_modes(&mode)?;
            eprintln!("Verifying against fixtures in {}", fixture.display());

            let mut fixtures = Vec::new();
            for path in vaskip_harness::fixtures::fixture_paths(&fixture)? {
                match LoadedFixture::from_file(&path) {
                    Ok(loaded) => fixtures.push(loaded),
                    Err(err) => eprintln!("Skipping {}: {}", path.display(), err),
                }
            }
            if fixtures.is_empty() {
                return Err(format!("No fixture JSON files found in {}", fixture.display()).into());
            }

            let run_id = format!("run-{}", std::process::id());
            let mut emitter = match &log {
                Some(path) => Some(LogEmitter::to_file(path, "fixture-verify", &run_id)?),
                None => None,
            };

            let mut results = Vec::new();
            for &mode in &modes {
                let runner = TestRunner::new("fixture-verify", mode);
                for loaded in &fixtures {
                    match emitter.as_mut() {
                        Some(emitter) => results.extend(runner.run_logged(&loaded.set, emitter)?),
                        None => results.extend(runner.run(&loaded.set)),
                    }
                }
            }
            if let Some(emitter) = emitter.as_mut() {
                emitter.flush()?;
            }

            // Stabilize report ordering for reproducible output.
            results.sort_by(|a, b| {
                a.family
                    .cmp(&b.family)
                    .then_with(|| a.case_name.cmp(&b.case_name))
                    .then_with(|| a.mode.cmp(&b.mode))
            });

            let summary = VerificationSummary::from_results(results);
            let report_doc = ConformanceReport {
                title: String::from("vaskip Conformance Report"),
                mode: modes
                    .iter()
                    .map(|m| m.as_str())
                    .collect::<Vec<_>>()
                    .join("+"),
                timestamp: timestamp
                    .unwrap_or_else(vaskip_harness::structured_log::now_utc),
                fixtures: fixtures.iter().map(Into::into).collect(),
                summary,
            };

            eprintln!(
                "Verification complete: total={}, passed={}, failed={}",
                report_doc.summary.total, report_doc.summary.passed, report_doc.summary.failed
            );
            for failed in report_doc.summary.results.iter().filter(|r| !r.passed) {
                eprintln!("FAIL [{}] {}: {}", failed.mode, failed.case_name, failed.actual);
            }

            if let Some(report_path) = report {
                eprintln!("Writing report to {}", report_path.display());
                if let Some(parent) = report_path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(&report_path, report_doc.to_markdown())?;
                let json_path = report_path.with_extension("json");
                std::fs::write(&json_path, report_doc.to_json())?;
            }
            if let Some(path) = &log {
                eprintln!("Wrote structured log to {}", path.display());
            }

            if !report_doc.summary.all_passed() {
                return Err("Conformance verification failed".into());
            }
        }
        Command::Scan { format, mode } => {
            let mode = match parse_modes(&mode)?.as_slice() {
                [single] => *single,
                _ => return Err("scan takes a single mode: strict|compat".into()),
            };
            let mut trace = TypeTrace::new();
            let result = advance_with(&mut trace, format.as_bytes(), &AdvanceOptions::from_mode(mode));
            let consumed: Vec<&str> = trace.types().iter().map(|ty| ty.name()).collect();
            let mut doc = serde_json::json!({
                "format": format,
                "mode": mode.as_str(),
                "consumed": consumed,
                "footprint_bytes": trace.byte_footprint(),
            });
            match &result {
                Ok(scan) => {
                    doc["specifiers"] = scan.specifiers.into();
                    doc["skipped"] = scan.skipped.into();
                }
                Err(err) => {
                    doc["error"] = error_tag(err).into();
                    doc["message"] = err.to_string().into();
                }
            }
            println!("{}", serde_json::to_string_pretty(&doc)?);
            if let Err(err) = result {
                return Err(err.into());
            }
        }
        Command::CheckLog { log } => {
            let (lines, errors) = validate_log_file(&log)?;
            for err in &errors {
                eprintln!("{err}");
            }
            eprintln!(
                "Checked {} lines in {}: {} errors",
                lines,
                log.display(),
                errors.len()
            );
            if !errors.is_empty() {
                return Err("Structured log validation failed".into());
            }
        }
    }

    Ok(())
}
