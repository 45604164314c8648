//! Conformance testing harness for vaskip.
//!
//! This crate provides:
//! - Fixture loading: JSON cases pairing a format string and tagged argument
//!   slots with the consumption they must produce
//! - Fixture verify: run each case through the advancer in strict or compat mode
//! - Structured logging: one JSONL record per case, plus a validator
//! - Report generation: human-readable + machine-readable conformance reports

#![forbid(unsafe_code)]

pub mod diff;
pub mod fixtures;
pub mod report;
pub mod runner;
pub mod structured_log;
pub mod verify;

pub use fixtures::{FixtureCase, FixtureError, FixtureSet, LoadedFixture, SlotSpec};
pub use report::ConformanceReport;
pub use runner::TestRunner;
pub use verify::{VerificationResult, VerificationSummary};
