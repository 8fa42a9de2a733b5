//! Threshold probe and evidence tooling for mallopt-probe.
//!
//! This crate provides:
//! - The threshold probe: prints the fixed transcript around one `mallopt` call
//! - Expectation checks: did the C library behave the way its flavour predicts
//! - Structured JSONL evidence logs of each run
//! - Environment + CLI configuration for the `mallopt-probe` binary

#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod evidence;
pub mod expectation;
pub mod probe;
pub mod structured_log;

pub use config::ProbeConfig;
pub use error::ProbeError;
pub use expectation::{Expectation, Verdict};
pub use probe::{ProbeReport, TARGET_THRESHOLD_BYTES, ThresholdProbe};
