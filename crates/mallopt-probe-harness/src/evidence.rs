//! Turns a [`ProbeReport`] into structured log records.
//!
//! Each run produces three records: `probe_start`, `mallopt_call` and `probe_done`.

use std::io::Write;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::ProbeError;
use crate::probe::ProbeReport;
use crate::structured_log::{LogEmitter, LogEntry, LogLevel};

/// Component prefix used in trace IDs.
pub const COMPONENT: &str = "mallopt-probe";

/// Run identifier unique enough for one host: `run-<pid>-<unix nanos>`.
#[must_use]
pub fn new_run_id() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    format!("run-{}-{nanos}", std::process::id())
}

/// Append the records describing `report` to `emitter`.
pub fn record_run<W: Write>(
    emitter: &mut LogEmitter<W>,
    report: &ProbeReport,
) -> Result<(), ProbeError> {
    let call_level = if report.accepted {
        LogLevel::Info
    } else {
        LogLevel::Warn
    };

    emitter
        .emit_entry(LogEntry::new("", LogLevel::Info, "probe_start").with_libc(report.libc))
        .map_err(ProbeError::EvidenceLog)?;

    let call = LogEntry::new("", call_level, "mallopt_call")
        .with_libc(report.libc)
        .with_param(
            report.param,
            u64::try_from(report.requested_bytes).unwrap_or(u64::MAX),
        )
        .with_native_code(report.native_code)
        .with_outcome(report.verdict)
        .with_latency_ns(report.latency_ns)
        .with_details(serde_json::json!({
            "expectation": report.expectation,
            "result_line": report.result_line(),
        }));
    emitter.emit_entry(call).map_err(ProbeError::EvidenceLog)?;

    emitter
        .emit_entry(
            LogEntry::new("", LogLevel::Info, "probe_done")
                .with_outcome(report.verdict)
                .with_exit_code(0)
                .with_details(serde_json::to_value(report)?),
        )
        .map_err(ProbeError::EvidenceLog)?;

    emitter.flush().map_err(ProbeError::EvidenceLog)
}

/// Write a fresh evidence log for `report` at `path`.
pub fn write_log_file(path: &Path, report: &ProbeReport) -> Result<(), ProbeError> {
    let run_id = new_run_id();
    let mut emitter =
        LogEmitter::to_file(path, COMPONENT, &run_id).map_err(ProbeError::EvidenceLog)?;
    record_run(&mut emitter, report)
}
