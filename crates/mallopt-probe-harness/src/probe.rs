//! The threshold probe.
//!
//! Prints a fixed five-line transcript around a single `mallopt(M_MMAP_THRESHOLD, 65536)`
//! call. The result line is the only line that depends on the C library.

use std::io::Write;
use std::time::Instant;

use mallopt_probe_abi::{AllocatorTuner, LibcFlavor, TuningParam, TuningStatus};
use serde::Serialize;

use crate::error::ProbeError;
use crate::expectation::{Expectation, Verdict};

/// Threshold requested from the allocator: 64 KiB.
pub const TARGET_THRESHOLD_BYTES: usize = 64 * 1024;

pub const START_LINE: &str = "Testing mallopt function...";
pub const ATTEMPT_LINE: &str = "Attempting to set M_MMAP_THRESHOLD in glibc...";
pub const FAILURE_LINE: &str = "Failed to set M_MMAP_THRESHOLD (glibc-specific)";
pub const SUCCESS_LINE: &str = "Successfully set M_MMAP_THRESHOLD";
pub const OKEY_LINE: &str = "Okey";
pub const DONE_LINE: &str = "Done";

/// Everything observed during one probe run.
#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    pub libc: &'static str,
    pub param: &'static str,
    /// Value actually handed to the tuner.
    pub requested_bytes: usize,
    pub accepted: bool,
    pub native_code: i32,
    pub expectation: Expectation,
    pub verdict: Verdict,
    pub latency_ns: u64,
}

impl ProbeReport {
    fn new(
        flavor: LibcFlavor,
        param: TuningParam,
        requested_bytes: usize,
        status: TuningStatus,
        expectation: Expectation,
        latency_ns: u64,
    ) -> Self {
        Self {
            libc: flavor.as_str(),
            param: param.name(),
            requested_bytes,
            accepted: status.is_accepted(),
            native_code: status.code(),
            expectation,
            verdict: expectation.judge(flavor, status),
            latency_ns,
        }
    }

    /// The result line printed for this run.
    #[must_use]
    pub const fn result_line(&self) -> &'static str {
        if self.accepted {
            SUCCESS_LINE
        } else {
            FAILURE_LINE
        }
    }
}

/// One-shot probe of the allocator's mmap threshold tunable.
pub struct ThresholdProbe<T: AllocatorTuner> {
    tuner: T,
    expectation: Expectation,
}

impl<T: AllocatorTuner> ThresholdProbe<T> {
    #[must_use]
    pub fn new(tuner: T) -> Self {
        Self {
            tuner,
            expectation: Expectation::Auto,
        }
    }

    #[must_use]
    pub fn with_expectation(mut self, expectation: Expectation) -> Self {
        self.expectation = expectation;
        self
    }

    /// Run the probe, writing the transcript to `out`.
    ///
    /// A rejected tuning call is reported, not returned as an error. Only failures to
    /// write to `out` are errors.
    pub fn run<W: Write>(&self, out: &mut W) -> Result<ProbeReport, ProbeError> {
        writeln!(out, "{START_LINE}").map_err(ProbeError::Output)?;
        writeln!(out, "{ATTEMPT_LINE}").map_err(ProbeError::Output)?;

        let param = TuningParam::MmapThreshold;
        let started = Instant::now();
        let status = self.tuner.set(param, TARGET_THRESHOLD_BYTES);
        let latency_ns = u64::try_from(started.elapsed().as_nanos()).unwrap_or(u64::MAX);

        let report = ProbeReport::new(
            self.tuner.flavor(),
            param,
            TARGET_THRESHOLD_BYTES,
            status,
            self.expectation,
            latency_ns,
        );

        writeln!(out, "{}", report.result_line()).map_err(ProbeError::Output)?;
        writeln!(out, "{OKEY_LINE}").map_err(ProbeError::Output)?;
        writeln!(out, "{DONE_LINE}").map_err(ProbeError::Output)?;
        out.flush().map_err(ProbeError::Output)?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mallopt_probe_abi::{FixedTuner, HostTuner};
    use std::cell::Cell;

    struct RecordingTuner {
        seen: Cell<Option<(TuningParam, usize)>>,
    }

    impl AllocatorTuner for RecordingTuner {
        fn flavor(&self) -> LibcFlavor {
            LibcFlavor::Glibc
        }

        fn set(&self, param: TuningParam, value: usize) -> TuningStatus {
            self.seen.set(Some((param, value)));
            TuningStatus::from_code(1)
        }
    }

    struct BrokenSink;

    impl Write for BrokenSink {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::from(std::io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn transcript<T: AllocatorTuner>(probe: &ThresholdProbe<T>) -> (Vec<String>, ProbeReport) {
        let mut out = Vec::new();
        let report = probe.run(&mut out).unwrap();
        let lines = String::from_utf8(out)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect();
        (lines, report)
    }

    #[test]
    fn accepted_call_prints_success_transcript() {
        let (lines, report) = transcript(&ThresholdProbe::new(FixedTuner::accepting()));
        assert_eq!(
            lines,
            [START_LINE, ATTEMPT_LINE, SUCCESS_LINE, OKEY_LINE, DONE_LINE]
        );
        assert!(report.accepted);
        assert_eq!(report.native_code, 1);
        assert_eq!(report.libc, "glibc");
        assert_eq!(report.verdict, Verdict::Pass);
    }

    #[test]
    fn rejected_call_prints_failure_transcript() {
        let (lines, report) = transcript(&ThresholdProbe::new(FixedTuner::rejecting()));
        assert_eq!(
            lines,
            [START_LINE, ATTEMPT_LINE, FAILURE_LINE, OKEY_LINE, DONE_LINE]
        );
        assert!(!report.accepted);
        assert_eq!(report.native_code, 0);
        assert_eq!(report.libc, "musl");
        assert_eq!(report.verdict, Verdict::Pass);
    }

    #[test]
    fn exactly_one_result_line_per_run() {
        for tuner in [FixedTuner::accepting(), FixedTuner::rejecting()] {
            let (lines, _) = transcript(&ThresholdProbe::new(tuner));
            let results = lines
                .iter()
                .filter(|l| *l == SUCCESS_LINE || *l == FAILURE_LINE)
                .count();
            assert_eq!(results, 1);
        }
    }

    #[test]
    fn announced_threshold_is_the_value_passed() {
        assert_eq!(TARGET_THRESHOLD_BYTES, 65_536);

        let tuner = RecordingTuner {
            seen: Cell::new(None),
        };
        let probe = ThresholdProbe::new(tuner);
        let (_, report) = transcript(&probe);
        assert_eq!(
            probe.tuner.seen.get(),
            Some((TuningParam::MmapThreshold, TARGET_THRESHOLD_BYTES))
        );
        assert_eq!(report.requested_bytes, TARGET_THRESHOLD_BYTES);
        assert_eq!(report.param, "M_MMAP_THRESHOLD");
        assert!(ATTEMPT_LINE.contains(report.param));
    }

    #[test]
    fn mismatched_expectation_fails_verdict_but_not_run() {
        let probe =
            ThresholdProbe::new(FixedTuner::rejecting()).with_expectation(Expectation::Accept);
        let (lines, report) = transcript(&probe);
        assert_eq!(lines.last().map(String::as_str), Some(DONE_LINE));
        assert_eq!(report.verdict, Verdict::Fail);
        assert_eq!(report.expectation, Expectation::Accept);
    }

    #[test]
    fn host_probe_matches_flavor() {
        let (lines, report) = transcript(&ThresholdProbe::new(HostTuner::new()));
        let expected = if LibcFlavor::host().supports_mmap_threshold() {
            SUCCESS_LINE
        } else {
            FAILURE_LINE
        };
        assert_eq!(lines[2], expected);
        assert_eq!(report.verdict, Verdict::Pass);
    }

    #[test]
    fn output_failure_is_an_error() {
        let err = ThresholdProbe::new(FixedTuner::accepting())
            .run(&mut BrokenSink)
            .unwrap_err();
        assert!(matches!(err, ProbeError::Output(_)));
        assert!(err.to_string().starts_with("writing probe output"));
    }
}
