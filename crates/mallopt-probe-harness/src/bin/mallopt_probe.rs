//! CLI entrypoint for the mallopt threshold probe.
//!
//! Always exits 0 and always prints the transcript: a rejected tuning call is the expected
//! result on some C libraries, and an unusable command line or evidence log is reported on
//! stderr only.

use std::path::PathBuf;

use clap::Parser;
use mallopt_probe_abi::HostTuner;
use mallopt_probe_harness::{ProbeConfig, ThresholdProbe, evidence};

/// Check whether the host C library accepts `mallopt(M_MMAP_THRESHOLD, 65536)`.
#[derive(Debug, Default, Parser)]
#[command(name = "mallopt-probe")]
#[command(about = "Probe glibc/musl support for M_MMAP_THRESHOLD")]
#[command(disable_help_flag = true)]
struct Cli {
    /// Write a structured JSONL evidence log to this path.
    #[arg(long)]
    log: Option<PathBuf>,
    /// Expected result: `auto` (from the C library flavour), `accept` or `reject`.
    #[arg(long)]
    expect: Option<String>,
}

fn main() {
    // A bad command line falls back to environment-only configuration.
    let cli = Cli::try_parse().unwrap_or_else(|err| {
        eprint!("mallopt-probe: ignoring command line\n{err}");
        Cli::default()
    });
    let config = ProbeConfig::from_env().with_overrides(cli.log, cli.expect.as_deref());

    let probe = ThresholdProbe::new(HostTuner::new()).with_expectation(config.expectation);
    let report = {
        let mut stdout = std::io::stdout().lock();
        match probe.run(&mut stdout) {
            Ok(report) => report,
            Err(err) => {
                eprintln!("mallopt-probe: {err}");
                return;
            }
        }
    };

    if let Some(path) = &config.log_path
        && let Err(err) = evidence::write_log_file(path, &report)
    {
        eprintln!("mallopt-probe: {}: {err}", path.display());
    }
}
