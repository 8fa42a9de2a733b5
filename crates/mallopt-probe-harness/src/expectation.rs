//! What the probe should observe on a given C library.

use std::fmt;

use mallopt_probe_abi::{LibcFlavor, TuningStatus};
use serde::{Deserialize, Serialize};

/// Expected result of the tuning call.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Expectation {
    /// Derive from the C library the probe was built against.
    #[default]
    Auto,
    /// The call must be accepted.
    Accept,
    /// The call must be rejected.
    Reject,
}

impl Expectation {
    /// Parse from string (case-insensitive). Unknown values fall back to `Auto`.
    #[must_use]
    pub fn from_str_loose(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "accept" | "accepted" | "success" | "glibc" => Self::Accept,
            "reject" | "rejected" | "failure" | "musl" => Self::Reject,
            _ => Self::Auto,
        }
    }

    /// Whether acceptance is expected on `flavor`.
    #[must_use]
    pub const fn expects_accept(self, flavor: LibcFlavor) -> bool {
        match self {
            Self::Auto => flavor.supports_mmap_threshold(),
            Self::Accept => true,
            Self::Reject => false,
        }
    }

    /// Compare an observed status against this expectation.
    #[must_use]
    pub const fn judge(self, flavor: LibcFlavor, status: TuningStatus) -> Verdict {
        if self.expects_accept(flavor) == status.is_accepted() {
            Verdict::Pass
        } else {
            Verdict::Fail
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Accept => "accept",
            Self::Reject => "reject",
        }
    }
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the observed status matched the expectation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Fail,
}
