//! Compile-time detection of the host C library.

use std::fmt;

/// C library implementation the crate was compiled against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LibcFlavor {
    /// GNU C library. Accepts `M_MMAP_THRESHOLD`.
    Glibc,
    /// musl (Alpine Linux and friends). No `M_MMAP_THRESHOLD` support.
    Musl,
    /// Any other platform. Treated as lacking the tuning primitive.
    Other,
}

impl LibcFlavor {
    /// Flavour of the current build target.
    #[must_use]
    pub const fn host() -> Self {
        if cfg!(all(target_os = "linux", target_env = "gnu")) {
            Self::Glibc
        } else if cfg!(all(target_os = "linux", target_env = "musl")) {
            Self::Musl
        } else {
            Self::Other
        }
    }

    /// Returns true if `mallopt(M_MMAP_THRESHOLD, ..)` is expected to succeed.
    #[must_use]
    pub const fn supports_mmap_threshold(self) -> bool {
        matches!(self, Self::Glibc)
    }

    /// Stable lowercase name used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Glibc => "glibc",
            Self::Musl => "musl",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for LibcFlavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
