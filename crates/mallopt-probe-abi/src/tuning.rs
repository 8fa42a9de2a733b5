//! Typed allocator-tuning requests and the tuner seam.

use std::ffi::c_int;

use crate::flavor::LibcFlavor;
use crate::native;

/// Allocator parameter that can be adjusted through `mallopt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum TuningParam {
    /// Allocation size above which the allocator serves requests with `mmap`.
    MmapThreshold,
}

impl TuningParam {
    /// Native parameter identifier passed as the first `mallopt` argument.
    #[must_use]
    pub const fn native_id(self) -> c_int {
        match self {
            Self::MmapThreshold => native::M_MMAP_THRESHOLD,
        }
    }

    /// C macro name of the parameter.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::MmapThreshold => "M_MMAP_THRESHOLD",
        }
    }
}

/// Result of a single tuning call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TuningStatus {
    /// Native call returned non-zero.
    Accepted { code: c_int },
    /// Native call returned zero, or the request was never issued.
    Rejected { code: c_int },
}

impl TuningStatus {
    /// Classify a raw `mallopt` return value (`0` is failure, anything else success).
    #[must_use]
    pub const fn from_code(code: c_int) -> Self {
        if code == 0 {
            Self::Rejected { code }
        } else {
            Self::Accepted { code }
        }
    }

    #[must_use]
    pub const fn is_accepted(self) -> bool {
        matches!(self, Self::Accepted { .. })
    }

    /// Raw return value of the native call.
    #[must_use]
    pub const fn code(self) -> c_int {
        match self {
            Self::Accepted { code } | Self::Rejected { code } => code,
        }
    }
}

/// Something that can apply allocator tunables.
pub trait AllocatorTuner {
    /// C library this tuner talks to.
    fn flavor(&self) -> LibcFlavor;

    /// Apply `param = value`.
    ///
    /// Values that do not fit a C `int` are rejected without reaching the allocator.
    fn set(&self, param: TuningParam, value: usize) -> TuningStatus;
}

/// Tuner backed by the host C library.
#[derive(Debug, Default, Clone, Copy)]
pub struct HostTuner;

impl HostTuner {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl AllocatorTuner for HostTuner {
    fn flavor(&self) -> LibcFlavor {
        LibcFlavor::host()
    }

    fn set(&self, param: TuningParam, value: usize) -> TuningStatus {
        let Ok(value) = c_int::try_from(value) else {
            return TuningStatus::Rejected { code: 0 };
        };
        TuningStatus::from_code(native::mallopt(param.native_id(), value))
    }
}

/// Tuner that answers every request with the same native code.
///
/// Used to exercise both probe branches independently of the host C library.
#[derive(Debug, Clone, Copy)]
pub struct FixedTuner {
    flavor: LibcFlavor,
    code: c_int,
}

impl FixedTuner {
    #[must_use]
    pub const fn new(flavor: LibcFlavor, code: c_int) -> Self {
        Self { flavor, code }
    }

    /// A tuner behaving like glibc (`mallopt` returns 1).
    #[must_use]
    pub const fn accepting() -> Self {
        Self::new(LibcFlavor::Glibc, 1)
    }

    /// A tuner behaving like musl (`mallopt` returns 0).
    #[must_use]
    pub const fn rejecting() -> Self {
        Self::new(LibcFlavor::Musl, 0)
    }
}

impl AllocatorTuner for FixedTuner {
    fn flavor(&self) -> LibcFlavor {
        self.flavor
    }

    fn set(&self, _param: TuningParam, value: usize) -> TuningStatus {
        if c_int::try_from(value).is_err() {
            return TuningStatus::Rejected { code: 0 };
        }
        TuningStatus::from_code(self.code)
    }
}
