//! # mallopt-probe-abi
//!
//! Boundary between the probe and the host C library's allocator-tuning entry point.
//!
//! ```text
//! probe -> AllocatorTuner -> HostTuner -> mallopt(3) (glibc) | stub returning 0 (elsewhere)
//! ```
//!
//! Only glibc is linked against `mallopt`. Every other C library gets a stub that reports
//! the parameter as rejected, which matches what the probe is meant to demonstrate on musl.

mod flavor;
mod native;
mod tuning;

pub use flavor::LibcFlavor;
pub use tuning::{AllocatorTuner, FixedTuner, HostTuner, TuningParam, TuningStatus};
