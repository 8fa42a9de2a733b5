//! Raw `mallopt` entry point.
//!
//! glibc exports `mallopt` from `<malloc.h>`. musl does not provide `M_MMAP_THRESHOLD`, and
//! non-Linux targets have no `mallopt` at all, so those builds get a stub that returns 0
//! (the C "failure" status) without touching the allocator.

use std::ffi::c_int;

/// glibc's identifier for the mmap threshold parameter.
#[cfg(all(target_os = "linux", target_env = "gnu"))]
pub(crate) const M_MMAP_THRESHOLD: c_int = libc::M_MMAP_THRESHOLD;

/// glibc's identifier for the mmap threshold parameter.
#[cfg(not(all(target_os = "linux", target_env = "gnu")))]
pub(crate) const M_MMAP_THRESHOLD: c_int = -3;

#[cfg(all(target_os = "linux", target_env = "gnu"))]
#[inline]
pub(crate) fn mallopt(param: c_int, value: c_int) -> c_int {
    // SAFETY: mallopt takes two plain integers and only adjusts allocator tunables.
    unsafe { libc::mallopt(param, value) }
}

#[cfg(not(all(target_os = "linux", target_env = "gnu")))]
#[inline]
pub(crate) fn mallopt(_param: c_int, _value: c_int) -> c_int {
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mmap_threshold_identifier_matches_glibc_header() {
        assert_eq!(M_MMAP_THRESHOLD, -3);
    }

    #[cfg(all(target_os = "linux", target_env = "gnu"))]
    #[test]
    fn glibc_accepts_64k_threshold() {
        assert_ne!(mallopt(M_MMAP_THRESHOLD, 64 * 1024), 0);
    }

    #[cfg(not(all(target_os = "linux", target_env = "gnu")))]
    #[test]
    fn stub_always_fails() {
        assert_eq!(mallopt(M_MMAP_THRESHOLD, 64 * 1024), 0);
    }
}
