//! Probe configuration.
//!
//! Resolved once from the environment, then overridden by CLI flags:
//! - `MALLOPT_PROBE_LOG`: path of the JSONL evidence log. Unset or empty disables it.
//! - `MALLOPT_PROBE_EXPECT`: `auto` (default), `accept` or `reject`.

use std::path::PathBuf;

use crate::expectation::Expectation;

pub const LOG_ENV: &str = "MALLOPT_PROBE_LOG";
pub const EXPECT_ENV: &str = "MALLOPT_PROBE_EXPECT";

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProbeConfig {
    /// Evidence log destination, if any.
    pub log_path: Option<PathBuf>,
    pub expectation: Expectation,
}

impl ProbeConfig {
    /// Read configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let log_path = lookup(LOG_ENV)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);
        let expectation = lookup(EXPECT_ENV)
            .map(|v| Expectation::from_str_loose(&v))
            .unwrap_or_default();
        Self {
            log_path,
            expectation,
        }
    }

    /// Apply CLI overrides; `None` keeps the environment value.
    #[must_use]
    pub fn with_overrides(mut self, log_path: Option<PathBuf>, expect: Option<&str>) -> Self {
        if let Some(path) = log_path {
            self.log_path = Some(path);
        }
        if let Some(raw) = expect {
            self.expectation = Expectation::from_str_loose(raw);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = ProbeConfig::from_lookup(|_| None);
        assert_eq!(config, ProbeConfig::default());
        assert!(config.log_path.is_none());
        assert_eq!(config.expectation, Expectation::Auto);
    }

    #[test]
    fn environment_values_are_read() {
        let config = ProbeConfig::from_lookup(lookup_from(&[
            (LOG_ENV, "/tmp/probe.jsonl"),
            (EXPECT_ENV, "REJECT"),
        ]));
        assert_eq!(config.log_path, Some(PathBuf::from("/tmp/probe.jsonl")));
        assert_eq!(config.expectation, Expectation::Reject);
    }

    #[test]
    fn blank_log_path_disables_logging() {
        let config = ProbeConfig::from_lookup(lookup_from(&[(LOG_ENV, "  ")]));
        assert!(config.log_path.is_none());
    }

    #[test]
    fn cli_overrides_environment() {
        let config = ProbeConfig::from_lookup(lookup_from(&[
            (LOG_ENV, "/tmp/env.jsonl"),
            (EXPECT_ENV, "reject"),
        ]))
        .with_overrides(Some(PathBuf::from("/tmp/cli.jsonl")), Some("accept"));
        assert_eq!(config.log_path, Some(PathBuf::from("/tmp/cli.jsonl")));
        assert_eq!(config.expectation, Expectation::Accept);
    }

    #[test]
    fn absent_overrides_keep_environment() {
        let config = ProbeConfig::from_lookup(lookup_from(&[(EXPECT_ENV, "musl")]))
            .with_overrides(None, None);
        assert_eq!(config.expectation, Expectation::Reject);
        assert!(config.log_path.is_none());
    }
}
