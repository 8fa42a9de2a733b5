//! Error taxonomy for the probe tooling.
//!
//! A rejected `mallopt` call is a normal result and never shows up here.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("writing probe output: {0}")]
    Output(#[source] std::io::Error),
    #[error("writing evidence log: {0}")]
    EvidenceLog(#[source] std::io::Error),
    #[error("serializing evidence record: {0}")]
    Serialize(#[from] serde_json::Error),
}
