use std::fmt;

/// Which part of `1 <= start <= end <= 65535` a requested range broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RangeViolation {
    #[error("start port {start} is below 1")]
    StartBelowMinimum { start: u32 },

    #[error("end port {end} is above 65535")]
    EndAboveMaximum { end: u32 },

    #[error("start port {start} is greater than end port {end}")]
    StartAfterEnd { start: u32, end: u32 },
}

/// Errors that stop a scan before any probe is sent.
///
/// Probe outcomes are never errors; a refused or timed out connection is
/// simply a port that is not open.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("Could not resolve '{host}': {reason}")]
    Resolution { host: String, reason: String },

    #[error("Invalid port range: {0}. Use 1-65535 and start <= end.")]
    InvalidRange(RangeViolation),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ScanError {
    pub fn resolution(host: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::Resolution {
            host: host.into(),
            reason: reason.to_string(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Process exit status for this failure (sysexits.h values).
    pub fn exit_code(&self) -> i32 {
        match self {
            ScanError::InvalidRange(_) => 64,
            ScanError::Resolution { .. } => 68,
            ScanError::Config(_) => 78,
        }
    }
}

impl From<config::ConfigError> for ScanError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;
