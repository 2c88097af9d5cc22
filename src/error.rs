use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Main error type for hostcpu
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CpuStatsError {
    /// Logical core count could not be determined
    #[error("unable to determine number of CPU cores: {reason}")]
    CoreCount { reason: String },

    /// CPU model/frequency records could not be obtained
    #[error("unable to obtain CPU information: {reason}")]
    CpuInfo { reason: String },

    /// A bounded query did not finish in time
    #[error("operation timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// The platform query itself failed
    #[error("Platform error: {message}")]
    Platform { message: String },

    /// Report could not be serialized
    #[error("Report rendering error: {message}")]
    Render { message: String },

    /// Configuration file is invalid
    #[error("Invalid configuration file {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    /// Invalid argument provided
    #[error("Invalid argument: {argument}")]
    InvalidArgument { argument: String },
}

impl CpuStatsError {
    /// Wrap a core-count failure
    pub fn core_count(reason: impl fmt::Display) -> Self {
        CpuStatsError::CoreCount {
            reason: reason.to_string(),
        }
    }

    /// Wrap a CPU info failure
    pub fn cpu_info(reason: impl fmt::Display) -> Self {
        CpuStatsError::CpuInfo {
            reason: reason.to_string(),
        }
    }

    /// Create a timeout error
    pub fn timeout(timeout_ms: u64) -> Self {
        CpuStatsError::Timeout { timeout_ms }
    }

    /// Create a platform error
    pub fn platform(message: impl Into<String>) -> Self {
        CpuStatsError::Platform {
            message: message.into(),
        }
    }

    /// Create a report rendering error
    pub fn render(message: impl Into<String>) -> Self {
        CpuStatsError::Render {
            message: message.into(),
        }
    }

    /// Create a config invalid error
    pub fn config_invalid(path: PathBuf, reason: impl Into<String>) -> Self {
        CpuStatsError::ConfigInvalid {
            path,
            reason: reason.into(),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(argument: impl Into<String>) -> Self {
        CpuStatsError::InvalidArgument {
            argument: argument.into(),
        }
    }
}

/// Result type alias for hostcpu operations
pub type Result<T> = std::result::Result<T, CpuStatsError>;

/// Every failure recorded while initializing a CPU info cache, in the order
/// the sub-queries ran.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InitError {
    causes: Vec<CpuStatsError>,
}

impl InitError {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, cause: CpuStatsError) {
        self.causes.push(cause);
    }

    pub fn causes(&self) -> &[CpuStatsError] {
        &self.causes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CpuStatsError> {
        self.causes.iter()
    }

    pub fn len(&self) -> usize {
        self.causes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.causes.is_empty()
    }

    pub fn mentions_core_count(&self) -> bool {
        self.causes
            .iter()
            .any(|cause| matches!(cause, CpuStatsError::CoreCount { .. }))
    }

    pub fn mentions_cpu_info(&self) -> bool {
        self.causes
            .iter()
            .any(|cause| matches!(cause, CpuStatsError::CpuInfo { .. }))
    }

    /// `Ok` when nothing was recorded
    pub fn into_result(self) -> std::result::Result<(), InitError> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.causes.len() {
            0 => return write!(f, "no errors occurred"),
            1 => write!(f, "1 error occurred:")?,
            n => write!(f, "{n} errors occurred:")?,
        }
        for cause in &self.causes {
            write!(f, "\n\t* {cause}")?;
        }
        Ok(())
    }
}

impl std::error::Error for InitError {}

impl<'a> IntoIterator for &'a InitError {
    type Item = &'a CpuStatsError;
    type IntoIter = std::slice::Iter<'a, CpuStatsError>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl From<serde_json::Error> for CpuStatsError {
    fn from(err: serde_json::Error) -> Self {
        CpuStatsError::render(err.to_string())
    }
}

impl From<serde_yaml_ng::Error> for CpuStatsError {
    fn from(err: serde_yaml_ng::Error) -> Self {
        CpuStatsError::render(err.to_string())
    }
}
