//! Error types for webcam discovery and capture
//!
//! Every failure the tool can hit is a [`WebcamError`] variant. Each variant
//! knows whether it ends the run ([`WebcamError::is_fatal`]), which process
//! exit code it maps to, and what the user should try next
//! ([`WebcamError::remediation_hint`]).

use std::path::PathBuf;

/// Result type alias for webcam operations
pub type WebcamResult<T> = Result<T, WebcamError>;

/// Comprehensive error type for webcam operations
#[derive(Debug, thiserror::Error)]
pub enum WebcamError {
    /// Required external tools are not installed
    #[error("Missing required dependencies: {}", .packages.join(", "))]
    MissingDependency {
        /// Distribution package names providing the missing tools
        packages: Vec<String>,
    },

    /// No video device could be resolved
    #[error("No webcam found")]
    NoDeviceFound,

    /// The capture utility exited unsuccessfully
    #[error("Capture failed on {device}: {reason}")]
    CaptureFailed {
        /// Device that was being captured from
        device: String,
        /// Error text reported by the capture utility
        reason: String,
    },

    /// The optimizer ran but did not succeed
    #[error("Optimizing {} failed: {reason}", .path.display())]
    OptimizationFailed {
        /// File the optimizer was working on
        path:   PathBuf,
        /// Error text reported by the optimizer
        reason: String,
    },

    /// The optional PNG optimizer is not installed
    #[error("oxipng not found, skipping optimised copy")]
    OptimizerUnavailable,

    /// A resolution override could not be parsed
    #[error("Invalid resolution '{value}': {reason}")]
    InvalidResolution {
        /// The rejected input
        value:  String,
        /// Why it was rejected
        reason: String,
    },

    /// A query tool such as v4l2-ctl exited unsuccessfully
    #[error("{tool} failed ({status}): {stderr}")]
    ToolFailed {
        /// Program name
        tool:   String,
        /// Rendered exit status
        status: String,
        /// Captured standard error, trimmed
        stderr: String,
    },

    /// An external program could not be started at all
    #[error("Failed to run {tool}: {source}")]
    Spawn {
        /// Program name
        tool:   String,
        /// Underlying OS error
        #[source]
        source: std::io::Error,
    },

    /// I/O error occurred
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl WebcamError {
    /// Returns an actionable remediation hint for this error
    ///
    /// # Examples
    ///
    /// ```
    /// use webcam_core::error::WebcamError;
    ///
    /// let hint = WebcamError::NoDeviceFound.remediation_hint();
    /// assert!(hint.contains("-d /dev/videoN"));
    /// ```
    pub fn remediation_hint(&self) -> String {
        match self {
            WebcamError::MissingDependency { packages } => {
                format!("sudo apt install {}", packages.join(" "))
            }
            WebcamError::NoDeviceFound => {
                "Run 'webcam list' or use -d /dev/videoN (or set WEBCAM_DEVICE).".to_string()
            }
            WebcamError::CaptureFailed { .. } => {
                "Check that the device is not busy and supports the requested resolution. Try \
                 'webcam caps' to see supported sizes, or pass -r WxH."
                    .to_string()
            }
            WebcamError::OptimizationFailed { .. } => {
                "The original capture was kept. Re-run oxipng by hand to see its full output."
                    .to_string()
            }
            WebcamError::OptimizerUnavailable => {
                "Install oxipng for optimised copy: cargo install oxipng".to_string()
            }
            WebcamError::InvalidResolution { .. } => {
                "Resolutions are written as WIDTHxHEIGHT, e.g. 1920x1080.".to_string()
            }
            WebcamError::ToolFailed { tool, .. } => {
                format!("Run {tool} by hand to inspect the failure.")
            }
            WebcamError::Spawn { .. } => {
                "Ensure the tool is installed and on PATH.".to_string()
            }
            WebcamError::IoError(_) => {
                "Check file permissions and free disk space in the output directory.".to_string()
            }
        }
    }

    /// Whether this error ends the run
    ///
    /// Only [`WebcamError::OptimizerUnavailable`] is a warning.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, WebcamError::OptimizerUnavailable)
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> u8 {
        if self.is_fatal() { 1 } else { 0 }
    }
}
