//! Error types for gradle-pin
//!
//! All modules use `PinResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for gradle-pin operations
pub type PinResult<T> = Result<T, PinError>;

/// Coarse grouping of errors, used for reporting and exit handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Remote object missing, checksum mismatch, or transport failure
    Fetch,
    /// Local filesystem failure (reading descriptors, extraction)
    Io,
    /// Forwarded tool failed to start or exited non-zero
    Invocation,
    /// Configuration or platform problem
    Config,
}

/// All errors that can occur in gradle-pin
#[derive(Error, Debug)]
pub enum PinError {
    // Fetch errors
    #[error("Failed to fetch {label}: no object {checksum} in remote store")]
    FetchNotFound { label: String, checksum: String },

    #[error("Failed to fetch {label}: checksum mismatch (expected {expected}, got {actual})")]
    ChecksumMismatch {
        label: String,
        expected: String,
        actual: String,
    },

    #[error("Failed to fetch {label}: {reason}")]
    FetchTransport { label: String, reason: String },

    // Cache IO errors
    #[error("Invalid checksum descriptor {path}: {reason}")]
    ChecksumInvalid { path: PathBuf, reason: String },

    #[error("Failed to extract {label} from {archive}: {reason}")]
    Extract {
        label: String,
        archive: PathBuf,
        reason: String,
    },

    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Process errors
    #[error("Command failed: {command}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command exited with code {code}: {command}")]
    Invocation { command: String, code: i32 },

    #[error("Process terminated by signal")]
    ProcessSignaled,

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Unsupported platform: {0}. gradle-pin supports Linux, macOS and Windows.")]
    UnsupportedPlatform(String),
}

impl PinError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandFailed {
            command: command.into(),
            source,
        }
    }

    /// Create an extraction error
    pub fn extract(
        label: impl Into<String>,
        archive: impl Into<PathBuf>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Extract {
            label: label.into(),
            archive: archive.into(),
            reason: reason.into(),
        }
    }

    /// Which part of the taxonomy this error belongs to
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::FetchNotFound { .. }
            | Self::ChecksumMismatch { .. }
            | Self::FetchTransport { .. } => ErrorCategory::Fetch,
            Self::ChecksumInvalid { .. } | Self::Extract { .. } | Self::Io { .. } => {
                ErrorCategory::Io
            }
            Self::CommandFailed { .. } | Self::Invocation { .. } | Self::ProcessSignaled => {
                ErrorCategory::Invocation
            }
            Self::ConfigInvalid { .. } | Self::UnsupportedPlatform(_) => ErrorCategory::Config,
        }
    }

    /// Artifact label the error refers to, if any
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::FetchNotFound { label, .. }
            | Self::ChecksumMismatch { label, .. }
            | Self::FetchTransport { label, .. }
            | Self::Extract { label, .. } => Some(label),
            _ => None,
        }
    }

    /// Process exit code to report for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Invocation { code, .. } if *code != 0 => *code,
            _ => 1,
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::FetchNotFound { .. } => {
                Some("Check that the .sha1 file is committed and the object was uploaded")
            }
            Self::ChecksumMismatch { .. } => {
                Some("The remote object does not match its .sha1 file; re-upload it")
            }
            Self::FetchTransport { .. } => Some("Check network access or set [store] url"),
            Self::Extract { .. } => Some("Delete the archive and rerun to fetch it again"),
            Self::UnsupportedPlatform(_) => Some("Pass --java-home and run Gradle directly"),
            _ => None,
        }
    }
}
