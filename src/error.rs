//! Error types for the capacity planner sync.
//!
//! Every failure aborts the run: HTTP errors from either API, configuration
//! problems detected before the first mutation, and failures of the
//! `OpenStack` CLI collaborator.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the sync.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// HTTP errors from Capacity Planner or Meteo.
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    /// `OpenStack` CLI errors.
    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    /// IO errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The default deployment type did not resolve to exactly one record.
    #[error("Deployment type '{name}' matched {matches} records in the capacity planner, expected exactly one")]
    DeploymentType {
        /// Name that was looked up.
        name: String,
        /// Number of records the name filter returned.
        matches: usize,
    },

    /// A required value was not provided by any configuration layer.
    #[error("Missing required configuration value: {field}")]
    MissingValue {
        /// Dotted path of the missing field.
        field: String,
    },

    /// A URL could not be parsed.
    #[error("Invalid URL for {field}: '{value}'")]
    InvalidUrl {
        /// Dotted path of the field.
        field: String,
        /// The rejected value.
        value: String,
    },

    /// The configuration file was not found.
    #[error("Configuration file not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// The configuration file could not be parsed.
    #[error("Failed to parse configuration: {message}")]
    Parse {
        /// Description of the parse error.
        message: String,
        /// Optional source location.
        location: Option<String>,
    },
}

/// HTTP errors.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The server answered with a non-2xx status.
    #[error("{method} {url} failed: {status} - {body}")]
    Status {
        /// HTTP method.
        method: String,
        /// Absolute URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// The request never produced a response.
    #[error("Network error: {message}")]
    Network {
        /// Description of the network error.
        message: String,
    },

    /// The response body could not be decoded.
    #[error("Invalid response: {message}")]
    Decode {
        /// Description of the decode error.
        message: String,
    },
}

/// `OpenStack` CLI errors.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The process could not be started.
    #[error("Failed to run '{command}': {message}")]
    Spawn {
        /// Rendered command line.
        command: String,
        /// Description of the failure.
        message: String,
    },

    /// The process exited with a non-zero status.
    #[error("The command failed with exit code {code}. Output: {stdout}\nError: {stderr}")]
    NonZeroExit {
        /// Exit code, `-1` when killed by a signal.
        code: i32,
        /// Captured standard output.
        stdout: String,
        /// Captured standard error.
        stderr: String,
    },

    /// The output could not be parsed.
    #[error("Unexpected command output: {message}")]
    InvalidOutput {
        /// Description of the parse failure.
        message: String,
    },
}

/// Result type alias for sync operations.
pub type Result<T> = std::result::Result<T, SyncError>;

impl SyncError {
    /// Returns the HTTP status if this error came from a non-2xx response.
    #[must_use]
    pub const fn http_status(&self) -> Option<u16> {
        match self {
            Self::Http(HttpError::Status { status, .. }) => Some(*status),
            _ => None,
        }
    }
}

impl ConfigError {
    /// Creates a missing-value error for a field.
    #[must_use]
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingValue {
            field: field.into(),
        }
    }
}

impl HttpError {
    /// Creates a network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates a decode error.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }
}
