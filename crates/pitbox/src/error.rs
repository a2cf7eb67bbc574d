//! Error types for pitbox.
//!
//! One crate-wide error enum with structured variants; module-local errors
//! (the link layer has its own) convert into it via `From`.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for pitbox operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Link Errors ===
    /// Failed to open the tap device.
    #[error("failed to open tap device {path}: {source}")]
    LinkOpen {
        /// Path of the serial device.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The tap link failed mid-session.
    #[error(transparent)]
    Link(#[from] crate::link::LinkError),

    // === Session Errors ===
    /// Failed to create a session log file.
    #[error("failed to create session log at {path}: {source}")]
    SessionCreate {
        /// Path of the session file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A CSV write failed.
    #[error("session write failed: {0}")]
    Csv(#[from] csv::Error),

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Dyno Errors ===
    /// An edit addressed an rpm that is not a row of the sheet.
    #[error("{rpm} rpm is not on the dyno sheet")]
    UnknownRpm {
        /// The requested rpm.
        rpm: u32,
    },

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
}

/// A specialized Result type for pitbox operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a config validation error.
    #[must_use]
    pub fn config_validation(message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
        }
    }

    /// Check if this error is a link problem (device gone, bad frames).
    #[must_use]
    pub fn is_link_error(&self) -> bool {
        matches!(self, Self::Link(_) | Self::LinkOpen { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::LinkError;

    #[test]
    fn test_error_display() {
        let err = Error::UnknownRpm { rpm: 4_321 };
        assert_eq!(err.to_string(), "4321 rpm is not on the dyno sheet");

        let err = Error::config_validation("bad interval");
        assert_eq!(err.to_string(), "invalid configuration: bad interval");
    }

    #[test]
    fn test_link_open_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such device");
        let err = Error::LinkOpen {
            path: PathBuf::from("/dev/ttyUSB0"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("/dev/ttyUSB0"));
        assert!(msg.contains("no such device"));
    }

    #[test]
    fn test_is_link_error() {
        let err: Error = LinkError::BadFrame {
            line: "junk".to_string(),
        }
        .into();
        assert!(err.is_link_error());
        assert!(!Error::UnknownRpm { rpm: 1 }.is_link_error());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_session_create_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::SessionCreate {
            path: PathBuf::from("/var/empty/tap.csv"),
            source: io_err,
        };
        assert!(err.to_string().contains("/var/empty/tap.csv"));
    }

    #[test]
    fn test_directory_create_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::DirectoryCreate {
            path: PathBuf::from("/root/forbidden"),
            source: io_err,
        };
        assert!(err.to_string().contains("/root/forbidden"));
    }
}
