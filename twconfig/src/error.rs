//! Error types for config loading and content resolution.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Coarse classification of a [`ConfigError`], for callers that decide
/// between aborting and falling back to defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[non_exhaustive]
pub enum ConfigErrorKind {
    /// The config file (or any candidate config file) does not exist.
    NotFound,
    /// The file exists but does not describe a valid descriptor.
    MalformedConfig,
    /// The file exists but could not be read.
    Io,
}

/// Failure to produce a [`crate::ContentScanConfig`].
///
/// Loading is all-or-nothing: any of these means no descriptor was produced.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// An explicitly given config path does not exist.
    #[error("config file not found: {}", path.display())]
    NotFound {
        /// The path that was looked up.
        path: PathBuf,
    },

    /// None of the conventional config file names exist in a project root.
    #[error("no config file found in {} (looked for {})", root.display(), candidates.join(", "))]
    NoConfigFound {
        /// The project root that was searched.
        root: PathBuf,
        /// File names that were tried, in order.
        candidates: Vec<&'static str>,
    },

    /// The file was read but its content violates the config schema.
    #[error("malformed config {}: {message}", path.display())]
    MalformedConfig {
        /// The file (or in-memory origin) being decoded.
        path: PathBuf,
        /// Human-readable description of the violation.
        message: String,
    },

    /// Reading the file failed for a reason other than absence.
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        /// The path being read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    /// Build a [`ConfigError::MalformedConfig`].
    #[must_use]
    pub fn malformed(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::MalformedConfig {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> ConfigErrorKind {
        match self {
            Self::NotFound { .. } | Self::NoConfigFound { .. } => ConfigErrorKind::NotFound,
            Self::MalformedConfig { .. } => ConfigErrorKind::MalformedConfig,
            Self::Io { .. } => ConfigErrorKind::Io,
        }
    }
}

/// The kind of failure encountered while resolving content globs to files.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[non_exhaustive]
pub enum ScanErrorKind {
    /// An I/O error occurred while inspecting a path.
    IoError,
    /// The resolved path is outside the walk root (symlink escape).
    OutsideRoot,
    /// The `max_files` limit was reached, truncating the resolution.
    LimitExceeded,
    /// A directory traversal error (permission denied, loop detected, etc.).
    WalkError,
    /// A content glob could not be parsed.
    InvalidPattern,
}

/// A path that could not be considered during content resolution.
///
/// Resolution never fails as a whole; these records say which parts of the
/// tree were not covered. Callers should treat a non-empty list as a failure.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[non_exhaustive]
pub struct ScanError {
    /// The path involved.
    pub file: PathBuf,
    /// The kind of failure.
    pub kind: ScanErrorKind,
    /// Human-readable description of the failure.
    pub message: String,
}

impl ScanError {
    /// Build a scan error.
    #[must_use]
    pub fn new(file: impl Into<PathBuf>, kind: ScanErrorKind, message: String) -> Self {
        Self {
            file: file.into(),
            kind,
            message,
        }
    }

    /// Format the error for human-readable output.
    #[must_use]
    pub fn format_human_readable(&self) -> String {
        format!("{}: [scan error] {}", self.file.display(), self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        let not_found = ConfigError::NotFound {
            path: PathBuf::from("tailwind.config.json"),
        };
        assert_eq!(not_found.kind(), ConfigErrorKind::NotFound);

        let none = ConfigError::NoConfigFound {
            root: PathBuf::from("."),
            candidates: vec!["a.json", "b.js"],
        };
        assert_eq!(none.kind(), ConfigErrorKind::NotFound);
        assert!(none.to_string().contains("a.json, b.js"));

        let malformed = ConfigError::malformed("x.json", "bad");
        assert_eq!(malformed.kind(), ConfigErrorKind::MalformedConfig);
        assert_eq!(malformed.to_string(), "malformed config x.json: bad");
    }

    #[test]
    fn test_format_scan_error() {
        let err = ScanError::new(
            "lib/link.js",
            ScanErrorKind::OutsideRoot,
            "Path resolves outside walk root".to_owned(),
        );
        assert_eq!(
            err.format_human_readable(),
            "lib/link.js: [scan error] Path resolves outside walk root"
        );
    }
}
