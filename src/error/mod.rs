//! # Error Module
//!
//! Error types for the hue sorting pipeline.
//!
//! ## Design Principles
//! - **Never panic** on user data - return errors instead
//! - **Include context** - paths, file names, what went wrong
//! - **Per-item failures are recoverable** - a bad image is flagged and
//!   forwarded, never fatal to the pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum HueSorterError {
    #[error("Scanning error: {0}")]
    Scan(#[from] ScanError),

    #[error("Image loading error: {0}")]
    Load(#[from] LoadError),

    #[error("Color computation error: {0}")]
    Color(#[from] ColorError),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Errors that occur while discovering images
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Permission denied accessing: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Failed to read directory {path}: {source}")]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that occur while loading pixel data
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to open image file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode image {path}: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("Image has no pixels: {path}")]
    EmptyImage { path: PathBuf },
}

/// Errors from the pure color functions
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ColorError {
    #[error("Cannot average an empty pixel sequence")]
    EmptyInput,
}

/// Errors from pipeline orchestration
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Pipeline worker '{name}' panicked")]
    WorkerPanicked { name: &'static str },
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, HueSorterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_error_includes_path() {
        let error = ScanError::DirectoryNotFound {
            path: PathBuf::from("/photos/vacation"),
        };
        let message = error.to_string();
        assert!(message.contains("/photos/vacation"));
    }

    #[test]
    fn load_error_includes_path_and_reason() {
        let error = LoadError::Decode {
            path: PathBuf::from("/photos/broken.jpg"),
            reason: "invalid JPEG".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("/photos/broken.jpg"));
        assert!(message.contains("invalid JPEG"));
    }

    #[test]
    fn color_error_mentions_empty_input() {
        let message = ColorError::EmptyInput.to_string();
        assert!(message.contains("empty"));
    }
}
