//! Error handling for event analysis operations.
//!
//! Load-time failures are the only hard errors the engine produces. Intake
//! rejections and output failures belong to the callers around it and are
//! folded into [`AnalyzerError`].

use std::path::PathBuf;
use thiserror::Error;

/// Failures that stop an analysis before any result exists
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Source file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("The CSV source is empty: {source_name}")]
    Empty { source_name: String },

    #[error("Could not read {source_name} as CSV: {cause}")]
    Malformed {
        source_name: String,
        #[source]
        cause: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl LoadError {
    /// Create a malformed-source error with its underlying cause
    pub fn malformed(
        source_name: impl Into<String>,
        cause: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Malformed {
            source_name: source_name.into(),
            cause: cause.into(),
        }
    }

    /// Create an empty-source error
    pub fn empty(source_name: impl Into<String>) -> Self {
        Self::Empty {
            source_name: source_name.into(),
        }
    }

    /// Text shown to the person who supplied the file
    pub fn user_message(&self) -> String {
        match self {
            LoadError::NotFound { .. } => {
                "Uploaded file not found. Please upload it again.".to_string()
            }
            LoadError::Empty { .. } => "The uploaded CSV file is empty.".to_string(),
            LoadError::Malformed { cause, .. } => {
                format!("An error occurred while reading the file: {}", cause)
            }
        }
    }
}

/// Reasons a file is turned away before it reaches the engine
#[derive(Error, Debug, PartialEq, Eq)]
pub enum IntakeError {
    #[error("No file was provided at {path}")]
    MissingFile { path: PathBuf },

    #[error("No file name could be determined for {path}")]
    NoFileName { path: PathBuf },

    #[error("Invalid file type for {file_name}: expected one of {allowed}")]
    InvalidExtension { file_name: String, allowed: String },

    #[error("File {file_name} is {size_bytes} bytes, above the {limit_bytes} byte limit")]
    TooLarge {
        file_name: String,
        size_bytes: u64,
        limit_bytes: u64,
    },
}

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("Upload rejected: {0}")]
    Intake(#[from] IntakeError),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;
