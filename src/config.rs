//! Configuration management and validation.
//!
//! Provides the analysis settings (top-N size, accepted date formats) and
//! the intake limits applied before a file reaches the engine.

use crate::constants::{
    ALLOWED_EXTENSIONS, DATE_INPUT_FORMATS, DATETIME_INPUT_FORMATS, DEFAULT_TOP_N,
    MAX_UPLOAD_BYTES,
};
use crate::error::{AnalyzerError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Limits enforced on an uploaded file before analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeConfig {
    /// Maximum accepted size in bytes
    pub max_upload_bytes: u64,

    /// Accepted file extensions, lowercase, without the dot
    pub allowed_extensions: Vec<String>,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: MAX_UPLOAD_BYTES,
            allowed_extensions: ALLOWED_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Global configuration for event analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Entries kept in the top event types listing
    pub top_n: usize,

    /// Date-only formats (chrono syntax) tried against `event_date`
    pub date_formats: Vec<String>,

    /// Date-time formats tried when no date-only format matches
    pub datetime_formats: Vec<String>,

    /// Upload limits
    pub intake: IntakeConfig,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            date_formats: DATE_INPUT_FORMATS.iter().map(|s| s.to_string()).collect(),
            datetime_formats: DATETIME_INPUT_FORMATS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            intake: IntakeConfig::default(),
        }
    }
}

impl AnalyzerConfig {
    /// Set the size of the top event types listing
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    /// Set the upload size limit in bytes
    pub fn with_max_upload_bytes(mut self, max_bytes: u64) -> Self {
        self.intake.max_upload_bytes = max_bytes;
        self
    }

    /// Try an additional date-only format after the defaults
    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_formats.push(format.into());
        self
    }

    /// Check the settings are usable
    pub fn validate(&self) -> Result<()> {
        if self.top_n == 0 {
            return Err(AnalyzerError::Configuration {
                message: "top_n must be at least 1".to_string(),
            });
        }
        if self.intake.max_upload_bytes == 0 {
            return Err(AnalyzerError::Configuration {
                message: "max_upload_bytes must be greater than zero".to_string(),
            });
        }
        if self.date_formats.is_empty() && self.datetime_formats.is_empty() {
            return Err(AnalyzerError::Configuration {
                message: "at least one date or date-time format is required".to_string(),
            });
        }

        debug!(
            "Configuration valid: top_n={}, max_upload_bytes={}, {} date formats",
            self.top_n,
            self.intake.max_upload_bytes,
            self.date_formats.len() + self.datetime_formats.len()
        );
        Ok(())
    }
}
