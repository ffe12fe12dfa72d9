//! Upload boundary checks applied before a file reaches the engine.

use crate::config::IntakeConfig;
use crate::error::IntakeError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A file that passed the intake checks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedUpload {
    pub path: PathBuf,
    pub file_name: String,
    pub size_bytes: u64,
}

/// Whether `file_name` carries one of the allowed extensions (case-insensitive)
pub fn allowed_file(file_name: &str, allowed_extensions: &[String]) -> bool {
    file_name
        .rsplit_once('.')
        .is_some_and(|(_, extension)| {
            allowed_extensions
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(extension))
        })
}

/// Reject files with the wrong extension or above the size limit
pub fn check_upload(path: &Path, config: &IntakeConfig) -> Result<AcceptedUpload, IntakeError> {
    let metadata = match std::fs::metadata(path) {
        Ok(metadata) if metadata.is_file() => metadata,
        _ => {
            return Err(IntakeError::MissingFile {
                path: path.to_path_buf(),
            });
        }
    };

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| IntakeError::NoFileName {
            path: path.to_path_buf(),
        })?
        .to_string();

    if !allowed_file(&file_name, &config.allowed_extensions) {
        return Err(IntakeError::InvalidExtension {
            file_name,
            allowed: config.allowed_extensions.join(", "),
        });
    }

    let size_bytes = metadata.len();
    if size_bytes > config.max_upload_bytes {
        return Err(IntakeError::TooLarge {
            file_name,
            size_bytes,
            limit_bytes: config.max_upload_bytes,
        });
    }

    debug!("Accepted upload {} ({} bytes)", file_name, size_bytes);
    Ok(AcceptedUpload {
        path: path.to_path_buf(),
        file_name,
        size_bytes,
    })
}
