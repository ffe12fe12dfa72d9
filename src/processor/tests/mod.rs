//! Scenario tests for the analysis engine
//!
//! Exercises complete analysis calls over small CSV fixtures written to
//! temporary directories or held in memory.


use std::path::PathBuf;
use tempfile::TempDir;

/// Write `content` to `name` inside the temp dir and return its path
pub fn write_csv(temp_dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = temp_dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}
