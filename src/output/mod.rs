//! File output helpers.
//!
//! This module handles writing data to disk:
//! - Output path validation and parent-directory creation
//! - Per-task CSV buckets for the log-splitting variant

pub mod buckets;

// Re-export main types
pub use buckets::BucketWriter;

use crate::utils::error::OutputError;
use log::debug;
use std::path::Path;

/// Validate an output file path and create missing parent directories.
pub fn prepare_output_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("path is empty".to_string()));
    }

    if path.exists() && path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "path is a directory: {}",
            path.display()
        )));
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_output_path_empty() {
        assert!(prepare_output_path(Path::new("")).is_err());
    }

    #[test]
    fn test_prepare_output_path_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        assert!(prepare_output_path(temp_dir.path()).is_err());
    }

    #[test]
    fn test_prepare_output_path_creates_parents() {
        let temp_dir = tempfile::tempdir().unwrap();
        let nested = temp_dir.path().join("nested/dirs/figure.png");
        prepare_output_path(&nested).unwrap();
        assert!(nested.parent().unwrap().exists());
    }
}
