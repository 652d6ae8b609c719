//! Output location handling

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Where a flattened file is written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTarget {
    directory: PathBuf,
    path: PathBuf,
}

impl OutputTarget {
    /// `<directory>/<prefix><file_name>`
    pub fn new(directory: impl Into<PathBuf>, prefix: &str, file_name: &str) -> Self {
        let directory = directory.into();
        let path = directory.join(format!("{prefix}{file_name}"));
        Self { directory, path }
    }

    /// Output directory
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Output file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the output directory if needed; returns whether it was created
    pub fn prepare(&self) -> Result<bool> {
        if self.directory.as_os_str().is_empty() || self.directory.is_dir() {
            return Ok(false);
        }
        fs::create_dir_all(&self.directory).with_context(|| {
            format!(
                "Failed to create output directory: {}",
                self.directory.display()
            )
        })?;
        Ok(true)
    }
}
