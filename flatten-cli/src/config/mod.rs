//! Configuration module

use anyhow::{Context, Result};
use flatten_core::config::{DEFAULT_IMAGE_COLUMN, DEFAULT_KEY_COLUMN, DEFAULT_SEPARATOR};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::CliError;

/// Default directory receiving flattened files
pub const DEFAULT_OUTPUT_DIR: &str = "outputs";
/// Default prefix added to the input's file name
pub const DEFAULT_OUTPUT_PREFIX: &str = "flattened-";

/// CLI configuration structure
#[derive(Debug, Deserialize, Serialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    /// Column configuration
    #[serde(default)]
    pub columns: ColumnsConfig,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

/// Column-related configuration
#[derive(Debug, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ColumnsConfig {
    /// Column identifying which rows belong to one product
    pub key: String,

    /// Column whose values are collected across a product's rows
    pub image: String,
}

impl Default for ColumnsConfig {
    fn default() -> Self {
        Self {
            key: DEFAULT_KEY_COLUMN.to_string(),
            image: DEFAULT_IMAGE_COLUMN.to_string(),
        }
    }
}

/// Output-related configuration
#[derive(Debug, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Directory for flattened files, created on demand
    pub directory: String,

    /// Prefix added to the input file name
    pub prefix: String,

    /// Separator placed between collected image values
    pub separator: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: DEFAULT_OUTPUT_DIR.to_string(),
            prefix: DEFAULT_OUTPUT_PREFIX.to_string(),
            separator: DEFAULT_SEPARATOR.to_string(),
        }
    }
}

impl CliConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| CliError::ConfigError(e.to_string().trim_end().to_string()).into())
    }

    /// Load from `path` if given, otherwise use the defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}
