//! Flattening configuration

use crate::error::{FlattenError, Result};

/// Default grouping key column
pub const DEFAULT_KEY_COLUMN: &str = "Handle";
/// Default accumulated image column
pub const DEFAULT_IMAGE_COLUMN: &str = "Image Src";
/// Default separator placed between accumulated image values
pub const DEFAULT_SEPARATOR: &str = ", ";

/// Column names and formatting used by a flattening run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlattenConfig {
    /// Column whose adjacent equal values form one group
    pub key_column: String,
    /// Column whose values are collected across a group
    pub image_column: String,
    /// Literal placed between collected image values
    pub separator: String,
    /// Field delimiter for both input and output
    pub delimiter: u8,
}

impl Default for FlattenConfig {
    fn default() -> Self {
        Self {
            key_column: DEFAULT_KEY_COLUMN.to_string(),
            image_column: DEFAULT_IMAGE_COLUMN.to_string(),
            separator: DEFAULT_SEPARATOR.to_string(),
            delimiter: b',',
        }
    }
}

impl FlattenConfig {
    /// Create a builder starting from the defaults
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check the configuration for values the pipeline cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.key_column.is_empty() {
            return Err(FlattenError::Config(
                "key column must not be empty".to_string(),
            ));
        }
        if self.image_column.is_empty() {
            return Err(FlattenError::Config(
                "image column must not be empty".to_string(),
            ));
        }
        if self.key_column == self.image_column {
            return Err(FlattenError::Config(format!(
                "key and image column are both `{}`",
                self.key_column
            )));
        }
        if !self.delimiter.is_ascii() || matches!(self.delimiter, b'"' | b'\n' | b'\r') {
            return Err(FlattenError::Config(format!(
                "unusable delimiter byte 0x{:02x}",
                self.delimiter
            )));
        }
        Ok(())
    }
}

/// Builder for [`FlattenConfig`]
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: FlattenConfig,
}

impl ConfigBuilder {
    /// Set the grouping key column
    pub fn key_column(mut self, column: impl Into<String>) -> Self {
        self.config.key_column = column.into();
        self
    }

    /// Set the accumulated image column
    pub fn image_column(mut self, column: impl Into<String>) -> Self {
        self.config.image_column = column.into();
        self
    }

    /// Set the separator used to join image values
    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.config.separator = separator.into();
        self
    }

    /// Set the field delimiter
    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.config.delimiter = delimiter;
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<FlattenConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
