//! Generate config command implementation

use anyhow::{bail, Context, Result};
use clap::Args;
use std::path::PathBuf;

use crate::config::{DEFAULT_OUTPUT_DIR, DEFAULT_OUTPUT_PREFIX};
use flatten_core::config::{DEFAULT_IMAGE_COLUMN, DEFAULT_KEY_COLUMN, DEFAULT_SEPARATOR};

/// Arguments for the generate-config command
#[derive(Debug, Args)]
pub struct GenerateConfigArgs {
    /// Output file path
    #[arg(short, long, value_name = "FILE", required = true)]
    pub output: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

impl GenerateConfigArgs {
    /// Execute the generate-config command
    pub fn execute(&self) -> Result<()> {
        use std::fs;

        if self.output.exists() && !self.force {
            bail!(
                "{} already exists (use --force to overwrite)",
                self.output.display()
            );
        }

        fs::write(&self.output, Self::template())
            .with_context(|| format!("Failed to write to {}", self.output.display()))?;

        println!("✓ Configuration template written to {}", self.output.display());
        println!(
            "  Use it with: csv-flatten flatten --config {} <CSV_FILE>",
            self.output.display()
        );

        Ok(())
    }

    /// Template configuration content
    fn template() -> String {
        format!(
            r#"# csv-flatten configuration
# Command-line flags take precedence over values in this file.

[columns]
# Rows with the same value in this column, one after another, form one product
key = "{DEFAULT_KEY_COLUMN}"
# Values of this column are collected across a product's rows
image = "{DEFAULT_IMAGE_COLUMN}"

[output]
# Directory for flattened files, created when missing
directory = "{DEFAULT_OUTPUT_DIR}"
# Prefix added to the input file name
prefix = "{DEFAULT_OUTPUT_PREFIX}"
# Placed between collected image values
separator = "{DEFAULT_SEPARATOR}"
"#
        )
    }
}
