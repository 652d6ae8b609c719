//! Flatten command implementation

use anyhow::{Context, Result};
use clap::Args;
use flatten_core::{flatten_file_with_observer, FlattenConfig, FlattenSummary};
use std::path::PathBuf;

use crate::config::CliConfig;
use crate::input::{base_file_name, check_readable, file_size};
use crate::output::OutputTarget;
use crate::progress::ProgressReporter;

/// Arguments for the flatten command
#[derive(Debug, Args)]
pub struct FlattenArgs {
    /// CSV file to flatten
    #[arg(value_name = "CSV_FILE")]
    pub input: PathBuf,

    /// Directory for the flattened file [default: outputs]
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Prefix for the flattened file name [default: flattened-]
    #[arg(long, value_name = "PREFIX")]
    pub prefix: Option<String>,

    /// Column identifying rows of the same product [default: Handle]
    #[arg(long, value_name = "NAME")]
    pub key_column: Option<String>,

    /// Column whose values are collected per product [default: "Image Src"]
    #[arg(long, value_name = "NAME")]
    pub image_column: Option<String>,

    /// Separator between collected image values [default: ", "]
    #[arg(long, value_name = "SEP")]
    pub separator: Option<String>,

    /// Configuration file
    #[arg(short, long, value_name = "FILE", env = "CSV_FLATTEN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Settings after merging flags over the configuration file
#[derive(Debug)]
struct Settings {
    flatten: FlattenConfig,
    output_dir: PathBuf,
    prefix: String,
}

impl FlattenArgs {
    /// Execute the flatten command
    pub fn execute(&self) -> Result<()> {
        self.init_logging()?;

        log::info!("Parsing through the csv file: {}", self.input.display());
        log::debug!("Arguments: {:?}", self);

        let settings = self.settings()?;
        check_readable(&self.input)?;
        log::debug!("Input size: {} bytes", file_size(&self.input)?);

        let file_name = base_file_name(&self.input)?;
        log::info!("File name: {file_name}");

        let target = OutputTarget::new(&settings.output_dir, &settings.prefix, &file_name);
        if target.prepare()? {
            log::info!("Creating {} directory", target.directory().display());
        }
        log::info!("Writing to {}", target.path().display());

        let summary = self.run(&settings.flatten, &target)?;
        log::info!("CSV file parsing and writing complete.");

        if !self.quiet {
            println!("Flattened CSV file location: {}", target.path().display());
            println!(
                "Rows {} -> products {}",
                summary.rows_read, summary.groups_written
            );
        }

        Ok(())
    }

    fn run(&self, config: &FlattenConfig, target: &OutputTarget) -> Result<FlattenSummary> {
        let progress = ProgressReporter::new(self.quiet);
        let result = flatten_file_with_observer(&self.input, target.path(), config, |p| {
            progress.group_written(p.rows_read, p.groups_written)
        });
        progress.finish();

        result.with_context(|| format!("Failed to flatten {}", self.input.display()))
    }

    /// Merge command-line flags over the configuration file
    fn settings(&self) -> Result<Settings> {
        let file = CliConfig::load_or_default(self.config.as_deref())?;

        let flatten = FlattenConfig::builder()
            .key_column(self.key_column.clone().unwrap_or(file.columns.key))
            .image_column(self.image_column.clone().unwrap_or(file.columns.image))
            .separator(self.separator.clone().unwrap_or(file.output.separator))
            .build()
            .context("Invalid column settings")?;

        Ok(Settings {
            flatten,
            output_dir: self
                .output_dir
                .clone()
                .unwrap_or_else(|| PathBuf::from(file.output.directory)),
            prefix: self.prefix.clone().unwrap_or(file.output.prefix),
        })
    }

    /// Initialize logging based on verbosity level
    fn init_logging(&self) -> Result<()> {
        let log_level = match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };

        if !self.quiet {
            // A logger may already be installed when several commands run in one process
            let _ = env_logger::Builder::from_env(
                env_logger::Env::default().default_filter_or(log_level),
            )
            .try_init();
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn args(input: PathBuf, output_dir: PathBuf) -> FlattenArgs {
        FlattenArgs {
            input,
            output_dir: Some(output_dir),
            prefix: None,
            key_column: None,
            image_column: None,
            separator: None,
            config: None,
            quiet: true,
            verbose: 0,
        }
    }

    #[test]
    fn test_execute_writes_prefixed_file() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("products.csv");
        fs::write(&input, "Handle,Image Src\ntee,a.jpg\ntee,b.jpg\n").unwrap();
        let out_dir = temp_dir.path().join("outputs");

        args(input, out_dir.clone()).execute().unwrap();

        let content = fs::read_to_string(out_dir.join("flattened-products.csv")).unwrap();
        assert_eq!(content, "Handle,Image Src\ntee,\"a.jpg, b.jpg\"\n");
    }

    #[test]
    fn test_flags_override_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let config = temp_dir.path().join("flatten.toml");
        fs::write(
            &config,
            "[columns]\nkey = \"SKU\"\n[output]\nseparator = \";\"\nprefix = \"cfg-\"\n",
        )
        .unwrap();

        let mut args = args(PathBuf::from("unused.csv"), temp_dir.path().to_path_buf());
        args.config = Some(config);
        args.separator = Some("|".to_string());

        let settings = args.settings().unwrap();
        assert_eq!(settings.flatten.key_column, "SKU");
        assert_eq!(settings.flatten.image_column, "Image Src");
        assert_eq!(settings.flatten.separator, "|");
        assert_eq!(settings.prefix, "cfg-");
        assert_eq!(settings.output_dir, temp_dir.path());
    }

    #[test]
    fn test_identical_columns_rejected() {
        let mut args = args(PathBuf::from("unused.csv"), PathBuf::from("out"));
        args.key_column = Some("Image Src".to_string());

        let err = args.settings().unwrap_err();
        assert!(format!("{err:#}").contains("key and image column"));
    }

    #[test]
    fn test_missing_input_fails_before_creating_output() {
        let temp_dir = TempDir::new().unwrap();
        let out_dir = temp_dir.path().join("outputs");

        let result = args(temp_dir.path().join("missing.csv"), out_dir.clone()).execute();
        assert!(result.is_err());
        assert!(!out_dir.exists());
    }
}
