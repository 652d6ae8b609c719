//! CLI command implementations

use clap::Subcommand;

pub mod flatten;
pub mod generate_config;

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Collapse each product's rows into a single row
    Flatten(flatten::FlattenArgs),

    /// Write a configuration file template
    GenerateConfig(generate_config::GenerateConfigArgs),
}

impl Commands {
    /// Run the selected command
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            Commands::Flatten(args) => args.execute(),
            Commands::GenerateConfig(args) => args.execute(),
        }
    }
}
