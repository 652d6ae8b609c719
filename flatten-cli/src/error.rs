//! Error handling for the CLI application

use std::fmt;

/// Custom error type for CLI-specific errors
#[derive(Debug)]
pub enum CliError {
    /// A required argument was empty
    MissingArgument(String),
    /// File not found or not a regular file
    FileNotFound(String),
    /// File exists but cannot be read
    PermissionDenied(String),
    /// Configuration error
    ConfigError(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::MissingArgument(what) => write!(f, "Please provide {what}"),
            CliError::FileNotFound(path) => write!(f, "The csv file does not exist: {path}"),
            CliError::PermissionDenied(path) => {
                write!(f, "No read access to the csv file: {path}")
            }
            CliError::ConfigError(msg) => write!(f, "Configuration error: {msg}"),
        }
    }
}

impl std::error::Error for CliError {}
