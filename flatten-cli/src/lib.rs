//! csv-flatten CLI library
//!
//! This library provides the command-line interface around the
//! `flatten-core` streaming flattener.

pub mod commands;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod progress;

pub use error::CliError;
