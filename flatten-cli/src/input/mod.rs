//! Input handling module

pub mod file_check;

pub use file_check::{base_file_name, check_readable, file_size};
