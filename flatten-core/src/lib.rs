//! Streaming flattener for multi-row catalog CSV exports
//!
//! Catalog exports spread one product over several consecutive rows sharing a
//! `Handle`: the first row carries the product data and each extra row adds
//! one `Image Src`. This crate collapses every such run into a single row whose
//! image column lists all of the group's images.
//!
//! ```
//! use flatten_core::{flatten, FlattenConfig};
//!
//! let input = "Handle,Title,Image Src\ntee,Tee,a.jpg\ntee,,b.jpg\n";
//! let mut output = Vec::new();
//! let summary = flatten(input.as_bytes(), &mut output, &FlattenConfig::default()).unwrap();
//!
//! assert_eq!(summary.groups_written, 1);
//! assert_eq!(
//!     String::from_utf8(output).unwrap(),
//!     "Handle,Title,Image Src\ntee,Tee,\"a.jpg, b.jpg\"\n"
//! );
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod flattener;
pub mod pipeline;
pub mod record;
pub mod sink;
pub mod source;

// Re-export key types
pub use config::{ConfigBuilder, FlattenConfig};
pub use error::{FlattenError, Result, SchemaError};
pub use flattener::{flatten_records, GroupFlattener};
pub use pipeline::{
    flatten, flatten_file, flatten_file_with_observer, flatten_with_observer, FlattenProgress,
    FlattenSummary,
};
pub use record::{Header, Record};
pub use sink::RowSink;
pub use source::RowSource;
