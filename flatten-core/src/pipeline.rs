//! Source → flattener → sink wiring
//!
//! Records are pulled one at a time, so memory stays bounded by one raw record
//! plus the open group. The first error stops the run; rows already handed to
//! the sink are not rolled back.

use crate::config::FlattenConfig;
use crate::error::Result;
use crate::flattener::GroupFlattener;
use crate::sink::RowSink;
use crate::source::RowSource;
use std::io::{Read, Write};
use std::path::Path;

/// Counters reported after a successful run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlattenSummary {
    /// Data rows read from the input
    pub rows_read: u64,
    /// Merged rows written to the output
    pub groups_written: u64,
}

/// Snapshot passed to observers after each written group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlattenProgress {
    /// Data rows consumed so far
    pub rows_read: u64,
    /// Merged rows written so far
    pub groups_written: u64,
}

/// Flatten CSV from `reader` into `writer`
pub fn flatten<R: Read, W: Write>(
    reader: R,
    writer: W,
    config: &FlattenConfig,
) -> Result<FlattenSummary> {
    flatten_with_observer(reader, writer, config, |_| {})
}

/// Flatten CSV from `reader` into `writer`, reporting progress to `observer`
pub fn flatten_with_observer<R, W, F>(
    reader: R,
    writer: W,
    config: &FlattenConfig,
    observer: F,
) -> Result<FlattenSummary>
where
    R: Read,
    W: Write,
    F: FnMut(&FlattenProgress),
{
    config.validate()?;
    let source = RowSource::from_reader(reader, config)?;
    let sink = RowSink::from_writer(writer, config);
    run(source, sink, config, observer)
}

/// Flatten the CSV file at `input` into a new file at `output`
pub fn flatten_file(
    input: &Path,
    output: &Path,
    config: &FlattenConfig,
) -> Result<FlattenSummary> {
    flatten_file_with_observer(input, output, config, |_| {})
}

/// File-to-file variant of [`flatten_with_observer`]
///
/// The input is opened first, so an unreadable input never creates the output.
pub fn flatten_file_with_observer<F>(
    input: &Path,
    output: &Path,
    config: &FlattenConfig,
    observer: F,
) -> Result<FlattenSummary>
where
    F: FnMut(&FlattenProgress),
{
    config.validate()?;
    let source = RowSource::from_path(input, config)?;
    let sink = RowSink::create(output, config)?;
    run(source, sink, config, observer)
}

fn run<R, W, F>(
    source: RowSource<R>,
    mut sink: RowSink<W>,
    config: &FlattenConfig,
    mut observer: F,
) -> Result<FlattenSummary>
where
    R: Read,
    W: Write,
    F: FnMut(&FlattenProgress),
{
    let mut groups = GroupFlattener::new(source, config.clone());

    while let Some(merged) = groups.next() {
        sink.write_record(&merged?)?;
        observer(&FlattenProgress {
            rows_read: groups.records_seen(),
            groups_written: sink.rows_written(),
        });
    }

    let groups_written = sink.finish()?;
    let summary = FlattenSummary {
        rows_read: groups.records_seen(),
        groups_written,
    };
    log::debug!(
        "flattened {} row(s) into {} group(s)",
        summary.rows_read,
        summary.groups_written
    );
    Ok(summary)
}
