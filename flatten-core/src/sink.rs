//! Row sink: serializes records to delimited text

use crate::config::FlattenConfig;
use crate::error::{FlattenError, Result};
use crate::record::Record;
use csv::{QuoteStyle, Writer, WriterBuilder};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// CSV writer that emits the header lazily, before the first record
pub struct RowSink<W: Write> {
    writer: Writer<W>,
    header_written: bool,
    rows_written: u64,
}

impl<W: Write> std::fmt::Debug for RowSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowSink")
            .field("header_written", &self.header_written)
            .field("rows_written", &self.rows_written)
            .finish()
    }
}

impl RowSink<File> {
    /// Create or truncate a file as the destination
    pub fn create<P: AsRef<Path>>(path: P, config: &FlattenConfig) -> Result<Self> {
        let writer = Self::builder(config)
            .from_path(path)
            .map_err(FlattenError::SinkWrite)?;
        Ok(Self::with_writer(writer))
    }
}

impl<W: Write> RowSink<W> {
    /// Wrap any writer as a sink
    pub fn from_writer(writer: W, config: &FlattenConfig) -> Self {
        Self::with_writer(Self::builder(config).from_writer(writer))
    }

    fn builder(config: &FlattenConfig) -> WriterBuilder {
        let mut builder = WriterBuilder::new();
        builder
            .delimiter(config.delimiter)
            .quote_style(QuoteStyle::Necessary);
        builder
    }

    fn with_writer(writer: Writer<W>) -> Self {
        Self {
            writer,
            header_written: false,
            rows_written: 0,
        }
    }

    /// Write one record, preceded by the header on the first call
    pub fn write_record(&mut self, record: &Record) -> Result<()> {
        if !self.header_written {
            self.writer
                .write_record(record.header().names())
                .map_err(FlattenError::SinkWrite)?;
            self.header_written = true;
        }
        self.writer
            .write_record(record.values())
            .map_err(FlattenError::SinkWrite)?;
        self.rows_written += 1;
        Ok(())
    }

    /// Data rows written so far
    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    /// Flush buffered output and return the number of data rows written
    pub fn finish(&mut self) -> Result<u64> {
        self.writer.flush().map_err(FlattenError::sink_io)?;
        Ok(self.rows_written)
    }

    #[cfg(test)]
    fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| FlattenError::sink_io(e.into_error()))
    }
}
