//! Row source: lazily reads delimited text into [`Record`]s

use crate::config::FlattenConfig;
use crate::error::{FlattenError, Result, SchemaError};
use crate::record::{Header, Record};
use csv::{Reader, ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

/// Lazy, ordered sequence of records read from a CSV input
///
/// The first line is the header; each following line is mapped positionally
/// onto it. Only one raw row is buffered at a time.
pub struct RowSource<R: Read> {
    reader: Reader<R>,
    header: Arc<Header>,
    buffer: StringRecord,
    rows_read: u64,
    done: bool,
}

impl<R: Read> std::fmt::Debug for RowSource<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowSource")
            .field("header", &self.header)
            .field("rows_read", &self.rows_read)
            .field("done", &self.done)
            .finish()
    }
}

impl RowSource<File> {
    /// Open a file as a row source
    pub fn from_path<P: AsRef<Path>>(path: P, config: &FlattenConfig) -> Result<Self> {
        let reader = Self::builder(config)
            .from_path(path)
            .map_err(FlattenError::SourceRead)?;
        Self::with_reader(reader)
    }
}

impl<R: Read> RowSource<R> {
    /// Wrap any reader as a row source
    pub fn from_reader(reader: R, config: &FlattenConfig) -> Result<Self> {
        Self::with_reader(Self::builder(config).from_reader(reader))
    }

    fn builder(config: &FlattenConfig) -> ReaderBuilder {
        let mut builder = ReaderBuilder::new();
        // Length mismatches are reported as schema errors below
        builder
            .has_headers(true)
            .delimiter(config.delimiter)
            .flexible(true);
        builder
    }

    fn with_reader(mut reader: Reader<R>) -> Result<Self> {
        let header = reader
            .headers()
            .map_err(FlattenError::SourceRead)?
            .iter()
            .collect::<Vec<_>>();
        let header = Arc::new(Header::new(header));
        log::debug!("source header: {:?}", header.names());

        Ok(Self {
            reader,
            header,
            buffer: StringRecord::new(),
            rows_read: 0,
            done: false,
        })
    }

    /// The header read from the first line
    pub fn header(&self) -> &Arc<Header> {
        &self.header
    }

    /// Number of data rows read so far
    pub fn rows_read(&self) -> u64 {
        self.rows_read
    }

    fn read_next(&mut self) -> Result<Option<Record>> {
        if !self
            .reader
            .read_record(&mut self.buffer)
            .map_err(FlattenError::SourceRead)?
        {
            return Ok(None);
        }
        self.rows_read += 1;

        if self.buffer.len() != self.header.len() {
            let line = self
                .buffer
                .position()
                .map(|p| p.line())
                .unwrap_or(self.rows_read + 1);
            return Err(SchemaError::FieldCount {
                line,
                expected: self.header.len(),
                found: self.buffer.len(),
            }
            .into());
        }

        let values = self.buffer.iter().map(str::to_owned).collect();
        Ok(Some(Record::from_parts(Arc::clone(&self.header), values)))
    }
}

impl<R: Read> Iterator for RowSource<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.read_next() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
