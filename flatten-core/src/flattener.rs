//! Group flattener: collapses runs of equal adjacent keys into one record
//!
//! The flattener is an iterator adapter over a stream of records. It holds at
//! most one open group, detects boundaries by comparing each record's key with
//! the previous one, and emits the group's representative record with the image
//! column replaced by the joined image list.
//!
//! The representative's own image value always seeds the list verbatim, blank
//! or not; later rows contribute only values that are non-blank after trimming.

use crate::config::FlattenConfig;
use crate::error::{Result, SchemaError};
use crate::record::{Header, Record};
use std::sync::Arc;

/// Positions of the columns the grouping depends on
#[derive(Debug, Clone, Copy)]
struct Columns {
    key: usize,
    image: usize,
}

impl Columns {
    fn resolve(record: &Record, config: &FlattenConfig) -> Result<Self> {
        let header = record.header();
        let find = |name: &str| {
            header.index_of(name).ok_or_else(|| SchemaError::MissingColumn {
                column: name.to_string(),
            })
        };
        Ok(Self {
            key: find(&config.key_column)?,
            image: find(&config.image_column)?,
        })
    }
}

/// Per-group state: the first record and the images collected so far
#[derive(Debug)]
struct Accumulator {
    key: String,
    representative: Record,
    images: Vec<String>,
}

impl Accumulator {
    fn open(record: Record, columns: Columns) -> Self {
        let key = cell(&record, columns.key).to_string();
        let images = vec![cell(&record, columns.image).to_string()];
        Self {
            key,
            representative: record,
            images,
        }
    }

    fn absorb(&mut self, record: &Record, columns: Columns) {
        let image = cell(record, columns.image);
        if !image.trim().is_empty() {
            self.images.push(image.to_string());
        }
    }

    fn merge(self, columns: Columns, separator: &str) -> Record {
        let mut merged = self.representative;
        merged.replace_index(columns.image, self.images.join(separator));
        merged
    }
}

fn cell(record: &Record, index: usize) -> &str {
    record.get_index(index).unwrap_or_default()
}

#[derive(Debug)]
enum State {
    /// No record seen yet
    Empty,
    /// One group open
    Accumulating(Accumulator),
    /// Input exhausted or aborted
    Finished,
}

/// Streaming state machine emitting one merged record per group
#[derive(Debug)]
pub struct GroupFlattener<I> {
    records: I,
    config: FlattenConfig,
    layout: Option<(Arc<Header>, Columns)>,
    state: State,
    records_seen: u64,
    groups_emitted: u64,
}

impl<I> GroupFlattener<I>
where
    I: Iterator<Item = Result<Record>>,
{
    /// Flatten `records` using the columns named in `config`
    pub fn new(records: I, config: FlattenConfig) -> Self {
        Self {
            records,
            config,
            layout: None,
            state: State::Empty,
            records_seen: 0,
            groups_emitted: 0,
        }
    }

    /// Input records consumed so far
    pub fn records_seen(&self) -> u64 {
        self.records_seen
    }

    /// Merged records emitted so far
    pub fn groups_emitted(&self) -> u64 {
        self.groups_emitted
    }

    /// Column positions for `record`, which must share the first record's header
    fn columns_for(&mut self, record: &Record) -> Result<Columns> {
        let header = record.header();
        if let Some((first, columns)) = &self.layout {
            if Arc::ptr_eq(first, header) || first == header {
                return Ok(*columns);
            }
            // Report an absent grouping column before a generic mismatch
            Columns::resolve(record, &self.config)?;
            return Err(SchemaError::HeaderMismatch {
                record: self.records_seen + 1,
            }
            .into());
        }

        let columns = Columns::resolve(record, &self.config)?;
        self.layout = Some((Arc::clone(header), columns));
        Ok(columns)
    }

    fn emit(&mut self, acc: Accumulator, columns: Columns) -> Record {
        self.groups_emitted += 1;
        log::debug!(
            "group `{}` closed with {} image value(s)",
            acc.key,
            acc.images.len()
        );
        acc.merge(columns, &self.config.separator)
    }

    fn step(&mut self) -> Option<Result<Record>> {
        loop {
            let Some(next) = self.records.next() else {
                // End of stream: flush the open group, if any
                return match std::mem::replace(&mut self.state, State::Finished) {
                    State::Accumulating(acc) => {
                        let columns = self.layout.as_ref()?.1;
                        Some(Ok(self.emit(acc, columns)))
                    }
                    State::Empty | State::Finished => None,
                };
            };

            let (record, columns) =
                match next.and_then(|r| self.columns_for(&r).map(|c| (r, c))) {
                    Ok(pair) => pair,
                    Err(e) => {
                        // The open group is dropped, never partially emitted
                        self.state = State::Finished;
                        return Some(Err(e));
                    }
                };
            self.records_seen += 1;
            log::trace!(
                "record {}: key `{}`",
                self.records_seen,
                cell(&record, columns.key)
            );

            match std::mem::replace(&mut self.state, State::Empty) {
                State::Empty => {
                    self.state = State::Accumulating(Accumulator::open(record, columns));
                }
                State::Accumulating(mut acc) => {
                    if cell(&record, columns.key) == acc.key {
                        acc.absorb(&record, columns);
                        self.state = State::Accumulating(acc);
                    } else {
                        self.state = State::Accumulating(Accumulator::open(record, columns));
                        return Some(Ok(self.emit(acc, columns)));
                    }
                }
                State::Finished => unreachable!("finished flattener polled its input"),
            }
        }
    }
}

impl<I> Iterator for GroupFlattener<I>
where
    I: Iterator<Item = Result<Record>>,
{
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if matches!(self.state, State::Finished) {
            return None;
        }
        self.step()
    }
}

impl<I> std::iter::FusedIterator for GroupFlattener<I> where I: Iterator<Item = Result<Record>> {}

/// Flatten an in-memory sequence of records
pub fn flatten_records<I>(records: I, config: &FlattenConfig) -> Result<Vec<Record>>
where
    I: IntoIterator<Item = Record>,
{
    GroupFlattener::new(records.into_iter().map(Ok), config.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FlattenError;

    fn row(handle: &str, title: &str, image: &str) -> Record {
        Record::from_pairs([("Handle", handle), ("Title", title), ("Image Src", image)])
    }

    fn images(records: &[Record]) -> Vec<&str> {
        records
            .iter()
            .map(|r| r.get("Image Src").unwrap())
            .collect()
    }

    #[test]
    fn test_groups_adjacent_rows() {
        let rows = vec![
            row("A", "Alpha", "i1"),
            row("A", "", "i2"),
            row("B", "Beta", "i3"),
            row("B", "", ""),
            row("B", "", "i4"),
            row("C", "Gamma", "i5"),
        ];
        let out = flatten_records(rows, &FlattenConfig::default()).unwrap();

        assert_eq!(out.len(), 3);
        assert_eq!(images(&out), ["i1, i2", "i3, i4", "i5"]);
        assert_eq!(out[1].get("Title"), Some("Beta"));
    }

    #[test]
    fn test_non_adjacent_repeat_is_separate_group() {
        let rows = vec![row("A", "1", "x"), row("B", "2", "y"), row("A", "3", "z")];
        let out = flatten_records(rows, &FlattenConfig::default()).unwrap();

        assert_eq!(out.len(), 3);
        assert_eq!(out[2].get("Title"), Some("3"));
    }

    #[test]
    fn test_first_row_blank_image_is_kept() {
        let rows = vec![row("A", "Alpha", "  "), row("A", "", "i2"), row("A", "", " ")];
        let out = flatten_records(rows, &FlattenConfig::default()).unwrap();
        assert_eq!(images(&out), ["  , i2"]);
    }

    #[test]
    fn test_later_values_are_appended_untrimmed() {
        let rows = vec![row("A", "Alpha", "i1"), row("A", "", " i2 ")];
        let out = flatten_records(rows, &FlattenConfig::default()).unwrap();
        assert_eq!(images(&out), ["i1,  i2 "]);
    }

    #[test]
    fn test_keys_compare_case_sensitively() {
        let rows = vec![row("tee", "", "a"), row("Tee", "", "b"), row("tee ", "", "c")];
        let out = flatten_records(rows, &FlattenConfig::default()).unwrap();
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn test_first_row_wins_for_other_columns() {
        let rows = vec![row("A", "First", "i1"), row("A", "Second", "i2")];
        let out = flatten_records(rows, &FlattenConfig::default()).unwrap();
        assert_eq!(out[0].get("Title"), Some("First"));
        assert_eq!(out[0].get("Handle"), Some("A"));
    }

    #[test]
    fn test_empty_input_emits_nothing() {
        let out = flatten_records(Vec::new(), &FlattenConfig::default()).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_custom_separator_and_columns() {
        let config = FlattenConfig::builder()
            .key_column("SKU")
            .image_column("Photo")
            .separator("|")
            .build()
            .unwrap();
        let rows = vec![
            Record::from_pairs([("SKU", "1"), ("Photo", "a")]),
            Record::from_pairs([("SKU", "1"), ("Photo", "b")]),
        ];
        let out = flatten_records(rows, &config).unwrap();
        assert_eq!(out[0].get("Photo"), Some("a|b"));
    }

    #[test]
    fn test_missing_key_column_is_schema_error() {
        let rows = vec![Record::from_pairs([("Title", "x"), ("Image Src", "a")])];
        let err = flatten_records(rows, &FlattenConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            FlattenError::Schema(SchemaError::MissingColumn { ref column }) if column == "Handle"
        ));
    }

    #[test]
    fn test_missing_image_column_is_schema_error() {
        let rows = vec![Record::from_pairs([("Handle", "x")])];
        let err = flatten_records(rows, &FlattenConfig::default()).unwrap_err();
        assert_eq!(err.to_string(), "missing required column `Image Src`");
    }

    #[test]
    fn test_later_record_missing_key_column_is_schema_error() {
        let rows = vec![
            Record::from_pairs([("Handle", "A"), ("Image Src", "i1")]),
            Record::from_pairs([("Title", "x"), ("Image Src", "i2")]),
            Record::from_pairs([("Image Src", "i3")]),
        ];
        let err = flatten_records(rows, &FlattenConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            FlattenError::Schema(SchemaError::MissingColumn { ref column }) if column == "Handle"
        ));
    }

    #[test]
    fn test_later_record_with_other_header_drops_open_group() {
        let input: Vec<Result<Record>> = vec![
            Ok(row("A", "", "i1")),
            Ok(row("B", "", "i2")),
            Ok(Record::from_pairs([
                ("Handle", "B"),
                ("Image Src", "i3"),
                ("Title", ""),
            ])),
        ];
        let mut flattener = GroupFlattener::new(input.into_iter(), FlattenConfig::default());

        assert_eq!(flattener.next().unwrap().unwrap().get("Handle"), Some("A"));
        let err = flattener.next().unwrap().unwrap_err();
        assert!(matches!(
            err,
            FlattenError::Schema(SchemaError::HeaderMismatch { record: 3 })
        ));
        assert!(flattener.next().is_none());
        assert_eq!(flattener.groups_emitted(), 1);
    }

    #[test]
    fn test_equal_headers_from_separate_allocations_are_accepted() {
        // `row` builds a fresh header per record
        let rows = vec![row("A", "t", "i1"), row("A", "", "i2")];
        let out = flatten_records(rows, &FlattenConfig::default()).unwrap();
        assert_eq!(images(&out), ["i1, i2"]);
    }

    #[test]
    fn test_upstream_error_drops_open_group() {
        let input: Vec<Result<Record>> = vec![
            Ok(row("A", "", "i1")),
            Ok(row("B", "", "i2")),
            Err(SchemaError::FieldCount {
                line: 4,
                expected: 3,
                found: 1,
            }
            .into()),
            Ok(row("B", "", "i3")),
        ];
        let mut flattener = GroupFlattener::new(input.into_iter(), FlattenConfig::default());

        let first = flattener.next().unwrap().unwrap();
        assert_eq!(first.get("Handle"), Some("A"));
        assert!(flattener.next().unwrap().is_err());
        assert!(flattener.next().is_none());
        assert!(flattener.next().is_none());
        assert_eq!(flattener.groups_emitted(), 1);
        assert_eq!(flattener.records_seen(), 2);
    }

    #[test]
    fn test_counters_after_full_run() {
        let rows = vec![row("A", "", "1"), row("A", "", "2"), row("B", "", "3")];
        let mut flattener =
            GroupFlattener::new(rows.into_iter().map(Ok), FlattenConfig::default());
        let out: Vec<_> = flattener.by_ref().collect::<Result<_>>().unwrap();

        assert_eq!(out.len(), 2);
        assert_eq!(flattener.records_seen(), 3);
        assert_eq!(flattener.groups_emitted(), 2);
    }
}
