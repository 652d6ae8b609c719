//! Records bound to a shared header

use std::sync::Arc;

/// Ordered column names of one input stream
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Header {
    names: Vec<String>,
}

impl Header {
    /// Create a header from column names in input order
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the header has no columns
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Column names in order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Position of the first column named exactly `name`
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }
}

/// One data row, mapping each header column to its cell value
///
/// All records of a stream share the same [`Header`], so the column set and
/// order are fixed by the first line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    header: Arc<Header>,
    values: Vec<String>,
}

impl Record {
    /// Create a record; callers guarantee `values.len() == header.len()`
    pub(crate) fn from_parts(header: Arc<Header>, values: Vec<String>) -> Self {
        debug_assert_eq!(header.len(), values.len());
        Self { header, values }
    }

    /// Build a record from `(column, value)` pairs, mostly for tests and
    /// in-memory callers
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let (names, values): (Vec<String>, Vec<String>) = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .unzip();
        Self {
            header: Arc::new(Header { names }),
            values,
        }
    }

    /// The header this record is bound to
    pub fn header(&self) -> &Arc<Header> {
        &self.header
    }

    /// Cell value for `column`, if the column exists
    pub fn get(&self, column: &str) -> Option<&str> {
        self.header
            .index_of(column)
            .and_then(|i| self.get_index(i))
    }

    /// Cell value at a column position
    pub fn get_index(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(String::as_str)
    }

    /// Replace the value at a column position, returning the previous value
    pub fn replace_index(&mut self, index: usize, value: String) -> Option<String> {
        self.values
            .get_mut(index)
            .map(|slot| std::mem::replace(slot, value))
    }

    /// Replace the value of `column`; returns `false` if the column is absent
    pub fn set(&mut self, column: &str, value: impl Into<String>) -> bool {
        match self.header.index_of(column) {
            Some(i) => self.replace_index(i, value.into()).is_some(),
            None => false,
        }
    }

    /// Cell values in column order
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// `(column, value)` pairs in column order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.header
            .names()
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().map(String::as_str))
    }
}
