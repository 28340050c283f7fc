//! Entry-indexed numeric tables.
//!
//! [MeasurementTable] holds the uploaded per-sample measurements of leaf entities and
//! [ResultTable] holds the aggregated value of every hierarchy node for one method. Both are
//! two-dimensional [ndarray] arrays with one row per entry and one column per sample. Missing
//! cells are NaN.

use std::io::Read;

use csv::{ReaderBuilder, StringRecord, Trim};
use hashbrown::{HashMap, HashSet};
use ndarray::{Array2, ArrayView1, ArrayView2, Axis};
use tracing::{event, Level};

use crate::error::FuncTreeError;
use crate::types::Missing;

/// Cell contents that denote an absent measurement.
const MISSING_TOKENS: [&str; 4] = ["", "NA", "NaN", "nan"];

/// Unique row labels with constant time lookup.
#[derive(Clone, Debug, Default, PartialEq)]
struct EntryIndex {
    entries: Vec<String>,
    positions: HashMap<String, usize>,
}

impl EntryIndex {
    /// Append an entry. Returns false if it is already present.
    fn push(&mut self, entry: &str) -> bool {
        if self.positions.contains_key(entry) {
            return false;
        }
        self.positions.insert(entry.to_string(), self.entries.len());
        self.entries.push(entry.to_string());
        true
    }

    fn position(&self, entry: &str) -> Option<usize> {
        self.positions.get(entry).copied()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Leaf measurements indexed by entry
#[derive(Clone, Debug, PartialEq)]
pub struct MeasurementTable {
    columns: Vec<String>,
    index: EntryIndex,
    values: Array2<f64>,
}

impl MeasurementTable {
    /// Return a new MeasurementTable.
    ///
    /// # Arguments
    ///
    /// * `columns`: Sample names, one per column of `values`
    /// * `entries`: Unique row labels, one per row of `values`
    /// * `values`: Measurements, NaN where missing
    pub fn new(
        columns: Vec<String>,
        entries: Vec<String>,
        values: Array2<f64>,
    ) -> Result<Self, FuncTreeError> {
        if values.dim() != (entries.len(), columns.len()) {
            return Err(ndarray::ShapeError::from_kind(ndarray::ErrorKind::IncompatibleShape).into());
        }
        let mut index = EntryIndex::default();
        for entry in &entries {
            if !index.push(entry) {
                return Err(FuncTreeError::DuplicateEntry {
                    entry: entry.clone(),
                });
            }
        }
        Ok(MeasurementTable {
            columns,
            index,
            values,
        })
    }

    /// Parse a tab separated table.
    ///
    /// Lines starting with `#` are comments. The first line is the header; its first cell names
    /// the index and is otherwise ignored. Each following line holds an entry and one value per
    /// column. Empty cells and `NA`/`NaN` are missing, as are values matched by `missing`.
    #[tracing::instrument(level = "DEBUG", skip(reader))]
    pub fn from_reader<R: Read>(
        reader: R,
        missing: Option<&Missing>,
    ) -> Result<Self, FuncTreeError> {
        let mut reader = ReaderBuilder::new()
            .delimiter(b'\t')
            .comment(Some(b'#'))
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let header = reader.headers()?.clone();
        let columns: Vec<String> = header.iter().skip(1).map(str::to_string).collect();
        if columns.is_empty() {
            return Err(FuncTreeError::NoColumns);
        }

        let mut entries = Vec::new();
        let mut data = Vec::new();
        let mut record = StringRecord::new();
        while reader.read_record(&mut record)? {
            if record.len() != header.len() {
                return Err(FuncTreeError::RaggedRow {
                    line: record.position().map_or(0, |position| position.line()),
                    found: record.len(),
                    expected: header.len(),
                });
            }
            let entry = &record[0];
            for (column, cell) in columns.iter().zip(record.iter().skip(1)) {
                data.push(parse_cell(entry, column, cell, missing)?);
            }
            entries.push(entry.to_string());
        }

        let values = Array2::from_shape_vec((entries.len(), columns.len()), data)?;
        let table = Self::new(columns, entries, values)?;
        event!(
            Level::DEBUG,
            "Parsed measurement table with {} entries and {} columns",
            table.len(),
            table.columns().len()
        );
        Ok(table)
    }

    /// Sample names.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Row labels, in table order.
    pub fn entries(&self) -> &[String] {
        &self.index.entries
    }

    /// Measurements, one row per entry.
    pub fn values(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up the row of an entry.
    pub fn row(&self, entry: &str) -> Option<ArrayView1<'_, f64>> {
        self.index
            .position(entry)
            .map(|position| self.values.row(position))
    }

    /// Copy the rows of those `entries` that are present in the table.
    ///
    /// Absent entries are skipped and each row is copied at most once, in order of first
    /// appearance. Returns `None` if none of them are present.
    pub fn select<'a, I>(&self, entries: I) -> Option<Array2<f64>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut seen = HashSet::new();
        let positions: Vec<usize> = entries
            .into_iter()
            .filter_map(|entry| self.index.position(entry))
            .filter(|position| seen.insert(*position))
            .collect();
        if positions.is_empty() {
            None
        } else {
            Some(self.values.select(Axis(0), &positions))
        }
    }
}

/// Parse a single cell into a measurement, NaN if it is missing.
fn parse_cell(
    entry: &str,
    column: &str,
    cell: &str,
    missing: Option<&Missing>,
) -> Result<f64, FuncTreeError> {
    if MISSING_TOKENS.contains(&cell) {
        return Ok(f64::NAN);
    }
    let value: f64 = cell.parse().map_err(|_| FuncTreeError::InvalidValue {
        entry: entry.to_string(),
        column: column.to_string(),
        value: cell.to_string(),
    })?;
    match missing {
        Some(missing) if missing.is_missing(&value) => Ok(f64::NAN),
        _ => Ok(value),
    }
}

/// Aggregated values of hierarchy nodes for one method
///
/// Contains no missing cells.
#[derive(Clone, Debug, PartialEq)]
pub struct ResultTable {
    columns: Vec<String>,
    index: EntryIndex,
    values: Array2<f64>,
}

impl ResultTable {
    /// Build a ResultTable from rows which may contain missing (NaN) cells.
    ///
    /// Rows without any defined value are dropped, then remaining missing cells are set to
    /// `0.0`. Entries must be unique and match the rows one to one.
    pub(crate) fn from_sparse_rows(
        columns: Vec<String>,
        entries: Vec<String>,
        rows: ArrayView2<f64>,
    ) -> Self {
        debug_assert_eq!(entries.len(), rows.nrows());
        let keep: Vec<usize> = rows
            .outer_iter()
            .enumerate()
            .filter(|(_, row)| row.iter().any(|value| !value.is_nan()))
            .map(|(position, _)| position)
            .collect();
        let mut values = rows.select(Axis(0), &keep);
        values.mapv_inplace(|value| if value.is_nan() { 0.0 } else { value });

        let mut index = EntryIndex::default();
        for &position in &keep {
            let inserted = index.push(&entries[position]);
            debug_assert!(inserted, "duplicate entry {}", entries[position]);
        }
        ResultTable {
            columns,
            index,
            values,
        }
    }

    /// Sample names, as in the measurement table.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Node entries, in traversal order.
    pub fn entries(&self) -> &[String] {
        &self.index.entries
    }

    /// Aggregated values, one row per entry.
    pub fn values(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, entry: &str) -> bool {
        self.index.position(entry).is_some()
    }

    /// Look up the row of an entry.
    pub fn row(&self, entry: &str) -> Option<ArrayView1<'_, f64>> {
        self.index
            .position(entry)
            .map(|position| self.values.row(position))
    }

    /// Iterate over `(entry, row)` pairs in table order.
    pub fn rows(&self) -> impl Iterator<Item = (&str, ArrayView1<'_, f64>)> {
        self.index
            .entries
            .iter()
            .map(String::as_str)
            .zip(self.values.outer_iter())
    }
}
