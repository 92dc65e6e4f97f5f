//! In-memory tabular data with explicitly typed columns.
//!
//! A [`TabularFrame`] is what sits between parsing and Parquet serialization. Every
//! column carries one [`ColumnData`] variant, decided once when the column is built,
//! so the writer never has to guess a type from individual values.
//!
//! # Text inference
//!
//! Parsers that only see strings (CSV) build columns with [`ColumnData::infer_from_text`].
//! For each column, over all its cells:
//!
//! 1. An empty cell or a pandas default NA token (see [`is_na_token`]) is null and does
//!    not vote.
//! 2. If every remaining cell parses as `i64` the column is [`ColumnType::Int64`].
//! 3. Otherwise, if every remaining cell parses as `f64` it is [`ColumnType::Float64`].
//! 4. Otherwise, if every remaining cell is `true`/`True`/`TRUE`/`false`/`False`/`FALSE`
//!    it is [`ColumnType::Boolean`].
//! 5. Otherwise it is [`ColumnType::Utf8`] and cells are kept verbatim.
//!
//! Numeric checks ignore surrounding ASCII whitespace. A column with at least one row
//! and no non-null cell is a null `Float64` column; a column with zero rows is `Utf8`.

use anyhow::{Result, bail};
use std::collections::HashSet;
use std::fmt;

/// Tokens read as null, matching pandas' default `na_values`.
const NA_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

const TRUE_TOKENS: &[&str] = &["true", "True", "TRUE"];
const FALSE_TOKENS: &[&str] = &["false", "False", "FALSE"];

/// Whether a raw text cell is treated as a missing value.
#[must_use]
pub fn is_na_token(cell: &str) -> bool {
    NA_TOKENS.contains(&cell)
}

/// The physical type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Int64,
    Float64,
    Boolean,
    Utf8,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Int64 => "int64",
            Self::Float64 => "float64",
            Self::Boolean => "bool",
            Self::Utf8 => "utf8",
        };
        f.write_str(name)
    }
}

/// Values of one column. `None` is a null.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Int64(Vec<Option<i64>>),
    Float64(Vec<Option<f64>>),
    Boolean(Vec<Option<bool>>),
    Utf8(Vec<Option<String>>),
}

impl ColumnData {
    /// Number of rows in the column.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Int64(v) => v.len(),
            Self::Float64(v) => v.len(),
            Self::Boolean(v) => v.len(),
            Self::Utf8(v) => v.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub const fn column_type(&self) -> ColumnType {
        match self {
            Self::Int64(_) => ColumnType::Int64,
            Self::Float64(_) => ColumnType::Float64,
            Self::Boolean(_) => ColumnType::Boolean,
            Self::Utf8(_) => ColumnType::Utf8,
        }
    }

    /// An empty column of the given type.
    #[must_use]
    pub const fn empty(column_type: ColumnType) -> Self {
        match column_type {
            ColumnType::Int64 => Self::Int64(Vec::new()),
            ColumnType::Float64 => Self::Float64(Vec::new()),
            ColumnType::Boolean => Self::Boolean(Vec::new()),
            ColumnType::Utf8 => Self::Utf8(Vec::new()),
        }
    }

    /// Build a typed column from raw text cells using the text inference rule.
    #[must_use]
    pub fn infer_from_text(cells: Vec<String>) -> Self {
        let cells: Vec<Option<String>> = cells
            .into_iter()
            .map(|c| if is_na_token(&c) { None } else { Some(c) })
            .collect();

        if cells.is_empty() {
            return Self::Utf8(cells);
        }
        if cells.iter().all(Option::is_none) {
            return Self::Float64(vec![None; cells.len()]);
        }

        let present = || cells.iter().flatten();
        if present().all(|c| c.trim().parse::<i64>().is_ok()) {
            return Self::Int64(
                cells
                    .iter()
                    .map(|c| c.as_ref().and_then(|c| c.trim().parse().ok()))
                    .collect(),
            );
        }
        if present().all(|c| c.trim().parse::<f64>().is_ok()) {
            return Self::Float64(
                cells
                    .iter()
                    .map(|c| c.as_ref().and_then(|c| c.trim().parse().ok()))
                    .collect(),
            );
        }
        if present().all(|c| parse_bool(c).is_some()) {
            return Self::Boolean(
                cells
                    .iter()
                    .map(|c| c.as_deref().and_then(parse_bool))
                    .collect(),
            );
        }
        Self::Utf8(cells)
    }
}

fn parse_bool(cell: &str) -> Option<bool> {
    if TRUE_TOKENS.contains(&cell) {
        Some(true)
    } else if FALSE_TOKENS.contains(&cell) {
        Some(false)
    } else {
        None
    }
}

/// A named column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}

/// Rows x named, typed columns.
///
/// Invariants: all columns have the same length and column names are unique.
#[derive(Debug, Clone, PartialEq)]
pub struct TabularFrame {
    columns: Vec<Column>,
    num_rows: usize,
}

impl TabularFrame {
    /// Build a frame, checking the column invariants.
    ///
    /// # Errors
    /// Returns an error if two columns share a name or the columns differ in length.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(columns.len());
        for col in &columns {
            if !seen.insert(col.name.as_str()) {
                bail!("duplicate column name {:?}", col.name);
            }
        }
        let num_rows = columns.first().map_or(0, |c| c.data.len());
        if let Some(bad) = columns.iter().find(|c| c.data.len() != num_rows) {
            bail!(
                "column {:?} has {} rows, expected {}",
                bad.name,
                bad.data.len(),
                num_rows
            );
        }
        Ok(Self { columns, num_rows })
    }

    #[must_use]
    pub const fn num_rows(&self) -> usize {
        self.num_rows
    }

    #[must_use]
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    #[must_use]
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    #[must_use]
    pub fn into_columns(self) -> Vec<Column> {
        self.columns
    }
}
