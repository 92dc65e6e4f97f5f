//! JSON input.
//!
//! Two document shapes are accepted:
//!
//! - **records**: `[{"a": 1, "b": "x"}, {"a": 2, "b": "y"}]`, one object per row;
//! - **columns**: `{"a": {"0": 1, "1": 2}, "b": {"0": "x", "1": "y"}}`, one object per
//!   column keyed by row label.
//!
//! Columns appear in the order their keys are first seen; rows of the columns shape
//! appear in the order their labels are first seen. A key missing from a row is null.
//!
//! # Value inference
//!
//! Per column, over the non-null values: all integers that fit `i64` give `Int64`, all
//! numbers give `Float64`, all booleans give `Boolean`, and anything else gives `Utf8`.
//! In a `Utf8` column strings are kept as-is and every other value (numbers, booleans,
//! nested arrays and objects) is stored as its compact JSON text. A column whose values
//! are all null is a null `Float64` column.

use crate::frame::{Column, ColumnData, TabularFrame};
use anyhow::{Context, Result, bail};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Read a JSON file into a [`TabularFrame`].
///
/// The whole document is parsed in memory.
///
/// # Errors
/// Returns an error if the file cannot be opened, is not valid JSON, or is not one of
/// the accepted shapes.
pub fn read_json_frame(path: impl AsRef<Path>) -> Result<TabularFrame> {
    let path = path.as_ref();
    let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    parse_json_frame(BufReader::new(f)).with_context(|| format!("parse JSON {}", path.display()))
}

/// Parse JSON from any reader. See [`read_json_frame`].
///
/// # Errors
/// See [`read_json_frame`].
pub fn parse_json_frame<R: Read>(reader: R) -> Result<TabularFrame> {
    let value: Value = serde_json::from_reader(reader).context("invalid JSON")?;
    frame_from_json(value)
}

/// Build a frame from an already parsed JSON document.
///
/// # Errors
/// Returns an error if the document is not an array of objects or an object of objects.
pub fn frame_from_json(value: Value) -> Result<TabularFrame> {
    let (names, values) = match value {
        Value::Array(items) => from_records(items)?,
        Value::Object(map) => from_columns(map)?,
        other => bail!(
            "expected an array of objects or an object of columns, found {}",
            kind_of(&other)
        ),
    };

    let columns = names
        .into_iter()
        .zip(values)
        .map(|(name, vals)| Column::new(name, infer_json_column(vals)))
        .collect();
    TabularFrame::new(columns)
}

type RawColumns = (Vec<String>, Vec<Vec<Value>>);

fn from_records(items: Vec<Value>) -> Result<RawColumns> {
    let mut names: Vec<String> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut columns: Vec<Vec<Value>> = Vec::new();

    for (row, item) in items.into_iter().enumerate() {
        let Value::Object(record) = item else {
            bail!(
                "record #{} is {}, expected an object",
                row + 1,
                kind_of(&item)
            );
        };
        for (key, val) in record {
            let idx = *index.entry(key.clone()).or_insert_with(|| {
                names.push(key);
                columns.push(vec![Value::Null; row]);
                columns.len() - 1
            });
            columns[idx].push(val);
        }
        for col in &mut columns {
            col.resize(row + 1, Value::Null);
        }
    }
    Ok((names, columns))
}

fn from_columns(map: Map<String, Value>) -> Result<RawColumns> {
    let mut labels: Vec<String> = Vec::new();
    let mut label_index: HashMap<String, usize> = HashMap::new();
    let mut parsed: Vec<(String, Map<String, Value>)> = Vec::with_capacity(map.len());

    for (name, col) in map {
        let Value::Object(cells) = col else {
            bail!(
                "column {name:?} is {}, expected an object of row labels",
                kind_of(&col)
            );
        };
        for label in cells.keys() {
            if !label_index.contains_key(label) {
                label_index.insert(label.clone(), labels.len());
                labels.push(label.clone());
            }
        }
        parsed.push((name, cells));
    }

    let mut names = Vec::with_capacity(parsed.len());
    let mut columns = Vec::with_capacity(parsed.len());
    for (name, mut cells) in parsed {
        let col: Vec<Value> = labels
            .iter()
            .map(|label| cells.remove(label).unwrap_or(Value::Null))
            .collect();
        names.push(name);
        columns.push(col);
    }
    Ok((names, columns))
}

fn infer_json_column(values: Vec<Value>) -> ColumnData {
    let len = values.len();
    let present = || values.iter().filter(|v| !v.is_null());

    if len > 0 && present().next().is_none() {
        return ColumnData::Float64(vec![None; len]);
    }
    if len > 0 && present().all(|v| v.as_i64().is_some()) {
        return ColumnData::Int64(values.iter().map(Value::as_i64).collect());
    }
    if len > 0 && present().all(Value::is_number) {
        return ColumnData::Float64(values.iter().map(Value::as_f64).collect());
    }
    if len > 0 && present().all(Value::is_boolean) {
        return ColumnData::Boolean(values.iter().map(Value::as_bool).collect());
    }
    ColumnData::Utf8(values.into_iter().map(json_text).collect())
}

fn json_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
