//! CSV input.
//!
//! The first record is the header; every following record is one row. Fields are
//! comma-delimited with RFC 4180 quoting, blank lines are skipped, and every record
//! must have as many fields as the header. Column types come from
//! [`ColumnData::infer_from_text`].

use crate::frame::{Column, ColumnData, TabularFrame};
use anyhow::{Context, Result, bail};
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Read a CSV file into a [`TabularFrame`].
///
/// # Errors
/// Returns an error if the file cannot be opened, has no header, contains a malformed
/// record, or has a record whose field count differs from the header's. Errors are
/// annotated with the record number.
pub fn read_csv_frame(path: impl AsRef<Path>) -> Result<TabularFrame> {
    let path = path.as_ref();
    let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    parse_csv_frame(f).with_context(|| format!("parse CSV {}", path.display()))
}

/// Parse CSV from any reader. See [`read_csv_frame`].
///
/// # Errors
/// See [`read_csv_frame`].
pub fn parse_csv_frame<R: Read>(reader: R) -> Result<TabularFrame> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let headers = rdr.headers().context("read CSV header")?.clone();
    if headers.is_empty() {
        bail!("no columns to parse from file");
    }
    let names = unique_column_names(headers.iter());

    let mut cells: Vec<Vec<String>> = vec![Vec::new(); names.len()];
    for (i, rec) in rdr.records().enumerate() {
        let rec = rec.with_context(|| format!("parse CSV record #{}", i + 1))?;
        for (col, field) in cells.iter_mut().zip(rec.iter()) {
            col.push(field.to_string());
        }
    }

    let columns = names
        .into_iter()
        .zip(cells)
        .map(|(name, col)| Column::new(name, ColumnData::infer_from_text(col)))
        .collect();
    TabularFrame::new(columns)
}

/// Turn raw header cells into unique column names.
///
/// Empty names become `Unnamed: <index>`; repeats get `.1`, `.2`, ... suffixes, skipping
/// any suffix that is already taken.
fn unique_column_names<'a>(raw: impl Iterator<Item = &'a str>) -> Vec<String> {
    let raw: Vec<String> = raw
        .enumerate()
        .map(|(i, name)| {
            if name.is_empty() {
                format!("Unnamed: {i}")
            } else {
                name.to_string()
            }
        })
        .collect();

    let mut taken: HashSet<String> = HashSet::with_capacity(raw.len());
    let mut out = Vec::with_capacity(raw.len());
    for name in raw {
        if taken.insert(name.clone()) {
            out.push(name);
            continue;
        }
        let mut n = 1usize;
        let unique = loop {
            let candidate = format!("{name}.{n}");
            if !taken.contains(&candidate) {
                break candidate;
            }
            n += 1;
        };
        taken.insert(unique.clone());
        out.push(unique);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_headers_are_suffixed() {
        let names = unique_column_names(["a", "a", "b", "a"].into_iter());
        assert_eq!(names, vec!["a", "a.1", "b", "a.2"]);
    }

    #[test]
    fn suffix_skips_names_already_present() {
        let names = unique_column_names(["a", "a.1", "a"].into_iter());
        assert_eq!(names, vec!["a", "a.1", "a.2"]);
    }

    #[test]
    fn empty_header_is_unnamed() {
        let names = unique_column_names(["", "b"].into_iter());
        assert_eq!(names, vec!["Unnamed: 0", "b"]);
    }

    #[test]
    fn quoted_fields_keep_commas_and_quotes() {
        let data = "name,note\n\"Smith, J\",\"said \"\"hi\"\"\"\n";
        let frame = parse_csv_frame(data.as_bytes()).unwrap();
        assert_eq!(
            frame.column("name").unwrap().data,
            ColumnData::Utf8(vec![Some("Smith, J".to_string())])
        );
        assert_eq!(
            frame.column("note").unwrap().data,
            ColumnData::Utf8(vec![Some("said \"hi\"".to_string())])
        );
    }
}
