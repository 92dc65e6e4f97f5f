//! Parquet output and read-back.
//!
//! This module provides:
//! - [`write_parquet_frame`] to serialize a [`TabularFrame`] as a single Arrow
//!   `RecordBatch` through `parquet::arrow::ArrowWriter`
//! - [`read_parquet_frame`] to load a file written here back into a frame
//! - [`read_parquet_vec`] to read rows into a Serde type via `serde_arrow`
//! - [`parquet_summary`] to inspect footer metadata without reading data pages
//!
//! Column types map one to one: `Int64`, `Float64`, `Boolean` and `Utf8`, all nullable.
//! Row-group sizing is the `parquet` crate default; the codec is configurable and
//! defaults to Snappy.

use crate::frame::{Column, ColumnData, ColumnType, TabularFrame};
use anyhow::{Context, Result, bail};
use arrow::array::{ArrayRef, AsArray, BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Float64Type, Int64Type, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::arrow_writer::ArrowWriter;
use parquet::basic::{Compression, GzipLevel, ZstdLevel};
use parquet::file::properties::WriterProperties;
use parquet::file::reader::{FileReader, SerializedFileReader};
use serde::de::DeserializeOwned;
use serde_arrow::from_record_batch;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

/// Compression codec for written Parquet files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ParquetCompression {
    #[default]
    Snappy,
    Zstd,
    Gzip,
    Uncompressed,
}

impl From<ParquetCompression> for Compression {
    fn from(c: ParquetCompression) -> Self {
        match c {
            ParquetCompression::Snappy => Self::SNAPPY,
            ParquetCompression::Zstd => Self::ZSTD(ZstdLevel::default()),
            ParquetCompression::Gzip => Self::GZIP(GzipLevel::default()),
            ParquetCompression::Uncompressed => Self::UNCOMPRESSED,
        }
    }
}

/// Write a [`TabularFrame`] to a Parquet file, truncating any existing file.
///
/// # Returns
/// Number of rows written.
///
/// # Errors
/// Returns an error if the frame has no columns, or if file creation or writing fails.
pub fn write_parquet_frame(
    path: impl AsRef<Path>,
    frame: &TabularFrame,
    compression: ParquetCompression,
) -> Result<usize> {
    let path = path.as_ref();
    if frame.num_columns() == 0 {
        bail!("cannot write {}: frame has no columns", path.display());
    }

    let batch = frame_to_record_batch(frame).context("convert frame to RecordBatch")?;

    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let props = WriterProperties::builder()
        .set_compression(compression.into())
        .build();
    let mut writer =
        ArrowWriter::try_new(file, batch.schema(), Some(props)).context("create ArrowWriter")?;
    writer.write(&batch).context("write batch to parquet")?;
    writer.close().context("close ArrowWriter")?;

    Ok(frame.num_rows())
}

/// Convert a frame into one Arrow `RecordBatch`.
///
/// # Errors
/// Returns an error if Arrow rejects the batch (which the frame invariants rule out).
pub fn frame_to_record_batch(frame: &TabularFrame) -> Result<RecordBatch> {
    let mut fields = Vec::with_capacity(frame.num_columns());
    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(frame.num_columns());
    for col in frame.columns() {
        let (data_type, array): (DataType, ArrayRef) = match &col.data {
            ColumnData::Int64(v) => (DataType::Int64, Arc::new(v.iter().collect::<Int64Array>())),
            ColumnData::Float64(v) => (
                DataType::Float64,
                Arc::new(v.iter().collect::<Float64Array>()),
            ),
            ColumnData::Boolean(v) => (
                DataType::Boolean,
                Arc::new(v.iter().collect::<BooleanArray>()),
            ),
            ColumnData::Utf8(v) => (
                DataType::Utf8,
                Arc::new(v.iter().map(Option::as_deref).collect::<StringArray>()),
            ),
        };
        fields.push(Field::new(&col.name, data_type, true));
        arrays.push(array);
    }
    let schema = Arc::new(Schema::new(fields));
    Ok(RecordBatch::try_new(schema, arrays)?)
}

/// Read a Parquet file back into a [`TabularFrame`].
///
/// Only the four frame column types are supported.
///
/// # Errors
/// Returns an error if the file cannot be opened or read, or a column has an Arrow type
/// with no frame counterpart.
pub fn read_parquet_frame(path: impl AsRef<Path>) -> Result<TabularFrame> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("open ParquetRecordBatchReader")?;

    let schema = Arc::clone(builder.schema());
    let mut columns = schema
        .fields()
        .iter()
        .map(|field| {
            let column_type = match field.data_type() {
                DataType::Int64 => ColumnType::Int64,
                DataType::Float64 => ColumnType::Float64,
                DataType::Boolean => ColumnType::Boolean,
                DataType::Utf8 => ColumnType::Utf8,
                other => bail!("column {:?} has unsupported type {other}", field.name()),
            };
            Ok(Column::new(field.name().clone(), ColumnData::empty(column_type)))
        })
        .collect::<Result<Vec<_>>>()?;

    let reader = builder.build().context("build ParquetRecordBatchReader")?;
    for batch in reader {
        let batch = batch.context("read next batch")?;
        for (col, array) in columns.iter_mut().zip(batch.columns()) {
            match &mut col.data {
                ColumnData::Int64(v) => v.extend(array.as_primitive::<Int64Type>().iter()),
                ColumnData::Float64(v) => v.extend(array.as_primitive::<Float64Type>().iter()),
                ColumnData::Boolean(v) => v.extend(array.as_boolean().iter()),
                ColumnData::Utf8(v) => {
                    v.extend(array.as_string::<i32>().iter().map(|s| s.map(str::to_string)));
                }
            }
        }
    }
    TabularFrame::new(columns)
}

/// Read a Parquet file into a typed `Vec<T>`.
///
/// Each Arrow batch is converted with `serde_arrow::from_record_batch`, so column names
/// must match `T`'s field names.
///
/// # Errors
/// Returns an error if the file cannot be opened, the reader cannot be built,
/// batch iteration fails, or conversion to `T` fails.
pub fn read_parquet_vec<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<Vec<T>> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;

    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("open ParquetRecordBatchReader")?;
    let mut reader = builder
        .with_batch_size(64 * 1024)
        .build()
        .context("build ParquetRecordBatchReader")?;

    let mut out: Vec<T> = Vec::new();
    while let Some(batch) = reader.next().transpose().context("read next batch")? {
        let mut rows: Vec<T> =
            from_record_batch(&batch).context("deserialize RecordBatch rows to T")?;
        out.append(&mut rows);
    }
    Ok(out)
}

/// Footer-level facts about a Parquet file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParquetSummary {
    pub num_rows: u64,
    pub num_row_groups: usize,
    pub column_names: Vec<String>,
    /// Codec of the first column chunk, if the file has any row group.
    pub compression: Option<Compression>,
}

/// Inspect Parquet metadata without decoding any data pages.
///
/// # Errors
/// Returns an error if the file cannot be opened or metadata cannot be read.
pub fn parquet_summary(path: impl AsRef<Path>) -> Result<ParquetSummary> {
    let path = path.as_ref();
    let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let reader = SerializedFileReader::new(f).context("open SerializedFileReader")?;
    let meta = reader.metadata();

    let num_row_groups = meta.num_row_groups();
    let num_rows = meta.file_metadata().num_rows().cast_unsigned();
    let column_names = meta
        .file_metadata()
        .schema_descr()
        .columns()
        .iter()
        .map(|c| c.name().to_string())
        .collect();
    let compression = (num_row_groups > 0 && meta.row_group(0).num_columns() > 0)
        .then(|| meta.row_group(0).column(0).compression());

    Ok(ParquetSummary {
        num_rows,
        num_row_groups,
        column_names,
        compression,
    })
}
