//! # Parquetize
//!
//! A **single-shot batch job** that takes one CSV or JSON object from an object store,
//! converts it to Parquet, and uploads the result to another location.
//!
//! ## Key Features
//!
//! - **Two input formats** - CSV with a header row, and JSON as an array of records or
//!   an object of columns, chosen by the exact file suffix (`.csv` / `.json`)
//! - **Explicit column typing** - every column is decided once as `int64`, `float64`,
//!   `bool` or `utf8` (see [`frame`])
//! - **Parquet output** - one Arrow batch written with `ArrowWriter`, Snappy by default
//! - **Injected object store** - the job takes any [`ObjectIO`]; tests use
//!   [`FakeObjectIO`], the binary uses `S3ObjectIO` (feature `s3`)
//! - **Per-run scratch space** - downloads and output live under their own directory
//!   and are deleted once the upload succeeds
//!
//! ## Quick Start
//!
//! ```
//! use parquetize::*;
//! use parquetize::io::cloud::{FakeObjectIO, ObjectIO};
//! # fn main() -> anyhow::Result<()> {
//! let scratch = tempfile::tempdir()?;
//! let store = FakeObjectIO::new();
//! store.put_object("in-bucket", "data.csv", b"a,b\n1,x\n2,y\n")?;
//!
//! let config = JobConfig {
//!     scratch_root: scratch.path().to_path_buf(),
//!     ..JobConfig::default()
//! };
//! let report = run_job(&store, "s3://in-bucket/data.csv", "s3://out-bucket/data.parquet", &config)?;
//! assert_eq!(report.rows, 2);
//! assert!(store.get_object("out-bucket", "data.parquet").is_ok());
//! # Ok(())
//! # }
//! ```
//!
//! ## Stages
//!
//! [`run_job`] runs these in order and stops at the first error:
//!
//! 1. [`resolve_input`] - download the source object into the run's scratch directory
//! 2. [`InputFormat::detect`] - pick the parser from the file suffix
//! 3. [`convert`] - parse into a [`TabularFrame`] and write Parquet
//! 4. [`publish`] - upload the Parquet file to the destination
//! 5. cleanup - delete both scratch files and the scratch directory
//!
//! Every failure is fatal and reported as a [`JobError`]. There are no retries; a failed
//! run is meant to be re-run whole by whatever scheduled it.
//!
//! ## Feature Flags
//!
//! - `s3` (default) - `S3ObjectIO` on top of `object_store`, and the `parquetize` binary
//!
//! ## Module Overview
//!
//! - [`job`] - the stages and [`run_job`]
//! - [`frame`] - typed in-memory table and the text inference rule
//! - [`io`] - CSV/JSON readers, Parquet writer/reader, object store clients
//! - [`location`] - `<scheme>://<bucket>/<key>` parsing
//! - [`format`] - suffix-based format detection
//! - [`scratch`] - per-run scratch files
//! - [`config`] - command-line configuration
//! - [`logging`] - tracing subscriber setup for the binary

pub mod config;
pub mod error;
pub mod format;
pub mod frame;
pub mod io;
pub mod job;
pub mod location;
pub mod logging;
pub mod scratch;

pub use error::JobError;
pub use format::InputFormat;
pub use frame::{Column, ColumnData, ColumnType, TabularFrame};
pub use io::cloud::{CloudIOError, ErrorKind, FakeObjectIO, ObjectIO};
pub use io::csv::read_csv_frame;
pub use io::json::read_json_frame;
pub use io::parquet::{
    ParquetCompression, parquet_summary, read_parquet_frame, read_parquet_vec,
    write_parquet_frame,
};
pub use job::{JobConfig, JobReport, convert, parse_input, publish, resolve_input, run_job};
pub use location::ObjectLocation;
