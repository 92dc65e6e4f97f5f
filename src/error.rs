//! Errors surfaced by a job run.
//!
//! Every variant is fatal: the job stops at the first error and reports it.

use crate::format::InputFormat;
use crate::io::cloud::CloudIOError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JobError {
    /// Reading from or writing to the object store failed, or a location was invalid.
    #[error("transfer failed: {0}")]
    Transfer(#[from] CloudIOError),

    #[error(
        "unsupported file format for {}: only CSV (.csv) or JSON (.json) files are allowed",
        path.display()
    )]
    UnsupportedFormat { path: PathBuf },

    #[error("failed to parse {format} input {}", path.display())]
    Parse {
        path: PathBuf,
        format: InputFormat,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to write parquet output {}", path.display())]
    Serialization {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    /// Local scratch disk failure while materializing, reading or deleting a file.
    #[error("scratch file error at {}", path.display())]
    Scratch {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
