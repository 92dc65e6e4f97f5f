//! Command-line and environment configuration for the `parquetize` binary.
//!
//! Every flag can also be set through an environment variable, which is how a scheduler
//! usually passes settings to a batch container. The two locations are always
//! positional.

use crate::job::JobConfig;
use crate::io::parquet::ParquetCompression;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Convert one CSV or JSON object to Parquet and upload the result.
#[derive(Debug, Clone, Parser)]
#[command(name = "parquetize", version, about)]
pub struct Cli {
    /// Source object, e.g. s3://in-bucket/path/data.csv
    pub source: String,

    /// Destination object, e.g. s3://out-bucket/path/data.parquet
    pub destination: String,

    /// Root directory for per-run scratch directories [default: system temp dir]
    #[arg(long, env = "PARQUETIZE_SCRATCH_DIR")]
    pub scratch_dir: Option<PathBuf>,

    /// Parquet compression codec
    #[arg(long, env = "PARQUETIZE_COMPRESSION", value_enum, default_value_t)]
    pub compression: ParquetCompression,

    /// Delete scratch files even when the job fails
    #[arg(long, env = "PARQUETIZE_CLEANUP_ON_FAILURE")]
    pub cleanup_on_failure: bool,

    /// Custom S3-compatible endpoint
    #[arg(long, env = "AWS_ENDPOINT_URL")]
    pub endpoint: Option<String>,

    /// S3 region
    #[arg(long, env = "AWS_REGION")]
    pub region: Option<String>,

    /// Log output format
    #[arg(long, env = "PARQUETIZE_LOG_FORMAT", value_enum, default_value_t)]
    pub log_format: LogFormat,
}

impl Cli {
    /// Job settings derived from the parsed flags.
    #[must_use]
    pub fn job_config(&self) -> JobConfig {
        let defaults = JobConfig::default();
        JobConfig {
            scratch_root: self
                .scratch_dir
                .clone()
                .unwrap_or(defaults.scratch_root),
            compression: self.compression,
            cleanup_on_failure: self.cleanup_on_failure,
        }
    }

    /// S3 connection settings derived from the parsed flags.
    #[cfg(feature = "s3")]
    #[must_use]
    pub fn s3_settings(&self) -> crate::io::cloud::S3Settings {
        crate::io::cloud::S3Settings {
            region: self.region.clone(),
            endpoint: self.endpoint.clone(),
        }
    }
}
