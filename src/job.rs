//! The conversion job: download, detect, convert, publish, clean up.
//!
//! Stages run strictly in that order and the first error stops the run. The object
//! store is whatever [`ObjectIO`] handle the caller passes in.

use crate::error::JobError;
use crate::format::InputFormat;
use crate::frame::TabularFrame;
use crate::io::cloud::ObjectIO;
use crate::io::csv::read_csv_frame;
use crate::io::json::read_json_frame;
use crate::io::parquet::{ParquetCompression, write_parquet_frame};
use crate::location::ObjectLocation;
use crate::scratch::{ScratchFile, ScratchSpace};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, info_span, warn};
use uuid::Uuid;

/// Knobs for a run that are not part of the job's two locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobConfig {
    /// Directory under which the per-run scratch directory is created.
    pub scratch_root: PathBuf,
    pub compression: ParquetCompression,
    /// Also delete scratch files when the run fails. Off by default, so a failed run
    /// leaves its input and any partial output behind for inspection.
    pub cleanup_on_failure: bool,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            scratch_root: std::env::temp_dir(),
            compression: ParquetCompression::default(),
            cleanup_on_failure: false,
        }
    }
}

/// What a successful run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobReport {
    pub job_id: Uuid,
    pub source: ObjectLocation,
    pub destination: ObjectLocation,
    pub format: InputFormat,
    pub rows: usize,
    pub columns: usize,
    pub bytes_downloaded: u64,
    pub bytes_uploaded: u64,
}

/// Download `source` into the scratch directory.
///
/// The local file is named after the last segment of the key.
///
/// # Errors
/// [`JobError::Transfer`] if the object cannot be read, [`JobError::Scratch`] if it
/// cannot be written locally.
pub fn resolve_input(
    store: &dyn ObjectIO,
    source: &ObjectLocation,
    scratch: &ScratchSpace,
) -> Result<ScratchFile, JobError> {
    let bytes = store.get_object(source.bucket(), source.key())?;
    let file = scratch.materialize(scratch.input_path(source.file_name()), &bytes)?;
    info!(
        %source,
        bytes = bytes.len(),
        path = %file.path().display(),
        "downloaded input"
    );
    Ok(file)
}

/// Parse a local file with the given format.
///
/// # Errors
/// [`JobError::Parse`] wrapping the parser's error chain.
pub fn parse_input(path: &Path, format: InputFormat) -> Result<TabularFrame, JobError> {
    let parsed = match format {
        InputFormat::Csv => read_csv_frame(path),
        InputFormat::Json => read_json_frame(path),
    };
    parsed.map_err(|source| JobError::Parse {
        path: path.to_path_buf(),
        format,
        source,
    })
}

/// Parse `input` and write it to `output` as Parquet.
///
/// # Errors
/// [`JobError::Parse`] if the input does not parse, [`JobError::Serialization`] if the
/// Parquet file cannot be written.
pub fn convert(
    input: &Path,
    format: InputFormat,
    output: PathBuf,
    compression: ParquetCompression,
) -> Result<(ScratchFile, TabularFrame), JobError> {
    let frame = parse_input(input, format)?;
    info!(
        rows = frame.num_rows(),
        columns = frame.num_columns(),
        "parsed input"
    );

    write_parquet_frame(&output, &frame, compression).map_err(|source| {
        JobError::Serialization {
            path: output.clone(),
            source,
        }
    })?;
    Ok((ScratchFile::adopt(output), frame))
}

/// Upload a local file verbatim to `destination`.
///
/// # Returns
/// Number of bytes uploaded.
///
/// # Errors
/// [`JobError::Scratch`] if the file cannot be read, [`JobError::Transfer`] if the
/// upload fails.
pub fn publish(
    store: &dyn ObjectIO,
    file: &ScratchFile,
    destination: &ObjectLocation,
) -> Result<u64, JobError> {
    let bytes = fs::read(file.path()).map_err(|source| JobError::Scratch {
        path: file.path().to_path_buf(),
        source,
    })?;
    store.put_object(destination.bucket(), destination.key(), &bytes)?;
    info!(%destination, bytes = bytes.len(), "uploaded output");
    Ok(bytes.len() as u64)
}

/// Scratch files and counters of a run that reached the end of publishing.
struct Completed {
    input: ScratchFile,
    output: ScratchFile,
    report: JobReport,
}

/// Run one job from `source` to `destination`.
///
/// On success both scratch files and the run's scratch directory are deleted. On
/// failure they are left in place unless [`JobConfig::cleanup_on_failure`] is set.
///
/// # Errors
/// Returns the first [`JobError`] hit by any stage. Invalid locations are reported as
/// [`JobError::Transfer`] before anything is downloaded.
pub fn run_job(
    store: &dyn ObjectIO,
    source: &str,
    destination: &str,
    config: &JobConfig,
) -> Result<JobReport, JobError> {
    let job_id = Uuid::new_v4();
    let span = info_span!("job", id = %job_id);
    let _enter = span.enter();

    let source = ObjectLocation::parse(source)?;
    let destination = ObjectLocation::parse(destination)?;
    info!(%source, %destination, "starting job");

    let scratch = ScratchSpace::create(&config.scratch_root, job_id)?;
    match execute(store, job_id, source, destination, &scratch, config) {
        Ok(done) => {
            done.input.remove()?;
            done.output.remove()?;
            scratch.close()?;
            info!(
                rows = done.report.rows,
                bytes_uploaded = done.report.bytes_uploaded,
                "job finished"
            );
            Ok(done.report)
        }
        Err(err) => {
            if config.cleanup_on_failure {
                scratch.discard();
            } else {
                warn!(dir = %scratch.dir().display(), "leaving scratch files after failure");
            }
            Err(err)
        }
    }
}

fn execute(
    store: &dyn ObjectIO,
    job_id: Uuid,
    source: ObjectLocation,
    destination: ObjectLocation,
    scratch: &ScratchSpace,
    config: &JobConfig,
) -> Result<Completed, JobError> {
    let input = resolve_input(store, &source, scratch)?;
    let bytes_downloaded = input.size()?;

    let format = InputFormat::detect(input.path())?;
    info!(%format, "detected input format");

    let (output, frame) = convert(
        input.path(),
        format,
        scratch.output_path(),
        config.compression,
    )?;
    let bytes_uploaded = publish(store, &output, &destination)?;

    Ok(Completed {
        input,
        output,
        report: JobReport {
            job_id,
            source,
            destination,
            format,
            rows: frame.num_rows(),
            columns: frame.num_columns(),
            bytes_downloaded,
            bytes_uploaded,
        },
    })
}
