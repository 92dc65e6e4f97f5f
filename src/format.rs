//! Input format detection from the file name.

use crate::error::JobError;
use std::fmt;
use std::path::Path;

/// Formats the job knows how to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputFormat {
    Csv,
    Json,
}

impl InputFormat {
    /// Pick a format from the suffix of `path`'s file name.
    ///
    /// Matching is exact and case-sensitive: `.csv` and `.json` only. Content is never
    /// inspected.
    ///
    /// # Errors
    /// Returns [`JobError::UnsupportedFormat`] for any other suffix, no suffix, or a
    /// file name that is not valid UTF-8.
    pub fn detect(path: &Path) -> Result<Self, JobError> {
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
        if name.ends_with(".csv") {
            Ok(Self::Csv)
        } else if name.ends_with(".json") {
            Ok(Self::Json)
        } else {
            Err(JobError::UnsupportedFormat {
                path: path.to_path_buf(),
            })
        }
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Csv => "csv",
            Self::Json => "json",
        })
    }
}
