//! Local scratch space for one job run.
//!
//! Each run gets its own directory, `<root>/parquetize-<job id>`, holding the downloaded
//! input (named after the remote key's last segment) and the Parquet output
//! ([`OUTPUT_FILE_NAME`]). Files are removed explicitly: a run that fails leaves them in
//! place unless the caller asks otherwise.

use crate::error::JobError;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

/// Fixed file name of the Parquet output inside a scratch directory.
pub const OUTPUT_FILE_NAME: &str = "output.parquet";

/// Prefix of every per-run scratch directory.
pub const DIR_PREFIX: &str = "parquetize-";

/// The scratch directory of a single run.
#[derive(Debug)]
pub struct ScratchSpace {
    dir: PathBuf,
}

impl ScratchSpace {
    /// Create `<root>/parquetize-<job_id>`, including any missing parents.
    ///
    /// # Errors
    /// Returns [`JobError::Scratch`] if the directory cannot be created.
    pub fn create(root: &Path, job_id: Uuid) -> Result<Self, JobError> {
        let dir = root.join(format!("{DIR_PREFIX}{job_id}"));
        fs::create_dir_all(&dir).map_err(|source| JobError::Scratch {
            path: dir.clone(),
            source,
        })?;
        debug!(dir = %dir.display(), "created scratch directory");
        Ok(Self { dir })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path the downloaded input is materialized at.
    #[must_use]
    pub fn input_path(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }

    /// Path the Parquet output is written to.
    #[must_use]
    pub fn output_path(&self) -> PathBuf {
        self.dir.join(OUTPUT_FILE_NAME)
    }

    /// Write `bytes` to a new scratch file, replacing any file already there.
    ///
    /// # Errors
    /// Returns [`JobError::Scratch`] if the file cannot be written.
    pub fn materialize(&self, path: PathBuf, bytes: &[u8]) -> Result<ScratchFile, JobError> {
        fs::write(&path, bytes).map_err(|source| JobError::Scratch {
            path: path.clone(),
            source,
        })?;
        Ok(ScratchFile { path })
    }

    /// Remove the scratch directory if it is empty.
    ///
    /// A directory that is already gone is not an error.
    ///
    /// # Errors
    /// Returns [`JobError::Scratch`] if the directory exists but cannot be removed,
    /// for example because it still holds files.
    pub fn close(self) -> Result<(), JobError> {
        match fs::remove_dir(&self.dir) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(JobError::Scratch {
                path: self.dir,
                source,
            }),
        }
    }

    /// Remove the directory and everything in it, logging instead of failing.
    ///
    /// Used on the failure path, where the original error is what gets reported.
    pub fn discard(self) {
        if let Err(e) = fs::remove_dir_all(&self.dir)
            && e.kind() != io::ErrorKind::NotFound
        {
            warn!(dir = %self.dir.display(), error = %e, "failed to discard scratch directory");
        }
    }
}

/// A file owned by the running job.
///
/// Nothing happens on drop; [`ScratchFile::remove`] releases the file, and the job only
/// calls it once the output has been published.
#[derive(Debug)]
#[must_use]
pub struct ScratchFile {
    path: PathBuf,
}

impl ScratchFile {
    /// Take ownership of a file some other writer produced at `path`.
    pub const fn adopt(path: PathBuf) -> Self {
        Self { path }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size of the file on disk.
    ///
    /// # Errors
    /// Returns [`JobError::Scratch`] if the file metadata cannot be read.
    pub fn size(&self) -> Result<u64, JobError> {
        fs::metadata(&self.path)
            .map(|m| m.len())
            .map_err(|source| JobError::Scratch {
                path: self.path.clone(),
                source,
            })
    }

    /// Delete the file. A file that is already gone is not an error.
    ///
    /// # Errors
    /// Returns [`JobError::Scratch`] for any other failure, such as missing permissions.
    pub fn remove(self) -> Result<(), JobError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "removed scratch file");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(JobError::Scratch {
                path: self.path,
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_namespaced_per_job() -> anyhow::Result<()> {
        let root = tempfile::tempdir()?;
        let id = Uuid::new_v4();
        let space = ScratchSpace::create(root.path(), id)?;
        assert_eq!(space.dir(), root.path().join(format!("parquetize-{id}")));
        assert_eq!(space.input_path("data.csv"), space.dir().join("data.csv"));
        assert_eq!(space.output_path(), space.dir().join("output.parquet"));
        Ok(())
    }

    #[test]
    fn two_jobs_do_not_share_a_directory() -> anyhow::Result<()> {
        let root = tempfile::tempdir()?;
        let a = ScratchSpace::create(root.path(), Uuid::new_v4())?;
        let b = ScratchSpace::create(root.path(), Uuid::new_v4())?;
        assert_ne!(a.input_path("data.csv"), b.input_path("data.csv"));
        Ok(())
    }

    #[test]
    fn remove_then_close_leaves_nothing() -> anyhow::Result<()> {
        let root = tempfile::tempdir()?;
        let space = ScratchSpace::create(root.path(), Uuid::new_v4())?;
        let dir = space.dir().to_path_buf();
        let file = space.materialize(space.input_path("data.csv"), b"a\n1\n")?;
        assert_eq!(file.size()?, 4);
        file.remove()?;
        space.close()?;
        assert!(!dir.exists());
        Ok(())
    }

    #[test]
    fn removing_a_missing_file_is_ok() -> anyhow::Result<()> {
        let root = tempfile::tempdir()?;
        let file = ScratchFile::adopt(root.path().join("gone.parquet"));
        file.remove()?;
        Ok(())
    }

    #[test]
    fn close_fails_while_files_remain() -> anyhow::Result<()> {
        let root = tempfile::tempdir()?;
        let space = ScratchSpace::create(root.path(), Uuid::new_v4())?;
        let _file = space.materialize(space.input_path("data.csv"), b"a\n")?;
        assert!(matches!(space.close(), Err(JobError::Scratch { .. })));
        Ok(())
    }

    #[test]
    fn discard_removes_everything() -> anyhow::Result<()> {
        let root = tempfile::tempdir()?;
        let space = ScratchSpace::create(root.path(), Uuid::new_v4())?;
        let dir = space.dir().to_path_buf();
        let _file = space.materialize(space.input_path("data.csv"), b"a\n")?;
        space.discard();
        assert!(!dir.exists());
        Ok(())
    }
}
