//! Atomic file replacement via a sibling temporary file and rename

use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::modules::error::FileError;

/// Writes into a hidden temporary file next to the target and renames it
/// into place on [`AtomicWriter::commit`]. Dropping an uncommitted writer
/// removes the temporary file.
pub struct AtomicWriter {
    temp_path: PathBuf,
    final_path: PathBuf,
    file: Option<File>,
    committed: bool,
}

impl AtomicWriter {
    /// Create a new atomic writer for the target path
    pub async fn new(target_path: impl AsRef<Path>) -> Result<Self, FileError> {
        let final_path = target_path.as_ref().to_path_buf();
        let temp_path = create_temp_file_path(&final_path)?;

        let mut options = OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        options.mode(0o600);

        let file = options
            .open(&temp_path)
            .await
            .map_err(|e| FileError::from_io(&temp_path, "create", e))?;

        Ok(AtomicWriter {
            temp_path,
            final_path,
            file: Some(file),
            committed: false,
        })
    }

    /// Path of the temporary file, for applying attributes before commit
    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    pub async fn write_all(&mut self, data: &[u8]) -> Result<(), FileError> {
        let file = self.file.as_mut().ok_or_else(|| {
            FileError::invalid_path(&self.temp_path, "temporary file already closed")
        })?;
        file.write_all(data)
            .await
            .map_err(|e| FileError::from_io(&self.temp_path, "write", e))
    }

    /// Flush, sync and rename the temporary file over the target
    pub async fn commit(mut self) -> Result<(), FileError> {
        if let Some(mut file) = self.file.take() {
            file.flush()
                .await
                .map_err(|e| FileError::from_io(&self.temp_path, "flush", e))?;
            file.sync_all()
                .await
                .map_err(|e| FileError::from_io(&self.temp_path, "sync", e))?;
        }

        tokio::fs::rename(&self.temp_path, &self.final_path)
            .await
            .map_err(|e| FileError::from_io(&self.final_path, "rename", e))?;
        self.committed = true;
        Ok(())
    }
}

impl Drop for AtomicWriter {
    fn drop(&mut self) {
        if !self.committed {
            self.file.take();
            let _ = std::fs::remove_file(&self.temp_path);
        }
    }
}

/// Generate a unique temporary file path in the same directory as the target
fn create_temp_file_path(target_path: &Path) -> Result<PathBuf, FileError> {
    let parent = target_path.parent().unwrap_or_else(|| Path::new("."));
    let file_name = target_path
        .file_name()
        .ok_or_else(|| FileError::invalid_path(target_path, "path has no file name"))?
        .to_string_lossy();

    let temp_name = format!(".{}.tmp.{}", file_name, Uuid::new_v4().simple());
    Ok(parent.join(temp_name))
}
