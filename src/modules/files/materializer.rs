//! Converges a single regular file to a [`FileSpec`]

use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::modules::error::FileError;
use crate::types::{FileMode, FileSpec};

use super::utils::{
    atomic::AtomicWriter,
    checksum::{checksum_bytes, checksum_file},
    ownership::{ownership_of, resolve_ownership, set_ownership, Ownership},
    permissions::{mode_of, set_permissions},
};

/// One attribute that differs between the file on disk and its spec
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "attribute", rename_all = "snake_case")]
pub enum FileChange {
    Created,
    Content { before: String, after: String },
    Mode { before: FileMode, after: FileMode },
    Owner { before: u32, after: u32 },
    Group { before: u32, after: u32 },
}

/// Outcome of converging (or checking) one file
#[derive(Debug, Clone, Serialize)]
pub struct MaterializeReport {
    pub path: PathBuf,
    pub changed: bool,
    pub check_mode: bool,
    pub changes: Vec<FileChange>,
    pub checksum: String,
    pub mode: FileMode,
    pub owner: String,
    pub group: String,
}

/// What is currently on disk at the target path
#[derive(Debug, Clone)]
struct CurrentState {
    checksum: String,
    mode: FileMode,
    ownership: Ownership,
}

/// Ensures a regular file exists with exact content, mode and ownership
#[derive(Debug, Clone, Copy, Default)]
pub struct FileMaterializer;

impl FileMaterializer {
    pub fn new() -> Self {
        Self
    }

    /// Create or overwrite the file so it matches `spec` exactly.
    ///
    /// Content is replaced atomically; a failed write never leaves a
    /// partial target or a stray temporary file behind.
    pub async fn converge(&self, spec: &FileSpec) -> Result<MaterializeReport, FileError> {
        let path = spec.path();
        validate_target(path).await?;
        let desired = resolve_ownership(&spec.owner, &spec.group)?;
        let checksum = checksum_bytes(&spec.content);

        info!("Creating file {}", path.display());

        let current = inspect(path).await?;
        let changes = plan_changes(current.as_ref(), spec, &checksum, desired);

        if changes.is_empty() {
            debug!("{} is already up to date", path.display());
        } else if needs_content_write(&changes) {
            write_content(spec, desired).await?;
        } else {
            apply_attributes(path, &changes, spec.mode, desired).await?;
        }

        Ok(build_report(spec, checksum, changes, false))
    }

    /// Report what [`converge`](Self::converge) would change without
    /// touching the filesystem.
    pub async fn check(&self, spec: &FileSpec) -> Result<MaterializeReport, FileError> {
        let path = spec.path();
        validate_target(path).await?;
        let desired = resolve_ownership(&spec.owner, &spec.group)?;
        let checksum = checksum_bytes(&spec.content);

        let current = inspect(path).await?;
        let changes = plan_changes(current.as_ref(), spec, &checksum, desired);
        info!(
            "Would update {} ({} change(s))",
            path.display(),
            changes.len()
        );

        Ok(build_report(spec, checksum, changes, true))
    }
}

/// Reject paths that can never hold the target file
async fn validate_target(path: &Path) -> Result<(), FileError> {
    if path.as_os_str().is_empty() {
        return Err(FileError::invalid_path(path, "path is empty"));
    }
    let raw = path.as_os_str().as_encoded_bytes();
    if raw.contains(&0) {
        return Err(FileError::invalid_path(path, "path contains a NUL byte"));
    }
    if raw.ends_with(b"/") {
        return Err(FileError::invalid_path(path, "path ends with a separator"));
    }
    if !path.is_absolute() {
        return Err(FileError::invalid_path(path, "path must be absolute"));
    }
    if path.file_name().is_none() {
        return Err(FileError::invalid_path(path, "path has no file name"));
    }

    let parent = path
        .parent()
        .ok_or_else(|| FileError::invalid_path(path, "path has no parent directory"))?;
    match tokio::fs::metadata(parent).await {
        Ok(metadata) if metadata.is_dir() => Ok(()),
        Ok(_) => Err(FileError::invalid_path(
            path,
            format!("parent {} is not a directory", parent.display()),
        )),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(FileError::invalid_path(
            path,
            format!("parent directory {} does not exist", parent.display()),
        )),
        Err(e) => Err(FileError::from_io(parent, "stat", e)),
    }
}

async fn inspect(path: &Path) -> Result<Option<CurrentState>, FileError> {
    let metadata = match tokio::fs::symlink_metadata(path).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(FileError::from_io(path, "stat", e)),
    };

    if !metadata.file_type().is_file() {
        return Err(FileError::invalid_path(
            path,
            "path exists and is not a regular file",
        ));
    }

    let state = CurrentState {
        checksum: checksum_file(path).await?,
        mode: mode_of(&metadata),
        ownership: ownership_of(&metadata),
    };
    debug!(
        "Current state of {}: mode {} uid {} gid {} sha256 {}",
        path.display(),
        state.mode,
        state.ownership.uid,
        state.ownership.gid,
        state.checksum
    );
    Ok(Some(state))
}

fn plan_changes(
    current: Option<&CurrentState>,
    spec: &FileSpec,
    checksum: &str,
    desired: Ownership,
) -> Vec<FileChange> {
    let Some(current) = current else {
        return vec![FileChange::Created];
    };

    let mut changes = Vec::new();
    if current.checksum != checksum {
        changes.push(FileChange::Content {
            before: current.checksum.clone(),
            after: checksum.to_string(),
        });
    }
    if current.mode != spec.mode {
        changes.push(FileChange::Mode {
            before: current.mode,
            after: spec.mode,
        });
    }
    if current.ownership.uid != desired.uid {
        changes.push(FileChange::Owner {
            before: current.ownership.uid,
            after: desired.uid,
        });
    }
    if current.ownership.gid != desired.gid {
        changes.push(FileChange::Group {
            before: current.ownership.gid,
            after: desired.gid,
        });
    }
    changes
}

fn needs_content_write(changes: &[FileChange]) -> bool {
    changes
        .iter()
        .any(|change| matches!(change, FileChange::Created | FileChange::Content { .. }))
}

/// Write content into a temporary sibling, apply ownership then mode, and
/// rename it over the target.
async fn write_content(spec: &FileSpec, desired: Ownership) -> Result<(), FileError> {
    let mut writer = AtomicWriter::new(spec.path()).await?;
    writer.write_all(&spec.content).await?;

    let temp_metadata = tokio::fs::metadata(writer.temp_path())
        .await
        .map_err(|e| FileError::from_io(writer.temp_path(), "stat", e))?;
    if ownership_of(&temp_metadata) != desired {
        set_ownership(writer.temp_path(), desired).await?;
    }
    // chown may clear setuid/setgid, so the mode goes last
    set_permissions(writer.temp_path(), spec.mode).await?;

    writer.commit().await
}

async fn apply_attributes(
    path: &Path,
    changes: &[FileChange],
    mode: FileMode,
    desired: Ownership,
) -> Result<(), FileError> {
    let ownership_changed = changes
        .iter()
        .any(|change| matches!(change, FileChange::Owner { .. } | FileChange::Group { .. }));
    let mode_changed = changes
        .iter()
        .any(|change| matches!(change, FileChange::Mode { .. }));

    if ownership_changed {
        info!("Changing ownership of {}", path.display());
        set_ownership(path, desired).await?;
    }
    if mode_changed || ownership_changed {
        info!("Setting mode of {} to {}", path.display(), mode);
        set_permissions(path, mode).await?;
    }
    Ok(())
}

fn build_report(
    spec: &FileSpec,
    checksum: String,
    changes: Vec<FileChange>,
    check_mode: bool,
) -> MaterializeReport {
    MaterializeReport {
        path: spec.path.clone(),
        changed: !check_mode && !changes.is_empty(),
        check_mode,
        changes,
        checksum,
        mode: spec.mode,
        owner: spec.owner.clone(),
        group: spec.group.clone(),
    }
}
