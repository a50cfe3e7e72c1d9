//! File permission utilities

use std::path::Path;

use crate::modules::error::FileError;
use crate::types::FileMode;

/// Set permission bits of `path` to exactly `mode`
pub async fn set_permissions(path: &Path, mode: FileMode) -> Result<(), FileError> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = std::fs::Permissions::from_mode(mode.bits());
        tokio::fs::set_permissions(path, permissions)
            .await
            .map_err(|e| FileError::from_io(path, "chmod", e))?;
    }

    #[cfg(not(unix))]
    {
        // only the read-only flag maps onto non-unix platforms
        let mut permissions = tokio::fs::metadata(path)
            .await
            .map_err(|e| FileError::from_io(path, "stat", e))?
            .permissions();
        permissions.set_readonly(mode.bits() & 0o200 == 0);
        tokio::fs::set_permissions(path, permissions)
            .await
            .map_err(|e| FileError::from_io(path, "chmod", e))?;
    }

    Ok(())
}

/// Permission bits recorded in `metadata`, without the file type bits
pub fn mode_of(metadata: &std::fs::Metadata) -> FileMode {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        FileMode::new(metadata.permissions().mode() & 0o7777).unwrap_or_default()
    }

    #[cfg(not(unix))]
    {
        let bits = if metadata.permissions().readonly() {
            0o444
        } else {
            0o644
        };
        FileMode::new(bits).unwrap_or_default()
    }
}
