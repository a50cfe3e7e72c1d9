//! File ownership utilities

use std::path::Path;

use crate::modules::error::FileError;

/// Numeric owner and group of a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ownership {
    pub uid: u32,
    pub gid: u32,
}

/// Resolve a user name (or numeric UID) to a UID
pub fn resolve_user(user: &str) -> Result<u32, FileError> {
    if let Ok(uid) = user.parse::<u32>() {
        return Ok(uid);
    }

    get_uid_by_username(user).ok_or_else(|| FileError::UnknownUser {
        name: user.to_string(),
    })
}

/// Resolve a group name (or numeric GID) to a GID
pub fn resolve_group(group: &str) -> Result<u32, FileError> {
    if let Ok(gid) = group.parse::<u32>() {
        return Ok(gid);
    }

    get_gid_by_groupname(group).ok_or_else(|| FileError::UnknownGroup {
        name: group.to_string(),
    })
}

/// Resolve both names up front so a bad owner fails before anything is written
pub fn resolve_ownership(owner: &str, group: &str) -> Result<Ownership, FileError> {
    Ok(Ownership {
        uid: resolve_user(owner)?,
        gid: resolve_group(group)?,
    })
}

/// Change owner and group of `path`
pub async fn set_ownership(path: &Path, ownership: Ownership) -> Result<(), FileError> {
    #[cfg(unix)]
    {
        use nix::errno::Errno;
        use nix::unistd::{chown, Gid, Uid};

        chown(
            path,
            Some(Uid::from_raw(ownership.uid)),
            Some(Gid::from_raw(ownership.gid)),
        )
        .map_err(|errno| match errno {
            Errno::EPERM | Errno::EACCES => FileError::PermissionDenied {
                path: path.to_path_buf(),
                operation: "chown".to_string(),
            },
            other => FileError::from_io(path, "chown", std::io::Error::from(other)),
        })?;
    }

    #[cfg(not(unix))]
    {
        let _ = ownership;
        tracing::warn!(
            "File ownership changes are not supported on this platform: {}",
            path.display()
        );
    }

    Ok(())
}

/// Read current owner and group of `path`
pub fn ownership_of(metadata: &std::fs::Metadata) -> Ownership {
    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;
        Ownership {
            uid: metadata.uid(),
            gid: metadata.gid(),
        }
    }

    #[cfg(not(unix))]
    {
        let _ = metadata;
        Ownership { uid: 0, gid: 0 }
    }
}

/// Name of the user with `uid`, if it has a passwd entry
pub fn username_by_uid(uid: u32) -> Option<String> {
    #[cfg(unix)]
    {
        nix::unistd::User::from_uid(nix::unistd::Uid::from_raw(uid))
            .ok()
            .flatten()
            .map(|user| user.name)
    }

    #[cfg(not(unix))]
    {
        let _ = uid;
        None
    }
}

/// Name of the group with `gid`, if it has a group entry
pub fn groupname_by_gid(gid: u32) -> Option<String> {
    #[cfg(unix)]
    {
        nix::unistd::Group::from_gid(nix::unistd::Gid::from_raw(gid))
            .ok()
            .flatten()
            .map(|group| group.name)
    }

    #[cfg(not(unix))]
    {
        let _ = gid;
        None
    }
}

#[cfg(unix)]
fn get_uid_by_username(username: &str) -> Option<u32> {
    nix::unistd::User::from_name(username)
        .ok()
        .flatten()
        .map(|user| user.uid.as_raw())
}

#[cfg(unix)]
fn get_gid_by_groupname(groupname: &str) -> Option<u32> {
    nix::unistd::Group::from_name(groupname)
        .ok()
        .flatten()
        .map(|group| group.gid.as_raw())
}

#[cfg(not(unix))]
fn get_uid_by_username(_username: &str) -> Option<u32> {
    None
}

#[cfg(not(unix))]
fn get_gid_by_groupname(_groupname: &str) -> Option<u32> {
    None
}
