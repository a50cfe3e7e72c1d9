use serde::{Serialize, Serializer};
use std::fmt;

use crate::modules::error::FileError;

/// Unix permission bits, including setuid/setgid/sticky
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileMode(u32);

impl FileMode {
    pub const DEFAULT: FileMode = FileMode(0o755);
    const MAX: u32 = 0o7777;

    pub fn new(bits: u32) -> Result<Self, FileError> {
        if bits > Self::MAX {
            return Err(FileError::InvalidMode {
                mode: format!("{bits:o}"),
            });
        }
        Ok(FileMode(bits))
    }

    pub fn bits(self) -> u32 {
        self.0
    }
}

impl Default for FileMode {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for FileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04o}", self.0)
    }
}

impl Serialize for FileMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}
