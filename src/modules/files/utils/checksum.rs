//! SHA-256 checksums used for content change detection

use sha2::{Digest, Sha256};
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncReadExt;

use crate::modules::error::FileError;

/// Hex SHA-256 of an in-memory buffer
pub fn checksum_bytes(data: &[u8]) -> String {
    format!("{:x}", Sha256::digest(data))
}

/// Hex SHA-256 of a file's content, streamed in 8 KiB chunks
pub async fn checksum_file(path: &Path) -> Result<String, FileError> {
    let mut file = File::open(path)
        .await
        .map_err(|e| FileError::from_io(path, "open", e))?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0; 8192];

    loop {
        let bytes_read = file
            .read(&mut buffer)
            .await
            .map_err(|e| FileError::from_io(path, "read", e))?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}
