//! Artifact checksum calculation.
//!
//! SHA-256 over file content, read in chunks so arbitrarily large installers
//! never have to fit in memory, plus the `<artifact>.sha256` sidecar format.

use crate::error::Result;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;

/// Read buffer size for hashing.
const CHUNK_SIZE: usize = 8192;

/// Calculates the SHA-256 checksum of a file.
///
/// The digest depends only on the file's bytes, never on its name, timestamps
/// or the order in which files are hashed.
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash (64 characters)
/// * `Err` - If the file cannot be opened or read
pub async fn calculate_sha256(file_path: &Path) -> Result<String> {
    let mut file = tokio::fs::File::open(file_path).await?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; CHUNK_SIZE];

    loop {
        let n = file.read(&mut buffer).await?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Path of the checksum sidecar for `artifact`: the artifact path with `.sha256` appended.
pub fn sidecar_path(artifact: &Path) -> PathBuf {
    let mut name = artifact.as_os_str().to_os_string();
    name.push(".sha256");
    PathBuf::from(name)
}

/// Sidecar content in `sha256sum` format: `<hexdigest>  <filename>`.
pub fn sidecar_line(checksum: &str, artifact: &Path) -> String {
    let file_name = artifact
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("{}  {}", checksum, file_name)
}
