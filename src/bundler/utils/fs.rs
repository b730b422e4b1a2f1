//! File system utilities for artifact handling.
//!
//! Provides idempotent directory creation and file copies that create
//! destination directories on demand.

use crate::error::{Result, TauridockError};
use std::{io, path::Path};
use tokio::fs;

/// Creates all of the directories of the specified path.
///
/// Idempotent: succeeds when the directory already exists.
pub async fn create_dir_all(path: &Path) -> Result<()> {
    Ok(fs::create_dir_all(path).await?)
}

/// Copies a regular file from one path to another, creating any parent
/// directories of the destination path as necessary.
///
/// Fails if the source path is a directory or doesn't exist.
pub async fn copy_file(from: &Path, to: &Path) -> Result<()> {
    let metadata = match fs::metadata(from).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(TauridockError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{from:?} does not exist"),
            )));
        }
        Err(e) => return Err(e.into()),
    };
    if !metadata.is_file() {
        return Err(TauridockError::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{from:?} is not a file"),
        )));
    }
    if let Some(dest_dir) = to.parent() {
        fs::create_dir_all(dest_dir).await?;
    }
    fs::copy(from, to).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn copy_file_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("app.deb");
        tokio::fs::write(&src, b"payload").await.unwrap();

        let dest = dir.path().join("dist/linux/app.deb");
        copy_file(&src, &dest).await.unwrap();

        assert_eq!(tokio::fs::read(&dest).await.unwrap(), b"payload");
    }

    #[tokio::test]
    async fn copy_file_rejects_directories() {
        let dir = tempfile::tempdir().unwrap();
        let err = copy_file(dir.path(), &dir.path().join("out")).await;
        assert!(err.is_err());
    }

    #[tokio::test]
    async fn create_dir_all_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("dist/linux");
        create_dir_all(&target).await.unwrap();
        create_dir_all(&target).await.unwrap();
        assert!(target.is_dir());
    }
}
