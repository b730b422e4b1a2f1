//! Artifact discovery and the collected output tree.

use crate::bundler::utils::fs::{copy_file, create_dir_all};
use crate::bundler::{BundleFormat, Platform};
use crate::error::{CliError, Result, TauridockError};
use crate::report::Reporter;
use std::path::{Path, PathBuf};

use super::checksum::{calculate_sha256, sidecar_line, sidecar_path};

/// A produced installer file.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Artifact {
    /// Location in the output tree
    pub path: PathBuf,
    /// Size in bytes
    pub size: u64,
}

impl Artifact {
    /// Reads size information for an artifact on disk.
    pub async fn inspect(path: &Path) -> Result<Self> {
        let metadata = tokio::fs::metadata(path).await?;
        Ok(Self {
            path: path.to_path_buf(),
            size: metadata.len(),
        })
    }

    /// File name as displayed and uploaded.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// SHA-256 of the current file content. Computed on every call.
    pub async fn checksum(&self) -> Result<String> {
        calculate_sha256(&self.path).await
    }

    /// Hashes the artifact and writes `<path>.sha256` next to it.
    pub async fn write_sidecar(&self) -> Result<PathBuf> {
        let checksum = self.checksum().await?;
        let sidecar = sidecar_path(&self.path);
        tokio::fs::write(&sidecar, sidecar_line(&checksum, &self.path)).await?;
        Ok(sidecar)
    }
}

/// Output tree rooted at the configured output directory.
///
/// Artifacts land at `<output_root>/<platform>/<filename>`.
#[derive(Clone, Debug)]
pub struct ArtifactStore {
    output_root: PathBuf,
}

impl ArtifactStore {
    /// Creates a store for `output_root`.
    pub fn new(output_root: PathBuf) -> Self {
        Self { output_root }
    }

    /// Root of the output tree
    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Directory collecting every artifact of `platform`
    pub fn platform_dir(&self, platform: Platform) -> PathBuf {
        self.output_root.join(platform.as_str())
    }

    /// Copies the regular files found in `bundle_root/<format>/` for each
    /// format into the platform's output directory.
    ///
    /// Formats whose subdirectory does not exist contribute nothing; an empty
    /// result means nothing was produced, not that something failed.
    ///
    /// # Returns
    ///
    /// Destination paths, in format order then file-name order.
    pub async fn collect(
        &self,
        platform: Platform,
        bundle_root: &Path,
        formats: &[BundleFormat],
        reporter: &dyn Reporter,
    ) -> Result<Vec<PathBuf>> {
        reporter.verbose(&format!(
            "Scanning for artifacts in: {}",
            bundle_root.display()
        ));

        let sources = {
            let bundle_root = bundle_root.to_path_buf();
            let formats = formats.to_vec();
            tokio::task::spawn_blocking(move || discover(&bundle_root, &formats))
                .await
                .map_err(|e| {
                    TauridockError::Cli(CliError::ExecutionFailed {
                        command: "discover artifacts".to_string(),
                        reason: format!("Task panicked: {}", e),
                    })
                })??
        };

        if sources.is_empty() {
            return Ok(Vec::new());
        }

        let dest_dir = self.platform_dir(platform);
        create_dir_all(&dest_dir).await?;

        let mut artifacts = Vec::with_capacity(sources.len());
        for source in sources {
            let Some(file_name) = source.file_name() else {
                continue;
            };
            let dest = dest_dir.join(file_name);
            copy_file(&source, &dest).await?;
            reporter.verbose(&format!("  ✓ Artifact: {}", dest.display()));
            artifacts.push(dest);
        }

        reporter.verbose(&format!("Collected {} artifact(s)", artifacts.len()));
        Ok(artifacts)
    }
}

/// Lists regular files directly inside each `bundle_root/<format>` directory.
fn discover(bundle_root: &Path, formats: &[BundleFormat]) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for format in formats {
        let format_dir = bundle_root.join(format.as_str());
        if !format_dir.is_dir() {
            continue;
        }

        let pattern = format!(
            "{}/*",
            glob::Pattern::escape(&format_dir.to_string_lossy())
        );
        let entries = glob::glob(&pattern).map_err(|e| {
            TauridockError::Cli(CliError::ExecutionFailed {
                command: "scan bundle directory".to_string(),
                reason: format!("Invalid pattern {}: {}", pattern, e),
            })
        })?;

        for entry in entries {
            let path = entry.map_err(|e| TauridockError::Io(e.into_error()))?;
            // Skip directories (e.g. macOS .app bundles) and symlinks
            let metadata = std::fs::symlink_metadata(&path)?;
            if metadata.is_file() {
                found.push(path);
            }
        }
    }
    Ok(found)
}
