//! Release publishing.
//!
//! [`ReleasePublisher`] turns a [`BuildReport`] into a hosted release: it
//! creates the release, then uploads every artifact followed by its
//! `.sha256` sidecar. The host is reached through [`ReleaseHost`];
//! [`GitHubReleaseHost`] is the production implementation.

mod github;
mod notes;

pub use github::{GITHUB_API_URL, GitHubReleaseHost, asset_upload_url};
pub use notes::{release_notes, render_default_notes};

use crate::bundler::{AppIdentity, Artifact, BuildReport, ReleaseSettings, RepositorySlug};
use crate::error::{Result, TauridockError};
use crate::report::Reporter;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Content type of installer uploads.
pub const ARTIFACT_CONTENT_TYPE: &str = "application/octet-stream";

/// Content type of checksum sidecar uploads.
pub const SIDECAR_CONTENT_TYPE: &str = "text/plain";

/// Release creation payload.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ReleaseRequest {
    /// Tag the release points at
    #[serde(rename = "tag_name")]
    pub tag: String,
    /// Release title
    pub name: String,
    /// Release notes
    pub body: String,
    /// Create as draft
    pub draft: bool,
    /// Mark as prerelease
    pub prerelease: bool,
}

/// A release as returned by the host.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
pub struct CreatedRelease {
    /// Host identifier
    pub id: u64,
    /// Durable web URL of the release
    pub html_url: String,
    /// Asset upload endpoint (may carry a URI template suffix)
    pub upload_url: String,
}

/// One file to attach to a release.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AssetUpload {
    /// Local file
    pub path: PathBuf,
    /// Asset name on the release
    pub name: String,
    /// Display label
    pub label: String,
    /// MIME type sent with the upload
    pub content_type: &'static str,
}

/// An asset attached to a release.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
pub struct UploadedAsset {
    /// Asset name
    pub name: String,
    /// Download URL
    #[serde(rename = "browser_download_url")]
    pub url: String,
}

/// What was published.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReleaseDescriptor {
    /// Release tag
    pub tag: String,
    /// Notes body sent to the host
    pub notes: String,
    /// Created as draft
    pub draft: bool,
    /// Marked as prerelease
    pub prerelease: bool,
    /// Durable web URL of the release
    pub url: String,
    /// Uploaded assets, artifacts and sidecars interleaved
    pub assets: Vec<UploadedAsset>,
}

/// Facade over a release hosting service.
#[async_trait::async_trait]
pub trait ReleaseHost: Send + Sync {
    /// Creates a release.
    async fn create_release(&self, request: &ReleaseRequest) -> Result<CreatedRelease>;

    /// Uploads one asset to `release`.
    async fn upload_asset(
        &self,
        release: &CreatedRelease,
        asset: &AssetUpload,
    ) -> Result<UploadedAsset>;
}

/// Checks credentials before anything touches the network.
fn validate_credentials(settings: &ReleaseSettings) -> Result<(String, RepositorySlug)> {
    let token = settings
        .token
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            TauridockError::Configuration("GitHub token is required for publishing".to_string())
        })?;

    let repo = settings
        .repository
        .as_deref()
        .ok_or_else(|| {
            TauridockError::Configuration(
                "GitHub repository is required for publishing".to_string(),
            )
        })?
        .parse::<RepositorySlug>()
        .map_err(TauridockError::Configuration)?;

    Ok((token.to_string(), repo))
}

fn into_publish_error(context: &str, error: TauridockError) -> TauridockError {
    match error {
        TauridockError::Publish(_) => error,
        other => TauridockError::Publish(format!("{}: {}", context, other)),
    }
}

fn file_name(path: &Path) -> Result<String> {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| TauridockError::Publish(format!("{} has no file name", path.display())))
}

/// Publishes build aggregates as releases.
pub struct ReleasePublisher {
    host: Arc<dyn ReleaseHost>,
    settings: ReleaseSettings,
    app: AppIdentity,
    reporter: Arc<dyn Reporter>,
}

impl std::fmt::Debug for ReleasePublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReleasePublisher")
            .field("settings", &self.settings)
            .field("app", &self.app)
            .finish()
    }
}

impl ReleasePublisher {
    /// Creates a publisher targeting GitHub.
    ///
    /// # Errors
    ///
    /// [`TauridockError::Configuration`] when the token is missing or empty or
    /// the repository is not `owner/name`. Nothing is sent in that case.
    pub fn new(
        settings: ReleaseSettings,
        app: AppIdentity,
        reporter: Arc<dyn Reporter>,
    ) -> Result<Self> {
        let (token, repo) = validate_credentials(&settings)?;
        let host = GitHubReleaseHost::new(token, repo)?;
        Ok(Self {
            host: Arc::new(host),
            settings,
            app,
            reporter,
        })
    }

    /// Creates a publisher on an arbitrary host, with the same credential
    /// checks as [`new`](Self::new).
    pub fn with_host(
        settings: ReleaseSettings,
        app: AppIdentity,
        host: Arc<dyn ReleaseHost>,
        reporter: Arc<dyn Reporter>,
    ) -> Result<Self> {
        validate_credentials(&settings)?;
        Ok(Self {
            host,
            settings,
            app,
            reporter,
        })
    }

    /// Release settings in use
    pub fn settings(&self) -> &ReleaseSettings {
        &self.settings
    }

    /// Creates the release and uploads every artifact of `report` with its
    /// checksum sidecar, in target order.
    ///
    /// The first failure aborts the remaining uploads. Whatever was already
    /// created on the host stays there.
    pub async fn publish(&self, report: &BuildReport) -> Result<ReleaseDescriptor> {
        let tag = &self.settings.tag;
        self.reporter
            .info(&format!("Creating GitHub release {}", tag));

        let notes = release_notes(self.settings.notes_path.as_deref(), tag, &self.app, report)
            .await
            .map_err(|e| into_publish_error("Reading release notes", e))?;

        let request = ReleaseRequest {
            tag: tag.clone(),
            name: tag.clone(),
            body: notes.clone(),
            draft: self.settings.draft,
            prerelease: self.settings.prerelease,
        };
        let release = self
            .host
            .create_release(&request)
            .await
            .map_err(|e| into_publish_error("Creating release", e))?;

        let total = report.artifact_count();
        let mut assets = Vec::with_capacity(total * 2);
        let mut uploaded = 0;

        for (target, files) in report.artifacts() {
            for path in files {
                let name = file_name(path)?;
                let artifact = Artifact::inspect(path)
                    .await
                    .map_err(|e| into_publish_error(&format!("Reading {}", name), e))?;
                let sidecar = artifact
                    .write_sidecar()
                    .await
                    .map_err(|e| into_publish_error(&format!("Checksumming {}", name), e))?;

                let upload = AssetUpload {
                    path: artifact.path.clone(),
                    name: name.clone(),
                    label: format!("{} ({})", name, target),
                    content_type: ARTIFACT_CONTENT_TYPE,
                };
                assets.push(
                    self.host
                        .upload_asset(&release, &upload)
                        .await
                        .map_err(|e| into_publish_error(&format!("Uploading {}", name), e))?,
                );

                let sidecar_name = file_name(&sidecar)?;
                let checksum = AssetUpload {
                    path: sidecar,
                    name: sidecar_name.clone(),
                    label: sidecar_name.clone(),
                    content_type: SIDECAR_CONTENT_TYPE,
                };
                assets.push(
                    self.host
                        .upload_asset(&release, &checksum)
                        .await
                        .map_err(|e| {
                            into_publish_error(&format!("Uploading {}", sidecar_name), e)
                        })?,
                );

                uploaded += 1;
                self.reporter.upload_progress(uploaded, total, &name);
            }
        }

        self.reporter
            .success(&format!("Release created: {}", release.html_url));

        Ok(ReleaseDescriptor {
            tag: tag.clone(),
            notes,
            draft: self.settings.draft,
            prerelease: self.settings.prerelease,
            url: release.html_url,
            assets,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(token: Option<&str>, repo: Option<&str>) -> ReleaseSettings {
        ReleaseSettings {
            repository: repo.map(String::from),
            token: token.map(String::from),
            tag: "v1.0.0".into(),
            notes_path: None,
            draft: false,
            prerelease: false,
        }
    }

    #[test]
    fn credentials_are_checked_before_host_construction() {
        for (token, repo) in [
            (None, Some("acme/app")),
            (Some(""), Some("acme/app")),
            (Some("   "), Some("acme/app")),
            (Some("t"), None),
            (Some("t"), Some("not-a-slug")),
        ] {
            let err = validate_credentials(&settings(token, repo)).unwrap_err();
            assert!(matches!(err, TauridockError::Configuration(_)), "{:?}", err);
        }

        let (token, repo) = validate_credentials(&settings(Some("t"), Some("acme/app"))).unwrap();
        assert_eq!(token, "t");
        assert_eq!(repo.to_string(), "acme/app");
    }

    #[test]
    fn create_payload_uses_github_field_names() {
        let request = ReleaseRequest {
            tag: "v2".into(),
            name: "v2".into(),
            body: "b".into(),
            draft: false,
            prerelease: true,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["tag_name"], "v2");
        assert_eq!(json["prerelease"], true);
    }
}
