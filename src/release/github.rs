//! GitHub REST implementation of [`ReleaseHost`].

use super::{AssetUpload, CreatedRelease, ReleaseHost, ReleaseRequest, UploadedAsset};
use crate::bundler::RepositorySlug;
use crate::error::{Result, TauridockError};
use reqwest::header::{ACCEPT, CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::{Body, Client, Response};
use tokio_util::io::ReaderStream;
use url::Url;

/// Public GitHub API endpoint.
pub const GITHUB_API_URL: &str = "https://api.github.com";

const GITHUB_ACCEPT: &str = "application/vnd.github+json";

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Release host talking to the GitHub REST API.
pub struct GitHubReleaseHost {
    client: Client,
    api_base: String,
    token: String,
    repo: RepositorySlug,
}

impl std::fmt::Debug for GitHubReleaseHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubReleaseHost")
            .field("api_base", &self.api_base)
            .field("repo", &self.repo)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl GitHubReleaseHost {
    /// Creates a host for `repo` authenticating with `token`.
    pub fn new(token: impl Into<String>, repo: RepositorySlug) -> Result<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            client,
            api_base: GITHUB_API_URL.to_string(),
            token: token.into(),
            repo,
        })
    }

    /// Points the host at another API base (GitHub Enterprise, tests).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// `POST` endpoint creating releases of the repository
    pub fn releases_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/releases",
            self.api_base, self.repo.owner, self.repo.name
        )
    }
}

/// Expands a release's `upload_url` hypermedia template for one asset.
///
/// GitHub returns `https://uploads.github.com/.../assets{?name,label}`; the
/// template part is dropped and `name` and `label` become query parameters.
pub fn asset_upload_url(upload_url: &str, name: &str, label: &str) -> Result<Url> {
    let base = upload_url.split('{').next().unwrap_or(upload_url);
    let mut url = Url::parse(base)
        .map_err(|e| TauridockError::Publish(format!("Invalid upload URL '{}': {}", base, e)))?;
    url.query_pairs_mut()
        .append_pair("name", name)
        .append_pair("label", label);
    Ok(url)
}

/// Maps a non-success response to a publish error carrying GitHub's message.
async fn check_status(response: Response, action: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(TauridockError::Publish(format!(
        "{} failed with HTTP {}: {}",
        action, status, body
    )))
}

#[async_trait::async_trait]
impl ReleaseHost for GitHubReleaseHost {
    async fn create_release(&self, request: &ReleaseRequest) -> Result<CreatedRelease> {
        let url = self.releases_url();
        log::debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .header(ACCEPT, GITHUB_ACCEPT)
            .json(request)
            .send()
            .await?;
        let response = check_status(response, "Creating release").await?;
        Ok(response.json::<CreatedRelease>().await?)
    }

    async fn upload_asset(
        &self,
        release: &CreatedRelease,
        asset: &AssetUpload,
    ) -> Result<UploadedAsset> {
        let url = asset_upload_url(&release.upload_url, &asset.name, &asset.label)?;
        log::debug!("POST {}", url);

        let file = tokio::fs::File::open(&asset.path).await?;
        let size = file.metadata().await?.len();

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.token)
            .header(ACCEPT, GITHUB_ACCEPT)
            .header(CONTENT_TYPE, asset.content_type)
            .header(CONTENT_LENGTH, size)
            .body(Body::wrap_stream(ReaderStream::new(file)))
            .send()
            .await?;
        let response = check_status(response, &format!("Uploading {}", asset.name)).await?;
        Ok(response.json::<UploadedAsset>().await?)
    }
}
