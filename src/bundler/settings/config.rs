//! Immutable build configuration shared by every unit of work.

use super::{Architecture, BundleFormat, Platform};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Port of the Tauri dev server inside the dev container.
pub const TAURI_DEV_PORT: u16 = 1420;

/// Default port of the frontend service.
pub const DEFAULT_FRONTEND_PORT: u16 = 3003;

/// Default base image handed to the Dockerfile.
pub const DEFAULT_BASE_IMAGE: &str = "rust:latest";

/// Execution mode of a run.
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Interactive development container with hot reload
    Dev,
    /// Build every target and collect artifacts
    Build,
    /// Build, then publish a release with checksums
    Publish,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::Dev => "dev",
            Mode::Build => "build",
            Mode::Publish => "publish",
        })
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dev" => Ok(Mode::Dev),
            "build" => Ok(Mode::Build),
            "publish" => Ok(Mode::Publish),
            other => Err(format!(
                "Unknown mode '{}'. Valid modes: dev, build, publish",
                other
            )),
        }
    }
}

/// Application identity used for release naming.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AppIdentity {
    /// Product name
    pub name: String,
    /// Version string (e.g. "1.2.0")
    pub version: String,
}

/// GitHub repository identifier, `owner/name`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RepositorySlug {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub name: String,
}

impl fmt::Display for RepositorySlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepositorySlug {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().split_once('/') {
            Some((owner, name))
                if !owner.is_empty() && !name.is_empty() && !name.contains('/') =>
            {
                Ok(Self {
                    owner: owner.to_string(),
                    name: name.to_string(),
                })
            }
            _ => Err(format!(
                "Invalid repository '{}': expected owner/name",
                s
            )),
        }
    }
}

/// Release identity and credentials for publish mode.
#[derive(Clone, Eq, PartialEq)]
pub struct ReleaseSettings {
    /// Target repository; `None` when not configured
    pub repository: Option<String>,
    /// API token; `None` or empty means no credentials
    pub token: Option<String>,
    /// Release tag
    pub tag: String,
    /// Notes file, used verbatim when present
    pub notes_path: Option<PathBuf>,
    /// Create the release as a draft
    pub draft: bool,
    /// Mark the release as a prerelease
    pub prerelease: bool,
}

impl fmt::Debug for ReleaseSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReleaseSettings")
            .field("repository", &self.repository)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("tag", &self.tag)
            .field("notes_path", &self.notes_path)
            .field("draft", &self.draft)
            .field("prerelease", &self.prerelease)
            .finish()
    }
}

/// Options for the interactive development container.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct DevOptions {
    /// Enable frontend hot reload
    pub hot_reload: bool,
    /// Open devtools in the dev window
    pub devtools: bool,
    /// Watch the source tree for changes
    pub watch: bool,
}

/// Snapshot of every input a run needs.
///
/// Built once by [`super::BuildConfigBuilder`] and shared read-only
/// (`Arc<BuildConfig>`) by all concurrent units of work.
#[derive(Clone, Debug)]
pub struct BuildConfig {
    pub(super) dockerfile: PathBuf,
    pub(super) frontend_port: u16,
    pub(super) mode: Mode,
    pub(super) platforms: Vec<Platform>,
    pub(super) architectures: Vec<Architecture>,
    pub(super) app: AppIdentity,
    pub(super) workspace: PathBuf,
    pub(super) output_dir: PathBuf,
    pub(super) optimize: bool,
    pub(super) sign: bool,
    pub(super) bundle_types: BTreeMap<Platform, Vec<BundleFormat>>,
    pub(super) base_image: String,
    pub(super) docker_cache: bool,
    pub(super) environment: Vec<(String, String)>,
    pub(super) dev: DevOptions,
    pub(super) release: Option<ReleaseSettings>,
}

impl BuildConfig {
    /// Path of the Dockerfile used for every target image
    pub fn dockerfile(&self) -> &Path {
        &self.dockerfile
    }

    /// Frontend service port passed to image builds and the dev container
    pub fn frontend_port(&self) -> u16 {
        self.frontend_port
    }

    /// Execution mode
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Requested platforms, in request order
    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    /// Requested architectures, in request order
    pub fn architectures(&self) -> &[Architecture] {
        &self.architectures
    }

    /// Application name and version
    pub fn app(&self) -> &AppIdentity {
        &self.app
    }

    /// Project root bound into build containers
    pub fn workspace(&self) -> &Path {
        &self.workspace
    }

    /// Root of the collected artifact tree
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Whether the release optimization flag is appended
    pub fn optimize(&self) -> bool {
        self.optimize
    }

    /// Whether signing was requested
    pub fn sign(&self) -> bool {
        self.sign
    }

    /// Configured bundle formats for `platform` (empty when none configured)
    pub fn bundle_types_for(&self, platform: Platform) -> &[BundleFormat] {
        self.bundle_types
            .get(&platform)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Base image reference handed to the Dockerfile
    pub fn base_image(&self) -> &str {
        &self.base_image
    }

    /// Whether docker layer caching is allowed
    pub fn docker_cache(&self) -> bool {
        self.docker_cache
    }

    /// Extra environment for build containers
    pub fn environment(&self) -> &[(String, String)] {
        &self.environment
    }

    /// Dev-container options
    pub fn dev(&self) -> DevOptions {
        self.dev
    }

    /// Release settings (publish mode only)
    pub fn release(&self) -> Option<&ReleaseSettings> {
        self.release.as_ref()
    }
}
