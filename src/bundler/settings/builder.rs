//! Builder for constructing [`BuildConfig`].

use super::config::{DEFAULT_BASE_IMAGE, DEFAULT_FRONTEND_PORT};
use super::{
    AppIdentity, Architecture, BuildConfig, BundleFormat, DevOptions, Mode, Platform,
    ReleaseSettings,
};
use crate::error::{Result, TauridockError};
use crate::metadata::{DEFAULT_APP_NAME, DEFAULT_VERSION};
use path_absolutize::Absolutize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Builder for constructing [`BuildConfig`].
///
/// Every optional input has the same default as the command line.
///
/// # Examples
///
/// ```no_run
/// use tauridock::bundler::{BuildConfigBuilder, BundleFormat, Mode, Platform, Architecture};
///
/// # fn example() -> tauridock::Result<()> {
/// let config = BuildConfigBuilder::new()
///     .dockerfile("docker/Dockerfile")
///     .mode(Mode::Build)
///     .platforms(vec![Platform::Linux])
///     .architectures(vec![Architecture::X64])
///     .bundle_types(Platform::Linux, vec![BundleFormat::Deb])
///     .optimize(true)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct BuildConfigBuilder {
    dockerfile: Option<PathBuf>,
    frontend_port: Option<u16>,
    mode: Option<Mode>,
    platforms: Option<Vec<Platform>>,
    architectures: Option<Vec<Architecture>>,
    app_name: Option<String>,
    version: Option<String>,
    workspace: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    optimize: bool,
    sign: bool,
    bundle_types: BTreeMap<Platform, Vec<BundleFormat>>,
    base_image: Option<String>,
    docker_cache: bool,
    environment: Vec<(String, String)>,
    dev: DevOptions,
    github_token: Option<String>,
    github_repo: Option<String>,
    release_tag: Option<String>,
    release_notes: Option<PathBuf>,
    draft: bool,
    prerelease: bool,
}

impl BuildConfigBuilder {
    /// Creates a new config builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the Dockerfile used for every target image.
    ///
    /// # Required
    ///
    /// This field is required for building.
    pub fn dockerfile<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.dockerfile = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the frontend service port.
    ///
    /// Default: 3003
    pub fn frontend_port(mut self, port: u16) -> Self {
        self.frontend_port = Some(port);
        self
    }

    /// Sets the execution mode.
    ///
    /// Default: [`Mode::Build`]
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Sets the requested platforms.
    ///
    /// Default: windows, macos, linux
    pub fn platforms(mut self, platforms: Vec<Platform>) -> Self {
        self.platforms = Some(platforms);
        self
    }

    /// Sets the requested architectures.
    ///
    /// Default: x64
    pub fn architectures(mut self, architectures: Vec<Architecture>) -> Self {
        self.architectures = Some(architectures);
        self
    }

    /// Sets the application name.
    pub fn app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = Some(name.into());
        self
    }

    /// Sets the application version.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Sets the project root bound into build containers.
    ///
    /// Default: current directory
    pub fn workspace<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.workspace = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the artifact output root.
    ///
    /// Default: `dist`
    pub fn output_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.output_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Enables the release optimization flag.
    pub fn optimize(mut self, optimize: bool) -> Self {
        self.optimize = optimize;
        self
    }

    /// Requests code signing inside the container.
    pub fn sign(mut self, sign: bool) -> Self {
        self.sign = sign;
        self
    }

    /// Selects bundle formats for one platform, in flag order.
    pub fn bundle_types(mut self, platform: Platform, formats: Vec<BundleFormat>) -> Self {
        self.bundle_types.insert(platform, formats);
        self
    }

    /// Sets the base image reference.
    ///
    /// Default: `rust:latest`
    pub fn base_image(mut self, image: impl Into<String>) -> Self {
        self.base_image = Some(image.into());
        self
    }

    /// Allows docker layer caching during image builds.
    pub fn docker_cache(mut self, enabled: bool) -> Self {
        self.docker_cache = enabled;
        self
    }

    /// Adds environment variables for build containers.
    pub fn environment(mut self, vars: Vec<(String, String)>) -> Self {
        self.environment.extend(vars);
        self
    }

    /// Sets dev-container options.
    pub fn dev_options(mut self, dev: DevOptions) -> Self {
        self.dev = dev;
        self
    }

    /// Sets the API token used for publishing.
    pub fn github_token(mut self, token: Option<String>) -> Self {
        self.github_token = token;
        self
    }

    /// Sets the release repository (`owner/name`).
    pub fn github_repo(mut self, repo: Option<String>) -> Self {
        self.github_repo = repo;
        self
    }

    /// Sets the release tag.
    ///
    /// Default: `v<version>`
    pub fn release_tag(mut self, tag: Option<String>) -> Self {
        self.release_tag = tag;
        self
    }

    /// Sets a release notes file, used verbatim.
    pub fn release_notes(mut self, path: Option<PathBuf>) -> Self {
        self.release_notes = path;
        self
    }

    /// Creates the release as a draft.
    pub fn draft(mut self, draft: bool) -> Self {
        self.draft = draft;
        self
    }

    /// Marks the release as a prerelease.
    pub fn prerelease(mut self, prerelease: bool) -> Self {
        self.prerelease = prerelease;
        self
    }

    /// Validates inputs and freezes them into a [`BuildConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`TauridockError::Configuration`] when the Dockerfile is missing,
    /// no platform or architecture is requested, or a bundle format is not
    /// producible on the platform it was configured for.
    pub fn build(self) -> Result<BuildConfig> {
        let dockerfile = self.dockerfile.ok_or_else(|| {
            TauridockError::Configuration("a Dockerfile path is required (--dockerfile)".into())
        })?;

        let platforms = self.platforms.unwrap_or_else(|| Platform::ALL.to_vec());
        if platforms.is_empty() {
            return Err(TauridockError::Configuration(
                "at least one platform is required".into(),
            ));
        }

        let architectures = self
            .architectures
            .unwrap_or_else(|| vec![Architecture::X64]);
        if architectures.is_empty() {
            return Err(TauridockError::Configuration(
                "at least one architecture is required".into(),
            ));
        }

        for (platform, formats) in &self.bundle_types {
            if let Some(format) = formats
                .iter()
                .find(|f| !platform.bundle_formats().contains(f))
            {
                return Err(TauridockError::Configuration(format!(
                    "bundle format '{}' is not available for {} (valid: {})",
                    format,
                    platform,
                    platform
                        .bundle_formats()
                        .iter()
                        .map(|f| f.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                )));
            }
        }

        let app = AppIdentity {
            name: self
                .app_name
                .unwrap_or_else(|| DEFAULT_APP_NAME.to_string()),
            version: self
                .version
                .unwrap_or_else(|| DEFAULT_VERSION.to_string()),
        };

        let mode = self.mode.unwrap_or(Mode::Build);
        let release = (mode == Mode::Publish).then(|| ReleaseSettings {
            repository: self.github_repo,
            token: self.github_token,
            tag: self
                .release_tag
                .unwrap_or_else(|| format!("v{}", app.version)),
            notes_path: self.release_notes,
            draft: self.draft,
            prerelease: self.prerelease,
        });

        let workspace = absolute(self.workspace.unwrap_or_else(|| PathBuf::from(".")))?;
        let output_dir = absolute(self.output_dir.unwrap_or_else(|| PathBuf::from("dist")))?;
        let dockerfile = absolute(dockerfile)?;

        Ok(BuildConfig {
            dockerfile,
            frontend_port: self.frontend_port.unwrap_or(DEFAULT_FRONTEND_PORT),
            mode,
            platforms,
            architectures,
            app,
            workspace,
            output_dir,
            optimize: self.optimize,
            sign: self.sign,
            bundle_types: self.bundle_types,
            base_image: self
                .base_image
                .unwrap_or_else(|| DEFAULT_BASE_IMAGE.to_string()),
            docker_cache: self.docker_cache,
            environment: self.environment,
            dev: self.dev,
            release,
        })
    }
}

/// Docker bind mounts need absolute host paths.
fn absolute(path: PathBuf) -> Result<PathBuf> {
    Ok(path.absolutize()?.into_owned())
}
