//! Command line argument parsing and merging with the config file.
//!
//! Every option is optional at the clap level so that values from a config
//! file can fill the gaps; CLI values always win.

use super::config_file::{FileConfig, parse_bundle_types};
use crate::bundler::{
    Architecture, BuildConfig, BuildConfigBuilder, DEFAULT_BASE_IMAGE, DEFAULT_FRONTEND_PORT,
    DevOptions, Mode, Platform,
};
use crate::error::{CliError, Result, TauridockError};
use crate::metadata::ProjectMetadata;
use clap::Parser;
use std::path::PathBuf;

/// Multi-platform Tauri application builder
#[derive(Parser, Debug, Default)]
#[command(
    name = "tauridock",
    about = "Build Tauri apps for all platforms using Docker",
    long_about = "Builds a Tauri application for several platform/architecture targets inside
Docker containers, collects the installers into an output tree and optionally
publishes them as a GitHub release with SHA-256 checksums.

Usage:
  tauridock --dockerfile Dockerfile --platforms linux,windows --arch x64,arm64
  tauridock --dockerfile Dockerfile --mode dev --hot-reload
  tauridock --dockerfile Dockerfile --mode publish --github-repo owner/app

Exit code 0 = every requested target reached a terminal state.",
    disable_version_flag = true
)]
pub struct Args {
    /// Dockerfile used to build the per-target images
    #[arg(long, value_name = "PATH")]
    pub dockerfile: Option<PathBuf>,

    /// Port of the frontend server [default: 3003]
    #[arg(long, value_name = "PORT")]
    pub frontend_port: Option<u16>,

    /// Operation mode [default: build]
    #[arg(long, value_enum)]
    pub mode: Option<Mode>,

    /// Comma-separated target platforms [default: windows,macos,linux]
    #[arg(long, value_delimiter = ',', value_name = "LIST")]
    pub platforms: Option<Vec<Platform>>,

    /// Comma-separated architectures [default: x64]
    #[arg(
        long = "arch",
        visible_alias = "architectures",
        value_delimiter = ',',
        value_name = "LIST"
    )]
    pub architectures: Option<Vec<Architecture>>,

    /// Application name [default: from src-tauri/tauri.conf.json]
    #[arg(long)]
    pub app_name: Option<String>,

    /// Application version [default: from package.json]
    #[arg(long)]
    pub version: Option<String>,

    /// Output directory for built artifacts [default: dist]
    #[arg(long, value_name = "PATH")]
    pub output_dir: Option<PathBuf>,

    /// Project root mounted into build containers [default: .]
    #[arg(long, value_name = "PATH")]
    pub workspace: Option<PathBuf>,

    /// Enable production optimizations
    #[arg(long)]
    pub optimize: bool,

    /// Sign the application
    #[arg(long)]
    pub sign: bool,

    /// Bundle types per platform (JSON), e.g. '{"linux": ["deb"]}'
    #[arg(long, value_name = "JSON")]
    pub bundle_types: Option<String>,

    /// Path to a YAML, TOML or JSON configuration file [default: .tauridock.yml]
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable hot reload in dev mode
    #[arg(long)]
    pub hot_reload: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,

    /// Open devtools in dev mode
    #[arg(long)]
    pub devtools: bool,

    /// Watch for file changes in dev mode
    #[arg(long)]
    pub watch: bool,

    /// Environment file forwarded to build containers
    #[arg(long, value_name = "PATH")]
    pub env_file: Option<PathBuf>,

    /// Base Docker image [default: rust:latest]
    #[arg(long, value_name = "IMAGE")]
    pub docker_image: Option<String>,

    /// Use the Docker layer cache
    #[arg(long)]
    pub docker_cache: bool,

    /// GitHub token for publishing
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// GitHub repository (owner/repo)
    #[arg(long, value_name = "OWNER/REPO")]
    pub github_repo: Option<String>,

    /// Release tag [default: v<version>]
    #[arg(long)]
    pub release_tag: Option<String>,

    /// Path to a release notes file
    #[arg(long, value_name = "PATH")]
    pub release_notes: Option<PathBuf>,

    /// Create a draft release
    #[arg(long)]
    pub draft: bool,

    /// Mark the release as a prerelease
    #[arg(long)]
    pub prerelease: bool,

    /// Number of targets built concurrently [default: 3]
    #[arg(short = 'j', long, value_name = "N")]
    pub jobs: Option<usize>,
}

/// Everything a run needs besides the config snapshot.
#[derive(Debug)]
pub struct RuntimeConfig {
    /// Immutable build configuration
    pub build: BuildConfig,
    /// Concurrent target limit, when overridden
    pub jobs: Option<usize>,
    /// Verbose console output
    pub debug: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if let Some(0) = self.jobs {
            return Err("--jobs must be at least 1".to_string());
        }
        if let Some(0) = self.frontend_port {
            return Err("--frontend-port must be a valid port".to_string());
        }
        Ok(())
    }

    /// Workspace root, `.` unless overridden
    pub fn workspace_root(&self) -> PathBuf {
        self.workspace.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    /// Merges these arguments over `file` and the project metadata into a
    /// runtime configuration.
    pub fn resolve(self, file: FileConfig) -> Result<RuntimeConfig> {
        self.validate()
            .map_err(|reason| TauridockError::Cli(CliError::InvalidArguments { reason }))?;

        let workspace = self.workspace_root();

        let dockerfile = self.dockerfile.or(file.dockerfile.clone()).ok_or_else(|| {
            TauridockError::Cli(CliError::MissingArgument {
                argument: "--dockerfile".to_string(),
            })
        })?;
        if !dockerfile.is_file() {
            return Err(TauridockError::Configuration(format!(
                "Dockerfile not found: {}",
                dockerfile.display()
            )));
        }

        let mode = self.mode.or(file.mode).unwrap_or(Mode::Build);
        let platforms = match self.platforms {
            Some(platforms) => platforms,
            None => file.platforms()?.unwrap_or_else(|| Platform::ALL.to_vec()),
        };
        let architectures = match self.architectures {
            Some(architectures) => architectures,
            None => file.architectures()?.unwrap_or_else(|| vec![Architecture::X64]),
        };

        let bundle_types = match (&self.bundle_types, &file.bundle_types) {
            (Some(json), _) => parse_bundle_types(json)?,
            (None, Some(value)) => value.resolve()?,
            (None, None) => Default::default(),
        };

        let env_file = self.env_file.or(file.env_file.clone());
        let environment = match env_file {
            Some(path) => super::env_file::load_env_file(&path)?,
            None => Vec::new(),
        };

        let identity = ProjectMetadata::discover(&workspace).resolve(
            self.app_name.or(file.app_name.clone()),
            self.version.or(file.version.clone()),
        );

        let dev = DevOptions {
            hot_reload: self.hot_reload || file.hot_reload.unwrap_or(false),
            devtools: self.devtools || file.devtools.unwrap_or(false),
            watch: self.watch || file.watch.unwrap_or(false),
        };

        let mut builder = BuildConfigBuilder::new()
            .dockerfile(dockerfile)
            .frontend_port(
                self.frontend_port
                    .or(file.frontend_port)
                    .unwrap_or(DEFAULT_FRONTEND_PORT),
            )
            .mode(mode)
            .platforms(platforms)
            .architectures(architectures)
            .app_name(identity.name)
            .version(identity.version)
            .workspace(&workspace)
            .output_dir(
                self.output_dir
                    .or(file.output_dir.clone())
                    .unwrap_or_else(|| workspace.join("dist")),
            )
            .optimize(self.optimize || file.optimize.unwrap_or(false))
            .sign(self.sign || file.sign.unwrap_or(false))
            .base_image(
                self.docker_image
                    .or(file.docker_image.clone())
                    .unwrap_or_else(|| DEFAULT_BASE_IMAGE.to_string()),
            )
            .docker_cache(self.docker_cache || file.docker_cache.unwrap_or(false))
            .environment(environment)
            .dev_options(dev)
            .github_token(self.github_token.or(file.github_token.clone()))
            .github_repo(self.github_repo.or(file.github_repo.clone()))
            .release_tag(self.release_tag.or(file.release_tag.clone()))
            .release_notes(self.release_notes.or(file.release_notes.clone()))
            .draft(self.draft || file.draft.unwrap_or(false))
            .prerelease(self.prerelease || file.prerelease.unwrap_or(false));

        for (platform, formats) in bundle_types {
            builder = builder.bundle_types(platform, formats);
        }

        Ok(RuntimeConfig {
            build: builder.build()?,
            jobs: self.jobs.or(file.jobs),
            debug: self.debug || file.debug.unwrap_or(false),
        })
    }
}
