//! Builds one target end to end: image, containerized build, collection.

use super::artifact_store::ArtifactStore;
use super::command::{CONTAINER_WORKSPACE, compose_build_command};
use super::result::BuildResult;
use crate::bundler::{BuildConfig, BuildTarget, BundleFormat, Platform};
use crate::docker::{ContainerRuntime, RunBindings};
use crate::error::{Result, TauridockError};
use crate::report::{Reporter, TargetState};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Environment variable set in build containers when signing was requested.
pub const SIGN_ENV: &str = "TAURIDOCK_SIGN";

/// Runs the build of a single target.
///
/// Cheap to clone; every clone shares the same configuration, runtime and
/// reporter so one instance can be moved into each worker task.
#[derive(Clone)]
pub struct TargetBuilder {
    config: Arc<BuildConfig>,
    runtime: Arc<dyn ContainerRuntime>,
    store: ArtifactStore,
    reporter: Arc<dyn Reporter>,
}

impl TargetBuilder {
    /// Creates a builder writing into `config.output_dir()`.
    pub fn new(
        config: Arc<BuildConfig>,
        runtime: Arc<dyn ContainerRuntime>,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        let store = ArtifactStore::new(config.output_dir().to_path_buf());
        Self {
            config,
            runtime,
            store,
            reporter,
        }
    }

    /// Shared configuration
    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Cargo target directory of `target`, relative to the workspace.
    ///
    /// Every target gets its own so concurrent builds sharing the workspace
    /// mount never write into the same tree.
    pub fn target_dir(target: BuildTarget) -> PathBuf {
        Path::new("target").join(target.key())
    }

    /// Host directory holding one subdirectory per produced bundle format.
    pub fn bundle_root(&self, target: BuildTarget) -> PathBuf {
        self.config
            .workspace()
            .join(Self::target_dir(target))
            .join(target.rust_target())
            .join("release")
            .join("bundle")
    }

    /// Formats scanned after a build. Only configured formats are collected;
    /// a platform without configured formats yields no artifacts.
    pub fn bundle_formats(&self, platform: Platform) -> &[BundleFormat] {
        self.config.bundle_types_for(platform)
    }

    /// Container bindings for building `target`.
    pub fn run_bindings(&self, target: BuildTarget) -> RunBindings {
        let target_dir = format!(
            "{}/{}",
            CONTAINER_WORKSPACE,
            Self::target_dir(target).to_string_lossy()
        );
        let mut bindings = RunBindings::new()
            .volume(self.config.workspace(), CONTAINER_WORKSPACE)
            .env("CARGO_TARGET_DIR", target_dir);
        if self.config.sign() {
            bindings = bindings.env(SIGN_ENV, "1");
        }
        bindings.envs(self.config.environment().iter().cloned())
    }

    /// Builds `target` and reports every state transition.
    ///
    /// Never returns an error: every failure is captured in the result.
    pub async fn build(&self, target: BuildTarget) -> BuildResult {
        match self.try_build(target).await {
            Ok(artifacts) => {
                self.reporter.target_state(target, TargetState::Succeeded);
                if artifacts.is_empty() {
                    self.reporter
                        .warn(&format!("No artifacts found for {}", target));
                } else {
                    self.reporter.success(&format!(
                        "Built {} artifact(s) for {}",
                        artifacts.len(),
                        target
                    ));
                }
                BuildResult::Succeeded { target, artifacts }
            }
            Err(e) => {
                self.reporter.target_state(target, TargetState::Failed);
                self.reporter
                    .error(&format!("Build failed for {}: {}", target, e));
                BuildResult::failed(target, e.to_string())
            }
        }
    }

    async fn try_build(&self, target: BuildTarget) -> Result<Vec<PathBuf>> {
        self.reporter
            .target_state(target, TargetState::ImageBuilding);
        let image = self.runtime.build_image(target).await?;

        self.reporter
            .target_state(target, TargetState::CommandRunning);
        let formats = self.config.bundle_types_for(target.platform());
        let command = compose_build_command(target, self.config.optimize(), formats);
        log::debug!("[{}] {}", target, command);

        let output = self
            .runtime
            .run_command(&image, &command, &self.run_bindings(target))
            .await?;
        if !output.success() {
            if let Some(tail) = output.log.lines().last() {
                self.reporter
                    .verbose(&format!("[{}] last output: {}", target, tail));
            }
            return Err(TauridockError::BuildFailed {
                target,
                exit_code: output.exit_code,
            });
        }

        self.reporter.target_state(target, TargetState::Collecting);
        let bundle_root = self.bundle_root(target);
        let formats = self.bundle_formats(target.platform());
        if formats.is_empty() {
            self.reporter.verbose(&format!(
                "[{}] no bundle types configured for {}, nothing to collect",
                target,
                target.platform()
            ));
        }
        self.store
            .collect(
                target.platform(),
                &bundle_root,
                formats,
                self.reporter.as_ref(),
            )
            .await
    }
}
