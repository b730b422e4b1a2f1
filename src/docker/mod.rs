//! Container execution facility.
//!
//! [`ContainerRuntime`] is the seam between orchestration and the container
//! backend. [`DockerRuntime`] implements it on top of the `docker` CLI:
//!
//! - one image per target, tagged `<prefix>-<platform>-<arch>:latest`
//! - commands run via `sh -c` in a uniquely named container
//! - stdout/stderr streamed to the [`Reporter`](crate::report::Reporter) and captured
//! - containers removed by an RAII guard, also when the run is abandoned
//!
//! # Module Structure
//!
//! - `bindings` - Volume, port and environment bindings
//! - `container_runner` - `docker run` argument building and output streaming
//! - `dev_session` - Interactive development container
//! - `guard` - RAII guard for container cleanup
//! - `image` - Daemon availability checks and image builds
//! - `runtime` - The [`DockerRuntime`] implementation

mod bindings;
mod container_runner;
mod dev_session;
mod guard;
mod image;
mod runtime;

pub use bindings::{PortBinding, RunBindings, VolumeBinding};
pub use container_runner::build_run_args;
pub use guard::ContainerGuard;
pub use image::{
    DEFAULT_IMAGE_PREFIX, ImageBuildRequest, check_docker_available, docker_build_args,
    image_prefix, image_tag,
};
pub use runtime::{DockerRuntime, DockerSettings};

use crate::bundler::BuildTarget;
use crate::error::Result;
use std::path::Path;

/// Exit code and combined output of a finished container command.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RunOutput {
    /// Process exit code (-1 when terminated by a signal)
    pub exit_code: i32,
    /// Captured stdout and stderr lines
    pub log: String,
}

impl RunOutput {
    /// Whether the command exited with status 0.
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Facade over a container execution facility.
#[async_trait::async_trait]
pub trait ContainerRuntime: Send + Sync {
    /// Builds the execution image for `target` and returns its tag.
    ///
    /// Fails with [`TauridockError::ImageBuild`](crate::TauridockError::ImageBuild).
    async fn build_image(&self, target: BuildTarget) -> Result<String>;

    /// Runs `command` in a fresh container from `image`.
    ///
    /// The container is removed afterwards whatever the outcome. The exit code
    /// is returned as-is; interpreting it is the caller's job.
    async fn run_command(
        &self,
        image: &str,
        command: &str,
        bindings: &RunBindings,
    ) -> Result<RunOutput>;

    /// Runs the long-lived development session for `host_path` until cancelled.
    async fn run_interactive(&self, image: &str, host_path: &Path) -> Result<()>;
}
