//! Docker CLI implementation of [`ContainerRuntime`].

use super::container_runner::{build_run_args, run_container};
use super::dev_session::{dev_bindings, run_dev_session};
use super::image::{
    ImageBuildRequest, build_docker_image, check_docker_available, image_prefix, image_tag,
};
use super::{ContainerRuntime, RunBindings, RunOutput};
use crate::bundler::{BuildConfig, BuildTarget, DevOptions};
use crate::error::Result;
use crate::report::Reporter;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

/// Image and container parameters shared by every target.
#[derive(Clone, Debug)]
pub struct DockerSettings {
    /// Image tag prefix
    pub image_prefix: String,
    /// Dockerfile used for every target image
    pub dockerfile: PathBuf,
    /// Frontend service port (build arg and dev port)
    pub frontend_port: u16,
    /// Base image handed to the Dockerfile as `BASE_IMAGE`
    pub base_image: String,
    /// Allow the docker layer cache
    pub use_cache: bool,
    /// Dev-session flags
    pub dev: DevOptions,
}

impl DockerSettings {
    /// Derives docker settings from a run's configuration.
    pub fn from_config(config: &BuildConfig) -> Self {
        Self {
            image_prefix: image_prefix(&config.app().name),
            dockerfile: config.dockerfile().to_path_buf(),
            frontend_port: config.frontend_port(),
            base_image: config.base_image().to_string(),
            use_cache: config.docker_cache(),
            dev: config.dev(),
        }
    }

    /// Build context: the Dockerfile's directory.
    pub fn build_context(&self) -> PathBuf {
        self.dockerfile
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Image build request for `target`.
    pub fn image_request(&self, target: BuildTarget) -> ImageBuildRequest {
        ImageBuildRequest {
            tag: image_tag(&self.image_prefix, target),
            dockerfile: self.dockerfile.clone(),
            context: self.build_context(),
            build_args: vec![
                ("PLATFORM".to_string(), target.platform().to_string()),
                ("ARCH".to_string(), target.architecture().to_string()),
                ("FRONTEND_PORT".to_string(), self.frontend_port.to_string()),
                ("BASE_IMAGE".to_string(), self.base_image.clone()),
            ],
            no_cache: !self.use_cache,
        }
    }
}

/// Container runtime backed by the local `docker` CLI.
pub struct DockerRuntime {
    settings: DockerSettings,
    reporter: Arc<dyn Reporter>,
}

impl std::fmt::Debug for DockerRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DockerRuntime")
            .field("settings", &self.settings)
            .finish()
    }
}

impl DockerRuntime {
    /// Connects to the docker daemon.
    ///
    /// # Errors
    ///
    /// [`TauridockError::EnvironmentUnavailable`](crate::TauridockError::EnvironmentUnavailable)
    /// when docker is missing or its daemon does not answer. There is no retry.
    pub async fn connect(settings: DockerSettings, reporter: Arc<dyn Reporter>) -> Result<Self> {
        check_docker_available().await?;
        reporter.verbose("Docker daemon is available");
        Ok(Self { settings, reporter })
    }

    /// Settings this runtime was created with
    pub fn settings(&self) -> &DockerSettings {
        &self.settings
    }
}

#[async_trait::async_trait]
impl ContainerRuntime for DockerRuntime {
    async fn build_image(&self, target: BuildTarget) -> Result<String> {
        let request = self.settings.image_request(target);
        self.reporter.info(&format!(
            "Building Docker image for {}/{}...",
            target.platform(),
            target.architecture()
        ));
        build_docker_image(&request, self.reporter.as_ref()).await?;
        self.reporter
            .success(&format!("Docker image built: {}", request.tag));
        Ok(request.tag)
    }

    async fn run_command(
        &self,
        image: &str,
        command: &str,
        bindings: &RunBindings,
    ) -> Result<RunOutput> {
        let container_name = format!("{}-run-{}", self.settings.image_prefix, Uuid::new_v4());
        let docker_args = build_run_args(&container_name, image, command, bindings);
        run_container(&container_name, docker_args, self.reporter.as_ref()).await
    }

    async fn run_interactive(&self, image: &str, host_path: &Path) -> Result<()> {
        let container_name = format!("{}-dev-{}", self.settings.image_prefix, Uuid::new_v4());
        let bindings = dev_bindings(host_path, self.settings.frontend_port, self.settings.dev);
        run_dev_session(
            &container_name,
            image,
            &bindings,
            self.settings.frontend_port,
            self.reporter.as_ref(),
        )
        .await
    }
}
