//! Docker image building operations.

use crate::docker::container_runner::forward_lines;
use crate::error::{Result, TauridockError};
use crate::report::Reporter;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use super::config::DOCKER_BUILD_TIMEOUT;

/// Inputs of one `docker build`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ImageBuildRequest {
    /// Tag to apply to the image
    pub tag: String,
    /// Dockerfile path
    pub dockerfile: PathBuf,
    /// Build context directory
    pub context: PathBuf,
    /// `--build-arg` values, in order
    pub build_args: Vec<(String, String)>,
    /// Disable the layer cache
    pub no_cache: bool,
}

/// `docker build` arguments for `request`.
pub fn docker_build_args(request: &ImageBuildRequest) -> Vec<String> {
    let mut args = vec![
        "build".to_string(),
        "--rm".to_string(),
        "-t".to_string(),
        request.tag.clone(),
        "-f".to_string(),
        request.dockerfile.display().to_string(),
    ];
    for (key, value) in &request.build_args {
        args.push("--build-arg".to_string());
        args.push(format!("{}={}", key, value));
    }
    if request.no_cache {
        args.push("--no-cache".to_string());
    }
    args.push(request.context.display().to_string());
    args
}

/// Builds a Docker image, streaming its output to `reporter`.
///
/// # Returns
///
/// * `Ok(())` - Image built successfully
/// * `Err(ImageBuild)` - Build failed, could not start, or timed out
pub async fn build_docker_image(request: &ImageBuildRequest, reporter: &dyn Reporter) -> Result<()> {
    let image_error = |reason: String| TauridockError::ImageBuild {
        tag: request.tag.clone(),
        reason,
    };

    reporter.verbose(&format!("Building Docker image: {}", request.tag));
    log::debug!("docker {}", docker_build_args(request).join(" "));

    // Spawn with piped stdout and stderr for streaming
    let mut child = Command::new("docker")
        .args(docker_build_args(request))
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| image_error(format!("failed to spawn docker build: {}", e)))?;

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    // Stream both pipes while waiting, bounded by the image build timeout
    let build = async {
        tokio::join!(
            forward_lines(stdout, |line| reporter.process_output(&line)),
            forward_lines(stderr, |line| reporter.process_output(&line)),
        );
        child.wait().await
    };

    let status = match tokio::time::timeout(DOCKER_BUILD_TIMEOUT, build).await {
        Ok(Ok(status)) => status,
        Ok(Err(e)) => return Err(image_error(e.to_string())),
        Err(_elapsed) => {
            // Timeout occurred - kill the process before returning error
            reporter.warn("Docker build timed out, terminating process...");

            if let Err(e) = child.kill().await {
                reporter.warn(&format!("Failed to kill docker build process: {}", e));
            }

            // Reap the process (with short timeout)
            let _ = tokio::time::timeout(Duration::from_secs(10), child.wait()).await;

            return Err(image_error(format!(
                "docker build timed out after {} minutes",
                DOCKER_BUILD_TIMEOUT.as_secs() / 60
            )));
        }
    };

    if !status.success() {
        return Err(image_error(format!(
            "docker build failed with exit code: {}",
            status.code().unwrap_or(-1)
        )));
    }

    reporter.verbose(&format!("Docker image built: {}", request.tag));
    Ok(())
}
