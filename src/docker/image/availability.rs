//! Docker daemon availability checking.

use crate::error::{Result, TauridockError};
use std::process::Stdio;
use tokio::process::Command;
use tokio::time::timeout;

use super::config::{DOCKER_INFO_TIMEOUT, DOCKER_START_HELP};

/// Checks if Docker is installed and the daemon is running.
///
/// # Returns
///
/// * `Ok(())` - Docker is available
/// * `Err(EnvironmentUnavailable)` - Docker is not installed or daemon is not running
pub async fn check_docker_available() -> Result<()> {
    if let Err(e) = which::which("docker") {
        return Err(TauridockError::EnvironmentUnavailable {
            reason: format!(
                "Docker command not found: {}\n\
                 \n\
                 Docker does not appear to be installed.\n\
                 Install from: https://docs.docker.com/get-docker/",
                e
            ),
        });
    }

    let status_result = timeout(
        DOCKER_INFO_TIMEOUT,
        Command::new("docker")
            .arg("info")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status(),
    )
    .await;

    match status_result {
        // Timeout occurred
        Err(_) => Err(TauridockError::EnvironmentUnavailable {
            reason: format!(
                "Docker daemon check timed out after {} seconds.\n\
                 \n\
                 This usually means Docker is not responding.\n\
                 {}",
                DOCKER_INFO_TIMEOUT.as_secs(),
                DOCKER_START_HELP
            ),
        }),

        // Command succeeded
        Ok(Ok(status)) if status.success() => Ok(()),

        // Docker command exists but daemon isn't responding
        Ok(Ok(status)) => Err(TauridockError::EnvironmentUnavailable {
            reason: format!(
                "Docker daemon is not responding (exit code: {}).\n\
                 \n\
                 {}",
                status.code().unwrap_or(-1),
                DOCKER_START_HELP
            ),
        }),

        // Spawning failed even though the binary was found
        Ok(Err(e)) => Err(TauridockError::EnvironmentUnavailable {
            reason: format!("Failed to run `docker info`: {}", e),
        }),
    }
}
