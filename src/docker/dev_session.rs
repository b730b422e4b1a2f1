//! Interactive development container with hot reload.

use super::container_runner::{build_run_args, forward_lines};
use super::{ContainerGuard, RunBindings};
use crate::bundler::{DevOptions, TAURI_DEV_PORT};
use crate::error::{CliError, Result, TauridockError};
use crate::report::Reporter;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Command started inside the dev container.
pub const DEV_COMMAND: &str = "cd /app && cargo tauri dev";

/// Grace period for `docker stop` before the daemon kills the container.
const STOP_TIMEOUT: Duration = Duration::from_secs(30);

/// Bindings of a dev session: source tree read-write at `/app`, the frontend
/// port and the Tauri dev port published, dev flags as environment.
pub fn dev_bindings(host_path: &Path, frontend_port: u16, dev: DevOptions) -> RunBindings {
    let mut bindings = RunBindings::new()
        .volume(host_path, "/app")
        .port(frontend_port)
        .port(TAURI_DEV_PORT)
        .env("TAURI_DEV", "1")
        .env("RUST_BACKTRACE", "1");
    if dev.hot_reload {
        bindings = bindings.env("TAURI_HOT_RELOAD", "1");
    }
    if dev.devtools {
        bindings = bindings.env("TAURI_DEVTOOLS", "1");
    }
    if dev.watch {
        bindings = bindings.env("TAURI_WATCH", "1");
    }
    bindings
}

/// Runs the dev container in the foreground until Ctrl-C or until it exits.
pub async fn run_dev_session(
    container_name: &str,
    image: &str,
    bindings: &RunBindings,
    frontend_port: u16,
    reporter: &dyn Reporter,
) -> Result<()> {
    let guard = ContainerGuard::new(container_name);
    let docker_args = build_run_args(container_name, image, DEV_COMMAND, bindings);

    let mut child = Command::new("docker")
        .args(&docker_args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| {
            TauridockError::Cli(CliError::ExecutionFailed {
                command: "docker run".to_string(),
                reason: e.to_string(),
            })
        })?;

    reporter.success("Development server started!");
    reporter.info(&format!("Frontend: http://localhost:{}", frontend_port));
    reporter.info(&format!("Tauri Dev: http://localhost:{}", TAURI_DEV_PORT));
    reporter.info("Press Ctrl+C to stop");

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    let session = async {
        tokio::join!(
            forward_lines(stdout, |line| reporter.info(&line)),
            forward_lines(stderr, |line| reporter.info(&line)),
        );
        child.wait().await
    };

    let outcome = tokio::select! {
        status = session => match status {
            Ok(status) if status.success() => Ok(()),
            Ok(status) => Err(TauridockError::Cli(CliError::ExecutionFailed {
                command: DEV_COMMAND.to_string(),
                reason: format!(
                    "development container exited with code {}",
                    status.code().unwrap_or(-1)
                ),
            })),
            Err(e) => Err(TauridockError::Io(e)),
        },
        _ = tokio::signal::ctrl_c() => {
            reporter.info("Stopping development server...");
            stop_container(container_name).await;
            Ok(())
        }
    };

    guard.remove().await;
    outcome
}

async fn stop_container(container_name: &str) {
    let stop = Command::new("docker")
        .args([
            "stop",
            "-t",
            &STOP_TIMEOUT.as_secs().to_string(),
            container_name,
        ])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match tokio::time::timeout(STOP_TIMEOUT + Duration::from_secs(5), stop).await {
        Ok(Ok(status)) if status.success() => {}
        Ok(Ok(status)) => log::warn!("docker stop {} exited with {}", container_name, status),
        Ok(Err(e)) => log::warn!("Failed to stop {}: {}", container_name, e),
        Err(_) => log::warn!("Timed out stopping {}", container_name),
    }
}
