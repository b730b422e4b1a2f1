//! Docker container execution and process output streaming.

use super::{ContainerGuard, RunBindings, RunOutput};
use crate::error::{CliError, Result, TauridockError};
use crate::report::Reporter;
use std::process::Stdio;
use std::sync::Mutex;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;

/// Builds `docker run` arguments for a one-shot command.
///
/// The command is executed through `sh -c` so `&&` chains behave like in a
/// shell. No `--rm`: removal is left to [`ContainerGuard`] so it also happens
/// when the run is abandoned.
pub fn build_run_args(
    container_name: &str,
    image: &str,
    command: &str,
    bindings: &RunBindings,
) -> Vec<String> {
    let mut docker_args = vec![
        "run".to_string(),
        "--name".to_string(),
        container_name.to_string(),
    ];
    docker_args.extend(bindings.to_docker_args());
    docker_args.push(image.to_string());
    docker_args.push("sh".to_string());
    docker_args.push("-c".to_string());
    docker_args.push(command.to_string());
    docker_args
}

/// Reads `stream` line by line until EOF, handing every line to `on_line`.
pub(super) async fn forward_lines<R>(stream: Option<R>, mut on_line: impl FnMut(String))
where
    R: AsyncRead + Unpin,
{
    if let Some(stream) = stream {
        let mut lines = BufReader::new(stream).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            on_line(line);
        }
    }
}

/// Runs a container to completion.
///
/// Both output streams are forwarded to the reporter as they arrive and
/// appended to one combined log. The container named `container_name` is
/// removed when this returns or when the future is dropped.
pub async fn run_container(
    container_name: &str,
    docker_args: Vec<String>,
    reporter: &dyn Reporter,
) -> Result<RunOutput> {
    let guard = ContainerGuard::new(container_name);
    let output = execute(docker_args, reporter).await;
    guard.remove().await;
    output
}

async fn execute(docker_args: Vec<String>, reporter: &dyn Reporter) -> Result<RunOutput> {
    log::debug!("docker {}", docker_args.join(" "));

    // Spawn docker process with both stdout/stderr piped; killing the client
    // on drop detaches it from an abandoned container
    let mut child = Command::new("docker")
        .args(&docker_args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| {
            TauridockError::Cli(CliError::ExecutionFailed {
                command: format!("docker {}", docker_args.join(" ")),
                reason: e.to_string(),
            })
        })?;

    let combined = Mutex::new(String::new());
    let capture = |line: String| {
        reporter.process_output(&line);
        if let Ok(mut log) = combined.lock() {
            log.push_str(&line);
            log.push('\n');
        }
    };

    // Both streams must complete before we check exit status
    tokio::join!(
        forward_lines(child.stdout.take(), capture),
        forward_lines(child.stderr.take(), capture),
    );

    let status = child.wait().await.map_err(|e| {
        TauridockError::Cli(CliError::ExecutionFailed {
            command: "docker run".to_string(),
            reason: e.to_string(),
        })
    })?;

    let log = combined
        .into_inner()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    Ok(RunOutput {
        exit_code: status.code().unwrap_or(-1),
        log,
    })
}
