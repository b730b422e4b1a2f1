//! RAII guard for container cleanup.

use std::process::Stdio;

/// Force-removes a named container.
///
/// Call [`ContainerGuard::remove`] once the run is over. A guard dropped
/// without it (early return, future dropped on timeout) still removes the
/// container, on the blocking pool when a tokio runtime is present, so an
/// abandoned build does not leave its container running.
#[derive(Debug)]
pub struct ContainerGuard {
    name: String,
    armed: bool,
}

impl ContainerGuard {
    /// Guards the container called `name` (which may not exist yet).
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            armed: true,
        }
    }

    /// Name of the guarded container
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Removes the container without blocking the runtime and disarms the guard.
    pub async fn remove(mut self) {
        self.armed = false;
        log::debug!("Removing container {}", self.name);
        let status = tokio::process::Command::new("docker")
            .args(["rm", "-f", self.name.as_str()])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;
        log_removal(&self.name, status);
    }
}

impl Drop for ContainerGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let name = std::mem::take(&mut self.name);
        log::debug!("Removing abandoned container {}", name);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn_blocking(move || remove_blocking(&name));
            }
            Err(_) => remove_blocking(&name),
        }
    }
}

fn remove_blocking(name: &str) {
    let status = std::process::Command::new("docker")
        .args(["rm", "-f", name])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();
    log_removal(name, status);
}

// `rm -f` stops a running container first; a missing one is not an error
fn log_removal(name: &str, status: std::io::Result<std::process::ExitStatus>) {
    match status {
        Ok(status) if !status.success() => {
            log::debug!("docker rm -f {} exited with {}", name, status);
        }
        Ok(_) => {}
        Err(e) => log::warn!("Failed to remove container {}: {}", name, e),
    }
}
