//! Volume, port and environment bindings for container runs.

use std::path::{Path, PathBuf};

/// Host directory mounted into the container.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VolumeBinding {
    /// Absolute host path
    pub host: PathBuf,
    /// Mount point inside the container
    pub container: String,
    /// Mount read-only instead of read-write
    pub read_only: bool,
}

/// Host port published to a container port.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PortBinding {
    /// Port on the host
    pub host: u16,
    /// Port inside the container
    pub container: u16,
}

/// Everything a container run binds from the host.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RunBindings {
    /// Volume mounts
    pub volumes: Vec<VolumeBinding>,
    /// Published ports
    pub ports: Vec<PortBinding>,
    /// Environment variables
    pub environment: Vec<(String, String)>,
}

impl RunBindings {
    /// Creates empty bindings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mounts `host` read-write at `container`.
    pub fn volume(mut self, host: &Path, container: impl Into<String>) -> Self {
        self.volumes.push(VolumeBinding {
            host: host.to_path_buf(),
            container: container.into(),
            read_only: false,
        });
        self
    }

    /// Publishes `port` on the same host port.
    pub fn port(mut self, port: u16) -> Self {
        self.ports.push(PortBinding {
            host: port,
            container: port,
        });
        self
    }

    /// Sets one environment variable.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.environment.push((key.into(), value.into()));
        self
    }

    /// Adds several environment variables.
    pub fn envs<I>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.environment.extend(vars);
        self
    }

    /// `docker run` flags for these bindings.
    pub fn to_docker_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        for volume in &self.volumes {
            args.push("-v".to_string());
            args.push(format!(
                "{}:{}:{}",
                volume.host.display(),
                volume.container,
                if volume.read_only { "ro" } else { "rw" }
            ));
        }
        for port in &self.ports {
            args.push("-p".to_string());
            args.push(format!("{}:{}", port.host, port.container));
        }
        for (key, value) in &self.environment {
            args.push("-e".to_string());
            args.push(format!("{}={}", key, value));
        }
        args
    }
}
