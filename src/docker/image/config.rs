//! Docker image configuration and constants.

use crate::bundler::BuildTarget;
use std::time::Duration;

/// Prefix used when the app name yields no usable tag characters
pub const DEFAULT_IMAGE_PREFIX: &str = "tauridock";

/// Timeout for Docker info check (5 seconds)
/// Quick daemon availability check shouldn't take long
pub const DOCKER_INFO_TIMEOUT: Duration = Duration::from_secs(5);

/// Timeout for Docker image build operations (30 minutes)
/// Image builds can take a long time due to base image downloads, apt updates, etc.
pub const DOCKER_BUILD_TIMEOUT: Duration = Duration::from_secs(1800);

/// Platform-specific Docker startup instructions
#[cfg(target_os = "macos")]
pub const DOCKER_START_HELP: &str = "Start Docker Desktop from Applications or Spotlight";

#[cfg(target_os = "linux")]
pub const DOCKER_START_HELP: &str = "Start Docker daemon: sudo systemctl start docker";

#[cfg(not(any(target_os = "macos", target_os = "linux")))]
pub const DOCKER_START_HELP: &str = "Start Docker Desktop";

/// Deterministic image tag: `<prefix>-<platform>-<arch>:latest`.
pub fn image_tag(prefix: &str, target: BuildTarget) -> String {
    format!(
        "{}-{}-{}:latest",
        prefix,
        target.platform(),
        target.architecture()
    )
}

/// Image tag prefix derived from the application name.
///
/// Docker repository names are lowercase, so anything outside `[a-z0-9]`
/// collapses into single dashes.
pub fn image_prefix(app_name: &str) -> String {
    let mut prefix = String::with_capacity(app_name.len());
    for c in app_name.trim().chars() {
        if c.is_ascii_alphanumeric() {
            prefix.push(c.to_ascii_lowercase());
        } else if !prefix.is_empty() && !prefix.ends_with('-') {
            prefix.push('-');
        }
    }
    let prefix = prefix.trim_end_matches('-');
    if prefix.is_empty() {
        DEFAULT_IMAGE_PREFIX.to_string()
    } else {
        prefix.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::{Architecture, Platform};

    #[test]
    fn tag_is_deterministic() {
        let target = BuildTarget::new(Platform::Windows, Architecture::Arm64).unwrap();
        assert_eq!(
            image_tag(DEFAULT_IMAGE_PREFIX, target),
            "tauridock-windows-arm64:latest"
        );
        assert_eq!(image_tag("myapp", target), image_tag("myapp", target));
    }

    #[test]
    fn prefix_from_app_name() {
        assert_eq!(image_prefix("My Tauri App"), "my-tauri-app");
        assert_eq!(image_prefix("TauriApp"), "tauriapp");
        assert_eq!(image_prefix("  __ "), DEFAULT_IMAGE_PREFIX);
    }
}
