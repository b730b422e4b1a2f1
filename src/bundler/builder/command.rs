//! In-container build command composition.

use crate::bundler::{BuildTarget, BundleFormat};

/// Workspace mount point inside build containers.
pub const CONTAINER_WORKSPACE: &str = "/app";

/// Composes the shell command that builds `target` inside its container.
///
/// In order: workspace entry, dependency install, frontend build, toolchain
/// target registration, application bundle build for the target triple, the
/// release flag when `optimize` is set, then one `--bundles` flag per format
/// in the given order.
///
/// # Examples
///
/// ```
/// use tauridock::bundler::{compose_build_command, Architecture, BuildTarget, BundleFormat, Platform};
///
/// let target = BuildTarget::new(Platform::Linux, Architecture::X64).unwrap();
/// let command = compose_build_command(target, true, &[BundleFormat::Deb]);
/// assert_eq!(
///     command,
///     "cd /app && npm install && npm run build && \
///      rustup target add x86_64-unknown-linux-gnu && \
///      cargo tauri build --target x86_64-unknown-linux-gnu --release --bundles deb"
/// );
/// ```
pub fn compose_build_command(
    target: BuildTarget,
    optimize: bool,
    bundle_formats: &[BundleFormat],
) -> String {
    let rust_target = target.rust_target();
    let mut parts = vec![
        format!("cd {} &&", CONTAINER_WORKSPACE),
        "npm install &&".to_string(),
        "npm run build &&".to_string(),
        format!("rustup target add {} &&", rust_target),
        "cargo tauri build".to_string(),
        format!("--target {}", rust_target),
    ];

    if optimize {
        parts.push("--release".to_string());
    }

    for format in bundle_formats {
        parts.push(format!("--bundles {}", format));
    }

    parts.join(" ")
}
