//! Configuration structures for build orchestration.
//!
//! This module provides the static platform compatibility table, validated
//! build targets, and the immutable [`BuildConfig`] snapshot with its builder.

mod arch;
mod builder;
mod config;
mod platform;
mod target;

// Re-export all public types
pub use arch::Architecture;
pub use builder::BuildConfigBuilder;
pub use config::{
    AppIdentity, BuildConfig, DEFAULT_BASE_IMAGE, DEFAULT_FRONTEND_PORT, DevOptions, Mode,
    ReleaseSettings, RepositorySlug, TAURI_DEV_PORT,
};
pub use platform::{BundleFormat, Platform, PlatformProfile};
pub use target::{BuildTarget, enumerate_targets, unsupported_pairs};
