//! Docker image management for target builds.
//!
//! Handles daemon availability checks and building the per-target execution
//! images from the project's Dockerfile.

mod availability;
mod builder;
mod config;

// Re-export public API
pub use availability::check_docker_available;
pub use builder::{ImageBuildRequest, build_docker_image, docker_build_args};
pub use config::{DEFAULT_IMAGE_PREFIX, image_prefix, image_tag};
