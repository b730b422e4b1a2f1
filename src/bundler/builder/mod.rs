//! Target builds, artifact collection and multi-target orchestration.
//!
//! This module provides the [`Orchestrator`] that fans a build request out over
//! every supported platform/architecture pair.
//!
//! # Overview
//!
//! For each target the orchestrator:
//! 1. Builds the target's execution image
//! 2. Runs the composed build command in a container
//! 3. Copies the produced bundles into the output tree
//! 4. Folds the typed [`BuildResult`] into one [`BuildReport`]
//!
//! # Module Organization
//!
//! - [`checksum`] - SHA256 checksum calculation and sidecar files
//! - [`command`] - In-container build command composition
//! - `artifact_store` - Output tree and artifact copying
//! - `target_builder` - One target end to end
//! - `orchestrator` - Bounded fan-out and aggregation

mod artifact_store;
pub mod checksum;
pub mod command;
mod orchestrator;
mod result;
mod target_builder;

pub use artifact_store::{Artifact, ArtifactStore};
pub use checksum::{calculate_sha256, sidecar_line, sidecar_path};
pub use command::{CONTAINER_WORKSPACE, compose_build_command};
pub use orchestrator::{DEFAULT_CONCURRENCY, DEFAULT_TARGET_TIMEOUT, Orchestrator, RunOutcome};
pub use result::{BuildReport, BuildResult, TargetFailure};
pub use target_builder::{SIGN_ENV, TargetBuilder};
