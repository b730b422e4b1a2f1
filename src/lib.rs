//! Multi-platform Tauri application builder
//!
//! This library provides the build orchestration engine behind the
//! `tauridock` command:
//! - Per-target builds inside Docker containers (Windows, macOS, Linux)
//! - Bounded concurrency, per-target timeouts and partial-failure aggregation
//! - Artifact collection with SHA-256 checksum sidecars
//! - GitHub release publishing
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod bundler;
pub mod cli;
pub mod docker;
pub mod error;
pub mod metadata;
pub mod release;
pub mod report;

// Re-export commonly used types
pub use error::{CliError, Result, TauridockError};
