//! Error taxonomy for build orchestration and publishing.
//!
//! Per-target failures ([`TauridockError::ImageBuild`], [`TauridockError::BuildFailed`])
//! are recovered by the orchestrator as failed results. Fatal ones
//! ([`TauridockError::EnvironmentUnavailable`], [`TauridockError::Configuration`])
//! end the process before any work starts.

use crate::bundler::BuildTarget;
use thiserror::Error;

/// Result type alias for tauridock operations
pub type Result<T> = std::result::Result<T, TauridockError>;

/// Main error type for all tauridock operations
#[derive(Error, Debug)]
pub enum TauridockError {
    /// The container execution backend cannot be reached
    #[error("Container environment unavailable: {reason}")]
    EnvironmentUnavailable {
        /// Why the backend is unusable
        reason: String,
    },

    /// Building the execution image for a target failed
    #[error("Failed to build image {tag}: {reason}")]
    ImageBuild {
        /// Image tag that was being built
        tag: String,
        /// Reason for the error
        reason: String,
    },

    /// The in-container build exited with a non-zero status
    #[error("Build failed for {target} with exit code {exit_code}")]
    BuildFailed {
        /// Target whose build failed
        target: BuildTarget,
        /// Exit code reported by the container
        exit_code: i32,
    },

    /// Invalid or incomplete configuration (missing credentials, bad values)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Release creation or asset upload failed
    #[error("Publish error: {0}")]
    Publish(String),

    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML config errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// TOML parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// Missing required argument
    #[error("Missing required argument: {argument}")]
    MissingArgument {
        /// Argument name
        argument: String,
    },

    /// Command execution failed
    #[error("Command execution failed: {command} - {reason}")]
    ExecutionFailed {
        /// Command that failed
        command: String,
        /// Reason for the error
        reason: String,
    },
}

impl TauridockError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            Self::EnvironmentUnavailable { .. } => vec![
                "Start the Docker daemon and check `docker info`".to_string(),
                "Make sure the current user may access the Docker socket".to_string(),
            ],
            Self::ImageBuild { .. } => vec![
                "Check the Dockerfile and its build context".to_string(),
                "Re-run with --debug to see the full docker build output".to_string(),
            ],
            Self::BuildFailed { .. } => vec![
                "Re-run with --debug to see the container build log".to_string(),
            ],
            Self::Configuration(_) => vec![
                "Check the command line flags and the config file".to_string(),
                "Publishing needs --github-token (or GITHUB_TOKEN) and --github-repo owner/name"
                    .to_string(),
            ],
            Self::Publish(_) => vec![
                "The release may be partially populated; inspect it on GitHub before retrying"
                    .to_string(),
            ],
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }

    /// Fatal errors make the whole run meaningless and end the process.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::EnvironmentUnavailable { .. } | Self::Configuration(_)
        )
    }
}
