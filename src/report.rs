//! Progress reporting.
//!
//! Components never print directly; they receive a [`Reporter`] and describe
//! what happens through it. The command line supplies a styled console
//! implementation, tests supply recording or silent ones.

use crate::bundler::BuildTarget;
use std::fmt;

/// Lifecycle of one target's build.
///
/// `Pending → ImageBuilding → CommandRunning → Collecting → {Succeeded | Failed}`.
/// A target may jump to `Failed` from any non-terminal state.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TargetState {
    /// Queued, waiting for a worker slot
    Pending,
    /// Building the execution image
    ImageBuilding,
    /// Running the build command in a container
    CommandRunning,
    /// Copying produced files into the output tree
    Collecting,
    /// Finished with an artifact set
    Succeeded,
    /// Finished with an error
    Failed,
}

impl fmt::Display for TargetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TargetState::Pending => "pending",
            TargetState::ImageBuilding => "building image",
            TargetState::CommandRunning => "running build",
            TargetState::Collecting => "collecting artifacts",
            TargetState::Succeeded => "succeeded",
            TargetState::Failed => "failed",
        })
    }
}

/// Observer for user-facing progress.
pub trait Reporter: Send + Sync {
    /// Normal progress message
    fn info(&self, message: &str);

    /// Detail only shown in verbose mode
    fn verbose(&self, message: &str);

    /// Non-fatal problem
    fn warn(&self, message: &str);

    /// Failure message
    fn error(&self, message: &str);

    /// Completed step
    fn success(&self, message: &str);

    /// One line of output from a docker process.
    fn process_output(&self, line: &str) {
        self.verbose(line);
    }

    /// A target moved to `state`.
    fn target_state(&self, target: BuildTarget, state: TargetState) {
        self.verbose(&format!("[{}] {}", target, state));
    }

    /// `uploaded` of `total` artifacts are on the release; `name` was the last one.
    fn upload_progress(&self, uploaded: usize, total: usize, name: &str) {
        self.info(&format!("Uploaded {}/{}: {}", uploaded, total, name));
    }
}

/// Reporter that discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentReporter;

impl Reporter for SilentReporter {
    fn info(&self, _message: &str) {}
    fn verbose(&self, _message: &str) {}
    fn warn(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
    fn success(&self, _message: &str) {}
}
