//! Per-target outcomes and the aggregate report.

use crate::bundler::BuildTarget;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

/// Why a target produced no artifacts.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TargetFailure {
    /// Target that failed
    pub target: BuildTarget,
    /// Human-readable error description
    pub error: String,
}

/// Outcome of one target's build.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BuildResult {
    /// The build ran to completion; `artifacts` may be empty when the bundle
    /// directories held nothing.
    Succeeded {
        /// Target that was built
        target: BuildTarget,
        /// Collected artifact paths in the output tree
        artifacts: Vec<PathBuf>,
    },
    /// The build failed at some stage.
    Failed(TargetFailure),
}

impl BuildResult {
    /// Failed result for `target`.
    pub fn failed(target: BuildTarget, error: impl Into<String>) -> Self {
        BuildResult::Failed(TargetFailure {
            target,
            error: error.into(),
        })
    }

    /// Target this result belongs to
    pub fn target(&self) -> BuildTarget {
        match self {
            BuildResult::Succeeded { target, .. } => *target,
            BuildResult::Failed(failure) => failure.target,
        }
    }

    /// Whether the build succeeded
    pub fn is_success(&self) -> bool {
        matches!(self, BuildResult::Succeeded { .. })
    }
}

/// Aggregate of a build run.
///
/// Holds at most one artifact entry per target. Failed targets are absent
/// from the artifact map and listed in [`failures`](Self::failures) instead.
#[derive(Clone, Debug, Default)]
pub struct BuildReport {
    artifacts: BTreeMap<BuildTarget, Vec<PathBuf>>,
    failures: Vec<TargetFailure>,
    elapsed: Duration,
}

impl BuildReport {
    /// Creates an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one terminal result into the report.
    ///
    /// A later result for a target that is already recorded replaces the
    /// earlier one.
    pub fn record(&mut self, result: BuildResult) {
        let target = result.target();
        self.artifacts.remove(&target);
        self.failures.retain(|f| f.target != target);
        match result {
            BuildResult::Succeeded { target, artifacts } => {
                self.artifacts.insert(target, artifacts);
            }
            BuildResult::Failed(failure) => self.failures.push(failure),
        }
    }

    /// Sets the wall-clock duration of the build phase.
    pub fn set_elapsed(&mut self, elapsed: Duration) {
        self.elapsed = elapsed;
    }

    /// Wall-clock duration of the build phase
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Artifact map, ordered by target
    pub fn artifacts(&self) -> &BTreeMap<BuildTarget, Vec<PathBuf>> {
        &self.artifacts
    }

    /// Artifacts recorded under `key` (`<platform>-<architecture>`)
    pub fn get(&self, key: &str) -> Option<&[PathBuf]> {
        let target: BuildTarget = key.parse().ok()?;
        self.artifacts.get(&target).map(Vec::as_slice)
    }

    /// Targets that failed, in completion order
    pub fn failures(&self) -> &[TargetFailure] {
        &self.failures
    }

    /// Whether `target` has reached a terminal state in this report
    pub fn contains(&self, target: BuildTarget) -> bool {
        self.artifacts.contains_key(&target) || self.failures.iter().any(|f| f.target == target)
    }

    /// Number of artifacts over all targets
    pub fn artifact_count(&self) -> usize {
        self.artifacts.values().map(Vec::len).sum()
    }

    /// Whether no target failed
    pub fn is_complete_success(&self) -> bool {
        self.failures.is_empty()
    }
}
