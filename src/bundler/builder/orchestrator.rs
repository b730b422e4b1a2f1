//! Multi-target build orchestration.
//!
//! This module provides the [`Orchestrator`] that fans one build request out
//! over every supported platform/architecture pair, bounds how many targets
//! build at once, and aggregates the per-target results.

use super::result::{BuildReport, BuildResult};
use super::target_builder::TargetBuilder;
use crate::bundler::{
    Architecture, BuildConfig, BuildTarget, Mode, Platform, enumerate_targets, unsupported_pairs,
};
use crate::docker::ContainerRuntime;
use crate::error::{Result, TauridockError};
use crate::release::{ReleaseDescriptor, ReleasePublisher};
use crate::report::{Reporter, TargetState};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Semaphore, mpsc};

/// Number of targets built concurrently unless overridden.
pub const DEFAULT_CONCURRENCY: usize = 3;

/// Ceiling on one target's build, image included.
pub const DEFAULT_TARGET_TIMEOUT: Duration = Duration::from_secs(3600);

/// Slack added to every bounded receive on top of the target timeout.
const RECEIVE_GRACE: Duration = Duration::from_secs(30);

/// Terminal outcome of [`Orchestrator::run`].
#[derive(Debug)]
pub enum RunOutcome {
    /// The interactive dev session ended
    DevSessionEnded,
    /// Every target reached a terminal state
    Built(BuildReport),
    /// Targets were built and the aggregate was published
    Published {
        /// Aggregate the release was made from
        report: BuildReport,
        /// Release created on the host
        release: ReleaseDescriptor,
    },
}

impl RunOutcome {
    /// Build report, when the run built targets
    pub fn report(&self) -> Option<&BuildReport> {
        match self {
            RunOutcome::DevSessionEnded => None,
            RunOutcome::Built(report) | RunOutcome::Published { report, .. } => Some(report),
        }
    }
}

/// Drives a run from configuration to aggregate (and release).
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use tauridock::bundler::{BuildConfigBuilder, Orchestrator};
/// use tauridock::docker::{DockerRuntime, DockerSettings};
/// use tauridock::report::SilentReporter;
///
/// # async fn example() -> tauridock::Result<()> {
/// let config = Arc::new(BuildConfigBuilder::new().dockerfile("Dockerfile").build()?);
/// let reporter = Arc::new(SilentReporter);
/// let runtime = DockerRuntime::connect(DockerSettings::from_config(&config), reporter.clone()).await?;
///
/// let orchestrator = Orchestrator::new(config, Arc::new(runtime), None, reporter)?;
/// let report = orchestrator.build_all().await;
/// println!("{} artifact(s)", report.artifact_count());
/// # Ok(())
/// # }
/// ```
pub struct Orchestrator {
    config: Arc<BuildConfig>,
    runtime: Arc<dyn ContainerRuntime>,
    publisher: Option<ReleasePublisher>,
    reporter: Arc<dyn Reporter>,
    concurrency: usize,
    target_timeout: Duration,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("config", &self.config)
            .field("publisher", &self.publisher.as_ref().map(|_| "<ReleasePublisher>"))
            .field("concurrency", &self.concurrency)
            .field("target_timeout", &self.target_timeout)
            .finish()
    }
}

impl Orchestrator {
    /// Creates an orchestrator for `config`.
    ///
    /// # Errors
    ///
    /// [`TauridockError::Configuration`] when the mode is publish and no
    /// publisher was supplied.
    pub fn new(
        config: Arc<BuildConfig>,
        runtime: Arc<dyn ContainerRuntime>,
        publisher: Option<ReleasePublisher>,
        reporter: Arc<dyn Reporter>,
    ) -> Result<Self> {
        if config.mode() == Mode::Publish && publisher.is_none() {
            return Err(TauridockError::Configuration(
                "Publish mode requires release credentials".to_string(),
            ));
        }

        Ok(Self {
            config,
            runtime,
            publisher,
            reporter,
            concurrency: DEFAULT_CONCURRENCY,
            target_timeout: DEFAULT_TARGET_TIMEOUT,
        })
    }

    /// Sets how many targets may build at once (at least one).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Sets the per-target build ceiling.
    pub fn with_target_timeout(mut self, timeout: Duration) -> Self {
        self.target_timeout = timeout;
        self
    }

    /// Shared configuration
    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Supported targets of the request, in request order.
    pub fn planned_targets(&self) -> Vec<BuildTarget> {
        enumerate_targets(self.config.platforms(), self.config.architectures())
    }

    /// Executes the run for the configured mode.
    pub async fn run(&self) -> Result<RunOutcome> {
        match self.config.mode() {
            Mode::Dev => {
                self.run_dev().await?;
                Ok(RunOutcome::DevSessionEnded)
            }
            Mode::Build => Ok(RunOutcome::Built(self.build_all().await)),
            Mode::Publish => {
                let publisher = self.publisher.as_ref().ok_or_else(|| {
                    TauridockError::Configuration(
                        "Publish mode requires release credentials".to_string(),
                    )
                })?;

                let report = self.build_all().await;
                if report.artifact_count() == 0 {
                    self.reporter
                        .warn("No artifacts were produced; publishing an empty release");
                }
                let release = publisher.publish(&report).await?;
                Ok(RunOutcome::Published { report, release })
            }
        }
    }

    async fn run_dev(&self) -> Result<()> {
        let target = BuildTarget::new(Platform::Linux, Architecture::X64).ok_or_else(|| {
            TauridockError::Configuration("linux-x64 is missing from the platform table".into())
        })?;

        self.reporter.info("Starting development environment...");
        let image = self.runtime.build_image(target).await?;
        self.runtime
            .run_interactive(&image, self.config.workspace())
            .await
    }

    /// Builds every planned target and aggregates the results.
    ///
    /// At most `concurrency` targets are past [`TargetState::Pending`] at any
    /// time. A target that exceeds the timeout, panics, or never reports is
    /// recorded as a failure; the others are unaffected.
    pub async fn build_all(&self) -> BuildReport {
        let start = Instant::now();

        for (platform, architecture) in
            unsupported_pairs(self.config.platforms(), self.config.architectures())
        {
            self.reporter.verbose(&format!(
                "Skipping {}-{}: not a supported combination",
                platform, architecture
            ));
        }

        let targets = self.planned_targets();
        let mut report = BuildReport::new();
        if targets.is_empty() {
            self.reporter.warn("No supported targets to build");
            report.set_elapsed(start.elapsed());
            return report;
        }

        self.reporter.info(&format!(
            "Building {} target(s), {} at a time",
            targets.len(),
            self.concurrency
        ));

        let builder = TargetBuilder::new(
            self.config.clone(),
            self.runtime.clone(),
            self.reporter.clone(),
        );
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let (tx, mut rx) = mpsc::channel::<BuildResult>(targets.len());
        let mut handles = Vec::with_capacity(targets.len());

        for &target in &targets {
            self.reporter.target_state(target, TargetState::Pending);

            let semaphore = semaphore.clone();
            let builder = builder.clone();
            let reporter = self.reporter.clone();
            let tx = tx.clone();
            let timeout = self.target_timeout;

            handles.push(tokio::spawn(async move {
                let result = match semaphore.acquire_owned().await {
                    Ok(_permit) => match tokio::time::timeout(timeout, builder.build(target)).await
                    {
                        Ok(result) => result,
                        Err(_) => {
                            reporter.target_state(target, TargetState::Failed);
                            reporter.error(&format!(
                                "Build for {} timed out after {}s",
                                target,
                                timeout.as_secs()
                            ));
                            BuildResult::failed(
                                target,
                                format!("timed out after {}s", timeout.as_secs()),
                            )
                        }
                    },
                    Err(_) => BuildResult::failed(target, "worker pool closed"),
                };
                // Receiver gone means the collector gave up; nothing to do
                let _ = tx.send(result).await;
            }));
        }
        drop(tx);

        // Some running target finishes within one timeout of any result, so
        // a bounded wait per receive cannot cut off a live build
        let receive_bound = self.target_timeout + RECEIVE_GRACE;
        loop {
            match tokio::time::timeout(receive_bound, rx.recv()).await {
                Ok(Some(result)) => report.record(result),
                Ok(None) => break,
                Err(_) => {
                    log::warn!("No build result within {:?}; giving up", receive_bound);
                    break;
                }
            }
        }

        for handle in &handles {
            handle.abort();
        }

        for &target in &targets {
            if !report.contains(target) {
                self.reporter.target_state(target, TargetState::Failed);
                self.reporter
                    .error(&format!("Build for {} did not report a result", target));
                report.record(BuildResult::failed(target, "did not report a result"));
            }
        }

        for failure in report.failures() {
            log::debug!("{} failed: {}", failure.target, failure.error);
        }

        report.set_elapsed(start.elapsed());
        self.reporter.info(&format!(
            "Build phase finished in {:.1}s: {} succeeded, {} failed",
            report.elapsed().as_secs_f64(),
            report.artifacts().len(),
            report.failures().len()
        ));
        report
    }
}
