//! Command line interface for tauridock.
//!
//! This module provides argument parsing, config-file merging, project
//! metadata discovery and the console presentation of a run.

mod args;
mod config_file;
mod env_file;
mod output;
mod summary;

pub use args::{Args, RuntimeConfig};
pub use config_file::{
    BundleTypesValue, DEFAULT_CONFIG_FILE, FileConfig, ListValue, parse_bundle_types,
};
pub use env_file::load_env_file;
pub use output::OutputManager;
pub use summary::{format_size, render_build_results, render_release_panel};

use crate::bundler::{Mode, Orchestrator, RunOutcome};
use crate::docker::{DockerRuntime, DockerSettings};
use crate::error::Result;
use crate::release::ReleasePublisher;
use crate::report::Reporter;
use console::style;
use std::sync::Arc;
use std::time::Instant;

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    let file = FileConfig::discover(args.config.as_deref(), &args.workspace_root())?;
    let runtime = args.resolve(file)?;
    execute(runtime).await
}

/// Runs a resolved configuration and prints its results.
///
/// Checks happen in order: release credentials, then the docker daemon. Both
/// are fatal and nothing is built when either fails.
pub async fn execute(runtime: RuntimeConfig) -> Result<i32> {
    let start = Instant::now();
    let output = OutputManager::new(runtime.debug, false);
    let reporter: Arc<dyn Reporter> = Arc::new(output);
    let config = Arc::new(runtime.build);

    println!(
        "{}\n{}",
        style(format!("tauridock v{}", env!("CARGO_PKG_VERSION")))
            .bold()
            .blue(),
        style("Multi-platform Tauri application builder").dim()
    );
    output.verbose(&format!("Configuration: {:?}", config));

    let publisher = match (config.mode(), config.release()) {
        (Mode::Publish, Some(settings)) => Some(ReleasePublisher::new(
            settings.clone(),
            config.app().clone(),
            reporter.clone(),
        )?),
        _ => None,
    };

    let docker =
        DockerRuntime::connect(DockerSettings::from_config(&config), reporter.clone()).await?;

    let mut orchestrator =
        Orchestrator::new(config.clone(), Arc::new(docker), publisher, reporter.clone())?;
    if let Some(jobs) = runtime.jobs {
        orchestrator = orchestrator.with_concurrency(jobs);
    }

    match config.mode() {
        Mode::Dev => output.section("Development mode"),
        Mode::Build | Mode::Publish => output.section(&format!(
            "Building {} {} for: {}",
            config.app().name,
            config.app().version,
            config
                .platforms()
                .iter()
                .map(|p| p.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )),
    }

    let outcome = orchestrator.run().await?;
    match &outcome {
        RunOutcome::DevSessionEnded => {}
        RunOutcome::Built(report) => {
            println!();
            print!("{}", render_build_results(report).await);
        }
        RunOutcome::Published { report, release } => {
            println!();
            print!("{}", render_build_results(report).await);
            println!();
            print!("{}", render_release_panel(release, report).await);
        }
    }

    output.success(&format!(
        "Completed in {:.2} seconds",
        start.elapsed().as_secs_f64()
    ));
    Ok(0)
}
