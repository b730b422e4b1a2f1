mod common;

use common::{FakeReleaseHost, FakeRuntime, RecordingReporter};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tauridock::bundler::{
    Architecture, BuildConfig, BuildConfigBuilder, BuildTarget, BundleFormat, Mode, Orchestrator,
    Platform, RunOutcome,
};
use tauridock::release::ReleasePublisher;
use tauridock::report::TargetState;
use tauridock::TauridockError;

fn config(
    workspace: &Path,
    mode: Mode,
    platforms: Vec<Platform>,
    architectures: Vec<Architecture>,
) -> Arc<BuildConfig> {
    Arc::new(
        BuildConfigBuilder::new()
            .dockerfile(workspace.join("Dockerfile"))
            .workspace(workspace)
            .output_dir(workspace.join("dist"))
            .mode(mode)
            .platforms(platforms)
            .architectures(architectures)
            .github_token(Some("token".into()))
            .github_repo(Some("acme/app".into()))
            .bundle_types(Platform::Windows, vec![BundleFormat::Nsis])
            .bundle_types(Platform::Macos, vec![BundleFormat::Dmg])
            .bundle_types(Platform::Linux, vec![BundleFormat::Deb, BundleFormat::Rpm])
            .build()
            .unwrap(),
    )
}

fn target(platform: Platform, arch: Architecture) -> BuildTarget {
    BuildTarget::new(platform, arch).unwrap()
}

#[tokio::test]
async fn partial_failure_keeps_successful_targets() {
    let dir = tempfile::tempdir().unwrap();
    let runtime = Arc::new(
        FakeRuntime::new()
            .produces("linux-x64", BundleFormat::Deb, "app_1.0.0_amd64.deb")
            .produces("macos-x64", BundleFormat::Dmg, "app_1.0.0_x64.dmg")
            .exit_code("windows-x64", 101),
    );
    let reporter = Arc::new(RecordingReporter::new());
    let orchestrator = Orchestrator::new(
        config(dir.path(), Mode::Build, Platform::ALL.to_vec(), vec![Architecture::X64]),
        runtime.clone(),
        None,
        reporter.clone(),
    )
    .unwrap();

    let report = orchestrator.build_all().await;

    assert_eq!(report.artifacts().len(), 2);
    assert_eq!(
        report.get("linux-x64").unwrap(),
        &[dir.path().join("dist/linux/app_1.0.0_amd64.deb")][..]
    );
    assert!(report.get("macos-x64").is_some());
    assert!(report.get("windows-x64").is_none());

    assert_eq!(report.failures().len(), 1);
    let failure = &report.failures()[0];
    assert_eq!(failure.target, target(Platform::Windows, Architecture::X64));
    assert!(failure.error.contains("exit code 101"), "{}", failure.error);

    assert!(
        dir.path()
            .join("dist/linux/app_1.0.0_amd64.deb")
            .is_file()
    );
    assert_eq!(
        reporter.states_of(target(Platform::Windows, Architecture::X64)),
        vec![
            TargetState::Pending,
            TargetState::ImageBuilding,
            TargetState::CommandRunning,
            TargetState::Failed,
        ]
    );
    assert_eq!(
        reporter.states_of(target(Platform::Linux, Architecture::X64)),
        vec![
            TargetState::Pending,
            TargetState::ImageBuilding,
            TargetState::CommandRunning,
            TargetState::Collecting,
            TargetState::Succeeded,
        ]
    );
}

#[tokio::test]
async fn concurrency_bound_is_never_exceeded() {
    let dir = tempfile::tempdir().unwrap();
    let mut fake = FakeRuntime::new();
    for key in [
        "windows-x64",
        "windows-arm64",
        "macos-x64",
        "macos-arm64",
        "linux-x64",
        "linux-arm64",
    ] {
        fake = fake.delay(key, Duration::from_millis(80));
    }
    let runtime = Arc::new(fake);

    let orchestrator = Orchestrator::new(
        config(
            dir.path(),
            Mode::Build,
            Platform::ALL.to_vec(),
            Architecture::ALL.to_vec(),
        ),
        runtime.clone(),
        None,
        Arc::new(RecordingReporter::new()),
    )
    .unwrap()
    .with_concurrency(2);

    let report = orchestrator.build_all().await;

    assert_eq!(runtime.runs().len(), 6);
    assert_eq!(report.artifacts().len(), 6);
    assert!(runtime.max_active() <= 2, "max active {}", runtime.max_active());
    assert!(runtime.max_active() >= 1);
}

#[tokio::test]
async fn unsupported_pairs_are_skipped_silently() {
    let dir = tempfile::tempdir().unwrap();
    let runtime = Arc::new(FakeRuntime::new());
    let reporter = Arc::new(RecordingReporter::new());
    let orchestrator = Orchestrator::new(
        config(
            dir.path(),
            Mode::Build,
            vec![Platform::Macos, Platform::Linux],
            vec![Architecture::X86, Architecture::Arm64],
        ),
        runtime.clone(),
        None,
        reporter.clone(),
    )
    .unwrap();

    assert_eq!(
        orchestrator.planned_targets(),
        vec![
            target(Platform::Macos, Architecture::Arm64),
            target(Platform::Linux, Architecture::Arm64),
        ]
    );

    let report = orchestrator.build_all().await;

    let mut images = runtime.images();
    images.sort();
    assert_eq!(images, ["fake-linux-arm64", "fake-macos-arm64"]);
    assert!(report.get("linux-x86").is_none());
    assert!(report.failures().is_empty());
    assert!(report.get("macos-x86").is_none());
    assert!(reporter.messages_at("error").is_empty());
    assert!(
        reporter
            .messages_at("verbose")
            .iter()
            .any(|m| m.contains("macos-x86"))
    );
}

#[tokio::test]
async fn timed_out_target_becomes_failure() {
    let dir = tempfile::tempdir().unwrap();
    let runtime = Arc::new(
        FakeRuntime::new()
            .delay("linux-x64", Duration::from_secs(30))
            .produces("windows-x64", BundleFormat::Nsis, "setup.exe"),
    );
    let orchestrator = Orchestrator::new(
        config(
            dir.path(),
            Mode::Build,
            vec![Platform::Windows, Platform::Linux],
            vec![Architecture::X64],
        ),
        runtime.clone(),
        None,
        Arc::new(RecordingReporter::new()),
    )
    .unwrap()
    .with_target_timeout(Duration::from_millis(300));

    let started = std::time::Instant::now();
    let report = orchestrator.build_all().await;

    assert!(started.elapsed() < Duration::from_secs(10));
    assert_eq!(report.get("windows-x64").map(<[_]>::len), Some(1));
    assert_eq!(report.failures().len(), 1);
    assert_eq!(
        report.failures()[0].target,
        target(Platform::Linux, Architecture::X64)
    );
    assert!(report.failures()[0].error.contains("timed out"));
}

#[tokio::test]
async fn image_failure_does_not_abort_siblings() {
    let dir = tempfile::tempdir().unwrap();
    let runtime = Arc::new(
        FakeRuntime::new()
            .failing_image("macos-arm64")
            .produces("linux-arm64", BundleFormat::Rpm, "app.rpm"),
    );
    let orchestrator = Orchestrator::new(
        config(
            dir.path(),
            Mode::Build,
            vec![Platform::Macos, Platform::Linux],
            vec![Architecture::Arm64],
        ),
        runtime.clone(),
        None,
        Arc::new(RecordingReporter::new()),
    )
    .unwrap();

    let report = orchestrator.build_all().await;

    assert_eq!(report.artifact_count(), 1);
    assert_eq!(report.failures().len(), 1);
    assert!(report.failures()[0].error.contains("Failed to build image"));
    assert_eq!(runtime.runs().len(), 1);
}

#[tokio::test]
async fn dev_mode_runs_linux_session_on_workspace() {
    let dir = tempfile::tempdir().unwrap();
    let runtime = Arc::new(FakeRuntime::new());
    let config = config(dir.path(), Mode::Dev, Platform::ALL.to_vec(), vec![Architecture::X64]);
    let workspace = config.workspace().to_path_buf();
    let orchestrator =
        Orchestrator::new(config, runtime.clone(), None, Arc::new(RecordingReporter::new()))
            .unwrap();

    let outcome = orchestrator.run().await.unwrap();

    assert!(matches!(outcome, RunOutcome::DevSessionEnded));
    assert_eq!(runtime.images(), vec!["fake-linux-x64".to_string()]);
    assert_eq!(
        runtime.interactive_sessions(),
        vec![("fake-linux-x64".to_string(), workspace)]
    );
    assert!(runtime.runs().is_empty());
}

#[tokio::test]
async fn publish_mode_requires_a_publisher() {
    let dir = tempfile::tempdir().unwrap();
    let err = Orchestrator::new(
        config(dir.path(), Mode::Publish, vec![Platform::Linux], vec![Architecture::X64]),
        Arc::new(FakeRuntime::new()),
        None,
        Arc::new(RecordingReporter::new()),
    )
    .unwrap_err();

    assert!(matches!(err, TauridockError::Configuration(_)));
}

#[tokio::test]
async fn publish_mode_uploads_full_aggregate() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(
        dir.path(),
        Mode::Publish,
        vec![Platform::Windows, Platform::Linux],
        vec![Architecture::X64],
    );
    let runtime = Arc::new(
        FakeRuntime::new()
            .produces("linux-x64", BundleFormat::Deb, "app.deb")
            .exit_code("windows-x64", 1),
    );
    let reporter = Arc::new(RecordingReporter::new());
    let host = Arc::new(FakeReleaseHost::new());
    let publisher = ReleasePublisher::with_host(
        config.release().unwrap().clone(),
        config.app().clone(),
        host.clone(),
        reporter.clone(),
    )
    .unwrap();

    let orchestrator =
        Orchestrator::new(config, runtime, Some(publisher), reporter.clone()).unwrap();
    let outcome = orchestrator.run().await.unwrap();

    let RunOutcome::Published { report, release } = outcome else {
        panic!("expected a published outcome");
    };
    assert_eq!(report.failures().len(), 1);
    assert_eq!(release.tag, "v1.0.0");
    assert_eq!(release.assets.len(), 2);
    assert_eq!(host.requests.lock().unwrap().len(), 1);
}
