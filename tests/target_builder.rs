mod common;

use common::{FakeRuntime, RecordingReporter};
use std::path::Path;
use std::sync::Arc;
use tauridock::bundler::{
    Architecture, BuildConfigBuilder, BuildResult, BuildTarget, BundleFormat, Platform,
    TargetBuilder,
};

fn linux_x64() -> BuildTarget {
    BuildTarget::new(Platform::Linux, Architecture::X64).unwrap()
}

fn builder(workspace: &Path, runtime: Arc<FakeRuntime>) -> TargetBuilder {
    let config = BuildConfigBuilder::new()
        .dockerfile(workspace.join("Dockerfile"))
        .workspace(workspace)
        .output_dir(workspace.join("dist"))
        .platforms(vec![Platform::Linux])
        .bundle_types(Platform::Linux, vec![BundleFormat::Deb])
        .optimize(true)
        .build()
        .unwrap();
    TargetBuilder::new(
        Arc::new(config),
        runtime,
        Arc::new(RecordingReporter::new()),
    )
}

#[tokio::test]
async fn linux_deb_release_build_runs_expected_command() {
    let dir = tempfile::tempdir().unwrap();
    let runtime = Arc::new(FakeRuntime::new());

    builder(dir.path(), runtime.clone()).build(linux_x64()).await;

    let runs = runtime.runs();
    assert_eq!(runs.len(), 1);
    let run = &runs[0];
    assert_eq!(run.image, "fake-linux-x64");

    let command = &run.command;
    let steps = [
        "cd /app",
        "npm install",
        "npm run build",
        "rustup target add x86_64-unknown-linux-gnu",
        "cargo tauri build --target x86_64-unknown-linux-gnu",
        "--release",
        "--bundles deb",
    ];
    let mut last = 0;
    for step in steps {
        let at = command[last..]
            .find(step)
            .unwrap_or_else(|| panic!("'{}' missing or out of order in '{}'", step, command));
        last += at + step.len();
    }
    assert_eq!(command.matches("--bundles").count(), 1);

    assert_eq!(run.bindings.volumes[0].container, "/app");
    assert!(!run.bindings.volumes[0].read_only);
    assert!(run.bindings.environment.contains(&(
        "CARGO_TARGET_DIR".to_string(),
        "/app/target/linux-x64".to_string()
    )));
}

#[tokio::test]
async fn produced_files_are_collected_into_platform_dir() {
    let dir = tempfile::tempdir().unwrap();
    let runtime = Arc::new(
        FakeRuntime::new()
            .produces("linux-x64", BundleFormat::Deb, "app_1.0.0_amd64.deb")
            // not a configured format, never scanned
            .produces("linux-x64", BundleFormat::Rpm, "app-1.0.0.x86_64.rpm"),
    );

    let result = builder(dir.path(), runtime).build(linux_x64()).await;

    let (target, artifacts) = match result {
        BuildResult::Succeeded { target, artifacts } => (target, artifacts),
        other => panic!("expected success, got {:?}", other),
    };
    assert_eq!(target, linux_x64());
    assert_eq!(
        artifacts,
        vec![dir.path().join("dist/linux/app_1.0.0_amd64.deb")]
    );
    assert_eq!(
        std::fs::read_to_string(&artifacts[0]).unwrap(),
        "linux-x64 app_1.0.0_amd64.deb"
    );
}

#[tokio::test]
async fn nothing_produced_is_empty_success() {
    let dir = tempfile::tempdir().unwrap();
    let result = builder(dir.path(), Arc::new(FakeRuntime::new()))
        .build(linux_x64())
        .await;

    assert_eq!(
        result,
        BuildResult::Succeeded {
            target: linux_x64(),
            artifacts: vec![],
        }
    );
}

#[tokio::test]
async fn non_zero_exit_is_failed_result_without_collection() {
    let dir = tempfile::tempdir().unwrap();
    let runtime = Arc::new(
        FakeRuntime::new()
            .exit_code("linux-x64", 2)
            .produces("linux-x64", BundleFormat::Deb, "partial.deb"),
    );

    let result = builder(dir.path(), runtime).build(linux_x64()).await;

    assert!(!result.is_success());
    let BuildResult::Failed(failure) = result else {
        unreachable!()
    };
    assert_eq!(failure.target, linux_x64());
    assert!(failure.error.contains("exit code 2"));
    assert!(!dir.path().join("dist/linux/partial.deb").exists());
}

#[tokio::test]
async fn platform_without_bundle_types_collects_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let windows = BuildTarget::new(Platform::Windows, Architecture::X64).unwrap();
    let runtime = Arc::new(FakeRuntime::new().produces(
        "windows-x64",
        BundleFormat::Nsis,
        "app_1.0.0_x64-setup.exe",
    ));

    let result = builder(dir.path(), runtime.clone()).build(windows).await;

    assert_eq!(
        result,
        BuildResult::Succeeded {
            target: windows,
            artifacts: vec![],
        }
    );
    assert!(!runtime.runs()[0].command.contains("--bundles"));
    assert!(!dir.path().join("dist/windows").exists());
}
