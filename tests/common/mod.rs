//! Fakes shared by the integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tauridock::bundler::{BuildTarget, BundleFormat};
use tauridock::docker::{ContainerRuntime, RunBindings, RunOutput};
use tauridock::release::{
    AssetUpload, CreatedRelease, ReleaseHost, ReleaseRequest, UploadedAsset,
};
use tauridock::report::{Reporter, TargetState};
use tauridock::{Result, TauridockError};

/// One recorded `run_command` call.
#[derive(Clone, Debug)]
pub struct RecordedRun {
    pub image: String,
    pub command: String,
    pub bindings: RunBindings,
}

/// Container runtime that never touches docker.
///
/// Images are tagged `fake-<platform>-<arch>`. A run sleeps for the target's
/// configured delay, drops the configured files into the bundle tree the
/// `CARGO_TARGET_DIR` binding points at, and exits with the configured code.
#[derive(Default)]
pub struct FakeRuntime {
    exit_codes: HashMap<String, i32>,
    delays: HashMap<String, Duration>,
    outputs: HashMap<String, Vec<(BundleFormat, String)>>,
    image_failures: HashSet<String>,
    active: AtomicUsize,
    max_active: AtomicUsize,
    runs: Mutex<Vec<RecordedRun>>,
    images: Mutex<Vec<String>>,
    interactive: Mutex<Vec<(String, PathBuf)>>,
}

impl FakeRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exit_code(mut self, target: &str, code: i32) -> Self {
        self.exit_codes.insert(target.to_string(), code);
        self
    }

    pub fn delay(mut self, target: &str, delay: Duration) -> Self {
        self.delays.insert(target.to_string(), delay);
        self
    }

    pub fn produces(mut self, target: &str, format: BundleFormat, file: &str) -> Self {
        self.outputs
            .entry(target.to_string())
            .or_default()
            .push((format, file.to_string()));
        self
    }

    pub fn failing_image(mut self, target: &str) -> Self {
        self.image_failures.insert(target.to_string());
        self
    }

    pub fn max_active(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }

    pub fn runs(&self) -> Vec<RecordedRun> {
        self.runs.lock().unwrap().clone()
    }

    pub fn images(&self) -> Vec<String> {
        self.images.lock().unwrap().clone()
    }

    pub fn interactive_sessions(&self) -> Vec<(String, PathBuf)> {
        self.interactive.lock().unwrap().clone()
    }

    fn target_dir_on_host(bindings: &RunBindings) -> PathBuf {
        let workspace = &bindings
            .volumes
            .iter()
            .find(|v| v.container == "/app")
            .expect("workspace mounted at /app")
            .host;
        let container_dir = &bindings
            .environment
            .iter()
            .find(|(k, _)| k == "CARGO_TARGET_DIR")
            .expect("CARGO_TARGET_DIR set")
            .1;
        workspace.join(container_dir.trim_start_matches("/app/"))
    }
}

#[async_trait::async_trait]
impl ContainerRuntime for FakeRuntime {
    async fn build_image(&self, target: BuildTarget) -> Result<String> {
        let tag = format!("fake-{}", target);
        self.images.lock().unwrap().push(tag.clone());
        if self.image_failures.contains(&target.key()) {
            return Err(TauridockError::ImageBuild {
                tag,
                reason: "docker build exited with 1".to_string(),
            });
        }
        Ok(tag)
    }

    async fn run_command(
        &self,
        image: &str,
        command: &str,
        bindings: &RunBindings,
    ) -> Result<RunOutput> {
        let key = image.trim_start_matches("fake-").to_string();
        let target: BuildTarget = key.parse().expect("fake image tag");

        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(now, Ordering::SeqCst);
        self.runs.lock().unwrap().push(RecordedRun {
            image: image.to_string(),
            command: command.to_string(),
            bindings: bindings.clone(),
        });

        tokio::time::sleep(
            self.delays
                .get(&key)
                .copied()
                .unwrap_or(Duration::from_millis(20)),
        )
        .await;

        let bundle_root = Self::target_dir_on_host(bindings)
            .join(target.rust_target())
            .join("release")
            .join("bundle");
        for (format, file) in self.outputs.get(&key).into_iter().flatten() {
            let dir = bundle_root.join(format.as_str());
            std::fs::create_dir_all(&dir).unwrap();
            std::fs::write(dir.join(file), format!("{} {}", key, file)).unwrap();
        }

        self.active.fetch_sub(1, Ordering::SeqCst);
        Ok(RunOutput {
            exit_code: self.exit_codes.get(&key).copied().unwrap_or(0),
            log: format!("built {}\n", key),
        })
    }

    async fn run_interactive(&self, image: &str, host_path: &Path) -> Result<()> {
        self.interactive
            .lock()
            .unwrap()
            .push((image.to_string(), host_path.to_path_buf()));
        Ok(())
    }
}

/// Reporter that keeps every event.
#[derive(Default)]
pub struct RecordingReporter {
    pub messages: Mutex<Vec<(String, String)>>,
    pub states: Mutex<Vec<(BuildTarget, TargetState)>>,
    pub uploads: Mutex<Vec<(usize, usize, String)>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, level: &str, message: &str) {
        self.messages
            .lock()
            .unwrap()
            .push((level.to_string(), message.to_string()));
    }

    pub fn messages_at(&self, level: &str) -> Vec<String> {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    pub fn states_of(&self, target: BuildTarget) -> Vec<TargetState> {
        self.states
            .lock()
            .unwrap()
            .iter()
            .filter(|(t, _)| *t == target)
            .map(|(_, s)| *s)
            .collect()
    }
}

impl Reporter for RecordingReporter {
    fn info(&self, message: &str) {
        self.push("info", message);
    }
    fn verbose(&self, message: &str) {
        self.push("verbose", message);
    }
    fn warn(&self, message: &str) {
        self.push("warn", message);
    }
    fn error(&self, message: &str) {
        self.push("error", message);
    }
    fn success(&self, message: &str) {
        self.push("success", message);
    }
    fn process_output(&self, line: &str) {
        self.push("process", line);
    }
    fn target_state(&self, target: BuildTarget, state: TargetState) {
        self.states.lock().unwrap().push((target, state));
    }
    fn upload_progress(&self, uploaded: usize, total: usize, name: &str) {
        self.uploads
            .lock()
            .unwrap()
            .push((uploaded, total, name.to_string()));
    }
}

/// Release host that records calls and can fail the n-th upload.
#[derive(Default)]
pub struct FakeReleaseHost {
    pub requests: Mutex<Vec<ReleaseRequest>>,
    pub uploads: Mutex<Vec<(AssetUpload, String)>>,
    fail_upload_at: Option<usize>,
}

impl FakeReleaseHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails the upload with this zero-based index.
    pub fn failing_upload(index: usize) -> Self {
        Self {
            fail_upload_at: Some(index),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len() + self.uploads.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl ReleaseHost for FakeReleaseHost {
    async fn create_release(&self, request: &ReleaseRequest) -> Result<CreatedRelease> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(CreatedRelease {
            id: 1,
            html_url: format!("https://github.com/acme/app/releases/tag/{}", request.tag),
            upload_url: "https://uploads.github.com/assets{?name,label}".to_string(),
        })
    }

    async fn upload_asset(
        &self,
        _release: &CreatedRelease,
        asset: &AssetUpload,
    ) -> Result<UploadedAsset> {
        let mut uploads = self.uploads.lock().unwrap();
        if self.fail_upload_at == Some(uploads.len()) {
            return Err(TauridockError::Publish(format!(
                "upload of {} rejected",
                asset.name
            )));
        }
        let content = std::fs::read_to_string(&asset.path).unwrap_or_default();
        uploads.push((asset.clone(), content));
        Ok(UploadedAsset {
            name: asset.name.clone(),
            url: format!("https://example.test/{}", asset.name),
        })
    }
}
