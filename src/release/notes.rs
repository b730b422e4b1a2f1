//! Release notes: a supplied file verbatim, or a rendered default.

use crate::bundler::{AppIdentity, BuildReport};
use crate::error::{Result, TauridockError};
use handlebars::Handlebars;
use std::path::Path;

const NOTES_TEMPLATE: &str = "\
# Release {{tag}}

{{app_name}} {{version}}

## What's New
- Built with tauridock
- Supports multiple platforms and architectures
{{#if targets}}

## Targets
{{#each targets}}
- {{this}}
{{/each}}
{{/if}}

## Downloads
Choose the appropriate installer for your system below.

## Checksums
SHA256 checksums are provided for each file.
";

/// Resolves the notes body of a release.
///
/// An existing `notes_path` is used verbatim. Otherwise the default template
/// is rendered with the tag, app identity and the targets that produced
/// artifacts.
pub async fn release_notes(
    notes_path: Option<&Path>,
    tag: &str,
    app: &AppIdentity,
    report: &BuildReport,
) -> Result<String> {
    if let Some(path) = notes_path {
        if path.is_file() {
            return Ok(tokio::fs::read_to_string(path).await?);
        }
        log::warn!(
            "Release notes file {} not found, using default notes",
            path.display()
        );
    }

    render_default_notes(tag, app, report)
}

/// Renders the default notes template.
pub fn render_default_notes(tag: &str, app: &AppIdentity, report: &BuildReport) -> Result<String> {
    let mut handlebars = Handlebars::new();
    handlebars.register_escape_fn(handlebars::no_escape);

    let targets: Vec<String> = report
        .artifacts()
        .iter()
        .filter(|(_, files)| !files.is_empty())
        .map(|(target, _)| target.key())
        .collect();

    let data = serde_json::json!({
        "tag": tag,
        "app_name": app.name,
        "version": app.version,
        "targets": targets,
    });

    handlebars
        .register_template_string("notes", NOTES_TEMPLATE)
        .map_err(|e| TauridockError::Publish(format!("failed to register notes template: {}", e)))?;

    handlebars
        .render("notes", &data)
        .map_err(|e| TauridockError::Publish(format!("failed to render release notes: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::{Architecture, BuildResult, BuildTarget, Platform};
    use std::path::PathBuf;

    fn app() -> AppIdentity {
        AppIdentity {
            name: "Demo".into(),
            version: "2.1.0".into(),
        }
    }

    #[test]
    fn default_notes_list_targets_with_artifacts() {
        let mut report = BuildReport::new();
        report.record(BuildResult::Succeeded {
            target: BuildTarget::new(Platform::Linux, Architecture::X64).unwrap(),
            artifacts: vec![PathBuf::from("dist/linux/demo.deb")],
        });
        report.record(BuildResult::Succeeded {
            target: BuildTarget::new(Platform::Macos, Architecture::Arm64).unwrap(),
            artifacts: vec![],
        });

        let notes = render_default_notes("v2.1.0", &app(), &report).unwrap();
        assert!(notes.starts_with("# Release v2.1.0"));
        assert!(notes.contains("Demo 2.1.0"));
        assert!(notes.contains("- linux-x64"));
        assert!(!notes.contains("macos-arm64"));
        assert!(notes.contains("SHA256 checksums"));
    }

    #[tokio::test]
    async fn notes_file_is_used_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("NOTES.md");
        std::fs::write(&path, "Hand-written <notes> & more").unwrap();

        let notes = release_notes(Some(&path), "v1", &app(), &BuildReport::new())
            .await
            .unwrap();
        assert_eq!(notes, "Hand-written <notes> & more");
    }

    #[tokio::test]
    async fn missing_notes_file_falls_back_to_default() {
        let notes = release_notes(
            Some(Path::new("/nonexistent/NOTES.md")),
            "v1",
            &app(),
            &BuildReport::new(),
        )
        .await
        .unwrap();
        assert!(notes.starts_with("# Release v1"));
    }
}
