//! Result table and release panel.

use crate::bundler::{Artifact, BuildReport};
use crate::release::ReleaseDescriptor;
use console::{Alignment, measure_text_width, pad_str, style};
use std::path::Path;

const HEADERS: [&str; 4] = ["Platform", "Architecture", "Artifacts", "Size"];

/// Formats a byte count with two decimals in B, KB, MB, GB or TB.
///
/// # Examples
///
/// ```
/// use tauridock::cli::format_size;
///
/// assert_eq!(format_size(512), "512.00 B");
/// assert_eq!(format_size(1536), "1.50 KB");
/// ```
pub fn format_size(bytes: u64) -> String {
    let mut size = bytes as f64;
    for unit in ["B", "KB", "MB", "GB"] {
        if size < 1024.0 {
            return format!("{:.2} {}", size, unit);
        }
        size /= 1024.0;
    }
    format!("{:.2} TB", size)
}

/// One artifact line and the bytes it adds to the total.
///
/// An artifact that can no longer be read is listed with the error and
/// counts nothing.
async fn artifact_line(path: &Path) -> (String, u64) {
    match Artifact::inspect(path).await {
        Ok(artifact) => (
            format!("• {} ({})", artifact.file_name(), format_size(artifact.size)),
            artifact.size,
        ),
        Err(e) => {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            log::warn!("Cannot read artifact {}: {}", path.display(), e);
            (format!("• {} (unavailable: {})", name, e), 0)
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Renders the "Build Results" table: one row block per target with an
/// artifact line per file, followed by the failed targets.
pub async fn render_build_results(report: &BuildReport) -> String {
    let mut rows: Vec<[String; 4]> = Vec::new();
    for (target, files) in report.artifacts() {
        let mut total = 0;
        let mut lines = Vec::with_capacity(files.len());
        for file in files {
            let (line, size) = artifact_line(file).await;
            total += size;
            lines.push(line);
        }
        let mut lines = lines.into_iter();

        rows.push([
            capitalize(target.platform().as_str()),
            target.architecture().as_str().to_uppercase(),
            lines.next().unwrap_or_else(|| "-".to_string()),
            format_size(total),
        ]);
        for line in lines {
            rows.push([String::new(), String::new(), line, String::new()]);
        }
    }

    let mut widths = HEADERS.map(measure_text_width);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(measure_text_width(cell));
        }
    }

    let format_row = |cells: [&str; 4]| -> String {
        cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| pad_str(cell, width, Alignment::Left, None).into_owned())
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    out.push_str(&style("Build Results").bold().to_string());
    out.push('\n');
    out.push_str(&style(format_row(HEADERS)).bold().to_string());
    out.push('\n');
    for row in &rows {
        out.push_str(&format_row([&row[0], &row[1], &row[2], &row[3]]));
        out.push('\n');
    }

    if !report.failures().is_empty() {
        out.push('\n');
        out.push_str(&style("Failed targets").red().bold().to_string());
        out.push('\n');
        for failure in report.failures() {
            out.push_str(&format!("  {}: {}\n", failure.target, failure.error));
        }
    }

    out
}

/// Renders the published-release panel.
pub async fn render_release_panel(release: &ReleaseDescriptor, report: &BuildReport) -> String {
    let mut total = 0;
    for file in report.artifacts().values().flatten() {
        if let Ok(artifact) = Artifact::inspect(file).await {
            total += artifact.size;
        }
    }

    format!(
        "{}\n  Release published successfully!\n  Tag: {}\n  URL: {}\n  Total size: {}\n",
        style("GitHub Release").bold(),
        release.tag,
        style(&release.url).cyan(),
        format_size(total)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::{Architecture, BuildResult, BuildTarget, Platform};

    #[test]
    fn size_units() {
        assert_eq!(format_size(0), "0.00 B");
        assert_eq!(format_size(1023), "1023.00 B");
        assert_eq!(format_size(1024), "1.00 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.00 MB");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024), "3.00 GB");
        assert_eq!(format_size(2 * 1024u64.pow(4)), "2.00 TB");
    }

    #[tokio::test]
    async fn table_lists_artifacts_and_failures() {
        console::set_colors_enabled(false);

        let dir = tempfile::tempdir().unwrap();
        let deb = dir.path().join("app.deb");
        std::fs::write(&deb, vec![0u8; 2048]).unwrap();

        let mut report = BuildReport::new();
        report.record(BuildResult::Succeeded {
            target: BuildTarget::new(Platform::Linux, Architecture::X64).unwrap(),
            artifacts: vec![deb],
        });
        report.record(BuildResult::failed(
            BuildTarget::new(Platform::Windows, Architecture::X64).unwrap(),
            "Build failed for windows-x64 with exit code 101",
        ));

        let table = render_build_results(&report).await;
        assert!(table.contains("Linux"));
        assert!(table.contains("X64"));
        assert!(table.contains("• app.deb (2.00 KB)"));
        assert!(table.contains("windows-x64: Build failed"));
    }

    #[tokio::test]
    async fn missing_artifact_is_flagged_not_sized() {
        console::set_colors_enabled(false);

        let dir = tempfile::tempdir().unwrap();
        let deb = dir.path().join("app.deb");
        std::fs::write(&deb, vec![0u8; 1024]).unwrap();
        let rpm = dir.path().join("app.rpm");

        let mut report = BuildReport::new();
        report.record(BuildResult::Succeeded {
            target: BuildTarget::new(Platform::Linux, Architecture::X64).unwrap(),
            artifacts: vec![deb, rpm],
        });

        let table = render_build_results(&report).await;
        assert!(table.contains("• app.deb (1.00 KB)"));
        assert!(table.contains("• app.rpm (unavailable:"));
        assert!(!table.contains("app.rpm (0.00 B)"));

        let release = ReleaseDescriptor {
            tag: "v1.0.0".into(),
            notes: String::new(),
            draft: false,
            prerelease: false,
            url: "https://github.com/acme/app/releases/tag/v1.0.0".into(),
            assets: vec![],
        };
        let panel = render_release_panel(&release, &report).await;
        assert!(panel.contains("Total size: 1.00 KB"));
    }
}
