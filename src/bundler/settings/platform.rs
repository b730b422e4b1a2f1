//! Target platforms, bundle formats and the static compatibility table.

use super::Architecture;
use std::fmt;
use std::str::FromStr;

/// Operating system a build targets.
#[derive(
    Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, serde::Deserialize, serde::Serialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Microsoft Windows
    Windows,
    /// Apple macOS
    Macos,
    /// GNU/Linux
    Linux,
}

impl Platform {
    /// All platforms, in enumeration order.
    pub const ALL: [Platform; 3] = [Platform::Windows, Platform::Macos, Platform::Linux];

    /// Canonical lowercase name used in image tags, output paths and result keys.
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Windows => "windows",
            Platform::Macos => "macos",
            Platform::Linux => "linux",
        }
    }

    /// Static build profile for this platform.
    pub fn profile(self) -> &'static PlatformProfile {
        match self {
            Platform::Windows => &PROFILES[0],
            Platform::Macos => &PROFILES[1],
            Platform::Linux => &PROFILES[2],
        }
    }

    /// Toolchain triple for `arch` on this platform, if the pair is supported.
    pub fn rust_target(self, arch: Architecture) -> Option<&'static str> {
        self.profile()
            .targets
            .iter()
            .find(|(candidate, _)| *candidate == arch)
            .map(|(_, triple)| *triple)
    }

    /// Bundle formats the platform's toolchain can produce.
    pub fn bundle_formats(self) -> &'static [BundleFormat] {
        self.profile().bundle_formats
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "windows" | "win" => Ok(Platform::Windows),
            "macos" | "darwin" | "osx" => Ok(Platform::Macos),
            "linux" => Ok(Platform::Linux),
            other => Err(format!(
                "Unknown platform '{}'. Valid platforms: windows, macos, linux",
                other
            )),
        }
    }
}

/// Installer/bundle format understood by `cargo tauri build --bundles`.
#[derive(
    Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, serde::Deserialize, serde::Serialize,
)]
pub enum BundleFormat {
    /// Windows Installer package (WiX)
    #[serde(rename = "msi")]
    Msi,
    /// NSIS setup executable
    #[serde(rename = "nsis")]
    Nsis,
    /// Plain Windows executable
    #[serde(rename = "exe")]
    Exe,
    /// macOS disk image
    #[serde(rename = "dmg")]
    Dmg,
    /// macOS application bundle
    #[serde(rename = "app")]
    App,
    /// Debian package
    #[serde(rename = "deb")]
    Deb,
    /// AppImage bundle
    #[serde(rename = "AppImage", alias = "appimage")]
    AppImage,
    /// RPM package
    #[serde(rename = "rpm")]
    Rpm,
}

impl BundleFormat {
    /// Name passed to `--bundles` and used as the bundle output subdirectory.
    pub fn as_str(self) -> &'static str {
        match self {
            BundleFormat::Msi => "msi",
            BundleFormat::Nsis => "nsis",
            BundleFormat::Exe => "exe",
            BundleFormat::Dmg => "dmg",
            BundleFormat::App => "app",
            BundleFormat::Deb => "deb",
            BundleFormat::AppImage => "AppImage",
            BundleFormat::Rpm => "rpm",
        }
    }
}

impl fmt::Display for BundleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BundleFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "msi" => Ok(BundleFormat::Msi),
            "nsis" => Ok(BundleFormat::Nsis),
            "exe" => Ok(BundleFormat::Exe),
            "dmg" => Ok(BundleFormat::Dmg),
            "app" => Ok(BundleFormat::App),
            "deb" => Ok(BundleFormat::Deb),
            "appimage" => Ok(BundleFormat::AppImage),
            "rpm" => Ok(BundleFormat::Rpm),
            other => Err(format!("Unknown bundle format '{}'", other)),
        }
    }
}

/// Per-platform build profile: toolchain triples and producible bundle formats.
#[derive(Debug)]
pub struct PlatformProfile {
    /// Platform this profile describes
    pub platform: Platform,
    /// Supported architectures and their toolchain triples
    pub targets: &'static [(Architecture, &'static str)],
    /// Bundle formats in their canonical order
    pub bundle_formats: &'static [BundleFormat],
}

/// Compatibility table. A (platform, architecture) pair is buildable only if
/// it appears here.
static PROFILES: [PlatformProfile; 3] = [
    PlatformProfile {
        platform: Platform::Windows,
        targets: &[
            (Architecture::X64, "x86_64-pc-windows-msvc"),
            (Architecture::Arm64, "aarch64-pc-windows-msvc"),
        ],
        bundle_formats: &[BundleFormat::Msi, BundleFormat::Nsis, BundleFormat::Exe],
    },
    PlatformProfile {
        platform: Platform::Macos,
        targets: &[
            (Architecture::X64, "x86_64-apple-darwin"),
            (Architecture::Arm64, "aarch64-apple-darwin"),
        ],
        bundle_formats: &[BundleFormat::Dmg, BundleFormat::App],
    },
    PlatformProfile {
        platform: Platform::Linux,
        targets: &[
            (Architecture::X64, "x86_64-unknown-linux-gnu"),
            (Architecture::Arm64, "aarch64-unknown-linux-gnu"),
        ],
        bundle_formats: &[BundleFormat::Deb, BundleFormat::AppImage, BundleFormat::Rpm],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profiles_match_their_platform() {
        for platform in Platform::ALL {
            assert_eq!(platform.profile().platform, platform);
        }
    }

    #[test]
    fn triples_from_table() {
        assert_eq!(
            Platform::Linux.rust_target(Architecture::X64),
            Some("x86_64-unknown-linux-gnu")
        );
        assert_eq!(
            Platform::Macos.rust_target(Architecture::Arm64),
            Some("aarch64-apple-darwin")
        );
        assert_eq!(Platform::Macos.rust_target(Architecture::X86), None);
        assert_eq!(Platform::Windows.rust_target(Architecture::X86), None);
        assert_eq!(Platform::Linux.rust_target(Architecture::X86), None);
    }

    #[test]
    fn bundle_format_names() {
        assert_eq!("appimage".parse::<BundleFormat>(), Ok(BundleFormat::AppImage));
        assert_eq!(BundleFormat::AppImage.as_str(), "AppImage");
        assert!("zip".parse::<BundleFormat>().is_err());
        assert_eq!(
            Platform::Linux.bundle_formats(),
            &[BundleFormat::Deb, BundleFormat::AppImage, BundleFormat::Rpm]
        );
    }
}
