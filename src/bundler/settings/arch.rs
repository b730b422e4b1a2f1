//! CPU architecture types and utilities.

use std::fmt;
use std::str::FromStr;

/// CPU architecture a target is built for.
///
/// Not every architecture is available on every platform; the compatibility
/// table in [`super::platform`] decides which pairs are buildable.
///
/// # Examples
///
/// ```
/// use tauridock::bundler::Architecture;
///
/// let arch: Architecture = "arm64".parse().unwrap();
/// assert_eq!(arch, Architecture::Arm64);
/// assert_eq!(arch.to_string(), "arm64");
/// ```
#[derive(
    Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, serde::Deserialize, serde::Serialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Architecture {
    /// x86_64 / AMD64 (64-bit)
    X64,
    /// AArch64 / ARM64 (64-bit) - Apple Silicon, modern ARM devices
    Arm64,
    /// x86 / i686 (32-bit) - accepted in requests, never in the target table
    X86,
}

impl Architecture {
    /// All known architectures, in enumeration order.
    pub const ALL: [Architecture; 3] = [Architecture::X64, Architecture::Arm64, Architecture::X86];

    /// Canonical lowercase name used in image tags and result keys.
    pub fn as_str(self) -> &'static str {
        match self {
            Architecture::X64 => "x64",
            Architecture::Arm64 => "arm64",
            Architecture::X86 => "x86",
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Architecture {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "x64" | "x86_64" | "amd64" => Ok(Architecture::X64),
            "arm64" | "aarch64" => Ok(Architecture::Arm64),
            "x86" | "i686" | "ia32" => Ok(Architecture::X86),
            other => Err(format!(
                "Unknown architecture '{}'. Valid architectures: x64, arm64, x86",
                other
            )),
        }
    }
}
