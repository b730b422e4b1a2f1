//! Build targets: validated (platform, architecture) pairs.

use super::{Architecture, Platform};
use std::fmt;
use std::str::FromStr;

/// A buildable (platform, architecture) pair.
///
/// Only obtainable through the compatibility table, so every value carries a
/// resolved toolchain triple.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct BuildTarget {
    platform: Platform,
    architecture: Architecture,
    rust_target: &'static str,
}

impl BuildTarget {
    /// Looks the pair up in the compatibility table.
    ///
    /// Returns `None` for pairs the table does not list (e.g. `linux`/`x86`).
    pub fn new(platform: Platform, architecture: Architecture) -> Option<Self> {
        platform.rust_target(architecture).map(|rust_target| Self {
            platform,
            architecture,
            rust_target,
        })
    }

    /// Target platform
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Target architecture
    pub fn architecture(&self) -> Architecture {
        self.architecture
    }

    /// Rust toolchain triple, e.g. `x86_64-unknown-linux-gnu`
    pub fn rust_target(&self) -> &'static str {
        self.rust_target
    }

    /// Result key, `<platform>-<architecture>`
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for BuildTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.platform, self.architecture)
    }
}

impl FromStr for BuildTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (platform, arch) = s
            .split_once('-')
            .ok_or_else(|| format!("Expected <platform>-<architecture>, got '{}'", s))?;
        let platform: Platform = platform.parse()?;
        let arch: Architecture = arch.parse()?;
        BuildTarget::new(platform, arch)
            .ok_or_else(|| format!("{}-{} is not a supported target", platform, arch))
    }
}

/// Expands `platforms × architectures` into buildable targets.
///
/// Pairs missing from the compatibility table are dropped, and the rest keep
/// the platform-major order of the request with duplicates removed.
pub fn enumerate_targets(platforms: &[Platform], architectures: &[Architecture]) -> Vec<BuildTarget> {
    let mut targets = Vec::new();
    for &platform in platforms {
        for &arch in architectures {
            if let Some(target) = BuildTarget::new(platform, arch)
                && !targets.contains(&target)
            {
                targets.push(target);
            }
        }
    }
    targets
}

/// Pairs of the request that the compatibility table rejects.
pub fn unsupported_pairs(
    platforms: &[Platform],
    architectures: &[Architecture],
) -> Vec<(Platform, Architecture)> {
    platforms
        .iter()
        .flat_map(|&p| architectures.iter().map(move |&a| (p, a)))
        .filter(|&(p, a)| p.rust_target(a).is_none())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_table_pair_is_constructible() {
        for platform in Platform::ALL {
            for (arch, triple) in platform.profile().targets {
                let target = BuildTarget::new(platform, *arch).expect("pair from table");
                assert_eq!(target.rust_target(), *triple);
            }
        }
    }

    #[test]
    fn key_round_trips_through_from_str() {
        let target = BuildTarget::new(Platform::Windows, Architecture::Arm64).unwrap();
        assert_eq!(target.key(), "windows-arm64");
        assert_eq!("windows-arm64".parse::<BuildTarget>(), Ok(target));
        assert!("macos-x86".parse::<BuildTarget>().is_err());
    }

    #[test]
    fn enumeration_skips_pairs_outside_table() {
        let targets = enumerate_targets(
            &[Platform::Macos, Platform::Linux],
            &[Architecture::X64, Architecture::X86],
        );
        let keys: Vec<String> = targets.iter().map(BuildTarget::key).collect();
        assert_eq!(keys, ["macos-x64", "linux-x64"]);
        assert_eq!(
            unsupported_pairs(&[Platform::Macos], &[Architecture::X86]),
            vec![(Platform::Macos, Architecture::X86)]
        );
    }

    #[test]
    fn x86_requests_build_nothing() {
        assert!(enumerate_targets(&Platform::ALL, &[Architecture::X86]).is_empty());
        assert_eq!(
            unsupported_pairs(&Platform::ALL, &[Architecture::X86]).len(),
            Platform::ALL.len()
        );
    }

    #[test]
    fn enumeration_deduplicates() {
        let targets = enumerate_targets(
            &[Platform::Linux, Platform::Linux],
            &[Architecture::X64],
        );
        assert_eq!(targets.len(), 1);
    }
}
