//! Application identity discovery from the project tree.
//!
//! Name comes from `src-tauri/tauri.conf.json` (`productName`, or the older
//! `package.productName`). Version comes from `package.json`, then from
//! `src-tauri/Cargo.toml`. Unreadable or malformed files are skipped with a
//! warning so a broken manifest never blocks a build that passes explicit
//! values.

use crate::bundler::AppIdentity;
use std::path::Path;

/// Name used when no manifest provides one.
pub const DEFAULT_APP_NAME: &str = "TauriApp";

/// Version used when no manifest provides one.
pub const DEFAULT_VERSION: &str = "1.0.0";

/// Name and version found in the project manifests.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ProjectMetadata {
    /// Product name from the Tauri config
    pub name: Option<String>,
    /// Version from package.json or src-tauri/Cargo.toml
    pub version: Option<String>,
}

impl ProjectMetadata {
    /// Reads the manifests under `workspace`.
    pub fn discover(workspace: &Path) -> Self {
        let name = read_json(&workspace.join("src-tauri").join("tauri.conf.json"))
            .and_then(|conf| product_name(&conf));

        let version = read_json(&workspace.join("package.json"))
            .and_then(|pkg| string_at(&pkg, &["version"]))
            .or_else(|| cargo_version(&workspace.join("src-tauri").join("Cargo.toml")));

        Self { name, version }
    }

    /// Resolves the identity: explicit values win, then manifests, then defaults.
    pub fn resolve(&self, name: Option<String>, version: Option<String>) -> AppIdentity {
        AppIdentity {
            name: name
                .or_else(|| self.name.clone())
                .unwrap_or_else(|| DEFAULT_APP_NAME.to_string()),
            version: version
                .or_else(|| self.version.clone())
                .unwrap_or_else(|| DEFAULT_VERSION.to_string()),
        }
    }
}

fn product_name(conf: &serde_json::Value) -> Option<String> {
    string_at(conf, &["productName"]).or_else(|| string_at(conf, &["package", "productName"]))
}

fn string_at(value: &serde_json::Value, path: &[&str]) -> Option<String> {
    path.iter()
        .try_fold(value, |v, key| v.get(key))
        .and_then(|v| v.as_str())
        .map(String::from)
}

fn read_json(path: &Path) -> Option<serde_json::Value> {
    let content = read_optional(path)?;
    match serde_json::from_str(&content) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Ignoring malformed {}: {}", path.display(), e);
            None
        }
    }
}

fn cargo_version(path: &Path) -> Option<String> {
    let content = read_optional(path)?;
    let manifest: toml::Value = match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("Ignoring malformed {}: {}", path.display(), e);
            return None;
        }
    };

    manifest
        .get("package")
        .and_then(|p| p.get("version"))
        .and_then(|v| v.as_str())
        .map(String::from)
}

fn read_optional(path: &Path) -> Option<String> {
    if !path.is_file() {
        return None;
    }
    match std::fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(e) => {
            log::warn!("Failed to read {}: {}", path.display(), e);
            None
        }
    }
}
