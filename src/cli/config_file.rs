//! Config file loading (YAML, TOML or JSON).

use crate::bundler::{Architecture, BundleFormat, Mode, Platform};
use crate::error::{Result, TauridockError};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Config file picked up from the workspace when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = ".tauridock.yml";

/// A list given either as a sequence or as a comma-separated string.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ListValue {
    /// `"windows,linux"`
    Csv(String),
    /// `["windows", "linux"]`
    Items(Vec<String>),
}

impl ListValue {
    /// Parses every element.
    pub fn parse<T: FromStr<Err = String>>(&self) -> Result<Vec<T>> {
        let items: Vec<&str> = match self {
            ListValue::Csv(s) => s.split(',').collect(),
            ListValue::Items(items) => items.iter().map(String::as_str).collect(),
        };
        items
            .into_iter()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<T>().map_err(TauridockError::Configuration))
            .collect()
    }
}

/// Bundle formats per platform, as a map or as a JSON string.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum BundleTypesValue {
    /// `{"linux": ["deb"]}` embedded as a string
    Json(String),
    /// Native map
    Map(BTreeMap<Platform, Vec<BundleFormat>>),
}

impl BundleTypesValue {
    /// Resolves to a per-platform selection.
    pub fn resolve(&self) -> Result<BTreeMap<Platform, Vec<BundleFormat>>> {
        match self {
            BundleTypesValue::Json(json) => parse_bundle_types(json),
            BundleTypesValue::Map(map) => Ok(map.clone()),
        }
    }
}

/// Parses `--bundle-types` JSON, e.g. `{"linux": ["deb", "AppImage"]}`.
pub fn parse_bundle_types(json: &str) -> Result<BTreeMap<Platform, Vec<BundleFormat>>> {
    serde_json::from_str(json)
        .map_err(|e| TauridockError::Configuration(format!("Invalid bundle types JSON: {}", e)))
}

/// Every option a config file may set. Unset keys keep CLI defaults.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub dockerfile: Option<PathBuf>,
    pub frontend_port: Option<u16>,
    pub mode: Option<Mode>,
    pub platforms: Option<ListValue>,
    #[serde(alias = "arch")]
    pub architectures: Option<ListValue>,
    pub app_name: Option<String>,
    pub version: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub optimize: Option<bool>,
    pub sign: Option<bool>,
    pub bundle_types: Option<BundleTypesValue>,
    pub hot_reload: Option<bool>,
    pub debug: Option<bool>,
    pub devtools: Option<bool>,
    pub watch: Option<bool>,
    pub env_file: Option<PathBuf>,
    pub docker_image: Option<String>,
    pub docker_cache: Option<bool>,
    pub github_token: Option<String>,
    pub github_repo: Option<String>,
    pub release_tag: Option<String>,
    pub release_notes: Option<PathBuf>,
    pub draft: Option<bool>,
    pub prerelease: Option<bool>,
    pub jobs: Option<usize>,
}

impl FileConfig {
    /// Loads `path`, choosing the format from its extension.
    ///
    /// `.toml` and `.json` are parsed as such; anything else is YAML.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            TauridockError::Configuration(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let config = match extension.as_deref() {
            Some("toml") => toml::from_str(&content)?,
            Some("json") => serde_json::from_str(&content)?,
            _ => serde_yaml::from_str(&content)?,
        };
        Ok(config)
    }

    /// Loads the explicit config file, or the workspace default when present.
    pub fn discover(explicit: Option<&Path>, workspace: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let default = workspace.join(DEFAULT_CONFIG_FILE);
        if default.is_file() {
            log::debug!("Using config file {}", default.display());
            Self::load(&default)
        } else {
            Ok(Self::default())
        }
    }

    /// Platforms parsed from the file
    pub fn platforms(&self) -> Result<Option<Vec<Platform>>> {
        self.platforms.as_ref().map(ListValue::parse).transpose()
    }

    /// Architectures parsed from the file
    pub fn architectures(&self) -> Result<Option<Vec<Architecture>>> {
        self.architectures.as_ref().map(ListValue::parse).transpose()
    }
}
