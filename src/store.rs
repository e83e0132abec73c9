use crate::config::SyncPaths;
use crate::error::SkillsyncError;
use crate::path_utils::known_target_path;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

/// A configured skill source. Exactly one of `url` (remote) or `local_path`
/// (local) is set on a fully-formed source.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Source {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subdir: Option<String>,
    #[serde(rename = "localPath", skip_serializing_if = "Option::is_none")]
    pub local_path: Option<PathBuf>,
    pub enabled: bool,
}

impl Source {
    pub fn remote(url: impl Into<String>, subdir: Option<String>) -> Self {
        Self {
            url: Some(url.into()),
            subdir,
            local_path: None,
            enabled: true,
        }
    }

    pub fn local(path: impl Into<PathBuf>) -> Self {
        Self {
            url: None,
            subdir: None,
            local_path: Some(path.into()),
            enabled: true,
        }
    }

    pub fn is_local(&self) -> bool {
        self.local_path.is_some()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Target {
    pub path: PathBuf,
    pub enabled: bool,
}

/// The persisted aggregate: every mutation rewrites this whole document.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub sources: BTreeMap<String, Source>,
    #[serde(default)]
    pub targets: BTreeMap<String, Target>,
}

pub fn default_config() -> Config {
    let mut sources = BTreeMap::new();
    sources.insert(
        "anthropics/skills".to_string(),
        Source::remote("https://github.com/anthropics/skills", None),
    );
    sources.insert(
        "vercel-labs/agent-skills".to_string(),
        Source::remote(
            "https://github.com/vercel-labs/agent-skills",
            Some("skills".to_string()),
        ),
    );
    Config {
        sources,
        targets: BTreeMap::new(),
    }
}

/// Default targets enabled on first initialization.
const DEFAULT_TARGET_NAMES: &[&str] = &["cursor", "claude", "codex", "antigravity", "copilot"];

fn initial_config() -> Config {
    let mut config = default_config();
    for name in DEFAULT_TARGET_NAMES {
        if let Some(path) = known_target_path(name) {
            config.targets.insert(
                (*name).to_string(),
                Target {
                    path,
                    enabled: true,
                },
            );
        }
    }
    config
}

/// Read-modify-write access to the config document. No locking: concurrent
/// invocations of the tool are unsupported, last writer wins.
pub struct ConfigStore {
    paths: SyncPaths,
}

impl ConfigStore {
    pub fn new(paths: SyncPaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &SyncPaths {
        &self.paths
    }

    /// Load the config, creating it with defaults on first read. A corrupted
    /// file falls back to the built-in default instead of failing the run.
    pub fn load(&self) -> Result<Config> {
        self.paths.ensure_dirs()?;

        if !self.paths.config_file.exists() {
            let config = initial_config();
            self.save(&config)?;
            return Ok(config);
        }

        let content = fs::read_to_string(&self.paths.config_file)?;
        match serde_json::from_str(&content) {
            Ok(config) => Ok(config),
            Err(_) => Ok(default_config()),
        }
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        self.paths.ensure_dirs()?;
        let content = serde_json::to_string_pretty(config)?;
        fs::write(&self.paths.config_file, content)?;
        Ok(())
    }

    pub fn add_source(&self, name: &str, source: Source) -> Result<()> {
        let mut config = self.load()?;
        if config.sources.contains_key(name) {
            return Err(SkillsyncError::SourceExists {
                name: name.to_string(),
            }
            .into());
        }
        config.sources.insert(name.to_string(), source);
        self.save(&config)
    }

    pub fn remove_source(&self, name: &str) -> Result<()> {
        let mut config = self.load()?;
        if config.sources.remove(name).is_none() {
            return Err(SkillsyncError::SourceNotFound {
                name: name.to_string(),
            }
            .into());
        }
        self.save(&config)
    }

    pub fn set_source_enabled(&self, name: &str, enabled: bool) -> Result<()> {
        let mut config = self.load()?;
        let source =
            config
                .sources
                .get_mut(name)
                .ok_or_else(|| SkillsyncError::SourceNotFound {
                    name: name.to_string(),
                })?;
        source.enabled = enabled;
        self.save(&config)
    }

    pub fn add_target(&self, name: &str, path: Option<PathBuf>) -> Result<()> {
        let mut config = self.load()?;
        if config.targets.contains_key(name) {
            return Err(SkillsyncError::TargetExists {
                name: name.to_string(),
            }
            .into());
        }
        let target_path = match path {
            Some(path) => path,
            None => known_target_path(name).ok_or_else(|| SkillsyncError::UnknownTarget {
                name: name.to_string(),
            })?,
        };
        config.targets.insert(
            name.to_string(),
            Target {
                path: target_path,
                enabled: true,
            },
        );
        self.save(&config)
    }

    pub fn remove_target(&self, name: &str) -> Result<()> {
        let mut config = self.load()?;
        if config.targets.remove(name).is_none() {
            return Err(SkillsyncError::TargetNotFound {
                name: name.to_string(),
            }
            .into());
        }
        self.save(&config)
    }

    pub fn set_target_enabled(&self, name: &str, enabled: bool) -> Result<()> {
        let mut config = self.load()?;
        let target =
            config
                .targets
                .get_mut(name)
                .ok_or_else(|| SkillsyncError::TargetNotFound {
                    name: name.to_string(),
                })?;
        target.enabled = enabled;
        self.save(&config)
    }
}
