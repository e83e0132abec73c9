use crate::error::SkillsyncError;
use crate::path_utils::validate_path_str;
use anyhow::{Result, anyhow};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_CONFIG_DIR: &str = "SKILLSYNC_CONFIG_DIR";
pub const APP_NAME: &str = "skillsync";
pub const CONFIG_DIR_NAME: &str = ".skillsync";
pub const CONFIG_FILE: &str = "config.json";
pub const STORE_DIR: &str = "store";
pub const LOCAL_STORE_DIR: &str = "local";

pub fn resolve_config_dir(cli_override: Option<&Path>) -> Result<PathBuf> {
    let env_override = env::var(ENV_CONFIG_DIR).ok();
    resolve_config_dir_with(cli_override, env_override.as_deref())
}

pub fn resolve_config_dir_with(
    cli_override: Option<&Path>,
    env_override: Option<&str>,
) -> Result<PathBuf> {
    if let Some(path) = cli_override {
        validate_path_str(&path.to_string_lossy())
            .map_err(|e| anyhow!(t!("errors.invalid_config_dir", error = e)))?;
        return Ok(path.to_path_buf());
    }

    if let Some(env_config_dir) = env_override {
        validate_path_str(env_config_dir)
            .map_err(|e| anyhow!(t!("errors.invalid_config_dir_env", error = e)))?;
        return Ok(PathBuf::from(env_config_dir));
    }

    let home = dirs::home_dir().ok_or(SkillsyncError::NoHomeDir)?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Resolved filesystem layout: the config document plus the mirror ("store")
/// area that fetch populates and sync reads.
#[derive(Clone, Debug)]
pub struct SyncPaths {
    pub config_dir: PathBuf,
    pub config_file: PathBuf,
    pub store_dir: PathBuf,
}

impl SyncPaths {
    pub fn resolve(cli_override: Option<&Path>) -> Result<Self> {
        let config_dir = resolve_config_dir(cli_override)?;
        Ok(Self::from_config_dir(config_dir))
    }

    pub fn from_config_dir(config_dir: PathBuf) -> Self {
        let config_file = config_dir.join(CONFIG_FILE);
        let store_dir = config_dir.join(STORE_DIR);
        Self {
            config_dir,
            config_file,
            store_dir,
        }
    }

    pub fn ensure_dirs(&self) -> Result<()> {
        fs::create_dir_all(&self.config_dir)?;
        fs::create_dir_all(&self.store_dir)?;
        Ok(())
    }

    /// Mirror entry for a remote source; `owner/repo` names map to nested
    /// directories under the store.
    pub fn source_store_dir(&self, name: &str) -> PathBuf {
        self.store_dir.join(name)
    }

    /// The single flat mirror directory shared by every local source.
    pub fn local_store_dir(&self) -> PathBuf {
        self.store_dir.join(LOCAL_STORE_DIR)
    }
}
