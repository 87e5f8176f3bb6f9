//! Registry configuration
//!
//! Settings are read from `config.toml` (or `.json`) through the vcs-fs
//! [`ConfigStore`]. Every field has a default, so a missing file or a
//! partial file is fine.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use vcs_fs::{ConfigStore, NormalizedPath, PathPolicy};

/// Directory name used under the platform config and data directories.
pub const APP_DIR: &str = "vcs-share";

/// Config file name inside a home directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Store file name inside a home or data directory.
pub const STORE_FILE: &str = "store.json";

/// How `share` detects an existing root inside the path being shared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainmentCheck {
    /// Lower-cased substring containment in either direction, without
    /// regard for separators. `/src/app` conflicts with `/src/application`.
    #[default]
    Substring,
    /// Component-aware ancestor comparison.
    Ancestor,
}

/// Settings for a [`VcsAccess`](crate::VcsAccess) instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Location of the persistent store; platform data dir when unset.
    pub store_path: Option<PathBuf>,
    /// Inner-containment rule applied by `share`.
    pub containment: ContainmentCheck,
    /// Case rule for every path comparison.
    pub path_policy: PathPolicy,
}

impl RegistryConfig {
    /// Load a config file; a missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = NormalizedPath::new(path);
        Ok(ConfigStore::new().load_or_default(&path)?)
    }

    /// Load the configuration rooted at `home`.
    ///
    /// Reads `<home>/config.toml` and, unless that file names a store,
    /// keeps the store at `<home>/store.json`.
    pub fn for_home(home: impl AsRef<Path>) -> Result<Self> {
        let home = home.as_ref();
        let mut config = Self::load(home.join(CONFIG_FILE))?;
        if config.store_path.is_none() {
            config.store_path = Some(home.join(STORE_FILE));
        }
        Ok(config)
    }

    /// Resolve the configuration the way the command-line tool does: an
    /// explicit home wins, otherwise the platform config directory.
    pub fn discover(home: Option<&Path>) -> Result<Self> {
        match home {
            Some(home) => Self::for_home(home),
            None => match default_config_path() {
                Some(path) => Self::load(path),
                None => Ok(Self::default()),
            },
        }
    }

    /// The store location, falling back to the platform data directory.
    pub fn resolved_store_path(&self) -> Result<PathBuf> {
        match &self.store_path {
            Some(path) => Ok(path.clone()),
            None => default_store_path().ok_or(Error::NoStoreLocation),
        }
    }
}

/// `<config dir>/vcs-share/config.toml`, when the platform has one.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}

/// `<data dir>/vcs-share/store.json`, when the platform has one.
pub fn default_store_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(APP_DIR).join(STORE_FILE))
}
