//! Configuration service.
//!
//! Loads `RootConfig` from `config.toml` and caches it. The file is optional:
//! a missing file yields defaults, and a malformed one yields defaults plus a
//! warning so a typo never keeps the chat from starting.

use parley_core::config::RootConfig;
use parley_core::error::{ParleyError, Result};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Environment variable overriding `[storage].data_dir`.
pub const DATA_DIR_ENV: &str = "PARLEY_DATA_DIR";

#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
    /// Cached configuration, filled on first access.
    config: Arc<RwLock<Option<RootConfig>>>,
}

impl ConfigService {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            config: Arc::new(RwLock::new(None)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the configuration, loading it on first access.
    pub fn get_config(&self) -> RootConfig {
        if let Some(cached) = self
            .config
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .as_ref()
        {
            return cached.clone();
        }

        let loaded = Self::apply_env(self.load(), std::env::var(DATA_DIR_ENV).ok());
        *self
            .config
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(loaded.clone());
        loaded
    }

    /// Forces a reload on next access.
    pub fn invalidate_cache(&self) {
        *self
            .config
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
    }

    fn load(&self) -> RootConfig {
        match Self::read_file(&self.path) {
            Ok(Some(config)) => {
                tracing::info!("[ConfigService] Loaded {:?}", self.path);
                config
            }
            Ok(None) => {
                tracing::debug!("[ConfigService] No config at {:?}, using defaults", self.path);
                RootConfig::default()
            }
            Err(e) => {
                tracing::warn!(
                    "[ConfigService] Ignoring malformed config {:?}: {}",
                    self.path,
                    e
                );
                RootConfig::default()
            }
        }
    }

    fn read_file(path: &Path) -> Result<Option<RootConfig>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map(Some)
            .map_err(|e| ParleyError::config(format!("{}: {}", path.display(), e)))
    }

    /// Lets a non-empty `PARLEY_DATA_DIR` win over the file setting.
    fn apply_env(mut config: RootConfig, data_dir: Option<String>) -> RootConfig {
        if let Some(dir) = data_dir.filter(|d| !d.trim().is_empty()) {
            config.storage.data_dir = Some(PathBuf::from(dir));
        }
        config
    }
}
