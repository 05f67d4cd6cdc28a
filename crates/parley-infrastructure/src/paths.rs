//! Path management for Parley files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/parley/            # Config directory
//! └── config.toml              # Application configuration
//!
//! ~/.local/share/parley/       # Data directory (PARLEY_DATA_DIR / [storage].data_dir)
//! ├── ai_chat_state.json       # Persisted chat state
//! └── logs/                    # Application logs
//!     └── parley.log.YYYY-MM-DD
//! ```

use parley_core::error::{ParleyError, Result};
use std::path::{Path, PathBuf};

const APP_NAME: &str = "parley";

/// Fixed storage key of the persisted chat state.
pub const STATE_STORAGE_KEY: &str = "ai_chat_state";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParleyPaths {
    config_dir: PathBuf,
    data_dir: PathBuf,
}

impl ParleyPaths {
    /// Resolves the platform directories (XDG on Linux).
    pub fn discover() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ParleyError::config("Cannot find config directory"))?
            .join(APP_NAME);
        let data_dir = dirs::data_dir()
            .ok_or_else(|| ParleyError::config("Cannot find data directory"))?
            .join(APP_NAME);

        Ok(Self {
            config_dir,
            data_dir,
        })
    }

    /// Keeps everything under one directory. Used by tests and `--data-dir`.
    pub fn rooted_at(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            config_dir: root.to_path_buf(),
            data_dir: root.to_path_buf(),
        }
    }

    /// Replaces the data directory when an override is configured.
    pub fn with_data_dir(mut self, data_dir: Option<PathBuf>) -> Self {
        if let Some(dir) = data_dir {
            self.data_dir = dir;
        }
        self
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    pub fn state_file(&self) -> PathBuf {
        self.data_dir.join(format!("{}.json", STATE_STORAGE_KEY))
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rooted_layout() {
        let paths = ParleyPaths::rooted_at("/tmp/parley-test");
        assert_eq!(paths.config_file(), PathBuf::from("/tmp/parley-test/config.toml"));
        assert_eq!(
            paths.state_file(),
            PathBuf::from("/tmp/parley-test/ai_chat_state.json")
        );
        assert_eq!(paths.logs_dir(), PathBuf::from("/tmp/parley-test/logs"));
    }

    #[test]
    fn test_data_dir_override_keeps_config_dir() {
        let paths = ParleyPaths::rooted_at("/etc/parley").with_data_dir(Some("/srv/chat".into()));
        assert_eq!(paths.config_file(), PathBuf::from("/etc/parley/config.toml"));
        assert_eq!(paths.state_file(), PathBuf::from("/srv/chat/ai_chat_state.json"));

        let unchanged = ParleyPaths::rooted_at("/etc/parley").with_data_dir(None);
        assert_eq!(unchanged.data_dir(), Path::new("/etc/parley"));
    }
}
