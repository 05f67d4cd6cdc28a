//! Configuration model.
//!
//! Loaded from `config.toml`; every field has a default so a partial or
//! missing file is fine.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Largest image the composer accepts (10 MiB).
pub const DEFAULT_MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct RootConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub replies: ReplyConfig,
    #[serde(default)]
    pub attachments: AttachmentConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageConfig {
    /// Overrides the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

/// Simulated reply delays in milliseconds.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ReplyConfig {
    #[serde(default = "default_text_delay_ms")]
    pub text_delay_ms: u64,
    #[serde(default = "default_image_analysis_delay_ms")]
    pub image_analysis_delay_ms: u64,
    #[serde(default = "default_image_generation_delay_ms")]
    pub image_generation_delay_ms: u64,
}

impl ReplyConfig {
    pub fn text_delay(&self) -> Duration {
        Duration::from_millis(self.text_delay_ms)
    }

    pub fn image_analysis_delay(&self) -> Duration {
        Duration::from_millis(self.image_analysis_delay_ms)
    }

    pub fn image_generation_delay(&self) -> Duration {
        Duration::from_millis(self.image_generation_delay_ms)
    }
}

impl Default for ReplyConfig {
    fn default() -> Self {
        Self {
            text_delay_ms: default_text_delay_ms(),
            image_analysis_delay_ms: default_image_analysis_delay_ms(),
            image_generation_delay_ms: default_image_generation_delay_ms(),
        }
    }
}

fn default_text_delay_ms() -> u64 {
    1500
}

fn default_image_analysis_delay_ms() -> u64 {
    2000
}

fn default_image_generation_delay_ms() -> u64 {
    3000
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct AttachmentConfig {
    #[serde(default = "default_max_image_bytes")]
    pub max_image_bytes: u64,
}

impl Default for AttachmentConfig {
    fn default() -> Self {
        Self {
            max_image_bytes: default_max_image_bytes(),
        }
    }
}

fn default_max_image_bytes() -> u64 {
    DEFAULT_MAX_IMAGE_BYTES
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive; `RUST_LOG` wins over it.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

fn default_log_filter() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RootConfig::default();
        assert_eq!(config.replies.text_delay(), Duration::from_millis(1500));
        assert_eq!(config.replies.image_analysis_delay(), Duration::from_secs(2));
        assert_eq!(config.replies.image_generation_delay(), Duration::from_secs(3));
        assert_eq!(config.attachments.max_image_bytes, 10 * 1024 * 1024);
        assert_eq!(config.logging.filter, "info");
        assert!(config.storage.data_dir.is_none());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: RootConfig = toml::from_str("[replies]\ntext_delay_ms = 10\n").unwrap();
        assert_eq!(config.replies.text_delay_ms, 10);
        assert_eq!(config.replies.image_generation_delay_ms, 3000);
        assert_eq!(config.attachments, AttachmentConfig::default());
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config: RootConfig = toml::from_str("").unwrap();
        assert_eq!(config, RootConfig::default());
    }
}
