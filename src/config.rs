//! Daemon configuration types
//!
//! TOML-backed configuration for the Vigil watchdog daemon: monitor
//! thresholds, per-role status endpoints, and the token file location.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use vigil_core::{FileTokenStore, MonitorConfig};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Monitor thresholds and timers
    #[serde(default)]
    pub monitor: MonitorConfig,
    /// Per-role session status endpoints
    pub endpoints: EndpointsConfig,
    /// Token storage location
    #[serde(default)]
    pub tokens: TokensConfig,
}

/// Status endpoint URLs, one per role
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointsConfig {
    /// Admin session status endpoint
    pub admin_status_url: String,
    /// User session status endpoint
    pub user_status_url: String,
}

/// Token file location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokensConfig {
    /// Path of the JSON token file
    #[serde(default = "default_token_path")]
    pub path: PathBuf,
}

fn default_token_path() -> PathBuf {
    FileTokenStore::default_path()
}

impl Default for TokensConfig {
    fn default() -> Self {
        Self {
            path: default_token_path(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).context("Failed to read config file")?;
        let config: Self = toml::from_str(&content).context("Failed to parse config file")?;
        config.monitor.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    #[allow(dead_code)]
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        fs::write(path, content).context("Failed to write config file")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_minimal_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vigil.toml");
        fs::write(
            &path,
            r#"
[endpoints]
admin_status_url = "http://localhost:8080/api/admin/status"
user_status_url = "http://localhost:8080/api/user/status"
"#,
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.monitor.inactivity_timeout_ms, 3_600_000);
        assert!(config
            .endpoints
            .admin_status_url
            .ends_with("/api/admin/status"));
    }

    #[test]
    fn test_load_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vigil.toml");
        fs::write(
            &path,
            r#"
[monitor]
inactivity_timeout_ms = 600000
check_interval_ms = 60000

[endpoints]
admin_status_url = "http://api/admin/status"
user_status_url = "http://api/user/status"

[tokens]
path = "/tmp/vigil-tokens.json"
"#,
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.monitor.inactivity_timeout_ms, 600_000);
        assert_eq!(config.tokens.path, PathBuf::from("/tmp/vigil-tokens.json"));
    }

    #[test]
    fn test_load_rejects_invalid_thresholds() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vigil.toml");
        fs::write(
            &path,
            r#"
[monitor]
inactivity_timeout_ms = 0

[endpoints]
admin_status_url = "http://api/admin/status"
user_status_url = "http://api/user/status"
"#,
        )
        .unwrap();

        assert!(AppConfig::load(&path).is_err());
    }

    #[test]
    fn test_save_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/vigil.toml");
        let config = AppConfig {
            monitor: MonitorConfig::default(),
            endpoints: EndpointsConfig {
                admin_status_url: "http://api/admin/status".to_string(),
                user_status_url: "http://api/user/status".to_string(),
            },
            tokens: TokensConfig::default(),
        };

        config.save(&path).unwrap();
        let loaded = AppConfig::load(&path).unwrap();
        assert_eq!(loaded.endpoints.user_status_url, "http://api/user/status");
    }
}
