//! Monitor configuration
//!
//! Thresholds and timers for the inactivity monitor. All durations are
//! expressed in milliseconds in the serialized form and exposed as
//! [`Duration`] accessors. The config is the single source of truth for
//! the timeout policy.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

fn default_inactivity_timeout_ms() -> u64 {
    3_600_000
}

fn default_check_interval_ms() -> u64 {
    300_000
}

fn default_startup_delay_ms() -> u64 {
    60_000
}

fn default_probe_timeout_ms() -> u64 {
    5_000
}

fn default_true() -> bool {
    true
}

/// Lead time subtracted from the inactivity timeout when no explicit
/// warning lead is configured.
const DEFAULT_WARNING_MARGIN_MS: u64 = 600_000;

/// Inactivity monitor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Duration of inactivity after which logout is forced, in milliseconds
    #[serde(default = "default_inactivity_timeout_ms")]
    pub inactivity_timeout_ms: u64,
    /// Period between remote validity checks, in milliseconds
    #[serde(default = "default_check_interval_ms")]
    pub check_interval_ms: u64,
    /// Inactivity duration at which the warning prompt is shown, in
    /// milliseconds. Defaults to `inactivity_timeout_ms − 600,000`.
    #[serde(default)]
    pub warning_lead_time_ms: Option<u64>,
    /// Delay before the one-shot early check after activation, in milliseconds
    #[serde(default = "default_startup_delay_ms")]
    pub startup_delay_ms: u64,
    /// Transport timeout for the remote check, in milliseconds
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,
    /// When false, no listeners or timers are active
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            inactivity_timeout_ms: default_inactivity_timeout_ms(),
            check_interval_ms: default_check_interval_ms(),
            warning_lead_time_ms: None,
            startup_delay_ms: default_startup_delay_ms(),
            probe_timeout_ms: default_probe_timeout_ms(),
            enabled: true,
        }
    }
}

impl MonitorConfig {
    /// Create a new configuration with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the inactivity timeout
    #[must_use]
    pub fn with_inactivity_timeout_ms(mut self, ms: u64) -> Self {
        self.inactivity_timeout_ms = ms;
        self
    }

    /// Set the check interval
    #[must_use]
    pub fn with_check_interval_ms(mut self, ms: u64) -> Self {
        self.check_interval_ms = ms;
        self
    }

    /// Set an explicit warning lead time
    #[must_use]
    pub fn with_warning_lead_time_ms(mut self, ms: u64) -> Self {
        self.warning_lead_time_ms = Some(ms);
        self
    }

    /// Set the startup delay
    #[must_use]
    pub fn with_startup_delay_ms(mut self, ms: u64) -> Self {
        self.startup_delay_ms = ms;
        self
    }

    /// Set the probe transport timeout
    #[must_use]
    pub fn with_probe_timeout_ms(mut self, ms: u64) -> Self {
        self.probe_timeout_ms = ms;
        self
    }

    /// Enable or disable the monitor
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Inactivity timeout as a [`Duration`]
    #[must_use]
    pub fn inactivity_timeout(&self) -> Duration {
        Duration::from_millis(self.inactivity_timeout_ms)
    }

    /// Check interval as a [`Duration`]
    #[must_use]
    pub fn check_interval(&self) -> Duration {
        Duration::from_millis(self.check_interval_ms)
    }

    /// Resolved warning lead time as a [`Duration`]
    #[must_use]
    pub fn warning_lead_time(&self) -> Duration {
        let ms = self
            .warning_lead_time_ms
            .unwrap_or_else(|| self.inactivity_timeout_ms.saturating_sub(DEFAULT_WARNING_MARGIN_MS));
        Duration::from_millis(ms)
    }

    /// Startup delay as a [`Duration`]
    #[must_use]
    pub fn startup_delay(&self) -> Duration {
        Duration::from_millis(self.startup_delay_ms)
    }

    /// Probe transport timeout as a [`Duration`]
    #[must_use]
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    /// Validate threshold consistency
    pub fn validate(&self) -> Result<()> {
        if self.inactivity_timeout_ms == 0 {
            return Err(Error::InvalidConfig {
                field: "inactivity_timeout_ms".to_string(),
                message: "must be positive".to_string(),
            });
        }
        if self.check_interval_ms == 0 {
            return Err(Error::InvalidConfig {
                field: "check_interval_ms".to_string(),
                message: "must be positive".to_string(),
            });
        }
        if let Some(lead) = self.warning_lead_time_ms {
            if lead >= self.inactivity_timeout_ms {
                return Err(Error::InvalidConfig {
                    field: "warning_lead_time_ms".to_string(),
                    message: "must be shorter than inactivity_timeout_ms".to_string(),
                });
            }
        }
        if self.probe_timeout_ms == 0 {
            return Err(Error::InvalidConfig {
                field: "probe_timeout_ms".to_string(),
                message: "must be positive".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MonitorConfig::default();
        assert_eq!(config.inactivity_timeout(), Duration::from_millis(3_600_000));
        assert_eq!(config.check_interval(), Duration::from_millis(300_000));
        assert_eq!(config.warning_lead_time(), Duration::from_millis(3_000_000));
        assert_eq!(config.startup_delay(), Duration::from_millis(60_000));
        assert_eq!(config.probe_timeout(), Duration::from_millis(5_000));
        assert!(config.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_explicit_warning_lead() {
        let config = MonitorConfig::new()
            .with_inactivity_timeout_ms(10_000)
            .with_warning_lead_time_ms(7_000);
        assert_eq!(config.warning_lead_time(), Duration::from_millis(7_000));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_lead_saturates() {
        // Timeout shorter than the default margin must not underflow
        let config = MonitorConfig::new().with_inactivity_timeout_ms(10_000);
        assert_eq!(config.warning_lead_time(), Duration::ZERO);
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let config = MonitorConfig::new().with_inactivity_timeout_ms(0);
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfig { field, .. }) if field == "inactivity_timeout_ms"
        ));
    }

    #[test]
    fn test_validate_rejects_lead_past_timeout() {
        let config = MonitorConfig::new()
            .with_inactivity_timeout_ms(5_000)
            .with_warning_lead_time_ms(5_000);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_roundtrip_defaults() {
        // Empty table deserializes to full defaults
        let config: MonitorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.inactivity_timeout_ms, 3_600_000);
        assert!(config.enabled);
    }
}
