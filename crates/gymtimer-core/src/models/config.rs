//! Engine configuration

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Upper bound for a configured countdown, in seconds (one day).
const MAX_DURATION_SECONDS: u64 = 86_400;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimerConfig {
    /// Countdown target used until the user configures one.
    pub default_duration_seconds: u64,
    /// Number of audit entries kept in the published log.
    pub audit_log_limit: usize,
    /// Milliseconds between ticker fires.
    pub tick_interval_ms: u64,
}

impl TimerConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.default_duration_seconds == 0 {
            return Err(Error::Validation(
                "Default duration must be greater than 0".to_string(),
            ));
        }

        if self.default_duration_seconds > MAX_DURATION_SECONDS {
            return Err(Error::Validation(format!(
                "Default duration too long (max {} seconds)",
                MAX_DURATION_SECONDS
            )));
        }

        if self.audit_log_limit == 0 {
            return Err(Error::Validation(
                "Audit log limit must be greater than 0".to_string(),
            ));
        }

        if self.tick_interval_ms == 0 {
            return Err(Error::Validation(
                "Tick interval must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            default_duration_seconds: 60,
            audit_log_limit: 20,
            tick_interval_ms: 1000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = TimerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.default_duration_seconds, 60);
        assert_eq!(config.audit_log_limit, 20);
        assert_eq!(config.tick_interval_ms, 1000);
    }

    #[test]
    fn test_zero_duration_rejected() {
        let config = TimerConfig {
            default_duration_seconds: 0,
            ..TimerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_excessive_duration_rejected() {
        let config = TimerConfig {
            default_duration_seconds: MAX_DURATION_SECONDS + 1,
            ..TimerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_limit_rejected() {
        let config = TimerConfig {
            audit_log_limit: 0,
            ..TimerConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
