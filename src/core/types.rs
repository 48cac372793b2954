use std::fs;
use std::path::Path;

use serde::{Serialize, Deserialize};
use tracing::Level;

use crate::protocol::encoder::U14_MAX;
use crate::sync::SyncConfig;

/// Verbosity of the log subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

/// Configuration for a Firmata host session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Serial device path
    pub port: String,
    /// Serial bit rate
    pub baud_rate: u32,
    /// Log verbosity
    pub log_level: LogLevel,
    /// Handshake and receive loop settings
    pub sync: SyncConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: super::DEFAULT_PORT.to_string(),
            baud_rate: super::DEFAULT_BAUD_RATE,
            log_level: LogLevel::Info,
            sync: SyncConfig::default(),
        }
    }
}

impl Config {
    /// Loads a JSON configuration file; missing fields take their defaults
    pub fn load(path: impl AsRef<Path>) -> super::Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&text)
            .map_err(|e| super::Error::config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks values that would make the session misbehave
    pub fn validate(&self) -> super::Result<()> {
        if self.port.is_empty() {
            return Err(super::Error::config("serial port path is empty"));
        }
        if self.baud_rate == 0 {
            return Err(super::Error::config("baud rate must be non-zero"));
        }
        if self.sync.sampling_interval > U14_MAX {
            return Err(super::Error::config(format!(
                "sampling interval {} does not fit in 14 bits",
                self.sync.sampling_interval
            )));
        }
        if self.sync.retry_interval.is_zero() || self.sync.poll_timeout.is_zero() {
            return Err(super::Error::config("retry interval and poll timeout must be non-zero"));
        }
        if self.sync.handshake_timeout < self.sync.retry_interval {
            return Err(super::Error::config("handshake timeout is shorter than the retry interval"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use crate::sync::SyncTimeoutPolicy;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert_eq!(config.baud_rate, 115_200);
        assert_eq!(config.sync.sampling_interval, 500);
        assert_eq!(config.sync.retry_interval, Duration::from_millis(100));
        assert_eq!(config.sync.handshake_timeout, Duration::from_secs(20));
        assert_eq!(config.sync.poll_timeout, Duration::from_secs(2));
        assert_eq!(config.sync.on_timeout, SyncTimeoutPolicy::Proceed);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{
            "port": "/dev/ttyACM0",
            "log_level": "debug",
            "sync": { "handshake_timeout": 5.0, "on_timeout": "abort" }
        }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.port, "/dev/ttyACM0");
        assert_eq!(config.baud_rate, 115_200);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.sync.handshake_timeout, Duration::from_secs(5));
        assert_eq!(config.sync.retry_interval, Duration::from_millis(100));
        assert_eq!(config.sync.on_timeout, SyncTimeoutPolicy::Abort);
    }

    #[test]
    fn test_validate_rejects_wide_sampling_interval() {
        let mut config = Config::default();
        config.sync.sampling_interval = 16_384;
        assert!(matches!(config.validate(), Err(crate::core::Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_short_handshake() {
        let mut config = Config::default();
        config.sync.handshake_timeout = Duration::from_millis(10);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load("/nonexistent/firmata.json").unwrap_err();
        assert!(matches!(err, crate::core::Error::Io(_)));
    }

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(Level::from(LogLevel::Warn), Level::WARN);
    }
}
