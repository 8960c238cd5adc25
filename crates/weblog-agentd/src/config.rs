use std::{net::SocketAddr, time::Duration};

use thiserror::Error;
use weblog_core::{CoreError, DashboardConfig};
use weblog_observe::{LoggerConfig, LoggerError, LoggerFormat, LoggerLevel};

pub const ENV_BIND: &str = "WEBLOG_BIND";
pub const ENV_TIMEZONE: &str = "WEBLOG_TIMEZONE";
pub const ENV_STRIP_KEYS: &str = "WEBLOG_STRIP_KEYS";
pub const ENV_TICK_MS: &str = "WEBLOG_TICK_MS";
pub const ENV_METADATA_MAX_DEPTH: &str = "WEBLOG_METADATA_MAX_DEPTH";
pub const ENV_LOG_LEVEL: &str = "WEBLOG_LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "WEBLOG_LOG_FORMAT";

pub const DEFAULT_BIND: &str = "0.0.0.0:8050";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var}={value:?}: {reason}")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("{0}")]
    Logger(#[from] LoggerError),
}

impl ConfigError {
    fn invalid(var: &'static str, value: &str, reason: impl ToString) -> Self {
        ConfigError::InvalidValue {
            var,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Everything the agent needs, read once at startup.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub bind: SocketAddr,
    pub dashboard: DashboardConfig,
    pub logger: LoggerConfig,
}

impl AgentConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any key lookup; unset and blank variables take defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let bind_raw = get(ENV_BIND).unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind = bind_raw
            .trim()
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::invalid(ENV_BIND, &bind_raw, e))?;

        let mut dashboard = DashboardConfig::default();
        if let Some(tz) = get(ENV_TIMEZONE) {
            dashboard = dashboard.with_timezone_name(&tz)?;
        }
        if let Some(keys) = lookup(ENV_STRIP_KEYS) {
            // An explicitly empty list disables stripping.
            dashboard = dashboard.with_noisy_keys(
                keys.split(',')
                    .map(str::trim)
                    .filter(|k| !k.is_empty())
                    .map(str::to_string),
            );
        }
        if let Some(ms) = get(ENV_TICK_MS) {
            let ms = parse_positive(ENV_TICK_MS, &ms)?;
            dashboard = dashboard.with_tick_interval(Duration::from_millis(ms));
        }
        if let Some(depth) = get(ENV_METADATA_MAX_DEPTH) {
            let depth = parse_positive(ENV_METADATA_MAX_DEPTH, &depth)?;
            dashboard = dashboard.with_metadata_max_depth(depth as usize);
        }

        let mut logger = LoggerConfig::default();
        if let Some(level) = get(ENV_LOG_LEVEL) {
            logger.level = LoggerLevel::new(level.trim())?;
        }
        if let Some(format) = get(ENV_LOG_FORMAT) {
            logger.format = format.parse::<LoggerFormat>()?;
        }

        Ok(Self {
            bind,
            dashboard,
            logger,
        })
    }
}

fn parse_positive(var: &'static str, raw: &str) -> Result<u64, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(ConfigError::invalid(var, raw, "must be greater than zero")),
        Ok(v) => Ok(v),
        Err(e) => Err(ConfigError::invalid(var, raw, e)),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<AgentConfig, ConfigError> {
        let env: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AgentConfig::from_lookup(|name| env.get(name).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let cfg = load(&[]).unwrap();
        assert_eq!(cfg.bind, "0.0.0.0:8050".parse::<SocketAddr>().unwrap());
        assert_eq!(cfg.dashboard.timezone.name(), "America/New_York");
        assert_eq!(cfg.dashboard.noisy_keys, vec!["availableZoneIds".to_string()]);
        assert_eq!(cfg.dashboard.tick_interval, Duration::from_secs(1));
        assert_eq!(cfg.dashboard.metadata_max_depth, 64);
        assert_eq!(cfg.logger.level.as_str(), "info");
        assert_eq!(cfg.logger.format, LoggerFormat::Text);
    }

    #[test]
    fn reads_every_variable() {
        let cfg = load(&[
            (ENV_BIND, "127.0.0.1:9000"),
            (ENV_TIMEZONE, "Europe/Berlin"),
            (ENV_STRIP_KEYS, "availableZoneIds, env ,"),
            (ENV_TICK_MS, "250"),
            (ENV_METADATA_MAX_DEPTH, "8"),
            (ENV_LOG_LEVEL, "weblog_core=debug,info"),
            (ENV_LOG_FORMAT, "json"),
        ])
        .unwrap();

        assert_eq!(cfg.bind.port(), 9000);
        assert_eq!(cfg.dashboard.timezone.name(), "Europe/Berlin");
        assert_eq!(cfg.dashboard.noisy_keys, vec!["availableZoneIds", "env"]);
        assert_eq!(cfg.dashboard.tick_interval, Duration::from_millis(250));
        assert_eq!(cfg.dashboard.metadata_max_depth, 8);
        assert_eq!(cfg.logger.level.as_str(), "weblog_core=debug,info");
        assert_eq!(cfg.logger.format, LoggerFormat::Json);
    }

    #[test]
    fn empty_strip_list_disables_filtering() {
        let cfg = load(&[(ENV_STRIP_KEYS, "")]).unwrap();
        assert!(cfg.dashboard.noisy_keys.is_empty());
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let cfg = load(&[(ENV_TICK_MS, "  "), (ENV_TIMEZONE, "")]).unwrap();
        assert_eq!(cfg.dashboard.tick_interval, Duration::from_secs(1));
        assert_eq!(cfg.dashboard.timezone.name(), "America/New_York");
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            load(&[(ENV_BIND, "localhost")]),
            Err(ConfigError::InvalidValue { var: ENV_BIND, .. })
        ));
        assert!(matches!(
            load(&[(ENV_TICK_MS, "0")]),
            Err(ConfigError::InvalidValue { var: ENV_TICK_MS, .. })
        ));
        assert!(matches!(
            load(&[(ENV_METADATA_MAX_DEPTH, "deep")]),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            load(&[(ENV_TIMEZONE, "Mars/Olympus")]),
            Err(ConfigError::Core(CoreError::UnknownTimeZone(_)))
        ));
        assert!(matches!(
            load(&[(ENV_LOG_FORMAT, "xml")]),
            Err(ConfigError::Logger(LoggerError::InvalidFormat(_)))
        ));
    }
}
