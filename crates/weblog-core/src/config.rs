use std::time::Duration;

use chrono_tz::Tz;

use crate::error::CoreError;

pub const DEFAULT_TIMEZONE: Tz = chrono_tz::America::New_York;
pub const DEFAULT_NOISY_KEY: &str = "availableZoneIds";
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(1_000);
pub const DEFAULT_METADATA_MAX_DEPTH: usize = 64;

/// Settings of one aggregation engine.
///
/// Loaded once at startup; the engine never re-reads it.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Zone every timestamp is normalized into.
    pub timezone: Tz,
    /// Metadata keys stripped at every nesting depth.
    pub noisy_keys: Vec<String>,
    /// Period between two aggregation ticks.
    pub tick_interval: Duration,
    /// Deepest metadata nesting accepted before the block is rejected.
    pub metadata_max_depth: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE,
            noisy_keys: vec![DEFAULT_NOISY_KEY.to_string()],
            tick_interval: DEFAULT_TICK_INTERVAL,
            metadata_max_depth: DEFAULT_METADATA_MAX_DEPTH,
        }
    }
}

impl DashboardConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the display zone from an IANA name such as `"Europe/Berlin"`.
    pub fn with_timezone_name(mut self, name: &str) -> Result<Self, CoreError> {
        self.timezone = parse_timezone(name)?;
        Ok(self)
    }

    pub fn with_timezone(mut self, tz: Tz) -> Self {
        self.timezone = tz;
        self
    }

    pub fn with_noisy_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.noisy_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    pub fn with_metadata_max_depth(mut self, depth: usize) -> Self {
        self.metadata_max_depth = depth;
        self
    }
}

/// Parse an IANA time zone name.
pub fn parse_timezone(name: &str) -> Result<Tz, CoreError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| CoreError::UnknownTimeZone(name.to_string()))
}
