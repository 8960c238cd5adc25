use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use weblog_model::LocalTime;

use crate::error::CoreError;

/// Layout of the `utcTime` field.
pub const UTC_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Converts event timestamps into the configured display zone.
#[derive(Debug, Clone, Copy)]
pub struct TimeNormalizer {
    tz: Tz,
}

impl TimeNormalizer {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Parse a `%Y-%m-%dT%H:%M:%SZ` string.
    pub fn from_utc_str(&self, value: &str) -> Result<LocalTime, CoreError> {
        let naive = NaiveDateTime::parse_from_str(value, UTC_FORMAT)
            .map_err(|e| CoreError::timestamp(value, e.to_string()))?;
        Ok(self.tz.from_utc_datetime(&naive))
    }

    /// Convert epoch milliseconds, truncated to whole seconds.
    ///
    /// `utcTime` only carries seconds; trace timestamps are cut to the same
    /// resolution so both sources compare on equal terms.
    pub fn from_epoch_millis(&self, millis: i64) -> Result<LocalTime, CoreError> {
        if millis < 0 {
            return Err(CoreError::timestamp(millis, "negative epoch milliseconds"));
        }
        let utc = DateTime::<Utc>::from_timestamp(millis.div_euclid(1_000), 0)
            .ok_or_else(|| CoreError::timestamp(millis, "epoch milliseconds out of range"))?;
        Ok(utc.with_timezone(&self.tz))
    }

    /// Current wall clock in the display zone.
    pub fn now(&self) -> LocalTime {
        Utc::now().with_timezone(&self.tz)
    }
}
