use std::fmt;

use tracing_subscriber::EnvFilter;

use crate::logger::error::LoggerError;

/// Validated `EnvFilter` directive string (`"info"`, `"weblog_core=debug,info"`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerLevel(String);

impl LoggerLevel {
    pub fn new(level: impl Into<String>) -> Result<Self, LoggerError> {
        let level = level.into();
        EnvFilter::try_new(&level).map_err(|_| LoggerError::InvalidLogLevel(level.clone()))?;
        Ok(Self(level))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for LoggerLevel {
    fn default() -> Self {
        Self("info".to_string())
    }
}

impl fmt::Display for LoggerLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_directives() {
        assert_eq!(LoggerLevel::new("debug").unwrap().as_str(), "debug");
        assert!(LoggerLevel::new("weblog_core=trace,info").is_ok());
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            LoggerLevel::new("=="),
            Err(LoggerError::InvalidLogLevel(_))
        ));
    }
}
