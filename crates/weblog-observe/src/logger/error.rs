use thiserror::Error;

/// Failures while installing the process-wide log subscriber.
#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("unsupported WEBLOG_LOG_FORMAT '{0}': expected text, json or journald")]
    InvalidFormat(String),
    #[error("WEBLOG_LOG_FORMAT=journald needs a linux build with the `journald` feature")]
    JournaldNotSupported,
    #[error("a global log subscriber is already installed")]
    AlreadyInitialized,
    #[error("cannot install log subscriber: {0}")]
    InitializationFailed(String),
    #[error("WEBLOG_LOG_LEVEL '{0}' is not a valid filter directive")]
    InvalidLogLevel(String),
}
