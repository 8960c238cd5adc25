mod config;
mod error;
mod format;
mod level;
mod log;

pub use config::LoggerConfig;
pub use error::LoggerError;
pub use format::LoggerFormat;
pub use level::LoggerLevel;

/// Install the process-wide `tracing` subscriber. Call once, before spawning threads.
pub fn logger_init(cfg: &LoggerConfig) -> Result<(), LoggerError> {
    log::init(cfg)
}
