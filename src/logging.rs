//! Log setup.
//!
//! The TUI owns the terminal, so its log lines go to rotating files under
//! `<data_dir>/logs/`. CLI commands log to stderr instead.

use std::path::Path;

use flexi_logger::{
    Cleanup, Criterion, FileSpec, FlexiLoggerError, Logger, LoggerHandle, Naming, WriteMode,
};

const LOG_FILE_BASENAME: &str = "grain";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;
const MAX_LOG_FILES: usize = 3;

/// Fallback level when neither the command line nor config.toml name one
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Error type for logger setup
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("unsupported log level `{0}`; expected trace|debug|info|warn|error")]
    InvalidLevel(String),
    #[error("could not start logger: {0}")]
    Start(#[from] FlexiLoggerError),
}

/// Start the file logger. Keep the returned handle alive for the whole run.
pub fn init_file_logging(level: &str, log_dir: &Path) -> Result<LoggerHandle, LoggingError> {
    let level = normalize_level(level)?;
    let handle = Logger::try_with_str(level)?
        .log_to_file(
            FileSpec::default()
                .directory(log_dir)
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()?;
    log::info!(
        "event=start version={} level={} log_dir={}",
        env!("CARGO_PKG_VERSION"),
        level,
        log_dir.display()
    );
    Ok(handle)
}

/// Start a stderr logger for one-shot CLI commands
pub fn init_stderr_logging(level: &str) -> Result<LoggerHandle, LoggingError> {
    let level = normalize_level(level)?;
    Ok(Logger::try_with_str(level)?.log_to_stderr().start()?)
}

/// Map user input to a level name flexi_logger accepts
pub fn normalize_level(level: &str) -> Result<&'static str, LoggingError> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(LoggingError::InvalidLevel(other.to_string())),
    }
}
