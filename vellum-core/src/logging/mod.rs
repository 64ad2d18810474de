//! Logging backend for the `log` facade
//!
//! Library code only uses `log::{debug, info, warn}`. Binaries call
//! [`init_logging`] once at startup; records are written to stderr so that
//! stdout stays free for command output.
//!
//! ```rust,no_run
//! use vellum_core::config::LoggingConfig;
//!
//! vellum_core::logging::init_logging(&LoggingConfig::default()).unwrap();
//! log::info!("schema loaded");
//! ```

pub mod formatter;

pub use formatter::{LogEntry, LogFormat};

use crate::config::LoggingConfig;
use std::io::Write;
use std::sync::Once;

static INIT: Once = Once::new();

/// Severity threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "error" => Some(LogLevel::Error),
            "warn" | "warning" => Some(LogLevel::Warn),
            "info" => Some(LogLevel::Info),
            "debug" => Some(LogLevel::Debug),
            "trace" => Some(LogLevel::Trace),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
            LogLevel::Trace => "TRACE",
        }
    }

    fn filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

impl From<log::Level> for LogLevel {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => LogLevel::Error,
            log::Level::Warn => LogLevel::Warn,
            log::Level::Info => LogLevel::Info,
            log::Level::Debug => LogLevel::Debug,
            log::Level::Trace => LogLevel::Trace,
        }
    }
}

/// Install the Vellum logger
///
/// Safe to call more than once; only the first call takes effect.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let level = config.log_level()?;
    let format = config.log_format()?;

    let mut result = Ok(());
    INIT.call_once(|| {
        result = log::set_boxed_logger(Box::new(VellumLogger { level, format }))
            .map(|()| log::set_max_level(level.filter()))
            .map_err(anyhow::Error::from);
    });
    result
}

struct VellumLogger {
    level: LogLevel,
    format: LogFormat,
}

impl log::Log for VellumLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        LogLevel::from(metadata.level()) <= self.level
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let entry = LogEntry::from_record(record);
        let _ = writeln!(std::io::stderr().lock(), "{}", self.format.format_entry(&entry));
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}
