//! Log formatting options for different output styles

use super::LogLevel;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

/// One formatted log record
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub target: String,
    pub message: String,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: impl Into<String>, target: impl Into<String>) -> Self {
        Self { timestamp: Utc::now(), level, target: target.into(), message: message.into() }
    }

    pub fn from_record(record: &log::Record) -> Self {
        Self::new(LogLevel::from(record.level()), record.args().to_string(), record.target())
    }
}

/// How logs should be formatted
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    /// Example: 2024-01-15 10:30:00.000 INFO  [vellum_core::resolver] resolved posts
    Human,
    /// Example: {"timestamp":"2024-01-15T10:30:00Z","level":"INFO","message":"resolved posts"}
    Json,
    /// Example: timestamp=2024-01-15T10:30:00Z level=INFO target=vellum_core message="resolved posts"
    Logfmt,
}

impl LogFormat {
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "human" | "text" => Some(LogFormat::Human),
            "json" => Some(LogFormat::Json),
            "logfmt" => Some(LogFormat::Logfmt),
            _ => None,
        }
    }

    pub fn format_entry(&self, entry: &LogEntry) -> String {
        match self {
            LogFormat::Human => format_human(entry),
            LogFormat::Json => format_json(entry),
            LogFormat::Logfmt => format_logfmt(entry),
        }
    }
}

fn format_human(entry: &LogEntry) -> String {
    format!(
        "{} {:5} [{}] {}",
        entry.timestamp.format("%Y-%m-%d %H:%M:%S%.3f"),
        entry.level.as_str(),
        entry.target,
        entry.message
    )
}

fn format_json(entry: &LogEntry) -> String {
    let mut json = Map::new();
    json.insert("timestamp".to_string(), Value::String(entry.timestamp.to_rfc3339()));
    json.insert("level".to_string(), Value::String(entry.level.as_str().to_string()));
    json.insert("target".to_string(), Value::String(entry.target.clone()));
    json.insert("message".to_string(), Value::String(entry.message.clone()));

    serde_json::to_string(&json).unwrap_or_else(|_| "Failed to serialize log entry".to_string())
}

fn format_logfmt(entry: &LogEntry) -> String {
    format!(
        "timestamp={} level={} target={} message=\"{}\"",
        entry.timestamp.to_rfc3339(),
        entry.level.as_str(),
        entry.target,
        entry.message.replace('"', "\\\"")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> LogEntry {
        LogEntry::new(LogLevel::Info, "resolved \"posts\"", "vellum_core::resolver")
    }

    #[test]
    fn test_json_format() {
        let formatted = LogFormat::Json.format_entry(&entry());
        let parsed: Value = serde_json::from_str(&formatted).unwrap();
        assert_eq!(parsed["message"], "resolved \"posts\"");
        assert_eq!(parsed["level"], "INFO");
        assert_eq!(parsed["target"], "vellum_core::resolver");
    }

    #[test]
    fn test_human_format() {
        let formatted = LogFormat::Human.format_entry(&entry());
        assert!(formatted.contains("INFO  [vellum_core::resolver] resolved"));
    }

    #[test]
    fn test_logfmt_escapes_quotes() {
        let formatted = LogFormat::Logfmt.format_entry(&entry());
        assert!(formatted.contains("level=INFO"));
        assert!(formatted.ends_with("message=\"resolved \\\"posts\\\"\""));
    }

    #[test]
    fn test_parse() {
        assert_eq!(LogFormat::parse("JSON"), Some(LogFormat::Json));
        assert_eq!(LogFormat::parse("logfmt"), Some(LogFormat::Logfmt));
        assert_eq!(LogFormat::parse("xml"), None);
    }
}
