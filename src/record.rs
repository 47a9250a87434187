use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::env::Environment;

/// Severity of a log event, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Debug,
    Info,
    Notice,
    Warning,
    Error,
    Critical,
    Alert,
    Emergency,
}

impl Level {
    pub const ALL: [Level; 8] = [
        Level::Debug,
        Level::Info,
        Level::Notice,
        Level::Warning,
        Level::Error,
        Level::Critical,
        Level::Alert,
        Level::Emergency,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Notice => "notice",
            Level::Warning => "warning",
            Level::Error => "error",
            Level::Critical => "critical",
            Level::Alert => "alert",
            Level::Emergency => "emergency",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Level::ALL
            .into_iter()
            .find(|level| level.as_str() == normalized)
            .ok_or_else(|| format!("Invalid log level: '{}'", s))
    }
}

/// The record posted to `<endpoint>/log` for every logging call.
///
/// Field names are the wire names; `message`, `data` and `user` are sent
/// as `null` when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEvent {
    pub project_key: String,
    pub log_timestamp: String,
    pub app_env: Environment,
    pub level: Level,
    pub class_name: String,
    pub method_name: String,
    pub line_number: u32,
    pub message: Option<String>,
    pub data: Option<serde_json::Value>,
    pub user: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn levels_are_ordered_by_severity() {
        assert!(Level::Debug < Level::Info);
        assert!(Level::Alert < Level::Emergency);
        assert_eq!(Level::ALL.iter().max(), Some(&Level::Emergency));
    }

    #[test]
    fn level_parses_its_own_name() {
        for level in Level::ALL {
            assert_eq!(level.as_str().parse::<Level>(), Ok(level));
        }
        assert!("fatal".parse::<Level>().is_err());
    }

    #[test]
    fn absent_fields_serialize_as_null() {
        let event = LogEvent {
            project_key: "abc".into(),
            log_timestamp: "2024-01-15T12:00:00Z".into(),
            app_env: Environment::Production,
            level: Level::Notice,
            class_name: "app::jobs".into(),
            method_name: "app::jobs".into(),
            line_number: 12,
            message: None,
            data: None,
            user: None,
        };

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(
            value,
            json!({
                "project_key": "abc",
                "log_timestamp": "2024-01-15T12:00:00Z",
                "app_env": "production",
                "level": "notice",
                "class_name": "app::jobs",
                "method_name": "app::jobs",
                "line_number": 12,
                "message": null,
                "data": null,
                "user": null,
            })
        );
    }
}
