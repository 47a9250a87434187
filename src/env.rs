use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LogClientError;

/// Deployment stage attached to every outgoing event as `app_env`.
///
/// Only these four values are accepted by the remote service; anything
/// else is rejected when the client is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Local,
    Development,
    Staging,
    #[default]
    Production,
}

impl Environment {
    /// All environments, in promotion order.
    pub const ALL: [Environment; 4] = [
        Environment::Local,
        Environment::Development,
        Environment::Staging,
        Environment::Production,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = LogClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Environment::ALL
            .into_iter()
            .find(|env| env.as_str() == normalized)
            .ok_or_else(|| LogClientError::InvalidConfiguration {
                field: "environment",
                value: s.to_string(),
                reason: "expected one of local, development, staging, production".to_string(),
            })
    }
}

impl From<Environment> for String {
    fn from(env: Environment) -> Self {
        env.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_values_case_insensitively() {
        assert_eq!("staging".parse::<Environment>().unwrap(), Environment::Staging);
        assert_eq!(" Local ".parse::<Environment>().unwrap(), Environment::Local);
        assert_eq!("PRODUCTION".parse::<Environment>().unwrap(), Environment::Production);
    }

    #[test]
    fn rejects_unknown_value() {
        let err = "qa".parse::<Environment>().unwrap_err();
        assert!(matches!(
            err,
            LogClientError::InvalidConfiguration { field: "environment", ref value, .. }
                if value == "qa"
        ));
    }

    #[test]
    fn default_is_production() {
        assert_eq!(Environment::default(), Environment::Production);
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&Environment::Development).unwrap();
        assert_eq!(json, "\"development\"");
    }
}
