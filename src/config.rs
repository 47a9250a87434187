use chrono_tz::Tz;
use reqwest::Url;

use crate::env::Environment;
use crate::error::{LogClientError, Result};
use crate::timestamp::TimestampStyle;

/// Service URL used when no endpoint is configured.
pub const DEFAULT_ENDPOINT: &str = "https://api.logship.dev";

/// User-supplied configuration for [`LogClient`](crate::client::LogClient).
///
/// Nothing is checked until [`Config::validate`] runs (which
/// `LogClient::new` does for you).
///
/// **Fields**
/// - `project_key`: credential identifying the project; required.
/// - `endpoint`: base URL, `/log` is appended. Defaults to [`DEFAULT_ENDPOINT`].
/// - `environment`: one of `local`, `development`, `staging`,
///   `production`. Defaults to `production`.
/// - `timezone`: IANA zone used to render timestamps. Defaults to `UTC`.
/// - `timestamp_style`: see [`TimestampStyle`].
#[derive(Clone, Debug, Default)]
pub struct Config {
    pub project_key: String,
    pub endpoint: Option<String>,
    pub environment: Option<String>,
    pub timezone: Option<String>,
    pub timestamp_style: TimestampStyle,
}

impl Config {
    pub fn new(project_key: impl Into<String>) -> Self {
        Self {
            project_key: project_key.into(),
            ..Self::default()
        }
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Accepts either an [`Environment`] or its string name.
    pub fn environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    pub fn timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = Some(timezone.into());
        self
    }

    pub fn timestamp_style(mut self, style: TimestampStyle) -> Self {
        self.timestamp_style = style;
        self
    }

    /// Check every field and fill in defaults. The project key is kept
    /// exactly as given.
    ///
    /// **Returns**
    /// - `Err(MissingCredential)` if the project key is blank.
    /// - `Err(InvalidConfiguration { .. })` for an unknown environment,
    ///   time zone, or an endpoint that is not an http(s) URL.
    pub fn validate(&self) -> Result<Settings> {
        if self.project_key.trim().is_empty() {
            return Err(LogClientError::MissingCredential);
        }

        let environment = match self.environment.as_deref() {
            Some(raw) => raw.parse::<Environment>()?,
            None => Environment::default(),
        };

        let timezone = match self.timezone.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => {
                raw.parse::<Tz>()
                    .map_err(|_| LogClientError::InvalidConfiguration {
                        field: "timezone",
                        value: raw.to_string(),
                        reason: "not a known IANA time zone".to_string(),
                    })?
            }
            _ => Tz::UTC,
        };

        let endpoint = match self.endpoint.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => raw.trim_end_matches('/').to_string(),
            _ => DEFAULT_ENDPOINT.to_string(),
        };
        let log_url = parse_log_url(&endpoint)?;

        Ok(Settings {
            project_key: self.project_key.clone(),
            endpoint,
            log_url,
            environment,
            timezone,
            timestamp_style: self.timestamp_style,
        })
    }
}

fn parse_log_url(endpoint: &str) -> Result<Url> {
    let invalid = |reason: &str| LogClientError::InvalidConfiguration {
        field: "endpoint",
        value: endpoint.to_string(),
        reason: reason.to_string(),
    };

    let url = Url::parse(&format!("{}/log", endpoint)).map_err(|e| invalid(&e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(&format!("unsupported scheme `{}`", other))),
    }
}

/// Validated, immutable configuration held by a client.
#[derive(Clone, Debug)]
pub struct Settings {
    project_key: String,
    endpoint: String,
    log_url: Url,
    environment: Environment,
    timezone: Tz,
    timestamp_style: TimestampStyle,
}

impl Settings {
    pub fn project_key(&self) -> &str {
        &self.project_key
    }

    /// Base URL without the `/log` suffix or a trailing slash.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn log_url(&self) -> &Url {
        &self.log_url
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn timestamp_style(&self) -> TimestampStyle {
        self.timestamp_style
    }
}
