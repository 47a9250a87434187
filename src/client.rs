use crate::caller::Caller;
use crate::config::{Config, Settings};
use crate::error::{LogClientError, Result};
use crate::record::{Level, LogEvent};
use crate::sink::{Diagnostic, DiagnosticSink, TracingSink};
use crate::timestamp::format_timestamp;
use chrono::Utc;
use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Client that turns leveled logging calls into `POST <endpoint>/log`
/// requests.
///
/// Every call builds a complete [`LogEvent`] up front (timestamp, call
/// site, environment, user context) and then sends it once. Nothing is
/// buffered or retried: the returned future resolves with the decoded
/// response body or fails with a [`LogClientError`].
///
/// ```no_run
/// # async fn run() -> logship_client::error::Result<()> {
/// use logship_client::{client::LogClient, config::Config};
///
/// let client = LogClient::new(Config::new("project-key"), None)?;
/// client.info(Some("hello"), None).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct LogClient {
    settings: Settings,
    user: Option<Value>,
    http: Client,
    diagnostics: Arc<dyn DiagnosticSink>,
}

impl fmt::Debug for LogClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogClient")
            .field("settings", &self.settings)
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

/// Builder for [`LogClient`] when the defaults need overriding.
pub struct LogClientBuilder {
    config: Config,
    user: Option<Value>,
    http: Option<Client>,
    diagnostics: Option<Arc<dyn DiagnosticSink>>,
}

impl LogClientBuilder {
    /// User context attached verbatim to every event.
    pub fn user(mut self, user: Value) -> Self {
        self.user = Some(user);
        self
    }

    /// Same as [`user`](Self::user) for any serializable type.
    pub fn user_from<U: Serialize>(mut self, user: &U) -> Result<Self> {
        self.user = Some(serde_json::to_value(user)?);
        Ok(self)
    }

    /// Where delivery failures are reported. Defaults to [`TracingSink`].
    pub fn diagnostics(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = Some(sink);
        self
    }

    /// Use a preconfigured HTTP client (proxies, timeouts, TLS roots).
    pub fn http_client(mut self, client: Client) -> Self {
        self.http = Some(client);
        self
    }

    /// Validate the configuration and create the client. Performs no I/O.
    pub fn build(self) -> Result<LogClient> {
        let settings = self.config.validate()?;
        let http = match self.http {
            Some(client) => client,
            // Each call gets its own connection; nothing is kept open.
            None => Client::builder().pool_max_idle_per_host(0).build()?,
        };

        Ok(LogClient {
            settings,
            user: self.user,
            http,
            diagnostics: self.diagnostics.unwrap_or_else(|| Arc::new(TracingSink)),
        })
    }
}

impl LogClient {
    /// Create a client from `config` and optional user context.
    ///
    /// **Returns**
    /// - `Err(MissingCredential)` if the project key is blank.
    /// - `Err(InvalidConfiguration { .. })` for an unknown environment,
    ///   time zone or a malformed endpoint.
    pub fn new(config: Config, user: Option<Value>) -> Result<Self> {
        let mut builder = Self::builder(config);
        builder.user = user;
        builder.build()
    }

    pub fn builder(config: Config) -> LogClientBuilder {
        LogClientBuilder {
            config,
            user: None,
            http: None,
            diagnostics: None,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn user(&self) -> Option<&Value> {
        self.user.as_ref()
    }

    #[track_caller]
    pub fn debug<'a>(
        &'a self,
        message: Option<&str>,
        data: Option<Value>,
    ) -> impl Future<Output = Result<Value>> + Send + 'a {
        self.log(Level::Debug, message, data)
    }

    #[track_caller]
    pub fn info<'a>(
        &'a self,
        message: Option<&str>,
        data: Option<Value>,
    ) -> impl Future<Output = Result<Value>> + Send + 'a {
        self.log(Level::Info, message, data)
    }

    #[track_caller]
    pub fn notice<'a>(
        &'a self,
        message: Option<&str>,
        data: Option<Value>,
    ) -> impl Future<Output = Result<Value>> + Send + 'a {
        self.log(Level::Notice, message, data)
    }

    #[track_caller]
    pub fn warning<'a>(
        &'a self,
        message: Option<&str>,
        data: Option<Value>,
    ) -> impl Future<Output = Result<Value>> + Send + 'a {
        self.log(Level::Warning, message, data)
    }

    #[track_caller]
    pub fn error<'a>(
        &'a self,
        message: Option<&str>,
        data: Option<Value>,
    ) -> impl Future<Output = Result<Value>> + Send + 'a {
        self.log(Level::Error, message, data)
    }

    #[track_caller]
    pub fn critical<'a>(
        &'a self,
        message: Option<&str>,
        data: Option<Value>,
    ) -> impl Future<Output = Result<Value>> + Send + 'a {
        self.log(Level::Critical, message, data)
    }

    #[track_caller]
    pub fn alert<'a>(
        &'a self,
        message: Option<&str>,
        data: Option<Value>,
    ) -> impl Future<Output = Result<Value>> + Send + 'a {
        self.log(Level::Alert, message, data)
    }

    #[track_caller]
    pub fn emergency<'a>(
        &'a self,
        message: Option<&str>,
        data: Option<Value>,
    ) -> impl Future<Output = Result<Value>> + Send + 'a {
        self.log(Level::Emergency, message, data)
    }

    /// Log at an arbitrary level. The call site is captured here,
    /// before the returned future is first polled.
    #[track_caller]
    pub fn log<'a>(
        &'a self,
        level: Level,
        message: Option<&str>,
        data: Option<Value>,
    ) -> impl Future<Output = Result<Value>> + Send + 'a {
        self.log_with_caller(level, message, data, Caller::here())
    }

    /// Log with an explicitly supplied call site.
    pub fn log_with_caller<'a>(
        &'a self,
        level: Level,
        message: Option<&str>,
        data: Option<Value>,
        caller: Caller,
    ) -> impl Future<Output = Result<Value>> + Send + 'a {
        let event = self.build_event(level, message, data, caller);
        self.send_event(event)
    }

    /// Assemble the record for one call without sending it.
    pub fn build_event(
        &self,
        level: Level,
        message: Option<&str>,
        data: Option<Value>,
        caller: Caller,
    ) -> LogEvent {
        LogEvent {
            project_key: self.settings.project_key().to_string(),
            log_timestamp: format_timestamp(
                Utc::now(),
                self.settings.timezone(),
                self.settings.timestamp_style(),
            ),
            app_env: self.settings.environment(),
            level,
            class_name: caller.class_name,
            method_name: caller.method_name,
            line_number: caller.line,
            message: message.map(str::to_string),
            data,
            user: self.user.clone(),
        }
    }

    /// POST a prepared event once.
    ///
    /// **Returns**
    /// - `Ok(body)` on 2xx: the JSON response, `null` for an empty body,
    ///   or a JSON string when the body is not JSON.
    /// - `Err(InvalidCredential)` on 422.
    /// - `Err(Transport(..))` for any other 4xx/5xx status or network
    ///   failure, after reporting it to the diagnostic sink.
    /// - `Err(UnexpectedStatus { .. })` for a non-2xx status reqwest does
    ///   not treat as an error (an unfollowed 3xx), also reported first.
    pub async fn send_event(&self, event: LogEvent) -> Result<Value> {
        let url = self.settings.log_url().clone();
        tracing::debug!(target: "logship_client", level = %event.level, %url, "sending log event");

        let sent = self
            .http
            .post(url.clone())
            .header(ACCEPT, "application/json")
            .json(&event)
            .send()
            .await;
        let response = match sent {
            Ok(response) => response,
            Err(e) => return Err(self.transport_failure(&url, e).await),
        };

        let status = response.status();
        if status == StatusCode::UNPROCESSABLE_ENTITY {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(target: "logship_client", %url, "project key rejected");
            return Err(LogClientError::InvalidCredential { body });
        }

        if !status.is_success() {
            let failure = response.error_for_status_ref().err();
            let body = response.text().await.unwrap_or_else(|_| "<no body>".to_string());
            let diagnostic = Diagnostic::http_status(url.as_str(), status.as_u16(), body.clone());
            self.diagnostics.report(&diagnostic).await;
            return Err(match failure {
                Some(e) => LogClientError::Transport(e),
                None => LogClientError::UnexpectedStatus {
                    status: status.as_u16(),
                    body,
                },
            });
        }

        match response.text().await {
            Ok(text) => Ok(decode_body(&text)),
            Err(e) => Err(self.transport_failure(&url, e).await),
        }
    }

    async fn transport_failure(&self, url: &Url, error: reqwest::Error) -> LogClientError {
        self.diagnostics
            .report(&Diagnostic::transport(url.as_str(), &error))
            .await;
        LogClientError::Transport(error)
    }
}

fn decode_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::Environment;
    use serde_json::json;

    #[test]
    fn build_event_copies_configuration_and_user() {
        let client = LogClient::new(
            Config::new("abc").environment(Environment::Staging),
            Some(json!({"id": 7, "name": "Ada"})),
        )
        .unwrap();

        let event = client.build_event(
            Level::Warning,
            Some("disk almost full"),
            Some(json!({"free_mb": 120})),
            Caller::new("jobs::cleanup", "run", 88),
        );

        assert_eq!(event.project_key, "abc");
        assert_eq!(event.app_env, Environment::Staging);
        assert_eq!(event.level, Level::Warning);
        assert_eq!(event.class_name, "jobs::cleanup");
        assert_eq!(event.method_name, "run");
        assert_eq!(event.line_number, 88);
        assert_eq!(event.message.as_deref(), Some("disk almost full"));
        assert_eq!(event.data, Some(json!({"free_mb": 120})));
        assert_eq!(event.user, Some(json!({"id": 7, "name": "Ada"})));
    }

    #[test]
    fn user_from_serializes_struct() {
        #[derive(Serialize)]
        struct User {
            id: u32,
        }

        let client = LogClient::builder(Config::new("abc"))
            .user_from(&User { id: 5 })
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(client.user(), Some(&json!({"id": 5})));
    }

    #[test]
    fn decodes_response_bodies() {
        assert_eq!(decode_body(""), Value::Null);
        assert_eq!(decode_body("  \n"), Value::Null);
        assert_eq!(decode_body(r#"{"ok":true}"#), json!({"ok": true}));
        assert_eq!(decode_body("accepted"), json!("accepted"));
    }

    #[test]
    fn construction_fails_before_any_io() {
        let err = LogClient::new(Config::new("").endpoint("http://127.0.0.1:1"), None).unwrap_err();
        assert!(matches!(err, LogClientError::MissingCredential));

        let err = LogClient::new(Config::new("abc").environment("qa"), None).unwrap_err();
        assert!(matches!(err, LogClientError::InvalidConfiguration { field: "environment", .. }));
    }
}
