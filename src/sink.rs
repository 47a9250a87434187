use async_trait::async_trait;
use std::error::Error;
use std::fmt;

/// A delivery failure worth telling the operator about.
///
/// Reported before the matching error is returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// The server answered with a non-2xx status other than 422.
    HttpStatus {
        url: String,
        status: u16,
        body: String,
    },
    /// No usable response: DNS failure, refused connection, timeout,
    /// or a body that could not be read.
    Transport {
        url: String,
        message: String,
        /// Source chain of the error, outermost first.
        trace: Vec<String>,
    },
}

impl Diagnostic {
    pub fn http_status(url: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Diagnostic::HttpStatus {
            url: url.into(),
            status,
            body: body.into(),
        }
    }

    pub fn transport(url: impl Into<String>, error: &(dyn Error + 'static)) -> Self {
        let mut trace = Vec::new();
        let mut source = error.source();
        while let Some(cause) = source {
            trace.push(cause.to_string());
            source = cause.source();
        }

        Diagnostic::Transport {
            url: url.into(),
            message: error.to_string(),
            trace,
        }
    }

    pub fn url(&self) -> &str {
        match self {
            Diagnostic::HttpStatus { url, .. } | Diagnostic::Transport { url, .. } => url,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::HttpStatus { url, status, body } => {
                write!(f, "log delivery to {} failed with status {}: {}", url, status, body)
            }
            Diagnostic::Transport { url, message, trace } => {
                write!(f, "log delivery to {} failed: {}", url, message)?;
                for cause in trace {
                    write!(f, "\n  caused by: {}", cause)?;
                }
                Ok(())
            }
        }
    }
}

/// Operator-visible channel for delivery failures.
///
/// The client calls `report` on every failed request except a rejected
/// project key, then returns the error to its caller regardless of what
/// the sink does. Implementations should not block; the calling task is
/// waiting on the result.
#[async_trait]
pub trait DiagnosticSink: Send + Sync {
    async fn report(&self, diagnostic: &Diagnostic);
}

/// Default sink: one `tracing` error event per diagnostic.
///
/// Nothing is printed unless the application installed a subscriber
/// (see [`init_tracing`](crate::init::init_tracing)).
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

#[async_trait]
impl DiagnosticSink for TracingSink {
    async fn report(&self, diagnostic: &Diagnostic) {
        match diagnostic {
            Diagnostic::HttpStatus { url, status, body } => {
                tracing::error!(
                    target: "logship_client",
                    %url,
                    status,
                    %body,
                    "log delivery rejected by server"
                );
            }
            Diagnostic::Transport { url, message, trace } => {
                tracing::error!(
                    target: "logship_client",
                    %url,
                    error = %message,
                    trace = ?trace,
                    "log delivery failed"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Wrapped(std::io::Error);

    impl fmt::Display for Wrapped {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("request failed")
        }
    }

    impl Error for Wrapped {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn transport_collects_source_chain() {
        let err = Wrapped(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "connection refused",
        ));
        let diagnostic = Diagnostic::transport("http://127.0.0.1:1/log", &err);

        assert_eq!(
            diagnostic,
            Diagnostic::Transport {
                url: "http://127.0.0.1:1/log".into(),
                message: "request failed".into(),
                trace: vec!["connection refused".into()],
            }
        );
        assert!(diagnostic.to_string().contains("caused by: connection refused"));
    }

    #[test]
    fn http_status_display_includes_body() {
        let diagnostic = Diagnostic::http_status("http://logs/log", 503, "maintenance");
        assert_eq!(diagnostic.url(), "http://logs/log");
        assert_eq!(
            diagnostic.to_string(),
            "log delivery to http://logs/log failed with status 503: maintenance"
        );
    }
}
