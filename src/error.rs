//! Error types returned by [`LogClient`](crate::client::LogClient).

pub type Result<T> = std::result::Result<T, LogClientError>;

/// Everything that can go wrong while constructing a client or shipping
/// a single event.
#[derive(thiserror::Error, Debug)]
pub enum LogClientError {
    /// The project key was absent or blank. Raised at construction.
    #[error("project key is missing")]
    MissingCredential,

    /// A configuration value could not be accepted. Raised at construction.
    #[error("invalid {field} `{value}`: {reason}")]
    InvalidConfiguration {
        field: &'static str,
        value: String,
        reason: String,
    },

    /// The server answered 422: the project key was rejected.
    #[error("project key was rejected by the logging service")]
    InvalidCredential { body: String },

    /// Any other HTTP error status, or no response at all.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-2xx status that is not an HTTP
    /// error, such as a redirect that was not followed.
    #[error("unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// User context could not be converted to JSON.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LogClientError {
    /// `true` for errors that came from the HTTP layer.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            LogClientError::Transport(_) | LogClientError::UnexpectedStatus { .. }
        )
    }

    /// HTTP status associated with the failure, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            LogClientError::InvalidCredential { .. } => Some(422),
            LogClientError::UnexpectedStatus { status, .. } => Some(*status),
            LogClientError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
