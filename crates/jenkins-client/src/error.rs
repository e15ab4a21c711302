// ABOUTME: Error types for Jenkins API calls using thiserror.
// ABOUTME: Not-found is a typed variant so callers never match on message text.

use thiserror::Error;

/// Errors returned by a Jenkins client capability.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The addressed object does not exist on the server.
    #[error("not found: {resource}")]
    NotFound { resource: String },

    /// An object with the same identity already exists.
    #[error("already exists: {resource}")]
    Conflict { resource: String },

    /// The server answered with a non-success HTTP status.
    #[error("jenkins returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The request never reached the server or the connection dropped.
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered but the body could not be understood.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Result type alias using ClientError.
pub type Result<T> = std::result::Result<T, ClientError>;

impl ClientError {
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    pub fn conflict(resource: impl Into<String>) -> Self {
        Self::Conflict {
            resource: resource.into(),
        }
    }

    /// Classify a raw error string coming out of a wrapped client library.
    ///
    /// Some Jenkins clients only report failures as text whose last token is
    /// the HTTP status, e.g. `"Could not find credential: 404"`. A trailing
    /// `404` becomes [`ClientError::NotFound`]; everything else is
    /// [`ClientError::Transport`].
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim_end().ends_with("404") {
            Self::NotFound { resource: message }
        } else {
            Self::Transport(message)
        }
    }

    /// Whether this error means the addressed object is absent.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::Http { status: 404, .. }
        )
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::InvalidResponse(err.to_string())
    }
}
