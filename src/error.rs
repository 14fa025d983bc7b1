//! Error types for cred-check

use thiserror::Error;

/// Normalized failure signal reported by a service client
///
/// Adapters convert their transport-specific errors (octocrab, reqwest)
/// into this shape so the validator can classify failures without knowing
/// which SDK produced them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The service answered with a non-success HTTP status
    #[error("HTTP {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Message extracted from the response body
        message: String,
    },

    /// The service could not be reached (DNS, refused connection, timeout)
    #[error("network error: {0}")]
    Network(String),

    /// Any other failure (bad response body, client construction, ...)
    #[error("{kind}: {message}")]
    Other {
        /// Short name of the failure type
        kind: String,
        /// Human-readable detail
        message: String,
    },
}

impl ClientError {
    /// Build an [`ClientError::Other`] from a kind and message
    pub fn other(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Other {
            kind: kind.into(),
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            return Self::Network(err.to_string());
        }
        if let Some(status) = err.status() {
            return Self::Status {
                status: status.as_u16(),
                message: err.to_string(),
            };
        }
        if err.is_decode() {
            return Self::other("DecodeError", err.to_string());
        }
        if err.is_builder() {
            return Self::other("BuilderError", err.to_string());
        }
        if err.is_request() {
            return Self::Network(err.to_string());
        }
        Self::other("HttpError", err.to_string())
    }
}

impl From<octocrab::Error> for ClientError {
    fn from(err: octocrab::Error) -> Self {
        match err {
            octocrab::Error::GitHub { source, .. } => Self::Status {
                status: source.status_code.as_u16(),
                message: source.message,
            },
            octocrab::Error::Service { source, .. } => Self::Network(source.to_string()),
            octocrab::Error::Serde { source, .. } => Self::other("DecodeError", source.to_string()),
            other => {
                let message = octocrab_message(&other);
                // Transport failures surface as "Hyper Error" when the
                // connection itself could not be established
                if other.to_string().starts_with("Hyper Error") {
                    Self::Network(message)
                } else {
                    Self::other("GitHubError", message)
                }
            }
        }
    }
}

/// Message of an octocrab error without the backtrace its `Display` appends
fn octocrab_message(err: &octocrab::Error) -> String {
    if let Some(source) = std::error::Error::source(err) {
        return source.to_string();
    }
    strip_backtrace(&err.to_string()).to_string()
}

/// Cut a rendered error at the `Found at` backtrace marker
fn strip_backtrace(rendered: &str) -> &str {
    rendered
        .split_once("\n\nFound at")
        .map_or(rendered, |(head, _)| head)
        .trim_end()
}

/// Errors that can occur in cred-check
#[derive(Error, Debug)]
pub enum Error {
    /// Required configuration is missing or malformed
    #[error("configuration error: {0}")]
    Config(String),

    /// A service client call failed
    #[error(transparent)]
    Client(#[from] ClientError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_backtrace() {
        let rendered = "Service Error: client error (Connect)\n\nFound at    0: snafu::backtrace_impl\n   1: octocrab";
        assert_eq!(
            strip_backtrace(rendered),
            "Service Error: client error (Connect)"
        );
        assert_eq!(strip_backtrace("plain message"), "plain message");
    }
}
