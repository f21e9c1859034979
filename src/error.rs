//! Error types for the IoT console
//!
//! Centralized error handling using snafu for ergonomic error definitions.
//! Every gateway failure is classified into an [`ErrorKind`] so the state
//! layer can turn it into a user-facing message instead of propagating it.

use snafu::Snafu;

/// Main error type for the application
#[derive(Debug, Snafu)]
pub enum Error {
    /// Gateway unreachable (DNS, refused connection, TLS, broken body)
    #[snafu(display("Network error: {message}"))]
    Network { message: String },

    /// Gateway did not answer before the client-side deadline
    #[snafu(display("Timeout: {message}"))]
    Timeout { message: String },

    /// 401: missing or expired session token
    #[snafu(display("Unauthorized: {message}"))]
    Auth { message: String },

    /// 403: authenticated but not allowed
    #[snafu(display("Forbidden: {message}"))]
    Permission { message: String },

    /// 404
    #[snafu(display("Not found: {message}"))]
    NotFound { message: String },

    /// 5xx
    #[snafu(display("Server error ({status}): {message}"))]
    Server { status: u16, message: String },

    /// Any other non-success status (400, 409, 422, ...)
    #[snafu(display("Request rejected ({status}): {message}"))]
    Rejected { status: u16, message: String },

    /// Client-side form check failed before submission
    #[snafu(display("Invalid {field}: {message}"))]
    Validation { field: String, message: String },

    /// Response body did not have any recognised shape
    #[snafu(display("Unexpected response from {endpoint}: {message}"))]
    Decode { endpoint: String, message: String },

    /// Invalid input or configuration
    #[snafu(display("Invalid: {message}"))]
    Invalid { message: String },

    /// IO error (config files, log directory)
    #[snafu(display("IO error: {source}"))]
    Io { source: std::io::Error },

    /// JSON serialization/deserialization error
    #[snafu(display("JSON error: {source}"))]
    Json { source: serde_json::Error },

    /// TOML deserialization error
    #[snafu(display("TOML parse error: {source}"))]
    TomlDe { source: toml::de::Error },

    /// TOML serialization error
    #[snafu(display("TOML serialize error: {source}"))]
    TomlSe { source: toml::ser::Error },
}

/// Coarse error taxonomy used for user-facing messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Unreachable or timed out
    Network,
    /// Session expired
    Auth,
    NotFound,
    Permission,
    /// 5xx, unexpected status or unreadable payload
    Server,
    /// Client-side form check
    Validation,
    /// Local failures (config, IO)
    Internal,
}

impl Error {
    /// Classify a non-success HTTP response
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = summarize_body(body, status);
        match status {
            401 => Error::Auth { message },
            403 => Error::Permission { message },
            404 => Error::NotFound { message },
            500..=599 => Error::Server { status, message },
            _ => Error::Rejected { status, message },
        }
    }

    /// Shorthand for a validation failure on a named field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Map this error onto the taxonomy
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Network { .. } | Error::Timeout { .. } => ErrorKind::Network,
            Error::Auth { .. } => ErrorKind::Auth,
            Error::Permission { .. } => ErrorKind::Permission,
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::Server { .. } | Error::Rejected { .. } | Error::Decode { .. } => {
                ErrorKind::Server
            }
            Error::Validation { .. } => ErrorKind::Validation,
            Error::Invalid { .. }
            | Error::Io { .. }
            | Error::Json { .. }
            | Error::TomlDe { .. }
            | Error::TomlSe { .. } => ErrorKind::Internal,
        }
    }
}

/// Pull a human-readable message out of an error body.
///
/// The backend answers with `{"message": ...}`, `{"error": ...}` or
/// `{"detail": ...}` depending on the controller; plain text is used as-is.
fn summarize_body(body: &str, status: u16) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return format!("HTTP {status}");
    }

    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(trimmed)
    {
        for key in ["message", "error", "detail"] {
            if let Some(serde_json::Value::String(text)) = map.get(key) {
                if !text.trim().is_empty() {
                    return text.trim().to_string();
                }
            }
        }
    }

    crate::utils::format::truncate(trimmed, 200)
}

impl From<reqwest::Error> for Error {
    fn from(source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Error::Timeout {
                message: source.to_string(),
            }
        } else if source.is_decode() {
            Error::Decode {
                endpoint: source
                    .url()
                    .map(|u| u.path().to_string())
                    .unwrap_or_default(),
                message: source.to_string(),
            }
        } else if let Some(status) = source.status() {
            Error::from_status(status.as_u16(), "")
        } else {
            Error::Network {
                message: source.to_string(),
            }
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io { source }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Error::Json { source }
    }
}

impl From<toml::de::Error> for Error {
    fn from(source: toml::de::Error) -> Self {
        Error::TomlDe { source }
    }
}

impl From<toml::ser::Error> for Error {
    fn from(source: toml::ser::Error) -> Self {
        Error::TomlSe { source }
    }
}

/// Result type alias for convenience
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert_eq!(Error::from_status(401, "").kind(), ErrorKind::Auth);
        assert_eq!(Error::from_status(403, "").kind(), ErrorKind::Permission);
        assert_eq!(Error::from_status(404, "").kind(), ErrorKind::NotFound);
        assert_eq!(Error::from_status(503, "").kind(), ErrorKind::Server);
        assert_eq!(Error::from_status(422, "").kind(), ErrorKind::Server);
    }

    #[test]
    fn test_body_message_extracted() {
        let body = r#"{"success":false,"message":"Maintenance task not found"}"#;
        let err = Error::from_status(404, body);
        assert_eq!(err.to_string(), "Not found: Maintenance task not found");

        let err = Error::from_status(500, r#"{"error":"Failed to fetch maintenance data"}"#);
        assert_eq!(
            err.to_string(),
            "Server error (500): Failed to fetch maintenance data"
        );
    }

    #[test]
    fn test_empty_body_uses_status() {
        let err = Error::from_status(502, "   ");
        assert_eq!(err.to_string(), "Server error (502): HTTP 502");
    }

    #[test]
    fn test_timeout_is_network_kind() {
        let err = Error::Timeout {
            message: "GET /devices".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::Network);
    }
}
