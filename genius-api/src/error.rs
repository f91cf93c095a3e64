//! Error types for the Genius API client.
//!
//! Two layers:
//!
//! - [`DomainError`] is the closed set of expected failure conditions
//!   (bad or missing credential, scrape targets without content, an
//!   unavailable service). These are the errors the operation guard
//!   intercepts and turns into a diagnostic plus an absent result.
//! - [`GeniusError`] is the crate-wide error. It wraps [`DomainError`] and
//!   adds transport and decoding failures, which always propagate.

use std::fmt;
use thiserror::Error;

/// Stable, machine-readable tag of a [`DomainError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    CredentialInvalid,
    CredentialMissing,
    LyricsNotFound,
    PageNotFound,
    ServiceUnavailable,
}

impl ErrorKind {
    /// The tag written to the diagnostic sink.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CredentialInvalid => "token_invalid",
            Self::CredentialMissing => "token_missing",
            Self::LyricsNotFound => "lyrics_not_found",
            Self::PageNotFound => "page_not_found",
            Self::ServiceUnavailable => "service_unavailable",
        }
    }

    /// Message used when the error is raised without a custom one.
    pub fn default_message(self) -> &'static str {
        match self {
            Self::CredentialInvalid => {
                "Invalid token. The access token provided is expired, revoked, malformed or invalid for other reasons."
            }
            Self::CredentialMissing => {
                "Token is required for this method. Log in with a valid access token and try again."
            }
            Self::LyricsNotFound => "Lyrics payload was not found on the song page.",
            Self::PageNotFound => "The requested page does not exist.",
            Self::ServiceUnavailable => {
                "The service returned an unexpected response. It may be temporarily unavailable."
            }
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Expected, named failure conditions.
///
/// Credential errors carry the name of the operation that tripped them
/// (e.g. `Songs.song`) so diagnostics can be traced to a call site. Page and
/// service errors may carry an excerpt of the offending response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("{message}")]
    CredentialInvalid {
        message: String,
        operation: Option<String>,
    },

    #[error("{message}")]
    CredentialMissing {
        message: String,
        operation: Option<String>,
    },

    #[error("{message}")]
    LyricsNotFound { message: String },

    #[error("{message}")]
    PageNotFound {
        message: String,
        excerpt: Option<String>,
    },

    #[error("{message}")]
    ServiceUnavailable {
        message: String,
        excerpt: Option<String>,
    },
}

impl DomainError {
    pub fn credential_invalid() -> Self {
        Self::CredentialInvalid {
            message: ErrorKind::CredentialInvalid.default_message().to_owned(),
            operation: None,
        }
    }

    pub fn credential_missing() -> Self {
        Self::CredentialMissing {
            message: ErrorKind::CredentialMissing.default_message().to_owned(),
            operation: None,
        }
    }

    pub fn lyrics_not_found() -> Self {
        Self::LyricsNotFound {
            message: ErrorKind::LyricsNotFound.default_message().to_owned(),
        }
    }

    pub fn page_not_found(excerpt: Option<String>) -> Self {
        Self::PageNotFound {
            message: ErrorKind::PageNotFound.default_message().to_owned(),
            excerpt,
        }
    }

    pub fn service_unavailable(excerpt: Option<String>) -> Self {
        Self::ServiceUnavailable {
            message: ErrorKind::ServiceUnavailable.default_message().to_owned(),
            excerpt,
        }
    }

    /// Attach the operation name to a credential error. No-op for other kinds.
    #[must_use]
    pub fn with_operation(mut self, name: &str) -> Self {
        match &mut self {
            Self::CredentialInvalid { operation, .. } | Self::CredentialMissing { operation, .. } => {
                *operation = Some(name.to_owned());
            }
            _ => {}
        }
        self
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::CredentialInvalid { .. } => ErrorKind::CredentialInvalid,
            Self::CredentialMissing { .. } => ErrorKind::CredentialMissing,
            Self::LyricsNotFound { .. } => ErrorKind::LyricsNotFound,
            Self::PageNotFound { .. } => ErrorKind::PageNotFound,
            Self::ServiceUnavailable { .. } => ErrorKind::ServiceUnavailable,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::CredentialInvalid { message, .. }
            | Self::CredentialMissing { message, .. }
            | Self::LyricsNotFound { message }
            | Self::PageNotFound { message, .. }
            | Self::ServiceUnavailable { message, .. } => message,
        }
    }

    pub fn operation(&self) -> Option<&str> {
        match self {
            Self::CredentialInvalid { operation, .. } | Self::CredentialMissing { operation, .. } => {
                operation.as_deref()
            }
            _ => None,
        }
    }

    pub fn excerpt(&self) -> Option<&str> {
        match self {
            Self::PageNotFound { excerpt, .. } | Self::ServiceUnavailable { excerpt, .. } => {
                excerpt.as_deref()
            }
            _ => None,
        }
    }
}

/// Errors that can occur when talking to Genius.
#[derive(Debug, Error)]
pub enum GeniusError {
    /// An expected domain failure; intercepted by the operation guard.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// HTTP transport error (connection refused, timeout, TLS failure, etc.).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Failed to parse a JSON response or an embedded page payload.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The API answered with `meta.status` >= 400 (other than 401).
    #[error("API error (status {status}): {message}")]
    Api { status: u64, message: String },

    /// The caller passed an invalid combination of parameters.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{0}")]
    Other(String),
}

impl GeniusError {
    /// The domain error wrapped by this error, if any.
    pub fn as_domain(&self) -> Option<&DomainError> {
        match self {
            Self::Domain(e) => Some(e),
            _ => None,
        }
    }
}

/// Convenience alias for `Result<T, GeniusError>`.
pub type Result<T> = std::result::Result<T, GeniusError>;

/// First `max` characters of `text`, for error context.
pub(crate) fn excerpt(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
