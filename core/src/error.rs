use std::fmt;
use thiserror::Error;

/// The error type for osssign operations
#[derive(Error, Debug)]
#[error("{kind}: {message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    #[source]
    source: Option<anyhow::Error>,
}

/// The kind of error that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Access key id or secret is empty, blank or otherwise unusable.
    CredentialInvalid,

    /// The MAC primitive could not be initialised with the key material.
    ///
    /// This is a fatal misconfiguration and must not be retried.
    CryptoInit,

    /// The url handed to the signer could not be parsed.
    UrlInvalid,

    /// Upload token or authorization value is malformed or its signature
    /// does not match.
    TokenInvalid,

    /// Upload token deadline has passed.
    TokenExpired,

    /// Upload token is pinned to a different request address.
    TokenDenied,

    /// Configuration error (missing fields, invalid values)
    ConfigInvalid,

    /// Unexpected errors (serialization, I/O, etc.)
    Unexpected,
}

impl Error {
    /// Create a new error with the given kind and message
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Add a source error
    pub fn with_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Check if this error was raised while validating an upload token or
    /// authorization value.
    pub fn is_token_error(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::TokenInvalid | ErrorKind::TokenExpired | ErrorKind::TokenDenied
        )
    }
}

// Convenience constructors
impl Error {
    /// Create a credential invalid error
    pub fn credential_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::CredentialInvalid, message)
    }

    /// Create a crypto init error
    pub fn crypto_init(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::CryptoInit, message)
    }

    /// Create a url invalid error
    pub fn url_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UrlInvalid, message)
    }

    /// Create a token invalid error
    pub fn token_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TokenInvalid, message)
    }

    /// Create a token expired error
    pub fn token_expired(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TokenExpired, message)
    }

    /// Create a token denied error
    pub fn token_denied(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TokenDenied, message)
    }

    /// Create a config invalid error
    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigInvalid, message)
    }

    /// Create an unexpected error
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, message)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::CredentialInvalid => write!(f, "invalid credentials"),
            ErrorKind::CryptoInit => write!(f, "mac initialization failed"),
            ErrorKind::UrlInvalid => write!(f, "malformed url"),
            ErrorKind::TokenInvalid => write!(f, "invalid token"),
            ErrorKind::TokenExpired => write!(f, "expired token"),
            ErrorKind::TokenDenied => write!(f, "token denied"),
            ErrorKind::ConfigInvalid => write!(f, "invalid configuration"),
            ErrorKind::Unexpected => write!(f, "unexpected error"),
        }
    }
}

/// Convenience type alias for Results
pub type Result<T> = std::result::Result<T, Error>;

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(err)
    }
}

impl From<http::uri::InvalidUri> for Error {
    fn from(err: http::uri::InvalidUri) -> Self {
        Self::url_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::header::InvalidHeaderValue> for Error {
    fn from(err: http::header::InvalidHeaderValue) -> Self {
        Self::unexpected(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::header::ToStrError> for Error {
    fn from(err: http::header::ToStrError) -> Self {
        Self::token_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<std::string::FromUtf8Error> for Error {
    fn from(err: std::string::FromUtf8Error) -> Self {
        Self::unexpected(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_includes_kind() {
        let err = Error::credential_invalid("empty key");
        assert_eq!(err.to_string(), "invalid credentials: empty key");
        assert_eq!(err.kind(), ErrorKind::CredentialInvalid);
        assert!(!err.is_token_error());
    }

    #[test]
    fn test_invalid_uri_maps_to_url_invalid() {
        let err: Error = "/a b".parse::<http::Uri>().unwrap_err().into();
        assert_eq!(err.kind(), ErrorKind::UrlInvalid);
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_token_kinds() {
        for err in [
            Error::token_invalid("x"),
            Error::token_expired("x"),
            Error::token_denied("x"),
        ] {
            assert!(err.is_token_error());
        }
    }
}
