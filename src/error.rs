use thiserror::Error;
use std::io;

/// Generic error type
#[derive(Error, Debug)]
pub enum Error {
    /// Missing, malformed or invalid credential, or a verified but unauthorized identity
    #[error("Authorization error: {0}")]
    Auth(String),

    /// Unparseable query parameters
    #[error("Bad request: {0}")]
    MalformedQuery(String),

    /// Unparseable request body
    #[error("Bad request: {0}")]
    MalformedBody(String),

    /// Serial number in the request path is not an integer
    #[error("Bad request: invalid serial number: {0}")]
    InvalidSerial(String),

    /// Revocation-status service could not be reached
    #[error("Revocation service unavailable: {0}")]
    RemoteUnavailable(String),

    /// Revocation-status service answered with an error
    #[error("Revocation service error: {0}")]
    RemoteError(String),

    /// Issuance log failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Token issuer failure on the login path
    #[error("Token issuer error: {0}")]
    Issuer(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Storage(err.to_string())
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        Error::Internal(format!("Blocking task failed: {}", err))
    }
}
