//! Error types for the registry client.
//!
//! # Design
//! Rejections of the login/logout exchange (`Auth`, `MalformedToken`) are
//! kept apart from rejections of authenticated calls (`Api`) so a caller can
//! tell "the session never existed" from "the session is fine but the server
//! refused this request". Every server rejection carries the numeric status
//! and the raw body text the server gave as its reason.

use std::fmt;

use thiserror::Error;

/// Which half of the credential exchange was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOperation {
    Login,
    Logout,
}

impl fmt::Display for AuthOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthOperation::Login => write!(f, "login"),
            AuthOperation::Logout => write!(f, "logout"),
        }
    }
}

/// Coarse classification of `Error` variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Auth,
    Api,
    Codec,
}

/// Errors returned by the registry client, session and schema validator.
#[derive(Debug, Error)]
pub enum Error {
    /// Connection or transport failure; no response was received.
    #[error("network error: {0}")]
    Network(String),

    /// Login or logout answered with a non-2xx status.
    #[error("couldn't {operation}, reason: {reason} [{status}]")]
    Auth {
        operation: AuthOperation,
        status: u16,
        reason: String,
    },

    /// Login succeeded but the body did not carry a usable `auth_token`.
    #[error("malformed login response: {0}")]
    MalformedToken(String),

    /// An authenticated call answered with a non-2xx status.
    #[error("request rejected, reason: {body} [{status}]")]
    Api { status: u16, body: String },

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The JSON Schema document itself is invalid.
    #[error("invalid schema: {0}")]
    Schema(String),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Network(_) => ErrorKind::Network,
            Error::Auth { .. } | Error::MalformedToken(_) => ErrorKind::Auth,
            Error::Api { .. } => ErrorKind::Api,
            Error::Serialization(_) | Error::Deserialization(_) | Error::Schema(_) => {
                ErrorKind::Codec
            }
        }
    }

    /// HTTP status of a server rejection, if this error is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Auth { status, .. } | Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
