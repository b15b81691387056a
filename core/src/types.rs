//! Domain values for the registry API.
//!
//! # Design
//! `TrackHub` and `RegisterTrackHub` mirror the mock-server's schema but are
//! defined independently; integration tests catch drift between the two
//! crates. Secrets (`Credentials::password`, `SessionToken`) get hand-written
//! `Debug` impls so they never end up in logs.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::http::HttpMethod;

/// Username/password pair exchanged for a session token at login.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Where the registry lives and how to talk to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerEndpoint {
    base_url: String,
    pub verify_tls: bool,
    pub timeout: Option<Duration>,
}

impl ServerEndpoint {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            verify_tls: true,
            timeout: None,
        }
    }

    pub fn with_verify_tls(mut self, verify_tls: bool) -> Self {
        self.verify_tls = verify_tls;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Opaque token issued by `/api/login`. Never empty.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    /// Returns `None` for an empty string; the server never issues one.
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        if token.is_empty() {
            None
        } else {
            Some(Self(token))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(***)")
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Body of a successful `/api/login` response.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct LoginResponse {
    pub auth_token: serde_json::Value,
}

/// A trackhub registered with the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrackHub {
    pub id: Uuid,
    pub url: String,
    pub assemblies: BTreeMap<String, String>,
}

/// Registration payload: the hub's `hub.txt` URL and the assemblies it
/// covers, keyed by short assembly name with the accession as value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegisterTrackHub {
    pub url: String,
    pub assemblies: BTreeMap<String, String>,
}

impl RegisterTrackHub {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            assemblies: BTreeMap::new(),
        }
    }

    pub fn assembly(mut self, name: impl Into<String>, accession: impl Into<String>) -> Self {
        self.assemblies.insert(name.into(), accession.into());
        self
    }
}

/// An arbitrary authenticated request, relative to the server's base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub path: String,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            path: path.into(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            method: HttpMethod::Post,
            path: path.into(),
            body: Some(body),
        }
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Delete,
            path: path.into(),
            body: None,
        }
    }
}

/// Successful response to an `ApiRequest`.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
    /// The body parsed as JSON, when it is JSON.
    pub json: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_strips_trailing_slash_and_verifies_tls_by_default() {
        let endpoint = ServerEndpoint::new("https://registry.example.org/");
        assert_eq!(endpoint.base_url(), "https://registry.example.org");
        assert!(endpoint.verify_tls);
        assert!(endpoint.timeout.is_none());
    }

    #[test]
    fn empty_token_is_rejected() {
        assert!(SessionToken::new("").is_none());
        assert_eq!(SessionToken::new("abc").unwrap().as_str(), "abc");
    }

    #[test]
    fn secrets_are_redacted_in_debug_output() {
        let creds = Credentials::new("trackhub1", "hunter2");
        let token = SessionToken::new("s3cr3t").unwrap();
        assert!(!format!("{creds:?}").contains("hunter2"));
        assert!(!format!("{token:?}").contains("s3cr3t"));
    }

    #[test]
    fn register_payload_serializes_assemblies_as_object() {
        let payload = RegisterTrackHub::new("http://example.org/hub.txt")
            .assembly("araTha1", "GCA_000001735.1")
            .assembly("ricCom1", "GCA_000151685.2");
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["url"], "http://example.org/hub.txt");
        assert_eq!(json["assemblies"]["araTha1"], "GCA_000001735.1");
        assert_eq!(json["assemblies"]["ricCom1"], "GCA_000151685.2");
    }
}
