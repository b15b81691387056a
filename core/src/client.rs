//! Stateless HTTP request builder and response parser for the registry API.
//!
//! # Design
//! `RegistryClient` holds only a `base_url` and carries no mutable state
//! between calls. Each remote operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. The session token is passed in explicitly; keeping track
//! of it is `Session`'s job.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use uuid::Uuid;

use crate::error::{AuthOperation, Error};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{
    ApiRequest, ApiResponse, Credentials, LoginResponse, RegisterTrackHub, SessionToken, TrackHub,
};

pub const LOGIN_PATH: &str = "/api/login";
pub const LOGOUT_PATH: &str = "/api/logout";
pub const TRACKHUB_PATH: &str = "/api/trackhub";

pub const USER_HEADER: &str = "user";
pub const AUTH_TOKEN_HEADER: &str = "auth_token";

/// Synchronous, stateless client for the registry API.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    base_url: String,
}

impl RegistryClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }

    // -- login / logout -----------------------------------------------------

    pub fn build_login(&self, credentials: &Credentials) -> HttpRequest {
        let basic = STANDARD.encode(format!("{}:{}", credentials.username, credentials.password));
        HttpRequest {
            method: HttpMethod::Get,
            path: self.url(LOGIN_PATH),
            headers: vec![("authorization".to_string(), format!("Basic {basic}"))],
            body: None,
        }
    }

    pub fn parse_login(&self, response: HttpResponse) -> Result<SessionToken, Error> {
        check_auth_status(&response, AuthOperation::Login)?;
        let login: LoginResponse = serde_json::from_str(&response.body)
            .map_err(|e| Error::MalformedToken(e.to_string()))?;
        login
            .auth_token
            .as_str()
            .and_then(SessionToken::new)
            .ok_or_else(|| Error::MalformedToken("auth_token is not a non-empty string".to_string()))
    }

    pub fn build_logout(&self, user: &str, token: &SessionToken) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: self.url(LOGOUT_PATH),
            headers: auth_headers(user, token),
            body: None,
        }
    }

    pub fn parse_logout(&self, response: HttpResponse) -> Result<(), Error> {
        check_auth_status(&response, AuthOperation::Logout)
    }

    // -- trackhubs ----------------------------------------------------------

    pub fn build_list_trackhubs(&self, user: &str, token: &SessionToken) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: self.url(TRACKHUB_PATH),
            headers: auth_headers(user, token),
            body: None,
        }
    }

    pub fn parse_list_trackhubs(&self, response: HttpResponse) -> Result<Vec<TrackHub>, Error> {
        check_status(&response)?;
        serde_json::from_str(&response.body).map_err(|e| Error::Deserialization(e.to_string()))
    }

    pub fn build_register_trackhub(
        &self,
        user: &str,
        token: &SessionToken,
        input: &RegisterTrackHub,
    ) -> Result<HttpRequest, Error> {
        let body = serde_json::to_string(input).map_err(|e| Error::Serialization(e.to_string()))?;
        let mut headers = auth_headers(user, token);
        headers.push(("content-type".to_string(), "application/json".to_string()));
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: self.url(TRACKHUB_PATH),
            headers,
            body: Some(body),
        })
    }

    pub fn parse_register_trackhub(&self, response: HttpResponse) -> Result<TrackHub, Error> {
        check_status(&response)?;
        serde_json::from_str(&response.body).map_err(|e| Error::Deserialization(e.to_string()))
    }

    pub fn build_get_trackhub(&self, user: &str, token: &SessionToken, id: Uuid) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: self.url(&format!("{TRACKHUB_PATH}/{id}")),
            headers: auth_headers(user, token),
            body: None,
        }
    }

    pub fn parse_get_trackhub(&self, response: HttpResponse) -> Result<TrackHub, Error> {
        check_status(&response)?;
        serde_json::from_str(&response.body).map_err(|e| Error::Deserialization(e.to_string()))
    }

    pub fn build_delete_trackhub(&self, user: &str, token: &SessionToken, id: Uuid) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: self.url(&format!("{TRACKHUB_PATH}/{id}")),
            headers: auth_headers(user, token),
            body: None,
        }
    }

    pub fn parse_delete_trackhub(&self, response: HttpResponse) -> Result<(), Error> {
        check_status(&response)
    }

    // -- generic authenticated call -----------------------------------------

    pub fn build_call(
        &self,
        user: &str,
        token: &SessionToken,
        request: &ApiRequest,
    ) -> Result<HttpRequest, Error> {
        let mut headers = auth_headers(user, token);
        let body = match &request.body {
            Some(value) => {
                headers.push(("content-type".to_string(), "application/json".to_string()));
                Some(serde_json::to_string(value).map_err(|e| Error::Serialization(e.to_string()))?)
            }
            None => None,
        };
        Ok(HttpRequest {
            method: request.method,
            path: self.url(&request.path),
            headers,
            body,
        })
    }

    pub fn parse_call(&self, response: HttpResponse) -> Result<ApiResponse, Error> {
        check_status(&response)?;
        let json = serde_json::from_str(&response.body).ok();
        Ok(ApiResponse {
            status: response.status,
            body: response.body,
            json,
        })
    }
}

fn auth_headers(user: &str, token: &SessionToken) -> Vec<(String, String)> {
    vec![
        (USER_HEADER.to_string(), user.to_string()),
        (AUTH_TOKEN_HEADER.to_string(), token.as_str().to_string()),
    ]
}

/// Map a non-2xx status on an authenticated call to `Error::Api`.
fn check_status(response: &HttpResponse) -> Result<(), Error> {
    if response.is_success() {
        return Ok(());
    }
    Err(Error::Api {
        status: response.status,
        body: response.body.clone(),
    })
}

fn check_auth_status(response: &HttpResponse, operation: AuthOperation) -> Result<(), Error> {
    if response.is_success() {
        return Ok(());
    }
    Err(Error::Auth {
        operation,
        status: response.status,
        reason: response.body.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn client() -> RegistryClient {
        RegistryClient::new("http://127.0.0.1:3000")
    }

    fn token() -> SessionToken {
        SessionToken::new("tok-123").unwrap()
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn build_login_uses_basic_auth() {
        let req = client().build_login(&Credentials::new("trackhub1", "trackhub1"));
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://127.0.0.1:3000/api/login");
        assert_eq!(req.header("Authorization"), Some("Basic dHJhY2todWIxOnRyYWNraHViMQ=="));
        assert!(req.body.is_none());
    }

    #[test]
    fn parse_login_extracts_token() {
        let token = client()
            .parse_login(response(200, r#"{"auth_token":"abc"}"#))
            .unwrap();
        assert_eq!(token.as_str(), "abc");
    }

    #[test]
    fn parse_login_rejected() {
        let err = client()
            .parse_login(response(401, "Invalid credentials"))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Auth {
                operation: AuthOperation::Login,
                status: 401,
                ..
            }
        ));
    }

    #[test]
    fn parse_login_missing_token_field() {
        let err = client().parse_login(response(200, r#"{"token":"abc"}"#)).unwrap_err();
        assert!(matches!(err, Error::MalformedToken(_)));
        assert_eq!(err.kind(), ErrorKind::Auth);
    }

    #[test]
    fn parse_login_non_string_or_empty_token() {
        let c = client();
        assert!(matches!(
            c.parse_login(response(200, r#"{"auth_token":42}"#)).unwrap_err(),
            Error::MalformedToken(_)
        ));
        assert!(matches!(
            c.parse_login(response(200, r#"{"auth_token":""}"#)).unwrap_err(),
            Error::MalformedToken(_)
        ));
        assert!(matches!(
            c.parse_login(response(200, "not json")).unwrap_err(),
            Error::MalformedToken(_)
        ));
    }

    #[test]
    fn build_logout_attaches_session_headers() {
        let req = client().build_logout("trackhub1", &token());
        assert_eq!(req.path, "http://127.0.0.1:3000/api/logout");
        assert_eq!(req.header("user"), Some("trackhub1"));
        assert_eq!(req.header("auth_token"), Some("tok-123"));
    }

    #[test]
    fn parse_logout_rejected_is_auth_error() {
        let err = client().parse_logout(response(401, "expired")).unwrap_err();
        assert!(matches!(
            err,
            Error::Auth {
                operation: AuthOperation::Logout,
                status: 401,
                ..
            }
        ));
        assert!(client().parse_logout(response(200, "")).is_ok());
    }

    #[test]
    fn build_register_trackhub_produces_json_post() {
        let input = RegisterTrackHub::new("http://example.org/hub.txt").assembly("araTha1", "GCA_000001735.1");
        let req = client().build_register_trackhub("trackhub1", &token(), &input).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://127.0.0.1:3000/api/trackhub");
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(req.header("auth_token"), Some("tok-123"));
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["url"], "http://example.org/hub.txt");
        assert_eq!(body["assemblies"]["araTha1"], "GCA_000001735.1");
    }

    #[test]
    fn parse_register_accepts_any_2xx() {
        let body = r#"{"id":"00000000-0000-0000-0000-000000000001","url":"http://h/hub.txt","assemblies":{"a":"GCA_1"}}"#;
        let hub = client().parse_register_trackhub(response(201, body)).unwrap();
        assert_eq!(hub.url, "http://h/hub.txt");
        assert_eq!(hub.assemblies["a"], "GCA_1");
    }

    #[test]
    fn parse_list_trackhubs_empty_and_rejected() {
        let c = client();
        assert!(c.parse_list_trackhubs(response(200, "[]")).unwrap().is_empty());
        let err = c.parse_list_trackhubs(response(401, "no session")).unwrap_err();
        assert!(matches!(err, Error::Api { status: 401, .. }));
    }

    #[test]
    fn parse_list_trackhubs_bad_json() {
        let err = client().parse_list_trackhubs(response(200, "not json")).unwrap_err();
        assert!(matches!(err, Error::Deserialization(_)));
    }

    #[test]
    fn get_and_delete_address_hub_by_id() {
        let id = Uuid::nil();
        let c = client();
        let get = c.build_get_trackhub("u", &token(), id);
        assert_eq!(get.method, HttpMethod::Get);
        assert_eq!(
            get.path,
            "http://127.0.0.1:3000/api/trackhub/00000000-0000-0000-0000-000000000000"
        );
        let delete = c.build_delete_trackhub("u", &token(), id);
        assert_eq!(delete.method, HttpMethod::Delete);
        assert_eq!(delete.path, get.path);
        assert!(c.parse_delete_trackhub(response(204, "")).is_ok());
        assert!(matches!(
            c.parse_delete_trackhub(response(404, "not found")).unwrap_err(),
            Error::Api { status: 404, .. }
        ));
    }

    #[test]
    fn build_call_joins_relative_path_and_encodes_body() {
        let c = client();
        let req = c
            .build_call("u", &token(), &ApiRequest::post("api/trackhub", serde_json::json!({"url": "x"})))
            .unwrap();
        assert_eq!(req.path, "http://127.0.0.1:3000/api/trackhub");
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(req.body.as_deref(), Some(r#"{"url":"x"}"#));

        let req = c.build_call("u", &token(), &ApiRequest::get("/api/trackhub")).unwrap();
        assert!(req.body.is_none());
        assert!(req.header("content-type").is_none());
    }

    #[test]
    fn parse_call_keeps_raw_body_and_optional_json() {
        let c = client();
        let ok = c.parse_call(response(200, r#"[1,2]"#)).unwrap();
        assert_eq!(ok.json, Some(serde_json::json!([1, 2])));
        let plain = c.parse_call(response(202, "accepted")).unwrap();
        assert_eq!(plain.body, "accepted");
        assert!(plain.json.is_none());
        let err = c.parse_call(response(500, "boom")).unwrap_err();
        assert!(matches!(err, Error::Api { status: 500, ref body } if body == "boom"));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let c = RegistryClient::new("http://127.0.0.1:3000/");
        assert_eq!(c.build_list_trackhubs("u", &token()).path, "http://127.0.0.1:3000/api/trackhub");
    }
}
