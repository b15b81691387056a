//! One authenticated interaction with the registry: login, calls, logout.
//!
//! # Design
//! A `Session` value only exists after a successful login, and `close`
//! consumes it, so "call before open" and "call after close" are
//! unrepresentable. Dropping a session without closing it sends nothing.

use log::{debug, info};
use uuid::Uuid;

use crate::client::RegistryClient;
use crate::error::Error;
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::types::{
    ApiRequest, ApiResponse, Credentials, RegisterTrackHub, ServerEndpoint, SessionToken, TrackHub,
};

/// An open, authenticated session bound to one transport.
pub struct Session<T: Transport> {
    client: RegistryClient,
    transport: T,
    user: String,
    token: SessionToken,
}

impl<T: Transport> Session<T> {
    /// Exchange `credentials` for a session token.
    pub fn open(transport: T, endpoint: &ServerEndpoint, credentials: &Credentials) -> Result<Self, Error> {
        let client = RegistryClient::new(endpoint.base_url());
        let response = send(&transport, client.build_login(credentials))?;
        let token = client.parse_login(response)?;
        info!("logged in to {} as {}", client.base_url(), credentials.username);
        Ok(Self {
            client,
            transport,
            user: credentials.username.clone(),
            token,
        })
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn token(&self) -> &SessionToken {
        &self.token
    }

    /// Issue an arbitrary authenticated request.
    pub fn call(&self, request: &ApiRequest) -> Result<ApiResponse, Error> {
        let req = self.client.build_call(&self.user, &self.token, request)?;
        self.client.parse_call(self.send(req)?)
    }

    pub fn list_trackhubs(&self) -> Result<Vec<TrackHub>, Error> {
        let req = self.client.build_list_trackhubs(&self.user, &self.token);
        self.client.parse_list_trackhubs(self.send(req)?)
    }

    pub fn register_trackhub(&self, input: &RegisterTrackHub) -> Result<TrackHub, Error> {
        let req = self.client.build_register_trackhub(&self.user, &self.token, input)?;
        self.client.parse_register_trackhub(self.send(req)?)
    }

    pub fn get_trackhub(&self, id: Uuid) -> Result<TrackHub, Error> {
        let req = self.client.build_get_trackhub(&self.user, &self.token, id);
        self.client.parse_get_trackhub(self.send(req)?)
    }

    pub fn delete_trackhub(&self, id: Uuid) -> Result<(), Error> {
        let req = self.client.build_delete_trackhub(&self.user, &self.token, id);
        self.client.parse_delete_trackhub(self.send(req)?)
    }

    /// Release the token on the server.
    pub fn close(self) -> Result<(), Error> {
        let req = self.client.build_logout(&self.user, &self.token);
        self.client.parse_logout(self.send(req)?)?;
        info!("logged out of {}", self.client.base_url());
        Ok(())
    }

    fn send(&self, request: HttpRequest) -> Result<HttpResponse, Error> {
        send(&self.transport, request)
    }
}

fn send<T: Transport>(transport: &T, request: HttpRequest) -> Result<HttpResponse, Error> {
    debug!("{} {}", request.method.as_str(), request.path);
    let response = transport.execute(request)?;
    debug!("-> {}", response.status);
    Ok(response)
}
