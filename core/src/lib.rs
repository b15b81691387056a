//! Client core for the trackhub registry API.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). A `Transport` supplied by the
//! caller executes the round-trip; `Session` strings the login, authenticated
//! calls and logout together on top of it.
//!
//! # Design
//! - `RegistryClient` is stateless: it holds only `base_url`.
//! - Each operation is split into `build_*` and `parse_*`, so the I/O
//!   boundary is explicit.
//! - `Session` owns the token; it can only be constructed by a successful
//!   login and is consumed by logout.
//! - Schema validation is a capability (`SchemaValidator`) backed by the
//!   `jsonschema` crate.

pub mod client;
pub mod error;
pub mod http;
pub mod schema;
pub mod session;
pub mod types;

pub use client::RegistryClient;
pub use error::{AuthOperation, Error, ErrorKind};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use schema::{Draft4Validator, SchemaValidator, ValidationError};
pub use session::Session;
pub use types::{
    ApiRequest, ApiResponse, Credentials, RegisterTrackHub, ServerEndpoint, SessionToken, TrackHub,
};
