//! In-memory stand-in for the trackhub registry API.

use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    extract::{FromRequestParts, Path, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const DEFAULT_USER: &str = "trackhub1";
pub const DEFAULT_PASSWORD: &str = "trackhub1";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrackHub {
    pub id: Uuid,
    pub url: String,
    pub assemblies: BTreeMap<String, String>,
}

#[derive(Deserialize)]
pub struct RegisterTrackHub {
    pub url: String,
    #[serde(default)]
    pub assemblies: BTreeMap<String, String>,
}

#[derive(Serialize, Deserialize)]
pub struct LoginResponse {
    pub auth_token: String,
}

#[derive(Default)]
pub struct Registry {
    users: HashMap<String, String>,
    /// token -> user
    tokens: HashMap<String, String>,
    /// (owner, hub), in registration order
    hubs: Vec<(String, TrackHub)>,
}

pub type Db = Arc<RwLock<Registry>>;

/// Router seeded with the single `trackhub1`/`trackhub1` account.
pub fn app() -> Router {
    app_with_users([(DEFAULT_USER, DEFAULT_PASSWORD)])
}

pub fn app_with_users<'a>(users: impl IntoIterator<Item = (&'a str, &'a str)>) -> Router {
    let registry = Registry {
        users: users
            .into_iter()
            .map(|(u, p)| (u.to_string(), p.to_string()))
            .collect(),
        ..Registry::default()
    };
    let db: Db = Arc::new(RwLock::new(registry));
    Router::new()
        .route("/api/login", get(login))
        .route("/api/logout", get(logout))
        .route("/api/trackhub", get(list_trackhubs).post(register_trackhub))
        .route("/api/trackhub/{id}", get(get_trackhub).delete(delete_trackhub))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

type Rejection = (StatusCode, String);

fn unauthorized(reason: &str) -> Rejection {
    (StatusCode::UNAUTHORIZED, reason.to_string())
}

/// Split `Basic base64(user:password)` into its two halves.
fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let encoded = value.strip_prefix("Basic ")?;
    let decoded = String::from_utf8(STANDARD.decode(encoded.trim()).ok()?).ok()?;
    let (user, password) = decoded.split_once(':')?;
    Some((user.to_string(), password.to_string()))
}

/// The user behind a valid `user` + `auth_token` header pair.
pub struct AuthUser {
    pub name: String,
    pub token: String,
}

impl FromRequestParts<Db> for AuthUser {
    type Rejection = Rejection;

    async fn from_request_parts(parts: &mut Parts, db: &Db) -> Result<Self, Self::Rejection> {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let (Some(name), Some(token)) = (header("user"), header("auth_token")) else {
            warn!("request without session headers");
            return Err(unauthorized("Missing user or auth_token header"));
        };
        match db.read().await.tokens.get(&token) {
            Some(owner) if *owner == name => Ok(AuthUser { name, token }),
            _ => {
                warn!("rejected session for {name}");
                Err(unauthorized("Invalid or expired auth token"))
            }
        }
    }
}

async fn login(State(db): State<Db>, headers: HeaderMap) -> Result<Json<LoginResponse>, Rejection> {
    let Some((user, password)) = basic_credentials(&headers) else {
        return Err(unauthorized("Missing basic authentication"));
    };
    let mut registry = db.write().await;
    if registry.users.get(&user) != Some(&password) {
        warn!("failed login for {user}");
        return Err(unauthorized("Invalid username or password"));
    }
    let token = Uuid::new_v4().simple().to_string();
    registry.tokens.insert(token.clone(), user.clone());
    info!("{user} logged in");
    Ok(Json(LoginResponse { auth_token: token }))
}

async fn logout(State(db): State<Db>, auth: AuthUser) -> Json<serde_json::Value> {
    db.write().await.tokens.remove(&auth.token);
    info!("{} logged out", auth.name);
    Json(serde_json::json!({ "message": "Successfully logged out" }))
}

async fn list_trackhubs(State(db): State<Db>, auth: AuthUser) -> Json<Vec<TrackHub>> {
    let registry = db.read().await;
    Json(
        registry
            .hubs
            .iter()
            .filter(|(owner, _)| *owner == auth.name)
            .map(|(_, hub)| hub.clone())
            .collect(),
    )
}

async fn register_trackhub(
    State(db): State<Db>,
    auth: AuthUser,
    Json(input): Json<RegisterTrackHub>,
) -> Result<(StatusCode, Json<TrackHub>), Rejection> {
    if input.url.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "url must not be empty".to_string()));
    }
    if input.assemblies.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "assemblies must not be empty".to_string(),
        ));
    }
    let hub = TrackHub {
        id: Uuid::new_v4(),
        url: input.url,
        assemblies: input.assemblies,
    };
    db.write().await.hubs.push((auth.name, hub.clone()));
    Ok((StatusCode::CREATED, Json(hub)))
}

async fn get_trackhub(
    State(db): State<Db>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<TrackHub>, StatusCode> {
    let registry = db.read().await;
    registry
        .hubs
        .iter()
        .find(|(owner, hub)| *owner == auth.name && hub.id == id)
        .map(|(_, hub)| Json(hub.clone()))
        .ok_or(StatusCode::NOT_FOUND)
}

async fn delete_trackhub(
    State(db): State<Db>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> StatusCode {
    let mut registry = db.write().await;
    let before = registry.hubs.len();
    registry
        .hubs
        .retain(|(owner, hub)| !(*owner == auth.name && hub.id == id));
    if registry.hubs.len() < before {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}
