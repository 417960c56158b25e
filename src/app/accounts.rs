//! File-backed account store and the signup/login handlers.

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::http::server::AppState;
use crate::identity::ClientIdentity;

/// Stored credentials and role for one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub pass: String,
    pub role: String,
}

/// Users JSON file, read in full and rewritten on every signup.
///
/// Plaintext on purpose: this is the designated credential-stuffing target
/// of the demo application, not a real account system.
#[derive(Debug, Clone)]
pub struct AccountStore {
    path: PathBuf,
}

impl AccountStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// All users. A missing or unreadable file is an empty user set.
    pub async fn load(&self) -> HashMap<String, UserRecord> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_default(),
            Err(_) => HashMap::new(),
        }
    }

    /// Persist the whole user set, creating the parent directory if needed.
    pub async fn save(&self, users: &HashMap<String, UserRecord>) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let body = serde_json::to_vec_pretty(users).map_err(io::Error::other)?;
        tokio::fs::write(&self.path, body).await
    }
}

/// Payload for `POST /signup` and `POST /login`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CredentialsRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Register a new user with the `user` role.
pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<CredentialsRequest>,
) -> Response {
    let username = body.username.unwrap_or_default().trim().to_string();
    let password = body.password.unwrap_or_default().trim().to_string();

    if username.is_empty() || password.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Missing fields" })),
        )
            .into_response();
    }

    let mut users = state.accounts.load().await;
    if users.contains_key(&username) {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "error": "User already exists" })),
        )
            .into_response();
    }

    users.insert(
        username.clone(),
        UserRecord {
            pass: password,
            role: "user".to_string(),
        },
    );
    if let Err(error) = state.accounts.save(&users).await {
        tracing::error!(%error, "Failed to persist users file");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "storage failure" })),
        )
            .into_response();
    }

    tracing::info!(user = %username, "User registered");
    Json(json!({ "status": "created", "username": username, "role": "user" })).into_response()
}

/// Check credentials. A failure feeds the auth-failure counter with the
/// resolved client address in the log line, which is what the dashboards
/// watch during credential-stuffing runs.
pub async fn login(
    State(state): State<AppState>,
    Extension(identity): Extension<ClientIdentity>,
    Json(body): Json<CredentialsRequest>,
) -> Response {
    let username = body.username.unwrap_or_default();
    let password = body.password.unwrap_or_default();

    let users = state.accounts.load().await;
    if let Some(record) = users.get(&username) {
        if record.pass == password {
            let token = format!("valid-session-token-{}", fastrand::u32(..10_000));
            return Json(json!({
                "token": token,
                "username": username,
                "role": record.role
            }))
            .into_response();
        }
    }

    state.metrics.record_auth_failure();
    tracing::warn!(user = %username, ip = %identity.ip, "Failed login attempt");
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": "Invalid credentials" })),
    )
        .into_response()
}
