use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    middleware_layer::auth::AuthUser,
    state::AppState,
};

/// The request payload for login.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// The response payload for a successful login.
#[derive(Serialize, Deserialize, Debug)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// The response payload for `/api/auth/me`.
#[derive(Serialize)]
pub struct MeResponse {
    pub username: String,
}

/// Handles login.
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response> {
    let Json(payload) = payload?;
    tracing::info!("🔐 Login attempt for: {}", payload.username);

    let access_token = state.tokens.login(&payload.username, &payload.password)?;

    let response = TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    };

    Ok((StatusCode::OK, Json(response)).into_response())
}

/// Returns the subject of the presented token.
#[axum::debug_handler]
pub async fn me(Extension(user): Extension<AuthUser>) -> Result<Response> {
    Ok((StatusCode::OK, Json(MeResponse { username: user.subject })).into_response())
}
