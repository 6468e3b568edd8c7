use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::state::AppState;

/// The authenticated caller, inserted into request extensions by `require_auth`.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The token subject.
    pub subject: String,
}

/// A middleware that requires a valid bearer token to be present.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `request` - The incoming request.
/// * `next` - The next middleware in the chain.
///
/// # Returns
///
/// The downstream `Response`, or a 401 error response.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    tracing::debug!("🔐 Checking authentication...");

    let header_value = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let subject = match state.tokens.authenticate_header(header_value) {
        Ok(subject) => subject,
        Err(e) => return e.into_response(),
    };

    tracing::debug!("✅ User authenticated: {}", subject);

    request.extensions_mut().insert(AuthUser { subject });

    next.run(request).await
}
