//! REST handlers for the `/api/auth/*` routes.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tracing::{debug, info, warn};

use super::accounts::AccountDirectory;
use crate::auth::model::{ApiErrorBody, AuthResponseBody, LoginRequest, MeResponse};
use crate::error::AccountError;
use crate::routes;
use crate::wizard::ConsolidatedProfile;

/// Shared state for the auth routes.
#[derive(Clone, Default)]
pub struct DevServerState {
    pub accounts: Arc<AccountDirectory>,
}

/// Build the auth API router.
pub fn auth_routes(state: DevServerState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(routes::auth::REGISTER, post(register))
        .route(routes::auth::LOGIN, post(login))
        .route(routes::auth::LOGOUT, post(logout))
        .route(routes::auth::ME, get(me))
        .with_state(state)
}

impl IntoResponse for AccountError {
    fn into_response(self) -> Response {
        let status = match self {
            AccountError::DuplicateEmail => StatusCode::CONFLICT,
            AccountError::MissingField(_) => StatusCode::BAD_REQUEST,
            AccountError::InvalidCredentials | AccountError::Unauthenticated => {
                StatusCode::UNAUTHORIZED
            }
        };
        let body = ApiErrorBody {
            message: Some(self.to_string()),
        };
        (status, Json(body)).into_response()
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

async fn health(State(state): State<DevServerState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "chess-onboard-auth",
        "accounts": state.accounts.account_count().await
    }))
}

/// POST /api/auth/register
async fn register(
    State(state): State<DevServerState>,
    Json(profile): Json<ConsolidatedProfile>,
) -> Result<impl IntoResponse, AccountError> {
    let (user, token) = state.accounts.register(&profile).await.inspect_err(|e| {
        warn!(role = %profile.role, error = %e, "Registration rejected");
    })?;
    Ok((StatusCode::CREATED, Json(AuthResponseBody { user, token })))
}

/// POST /api/auth/login
async fn login(
    State(state): State<DevServerState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, AccountError> {
    let (user, token) = state.accounts.login(&req.email, &req.password).await?;
    info!(user_id = %user.id, "Login");
    Ok(Json(AuthResponseBody { user, token }))
}

/// POST /api/auth/logout
///
/// Always succeeds; a presented token is revoked.
async fn logout(State(state): State<DevServerState>, headers: HeaderMap) -> impl IntoResponse {
    if let Some(token) = bearer_token(&headers) {
        let revoked = state.accounts.revoke(token).await;
        debug!(revoked, "Logout");
    }
    Json(serde_json::json!({}))
}

/// GET /api/auth/me
async fn me(
    State(state): State<DevServerState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AccountError> {
    let token = bearer_token(&headers).ok_or(AccountError::Unauthenticated)?;
    let user = state.accounts.user_for_token(token).await?;
    Ok(Json(MeResponse { user }))
}
