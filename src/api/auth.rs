use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_sessions::Session;

use super::{ApiError, ApiResponse, AppState};
use crate::services::Account;

/// Session key holding the signed-in account's email.
pub const SESSION_USER_KEY: &str = "user";

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct CurrentUserResponse {
    pub email: String,
    pub display_name: String,
    pub profile_url: Option<String>,
    pub roles: Vec<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /auth/login
/// Authenticate with email and password and start a session
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<CurrentUserResponse>>, ApiError> {
    if payload.email.trim().is_empty() {
        return Err(ApiError::validation("Email is required"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }

    let account = state
        .accounts
        .check_password(&payload.email, &payload.password)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    if let Err(e) = session.insert(SESSION_USER_KEY, &account.email).await {
        return Err(ApiError::internal(format!("Failed to create session: {e}")));
    }

    tracing::info!("User signed in: {}", account.email);
    Ok(Json(ApiResponse::success(
        current_user_response(&state, account).await?,
    )))
}

/// POST /auth/logout
pub async fn logout(session: Session) -> impl IntoResponse {
    let _ = session.flush().await;
    (StatusCode::OK, "Logged out")
}

/// GET /auth/me
pub async fn get_current_user(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Json<ApiResponse<CurrentUserResponse>>, ApiError> {
    let account = session_account(&state, &session).await?;
    Ok(Json(ApiResponse::success(
        current_user_response(&state, account).await?,
    )))
}

// ============================================================================
// Helpers
// ============================================================================

async fn current_user_response(
    state: &AppState,
    account: Account,
) -> Result<CurrentUserResponse, ApiError> {
    let roles = state.accounts.roles_of(&account).await?;
    Ok(CurrentUserResponse {
        email: account.email,
        display_name: account.display_name,
        profile_url: account.profile_url,
        roles,
    })
}

/// Resolves the signed-in account, or `Unauthorized`.
pub async fn session_account(state: &AppState, session: &Session) -> Result<Account, ApiError> {
    let email = session
        .get::<String>(SESSION_USER_KEY)
        .await
        .ok()
        .flatten()
        .ok_or_else(|| ApiError::Unauthorized("Not authenticated".to_string()))?;

    // The account may have been recreated by `migrate.users` since login.
    state
        .accounts
        .find_by_email(&email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("User not found".to_string()))
}

/// Resolves the signed-in account and checks it holds `role`.
pub async fn require_role(
    state: &AppState,
    session: &Session,
    role: &str,
) -> Result<Account, ApiError> {
    let account = session_account(state, session).await?;
    let roles = state.accounts.roles_of(&account).await?;

    if !roles.iter().any(|r| r == role) {
        return Err(ApiError::Forbidden(format!("Requires role {role}")));
    }

    Ok(account)
}
