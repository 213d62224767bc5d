//! Request logging into the `request_logs` table and the Admin-only viewer.

use axum::{
    Json,
    extract::{OriginalUri, Query, Request, State},
    middleware::Next,
    response::Response,
};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Instant;
use tower_sessions::Session;

use super::auth::{SESSION_USER_KEY, require_role};
use super::{ApiError, ApiResponse, AppState, RequestLogDto};
use crate::constants::ROLE_ADMIN;
use crate::constants::limits::{DEFAULT_REQUEST_LOG_LIMIT, MAX_REQUEST_LOG_LIMIT};

#[derive(Debug, Deserialize)]
pub struct RequestLogQuery {
    pub limit: Option<u64>,
}

/// Records every request; a failed insert is logged and never fails the request.
pub async fn record_request(
    State(state): State<Arc<AppState>>,
    session: Session,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<OriginalUri>()
        .map_or_else(|| request.uri().path().to_string(), |uri| uri.0.path().to_string());
    let started = Instant::now();

    let response = next.run(request).await;

    let duration_ms = i64::try_from(started.elapsed().as_millis()).unwrap_or(i64::MAX);
    let user_email = session.get::<String>(SESSION_USER_KEY).await.ok().flatten();

    if let Err(e) = state
        .store
        .add_request_log(
            &method,
            &path,
            response.status().as_u16(),
            duration_ms,
            user_email,
        )
        .await
    {
        tracing::warn!("Failed to record request log: {}", e);
    }

    response
}

/// GET /request-logs
/// Most recent requests first. Requires the Admin role.
pub async fn list_request_logs(
    State(state): State<Arc<AppState>>,
    session: Session,
    Query(query): Query<RequestLogQuery>,
) -> Result<Json<ApiResponse<Vec<RequestLogDto>>>, ApiError> {
    require_role(&state, &session, ROLE_ADMIN).await?;

    let limit = query
        .limit
        .unwrap_or(DEFAULT_REQUEST_LOG_LIMIT)
        .clamp(1, MAX_REQUEST_LOG_LIMIT);

    let logs = state
        .store
        .recent_request_logs(limit)
        .await
        .map_err(|e| ApiError::Database(e.to_string()))?;

    Ok(Json(ApiResponse::success(
        logs.into_iter().map(RequestLogDto::from).collect(),
    )))
}
