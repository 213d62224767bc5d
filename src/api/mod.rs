use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::Config;
use crate::db::Store;
use crate::services::{AccountStore, SeaOrmAccountStore};

pub mod auth;
mod error;
pub mod request_logs;
mod system;
mod types;

pub use error::ApiError;
pub use types::*;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,

    pub store: Store,

    pub accounts: Arc<dyn AccountStore>,

    pub start_time: std::time::Instant,
}

#[must_use]
pub fn create_app_state(config: Config, store: Store) -> Arc<AppState> {
    let accounts: Arc<dyn AccountStore> = Arc::new(SeaOrmAccountStore::new(
        store.clone(),
        config.security.clone(),
    ));

    Arc::new(AppState {
        config,
        store,
        accounts,
        start_time: std::time::Instant::now(),
    })
}

pub fn router(state: Arc<AppState>) -> Router {
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(state.config.server.secure_cookies)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            state.config.server.session_expiry_minutes,
        )));

    // Session layer wraps the recorder so it can read the signed-in email.
    let api_router = Router::new()
        .route("/health/live", get(system::health_live))
        .route("/health/ready", get(system::health_ready))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::get_current_user))
        .route("/request-logs", get(request_logs::list_request_logs))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            request_logs::record_request,
        ))
        .layer(session_layer)
        .with_state(state);

    Router::new()
        .nest("/api", api_router)
        .layer(TraceLayer::new_for_http())
}
