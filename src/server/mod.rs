//! HTTP surface for family groups.
//!
//! # Endpoints
//!
//! - `GET /health`: Health check endpoint (no auth required)
//! - `POST /family/create-family-group`: Create a group, returns its code
//! - `POST /family/join-family`: Join a group, returns a session token
//! - `GET /family/me`: Current group and members (auth required)

mod auth;
mod error;
mod handlers;
pub mod sessions;

pub use error::{ApiError, ErrorBody};
pub use sessions::{Session, SessionStore};

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;

use crate::db::GroupRepository;
use crate::family::{Argon2Hasher, FamilyGroupService};

/// The service as wired in production.
pub type GroupService = FamilyGroupService<GroupRepository, Argon2Hasher>;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub groups: Arc<GroupService>,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(groups: GroupService, sessions: SessionStore) -> Self {
        Self {
            groups: Arc::new(groups),
            sessions: Arc::new(sessions),
        }
    }
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    // Public routes (no auth)
    let public_routes = Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/family/create-family-group",
            post(handlers::create_family_group),
        )
        .route("/family/join-family", post(handlers::join_family));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route("/family/me", get(handlers::me))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Periodically drops expired sessions.
pub fn spawn_session_cleanup(sessions: Arc<SessionStore>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            let removed = sessions.cleanup_expired();
            if removed > 0 {
                tracing::debug!("Removed {} expired session(s)", removed);
            }
        }
    })
}
