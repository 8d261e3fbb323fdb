use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::{ApiError, AppState};

/// Authentication middleware
///
/// Resolves the bearer token to a [`super::Session`] and adds it to the
/// request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    // Extract Authorization header
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(h) => match h.strip_prefix("Bearer ") {
            Some(token) => token,
            None => {
                return ApiError::unauthorized(
                    "invalid_auth",
                    "Authorization header must use Bearer scheme",
                )
                .into_response();
            }
        },
        None => {
            return ApiError::unauthorized("missing_auth", "Authorization header required")
                .into_response();
        }
    };

    match state.sessions.validate(token) {
        Some(session) => {
            request.extensions_mut().insert(session);
            next.run(request).await
        }
        None => ApiError::unauthorized("invalid_token", "Invalid or expired session token")
            .into_response(),
    }
}
