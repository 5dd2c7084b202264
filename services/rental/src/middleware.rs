//! Session gate for protected routes

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};

use crate::error::ApiError;
use crate::state::AppState;

/// Reject requests with no active session
///
/// The authenticated identity is placed in the request extensions for
/// handlers to pick up; role checks happen per handler.
pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let identity = state
        .session
        .get()
        .await?
        .ok_or(ApiError::Unauthorized)?;

    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}
