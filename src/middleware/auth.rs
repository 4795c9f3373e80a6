use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;

use crate::{AppState, error::AppError};

/// Username of the logged-in session, inserted for handlers behind
/// [`require_main`].
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub String);

/// Lets the request through only when its session is on the main page.
pub async fn require_main(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    match state.sessions.get(&jar).await {
        Some(session) if session.authenticated => {
            let username = session.username.unwrap_or_default();
            request.extensions_mut().insert(AuthenticatedUser(username));
            Ok(next.run(request).await)
        }
        _ => {
            tracing::debug!("Rejected unauthenticated request to {}", request.uri().path());
            Err(AppError::Unauthorized)
        }
    }
}
