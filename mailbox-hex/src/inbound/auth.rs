//! Authentication middleware for the mailbox routes.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Request, header::AUTHORIZATION},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;

use mailbox_types::{AppError, MailApi};

use super::handlers::{ApiError, AppState};
use crate::RequestCredentials;

/// Authentication middleware that mints the service credential.
///
/// On success the [`mailbox_types::ServiceCredential`] is stored in the
/// request extensions for the handler; on failure the request is answered
/// with 401 and never reaches the upstream call.
pub async fn auth_middleware<M: MailApi>(
    State(state): State<Arc<AppState<M>>>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let jar = CookieJar::from_headers(request.headers());
    let session_token = jar
        .get(state.mediator.session_cookie_name())
        .map(|c| c.value().to_string());
    let authorization = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    let credentials = RequestCredentials {
        authorization: authorization.as_deref(),
        session_token: session_token.as_deref(),
    };

    match state.mediator.authenticate(credentials).await {
        Ok(credential) => {
            request.extensions_mut().insert(credential);
            next.run(request).await
        }
        Err(e) => {
            tracing::debug!("Authentication failed: {}", e);
            ApiError(AppError::from(e)).into_response()
        }
    }
}
