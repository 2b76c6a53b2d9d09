//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::{StatusCode, header::RETRY_AFTER},
    response::{IntoResponse, Response},
};

use mailbox_types::{
    AppError, BlogPost, ErrorResponse, MailApi, MailboxQuery, PostCatalog, PostDetail,
    ServiceCredential,
};

use crate::{AuthMediator, MailboxService};

/// Application state shared across handlers.
pub struct AppState<M: MailApi> {
    pub mediator: AuthMediator,
    pub mailbox: MailboxService<M>,
    pub posts: PostCatalog,
}

/// Wrapper to implement IntoResponse for AppError (orphan rule workaround).
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::AuthRequired | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::MissingParameter(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::UpstreamFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(ErrorResponse {
            error: self.0.public_message(),
        });

        match self.0 {
            AppError::RateLimited { retry_after_secs } => {
                (status, [(RETRY_AFTER, retry_after_secs.to_string())], body).into_response()
            }
            _ => (status, body).into_response(),
        }
    }
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

/// Repeated keys keep their first value, so `?fullMailboxId=a&fullMailboxId=b`
/// targets `a` instead of failing extraction.
fn mailbox_query(params: Vec<(String, String)>) -> MailboxQuery {
    let query = MailboxQuery::from_pairs(params);
    if let Some(mailbox) = &query.full_mailbox_id {
        tracing::Span::current().record("mailbox", mailbox.as_str());
    }
    query
}

/// Read a mailbox listing, or a single message when `messageId` is given.
#[tracing::instrument(skip_all, fields(mailbox = tracing::field::Empty))]
pub async fn read_mailbox<M: MailApi>(
    State(state): State<Arc<AppState<M>>>,
    Extension(credential): Extension<ServiceCredential>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<impl IntoResponse, ApiError> {
    let query = mailbox_query(params);
    let request = query.into_read_request()?;
    let body = state.mailbox.forward(request, &credential).await?;
    Ok(Json(body))
}

/// Delete a single message.
#[tracing::instrument(skip_all, fields(mailbox = tracing::field::Empty))]
pub async fn delete_message<M: MailApi>(
    State(state): State<Arc<AppState<M>>>,
    Extension(credential): Extension<ServiceCredential>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<impl IntoResponse, ApiError> {
    let query = mailbox_query(params);
    let request = query.into_delete_request()?;
    let body = state.mailbox.forward(request, &credential).await?;
    Ok(Json(body))
}

// ─────────────────────────────────────────────────────────────────────────────
// Posts
// ─────────────────────────────────────────────────────────────────────────────

/// List post metadata, newest first.
pub async fn list_posts<M: MailApi>(State(state): State<Arc<AppState<M>>>) -> Json<Vec<BlogPost>> {
    Json(state.posts.list())
}

/// Get a post by slug.
#[tracing::instrument(skip(state))]
pub async fn get_post<M: MailApi>(
    State(state): State<Arc<AppState<M>>>,
    Path(slug): Path<String>,
) -> Result<Json<PostDetail>, ApiError> {
    state
        .posts
        .by_slug(&slug)
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Post not found".into()).into())
}
