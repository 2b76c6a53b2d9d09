//! OpenAPI specification and documentation.

#![allow(dead_code)] // Path functions are only used by utoipa for documentation generation

use mailbox_types::dto::{ErrorResponse, MailboxQuery};
use mailbox_types::domain::{Author, Authors, BlogPost, PostDetail, PostFrontmatter};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{ApiKey, ApiKeyValue, Http, HttpAuthScheme, SecurityScheme},
};

use mailbox_auth::DEFAULT_SESSION_COOKIE;

// Dummy functions to generate path documentation
// These are not the actual handlers, just for OpenAPI path generation

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = serde_json::Value, example = json!({"status": "healthy"}))
    )
)]
async fn health() {}

/// Read a mailbox listing, or one message when `messageId` is set
#[utoipa::path(
    get,
    path = "/mailbox",
    tag = "mailbox",
    params(MailboxQuery),
    security(("bearer_auth" = []), ("session_cookie" = [])),
    responses(
        (status = 200, description = "Upstream body, unmodified", body = serde_json::Value),
        (status = 400, description = "Mailbox parameter is required", body = ErrorResponse),
        (status = 401, description = "Invalid token or authentication required", body = ErrorResponse),
        (status = 429, description = "Too Many Requests", body = ErrorResponse),
        (status = 500, description = "Failed to fetch data from the service API", body = ErrorResponse)
    )
)]
async fn read_mailbox() {}

/// Delete a message
#[utoipa::path(
    delete,
    path = "/mailbox",
    tag = "mailbox",
    params(MailboxQuery),
    security(("bearer_auth" = []), ("session_cookie" = [])),
    responses(
        (status = 200, description = "Upstream body, unmodified", body = serde_json::Value),
        (status = 400, description = "Mailbox and messageId parameters are required", body = ErrorResponse),
        (status = 401, description = "Invalid token or authentication required", body = ErrorResponse),
        (status = 429, description = "Too Many Requests", body = ErrorResponse),
        (status = 500, description = "Failed to delete the message", body = ErrorResponse)
    )
)]
async fn delete_message() {}

/// List blog posts without content, newest first
#[utoipa::path(
    get,
    path = "/api/posts",
    tag = "posts",
    responses(
        (status = 200, description = "Post metadata", body = Vec<BlogPost>)
    )
)]
async fn list_posts() {}

/// Get a blog post by slug
#[utoipa::path(
    get,
    path = "/api/posts/{slug}",
    tag = "posts",
    params(
        ("slug" = String, Path, description = "Post slug")
    ),
    responses(
        (status = 200, description = "Frontmatter and markdown content", body = PostDetail),
        (status = 404, description = "Post not found", body = ErrorResponse)
    )
)]
async fn get_post() {}

/// OpenAPI documentation for the mailbox BFF.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Mailbox BFF API",
        version = "1.0.0",
        description = "Mediates mailbox reads and deletes for the temporary email front end.\n\n## Authentication\n\nSend either a first-party session cookie or a bearer token:\n\n```\nAuthorization: Bearer <access token>\n```\n\nRequests are limited per client address.",
        license(name = "MIT"),
    ),
    paths(
        health,
        read_mailbox,
        delete_message,
        list_posts,
        get_post,
    ),
    components(
        schemas(
            ErrorResponse,
            Author,
            Authors,
            BlogPost,
            PostDetail,
            PostFrontmatter,
        )
    ),

    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "mailbox", description = "Mailbox reads and deletes proxied to the mail service"),
        (name = "posts", description = "Blog content"),
    )
)]
pub struct ApiDoc;

/// Security schemes: bearer token and session cookie.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
            components.add_security_scheme(
                "session_cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(DEFAULT_SESSION_COOKIE))),
            );
        }
    }
}
