//! Shared fixtures for HTTP-level tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, Response},
};
use chrono::Utc;
use http_body_util::BodyExt;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde_json::value::RawValue;

use mailbox_auth::{
    DEFAULT_SESSION_COOKIE, HmacSessionReader, JwtTokenVerifier, ServiceTokenSigner,
};
use mailbox_hex::inbound::{FixedWindowLimiter, HttpServer};
use mailbox_hex::{AuthMediator, MailboxService};
use mailbox_types::{
    MailApi, MailboxRequest, PostCatalog, ServiceClaims, ServiceCredential, Session, SessionUser,
    UpstreamBody, UpstreamError,
};

pub const ACCESS_SECRET: &str = "access-token-secret";
pub const SERVICE_SECRET: &str = "nextauth-secret";

/// Upstream body with deliberate spacing, to check it is relayed verbatim.
pub const UPSTREAM_BODY: &str = r#"{"messages": [{"id": "m1"}],  "total": 1}"#;

/// Upstream error detail that must never reach the caller.
pub const UPSTREAM_SECRET_DETAIL: &str = "pg: password authentication failed";

pub const MANIFEST: &str = r#"[
    {"slug": "hello", "title": "Hello", "date": "2024-02-01T00:00:00.000Z", "description": "first post", "content": "Hi there"},
    {"slug": "newest", "title": "Newest", "date": "2024-06-01T00:00:00.000Z", "description": "latest", "tags": ["news"], "content": "Fresh"}
]"#;

#[derive(Debug, Clone)]
pub struct UpstreamCall {
    pub request: MailboxRequest,
    pub credential: String,
}

/// Upstream double recording every call.
pub struct RecordingMailApi {
    calls: Arc<Mutex<Vec<UpstreamCall>>>,
    fail: bool,
}

#[async_trait::async_trait]
impl MailApi for RecordingMailApi {
    async fn send(
        &self,
        request: &MailboxRequest,
        credential: &ServiceCredential,
    ) -> Result<UpstreamBody, UpstreamError> {
        self.calls.lock().unwrap().push(UpstreamCall {
            request: request.clone(),
            credential: credential.as_str().to_string(),
        });
        if self.fail {
            return Err(UpstreamError::Status {
                status: 502,
                body: UPSTREAM_SECRET_DETAIL.to_string(),
            });
        }
        Ok(RawValue::from_string(UPSTREAM_BODY.to_string()).unwrap())
    }
}

pub struct TestApp {
    pub router: Router,
    pub calls: Arc<Mutex<Vec<UpstreamCall>>>,
    pub limiter: Arc<FixedWindowLimiter>,
}

impl TestApp {
    pub fn new(requests_per_minute: u32) -> Self {
        Self::build(requests_per_minute, false)
    }

    pub fn with_failing_upstream() -> Self {
        Self::build(100, true)
    }

    fn build(requests_per_minute: u32, fail: bool) -> Self {
        let mediator = AuthMediator::new(
            Arc::new(JwtTokenVerifier::new(ACCESS_SECRET)),
            Arc::new(HmacSessionReader::new(SERVICE_SECRET)),
            ServiceTokenSigner::new(SERVICE_SECRET),
        );
        let calls = Arc::new(Mutex::new(Vec::new()));
        let upstream = RecordingMailApi {
            calls: calls.clone(),
            fail,
        };
        let posts = PostCatalog::from_json(MANIFEST).unwrap();

        let server = HttpServer::new(mediator, MailboxService::new(upstream), posts)
            .with_rate_limiter(FixedWindowLimiter::new(
                requests_per_minute,
                Duration::from_secs(60),
            ));

        Self {
            router: server.router(),
            limiter: server.rate_limiter(),
            calls,
        }
    }

    pub fn calls(&self) -> Vec<UpstreamCall> {
        self.calls.lock().unwrap().clone()
    }
}

/// A valid access token for the bearer path.
pub fn access_token() -> String {
    let claims = serde_json::json!({
        "sub": "user-1",
        "plan": "ignored",
        "exp": (Utc::now() + chrono::Duration::hours(1)).timestamp(),
    });
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(ACCESS_SECRET.as_bytes()),
    )
    .unwrap()
}

/// `Cookie` header value for a live session with the given plan.
pub fn session_cookie(plan: Option<&str>) -> String {
    let session = Session::new(
        SessionUser {
            email: Some("user@example.com".into()),
            plan: plan.map(String::from),
            ..Default::default()
        },
        Utc::now() + chrono::Duration::hours(1),
    );
    let value = HmacSessionReader::new(SERVICE_SECRET)
        .issue(&session)
        .unwrap();
    format!("{}={}", DEFAULT_SESSION_COOKIE, value)
}

pub struct Call<'a> {
    pub method: Method,
    pub uri: &'a str,
    pub bearer: Option<&'a str>,
    pub cookie: Option<&'a str>,
    pub forwarded_for: Option<&'a str>,
}

impl<'a> Call<'a> {
    pub fn get(uri: &'a str) -> Self {
        Self {
            method: Method::GET,
            uri,
            bearer: None,
            cookie: None,
            forwarded_for: None,
        }
    }

    pub fn delete(uri: &'a str) -> Self {
        Self {
            method: Method::DELETE,
            ..Self::get(uri)
        }
    }

    pub fn bearer(mut self, token: &'a str) -> Self {
        self.bearer = Some(token);
        self
    }

    pub fn cookie(mut self, cookie: &'a str) -> Self {
        self.cookie = Some(cookie);
        self
    }

    pub fn from_address(mut self, address: &'a str) -> Self {
        self.forwarded_for = Some(address);
        self
    }

    pub fn build(self) -> Request<Body> {
        let mut builder = Request::builder().method(self.method).uri(self.uri);
        if let Some(token) = self.bearer {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        if let Some(cookie) = self.cookie {
            builder = builder.header("Cookie", cookie);
        }
        if let Some(address) = self.forwarded_for {
            builder = builder.header("X-Forwarded-For", address);
        }
        builder.body(Body::empty()).unwrap()
    }
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}

/// Decodes a credential the way the upstream service would.
pub fn service_claims(credential: &str) -> ServiceClaims {
    decode::<ServiceClaims>(
        credential,
        &DecodingKey::from_secret(SERVICE_SECRET.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .unwrap()
    .claims
}
