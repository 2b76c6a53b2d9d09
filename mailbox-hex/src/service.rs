//! Mailbox Application Services
//!
//! Authentication mediation and upstream forwarding.
//! Contains NO HTTP logic - the inbound adapter translates results.

use std::sync::Arc;

use mailbox_auth::ServiceTokenSigner;
use mailbox_types::{
    AppError, AuthError, CallerIdentity, MailApi, MailboxRequest, ServiceCredential,
    SessionReader, TokenVerifier, UpstreamBody,
};

/// Raw credentials presented by a caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestCredentials<'a> {
    /// Full `Authorization` header value.
    pub authorization: Option<&'a str>,
    /// Value of the session cookie.
    pub session_token: Option<&'a str>,
}

/// Resolves the caller and mints the internal service credential.
///
/// Resolution order:
/// 1. A `Bearer` token is verified first. A token that fails verification
///    rejects the request with `InvalidToken` without looking at the session.
///    A valid token yields an empty plan.
/// 2. The session is always read afterwards; a session with a user replaces
///    the plan from step 1.
/// 3. With neither, the request fails with `AuthRequired`.
pub struct AuthMediator {
    verifier: Arc<dyn TokenVerifier>,
    sessions: Arc<dyn SessionReader>,
    signer: ServiceTokenSigner,
}

impl AuthMediator {
    pub fn new(
        verifier: Arc<dyn TokenVerifier>,
        sessions: Arc<dyn SessionReader>,
        signer: ServiceTokenSigner,
    ) -> Self {
        Self {
            verifier,
            sessions,
            signer,
        }
    }

    /// Name of the cookie the session reader expects.
    pub fn session_cookie_name(&self) -> &str {
        self.sessions.cookie_name()
    }

    /// Resolves the caller identity.
    pub async fn identify(
        &self,
        credentials: RequestCredentials<'_>,
    ) -> Result<CallerIdentity, AuthError> {
        let mut identity = None;

        if let Some(token) = credentials
            .authorization
            .and_then(|h| h.strip_prefix("Bearer "))
        {
            match self.verifier.verify(token).await {
                // TODO: decode the plan from the bearer payload once the account service issues one.
                Ok(_payload) => identity = Some(CallerIdentity::from_token()),
                Err(e) => {
                    tracing::debug!("Bearer token rejected: {}", e);
                    return Err(AuthError::InvalidToken);
                }
            }
        }

        if let Some(token) = credentials.session_token {
            if let Some(user) = self
                .sessions
                .read_session(token)
                .await
                .and_then(|session| session.user)
            {
                identity = Some(CallerIdentity::from_session(&user));
            }
        }

        identity.ok_or(AuthError::AuthRequired)
    }

    /// Authenticates the caller and signs a fresh service credential.
    pub async fn authenticate(
        &self,
        credentials: RequestCredentials<'_>,
    ) -> Result<ServiceCredential, AuthError> {
        let identity = self.identify(credentials).await?;
        tracing::debug!(source = %identity.source, plan = %identity.plan, "Caller authenticated");
        self.signer.sign(&identity)
    }
}

/// Forwards mailbox operations to the upstream mail API.
///
/// Generic over `M: MailApi` - the adapter is injected at compile time.
pub struct MailboxService<M: MailApi> {
    api: M,
}

impl<M: MailApi> MailboxService<M> {
    pub fn new(api: M) -> Self {
        Self { api }
    }

    /// Returns a reference to the underlying upstream client.
    pub fn api(&self) -> &M {
        &self.api
    }

    /// Issues exactly one upstream call. Failures are logged here and
    /// surface as `UpstreamFailure`.
    pub async fn forward(
        &self,
        request: MailboxRequest,
        credential: &ServiceCredential,
    ) -> Result<UpstreamBody, AppError> {
        match self.api.send(&request, credential).await {
            Ok(body) => Ok(body),
            Err(source) => {
                tracing::error!(
                    path = %request.upstream_path(),
                    "Upstream mail API request failed: {}",
                    source
                );
                Err(AppError::UpstreamFailure { request, source })
            }
        }
    }
}
