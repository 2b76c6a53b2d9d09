//! Authentication ports.

use crate::domain::Session;
use crate::error::VerifyError;

/// Claims of a verified bearer token, kept opaque.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenPayload(pub serde_json::Map<String, serde_json::Value>);

/// Validates externally issued bearer credentials.
#[async_trait::async_trait]
pub trait TokenVerifier: Send + Sync + 'static {
    /// Verifies a raw token (without the `Bearer ` prefix).
    async fn verify(&self, token: &str) -> Result<TokenPayload, VerifyError>;
}

/// Reads the first-party session carried by a cookie.
#[async_trait::async_trait]
pub trait SessionReader: Send + Sync + 'static {
    /// Name of the cookie holding the session token.
    fn cookie_name(&self) -> &str;

    /// Resolves a session token. Invalid, tampered or expired tokens yield `None`.
    async fn read_session(&self, token: &str) -> Option<Session>;
}
