//! Signed session cookies.
//!
//! A cookie value is `hex(json(session)).hex(hmac_sha256(json))`. The session
//! body is not encrypted, only authenticated.

use std::sync::Arc;

use mailbox_types::{Clock, Session, SessionReader, SystemClock};

use crate::security::{sign_payload, verify_signature};

/// Cookie name used by the first-party auth provider.
pub const DEFAULT_SESSION_COOKIE: &str = "next-auth.session-token";

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Malformed session token")]
    Malformed,

    #[error("Session signature mismatch")]
    BadSignature,

    #[error("Session payload invalid: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Session expired")]
    Expired,
}

/// Session reader backed by HMAC-signed cookies.
pub struct HmacSessionReader {
    secret: String,
    cookie_name: String,
    clock: Arc<dyn Clock>,
}

impl HmacSessionReader {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            cookie_name: DEFAULT_SESSION_COOKIE.to_string(),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.cookie_name = name.into();
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Produces a cookie value for the given session.
    pub fn issue(&self, session: &Session) -> Result<String, SessionError> {
        let body = serde_json::to_vec(session)?;
        Ok(format!(
            "{}.{}",
            hex::encode(&body),
            sign_payload(&body, &self.secret)
        ))
    }

    /// Checks signature and expiry of a cookie value.
    pub fn decode(&self, token: &str) -> Result<Session, SessionError> {
        let (body_hex, signature) = token.split_once('.').ok_or(SessionError::Malformed)?;
        let body = hex::decode(body_hex).map_err(|_| SessionError::Malformed)?;

        if !verify_signature(&body, signature, &self.secret) {
            return Err(SessionError::BadSignature);
        }

        let session: Session = serde_json::from_slice(&body)?;
        if session.is_expired(self.clock.now()) {
            return Err(SessionError::Expired);
        }
        Ok(session)
    }
}

#[async_trait::async_trait]
impl SessionReader for HmacSessionReader {
    fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    async fn read_session(&self, token: &str) -> Option<Session> {
        match self.decode(token) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::debug!("Ignoring session cookie: {}", e);
                None
            }
        }
    }
}
