//! Caller identity and the internal service credential derived from it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::session::SessionUser;

/// Lifetime of a minted service credential.
pub const SERVICE_TOKEN_TTL_SECS: i64 = 15 * 60;

/// Where an authenticated identity came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentitySource {
    Session,
    Token,
}

impl std::fmt::Display for IdentitySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Session => write!(f, "session"),
            Self::Token => write!(f, "token"),
        }
    }
}

/// Per-request authenticated caller. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    pub source: IdentitySource,
    pub plan: String,
}

impl CallerIdentity {
    /// Identity established by a verified bearer token.
    ///
    /// Bearer tokens do not carry a decoded plan yet, so the plan is empty.
    pub fn from_token() -> Self {
        Self {
            source: IdentitySource::Token,
            plan: String::new(),
        }
    }

    /// Identity established by a first-party session.
    pub fn from_session(user: &SessionUser) -> Self {
        Self {
            source: IdentitySource::Session,
            plan: user.plan.clone().unwrap_or_default(),
        }
    }
}

/// Claim set of the internal service credential.
///
/// `plan` is the only application claim; `iat`/`exp` are the registered
/// time claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceClaims {
    pub plan: String,
    pub iat: i64,
    pub exp: i64,
}

impl ServiceClaims {
    pub fn new(identity: &CallerIdentity, issued_at: DateTime<Utc>) -> Self {
        let iat = issued_at.timestamp();
        Self {
            plan: identity.plan.clone(),
            iat,
            exp: iat + SERVICE_TOKEN_TTL_SECS,
        }
    }
}

/// A signed, short-lived token authorizing upstream calls for one request.
#[derive(Clone, PartialEq, Eq)]
pub struct ServiceCredential(String);

impl ServiceCredential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value for an `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl std::fmt::Debug for ServiceCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ServiceCredential(<redacted>)")
    }
}
