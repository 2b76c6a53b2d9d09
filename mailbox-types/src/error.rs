//! Error types for the mailbox BFF.

use crate::domain::MailboxRequest;

/// Authentication failures reported by the auth mediator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// No bearer token and no session.
    #[error("Authentication required")]
    AuthRequired,

    /// A bearer token was present but failed verification.
    #[error("Invalid token")]
    InvalidToken,

    #[error("Failed to sign service token: {0}")]
    Signing(String),
}

/// Bearer token verification failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerifyError {
    #[error("Token expired")]
    Expired,

    #[error("Token rejected: {0}")]
    Rejected(String),
}

/// Failures talking to the upstream mail API.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Upstream returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed upstream body: {0}")]
    Decode(String),
}

/// Application-level errors (for HTTP responses).
///
/// Maps cleanly to HTTP status codes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Too Many Requests")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication required")]
    AuthRequired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("{0}")]
    MissingParameter(&'static str),

    #[error("{0}")]
    NotFound(String),

    #[error("Upstream call {} failed: {source}", .request.upstream_path())]
    UpstreamFailure {
        request: MailboxRequest,
        #[source]
        source: UpstreamError,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Caller-facing message. Upstream and internal details are never included.
    pub fn public_message(&self) -> String {
        match self {
            AppError::UpstreamFailure { request, .. } if request.is_delete() => {
                "Failed to delete the message".into()
            }
            AppError::UpstreamFailure { .. } => "Failed to fetch data from the service API".into(),
            AppError::Internal(_) => "Internal server error".into(),
            other => other.to_string(),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthRequired => AppError::AuthRequired,
            AuthError::InvalidToken => AppError::InvalidToken,
            AuthError::Signing(e) => AppError::Internal(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_errors_map_to_app_errors() {
        assert!(matches!(
            AppError::from(AuthError::AuthRequired),
            AppError::AuthRequired
        ));
        assert!(matches!(
            AppError::from(AuthError::InvalidToken),
            AppError::InvalidToken
        ));
        assert!(matches!(
            AppError::from(AuthError::Signing("bad key".into())),
            AppError::Internal(_)
        ));
    }

    #[test]
    fn test_public_messages() {
        assert_eq!(AppError::AuthRequired.public_message(), "Authentication required");
        assert_eq!(AppError::InvalidToken.public_message(), "Invalid token");
        assert_eq!(
            AppError::RateLimited {
                retry_after_secs: 3
            }
            .public_message(),
            "Too Many Requests"
        );
        assert_eq!(
            AppError::MissingParameter("Mailbox parameter is required").public_message(),
            "Mailbox parameter is required"
        );
    }

    #[test]
    fn test_upstream_failure_hides_details() {
        let err = AppError::UpstreamFailure {
            request: MailboxRequest::read("box", None),
            source: UpstreamError::Status {
                status: 502,
                body: "db connection refused".into(),
            },
        };
        assert!(err.to_string().contains("db connection refused"));
        assert_eq!(
            err.public_message(),
            "Failed to fetch data from the service API"
        );

        let err = AppError::UpstreamFailure {
            request: MailboxRequest::delete("box", "m1"),
            source: UpstreamError::Transport("timeout".into()),
        };
        assert_eq!(err.public_message(), "Failed to delete the message");
    }
}
