//! # Mailbox Auth
//!
//! Concrete adapters for the authentication ports of the mailbox BFF:
//!
//! - [`JwtTokenVerifier`] validates externally issued HS256 bearer tokens.
//! - [`HmacSessionReader`] reads HMAC-signed first-party session cookies.
//! - [`ServiceTokenSigner`] mints the short-lived internal service credential.

pub mod jwt;
pub mod security;
pub mod session;

pub use jwt::{JwtTokenVerifier, ServiceTokenSigner};
pub use session::{DEFAULT_SESSION_COOKIE, HmacSessionReader, SessionError};
