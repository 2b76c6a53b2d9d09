//! Port traits (interfaces for adapters).
//!
//! These are the contracts that adapters must implement.
//! The application layer depends on these traits, not concrete implementations.

mod auth;
mod clock;
mod mail;

pub use auth::{SessionReader, TokenPayload, TokenVerifier};
pub use clock::{Clock, ManualClock, SystemClock};
pub use mail::{MailApi, UpstreamBody};
