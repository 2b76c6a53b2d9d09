//! # Mailbox Hex
//!
//! Application services and HTTP adapter for the mailbox BFF.
//!
//! ## Architecture
//!
//! - `service/` - Auth mediation and upstream forwarding
//! - `inbound/` - HTTP adapter (Axum server, rate limiting, auth middleware)
//!
//! `MailboxService` is generic over `M: MailApi`, allowing different
//! upstream clients to be injected.

pub mod inbound;
pub mod openapi;
pub mod service;


pub use service::{AuthMediator, MailboxService, RequestCredentials};
