//! # Mailbox Types
//!
//! Domain types and port traits for the mailbox backend-for-frontend.
//! This crate has ZERO external IO dependencies - only data structures,
//! request rules, and trait definitions.
//!
//! ## Architecture
//!
//! This crate is the **innermost core** of the hexagonal architecture:
//! - `domain/` - Caller identity, service claims, sessions, rate-limit windows, posts
//! - `ports/` - Trait definitions that adapters must implement
//! - `dto/` - Data Transfer Objects for the HTTP boundary
//! - `error/` - Authentication, upstream and application error types

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    Author, Authors, BlogPost, CallerIdentity, FullBlogPost, IdentitySource, MailboxRequest,
    PostCatalog, PostDetail, PostFrontmatter, RateDecision, RateLimitEntry, SERVICE_TOKEN_TTL_SECS,
    ServiceClaims, ServiceCredential, Session, SessionUser,
};
pub use dto::*;
pub use error::{AppError, AuthError, UpstreamError, VerifyError};
pub use ports::{
    Clock, MailApi, ManualClock, SessionReader, SystemClock, TokenPayload, TokenVerifier,
    UpstreamBody,
};
