//! Domain models for the mailbox BFF.

pub mod identity;
pub mod mailbox;
pub mod post;
pub mod rate_limit;
pub mod session;

pub use identity::{
    CallerIdentity, IdentitySource, SERVICE_TOKEN_TTL_SECS, ServiceClaims, ServiceCredential,
};
pub use mailbox::MailboxRequest;
pub use post::{Author, Authors, BlogPost, FullBlogPost, PostCatalog, PostDetail, PostFrontmatter};
pub use rate_limit::{RateDecision, RateLimitEntry};
pub use session::{Session, SessionUser};
