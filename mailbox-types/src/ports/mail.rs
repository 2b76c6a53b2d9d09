//! Upstream mail service port.

use serde_json::value::RawValue;

use crate::domain::{MailboxRequest, ServiceCredential};
use crate::error::UpstreamError;

/// Upstream JSON body, kept byte-for-byte.
pub type UpstreamBody = Box<RawValue>;

/// The upstream mail API.
///
/// Implementations issue exactly one HTTP call per invocation and never retry.
#[async_trait::async_trait]
pub trait MailApi: Send + Sync + 'static {
    async fn send(
        &self,
        request: &MailboxRequest,
        credential: &ServiceCredential,
    ) -> Result<UpstreamBody, UpstreamError>;
}
