//! Data Transfer Objects (DTOs) for requests and responses.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::MailboxRequest;
use crate::error::AppError;

/// Query string of the `/mailbox` route.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct MailboxQuery {
    /// Full mailbox address
    #[param(example = "inbox@example.com")]
    pub full_mailbox_id: Option<String>,
    /// Message identifier
    pub message_id: Option<String>,
}

impl MailboxQuery {
    /// Builds the query from raw key/value pairs. The first value of a
    /// repeated key wins; unknown keys are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "fullMailboxId" => &mut query.full_mailbox_id,
                "messageId" => &mut query.message_id,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        query
    }

    /// Builds a read request. Empty values count as absent.
    pub fn into_read_request(self) -> Result<MailboxRequest, AppError> {
        let mailbox = non_empty(self.full_mailbox_id)
            .ok_or(AppError::MissingParameter("Mailbox parameter is required"))?;
        Ok(MailboxRequest::read(mailbox, non_empty(self.message_id)))
    }

    /// Builds a delete request; both identifiers are required.
    pub fn into_delete_request(self) -> Result<MailboxRequest, AppError> {
        match (non_empty(self.full_mailbox_id), non_empty(self.message_id)) {
            (Some(mailbox), Some(message_id)) => Ok(MailboxRequest::delete(mailbox, message_id)),
            _ => Err(AppError::MissingParameter(
                "Mailbox and messageId parameters are required",
            )),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Error body returned by every failing route.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "Authentication required")]
    pub error: String,
}
