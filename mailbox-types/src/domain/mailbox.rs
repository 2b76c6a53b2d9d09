//! Mailbox operations forwarded to the upstream mail service.
//!
//! Mailbox and message identifiers are opaque; they are only ever used as
//! path segments.

/// A caller's intent against the upstream mail API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MailboxRequest {
    /// `GET /mailbox/{mailbox}`
    List { mailbox: String },
    /// `GET /mailbox/{mailbox}/message/{message_id}`
    Read { mailbox: String, message_id: String },
    /// `DELETE /mailbox/{mailbox}/message/{message_id}`
    Delete { mailbox: String, message_id: String },
}

impl MailboxRequest {
    /// Read request; a message id selects a single message instead of the listing.
    pub fn read(mailbox: impl Into<String>, message_id: Option<String>) -> Self {
        match message_id {
            Some(message_id) => Self::Read {
                mailbox: mailbox.into(),
                message_id,
            },
            None => Self::List {
                mailbox: mailbox.into(),
            },
        }
    }

    pub fn delete(mailbox: impl Into<String>, message_id: impl Into<String>) -> Self {
        Self::Delete {
            mailbox: mailbox.into(),
            message_id: message_id.into(),
        }
    }

    pub fn mailbox(&self) -> &str {
        match self {
            Self::List { mailbox } | Self::Read { mailbox, .. } | Self::Delete { mailbox, .. } => {
                mailbox
            }
        }
    }

    pub fn message_id(&self) -> Option<&str> {
        match self {
            Self::List { .. } => None,
            Self::Read { message_id, .. } | Self::Delete { message_id, .. } => Some(message_id),
        }
    }

    pub fn is_delete(&self) -> bool {
        matches!(self, Self::Delete { .. })
    }

    /// Unencoded upstream path segments, in order.
    pub fn path_segments(&self) -> Vec<&str> {
        match self.message_id() {
            Some(message_id) => vec!["mailbox", self.mailbox(), "message", message_id],
            None => vec!["mailbox", self.mailbox()],
        }
    }

    /// Upstream path, for logging.
    pub fn upstream_path(&self) -> String {
        format!("/{}", self.path_segments().join("/"))
    }
}
