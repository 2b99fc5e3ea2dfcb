//! Visitor message inbox rules.
//!
//! Messages arrive through the public contact form (handled elsewhere) and
//! move from unreplied to replied exactly once.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use folio_shared::types::MessageId;

/// Inbox errors.
#[derive(Debug, Error)]
pub enum InboxError {
    /// No message with this ID.
    #[error("Message not found")]
    NotFound,

    /// Reply text was blank.
    #[error("Response cannot be empty")]
    EmptyResponse,

    /// The message already has a reply.
    #[error("Message has already been replied to")]
    AlreadyReplied,
}

/// A visitor message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Message ID.
    pub id: MessageId,
    /// Sender name.
    pub name: String,
    /// Sender email.
    pub email: String,
    /// Subject line.
    pub subject: Option<String>,
    /// Body.
    pub message: String,
    /// Received timestamp.
    pub created_at: DateTime<Utc>,
    /// Reply timestamp.
    pub replied_at: Option<DateTime<Utc>>,
    /// Reply text.
    pub admin_response: Option<String>,
}

impl Message {
    /// Whether the message has been answered.
    #[must_use]
    pub const fn is_replied(&self) -> bool {
        self.replied_at.is_some()
    }
}

/// Check a reply against the message and return the text to store.
///
/// # Errors
///
/// Returns `InboxError::AlreadyReplied` if the message was answered, or
/// `InboxError::EmptyResponse` if the text is blank.
pub fn prepare_reply(message: &Message, response: &str) -> Result<String, InboxError> {
    if message.is_replied() {
        return Err(InboxError::AlreadyReplied);
    }
    let response = response.trim();
    if response.is_empty() {
        return Err(InboxError::EmptyResponse);
    }
    Ok(response.to_string())
}
