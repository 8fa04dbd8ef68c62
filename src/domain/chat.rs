//! One-to-one chat: contacts, history and message persistence
//!
//! Relay mechanics live in [`crate::domain::rooms`]; this service owns the
//! database side of the chat feature.

use crate::contract::{
    Account, AuthContext, Message, MessageStatus, NewMessage, PortalError, Role,
};
use crate::domain::repository::{AccountRepository, MessageRepository};
use std::sync::Arc;

/// Chat persistence service
pub struct ChatService {
    accounts: Arc<dyn AccountRepository>,
    messages: Arc<dyn MessageRepository>,
}

impl ChatService {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        messages: Arc<dyn MessageRepository>,
    ) -> Self {
        Self { accounts, messages }
    }

    /// Chat contacts for the caller: students see lecturers, lecturers see
    /// students, admins see nobody
    pub async fn contacts(&self, ctx: &AuthContext) -> Result<Vec<Account>, PortalError> {
        match ctx.role {
            Role::Student => self
                .accounts
                .list_by_role(Role::Lecturer)
                .await
                .map_err(internal),
            Role::Lecturer => self
                .accounts
                .list_by_role(Role::Student)
                .await
                .map_err(internal),
            Role::Admin => Ok(Vec::new()),
        }
    }

    /// Conversation between the caller and another user, oldest first
    pub async fn history(
        &self,
        ctx: &AuthContext,
        other_user_id: i64,
    ) -> Result<Vec<Message>, PortalError> {
        // The peer must exist; history with a deleted account is a 404
        self.accounts
            .find_user(other_user_id)
            .await
            .map_err(internal)?
            .ok_or_else(|| PortalError::not_found("user", other_user_id))?;
        self.messages
            .conversation(ctx.user_id, other_user_id)
            .await
            .map_err(internal)
    }

    /// Persist an inbound chat message
    pub async fn save_message(
        &self,
        sender_id: i64,
        recipient_id: i64,
        message: NewMessage,
    ) -> Result<Message, PortalError> {
        if message.body.is_none()
            && message.audio_path.is_none()
            && message.attachment_path.is_none()
        {
            return Err(PortalError::validation(
                "message needs text, a file or a voice note",
            ));
        }
        self.messages
            .create(sender_id, recipient_id, message)
            .await
            .map_err(internal)
    }

    /// Mark a batch of messages delivered or seen
    ///
    /// `sent` is not a valid transition target.
    pub async fn mark_status(
        &self,
        message_ids: &[i64],
        status: MessageStatus,
    ) -> Result<(), PortalError> {
        if status == MessageStatus::Sent {
            return Err(PortalError::validation(
                "messages cannot be re-marked as sent",
            ));
        }
        if message_ids.is_empty() {
            return Ok(());
        }
        self.messages
            .set_status(message_ids, status)
            .await
            .map_err(internal)
    }

    /// Username lookup used when fanning out message events
    pub async fn username(&self, user_id: i64) -> Result<String, PortalError> {
        self.accounts
            .find_user(user_id)
            .await
            .map_err(internal)?
            .map(|u| u.username)
            .ok_or_else(|| PortalError::not_found("user", user_id))
    }
}

fn internal(err: anyhow::Error) -> PortalError {
    tracing::error!(error = %err, "repository failure");
    PortalError::Internal
}
