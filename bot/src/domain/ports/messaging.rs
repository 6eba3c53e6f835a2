//! Message gateway port
//!
//! Interface to the chat platform's messaging surface: create, edit,
//! delete and fetch view messages, pin the main message, and resolve a
//! tournament's configured channel. The adapter owns the wire format;
//! the core only hands over [`Page`] content.

use async_trait::async_trait;

use crate::domain::entities::{ChannelId, MessageId, Page};
use crate::error::MessagingError;

/// A view message as known to the chat platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub id: MessageId,
    pub channel: ChannelId,
}

/// Port to the chat platform's messaging surface
#[async_trait]
pub trait MessageGateway: Send + Sync {
    /// Resolve a tournament's configured channel. Fails when the channel
    /// no longer exists, which aborts the whole render pass.
    async fn resolve_channel(&self, channel: &ChannelId) -> Result<ChannelId, MessagingError>;

    /// Create a new view message and return its identifier
    async fn create_message(
        &self,
        channel: &ChannelId,
        page: &Page,
    ) -> Result<MessageId, MessagingError>;

    /// Replace an existing view message's content
    async fn edit_message(
        &self,
        channel: &ChannelId,
        id: &MessageId,
        page: &Page,
    ) -> Result<(), MessagingError>;

    /// Delete a view message
    async fn delete_message(&self, channel: &ChannelId, id: &MessageId)
        -> Result<(), MessagingError>;

    /// Fetch a view message by identifier (used to revalidate persisted ids)
    async fn fetch_message(
        &self,
        channel: &ChannelId,
        id: &MessageId,
    ) -> Result<SentMessage, MessagingError>;

    /// Pin a message in its channel, best-effort
    async fn pin_message(&self, channel: &ChannelId, id: &MessageId) -> Result<(), MessagingError>;
}
