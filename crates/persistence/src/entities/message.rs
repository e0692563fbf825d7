//! Chat message entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::ChatMessage;

/// Database row mapping for the chat_messages table.
#[derive(Debug, Clone, FromRow)]
pub struct MessageEntity {
    pub id: Uuid,
    pub chat_id: Uuid,
    pub sender_id: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl From<MessageEntity> for ChatMessage {
    fn from(entity: MessageEntity) -> Self {
        Self {
            id: entity.id,
            chat_id: entity.chat_id,
            sender_id: entity.sender_id,
            body: entity.body,
            created_at: entity.created_at,
        }
    }
}
