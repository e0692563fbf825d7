//! Chat room entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

use domain::models::{ChatRoom, ChatStatus};

/// Database row mapping for the chats table.
///
/// `members` preserves insertion order; the first element is the room admin.
#[derive(Debug, Clone, FromRow)]
pub struct ChatEntity {
    pub id: Uuid,
    pub name: String,
    pub image: String,
    pub shareable_link: String,
    pub event_id: Option<Uuid>,
    pub status: String,
    pub last_active: DateTime<Utc>,
    pub members: Vec<Uuid>,
    pub chat_limit: i32,
    pub public_slots: i32,
    pub friend_slots: i32,
    pub created_at: DateTime<Utc>,
}

impl From<ChatEntity> for ChatRoom {
    fn from(entity: ChatEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            image: entity.image,
            shareable_link: entity.shareable_link,
            event_id: entity.event_id,
            status: ChatStatus::from_str(&entity.status).unwrap_or(ChatStatus::Active),
            last_active: entity.last_active,
            members: entity.members,
            chat_limit: entity.chat_limit,
            public_slots: entity.public_slots,
            friend_slots: entity.friend_slots,
            created_at: entity.created_at,
        }
    }
}
