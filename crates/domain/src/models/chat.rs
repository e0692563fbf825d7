//! Chat room domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Lifecycle status of a chat room.
///
/// Rooms are always created `Active`; the admin-delete path that would retire
/// a room is not implemented (see the chats routes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatStatus {
    Active,
}

impl ChatStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatStatus::Active => "active",
        }
    }
}

impl FromStr for ChatStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(ChatStatus::Active),
            _ => Err(format!("Invalid chat status: {}", s)),
        }
    }
}

impl fmt::Display for ChatStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A group chat room, optionally linked 1:1 to an event.
///
/// `members` is ordered: the first entry is the room admin (the event
/// creator) and never changes after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRoom {
    pub id: Uuid,
    pub name: String,
    pub image: String,
    pub shareable_link: String,
    pub event_id: Option<Uuid>,
    pub status: ChatStatus,
    pub last_active: DateTime<Utc>,
    pub members: Vec<Uuid>,
    pub chat_limit: i32,
    pub public_slots: i32,
    pub friend_slots: i32,
    pub created_at: DateTime<Utc>,
}

impl ChatRoom {
    /// The room admin: always the first member.
    pub fn admin(&self) -> Option<Uuid> {
        self.members.first().copied()
    }

    pub fn is_admin(&self, user_id: Uuid) -> bool {
        self.admin() == Some(user_id)
    }

    pub fn is_member(&self, user_id: Uuid) -> bool {
        self.members.contains(&user_id)
    }
}

/// Request body for updating room settings.
///
/// If the new slot split exceeds the chat limit, it is rescaled
/// proportionally before being stored.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoomSettingsRequest {
    #[validate(range(min = 2, message = "Chat limit must be at least 2"))]
    pub chat_limit: Option<i32>,

    #[validate(range(min = 0, message = "Public slots must be non-negative"))]
    pub public_slots: Option<i32>,

    #[validate(range(min = 0, message = "Friend slots must be non-negative"))]
    pub friend_slots: Option<i32>,

    #[validate(length(max = 500, message = "Image reference too long"))]
    pub image: Option<String>,

    #[validate(length(max = 500, message = "Link too long"))]
    pub shareable_link: Option<String>,
}

/// Request body for renaming a room.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RenameRoomRequest {
    #[validate(custom(function = "shared::validation::validate_trimmed_name"))]
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(members: Vec<Uuid>) -> ChatRoom {
        ChatRoom {
            id: Uuid::new_v4(),
            name: "Basketball Chat".to_string(),
            image: "/placeholder.svg".to_string(),
            shareable_link: "/chats/join/abc".to_string(),
            event_id: Some(Uuid::new_v4()),
            status: ChatStatus::Active,
            last_active: Utc::now(),
            members,
            chat_limit: 6,
            public_slots: 4,
            friend_slots: 2,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_admin_is_first_member() {
        let admin = Uuid::new_v4();
        let other = Uuid::new_v4();
        let room = room(vec![admin, other]);

        assert_eq!(room.admin(), Some(admin));
        assert!(room.is_admin(admin));
        assert!(!room.is_admin(other));
    }

    #[test]
    fn test_membership_check() {
        let admin = Uuid::new_v4();
        let member = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let room = room(vec![admin, member]);

        assert!(room.is_member(admin));
        assert!(room.is_member(member));
        assert!(!room.is_member(stranger));
    }

    #[test]
    fn test_chat_status_roundtrip() {
        assert_eq!(ChatStatus::from_str("active").unwrap(), ChatStatus::Active);
        assert!(ChatStatus::from_str("archived").is_err());
        assert_eq!(ChatStatus::Active.to_string(), "active");
    }

    #[test]
    fn test_rename_request_rejects_blank() {
        let request = RenameRoomRequest {
            name: "   ".to_string(),
        };
        assert!(request.validate().is_err());

        let request = RenameRoomRequest {
            name: "Sunday Run Club".to_string(),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_settings_request_bounds() {
        let request = UpdateRoomSettingsRequest {
            chat_limit: Some(1),
            ..Default::default()
        };
        assert!(request.validate().is_err());

        let request = UpdateRoomSettingsRequest {
            chat_limit: Some(10),
            public_slots: Some(7),
            friend_slots: Some(3),
            ..Default::default()
        };
        assert!(request.validate().is_ok());
    }
}
