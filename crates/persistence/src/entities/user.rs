//! User entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

use domain::models::{PublicProfile, Tier, User};

/// Database row mapping for the users table.
#[derive(Debug, Clone, FromRow)]
pub struct UserEntity {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub bio: String,
    pub hashtags: Vec<String>,
    pub profile_pic: String,
    pub tier: String,
    pub bans: i32,
    pub created_events: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserEntity> for User {
    fn from(entity: UserEntity) -> Self {
        Self {
            id: entity.id,
            email: entity.email,
            password_hash: entity.password_hash,
            name: entity.name,
            bio: entity.bio,
            hashtags: entity.hashtags,
            profile_pic: entity.profile_pic,
            tier: Tier::from_str(&entity.tier).unwrap_or(Tier::NewUser),
            bans: entity.bans,
            created_events: entity.created_events,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Reduced row for member lists and report summaries.
#[derive(Debug, Clone, FromRow)]
pub struct PublicProfileEntity {
    pub id: Uuid,
    pub name: String,
    pub profile_pic: String,
}

impl From<PublicProfileEntity> for PublicProfile {
    fn from(entity: PublicProfileEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            profile_pic: entity.profile_pic,
        }
    }
}
