//! User repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{PublicProfileEntity, UserEntity};
use crate::metrics::QueryTimer;
use domain::models::Tier;

/// Repository for user-related database operations.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Creates a new UserRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a user row at signup with the standard profile defaults.
    ///
    /// Returns `None` when the email is already registered (the unique index
    /// absorbs duplicate-submit races).
    pub async fn create(
        &self,
        email: &str,
        password_hash: &str,
        name: &str,
    ) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("create_user");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            INSERT INTO users (email, password_hash, name, bio, hashtags, profile_pic, tier, bans, created_events)
            VALUES ($1, $2, $3, 'I''m new to PlanUpp!', '{}', '/placeholder.svg?height=80&width=80', 'new_user', 0, '{}')
            ON CONFLICT (email) DO NOTHING
            RETURNING id, email, password_hash, name, bio, hashtags, profile_pic, tier, bans, created_events, created_at, updated_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(name)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_id");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, email, password_hash, name, bio, hashtags, profile_pic, tier, bans, created_events, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a user by email.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_email");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, email, password_hash, name, bio, hashtags, profile_pic, tier, bans, created_events, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Fetch reduced profiles for a set of users, preserving no particular
    /// order (callers reorder as needed).
    pub async fn find_public_profiles(
        &self,
        ids: &[Uuid],
    ) -> Result<Vec<PublicProfileEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_public_profiles");
        let result = sqlx::query_as::<_, PublicProfileEntity>(
            r#"
            SELECT id, name, profile_pic
            FROM users
            WHERE id = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Update profile fields. Identity and moderation columns are untouched.
    pub async fn update_profile(
        &self,
        id: Uuid,
        name: Option<&str>,
        bio: Option<&str>,
        hashtags: Option<&[String]>,
        profile_pic: Option<&str>,
    ) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_user_profile");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            UPDATE users
            SET
                name = COALESCE($2, name),
                bio = COALESCE($3, bio),
                hashtags = COALESCE($4, hashtags),
                profile_pic = COALESCE($5, profile_pic),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, email, password_hash, name, bio, hashtags, profile_pic, tier, bans, created_events, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(bio)
        .bind(hashtags)
        .bind(profile_pic)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Append an event to a user's created-event list (idempotent).
    pub async fn append_created_event(
        &self,
        user_id: Uuid,
        event_id: Uuid,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("append_created_event");
        let result = sqlx::query(
            r#"
            UPDATE users
            SET created_events = array_append(created_events, $2), updated_at = NOW()
            WHERE id = $1 AND NOT (created_events @> ARRAY[$2])
            "#,
        )
        .bind(user_id)
        .bind(event_id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Write a recomputed tier. The tier column is only ever written here.
    pub async fn set_tier(&self, user_id: Uuid, tier: Tier) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("set_user_tier");
        let result = sqlx::query(
            r#"
            UPDATE users
            SET tier = $2, updated_at = NOW()
            WHERE id = $1 AND tier <> $2
            "#,
        )
        .bind(user_id)
        .bind(tier.as_str())
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    // UserRepository queries require a database connection and are covered by
    // the integration tests under crates/api/tests.
}
