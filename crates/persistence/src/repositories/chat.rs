//! Chat room repository for database operations.
//!
//! Membership mutations follow a strict shape: lock the chat row
//! (`SELECT ... FOR UPDATE`), apply the pure transition from
//! `domain::services::membership`, then write the new member list and mirror
//! the linked event's `participant_count` before committing. Concurrent
//! mutations on the same room serialize on the row lock, so member lists and
//! counters cannot drift apart.

use sqlx::{PgPool, Postgres, Transaction};
use thiserror::Error;
use uuid::Uuid;

use crate::entities::{ChatEntity, EventEntity};
use crate::metrics::QueryTimer;
use domain::models::UpdateRoomSettingsRequest;
use domain::services::membership::{self, MemberUpdate, MembershipError};

const CHAT_COLUMNS: &str = "id, name, image, shareable_link, event_id, status, last_active, members, chat_limit, public_slots, friend_slots, created_at";

/// Error type for chat room operations.
#[derive(Debug, Error)]
pub enum ChatStoreError {
    #[error("Chat room not found")]
    NotFound,

    #[error(transparent)]
    Membership(#[from] MembershipError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Repository for chat-room database operations.
#[derive(Clone)]
pub struct ChatRepository {
    pool: PgPool,
}

impl ChatRepository {
    /// Creates a new ChatRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the companion chat room for an event, with the creator as the
    /// sole initial member (and therefore admin).
    ///
    /// Idempotent: if a room already exists for the event (including a
    /// duplicate-submit race absorbed by the unique index on `event_id`),
    /// the existing room is returned.
    pub async fn create_for_event(
        &self,
        event: &EventEntity,
        creator_id: Uuid,
    ) -> Result<ChatEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_chat_for_event");

        let name = format!("{} Chat", event.sport);
        let image = event
            .screenshot
            .clone()
            .unwrap_or_else(|| "/placeholder.svg?height=80&width=80".to_string());
        let shareable_link = format!("/chats/join/{}", Uuid::new_v4().simple());

        let inserted = sqlx::query_as::<_, ChatEntity>(&format!(
            r#"
            INSERT INTO chats (name, image, shareable_link, event_id, status, last_active, members, chat_limit, public_slots, friend_slots)
            VALUES ($1, $2, $3, $4, 'active', NOW(), ARRAY[$5]::uuid[], $6, 0, 0)
            ON CONFLICT (event_id) DO NOTHING
            RETURNING {CHAT_COLUMNS}
            "#,
        ))
        .bind(&name)
        .bind(&image)
        .bind(&shareable_link)
        .bind(event.id)
        .bind(creator_id)
        .bind(event.total_participants)
        .fetch_optional(&self.pool)
        .await?;

        let result = match inserted {
            Some(chat) => Ok(chat),
            // Lost the race (or a duplicate submit): return the winner's row.
            None => {
                sqlx::query_as::<_, ChatEntity>(&format!(
                    r#"
                    SELECT {CHAT_COLUMNS}
                    FROM chats
                    WHERE event_id = $1
                    "#,
                ))
                .bind(event.id)
                .fetch_one(&self.pool)
                .await
            }
        };

        timer.record();
        result
    }

    /// Find a chat room by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<ChatEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_chat_by_id");
        let result = sqlx::query_as::<_, ChatEntity>(&format!(
            r#"
            SELECT {CHAT_COLUMNS}
            FROM chats
            WHERE id = $1
            "#,
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find the companion room for an event.
    pub async fn find_by_event(&self, event_id: Uuid) -> Result<Option<ChatEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_chat_by_event");
        let result = sqlx::query_as::<_, ChatEntity>(&format!(
            r#"
            SELECT {CHAT_COLUMNS}
            FROM chats
            WHERE event_id = $1
            "#,
        ))
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// All rooms the user is a member of, most recently active first.
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<ChatEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_chats_for_user");
        let result = sqlx::query_as::<_, ChatEntity>(&format!(
            r#"
            SELECT {CHAT_COLUMNS}
            FROM chats
            WHERE members @> ARRAY[$1]::uuid[]
            ORDER BY last_active DESC
            "#,
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// A user joins a room on their own.
    pub async fn join(&self, chat_id: Uuid, user_id: Uuid) -> Result<ChatEntity, ChatStoreError> {
        let timer = QueryTimer::new("join_chat");
        let mut tx = self.pool.begin().await?;

        let chat = lock_room(&mut tx, chat_id).await?;
        let update = membership::join(&chat.members, user_id);
        let chat = apply_member_update(&mut tx, chat, update).await?;

        tx.commit().await?;
        timer.record();
        Ok(chat)
    }

    /// The room admin adds another user.
    pub async fn admin_add(
        &self,
        chat_id: Uuid,
        admin_id: Uuid,
        user_id: Uuid,
    ) -> Result<ChatEntity, ChatStoreError> {
        let timer = QueryTimer::new("admin_add_chat_member");
        let mut tx = self.pool.begin().await?;

        let chat = lock_room(&mut tx, chat_id).await?;
        let update = membership::admin_add(&chat.members, admin_id, user_id)?;
        let chat = apply_member_update(&mut tx, chat, update).await?;

        tx.commit().await?;
        timer.record();
        Ok(chat)
    }

    /// The room admin removes a member.
    pub async fn admin_remove(
        &self,
        chat_id: Uuid,
        admin_id: Uuid,
        target_id: Uuid,
    ) -> Result<ChatEntity, ChatStoreError> {
        let timer = QueryTimer::new("admin_remove_chat_member");
        let mut tx = self.pool.begin().await?;

        let chat = lock_room(&mut tx, chat_id).await?;
        let update = membership::admin_remove(&chat.members, admin_id, target_id)?;
        let chat = apply_member_update(&mut tx, chat, update).await?;

        tx.commit().await?;
        timer.record();
        Ok(chat)
    }

    /// A member leaves a room on their own.
    pub async fn self_exit(
        &self,
        chat_id: Uuid,
        user_id: Uuid,
    ) -> Result<ChatEntity, ChatStoreError> {
        let timer = QueryTimer::new("exit_chat");
        let mut tx = self.pool.begin().await?;

        let chat = lock_room(&mut tx, chat_id).await?;
        let update = membership::self_exit(&chat.members, user_id)?;
        let chat = apply_member_update(&mut tx, chat, update).await?;

        tx.commit().await?;
        timer.record();
        Ok(chat)
    }

    /// Remove a user from every room they belong to, skipping rooms they
    /// administer (the admin slot is immutable).
    ///
    /// This is the admin-check-free cleanup path used by moderation after a
    /// permanent ban; each removal is audit-logged by the caller. Returns the
    /// number of rooms the user was removed from.
    pub async fn remove_from_all_rooms(&self, user_id: Uuid) -> Result<u64, ChatStoreError> {
        let timer = QueryTimer::new("remove_from_all_rooms");

        let room_ids: Vec<Uuid> = sqlx::query_scalar(
            r#"
            SELECT id
            FROM chats
            WHERE members @> ARRAY[$1]::uuid[]
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let mut removed = 0;
        for chat_id in room_ids {
            let mut tx = self.pool.begin().await?;
            let chat = lock_room(&mut tx, chat_id).await?;

            match membership::remove_unchecked(&chat.members, user_id) {
                Ok(update) => {
                    let changed = update.changed;
                    apply_member_update(&mut tx, chat, update).await?;
                    tx.commit().await?;
                    if changed {
                        removed += 1;
                    }
                }
                // The user administers this room; leave it intact.
                Err(MembershipError::CannotRemoveAdmin) => {
                    tracing::warn!(
                        chat_id = %chat_id,
                        user_id = %user_id,
                        "Skipping cleanup for room administered by banned user"
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }

        timer.record();
        Ok(removed)
    }

    /// Update room settings (admin only), rescaling the public/friend slot
    /// split to fit the chat limit and mirroring a changed limit onto the
    /// linked event's capacity.
    pub async fn update_settings(
        &self,
        chat_id: Uuid,
        admin_id: Uuid,
        patch: &UpdateRoomSettingsRequest,
    ) -> Result<ChatEntity, ChatStoreError> {
        let timer = QueryTimer::new("update_chat_settings");
        let mut tx = self.pool.begin().await?;

        let chat = lock_room(&mut tx, chat_id).await?;
        if !membership::is_admin(&chat.members, admin_id) {
            return Err(MembershipError::NotAuthorized.into());
        }

        let fit = membership::fit_slots(
            patch.chat_limit.unwrap_or(chat.chat_limit),
            patch.public_slots.unwrap_or(chat.public_slots),
            patch.friend_slots.unwrap_or(chat.friend_slots),
        );

        let updated = sqlx::query_as::<_, ChatEntity>(&format!(
            r#"
            UPDATE chats
            SET
                chat_limit = $2,
                public_slots = $3,
                friend_slots = $4,
                image = COALESCE($5, image),
                shareable_link = COALESCE($6, shareable_link)
            WHERE id = $1
            RETURNING {CHAT_COLUMNS}
            "#,
        ))
        .bind(chat_id)
        .bind(fit.chat_limit)
        .bind(fit.public_slots)
        .bind(fit.friend_slots)
        .bind(patch.image.as_deref())
        .bind(patch.shareable_link.as_deref())
        .fetch_one(&mut *tx)
        .await?;

        // A changed capacity limit is mirrored onto the event.
        if patch.chat_limit.is_some() {
            if let Some(event_id) = updated.event_id {
                sqlx::query("UPDATE events SET total_participants = $2 WHERE id = $1")
                    .bind(event_id)
                    .bind(fit.chat_limit)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        tx.commit().await?;
        timer.record();
        Ok(updated)
    }

    /// Rename a room (admin only). The caller trims and validates the name.
    pub async fn rename(
        &self,
        chat_id: Uuid,
        admin_id: Uuid,
        name: &str,
    ) -> Result<ChatEntity, ChatStoreError> {
        let timer = QueryTimer::new("rename_chat");
        let mut tx = self.pool.begin().await?;

        let chat = lock_room(&mut tx, chat_id).await?;
        if !membership::is_admin(&chat.members, admin_id) {
            return Err(MembershipError::NotAuthorized.into());
        }

        let updated = sqlx::query_as::<_, ChatEntity>(&format!(
            r#"
            UPDATE chats
            SET name = $2
            WHERE id = $1
            RETURNING {CHAT_COLUMNS}
            "#,
        ))
        .bind(chat_id)
        .bind(name)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(updated)
    }

    /// Bump a room's last-active timestamp. Only called for admin-sent
    /// messages, preserving the original activity semantics.
    pub async fn bump_last_active(&self, chat_id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("bump_chat_last_active");
        let result = sqlx::query("UPDATE chats SET last_active = NOW() WHERE id = $1")
            .bind(chat_id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}

/// Lock a chat row for the duration of the transaction.
async fn lock_room(
    tx: &mut Transaction<'_, Postgres>,
    chat_id: Uuid,
) -> Result<ChatEntity, ChatStoreError> {
    sqlx::query_as::<_, ChatEntity>(&format!(
        r#"
        SELECT {CHAT_COLUMNS}
        FROM chats
        WHERE id = $1
        FOR UPDATE
        "#,
    ))
    .bind(chat_id)
    .fetch_optional(&mut **tx)
    .await?
    .ok_or(ChatStoreError::NotFound)
}

/// Write a member-list transition and mirror the linked event's participant
/// count. No-op transitions skip both writes.
async fn apply_member_update(
    tx: &mut Transaction<'_, Postgres>,
    chat: ChatEntity,
    update: MemberUpdate,
) -> Result<ChatEntity, ChatStoreError> {
    if !update.changed {
        return Ok(chat);
    }

    sqlx::query("UPDATE chats SET members = $2 WHERE id = $1")
        .bind(chat.id)
        .bind(&update.members)
        .execute(&mut **tx)
        .await?;

    if let Some(event_id) = chat.event_id {
        sqlx::query("UPDATE events SET participant_count = $2 WHERE id = $1")
            .bind(event_id)
            .bind(update.count())
            .execute(&mut **tx)
            .await?;
    }

    Ok(ChatEntity {
        members: update.members,
        ..chat
    })
}

#[cfg(test)]
mod tests {
    // ChatRepository operations require a database connection and are covered
    // by the integration tests under crates/api/tests.
}
