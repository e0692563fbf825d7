//! Chat message repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::MessageEntity;
use crate::metrics::QueryTimer;

/// Repository for chat-message database operations.
#[derive(Clone)]
pub struct MessageRepository {
    pool: PgPool,
}

impl MessageRepository {
    /// Creates a new MessageRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a message. Messages are immutable after this point.
    pub async fn create(
        &self,
        chat_id: Uuid,
        sender_id: Uuid,
        body: &str,
    ) -> Result<MessageEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_message");
        let result = sqlx::query_as::<_, MessageEntity>(
            r#"
            INSERT INTO chat_messages (chat_id, sender_id, body)
            VALUES ($1, $2, $3)
            RETURNING id, chat_id, sender_id, body, created_at
            "#,
        )
        .bind(chat_id)
        .bind(sender_id)
        .bind(body)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// All messages in a room, oldest first.
    pub async fn list_for_chat(&self, chat_id: Uuid) -> Result<Vec<MessageEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_messages_for_chat");
        let result = sqlx::query_as::<_, MessageEntity>(
            r#"
            SELECT id, chat_id, sender_id, body, created_at
            FROM chat_messages
            WHERE chat_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(chat_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}

#[cfg(test)]
mod tests {
    // MessageRepository queries require a database connection and are covered
    // by the integration tests under crates/api/tests.
}
