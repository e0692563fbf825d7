//! Event repository for database operations.

use chrono::{NaiveDate, NaiveTime};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::EventEntity;
use crate::metrics::QueryTimer;
use domain::models::EventStatus;

const EVENT_COLUMNS: &str = "id, sport, location, event_date, start_time, end_time, description, screenshot, creator_id, status, total_participants, participant_count, created_at";

/// Fields needed to insert a new event.
#[derive(Debug, Clone)]
pub struct NewEvent<'a> {
    pub sport: &'a str,
    pub location: &'a str,
    pub event_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub description: &'a str,
    pub screenshot: Option<&'a str>,
    pub creator_id: Uuid,
    pub total_participants: i32,
}

/// Repository for event-related database operations.
#[derive(Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    /// Creates a new EventRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new event.
    ///
    /// Events are admitted on creation (auto-approval policy) and start with
    /// a participant count of 1: the creator, who is the sole member of the
    /// companion chat room.
    pub async fn create(&self, event: NewEvent<'_>) -> Result<EventEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_event");
        let result = sqlx::query_as::<_, EventEntity>(&format!(
            r#"
            INSERT INTO events (sport, location, event_date, start_time, end_time, description, screenshot, creator_id, status, total_participants, participant_count)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'admitted', $9, 1)
            RETURNING {EVENT_COLUMNS}
            "#,
        ))
        .bind(event.sport)
        .bind(event.location)
        .bind(event.event_date)
        .bind(event.start_time)
        .bind(event.end_time)
        .bind(event.description)
        .bind(event.screenshot)
        .bind(event.creator_id)
        .bind(event.total_participants)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find an event by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<EventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_event_by_id");
        let result = sqlx::query_as::<_, EventEntity>(&format!(
            r#"
            SELECT {EVENT_COLUMNS}
            FROM events
            WHERE id = $1
            "#,
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// All events, newest first.
    pub async fn list_all(&self) -> Result<Vec<EventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_events");
        let result = sqlx::query_as::<_, EventEntity>(&format!(
            r#"
            SELECT {EVENT_COLUMNS}
            FROM events
            ORDER BY created_at DESC
            "#,
        ))
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Admitted events that still have open slots, newest first.
    pub async fn list_open(&self) -> Result<Vec<EventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_open_events");
        let result = sqlx::query_as::<_, EventEntity>(&format!(
            r#"
            SELECT {EVENT_COLUMNS}
            FROM events
            WHERE status = 'admitted' AND participant_count < total_participants
            ORDER BY created_at DESC
            "#,
        ))
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Events created by a specific user, newest first.
    pub async fn list_by_creator(&self, creator_id: Uuid) -> Result<Vec<EventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_events_by_creator");
        let result = sqlx::query_as::<_, EventEntity>(&format!(
            r#"
            SELECT {EVENT_COLUMNS}
            FROM events
            WHERE creator_id = $1
            ORDER BY created_at DESC
            "#,
        ))
        .bind(creator_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Transition an event to admitted.
    pub async fn set_status(
        &self,
        event_id: Uuid,
        status: EventStatus,
    ) -> Result<Option<EventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("set_event_status");
        let result = sqlx::query_as::<_, EventEntity>(&format!(
            r#"
            UPDATE events
            SET status = $2
            WHERE id = $1
            RETURNING {EVENT_COLUMNS}
            "#,
        ))
        .bind(event_id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// The creator's most recent pending event, if any.
    pub async fn latest_pending_for_creator(
        &self,
        creator_id: Uuid,
    ) -> Result<Option<EventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("latest_pending_event");
        let result = sqlx::query_as::<_, EventEntity>(&format!(
            r#"
            SELECT {EVENT_COLUMNS}
            FROM events
            WHERE creator_id = $1 AND status = 'pending'
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        ))
        .bind(creator_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }
}

#[cfg(test)]
mod tests {
    // EventRepository queries require a database connection and are covered
    // by the integration tests under crates/api/tests.
}
