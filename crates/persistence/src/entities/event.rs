//! Event entity (database row mapping).

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

use domain::models::{Event, EventStatus};

/// Database row mapping for the events table.
#[derive(Debug, Clone, FromRow)]
pub struct EventEntity {
    pub id: Uuid,
    pub sport: String,
    pub location: String,
    pub event_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub description: String,
    pub screenshot: Option<String>,
    pub creator_id: Uuid,
    pub status: String,
    pub total_participants: i32,
    pub participant_count: i32,
    pub created_at: DateTime<Utc>,
}

impl From<EventEntity> for Event {
    fn from(entity: EventEntity) -> Self {
        Self {
            id: entity.id,
            sport: entity.sport,
            location: entity.location,
            event_date: entity.event_date,
            start_time: entity.start_time,
            end_time: entity.end_time,
            description: entity.description,
            screenshot: entity.screenshot,
            creator_id: entity.creator_id,
            status: EventStatus::from_str(&entity.status).unwrap_or(EventStatus::Pending),
            total_participants: entity.total_participants,
            participant_count: entity.participant_count,
            created_at: entity.created_at,
        }
    }
}
