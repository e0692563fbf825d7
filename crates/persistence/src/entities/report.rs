//! User report entities (database row mappings).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

use domain::models::{ReportStatus, UserReport};

/// Database row mapping for the user_reports table.
#[derive(Debug, Clone, FromRow)]
pub struct ReportEntity {
    pub id: Uuid,
    pub reporter_id: Uuid,
    pub reported_id: Uuid,
    pub body: String,
    pub image: Option<String>,
    pub status: String,
    pub reported_at: DateTime<Utc>,
}

impl From<ReportEntity> for UserReport {
    fn from(entity: ReportEntity) -> Self {
        Self {
            id: entity.id,
            reporter_id: entity.reporter_id,
            reported_id: entity.reported_id,
            body: entity.body,
            image: entity.image,
            status: ReportStatus::from_str(&entity.status).unwrap_or(ReportStatus::Pending),
            reported_at: entity.reported_at,
        }
    }
}

/// Report row joined with reporter and reported profile summaries, for the
/// admin review queue.
#[derive(Debug, Clone, FromRow)]
pub struct ReportWithProfilesEntity {
    pub id: Uuid,
    pub reporter_id: Uuid,
    pub reported_id: Uuid,
    pub body: String,
    pub image: Option<String>,
    pub status: String,
    pub reported_at: DateTime<Utc>,
    pub reporter_name: String,
    pub reporter_profile_pic: String,
    pub reported_name: String,
    pub reported_profile_pic: String,
    pub reported_bans: i32,
}
