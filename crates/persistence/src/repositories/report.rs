//! User report repository for database operations.
//!
//! Report resolution is single-shot: both resolution paths use a conditional
//! `UPDATE ... WHERE status = 'pending'`, so a report that has already been
//! resolved is never written twice. Upholding a report increments the
//! reported user's ban count with a single atomic `bans = bans + 1` in the
//! same transaction as the status transition.

use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::entities::{ReportEntity, ReportWithProfilesEntity};
use crate::metrics::QueryTimer;

const REPORT_COLUMNS: &str = "id, reporter_id, reported_id, body, image, status, reported_at";

/// Error type for report operations.
#[derive(Debug, Error)]
pub enum ReportStoreError {
    #[error("Report not found")]
    NotFound,

    #[error("Report has already been resolved")]
    AlreadyResolved,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Result of upholding a report.
#[derive(Debug, Clone)]
pub struct BanOutcome {
    pub report: ReportEntity,
    /// The reported user's ban count after the increment.
    pub ban_count: i32,
}

/// Repository for user-report database operations.
#[derive(Clone)]
pub struct ReportRepository {
    pool: PgPool,
}

impl ReportRepository {
    /// Creates a new ReportRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// File a new report. Validation (self-report, blank body) happens in the
    /// domain layer before this is called.
    pub async fn create(
        &self,
        reporter_id: Uuid,
        reported_id: Uuid,
        body: &str,
        image: Option<&str>,
    ) -> Result<ReportEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_report");
        let result = sqlx::query_as::<_, ReportEntity>(&format!(
            r#"
            INSERT INTO user_reports (reporter_id, reported_id, body, image, status)
            VALUES ($1, $2, $3, $4, 'pending')
            RETURNING {REPORT_COLUMNS}
            "#,
        ))
        .bind(reporter_id)
        .bind(reported_id)
        .bind(body)
        .bind(image)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// All reports with reporter/reported profile summaries, newest first,
    /// for the admin review queue.
    pub async fn list_with_profiles(
        &self,
    ) -> Result<Vec<ReportWithProfilesEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_reports_with_profiles");
        let result = sqlx::query_as::<_, ReportWithProfilesEntity>(
            r#"
            SELECT
                r.id, r.reporter_id, r.reported_id, r.body, r.image, r.status, r.reported_at,
                reporter.name AS reporter_name,
                reporter.profile_pic AS reporter_profile_pic,
                reported.name AS reported_name,
                reported.profile_pic AS reported_profile_pic,
                reported.bans AS reported_bans
            FROM user_reports r
            JOIN users reporter ON reporter.id = r.reporter_id
            JOIN users reported ON reported.id = r.reported_id
            ORDER BY r.reported_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Resolve a pending report as ignored.
    pub async fn ignore(&self, report_id: Uuid) -> Result<ReportEntity, ReportStoreError> {
        let timer = QueryTimer::new("ignore_report");
        let updated = sqlx::query_as::<_, ReportEntity>(&format!(
            r#"
            UPDATE user_reports
            SET status = 'ignored'
            WHERE id = $1 AND status = 'pending'
            RETURNING {REPORT_COLUMNS}
            "#,
        ))
        .bind(report_id)
        .fetch_optional(&self.pool)
        .await?;

        timer.record();
        match updated {
            Some(report) => Ok(report),
            None => Err(self.classify_missing(report_id).await?),
        }
    }

    /// Uphold a pending report: transition it to banned and increment the
    /// reported user's ban count, atomically.
    pub async fn uphold(&self, report_id: Uuid) -> Result<BanOutcome, ReportStoreError> {
        let timer = QueryTimer::new("uphold_report");
        let mut tx = self.pool.begin().await?;

        let report = sqlx::query_as::<_, ReportEntity>(&format!(
            r#"
            UPDATE user_reports
            SET status = 'banned'
            WHERE id = $1 AND status = 'pending'
            RETURNING {REPORT_COLUMNS}
            "#,
        ))
        .bind(report_id)
        .fetch_optional(&mut *tx)
        .await?;

        let report = match report {
            Some(report) => report,
            None => {
                drop(tx);
                return Err(self.classify_missing(report_id).await?);
            }
        };

        let ban_count: i32 = sqlx::query_scalar(
            r#"
            UPDATE users
            SET bans = bans + 1, updated_at = NOW()
            WHERE id = $1
            RETURNING bans
            "#,
        )
        .bind(report.reported_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(BanOutcome { report, ban_count })
    }

    /// Distinguish a missing report from one that was already resolved.
    async fn classify_missing(
        &self,
        report_id: Uuid,
    ) -> Result<ReportStoreError, sqlx::Error> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM user_reports WHERE id = $1)")
                .bind(report_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(if exists {
            ReportStoreError::AlreadyResolved
        } else {
            ReportStoreError::NotFound
        })
    }
}

#[cfg(test)]
mod tests {
    // ReportRepository operations require a database connection and are
    // covered by the integration tests under crates/api/tests.
}
