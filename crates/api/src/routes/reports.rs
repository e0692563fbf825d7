//! User report routes: filing, and the admin review queue.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use domain::models::{FileReportRequest, ReportStatus, UserReport};
use domain::services::moderation;
use persistence::entities::ReportWithProfilesEntity;
use persistence::repositories::{ChatRepository, ReportRepository};

/// A report in the admin review queue, with both profiles attached.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub id: Uuid,
    pub body: String,
    pub image: Option<String>,
    pub status: ReportStatus,
    pub reported_at: chrono::DateTime<chrono::Utc>,
    pub reporting_user: ReportProfile,
    pub reported_user: ReportProfile,
}

/// Profile summary attached to a report.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportProfile {
    pub id: Uuid,
    pub name: String,
    pub profile_pic: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bans: Option<i32>,
}

impl From<ReportWithProfilesEntity> for ReportSummary {
    fn from(entity: ReportWithProfilesEntity) -> Self {
        Self {
            id: entity.id,
            body: entity.body,
            image: entity.image,
            status: ReportStatus::from_str(&entity.status).unwrap_or(ReportStatus::Pending),
            reported_at: entity.reported_at,
            reporting_user: ReportProfile {
                id: entity.reporter_id,
                name: entity.reporter_name,
                profile_pic: entity.reporter_profile_pic,
                bans: None,
            },
            reported_user: ReportProfile {
                id: entity.reported_id,
                name: entity.reported_name,
                profile_pic: entity.reported_profile_pic,
                bans: Some(entity.reported_bans),
            },
        }
    }
}

/// Response body for upholding a report.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BanResponse {
    pub report: UserReport,
    pub ban_count: i32,
    pub is_permanently_banned: bool,
}

/// File a report about another user.
///
/// POST /api/v1/reports
///
/// Self-reports and blank bodies are rejected before anything is written.
pub async fn file_report(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Json(request): Json<FileReportRequest>,
) -> Result<(StatusCode, Json<UserReport>), ApiError> {
    request.validate()?;
    moderation::validate_report(user_auth.user_id, request.reported_id, &request.body)?;

    let report = ReportRepository::new(state.pool.clone())
        .create(
            user_auth.user_id,
            request.reported_id,
            request.body.trim(),
            request.image.as_deref(),
        )
        .await?;

    tracing::info!(
        report_id = %report.id,
        reporter_id = %user_auth.user_id,
        reported_id = %request.reported_id,
        "Report filed"
    );

    Ok((StatusCode::CREATED, Json(report.into())))
}

/// The admin review queue, newest first.
///
/// GET /api/v1/admin/reports
pub async fn list_reports(
    State(state): State<AppState>,
    _user_auth: UserAuth,
) -> Result<Json<Vec<ReportSummary>>, ApiError> {
    let reports = ReportRepository::new(state.pool.clone())
        .list_with_profiles()
        .await?;
    Ok(Json(reports.into_iter().map(Into::into).collect()))
}

/// Resolve a pending report without action.
///
/// POST /api/v1/admin/reports/:report_id/ignore
pub async fn ignore_report(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(report_id): Path<Uuid>,
) -> Result<Json<UserReport>, ApiError> {
    let report = ReportRepository::new(state.pool.clone())
        .ignore(report_id)
        .await?;

    tracing::info!(report_id = %report_id, admin_id = %user_auth.user_id, "Report ignored");
    Ok(Json(report.into()))
}

/// Uphold a pending report: ban the reported user.
///
/// POST /api/v1/admin/reports/:report_id/ban
///
/// The report transition and the ban-count increment happen in one
/// transaction. A user whose count reaches the permanent-ban threshold is
/// removed from every room they do not administer.
pub async fn ban_user(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(report_id): Path<Uuid>,
) -> Result<Json<BanResponse>, ApiError> {
    let outcome = ReportRepository::new(state.pool.clone())
        .uphold(report_id)
        .await?;

    let reported_id = outcome.report.reported_id;
    let is_permanently_banned = moderation::is_permanently_banned(outcome.ban_count);

    tracing::info!(
        report_id = %report_id,
        admin_id = %user_auth.user_id,
        reported_id = %reported_id,
        ban_count = outcome.ban_count,
        is_permanently_banned,
        "User banned"
    );

    if is_permanently_banned {
        // Cleanup is best-effort; the ban itself has already committed.
        match ChatRepository::new(state.pool.clone())
            .remove_from_all_rooms(reported_id)
            .await
        {
            Ok(removed) => tracing::info!(
                user_id = %reported_id,
                rooms = removed,
                "Removed permanently banned user from chat rooms"
            ),
            Err(e) => tracing::warn!(
                user_id = %reported_id,
                error = %e,
                "Chat cleanup after permanent ban failed"
            ),
        }
    }

    Ok(Json(BanResponse {
        report: outcome.report.into(),
        ban_count: outcome.ban_count,
        is_permanently_banned,
    }))
}
