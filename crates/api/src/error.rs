use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use domain::services::membership::MembershipError;
use domain::services::moderation::ModerationError;
use persistence::repositories::{ChatStoreError, ReportStoreError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Not implemented: {0}")]
    Unimplemented(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match &self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg.clone()),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "validation_error", msg.clone()),
            ApiError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                "rate_limited",
                "Too many requests. Please try again later.".into(),
            ),
            ApiError::Unimplemented(msg) => {
                (StatusCode::NOT_IMPLEMENTED, "not_implemented", msg.clone())
            }
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".into(),
                )
            }
            ApiError::ServiceUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "service_unavailable",
                msg.clone(),
            ),
        };

        let body = ErrorBody {
            error: error_code.into(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".into()),
            sqlx::Error::Database(db_err) => {
                if let Some(code) = db_err.code() {
                    match code.as_ref() {
                        "23505" => ApiError::Conflict("Resource already exists".into()),
                        "23503" => ApiError::NotFound("Referenced resource not found".into()),
                        _ => ApiError::Internal(format!("Database error: {}", db_err)),
                    }
                } else {
                    ApiError::Internal(format!("Database error: {}", db_err))
                }
            }
            sqlx::Error::PoolTimedOut => {
                ApiError::ServiceUnavailable("Database unavailable".into())
            }
            _ => ApiError::Internal(format!("Database error: {}", err)),
        }
    }
}

impl From<MembershipError> for ApiError {
    fn from(err: MembershipError) -> Self {
        match err {
            MembershipError::NotAuthorized => ApiError::Forbidden(err.to_string()),
            MembershipError::CannotRemoveAdmin | MembershipError::AdminCannotExit => {
                ApiError::Conflict(err.to_string())
            }
        }
    }
}

impl From<ModerationError> for ApiError {
    fn from(err: ModerationError) -> Self {
        match err {
            ModerationError::SelfReport | ModerationError::EmptyBody => {
                ApiError::Validation(err.to_string())
            }
            ModerationError::AlreadyResolved => ApiError::Conflict(err.to_string()),
        }
    }
}

impl From<ChatStoreError> for ApiError {
    fn from(err: ChatStoreError) -> Self {
        match err {
            ChatStoreError::NotFound => ApiError::NotFound("Chat room not found".into()),
            ChatStoreError::Membership(e) => e.into(),
            ChatStoreError::Database(e) => e.into(),
        }
    }
}

impl From<ReportStoreError> for ApiError {
    fn from(err: ReportStoreError) -> Self {
        match err {
            ReportStoreError::NotFound => ApiError::NotFound("Report not found".into()),
            ReportStoreError::AlreadyResolved => {
                ApiError::Conflict("Report has already been resolved".into())
            }
            ReportStoreError::Database(e) => e.into(),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let messages: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| {
                    format!(
                        "{}: {}",
                        field,
                        e.message.clone().unwrap_or_else(|| "invalid".into())
                    )
                })
            })
            .collect();

        ApiError::Validation(messages.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_status_codes() {
        let cases: Vec<(ApiError, StatusCode)> = vec![
            (
                ApiError::Unauthorized("no token".into()),
                StatusCode::UNAUTHORIZED,
            ),
            (
                ApiError::Forbidden("admins only".into()),
                StatusCode::FORBIDDEN,
            ),
            (ApiError::NotFound("gone".into()), StatusCode::NOT_FOUND),
            (ApiError::Conflict("dup".into()), StatusCode::CONFLICT),
            (
                ApiError::Validation("bad".into()),
                StatusCode::BAD_REQUEST,
            ),
            (ApiError::RateLimited, StatusCode::TOO_MANY_REQUESTS),
            (
                ApiError::Unimplemented("room deletion".into()),
                StatusCode::NOT_IMPLEMENTED,
            ),
            (
                ApiError::Internal("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ApiError::ServiceUnavailable("maintenance".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_from_sqlx_row_not_found() {
        let error: ApiError = sqlx::Error::RowNotFound.into();
        assert!(matches!(error, ApiError::NotFound(_)));
    }

    #[test]
    fn test_from_membership_errors() {
        let error: ApiError = MembershipError::NotAuthorized.into();
        assert!(matches!(error, ApiError::Forbidden(_)));

        let error: ApiError = MembershipError::CannotRemoveAdmin.into();
        assert!(matches!(error, ApiError::Conflict(_)));

        let error: ApiError = MembershipError::AdminCannotExit.into();
        assert!(matches!(error, ApiError::Conflict(_)));
    }

    #[test]
    fn test_from_moderation_errors() {
        let error: ApiError = ModerationError::SelfReport.into();
        assert!(matches!(error, ApiError::Validation(_)));

        let error: ApiError = ModerationError::EmptyBody.into();
        assert!(matches!(error, ApiError::Validation(_)));

        let error: ApiError = ModerationError::AlreadyResolved.into();
        assert!(matches!(error, ApiError::Conflict(_)));
    }

    #[test]
    fn test_from_report_store_errors() {
        let error: ApiError = ReportStoreError::NotFound.into();
        assert!(matches!(error, ApiError::NotFound(_)));

        let error: ApiError = ReportStoreError::AlreadyResolved.into();
        assert!(matches!(error, ApiError::Conflict(_)));
    }

    #[test]
    fn test_from_chat_store_errors() {
        let error: ApiError = ChatStoreError::NotFound.into();
        assert!(matches!(error, ApiError::NotFound(_)));

        let error: ApiError = ChatStoreError::Membership(MembershipError::NotAuthorized).into();
        assert!(matches!(error, ApiError::Forbidden(_)));
    }
}
