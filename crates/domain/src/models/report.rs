//! User report domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Resolution state of a user report.
///
/// A report starts `Pending` and is resolved by the administrator exactly
/// once, to either `Banned` or `Ignored`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Pending,
    Banned,
    Ignored,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Pending => "pending",
            ReportStatus::Banned => "banned",
            ReportStatus::Ignored => "ignored",
        }
    }
}

impl FromStr for ReportStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ReportStatus::Pending),
            "banned" => Ok(ReportStatus::Banned),
            "ignored" => Ok(ReportStatus::Ignored),
            _ => Err(format!("Invalid report status: {}", s)),
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A report filed by one user about another.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserReport {
    pub id: Uuid,
    pub reporter_id: Uuid,
    pub reported_id: Uuid,
    pub body: String,
    pub image: Option<String>,
    pub status: ReportStatus,
    pub reported_at: DateTime<Utc>,
}

/// Request body for filing a report.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FileReportRequest {
    pub reported_id: Uuid,

    #[validate(length(min = 1, max = 2000, message = "Report body is required"))]
    pub body: String,

    #[validate(length(max = 500, message = "Image reference too long"))]
    pub image: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_status_roundtrip() {
        for status in [ReportStatus::Pending, ReportStatus::Banned, ReportStatus::Ignored] {
            assert_eq!(ReportStatus::from_str(status.as_str()).unwrap(), status);
        }
        assert!(ReportStatus::from_str("resolved").is_err());
    }

    #[test]
    fn test_file_report_request_validation() {
        let request = FileReportRequest {
            reported_id: Uuid::new_v4(),
            body: "Abusive messages in the badminton chat".to_string(),
            image: None,
        };
        assert!(request.validate().is_ok());

        let empty = FileReportRequest {
            reported_id: Uuid::new_v4(),
            body: String::new(),
            image: None,
        };
        assert!(empty.validate().is_err());
    }
}
