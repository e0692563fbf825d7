//! Sports event domain models.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Review status of an event listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Pending,
    Admitted,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Pending => "pending",
            EventStatus::Admitted => "admitted",
        }
    }
}

impl FromStr for EventStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(EventStatus::Pending),
            "admitted" => Ok(EventStatus::Admitted),
            _ => Err(format!("Invalid event status: {}", s)),
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A sports event with its denormalized participation counters.
///
/// `total_participants` is the capacity chosen at creation;
/// `participant_count` mirrors the member count of the companion chat room
/// and is updated in the same transaction as every membership change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub sport: String,
    pub location: String,
    pub event_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub description: String,
    pub screenshot: Option<String>,
    pub creator_id: Uuid,
    pub status: EventStatus,
    pub total_participants: i32,
    pub participant_count: i32,
    pub created_at: DateTime<Utc>,
}

impl Event {
    /// Whether the event can still accept joiners.
    pub fn has_open_slots(&self) -> bool {
        self.participant_count < self.total_participants
    }
}

/// Request body for creating an event.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    #[validate(length(min = 1, max = 40, message = "Sport is required"))]
    pub sport: String,

    #[validate(length(min = 1, max = 120, message = "Location is required"))]
    pub location: String,

    pub event_date: NaiveDate,

    #[validate(custom(function = "shared::validation::validate_time_of_day"))]
    pub start_time: String,

    #[validate(custom(function = "shared::validation::validate_time_of_day"))]
    pub end_time: String,

    #[validate(length(min = 1, max = 1000, message = "Description is required"))]
    pub description: String,

    #[validate(length(max = 500, message = "Screenshot reference too long"))]
    pub screenshot: Option<String>,

    #[validate(range(min = 2, message = "An event needs at least 2 participants"))]
    pub total_participants: i32,
}

impl CreateEventRequest {
    /// Parses the start time, accepting `HH:MM` or `HH:MM:SS`.
    pub fn parsed_start_time(&self) -> Option<NaiveTime> {
        parse_time(&self.start_time)
    }

    /// Parses the end time, accepting `HH:MM` or `HH:MM:SS`.
    pub fn parsed_end_time(&self) -> Option<NaiveTime> {
        parse_time(&self.end_time)
    }
}

fn parse_time(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> CreateEventRequest {
        CreateEventRequest {
            sport: "Basketball".to_string(),
            location: "Jurong East Sports Hall".to_string(),
            event_date: NaiveDate::from_ymd_opt(2025, 6, 14).unwrap(),
            start_time: "18:00".to_string(),
            end_time: "20:00".to_string(),
            description: "Casual 3v3, all levels welcome".to_string(),
            screenshot: None,
            total_participants: 6,
        }
    }

    #[test]
    fn test_event_status_roundtrip() {
        assert_eq!(EventStatus::from_str("pending").unwrap(), EventStatus::Pending);
        assert_eq!(EventStatus::from_str("admitted").unwrap(), EventStatus::Admitted);
        assert!(EventStatus::from_str("rejected").is_err());
        assert_eq!(EventStatus::Admitted.to_string(), "admitted");
    }

    #[test]
    fn test_create_event_request_valid() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn test_create_event_request_missing_fields() {
        let mut request = valid_request();
        request.sport = String::new();
        assert!(request.validate().is_err());

        let mut request = valid_request();
        request.location = String::new();
        assert!(request.validate().is_err());

        let mut request = valid_request();
        request.description = String::new();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_create_event_request_minimum_capacity() {
        let mut request = valid_request();
        request.total_participants = 1;
        assert!(request.validate().is_err());

        request.total_participants = 2;
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_create_event_request_bad_time() {
        let mut request = valid_request();
        request.start_time = "6pm".to_string();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_parsed_times() {
        let request = valid_request();
        assert_eq!(
            request.parsed_start_time(),
            NaiveTime::from_hms_opt(18, 0, 0)
        );
        assert_eq!(request.parsed_end_time(), NaiveTime::from_hms_opt(20, 0, 0));
    }

    #[test]
    fn test_has_open_slots() {
        let event = Event {
            id: Uuid::new_v4(),
            sport: "Tennis".to_string(),
            location: "Kallang".to_string(),
            event_date: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(11, 0, 0).unwrap(),
            description: "Doubles".to_string(),
            screenshot: None,
            creator_id: Uuid::new_v4(),
            status: EventStatus::Admitted,
            total_participants: 4,
            participant_count: 3,
            created_at: Utc::now(),
        };
        assert!(event.has_open_slots());

        let full = Event {
            participant_count: 4,
            ..event
        };
        assert!(!full.has_open_slots());
    }
}
