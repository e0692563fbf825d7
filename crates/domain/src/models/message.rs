//! Chat message domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A message in a chat room. Messages are immutable once sent; there are no
/// edit or delete operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: Uuid,
    pub chat_id: Uuid,
    pub sender_id: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Request body for sending a message.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    #[validate(length(min = 1, max = 2000, message = "Message body must be 1-2000 characters"))]
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_message_request_validation() {
        let request = SendMessageRequest {
            body: "Anyone up for a warmup at 5:45?".to_string(),
        };
        assert!(request.validate().is_ok());

        let empty = SendMessageRequest { body: String::new() };
        assert!(empty.validate().is_err());

        let too_long = SendMessageRequest {
            body: "x".repeat(2001),
        };
        assert!(too_long.validate().is_err());
    }
}
