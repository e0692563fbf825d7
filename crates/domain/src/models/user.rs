//! User profile domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Tier thresholds, in created-event counts.
const GOLD_THRESHOLD: usize = 30;
const SILVER_THRESHOLD: usize = 20;
const BRONZE_THRESHOLD: usize = 10;

/// User ranking derived from the number of events a user has created.
///
/// The tier is always recomputed from the created-event list; it is never
/// edited directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    NewUser,
    Bronze,
    Silver,
    Gold,
}

impl Tier {
    /// Derives the tier from a created-event count.
    pub fn from_created_count(count: usize) -> Self {
        if count >= GOLD_THRESHOLD {
            Tier::Gold
        } else if count >= SILVER_THRESHOLD {
            Tier::Silver
        } else if count >= BRONZE_THRESHOLD {
            Tier::Bronze
        } else {
            Tier::NewUser
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::NewUser => "new_user",
            Tier::Bronze => "bronze",
            Tier::Silver => "silver",
            Tier::Gold => "gold",
        }
    }
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new_user" => Ok(Tier::NewUser),
            "bronze" => Ok(Tier::Bronze),
            "silver" => Ok(Tier::Silver),
            "gold" => Ok(Tier::Gold),
            _ => Err(format!("Invalid tier: {}", s)),
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A user account with its profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)] // Never serialize password hash to API responses
    pub password_hash: String,
    pub name: String,
    pub bio: String,
    pub hashtags: Vec<String>,
    pub profile_pic: String,
    pub tier: Tier,
    /// Number of upheld reports against this user. Only ever increases.
    pub bans: i32,
    pub created_events: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Reduced profile used in member lists and report summaries.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    pub id: Uuid,
    pub name: String,
    pub profile_pic: String,
}

/// Request body for profile updates.
///
/// Identity and moderation fields (id, email, bans, tier, created events)
/// are not client-writable.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(custom(function = "shared::validation::validate_trimmed_name"))]
    pub name: Option<String>,

    #[validate(length(max = 500, message = "Bio must be at most 500 characters"))]
    pub bio: Option<String>,

    #[validate(custom(function = "shared::validation::validate_hashtags"))]
    pub hashtags: Option<Vec<String>>,

    #[validate(length(max = 500, message = "Profile picture reference too long"))]
    pub profile_pic: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_from_created_count() {
        assert_eq!(Tier::from_created_count(0), Tier::NewUser);
        assert_eq!(Tier::from_created_count(9), Tier::NewUser);
        assert_eq!(Tier::from_created_count(10), Tier::Bronze);
        assert_eq!(Tier::from_created_count(19), Tier::Bronze);
        assert_eq!(Tier::from_created_count(20), Tier::Silver);
        assert_eq!(Tier::from_created_count(29), Tier::Silver);
        assert_eq!(Tier::from_created_count(30), Tier::Gold);
        assert_eq!(Tier::from_created_count(1000), Tier::Gold);
    }

    #[test]
    fn test_tier_ordering() {
        assert!(Tier::NewUser < Tier::Bronze);
        assert!(Tier::Bronze < Tier::Silver);
        assert!(Tier::Silver < Tier::Gold);
    }

    #[test]
    fn test_tier_roundtrip() {
        for tier in [Tier::NewUser, Tier::Bronze, Tier::Silver, Tier::Gold] {
            assert_eq!(Tier::from_str(tier.as_str()).unwrap(), tier);
        }
        assert!(Tier::from_str("platinum").is_err());
    }

    #[test]
    fn test_user_password_hash_not_serialized() {
        let user = User {
            id: Uuid::new_v4(),
            email: "pat@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            name: "pat".to_string(),
            bio: "I'm new to PlanUpp!".to_string(),
            hashtags: vec![],
            profile_pic: "/placeholder.svg".to_string(),
            tier: Tier::NewUser,
            bans: 0,
            created_events: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(!json.contains("passwordHash"));
    }

    #[test]
    fn test_update_profile_request_validation() {
        let request = UpdateProfileRequest {
            name: Some("Jordan".to_string()),
            bio: Some("Weekend footballer".to_string()),
            hashtags: Some(vec!["#football".to_string()]),
            profile_pic: None,
        };
        assert!(request.validate().is_ok());

        let blank_name = UpdateProfileRequest {
            name: Some("   ".to_string()),
            bio: None,
            hashtags: None,
            profile_pic: None,
        };
        assert!(blank_name.validate().is_err());

        let bad_tag = UpdateProfileRequest {
            name: None,
            bio: None,
            hashtags: Some(vec!["no spaces allowed".to_string()]),
            profile_pic: None,
        };
        assert!(bad_tag.validate().is_err());
    }
}
