//! Common validation utilities.

use validator::ValidationError;

/// Maximum length of a display name or chat room name.
pub const MAX_NAME_LEN: usize = 80;

/// Maximum length of a single profile hashtag.
const MAX_HASHTAG_LEN: usize = 30;

/// Validates that a name is non-blank after trimming and within length limits.
pub fn validate_trimmed_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        let mut err = ValidationError::new("name_blank");
        err.message = Some("Name must not be blank".into());
        return Err(err);
    }
    if trimmed.len() > MAX_NAME_LEN {
        let mut err = ValidationError::new("name_too_long");
        err.message = Some("Name must be at most 80 characters".into());
        return Err(err);
    }
    Ok(())
}

/// Validates a list of profile hashtags.
///
/// Each tag must be non-empty, at most 30 characters, and contain only
/// alphanumerics and underscores (a leading `#` is tolerated).
pub fn validate_hashtags(tags: &[String]) -> Result<(), ValidationError> {
    for tag in tags {
        let tag = tag.strip_prefix('#').unwrap_or(tag);
        if tag.is_empty() || tag.len() > MAX_HASHTAG_LEN {
            let mut err = ValidationError::new("hashtag_length");
            err.message = Some("Hashtags must be 1-30 characters".into());
            return Err(err);
        }
        if !tag.chars().all(|c| c.is_alphanumeric() || c == '_') {
            let mut err = ValidationError::new("hashtag_chars");
            err.message = Some("Hashtags may contain only letters, digits, and underscores".into());
            return Err(err);
        }
    }
    Ok(())
}

/// Validates a time-of-day string in `HH:MM` or `HH:MM:SS` form.
pub fn validate_time_of_day(value: &str) -> Result<(), ValidationError> {
    let ok = chrono::NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| chrono::NaiveTime::parse_from_str(value, "%H:%M"))
        .is_ok();
    if ok {
        Ok(())
    } else {
        let mut err = ValidationError::new("time_format");
        err.message = Some("Time must be in HH:MM or HH:MM:SS format".into());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_trimmed_name() {
        assert!(validate_trimmed_name("Basketball Crew").is_ok());
        assert!(validate_trimmed_name("  padded  ").is_ok());
        assert!(validate_trimmed_name("").is_err());
        assert!(validate_trimmed_name("   ").is_err());
        assert!(validate_trimmed_name(&"x".repeat(81)).is_err());
        assert!(validate_trimmed_name(&"x".repeat(80)).is_ok());
    }

    #[test]
    fn test_validate_trimmed_name_error_message() {
        let err = validate_trimmed_name("  ").unwrap_err();
        assert_eq!(err.message.unwrap().to_string(), "Name must not be blank");
    }

    #[test]
    fn test_validate_hashtags() {
        assert!(validate_hashtags(&[]).is_ok());
        assert!(validate_hashtags(&["#tennis".into(), "weekend_play".into()]).is_ok());
        assert!(validate_hashtags(&["".into()]).is_err());
        assert!(validate_hashtags(&["#".into()]).is_err());
        assert!(validate_hashtags(&["has space".into()]).is_err());
        assert!(validate_hashtags(&["x".repeat(31)]).is_err());
    }

    #[test]
    fn test_validate_time_of_day() {
        assert!(validate_time_of_day("09:30").is_ok());
        assert!(validate_time_of_day("09:30:00").is_ok());
        assert!(validate_time_of_day("23:59:59").is_ok());
        assert!(validate_time_of_day("24:00").is_err());
        assert!(validate_time_of_day("9am").is_err());
        assert!(validate_time_of_day("").is_err());
    }
}
