//! Report and ban escalation rules.
//!
//! A report is resolved at most once: `pending -> banned` or
//! `pending -> ignored`. Each upheld report increments the reported user's
//! ban count by exactly one; the count never decreases (there is no unban).

use crate::models::report::ReportStatus;
use thiserror::Error;
use uuid::Uuid;

/// Ban count at which a user is considered permanently banned.
pub const PERMANENT_BAN_THRESHOLD: i32 = 5;

/// Error type for moderation rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ModerationError {
    #[error("Users cannot report themselves")]
    SelfReport,

    #[error("Report body must not be empty")]
    EmptyBody,

    #[error("Report has already been resolved")]
    AlreadyResolved,
}

/// What the administrator decided about a pending report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveAction {
    Ban,
    Ignore,
}

/// Validates a report before anything is written.
pub fn validate_report(
    reporter_id: Uuid,
    reported_id: Uuid,
    body: &str,
) -> Result<(), ModerationError> {
    if reporter_id == reported_id {
        return Err(ModerationError::SelfReport);
    }
    if body.trim().is_empty() {
        return Err(ModerationError::EmptyBody);
    }
    Ok(())
}

/// Computes the next status for a report resolution.
///
/// Only pending reports can be resolved; anything else fails without a write.
pub fn resolve(
    current: ReportStatus,
    action: ResolveAction,
) -> Result<ReportStatus, ModerationError> {
    if current != ReportStatus::Pending {
        return Err(ModerationError::AlreadyResolved);
    }
    Ok(match action {
        ResolveAction::Ban => ReportStatus::Banned,
        ResolveAction::Ignore => ReportStatus::Ignored,
    })
}

/// Whether a ban count has reached the permanent-ban threshold.
pub fn is_permanently_banned(bans: i32) -> bool {
    bans >= PERMANENT_BAN_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_report_rejects_self_report() {
        let user = Uuid::new_v4();
        let result = validate_report(user, user, "spamming the chat");
        assert_eq!(result, Err(ModerationError::SelfReport));
    }

    #[test]
    fn test_validate_report_rejects_blank_body() {
        let reporter = Uuid::new_v4();
        let reported = Uuid::new_v4();

        assert_eq!(
            validate_report(reporter, reported, ""),
            Err(ModerationError::EmptyBody)
        );
        assert_eq!(
            validate_report(reporter, reported, "   \n\t"),
            Err(ModerationError::EmptyBody)
        );
    }

    #[test]
    fn test_validate_report_accepts_valid() {
        let reporter = Uuid::new_v4();
        let reported = Uuid::new_v4();
        assert!(validate_report(reporter, reported, "harassment in DMs").is_ok());
    }

    #[test]
    fn test_resolve_pending_report() {
        assert_eq!(
            resolve(ReportStatus::Pending, ResolveAction::Ban).unwrap(),
            ReportStatus::Banned
        );
        assert_eq!(
            resolve(ReportStatus::Pending, ResolveAction::Ignore).unwrap(),
            ReportStatus::Ignored
        );
    }

    #[test]
    fn test_resolve_is_single_shot() {
        for current in [ReportStatus::Banned, ReportStatus::Ignored] {
            for action in [ResolveAction::Ban, ResolveAction::Ignore] {
                assert_eq!(
                    resolve(current, action),
                    Err(ModerationError::AlreadyResolved)
                );
            }
        }
    }

    #[test]
    fn test_permanent_ban_threshold() {
        for bans in 0..PERMANENT_BAN_THRESHOLD {
            assert!(!is_permanently_banned(bans), "bans={}", bans);
        }
        assert!(is_permanently_banned(5));
        assert!(is_permanently_banned(6));
    }

    #[test]
    fn test_escalation_sequence() {
        // Four upheld reports: still not permanent. The fifth crosses the line.
        let mut bans = 0;
        for _ in 0..4 {
            bans += 1;
            assert!(!is_permanently_banned(bans));
        }
        bans += 1;
        assert_eq!(bans, 5);
        assert!(is_permanently_banned(bans));
    }
}
