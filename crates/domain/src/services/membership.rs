//! Chat room membership rules.
//!
//! The member list of a room is ordered: `members[0]` is the room admin and
//! may never be removed or displaced. Every function here is a pure
//! transition over a member list; the persistence layer applies the returned
//! update and mirrors the linked event's participant count inside the same
//! database transaction.

use thiserror::Error;
use uuid::Uuid;

/// Error type for membership transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MembershipError {
    #[error("Only the chat admin can perform this action")]
    NotAuthorized,

    #[error("Cannot remove the chat admin")]
    CannotRemoveAdmin,

    #[error("Chat admin cannot exit. Delete the chat room instead.")]
    AdminCannotExit,
}

/// Result of a membership transition.
///
/// `changed` is false for idempotent no-ops (joining a room you are already
/// in, exiting a room you are not in); callers skip the write in that case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberUpdate {
    pub members: Vec<Uuid>,
    pub changed: bool,
}

impl MemberUpdate {
    fn unchanged(members: &[Uuid]) -> Self {
        Self {
            members: members.to_vec(),
            changed: false,
        }
    }

    /// Member count after the transition; mirrored onto the linked event.
    pub fn count(&self) -> i32 {
        self.members.len() as i32
    }
}

/// Whether `user_id` is the admin (first member) of the list.
pub fn is_admin(members: &[Uuid], user_id: Uuid) -> bool {
    members.first() == Some(&user_id)
}

/// A user joins a room on their own. Already a member is a no-op.
pub fn join(members: &[Uuid], user_id: Uuid) -> MemberUpdate {
    if members.contains(&user_id) {
        return MemberUpdate::unchanged(members);
    }
    let mut updated = members.to_vec();
    updated.push(user_id);
    MemberUpdate {
        members: updated,
        changed: true,
    }
}

/// The room admin adds another user. Same semantics as [`join`] once the
/// caller is verified to be the admin.
pub fn admin_add(
    members: &[Uuid],
    admin_id: Uuid,
    user_id: Uuid,
) -> Result<MemberUpdate, MembershipError> {
    if !is_admin(members, admin_id) {
        return Err(MembershipError::NotAuthorized);
    }
    Ok(join(members, user_id))
}

/// The room admin removes a member. The admin itself can never be removed.
pub fn admin_remove(
    members: &[Uuid],
    admin_id: Uuid,
    target_id: Uuid,
) -> Result<MemberUpdate, MembershipError> {
    if !is_admin(members, admin_id) {
        return Err(MembershipError::NotAuthorized);
    }
    remove_unchecked(members, target_id)
}

/// Removes a member without an admin-authorization check.
///
/// Used by server-triggered cleanup (moderation removing a banned user from
/// rooms); callers are expected to audit-log the removal. The admin
/// immutability rule still applies.
pub fn remove_unchecked(
    members: &[Uuid],
    target_id: Uuid,
) -> Result<MemberUpdate, MembershipError> {
    if is_admin(members, target_id) {
        return Err(MembershipError::CannotRemoveAdmin);
    }
    if !members.contains(&target_id) {
        return Ok(MemberUpdate::unchanged(members));
    }
    let updated: Vec<Uuid> = members.iter().copied().filter(|id| *id != target_id).collect();
    Ok(MemberUpdate {
        members: updated,
        changed: true,
    })
}

/// A member leaves a room on their own. The admin cannot exit; not being a
/// member is a no-op.
pub fn self_exit(members: &[Uuid], user_id: Uuid) -> Result<MemberUpdate, MembershipError> {
    if is_admin(members, user_id) {
        return Err(MembershipError::AdminCannotExit);
    }
    if !members.contains(&user_id) {
        return Ok(MemberUpdate::unchanged(members));
    }
    let updated: Vec<Uuid> = members.iter().copied().filter(|id| *id != user_id).collect();
    Ok(MemberUpdate {
        members: updated,
        changed: true,
    })
}

/// A capacity limit with its public/friend slot split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotAllocation {
    pub chat_limit: i32,
    pub public_slots: i32,
    pub friend_slots: i32,
}

/// Fits a public/friend slot split under a chat limit.
///
/// If the split already fits it is returned unchanged. Otherwise the public
/// share keeps its proportion of the (smaller) limit, rounded down, and
/// friends take the remainder.
pub fn fit_slots(chat_limit: i32, public_slots: i32, friend_slots: i32) -> SlotAllocation {
    let limit = chat_limit.max(0);
    let public = public_slots.max(0);
    let friends = friend_slots.max(0);

    let total = public as i64 + friends as i64;
    if total <= limit as i64 {
        return SlotAllocation {
            chat_limit: limit,
            public_slots: public,
            friend_slots: friends,
        };
    }

    let rescaled_public = ((limit as i64 * public as i64) / total) as i32;
    SlotAllocation {
        chat_limit: limit,
        public_slots: rescaled_public,
        friend_slots: limit - rescaled_public,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<Uuid> {
        (0..n).map(|_| Uuid::new_v4()).collect()
    }

    #[test]
    fn test_join_appends_new_member() {
        let members = ids(2);
        let newcomer = Uuid::new_v4();

        let update = join(&members, newcomer);

        assert!(update.changed);
        assert_eq!(update.members.len(), 3);
        assert_eq!(update.members[0], members[0], "admin stays at index 0");
        assert_eq!(*update.members.last().unwrap(), newcomer);
        assert_eq!(update.count(), 3);
    }

    #[test]
    fn test_join_is_idempotent() {
        let members = ids(3);

        let update = join(&members, members[1]);

        assert!(!update.changed);
        assert_eq!(update.members, members);
    }

    #[test]
    fn test_join_never_duplicates() {
        let members = ids(1);
        let user = Uuid::new_v4();

        let first = join(&members, user);
        let second = join(&first.members, user);

        let unique: std::collections::HashSet<_> = second.members.iter().collect();
        assert_eq!(unique.len(), second.members.len());
    }

    #[test]
    fn test_admin_add_requires_admin() {
        let members = ids(3);
        let newcomer = Uuid::new_v4();

        // members[1] is not the admin
        let result = admin_add(&members, members[1], newcomer);
        assert_eq!(result, Err(MembershipError::NotAuthorized));

        let update = admin_add(&members, members[0], newcomer).unwrap();
        assert!(update.changed);
        assert!(update.members.contains(&newcomer));
    }

    #[test]
    fn test_admin_add_existing_member_is_noop() {
        let members = ids(3);
        let update = admin_add(&members, members[0], members[2]).unwrap();
        assert!(!update.changed);
        assert_eq!(update.members, members);
    }

    #[test]
    fn test_admin_remove_requires_admin() {
        let members = ids(3);
        let result = admin_remove(&members, members[2], members[1]);
        assert_eq!(result, Err(MembershipError::NotAuthorized));
    }

    #[test]
    fn test_admin_cannot_be_removed() {
        let members = ids(3);

        // Not even by the admin itself
        let result = admin_remove(&members, members[0], members[0]);
        assert_eq!(result, Err(MembershipError::CannotRemoveAdmin));

        // Nor through the unchecked cleanup path
        let result = remove_unchecked(&members, members[0]);
        assert_eq!(result, Err(MembershipError::CannotRemoveAdmin));
    }

    #[test]
    fn test_admin_remove_member() {
        let members = ids(3);
        let update = admin_remove(&members, members[0], members[1]).unwrap();

        assert!(update.changed);
        assert_eq!(update.members, vec![members[0], members[2]]);
        assert_eq!(update.count(), 2);
    }

    #[test]
    fn test_remove_unchecked_missing_member_is_noop() {
        let members = ids(2);
        let update = remove_unchecked(&members, Uuid::new_v4()).unwrap();
        assert!(!update.changed);
        assert_eq!(update.members, members);
    }

    #[test]
    fn test_self_exit() {
        let members = ids(3);
        let update = self_exit(&members, members[2]).unwrap();

        assert!(update.changed);
        assert_eq!(update.members, vec![members[0], members[1]]);
    }

    #[test]
    fn test_admin_cannot_exit() {
        let members = ids(2);
        let result = self_exit(&members, members[0]);
        assert_eq!(result, Err(MembershipError::AdminCannotExit));
    }

    #[test]
    fn test_self_exit_non_member_is_noop() {
        let members = ids(2);
        let update = self_exit(&members, Uuid::new_v4()).unwrap();
        assert!(!update.changed);
        assert_eq!(update.members, members);
    }

    #[test]
    fn test_admin_survives_any_sequence() {
        let admin = Uuid::new_v4();
        let mut members = vec![admin];

        let joiners = ids(5);
        for user in &joiners {
            members = join(&members, *user).members;
        }
        members = admin_remove(&members, admin, joiners[0]).unwrap().members;
        members = self_exit(&members, joiners[1]).unwrap().members;
        members = remove_unchecked(&members, joiners[2]).unwrap().members;

        assert_eq!(members[0], admin);
        let unique: std::collections::HashSet<_> = members.iter().collect();
        assert_eq!(unique.len(), members.len());
    }

    #[test]
    fn test_fit_slots_within_limit_unchanged() {
        let fit = fit_slots(10, 6, 4);
        assert_eq!(
            fit,
            SlotAllocation {
                chat_limit: 10,
                public_slots: 6,
                friend_slots: 4
            }
        );
    }

    #[test]
    fn test_fit_slots_rescales_proportionally() {
        // 8 public / 4 friends into a limit of 6: public keeps 2/3 of the limit
        let fit = fit_slots(6, 8, 4);
        assert_eq!(fit.chat_limit, 6);
        assert_eq!(fit.public_slots, 4);
        assert_eq!(fit.friend_slots, 2);
        assert_eq!(fit.public_slots + fit.friend_slots, fit.chat_limit);
    }

    #[test]
    fn test_fit_slots_rounds_public_down() {
        let fit = fit_slots(5, 1, 1);
        assert_eq!(fit.public_slots, 1);
        assert_eq!(fit.friend_slots, 1);

        let fit = fit_slots(3, 5, 5);
        assert_eq!(fit.public_slots, 1);
        assert_eq!(fit.friend_slots, 2);
        assert_eq!(fit.public_slots + fit.friend_slots, 3);
    }

    #[test]
    fn test_fit_slots_clamps_negatives() {
        let fit = fit_slots(4, -3, 2);
        assert_eq!(fit.public_slots, 0);
        assert_eq!(fit.friend_slots, 2);
    }
}
