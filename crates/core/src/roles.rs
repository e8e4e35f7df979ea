//! Well-known role names and the permission predicates built on them.
//!
//! Role names must match the `chk_users_role` constraint in
//! `20260301000001_create_users.sql`. A superuser is treated as an admin
//! regardless of the stored role.

use crate::error::CoreError;
use crate::types::DbId;

pub const ROLE_USER: &str = "user";
pub const ROLE_MODERATOR: &str = "moderator";
pub const ROLE_ADMIN: &str = "admin";

/// All valid role values.
pub const VALID_ROLES: &[&str] = &[ROLE_USER, ROLE_MODERATOR, ROLE_ADMIN];

/// Validate that a role string is one of the accepted values.
pub fn validate_role(role: &str) -> Result<(), CoreError> {
    if VALID_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid role '{role}'. Must be one of: {}",
            VALID_ROLES.join(", ")
        )))
    }
}

/// Full administrative rights: the `admin` role or the superuser flag.
pub fn is_admin(role: &str, is_superuser: bool) -> bool {
    is_superuser || role == ROLE_ADMIN
}

/// Moderation rights over other people's reviews and comments.
pub fn is_moderator_or_admin(role: &str, is_superuser: bool) -> bool {
    is_admin(role, is_superuser) || role == ROLE_MODERATOR
}

/// Whether the actor may edit or delete an authored object (review, comment).
///
/// Authors always may; moderators and admins may act on anyone's content.
pub fn can_modify_authored(
    actor_id: DbId,
    role: &str,
    is_superuser: bool,
    author_id: DbId,
) -> bool {
    actor_id == author_id || is_moderator_or_admin(role, is_superuser)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_roles_accepted() {
        for role in VALID_ROLES {
            assert!(validate_role(role).is_ok());
        }
    }

    #[test]
    fn unknown_role_rejected() {
        let err = validate_role("superadmin").unwrap_err();
        assert!(err.to_string().contains("Invalid role"));
        assert!(validate_role("").is_err());
        assert!(validate_role("Admin").is_err());
    }

    #[test]
    fn superuser_is_admin_whatever_the_role() {
        assert!(is_admin(ROLE_USER, true));
        assert!(is_admin(ROLE_ADMIN, false));
        assert!(!is_admin(ROLE_MODERATOR, false));
        assert!(!is_admin(ROLE_USER, false));
    }

    #[test]
    fn moderator_rights() {
        assert!(is_moderator_or_admin(ROLE_MODERATOR, false));
        assert!(is_moderator_or_admin(ROLE_ADMIN, false));
        assert!(is_moderator_or_admin(ROLE_USER, true));
        assert!(!is_moderator_or_admin(ROLE_USER, false));
    }

    #[test]
    fn author_may_modify_own_content() {
        assert!(can_modify_authored(7, ROLE_USER, false, 7));
    }

    #[test]
    fn plain_user_may_not_modify_others_content() {
        assert!(!can_modify_authored(7, ROLE_USER, false, 8));
    }

    #[test]
    fn moderator_and_admin_may_modify_others_content() {
        assert!(can_modify_authored(7, ROLE_MODERATOR, false, 8));
        assert!(can_modify_authored(7, ROLE_ADMIN, false, 8));
        assert!(can_modify_authored(7, ROLE_USER, true, 8));
    }
}
