//! Well-known role name constants.
//!
//! These must match the `ck_users_role` check constraint in
//! `20250301000001_create_users.sql`.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_OWNER: &str = "owner";
pub const ROLE_RENTER: &str = "renter";
pub const ROLE_SKIPPER: &str = "skipper";

/// Roles a user may pick for themselves at signup. Admins are provisioned
/// out of band.
pub const SELF_SERVICE_ROLES: &[&str] = &[ROLE_OWNER, ROLE_RENTER, ROLE_SKIPPER];

/// Whether `role` may be chosen at signup.
pub fn is_self_service_role(role: &str) -> bool {
    SELF_SERVICE_ROLES.contains(&role)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_is_not_self_service() {
        assert!(!is_self_service_role(ROLE_ADMIN));
    }

    #[test]
    fn marketplace_roles_are_self_service() {
        assert!(is_self_service_role(ROLE_OWNER));
        assert!(is_self_service_role(ROLE_RENTER));
        assert!(is_self_service_role(ROLE_SKIPPER));
        assert!(!is_self_service_role("captain"));
    }
}
