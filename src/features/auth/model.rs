use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::users::models::Role;

/// The acting identity for a request: a user row resolved from the bearer
/// token's subject, with its role looked up through the role cache.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    pub id: i64,
    pub subject: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub role: Role,
}

impl AuthenticatedUser {
    pub fn is_super_admin(&self) -> bool {
        self.role == Role::SuperAdmin
    }

    /// Admin-level access: admin or super_admin
    pub fn is_admin_level(&self) -> bool {
        self.role >= Role::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{super_admin_user, user_with_role};

    #[test]
    fn admin_level_follows_role_ordering() {
        assert!(super_admin_user().is_admin_level());
        assert!(user_with_role(2, Role::Admin).is_admin_level());
        assert!(!user_with_role(3, Role::Committee).is_admin_level());
        assert!(!user_with_role(4, Role::Student).is_admin_level());
    }

    #[test]
    fn super_admin_is_distinct_from_admin() {
        assert!(super_admin_user().is_super_admin());
        assert!(!user_with_role(2, Role::Admin).is_super_admin());
    }
}
