#[cfg(test)]
use crate::features::auth::model::AuthenticatedUser;

#[cfg(test)]
use crate::features::users::models::Role;

#[cfg(test)]
pub fn user_with_role(id: i64, role: Role) -> AuthenticatedUser {
    AuthenticatedUser {
        id,
        subject: format!("test-subject-{}", id),
        display_name: format!("Test User {}", id),
        email: Some(format!("user{}@example.edu", id)),
        role,
    }
}

#[cfg(test)]
pub fn super_admin_user() -> AuthenticatedUser {
    user_with_role(1, Role::SuperAdmin)
}
