use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::users::models::{Role, User};

/// Response DTO for a user
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponseDto {
    pub id: i64,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponseDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            display_name: u.display_name,
            email: u.email,
            role: u.role,
            created_at: u.created_at,
        }
    }
}

/// DTO for changing a user's role (super admin only)
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateRoleDto {
    pub role: Role,
}
