use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;

/// Permission level, matching the database enum.
///
/// Variant order is the permission order: comparisons like
/// `role >= Role::Admin` replace scattered string checks.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Type, ToSchema,
)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Student,
    Committee,
    Admin,
    SuperAdmin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Student => write!(f, "student"),
            Role::Committee => write!(f, "committee"),
            Role::Admin => write!(f, "admin"),
            Role::SuperAdmin => write!(f, "super_admin"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Role::Student),
            "committee" => Ok(Role::Committee),
            "admin" => Ok(Role::Admin),
            "super_admin" => Ok(Role::SuperAdmin),
            other => Err(format!("Unknown role '{}'", other)),
        }
    }
}

/// Database model for a user row
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub subject: String,
    pub display_name: String,
    pub email: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn role_ordering_is_total() {
        assert!(Role::Student < Role::Committee);
        assert!(Role::Committee < Role::Admin);
        assert!(Role::Admin < Role::SuperAdmin);
    }

    #[test]
    fn role_round_trips_through_strings() {
        for role in [Role::Student, Role::Committee, Role::Admin, Role::SuperAdmin] {
            assert_eq!(Role::from_str(&role.to_string()), Ok(role));
        }
        assert!(Role::from_str("superadmin").is_err());
        assert!(Role::from_str("").is_err());
    }
}
