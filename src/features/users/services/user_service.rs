use sqlx::PgPool;
use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::users::models::{Role, User};
use crate::features::users::services::role_cache::RoleCache;

/// Service for user rows and role management
pub struct UserService {
    pool: PgPool,
    role_cache: Arc<RoleCache>,
}

impl UserService {
    pub fn new(pool: PgPool, role_cache: Arc<RoleCache>) -> Self {
        Self { pool, role_cache }
    }

    /// Resolve a token subject to a user row, provisioning one on first
    /// sight. New users start as students; role upgrades are explicit.
    pub async fn resolve_subject(
        &self,
        subject: &str,
        name: Option<&str>,
        email: Option<&str>,
    ) -> Result<User> {
        let display_name = name.unwrap_or(subject);

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (subject, display_name, email)
            VALUES ($1, $2, $3)
            ON CONFLICT (subject) DO UPDATE SET
                display_name = EXCLUDED.display_name,
                email = COALESCE(EXCLUDED.email, users.email),
                updated_at = NOW()
            RETURNING id, subject, display_name, email, role, created_at, updated_at
            "#,
        )
        .bind(subject)
        .bind(display_name)
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to resolve user subject: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(user)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, subject, display_name, email, role, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get user by id: {:?}", e);
            AppError::Database(e)
        })?;

        user.ok_or_else(|| AppError::NotFound(format!("User '{}' not found", id)))
    }

    /// Change a user's role and invalidate their cache entry so the new
    /// level takes effect on the next request.
    pub async fn set_role(&self, id: i64, role: Role) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET role = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, subject, display_name, email, role, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(role)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update user role: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("User '{}' not found", id)))?;

        self.role_cache.invalidate_user(id).await;

        tracing::info!("Role changed: user={} role={}", user.id, user.role);

        Ok(user)
    }
}
