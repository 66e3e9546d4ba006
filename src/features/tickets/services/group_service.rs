use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::tickets::models::TicketGroup;

/// Archives ticket groups once every member ticket has reached a terminal
/// status. The ticket service delegates here after terminal transitions.
pub struct GroupService {
    pool: PgPool,
}

impl GroupService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Archive the group if no member ticket remains open. Returns whether
    /// the group was archived by this call.
    pub async fn archive_if_complete(&self, group_id: i64) -> Result<bool> {
        let archived = sqlx::query_as::<_, TicketGroup>(
            r#"
            UPDATE ticket_groups g
            SET archived_at = NOW()
            WHERE g.id = $1
              AND g.archived_at IS NULL
              AND NOT EXISTS (
                  SELECT 1
                  FROM tickets t
                  JOIN ticket_statuses s ON s.id = t.status_id
                  WHERE t.group_id = g.id
                    AND s.value NOT IN ('resolved', 'closed')
              )
            RETURNING g.id, g.name, g.archived_at, g.created_at
            "#,
        )
        .bind(group_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to archive ticket group: {:?}", e);
            AppError::Database(e)
        })?;

        if let Some(group) = &archived {
            tracing::info!("Ticket group {} ('{}') archived", group.id, group.name);
        }

        Ok(archived.is_some())
    }
}
