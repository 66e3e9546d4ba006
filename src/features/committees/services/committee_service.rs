use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::committees::models::CommitteeTag;

const TAG_SELECT: &str = r#"
    SELECT
        ct.id, ct.ticket_id, ct.committee_id,
        c.name AS committee_name, c.head_id AS committee_head_id,
        ct.tagged_by, u.display_name AS tagged_by_name,
        ct.reason, ct.created_at
    FROM committee_tags ct
    JOIN committees c ON c.id = ct.committee_id
    JOIN users u ON u.id = ct.tagged_by
"#;

/// Service for committee tags: the explicit links granting a committee
/// action rights on tickets its members did not create.
pub struct CommitteeService {
    pool: PgPool,
}

impl CommitteeService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_tags(&self, ticket_id: i64) -> Result<Vec<CommitteeTag>> {
        let sql = format!("{TAG_SELECT} WHERE ct.ticket_id = $1 ORDER BY ct.created_at");

        sqlx::query_as::<_, CommitteeTag>(&sql)
            .bind(ticket_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list committee tags: {:?}", e);
                AppError::Database(e)
            })
    }

    /// Tag a committee onto a ticket. Duplicate tags are rejected.
    pub async fn create_tag(
        &self,
        ticket_id: i64,
        committee_id: i64,
        tagged_by: i64,
        reason: Option<String>,
    ) -> Result<CommitteeTag> {
        self.ensure_ticket_exists(ticket_id).await?;
        self.ensure_committee_exists(committee_id).await?;

        let inserted = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO committee_tags (ticket_id, committee_id, tagged_by, reason)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (ticket_id, committee_id) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(ticket_id)
        .bind(committee_id)
        .bind(tagged_by)
        .bind(reason.as_deref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create committee tag: {:?}", e);
            AppError::Database(e)
        })?;

        let tag_id = inserted.ok_or_else(|| {
            AppError::BadRequest("Ticket is already tagged to this committee".to_string())
        })?;

        tracing::info!(
            "Committee {} tagged on ticket {} by user {}",
            committee_id,
            ticket_id,
            tagged_by
        );

        self.get_tag(tag_id).await
    }

    /// Remove a tag by its id.
    pub async fn delete_tag_by_id(&self, ticket_id: i64, tag_id: i64) -> Result<()> {
        let rows = sqlx::query("DELETE FROM committee_tags WHERE id = $1 AND ticket_id = $2")
            .bind(tag_id)
            .bind(ticket_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete committee tag: {:?}", e);
                AppError::Database(e)
            })?
            .rows_affected();

        if rows == 0 {
            return Err(AppError::NotFound(format!(
                "Tag '{}' not found on ticket '{}'",
                tag_id, ticket_id
            )));
        }

        Ok(())
    }

    /// Remove a tag by the tagged committee's id.
    pub async fn delete_tag_by_committee(&self, ticket_id: i64, committee_id: i64) -> Result<()> {
        let rows = sqlx::query(
            "DELETE FROM committee_tags WHERE ticket_id = $1 AND committee_id = $2",
        )
        .bind(ticket_id)
        .bind(committee_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete committee tag: {:?}", e);
            AppError::Database(e)
        })?
        .rows_affected();

        if rows == 0 {
            return Err(AppError::NotFound(format!(
                "Committee '{}' is not tagged on ticket '{}'",
                committee_id, ticket_id
            )));
        }

        Ok(())
    }

    async fn get_tag(&self, tag_id: i64) -> Result<CommitteeTag> {
        let sql = format!("{TAG_SELECT} WHERE ct.id = $1");

        sqlx::query_as::<_, CommitteeTag>(&sql)
            .bind(tag_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch committee tag: {:?}", e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("Tag '{}' not found", tag_id)))
    }

    async fn ensure_ticket_exists(&self, ticket_id: i64) -> Result<()> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM tickets WHERE id = $1)")
                .bind(ticket_id)
                .fetch_one(&self.pool)
                .await
                .map_err(AppError::Database)?;

        if !exists {
            return Err(AppError::NotFound(format!(
                "Ticket '{}' not found",
                ticket_id
            )));
        }
        Ok(())
    }

    async fn ensure_committee_exists(&self, committee_id: i64) -> Result<()> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM committees WHERE id = $1)",
        )
        .bind(committee_id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)?;

        if !exists {
            return Err(AppError::NotFound(format!(
                "Committee '{}' not found",
                committee_id
            )));
        }
        Ok(())
    }
}
