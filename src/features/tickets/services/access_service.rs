use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::tickets::domain::{authorize, AccessContext, Decision, Operation};
use crate::features::tickets::models::Ticket;
use crate::features::users::models::Role;

/// Loads the relationships the gate decides over (ownership, committee tag
/// membership, scope match) and evaluates the gate. The gate itself stays
/// pure; this service is its only database-facing edge.
pub struct AccessService {
    pool: PgPool,
}

impl AccessService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn load_context(
        &self,
        ticket: &Ticket,
        actor: &AuthenticatedUser,
    ) -> Result<AccessContext> {
        let is_owner = ticket.created_by == actor.id;
        let is_assignee = ticket.assigned_to == Some(actor.id);

        // Relationship lookups are role-gated: only committees care about
        // tags, only admins about scopes.
        let is_tagged_committee = match actor.role {
            Role::Committee => self.tagged_committee_membership(ticket.id, actor.id).await?,
            _ => false,
        };

        let scope_match = match actor.role {
            Role::Admin => {
                self.admin_scope_match(actor.id, ticket).await?
            }
            _ => false,
        };

        Ok(AccessContext {
            role: actor.role,
            is_owner,
            is_assignee,
            is_tagged_committee,
            scope_match,
            category: ticket.category,
            status: ticket.status,
        })
    }

    /// Gate-check one operation, mapping a denial to 403 with its reason.
    pub async fn authorize(
        &self,
        ticket: &Ticket,
        actor: &AuthenticatedUser,
        op: Operation,
    ) -> Result<AccessContext> {
        let ctx = self.load_context(ticket, actor).await?;

        match authorize(&ctx, op) {
            Decision::Allow => Ok(ctx),
            Decision::Deny(reason) => Err(AppError::Forbidden(reason.to_string())),
        }
    }

    /// Is the user a member (or head) of any committee tagged on this ticket?
    async fn tagged_committee_membership(&self, ticket_id: i64, user_id: i64) -> Result<bool> {
        let tagged = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM committee_tags ct
                JOIN committees c ON c.id = ct.committee_id
                LEFT JOIN committee_members cm
                    ON cm.committee_id = ct.committee_id AND cm.user_id = $2
                WHERE ct.ticket_id = $1
                  AND (cm.user_id IS NOT NULL OR c.head_id = $2)
            )
            "#,
        )
        .bind(ticket_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to check committee tag membership: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(tagged)
    }

    async fn admin_scope_match(&self, admin_id: i64, ticket: &Ticket) -> Result<bool> {
        let matched = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM admin_scopes
                WHERE admin_id = $1
                  AND category = $2
                  AND (location IS NULL OR location = $3)
            )
            "#,
        )
        .bind(admin_id)
        .bind(ticket.category)
        .bind(ticket.location.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to check admin scope: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(matched)
    }
}
