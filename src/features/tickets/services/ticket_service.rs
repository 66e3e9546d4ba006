use chrono::Utc;
use sqlx::types::Json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::committees::models::Committee;
use crate::features::notifications::models::{
    StatusChangeEvent, EVENT_TICKET_FORWARDED,
};
use crate::features::notifications::services::NotificationService;
use crate::features::tickets::domain::{plan_forward, plan_status_change, Operation};
use crate::features::tickets::models::{
    ChatThreadRef, Comment, CommentKind, Ticket, TicketCategory, TicketMetadata, TicketStatus,
};
use crate::features::tickets::services::access_service::AccessService;
use crate::features::tickets::services::group_service::GroupService;
use crate::features::users::models::{Role, User};
use crate::shared::constants::MAX_VERSION_RETRIES;

/// Hydrating select: status lookup row and creator contact joined in.
const TICKET_SELECT: &str = r#"
    SELECT
        t.id, t.category, t.subcategory, t.location,
        t.created_by, t.assigned_to,
        s.value AS status, s.label AS status_label, s.badge_color AS status_badge,
        t.group_id, t.escalation_level, t.resolution_due,
        t.metadata, t.version,
        u.display_name AS creator_name, u.email AS creator_email,
        t.created_at, t.updated_at
    FROM tickets t
    JOIN ticket_statuses s ON s.id = t.status_id
    JOIN users u ON u.id = t.created_by
"#;

/// New ticket fields, already validated by the handler
pub struct NewTicket {
    pub category: TicketCategory,
    pub subcategory: String,
    pub location: Option<String>,
    pub description: String,
    pub group_id: Option<i64>,
    pub resolution_due: Option<chrono::DateTime<Utc>>,
}

/// Where a forwarded ticket went
pub struct ForwardTarget {
    pub committee_id: i64,
    pub committee_name: String,
    pub head: User,
}

/// Service for the ticket lifecycle: creation, gate-checked reads, status
/// transitions, forwarding, deletion.
pub struct TicketService {
    pool: PgPool,
    access: Arc<AccessService>,
    notifications: Arc<NotificationService>,
    groups: Arc<GroupService>,
}

impl TicketService {
    pub fn new(
        pool: PgPool,
        access: Arc<AccessService>,
        notifications: Arc<NotificationService>,
        groups: Arc<GroupService>,
    ) -> Self {
        Self {
            pool,
            access,
            notifications,
            groups,
        }
    }

    async fn fetch(&self, id: i64) -> Result<Option<Ticket>> {
        let sql = format!("{TICKET_SELECT} WHERE t.id = $1");

        sqlx::query_as::<_, Ticket>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch ticket: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn fetch_required(&self, id: i64) -> Result<Ticket> {
        self.fetch(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Ticket '{}' not found", id)))
    }

    /// Create a ticket. The description becomes the first comment.
    pub async fn create(&self, actor: &AuthenticatedUser, new: NewTicket) -> Result<Ticket> {
        let mut metadata = TicketMetadata::new();
        metadata.tat_due = new.resolution_due;
        metadata.push_comment(Comment {
            text: new.description,
            author: actor.display_name.clone(),
            posted_at: Utc::now(),
            source: actor.role.into(),
            kind: CommentKind::Public,
        });

        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO tickets (
                category, subcategory, location, created_by,
                status_id, group_id, resolution_due, metadata
            ) VALUES (
                $1, $2, $3, $4,
                (SELECT id FROM ticket_statuses WHERE value = 'open'),
                $5, $6, $7
            )
            RETURNING id
            "#,
        )
        .bind(new.category)
        .bind(&new.subcategory)
        .bind(new.location.as_deref())
        .bind(actor.id)
        .bind(new.group_id)
        .bind(new.resolution_due)
        .bind(Json(&metadata))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create ticket: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!("Ticket created: id={}, creator={}", id, actor.id);

        self.fetch_required(id).await
    }

    /// Gate-checked read
    pub async fn get(&self, actor: &AuthenticatedUser, id: i64) -> Result<Ticket> {
        let ticket = self.fetch_required(id).await?;
        self.access.authorize(&ticket, actor, Operation::View).await?;
        Ok(ticket)
    }

    /// List tickets visible to the actor, newest first.
    pub async fn list(
        &self,
        actor: &AuthenticatedUser,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Ticket>, i64)> {
        let (where_sql, scoped) = match actor.role {
            Role::Student => ("t.created_by = $1", true),
            Role::Committee => (
                r#"(t.created_by = $1 OR EXISTS (
                    SELECT 1
                    FROM committee_tags ct
                    JOIN committees c ON c.id = ct.committee_id
                    LEFT JOIN committee_members cm
                        ON cm.committee_id = ct.committee_id AND cm.user_id = $1
                    WHERE ct.ticket_id = t.id
                      AND (cm.user_id IS NOT NULL OR c.head_id = $1)
                ))"#,
                true,
            ),
            Role::Admin => (
                r#"(t.assigned_to = $1 OR EXISTS (
                    SELECT 1 FROM admin_scopes a
                    WHERE a.admin_id = $1
                      AND a.category = t.category
                      AND (a.location IS NULL OR a.location = t.location)
                ))"#,
                true,
            ),
            Role::SuperAdmin => ("TRUE", false),
        };

        let (limit_param, offset_param) = if scoped { ("$2", "$3") } else { ("$1", "$2") };

        let page_sql = format!(
            "{TICKET_SELECT} WHERE {where_sql} ORDER BY t.created_at DESC LIMIT {limit_param} OFFSET {offset_param}"
        );
        let count_sql = format!("SELECT COUNT(*) FROM tickets t WHERE {where_sql}");

        let mut page_query = sqlx::query_as::<_, Ticket>(&page_sql);
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        if scoped {
            page_query = page_query.bind(actor.id);
            count_query = count_query.bind(actor.id);
        }

        let tickets = page_query
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list tickets: {:?}", e);
                AppError::Database(e)
            })?;

        let total = count_query.fetch_one(&self.pool).await.map_err(|e| {
            tracing::error!("Failed to count tickets: {:?}", e);
            AppError::Database(e)
        })?;

        Ok((tickets, total))
    }

    /// Apply a status change and/or append a comment.
    ///
    /// Authorization and validation run before any write; the write itself
    /// is guarded by the version column and retried on conflict. Fan-out
    /// happens after commit and never affects the result.
    pub async fn update_status(
        &self,
        actor: &AuthenticatedUser,
        id: i64,
        requested: Option<TicketStatus>,
        comment: Option<String>,
        comment_kind: CommentKind,
    ) -> Result<Ticket> {
        if requested.is_none() && comment.is_none() {
            return Err(AppError::BadRequest(
                "Provide a status, a comment, or both".to_string(),
            ));
        }

        for _attempt in 0..MAX_VERSION_RETRIES {
            let ticket = self.fetch_required(id).await?;

            // A comment riding along with a permitted status change is part
            // of that transition; the standalone comment rule only applies
            // when no status change was requested.
            let op = match requested {
                Some(target) => Operation::SetStatus(target),
                None => Operation::Comment,
            };
            self.access.authorize(&ticket, actor, op).await?;

            let now = Utc::now();
            let plan = requested.map(|target| plan_status_change(ticket.status, target, actor.role, now));

            let mut metadata = ticket.metadata.0.clone();
            if let Some(plan) = plan.as_ref().filter(|p| p.changed) {
                if let Some(ts) = plan.set_resolved_at {
                    metadata.resolved_at = Some(ts);
                }
                if let Some(ts) = plan.set_reopened_at {
                    metadata.reopened_at = Some(ts);
                }
                if plan.increment_reopen {
                    metadata.reopen_count += 1;
                }
            }

            if let Some(text) = comment.clone() {
                // Internal notes are staff-only; everyone else posts public
                let kind = if actor.is_admin_level() {
                    comment_kind
                } else {
                    CommentKind::Public
                };
                metadata.push_comment(Comment {
                    text,
                    author: actor.display_name.clone(),
                    posted_at: now,
                    source: actor.role.into(),
                    kind,
                });
            }

            let new_status = plan.as_ref().map(|p| p.new_status).unwrap_or(ticket.status);
            let claim = plan.as_ref().map(|p| p.claim_by_actor).unwrap_or(false);

            let updated_rows = sqlx::query(
                r#"
                UPDATE tickets SET
                    status_id = (SELECT id FROM ticket_statuses WHERE value = $2),
                    assigned_to = CASE WHEN $3 THEN $4 ELSE assigned_to END,
                    metadata = $5,
                    version = version + 1,
                    updated_at = NOW()
                WHERE id = $1 AND version = $6
                "#,
            )
            .bind(id)
            .bind(new_status.as_str())
            .bind(claim)
            .bind(actor.id)
            .bind(Json(&metadata))
            .bind(ticket.version)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update ticket: {:?}", e);
                AppError::Database(e)
            })?
            .rows_affected();

            if updated_rows == 0 {
                tracing::debug!("Ticket {} version conflict, retrying", id);
                continue;
            }

            let updated = self.fetch_required(id).await?;

            if let Some(plan) = plan.as_ref().filter(|p| p.changed) {
                self.fan_out_status_change(&ticket, &updated, actor).await;

                if plan.new_status.is_terminal() {
                    if let Some(group_id) = updated.group_id {
                        if let Err(e) = self.groups.archive_if_complete(group_id).await {
                            tracing::warn!(
                                "Group archive check failed for group {}: {}",
                                group_id,
                                e
                            );
                        }
                    }
                }
            }

            return Ok(updated);
        }

        Err(AppError::Conflict(
            "Ticket was modified concurrently, please retry".to_string(),
        ))
    }

    /// Forward to a committee: status becomes forwarded, the committee head
    /// takes assignment, and the outbox record commits with the update.
    pub async fn forward(
        &self,
        actor: &AuthenticatedUser,
        id: i64,
        committee_id: i64,
        reason: Option<String>,
    ) -> Result<(Ticket, ForwardTarget)> {
        for _attempt in 0..MAX_VERSION_RETRIES {
            let ticket = self.fetch_required(id).await?;
            self.access
                .authorize(&ticket, actor, Operation::Forward)
                .await?;

            let plan =
                plan_forward(ticket.status).map_err(|msg| AppError::BadRequest(msg.to_string()))?;

            let target = self.fetch_forward_target(committee_id).await?;
            let status_label = self.status_label(plan.new_status).await?;

            let now = Utc::now();
            let mut metadata = ticket.metadata.0.clone();
            if plan.increment_forward {
                metadata.forward_count += 1;
            }
            metadata.push_comment(Comment {
                text: match reason.as_deref() {
                    Some(reason) => {
                        format!("Forwarded to {}: {}", target.committee_name, reason)
                    }
                    None => format!("Forwarded to {}", target.committee_name),
                },
                author: actor.display_name.clone(),
                posted_at: now,
                source: actor.role.into(),
                kind: CommentKind::Internal,
            });

            let event = StatusChangeEvent {
                ticket_id: id,
                previous_status: ticket.status,
                new_status: plan.new_status,
                status_label,
                actor_role: actor.role,
                actor_name: actor.display_name.clone(),
                creator_email: ticket.creator_email.clone(),
                chat_thread: metadata.chat_thread.clone(),
                email_message_id: metadata
                    .email_thread
                    .as_ref()
                    .map(|t| t.message_id.clone()),
                forwarded_to: Some(target.committee_name.clone()),
            };

            let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

            let updated_rows = sqlx::query(
                r#"
                UPDATE tickets SET
                    status_id = (SELECT id FROM ticket_statuses WHERE value = $2),
                    assigned_to = $3,
                    metadata = $4,
                    version = version + 1,
                    updated_at = NOW()
                WHERE id = $1 AND version = $5
                "#,
            )
            .bind(id)
            .bind(plan.new_status.as_str())
            .bind(target.head.id)
            .bind(Json(&metadata))
            .bind(ticket.version)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to forward ticket: {:?}", e);
                AppError::Database(e)
            })?
            .rows_affected();

            if updated_rows == 0 {
                tx.rollback().await.map_err(AppError::Database)?;
                tracing::debug!("Ticket {} version conflict on forward, retrying", id);
                continue;
            }

            sqlx::query(
                r#"
                INSERT INTO notification_outbox (ticket_id, event, payload)
                VALUES ($1, $2, $3)
                "#,
            )
            .bind(id)
            .bind(EVENT_TICKET_FORWARDED)
            .bind(Json(&event))
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to insert outbox record: {:?}", e);
                AppError::Database(e)
            })?;

            tx.commit().await.map_err(AppError::Database)?;

            tracing::info!(
                "Ticket {} forwarded to committee {} (head {})",
                id,
                target.committee_id,
                target.head.id
            );

            let updated = self.fetch_required(id).await?;
            return Ok((updated, target));
        }

        Err(AppError::Conflict(
            "Ticket was modified concurrently, please retry".to_string(),
        ))
    }

    /// Hard delete. The gate only lets super admins through.
    pub async fn delete(&self, actor: &AuthenticatedUser, id: i64) -> Result<()> {
        let ticket = self.fetch_required(id).await?;
        self.access
            .authorize(&ticket, actor, Operation::Delete)
            .await?;

        sqlx::query("DELETE FROM tickets WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete ticket: {:?}", e);
                AppError::Database(e)
            })?;

        tracing::info!("Ticket {} deleted by user {}", id, actor.id);

        Ok(())
    }

    /// Post-commit fan-out for direct status changes. Failures are logged
    /// and swallowed; a freshly posted chat message's thread reference is
    /// recorded on the ticket for later reopens.
    async fn fan_out_status_change(
        &self,
        before: &Ticket,
        after: &Ticket,
        actor: &AuthenticatedUser,
    ) {
        let event = StatusChangeEvent {
            ticket_id: after.id,
            previous_status: before.status,
            new_status: after.status,
            status_label: after.status_label.clone(),
            actor_role: actor.role,
            actor_name: actor.display_name.clone(),
            creator_email: after.creator_email.clone(),
            chat_thread: after.metadata.0.chat_thread.clone(),
            email_message_id: after
                .metadata
                .0
                .email_thread
                .as_ref()
                .map(|t| t.message_id.clone()),
            forwarded_to: None,
        };

        if let Some(thread) = self.notifications.notify_status_change(&event).await {
            self.record_chat_thread(after.id, &thread).await;
        }
    }

    /// Best-effort: remember the chat thread a resolved notification
    /// started. Targets only the chat_thread key so a concurrent comment
    /// write is not clobbered.
    async fn record_chat_thread(&self, id: i64, thread: &ChatThreadRef) {
        let value = match serde_json::to_value(thread) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Failed to encode chat thread ref: {}", e);
                return;
            }
        };

        let result = sqlx::query(
            r#"
            UPDATE tickets
            SET metadata = jsonb_set(metadata, '{chat_thread}', $2, true)
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(Json(value))
        .execute(&self.pool)
        .await;

        if let Err(e) = result {
            tracing::warn!("Failed to record chat thread for ticket {}: {}", id, e);
        }
    }

    async fn fetch_forward_target(&self, committee_id: i64) -> Result<ForwardTarget> {
        let committee = sqlx::query_as::<_, Committee>(
            "SELECT id, name, head_id, created_at FROM committees WHERE id = $1",
        )
        .bind(committee_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch committee: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("Committee '{}' not found", committee_id)))?;

        let head = sqlx::query_as::<_, User>(
            r#"
            SELECT id, subject, display_name, email, role, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(committee.head_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch committee head: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| {
            AppError::NotFound(format!("Committee head '{}' not found", committee.head_id))
        })?;

        Ok(ForwardTarget {
            committee_id: committee.id,
            committee_name: committee.name,
            head,
        })
    }

    async fn status_label(&self, status: TicketStatus) -> Result<String> {
        sqlx::query_scalar::<_, String>("SELECT label FROM ticket_statuses WHERE value = $1")
            .bind(status.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch status label: {:?}", e);
                AppError::Database(e)
            })
    }
}
