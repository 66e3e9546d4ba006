use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;

use crate::core::error::{AppError, Result};
use crate::features::notifications::models::OutboxRecord;
use crate::features::notifications::services::NotificationService;
use crate::shared::constants::{OUTBOX_BATCH_SIZE, OUTBOX_POLL_INTERVAL_SECS};

/// Outbox drain worker that runs in the background.
///
/// Transactional mutations (forwarding) append outbox rows instead of
/// notifying inline; this worker picks them up and performs the fan-out.
/// A row is marked dispatched even when delivery fails - notifications are
/// best-effort and never retried forever.
pub struct OutboxWorker {
    pool: PgPool,
    notifications: Arc<NotificationService>,
}

impl OutboxWorker {
    pub fn new(pool: PgPool, notifications: Arc<NotificationService>) -> Self {
        Self {
            pool,
            notifications,
        }
    }

    /// Run the worker in a background loop
    pub async fn run(&self) {
        tracing::info!("Starting notification outbox worker");

        let mut interval = interval(Duration::from_secs(OUTBOX_POLL_INTERVAL_SECS));

        loop {
            interval.tick().await;

            if let Err(e) = self.drain_batch().await {
                tracing::error!("Error draining notification outbox: {:?}", e);
            }
        }
    }

    async fn drain_batch(&self) -> Result<()> {
        let records = self.claim_batch().await?;

        if records.is_empty() {
            return Ok(());
        }

        tracing::info!("Dispatching {} outbox notifications", records.len());

        for record in records {
            self.notifications
                .notify_status_change(&record.payload.0)
                .await;

            tracing::debug!(
                "Outbox record {} ({}) dispatched for ticket {}",
                record.id,
                record.event,
                record.ticket_id
            );
        }

        Ok(())
    }

    /// Claim the oldest undispatched rows. SKIP LOCKED keeps concurrent
    /// instances from double-dispatching a row.
    async fn claim_batch(&self) -> Result<Vec<OutboxRecord>> {
        let records = sqlx::query_as::<_, OutboxRecord>(
            r#"
            UPDATE notification_outbox
            SET dispatched_at = NOW()
            WHERE id IN (
                SELECT id FROM notification_outbox
                WHERE dispatched_at IS NULL
                ORDER BY created_at
                LIMIT $1
                FOR UPDATE SKIP LOCKED
            )
            RETURNING id, ticket_id, event, payload, created_at, dispatched_at
            "#,
        )
        .bind(OUTBOX_BATCH_SIZE)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to claim outbox batch: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(records)
    }
}
