use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::features::tickets::models::{ChatThreadRef, TicketStatus};
use crate::features::users::models::Role;

/// A committed ticket state change, as handed to the notification fan-out.
///
/// Also the payload shape of `notification_outbox` rows, so the direct
/// path and the outbox drain share one type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusChangeEvent {
    pub ticket_id: i64,
    pub previous_status: TicketStatus,
    pub new_status: TicketStatus,
    pub status_label: String,
    pub actor_role: Role,
    pub actor_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_thread: Option<ChatThreadRef>,
    /// Message-id of the original inbound email, when the ticket came from
    /// email ingestion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_message_id: Option<String>,
    /// Committee name, present on forward events for wording
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forwarded_to: Option<String>,
}

/// Outbox event discriminator for forward operations
pub const EVENT_TICKET_FORWARDED: &str = "ticket_forwarded";

/// Database model for an outbox row
#[derive(Debug, Clone, FromRow)]
pub struct OutboxRecord {
    pub id: i64,
    pub ticket_id: i64,
    pub event: String,
    pub payload: sqlx::types::Json<StatusChangeEvent>,
    pub created_at: DateTime<Utc>,
    pub dispatched_at: Option<DateTime<Utc>>,
}
