use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::{FromRow, Type};
use utoipa::ToSchema;

use crate::features::tickets::models::metadata::TicketMetadata;

/// Ticket domain, matching the database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "ticket_category", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TicketCategory {
    Hostel,
    College,
    Committee,
}

impl std::fmt::Display for TicketCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TicketCategory::Hostel => write!(f, "hostel"),
            TicketCategory::College => write!(f, "college"),
            TicketCategory::Committee => write!(f, "committee"),
        }
    }
}

/// Ticket status values.
///
/// Persisted as a foreign key into the `ticket_statuses` lookup table
/// (value/label/badge color), not as a hard-coded string column; this enum
/// mirrors the seeded rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Open,
    Reopened,
    InProgress,
    AwaitingStudentResponse,
    Forwarded,
    Resolved,
    Closed,
}

impl TicketStatus {
    /// Resolved and closed are the terminal states: eligible for reopening,
    /// counted when deciding whether a ticket group is finished.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TicketStatus::Resolved | TicketStatus::Closed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Open => "open",
            TicketStatus::Reopened => "reopened",
            TicketStatus::InProgress => "in_progress",
            TicketStatus::AwaitingStudentResponse => "awaiting_student_response",
            TicketStatus::Forwarded => "forwarded",
            TicketStatus::Resolved => "resolved",
            TicketStatus::Closed => "closed",
        }
    }
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TicketStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(TicketStatus::Open),
            "reopened" => Ok(TicketStatus::Reopened),
            "in_progress" => Ok(TicketStatus::InProgress),
            "awaiting_student_response" => Ok(TicketStatus::AwaitingStudentResponse),
            "forwarded" => Ok(TicketStatus::Forwarded),
            "resolved" => Ok(TicketStatus::Resolved),
            "closed" => Ok(TicketStatus::Closed),
            other => Err(format!("Unknown status '{}'", other)),
        }
    }
}

/// A row from the status lookup table
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, ToSchema)]
pub struct StatusInfo {
    pub value: TicketStatus,
    pub label: String,
    pub badge_color: String,
}

/// Database model for a ticket, hydrated with its status lookup row and
/// creator contact details (joined on every read; notifications need them).
#[derive(Debug, Clone, FromRow)]
pub struct Ticket {
    pub id: i64,
    pub category: TicketCategory,
    pub subcategory: String,
    pub location: Option<String>,
    pub created_by: i64,
    pub assigned_to: Option<i64>,
    pub status: TicketStatus,
    pub status_label: String,
    pub status_badge: String,
    pub group_id: Option<i64>,
    pub escalation_level: i32,
    pub resolution_due: Option<DateTime<Utc>>,
    pub metadata: Json<TicketMetadata>,
    pub version: i64,
    pub creator_name: String,
    pub creator_email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn status_round_trips_through_strings() {
        for status in [
            TicketStatus::Open,
            TicketStatus::Reopened,
            TicketStatus::InProgress,
            TicketStatus::AwaitingStudentResponse,
            TicketStatus::Forwarded,
            TicketStatus::Resolved,
            TicketStatus::Closed,
        ] {
            assert_eq!(TicketStatus::from_str(status.as_str()), Ok(status));
        }
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!(TicketStatus::from_str("escalated").is_err());
        assert!(TicketStatus::from_str("OPEN").is_err());
        assert!(TicketStatus::from_str("").is_err());
    }

    #[test]
    fn terminal_states() {
        assert!(TicketStatus::Resolved.is_terminal());
        assert!(TicketStatus::Closed.is_terminal());
        assert!(!TicketStatus::Open.is_terminal());
        assert!(!TicketStatus::Forwarded.is_terminal());
    }
}
