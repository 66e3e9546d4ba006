use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::tickets::models::{
    Comment, CommentKind, StatusInfo, Ticket, TicketCategory,
};
use crate::features::tickets::services::ForwardTarget;

/// Request DTO for creating a ticket
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateTicketDto {
    pub category: TicketCategory,

    #[validate(
        length(min = 1, max = 64, message = "Subcategory must be 1-64 characters"),
        regex(
            path = "*crate::shared::validation::SUBCATEGORY_REGEX",
            message = "Subcategory must be a lowercase hyphenated slug"
        )
    )]
    pub subcategory: String,

    #[validate(regex(
        path = "*crate::shared::validation::LOCATION_CODE_REGEX",
        message = "Location must be an uppercase code like BLOCK-A"
    ))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[validate(length(min = 1, max = 4000, message = "Description must be 1-4000 characters"))]
    pub description: String,

    pub group_id: Option<i64>,

    pub resolution_due: Option<DateTime<Utc>>,
}

/// Request DTO for the status/comment PATCH
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateTicketStatusDto {
    /// New status value; one of the status lookup table's values
    pub status: Option<String>,

    #[validate(length(min = 1, max = 4000, message = "Comment must be 1-4000 characters"))]
    pub comment: Option<String>,

    /// "public" (default) or "internal"; internal notes are staff-only
    #[serde(alias = "commentType")]
    pub comment_type: Option<String>,
}

/// Request DTO for forwarding a ticket to a committee
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ForwardTicketDto {
    pub committee_id: i64,

    #[validate(length(max = 1000, message = "Reason must not exceed 1000 characters"))]
    pub reason: Option<String>,
}

/// Response DTO for a ticket, with metadata flattened into explicit fields
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TicketResponseDto {
    pub id: i64,
    pub category: TicketCategory,
    pub subcategory: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub status: StatusInfo,
    pub created_by: i64,
    pub creator_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<i64>,
    pub escalation_level: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution_due: Option<DateTime<Utc>>,
    pub comments: Vec<Comment>,
    pub reopen_count: u32,
    pub forward_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reopened_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tat_due: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TicketResponseDto {
    /// Build the response a given viewer may see: internal notes are
    /// stripped for non-staff viewers.
    pub fn for_viewer(ticket: Ticket, viewer_is_staff: bool) -> Self {
        let metadata = ticket.metadata.0;

        let comments = metadata
            .comments
            .into_iter()
            .filter(|c| viewer_is_staff || c.kind == CommentKind::Public)
            .collect();

        Self {
            id: ticket.id,
            category: ticket.category,
            subcategory: ticket.subcategory,
            location: ticket.location,
            status: StatusInfo {
                value: ticket.status,
                label: ticket.status_label,
                badge_color: ticket.status_badge,
            },
            created_by: ticket.created_by,
            creator_name: ticket.creator_name,
            assigned_to: ticket.assigned_to,
            group_id: ticket.group_id,
            escalation_level: ticket.escalation_level,
            resolution_due: ticket.resolution_due,
            comments,
            reopen_count: metadata.reopen_count,
            forward_count: metadata.forward_count,
            resolved_at: metadata.resolved_at,
            reopened_at: metadata.reopened_at,
            tat_due: metadata.tat_due,
            created_at: ticket.created_at,
            updated_at: ticket.updated_at,
        }
    }
}

/// Committee the ticket was forwarded to
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ForwardedToDto {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Response DTO for the forward operation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ForwardResponseDto {
    pub ticket: TicketResponseDto,
    pub forwarded_to: ForwardedToDto,
}

impl ForwardedToDto {
    pub fn from_target(target: &ForwardTarget) -> Self {
        Self {
            id: target.head.id,
            name: target.head.display_name.clone(),
            email: target.head.email.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::tickets::models::{CommentSource, TicketMetadata, TicketStatus};
    use sqlx::types::Json;

    fn ticket_with_comments() -> Ticket {
        let mut metadata = TicketMetadata::new();
        metadata.push_comment(Comment {
            text: "visible to everyone".to_string(),
            author: "A. Student".to_string(),
            posted_at: Utc::now(),
            source: CommentSource::Student,
            kind: CommentKind::Public,
        });
        metadata.push_comment(Comment {
            text: "staff-only note".to_string(),
            author: "Warden".to_string(),
            posted_at: Utc::now(),
            source: CommentSource::Admin,
            kind: CommentKind::Internal,
        });

        Ticket {
            id: 7,
            category: TicketCategory::Hostel,
            subcategory: "wifi-outage".to_string(),
            location: Some("BLOCK-A".to_string()),
            created_by: 1,
            assigned_to: None,
            status: TicketStatus::Open,
            status_label: "Open".to_string(),
            status_badge: "blue".to_string(),
            group_id: None,
            escalation_level: 0,
            resolution_due: None,
            metadata: Json(metadata),
            version: 0,
            creator_name: "A. Student".to_string(),
            creator_email: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn internal_notes_are_hidden_from_non_staff() {
        let dto = TicketResponseDto::for_viewer(ticket_with_comments(), false);
        assert_eq!(dto.comments.len(), 1);
        assert_eq!(dto.comments[0].text, "visible to everyone");
    }

    #[test]
    fn staff_see_internal_notes() {
        let dto = TicketResponseDto::for_viewer(ticket_with_comments(), true);
        assert_eq!(dto.comments.len(), 2);
    }
}
