use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::features::committees::models::CommitteeTag;

/// Embedded committee summary
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CommitteeDto {
    pub id: i64,
    pub name: String,
    pub head_id: i64,
}

/// Response DTO for a committee tag with its embedded committee
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CommitteeTagResponseDto {
    pub id: i64,
    pub committee: CommitteeDto,
    pub tagged_by: i64,
    pub tagged_by_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<CommitteeTag> for CommitteeTagResponseDto {
    fn from(tag: CommitteeTag) -> Self {
        Self {
            id: tag.id,
            committee: CommitteeDto {
                id: tag.committee_id,
                name: tag.committee_name,
                head_id: tag.committee_head_id,
            },
            tagged_by: tag.tagged_by,
            tagged_by_name: tag.tagged_by_name,
            reason: tag.reason,
            created_at: tag.created_at,
        }
    }
}

/// DTO for tagging a committee onto a ticket (admin-level only)
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCommitteeTagDto {
    pub committee_id: i64,

    #[validate(length(max = 1000, message = "Reason must not exceed 1000 characters"))]
    pub reason: Option<String>,
}

/// Query selecting which tag to delete: by tag id or by committee id
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct DeleteTagQuery {
    #[serde(alias = "tagId")]
    pub tag_id: Option<i64>,
    #[serde(alias = "committeeId")]
    pub committee_id: Option<i64>,
}
