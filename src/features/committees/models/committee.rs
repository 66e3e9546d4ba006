use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for a committee
#[derive(Debug, Clone, FromRow)]
pub struct Committee {
    pub id: i64,
    pub name: String,
    pub head_id: i64,
    pub created_at: DateTime<Utc>,
}

/// A committee tag row hydrated with its committee and the tagging user's
/// name, as returned by the tag listing.
#[derive(Debug, Clone, FromRow)]
pub struct CommitteeTag {
    pub id: i64,
    pub ticket_id: i64,
    pub committee_id: i64,
    pub committee_name: String,
    pub committee_head_id: i64,
    pub tagged_by: i64,
    pub tagged_by_name: String,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}
