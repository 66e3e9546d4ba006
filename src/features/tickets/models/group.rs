use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// A batch of related tickets; archived once every member ticket is
/// resolved or closed.
#[derive(Debug, Clone, FromRow)]
pub struct TicketGroup {
    pub id: i64,
    pub name: String,
    pub archived_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}
