use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::users::models::Role;

pub const METADATA_SCHEMA_VERSION: u32 = 1;

/// The ticket's JSON metadata document.
///
/// Everything here is schema-light extension state: the append-only comment
/// trail, lifecycle counters and timestamps, and references into external
/// threads (chat, email). Every field defaults so rows written before a
/// field existed still decode.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct TicketMetadata {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Ordered, append-only. Comments are never edited or removed.
    #[serde(default)]
    pub comments: Vec<Comment>,

    #[serde(default)]
    pub reopen_count: u32,

    /// Incremented on every forward; informational, not enforced.
    #[serde(default)]
    pub forward_count: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reopened_at: Option<DateTime<Utc>>,

    /// Turn-around-time due date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tat_due: Option<DateTime<Utc>>,

    /// Reference to the chat message posted when this ticket was resolved;
    /// reopen notifications reply in this thread.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_thread: Option<ChatThreadRef>,

    /// Message-id of the original inbound email when the ticket came from
    /// email ingestion; outbound status emails thread to it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_thread: Option<EmailThreadRef>,
}

fn default_schema_version() -> u32 {
    METADATA_SCHEMA_VERSION
}

impl TicketMetadata {
    pub fn new() -> Self {
        Self {
            schema_version: METADATA_SCHEMA_VERSION,
            ..Default::default()
        }
    }

    pub fn push_comment(&mut self, comment: Comment) {
        self.comments.push(comment);
    }
}

/// Which channel/role a comment came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CommentSource {
    Student,
    Committee,
    Admin,
    SuperAdmin,
    Email,
    Chat,
}

impl From<Role> for CommentSource {
    fn from(role: Role) -> Self {
        match role {
            Role::Student => CommentSource::Student,
            Role::Committee => CommentSource::Committee,
            Role::Admin => CommentSource::Admin,
            Role::SuperAdmin => CommentSource::SuperAdmin,
        }
    }
}

/// Comment visibility: public comments are shown to the ticket's creator,
/// internal notes are staff-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CommentKind {
    #[default]
    Public,
    Internal,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Comment {
    pub text: String,
    pub author: String,
    pub posted_at: DateTime<Utc>,
    pub source: CommentSource,
    #[serde(default)]
    pub kind: CommentKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ChatThreadRef {
    pub channel: String,
    pub thread_ts: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EmailThreadRef {
    pub message_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_decodes_with_defaults() {
        let meta: TicketMetadata = serde_json::from_str("{}").unwrap();
        assert_eq!(meta.reopen_count, 0);
        assert_eq!(meta.forward_count, 0);
        assert!(meta.comments.is_empty());
        assert!(meta.resolved_at.is_none());
        assert!(meta.chat_thread.is_none());
    }

    #[test]
    fn comment_kind_defaults_to_public() {
        let json = r#"{
            "comments": [{
                "text": "wifi is down again",
                "author": "A. Student",
                "posted_at": "2026-02-01T10:00:00Z",
                "source": "student"
            }]
        }"#;
        let meta: TicketMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(meta.comments[0].kind, CommentKind::Public);
    }

    #[test]
    fn document_round_trips() {
        let mut meta = TicketMetadata::new();
        meta.reopen_count = 2;
        meta.chat_thread = Some(ChatThreadRef {
            channel: "#helpdesk".to_string(),
            thread_ts: "1717171717.000100".to_string(),
        });
        meta.push_comment(Comment {
            text: "checked the router".to_string(),
            author: "Warden".to_string(),
            posted_at: Utc::now(),
            source: CommentSource::Admin,
            kind: CommentKind::Internal,
        });

        let encoded = serde_json::to_string(&meta).unwrap();
        let decoded: TicketMetadata = serde_json::from_str(&encoded).unwrap();

        assert_eq!(decoded.reopen_count, 2);
        assert_eq!(decoded.comments.len(), 1);
        assert_eq!(decoded.comments[0].kind, CommentKind::Internal);
        assert_eq!(decoded.chat_thread, meta.chat_thread);
    }
}
