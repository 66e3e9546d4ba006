use std::sync::Arc;

use crate::features::notifications::clients::{ChatClient, EmailClient};
use crate::features::notifications::models::StatusChangeEvent;
use crate::features::tickets::models::{ChatThreadRef, TicketStatus};
use crate::features::users::models::Role;

/// Best-effort notification fan-out.
///
/// Called after the ticket mutation has committed; every failure here is
/// logged and swallowed. The caller's response never depends on delivery.
/// Calls are awaited sequentially.
pub struct NotificationService {
    chat: Arc<ChatClient>,
    email: Arc<EmailClient>,
}

impl NotificationService {
    pub fn new(chat: Arc<ChatClient>, email: Arc<EmailClient>) -> Self {
        Self { chat, email }
    }

    /// Dispatch all notifications for a committed status change. Returns a
    /// chat thread reference when a new top-level message was posted, so
    /// the caller can record it on the ticket.
    pub async fn notify_status_change(&self, event: &StatusChangeEvent) -> Option<ChatThreadRef> {
        let mut new_thread = None;

        if event.new_status == TicketStatus::Resolved && self.chat.is_configured() {
            match self.chat.post_message(&resolved_message(event)).await {
                Ok(thread) => new_thread = thread,
                Err(e) => {
                    tracing::warn!(
                        "Chat notification failed for ticket {}: {}",
                        event.ticket_id,
                        e
                    );
                }
            }
        }

        if event.new_status == TicketStatus::Reopened && event.previous_status.is_terminal() {
            if let Some(thread) = event.chat_thread.as_ref() {
                if let Err(e) = self
                    .chat
                    .post_thread_reply(thread, &reopen_message(event))
                    .await
                {
                    tracing::warn!(
                        "Chat thread reply failed for ticket {}: {}",
                        event.ticket_id,
                        e
                    );
                }
            }
        }

        if let Some(recipient) = event.creator_email.as_deref() {
            if let Err(e) = self
                .email
                .send_status_update(
                    recipient,
                    &email_subject(event),
                    email_body(event),
                    event.email_message_id.as_deref(),
                )
                .await
            {
                tracing::warn!(
                    "Status email failed for ticket {}: {}",
                    event.ticket_id,
                    e
                );
            }
        }

        new_thread
    }
}

fn resolved_message(event: &StatusChangeEvent) -> String {
    format!(
        "Ticket #{} resolved by {} ({})",
        event.ticket_id, event.actor_name, event.actor_role
    )
}

/// Reopen wording varies with who reopened the ticket.
fn reopen_message(event: &StatusChangeEvent) -> String {
    match event.actor_role {
        Role::Student => format!(
            "Ticket #{} was reopened by its creator {} - the fix did not hold.",
            event.ticket_id, event.actor_name
        ),
        Role::Committee => format!(
            "Ticket #{} was reopened by committee member {}.",
            event.ticket_id, event.actor_name
        ),
        Role::Admin | Role::SuperAdmin => format!(
            "Ticket #{} was reopened by staff ({}).",
            event.ticket_id, event.actor_name
        ),
    }
}

fn email_subject(event: &StatusChangeEvent) -> String {
    format!("[Ticket #{}] {}", event.ticket_id, event.status_label)
}

fn email_body(event: &StatusChangeEvent) -> String {
    let mut body = format!(
        "Your ticket #{} is now \"{}\".\n",
        event.ticket_id, event.status_label
    );

    if let Some(committee) = event.forwarded_to.as_deref() {
        body.push_str(&format!("It has been forwarded to {}.\n", committee));
    }

    body.push_str("\nYou can reply to this email or check the helpdesk portal for details.\n");
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(role: Role, new_status: TicketStatus) -> StatusChangeEvent {
        StatusChangeEvent {
            ticket_id: 42,
            previous_status: TicketStatus::Resolved,
            new_status,
            status_label: "Reopened".to_string(),
            actor_role: role,
            actor_name: "Priya".to_string(),
            creator_email: None,
            chat_thread: None,
            email_message_id: None,
            forwarded_to: None,
        }
    }

    #[test]
    fn reopen_wording_depends_on_actor_role() {
        let student = reopen_message(&event(Role::Student, TicketStatus::Reopened));
        let committee = reopen_message(&event(Role::Committee, TicketStatus::Reopened));
        let admin = reopen_message(&event(Role::Admin, TicketStatus::Reopened));

        assert!(student.contains("its creator"));
        assert!(committee.contains("committee member"));
        assert!(admin.contains("staff"));
        assert_ne!(student, committee);
        assert_ne!(committee, admin);
    }

    #[test]
    fn email_mentions_forward_target_when_present() {
        let mut e = event(Role::Admin, TicketStatus::Forwarded);
        e.forwarded_to = Some("Cultural Committee".to_string());

        let body = email_body(&e);
        assert!(body.contains("forwarded to Cultural Committee"));
    }

    #[test]
    fn event_round_trips_as_outbox_payload() {
        let mut e = event(Role::Student, TicketStatus::Reopened);
        e.chat_thread = Some(ChatThreadRef {
            channel: "#helpdesk".to_string(),
            thread_ts: "1700000000.000100".to_string(),
        });

        let payload = serde_json::to_value(&e).unwrap();
        let decoded: StatusChangeEvent = serde_json::from_value(payload).unwrap();

        assert_eq!(decoded.ticket_id, 42);
        assert_eq!(decoded.new_status, TicketStatus::Reopened);
        assert_eq!(decoded.chat_thread, e.chat_thread);
    }
}
