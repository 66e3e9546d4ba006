mod outbox;

pub use outbox::{OutboxRecord, StatusChangeEvent, EVENT_TICKET_FORWARDED};
