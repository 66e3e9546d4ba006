mod group;
mod metadata;
mod ticket;

pub use group::TicketGroup;
pub use metadata::{
    ChatThreadRef, Comment, CommentKind, CommentSource, EmailThreadRef, TicketMetadata,
    METADATA_SCHEMA_VERSION,
};
pub use ticket::{StatusInfo, Ticket, TicketCategory, TicketStatus};
