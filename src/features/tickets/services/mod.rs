pub mod access_service;
pub mod group_service;
pub mod ticket_service;

pub use access_service::AccessService;
pub use group_service::GroupService;
pub use ticket_service::{ForwardTarget, NewTicket, TicketService};
