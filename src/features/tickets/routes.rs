use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::tickets::handlers::ticket_handler;
use crate::features::tickets::services::TicketService;

/// Create routes for the tickets feature
///
/// Note: This feature requires authentication
pub fn routes(service: Arc<TicketService>) -> Router {
    Router::new()
        .route(
            "/api/tickets",
            get(ticket_handler::list_tickets).post(ticket_handler::create_ticket),
        )
        .route(
            "/api/tickets/{id}",
            get(ticket_handler::get_ticket)
                .patch(ticket_handler::update_ticket_status)
                .delete(ticket_handler::delete_ticket),
        )
        .route(
            "/api/tickets/{id}/forward",
            post(ticket_handler::forward_ticket),
        )
        .with_state(service)
}
