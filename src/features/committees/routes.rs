use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::committees::handlers::{tag_handler, TagState};
use crate::features::committees::services::CommitteeService;
use crate::features::tickets::services::TicketService;

/// Create routes for the committees feature
///
/// Note: This feature requires authentication
pub fn routes(
    committee_service: Arc<CommitteeService>,
    ticket_service: Arc<TicketService>,
) -> Router {
    let state = TagState {
        committee_service,
        ticket_service,
    };

    Router::new()
        .route(
            "/api/tickets/{id}/committee-tags",
            get(tag_handler::list_tags)
                .post(tag_handler::create_tag)
                .delete(tag_handler::delete_tag),
        )
        .with_state(state)
}
